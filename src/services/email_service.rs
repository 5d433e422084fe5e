//! services/email_service.rs
//! Arma el mensaje (texto + adjunto opcional) y lo muestra (dry-run) o lo
//! envía por SMTP con reintentos y backoff exponencial.

use std::sync::Arc;

use async_trait::async_trait;
use lettre::{
    message::{
        header::{ContentDisposition, ContentType},
        Body, Mailbox, MultiPart, SinglePart,
    },
    transport::smtp::{
        authentication::Credentials as SmtpCredentials,
        client::{Tls, TlsParameters},
    },
    Address, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};

use crate::{
    config::app_config::{Credentials, RetryPolicy, SmtpSettings},
    errors::{DispatchError, TransportError},
    models::{
        email_model::{EmailAttachment, EmailPreview, OutgoingEmail},
        outcome_model::Delivery,
    },
    services::{rate_limit_service::Delay, report_service::Reporter},
};

/// Remitente de relleno cuando se previsualiza sin credenciales.
pub const DRY_RUN_SENDER: &str = "dry-run@example.com";

/// Un intento de entrega. Cada llamada abre y cierra su propia sesión.
#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn deliver(&self, message: Message) -> Result<(), TransportError>;
}

/// Transporte real: STARTTLS contra el host configurado (Gmail por defecto).
#[derive(Debug, Clone)]
pub struct SmtpMailer {
    settings: SmtpSettings,
    credentials: Credentials,
}

impl SmtpMailer {
    pub fn new(settings: SmtpSettings, credentials: Credentials) -> Self {
        Self {
            settings,
            credentials,
        }
    }
}

#[async_trait]
impl MailTransport for SmtpMailer {
    async fn deliver(&self, message: Message) -> Result<(), TransportError> {
        let host = &self.settings.host;
        log::info!("Conectando a SMTP {}:{}", host, self.settings.port);

        let tls_params = TlsParameters::new(host.clone())
            .map_err(|e| TransportError::Fatal(format!("TLS configuration error: {e}")))?;
        // Sin pool: el transport vive sólo durante este intento
        let mailer = AsyncSmtpTransport::<Tokio1Executor>::relay(host)
            .map_err(|e| TransportError::Fatal(format!("Invalid SMTP relay: {e}")))?
            .port(self.settings.port)
            .credentials(SmtpCredentials::new(
                self.credentials.user.clone(),
                self.credentials.app_password.clone(),
            ))
            .tls(Tls::Required(tls_params))
            .timeout(Some(self.settings.timeout))
            .build();

        match tokio::time::timeout(self.settings.timeout, mailer.send(message)).await {
            Err(_) => Err(TransportError::Transient(format!(
                "timeout after {}s",
                self.settings.timeout.as_secs()
            ))),
            Ok(Err(e)) => Err(classify_smtp_error(&e)),
            Ok(Ok(_)) => Ok(()),
        }
    }
}

/// Todo error de red/protocolo se reintenta; los errores "client" de lettre
/// (uso inválido, mensaje mal armado) no.
fn classify_smtp_error(e: &lettre::transport::smtp::Error) -> TransportError {
    if e.is_client() {
        TransportError::Fatal(e.to_string())
    } else {
        TransportError::Transient(e.to_string())
    }
}

#[derive(Clone)]
pub struct EmailService {
    /// `None` cuando no hay credenciales: sólo se puede previsualizar.
    transport: Option<Arc<dyn MailTransport>>,
    delay: Arc<dyn Delay>,
    reporter: Arc<dyn Reporter>,
    sender: String,
    sender_name: Option<String>,
    preview_chars: usize,
}

impl EmailService {
    pub fn new(
        transport: Arc<dyn MailTransport>,
        delay: Arc<dyn Delay>,
        reporter: Arc<dyn Reporter>,
        sender: impl Into<String>,
    ) -> Self {
        Self::build(Some(transport), delay, reporter, sender.into())
    }

    /// Servicio sin transporte, para corridas dry-run sin credenciales.
    pub fn preview_only(delay: Arc<dyn Delay>, reporter: Arc<dyn Reporter>) -> Self {
        Self::build(None, delay, reporter, DRY_RUN_SENDER.to_string())
    }

    fn build(
        transport: Option<Arc<dyn MailTransport>>,
        delay: Arc<dyn Delay>,
        reporter: Arc<dyn Reporter>,
        sender: String,
    ) -> Self {
        Self {
            transport,
            delay,
            reporter,
            sender,
            sender_name: None,
            preview_chars: 1000,
        }
    }

    pub fn with_sender_name(mut self, name: Option<String>) -> Self {
        self.sender_name = name;
        self
    }

    pub fn with_preview_chars(mut self, chars: usize) -> Self {
        self.preview_chars = chars;
        self
    }

    /// Despacha un mensaje. En dry-run nunca toca la red ni arma el mensaje MIME:
    /// la dirección sólo se parsea al enviar de verdad.
    /// El adjunto se valida primero: si falta, no hay ningún otro efecto.
    pub async fn send(
        &self,
        email: &OutgoingEmail,
        dry_run: bool,
        policy: &RetryPolicy,
    ) -> Result<Delivery, DispatchError> {
        let attachment = match &email.attachment {
            Some(path) => Some(
                EmailAttachment::from_path(path)
                    .map_err(|e| DispatchError::Attachment(e.to_string()))?,
            ),
            None => None,
        };

        if dry_run {
            self.reporter.preview(&self.preview_of(email));
            return Ok(Delivery::Previewed);
        }

        let transport = self.transport.as_ref().ok_or_else(|| {
            DispatchError::Fatal("live sending is disabled (no SMTP credentials)".to_string())
        })?;
        let message = self.build_message(email, attachment)?;
        self.send_with_retry(transport.as_ref(), message, policy).await
    }

    async fn send_with_retry(
        &self,
        transport: &dyn MailTransport,
        message: Message,
        policy: &RetryPolicy,
    ) -> Result<Delivery, DispatchError> {
        let mut attempt: u32 = 0;
        loop {
            log::info!("Enviando mensaje (intento {})", attempt + 1);
            match transport.deliver(message.clone()).await {
                Ok(()) => return Ok(Delivery::Sent),
                Err(TransportError::Transient(err)) => {
                    attempt += 1;
                    if attempt >= policy.max_attempts {
                        log::error!("Fallo SMTP luego de {} intentos: {}", attempt, err);
                        return Err(DispatchError::Exhausted {
                            attempts: attempt,
                            message: err,
                        });
                    }
                    let wait = policy.delay_for(attempt);
                    log::warn!(
                        "Error SMTP transitorio: {}. Reintentando en {:.1}s...",
                        err,
                        wait.as_secs_f64()
                    );
                    self.delay.sleep(wait).await;
                }
                Err(TransportError::Fatal(err)) => {
                    log::error!("Error inesperado durante el envío SMTP: {}", err);
                    return Err(DispatchError::Fatal(err));
                }
            }
        }
    }

    fn build_message(
        &self,
        email: &OutgoingEmail,
        attachment: Option<EmailAttachment>,
    ) -> Result<Message, DispatchError> {
        let from = self.from_mailbox()?;
        let to: Mailbox = email
            .recipient
            .parse()
            .map_err(|e| DispatchError::Message(format!("Invalid recipient address: {e}")))?;

        let text_part = SinglePart::builder()
            .header(ContentType::TEXT_PLAIN)
            .body(email.body.clone());
        let mut multipart = MultiPart::mixed().singlepart(text_part);

        if let Some(attach) = attachment {
            let content_type = ContentType::parse(&attach.content_type)
                .map_err(|e| DispatchError::Message(format!("Invalid content type: {e}")))?;
            let part = SinglePart::builder()
                .header(content_type)
                .header(ContentDisposition::attachment(&attach.filename))
                .body(Body::new(attach.data));
            multipart = multipart.singlepart(part);
        }

        Message::builder()
            .from(from)
            .to(to)
            .subject(email.subject.as_str())
            .multipart(multipart)
            .map_err(|e| DispatchError::Message(format!("Could not build message: {e}")))
    }

    fn from_mailbox(&self) -> Result<Mailbox, DispatchError> {
        let address: Address = self
            .sender
            .parse()
            .map_err(|e| DispatchError::Message(format!("Invalid from address: {e}")))?;
        Ok(Mailbox::new(self.sender_name.clone(), address))
    }

    fn preview_of(&self, email: &OutgoingEmail) -> EmailPreview {
        EmailPreview {
            to: email.recipient.clone(),
            subject: email.subject.clone(),
            body_excerpt: truncate(&email.body, self.preview_chars),
            attachment: email
                .attachment
                .as_ref()
                .map(|p| (p.clone(), p.exists())),
        }
    }
}

/// Primeros `max` caracteres + "..." si el texto es más largo.
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        let head: String = text.chars().take(max).collect();
        format!("{head}...")
    } else {
        text.to_string()
    }
}
