//! services/campaign_service.rs
//! Recorre los contactos en orden: validar -> renderizar -> despachar -> loguear,
//! con pausa fija entre mensajes. Todo secuencial.

use std::path::PathBuf;
use std::sync::Arc;

use crate::{
    config::app_config::AppConfig,
    errors::CampaignError,
    models::{
        contact_model::{ContactRecord, REQUIRED_FIELDS},
        email_model::OutgoingEmail,
        outcome_model::{RunSummary, SendOutcome, SendStatus},
    },
    services::{
        csv_service::CsvService,
        email_service::EmailService,
        rate_limit_service::RateLimiter,
        report_service::Reporter,
        run_log_service::RunLogService,
        template_service::{EmailTemplate, TemplateSource},
        validation_service::validate_row,
    },
};

#[derive(Clone)]
pub struct CampaignService {
    config: AppConfig,
    csv_service: CsvService,
    email_service: EmailService,
    run_log: RunLogService,
    rate_limiter: RateLimiter,
    reporter: Arc<dyn Reporter>,
}

impl CampaignService {
    pub fn new(
        config: AppConfig,
        email_service: EmailService,
        rate_limiter: RateLimiter,
        reporter: Arc<dyn Reporter>,
    ) -> Self {
        let run_log = RunLogService::new(config.log_path.clone());
        Self {
            config,
            csv_service: CsvService::new(),
            email_service,
            run_log,
            rate_limiter,
            reporter,
        }
    }

    /// Corrida completa. Sólo devuelve `Err` ante errores fatales
    /// (plantilla, CSV, log); las fallas por contacto quedan en el log.
    pub async fn run(&self) -> Result<RunSummary, CampaignError> {
        if self.config.dry_run {
            log::info!("Modo dry-run: no se enviará ningún correo. Usa --send para envío real.");
        } else {
            log::info!("Credenciales encontradas; envío real habilitado.");
        }

        let template = EmailTemplate::load(&self.config.template_path)?;
        if template.source == TemplateSource::BuiltIn {
            log::info!("Usando la plantilla incorporada");
        }

        let contacts = self.csv_service.read_contacts(&self.config.contacts_path)?;
        let attachment = self.resolve_attachment();

        log::info!(
            "Rate limit: {} correos/min => {:.2}s entre mensajes",
            self.config.emails_per_minute,
            self.rate_limiter.interval().as_secs_f64()
        );

        let mut summary = RunSummary::default();
        let count = contacts.len();

        for (idx, raw_row) in contacts.iter().enumerate() {
            // Copia por fila; el original queda intacto
            let row = raw_row.clone();
            let outcome = self
                .process_contact(&row, &template, attachment.clone())
                .await;
            self.run_log.append(&row, &outcome)?;
            summary.record(outcome.status);

            // Las filas salteadas no mandan nada, así que no esperan
            if outcome.status != SendStatus::Skipped && idx + 1 < count {
                self.rate_limiter.pause().await;
            }
        }

        self.reporter.summary(&summary, self.run_log.path());
        Ok(summary)
    }

    async fn process_contact(
        &self,
        row: &ContactRecord,
        template: &EmailTemplate,
        attachment: Option<PathBuf>,
    ) -> SendOutcome {
        let (is_valid, errors) = validate_row(row, &REQUIRED_FIELDS);
        if !is_valid {
            let reason = errors.join("; ");
            log::warn!(
                "Salteando fila SNo={} Email={}: {}",
                row.sno(),
                row.email(),
                reason
            );
            return SendOutcome::new(SendStatus::Skipped, reason);
        }

        let rendered = template.render(row);
        log::info!(
            "Preparando mensaje para {} (SNo {})",
            row.email(),
            row.sno()
        );

        let email = OutgoingEmail::new(row.email().trim(), rendered, attachment);
        match self
            .email_service
            .send(&email, self.config.dry_run, &self.config.retry)
            .await
        {
            Ok(delivery) => {
                let outcome = SendOutcome::from(delivery);
                match outcome.status {
                    SendStatus::Sent => log::info!("Enviado a {}", row.email()),
                    _ => log::info!("Dry-run previsualizado para {}", row.email()),
                }
                outcome
            }
            Err(e) => {
                log::error!("Fallo el envío a {}: {}", row.email(), e);
                SendOutcome::new(SendStatus::Failed, e.to_string())
            }
        }
    }

    /// Si el adjunto no existe se avisa una vez y se envía sin él.
    fn resolve_attachment(&self) -> Option<PathBuf> {
        let path = &self.config.attachment_path;
        if path.exists() {
            Some(path.clone())
        } else {
            log::warn!("Adjunto {:?} no encontrado; se enviará sin adjunto", path);
            None
        }
    }
}
