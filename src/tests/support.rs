//! tests/support.rs
//! Dobles de prueba: transporte con guion, sleeper que sólo anota, reporter en memoria.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use lettre::Message;

use crate::config::app_config::{AppConfig, RetryPolicy, SmtpSettings};
use crate::errors::TransportError;
use crate::models::contact_model::ContactRecord;
use crate::models::email_model::EmailPreview;
use crate::models::outcome_model::RunSummary;
use crate::services::email_service::{EmailService, MailTransport, DRY_RUN_SENDER};
use crate::services::rate_limit_service::Delay;
use crate::services::report_service::Reporter;

/// Devuelve los resultados en orden; cuando se acaba el guion, éxito.
#[derive(Default)]
pub struct ScriptedTransport {
    script: Mutex<VecDeque<Result<(), TransportError>>>,
    calls: AtomicU32,
}

impl ScriptedTransport {
    pub fn new(script: Vec<Result<(), TransportError>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            calls: AtomicU32::new(0),
        }
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MailTransport for ScriptedTransport {
    async fn deliver(&self, _message: Message) -> Result<(), TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.script.lock().unwrap().pop_front().unwrap_or(Ok(()))
    }
}

/// Siempre falla igual.
pub struct FailingTransport(pub TransportError);

#[async_trait]
impl MailTransport for FailingTransport {
    async fn deliver(&self, _message: Message) -> Result<(), TransportError> {
        Err(self.0.clone())
    }
}

#[derive(Default)]
pub struct RecordingDelay {
    sleeps: Mutex<Vec<Duration>>,
}

impl RecordingDelay {
    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.lock().unwrap().clone()
    }
}

#[async_trait]
impl Delay for RecordingDelay {
    async fn sleep(&self, duration: Duration) {
        self.sleeps.lock().unwrap().push(duration);
    }
}

#[derive(Default)]
pub struct MemoryReporter {
    previews: Mutex<Vec<EmailPreview>>,
    summaries: Mutex<Vec<RunSummary>>,
}

impl MemoryReporter {
    pub fn previews(&self) -> Vec<EmailPreview> {
        self.previews.lock().unwrap().clone()
    }

    pub fn summaries(&self) -> Vec<RunSummary> {
        self.summaries.lock().unwrap().clone()
    }
}

impl Reporter for MemoryReporter {
    fn preview(&self, preview: &EmailPreview) {
        self.previews.lock().unwrap().push(preview.clone());
    }

    fn summary(&self, summary: &RunSummary, _log_path: &Path) {
        self.summaries.lock().unwrap().push(*summary);
    }
}

pub fn contact(pairs: &[(&str, &str)]) -> ContactRecord {
    pairs.iter().map(|(k, v)| (*k, *v)).collect()
}

pub fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).expect("No se pudo escribir archivo de prueba");
    path
}

/// Config de prueba apuntando todo dentro de `dir`. Dry-run, sin credenciales.
pub fn test_config(dir: &Path) -> AppConfig {
    AppConfig {
        contacts_path: dir.join("contacts.csv"),
        attachment_path: dir.join("resume.pdf"),
        template_path: dir.join("template.txt"),
        log_path: dir.join("send_log.csv"),
        dry_run: true,
        emails_per_minute: 20.0,
        retry: RetryPolicy::default(),
        smtp: SmtpSettings::default(),
        preview_chars: 1000,
        credentials: None,
    }
}

pub struct Harness {
    pub transport: Arc<ScriptedTransport>,
    pub delay: Arc<RecordingDelay>,
    pub reporter: Arc<MemoryReporter>,
    pub email_service: EmailService,
}

pub fn harness(script: Vec<Result<(), TransportError>>) -> Harness {
    let transport = Arc::new(ScriptedTransport::new(script));
    let delay = Arc::new(RecordingDelay::default());
    let reporter = Arc::new(MemoryReporter::default());
    let email_service = EmailService::new(
        transport.clone(),
        delay.clone(),
        reporter.clone(),
        DRY_RUN_SENDER,
    );
    Harness {
        transport,
        delay,
        reporter,
        email_service,
    }
}
