//! services/report_service.rs
//! Salida "para humanos" (vista previa y resumen). Va por un trait para
//! poder capturarla en los tests sin depender del logger global.

use std::path::Path;

use crate::models::email_model::EmailPreview;
use crate::models::outcome_model::RunSummary;

pub trait Reporter: Send + Sync {
    fn preview(&self, preview: &EmailPreview);
    fn summary(&self, summary: &RunSummary, log_path: &Path);
}

/// Implementación de producción: todo a `log::info!`.
#[derive(Debug, Clone, Default)]
pub struct LogReporter;

impl Reporter for LogReporter {
    fn preview(&self, preview: &EmailPreview) {
        log::info!("----- DRY RUN: EMAIL PREVIEW -----");
        log::info!("To: {}", preview.to);
        log::info!("Subject: {}", preview.subject);
        log::info!("Body:\n{}", preview.body_excerpt);
        if let Some((path, exists)) = &preview.attachment {
            log::info!("Attachment: {} (exists: {})", path.display(), exists);
        }
        log::info!("----- END PREVIEW -----");
    }

    fn summary(&self, summary: &RunSummary, log_path: &Path) {
        log::info!("------ SUMMARY ------");
        log::info!("Total rows processed: {}", summary.total);
        log::info!("Sent: {}", summary.sent);
        log::info!("Previewed: {}", summary.previewed);
        log::info!("Failed: {}", summary.failed);
        log::info!("Skipped: {}", summary.skipped);
        log::info!("Log written to: {}", log_path.display());
        log::info!("---------------------");
    }
}
