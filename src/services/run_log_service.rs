//! services/run_log_service.rs
//! Log CSV append-only: una fila por contacto procesado. Nunca se reescribe.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;

use crate::errors::CampaignError;
use crate::models::contact_model::ContactRecord;
use crate::models::outcome_model::SendOutcome;

pub const LOG_HEADER: [&str; 8] = [
    "timestamp",
    "SNo",
    "Name",
    "Email",
    "Company",
    "Title",
    "status",
    "message",
];

#[derive(Debug, Clone)]
pub struct RunLogService {
    path: PathBuf,
}

impl RunLogService {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Agrega una fila (y el header si el archivo no existía).
    /// Cualquier error de escritura es fatal para la corrida.
    pub fn append(&self, row: &ContactRecord, outcome: &SendOutcome) -> Result<(), CampaignError> {
        self.write_row(row, outcome)
            .map_err(|source| CampaignError::RunLog {
                path: self.path.clone(),
                source,
            })
    }

    fn write_row(&self, row: &ContactRecord, outcome: &SendOutcome) -> Result<()> {
        let exists = self.path.exists();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("No se pudo abrir {:?}", self.path))?;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);

        if !exists {
            writer.write_record(LOG_HEADER)?;
        }

        let timestamp = Utc::now().to_rfc3339();
        writer.write_record([
            timestamp.as_str(),
            row.value_or_empty("SNo"),
            row.value_or_empty("Name"),
            row.value_or_empty("Email"),
            row.value_or_empty("Company"),
            row.value_or_empty("Title"),
            outcome.status.as_str(),
            outcome.message.as_str(),
        ])?;
        writer.flush().context("No se pudo escribir el log")?;
        Ok(())
    }
}
