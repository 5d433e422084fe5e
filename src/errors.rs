//! errors.rs
//! Errores tipados de la corrida. Los fatales abortan todo; los de despacho
//! sólo marcan la fila como `failed`.

use std::path::PathBuf;

use thiserror::Error;

/// Errores que abortan la corrida completa.
#[derive(Debug, Error)]
pub enum CampaignError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("could not read contacts file {path}: {source}")]
    Ingestion {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("could not load template {path}: {source}")]
    Template {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not write run log {path}: {source}")]
    RunLog {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },
}

/// Falla de un intento individual contra el servidor SMTP.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    /// Red/protocolo: vale la pena reintentar.
    #[error("{0}")]
    Transient(String),

    #[error("{0}")]
    Fatal(String),
}

/// Falla del despacho de un contacto (no fatal para la corrida).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DispatchError {
    #[error("Attachment error: {0}")]
    Attachment(String),

    /// El mensaje no se pudo armar (dirección inválida, header, etc.)
    #[error("message error: {0}")]
    Message(String),

    #[error("smtp error after {attempts} attempts: {message}")]
    Exhausted { attempts: u32, message: String },

    #[error("unexpected error: {0}")]
    Fatal(String),
}
