//! models/email_model.rs
//! Estructuras del mensaje: lo que rinde la plantilla, lo que sale por SMTP
//! y el adjunto ya leído en memoria.

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};

/// Asunto + cuerpo ya renderizados para un contacto.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedEmail {
    pub subject: String,
    pub body: String,
}

/// Todo lo necesario para construir un mensaje a un destinatario.
#[derive(Debug, Clone)]
pub struct OutgoingEmail {
    pub recipient: String,
    pub subject: String,
    pub body: String,
    /// Mismo archivo para todos los contactos de la corrida.
    pub attachment: Option<PathBuf>,
}

impl OutgoingEmail {
    pub fn new(recipient: &str, rendered: RenderedEmail, attachment: Option<PathBuf>) -> Self {
        Self {
            recipient: recipient.to_string(),
            subject: rendered.subject,
            body: rendered.body,
            attachment,
        }
    }
}

#[derive(Debug, Clone)]
pub struct EmailAttachment {
    pub filename: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

impl EmailAttachment {
    /// Lee el archivo completo; falla si no existe.
    pub fn from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(anyhow!("Attachment not found: {}", path.display()));
        }
        let data = std::fs::read(path)
            .with_context(|| format!("Could not read attachment {}", path.display()))?;
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "attachment".to_string());

        Ok(Self {
            filename,
            content_type: content_type_for(path).to_string(),
            data,
        })
    }
}

/// `application/pdf` para .pdf, binario genérico para el resto.
pub fn content_type_for(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("pdf") => "application/pdf",
        _ => "application/octet-stream",
    }
}

/// Vista previa de un mensaje en modo dry-run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailPreview {
    pub to: String,
    pub subject: String,
    pub body_excerpt: String,
    /// (ruta, existe)
    pub attachment: Option<(PathBuf, bool)>,
}
