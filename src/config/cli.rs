//! config/cli.rs

use std::path::PathBuf;

use clap::Parser;

pub const DEFAULT_CSV_PATH: &str = "sample_hr.csv";
pub const DEFAULT_RESUME_PATH: &str = "resume.pdf";
pub const DEFAULT_LOG_PATH: &str = "send_log.csv";
pub const DEFAULT_TEMPLATE_PATH: &str = "email_template.txt";
pub const DEFAULT_CONFIG_JSON: &str = "config.example.json";

#[derive(Debug, Clone, Parser)]
#[command(
    name = "outreach_mailer",
    about = "Personalized cold-email sender (Gmail SMTP). Dry-run by default."
)]
pub struct Cli {
    /// CSV con los contactos (SNo, Name, Email, Title, Company)
    #[arg(short = 'c', long = "csv", default_value = DEFAULT_CSV_PATH)]
    pub csv: PathBuf,

    /// Archivo a adjuntar (CV)
    #[arg(short = 'r', long = "resume", default_value = DEFAULT_RESUME_PATH)]
    pub resume: PathBuf,

    /// Plantilla del correo; si no existe se usa la de por defecto
    #[arg(short = 't', long = "template", default_value = DEFAULT_TEMPLATE_PATH)]
    pub template: PathBuf,

    /// Enviar de verdad. Sin este flag sólo se muestra la vista previa.
    #[arg(long = "send", default_value_t = false)]
    pub send: bool,

    #[arg(long = "emails-per-minute", default_value_t = 20.0)]
    pub emails_per_minute: f64,

    /// CSV donde se agrega una fila por contacto procesado
    #[arg(long = "log", default_value = DEFAULT_LOG_PATH)]
    pub log: PathBuf,

    /// Intentos máximos ante errores SMTP transitorios
    #[arg(
        long = "max-retries",
        default_value_t = 3,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub max_retries: u32,

    /// Config JSON opcional (host/puerto SMTP, backoff, etc.)
    #[arg(long = "config", default_value = DEFAULT_CONFIG_JSON)]
    pub config: PathBuf,

    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    pub verbosity: u8,
}
