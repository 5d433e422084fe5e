//! config/app_config.rs
//! Configuración resuelta de la corrida. Se arma una sola vez en `main`
//! y se pasa hacia abajo; nada de globales.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::config::cli::Cli;
use crate::errors::CampaignError;

pub const GMAIL_USER_VAR: &str = "GMAIL_USER";
pub const GMAIL_APP_PASS_VAR: &str = "GMAIL_APP_PASS";

/// Piso para no dividir por cero al calcular el intervalo.
const MIN_EMAILS_PER_MINUTE: f64 = 0.1;

/// Usuario + app password de Gmail.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub user: String,
    pub app_password: String,
}

impl Credentials {
    pub fn new(user: impl Into<String>, app_password: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            app_password: app_password.into(),
        }
    }

    /// Lee `GMAIL_USER` / `GMAIL_APP_PASS`. Ambas deben existir y no estar vacías.
    pub fn from_env() -> Option<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Option<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let user = lookup(GMAIL_USER_VAR).filter(|v| !v.trim().is_empty())?;
        let pass = lookup(GMAIL_APP_PASS_VAR).filter(|v| !v.trim().is_empty())?;
        Some(Self::new(user, pass))
    }
}

// Nunca exponer la contraseña en logs
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("user", &self.user)
            .field("app_password", &"***")
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    pub timeout: Duration,
    /// Nombre visible en el header From
    pub from_name: Option<String>,
}

impl Default for SmtpSettings {
    fn default() -> Self {
        SmtpSettings {
            host: "smtp.gmail.com".to_string(),
            port: 587,
            timeout: Duration::from_secs(30),
            from_name: None,
        }
    }
}

/// Reintentos con backoff exponencial: espera `backoff_factor ^ intento` segundos.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff_factor: f64,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, backoff_factor: f64) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            backoff_factor,
        }
    }

    /// Espera luego del intento fallido número `attempt` (1-based).
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let secs = self.backoff_factor.powi(attempt as i32);
        Duration::from_secs_f64(secs.max(0.0))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy::new(3, 2.0)
    }
}

/// Lo que puede venir en el JSON de configuración. Todo opcional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FileConfig {
    pub smtp_host: Option<String>,
    pub smtp_port: Option<u16>,
    pub smtp_timeout_secs: Option<u64>,
    pub retry_backoff: Option<f64>,
    pub from_name: Option<String>,
    pub preview_chars: Option<usize>,
}

impl FileConfig {
    /// Si el archivo no existe devuelve `None`; si existe pero está mal, error.
    pub fn load(path: &Path) -> Result<Option<Self>, CampaignError> {
        if !path.exists() {
            log::debug!("Config JSON {:?} no encontrado; usando valores por defecto", path);
            return Ok(None);
        }
        let raw = std::fs::read_to_string(path).map_err(|e| {
            CampaignError::Config(format!("could not read {}: {}", path.display(), e))
        })?;
        let parsed = serde_json::from_str::<FileConfig>(&raw).map_err(|e| {
            CampaignError::Config(format!("invalid JSON in {}: {}", path.display(), e))
        })?;
        log::info!("Config JSON cargado desde {:?}", path);
        Ok(Some(parsed))
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub contacts_path: PathBuf,
    pub attachment_path: PathBuf,
    pub template_path: PathBuf,
    pub log_path: PathBuf,
    pub dry_run: bool,
    pub emails_per_minute: f64,
    pub retry: RetryPolicy,
    pub smtp: SmtpSettings,
    pub preview_chars: usize,
    pub credentials: Option<Credentials>,
}

impl AppConfig {
    /// Combina CLI, JSON y entorno. Envío real sin credenciales = error de config.
    pub fn resolve(
        cli: &Cli,
        file: Option<FileConfig>,
        credentials: Option<Credentials>,
    ) -> Result<Self, CampaignError> {
        let dry_run = !cli.send;
        if !dry_run && credentials.is_none() {
            return Err(CampaignError::Config(format!(
                "{} and {} must be set in environment to send emails",
                GMAIL_USER_VAR, GMAIL_APP_PASS_VAR
            )));
        }

        let file = file.unwrap_or_default();
        let defaults = SmtpSettings::default();
        let smtp = SmtpSettings {
            host: file.smtp_host.unwrap_or(defaults.host),
            port: file.smtp_port.unwrap_or(defaults.port),
            timeout: file
                .smtp_timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(defaults.timeout),
            from_name: file.from_name,
        };
        let retry = RetryPolicy::new(
            cli.max_retries,
            file.retry_backoff
                .unwrap_or(RetryPolicy::default().backoff_factor),
        );

        Ok(AppConfig {
            contacts_path: cli.csv.clone(),
            attachment_path: cli.resume.clone(),
            template_path: cli.template.clone(),
            log_path: cli.log.clone(),
            dry_run,
            emails_per_minute: cli.emails_per_minute.max(MIN_EMAILS_PER_MINUTE),
            retry,
            smtp,
            preview_chars: file.preview_chars.unwrap_or(1000),
            credentials,
        })
    }

    /// `60 / emails_per_minute` segundos entre mensajes.
    pub fn send_interval(&self) -> Duration {
        Duration::from_secs_f64(60.0 / self.emails_per_minute.max(MIN_EMAILS_PER_MINUTE))
    }
}
