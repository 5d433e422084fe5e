//! app.rs
//! Arma los servicios de producción a partir de la config resuelta.
use std::sync::Arc;

use crate::config::app_config::AppConfig;
use crate::services::{
    campaign_service::CampaignService,
    email_service::{EmailService, SmtpMailer},
    rate_limit_service::{Delay, RateLimiter, TokioDelay},
    report_service::{LogReporter, Reporter},
};

pub fn init_app(config: AppConfig) -> CampaignService {
    let delay: Arc<dyn Delay> = Arc::new(TokioDelay);
    let reporter: Arc<dyn Reporter> = Arc::new(LogReporter);

    // Sin credenciales sólo se puede previsualizar
    let email_service = match &config.credentials {
        Some(creds) => EmailService::new(
            Arc::new(SmtpMailer::new(config.smtp.clone(), creds.clone())),
            delay.clone(),
            reporter.clone(),
            creds.user.clone(),
        ),
        None => EmailService::preview_only(delay.clone(), reporter.clone()),
    }
    .with_sender_name(config.smtp.from_name.clone())
    .with_preview_chars(config.preview_chars);
    let rate_limiter = RateLimiter::new(config.send_interval(), delay);

    CampaignService::new(config, email_service, rate_limiter, reporter)
}
