//! services/mod.rs
//! Módulo que agrupa las etapas del pipeline de envío.

pub mod campaign_service;
pub mod csv_service;
pub mod email_service;
pub mod rate_limit_service;
pub mod report_service;
pub mod run_log_service;
pub mod template_service;
pub mod validation_service;
