use clap::Parser;
use dotenv::dotenv;

use crate::config::app_config::{AppConfig, Credentials, FileConfig};
use crate::config::cli::Cli;
use crate::errors::CampaignError;
use crate::logger::init_logger;

mod app;
mod config;
mod errors;
mod logger;
mod models;
mod services;

#[cfg(test)]
mod tests;

async fn run(cli: Cli) -> Result<(), CampaignError> {
    let file_config = FileConfig::load(&cli.config)?;
    // Sin credenciales y con --send: se aborta antes de leer cualquier fila
    let config = AppConfig::resolve(&cli, file_config, Credentials::from_env())?;

    let campaign = app::init_app(config);
    campaign.run().await?;
    Ok(())
}

#[tokio::main]
async fn main() {
    dotenv().ok(); // Cargar .env al inicio
    let cli = Cli::parse();
    init_logger(cli.verbosity);

    if let Err(e) = run(cli).await {
        log::error!("{}. Abortando.", e);
        std::process::exit(1);
    }
}
