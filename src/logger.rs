//! logger.rs
//! Configuración del logger usando env_logger.

/// `RUST_LOG` manda; si no está, el nivel sale de la cantidad de `-v`.
pub fn init_logger(verbosity: u8) {
    let default_level = match verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let log_env = std::env::var("RUST_LOG").unwrap_or_else(|_| default_level.to_string());

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_env))
        .format_timestamp_secs()
        .init();
}
