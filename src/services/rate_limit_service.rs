//! services/rate_limit_service.rs
//! Esperas inyectables: backoff de reintentos y pausa entre mensajes.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

#[async_trait]
pub trait Delay: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Espera real sobre el timer de tokio.
#[derive(Debug, Clone, Default)]
pub struct TokioDelay;

#[async_trait]
impl Delay for TokioDelay {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Espaciado fijo entre mensajes. No descuenta el tiempo ya gastado en el
/// envío ni en los reintentos, así que el ritmo real puede quedar por debajo.
#[derive(Clone)]
pub struct RateLimiter {
    interval: Duration,
    delay: Arc<dyn Delay>,
}

impl RateLimiter {
    pub fn new(interval: Duration, delay: Arc<dyn Delay>) -> Self {
        Self { interval, delay }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub async fn pause(&self) {
        log::debug!(
            "Esperando {:.2}s por rate limiting",
            self.interval.as_secs_f64()
        );
        self.delay.sleep(self.interval).await;
    }
}
