use std::fmt;

/// Estado terminal de un contacto dentro de la corrida.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendStatus {
    Previewed,
    Sent,
    Failed,
    Skipped,
}

impl SendStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SendStatus::Previewed => "previewed",
            SendStatus::Sent => "sent",
            SendStatus::Failed => "failed",
            SendStatus::Skipped => "skipped",
        }
    }
}

impl fmt::Display for SendStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendOutcome {
    pub status: SendStatus,
    pub message: String, // diagnóstico libre
}

impl SendOutcome {
    pub fn new(status: SendStatus, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

/// Resultado exitoso de un despacho.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Previewed,
    Sent,
}

impl Delivery {
    pub fn message(&self) -> &'static str {
        match self {
            Delivery::Previewed => "dry-run previewed",
            Delivery::Sent => "sent",
        }
    }
}

impl From<Delivery> for SendOutcome {
    fn from(d: Delivery) -> Self {
        let status = match d {
            Delivery::Previewed => SendStatus::Previewed,
            Delivery::Sent => SendStatus::Sent,
        };
        SendOutcome::new(status, d.message())
    }
}

/// Conteos agregados al final de la corrida.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub total: usize,
    pub sent: usize,
    pub previewed: usize,
    pub failed: usize,
    pub skipped: usize,
}

impl RunSummary {
    pub fn record(&mut self, status: SendStatus) {
        self.total += 1;
        match status {
            SendStatus::Previewed => self.previewed += 1,
            SendStatus::Sent => self.sent += 1,
            SendStatus::Failed => self.failed += 1,
            SendStatus::Skipped => self.skipped += 1,
        }
    }
}
