//! services/validation_service.rs

use std::sync::OnceLock;

use regex::Regex;

use crate::models::contact_model::ContactRecord;

const EMAIL_FIELD: &str = "Email";

/// Un solo `@`, al menos un punto después, nada de `@` extra.
fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[^@]+@[^@]+\.[^@]+$").expect("regex válida"))
}

pub fn is_valid_email(email: &str) -> bool {
    email_regex().is_match(email.trim())
}

/// Devuelve (es_válida, errores). Junta todos los errores, no corta en el primero.
pub fn validate_row(row: &ContactRecord, required_fields: &[&str]) -> (bool, Vec<String>) {
    let mut errors = Vec::new();

    for field in required_fields {
        let present = row.get(field).map(|v| !v.trim().is_empty()).unwrap_or(false);
        if !present {
            errors.push(format!("Missing required field '{}'", field));
        }
    }

    let email = row.value_or_empty(EMAIL_FIELD).trim();
    if email.is_empty() {
        errors.push("Email is empty".to_string());
    } else if !is_valid_email(email) {
        errors.push(format!("Invalid email address: '{}'", email));
    }

    (errors.is_empty(), errors)
}
