//! models/contact_model.rs
//! Un contacto = una fila del CSV, indexada por nombre de columna.

use std::collections::HashMap;

/// Columnas que toda fila debe traer con valor.
pub const REQUIRED_FIELDS: [&str; 5] = ["SNo", "Name", "Email", "Title", "Company"];

/// Clave donde quedan los valores que sobran respecto al header.
pub const RESIDUAL_KEY: &str = "__extra__";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactRecord {
    fields: HashMap<String, String>,
}

impl ContactRecord {
    pub fn new(fields: HashMap<String, String>) -> Self {
        Self { fields }
    }

    /// Valor crudo de la columna, si existe.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields.get(column).map(String::as_str)
    }

    /// Valor de la columna o cadena vacía (útil para logs y reportes).
    pub fn value_or_empty(&self, column: &str) -> &str {
        self.get(column).unwrap_or("")
    }

    pub fn sno(&self) -> &str {
        self.value_or_empty("SNo")
    }

    pub fn email(&self) -> &str {
        self.value_or_empty("Email")
    }
}

impl<K, V> FromIterator<(K, V)> for ContactRecord
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
