//! services/csv_service.rs
//! Lectura "tolerante" del CSV de contactos: normaliza tabs/espacios,
//! adivina el delimitador y devuelve las filas en orden.

use std::collections::HashMap;
use std::path::Path;
use std::sync::OnceLock;

use anyhow::{anyhow, Context, Result};
use csv::{ReaderBuilder, Trim};
use regex::Regex;

use crate::errors::CampaignError;
use crate::models::contact_model::{ContactRecord, RESIDUAL_KEY};

/// Tamaño de la muestra para adivinar el delimitador
const SNIFF_SAMPLE_BYTES: usize = 8192;
/// Candidatos en orden de preferencia (los tabs ya se convirtieron a coma).
const DELIMITER_CANDIDATES: [u8; 4] = [b',', b';', b'|', b':'];
const BOM: char = '\u{feff}';

fn comma_spacing() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // Sólo espacios horizontales: no se comen los saltos de línea
    RE.get_or_init(|| Regex::new(r",[^\S\r\n]+").expect("regex válida"))
}

#[derive(Debug, Clone, Default)]
pub struct CsvService;

impl CsvService {
    pub fn new() -> Self {
        Self
    }

    /// Lee el archivo completo y devuelve los contactos en orden.
    pub fn read_contacts(&self, path: &Path) -> Result<Vec<ContactRecord>, CampaignError> {
        if !path.exists() {
            return Err(CampaignError::Ingestion {
                path: path.to_path_buf(),
                source: anyhow!("CSV file not found"),
            });
        }
        log::info!("Leyendo CSV: {:?}", path);

        let raw = std::fs::read_to_string(path)
            .context("El archivo no es texto UTF-8 legible")
            .map_err(|source| CampaignError::Ingestion {
                path: path.to_path_buf(),
                source,
            })?;

        let rows = self
            .parse_contacts(&raw)
            .map_err(|source| CampaignError::Ingestion {
                path: path.to_path_buf(),
                source,
            })?;
        log::info!("Se encontraron {} filas en el CSV (normalizado)", rows.len());
        Ok(rows)
    }

    /// Igual que `read_contacts` pero sobre texto ya cargado.
    pub fn parse_contacts(&self, raw: &str) -> Result<Vec<ContactRecord>> {
        let normalized = normalize(raw);

        let delimiter = match sniff_delimiter(sample_of(&normalized)) {
            Some(d) => {
                log::info!("Delimitador detectado: '{}'", d as char);
                d
            }
            None => {
                log::warn!("No se pudo detectar el delimitador; usando coma");
                b','
            }
        };

        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .delimiter(delimiter)
            .trim(Trim::All)
            .from_reader(normalized.as_bytes());

        let headers: Vec<String> = reader
            .headers()
            .context("No se pudo leer el header del CSV")?
            .iter()
            .map(|h| h.replace(BOM, "").trim().to_string())
            .collect();
        log::info!("Headers del CSV (normalizados): {:?}", headers);

        let mut contacts = Vec::new();
        for (idx, result) in reader.records().enumerate() {
            // +2: header + 1-based
            let record = result.with_context(|| format!("Fila {}: CSV inválido", idx + 2))?;

            let mut fields: HashMap<String, String> = headers
                .iter()
                .enumerate()
                .map(|(i, h)| {
                    let value = record.get(i).unwrap_or("").trim().to_string();
                    (h.clone(), value)
                })
                .collect();

            if record.len() > headers.len() {
                let separator = (delimiter as char).to_string();
                let extra: Vec<&str> = record.iter().skip(headers.len()).collect();
                fields.insert(RESIDUAL_KEY.to_string(), extra.join(separator.as_str()));
            }

            contacts.push(ContactRecord::new(fields));
        }

        Ok(contacts)
    }
}

/// BOM fuera, tabs a coma, coma + espacios a una sola coma.
pub fn normalize(raw: &str) -> String {
    let without_bom = raw.strip_prefix(BOM).unwrap_or(raw);
    let commas = without_bom.replace('\t', ",");
    comma_spacing().replace_all(&commas, ",").into_owned()
}

/// Primeros bytes del texto, cortados en la última línea completa.
fn sample_of(text: &str) -> &str {
    if text.len() <= SNIFF_SAMPLE_BYTES {
        return text;
    }
    let mut end = SNIFF_SAMPLE_BYTES;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    let head = &text[..end];
    match head.rfind('\n') {
        Some(pos) => &head[..pos],
        None => head,
    }
}

/// Un candidato gana si aparece la misma cantidad (no cero) de veces,
/// fuera de comillas, en todas las líneas no vacías de la muestra.
pub fn sniff_delimiter(sample: &str) -> Option<u8> {
    let lines: Vec<&str> = sample.lines().filter(|l| !l.trim().is_empty()).collect();
    if lines.is_empty() {
        return None;
    }

    DELIMITER_CANDIDATES.into_iter().find(|&candidate| {
        let first = count_unquoted(lines[0], candidate);
        first > 0 && lines.iter().all(|l| count_unquoted(l, candidate) == first)
    })
}

fn count_unquoted(line: &str, delimiter: u8) -> usize {
    let mut in_quotes = false;
    let mut count = 0;
    for b in line.bytes() {
        if b == b'"' {
            in_quotes = !in_quotes;
        } else if b == delimiter && !in_quotes {
            count += 1;
        }
    }
    count
}
