//! services/template_service.rs
//! Plantilla simple con placeholders `{Campo}`. Nunca falla por una clave
//! faltante: se reemplaza por cadena vacía.

use std::path::{Path, PathBuf};

use crate::errors::CampaignError;
use crate::models::contact_model::ContactRecord;
use crate::models::email_model::RenderedEmail;

/// Campos que se asumen vacíos sin avisar.
const SILENT_DEFAULT_FIELDS: [&str; 4] = ["Name", "Title", "Company", "SNo"];
const SUBJECT_PREFIX: &str = "subject:";

pub const DEFAULT_TEMPLATE: &str = "Subject: Connecting about potential opportunities at {Company}

Hello {Name},

I hope you're doing well. I'm reaching out because I'm interested in roles at {Company} that match my background. I saw your profile as {Title} and thought you'd be the best person to connect with.

A quick snapshot: I'm a software engineer with experience in Java, Python and cloud technologies.

I've attached my resume for your review. If appropriate, I'd appreciate 10-15 minutes of your time for a quick chat.

Thanks,
Your Name
Email: your.email@example.com
";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateSource {
    File(PathBuf),
    BuiltIn,
}

/// Texto de la plantilla, cargado una vez por corrida.
#[derive(Debug, Clone)]
pub struct EmailTemplate {
    pub text: String,
    pub source: TemplateSource,
}

impl EmailTemplate {
    pub fn builtin() -> Self {
        Self {
            text: DEFAULT_TEMPLATE.to_string(),
            source: TemplateSource::BuiltIn,
        }
    }

    /// Carga desde archivo; si no existe, usa la plantilla por defecto (no es error).
    pub fn load(path: &Path) -> Result<Self, CampaignError> {
        if !path.exists() {
            log::info!(
                "Plantilla {:?} no encontrada; usando la plantilla por defecto",
                path
            );
            return Ok(Self::builtin());
        }
        let text = std::fs::read_to_string(path).map_err(|source| CampaignError::Template {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Plantilla cargada desde {:?}", path);
        Ok(Self {
            text,
            source: TemplateSource::File(path.to_path_buf()),
        })
    }

    pub fn render(&self, row: &ContactRecord) -> RenderedEmail {
        render_template(&self.text, row)
    }
}

/// Separa "Subject:" (si la primera línea lo trae) del cuerpo y reemplaza los placeholders.
pub fn render_template(template: &str, row: &ContactRecord) -> RenderedEmail {
    let lookup = |key: &str| lookup_field(row, key);

    let mut lines = template.lines();
    let first = lines.next().unwrap_or("");

    if starts_with_ignore_case(first, SUBJECT_PREFIX) {
        let subject_tpl = first[SUBJECT_PREFIX.len()..].trim();
        let rest: Vec<&str> = lines.collect();
        let body_tpl = rest.join("\n");
        RenderedEmail {
            subject: substitute(subject_tpl, lookup),
            body: substitute(body_tpl.trim_start(), lookup),
        }
    } else {
        RenderedEmail {
            subject: format!("Hello {} — Opportunity to connect", row.value_or_empty("Name")),
            body: substitute(template, lookup),
        }
    }
}

/// Política de defaults: los campos comunes valen "" en silencio, el resto
/// también vale "" pero deja un warning.
fn lookup_field(row: &ContactRecord, key: &str) -> String {
    match row.get(key) {
        Some(v) => v.to_string(),
        None => {
            if !SILENT_DEFAULT_FIELDS.contains(&key) {
                log::warn!(
                    "Placeholder '{}' no existe en la fila; se reemplaza por cadena vacía",
                    key
                );
            }
            String::new()
        }
    }
}

fn starts_with_ignore_case(line: &str, prefix: &str) -> bool {
    line.get(..prefix.len())
        .map(|head| head.eq_ignore_ascii_case(prefix))
        .unwrap_or(false)
}

/// Reemplaza cada `{clave}` usando `lookup`. `{{` y `}}` son llaves literales;
/// una `{` sin cierre queda tal cual.
pub fn substitute<F>(template: &str, lookup: F) -> String
where
    F: Fn(&str) -> String,
{
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(pos) = rest.find(&['{', '}'][..]) {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];

        if tail.starts_with("{{") {
            out.push('{');
            rest = &tail[2..];
        } else if tail.starts_with("}}") {
            out.push('}');
            rest = &tail[2..];
        } else if tail.starts_with('}') {
            out.push('}');
            rest = &tail[1..];
        } else {
            match tail[1..].find(&['{', '}'][..]) {
                Some(end) if tail.as_bytes()[1 + end] == b'}' => {
                    let key = &tail[1..1 + end];
                    out.push_str(&lookup(key.trim()));
                    rest = &tail[end + 2..];
                }
                _ => {
                    // `{` sin cierre
                    out.push('{');
                    rest = &tail[1..];
                }
            }
        }
    }
    out.push_str(rest);
    out
}
