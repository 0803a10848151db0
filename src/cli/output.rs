//! Output rendering for summaries, records and validation errors

use chrono::{DateTime, Utc};
use console::style;
use miette::{IntoDiagnostic, Result};
use serde::Serialize;

use crate::cli::OutputFormat;
use crate::core::field::Field;
use crate::core::record::Record;
use crate::core::Config;
use crate::schema::template::{SummaryContext, SummaryRenderer, PASSWORD_MASK};
use crate::schema::validator::FieldErrors;

/// Serializable view of a record with the password optionally masked
#[derive(Debug, Serialize)]
pub struct RecordView<'a> {
    pub firstname: &'a str,
    pub lastname: &'a str,
    pub email: &'a str,
    pub phone: &'a str,
    pub country: &'a str,
    pub password: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submitted_at: Option<DateTime<Utc>>,
}

impl<'a> RecordView<'a> {
    pub fn new(record: &'a Record, mask_password: bool) -> Self {
        Self {
            firstname: &record.firstname,
            lastname: &record.lastname,
            email: &record.email,
            phone: &record.phone,
            country: &record.country,
            password: if mask_password {
                PASSWORD_MASK
            } else {
                &record.password
            },
            submitted_at: None,
        }
    }

    pub fn submitted_at(mut self, at: Option<DateTime<Utc>>) -> Self {
        self.submitted_at = at;
        self
    }
}

/// Serialize any value as YAML or JSON
pub fn render_serialized<T: Serialize>(value: &T, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(value)
            .map(|s| s + "\n")
            .into_diagnostic(),
        _ => serde_yml::to_string(value).into_diagnostic(),
    }
}

/// Render the completion summary shown after a successful submit
pub fn render_summary(
    record: &Record,
    submitted_at: Option<DateTime<Utc>>,
    format: OutputFormat,
    config: &Config,
    reveal_password: bool,
) -> Result<String> {
    let mask = config.mask_password() && !reveal_password;

    if format.is_structured() {
        let view = RecordView::new(record, mask).submitted_at(submitted_at);
        return render_serialized(&view, format);
    }

    let renderer = match &config.summary_template {
        Some(path) => SummaryRenderer::from_file(path),
        None => SummaryRenderer::new(),
    }
    .map_err(|e| miette::miette!("{}", e))?;

    let ctx = SummaryContext::new(record)
        .submitted_at(submitted_at)
        .mask_password(mask);
    renderer.render(&ctx).map_err(|e| miette::miette!("{}", e))
}

/// Render a normalized record, one field per line in text mode
pub fn render_record(record: &Record, format: OutputFormat, mask_password: bool) -> Result<String> {
    let view = RecordView::new(record, mask_password);
    if format.is_structured() {
        return render_serialized(&view, format);
    }

    let mut out = String::new();
    for field in Field::all() {
        let value = if field.is_secret() {
            view.password
        } else {
            record.get(*field)
        };
        out.push_str(&format!("{:<10} {}\n", format!("{}:", field), value));
    }
    Ok(out)
}

/// Render field errors: a field-to-message map, or styled lines in text mode
pub fn render_field_errors(errors: &FieldErrors, format: OutputFormat) -> Result<String> {
    if format.is_structured() {
        return render_serialized(errors, format);
    }

    let mut out = String::new();
    for error in errors {
        out.push_str(&format!(
            "  {} {}: {}\n",
            style("✗").red(),
            style(error.field).bold(),
            error.message
        ));
    }
    Ok(out)
}
