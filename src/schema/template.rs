//! Completion summary rendering using Tera templates

use chrono::{DateTime, Utc};
use rust_embed::Embed;
use std::path::Path;
use tera::Tera;
use thiserror::Error;

use crate::core::record::Record;

#[derive(Embed)]
#[folder = "templates/"]
struct EmbeddedTemplates;

const SUMMARY_TEMPLATE: &str = "summary.txt.tera";
const CUSTOM_TEMPLATE: &str = "custom-summary.txt";

/// Shown instead of the password when masking is on
pub const PASSWORD_MASK: &str = "********";

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Template not found: {0}")]
    NotFound(String),

    #[error("Template rendering error: {0}")]
    RenderError(String),
}

/// Values available to the summary template
#[derive(Debug, Clone)]
pub struct SummaryContext<'a> {
    pub record: &'a Record,
    pub submitted_at: Option<DateTime<Utc>>,
    pub mask_password: bool,
}

impl<'a> SummaryContext<'a> {
    pub fn new(record: &'a Record) -> Self {
        Self {
            record,
            submitted_at: None,
            mask_password: true,
        }
    }

    pub fn submitted_at(mut self, at: Option<DateTime<Utc>>) -> Self {
        self.submitted_at = at;
        self
    }

    pub fn mask_password(mut self, mask: bool) -> Self {
        self.mask_password = mask;
        self
    }

    fn password(&self) -> &str {
        if self.mask_password {
            PASSWORD_MASK
        } else {
            &self.record.password
        }
    }

    fn submitted_at_display(&self) -> String {
        self.submitted_at
            .map(|at| at.format("%Y-%m-%d %H:%M:%S UTC").to_string())
            .unwrap_or_default()
    }
}

/// Renders the post-submission summary
pub struct SummaryRenderer {
    tera: Tera,
    template: &'static str,
}

impl SummaryRenderer {
    /// Create a renderer with the embedded summary template
    pub fn new() -> Result<Self, TemplateError> {
        let mut tera = Tera::default();

        for file in EmbeddedTemplates::iter() {
            let filename = file.as_ref();
            if let Some(content) = EmbeddedTemplates::get(filename) {
                if let Ok(template_str) = std::str::from_utf8(&content.data) {
                    tera.add_raw_template(filename, template_str)
                        .map_err(|e| TemplateError::RenderError(e.to_string()))?;
                }
            }
        }

        Ok(Self {
            tera,
            template: SUMMARY_TEMPLATE,
        })
    }

    /// Create a renderer that uses a user-supplied template file
    pub fn from_file(path: &Path) -> Result<Self, TemplateError> {
        let source = std::fs::read_to_string(path)
            .map_err(|_| TemplateError::NotFound(path.display().to_string()))?;
        Self::from_source(&source)
    }

    /// Create a renderer from template source text
    pub fn from_source(source: &str) -> Result<Self, TemplateError> {
        let mut tera = Tera::default();
        tera.add_raw_template(CUSTOM_TEMPLATE, source)
            .map_err(|e| TemplateError::RenderError(e.to_string()))?;
        Ok(Self {
            tera,
            template: CUSTOM_TEMPLATE,
        })
    }

    /// Render the summary for a submitted record
    pub fn render(&self, ctx: &SummaryContext) -> Result<String, TemplateError> {
        let mut context = tera::Context::new();
        context.insert("firstname", &ctx.record.firstname);
        context.insert("lastname", &ctx.record.lastname);
        context.insert("email", &ctx.record.email);
        context.insert("phone", &ctx.record.phone);
        context.insert("country", &ctx.record.country);
        context.insert("password", ctx.password());
        context.insert("submitted_at", &ctx.submitted_at_display());

        if self.tera.get_template_names().any(|n| n == self.template) {
            self.tera
                .render(self.template, &context)
                .map_err(|e| TemplateError::RenderError(e.to_string()))
        } else {
            // Hardcoded fallback template
            Ok(self.hardcoded_summary(ctx))
        }
    }

    fn hardcoded_summary(&self, ctx: &SummaryContext) -> String {
        let record = ctx.record;
        let mut out = format!(
            "Welcome, {} {}!\nEmail: {}\nPhone: {}\nCountry: {}\nPassword: {}\n",
            record.firstname,
            record.lastname,
            record.email,
            record.phone,
            record.country,
            ctx.password()
        );
        if ctx.submitted_at.is_some() {
            out.push_str(&format!("Submitted: {}\n", ctx.submitted_at_display()));
        }
        out
    }
}
