//! Template engine for the HTML pages the service serves
//!
//! Templates are embedded at compile time and rendered through Tera with
//! auto-escaping on for `.html` templates, so city names taken from
//! configuration or query strings never reach the page unescaped.
//!
//! # Example
//!
//! ```rust,ignore
//! use infrastructure::templates::{StatusRow, TemplateEngine};
//!
//! let engine = TemplateEngine::new()?;
//! let html = engine.render_status(&[StatusRow::new("Paris", fetched_at)])?;
//! ```

use std::sync::Arc;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use tera::{Context, Tera};
use thiserror::Error;

/// Template name of the status page
pub const STATUS_TEMPLATE: &str = "status.html";

/// Error type for template operations
#[derive(Debug, Error)]
pub enum TemplateError {
    /// Template not found
    #[error("Template not found: {0}")]
    NotFound(String),

    /// Template rendering failed
    #[error("Template rendering failed: {0}")]
    Render(String),

    /// Template compilation failed
    #[error("Template compilation failed: {0}")]
    Compile(String),
}

impl From<tera::Error> for TemplateError {
    fn from(e: tera::Error) -> Self {
        match e.kind {
            tera::ErrorKind::TemplateNotFound(name) => Self::NotFound(name),
            _ => Self::Render(e.to_string()),
        }
    }
}

/// One line of the status page
#[derive(Debug, Clone, Serialize)]
pub struct StatusRow {
    /// City key
    pub city: String,
    /// Last successful fetch, RFC 3339 with second precision
    pub fetched_at: String,
}

impl StatusRow {
    /// Row for a city and its last successful fetch
    pub fn new(city: impl Into<String>, fetched_at: DateTime<Utc>) -> Self {
        Self {
            city: city.into(),
            fetched_at: fetched_at.to_rfc3339_opts(SecondsFormat::Secs, true),
        }
    }
}

mod embedded {
    pub const STATUS_PAGE: &str = "<html><head><title>Status</title></head><body>\
<h1>Service Status</h1>\
<ul>{% for row in rows %}<li>{{ row.city }}: {{ row.fetched_at }}</li>{% endfor %}</ul>\
</body></html>";
}

/// Template engine using Tera
#[derive(Clone)]
pub struct TemplateEngine {
    tera: Arc<Tera>,
}

impl std::fmt::Debug for TemplateEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TemplateEngine").finish_non_exhaustive()
    }
}

impl TemplateEngine {
    /// Compile the embedded templates
    pub fn new() -> Result<Self, TemplateError> {
        let mut tera = Tera::default();
        tera.autoescape_on(vec![".html", ".htm", ".xml"]);
        tera.add_raw_template(STATUS_TEMPLATE, embedded::STATUS_PAGE)
            .map_err(|e| TemplateError::Compile(e.to_string()))?;

        Ok(Self {
            tera: Arc::new(tera),
        })
    }

    /// Render the status page; rows are listed in the given order
    pub fn render_status(&self, rows: &[StatusRow]) -> Result<String, TemplateError> {
        let mut context = Context::new();
        context.insert("rows", rows);
        self.tera
            .render(STATUS_TEMPLATE, &context)
            .map_err(TemplateError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn embedded_templates_compile() {
        assert!(TemplateEngine::new().is_ok());
    }

    #[test]
    fn status_rows_render_in_order() {
        let engine = TemplateEngine::new().unwrap();
        let html = engine
            .render_status(&[
                StatusRow::new("Berlin", Utc.with_ymd_and_hms(2024, 1, 15, 8, 30, 0).unwrap()),
                StatusRow::new("Paris", Utc.with_ymd_and_hms(2024, 1, 15, 9, 0, 0).unwrap()),
            ])
            .unwrap();

        let berlin = html.find("<li>Berlin: 2024-01-15T08:30:00Z</li>").unwrap();
        let paris = html.find("<li>Paris: 2024-01-15T09:00:00Z</li>").unwrap();
        assert!(berlin < paris);
    }

    #[test]
    fn city_names_are_escaped() {
        let engine = TemplateEngine::new().unwrap();
        let html = engine
            .render_status(&[StatusRow::new("<b>Nice</b> & \"Co\"", Utc::now())])
            .unwrap();

        assert!(html.contains("&lt;b&gt;Nice&lt;&#x2F;b&gt; &amp; &quot;Co&quot;"));
        assert!(!html.contains("<b>"));
    }

    #[test]
    fn empty_status_page() {
        let html = TemplateEngine::new().unwrap().render_status(&[]).unwrap();
        assert!(html.starts_with("<html>"));
        assert!(html.contains("<ul></ul>"));
    }
}
