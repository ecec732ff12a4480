//! Template rendering with Tera
//!
//! Templates are loaded from an ordered list of search directories. A name
//! found in an earlier directory shadows the same name in later ones, so a
//! page in `pages/` can extend `base.html` from `template/`.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use tera::{Context, Tera};
use walkdir::WalkDir;

use crate::error::{Error, Result};
use crate::helpers::{strip_html, truncate_chars};

/// Template renderer over a set of search directories
pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    /// Load every file under `dirs` as a template named by its relative path
    pub fn from_dirs<P: AsRef<Path>>(dirs: &[P]) -> Result<Self> {
        let mut tera = Tera::default();

        // Content is already HTML; nothing may be escaped twice
        tera.autoescape_on(vec![]);

        let mut seen = HashSet::new();
        let mut files: Vec<(PathBuf, Option<String>)> = Vec::new();

        for dir in dirs {
            let dir = dir.as_ref();
            if !dir.is_dir() {
                tracing::debug!("Template directory {:?} not found, skipping", dir);
                continue;
            }

            for entry in WalkDir::new(dir).follow_links(true).sort_by_file_name() {
                let entry = entry.map_err(|e| {
                    Error::Configuration(format!("cannot read templates in {:?}: {}", dir, e))
                })?;
                if !entry.file_type().is_file() {
                    continue;
                }
                let Ok(relative) = entry.path().strip_prefix(dir) else {
                    continue;
                };
                let name = relative.to_string_lossy().replace('\\', "/");
                if seen.insert(name.clone()) {
                    tracing::debug!("Template {} -> {:?}", name, entry.path());
                    files.push((entry.path().to_path_buf(), Some(name)));
                }
            }
        }

        tera.add_template_files(files)?;

        // Register custom filters
        tera.register_filter("strip_html", strip_html_filter);
        tera.register_filter("truncate_chars", truncate_chars_filter);
        tera.register_filter("date_format", date_format_filter);

        Ok(Self { tera })
    }

    /// Whether a template with this name was loaded
    pub fn has_template(&self, name: &str) -> bool {
        self.tera.get_template_names().any(|n| n == name)
    }

    /// Render a template with given context
    pub fn render(&self, template_name: &str, context: &Context) -> Result<String> {
        Ok(self.tera.render(template_name, context)?)
    }
}

/// Tera filter: strip HTML tags
fn strip_html_filter(
    value: &tera::Value,
    _args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = tera::try_get_value!("strip_html", "value", String, value);
    Ok(tera::Value::String(strip_html(&s)))
}

/// Tera filter: truncate by character count
fn truncate_chars_filter(
    value: &tera::Value,
    args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = tera::try_get_value!("truncate_chars", "value", String, value);
    let length = match args.get("length") {
        Some(val) => tera::try_get_value!("truncate_chars", "length", usize, val),
        None => 150,
    };
    let omission = match args.get("omission") {
        Some(val) => tera::try_get_value!("truncate_chars", "omission", String, val),
        None => " .....".to_string(),
    };

    Ok(tera::Value::String(truncate_chars(&s, length, &omission)))
}

/// Tera filter: reformat a post date string with a chrono format.
/// Dates that do not parse are returned as written.
fn date_format_filter(
    value: &tera::Value,
    args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = tera::try_get_value!("date_format", "value", String, value);
    let format = match args.get("format") {
        Some(val) => tera::try_get_value!("date_format", "format", String, val),
        None => "%B %d, %Y".to_string(),
    };

    let trimmed = s.trim();
    let formatted = chrono::NaiveDateTime::parse_from_str(trimmed, crate::content::DATE_FORMAT)
        .map(|dt| dt.format(&format).to_string())
        .or_else(|_| {
            chrono::NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
                .map(|d| d.format(&format).to_string())
        })
        .unwrap_or(s);

    Ok(tera::Value::String(formatted))
}
