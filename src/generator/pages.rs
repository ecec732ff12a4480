//! Static page generation

use std::fs;
use std::path::{Path, PathBuf};

use tera::Context;

use super::ItemFailure;
use crate::error::{Error, Result};
use crate::helpers::write_atomic;
use crate::templates::TemplateRenderer;

/// Result of the pages stage
#[derive(Debug, Default)]
pub struct PagesOutcome {
    pub written: Vec<PathBuf>,
    pub failures: Vec<ItemFailure>,
}

fn render_page(templates: &TemplateRenderer, name: &str, destination: &Path) -> Result<PathBuf> {
    let mut context = Context::new();
    context.insert("page", name);

    let html = templates.render(name, &context)?;
    let output_path = destination.join(name);
    write_atomic(&output_path, &html)?;
    Ok(output_path)
}

/// Render every file in `pages_dir` as a template of the same name.
///
/// Templates resolve from `pages_dir` first, then `template_dir`. Output is
/// always overwritten.
pub fn generate_pages(
    pages_dir: &Path,
    template_dir: &Path,
    destination: &Path,
) -> Result<PagesOutcome> {
    if !pages_dir.is_dir() {
        return Err(Error::Configuration(format!(
            "pages folder {:?} not found",
            pages_dir
        )));
    }

    let templates = TemplateRenderer::from_dirs(&[pages_dir, template_dir])?;
    let mut outcome = PagesOutcome::default();
    let entries = fs::read_dir(pages_dir).map_err(|e| Error::io(pages_dir, e))?;

    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                outcome
                    .failures
                    .push(ItemFailure::new(pages_dir, Error::io(pages_dir, e)));
                continue;
            }
        };

        let path = entry.path();
        if path.is_dir() {
            tracing::warn!("Entry {:?} is a directory, skipping", path);
            continue;
        }

        let name = entry.file_name().to_string_lossy().into_owned();
        match render_page(&templates, &name, destination) {
            Ok(output_path) => {
                tracing::info!("Generated page {:?}", output_path);
                outcome.written.push(output_path);
            }
            Err(e) => {
                tracing::warn!("Failed to generate page {:?}: {}", path, e);
                outcome.failures.push(ItemFailure::new(&path, e));
            }
        }
    }

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::test_support::Fixture;

    #[test]
    fn test_pages_rendered_and_overwritten() {
        let fx = Fixture::new();
        fs::write(
            fx.template_dir().join("base.html"),
            "<main>{% block body %}{% endblock body %}</main>",
        )
        .unwrap();
        fs::write(
            fx.pages_dir().join("about.html"),
            r#"{% extends "base.html" %}{% block body %}{{ page }}{% endblock body %}"#,
        )
        .unwrap();
        fs::write(fx.pages_dir().join("contact.html"), "contact: {{ page }}").unwrap();
        fs::write(fx.dest().join("about.html"), "stale").unwrap();

        let outcome = generate_pages(fx.pages_dir(), fx.template_dir(), fx.dest()).unwrap();
        assert_eq!(outcome.written.len(), 2);
        assert!(outcome.failures.is_empty());
        assert_eq!(
            fs::read_to_string(fx.dest().join("about.html")).unwrap(),
            "<main>about.html</main>"
        );
        assert_eq!(
            fs::read_to_string(fx.dest().join("contact.html")).unwrap(),
            "contact: contact.html"
        );
    }

    #[test]
    fn test_page_render_failure_is_isolated() {
        let fx = Fixture::new();
        fs::write(fx.pages_dir().join("broken.html"), "{{ missing_variable }}").unwrap();
        fs::write(fx.pages_dir().join("ok.html"), "ok").unwrap();
        fs::create_dir_all(fx.pages_dir().join("nested")).unwrap();

        let outcome = generate_pages(fx.pages_dir(), fx.template_dir(), fx.dest()).unwrap();
        assert_eq!(outcome.written, vec![fx.dest().join("ok.html")]);
        assert_eq!(outcome.failures.len(), 1);
        assert!(!fx.dest().join("broken.html").exists());
    }

    #[test]
    fn test_missing_pages_dir() {
        let fx = Fixture::new();
        fs::remove_dir_all(fx.pages_dir()).unwrap();
        assert!(matches!(
            generate_pages(fx.pages_dir(), fx.template_dir(), fx.dest()),
            Err(Error::Configuration(_))
        ));
    }
}
