//! inkpress: a small static blog generator
//!
//! Posts are Markdown files with a `Key: value` header, rendered through Tera
//! templates with syntect highlighting. Each run regenerates pages and the
//! index; a post is only written when its output file does not exist yet.

pub mod commands;
pub mod config;
pub mod content;
pub mod error;
pub mod generator;
pub mod helpers;
pub mod templates;

pub use error::{Error, Result};
pub use generator::{GenerateOptions, GenerationReport};

use std::path::{Path, PathBuf};

/// A site root and the directories resolved from its configuration
#[derive(Debug, Clone)]
pub struct Site {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Post sources
    pub posts_dir: PathBuf,
    /// Template-only pages
    pub pages_dir: PathBuf,
    /// Assets copied verbatim
    pub static_dir: PathBuf,
    /// Shared post, index and page templates
    pub template_dir: PathBuf,
}

impl Site {
    /// Create a site from a directory, reading `_config.yml` if present
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("_config.yml");

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };

        Ok(Self {
            posts_dir: base_dir.join(&config.posts_dir),
            pages_dir: base_dir.join(&config.pages_dir),
            static_dir: base_dir.join(&config.static_dir),
            template_dir: base_dir.join(&config.template_dir),
            config,
            base_dir,
        })
    }

    /// Generate the site into `options.destination`
    pub fn generate(&self, options: &GenerateOptions) -> Result<GenerationReport> {
        generator::Generator::new(self).generate(options)
    }
}
