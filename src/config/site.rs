//! Site configuration (_config.yml)

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};

/// Main site configuration
///
/// Every field has a default matching the conventional layout, so a site
/// without `_config.yml` builds from `posts/`, `pages/`, `static/` and
/// `template/`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Directory
    pub posts_dir: String,
    pub pages_dir: String,
    pub static_dir: String,
    pub template_dir: String,

    // Templates
    #[serde(default)]
    pub templates: TemplatesConfig,

    #[serde(default)]
    pub highlight: HighlightConfig,

    #[serde(default)]
    pub feed: FeedConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            posts_dir: "posts".to_string(),
            pages_dir: "pages".to_string(),
            static_dir: "static".to_string(),
            template_dir: "template".to_string(),
            templates: TemplatesConfig::default(),
            highlight: HighlightConfig::default(),
            feed: FeedConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(&content)
            .map_err(|e| Error::Configuration(format!("invalid {:?}: {}", path, e)))
    }
}

/// Names of the shared templates
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplatesConfig {
    pub post: String,
    pub index: String,
}

impl Default for TemplatesConfig {
    fn default() -> Self {
        Self {
            post: "post.html".to_string(),
            index: "index.html".to_string(),
        }
    }
}

/// Syntax highlighting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    /// Name of a syntect default theme
    pub theme: String,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            theme: "InspiredGitHub".to_string(),
        }
    }
}

/// Atom feed configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    pub enabled: bool,
    pub template: String,
    pub output: String,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            template: "feedtemplate.xml".to_string(),
            output: "feed.xml".to_string(),
        }
    }
}
