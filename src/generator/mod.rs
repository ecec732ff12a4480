//! Generator module - turns a site directory into HTML using Tera templates
//!
//! A run goes through up to five stages in a fixed order: pages, static
//! assets, posts, index and feed. A failing stage is recorded in the
//! [`GenerationReport`] and the run moves on; index and feed only run when the
//! posts stage produced a collection.

mod assets;
mod feed;
mod index;
mod pages;
mod posts;

use std::fmt;
use std::path::{Path, PathBuf};

use crate::config::SiteConfig;
use crate::content::{Highlighter, MarkdownRenderer, Post};
use crate::error::{Error, Result};
use crate::templates::TemplateRenderer;
use crate::Site;

pub use assets::{copy_static, AssetReport};
pub use feed::build_feed;
pub use index::{build_index, sort_posts, IndexOutcome};
pub use pages::{generate_pages, PagesOutcome};
pub use posts::{build_post, generate_posts, PostOutcome, PostsOutcome};

/// Everything needed to render posts, the index and the feed.
/// Built once per run and shared by reference.
pub struct RenderContext {
    pub config: SiteConfig,
    pub templates: TemplateRenderer,
    pub markdown: MarkdownRenderer,
}

impl RenderContext {
    pub fn new(site: &Site) -> Result<Self> {
        let templates = TemplateRenderer::from_dirs(&[&site.template_dir])?;
        let highlighter = Highlighter::new(&site.config.highlight.theme)?;

        Ok(Self {
            config: site.config.clone(),
            templates,
            markdown: MarkdownRenderer::new(highlighter),
        })
    }
}

/// Which stages to run besides posts, index and feed
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    pub destination: PathBuf,
    pub pages: bool,
    pub static_assets: bool,
}

impl GenerateOptions {
    pub fn new<P: AsRef<Path>>(destination: P) -> Self {
        Self {
            destination: destination.as_ref().to_path_buf(),
            pages: false,
            static_assets: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Pages,
    Static,
    Posts,
    Index,
    Feed,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Pages => "pages",
            Stage::Static => "static",
            Stage::Posts => "posts",
            Stage::Index => "index",
            Stage::Feed => "feed",
        };
        f.write_str(name)
    }
}

/// A post, page or directory entry that could not be processed
#[derive(Debug)]
pub struct ItemFailure {
    pub path: PathBuf,
    pub error: Error,
}

impl ItemFailure {
    pub fn new(path: &Path, error: Error) -> Self {
        Self {
            path: path.to_path_buf(),
            error,
        }
    }
}

#[derive(Debug)]
pub struct StageFailure {
    pub stage: Stage,
    pub error: Error,
}

/// Outcome of one generation run
#[derive(Debug, Default)]
pub struct GenerationReport {
    /// Posts in directory-listing order
    pub posts: Vec<Post>,
    pub posts_written: usize,
    pub posts_existing: usize,
    pub post_failures: Vec<ItemFailure>,
    pub pages_written: usize,
    pub page_failures: Vec<ItemFailure>,
    pub assets: Option<AssetReport>,
    pub index: Option<IndexOutcome>,
    pub feed: Option<PathBuf>,
    pub stage_failures: Vec<StageFailure>,
}

impl GenerationReport {
    /// No stage failed
    pub fn is_success(&self) -> bool {
        self.stage_failures.is_empty()
    }

    /// Some individual post, page or asset failed
    pub fn is_degraded(&self) -> bool {
        !self.post_failures.is_empty()
            || !self.page_failures.is_empty()
            || self.assets.as_ref().is_some_and(|a| !a.is_clean())
    }

    fn stage_failed(&mut self, stage: Stage, error: Error) {
        tracing::error!("Stage {} aborted: {}", stage, error);
        self.stage_failures.push(StageFailure { stage, error });
    }
}

/// Static site generator
pub struct Generator {
    site: Site,
}

impl Generator {
    pub fn new(site: &Site) -> Self {
        Self { site: site.clone() }
    }

    /// Run every requested stage against `options.destination`
    pub fn generate(&self, options: &GenerateOptions) -> Result<GenerationReport> {
        let destination = options.destination.as_path();
        if !destination.is_dir() {
            return Err(Error::Configuration(format!(
                "destination folder {:?} does not exist, create it first",
                destination
            )));
        }

        let mut report = GenerationReport::default();

        if options.pages {
            match generate_pages(&self.site.pages_dir, &self.site.template_dir, destination) {
                Ok(outcome) => {
                    report.pages_written = outcome.written.len();
                    report.page_failures = outcome.failures;
                }
                Err(e) => report.stage_failed(Stage::Pages, e),
            }
        }

        if options.static_assets {
            match copy_static(&self.site.static_dir, destination) {
                Ok(assets) => report.assets = Some(assets),
                Err(e) => report.stage_failed(Stage::Static, e),
            }
        }

        let ctx = match RenderContext::new(&self.site) {
            Ok(ctx) => ctx,
            Err(e) => {
                report.stage_failed(Stage::Posts, e);
                return Ok(report);
            }
        };

        let outcome = match generate_posts(&self.site.posts_dir, &ctx, destination) {
            Ok(outcome) => outcome,
            Err(e) => {
                report.stage_failed(Stage::Posts, e);
                return Ok(report);
            }
        };

        report.posts_written = outcome.written;
        report.posts_existing = outcome.existing;
        report.post_failures = outcome.failures;
        let sorted = sort_posts(outcome.posts.clone());
        report.posts = outcome.posts;

        match build_index(sorted.clone(), &ctx, destination) {
            Ok(index) => report.index = Some(index),
            Err(e) => report.stage_failed(Stage::Index, e),
        }

        if self.site.config.feed.enabled {
            match build_feed(&sorted, &ctx, destination) {
                Ok(path) => report.feed = path,
                Err(e) => report.stage_failed(Stage::Feed, e),
            }
        }

        Ok(report)
    }
}
