//! Atom feed generation

use std::path::{Path, PathBuf};

use chrono::Local;
use tera::Context;

use super::RenderContext;
use crate::content::Post;
use crate::error::Result;
use crate::helpers::write_atomic;

/// Render the feed template with every post, most recent first.
///
/// Returns `None` when the site has no feed template.
pub fn build_feed(posts: &[Post], ctx: &RenderContext, destination: &Path) -> Result<Option<PathBuf>> {
    let feed = &ctx.config.feed;
    if !ctx.templates.has_template(&feed.template) {
        tracing::info!("No feed template {:?}, skipping feed", feed.template);
        return Ok(None);
    }

    let mut context = Context::new();
    context.insert("items", posts);
    context.insert("updated", &Local::now().to_rfc3339());

    let xml = ctx.templates.render(&feed.template, &context)?;
    let output_path = destination.join(&feed.output);
    write_atomic(&output_path, &xml)?;
    tracing::info!("Generated atom feed {:?}", output_path);

    Ok(Some(output_path))
}
