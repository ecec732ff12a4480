//! Index page generation

use std::path::{Path, PathBuf};

use tera::Context;

use super::RenderContext;
use crate::content::Post;
use crate::error::Result;
use crate::helpers::write_atomic;

/// Markers splitting a post into teaser and remainder
const MORE_MARKERS: [&str; 2] = ["<!--more-->", "<!-- more -->"];

/// What the index stage did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexOutcome {
    Written(PathBuf),
    /// No posts were built, so there is no featured post to show
    SkippedEmpty,
}

/// Order posts most recent first.
///
/// Dates compare as written; equal dates fall back to the output file name so
/// the order does not depend on directory listing.
pub fn sort_posts(mut posts: Vec<Post>) -> Vec<Post> {
    posts.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.link.cmp(&b.link)));
    posts.reverse();
    posts
}

/// Cut the content at the first "more" marker and link to the full post
fn apply_read_more(post: &mut Post) {
    let cut = MORE_MARKERS
        .iter()
        .filter_map(|marker| post.content.find(marker))
        .min();

    if let Some(pos) = cut {
        post.content.truncate(pos);
        post.content.push_str(&format!(
            "<p><a href=\"{}\">Read more...</a></p>",
            post.link.as_deref().unwrap_or_default()
        ));
    }
}

/// Render `index.html` from posts already ordered by [`sort_posts`].
/// Always overwrites the previous index.
pub fn build_index(
    mut posts: Vec<Post>,
    ctx: &RenderContext,
    destination: &Path,
) -> Result<IndexOutcome> {
    if posts.is_empty() {
        tracing::warn!("No posts were built, skipping the index");
        return Ok(IndexOutcome::SkippedEmpty);
    }

    let mut first = posts.remove(0);
    apply_read_more(&mut first);

    let mut context = Context::new();
    context.insert("page", "index");
    context.insert("first", &first);
    context.insert("posts", &posts);

    let html = ctx.templates.render(&ctx.config.templates.index, &context)?;
    let output_path = destination.join("index.html");
    write_atomic(&output_path, &html)?;
    tracing::info!("Generated blog index {:?}", output_path);

    Ok(IndexOutcome::Written(output_path))
}
