//! Post generation

use std::fs;
use std::path::Path;

use tera::Context;

use super::{ItemFailure, RenderContext};
use crate::content::{now_string, FrontMatter, Post};
use crate::error::{Error, Result};
use crate::helpers::write_atomic;

/// What happened to a single post source
#[derive(Debug)]
pub enum PostOutcome {
    /// The HTML file was rendered and written
    Written(Post),
    /// The destination already existed and was left untouched
    Existing(Post),
    /// The entry was a directory
    SkippedDirectory,
}

/// Result of the posts stage
#[derive(Debug, Default)]
pub struct PostsOutcome {
    /// Built posts, in directory-listing order
    pub posts: Vec<Post>,
    pub written: usize,
    pub existing: usize,
    pub failures: Vec<ItemFailure>,
}

/// Build one post and write it unless its output file already exists
pub fn build_post(source: &Path, ctx: &RenderContext, destination: &Path) -> Result<PostOutcome> {
    if source.is_dir() {
        tracing::warn!("Entry {:?} is a directory, skipping", source);
        return Ok(PostOutcome::SkippedDirectory);
    }

    tracing::info!("Processing {:?}", source);

    let raw = fs::read_to_string(source).map_err(|e| Error::io(source, e))?;
    let (fm, body) = FrontMatter::parse(&raw)?;
    let content = ctx.markdown.render(&body);

    let mut post = Post::from_front_matter(fm, content, source.to_path_buf(), now_string);
    let file_name = post.file_name();
    let output_path = destination.join(&file_name);
    post.link = Some(file_name);

    if output_path.exists() {
        tracing::info!(
            "Post {:?} already exists, delete it manually to regenerate",
            output_path
        );
        return Ok(PostOutcome::Existing(post));
    }

    let context = Context::from_serialize(&post)?;
    let html = ctx.templates.render(&ctx.config.templates.post, &context)?;
    write_atomic(&output_path, &html)?;
    tracing::info!("Generated post {:?}", output_path);

    Ok(PostOutcome::Written(post))
}

/// Build every post in `posts_dir`.
///
/// A post that fails is logged and recorded; the remaining posts are still
/// processed.
pub fn generate_posts(
    posts_dir: &Path,
    ctx: &RenderContext,
    destination: &Path,
) -> Result<PostsOutcome> {
    if !posts_dir.is_dir() {
        return Err(Error::Configuration(format!(
            "posts folder {:?} not found",
            posts_dir
        )));
    }

    let mut outcome = PostsOutcome::default();
    let entries = fs::read_dir(posts_dir).map_err(|e| Error::io(posts_dir, e))?;

    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!("Failed to list {:?}: {}", posts_dir, e);
                outcome
                    .failures
                    .push(ItemFailure::new(posts_dir, Error::io(posts_dir, e)));
                continue;
            }
        };

        let path = entry.path();
        if entry.file_name().to_string_lossy().starts_with('.') {
            tracing::warn!("Entry {:?} is hidden, skipping", path);
            continue;
        }

        match build_post(&path, ctx, destination) {
            Ok(PostOutcome::Written(post)) => {
                outcome.written += 1;
                outcome.posts.push(post);
            }
            Ok(PostOutcome::Existing(post)) => {
                outcome.existing += 1;
                outcome.posts.push(post);
            }
            Ok(PostOutcome::SkippedDirectory) => {}
            Err(e) => {
                tracing::warn!("Failed to build post {:?}: {}", path, e);
                outcome.failures.push(ItemFailure::new(&path, e));
            }
        }
    }

    Ok(outcome)
}
