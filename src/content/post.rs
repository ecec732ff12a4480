//! Post model

use serde::Serialize;
use std::path::PathBuf;

use super::FrontMatter;

/// Format of dates generated at build time
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A blog post
#[derive(Debug, Clone, Serialize)]
pub struct Post {
    /// Publication date, verbatim from front matter or the build time
    pub date: String,

    /// Post title
    pub title: String,

    /// Slug (URL-friendly name)
    pub slug: String,

    /// Post author
    pub author: String,

    /// Rendered HTML content
    pub content: String,

    /// Output file name, set once the file exists in the destination
    pub link: Option<String>,

    /// Source file path
    #[serde(skip)]
    pub source: PathBuf,
}

impl Post {
    /// Assemble a post from its front matter and rendered body.
    /// `now` supplies the date when the front matter has none.
    pub fn from_front_matter<F>(fm: FrontMatter, content: String, source: PathBuf, now: F) -> Self
    where
        F: FnOnce() -> String,
    {
        Self {
            date: fm.date.unwrap_or_else(now),
            title: fm.title,
            slug: fm.slug,
            author: fm.author,
            content,
            link: None,
            source,
        }
    }

    /// Output file name: `{first 10 chars of date}-{slug}.html`
    pub fn file_name(&self) -> String {
        let day: String = self.date.chars().take(10).collect();
        format!("{}-{}.html", day, self.slug)
    }
}

/// Current local time in [`DATE_FORMAT`]
pub fn now_string() -> String {
    chrono::Local::now().format(DATE_FORMAT).to_string()
}
