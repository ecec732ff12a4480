//! Content module - front matter, highlighting, Markdown and the Post model

mod frontmatter;
mod highlight;
mod markdown;
mod post;

pub use frontmatter::FrontMatter;
pub use highlight::{CodeMarkerPreprocessor, Highlighter};
pub use markdown::{MarkdownRenderer, Preprocessor};
pub use post::{now_string, Post, DATE_FORMAT};
