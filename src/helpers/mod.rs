//! Helper functions shared by the content pipeline and templates

mod fs;
mod html;

pub use fs::*;
pub use html::*;
