//! Markdown rendering with syntax highlighting

use pulldown_cmark::{html, CodeBlockKind, CowStr, Event, Options, Parser, Tag, TagEnd};
use std::sync::Arc;

use super::highlight::{CodeMarkerPreprocessor, Highlighter};
use crate::helpers::escape_html;

/// A text transform applied to the Markdown source before block parsing
pub trait Preprocessor {
    fn run(&self, text: &str) -> String;
}

/// Markdown renderer with syntax highlighting
pub struct MarkdownRenderer {
    highlighter: Arc<Highlighter>,
    preprocessors: Vec<Box<dyn Preprocessor>>,
}

impl MarkdownRenderer {
    /// Create a renderer whose first preprocessor expands `[code:lang]` regions
    pub fn new(highlighter: Highlighter) -> Self {
        let highlighter = Arc::new(highlighter);
        let code_markers = CodeMarkerPreprocessor::new(Arc::clone(&highlighter));
        Self {
            highlighter,
            preprocessors: vec![Box::new(code_markers)],
        }
    }

    /// Append a preprocessor; preprocessors run in insertion order
    pub fn add_preprocessor<P: Preprocessor + 'static>(&mut self, preprocessor: P) {
        self.preprocessors.push(Box::new(preprocessor));
    }

    /// Render markdown to HTML
    pub fn render(&self, markdown: &str) -> String {
        let source = self
            .preprocessors
            .iter()
            .fold(markdown.to_string(), |text, p| p.run(&text));

        let options = Options::ENABLE_TABLES
            | Options::ENABLE_FOOTNOTES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_TASKLISTS;
        let parser = Parser::new_ext(&source, options);

        let mut events: Vec<Event> = Vec::new();
        // (language, collected text) while inside a code block
        let mut code_block: Option<(String, String)> = None;

        for event in parser {
            match event {
                Event::Start(Tag::CodeBlock(kind)) => {
                    let lang = match kind {
                        CodeBlockKind::Fenced(info) => {
                            info.split_whitespace().next().unwrap_or("").to_string()
                        }
                        CodeBlockKind::Indented => String::new(),
                    };
                    code_block = Some((lang, String::new()));
                }
                Event::End(TagEnd::CodeBlock) => {
                    if let Some((lang, code)) = code_block.take() {
                        let html = if lang.is_empty() {
                            format!("<pre><code>{}</code></pre>\n", escape_html(&code))
                        } else {
                            format!("{}\n", self.highlighter.highlight(&code, &lang))
                        };
                        events.push(Event::Html(CowStr::from(html)));
                    }
                }
                Event::Text(text) => match code_block.as_mut() {
                    Some((_, code)) => code.push_str(&text),
                    None => events.push(Event::Text(text)),
                },
                _ => events.push(event),
            }
        }

        let mut html_output = String::new();
        html::push_html(&mut html_output, events.into_iter());
        html_output
    }
}
