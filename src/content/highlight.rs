//! Syntax highlighting for `[code:lang] ... [/code]` regions

use lazy_static::lazy_static;
use regex::{Captures, Regex};
use std::sync::Arc;
use syntect::easy::HighlightLines;
use syntect::highlighting::{Color, Theme, ThemeSet};
use syntect::html::{styled_line_to_highlighted_html, IncludeBackground};
use syntect::parsing::{SyntaxReference, SyntaxSet};
use syntect::util::LinesWithEndings;

use super::markdown::Preprocessor;
use crate::error::{Error, Result};
use crate::helpers::escape_html;

/// Theme used when the configured one does not exist
const FALLBACK_THEME: &str = "InspiredGitHub";

lazy_static! {
    // Non-greedy body, may span lines. The tag stops at `]` or a newline.
    static ref CODE_MARKER: Regex =
        Regex::new(r"(?s)\[code:([^\]\n]+)\](.+?)\[/code\]").unwrap();
}

/// Syntax highlighter producing inline-styled HTML
pub struct Highlighter {
    syntax_set: SyntaxSet,
    theme: Theme,
}

impl Highlighter {
    /// Create a highlighter using one of syntect's default themes
    pub fn new(theme_name: &str) -> Result<Self> {
        let mut themes = ThemeSet::load_defaults().themes;
        let theme = match themes.remove(theme_name) {
            Some(theme) => theme,
            None => {
                tracing::warn!(
                    "Unknown highlight theme {:?}, falling back to {}",
                    theme_name,
                    FALLBACK_THEME
                );
                themes.remove(FALLBACK_THEME).ok_or_else(|| {
                    Error::Configuration(format!("highlight theme {:?} not found", theme_name))
                })?
            }
        };

        Ok(Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme,
        })
    }

    /// Find a syntax for a language tag, plain text if unknown
    fn resolve(&self, lang: &str) -> &SyntaxReference {
        let lang = lang.trim();
        self.syntax_set
            .find_syntax_by_token(lang)
            .or_else(|| self.syntax_set.find_syntax_by_extension(lang))
            .unwrap_or_else(|| {
                tracing::debug!("No syntax for {:?}, using plain text", lang);
                self.syntax_set.find_syntax_plain_text()
            })
    }

    /// Highlight a code block
    pub fn highlight(&self, code: &str, lang: &str) -> String {
        let syntax = self.resolve(lang);
        let body = match self.styled_lines(code, syntax) {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!("Highlighting {:?} failed, emitting plain text: {}", lang, e);
                escape_html(code)
            }
        };

        let bg = self.theme.settings.background.unwrap_or(Color::WHITE);
        format!(
            r#"<pre class="highlight" style="background-color:#{:02x}{:02x}{:02x};"><code class="language-{}">{}</code></pre>"#,
            bg.r,
            bg.g,
            bg.b,
            escape_html(lang.trim()),
            body
        )
    }

    fn styled_lines(&self, code: &str, syntax: &SyntaxReference) -> Result<String> {
        let mut highlighter = HighlightLines::new(syntax, &self.theme);
        let mut html = String::with_capacity(code.len() * 2);
        for line in LinesWithEndings::from(code) {
            let regions = highlighter.highlight_line(line, &self.syntax_set)?;
            html.push_str(&styled_line_to_highlighted_html(
                &regions[..],
                IncludeBackground::No,
            )?);
        }
        Ok(html)
    }

    /// Replace every `[code:lang]...[/code]` region with highlighted HTML.
    ///
    /// Each fragment is surrounded by blank lines so Markdown reads it as an
    /// HTML block and leaves its contents alone.
    pub fn expand_code_markers(&self, text: &str) -> String {
        CODE_MARKER
            .replace_all(text, |caps: &Captures| {
                let code = &caps[2];
                let code = code
                    .strip_prefix("\r\n")
                    .or_else(|| code.strip_prefix('\n'))
                    .unwrap_or(code);
                format!("\n\n{}\n\n", self.highlight(code, &caps[1]))
            })
            .into_owned()
    }
}

/// Markdown preprocessor running [`Highlighter::expand_code_markers`]
pub struct CodeMarkerPreprocessor {
    highlighter: Arc<Highlighter>,
}

impl CodeMarkerPreprocessor {
    pub fn new(highlighter: Arc<Highlighter>) -> Self {
        Self { highlighter }
    }
}

impl Preprocessor for CodeMarkerPreprocessor {
    fn run(&self, text: &str) -> String {
        self.highlighter.expand_code_markers(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::helpers::strip_html;

    fn unescape(s: &str) -> String {
        s.replace("&lt;", "<")
            .replace("&gt;", ">")
            .replace("&quot;", "\"")
            .replace("&#39;", "'")
            .replace("&amp;", "&")
    }

    fn highlighter() -> Highlighter {
        Highlighter::new("InspiredGitHub").unwrap()
    }

    #[test]
    fn test_round_trip_preserves_code() {
        let code = "def f(x):\n    if x < 2 and x > -1:\n\n        return \"a & b\"\n    return '*_not md_*'\n";
        let html = highlighter().highlight(code, "python");
        assert!(html.contains("language-python"));
        assert_eq!(unescape(&strip_html(&html)), code);
    }

    #[test]
    fn test_unknown_language_falls_back_to_plain_text() {
        let html = highlighter().highlight("<b>bold & brave</b>\n", "no-such-language");
        assert!(html.contains("&lt;b&gt;bold &amp; brave&lt;/b&gt;"));
        assert_eq!(unescape(&strip_html(&html)), "<b>bold & brave</b>\n");
    }

    #[test]
    fn test_unknown_theme_falls_back() {
        let h = Highlighter::new("does-not-exist").unwrap();
        assert!(h.highlight("x", "rust").contains("<pre class=\"highlight\""));
    }

    #[test]
    fn test_expand_replaces_marker_region() {
        let text = "Intro\n[code:rust]\nfn main() {}\n[/code]\nOutro";
        let out = highlighter().expand_code_markers(text);
        assert!(out.starts_with("Intro\n\n\n<pre class=\"highlight\""));
        assert!(out.contains("language-rust"));
        assert!(out.ends_with("</code></pre>\n\n\nOutro"));
        assert!(!out.contains("[code:"));
        assert_eq!(
            unescape(&strip_html(&out)),
            "Intro\n\n\nfn main() {}\n\n\n\nOutro"
        );
    }

    #[test]
    fn test_expand_spans_blank_lines() {
        let text = "[code:python]\na = 1\n\n\nb = 2\n[/code]";
        let out = highlighter().expand_code_markers(text);
        assert_eq!(unescape(&strip_html(&out)).trim(), "a = 1\n\n\nb = 2");
    }

    #[test]
    fn test_expand_is_non_greedy() {
        let text = "[code:python]one[/code] middle [code:rust]two[/code]";
        let out = highlighter().expand_code_markers(text);
        assert_eq!(out.matches("<pre class=\"highlight\"").count(), 2);
        assert!(out.contains(" middle "));
    }

    #[test]
    fn test_nested_looking_markers() {
        let text = "[code:python]a [code:rust] b[/code] c[/code]";
        let out = highlighter().expand_code_markers(text);
        assert_eq!(out.matches("<pre class=\"highlight\"").count(), 1);
        assert!(out.contains("language-python"));
        assert!(out.ends_with(" c[/code]"));
        assert!(unescape(&strip_html(&out)).contains("a [code:rust] b"));
    }

    #[test]
    fn test_unterminated_marker_left_alone() {
        let text = "[code:python]never closed\n\nstill text";
        assert_eq!(highlighter().expand_code_markers(text), text);
    }

    #[test]
    fn test_long_unmatched_input_is_fast() {
        let text = "[code:x]".repeat(20_000);
        let start = std::time::Instant::now();
        let out = highlighter().expand_code_markers(&text);
        assert_eq!(out, text);
        assert!(start.elapsed() < std::time::Duration::from_secs(5));
    }
}
