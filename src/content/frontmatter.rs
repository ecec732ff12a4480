//! Front-matter parsing
//!
//! A post source is a header block of `Key: value` lines, a blank line, and
//! the Markdown body. Each header line is split at its first `:` and the
//! value is kept as written, so titles may contain `:` or `#`.

use serde::Deserialize;
use serde_yaml::{Mapping, Value};

use crate::error::{Error, Result};

/// Header block as written by the author, before validation
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawHeader {
    #[serde(rename = "Title", alias = "title")]
    title: Option<String>,
    #[serde(rename = "Slug", alias = "slug")]
    slug: Option<String>,
    #[serde(rename = "Author", alias = "author")]
    author: Option<String>,
    #[serde(rename = "Date", alias = "date")]
    date: Option<String>,
}

/// Validated front matter of a post
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontMatter {
    pub title: String,
    pub slug: String,
    pub author: String,
    /// Kept verbatim; `None` means the build time is used
    pub date: Option<String>,
}

impl FrontMatter {
    /// Parse a post source.
    /// Returns (front_matter, body)
    pub fn parse(source: &str) -> Result<(Self, String)> {
        let source = source.replace("\r\n", "\n");

        let (header, body) = source
            .split_once("\n\n")
            .ok_or_else(|| Error::MalformedPost {
                reason: "no blank line between header and body".to_string(),
            })?;

        let raw: RawHeader =
            serde_yaml::from_value(header_fields(header)?).map_err(|e| Error::MalformedPost {
                reason: format!("unreadable header: {}", e),
            })?;

        let title = required(raw.title, "Title")?;
        let slug = required(raw.slug, "Slug")?;
        let author = required(raw.author, "Author")?;
        validate_slug(&slug)?;

        let date = raw
            .date
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());
        if let Some(date) = &date {
            validate_date(date)?;
        }

        Ok((
            FrontMatter {
                title,
                slug,
                author,
                date,
            },
            body.to_string(),
        ))
    }
}

/// Collect `Key: value` lines into a mapping of string values
fn header_fields(header: &str) -> Result<Value> {
    let mut fields = Mapping::new();
    for (number, line) in header.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let (key, value) = line.split_once(':').ok_or_else(|| Error::MalformedPost {
            reason: format!("header line {} is not `Key: value`: {:?}", number + 1, line),
        })?;
        fields.insert(
            Value::String(key.trim().to_string()),
            Value::String(value.trim().to_string()),
        );
    }
    Ok(Value::Mapping(fields))
}

fn required(value: Option<String>, field: &'static str) -> Result<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or(Error::MissingField { field })
}

/// The slug becomes part of a file name inside the destination directory
fn validate_slug(slug: &str) -> Result<()> {
    if slug.contains('/') || slug.contains('\\') || slug.contains("..") {
        return Err(Error::InvalidField {
            field: "Slug",
            reason: format!("{:?} would leave the destination directory", slug),
        });
    }
    if slug::slugify(slug) != slug {
        tracing::warn!("Slug {:?} is not URL-safe, using it as written", slug);
    }
    Ok(())
}

/// The day part of the date is the first half of the output file name
fn validate_date(date: &str) -> Result<()> {
    let day: String = date.chars().take(10).collect();
    if day.contains('/') || day.contains('\\') || day.contains("..") {
        return Err(Error::InvalidField {
            field: "Date",
            reason: format!("{:?} would leave the destination directory", date),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_header() {
        let source = "Title: Hello World\nSlug: hello-world\nAuthor: Jane\nDate: 2021-03-01 10:30:00\n\nFirst paragraph.\n\nSecond.";
        let (fm, body) = FrontMatter::parse(source).unwrap();
        assert_eq!(fm.title, "Hello World");
        assert_eq!(fm.slug, "hello-world");
        assert_eq!(fm.author, "Jane");
        assert_eq!(fm.date.as_deref(), Some("2021-03-01 10:30:00"));
        assert_eq!(body, "First paragraph.\n\nSecond.");
    }

    #[test]
    fn test_date_is_optional() {
        let source = "Title: T\nSlug: t\nAuthor: A\n\nBody";
        let (fm, _) = FrontMatter::parse(source).unwrap();
        assert_eq!(fm.date, None);
    }

    #[test]
    fn test_numeric_values_become_strings() {
        let source = "Title: 1984\nSlug: 1984\nAuthor: true\n\nBody";
        let (fm, _) = FrontMatter::parse(source).unwrap();
        assert_eq!(fm.title, "1984");
        assert_eq!(fm.author, "true");
    }

    #[test]
    fn test_crlf_line_endings() {
        let source = "Title: T\r\nSlug: t\r\nAuthor: A\r\n\r\nBody\r\n";
        let (fm, body) = FrontMatter::parse(source).unwrap();
        assert_eq!(fm.slug, "t");
        assert_eq!(body, "Body\n");
    }

    #[test]
    fn test_no_separator_is_malformed() {
        let source = "Title: T\nSlug: t\nAuthor: A\nBody without blank line";
        assert!(matches!(
            FrontMatter::parse(source),
            Err(Error::MalformedPost { .. })
        ));
    }

    #[test]
    fn test_line_without_colon_is_malformed() {
        let source = "Title: T\nSlug t\nAuthor: A\n\nBody";
        assert!(matches!(
            FrontMatter::parse(source),
            Err(Error::MalformedPost { .. })
        ));
    }

    #[test]
    fn test_missing_slug() {
        let source = "Title: T\nAuthor: A\n\nBody";
        match FrontMatter::parse(source) {
            Err(Error::MissingField { field }) => assert_eq!(field, "Slug"),
            other => panic!("expected missing Slug, got {:?}", other),
        }
    }

    #[test]
    fn test_blank_author_counts_as_missing() {
        let source = "Title: T\nSlug: t\nAuthor:\n\nBody";
        match FrontMatter::parse(source) {
            Err(Error::MissingField { field }) => assert_eq!(field, "Author"),
            other => panic!("expected missing Author, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_header_reports_title_first() {
        match FrontMatter::parse("\n\nBody") {
            Err(Error::MissingField { field }) => assert_eq!(field, "Title"),
            other => panic!("expected missing Title, got {:?}", other),
        }
    }

    #[test]
    fn test_slug_cannot_escape_destination() {
        let source = "Title: T\nSlug: ../evil\nAuthor: A\n\nBody";
        assert!(matches!(
            FrontMatter::parse(source),
            Err(Error::InvalidField { field: "Slug", .. })
        ));
    }

    #[test]
    fn test_date_cannot_escape_destination() {
        let source = "Title: T\nSlug: x\nAuthor: A\nDate: ../../oops\n\nBody";
        assert!(matches!(
            FrontMatter::parse(source),
            Err(Error::InvalidField { field: "Date", .. })
        ));

        let source = "Title: T\nSlug: x\nAuthor: A\nDate: 2021/03/01\n\nBody";
        assert!(matches!(
            FrontMatter::parse(source),
            Err(Error::InvalidField { field: "Date", .. })
        ));
    }

    #[test]
    fn test_colon_in_value_is_kept() {
        let source = "Title: Rust: a tour\nSlug: rust-tour\nAuthor: A\nDate: 2021-03-01 10:30:00\n\nBody";
        let (fm, _) = FrontMatter::parse(source).unwrap();
        assert_eq!(fm.title, "Rust: a tour");
        assert_eq!(fm.date.as_deref(), Some("2021-03-01 10:30:00"));
    }

    #[test]
    fn test_hash_in_value_is_kept() {
        let source = "Title: C# tips #1\nSlug: c-sharp-tips\nAuthor: A\n\nBody";
        let (fm, _) = FrontMatter::parse(source).unwrap();
        assert_eq!(fm.title, "C# tips #1");
    }

    #[test]
    fn test_quotes_are_kept_verbatim() {
        let source = "Title: \"Quoted\" [draft]\nSlug: q\nAuthor: A\n\nBody";
        let (fm, _) = FrontMatter::parse(source).unwrap();
        assert_eq!(fm.title, "\"Quoted\" [draft]");
    }

    #[test]
    fn test_lowercase_keys_accepted() {
        let source = "title: T\nslug: t\nauthor: A\ndate: 2020-01-01\n\nBody";
        let (fm, _) = FrontMatter::parse(source).unwrap();
        assert_eq!(fm.date.as_deref(), Some("2020-01-01"));
    }
}
