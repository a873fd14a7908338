//! Document kinds and naming rules
//!
//! A document is a single file inside the store root. Its *kind* decides how it
//! is served:
//!
//! - **[`DocumentKind::PlainText`]**: raw bytes, `text/plain`
//! - **[`DocumentKind::Markdown`]**: rendered to HTML, `text/html;charset=utf-8`
//!
//! Kind detection is a substring match on the name, checked in that order:
//! a name containing `.txt` is plain text even if it also contains `.md`, and
//! `notes.txt.bak` is still plain text.

use std::borrow::Cow;
use std::sync::OnceLock;

use pulldown_cmark::{html, Options, Parser};
use regex::Regex;

pub const TEXT_CONTENT_TYPE: &str = "text/plain";
pub const HTML_CONTENT_TYPE: &str = "text/html;charset=utf-8";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    PlainText,
    Markdown,
}

impl DocumentKind {
    pub fn from_name(name: &str) -> Option<Self> {
        if name.contains(".txt") {
            Some(Self::PlainText)
        } else if name.contains(".md") {
            Some(Self::Markdown)
        } else {
            None
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            Self::PlainText => TEXT_CONTENT_TYPE,
            Self::Markdown => HTML_CONTENT_TYPE,
        }
    }
}

/// A document read back from the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub name: String,
    pub content: Vec<u8>,
    pub kind: Option<DocumentKind>,
}

impl Document {
    pub fn new(name: impl Into<String>, content: Vec<u8>) -> Self {
        let name = name.into();
        let kind = DocumentKind::from_name(&name);
        Self {
            name,
            content,
            kind,
        }
    }

    /// Stored bytes as text, with invalid UTF-8 replaced.
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.content)
    }

    /// Produce the payload served for this document.
    ///
    /// Documents without a known kind render to an empty HTML body.
    pub fn render(&self) -> Rendered {
        match self.kind {
            Some(DocumentKind::PlainText) => Rendered {
                content_type: TEXT_CONTENT_TYPE,
                body: self.content.clone(),
            },
            Some(DocumentKind::Markdown) => Rendered {
                content_type: HTML_CONTENT_TYPE,
                body: render_markdown(&self.text()).into_bytes(),
            },
            None => Rendered {
                content_type: HTML_CONTENT_TYPE,
                body: Vec::new(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub content_type: &'static str,
    pub body: Vec<u8>,
}

/// Converts markdown content to an HTML fragment
pub fn render_markdown(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);

    let parser = Parser::new_ext(markdown, options);
    let mut html_output = String::new();
    html::push_html(&mut html_output, parser);
    html_output
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NameError {
    #[error("A name is required.")]
    Required,
    // "extention" is matched verbatim by existing clients
    #[error("The name must include a file extention (e.g. .txt or .md).")]
    MissingExtension,
    #[error("A name may not contain path separators.")]
    PathSeparator,
}

fn extension_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    // ASCII word characters only
    PATTERN.get_or_init(|| {
        Regex::new(r"\.[A-Za-z0-9_]+$").expect("extension pattern must compile")
    })
}

/// True for a bare file name that stays inside the store root.
pub fn is_plain_file_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\', '\0'])
}

/// Validate a name submitted through the "new document" form.
///
/// Returns the trimmed name on success.
pub fn validate_new_name(name: &str) -> Result<&str, NameError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(NameError::Required);
    }
    if !is_plain_file_name(name) {
        return Err(NameError::PathSeparator);
    }
    if !extension_pattern().is_match(name) {
        return Err(NameError::MissingExtension);
    }
    Ok(name)
}
