use std::fmt;

use crate::error::{Error, Result};
use crate::parser;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineKind {
    Blank,
    Comment,
    Header,
    Pair,
}

/// The value of a key-value line.
///
/// The literal tokens `true`, `false` and `null` are read as [`Value::Bool`] and [`Value::Null`];
/// a key without any `=` is the flag [`Value::Bool(true)`](Value::Bool), while `key=` holds an
/// empty string. Everything else, numbers included, stays a string.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Value {
    Str(String),
    Bool(bool),
    Null,
}

impl Value {
    pub(crate) fn coerce(text: String) -> Self {
        match text.as_str() {
            "true" => Self::Bool(true),
            "false" => Self::Bool(false),
            "null" => Self::Null,
            _ => Self::Str(text),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            Self::Bool(_) | Self::Null => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) => f.write_str(s),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Null => f.write_str("null"),
        }
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Str(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(value.to_owned())
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

/// One physical line of an INI document.
///
/// The raw text is the source of truth. Assigning the text re-parses every structured field;
/// assigning a structured field rebuilds the text and parses it again, so the two never drift.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    text: String,
    kind: LineKind,
    key: Option<String>,
    value: Option<Value>,
    comment: String,
}

impl Line {
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        let mut line = Self {
            text: text.into(),
            kind: LineKind::Blank,
            key: None,
            value: None,
            comment: String::new(),
        };
        line.reparse();
        line
    }

    #[must_use]
    pub fn blank() -> Self {
        Self::new(String::new())
    }

    /// Builds a key-value line, escaping the key and value as needed.
    #[must_use]
    pub fn pair(key: &str, value: impl Into<Value>) -> Self {
        Self::new(format!(
            "{}={}",
            parser::escape(key),
            parser::escape(&value.into().to_string())
        ))
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn kind(&self) -> LineKind {
        self.kind
    }

    #[must_use]
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    #[must_use]
    pub fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    /// The trailing comment, or an empty string.
    #[must_use]
    pub fn comment(&self) -> &str {
        &self.comment
    }

    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.kind == LineKind::Blank
    }

    #[must_use]
    pub fn is_comment(&self) -> bool {
        self.kind == LineKind::Comment
    }

    #[must_use]
    pub fn is_header(&self) -> bool {
        self.kind == LineKind::Header
    }

    #[must_use]
    pub fn is_pair(&self) -> bool {
        self.kind == LineKind::Pair
    }

    pub fn set_text(&mut self, text: impl Into<String>) -> &mut Self {
        self.text = text.into();
        self.reparse();
        self
    }

    /// # Errors
    ///
    /// Returns [`Error::InvalidOperation`] unless this is a key-value line.
    pub fn set_key(&mut self, key: impl Into<String>) -> Result<&mut Self> {
        if !self.is_pair() {
            return Err(Error::InvalidOperation { field: "key" });
        }

        self.key = Some(key.into());
        self.rebuild();
        Ok(self)
    }

    /// # Errors
    ///
    /// Returns [`Error::InvalidOperation`] unless this is a key-value line.
    pub fn set_value(&mut self, value: impl Into<Value>) -> Result<&mut Self> {
        if !self.is_pair() {
            return Err(Error::InvalidOperation { field: "value" });
        }

        self.assign_value(value.into());
        Ok(self)
    }

    /// Sets the trailing comment; an empty comment removes it.
    ///
    /// On non-pair lines the comment segment is replaced in place, or appended when there is
    /// none, so a blank line that gains a comment becomes a comment line.
    pub fn set_comment(&mut self, comment: impl Into<String>) -> &mut Self {
        self.comment = comment.into();
        self.rebuild();
        self
    }

    pub(crate) fn assign_value(&mut self, value: Value) {
        debug_assert!(self.is_pair(), "values only live on pair lines");
        self.value = Some(value);
        self.rebuild();
    }

    fn reparse(&mut self) {
        self.kind = parser::classify(&self.text);
        self.key = None;
        self.value = None;
        self.comment.clear();

        match self.kind {
            LineKind::Blank => {}
            LineKind::Comment | LineKind::Header => {
                if let Some(marker) = parser::comment_marker(&self.text, self.kind) {
                    self.comment = parser::comment_body(&self.text, marker);
                }
            }
            LineKind::Pair => {
                let pair = parser::parse_pair(&self.text);
                self.key = Some(pair.key);
                self.value = Some(pair.value);
                self.comment = pair.comment;
            }
        }
    }

    fn rebuild(&mut self) {
        if self.is_pair() {
            let key = self.key.as_deref().unwrap_or_default();
            let value = self.value.as_ref().map(ToString::to_string).unwrap_or_default();

            let mut text = format!("{}={}", parser::escape(key), parser::escape(&value));
            if !self.comment.is_empty() {
                text.push_str(" ; ");
                text.push_str(&self.comment);
            }
            self.text = text;
        } else {
            let marker = parser::comment_marker(&self.text, self.kind);
            match (marker, self.comment.is_empty()) {
                (None, true) => return,
                (None, false) => {
                    self.text = format!("{} ; {}", self.text, self.comment);
                }
                (Some(marker), true) => self.text.truncate(self.text[..marker].trim_end().len()),
                (Some(marker), false) => {
                    self.text.truncate(marker);
                    self.text.push_str("; ");
                    self.text.push_str(&self.comment);
                }
            }
        }

        self.reparse();
    }
}

impl Default for Line {
    fn default() -> Self {
        Self::blank()
    }
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl TryFrom<&[u8]> for Line {
    type Error = Error;

    fn try_from(bytes: &[u8]) -> Result<Self> {
        crate::decode_text(bytes).map(Self::new)
    }
}
