//! Lossless reading and writing of INI documents.
//!
//! A [`Document`] keeps every physical line it was parsed from, so writing it back reproduces the
//! input byte for byte: comments, blank lines, quoting and key order included. Edits through the
//! accessors only rewrite the lines they touch.
//!
//! ```
//! use ini::{Document, StringifyOptions, Value};
//!
//! let text = "; settings\n[server]\nhost = \"example.org\" ; primary\nport=8080\n";
//! let mut document = Document::parse(text);
//! assert_eq!(document.to_string(), text);
//!
//! let server = document.section_mut("server").unwrap();
//! assert_eq!(server.value("host"), Some(&Value::from("example.org")));
//! server.set_value("port", "9090");
//!
//! let options = StringifyOptions {
//!     remove_comment_lines: true,
//!     ..StringifyOptions::default()
//! };
//! assert_eq!(
//!     document.stringify(&options),
//!     "[server]\nhost = \"example.org\" ; primary\nport=9090\n"
//! );
//! ```

#![warn(
    clippy::correctness,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::style,
    clippy::pedantic
)]

mod error;
mod line;
mod merge;
mod parser;
mod section;

use std::convert::Infallible;
use std::io::Read;
use std::str::FromStr;
use std::{fmt, iter};

use serde::{Deserialize, Serialize};

pub use crate::error::{Error, Result};
pub use crate::line::{Line, LineKind, Value};
pub use crate::section::Section;

/// Byte Order Mark (BOM) is used to signal the endianness of an encoding. The order `0xFF 0xFE`
/// strongly suggests that the encoding is using little-endian byte order.
///
/// <https://en.wikipedia.org/wiki/Byte_order_mark>
const BOM_LE: &[u8] = &[0xFF, 0xFE];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineBreak {
    #[default]
    Lf,
    CrLf,
}

impl LineBreak {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Lf => "\n",
            Self::CrLf => "\r\n",
        }
    }

    /// The first convention found in `text`, checking `\r\n` before `\n`.
    #[must_use]
    pub fn detect(text: &str) -> Option<Self> {
        if text.contains("\r\n") {
            Some(Self::CrLf)
        } else if text.contains('\n') {
            Some(Self::Lf)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ParseOptions {
    /// Splits on this line break instead of detecting one.
    pub line_break: Option<LineBreak>,
    /// Used when the text holds no line break at all.
    pub default_line_break: LineBreak,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StringifyOptions {
    pub remove_blank_lines: bool,
    /// Section headers are kept even when they carry a comment.
    pub remove_comment_lines: bool,
    /// Separates each section from the previous one with a blank line, unless it already ends
    /// with one.
    pub blank_line_before_section: bool,
}

/// A parsed INI document: the lines before the first header, then each section in order.
///
/// Section names need not be unique; lookups by name return the first match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    globals: Section,
    sections: Vec<Section>,
    line_break: LineBreak,
}

impl Document {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_line_break(line_break: LineBreak) -> Self {
        Self {
            line_break,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn parse(text: &str) -> Self {
        Self::parse_with(text, &ParseOptions::default())
    }

    #[must_use]
    pub fn parse_with(text: &str, options: &ParseOptions) -> Self {
        let line_break = options
            .line_break
            .or_else(|| LineBreak::detect(text))
            .unwrap_or(options.default_line_break);
        let mut document = Self::with_line_break(line_break);

        if text.is_empty() {
            return document;
        }

        let mut lines = 0_usize;
        for line in text.split(line_break.as_str()) {
            if parser::is_header(line) {
                document.add_section_line(line);
            } else {
                let section = document.sections.last_mut().unwrap_or(&mut document.globals);
                section.add_line(line);
            }
            lines += 1;
        }

        tracing::trace!(
            ?line_break,
            lines,
            sections = document.sections.len(),
            "parsed document"
        );

        document
    }

    /// Reads and parses a whole document.
    ///
    /// Input starting with a UTF-16 LE byte order mark is decoded as UTF-16; anything else must be
    /// UTF-8.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ReadFailure`] if reading fails and [`Error::InvalidInput`] if the data is
    /// not text.
    pub fn from_reader<R>(mut reader: R) -> Result<Self>
    where
        R: Read,
    {
        let mut buffer = Vec::with_capacity(4096);
        reader.read_to_end(&mut buffer)?;

        Self::try_from(buffer.as_slice())
    }

    #[must_use]
    pub fn line_break(&self) -> LineBreak {
        self.line_break
    }

    pub fn set_line_break(&mut self, line_break: LineBreak) {
        self.line_break = line_break;
    }

    #[must_use]
    pub fn globals(&self) -> &Section {
        &self.globals
    }

    pub fn globals_mut(&mut self) -> &mut Section {
        &mut self.globals
    }

    #[must_use]
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn sections_mut(&mut self) -> &mut [Section] {
        &mut self.sections
    }

    #[must_use]
    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections
            .iter()
            .find(|section| section.name() == Some(name))
    }

    pub fn section_mut(&mut self, name: &str) -> Option<&mut Section> {
        self.sections
            .iter_mut()
            .find(|section| section.name() == Some(name))
    }

    /// Appends a new section headed `[name]`, even if one with that name already exists.
    pub fn add_section(&mut self, name: &str) -> &mut Section {
        self.add_section_line(&format!("[{name}]"))
    }

    /// Appends a new section started by a raw header line, such as `[name] ; comment`.
    pub fn add_section_line(&mut self, text: &str) -> &mut Section {
        self.sections.push(Section::from_header(text));
        let last = self.sections.len() - 1;
        &mut self.sections[last]
    }

    /// Removes the first section called `name`, if there is one.
    pub fn delete_section(&mut self, name: &str) {
        if let Some(i) = self
            .sections
            .iter()
            .position(|section| section.name() == Some(name))
        {
            self.sections.remove(i);
        }
    }

    /// Drops every section and all global lines.
    pub fn clear(&mut self) {
        self.globals = Section::new();
        self.sections.clear();
    }

    #[must_use]
    pub fn stringify(&self, options: &StringifyOptions) -> String {
        let line_break = self.line_break.as_str();
        let mut output = String::new();
        let mut previous_ends_blank = None::<bool>;

        let sections = iter::once(&self.globals)
            .filter(|globals| !globals.is_empty())
            .chain(&self.sections);

        for section in sections {
            let lines = section
                .lines()
                .iter()
                .filter(|line| !(options.remove_blank_lines && line.is_blank()))
                .filter(|line| !(options.remove_comment_lines && line.is_comment()))
                .map(Line::text)
                .collect::<Vec<&str>>();

            let Some(last) = lines.last() else {
                continue;
            };
            let ends_blank = last.trim().is_empty();

            if let Some(previous_ends_blank) = previous_ends_blank {
                output.push_str(line_break);
                if options.blank_line_before_section && !previous_ends_blank {
                    output.push_str(line_break);
                }
            }

            output.push_str(&lines.join(line_break));
            previous_ends_blank = Some(ends_blank);
        }

        output
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.stringify(&StringifyOptions::default()))
    }
}

impl FromStr for Document {
    type Err = Infallible;

    fn from_str(text: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self::parse(text))
    }
}

impl TryFrom<&[u8]> for Document {
    type Error = Error;

    fn try_from(bytes: &[u8]) -> Result<Self> {
        decode_text(bytes).map(|text| Self::parse(&text))
    }
}

// INI files are usually UTF-8, but Windows tools like to save UTF-16 LE with a BOM.
pub(crate) fn decode_text(data: &[u8]) -> Result<String> {
    if let Some(data) = data.strip_prefix(BOM_LE) {
        if data.len() % 2 != 0 {
            return Err(Error::InvalidInput {
                reason: "UTF-16 data has an odd number of bytes".to_owned(),
            });
        }

        let utf16 = data
            .chunks_exact(2)
            .map(|chunk| u16::from_le_bytes([chunk[0], chunk[1]]));

        char::decode_utf16(utf16)
            .collect::<std::result::Result<String, _>>()
            .map_err(|error| Error::InvalidInput {
                reason: error.to_string(),
            })
    } else {
        String::from_utf8(data.to_vec()).map_err(|error| Error::InvalidInput {
            reason: error.to_string(),
        })
    }
}
