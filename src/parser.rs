//! Character-level scanning of a single line.
//!
//! The key and value regions of a pair line go through [`scan`], a small state machine over the
//! region's characters:
//!
//! | state          | input                      | effect                     | next state     |
//! |----------------|----------------------------|----------------------------|----------------|
//! | `Bare`         | `\`                        |                            | `Escaped(None)`|
//! | `Bare`         | `;` or `#`                 |                            | `Comment`      |
//! | `Bare`         | `=` (when splitting)       | stop                       |                |
//! | `Bare`         | any other                  | push to text               | `Bare`         |
//! | `Quoted(q)`    | `\`                        |                            | `Escaped(q)`   |
//! | `Quoted(q)`    | `q`                        |                            | `Closed`       |
//! | `Quoted(q)`    | any other                  | push to text               | `Quoted(q)`    |
//! | `Escaped(..)`  | any                        | push to text               | previous state |
//! | `Closed`       | `;` or `#`                 |                            | `Comment`      |
//! | `Closed`       | `=` (when splitting)       | stop                       |                |
//! | `Closed`       | any other                  | ignored                    | `Closed`       |
//! | `Comment`      | any                        | push to comment            | `Comment`      |

use crate::line::{LineKind, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Outside of any quotes.
    Bare,
    /// Inside a span opened by the given quote character.
    Quoted(char),
    /// After a `\`; resumes `Quoted` when it carries the open quote, `Bare` otherwise.
    Escaped(Option<char>),
    /// Past the closing quote of a quoted span.
    Closed,
    /// Everything from here to the end of the region belongs to the comment.
    Comment,
}

/// Result of scanning one region of a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Scan {
    pub text: String,
    pub comment: String,
    /// Byte offset just past the `=` that ended the region, if one did.
    pub split_at: Option<usize>,
}

pub(crate) fn scan(region: &str, until_equals: bool) -> Scan {
    let (mut state, start) = match quoted_lead_in(region) {
        Some((quote, offset)) => (State::Quoted(quote), offset),
        None => (State::Bare, 0),
    };
    let quoted = state != State::Bare;

    let mut text = String::with_capacity(region.len());
    let mut comment = String::new();
    let mut split_at = None;

    for (i, c) in region[start..].char_indices() {
        state = match (state, c) {
            (State::Comment, c) => {
                comment.push(c);
                State::Comment
            }
            (State::Escaped(resume), c) => {
                text.push(c);
                resume.map_or(State::Bare, State::Quoted)
            }
            (State::Bare, '\\') => State::Escaped(None),
            (State::Quoted(quote), '\\') => State::Escaped(Some(quote)),
            (State::Quoted(quote), c) if c == quote => State::Closed,
            (State::Quoted(quote), c) => {
                text.push(c);
                State::Quoted(quote)
            }
            (State::Bare | State::Closed, ';' | '#') => State::Comment,
            (State::Bare | State::Closed, '=') if until_equals => {
                split_at = Some(start + i + c.len_utf8());
                break;
            }
            (State::Bare, c) => {
                text.push(c);
                State::Bare
            }
            (State::Closed, _) => State::Closed,
        };
    }

    Scan {
        text: if quoted { text } else { text.trim().to_owned() },
        comment: comment.trim().to_owned(),
        split_at,
    }
}

/// Detects a quote that opens the region, possibly after whitespace. The quote must be
/// followed by at least one character. Returns the quote and the offset just past it.
fn quoted_lead_in(region: &str) -> Option<(char, usize)> {
    let trimmed = region.trim_start();
    let mut chars = trimmed.chars();
    let quote = chars.next().filter(|&c| matches!(c, '\'' | '"'))?;
    chars.next()?;

    Some((quote, region.len() - trimmed.len() + quote.len_utf8()))
}

/// Structured fields of a key-value line.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Pair {
    pub key: String,
    pub value: Value,
    pub comment: String,
}

pub(crate) fn parse_pair(line: &str) -> Pair {
    let key = scan(line, true);

    // A key without any `=` is a flag.
    let Some(offset) = key.split_at else {
        return Pair {
            key: key.text,
            value: Value::Bool(true),
            comment: key.comment,
        };
    };

    let value = scan(&line[offset..], false);

    Pair {
        key: key.text,
        value: Value::coerce(value.text),
        comment: value.comment,
    }
}

pub(crate) fn classify(text: &str) -> LineKind {
    if text.trim().is_empty() {
        LineKind::Blank
    } else if text.trim_start().starts_with([';', '#']) {
        LineKind::Comment
    } else if is_header(text) {
        LineKind::Header
    } else if text.contains(['\r', '\n', '\u{2028}', '\u{2029}']) {
        // A stray line terminator means this is not a single physical line.
        LineKind::Blank
    } else {
        LineKind::Pair
    }
}

/// A header starts with `[` and is closed by a later `]`.
pub(crate) fn is_header(text: &str) -> bool {
    text.strip_prefix('[').is_some_and(|rest| rest.contains(']'))
}

pub(crate) fn header_name(text: &str) -> Option<&str> {
    let rest = text.strip_prefix('[')?;
    rest.find(']').map(|end| &rest[..end])
}

/// Byte offset of the `;` or `#` that starts the comment of a comment or header line.
pub(crate) fn comment_marker(text: &str, kind: LineKind) -> Option<usize> {
    let start = match kind {
        LineKind::Comment => 0,
        LineKind::Header => text.find(']')? + 1,
        LineKind::Blank | LineKind::Pair => return None,
    };

    text[start..].find([';', '#']).map(|i| start + i)
}

pub(crate) fn comment_body(text: &str, marker: usize) -> String {
    let body = &text[marker + 1..];
    body.strip_prefix(' ').unwrap_or(body).trim_end().to_owned()
}

/// Prefixes each of `; # = \` with a backslash, along with a leading quote or `[` that would
/// otherwise open a quoted span or a section header.
pub(crate) fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len() + 1);

    for (i, c) in text.chars().enumerate() {
        if matches!(c, ';' | '#' | '=' | '\\') || (i == 0 && matches!(c, '\'' | '"' | '[')) {
            escaped.push('\\');
        }
        escaped.push(c);
    }

    escaped
}
