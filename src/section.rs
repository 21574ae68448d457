use crate::error::{Error, Result};
use crate::line::{Line, Value};
use crate::parser;

/// An ordered run of lines, optionally opened by a `[name]` header.
///
/// When a section has a name, its first line is the header it was read from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Section {
    name: Option<String>,
    lines: Vec<Line>,
}

impl Section {
    /// An unnamed section with no lines, such as the globals of a document.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a section from its header line.
    ///
    /// Text that is not a header still becomes the first line, but the section stays unnamed.
    /// Empty text gives an empty, unnamed section. Both report `name() == None`; a section read
    /// from a non-header line is told apart by that line, which [`Section::new`] never has.
    #[must_use]
    pub fn from_header(text: &str) -> Self {
        if text.is_empty() {
            return Self::new();
        }

        let line = Line::new(text);
        let name = if line.is_header() {
            parser::header_name(text).map(str::to_owned)
        } else {
            None
        };

        Self {
            name,
            lines: vec![line],
        }
    }

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    #[must_use]
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn lines_mut(&mut self) -> &mut [Line] {
        &mut self.lines
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn add_line(&mut self, text: impl Into<String>) -> &mut Line {
        self.push(Line::new(text))
    }

    pub fn add_lines<I>(&mut self, texts: I) -> &mut [Line]
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let start = self.lines.len();
        self.lines.extend(texts.into_iter().map(Line::new));
        &mut self.lines[start..]
    }

    pub(crate) fn push(&mut self, line: Line) -> &mut Line {
        self.lines.push(line);
        let last = self.lines.len() - 1;
        &mut self.lines[last]
    }

    /// The first line holding `key`.
    #[must_use]
    pub fn line(&self, key: &str) -> Option<&Line> {
        self.lines.iter().find(|line| line.key() == Some(key))
    }

    pub fn line_mut(&mut self, key: &str) -> Option<&mut Line> {
        self.lines.iter_mut().find(|line| line.key() == Some(key))
    }

    /// Removes the first line holding `key`, if there is one.
    pub fn delete_line(&mut self, key: &str) {
        if let Some(i) = self.lines.iter().position(|line| line.key() == Some(key)) {
            self.lines.remove(i);
        }
    }

    /// Drops every line except the header of a named section.
    pub fn clear(&mut self) {
        let keep = usize::from(self.name.is_some());
        self.lines.truncate(keep);
    }

    #[must_use]
    pub fn value(&self, key: &str) -> Option<&Value> {
        self.line(key).and_then(Line::value)
    }

    /// Sets the value of the first line holding `key`, appending a new line if there is none.
    pub fn set_value(&mut self, key: &str, value: impl Into<Value>) -> &mut Line {
        let value = value.into();

        match self.lines.iter().position(|line| line.key() == Some(key)) {
            Some(i) => {
                let line = &mut self.lines[i];
                line.assign_value(value);
                line
            }
            None => self.push(Line::pair(key, value)),
        }
    }

    /// Values of every line keyed `key[]` or `key`, in order.
    #[must_use]
    pub fn array(&self, key: &str) -> Vec<&Value> {
        let array_key = array_key(key);

        self.lines
            .iter()
            .filter(|line| line.key().is_some_and(|k| k == array_key || k == key))
            .filter_map(Line::value)
            .collect()
    }

    /// Replaces every line keyed `key[]` or `key` with one `key[]=value` line per value.
    ///
    /// The new lines are appended at the end of the section, not where the old ones were.
    pub fn set_array<I>(&mut self, key: &str, values: I) -> &mut [Line]
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        let array_key = array_key(key);

        self.lines
            .retain(|line| !line.key().is_some_and(|k| k == array_key || k == key));

        let start = self.lines.len();
        self.lines.extend(
            values
                .into_iter()
                .map(|value| Line::pair(&array_key, value)),
        );
        &mut self.lines[start..]
    }
}

impl TryFrom<&[u8]> for Section {
    type Error = Error;

    fn try_from(header: &[u8]) -> Result<Self> {
        crate::decode_text(header).map(|text| Self::from_header(&text))
    }
}

pub(crate) fn array_key(key: &str) -> String {
    format!("{key}[]")
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn strings(values: Vec<&Value>) -> Vec<String> {
        values.into_iter().map(ToString::to_string).collect()
    }

    #[test]
    fn empty_section() {
        let section = Section::new();

        assert_eq!(section.name(), None);
        assert!(section.is_empty());
        assert_eq!(Section::from_header(""), section);
    }

    #[test]
    fn header_names_the_section() {
        let section = Section::from_header("[new section]");

        assert_eq!(section.name(), Some("new section"));
        assert_eq!(section.len(), 1);
        assert_eq!(section.lines()[0].text(), "[new section]");
    }

    #[test]
    fn non_header_stays_unnamed() {
        let section = Section::from_header("; [comment not header]");

        assert_eq!(section.name(), None);
        assert_eq!(section.len(), 1);
        assert_eq!(section.lines()[0].text(), "; [comment not header]");

        let empty = Section::from_header("");
        assert_eq!(empty.name(), None);
        assert!(empty.is_empty());
    }

    #[test]
    fn header_bytes_must_be_text() {
        let section = Section::try_from(&b"[s]"[..]).expect("valid utf-8");
        assert_eq!(section.name(), Some("s"));

        assert!(matches!(
            Section::try_from(&[b'[', 0xC3, 0x28, b']'][..]),
            Err(Error::InvalidInput { .. })
        ));
    }

    #[test]
    fn add_and_find_lines() {
        let mut section = Section::from_header("[s]");
        section.add_line("key=value ; comment");
        let added = section.add_lines(["", "a=b", "; hello world", ""]);
        assert_eq!(added.len(), 4);
        assert_eq!(section.len(), 6);

        let line = section.line("key").expect("key was added");
        assert_eq!(line.text(), "key=value ; comment");
        assert!(section.line("not present").is_none());
    }

    #[test]
    fn delete_line_is_idempotent() {
        let mut section = Section::from_header("[s]");
        section.add_lines(["a=1", "b=2", "a=3"]);

        section.delete_line("a");
        assert_eq!(section.len(), 3);
        assert_eq!(section.value("a"), Some(&Value::from("3")));

        section.delete_line("missing");
        assert_eq!(section.len(), 3);
    }

    #[test]
    fn clear_keeps_the_header() {
        let mut named = Section::from_header("[s]");
        named.add_lines(["a=1", "", "; c"]);
        named.clear();
        assert_eq!(named.len(), 1);
        assert!(named.lines()[0].is_header());

        let mut globals = Section::new();
        globals.add_lines(["a=1", "b=2"]);
        globals.clear();
        assert!(globals.is_empty());
    }

    #[test]
    fn values() {
        let mut section = Section::from_header("[s]");
        section.add_line("a=1");

        assert_eq!(section.value("a"), Some(&Value::from("1")));
        assert_eq!(section.value("b"), None);

        section.set_value("a", "2");
        section.set_value("b", true);
        section.set_value("c;d", "e=f");
        section.set_value("d", "");

        let texts: Vec<&str> = section.lines().iter().map(Line::text).collect();
        assert_eq!(texts, ["[s]", "a=2", "b=true", r"c\;d=e\=f", "d="]);
        assert_eq!(section.value("d"), Some(&Value::from("")));
        assert_eq!(section.value("c;d"), Some(&Value::from("e=f")));
    }

    #[test]
    fn arrays() {
        let mut section = Section::from_header("[s]");
        section.add_lines(["a[]=1", "b=1", "x=0", "a[]=2", "b=2"]);

        assert_eq!(strings(section.array("a")), ["1", "2"]);
        assert_eq!(strings(section.array("b")), ["1", "2"]);
        assert!(section.array("c").is_empty());
    }

    #[test]
    fn set_array_appends_a_fresh_run() {
        let mut section = Section::from_header("[s]");
        section.add_lines(["a[]=1", "x=0", "a=2"]);

        let lines = section.set_array("a", ["7", "8"]);
        assert_eq!(lines.len(), 2);

        let texts: Vec<&str> = section.lines().iter().map(Line::text).collect();
        assert_eq!(texts, ["[s]", "x=0", "a[]=7", "a[]=8"]);
        assert_eq!(strings(section.array("a")), ["7", "8"]);
    }
}
