//! Order-preserving descriptor document
//!
//! A document is a preamble (everything before the first `[section]` header)
//! followed by named sections in file order. Each block is a list of lines:
//! blank lines, comments and `key=value` entries, so unrelated content
//! survives any mutation untouched.

use indexmap::IndexMap;

use crate::descriptor::error::ParseError;
use crate::descriptor::parser;
use crate::descriptor::value::TypedValue;

/// What `set` did to a key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyChange {
    Created,
    Updated,
    Unchanged,
}

/// One logical line of a section; an entry may span several physical lines
#[derive(Debug, Clone, PartialEq)]
pub enum Line {
    /// Raw whitespace of an empty line
    Blank(String),
    /// Raw text of a `;` or `#` comment line, indentation included
    Comment(String),
    Entry(Entry),
}

impl Line {
    fn write_to(&self, out: &mut String) {
        match self {
            Line::Blank(raw) | Line::Comment(raw) => out.push_str(raw),
            Line::Entry(entry) => entry.write_to(out),
        }
    }
}

/// `key=value` with the surrounding layout of its line
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    indent: String,
    key: String,
    separator: String,
    value: TypedValue,
    trailing: String,
}

impl Entry {
    pub fn new(key: impl Into<String>, value: TypedValue) -> Self {
        Self {
            indent: String::new(),
            key: key.into(),
            separator: "=".to_string(),
            value,
            trailing: String::new(),
        }
    }

    pub(crate) fn from_parts(
        indent: &str,
        key: &str,
        separator: &str,
        value: TypedValue,
        trailing: &str,
    ) -> Self {
        Self {
            indent: indent.to_string(),
            key: key.to_string(),
            separator: separator.to_string(),
            value,
            trailing: trailing.to_string(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> &TypedValue {
        &self.value
    }

    pub fn value_mut(&mut self) -> &mut TypedValue {
        &mut self.value
    }

    fn write_to(&self, out: &mut String) {
        out.push_str(&self.indent);
        out.push_str(&self.key);
        out.push_str(&self.separator);
        self.value.write_to(out);
        out.push_str(&self.trailing);
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
struct Header {
    indent: String,
    trailing: String,
}

/// A `[name]` block, or the header-less preamble
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    name: String,
    header: Option<Header>,
    lines: Vec<Line>,
}

impl Section {
    /// New section laid out the way Godot writes one: header, blank line, entries
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            header: Some(Header::default()),
            lines: vec![Line::Blank(String::new())],
        }
    }

    fn preamble() -> Self {
        Self {
            name: String::new(),
            header: None,
            lines: Vec::new(),
        }
    }

    pub(crate) fn with_header(name: &str, indent: &str, trailing: &str) -> Self {
        Self {
            name: name.to_string(),
            header: Some(Header {
                indent: indent.to_string(),
                trailing: trailing.to_string(),
            }),
            lines: Vec::new(),
        }
    }

    pub(crate) fn push_line(&mut self, line: Line) {
        self.lines.push(line);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_preamble(&self) -> bool {
        self.header.is_none()
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn entries(&self) -> impl Iterator<Item = &Entry> {
        self.lines.iter().filter_map(|line| match line {
            Line::Entry(entry) => Some(entry),
            _ => None,
        })
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries().map(Entry::key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entry(key).is_some()
    }

    pub fn entry(&self, key: &str) -> Option<&Entry> {
        self.entries().find(|entry| entry.key == key)
    }

    pub fn entry_mut(&mut self, key: &str) -> Option<&mut Entry> {
        self.lines.iter_mut().find_map(|line| match line {
            Line::Entry(entry) if entry.key == key => Some(entry),
            _ => None,
        })
    }

    pub fn get(&self, key: &str) -> Option<&TypedValue> {
        self.entry(key).map(Entry::value)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut TypedValue> {
        self.entry_mut(key).map(Entry::value_mut)
    }

    /// Replace the value of `key` in place, or add the key after the last entry
    pub fn set(&mut self, key: &str, value: TypedValue) -> KeyChange {
        if let Some(entry) = self.entry_mut(key) {
            if entry.value == value {
                return KeyChange::Unchanged;
            }
            entry.value = value;
            return KeyChange::Updated;
        }
        let index = self.insertion_index();
        self.lines.insert(index, Line::Entry(Entry::new(key, value)));
        KeyChange::Created
    }

    fn insertion_index(&self) -> usize {
        let last_of = |pred: fn(&Line) -> bool| self.lines.iter().rposition(pred);
        if let Some(index) = last_of(|line| matches!(line, Line::Entry(_))) {
            return index + 1;
        }
        if let Some(index) = last_of(|line| matches!(line, Line::Comment(_))) {
            return index + 1;
        }
        match (&self.header, self.lines.first()) {
            (Some(_), Some(Line::Blank(_))) => 1,
            _ => 0,
        }
    }

    fn ends_with_blank(&self) -> bool {
        matches!(self.lines.last(), Some(Line::Blank(_)))
    }

    fn write_to(&self, out: &mut String) {
        if let Some(header) = &self.header {
            out.push_str(&header.indent);
            out.push('[');
            out.push_str(&self.name);
            out.push(']');
            out.push_str(&header.trailing);
            out.push('\n');
        }
        for line in &self.lines {
            line.write_to(out);
            out.push('\n');
        }
    }
}

/// A parsed `project.godot`
#[derive(Debug, Clone, PartialEq)]
pub struct DescriptorDocument {
    preamble: Section,
    sections: IndexMap<String, Section>,
    final_newline: bool,
}

impl Default for DescriptorDocument {
    fn default() -> Self {
        Self {
            preamble: Section::preamble(),
            sections: IndexMap::new(),
            final_newline: true,
        }
    }
}

impl DescriptorDocument {
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        parser::parse(text)
    }

    /// Serialize back to text; parsed documents reproduce their input exactly
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        self.preamble.write_to(&mut out);
        for section in self.sections.values() {
            section.write_to(&mut out);
        }
        if !self.final_newline && out.ends_with('\n') {
            out.pop();
        }
        out
    }

    pub fn preamble(&self) -> &Section {
        &self.preamble
    }

    pub fn sections(&self) -> impl Iterator<Item = &Section> {
        self.sections.values()
    }

    pub fn section_names(&self) -> impl Iterator<Item = &str> {
        self.sections.keys().map(String::as_str)
    }

    /// Look up a section; the empty name refers to the preamble
    pub fn section(&self, name: &str) -> Option<&Section> {
        if name.is_empty() {
            Some(&self.preamble)
        } else {
            self.sections.get(name)
        }
    }

    pub fn section_mut(&mut self, name: &str) -> Option<&mut Section> {
        if name.is_empty() {
            Some(&mut self.preamble)
        } else {
            self.sections.get_mut(name)
        }
    }

    pub fn get(&self, section: &str, key: &str) -> Option<&TypedValue> {
        self.section(section)?.get(key)
    }

    pub fn get_mut(&mut self, section: &str, key: &str) -> Option<&mut TypedValue> {
        self.section_mut(section)?.get_mut(key)
    }

    /// Set a value, creating the section and key when absent
    pub fn set(&mut self, section: &str, key: &str, value: TypedValue) -> KeyChange {
        self.insert_section(section).set(key, value)
    }

    /// Get or append a section; a new section is separated from the previous
    /// block by a blank line
    pub fn insert_section(&mut self, name: &str) -> &mut Section {
        if name.is_empty() {
            return &mut self.preamble;
        }
        if !self.sections.contains_key(name) {
            let previous = match self.sections.last_mut() {
                Some((_, section)) => Some(section),
                None if !self.preamble.lines.is_empty() => Some(&mut self.preamble),
                None => None,
            };
            if let Some(previous) = previous.filter(|section| !section.ends_with_blank()) {
                previous.push_line(Line::Blank(String::new()));
            }
        }
        self.sections
            .entry(name.to_string())
            .or_insert_with(|| Section::new(name))
    }

    pub(crate) fn preamble_mut(&mut self) -> &mut Section {
        &mut self.preamble
    }

    /// Append a parsed section; returns it back when the name is taken
    pub(crate) fn push_section(&mut self, section: Section) -> Result<(), Section> {
        if self.sections.contains_key(&section.name) {
            return Err(section);
        }
        self.sections.insert(section.name.clone(), section);
        Ok(())
    }

    pub(crate) fn contains_section(&self, name: &str) -> bool {
        self.sections.contains_key(name)
    }

    pub(crate) fn set_final_newline(&mut self, final_newline: bool) {
        self.final_newline = final_newline;
    }
}
