//! Typed values of the descriptor format
//!
//! Every value read from a file keeps enough layout information (source
//! lexemes, whitespace around items) to be written back byte-for-byte.
//! Values built in code use the canonical layout Godot itself writes.

use std::fmt;

use crate::descriptor::parser::decode_string_literal;

/// Decoded value together with the exact text it was read from
#[derive(Debug, Clone, PartialEq)]
pub struct Lexeme<T> {
    value: T,
    raw: String,
}

impl<T> Lexeme<T> {
    pub(crate) fn from_source(value: T, raw: &str) -> Self {
        Self {
            value,
            raw: raw.to_string(),
        }
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }
}

impl Lexeme<String> {
    pub fn string(value: impl Into<String>) -> Self {
        let value = value.into();
        let raw = quote(&value);
        Self { value, raw }
    }
}

impl Lexeme<i64> {
    pub fn integer(value: i64) -> Self {
        Self {
            value,
            raw: value.to_string(),
        }
    }
}

impl Lexeme<f64> {
    pub fn float(value: f64) -> Self {
        Self {
            value,
            raw: format_float(value),
        }
    }
}

/// Quote a string the way the descriptor format expects it
pub fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Floats always carry a decimal point or an exponent; non-finite values use
/// Godot's `inf`, `inf_neg` and `nan`
fn format_float(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "inf_neg" }.to_string();
    }
    let text = value.to_string();
    if text.contains(['.', 'e', 'E']) {
        text
    } else {
        format!("{text}.0")
    }
}

/// An item of a bracketed list together with the whitespace around it
#[derive(Debug, Clone, PartialEq)]
pub struct Spaced<T> {
    pub before: String,
    pub item: T,
    pub after: String,
}

impl<T> Spaced<T> {
    pub fn new(before: &str, item: T, after: &str) -> Self {
        Self {
            before: before.to_string(),
            item,
            after: after.to_string(),
        }
    }
}

/// Append an item, copying the separator observed between existing siblings
///
/// `edges` is the (before, after) layout used when the list was empty, and
/// `separator` the leading whitespace used when no sibling shows one.
fn push_spaced<T>(
    items: &mut Vec<Spaced<T>>,
    fill: &mut String,
    item: T,
    separator: &str,
    edges: (&str, &str),
) {
    let Some(last) = items.last_mut() else {
        fill.clear();
        items.push(Spaced::new(edges.0, item, edges.1));
        return;
    };
    let closing = std::mem::take(&mut last.after);
    let before = match items.get(1) {
        Some(second) => second.before.clone(),
        None if items[0].before.contains('\n') => items[0].before.clone(),
        None => separator.to_string(),
    };
    items.push(Spaced {
        before,
        item,
        after: closing,
    });
}

fn write_delimited<T>(
    out: &mut String,
    open: char,
    close: char,
    items: &[Spaced<T>],
    fill: &str,
    mut write_item: impl FnMut(&T, &mut String),
) {
    out.push(open);
    if items.is_empty() {
        out.push_str(fill);
    }
    for (index, spaced) in items.iter().enumerate() {
        if index > 0 {
            out.push(',');
        }
        out.push_str(&spaced.before);
        write_item(&spaced.item, out);
        out.push_str(&spaced.after);
    }
    out.push(close);
}

/// `[a, b, c]`
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Array {
    items: Vec<Spaced<TypedValue>>,
    fill: String,
}

impl Array {
    pub fn new(values: impl IntoIterator<Item = TypedValue>) -> Self {
        let mut array = Self::default();
        for value in values {
            array.push(value);
        }
        array
    }

    pub(crate) fn from_parts(items: Vec<Spaced<TypedValue>>, fill: &str) -> Self {
        Self {
            items,
            fill: fill.to_string(),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&TypedValue> {
        self.items.get(index).map(|spaced| &spaced.item)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut TypedValue> {
        self.items.get_mut(index).map(|spaced| &mut spaced.item)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TypedValue> {
        self.items.iter().map(|spaced| &spaced.item)
    }

    pub fn push(&mut self, value: TypedValue) {
        push_spaced(&mut self.items, &mut self.fill, value, " ", ("", ""));
    }

    fn write_to(&self, out: &mut String) {
        write_delimited(out, '[', ']', &self.items, &self.fill, TypedValue::write_to);
    }
}

/// `"key": value` inside a mapping
#[derive(Debug, Clone, PartialEq)]
pub struct MapEntry {
    key: Lexeme<String>,
    colon: String,
    value: TypedValue,
}

impl MapEntry {
    pub(crate) fn from_parts(key: Lexeme<String>, colon: &str, value: TypedValue) -> Self {
        Self {
            key,
            colon: colon.to_string(),
            value,
        }
    }

    pub fn key(&self) -> &str {
        self.key.value()
    }

    pub fn value(&self) -> &TypedValue {
        &self.value
    }
}

/// `{"key": value, ...}` with unique keys in insertion order
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Mapping {
    entries: Vec<Spaced<MapEntry>>,
    fill: String,
}

impl Mapping {
    pub fn new<K: Into<String>>(pairs: impl IntoIterator<Item = (K, TypedValue)>) -> Self {
        let mut mapping = Self::default();
        for (key, value) in pairs {
            mapping.insert(key, value);
        }
        mapping
    }

    pub(crate) fn from_parts(entries: Vec<Spaced<MapEntry>>, fill: &str) -> Self {
        Self {
            entries,
            fill: fill.to_string(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn get(&self, key: &str) -> Option<&TypedValue> {
        self.entries
            .iter()
            .find(|spaced| spaced.item.key() == key)
            .map(|spaced| &spaced.item.value)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut TypedValue> {
        self.entries
            .iter_mut()
            .find(|spaced| spaced.item.key() == key)
            .map(|spaced| &mut spaced.item.value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &TypedValue)> {
        self.entries
            .iter()
            .map(|spaced| (spaced.item.key(), &spaced.item.value))
    }

    /// Insert or replace; returns the previous value of `key`
    pub fn insert(&mut self, key: impl Into<String>, value: TypedValue) -> Option<TypedValue> {
        let key = key.into();
        if let Some(slot) = self.get_mut(&key) {
            return Some(std::mem::replace(slot, value));
        }
        let colon = self
            .entries
            .first()
            .map_or_else(|| ": ".to_string(), |spaced| spaced.item.colon.clone());
        let entry = MapEntry::from_parts(Lexeme::<String>::string(key), &colon, value);
        push_spaced(&mut self.entries, &mut self.fill, entry, " ", ("\n", "\n"));
        None
    }

    fn write_to(&self, out: &mut String) {
        write_delimited(out, '{', '}', &self.entries, &self.fill, |entry, out| {
            out.push_str(entry.key.raw());
            out.push_str(&entry.colon);
            entry.value.write_to(out);
        });
    }
}

/// Constructor-style literal such as `Vector2(1, 2)` or `PackedStringArray("4.2")`
///
/// Arguments are kept as raw source text, in order.
#[derive(Debug, Clone, PartialEq)]
pub struct TypedLiteral {
    name: String,
    args: Vec<Spaced<String>>,
    fill: String,
}

impl TypedLiteral {
    pub fn new<A: Into<String>>(name: impl Into<String>, args: impl IntoIterator<Item = A>) -> Self {
        let mut literal = Self {
            name: name.into(),
            args: Vec::new(),
            fill: String::new(),
        };
        for arg in args {
            literal.push_arg(arg);
        }
        literal
    }

    pub(crate) fn from_parts(name: &str, args: Vec<Spaced<String>>, fill: &str) -> Self {
        Self {
            name: name.to_string(),
            args,
            fill: fill.to_string(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn args(&self) -> impl Iterator<Item = &str> {
        self.args.iter().map(|spaced| spaced.item.as_str())
    }

    /// Decoded value of a quoted string argument
    pub fn string_arg(&self, index: usize) -> Option<String> {
        let raw = self.args.get(index)?.item.as_str();
        decode_string_literal(raw)
    }

    /// Decoded quoted string arguments; other arguments are skipped
    pub fn string_args(&self) -> Vec<String> {
        self.args()
            .filter_map(decode_string_literal)
            .collect()
    }

    /// Replace the raw text of an argument, keeping its surrounding whitespace
    pub fn set_arg(&mut self, index: usize, raw: impl Into<String>) -> bool {
        match self.args.get_mut(index) {
            Some(spaced) => {
                spaced.item = raw.into();
                true
            }
            None => false,
        }
    }

    pub fn push_arg(&mut self, raw: impl Into<String>) {
        push_spaced(&mut self.args, &mut self.fill, raw.into(), " ", ("", ""));
    }

    fn write_to(&self, out: &mut String) {
        out.push_str(&self.name);
        write_delimited(out, '(', ')', &self.args, &self.fill, |arg, out| {
            out.push_str(arg)
        });
    }
}

/// A descriptor value
#[derive(Debug, Clone, PartialEq)]
pub enum TypedValue {
    String(Lexeme<String>),
    /// `&"name"`
    StringName(Lexeme<String>),
    /// `^"path"`
    NodePath(Lexeme<String>),
    Integer(Lexeme<i64>),
    Float(Lexeme<f64>),
    Boolean(bool),
    Array(Array),
    Mapping(Mapping),
    Literal(TypedLiteral),
    Null,
}

impl TypedValue {
    pub fn string(value: impl Into<String>) -> Self {
        Self::String(Lexeme::<String>::string(value))
    }

    pub fn integer(value: i64) -> Self {
        Self::Integer(Lexeme::<i64>::integer(value))
    }

    pub fn float(value: f64) -> Self {
        Self::Float(Lexeme::<f64>::float(value))
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::String(_) => "string",
            Self::StringName(_) => "string_name",
            Self::NodePath(_) => "node_path",
            Self::Integer(_) => "integer",
            Self::Float(_) => "float",
            Self::Boolean(_) => "boolean",
            Self::Array(_) => "array",
            Self::Mapping(_) => "mapping",
            Self::Literal(_) => "literal",
            Self::Null => "null",
        }
    }

    /// Decoded text of a string, string name or node path
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(lexeme) | Self::StringName(lexeme) | Self::NodePath(lexeme) => {
                Some(lexeme.value())
            }
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(lexeme) => Some(*lexeme.value()),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(lexeme) => Some(*lexeme.value()),
            Self::Integer(lexeme) => Some(*lexeme.value() as f64),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&Array> {
        match self {
            Self::Array(array) => Some(array),
            _ => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            Self::Mapping(mapping) => Some(mapping),
            _ => None,
        }
    }

    pub fn as_literal(&self) -> Option<&TypedLiteral> {
        match self {
            Self::Literal(literal) => Some(literal),
            _ => None,
        }
    }

    pub fn as_literal_mut(&mut self) -> Option<&mut TypedLiteral> {
        match self {
            Self::Literal(literal) => Some(literal),
            _ => None,
        }
    }

    pub fn write_to(&self, out: &mut String) {
        match self {
            Self::String(lexeme) | Self::StringName(lexeme) | Self::NodePath(lexeme) => {
                out.push_str(lexeme.raw())
            }
            Self::Integer(lexeme) => out.push_str(lexeme.raw()),
            Self::Float(lexeme) => out.push_str(lexeme.raw()),
            Self::Boolean(value) => out.push_str(if *value { "true" } else { "false" }),
            Self::Array(array) => array.write_to(out),
            Self::Mapping(mapping) => mapping.write_to(out),
            Self::Literal(literal) => literal.write_to(out),
            Self::Null => out.push_str("null"),
        }
    }
}

impl fmt::Display for TypedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        self.write_to(&mut out);
        f.write_str(&out)
    }
}
