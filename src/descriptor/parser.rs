//! Descriptor text parser
//!
//! Works on the whole input rather than line by line because Godot writes
//! multi-line values (input maps, dictionaries). Every piece of layout the
//! serializer needs is captured as raw text.

use std::sync::LazyLock;

use regex::Regex;

use crate::descriptor::document::{DescriptorDocument, Entry, Line, Section};
use crate::descriptor::error::{ParseError, ParseErrorReason};
use crate::descriptor::value::{Array, Lexeme, MapEntry, Mapping, Spaced, TypedLiteral, TypedValue};

static INTEGER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[+-]?\d+$").unwrap());

static FLOAT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?(?:\d+\.\d*|\.\d+|\d+)(?:[eE][+-]?\d+)?$").unwrap()
});

/// Parse descriptor text; a malformed input yields no document at all
pub fn parse(text: &str) -> Result<DescriptorDocument, ParseError> {
    check_quotes(text)?;

    let mut scanner = Scanner::new(text);
    let mut doc = DescriptorDocument::default();
    let mut current: Option<Section> = None;

    while !scanner.at_end() {
        let line = scanner.line;
        let column = scanner.column();
        let indent = scanner.eat_inline_ws();

        let parsed = match scanner.peek() {
            None | Some(b'\n') => Line::Blank(indent.to_string()),
            Some(b';' | b'#') => Line::Comment(format!("{indent}{}", scanner.rest_of_line())),
            Some(b'[') => {
                let section = scanner.parse_header(indent)?;
                let open_name = current.as_ref().map(Section::name);
                if doc.contains_section(section.name()) || open_name == Some(section.name()) {
                    return Err(ParseError {
                        line,
                        column,
                        reason: ParseErrorReason::DuplicateSection(section.name().to_string()),
                    });
                }
                if let Some(previous) = current.replace(section) {
                    push_section(&mut doc, previous);
                }
                scanner.end_line()?;
                continue;
            }
            Some(_) => {
                let entry = scanner.parse_entry(indent)?;
                let block = match current.as_ref() {
                    Some(section) => section,
                    None => doc.preamble(),
                };
                if block.contains_key(entry.key()) {
                    return Err(ParseError {
                        line,
                        column,
                        reason: ParseErrorReason::DuplicateKey(entry.key().to_string()),
                    });
                }
                Line::Entry(entry)
            }
        };

        match current.as_mut() {
            Some(section) => section.push_line(parsed),
            None => doc.preamble_mut().push_line(parsed),
        }
        scanner.end_line()?;
    }

    if let Some(section) = current {
        push_section(&mut doc, section);
    }
    doc.set_final_newline(text.ends_with('\n'));
    Ok(doc)
}

fn push_section(doc: &mut DescriptorDocument, section: Section) {
    // Duplicates are rejected when the header is read
    let _ = doc.push_section(section);
}

/// Non-finite float spellings: `inf`, `inf_neg` and `nan`, plus signed `inf`
fn special_float(word: &str) -> Option<f64> {
    match word {
        "inf" | "+inf" => Some(f64::INFINITY),
        "-inf" | "inf_neg" => Some(f64::NEG_INFINITY),
        "nan" => Some(f64::NAN),
        _ => None,
    }
}

/// Decode a complete quoted string lexeme such as `"a\"b"`
pub fn decode_string_literal(raw: &str) -> Option<String> {
    let mut scanner = Scanner::new(raw);
    if scanner.peek() != Some(b'"') {
        return None;
    }
    let value = scanner.parse_string().ok()?;
    scanner.at_end().then_some(value)
}

/// Report unterminated strings before any structural error
///
/// Outside strings, `;` and `#` start a comment running to the end of the line.
fn check_quotes(text: &str) -> Result<(), ParseError> {
    let mut open: Option<(usize, usize)> = None;
    let mut escaped = false;
    let mut in_comment = false;
    let mut line = 1;
    let mut line_start = 0;

    for (index, byte) in text.bytes().enumerate() {
        if byte == b'\n' {
            line += 1;
            line_start = index + 1;
            in_comment = false;
        }
        if open.is_some() {
            match byte {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => open = None,
                _ => {}
            }
            continue;
        }
        match byte {
            _ if in_comment => {}
            b';' | b'#' => in_comment = true,
            b'"' => open = Some((line, index - line_start + 1)),
            _ => {}
        }
    }

    match open {
        Some((line, column)) => Err(ParseError {
            line,
            column,
            reason: ParseErrorReason::UnterminatedString,
        }),
        None => Ok(()),
    }
}

struct Scanner<'a> {
    src: &'a str,
    bytes: &'a [u8],
    pos: usize,
    line: usize,
    line_start: usize,
}

impl<'a> Scanner<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            src,
            bytes: src.as_bytes(),
            pos: 0,
            line: 1,
            line_start: 0,
        }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn column(&self) -> usize {
        self.pos - self.line_start + 1
    }

    fn bump(&mut self) {
        if self.peek() == Some(b'\n') {
            self.line += 1;
            self.line_start = self.pos + 1;
        }
        self.pos += 1;
    }

    fn error(&self, reason: ParseErrorReason) -> ParseError {
        ParseError {
            line: self.line,
            column: self.column(),
            reason,
        }
    }

    fn error_at(line: usize, column: usize, reason: ParseErrorReason) -> ParseError {
        ParseError {
            line,
            column,
            reason,
        }
    }

    fn eat_while(&mut self, pred: impl Fn(u8) -> bool) -> &'a str {
        let start = self.pos;
        while self.peek().is_some_and(&pred) {
            self.bump();
        }
        &self.src[start..self.pos]
    }

    /// Spaces, tabs and the `\r` of CRLF line endings
    fn eat_inline_ws(&mut self) -> &'a str {
        self.eat_while(|b| matches!(b, b' ' | b'\t' | b'\r'))
    }

    fn eat_ws(&mut self) -> &'a str {
        self.eat_while(|b| b.is_ascii_whitespace())
    }

    /// Byte following the whitespace run at the cursor, without consuming it
    fn peek_past_ws(&self) -> Option<u8> {
        self.bytes[self.pos..]
            .iter()
            .copied()
            .find(|b| !b.is_ascii_whitespace())
    }

    fn rest_of_line(&mut self) -> &'a str {
        self.eat_while(|b| b != b'\n')
    }

    /// Inline whitespace plus an optional trailing comment
    fn trailing(&mut self) -> Result<String, ParseError> {
        let mut trailing = self.eat_inline_ws().to_string();
        match self.peek() {
            None | Some(b'\n') => {}
            Some(b';' | b'#') => trailing.push_str(self.rest_of_line()),
            Some(_) => return Err(self.unexpected_rest_of_line()),
        }
        Ok(trailing)
    }

    fn end_line(&mut self) -> Result<(), ParseError> {
        match self.peek() {
            None => Ok(()),
            Some(b'\n') => {
                self.bump();
                Ok(())
            }
            Some(_) => Err(self.unexpected_rest_of_line()),
        }
    }

    fn parse_header(&mut self, indent: &str) -> Result<Section, ParseError> {
        let (line, column) = (self.line, self.column());
        self.bump();
        let name = self.eat_while(|b| b != b']' && b != b'\n');
        if self.peek() != Some(b']') {
            return Err(Self::error_at(
                line,
                column,
                ParseErrorReason::UnbalancedDelimiter('['),
            ));
        }
        self.bump();
        if name.trim().is_empty() {
            return Err(Self::error_at(line, column, ParseErrorReason::EmptySectionName));
        }
        let trailing = self.trailing()?;
        Ok(Section::with_header(name, indent, &trailing))
    }

    fn parse_entry(&mut self, indent: &str) -> Result<Entry, ParseError> {
        let key_start = self.pos;
        let raw_key = self.eat_while(|b| b != b'=' && b != b'\n');
        if self.peek() != Some(b'=') {
            self.pos = key_start;
            return Err(self.unexpected_rest_of_line());
        }
        let key = raw_key.trim_end();
        if key.is_empty() {
            return Err(self.error(ParseErrorReason::MissingKey));
        }
        let separator_start = key_start + key.len();
        self.bump();
        self.eat_inline_ws();
        let separator = &self.src[separator_start..self.pos];

        if matches!(self.peek(), None | Some(b'\n') | Some(b';')) {
            return Err(self.error(ParseErrorReason::MissingValue));
        }
        let value = self.parse_value()?;
        let trailing = self.trailing()?;
        Ok(Entry::from_parts(indent, key, separator, value, &trailing))
    }

    fn parse_value(&mut self) -> Result<TypedValue, ParseError> {
        match self.peek() {
            Some(b'"') => {
                let start = self.pos;
                let value = self.parse_string()?;
                Ok(TypedValue::String(Lexeme::from_source(
                    value,
                    &self.src[start..self.pos],
                )))
            }
            Some(prefix @ (b'&' | b'^')) if self.bytes.get(self.pos + 1) == Some(&b'"') => {
                let start = self.pos;
                self.bump();
                let value = Lexeme::from_source(self.parse_string()?, &self.src[start..self.pos]);
                Ok(match prefix {
                    b'&' => TypedValue::StringName(value),
                    _ => TypedValue::NodePath(value),
                })
            }
            Some(b'[') => self.parse_array(),
            Some(b'{') => self.parse_mapping(),
            Some(b) if b.is_ascii_digit() || matches!(b, b'+' | b'-' | b'.') => self.parse_number(),
            Some(b) if b.is_ascii_alphabetic() || b == b'_' => self.parse_word(),
            None | Some(b'\n') => Err(self.error(ParseErrorReason::MissingValue)),
            Some(_) => {
                let token = self.src[self.pos..].chars().next().unwrap_or_default();
                Err(self.error(ParseErrorReason::UnexpectedToken(token.to_string())))
            }
        }
    }

    /// Consume a quoted string at the cursor and return its decoded value
    fn parse_string(&mut self) -> Result<String, ParseError> {
        let (line, column) = (self.line, self.column());
        self.bump();
        let mut value = String::new();
        loop {
            let Some(c) = self.src[self.pos..].chars().next() else {
                return Err(Self::error_at(
                    line,
                    column,
                    ParseErrorReason::UnterminatedString,
                ));
            };
            match c {
                '"' => {
                    self.bump();
                    return Ok(value);
                }
                '\\' => {
                    self.bump();
                    let Some(escaped) = self.src[self.pos..].chars().next() else {
                        continue;
                    };
                    value.push(match escaped {
                        'n' => '\n',
                        't' => '\t',
                        'r' => '\r',
                        other => other,
                    });
                    self.advance_char(escaped);
                }
                c => {
                    value.push(c);
                    self.advance_char(c);
                }
            }
        }
    }

    fn advance_char(&mut self, c: char) {
        if c == '\n' {
            self.bump();
        } else {
            self.pos += c.len_utf8();
        }
    }

    fn parse_number(&mut self) -> Result<TypedValue, ParseError> {
        let (line, column) = (self.line, self.column());
        let raw = self.eat_while(|b| b.is_ascii_alphanumeric() || matches!(b, b'+' | b'-' | b'.'));
        let invalid = || Self::error_at(line, column, ParseErrorReason::InvalidNumber(raw.to_string()));

        if let Some(value) = special_float(raw) {
            return Ok(TypedValue::Float(Lexeme::from_source(value, raw)));
        }
        if INTEGER_RE.is_match(raw) {
            let value = raw.parse::<i64>().map_err(|_| invalid())?;
            return Ok(TypedValue::Integer(Lexeme::from_source(value, raw)));
        }
        if FLOAT_RE.is_match(raw) {
            let value = raw.parse::<f64>().map_err(|_| invalid())?;
            return Ok(TypedValue::Float(Lexeme::from_source(value, raw)));
        }
        Err(invalid())
    }

    fn parse_word(&mut self) -> Result<TypedValue, ParseError> {
        let (line, column) = (self.line, self.column());
        let word = self.eat_while(|b| b.is_ascii_alphanumeric() || b == b'_');
        if self.peek() == Some(b'(') {
            return self.parse_literal(word);
        }
        if let Some(value) = special_float(word) {
            return Ok(TypedValue::Float(Lexeme::from_source(value, word)));
        }
        match word {
            "true" => Ok(TypedValue::Boolean(true)),
            "false" => Ok(TypedValue::Boolean(false)),
            "null" => Ok(TypedValue::Null),
            _ => Err(Self::error_at(
                line,
                column,
                ParseErrorReason::UnexpectedToken(word.to_string()),
            )),
        }
    }

    fn parse_array(&mut self) -> Result<TypedValue, ParseError> {
        let (items, fill) = self.parse_delimited(b'[', b']', Self::parse_value)?;
        Ok(TypedValue::Array(Array::from_parts(items, fill)))
    }

    fn parse_mapping(&mut self) -> Result<TypedValue, ParseError> {
        let (entries, fill) = self.parse_delimited(b'{', b'}', Self::parse_map_entry)?;
        for (index, spaced) in entries.iter().enumerate() {
            let key = spaced.item.key();
            if entries[..index].iter().any(|other| other.item.key() == key) {
                return Err(self.error(ParseErrorReason::DuplicateKey(key.to_string())));
            }
        }
        Ok(TypedValue::Mapping(Mapping::from_parts(entries, fill)))
    }

    fn parse_map_entry(&mut self) -> Result<MapEntry, ParseError> {
        let start = self.pos;
        let key = match self.peek() {
            Some(b'"') => {
                let value = self.parse_string()?;
                Lexeme::from_source(value, &self.src[start..self.pos])
            }
            Some(b'&') if self.bytes.get(self.pos + 1) == Some(&b'"') => {
                self.bump();
                let value = self.parse_string()?;
                Lexeme::from_source(value, &self.src[start..self.pos])
            }
            _ => {
                let token = self.eat_while(|b| {
                    b.is_ascii_alphanumeric() || matches!(b, b'_' | b'.' | b'-' | b'+')
                });
                if token.is_empty() {
                    return Err(self.unexpected_here());
                }
                Lexeme::from_source(token.to_string(), token)
            }
        };

        let colon_start = self.pos;
        self.eat_ws();
        if self.peek() != Some(b':') {
            return Err(self.unexpected_here());
        }
        self.bump();
        self.eat_ws();
        let colon = &self.src[colon_start..self.pos];

        let value = self.parse_value()?;
        Ok(MapEntry::from_parts(key, colon, value))
    }

    fn parse_literal(&mut self, name: &'a str) -> Result<TypedValue, ParseError> {
        let (args, fill) = self.parse_delimited(b'(', b')', Self::parse_raw_arg)?;
        Ok(TypedValue::Literal(TypedLiteral::from_parts(name, args, fill)))
    }

    /// Raw text of one constructor argument, stopping before trailing whitespace
    fn parse_raw_arg(&mut self) -> Result<String, ParseError> {
        let (line, column) = (self.line, self.column());
        let start = self.pos;
        let mut closers: Vec<u8> = Vec::new();

        loop {
            match self.peek() {
                None => {
                    return Err(Self::error_at(
                        line,
                        column,
                        ParseErrorReason::UnbalancedDelimiter('('),
                    ));
                }
                Some(b'"') => {
                    self.parse_string()?;
                }
                Some(open @ (b'(' | b'[' | b'{')) => {
                    closers.push(match open {
                        b'(' => b')',
                        b'[' => b']',
                        _ => b'}',
                    });
                    self.bump();
                }
                Some(b',' | b')') if closers.is_empty() => break,
                Some(close @ (b')' | b']' | b'}')) => {
                    if closers.pop() != Some(close) {
                        return Err(self.error(ParseErrorReason::UnbalancedDelimiter(close as char)));
                    }
                    self.bump();
                }
                Some(b) if b.is_ascii_whitespace() && closers.is_empty() => {
                    if matches!(self.peek_past_ws(), None | Some(b',' | b')')) {
                        break;
                    }
                    self.bump();
                }
                Some(_) => self.bump(),
            }
        }

        let raw = &self.src[start..self.pos];
        if raw.is_empty() {
            return Err(self.unexpected_here());
        }
        Ok(raw.to_string())
    }

    /// `open item, item, ... close`, keeping whitespace around every item
    fn parse_delimited<T>(
        &mut self,
        open: u8,
        close: u8,
        mut parse_item: impl FnMut(&mut Self) -> Result<T, ParseError>,
    ) -> Result<(Vec<Spaced<T>>, &'a str), ParseError> {
        let (line, column) = (self.line, self.column());
        let unbalanced = || Self::error_at(line, column, ParseErrorReason::UnbalancedDelimiter(open as char));
        self.bump();

        let mut items = Vec::new();
        loop {
            let before = self.eat_ws();
            match self.peek() {
                None => return Err(unbalanced()),
                Some(b) if b == close && items.is_empty() => {
                    self.bump();
                    return Ok((items, before));
                }
                Some(_) => {}
            }

            let item = parse_item(self)?;
            let after = self.eat_ws();
            items.push(Spaced::new(before, item, after));

            match self.peek() {
                Some(b',') => self.bump(),
                Some(b) if b == close => {
                    self.bump();
                    return Ok((items, ""));
                }
                None => return Err(unbalanced()),
                Some(_) => return Err(self.unexpected_here()),
            }
        }
    }

    fn unexpected_rest_of_line(&mut self) -> ParseError {
        let (line, column) = (self.line, self.column());
        let token = self.rest_of_line().trim().to_string();
        Self::error_at(line, column, ParseErrorReason::UnexpectedToken(token))
    }

    fn unexpected_here(&self) -> ParseError {
        let token = match self.src[self.pos..].chars().next() {
            Some(c) => c.to_string(),
            None => "end of input".to_string(),
        };
        self.error(ParseErrorReason::UnexpectedToken(token))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const GODOT_PROJECT: &str = r#"; Engine configuration file.
; It's best edited using the editor UI and not directly,
; since the parameters that go here are not all obvious.
;
; Format:
;   [section] ; section goes between []
;   param=value ; assign values to parameters

config_version=5

[application]

config/name="Platformer"
config/description="Jump \"high\"
and far"
run/main_scene="res://main.tscn"
config/features=PackedStringArray("4.2", "Forward Plus")
config/icon="res://icon.svg"

[display]

window/size/viewport_width=1280
window/stretch/scale=1.5

[input]

jump={
"deadzone": 0.5,
"events": [Object(InputEventKey,"resource_local_to_scene":false,"resource_name":"","device":-1,"window_id":0,"keycode":0,"physical_keycode":32,"unicode":32,"echo":false,"script":null)
]
}

[rendering]

textures/canvas_textures/default_texture_filter=0
environment/defaults/default_clear_color=Color(0.12, 0.12, 0.15, 1)
anti_aliasing/quality/msaa_2d=1e-05
"#;

    fn parse_err(text: &str) -> ParseError {
        parse(text).unwrap_err()
    }

    #[test]
    fn parse_round_trips_godot_project_file() {
        let doc = parse(GODOT_PROJECT).unwrap();
        assert_eq!(doc.to_text(), GODOT_PROJECT);
    }

    #[test]
    fn parse_classifies_values() {
        let doc = parse(GODOT_PROJECT).unwrap();

        assert_eq!(doc.get("", "config_version").and_then(TypedValue::as_i64), Some(5));
        assert_eq!(
            doc.get("application", "config/description").and_then(TypedValue::as_str),
            Some("Jump \"high\"\nand far")
        );
        assert_eq!(
            doc.get("display", "window/stretch/scale").and_then(TypedValue::as_f64),
            Some(1.5)
        );

        let features = doc
            .get("application", "config/features")
            .and_then(TypedValue::as_literal)
            .unwrap();
        assert_eq!(features.name(), "PackedStringArray");
        assert_eq!(features.string_args(), vec!["4.2", "Forward Plus"]);

        let jump = doc.get("input", "jump").and_then(TypedValue::as_mapping).unwrap();
        assert_eq!(jump.get("deadzone").and_then(TypedValue::as_f64), Some(0.5));
        let events = jump.get("events").and_then(TypedValue::as_array).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(
            events.get(0).and_then(TypedValue::as_literal).map(TypedLiteral::name),
            Some("Object")
        );

        let clear = doc
            .get("rendering", "environment/defaults/default_clear_color")
            .and_then(TypedValue::as_literal)
            .unwrap();
        assert_eq!(clear.args().collect::<Vec<_>>(), vec!["0.12", "0.12", "0.15", "1"]);
    }

    #[rstest]
    #[case("")]
    #[case("\n")]
    #[case("a=1")]
    #[case("a=1\r\nb=2\r\n")]
    #[case("  ; indented comment\n# hash comment\n")]
    #[case("[a]   ; trailing\nk = \"v\"  \n\n\n")]
    #[case("k=[ 1 ,2,\n  3 ]\n")]
    #[case("k=[]\nl=[ ]\nm={}\nn=PackedStringArray()\n")]
    #[case("k={\n\"a\" : [1.0, -2, +3],\n1: true\n}\n")]
    #[case("k=Vector2( 1 , 2 )\n")]
    #[case("k=\"tab\\there\"\n")]
    #[case("k=\"unicode ✓ ünïcödé\"\n")]
    #[case("k=.5\nl=1.\nm=-0.0\nn=2E+3\n")]
    #[case("trailing whitespace=1\n   ")]
    #[case("k=&\"ui_accept\"\n")]
    #[case("k=^\"Player/Sprite2D:position\"\n")]
    #[case("k={\n&\"name\": ^\"../Label\",\n\"script\": null\n}\n")]
    #[case("k=[&\"a\", ^\"b\", null]\n")]
    #[case("k=Object(Node,\"name\":&\"x\",\"path\":^\"y\")\n")]
    #[case("k=null\n")]
    #[case("a=inf\nb=-inf\nc=inf_neg\nd=nan\ne=+inf\n")]
    #[case("k=[inf, -inf, nan]\n")]
    fn parse_then_serialize_is_identity(#[case] text: &str) {
        assert_eq!(parse(text).unwrap().to_text(), text);
    }

    #[test]
    fn unterminated_quote_fails_before_structure_errors() {
        let err = parse_err("[section\nkey = \"unterminated");
        assert_eq!(err.reason, ParseErrorReason::UnterminatedString);
        assert_eq!((err.line, err.column), (2, 7));
    }

    #[test]
    fn quotes_inside_comments_are_ignored() {
        assert!(parse("; it's \"quoted\n[a]\nk=1\n").is_ok());
    }

    #[rstest]
    #[case("[section\nkey=1\n", 1, ParseErrorReason::UnbalancedDelimiter('['))]
    #[case("k=[1, 2\n", 1, ParseErrorReason::UnbalancedDelimiter('['))]
    #[case("k={\n\"a\": 1\n", 1, ParseErrorReason::UnbalancedDelimiter('{'))]
    #[case("k=Vector2(1, 2\n", 1, ParseErrorReason::UnbalancedDelimiter('('))]
    #[case("just some words\n", 1, ParseErrorReason::UnexpectedToken("just some words".to_string()))]
    #[case("k=nil\n", 1, ParseErrorReason::UnexpectedToken("nil".to_string()))]
    #[case("k=&name\n", 1, ParseErrorReason::UnexpectedToken("&".to_string()))]
    #[case("k=-infinity\n", 1, ParseErrorReason::InvalidNumber("-infinity".to_string()))]
    #[case("k=1 2\n", 1, ParseErrorReason::UnexpectedToken("2".to_string()))]
    #[case("k=1.2.3\n", 1, ParseErrorReason::InvalidNumber("1.2.3".to_string()))]
    #[case("k=99999999999999999999\n", 1, ParseErrorReason::InvalidNumber("99999999999999999999".to_string()))]
    #[case("=1\n", 1, ParseErrorReason::MissingKey)]
    #[case("k=\n", 1, ParseErrorReason::MissingValue)]
    #[case("[ ]\n", 1, ParseErrorReason::EmptySectionName)]
    #[case("[a]\nk=1\nk=2\n", 3, ParseErrorReason::DuplicateKey("k".to_string()))]
    #[case("[a]\n[b]\n[a]\n", 3, ParseErrorReason::DuplicateSection("a".to_string()))]
    #[case("k={\"a\": 1, \"a\": 2}\n", 1, ParseErrorReason::DuplicateKey("a".to_string()))]
    fn parse_rejects_malformed_input(
        #[case] text: &str,
        #[case] line: usize,
        #[case] reason: ParseErrorReason,
    ) {
        let err = parse_err(text);
        assert_eq!(err.reason, reason);
        assert_eq!(err.line, line);
    }

    #[test]
    fn parse_classifies_godot_specific_values() {
        let doc = parse(
            "a=&\"ui_accept\"\nb=^\"Player/Sprite2D\"\nc=null\nd=inf\ne=-inf\nf=inf_neg\ng=nan\nh={&\"key\": 1}\n",
        )
        .unwrap();

        let a = doc.get("", "a").unwrap();
        assert_eq!(a.kind(), "string_name");
        assert_eq!(a.as_str(), Some("ui_accept"));
        let b = doc.get("", "b").unwrap();
        assert_eq!(b.kind(), "node_path");
        assert_eq!(b.as_str(), Some("Player/Sprite2D"));
        assert_eq!(doc.get("", "c"), Some(&TypedValue::Null));
        assert_eq!(doc.get("", "d").and_then(TypedValue::as_f64), Some(f64::INFINITY));
        assert_eq!(doc.get("", "e").and_then(TypedValue::as_f64), Some(f64::NEG_INFINITY));
        assert_eq!(doc.get("", "f").and_then(TypedValue::as_f64), Some(f64::NEG_INFINITY));
        assert!(doc.get("", "g").and_then(TypedValue::as_f64).is_some_and(f64::is_nan));

        let h = doc.get("", "h").and_then(TypedValue::as_mapping).unwrap();
        assert_eq!(h.get("key").and_then(TypedValue::as_i64), Some(1));
    }

    #[test]
    fn same_key_in_different_sections_is_allowed() {
        let doc = parse("k=0\n[a]\nk=1\n[b]\nk=2\n").unwrap();
        assert_eq!(doc.get("b", "k").and_then(TypedValue::as_i64), Some(2));
    }

    #[test]
    fn decode_string_literal_requires_a_whole_quoted_lexeme() {
        assert_eq!(decode_string_literal(r#""a\"b""#).as_deref(), Some("a\"b"));
        assert_eq!(decode_string_literal(r#""a" x"#), None);
        assert_eq!(decode_string_literal("4.2"), None);
    }
}
