//! Parser and serializer for the list literals found in `setup.py`:
//! square brackets around quoted strings, separated by commas.

use crate::error::{ListParseError, ListParseErrorKind};
use std::iter::Peekable;
use std::str::CharIndices;

struct Cursor<'a> {
    source: &'a str,
    chars: Peekable<CharIndices<'a>>,
}

impl<'a> Cursor<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            chars: source.char_indices().peekable(),
        }
    }

    fn offset(&mut self) -> usize {
        self.chars
            .peek()
            .map_or(self.source.len(), |(offset, _)| *offset)
    }

    fn error(&mut self, kind: ListParseErrorKind) -> ListParseError {
        ListParseError {
            offset: self.offset(),
            kind,
        }
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().map(|(_, c)| *c)
    }

    fn bump(&mut self) -> Option<char> {
        self.chars.next().map(|(_, c)| c)
    }

    /// Whitespace, newlines and `#` comments.
    fn skip_trivia(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.bump();
            } else if c == '#' {
                while let Some(c) = self.bump() {
                    if c == '\n' {
                        break;
                    }
                }
            } else {
                break;
            }
        }
    }

    fn string(&mut self) -> Result<String, ListParseError> {
        let quote = match self.peek() {
            Some(q @ ('"' | '\'')) => q,
            _ => return Err(self.error(ListParseErrorKind::ExpectedString)),
        };
        let start = self.offset();
        self.bump();

        let mut value = String::new();
        loop {
            match self.bump() {
                Some(c) if c == quote => return Ok(value),
                Some('\\') => match self.bump() {
                    Some('n') => value.push('\n'),
                    Some('t') => value.push('\t'),
                    Some(c @ ('\\' | '\'' | '"')) => value.push(c),
                    Some(other) => {
                        value.push('\\');
                        value.push(other);
                    }
                    None => break,
                },
                Some('\n') | None => break,
                Some(c) => value.push(c),
            }
        }
        Err(ListParseError {
            offset: start,
            kind: ListParseErrorKind::UnterminatedString,
        })
    }
}

/// Parse a bracketed list of quoted strings.
///
/// Accepts single or double quotes, a trailing comma, and comments between elements.
pub fn parse_string_list(literal: &str) -> Result<Vec<String>, ListParseError> {
    let mut cursor = Cursor::new(literal);
    cursor.skip_trivia();
    if cursor.bump() != Some('[') {
        return Err(ListParseError {
            offset: 0,
            kind: ListParseErrorKind::ExpectedOpenBracket,
        });
    }

    let mut items = Vec::new();
    loop {
        cursor.skip_trivia();
        match cursor.peek() {
            Some(']') => {
                cursor.bump();
                break;
            }
            None => return Err(cursor.error(ListParseErrorKind::UnterminatedList)),
            _ => {}
        }

        items.push(cursor.string()?);

        cursor.skip_trivia();
        match cursor.peek() {
            Some(',') => {
                cursor.bump();
            }
            Some(']') => {
                cursor.bump();
                break;
            }
            None => return Err(cursor.error(ListParseErrorKind::UnterminatedList)),
            Some(_) => return Err(cursor.error(ListParseErrorKind::ExpectedCommaOrClose)),
        }
    }

    cursor.skip_trivia();
    if cursor.peek().is_some() {
        return Err(cursor.error(ListParseErrorKind::TrailingInput));
    }
    Ok(items)
}

/// Render `items` one per line with a four-space indent, `[]` when empty.
///
/// Keep the indent in sync with `indent_size` in the repositories' `.editorconfig`.
pub fn serialize_string_list<S: AsRef<str>>(items: &[S]) -> String {
    if items.is_empty() {
        return "[]".to_string();
    }
    let body: Vec<String> = items
        .iter()
        .map(|item| format!("    {}", serde_json::Value::from(item.as_ref())))
        .collect();
    format!("[\n{}\n]", body.join(",\n"))
}

/// Package name of a requirement specifier: everything before the first
/// version operator, marker separator, or whitespace.
///
/// `"pytest-cov>=2.0"` → `"pytest-cov"`, `"invenio-db[postgresql]~=1.0"` → `"invenio-db[postgresql]"`.
pub fn requirement_name(specifier: &str) -> &str {
    let specifier = specifier.trim_start();
    let end = specifier
        .find(|c: char| matches!(c, '<' | '>' | '=' | '!' | '~' | ';') || c.is_whitespace())
        .unwrap_or(specifier.len());
    &specifier[..end]
}
