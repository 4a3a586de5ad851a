//! Pull-based tokenizer for KV3 text.
//!
//! [`Lexer`] walks the input once, yielding one [`Token`] per call to
//! `next()`. Nothing is buffered beyond the current token, so memory use does
//! not grow with the size of the input. Comments are returned as tokens so the
//! parser can attach them to the key that follows.
//!
//! ```rust
//! use keyvalues3::text::{Lexer, TokenKind};
//!
//! let kinds: Vec<_> = Lexer::new("{ a = 1 }")
//!     .map(|token| token.map(|t| t.kind))
//!     .collect::<Result<_, _>>()
//!     .unwrap();
//! assert_eq!(kinds, vec![
//!     TokenKind::LeftBrace,
//!     TokenKind::Identifier("a"),
//!     TokenKind::Equals,
//!     TokenKind::Int(1),
//!     TokenKind::RightBrace,
//!     TokenKind::Eof,
//! ]);
//! ```

use crate::{Error, Result};
use std::borrow::Cow;
use std::fmt;

/// A location in text input. Lines and columns start at 1; `offset` is a byte offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub line: usize,
    pub column: usize,
    pub offset: usize,
}

impl Position {
    #[must_use]
    pub const fn new(line: usize, column: usize, offset: usize) -> Self {
        Position {
            line,
            column,
            offset,
        }
    }
}

impl Default for Position {
    fn default() -> Self {
        Position::new(1, 1, 0)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind<'a> {
    LeftBrace,
    RightBrace,
    LeftBracket,
    RightBracket,
    Equals,
    Comma,
    Colon,
    Pipe,
    /// Contents of a `<!-- ... -->` header, trimmed
    Header(&'a str),
    Identifier(&'a str),
    String(Cow<'a, str>),
    /// Verbatim contents of a `"""` block
    MultilineString(&'a str),
    Int(i64),
    UInt(u64),
    Double(f64),
    Blob(Vec<u8>),
    LineComment(&'a str),
    BlockComment(&'a str),
    Eof,
}

impl TokenKind<'_> {
    /// Short human-readable description, used in parse errors.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            TokenKind::LeftBrace => "'{'".to_string(),
            TokenKind::RightBrace => "'}'".to_string(),
            TokenKind::LeftBracket => "'['".to_string(),
            TokenKind::RightBracket => "']'".to_string(),
            TokenKind::Equals => "'='".to_string(),
            TokenKind::Comma => "','".to_string(),
            TokenKind::Colon => "':'".to_string(),
            TokenKind::Pipe => "'|'".to_string(),
            TokenKind::Header(_) => "header".to_string(),
            TokenKind::Identifier(name) => format!("identifier '{}'", name),
            TokenKind::String(s) => format!("string {:?}", s),
            TokenKind::MultilineString(_) => "multi-line string".to_string(),
            TokenKind::Int(i) => format!("integer {}", i),
            TokenKind::UInt(u) => format!("integer {}", u),
            TokenKind::Double(d) => format!("number {}", d),
            TokenKind::Blob(_) => "binary blob".to_string(),
            TokenKind::LineComment(_) | TokenKind::BlockComment(_) => "comment".to_string(),
            TokenKind::Eof => "end of input".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token<'a> {
    pub kind: TokenKind<'a>,
    pub position: Position,
}

/// Tokenizer over a borrowed `&str`.
///
/// The iterator ends after yielding [`TokenKind::Eof`] or the first error.
/// Call [`Lexer::reset`] to start again from the beginning of the input.
#[derive(Debug, Clone)]
pub struct Lexer<'a> {
    input: &'a str,
    offset: usize,
    line: usize,
    column: usize,
    finished: bool,
}

pub(crate) fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

pub(crate) fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '.'
}

impl<'a> Lexer<'a> {
    #[must_use]
    pub fn new(input: &'a str) -> Self {
        Lexer {
            input,
            offset: 0,
            line: 1,
            column: 1,
            finished: false,
        }
    }

    /// Rewinds to the start of the input.
    pub fn reset(&mut self) {
        *self = Lexer::new(self.input);
    }

    /// Where the next token will start.
    #[must_use]
    pub fn current_position(&self) -> Position {
        Position::new(self.line, self.column, self.offset)
    }

    fn rest(&self) -> &'a str {
        &self.input[self.offset..]
    }

    fn peek_char(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn peek_char_at(&self, n: usize) -> Option<char> {
        self.rest().chars().nth(n)
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek_char()?;
        self.offset += c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn bump_str(&mut self, s: &str) {
        for _ in s.chars() {
            self.bump();
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek_char() {
            if c.is_whitespace() || c == '\u{feff}' {
                self.bump();
            } else {
                break;
            }
        }
    }

    /// Consumes input up to and including `terminator`, returning the text before it.
    fn take_until(&mut self, terminator: &str, start: Position, what: &str) -> Result<&'a str> {
        let rest = self.rest();
        match rest.find(terminator) {
            Some(end) => {
                let body = &rest[..end];
                self.bump_str(body);
                self.bump_str(terminator);
                Ok(body)
            }
            None => Err(Error::lex(start, &format!("unterminated {}", what))),
        }
    }

    fn lex_token(&mut self) -> Result<Token<'a>> {
        self.skip_whitespace();
        let start = self.current_position();
        let rest = self.rest();

        let Some(c) = self.peek_char() else {
            return Ok(Token {
                kind: TokenKind::Eof,
                position: start,
            });
        };

        let punct = match c {
            '{' => Some(TokenKind::LeftBrace),
            '}' => Some(TokenKind::RightBrace),
            '[' => Some(TokenKind::LeftBracket),
            ']' => Some(TokenKind::RightBracket),
            '=' => Some(TokenKind::Equals),
            ',' => Some(TokenKind::Comma),
            ':' => Some(TokenKind::Colon),
            '|' => Some(TokenKind::Pipe),
            _ => None,
        };
        if let Some(kind) = punct {
            self.bump();
            return Ok(Token {
                kind,
                position: start,
            });
        }

        let kind = if rest.starts_with("<!--") {
            self.bump_str("<!--");
            TokenKind::Header(self.take_until("-->", start, "header")?.trim())
        } else if rest.starts_with("//") {
            self.bump_str("//");
            let line = self.rest();
            let end = line.find('\n').unwrap_or(line.len());
            let text = &line[..end];
            self.bump_str(text);
            TokenKind::LineComment(text.strip_suffix('\r').unwrap_or(text))
        } else if rest.starts_with("/*") {
            self.bump_str("/*");
            TokenKind::BlockComment(self.take_until("*/", start, "block comment")?)
        } else if rest.starts_with("\"\"\"") {
            self.lex_multiline(start)?
        } else if c == '"' {
            self.lex_string(start)?
        } else if rest.starts_with("#[") {
            self.lex_blob(start)?
        } else if c.is_ascii_digit()
            || ((c == '-' || c == '+' || c == '.')
                && self
                    .peek_char_at(1)
                    .is_some_and(|n| n.is_ascii_alphanumeric() || n == '.'))
        {
            self.lex_number(start)?
        } else if is_ident_start(c) {
            let end = rest
                .find(|ch: char| !is_ident_char(ch))
                .unwrap_or(rest.len());
            let ident = &rest[..end];
            self.bump_str(ident);
            TokenKind::Identifier(ident)
        } else {
            return Err(Error::lex(start, &format!("unexpected character {:?}", c)));
        };

        Ok(Token {
            kind,
            position: start,
        })
    }

    fn lex_multiline(&mut self, start: Position) -> Result<TokenKind<'a>> {
        self.bump_str("\"\"\"");
        if self.rest().starts_with("\r\n") {
            self.bump_str("\r\n");
        } else if self.rest().starts_with('\n') {
            self.bump();
        } else {
            return Err(Error::lex(
                start,
                "multi-line string must start with a newline after '\"\"\"'",
            ));
        }
        let body = self.take_until("\"\"\"", start, "multi-line string")?;
        Ok(TokenKind::MultilineString(body))
    }

    fn lex_string(&mut self, start: Position) -> Result<TokenKind<'a>> {
        self.bump();
        let body_start = self.offset;
        let mut owned: Option<String> = None;

        loop {
            let here = self.current_position();
            let c = self
                .bump()
                .ok_or_else(|| Error::lex(start, "unterminated string"))?;
            match c {
                '"' => break,
                '\\' => {
                    let buf = owned.get_or_insert_with(|| {
                        self.input[body_start..here.offset].to_string()
                    });
                    let escaped = self
                        .bump()
                        .ok_or_else(|| Error::lex(start, "unterminated string"))?;
                    let ch = match escaped {
                        '\\' => '\\',
                        '"' => '"',
                        '\'' => '\'',
                        '/' => '/',
                        'n' => '\n',
                        'r' => '\r',
                        't' => '\t',
                        'b' => '\u{08}',
                        'f' => '\u{0c}',
                        'v' => '\u{0b}',
                        'a' => '\u{07}',
                        '0' => '\0',
                        'u' => self.lex_unicode_escape(here)?,
                        other => {
                            return Err(Error::lex(
                                here,
                                &format!("illegal escape sequence '\\{}'", other),
                            ))
                        }
                    };
                    buf.push(ch);
                }
                other => {
                    if let Some(buf) = owned.as_mut() {
                        buf.push(other);
                    }
                }
            }
        }

        Ok(match owned {
            Some(s) => TokenKind::String(Cow::Owned(s)),
            None => TokenKind::String(Cow::Borrowed(&self.input[body_start..self.offset - 1])),
        })
    }

    fn lex_unicode_escape(&mut self, at: Position) -> Result<char> {
        let rest = self.rest();
        let digits = rest.get(..4).filter(|d| d.chars().all(|c| c.is_ascii_hexdigit()));
        let digits = digits.ok_or_else(|| Error::lex(at, "'\\u' must be followed by 4 hex digits"))?;
        let code = u32::from_str_radix(digits, 16)
            .map_err(|_| Error::lex(at, "invalid unicode escape"))?;
        self.bump_str(digits);
        char::from_u32(code).ok_or_else(|| Error::lex(at, "unicode escape is not a valid character"))
    }

    fn lex_blob(&mut self, start: Position) -> Result<TokenKind<'a>> {
        self.bump_str("#[");
        let body = self.take_until("]", start, "binary blob")?;
        let digits: Vec<u8> = body
            .bytes()
            .filter(|b| !b.is_ascii_whitespace())
            .collect();
        if let Some(bad) = digits.iter().find(|b| !b.is_ascii_hexdigit()) {
            return Err(Error::lex(
                start,
                &format!("invalid character {:?} in binary blob", *bad as char),
            ));
        }
        if digits.len() % 2 != 0 {
            return Err(Error::lex(start, "binary blob has an odd number of hex digits"));
        }
        let bytes = digits
            .chunks(2)
            .map(|pair| (hex_value(pair[0]) << 4) | hex_value(pair[1]))
            .collect();
        Ok(TokenKind::Blob(bytes))
    }

    fn lex_number(&mut self, start: Position) -> Result<TokenKind<'a>> {
        let rest = self.rest();
        let bytes = rest.as_bytes();
        let mut i = 0;
        if matches!(bytes.first(), Some(b'-' | b'+')) {
            i += 1;
        }

        // Signed specials: -inf, +nan
        if bytes.get(i).is_some_and(u8::is_ascii_alphabetic) {
            let end = rest[i..]
                .find(|ch: char| !is_ident_char(ch))
                .map_or(rest.len(), |e| e + i);
            let word = &rest[i..end];
            let magnitude = if word.eq_ignore_ascii_case("inf") {
                f64::INFINITY
            } else if word.eq_ignore_ascii_case("nan") {
                f64::NAN
            } else {
                return Err(Error::lex(start, &format!("invalid number '{}'", &rest[..end])));
            };
            self.bump_str(&rest[..end]);
            let value = if bytes[0] == b'-' { -magnitude } else { magnitude };
            return Ok(TokenKind::Double(value));
        }

        let digits_from = |mut j: usize| {
            while bytes.get(j).is_some_and(u8::is_ascii_digit) {
                j += 1;
            }
            j
        };

        let int_end = digits_from(i);
        let mut end = int_end;
        let mut is_float = false;
        if bytes.get(end) == Some(&b'.') {
            is_float = true;
            end = digits_from(end + 1);
        }
        if end == i || (end == i + 1 && is_float && int_end == i) {
            return Err(Error::lex(start, "invalid number"));
        }
        if matches!(bytes.get(end), Some(b'e' | b'E')) {
            let mut j = end + 1;
            if matches!(bytes.get(j), Some(b'-' | b'+')) {
                j += 1;
            }
            let exp_end = digits_from(j);
            if exp_end == j {
                return Err(Error::lex(start, "invalid number: missing exponent digits"));
            }
            is_float = true;
            end = exp_end;
        }

        let text = &rest[..end];
        if rest[end..].chars().next().is_some_and(is_ident_char) {
            let bad_end = rest[end..]
                .find(|ch: char| !is_ident_char(ch))
                .map_or(rest.len(), |e| e + end);
            return Err(Error::lex(
                start,
                &format!("invalid number '{}'", &rest[..bad_end]),
            ));
        }
        self.bump_str(text);

        if is_float {
            return text
                .parse::<f64>()
                .map(TokenKind::Double)
                .map_err(|_| Error::lex(start, &format!("invalid number '{}'", text)));
        }
        let unsigned = text.strip_prefix('+').unwrap_or(text);
        if let Ok(i) = unsigned.parse::<i64>() {
            return Ok(TokenKind::Int(i));
        }
        unsigned
            .parse::<u64>()
            .map(TokenKind::UInt)
            .map_err(|_| Error::lex(start, &format!("integer '{}' is out of range", text)))
    }
}

fn hex_value(digit: u8) -> u8 {
    match digit {
        b'0'..=b'9' => digit - b'0',
        b'a'..=b'f' => digit - b'a' + 10,
        _ => digit - b'A' + 10,
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Result<Token<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        let token = self.lex_token();
        match &token {
            Ok(Token {
                kind: TokenKind::Eof,
                ..
            })
            | Err(_) => self.finished = true,
            Ok(_) => {}
        }
        Some(token)
    }
}
