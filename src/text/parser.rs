//! Recursive-descent parser turning [`Lexer`] tokens into a [`Document`].

use super::lexer::{Lexer, Position, Token, TokenKind};
use crate::registry::{self, Encoding, Format};
use crate::value::{Comment, Flag, Flags};
use crate::{Document, Error, KvMap, Result, Value};
use std::fmt;
use tracing::{debug, warn};
use uuid::Uuid;

const MAX_DEPTH: usize = 512;

/// A non-fatal problem found while parsing.
#[derive(Debug, Clone, PartialEq)]
pub enum Warning {
    /// A key appeared twice in one object; the later value was kept.
    DuplicateKey { key: String, position: Position },
    /// Comments before an array element, a closing bracket or the end of
    /// input had no key to attach to and were dropped.
    DiscardedComments { count: usize, position: Position },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::DuplicateKey { key, position } => {
                write!(f, "duplicate key {:?} at {}", key, position)
            }
            Warning::DiscardedComments { count, position } => {
                write!(f, "{} comment(s) before {} discarded", count, position)
            }
        }
    }
}

/// Text parser over a borrowed input.
///
/// # Examples
///
/// ```rust
/// use keyvalues3::text::{Parser, Warning};
///
/// let mut parser = Parser::new("{ a = 1, b = 2, a = 3 }");
/// let doc = parser.parse_document().unwrap();
/// assert_eq!(doc.value["a"], 3);
/// assert!(matches!(parser.warnings(), [Warning::DuplicateKey { key, .. }] if key == "a"));
/// ```
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    peeked: Option<Token<'a>>,
    comments: Vec<Comment>,
    warnings: Vec<Warning>,
    depth: usize,
}

impl<'a> Parser<'a> {
    #[must_use]
    pub fn new(input: &'a str) -> Self {
        Parser {
            lexer: Lexer::new(input),
            peeked: None,
            comments: Vec::new(),
            warnings: Vec::new(),
            depth: 0,
        }
    }

    /// Warnings collected so far.
    #[must_use]
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    /// Parses an optional header, one root value and the end of input.
    ///
    /// # Errors
    ///
    /// Returns a lex or parse error for malformed input, and
    /// [`Error::UnknownEncoding`] / [`Error::UnsupportedEncoding`] when the
    /// header names an encoding that is not a known text encoding.
    pub fn parse_document(&mut self) -> Result<Document> {
        let header = match self.peek()? {
            Token {
                kind: TokenKind::Header(text),
                position,
            } => Some((*text, *position)),
            _ => None,
        };

        let (encoding, format) = match header {
            Some((text, position)) => {
                self.advance()?;
                parse_header(text, position)?
            }
            None => (Encoding::TEXT_HEADERLESS, Format::GENERIC),
        };

        self.peek()?;
        let comments = std::mem::take(&mut self.comments);
        let value = self.parse_value()?;

        let token = self.advance()?;
        if token.kind != TokenKind::Eof {
            return Err(Error::parse(
                token.position,
                "end of input",
                &token.kind.describe(),
            ));
        }
        self.discard_comments(token.position);

        Ok(Document {
            value,
            format,
            original_encoding: Some(encoding),
            comments,
        })
    }

    fn fill(&mut self) -> Result<()> {
        while self.peeked.is_none() {
            let token = match self.lexer.next() {
                Some(token) => token?,
                None => Token {
                    kind: TokenKind::Eof,
                    position: self.lexer.current_position(),
                },
            };
            match token.kind {
                TokenKind::LineComment(text) => self.comments.push(Comment::Line(text.to_string())),
                TokenKind::BlockComment(text) => {
                    self.comments.push(Comment::Block(text.to_string()));
                }
                _ => self.peeked = Some(token),
            }
        }
        Ok(())
    }

    /// Next non-comment token. Comments passed over are buffered.
    fn peek(&mut self) -> Result<&Token<'a>> {
        self.fill()?;
        match &self.peeked {
            Some(token) => Ok(token),
            None => unreachable!("fill always leaves a token"),
        }
    }

    fn advance(&mut self) -> Result<Token<'a>> {
        self.fill()?;
        match self.peeked.take() {
            Some(token) => Ok(token),
            None => unreachable!("fill always leaves a token"),
        }
    }

    fn discard_comments(&mut self, position: Position) {
        if self.comments.is_empty() {
            return;
        }
        let count = self.comments.len();
        debug!(count, position = %position, "discarding comments with no key to attach to");
        self.warnings.push(Warning::DiscardedComments { count, position });
        self.comments.clear();
    }

    fn enter(&mut self, position: Position) -> Result<()> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(Error::parse(
                position,
                &format!("at most {} levels of nesting", MAX_DEPTH),
                "deeper nesting",
            ));
        }
        Ok(())
    }

    fn parse_value(&mut self) -> Result<Value> {
        let token = self.advance()?;
        let position = token.position;
        match token.kind {
            TokenKind::LeftBrace => self.parse_object(position),
            TokenKind::LeftBracket => self.parse_array(position),
            TokenKind::String(s) => Ok(Value::String(s.into_owned())),
            TokenKind::MultilineString(s) => Ok(Value::multiline(s)),
            TokenKind::Int(i) => Ok(Value::Int64(i)),
            TokenKind::UInt(u) => Ok(Value::UInt64(u)),
            TokenKind::Double(d) => Ok(Value::Double(d)),
            TokenKind::Blob(bytes) => Ok(Value::Blob(bytes)),
            TokenKind::Identifier(name) => self.parse_identifier(name, position),
            other => Err(Error::parse(position, "value", &other.describe())),
        }
    }

    /// Keyword literal, or the start of a `flag|flag:value` prefix.
    fn parse_identifier(&mut self, name: &'a str, position: Position) -> Result<Value> {
        if matches!(self.peek()?.kind, TokenKind::Colon | TokenKind::Pipe) {
            let mut flags = Flags::new();
            flags.insert(Flag::from_name(name));
            loop {
                let token = self.advance()?;
                match token.kind {
                    TokenKind::Colon => break,
                    TokenKind::Pipe => {
                        let next = self.advance()?;
                        match next.kind {
                            TokenKind::Identifier(flag) => {
                                flags.insert(Flag::from_name(flag));
                            }
                            other => {
                                return Err(Error::parse(
                                    next.position,
                                    "flag name",
                                    &other.describe(),
                                ))
                            }
                        }
                    }
                    other => {
                        return Err(Error::parse(token.position, "':' or '|'", &other.describe()))
                    }
                }
            }
            let value = self.parse_value()?;
            return Ok(Value::flagged(flags, value));
        }

        match name {
            "null" => Ok(Value::Null),
            "true" => Ok(Value::Bool(true)),
            "false" => Ok(Value::Bool(false)),
            _ if name.eq_ignore_ascii_case("inf") => Ok(Value::Double(f64::INFINITY)),
            _ if name.eq_ignore_ascii_case("nan") => Ok(Value::Double(f64::NAN)),
            _ => Err(Error::parse(
                position,
                "value",
                &format!("identifier '{}'", name),
            )),
        }
    }

    fn parse_object(&mut self, position: Position) -> Result<Value> {
        self.enter(position)?;
        let mut map = KvMap::new();

        loop {
            let token = self.advance()?;
            let key = match token.kind {
                TokenKind::RightBrace => {
                    self.discard_comments(token.position);
                    break;
                }
                TokenKind::Identifier(name) => name.to_string(),
                TokenKind::String(s) => s.into_owned(),
                other => {
                    return Err(Error::parse(
                        token.position,
                        "key or '}'",
                        &other.describe(),
                    ))
                }
            };
            let comments = std::mem::take(&mut self.comments);

            let equals = self.advance()?;
            if equals.kind != TokenKind::Equals {
                return Err(Error::parse(
                    equals.position,
                    "'='",
                    &equals.kind.describe(),
                ));
            }
            let value = self.parse_value()?;

            if map.contains_key(&key) {
                warn!(key = %key, position = %token.position, "duplicate key, keeping last value");
                self.warnings.push(Warning::DuplicateKey {
                    key: key.clone(),
                    position: token.position,
                });
            }
            map.insert(key.clone(), value);
            map.set_comments(&key, comments);

            // Entries may be separated by commas or just whitespace.
            if self.peek()?.kind == TokenKind::Comma {
                self.advance()?;
            }
        }

        self.depth -= 1;
        Ok(Value::Object(map))
    }

    fn parse_array(&mut self, position: Position) -> Result<Value> {
        self.enter(position)?;
        let mut items = Vec::new();

        loop {
            let next = self.peek()?;
            let (closing, position) = (next.kind == TokenKind::RightBracket, next.position);
            self.discard_comments(position);
            if closing {
                self.advance()?;
                break;
            }
            items.push(self.parse_value()?);

            let token = self.advance()?;
            match token.kind {
                TokenKind::Comma => {}
                TokenKind::RightBracket => {
                    self.discard_comments(token.position);
                    break;
                }
                other => {
                    return Err(Error::parse(
                        token.position,
                        "',' or ']'",
                        &other.describe(),
                    ))
                }
            }
        }

        self.depth -= 1;
        Ok(Value::Array(items))
    }
}

/// Parses `kv3 encoding:<name>:version{<uuid>} format:<name>:version{<uuid>}`.
fn parse_header(text: &str, position: Position) -> Result<(Encoding, Format)> {
    let mut parts = text.split_whitespace();
    if parts.next() != Some("kv3") {
        return Err(Error::parse(position, "'kv3' header", &format!("{:?}", text)));
    }
    let encoding_part = parts.next().unwrap_or_default();
    let format_part = parts.next().unwrap_or_default();
    if let Some(extra) = parts.next() {
        return Err(Error::parse(position, "'-->'", &format!("{:?}", extra)));
    }

    let (name, version) = parse_header_item(encoding_part, "encoding", position)?;
    let known = registry::encoding_by_uuid(version)?;
    if !known.kind.is_text() {
        return Err(Error::UnsupportedEncoding(format!(
            "{} is not a text encoding",
            known.encoding.name
        )));
    }
    let encoding = Encoding::new(name, version)
        .map_err(|_| Error::parse(position, "encoding name", &format!("{:?}", name)))?;

    let (name, version) = parse_header_item(format_part, "format", position)?;
    let format = Format::new(name, version)
        .map_err(|_| Error::parse(position, "format name", &format!("{:?}", name)))?;

    Ok((encoding, format))
}

fn parse_header_item<'h>(item: &'h str, what: &str, position: Position) -> Result<(&'h str, Uuid)> {
    let malformed = || {
        Error::parse(
            position,
            &format!("{}:<name>:version{{<uuid>}}", what),
            &format!("{:?}", item),
        )
    };
    let rest = item
        .strip_prefix(what)
        .and_then(|rest| rest.strip_prefix(':'))
        .ok_or_else(malformed)?;
    let (name, version) = rest.split_once(":version{").ok_or_else(malformed)?;
    let version = version.strip_suffix('}').ok_or_else(malformed)?;
    let version = Uuid::parse_str(version).map_err(|_| malformed())?;
    Ok((name, version))
}
