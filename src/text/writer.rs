//! Canonical KV3 text writer.
//!
//! Output layout:
//!
//! - objects open with `{`, put one `key = value` per line one tab deeper, and close with `}`
//! - arrays of at most [`TextOptions::max_inline_array`] scalars stay on one line as `[ 1, 2, 3 ]`
//! - longer or nested arrays put one element per line, each followed by `,`
//! - an object or multi-line array that is a key's value starts on the line after the key
//!
//! ```rust
//! use keyvalues3::kv3;
//! use keyvalues3::text::Writer;
//! use keyvalues3::TextOptions;
//!
//! let value = kv3!({ "key": [1, 2, 3] });
//! let text = Writer::new(&TextOptions::new()).write_document((&value).into(), None).unwrap();
//! assert_eq!(text, "{\n\tkey = [ 1, 2, 3 ]\n}\n");
//! ```

use crate::document::DocumentRef;
use crate::registry::Header;
use crate::value::{Comment, Flag, Flags};
use crate::{Error, KvMap, Result, TextOptions, Value};
use std::fmt::Write as _;

use super::lexer::{is_ident_char, is_ident_start};

/// Renders values as KV3 text.
pub struct Writer<'o> {
    output: String,
    options: &'o TextOptions,
    indent_level: usize,
}

impl<'o> Writer<'o> {
    #[must_use]
    pub fn new(options: &'o TextOptions) -> Self {
        Writer {
            output: String::with_capacity(256),
            options,
            indent_level: 0,
        }
    }

    /// Writes `header` (when given), the document comments (when enabled),
    /// the root value and a final newline.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidValue`] for a flag whose name cannot be
    /// written as an identifier.
    pub fn write_document(mut self, doc: DocumentRef<'_>, header: Option<&Header>) -> Result<String> {
        if let Some(header) = header {
            let _ = writeln!(self.output, "{}", header);
        }
        if self.options.comments {
            self.write_comments(doc.comments);
        }
        self.write_value(doc.value)?;
        self.output.push('\n');
        Ok(self.output)
    }

    fn write_indent(&mut self) {
        for _ in 0..self.indent_level {
            self.output.push('\t');
        }
    }

    fn write_comments(&mut self, comments: &[Comment]) {
        for comment in comments {
            self.write_indent();
            let _ = writeln!(self.output, "{}", comment);
        }
    }

    fn write_value(&mut self, value: &Value) -> Result<()> {
        if !value.is_flagged() {
            return self.write_unflagged(value);
        }

        let mut flags = value.flags();
        let inner = value.unflagged();
        if flags.contains(&Flag::MultilineString) {
            if let Value::String(s) = inner {
                if !s.contains("\"\"\"") && !s.ends_with('"') {
                    flags.remove(&Flag::MultilineString);
                    self.write_flags(&flags)?;
                    self.output.push_str("\"\"\"\n");
                    self.output.push_str(s);
                    self.output.push_str("\"\"\"");
                    return Ok(());
                }
            }
        }
        self.write_flags(&flags)?;
        self.write_unflagged(inner)
    }

    fn write_flags(&mut self, flags: &Flags) -> Result<()> {
        if flags.is_empty() {
            return Ok(());
        }
        for flag in flags.iter() {
            let name = flag.name();
            let valid = name.chars().next().is_some_and(is_ident_start)
                && name.chars().all(is_ident_char);
            if !valid {
                return Err(Error::InvalidValue(format!(
                    "flag {:?} is not a valid identifier",
                    name
                )));
            }
        }
        let _ = write!(self.output, "{}:", flags);
        Ok(())
    }

    fn write_unflagged(&mut self, value: &Value) -> Result<()> {
        match value {
            Value::Null => self.output.push_str("null"),
            Value::Bool(b) => self.output.push_str(if *b { "true" } else { "false" }),
            Value::Int32(i) => {
                let _ = write!(self.output, "{}", i);
            }
            Value::UInt32(u) => {
                let _ = write!(self.output, "{}", u);
            }
            Value::Int64(i) => {
                let _ = write!(self.output, "{}", i);
            }
            Value::UInt64(u) => {
                let _ = write!(self.output, "{}", u);
            }
            Value::Double(d) => self.write_double(*d),
            Value::String(s) => self.write_string(s),
            Value::Blob(bytes) => {
                self.output.push_str("#[");
                for (i, byte) in bytes.iter().enumerate() {
                    if i > 0 {
                        self.output.push(' ');
                    }
                    let _ = write!(self.output, "{:02x}", byte);
                }
                self.output.push(']');
            }
            Value::Array(items) => self.write_array(items)?,
            Value::Object(map) => self.write_object(map)?,
            Value::Flagged { .. } => self.write_value(value)?,
        }
        Ok(())
    }

    /// Shortest form that reads back as the same double.
    fn write_double(&mut self, d: f64) {
        if d.is_nan() {
            self.output.push_str(if d.is_sign_negative() { "-nan" } else { "nan" });
        } else if d.is_infinite() {
            self.output.push_str(if d > 0.0 { "inf" } else { "-inf" });
        } else {
            let _ = write!(self.output, "{:?}", d);
        }
    }

    fn write_string(&mut self, s: &str) {
        self.output.push('"');
        for ch in s.chars() {
            match ch {
                '"' => self.output.push_str("\\\""),
                '\\' => self.output.push_str("\\\\"),
                '\n' => self.output.push_str("\\n"),
                '\r' => self.output.push_str("\\r"),
                '\t' => self.output.push_str("\\t"),
                c if c.is_control() => {
                    let _ = write!(self.output, "\\u{:04x}", c as u32);
                }
                c => self.output.push(c),
            }
        }
        self.output.push('"');
    }

    fn write_key(&mut self, key: &str) {
        let bare = key.chars().next().is_some_and(is_ident_start)
            && key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
        if bare {
            self.output.push_str(key);
        } else {
            self.write_string(key);
        }
    }

    /// Objects and multi-line arrays start on their own line when they are a key's value.
    fn is_block(&self, value: &Value) -> bool {
        match value {
            Value::Object(_) => true,
            Value::Array(items) => !self.fits_inline(items),
            _ => false,
        }
    }

    fn fits_inline(&self, items: &[Value]) -> bool {
        items.len() <= self.options.max_inline_array
            && items.iter().all(|item| {
                !matches!(item.unflagged(), Value::Array(_) | Value::Object(_))
                    && !(item.has_flag(&Flag::MultilineString) && item.is_string())
            })
    }

    fn write_array(&mut self, items: &[Value]) -> Result<()> {
        if items.is_empty() {
            self.output.push_str("[]");
            return Ok(());
        }

        if self.fits_inline(items) {
            self.output.push_str("[ ");
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    self.output.push_str(", ");
                }
                self.write_value(item)?;
            }
            self.output.push_str(" ]");
            return Ok(());
        }

        self.output.push_str("[\n");
        self.indent_level += 1;
        for item in items {
            self.write_indent();
            self.write_value(item)?;
            self.output.push_str(",\n");
        }
        self.indent_level -= 1;
        self.write_indent();
        self.output.push(']');
        Ok(())
    }

    fn write_object(&mut self, map: &KvMap) -> Result<()> {
        self.output.push_str("{\n");
        self.indent_level += 1;
        for (key, value) in map.iter() {
            if self.options.comments {
                self.write_comments(map.comments(key));
            }
            self.write_indent();
            self.write_key(key);
            self.output.push_str(" =");
            if self.is_block(value) {
                self.output.push('\n');
                self.write_indent();
            } else {
                self.output.push(' ');
            }
            self.write_value(value)?;
            self.output.push('\n');
        }
        self.indent_level -= 1;
        self.write_indent();
        self.output.push('}');
        Ok(())
    }
}
