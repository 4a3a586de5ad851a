//! The unit of reading and writing: a root value plus its header metadata.

use crate::registry::{Encoding, Format};
use crate::value::Comment;
use crate::Value;

static GENERIC_FORMAT: Format = Format::GENERIC;

/// A decoded KV3 document.
///
/// `original_encoding` records how the document was read so it can be
/// written back the same way. Documents built in memory have none.
///
/// # Examples
///
/// ```rust
/// use keyvalues3::{from_str, Encoding};
///
/// let doc = from_str("{ a = 1 }").unwrap();
/// assert_eq!(doc.original_encoding, Some(Encoding::TEXT_HEADERLESS));
/// assert_eq!(doc.value["a"], 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Document {
    pub value: Value,
    pub format: Format,
    pub original_encoding: Option<Encoding>,
    /// Comments that appeared before the root value.
    pub comments: Vec<Comment>,
}

impl Document {
    #[must_use]
    pub fn new(value: Value) -> Self {
        Document {
            value,
            ..Document::default()
        }
    }

    #[must_use]
    pub fn with_format(mut self, format: Format) -> Self {
        self.format = format;
        self
    }

    #[must_use]
    pub fn with_original_encoding(mut self, encoding: Encoding) -> Self {
        self.original_encoding = Some(encoding);
        self
    }

    /// Strict comparison of the root values (see [`Value::deep_eq`]) and formats.
    #[must_use]
    pub fn deep_eq(&self, other: &Document) -> bool {
        self.format == other.format && self.value.deep_eq(&other.value)
    }
}

/// Comments do not take part in equality.
impl PartialEq for Document {
    fn eq(&self, other: &Document) -> bool {
        self.value == other.value
            && self.format == other.format
            && self.original_encoding == other.original_encoding
    }
}

impl From<Value> for Document {
    fn from(value: Value) -> Self {
        Document::new(value)
    }
}

/// A borrowed view of what a writer needs. Built from a [`Document`] or from
/// a bare [`Value`], which gets the generic format and no original encoding.
#[derive(Debug, Clone, Copy)]
pub struct DocumentRef<'a> {
    pub value: &'a Value,
    pub format: &'a Format,
    pub original_encoding: Option<&'a Encoding>,
    pub comments: &'a [Comment],
}

impl<'a> From<&'a Document> for DocumentRef<'a> {
    fn from(doc: &'a Document) -> Self {
        DocumentRef {
            value: &doc.value,
            format: &doc.format,
            original_encoding: doc.original_encoding.as_ref(),
            comments: &doc.comments,
        }
    }
}

impl<'a> From<&'a Value> for DocumentRef<'a> {
    fn from(value: &'a Value) -> Self {
        DocumentRef {
            value,
            format: &GENERIC_FORMAT,
            original_encoding: None,
            comments: &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Flag;

    #[test]
    fn test_value_view_is_generic() {
        let value = Value::from(1);
        let view = DocumentRef::from(&value);
        assert_eq!(view.format, &Format::GENERIC);
        assert!(view.original_encoding.is_none());
    }

    #[test]
    fn test_equality_ignores_comments() {
        let mut a = Document::new(Value::from("x"));
        a.comments.push(Comment::Line(" hi".to_string()));
        let b = Document::new(Value::from("x"));
        assert_eq!(a, b);
    }

    #[test]
    fn test_deep_eq_sees_flags() {
        let a = Document::new(Value::from("x"));
        let b = Document::new(Value::from("x").with_flag(Flag::Resource));
        assert_eq!(a, b);
        assert!(!a.deep_eq(&b));
    }
}
