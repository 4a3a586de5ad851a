//! # keyvalues3
//!
//! Reader and writer for Valve's KeyValues3 (KV3) data format.
//!
//! ## What is KV3?
//!
//! KV3 is the structured-data format of the Source 2 engine. It looks like
//! JSON with a few additions: distinct integer and float widths, binary blobs,
//! flagged values such as `resource:"models/a.vmdl"`, comments, and several
//! interchangeable encodings, each identified by a name and a version UUID:
//!
//! - **text**: a header line `<!-- kv3 encoding:... format:... -->` then the value
//! - **text (headerless)**: the same without the header line
//! - **binary**: the VKV3 container, uncompressed or LZ4-compressed
//!   (and, read only, Valve's older block compression)
//!
//! Every read produces a [`Document`] holding the root [`Value`], its
//! [`Format`], and the [`Encoding`] it was read from, so it can be written
//! back the same way.
//!
//! ## Quick Start
//!
//! ```rust
//! use keyvalues3::{from_str, to_string};
//!
//! let doc = from_str("{ key = [1, 2, 3] }").unwrap();
//! assert_eq!(doc.value["key"][1], 2);
//!
//! // Headerless input is written back headerless.
//! assert_eq!(to_string(&doc).unwrap(), "{\n\tkey = [ 1, 2, 3 ]\n}\n");
//! ```
//!
//! ### Binary
//!
//! ```rust
//! use keyvalues3::{from_slice, kv3, to_vec, Encoding, WriteOptions};
//!
//! let value = kv3!({ "default": { "reaction_time": 0.12 } });
//! let options = WriteOptions::new().with_encoding(Encoding::BINARY_LZ4);
//! let bytes = to_vec(&value, &options).unwrap();
//!
//! let doc = from_slice(&bytes).unwrap();
//! assert_eq!(doc.value["default"]["reaction_time"], 0.12);
//! assert_eq!(doc.original_encoding, Some(Encoding::BINARY_LZ4));
//! ```
//!
//! ### Dynamic Values with the kv3! Macro
//!
//! ```rust
//! use keyvalues3::{kv3, Flag};
//!
//! let data = kv3!({
//!     "name": "Alice",
//!     "model": (resource: "models/alice.vmdl"),
//!     "tags": ["rust", "kv3"]
//! });
//!
//! assert_eq!(data["name"].as_str(), Some("Alice"));
//! assert!(data["model"].has_flag(&Flag::Resource));
//! ```
//!
//! ## Reading
//!
//! [`from_slice`] sniffs the input: the `VKV\x03` magic routes to the binary
//! reader, a header, `{`, `[` or a comment (after optional BOM and whitespace)
//! routes to the text parser, anything else fails with
//! [`Error::UnrecognizedFormat`]. [`from_slice_with_encoding`] skips sniffing.
//!
//! ## Writing
//!
//! [`to_vec`] and [`to_writer`] take a [`Document`] or a bare [`Value`] plus
//! [`WriteOptions`]; see there for how the target encoding is chosen.
//!
//! ## Logging
//!
//! The crate logs through [`tracing`]: duplicate keys at `warn`, encoding
//! decisions and dropped data at `debug`. No subscriber is installed.
//!
//! ## Examples
//!
//! See the `demos/` directory:
//!
//! - **`simple.rs`** - read a text document and write it back
//! - **`macro.rs`** - building values with the kv3! macro
//! - **`dynamic_values.rs`** - inspecting and editing a value tree
//! - **`custom_options.rs`** - header, comment and array layout options
//! - **`binary_roundtrip.rs`** - text to LZ4 binary and back
//!
//! Run any example with: `cargo run --example <name>`

pub mod binary;
pub mod document;
pub mod error;
pub mod macros;
pub mod map;
pub mod options;
pub mod registry;
pub mod text;
pub mod value;

pub use document::{Document, DocumentRef};
pub use error::{Error, Result};
pub use map::KvMap;
pub use options::{TextOptions, WriteOptions};
pub use registry::{Encoding, EncodingKind, Format, Header};
pub use text::Position;
pub use value::{Comment, Flag, Flags, Value};

use std::io;
use tracing::debug;

/// Parses a text document, with or without a header line.
///
/// # Examples
///
/// ```rust
/// use keyvalues3::from_str;
///
/// let doc = from_str("{ name = \"Alice\" }").unwrap();
/// assert_eq!(doc.value["name"], "Alice");
/// ```
///
/// # Errors
///
/// Returns a lex or parse error with line and column for malformed input, or
/// an encoding error when the header names something other than text.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_str(s: &str) -> Result<Document> {
    text::parse(s)
}

/// Reads a document in any supported encoding, detecting which one from the
/// first bytes.
///
/// # Examples
///
/// ```rust
/// use keyvalues3::{from_slice, Encoding, Error};
///
/// let doc = from_slice(b"\xEF\xBB\xBF  [1, 2]").unwrap();
/// assert_eq!(doc.original_encoding, Some(Encoding::TEXT_HEADERLESS));
///
/// assert!(matches!(from_slice(b"PNG"), Err(Error::UnrecognizedFormat(_))));
/// ```
///
/// # Errors
///
/// [`Error::UnrecognizedFormat`] when no probe matches, otherwise whatever the
/// selected reader reports.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_slice(data: &[u8]) -> Result<Document> {
    if binary::is_vkv3(data) || binary::new_magic_version(data).is_some() {
        debug!("sniffed binary KV3");
        return binary::read(data);
    }

    if looks_like_text(data) {
        debug!("sniffed text KV3");
        return from_str(utf8(data)?);
    }

    Err(Error::UnrecognizedFormat(
        "input starts with neither a KV3 header, '{', '[' nor the VKV3 magic".to_string(),
    ))
}

/// Reads a document with the reader for `encoding`, without sniffing.
///
/// # Examples
///
/// ```rust
/// use keyvalues3::{from_slice_with_encoding, Encoding};
///
/// let doc = from_slice_with_encoding(b"\"just a string\"", &Encoding::TEXT_HEADERLESS).unwrap();
/// assert_eq!(doc.value, "just a string");
/// ```
///
/// # Errors
///
/// [`Error::UnsupportedEncoding`] when `encoding` has no reader, otherwise
/// whatever the reader reports.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_slice_with_encoding(data: &[u8], encoding: &Encoding) -> Result<Document> {
    let kind = encoding.kind()?;
    if !kind.can_read() {
        return Err(Error::UnsupportedEncoding(format!(
            "no reader for {}",
            encoding.name
        )));
    }
    if kind.is_text() {
        from_str(utf8(data)?)
    } else {
        binary::read(data)
    }
}

/// Reads a whole stream into memory, then behaves like [`from_slice`].
///
/// # Examples
///
/// ```rust
/// use keyvalues3::from_reader;
/// use std::io::Cursor;
///
/// let doc = from_reader(Cursor::new(b"{ a = 1 }")).unwrap();
/// assert_eq!(doc.value["a"], 1);
/// ```
///
/// # Errors
///
/// [`Error::Io`] if reading fails, otherwise see [`from_slice`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_reader<R>(mut reader: R) -> Result<Document>
where
    R: io::Read,
{
    let mut data = Vec::new();
    reader
        .read_to_end(&mut data)
        .map_err(|e| Error::io(&e.to_string()))?;
    from_slice(&data)
}

/// Writes text: headerless if the document was read headerless, otherwise
/// with a header line.
///
/// # Examples
///
/// ```rust
/// use keyvalues3::{kv3, to_string};
///
/// let text = to_string(&kv3!({ "a": 1 })).unwrap();
/// assert!(text.starts_with("<!-- kv3 encoding:text:version{"));
/// assert!(text.ends_with("{\n\ta = 1\n}\n"));
/// ```
///
/// # Errors
///
/// [`Error::InvalidValue`] for a flag name that cannot be written.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string<'a>(doc: impl Into<DocumentRef<'a>>) -> Result<String> {
    let doc = doc.into();
    let headerless = doc
        .original_encoding
        .is_some_and(|e| e.kind().ok() == Some(EncodingKind::TextHeaderless));
    let encoding = if headerless {
        Encoding::TEXT_HEADERLESS
    } else {
        Encoding::TEXT
    };
    write_text(doc, &encoding, &TextOptions::default())
}

/// Writes a document or value in the encoding chosen by `options`.
///
/// # Examples
///
/// ```rust
/// use keyvalues3::{from_str, to_vec, Encoding, WriteOptions};
///
/// let doc = from_str("{ a = 1 }").unwrap();
///
/// let text = to_vec(&doc, &WriteOptions::new()).unwrap();
/// assert_eq!(text, b"{\n\ta = 1\n}\n");
///
/// let options = WriteOptions::new().with_encoding(Encoding::BINARY_UNCOMPRESSED);
/// assert!(to_vec(&doc, &options).unwrap().starts_with(b"VKV\x03"));
/// ```
///
/// # Errors
///
/// [`Error::UnsupportedEncoding`] when the target encoding has no writer.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_vec<'a>(doc: impl Into<DocumentRef<'a>>, options: &WriteOptions) -> Result<Vec<u8>> {
    let doc = doc.into();
    let encoding = resolve_encoding(&doc, options);
    let kind = encoding
        .kind()
        .map_err(|_| Error::UnsupportedEncoding(format!("no writer for {}", encoding.name)))?;
    debug!(encoding = %encoding.name, ?kind, "writing KV3");

    if kind.is_text() {
        let mut text_options = options.text.clone();
        if options.use_original_encoding {
            text_options.comments = true;
        }
        return write_text(doc, &encoding, &text_options).map(String::into_bytes);
    }
    binary::write(doc, &encoding)
}

/// Writes a document or value to `writer`; see [`to_vec`].
///
/// # Errors
///
/// [`Error::Io`] if writing fails, otherwise see [`to_vec`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer<'a, W>(
    mut writer: W,
    doc: impl Into<DocumentRef<'a>>,
    options: &WriteOptions,
) -> Result<()>
where
    W: io::Write,
{
    let bytes = to_vec(doc, options)?;
    writer
        .write_all(&bytes)
        .map_err(|e| Error::io(&e.to_string()))?;
    Ok(())
}

fn resolve_encoding(doc: &DocumentRef<'_>, options: &WriteOptions) -> Encoding {
    if options.use_original_encoding {
        if let Some(original) = doc.original_encoding {
            return original.clone();
        }
    }
    options
        .encoding
        .clone()
        .or_else(|| doc.original_encoding.cloned())
        .unwrap_or(Encoding::TEXT)
}

fn write_text(doc: DocumentRef<'_>, encoding: &Encoding, options: &TextOptions) -> Result<String> {
    let header = (options.header && encoding.kind()? == EncodingKind::Text)
        .then(|| Header::new(encoding.clone(), doc.format.clone()));
    text::Writer::new(options).write_document(doc, header.as_ref())
}

const TEXT_PROBES: [&[u8]; 5] = [b"<!--", b"{", b"[", b"//", b"/*"];

fn looks_like_text(data: &[u8]) -> bool {
    let data = data.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(data);
    let start = data
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(data.len());
    TEXT_PROBES.iter().any(|probe| data[start..].starts_with(probe))
}

fn utf8(data: &[u8]) -> Result<&str> {
    std::str::from_utf8(data)
        .map_err(|e| Error::UnrecognizedFormat(format!("text input is not valid UTF-8: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sniff_order() {
        assert!(from_slice(b"{}").is_ok());
        assert!(from_slice(b"  \n// c\n[]").is_ok());
        assert!(from_slice(b"/* c */ {}").is_ok());
        assert!(matches!(
            from_slice(b"\x01\x33VK\x00\x00"),
            Err(Error::UnsupportedEncoding(_))
        ));
        assert!(matches!(from_slice(b""), Err(Error::UnrecognizedFormat(_))));
        assert!(matches!(from_slice(b"key = 1"), Err(Error::UnrecognizedFormat(_))));
        assert!(matches!(from_slice(b"{\xFF}"), Err(Error::UnrecognizedFormat(_))));
    }

    #[test]
    fn test_resolve_encoding_precedence() {
        let doc = Document::new(Value::Null).with_original_encoding(Encoding::BINARY_LZ4);
        let view = DocumentRef::from(&doc);

        let plain = WriteOptions::new();
        assert_eq!(resolve_encoding(&view, &plain), Encoding::BINARY_LZ4);

        let explicit = WriteOptions::new().with_encoding(Encoding::TEXT);
        assert_eq!(resolve_encoding(&view, &explicit), Encoding::TEXT);

        let original = explicit.clone().with_use_original_encoding(true);
        assert_eq!(resolve_encoding(&view, &original), Encoding::BINARY_LZ4);

        let value = Value::Null;
        let bare = DocumentRef::from(&value);
        assert_eq!(resolve_encoding(&bare, &original), Encoding::TEXT);
        assert_eq!(resolve_encoding(&bare, &plain), Encoding::TEXT);
    }

    #[test]
    fn test_unwritable_encodings() {
        let value = Value::Null;
        for encoding in [
            Encoding::BINARY_BLOCK_COMPRESSED,
            Encoding::BINARY_NEW,
            Encoding::from_static("binary_other_newer", uuid::Uuid::from_u128(99)),
        ] {
            let options = WriteOptions::new().with_encoding(encoding);
            assert!(matches!(
                to_vec(&value, &options),
                Err(Error::UnsupportedEncoding(_))
            ));
        }
    }

    #[test]
    fn test_hint_skips_sniffing() {
        let doc = from_slice_with_encoding(b"1", &Encoding::TEXT).unwrap();
        assert_eq!(doc.value, 1);
        assert!(matches!(
            from_slice_with_encoding(b"1", &Encoding::BINARY_NEW),
            Err(Error::UnsupportedEncoding(_))
        ));
        assert!(matches!(
            from_slice_with_encoding(b"1", &Encoding::BINARY_UNCOMPRESSED),
            Err(Error::CorruptData(_))
        ));
    }

    #[test]
    fn test_to_writer() {
        let mut buffer = Vec::new();
        to_writer(&mut buffer, &Value::from(1), &WriteOptions::new()).unwrap();
        assert!(buffer.ends_with(b"-->\n1\n"));
    }
}
