//! Known KV3 encodings and formats.
//!
//! Every KV3 document names two things in its header: the **encoding** (how
//! the bytes are laid out: text, uncompressed binary, LZ4 binary, ...) and the
//! **format** (which schema dialect the root value follows). Both are a name
//! plus a version UUID.
//!
//! The registry is a static, read-only table. Readers use it to turn the UUID
//! found in a header into an [`EncodingKind`]; writers use it to find out
//! whether they can emit a requested encoding.
//!
//! ```rust
//! use keyvalues3::registry::{self, EncodingKind};
//! use keyvalues3::Encoding;
//!
//! let known = registry::encoding_by_uuid(Encoding::BINARY_LZ4.version).unwrap();
//! assert_eq!(known.kind, EncodingKind::BinaryLz4);
//! assert!(registry::encoding_by_name("binary_other_newer").is_err());
//! ```

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use uuid::Uuid;

/// Serialization dialect of a document.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Encoding {
    pub name: Cow<'static, str>,
    pub version: Uuid,
}

/// Schema dialect of a document's root value.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Format {
    pub name: Cow<'static, str>,
    pub version: Uuid,
}

impl Encoding {
    pub const TEXT: Encoding = Encoding::from_static(
        "text",
        Uuid::from_u128(0xe21c7f3c_8a33_41c5_9977_a76d3a32aa0d),
    );
    /// Text without the `<!-- kv3 ... -->` line. Never appears on the wire,
    /// so it shares the text version UUID.
    pub const TEXT_HEADERLESS: Encoding = Encoding::from_static(
        "text_headerless",
        Uuid::from_u128(0xe21c7f3c_8a33_41c5_9977_a76d3a32aa0d),
    );
    pub const BINARY_UNCOMPRESSED: Encoding = Encoding::from_static(
        "binary",
        Uuid::from_u128(0x1b860500_f7d8_40c1_ad82_75a48267e714),
    );
    pub const BINARY_BLOCK_COMPRESSED: Encoding = Encoding::from_static(
        "binarybc",
        Uuid::from_u128(0x95791a46_95bc_4f6c_a70b_05bca1b7dfd2),
    );
    pub const BINARY_LZ4: Encoding = Encoding::from_static(
        "binarylz4",
        Uuid::from_u128(0x6847348a_63a1_4f5c_a197_53806fd9b119),
    );
    /// The KV3 v1-v5 binary containers. They carry no encoding UUID.
    pub const BINARY_NEW: Encoding = Encoding::from_static("binary_new", Uuid::nil());

    #[must_use]
    pub const fn from_static(name: &'static str, version: Uuid) -> Self {
        Encoding {
            name: Cow::Borrowed(name),
            version,
        }
    }

    /// Creates an encoding descriptor, checking that the name is an identifier.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidValue`] when `name` is not a valid identifier.
    pub fn new(name: impl Into<String>, version: Uuid) -> Result<Self> {
        let name = name.into();
        check_header_name(&name)?;
        Ok(Encoding {
            name: Cow::Owned(name),
            version,
        })
    }

    /// Returns the registry's kind for this encoding.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownEncoding`] when the encoding is not registered.
    pub fn kind(&self) -> Result<EncodingKind> {
        kind_of(self)
    }
}

impl Format {
    pub const GENERIC: Format = Format::from_static(
        "generic",
        Uuid::from_u128(0x7412167c_06e9_4698_aff2_e63eb59037e7),
    );

    #[must_use]
    pub const fn from_static(name: &'static str, version: Uuid) -> Self {
        Format {
            name: Cow::Borrowed(name),
            version,
        }
    }

    /// Creates a format descriptor, checking that the name is an identifier.
    ///
    /// Formats are opaque to the codec, so any name/UUID pair is accepted.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use keyvalues3::Format;
    /// use uuid::Uuid;
    ///
    /// assert!(Format::new("vpcf26", Uuid::nil()).is_ok());
    /// assert!(Format::new("has spaces", Uuid::nil()).is_err());
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidValue`] when `name` is not a valid identifier.
    pub fn new(name: impl Into<String>, version: Uuid) -> Result<Self> {
        let name = name.into();
        check_header_name(&name)?;
        Ok(Format {
            name: Cow::Owned(name),
            version,
        })
    }

    /// Resolves a format UUID found in a binary header.
    ///
    /// Registered formats keep their name; anything else is carried as
    /// `unknown` with its UUID so it can still be echoed back on write.
    #[must_use]
    pub fn from_version(version: Uuid) -> Self {
        match format_by_uuid(version) {
            Ok(known) => known.clone(),
            Err(_) => Format::from_static("unknown", version),
        }
    }
}

impl Default for Format {
    fn default() -> Self {
        Format::GENERIC
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "encoding:{}:version{{{}}}", self.name, self.version)
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "format:{}:version{{{}}}", self.name, self.version)
    }
}

/// The `<!-- kv3 ... -->` line of a text document.
///
/// ```rust
/// use keyvalues3::{Encoding, Format, Header};
///
/// let header = Header::new(Encoding::TEXT, Format::GENERIC);
/// assert_eq!(
///     header.to_string(),
///     "<!-- kv3 encoding:text:version{e21c7f3c-8a33-41c5-9977-a76d3a32aa0d} \
///      format:generic:version{7412167c-06e9-4698-aff2-e63eb59037e7} -->"
/// );
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Header {
    pub encoding: Encoding,
    pub format: Format,
}

impl Header {
    #[must_use]
    pub fn new(encoding: Encoding, format: Format) -> Self {
        Header { encoding, format }
    }
}

impl Default for Header {
    fn default() -> Self {
        Header::new(Encoding::TEXT, Format::GENERIC)
    }
}

impl fmt::Display for Header {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<!-- kv3 {} {} -->", self.encoding, self.format)
    }
}

/// Which reader/writer path an encoding selects.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EncodingKind {
    Text,
    TextHeaderless,
    BinaryUncompressed,
    BinaryBlockCompressed,
    BinaryLz4,
    BinaryNew,
}

impl EncodingKind {
    #[must_use]
    pub const fn is_text(self) -> bool {
        matches!(self, EncodingKind::Text | EncodingKind::TextHeaderless)
    }

    #[must_use]
    pub const fn can_read(self) -> bool {
        !matches!(self, EncodingKind::BinaryNew)
    }

    #[must_use]
    pub const fn can_write(self) -> bool {
        !matches!(
            self,
            EncodingKind::BinaryNew | EncodingKind::BinaryBlockCompressed
        )
    }
}

/// A registry row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KnownEncoding {
    pub encoding: Encoding,
    pub kind: EncodingKind,
}

static ENCODINGS: [KnownEncoding; 6] = [
    KnownEncoding {
        encoding: Encoding::TEXT,
        kind: EncodingKind::Text,
    },
    KnownEncoding {
        encoding: Encoding::TEXT_HEADERLESS,
        kind: EncodingKind::TextHeaderless,
    },
    KnownEncoding {
        encoding: Encoding::BINARY_UNCOMPRESSED,
        kind: EncodingKind::BinaryUncompressed,
    },
    KnownEncoding {
        encoding: Encoding::BINARY_BLOCK_COMPRESSED,
        kind: EncodingKind::BinaryBlockCompressed,
    },
    KnownEncoding {
        encoding: Encoding::BINARY_LZ4,
        kind: EncodingKind::BinaryLz4,
    },
    KnownEncoding {
        encoding: Encoding::BINARY_NEW,
        kind: EncodingKind::BinaryNew,
    },
];

static FORMATS: [Format; 1] = [Format::GENERIC];

/// All registered encodings, in lookup priority order.
#[must_use]
pub fn encodings() -> &'static [KnownEncoding] {
    &ENCODINGS
}

/// All registered formats.
#[must_use]
pub fn formats() -> &'static [Format] {
    &FORMATS
}

/// Looks up an encoding by version UUID. Text and headerless text share a
/// UUID; the text entry wins.
///
/// # Errors
///
/// Returns [`Error::UnknownEncoding`] if no registered encoding has this UUID.
pub fn encoding_by_uuid(version: Uuid) -> Result<&'static KnownEncoding> {
    ENCODINGS
        .iter()
        .find(|known| known.encoding.version == version)
        .ok_or_else(|| Error::UnknownEncoding(format!("{{{}}}", version)))
}

/// Looks up an encoding by name.
///
/// # Errors
///
/// Returns [`Error::UnknownEncoding`] if no registered encoding has this name.
pub fn encoding_by_name(name: &str) -> Result<&'static KnownEncoding> {
    ENCODINGS
        .iter()
        .find(|known| known.encoding.name == name)
        .ok_or_else(|| Error::UnknownEncoding(name.to_string()))
}

/// Looks up a format by version UUID.
///
/// # Errors
///
/// Returns [`Error::UnknownFormat`] if no registered format has this UUID.
pub fn format_by_uuid(version: Uuid) -> Result<&'static Format> {
    FORMATS
        .iter()
        .find(|format| format.version == version)
        .ok_or_else(|| Error::UnknownFormat(format!("{{{}}}", version)))
}

/// Looks up a format by name.
///
/// # Errors
///
/// Returns [`Error::UnknownFormat`] if no registered format has this name.
pub fn format_by_name(name: &str) -> Result<&'static Format> {
    FORMATS
        .iter()
        .find(|format| format.name == name)
        .ok_or_else(|| Error::UnknownFormat(name.to_string()))
}

/// Resolves an encoding descriptor to its kind: an exact name+UUID match
/// first, then the UUID alone.
///
/// # Errors
///
/// Returns [`Error::UnknownEncoding`] if the UUID is not registered.
pub fn kind_of(encoding: &Encoding) -> Result<EncodingKind> {
    if let Some(known) = ENCODINGS.iter().find(|known| known.encoding == *encoding) {
        return Ok(known.kind);
    }
    encoding_by_uuid(encoding.version).map(|known| known.kind)
}

pub(crate) fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn check_header_name(name: &str) -> Result<()> {
    if is_identifier(name) {
        Ok(())
    } else {
        Err(Error::InvalidValue(format!(
            "{:?} is not a valid identifier",
            name
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_header() {
        assert_eq!(
            Header::default().to_string(),
            "<!-- kv3 encoding:text:version{e21c7f3c-8a33-41c5-9977-a76d3a32aa0d} format:generic:version{7412167c-06e9-4698-aff2-e63eb59037e7} -->"
        );
    }

    #[test]
    fn test_custom_header() {
        let header = Header::new(
            Encoding::new("text2", Uuid::from_u128(0)).unwrap(),
            Format::new("generic2", Uuid::from_u128(1)).unwrap(),
        );
        assert_eq!(
            header.to_string(),
            "<!-- kv3 encoding:text2:version{00000000-0000-0000-0000-000000000000} format:generic2:version{00000000-0000-0000-0000-000000000001} -->"
        );
        assert!(Format::new("vpcf1 with spaces", Uuid::nil()).is_err());
    }

    #[test]
    fn test_lookup_by_uuid() {
        let known = encoding_by_uuid(Encoding::BINARY_UNCOMPRESSED.version).unwrap();
        assert_eq!(known.kind, EncodingKind::BinaryUncompressed);

        // headerless shares the text UUID, the text row wins
        let known = encoding_by_uuid(Encoding::TEXT.version).unwrap();
        assert_eq!(known.kind, EncodingKind::Text);

        let unknown = Uuid::from_u128(0xdead_beef);
        assert!(matches!(
            encoding_by_uuid(unknown),
            Err(Error::UnknownEncoding(_))
        ));
        assert!(matches!(format_by_uuid(unknown), Err(Error::UnknownFormat(_))));
    }

    #[test]
    fn test_lookup_by_name() {
        assert_eq!(
            encoding_by_name("text_headerless").unwrap().kind,
            EncodingKind::TextHeaderless
        );
        assert_eq!(format_by_name("generic").unwrap(), &Format::GENERIC);
        assert!(encoding_by_name("binary_other_newer").is_err());
        assert!(format_by_name("vpcf").is_err());
    }

    #[test]
    fn test_kind_of_prefers_exact_match() {
        assert_eq!(
            kind_of(&Encoding::TEXT_HEADERLESS).unwrap(),
            EncodingKind::TextHeaderless
        );
        let renamed = Encoding::from_static("lz4", Encoding::BINARY_LZ4.version);
        assert_eq!(kind_of(&renamed).unwrap(), EncodingKind::BinaryLz4);
    }

    #[test]
    fn test_capabilities() {
        assert!(EncodingKind::BinaryBlockCompressed.can_read());
        assert!(!EncodingKind::BinaryBlockCompressed.can_write());
        assert!(!EncodingKind::BinaryNew.can_read());
        assert!(!EncodingKind::BinaryNew.can_write());
        assert!(EncodingKind::TextHeaderless.is_text());
    }

    #[test]
    fn test_unknown_format_is_carried() {
        let version = Uuid::from_u128(42);
        let format = Format::from_version(version);
        assert_eq!(format.name, "unknown");
        assert_eq!(format.version, version);
        assert_eq!(Format::from_version(Format::GENERIC.version), Format::GENERIC);
    }
}
