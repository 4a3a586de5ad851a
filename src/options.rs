//! Configuration options for writing KV3.
//!
//! - [`TextOptions`]: layout of the text writer
//! - [`WriteOptions`]: which encoding a write targets, plus the text options
//!
//! ## Examples
//!
//! ```rust
//! use keyvalues3::{kv3, to_vec, Encoding, TextOptions, WriteOptions};
//!
//! let value = kv3!({ "speed": 1.5 });
//!
//! // LZ4-compressed binary
//! let options = WriteOptions::new().with_encoding(Encoding::BINARY_LZ4);
//! let bytes = to_vec(&value, &options).unwrap();
//! assert!(bytes.starts_with(b"VKV\x03"));
//!
//! // Text without the header line
//! let options = WriteOptions::new().with_text(TextOptions::new().with_header(false));
//! let text = to_vec(&value, &options).unwrap();
//! assert_eq!(text, b"{\n\tspeed = 1.5\n}\n");
//! ```

use crate::registry::Encoding;

/// Layout options for the text writer.
///
/// # Examples
///
/// ```rust
/// use keyvalues3::TextOptions;
///
/// let options = TextOptions::new()
///     .with_comments(true)
///     .with_max_inline_array(4);
/// assert!(options.header);
/// assert_eq!(options.max_inline_array, 4);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextOptions {
    /// Emit the `<!-- kv3 ... -->` line. Ignored when the target encoding is headerless.
    pub header: bool,
    /// Emit comments kept from text input.
    pub comments: bool,
    /// Longest array of scalars written on one line.
    pub max_inline_array: usize,
}

impl Default for TextOptions {
    fn default() -> Self {
        TextOptions {
            header: true,
            comments: false,
            max_inline_array: 8,
        }
    }
}

impl TextOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_header(mut self, header: bool) -> Self {
        self.header = header;
        self
    }

    #[must_use]
    pub fn with_comments(mut self, comments: bool) -> Self {
        self.comments = comments;
        self
    }

    /// Sets the longest scalar array kept on one line. `0` puts every
    /// non-empty array on multiple lines.
    #[must_use]
    pub fn with_max_inline_array(mut self, max: usize) -> Self {
        self.max_inline_array = max;
        self
    }
}

/// Options for a write call.
///
/// The target encoding is resolved in this order:
///
/// 1. the document's original encoding, if `use_original_encoding` is set and it has one
/// 2. `encoding`, if set
/// 3. the document's original encoding
/// 4. [`Encoding::TEXT`]
///
/// # Examples
///
/// ```rust
/// use keyvalues3::{Encoding, WriteOptions};
///
/// let options = WriteOptions::new()
///     .with_encoding(Encoding::BINARY_UNCOMPRESSED)
///     .with_use_original_encoding(true);
/// assert!(options.use_original_encoding);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WriteOptions {
    pub encoding: Option<Encoding>,
    pub use_original_encoding: bool,
    pub text: TextOptions,
}

impl WriteOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_encoding(mut self, encoding: Encoding) -> Self {
        self.encoding = Some(encoding);
        self
    }

    /// Prefer the encoding the document was read with, including its
    /// comments when it was text.
    #[must_use]
    pub fn with_use_original_encoding(mut self, use_original: bool) -> Self {
        self.use_original_encoding = use_original;
        self
    }

    #[must_use]
    pub fn with_text(mut self, text: TextOptions) -> Self {
        self.text = text;
        self
    }
}
