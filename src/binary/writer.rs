use super::{BinaryType, FLAG_MARKER, MAGIC, TRAILER};
use crate::document::DocumentRef;
use crate::registry::{self, Encoding, EncodingKind};
use crate::{Error, KvMap, Result, Value};
use byteorder::{LittleEndian, WriteBytesExt};
use indexmap::IndexSet;
use tracing::debug;

/// Encodes a document as uncompressed or LZ4-compressed VKV3.
///
/// Comments are not written, and neither are flags without a binary bit
/// (`entity_name`, `localize` and unrecognised flags).
///
/// # Examples
///
/// ```rust
/// use keyvalues3::{binary, Encoding, Value};
///
/// let bytes = binary::write((&Value::Null).into(), &Encoding::BINARY_UNCOMPRESSED).unwrap();
/// assert_eq!(&bytes[..4], b"VKV\x03");
/// assert_eq!(&bytes[36..], b"\x00\x00\x00\x00\x01\xFF\xFF\xFF\xFF");
/// ```
///
/// # Errors
///
/// - [`Error::UnsupportedEncoding`] unless `encoding` is `binary` or `binarylz4`.
/// - [`Error::InvalidValue`] for a string containing NUL or a collection too
///   large for a 32-bit length.
pub fn write(doc: DocumentRef<'_>, encoding: &Encoding) -> Result<Vec<u8>> {
    let kind = registry::kind_of(encoding)?;
    if !matches!(kind, EncodingKind::BinaryUncompressed | EncodingKind::BinaryLz4) {
        return Err(Error::UnsupportedEncoding(format!(
            "no binary writer for {}",
            encoding.name
        )));
    }

    let mut out = Vec::with_capacity(64);
    out.extend_from_slice(&MAGIC);
    out.extend_from_slice(&encoding.version.to_bytes_le());
    out.extend_from_slice(&doc.format.version.to_bytes_le());

    let body = BodyWriter::default().write_body(doc.value)?;
    if kind == EncodingKind::BinaryLz4 {
        out.write_u32::<LittleEndian>(length(body.len(), "body")?)?;
        out.extend_from_slice(&lz4_flex::block::compress(&body));
    } else {
        out.extend_from_slice(&body);
    }
    Ok(out)
}

fn length(len: usize, what: &str) -> Result<u32> {
    u32::try_from(len)
        .ok()
        .filter(|&n| n <= i32::MAX as u32)
        .ok_or_else(|| Error::InvalidValue(format!("{} too large for binary KV3", what)))
}

#[derive(Default)]
struct BodyWriter {
    strings: IndexSet<String>,
    values: Vec<u8>,
}

impl BodyWriter {
    fn write_body(mut self, value: &Value) -> Result<Vec<u8>> {
        self.write_value(value)?;

        let table_len: usize = self.strings.iter().map(|s| s.len() + 1).sum();
        let mut body = Vec::with_capacity(4 + table_len + self.values.len() + 4);
        body.write_u32::<LittleEndian>(length(self.strings.len(), "string table")?)?;
        for s in &self.strings {
            body.extend_from_slice(s.as_bytes());
            body.push(0);
        }
        body.extend_from_slice(&self.values);
        body.write_u32::<LittleEndian>(TRAILER)?;
        Ok(body)
    }

    fn string_index(&mut self, s: &str) -> Result<i32> {
        if s.is_empty() {
            return Ok(-1);
        }
        if s.contains('\0') {
            return Err(Error::invalid_value("strings in binary KV3 cannot contain NUL"));
        }
        let index = match self.strings.get_index_of(s) {
            Some(index) => index,
            None => self.strings.insert_full(s.to_string()).0,
        };
        Ok(length(index, "string table")? as i32)
    }

    fn write_string_ref(&mut self, s: &str) -> Result<()> {
        let index = self.string_index(s)?;
        self.values.write_i32::<LittleEndian>(index)?;
        Ok(())
    }

    fn write_type(&mut self, ty: BinaryType, bits: u8) {
        if bits == 0 {
            self.values.push(ty as u8);
        } else {
            self.values.push(ty as u8 | FLAG_MARKER);
            self.values.push(bits);
        }
    }

    fn write_value(&mut self, value: &Value) -> Result<()> {
        let flags = value.flags();
        let dropped: Vec<_> = flags.iter().filter(|flag| flag.bit().is_none()).collect();
        if !dropped.is_empty() {
            debug!(?dropped, "flags without a binary encoding are not written");
        }
        let bits = flags.bits();

        match value.unflagged() {
            Value::Null => self.write_type(BinaryType::Null, bits),
            Value::Bool(true) => self.write_type(BinaryType::True, bits),
            Value::Bool(false) => self.write_type(BinaryType::False, bits),
            Value::Int64(0) => self.write_type(BinaryType::Int64Zero, bits),
            Value::Int64(1) => self.write_type(BinaryType::Int64One, bits),
            Value::Int64(i) => {
                self.write_type(BinaryType::Int64, bits);
                self.values.write_i64::<LittleEndian>(*i)?;
            }
            Value::UInt64(u) => {
                self.write_type(BinaryType::UInt64, bits);
                self.values.write_u64::<LittleEndian>(*u)?;
            }
            Value::Int32(i) => {
                self.write_type(BinaryType::Int32, bits);
                self.values.write_i32::<LittleEndian>(*i)?;
            }
            Value::UInt32(u) => {
                self.write_type(BinaryType::UInt32, bits);
                self.values.write_u32::<LittleEndian>(*u)?;
            }
            // -0.0 keeps its sign through the full encoding
            Value::Double(d) if d.to_bits() == 0 => self.write_type(BinaryType::DoubleZero, bits),
            Value::Double(d) if *d == 1.0 => self.write_type(BinaryType::DoubleOne, bits),
            Value::Double(d) => {
                self.write_type(BinaryType::Double, bits);
                self.values.write_f64::<LittleEndian>(*d)?;
            }
            Value::String(s) => {
                self.write_type(BinaryType::String, bits);
                self.write_string_ref(s)?;
            }
            Value::Blob(bytes) => {
                self.write_type(BinaryType::Blob, bits);
                let len = length(bytes.len(), "blob")?;
                self.values.write_i32::<LittleEndian>(len as i32)?;
                self.values.extend_from_slice(bytes);
            }
            Value::Array(items) => {
                self.write_type(BinaryType::Array, bits);
                let len = length(items.len(), "array")?;
                self.values.write_i32::<LittleEndian>(len as i32)?;
                for item in items {
                    self.write_value(item)?;
                }
            }
            Value::Object(map) => {
                self.write_type(BinaryType::Object, bits);
                self.write_object(map)?;
            }
            Value::Flagged { .. } => unreachable!("unflagged() never returns a flagged value"),
        }
        Ok(())
    }

    fn write_object(&mut self, map: &KvMap) -> Result<()> {
        let len = length(map.len(), "object")?;
        self.values.write_i32::<LittleEndian>(len as i32)?;
        for (key, value) in map.iter() {
            self.write_string_ref(key)?;
            self.write_value(value)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::Format;
    use crate::{Document, Flag};

    const NULL_DOCUMENT: &[u8] = b"VKV\x03\x00\x05\x86\x1b\xd8\xf7\xc1@\xad\x82u\xa4\x82g\xe7\x14|\x16\x12t\xe9\x06\x98F\xaf\xf2\xe6>\xb5\x907\xe7\x00\x00\x00\x00\x01\xFF\xFF\xFF\xFF";

    fn encode(value: &Value) -> Vec<u8> {
        write(value.into(), &Encoding::BINARY_UNCOMPRESSED).unwrap()
    }

    fn object(entries: Vec<(&str, Value)>) -> Value {
        Value::Object(entries.into_iter().map(|(k, v)| (k.to_string(), v)).collect())
    }

    #[test]
    fn test_null_document_bytes() {
        assert_eq!(encode(&Value::Null), NULL_DOCUMENT);
    }

    #[test]
    fn test_single_key_object_bytes() {
        let bytes = encode(&object(vec![("A", Value::Int64(1))]));
        let mut expected = NULL_DOCUMENT[..36].to_vec();
        expected.extend_from_slice(b"\x01\x00\x00\x00A\x00");
        expected.extend_from_slice(b"\x09\x01\x00\x00\x00\x00\x00\x00\x00\x10");
        expected.extend_from_slice(b"\xFF\xFF\xFF\xFF");
        assert_eq!(bytes, expected);
    }

    #[test]
    fn test_strings_are_deduplicated() {
        let value = object(vec![
            ("a", Value::from("same")),
            ("b", Value::from("same")),
            ("same", Value::from("")),
        ]);
        let bytes = encode(&value);
        let body = &bytes[36..];
        // "a", "same", "b"
        assert_eq!(&body[..4], &[3, 0, 0, 0]);
        assert_eq!(&body[4..13], b"a\0same\0b\0");
    }

    #[test]
    fn test_flag_byte() {
        let value = Value::from("x").with_flag(Flag::SubClass).with_flag(Flag::Localize);
        let bytes = encode(&value);
        let body = &bytes[36..];
        assert_eq!(&body[6..12], &[0x86, 32, 0, 0, 0, 0]);
    }

    #[test]
    fn test_compact_numbers() {
        let bytes = encode(&Value::Array(vec![
            Value::Double(0.0),
            Value::Double(-0.0),
            Value::Double(1.0),
            Value::Int64(0),
            Value::Bool(true),
        ]));
        let body = &bytes[36..];
        let mut expected = vec![0, 0, 0, 0, 8, 5, 0, 0, 0, 17, 5];
        expected.extend_from_slice(&(-0.0f64).to_le_bytes());
        expected.extend_from_slice(&[18, 15, 13, 0xFF, 0xFF, 0xFF, 0xFF]);
        assert_eq!(body, &expected[..]);
    }

    #[test]
    fn test_format_uuid_is_echoed() {
        let format = Format::new("vpcf26", uuid::Uuid::from_u128(7)).unwrap();
        let doc = Document::new(Value::Null).with_format(format.clone());
        let bytes = write((&doc).into(), &Encoding::BINARY_UNCOMPRESSED).unwrap();
        assert_eq!(&bytes[20..36], &format.version.to_bytes_le());
    }

    #[test]
    fn test_lz4_framing() {
        let bytes = write((&Value::Null).into(), &Encoding::BINARY_LZ4).unwrap();
        assert_eq!(&bytes[4..20], &Encoding::BINARY_LZ4.version.to_bytes_le());
        assert_eq!(&bytes[36..40], &9u32.to_le_bytes());
        let body = lz4_flex::block::decompress(&bytes[40..], 9).unwrap();
        assert_eq!(body, &NULL_DOCUMENT[36..]);
    }

    #[test]
    fn test_unsupported_targets() {
        for encoding in [
            Encoding::BINARY_BLOCK_COMPRESSED,
            Encoding::BINARY_NEW,
            Encoding::TEXT,
        ] {
            let result = write((&Value::Null).into(), &encoding);
            assert!(matches!(result, Err(Error::UnsupportedEncoding(_))));
        }
    }

    #[test]
    fn test_nul_in_string() {
        let result = write((&Value::from("a\0b")).into(), &Encoding::BINARY_UNCOMPRESSED);
        assert!(matches!(result, Err(Error::InvalidValue(_))));
    }
}
