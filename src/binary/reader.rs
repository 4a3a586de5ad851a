use super::{block, new_magic_version, BinaryType, FLAG_MARKER, MAGIC, MAX_DEPTH, TRAILER};
use crate::registry::{self, EncodingKind, Format};
use crate::value::Flags;
use crate::{Document, Error, KvMap, Result, Value};
use byteorder::{LittleEndian, ReadBytesExt};
use std::borrow::Cow;
use std::io::{Cursor, Read};
use tracing::debug;
use uuid::Uuid;

/// Decodes a complete VKV3 binary document.
///
/// # Errors
///
/// - [`Error::UnsupportedEncoding`] for the KV3 v1-v5 containers, and for an
///   encoding UUID that is not a readable binary encoding. Nothing past the
///   header is read in that case.
/// - [`Error::CorruptData`] for a bad magic, truncated input, failed
///   decompression or an out-of-range string index.
pub fn read(data: &[u8]) -> Result<Document> {
    if let Some(version) = new_magic_version(data) {
        return Err(Error::UnsupportedEncoding(format!(
            "KV3 binary container version {}",
            version
        )));
    }

    let mut cursor = Cursor::new(data);
    let mut magic = [0u8; 4];
    cursor.read_exact(&mut magic)?;
    if magic != MAGIC {
        return Err(Error::corrupt("missing VKV3 magic"));
    }

    let encoding_version = read_uuid(&mut cursor)?;
    let format_version = read_uuid(&mut cursor)?;

    let known = registry::encoding_by_uuid(encoding_version).map_err(|_| {
        Error::UnsupportedEncoding(format!("unknown binary encoding {{{}}}", encoding_version))
    })?;
    if known.kind.is_text() || !known.kind.can_read() {
        return Err(Error::UnsupportedEncoding(format!(
            "{} in a binary header",
            known.encoding.name
        )));
    }
    let format = Format::from_version(format_version);
    debug!(encoding = %known.encoding.name, format = %format.name, "reading binary KV3");

    let rest = &data[cursor.position() as usize..];
    let body: Cow<'_, [u8]> = match known.kind {
        EncodingKind::BinaryLz4 => Cow::Owned(decompress_lz4(rest)?),
        EncodingKind::BinaryBlockCompressed => Cow::Owned(block::decompress(rest)?),
        _ => Cow::Borrowed(rest),
    };

    let value = BodyReader::new(&body)?.read_body()?;
    Ok(Document {
        value,
        format,
        original_encoding: Some(known.encoding.clone()),
        comments: Vec::new(),
    })
}

fn read_uuid(cursor: &mut Cursor<&[u8]>) -> Result<Uuid> {
    let mut bytes = [0u8; 16];
    cursor.read_exact(&mut bytes)?;
    Ok(Uuid::from_bytes_le(bytes))
}

fn decompress_lz4(data: &[u8]) -> Result<Vec<u8>> {
    let mut cursor = Cursor::new(data);
    let size = cursor.read_u32::<LittleEndian>()? as usize;
    let body = lz4_flex::block::decompress(&data[4..], size)
        .map_err(|e| Error::CorruptData(format!("LZ4 decompression failed: {}", e)))?;
    if body.len() != size {
        return Err(Error::CorruptData(format!(
            "LZ4 body decompressed to {} bytes, expected {}",
            body.len(),
            size
        )));
    }
    Ok(body)
}

const COMPACT_BUDGET_FLOOR: usize = 1024;
const COMPACT_ELEMENTS_PER_BYTE: usize = 64;

/// Reads the string table and value stream of a decompressed body.
struct BodyReader<'a> {
    cursor: Cursor<&'a [u8]>,
    strings: Vec<String>,
    depth: usize,
    /// Payload-free typed array elements still allowed for this body.
    compact_budget: usize,
}

impl<'a> BodyReader<'a> {
    fn new(body: &'a [u8]) -> Result<Self> {
        let mut cursor = Cursor::new(body);
        let count = cursor.read_u32::<LittleEndian>()? as usize;
        let mut strings = Vec::with_capacity(count.min(body.len()));
        for _ in 0..count {
            let start = cursor.position() as usize;
            let len = body[start..]
                .iter()
                .position(|&b| b == 0)
                .ok_or_else(|| Error::corrupt("unterminated string in string table"))?;
            let s = std::str::from_utf8(&body[start..start + len])
                .map_err(|_| Error::corrupt("string table entry is not valid UTF-8"))?;
            strings.push(s.to_string());
            cursor.set_position((start + len + 1) as u64);
        }
        Ok(BodyReader {
            cursor,
            strings,
            depth: 0,
            compact_budget: body
                .len()
                .max(COMPACT_BUDGET_FLOOR)
                .saturating_mul(COMPACT_ELEMENTS_PER_BYTE),
        })
    }

    fn read_body(mut self) -> Result<Value> {
        let value = self.read_value()?;

        let remaining = self.remaining();
        if remaining >= 4 {
            let trailer = self.cursor.read_u32::<LittleEndian>()?;
            if trailer != TRAILER {
                return Err(Error::CorruptData(format!(
                    "expected trailer FFFFFFFF, found {:08X}",
                    trailer
                )));
            }
            if self.remaining() > 0 {
                debug!(bytes = self.remaining(), "ignoring data after trailer");
            }
        } else if remaining > 0 {
            return Err(Error::corrupt("truncated trailer"));
        }
        Ok(value)
    }

    fn remaining(&self) -> usize {
        let len = self.cursor.get_ref().len();
        len.saturating_sub(self.cursor.position() as usize)
    }

    fn read_type(&mut self) -> Result<(BinaryType, Flags)> {
        let byte = self.cursor.read_u8()?;
        let flags = if byte & FLAG_MARKER != 0 {
            Flags::from_bits(self.cursor.read_u8()?)
        } else {
            Flags::new()
        };
        Ok((BinaryType::try_from(byte & !FLAG_MARKER)?, flags))
    }

    fn read_value(&mut self) -> Result<Value> {
        let (ty, flags) = self.read_type()?;
        let value = self.read_payload(ty)?;
        Ok(Value::flagged(flags, value))
    }

    fn read_count(&mut self, what: &str) -> Result<usize> {
        let count = self.cursor.read_i32::<LittleEndian>()?;
        usize::try_from(count).map_err(|_| Error::CorruptData(format!("negative {} {}", what, count)))
    }

    fn read_string_ref(&mut self) -> Result<String> {
        let index = self.cursor.read_i32::<LittleEndian>()?;
        if index == -1 {
            return Ok(String::new());
        }
        usize::try_from(index)
            .ok()
            .and_then(|i| self.strings.get(i))
            .cloned()
            .ok_or_else(|| {
                Error::CorruptData(format!(
                    "string index {} out of range (table has {})",
                    index,
                    self.strings.len()
                ))
            })
    }

    /// Rejects counts the remaining input cannot back before anything is allocated.
    fn check_typed_array(&mut self, count: usize, element_type: BinaryType) -> Result<()> {
        let element_len = min_payload_len(element_type);
        if element_len == 0 {
            if count > self.compact_budget {
                return Err(Error::CorruptData(format!(
                    "typed array of {} payload-free elements is larger than the input allows",
                    count
                )));
            }
            self.compact_budget -= count;
            return Ok(());
        }
        let needed = count.checked_mul(element_len);
        if needed.map_or(true, |needed| needed > self.remaining()) {
            return Err(Error::CorruptData(format!(
                "typed array of {} elements extends past end of data",
                count
            )));
        }
        Ok(())
    }

    fn enter(&mut self) -> Result<()> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(Error::corrupt("values nested too deeply"));
        }
        Ok(())
    }

    fn read_payload(&mut self, ty: BinaryType) -> Result<Value> {
        Ok(match ty {
            BinaryType::Null => Value::Null,
            BinaryType::Bool => Value::Bool(self.cursor.read_u8()? != 0),
            BinaryType::Int64 => Value::Int64(self.cursor.read_i64::<LittleEndian>()?),
            BinaryType::UInt64 => Value::UInt64(self.cursor.read_u64::<LittleEndian>()?),
            BinaryType::Double => Value::Double(self.cursor.read_f64::<LittleEndian>()?),
            BinaryType::String => Value::String(self.read_string_ref()?),
            BinaryType::Blob => {
                let len = self.read_count("blob length")?;
                if len > self.remaining() {
                    return Err(Error::corrupt("blob extends past end of data"));
                }
                let mut bytes = vec![0u8; len];
                self.cursor.read_exact(&mut bytes)?;
                Value::Blob(bytes)
            }
            BinaryType::Array => {
                let count = self.read_count("array length")?;
                self.enter()?;
                let mut items = Vec::with_capacity(count.min(self.remaining()));
                for _ in 0..count {
                    items.push(self.read_value()?);
                }
                self.depth -= 1;
                Value::Array(items)
            }
            BinaryType::Object => {
                let count = self.read_count("member count")?;
                self.enter()?;
                let mut map = KvMap::with_capacity(count.min(self.remaining()));
                for _ in 0..count {
                    let key = self.read_string_ref()?;
                    let value = self.read_value()?;
                    map.insert(key, value);
                }
                self.depth -= 1;
                Value::Object(map)
            }
            BinaryType::TypedArray => {
                let count = self.cursor.read_u32::<LittleEndian>()? as usize;
                let (element_type, flags) = self.read_type()?;
                self.check_typed_array(count, element_type)?;
                self.enter()?;
                let mut items = Vec::with_capacity(count.min(self.remaining()));
                for _ in 0..count {
                    let item = self.read_payload(element_type)?;
                    items.push(Value::flagged(flags.clone(), item));
                }
                self.depth -= 1;
                Value::Array(items)
            }
            BinaryType::Int32 => Value::Int32(self.cursor.read_i32::<LittleEndian>()?),
            BinaryType::UInt32 => Value::UInt32(self.cursor.read_u32::<LittleEndian>()?),
            BinaryType::True => Value::Bool(true),
            BinaryType::False => Value::Bool(false),
            BinaryType::Int64Zero => Value::Int64(0),
            BinaryType::Int64One => Value::Int64(1),
            BinaryType::DoubleZero => Value::Double(0.0),
            BinaryType::DoubleOne => Value::Double(1.0),
        })
    }
}

/// Fewest payload bytes one typed array element of `ty` occupies.
fn min_payload_len(ty: BinaryType) -> usize {
    match ty {
        BinaryType::Null
        | BinaryType::True
        | BinaryType::False
        | BinaryType::Int64Zero
        | BinaryType::Int64One
        | BinaryType::DoubleZero
        | BinaryType::DoubleOne => 0,
        BinaryType::Bool => 1,
        BinaryType::Int32
        | BinaryType::UInt32
        | BinaryType::String
        | BinaryType::Blob
        | BinaryType::Array
        | BinaryType::Object => 4,
        BinaryType::TypedArray => 5,
        BinaryType::Int64 | BinaryType::UInt64 | BinaryType::Double => 8,
    }
}
