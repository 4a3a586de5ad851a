//! The VKV3 binary container.
//!
//! ```text
//! "VKV\x03" | encoding UUID (16) | format UUID (16) | body
//! ```
//!
//! The body is stored as-is, LZ4-compressed behind a `u32` uncompressed
//! length, or (read only) in Valve's older block compression. Once
//! decompressed it holds a string table, the value stream and a
//! `FF FF FF FF` trailer. All integers are little-endian.

mod block;
mod reader;
mod writer;

pub use reader::read;
pub use writer::write;

use crate::{Error, Result};

pub const MAGIC: [u8; 4] = *b"VKV\x03";

/// Magics of the KV3 v1-v5 containers (`\x01 3VK` ... `\x05 3VK`).
pub const NEW_MAGICS: [[u8; 4]; 5] = [
    [0x01, b'3', b'V', b'K'],
    [0x02, b'3', b'V', b'K'],
    [0x03, b'3', b'V', b'K'],
    [0x04, b'3', b'V', b'K'],
    [0x05, b'3', b'V', b'K'],
];

pub const TRAILER: u32 = 0xFFFF_FFFF;

/// Set on a type byte when a flag byte follows it.
pub const FLAG_MARKER: u8 = 0x80;

const MAX_DEPTH: usize = 512;

/// Type byte of an encoded value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum BinaryType {
    Null = 1,
    Bool = 2,
    Int64 = 3,
    UInt64 = 4,
    Double = 5,
    String = 6,
    Blob = 7,
    Array = 8,
    Object = 9,
    TypedArray = 10,
    Int32 = 11,
    UInt32 = 12,
    True = 13,
    False = 14,
    Int64Zero = 15,
    Int64One = 16,
    DoubleZero = 17,
    DoubleOne = 18,
}

impl TryFrom<u8> for BinaryType {
    type Error = Error;

    fn try_from(byte: u8) -> Result<Self> {
        Ok(match byte {
            1 => BinaryType::Null,
            2 => BinaryType::Bool,
            3 => BinaryType::Int64,
            4 => BinaryType::UInt64,
            5 => BinaryType::Double,
            6 => BinaryType::String,
            7 => BinaryType::Blob,
            8 => BinaryType::Array,
            9 => BinaryType::Object,
            10 => BinaryType::TypedArray,
            11 => BinaryType::Int32,
            12 => BinaryType::UInt32,
            13 => BinaryType::True,
            14 => BinaryType::False,
            15 => BinaryType::Int64Zero,
            16 => BinaryType::Int64One,
            17 => BinaryType::DoubleZero,
            18 => BinaryType::DoubleOne,
            other => return Err(Error::CorruptData(format!("unknown type byte {}", other))),
        })
    }
}

/// Whether `data` starts with the VKV3 magic.
#[must_use]
pub fn is_vkv3(data: &[u8]) -> bool {
    data.starts_with(&MAGIC)
}

/// The KV3 container version (1-5) if `data` starts with one of the newer magics.
#[must_use]
pub fn new_magic_version(data: &[u8]) -> Option<u8> {
    NEW_MAGICS
        .iter()
        .find(|magic| data.starts_with(&magic[..]))
        .map(|magic| magic[0])
}
