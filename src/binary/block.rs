//! Valve's legacy block compression (`binarybc`), decode only.
//!
//! A 4-byte header holds the uncompressed size in its low 24 bits; bit
//! `0x80` of the last byte marks a body that is stored uncompressed. The
//! compressed stream is a `u16` mask followed by 16 steps: a clear bit copies
//! one literal byte, a set bit reads a `u16` back reference with a 12-bit
//! offset (minus one) and a 4-bit length (minus three).

use crate::{Error, Result};
use byteorder::{LittleEndian, ReadBytesExt};
use std::io::{Cursor, Read};

const STORED: u8 = 0x80;

pub(crate) fn decompress(input: &[u8]) -> Result<Vec<u8>> {
    let mut cursor = Cursor::new(input);
    let mut header = [0u8; 4];
    cursor.read_exact(&mut header)?;
    let size = usize::from(header[0]) | usize::from(header[1]) << 8 | usize::from(header[2]) << 16;

    if header[3] & STORED != 0 {
        return Ok(input[4..].to_vec());
    }

    let mut out = Vec::with_capacity(size);
    'blocks: while out.len() < size {
        let mask = cursor.read_u16::<LittleEndian>()?;
        for bit in 0..16 {
            if mask & (1 << bit) == 0 {
                out.push(cursor.read_u8()?);
            } else {
                let token = cursor.read_u16::<LittleEndian>()?;
                let offset = usize::from(token >> 4) + 1;
                let len = usize::from(token & 0xF) + 3;
                if offset > out.len() {
                    return Err(Error::corrupt("back reference before start of output"));
                }
                // Overlapping copies repeat the last `offset` bytes.
                let start = out.len() - offset;
                for i in 0..len {
                    let byte = out[start + i];
                    out.push(byte);
                }
            }
            if out.len() >= size {
                break 'blocks;
            }
        }
    }

    if out.len() != size {
        return Err(Error::CorruptData(format!(
            "block decompressed to {} bytes, expected {}",
            out.len(),
            size
        )));
    }
    Ok(out)
}
