use std::io::{self, Cursor, Read, Write};

use tracing::warn;

use crate::bit_vec::EncodedPayload;
use crate::config::CodecConfig;
use crate::error::{HuffmanError, Result};

pub const MAGIC: [u8; 3] = *b"HUF";

pub const VERSION: u8 = 1;

/// magic + version + original length + bit count + tree length + payload length
const HEADER_LEN: usize = 3 + 1 + 8 + 8 + 8 + 8;

/// A self-contained encoding: the serialized tree, the packed payload, and
/// the counts needed to read them back unambiguously.
///
/// Layout, integers little-endian:
///
/// ```text
/// magic "HUF" | version u8 | original length u64 | bit count u64
/// tree length u64 | tree bytes | payload length u64 | payload bytes
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressedData {
    pub original_length: usize,
    pub tree_data: Vec<u8>,
    pub payload: EncodedPayload,
}

impl CompressedData {
    pub fn serialize(&self) -> Result<Vec<u8>> {
        let mut bytes = Vec::with_capacity(self.serialized_len());
        self.write_to(&mut bytes)?;
        Ok(bytes)
    }

    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_all(&MAGIC)?;
        writer.write_all(&[VERSION])?;

        // write the original length
        writer.write_all(&(self.original_length as u64).to_le_bytes())?;

        // write the total bit count
        writer.write_all(&(self.payload.bit_count() as u64).to_le_bytes())?;

        // write the tree data length, then tree data
        writer.write_all(&(self.tree_data.len() as u64).to_le_bytes())?;
        writer.write_all(&self.tree_data)?;

        // write compressed data length, then data
        let data = self.payload.as_bytes();
        writer.write_all(&(data.len() as u64).to_le_bytes())?;
        writer.write_all(data)?;

        Ok(())
    }

    pub fn serialized_len(&self) -> usize {
        HEADER_LEN + self.tree_data.len() + self.payload.as_bytes().len()
    }

    /// Container size over original size, `1.0` for an empty original.
    pub fn stored_ratio(&self) -> f64 {
        if self.original_length == 0 {
            return 1.0;
        }
        self.serialized_len() as f64 / self.original_length as f64
    }

    pub fn deserialize(bytes: &[u8]) -> Result<CompressedData> {
        Self::deserialize_with(bytes, &CodecConfig::default())
    }

    /// Parse a container that occupies all of `bytes`.
    pub fn deserialize_with(bytes: &[u8], config: &CodecConfig) -> Result<CompressedData> {
        let mut cursor = Cursor::new(bytes);
        let data = Self::read_from(&mut cursor, config)?;

        let consumed = cursor.position() as usize;
        if consumed != bytes.len() {
            warn!(trailing = bytes.len() - consumed, "rejected container");
            return Err(HuffmanError::TrailingBytes(bytes.len() - consumed));
        }
        Ok(data)
    }

    /// Read one container from `reader`, checking every length field against
    /// `config` before allocating for it.
    pub fn read_from<R: Read>(reader: &mut R, config: &CodecConfig) -> Result<CompressedData> {
        Self::read_fields(reader, config).inspect_err(|err| warn!(%err, "rejected container"))
    }

    fn read_fields<R: Read>(reader: &mut R, config: &CodecConfig) -> Result<CompressedData> {
        let mut magic = [0u8; 3];
        reader.read_exact(&mut magic)?;
        if magic != MAGIC {
            return Err(HuffmanError::InvalidMagic(magic));
        }

        let version = read_u8(reader)?;
        if version != VERSION {
            return Err(HuffmanError::UnsupportedVersion(version));
        }

        let original_length = read_len(reader, "original length", config.max_original_len)?;
        let bit_count = read_u64(reader)?;

        let tree_len = read_len(reader, "tree", config.max_tree_len)?;
        let tree_data = read_bytes(reader, tree_len)?;

        let data_len = read_len(reader, "payload", config.max_payload_len)?;
        let compressed_bits = read_bytes(reader, data_len)?;

        let bit_count = usize::try_from(bit_count).map_err(|_| HuffmanError::LimitExceeded {
            field: "bit count",
            actual: bit_count,
            limit: usize::MAX as u64,
        })?;

        Ok(CompressedData {
            original_length,
            tree_data,
            payload: EncodedPayload::new(compressed_bits, bit_count)?,
        })
    }
}

fn read_u8<R: Read>(reader: &mut R) -> Result<u8> {
    let mut byte = [0u8; 1];
    reader.read_exact(&mut byte)?;
    Ok(byte[0])
}

fn read_u64<R: Read>(reader: &mut R) -> Result<u64> {
    let mut bytes = [0u8; 8];
    reader.read_exact(&mut bytes)?;
    Ok(u64::from_le_bytes(bytes))
}

/// Read exactly `len` bytes, growing the buffer only as data arrives.
fn read_bytes<R: Read>(reader: &mut R, len: usize) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    reader.take(len as u64).read_to_end(&mut buf)?;
    if buf.len() != len {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            format!("expected {} bytes, got {}", len, buf.len()),
        )
        .into());
    }
    Ok(buf)
}

/// Read a u64 length field and check it against `limit`.
fn read_len<R: Read>(reader: &mut R, field: &'static str, limit: u64) -> Result<usize> {
    let len = read_u64(reader)?;
    if len > limit {
        return Err(HuffmanError::LimitExceeded {
            field,
            actual: len,
            limit,
        });
    }
    usize::try_from(len).map_err(|_| HuffmanError::LimitExceeded {
        field,
        actual: len,
        limit: usize::MAX as u64,
    })
}
