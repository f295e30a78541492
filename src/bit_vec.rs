use crate::code_table::Code;
use crate::error::{HuffmanError, Result};

/// Packs bits into bytes, most significant bit first.
#[derive(Default, Debug)]
pub struct BitVec {
    bits: Vec<u8>,
    bit_count: usize,
}

impl BitVec {
    pub fn new() -> Self {
        BitVec {
            bits: Vec::new(),
            bit_count: 0,
        }
    }

    pub fn with_bit_capacity(bits: usize) -> Self {
        BitVec {
            bits: Vec::with_capacity(bits.div_ceil(8)),
            bit_count: 0,
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bits
    }

    pub fn bit_count(&self) -> usize {
        self.bit_count
    }

    pub fn push_bit(&mut self, bit: bool) {
        let byte_index = self.bit_count / 8; // which byte is target?
        let bit_offset = self.bit_count % 8; // which bit position is target?

        // make a new byte if needed
        if byte_index >= self.bits.len() {
            self.bits.push(0);
        }

        if bit {
            self.bits[byte_index] |= 1 << (7 - bit_offset);
        }

        self.bit_count += 1;
    }

    pub fn push_code(&mut self, code: &Code) {
        for bit in code.iter() {
            self.push_bit(bit);
        }
    }

    pub fn into_payload(self) -> EncodedPayload {
        EncodedPayload {
            bytes: self.bits,
            bit_count: self.bit_count,
        }
    }
}

/// Packed bits together with the number of bits that are meaningful.
///
/// The final byte is zero-padded in its low-order bits. Only the first
/// `bit_count` bits are ever read back.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EncodedPayload {
    bytes: Vec<u8>,
    bit_count: usize,
}

impl EncodedPayload {
    /// Wrap packed bytes, checking that `bit_count` needs exactly `bytes.len()` bytes.
    pub fn new(bytes: Vec<u8>, bit_count: usize) -> Result<Self> {
        if bit_count.div_ceil(8) != bytes.len() {
            return Err(HuffmanError::BitCountMismatch {
                bit_count,
                byte_len: bytes.len(),
            });
        }
        Ok(EncodedPayload { bytes, bit_count })
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn bit_count(&self) -> usize {
        self.bit_count
    }

    pub fn is_empty(&self) -> bool {
        self.bit_count == 0
    }

    /// Keep only the first `bit_count` bits, re-padding the final byte.
    /// Does nothing if the payload is already that short.
    pub fn truncate(&mut self, bit_count: usize) {
        if bit_count >= self.bit_count {
            return;
        }
        self.bytes.truncate(bit_count.div_ceil(8));
        let used = bit_count % 8;
        if used != 0 {
            if let Some(last) = self.bytes.last_mut() {
                *last &= 0xFFu8 << (8 - used);
            }
        }
        self.bit_count = bit_count;
    }

    pub fn bits(&self) -> BitReader<'_> {
        BitReader {
            bytes: &self.bytes,
            position: 0,
            bit_count: self.bit_count,
        }
    }

    /// Packed bit length over original bit length, `1.0` when nothing was encoded.
    pub fn compression_ratio(&self, original_len: usize) -> f64 {
        if original_len == 0 {
            return 1.0;
        }
        self.bit_count as f64 / (original_len as f64 * 8.0)
    }
}

/// Reads the valid bits of a payload MSB-first; never yields padding.
#[derive(Debug, Clone)]
pub struct BitReader<'a> {
    bytes: &'a [u8],
    position: usize,
    bit_count: usize,
}

impl BitReader<'_> {
    pub fn position(&self) -> usize {
        self.position
    }
}

impl Iterator for BitReader<'_> {
    type Item = bool;

    fn next(&mut self) -> Option<bool> {
        if self.position >= self.bit_count {
            return None;
        }
        let byte = self.bytes[self.position / 8];
        let bit = (byte >> (7 - self.position % 8)) & 1 == 1;
        self.position += 1;
        Some(bit)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.bit_count - self.position;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for BitReader<'_> {}
