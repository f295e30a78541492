use thiserror::Error;

use crate::min_heap::HeapErr;

/// Error variants for building, encoding, decoding and (de)serializing.
///
/// Empty input is never an error: it produces an empty tree, an empty payload
/// and an empty decode.
#[derive(Debug, Error)]
pub enum HuffmanError {
    #[error("byte 0x{symbol:02x} at position {position} has no code in the table")]
    SymbolNotInTable { symbol: u8, position: usize },

    #[error("malformed tree: {0}")]
    MalformedTree(String),

    /// The valid bits ran out before every symbol was decoded.
    #[error("payload truncated: {bit_count} bits decode only {decoded} symbols")]
    TruncatedPayload { decoded: usize, bit_count: usize },

    #[error("bit count {bit_count} does not match a payload of {byte_len} bytes")]
    BitCountMismatch { bit_count: usize, byte_len: usize },

    #[error("expected {expected} symbols, decoded {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    /// A weight does not fit the 4-byte on-disk field, or a sum of weights
    /// does not fit in memory.
    #[error("weight {0} is too large")]
    WeightOverflow(u64),

    #[error("invalid magic bytes {0:02x?}")]
    InvalidMagic([u8; 3]),

    #[error("unsupported container version {0}")]
    UnsupportedVersion(u8),

    #[error("{0} trailing bytes after the end of the data")]
    TrailingBytes(usize),

    #[error("{field} of {actual} bytes exceeds the limit of {limit}")]
    LimitExceeded {
        field: &'static str,
        actual: u64,
        limit: u64,
    },

    #[error("heap error: {0}")]
    Heap(#[from] HeapErr),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl HuffmanError {
    pub fn malformed(message: impl Into<String>) -> Self {
        HuffmanError::MalformedTree(message.into())
    }
}

pub type Result<T> = std::result::Result<T, HuffmanError>;
