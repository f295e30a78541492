//! # huffpack
//!
//! Huffman coding of byte buffers, with a tree serialization that makes every
//! encoded payload self-describing.
//!
//! ## Quick Start
//!
//! ```rust
//! use huffpack::{CompressedData, HuffmanCodec};
//!
//! let compressed = HuffmanCodec::compress(b"aaabbc")?;
//! let bytes = compressed.serialize()?;
//!
//! let restored = CompressedData::deserialize(&bytes)?;
//! assert_eq!(HuffmanCodec::decompress(&restored)?, b"aaabbc");
//! # Ok::<(), huffpack::HuffmanError>(())
//! ```
//!
//! The pieces can also be driven one at a time, passing the tree explicitly:
//!
//! ```rust
//! use huffpack::{huffman_codec, FrequencyTable, HuffmanTree};
//!
//! let frequencies = FrequencyTable::sample(b"aaaa");
//! let tree = HuffmanTree::build(&frequencies)?;
//! let payload = huffman_codec::encode(&tree, b"aaaa")?;
//! assert_eq!(payload.bit_count(), 4);
//! assert_eq!(huffman_codec::decode(&tree, &payload)?, b"aaaa");
//! # Ok::<(), huffpack::HuffmanError>(())
//! ```

pub mod code_table;
pub mod compressed_data;
pub mod config;
pub mod error;
pub mod frequency;
pub mod huffman_codec;
pub mod hufftree;
pub mod tree_codec;

mod bit_vec;
mod min_heap;

pub use bit_vec::{BitReader, BitVec, EncodedPayload};
pub use code_table::{Code, CodeTable};
pub use compressed_data::CompressedData;
pub use config::CodecConfig;
pub use error::{HuffmanError, Result};
pub use frequency::FrequencyTable;
pub use huffman_codec::HuffmanCodec;
pub use hufftree::{HuffNode, HuffmanTree};
pub use min_heap::HeapErr;
