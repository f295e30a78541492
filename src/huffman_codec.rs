use std::io::{Read, Write};

use tracing::debug;

use crate::bit_vec::{BitVec, EncodedPayload};
use crate::code_table::CodeTable;
use crate::compressed_data::CompressedData;
use crate::config::CodecConfig;
use crate::error::{HuffmanError, Result};
use crate::hufftree::HuffmanTree;
use crate::tree_codec;

pub fn encode(tree: &HuffmanTree, data: &[u8]) -> Result<EncodedPayload> {
    encode_with_table(&tree.code_table(), data)
}

/// Append the code of every byte of `data`, in order.
///
/// Fails on the first byte that has no code, which means the table was not
/// built from this input.
pub fn encode_with_table(table: &CodeTable, data: &[u8]) -> Result<EncodedPayload> {
    // every code is at least one bit long
    let mut bit_vec = BitVec::with_bit_capacity(data.len());
    for (position, &symbol) in data.iter().enumerate() {
        let code = table
            .get(symbol)
            .ok_or(HuffmanError::SymbolNotInTable { symbol, position })?;
        bit_vec.push_code(code);
    }

    let payload = bit_vec.into_payload();
    debug!(
        symbols = data.len(),
        bits = payload.bit_count(),
        ratio = payload.compression_ratio(data.len()),
        "encoded payload"
    );
    Ok(payload)
}

pub fn decode(tree: &HuffmanTree, payload: &EncodedPayload) -> Result<Vec<u8>> {
    tree.decode(payload)
}

/// Like [`decode`], but also require exactly `symbol_count` symbols.
///
/// Fewer symbols than expected means bits were lost and is reported as
/// [`HuffmanError::TruncatedPayload`], even when the remaining bits happen to
/// end on a code boundary.
pub fn decode_exact(
    tree: &HuffmanTree,
    payload: &EncodedPayload,
    symbol_count: usize,
) -> Result<Vec<u8>> {
    // every code is at least one bit long
    let mut result = Vec::with_capacity(symbol_count.min(payload.bit_count()));
    tree.decode_into(payload, &mut result)?;

    // Validate we decoded the expected amount
    if result.len() < symbol_count {
        return Err(HuffmanError::TruncatedPayload {
            decoded: result.len(),
            bit_count: payload.bit_count(),
        });
    }
    if result.len() != symbol_count {
        return Err(HuffmanError::LengthMismatch {
            expected: symbol_count,
            actual: result.len(),
        });
    }
    Ok(result)
}

/// A tree together with the code table derived from it.
#[derive(Debug, Clone)]
pub struct HuffmanCodec {
    tree: HuffmanTree,
    encode_table: CodeTable,
}

impl HuffmanCodec {
    pub fn new(tree: HuffmanTree) -> Self {
        let encode_table = tree.code_table();
        HuffmanCodec { tree, encode_table }
    }

    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Ok(Self::new(HuffmanTree::from_bytes(data)?))
    }

    pub fn tree(&self) -> &HuffmanTree {
        &self.tree
    }

    pub fn code_table(&self) -> &CodeTable {
        &self.encode_table
    }

    /// Encode `data` into a self-contained container carrying this codec's tree.
    pub fn encode(&self, data: &[u8]) -> Result<CompressedData> {
        let payload = encode_with_table(&self.encode_table, data)?;
        // serialize the tree
        let tree_data = tree_codec::serialize(&self.tree)?;

        Ok(CompressedData {
            original_length: data.len(),
            tree_data,
            payload,
        })
    }

    /// Build a tree from `data` and encode it in one step.
    pub fn compress(data: &[u8]) -> Result<CompressedData> {
        Self::from_bytes(data)?.encode(data)
    }

    /// Decode a container using only the tree stored inside it.
    pub fn decompress(compressed: &CompressedData) -> Result<Vec<u8>> {
        // extract the tree
        let tree = tree_codec::deserialize(&compressed.tree_data)?;
        let result = decode_exact(&tree, &compressed.payload, compressed.original_length)?;

        debug!(
            symbols = result.len(),
            bits = compressed.payload.bit_count(),
            "decoded payload"
        );
        Ok(result)
    }

    pub fn compress_to<W: Write>(data: &[u8], writer: &mut W) -> Result<CompressedData> {
        let compressed = Self::compress(data)?;
        compressed.write_to(writer)?;
        Ok(compressed)
    }

    pub fn decompress_from<R: Read>(reader: &mut R, config: &CodecConfig) -> Result<Vec<u8>> {
        let compressed = CompressedData::read_from(reader, config)?;
        Self::decompress(&compressed)
    }
}
