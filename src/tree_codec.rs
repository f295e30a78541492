//! Binary preorder serialization of a [`HuffmanTree`].
//!
//! Each node is one record, written left subtree before right subtree:
//!
//! ```text
//! marker: u8        1 = node follows, 0 = absent child
//! symbol: u8        leaf symbol, 0 for internal nodes
//! weight: u32 LE
//! left record
//! right record
//! ```
//!
//! A record whose two children are both absent is a leaf. The empty tree is
//! the single byte `0`.

use std::io::{self, Cursor, Read, Write};

use crate::code_table::Code;
use crate::error::{HuffmanError, Result};
use crate::hufftree::{HuffNode, HuffmanTree};

const ABSENT: u8 = 0;
const PRESENT: u8 = 1;

/// Bytes taken by one present-node record, not counting its children.
const NODE_RECORD_LEN: usize = 1 + 1 + 4;

pub fn serialize(tree: &HuffmanTree) -> Result<Vec<u8>> {
    let mut bytes = Vec::with_capacity(serialized_len(tree));
    write_tree(tree, &mut bytes)?;
    Ok(bytes)
}

pub fn write_tree<W: Write>(tree: &HuffmanTree, writer: &mut W) -> Result<()> {
    write_node(tree.root(), writer)
}

fn write_node<W: Write>(node: Option<&HuffNode>, writer: &mut W) -> Result<()> {
    let Some(node) = node else {
        writer.write_all(&[ABSENT])?;
        return Ok(());
    };

    let weight = u32::try_from(node.weight())
        .map_err(|_| HuffmanError::WeightOverflow(node.weight()))?;
    let symbol = match node {
        HuffNode::Leaf { symbol, .. } => *symbol,
        HuffNode::Internal { .. } => 0,
    };

    writer.write_all(&[PRESENT, symbol])?;
    writer.write_all(&weight.to_le_bytes())?;
    write_node(node.child(false), writer)?;
    write_node(node.child(true), writer)
}

/// Size in bytes of [`serialize`]'s output, computed without writing.
pub fn serialized_len(tree: &HuffmanTree) -> usize {
    fn node_len(node: Option<&HuffNode>) -> usize {
        match node {
            None => 1,
            Some(node) => {
                NODE_RECORD_LEN + node_len(node.child(false)) + node_len(node.child(true))
            }
        }
    }
    node_len(tree.root())
}

/// Deserialize a tree that occupies all of `data`.
pub fn deserialize(data: &[u8]) -> Result<HuffmanTree> {
    let mut cursor = Cursor::new(data);
    let tree = read_tree(&mut cursor)?;

    let consumed = cursor.position() as usize;
    if consumed != data.len() {
        return Err(HuffmanError::malformed(format!(
            "{} trailing bytes after tree",
            data.len() - consumed
        )));
    }
    Ok(tree)
}

/// Read exactly one serialized tree from `reader`.
///
/// Rejects anything a built tree could not look like: unknown markers,
/// zero-weight or duplicate leaves, internal weights that are not the sum of
/// their children, a missing child anywhere except beside the single leaf of
/// a one-symbol root, and nesting deeper than any 256-symbol tree.
pub fn read_tree<R: Read>(reader: &mut R) -> Result<HuffmanTree> {
    let mut seen = [false; 256];
    let root = read_node(reader, 0, &mut seen)?;
    if let Some(HuffNode::Leaf { .. }) = root {
        return Err(HuffmanError::malformed("root is a bare leaf"));
    }
    Ok(HuffmanTree::from_root(root))
}

fn read_node<R: Read>(reader: &mut R, depth: usize, seen: &mut [bool; 256]) -> Result<Option<HuffNode>> {
    let mut header = [0u8; 1];
    read_exact(reader, &mut header)?;
    match header[0] {
        ABSENT => return Ok(None),
        PRESENT => {}
        other => {
            return Err(HuffmanError::malformed(format!(
                "unknown marker byte {} at depth {}",
                other, depth
            )))
        }
    }
    if depth >= Code::CAPACITY {
        return Err(HuffmanError::malformed(format!(
            "tree deeper than {} levels",
            Code::CAPACITY - 1
        )));
    }

    let mut record = [0u8; NODE_RECORD_LEN - 1];
    read_exact(reader, &mut record)?;
    let symbol = record[0];
    let weight = u64::from(u32::from_le_bytes([record[1], record[2], record[3], record[4]]));

    let left = read_node(reader, depth + 1, seen)?;
    let right = read_node(reader, depth + 1, seen)?;

    match (left, right) {
        (None, None) => {
            if weight == 0 {
                return Err(HuffmanError::malformed(format!(
                    "leaf {} has zero weight",
                    symbol
                )));
            }
            if std::mem::replace(&mut seen[symbol as usize], true) {
                return Err(HuffmanError::malformed(format!(
                    "symbol {} appears twice",
                    symbol
                )));
            }
            Ok(Some(HuffNode::Leaf { weight, symbol }))
        }
        (Some(left), Some(right)) => {
            let sum = left.weight() + right.weight();
            if sum != weight {
                return Err(HuffmanError::malformed(format!(
                    "internal weight {} differs from child sum {}",
                    weight, sum
                )));
            }
            Ok(Some(HuffNode::merge(left, right)?))
        }
        (Some(leaf @ HuffNode::Leaf { .. }), None) if depth == 0 && leaf.weight() == weight => {
            Ok(Some(HuffNode::Internal {
                weight,
                left: Some(Box::new(leaf)),
                right: None,
            }))
        }
        _ => Err(HuffmanError::malformed(format!(
            "internal node at depth {} is missing a child",
            depth
        ))),
    }
}

/// `read_exact` that reports running out of input as a malformed tree.
fn read_exact<R: Read>(reader: &mut R, buf: &mut [u8]) -> Result<()> {
    reader.read_exact(buf).map_err(|e| match e.kind() {
        io::ErrorKind::UnexpectedEof => HuffmanError::malformed("serialized tree is truncated"),
        _ => HuffmanError::Io(e),
    })
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_serialize_layout() {
        let tree = HuffmanTree::from_bytes(b"aab").unwrap();
        let bytes = serialize(&tree).unwrap();
        // root [b, a]
        assert_eq!(
            bytes,
            vec![
                1, 0, 3, 0, 0, 0, // root
                1, b'b', 1, 0, 0, 0, 0, 0, // leaf b
                1, b'a', 2, 0, 0, 0, 0, 0, // leaf a
            ]
        );
    }

    #[test]
    fn test_empty_tree_is_one_byte() {
        let tree = HuffmanTree::default();
        assert_eq!(serialize(&tree).unwrap(), vec![0]);
        assert_eq!(serialized_len(&tree), 1);
        assert!(deserialize(&[0]).unwrap().is_empty());
    }

    #[test]
    fn test_single_symbol_root() {
        let tree = HuffmanTree::from_bytes(b"zzz").unwrap();
        let bytes = serialize(&tree).unwrap();
        assert_eq!(
            bytes,
            vec![1, 0, 3, 0, 0, 0, 1, b'z', 3, 0, 0, 0, 0, 0, 0]
        );
        let back = deserialize(&bytes).unwrap();
        assert_eq!(back, tree);
        assert_eq!(back.code_table(), tree.code_table());
    }

    #[test]
    fn test_round_trip_preserves_codes() {
        let data: Vec<u8> = (0..=255u8).cycle().take(5000).chain(b"skew".repeat(40)).collect();
        let tree = HuffmanTree::from_bytes(&data).unwrap();
        let bytes = serialize(&tree).unwrap();
        assert_eq!(bytes.len(), serialized_len(&tree));
        assert_eq!(bytes.len(), 511 * NODE_RECORD_LEN + 512);

        let back = deserialize(&bytes).unwrap();
        assert_eq!(back.code_table(), tree.code_table());
    }

    #[test]
    fn test_weight_overflow() {
        let freq = [(1u8, u64::from(u32::MAX)), (2, 1)].into_iter().collect();
        let tree = HuffmanTree::build(&freq).unwrap();
        assert!(matches!(
            serialize(&tree),
            Err(HuffmanError::WeightOverflow(w)) if w == u64::from(u32::MAX) + 1
        ));
    }

    #[test]
    fn test_truncated_tree() {
        let bytes = serialize(&HuffmanTree::from_bytes(b"abc").unwrap()).unwrap();
        for len in 0..bytes.len() {
            assert!(
                matches!(deserialize(&bytes[..len]), Err(HuffmanError::MalformedTree(_))),
                "prefix of {} bytes accepted",
                len
            );
        }
    }

    #[test]
    fn test_trailing_bytes_rejected() {
        let mut bytes = serialize(&HuffmanTree::from_bytes(b"abc").unwrap()).unwrap();
        bytes.push(0);
        assert!(matches!(deserialize(&bytes), Err(HuffmanError::MalformedTree(_))));
    }

    #[test]
    fn test_read_tree_leaves_rest_of_stream() {
        let tree = HuffmanTree::from_bytes(b"abcabc").unwrap();
        let mut bytes = serialize(&tree).unwrap();
        bytes.extend_from_slice(b"rest");
        let mut cursor = Cursor::new(bytes.as_slice());
        assert_eq!(read_tree(&mut cursor).unwrap(), tree);
        assert_eq!(cursor.position() as usize, bytes.len() - 4);
    }

    #[test]
    fn test_rejects_bad_marker() {
        assert!(matches!(deserialize(&[7]), Err(HuffmanError::MalformedTree(_))));
    }

    #[test]
    fn test_rejects_bare_leaf_root() {
        let bytes = [1, b'a', 1, 0, 0, 0, 0, 0];
        assert!(matches!(deserialize(&bytes), Err(HuffmanError::MalformedTree(_))));
    }

    #[test]
    fn test_rejects_inconsistent_weight() {
        let mut bytes = serialize(&HuffmanTree::from_bytes(b"aab").unwrap()).unwrap();
        bytes[2] = 4;
        assert!(matches!(deserialize(&bytes), Err(HuffmanError::MalformedTree(_))));
    }

    #[test]
    fn test_rejects_duplicate_symbol() {
        let bytes = [
            1, 0, 2, 0, 0, 0, //
            1, b'a', 1, 0, 0, 0, 0, 0, //
            1, b'a', 1, 0, 0, 0, 0, 0,
        ];
        assert!(matches!(deserialize(&bytes), Err(HuffmanError::MalformedTree(_))));
    }

    #[test]
    fn test_rejects_missing_child_below_root() {
        // root [leaf a, internal(leaf b, absent)]
        let bytes = [
            1, 0, 2, 0, 0, 0, //
            1, b'a', 1, 0, 0, 0, 0, 0, //
            1, 0, 1, 0, 0, 0, //
            1, b'b', 1, 0, 0, 0, 0, 0, //
            0,
        ];
        assert!(matches!(deserialize(&bytes), Err(HuffmanError::MalformedTree(_))));
    }

    #[test]
    fn test_rejects_excessive_depth() {
        // A left spine of 300 internal nodes never reaches a valid leaf.
        let mut bytes = Vec::new();
        for _ in 0..300 {
            bytes.extend_from_slice(&[1, 0, 1, 0, 0, 0]);
        }
        assert!(matches!(deserialize(&bytes), Err(HuffmanError::MalformedTree(_))));
    }
}
