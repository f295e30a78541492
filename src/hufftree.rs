use std::cmp::Ordering;

use tracing::{debug, trace};

use crate::bit_vec::EncodedPayload;
use crate::code_table::{Code, CodeTable};
use crate::error::{HuffmanError, Result};
use crate::frequency::FrequencyTable;
use crate::min_heap::MinHeap;

/// A Huffman prefix-code tree, immutable once built.
///
/// Built with [`HuffmanTree::build`] or [`HuffmanTree::from_bytes`], or read
/// back with [`tree_codec::deserialize`](crate::tree_codec::deserialize).
/// An empty tree (no symbols) results from empty input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HuffmanTree {
    root: Option<HuffNode>,
}

impl HuffmanTree {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        HuffmanTree::build(&FrequencyTable::sample(bytes))
    }

    /// Build the tree by repeatedly combining the two lightest nodes.
    ///
    /// The first node extracted becomes the left child. Ties on weight are
    /// broken so that leaves come before internal nodes, leaves are ordered
    /// by symbol value and internal nodes by creation order, which makes the
    /// result a pure function of `frequencies`.
    ///
    /// A single-symbol alphabet gets an internal root with the leaf on the
    /// left and no right child, so the symbol's code is the one bit `0`.
    pub fn build(frequencies: &FrequencyTable) -> Result<Self> {
        let nodes: Vec<Candidate> = frequencies
            .iter()
            .map(|(symbol, count)| Candidate {
                node: HuffNode::new(symbol, count),
                rank: Rank::Leaf(symbol),
            })
            .collect();

        let root = match nodes.len() {
            0 => None,
            1 => {
                let leaf = nodes.into_iter().map(|c| c.node).next();
                let weight = leaf.as_ref().map_or(0, HuffNode::weight);
                Some(HuffNode::Internal {
                    weight,
                    left: leaf.map(Box::new),
                    right: None,
                })
            }
            _ => Some(Self::build_from_heap(MinHeap::build(nodes))?),
        };

        let tree = HuffmanTree { root };
        debug!(
            symbols = frequencies.len(),
            weight = tree.weight(),
            depth = tree.depth(),
            "built huffman tree"
        );
        Ok(tree)
    }

    fn build_from_heap(mut heap: MinHeap<Candidate>) -> Result<HuffNode> {
        let mut created = 0;
        while heap.heap_size() > 1 {
            let x = heap.extract_min()?;
            let y = heap.extract_min()?;

            heap.insert(Candidate {
                node: HuffNode::merge(x.node, y.node)?,
                rank: Rank::Internal(created),
            });
            created += 1;
        }
        Ok(heap.extract_min()?.node)
    }

    pub(crate) fn from_root(root: Option<HuffNode>) -> Self {
        HuffmanTree { root }
    }

    pub fn root(&self) -> Option<&HuffNode> {
        self.root.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Total weight, i.e. the number of symbols the tree was built from.
    pub fn weight(&self) -> u64 {
        self.root.as_ref().map_or(0, HuffNode::weight)
    }

    pub fn symbol_count(&self) -> usize {
        self.root.as_ref().map_or(0, HuffNode::leaf_count)
    }

    /// Length of the longest root-to-node path.
    pub fn depth(&self) -> usize {
        self.root.as_ref().map_or(0, HuffNode::depth)
    }

    pub fn code_table(&self) -> CodeTable {
        let mut table = CodeTable::default();
        if let Some(root) = &self.root {
            root.generate_table(&mut table, Code::new());
        }
        table
    }

    /// Code of a single symbol, found by searching the tree.
    pub fn code_for(&self, symbol: u8) -> Option<Code> {
        self.root.as_ref()?.find(symbol, Code::new())
    }

    pub fn frequencies(&self) -> FrequencyTable {
        let mut leaves = Vec::new();
        if let Some(root) = &self.root {
            root.collect_leaves(&mut leaves);
        }
        leaves.into_iter().collect()
    }

    /// Walk the tree for each valid bit of `payload`, emitting a symbol at
    /// every leaf and restarting from the root.
    ///
    /// Fails if there are bits but no tree, if a bit leads to an absent child,
    /// or if the bits end anywhere but at the root.
    pub fn decode(&self, payload: &EncodedPayload) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        self.decode_into(payload, &mut out)?;
        Ok(out)
    }

    pub(crate) fn decode_into(&self, payload: &EncodedPayload, out: &mut Vec<u8>) -> Result<()> {
        let root = match &self.root {
            Some(root) => root,
            None if payload.is_empty() => return Ok(()),
            None => {
                return Err(HuffmanError::malformed(format!(
                    "empty tree cannot decode {} bits",
                    payload.bit_count()
                )))
            }
        };

        let start = out.len();
        let mut bits = payload.bits();
        let mut current = root;
        while let Some(bit) = bits.next() {
            current = current.child(bit).ok_or_else(|| {
                HuffmanError::malformed(format!(
                    "bit {} leads to an absent child",
                    bits.position() - 1
                ))
            })?;

            if let HuffNode::Leaf { symbol, .. } = current {
                out.push(*symbol);
                current = root;
            }
        }

        if !std::ptr::eq(current, root) {
            return Err(HuffmanError::TruncatedPayload {
                decoded: out.len() - start,
                bit_count: payload.bit_count(),
            });
        }
        Ok(())
    }

    /// Indented dump of the tree, one node per line.
    pub fn structure(&self) -> String {
        let mut out = String::from("Huffman Tree Structure:\n");
        match &self.root {
            Some(root) => Self::print_node(&mut out, Some(root), 0, "root"),
            None => out.push_str("(empty)\n"),
        }
        out
    }

    fn print_node(out: &mut String, node: Option<&HuffNode>, depth: usize, label: &str) {
        let indent = "  ".repeat(depth);
        match node {
            None => out.push_str(&format!("{}{}-> (absent)\n", indent, label)),
            Some(HuffNode::Leaf { symbol, weight }) => out.push_str(&format!(
                "{}{}-> Leaf: {:?} ({}) [weight: {}]\n",
                indent, label, *symbol as char, symbol, weight
            )),
            Some(HuffNode::Internal {
                weight,
                left,
                right,
            }) => {
                out.push_str(&format!("{}{}-> Internal [weight: {}]\n", indent, label, weight));
                Self::print_node(out, left.as_deref(), depth + 1, "L");
                Self::print_node(out, right.as_deref(), depth + 1, "R");
            }
        }
    }
}

impl TryFrom<&[u8]> for HuffmanTree {
    type Error = HuffmanError;

    fn try_from(bytes: &[u8]) -> Result<Self> {
        HuffmanTree::from_bytes(bytes)
    }
}

impl TryFrom<&str> for HuffmanTree {
    type Error = HuffmanError;

    fn try_from(text: &str) -> Result<Self> {
        HuffmanTree::from_bytes(text.as_bytes())
    }
}

/// A node of a [`HuffmanTree`].
///
/// Internal children are optional only so the single-symbol root can have
/// an unreachable empty side; every other internal node has both children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HuffNode {
    Leaf {
        weight: u64,
        symbol: u8,
    },
    Internal {
        weight: u64,
        left: Option<Box<HuffNode>>,
        right: Option<Box<HuffNode>>,
    },
}

impl HuffNode {
    pub fn new(symbol: u8, weight: u64) -> Self {
        HuffNode::Leaf { weight, symbol }
    }

    pub fn weight(&self) -> u64 {
        match self {
            HuffNode::Leaf { weight, .. } => *weight,
            HuffNode::Internal { weight, .. } => *weight,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, HuffNode::Leaf { .. })
    }

    /// Combine two subtrees; `a` becomes the left child.
    pub fn merge(a: Self, b: Self) -> Result<Self> {
        let weight = a
            .weight()
            .checked_add(b.weight())
            .ok_or(HuffmanError::WeightOverflow(a.weight().max(b.weight())))?;
        Ok(HuffNode::Internal {
            weight,
            left: Some(Box::new(a)),
            right: Some(Box::new(b)),
        })
    }

    /// Child reached by `bit` (false = left, true = right), if any.
    pub fn child(&self, bit: bool) -> Option<&HuffNode> {
        match self {
            HuffNode::Leaf { .. } => None,
            HuffNode::Internal { left, right, .. } => {
                if bit {
                    right.as_deref()
                } else {
                    left.as_deref()
                }
            }
        }
    }

    fn children(&self) -> impl Iterator<Item = (bool, &HuffNode)> {
        [false, true]
            .into_iter()
            .filter_map(move |bit| self.child(bit).map(|node| (bit, node)))
    }

    fn generate_table(&self, table: &mut CodeTable, code: Code) {
        match self {
            HuffNode::Leaf { symbol, .. } => {
                trace!(symbol, code = %code, "assigned code");
                table.insert(*symbol, code);
            }
            HuffNode::Internal { .. } => {
                for (bit, child) in self.children() {
                    child.generate_table(table, code.with_bit(bit));
                }
            }
        }
    }

    fn find(&self, target: u8, code: Code) -> Option<Code> {
        match self {
            HuffNode::Leaf { symbol, .. } => (*symbol == target).then_some(code),
            HuffNode::Internal { .. } => self
                .children()
                .find_map(|(bit, child)| child.find(target, code.with_bit(bit))),
        }
    }

    fn collect_leaves(&self, leaves: &mut Vec<(u8, u64)>) {
        match self {
            HuffNode::Leaf { symbol, weight } => leaves.push((*symbol, *weight)),
            HuffNode::Internal { .. } => {
                for (_, child) in self.children() {
                    child.collect_leaves(leaves);
                }
            }
        }
    }

    fn leaf_count(&self) -> usize {
        match self {
            HuffNode::Leaf { .. } => 1,
            HuffNode::Internal { .. } => self.children().map(|(_, c)| c.leaf_count()).sum(),
        }
    }

    fn depth(&self) -> usize {
        self.children()
            .map(|(_, c)| c.depth() + 1)
            .max()
            .unwrap_or(0)
    }
}

/// Secondary ordering key for nodes of equal weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Rank {
    Leaf(u8),
    Internal(usize),
}

#[derive(Debug)]
struct Candidate {
    node: HuffNode,
    rank: Rank,
}

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Candidate {}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.node
            .weight()
            .cmp(&other.node.weight())
            .then(self.rank.cmp(&other.rank))
    }
}
