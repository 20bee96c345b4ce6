//! Static Huffman coding over multi-byte symbols.
//!
//! Classic minimum-redundancy prefix codes (Huffman, 1952), built once
//! per file from the full frequency table. The alphabet is not limited to
//! single bytes: any symbol the tokenizer emits, keyword or raw byte, is
//! a leaf of its own.
//!
//! Besides construction and code derivation this module owns the on-disk
//! tree format. The topology is serialized preorder, one bit per node,
//! and must stay bit-exact: two conformant implementations have to
//! produce interchangeable archives.

use std::collections::{BinaryHeap, HashMap};
use std::io::{Read, Write};

use bitvec::prelude::*;

use crate::bitio::{BitReader, BitWriter, Bits};
use crate::error::{Error, Result};
use crate::model::FrequencyTable;
use crate::tokenizer::{Symbol, MAX_SYMBOL_LEN};

/// Mapping from symbol to its prefix-free code.
pub type CodeTable = HashMap<Symbol, Bits>;

/// Huffman tree node. Internal nodes own exactly two children; only
/// leaves carry symbols.
#[derive(Debug)]
enum Node {
    Leaf {
        symbol: Symbol,
        freq: u64,
    },
    Internal {
        freq: u64,
        left: Box<Node>,
        right: Box<Node>,
    },
}

impl Node {
    fn freq(&self) -> u64 {
        match self {
            Node::Leaf { freq, .. } => *freq,
            Node::Internal { freq, .. } => *freq,
        }
    }
}

/// Queue entry ordering subtrees by frequency, then by the smallest leaf
/// symbol they contain. The secondary key makes equal-frequency merges
/// deterministic, so two encoders of the same input produce identical
/// archives.
#[derive(Debug)]
struct Pending {
    freq: u64,
    key: Symbol,
    node: Node,
}

impl PartialEq for Pending {
    fn eq(&self, other: &Self) -> bool {
        (self.freq, &self.key) == (other.freq, &other.key)
    }
}

impl Eq for Pending {}

impl Ord for Pending {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // Min-priority queue
        (other.freq, &other.key).cmp(&(self.freq, &self.key))
    }
}

impl PartialOrd for Pending {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// A static prefix-code tree over the symbols of one frequency table.
///
/// The node graph is exclusively owned by this value and torn down
/// iteratively when it goes out of scope, so deserialized trees of
/// arbitrary depth cannot exhaust the stack.
pub struct HuffmanTree {
    root: Option<Box<Node>>,
}

impl HuffmanTree {
    /// Build the optimal tree for `table`.
    ///
    /// One leaf is created per distinct symbol; the two lowest-priority
    /// subtrees are merged repeatedly, the first-popped becoming the
    /// LEFT child, until a single root remains. An empty table is
    /// rejected with [`Error::EmptyModel`].
    pub fn build(table: &FrequencyTable) -> Result<Self> {
        if table.is_empty() {
            return Err(Error::EmptyModel);
        }

        let mut queue = BinaryHeap::with_capacity(table.len());
        for (symbol, freq) in table.iter() {
            queue.push(Pending {
                freq,
                key: symbol.clone(),
                node: Node::Leaf {
                    symbol: symbol.clone(),
                    freq,
                },
            });
        }

        while queue.len() > 1 {
            let left = queue.pop().unwrap();
            let right = queue.pop().unwrap();
            let freq = left.freq + right.freq;
            queue.push(Pending {
                freq,
                key: left.key.min(right.key),
                node: Node::Internal {
                    freq,
                    left: Box::new(left.node),
                    right: Box::new(right.node),
                },
            });
        }

        Ok(Self {
            root: queue.pop().map(|pending| Box::new(pending.node)),
        })
    }

    /// Derive the code table: 0 on descent into the left child, 1 into
    /// the right, one entry recorded at each leaf and none at internal
    /// nodes.
    ///
    /// A tree with a single leaf has no edge to descend, so the lone
    /// symbol is assigned the one-bit code `0`; [`Self::decode_symbols`]
    /// mirrors that case.
    pub fn code_table(&self) -> CodeTable {
        let mut table = CodeTable::new();
        let Some(root) = self.root.as_deref() else {
            return table;
        };

        let mut stack: Vec<(&Node, Bits)> = vec![(root, Bits::new())];
        while let Some((node, prefix)) = stack.pop() {
            match node {
                Node::Leaf { symbol, .. } => {
                    let code = if prefix.is_empty() {
                        bitvec![u8, Msb0; 0]
                    } else {
                        prefix
                    };
                    table.insert(symbol.clone(), code);
                }
                Node::Internal { left, right, .. } => {
                    let mut left_prefix = prefix.clone();
                    left_prefix.push(false);
                    let mut right_prefix = prefix;
                    right_prefix.push(true);
                    stack.push((right, right_prefix));
                    stack.push((left, left_prefix));
                }
            }
        }
        table
    }

    /// Serialize the tree topology, preorder and bit-exact: an internal
    /// node is the bit 0 followed by its left then right subtree; a leaf
    /// is the bit 1, an 8-bit symbol length, then each symbol byte
    /// MSB-first.
    pub fn write<W: Write>(&self, bw: &mut BitWriter<W>) -> Result<()> {
        let Some(root) = self.root.as_deref() else {
            return Ok(());
        };

        let mut stack = vec![root];
        while let Some(node) = stack.pop() {
            match node {
                Node::Internal { left, right, .. } => {
                    bw.write_bit(false)?;
                    stack.push(right);
                    stack.push(left);
                }
                Node::Leaf { symbol, .. } => {
                    debug_assert!(symbol.len() <= MAX_SYMBOL_LEN);
                    bw.write_bit(true)?;
                    bw.write_byte(symbol.len() as u8)?;
                    for &byte in symbol.as_bytes() {
                        bw.write_byte(byte)?;
                    }
                }
            }
        }
        Ok(())
    }

    /// Deserialize a tree written by [`Self::write`].
    ///
    /// The bit stream alone delimits the topology: a tree is complete
    /// exactly when every internal node has both subtrees. Hitting the
    /// end-of-stream sentinel anywhere inside the topology means the
    /// archive was truncated, which is [`Error::CorruptTree`] rather
    /// than a normal end of input.
    pub fn read<R: Read>(br: &mut BitReader<R>) -> Result<Self> {
        // Explicit parse stack: `None` marks an internal node still
        // waiting for its left subtree, `Some(left)` one waiting for its
        // right.
        let mut stack: Vec<Option<Node>> = Vec::new();

        loop {
            let bit = br
                .read_bit()?
                .ok_or(Error::CorruptTree("unexpected end of stream in tree"))?;

            let mut node = if bit {
                Self::read_leaf(br)?
            } else {
                stack.push(None);
                continue;
            };

            // A completed subtree either finishes the whole tree, slots
            // in as a pending left child, or closes an internal node and
            // bubbles up.
            loop {
                match stack.pop() {
                    None => {
                        return Ok(Self {
                            root: Some(Box::new(node)),
                        })
                    }
                    Some(None) => {
                        stack.push(Some(node));
                        break;
                    }
                    Some(Some(left)) => {
                        let freq = left.freq() + node.freq();
                        node = Node::Internal {
                            freq,
                            left: Box::new(left),
                            right: Box::new(node),
                        };
                    }
                }
            }
        }
    }

    fn read_leaf<R: Read>(br: &mut BitReader<R>) -> Result<Node> {
        let len = br
            .read_byte()?
            .ok_or(Error::CorruptTree("unexpected end of stream in symbol length"))?;
        if len == 0 {
            return Err(Error::CorruptTree("zero-length symbol"));
        }
        let mut bytes = Vec::with_capacity(len as usize);
        for _ in 0..len {
            let byte = br
                .read_byte()?
                .ok_or(Error::CorruptTree("unexpected end of stream in symbol"))?;
            bytes.push(byte);
        }
        Ok(Node::Leaf {
            symbol: Symbol::from_bytes(&bytes),
            // Frequencies are not serialized; decoding never consults them.
            freq: 0,
        })
    }

    /// Decode exactly `total_symbols` symbols from the bit stream into
    /// `sink`.
    ///
    /// Each bit moves a cursor down the tree, 1 to the right child and 0
    /// to the left; reaching a leaf emits its bytes and resets the
    /// cursor. Termination is governed by the count, never by end of
    /// stream: the final body byte is zero-padded and padding bits are
    /// indistinguishable from code bits. A root that is itself a leaf
    /// consumes one bit per symbol, mirroring the one-bit code
    /// [`Self::code_table`] assigns it.
    pub fn decode_symbols<R: Read, W: Write>(
        &self,
        br: &mut BitReader<R>,
        total_symbols: u64,
        sink: &mut W,
    ) -> Result<()> {
        let root = self
            .root
            .as_deref()
            .ok_or(Error::CorruptTree("empty tree"))?;

        let mut cursor = root;
        let mut written = 0u64;
        while written < total_symbols {
            let bit = br
                .read_bit()?
                .ok_or(Error::CorruptTree("unexpected end of stream in body"))?;
            if let Node::Internal { left, right, .. } = cursor {
                cursor = if bit { right } else { left };
            }
            if let Node::Leaf { symbol, .. } = cursor {
                sink.write_all(symbol.as_bytes())?;
                cursor = root;
                written += 1;
            }
        }
        Ok(())
    }

    #[cfg(test)]
    fn node_counts(&self) -> (usize, usize) {
        let mut leaves = 0;
        let mut internals = 0;
        let mut stack: Vec<&Node> = self.root.as_deref().into_iter().collect();
        while let Some(node) = stack.pop() {
            match node {
                Node::Leaf { .. } => leaves += 1,
                Node::Internal { left, right, .. } => {
                    internals += 1;
                    stack.push(right);
                    stack.push(left);
                }
            }
        }
        (leaves, internals)
    }

    #[cfg(test)]
    fn root_freq(&self) -> u64 {
        self.root.as_deref().map_or(0, Node::freq)
    }
}

impl Drop for HuffmanTree {
    fn drop(&mut self) {
        // Dismantle with an explicit worklist; a deserialized tree can be
        // skewed arbitrarily deep and the compiler-generated recursive
        // drop would overflow the stack on it.
        let mut stack = Vec::new();
        if let Some(root) = self.root.take() {
            stack.push(root);
        }
        while let Some(node) = stack.pop() {
            if let Node::Internal { left, right, .. } = *node {
                stack.push(left);
                stack.push(right);
            }
        }
    }
}
