//! Huffman code tree.
//!
//! The encoder builds the tree bottom-up from word frequencies and walks it
//! once to produce a [`CodeTable`]. The decoder rebuilds an equivalent tree
//! top-down from the table and uses it as a state machine, one bit per step.
//!
//! # Construction
//!
//! Leaves are queued in ascending word order. The two lightest nodes are
//! popped, the first becoming the left child and the second the right child
//! of a new internal node, until one node remains. Equal weights leave the
//! queue in insertion order, so the tree is a pure function of the frequency
//! table.

use std::collections::BTreeMap;

use crate::code::{Code, CodeTable};
use crate::error::{DictionaryError, Error, Result};
use crate::heap::{PriorityQueue, Weighted};
use crate::word::Word;

/// Occurrence count per distinct word.
pub type FrequencyTable = BTreeMap<Word, u64>;

/// A tree node. Leaf iff `symbol` is set; leaves have no children.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Node {
    pub weight: u64,
    pub symbol: Option<Word>,
    pub left: Option<Box<Node>>,
    pub right: Option<Box<Node>>,
}

impl Node {
    pub fn leaf(symbol: Word, weight: u64) -> Self {
        Self {
            weight,
            symbol: Some(symbol),
            left: None,
            right: None,
        }
    }

    /// Internal node over two children, weighing their sum.
    pub fn internal(left: Node, right: Node) -> Self {
        Self {
            weight: left.weight + right.weight,
            symbol: None,
            left: Some(Box::new(left)),
            right: Some(Box::new(right)),
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.symbol.is_some()
    }

    /// Child reached by `bit`: `false` is left, `true` is right.
    pub fn child(&self, bit: bool) -> Option<&Node> {
        if bit {
            self.right.as_deref()
        } else {
            self.left.as_deref()
        }
    }

    fn has_children(&self) -> bool {
        self.left.is_some() || self.right.is_some()
    }
}

impl Weighted for Node {
    fn weight(&self) -> u64 {
        self.weight
    }
}

/// A Huffman tree owned by one compressor or decompressor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeTree {
    root: Node,
}

impl CodeTree {
    /// Build the tree bottom-up from word frequencies.
    ///
    /// # Errors
    /// Returns `Error::InvalidInput` if the table is empty.
    pub fn from_frequencies(frequencies: &FrequencyTable) -> Result<Self> {
        if frequencies.is_empty() {
            return Err(Error::InvalidInput(
                "cannot build a code tree without any words".to_string(),
            ));
        }

        let mut queue: PriorityQueue<Node> = frequencies
            .iter()
            .map(|(&word, &count)| Node::leaf(word, count))
            .collect();

        while queue.len() > 1 {
            let left = queue.remove_min()?;
            let right = queue.remove_min()?;
            queue.insert(Node::internal(left, right));
        }

        let root = queue.remove_min()?;
        Ok(Self { root })
    }

    /// Rebuild a tree top-down from a code table.
    ///
    /// Every code is walked from the root, creating empty internal nodes for
    /// missing children, and the node at the end of the path becomes a leaf.
    /// The root stays internal, so a single-word table `{w: 0}` decodes with
    /// no special casing. Rebuilt nodes carry no weights.
    ///
    /// # Errors
    /// Returns `Error::MalformedDictionary` if a code is empty, passes through
    /// another word's leaf, or ends where another code continues.
    pub fn from_code_table(table: &CodeTable) -> Result<Self> {
        let mut root = Node::default();

        for (&word, code) in table {
            if code.is_empty() {
                return Err(DictionaryError::EmptyCode { word }.into());
            }

            let mut node = &mut root;
            let mut walked = Code::new();
            for bit in code.iter() {
                if node.is_leaf() {
                    return Err(DictionaryError::NotPrefixFree {
                        prefix: walked.to_string(),
                        code: code.to_string(),
                    }
                    .into());
                }
                walked.push(bit);
                let slot = if bit { &mut node.right } else { &mut node.left };
                node = slot.get_or_insert_with(Box::default).as_mut();
            }

            if node.is_leaf() || node.has_children() {
                return Err(DictionaryError::NotPrefixFree {
                    prefix: code.to_string(),
                    code: code.to_string(),
                }
                .into());
            }
            node.symbol = Some(word);
        }

        Ok(Self { root })
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    /// Assign each leaf the path leading to it.
    ///
    /// A tree that is a single leaf assigns its word the code `0`.
    pub fn code_table(&self) -> CodeTable {
        let mut table = CodeTable::new();
        match self.root.symbol {
            Some(word) if !self.root.has_children() => {
                table.insert(word, Code::new().with_bit(false));
            }
            _ => collect_codes(&self.root, Code::new(), &mut table),
        }
        table
    }

    /// Number of leaves.
    pub fn leaf_count(&self) -> usize {
        fn count(node: &Node) -> usize {
            if node.is_leaf() {
                return 1;
            }
            node.left.as_deref().map_or(0, count) + node.right.as_deref().map_or(0, count)
        }
        count(&self.root)
    }
}

fn collect_codes(node: &Node, prefix: Code, table: &mut CodeTable) {
    if let Some(word) = node.symbol {
        table.insert(word, prefix);
        return;
    }
    if let Some(left) = node.left.as_deref() {
        collect_codes(left, prefix.with_bit(false), table);
    }
    if let Some(right) = node.right.as_deref() {
        collect_codes(right, prefix.with_bit(true), table);
    }
}
