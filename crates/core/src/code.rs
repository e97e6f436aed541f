//! Bit-string codes and the word → code table.
//!
//! Bit 0 of a code is the first branch taken from the root: `0` is the left
//! child, `1` the right child.

use std::collections::{btree_map, BTreeMap};
use std::fmt;
use std::str::FromStr;

use bitvec::prelude::*;

use crate::error::{DictionaryError, Error};
use crate::word::{Word, WordLength};

/// A variable-length code.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Code {
    bits: BitVec<u8, Msb0>,
}

impl Code {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a code from `len` bits packed MSB-first in `bytes`.
    pub fn from_packed(bytes: &[u8], len: usize) -> Self {
        let mut bits = BitVec::<u8, Msb0>::from_slice(bytes);
        bits.truncate(len);
        Self { bits }
    }

    /// Pack the bits MSB-first, zero-filling the tail of the last byte.
    pub fn to_packed(&self) -> Vec<u8> {
        let mut bytes = vec![0u8; self.bits.len().div_ceil(8)];
        for index in self.bits.iter_ones() {
            bytes[index / 8] |= 0x80 >> (index % 8);
        }
        bytes
    }

    pub fn push(&mut self, bit: bool) {
        self.bits.push(bit);
    }

    /// Copy of this code with one more bit appended.
    pub fn with_bit(&self, bit: bool) -> Self {
        let mut code = self.clone();
        code.push(bit);
        code
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<bool> {
        self.bits.get(index).map(|bit| *bit)
    }

    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        self.bits.iter().by_vals()
    }

    /// Whether `self` is a prefix of `other` (every code is a prefix of itself).
    pub fn is_prefix_of(&self, other: &Code) -> bool {
        self.len() <= other.len() && self.bits.as_bitslice() == &other.bits[..self.len()]
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for bit in self.iter() {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

impl FromStr for Code {
    type Err = Error;

    /// Parse a string of `0` and `1` characters.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut code = Code::new();
        for c in s.chars() {
            match c {
                '0' => code.push(false),
                '1' => code.push(true),
                other => {
                    return Err(Error::InvalidInput(format!(
                        "code {s:?} contains {other:?}, expected only 0 and 1"
                    )))
                }
            }
        }
        Ok(code)
    }
}

/// Mapping from each distinct word to its code.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeTable {
    codes: BTreeMap<Word, Code>,
}

impl CodeTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, word: Word, code: Code) -> Option<Code> {
        self.codes.insert(word, code)
    }

    pub fn get(&self, word: Word) -> Option<&Code> {
        self.codes.get(&word)
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Entries in ascending word order.
    pub fn iter(&self) -> btree_map::Iter<'_, Word, Code> {
        self.codes.iter()
    }

    /// Longest code in the table, 0 when empty.
    pub fn max_code_len(&self) -> usize {
        self.codes.values().map(Code::len).max().unwrap_or(0)
    }

    /// Check that no code is empty and no code is a prefix of another.
    ///
    /// Sorted lexicographically, any code lying between a code and one of its
    /// extensions shares that prefix, so checking neighbours is enough.
    pub fn check_prefix_free(&self) -> Result<(), DictionaryError> {
        if let Some((&word, _)) = self.codes.iter().find(|(_, code)| code.is_empty()) {
            return Err(DictionaryError::EmptyCode { word });
        }

        let mut sorted: Vec<&Code> = self.codes.values().collect();
        sorted.sort_by(|a, b| a.iter().cmp(b.iter()));

        for pair in sorted.windows(2) {
            if pair[0].is_prefix_of(pair[1]) {
                return Err(DictionaryError::NotPrefixFree {
                    prefix: pair[0].to_string(),
                    code: pair[1].to_string(),
                });
            }
        }
        Ok(())
    }

    pub fn is_prefix_free(&self) -> bool {
        self.check_prefix_free().is_ok()
    }

    /// Human-readable `{word: code, ...}` form with words in fixed-width hex.
    pub fn render(&self, word_length: WordLength) -> String {
        let width = word_length.bytes() * 2;
        let entries: Vec<String> = self
            .codes
            .iter()
            .map(|(word, code)| format!("{word:#0w$x}: {code}", w = width + 2))
            .collect();
        format!("{{{}}}", entries.join(", "))
    }
}

impl FromIterator<(Word, Code)> for CodeTable {
    fn from_iter<I: IntoIterator<Item = (Word, Code)>>(iter: I) -> Self {
        Self {
            codes: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a CodeTable {
    type Item = (&'a Word, &'a Code);
    type IntoIter = btree_map::Iter<'a, Word, Code>;

    fn into_iter(self) -> Self::IntoIter {
        self.codes.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code(s: &str) -> Code {
        s.parse().unwrap()
    }

    fn table(entries: &[(Word, &str)]) -> CodeTable {
        entries.iter().map(|&(w, c)| (w, code(c))).collect()
    }

    #[test]
    fn test_parse_and_display() {
        let c = code("10110");
        assert_eq!(c.len(), 5);
        assert_eq!(c.get(0), Some(true));
        assert_eq!(c.get(1), Some(false));
        assert_eq!(c.get(5), None);
        assert_eq!(c.to_string(), "10110");
        assert!("10a".parse::<Code>().is_err());
    }

    #[test]
    fn test_packed_round_trip() {
        let c = code("1011000111");
        let packed = c.to_packed();
        assert_eq!(packed, vec![0b1011_0001, 0b1100_0000]);
        assert_eq!(Code::from_packed(&packed, 10), c);
    }

    #[test]
    fn test_prefix() {
        assert!(code("10").is_prefix_of(&code("101")));
        assert!(code("10").is_prefix_of(&code("10")));
        assert!(!code("101").is_prefix_of(&code("10")));
        assert!(!code("11").is_prefix_of(&code("101")));
    }

    #[test]
    fn test_prefix_free_table() {
        let good = table(&[(1, "0"), (2, "10"), (3, "110"), (4, "111")]);
        assert!(good.is_prefix_free());
        assert_eq!(good.max_code_len(), 3);
    }

    #[test]
    fn test_prefix_violation_detected() {
        let bad = table(&[(1, "0"), (2, "10"), (3, "00")]);
        assert_eq!(
            bad.check_prefix_free(),
            Err(DictionaryError::NotPrefixFree {
                prefix: "0".to_string(),
                code: "00".to_string(),
            })
        );
    }

    #[test]
    fn test_duplicate_codes_are_not_prefix_free() {
        let bad = table(&[(1, "01"), (2, "01")]);
        assert!(!bad.is_prefix_free());
    }

    #[test]
    fn test_empty_code_rejected() {
        let bad = table(&[(7, "")]);
        assert_eq!(bad.check_prefix_free(), Err(DictionaryError::EmptyCode { word: 7 }));
    }

    #[test]
    fn test_render() {
        let t = table(&[(0x41, "0"), (0x42, "1")]);
        assert_eq!(t.render(WordLength::One), "{0x41: 0, 0x42: 1}");
        assert_eq!(t.render(WordLength::Two), "{0x0041: 0, 0x0042: 1}");
    }
}
