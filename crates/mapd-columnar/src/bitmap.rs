#![forbid(unsafe_code)]

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Per-row null indicator for an encoded column.
///
/// A set bit means the row was missing in the source and the matching buffer slot holds the
/// wire type's sentinel. Bits are stored little-endian within each `u64` word:
/// - bit 0 is the LSB of word 0
/// - bit 63 is the MSB of word 0
///
/// On the wire the mask is a plain list of booleans, which is what the serde impls produce.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NullMask {
    words: Vec<u64>,
    len: usize,
    nulls: usize,
}

impl NullMask {
    pub fn new() -> Self {
        Self {
            words: Vec::new(),
            len: 0,
            nulls: 0,
        }
    }

    pub fn with_capacity_bits(bits: usize) -> Self {
        Self {
            words: Vec::with_capacity(bits.div_ceil(64)),
            len: 0,
            nulls: 0,
        }
    }

    /// A mask of `bits` rows with no nulls.
    pub fn all_valid(bits: usize) -> Self {
        if bits == 0 {
            return Self::new();
        }
        Self {
            words: vec![0u64; bits.div_ceil(64)],
            len: bits,
            nulls: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn push(&mut self, is_null: bool) {
        let bit = self.len % 64;
        if bit == 0 {
            self.words.push(0);
        }

        if is_null {
            let word = self.len / 64;
            self.words[word] |= 1u64 << bit;
            self.nulls += 1;
        }

        self.len += 1;
    }

    /// Returns `true` when `row` is null. Out-of-range rows read as valid.
    pub fn is_null(&self, row: usize) -> bool {
        if row >= self.len {
            return false;
        }
        let word = self.words[row / 64];
        ((word >> (row % 64)) & 1) == 1
    }

    pub fn null_count(&self) -> usize {
        self.nulls
    }

    pub fn has_nulls(&self) -> bool {
        self.nulls > 0
    }

    pub fn as_words(&self) -> &[u64] {
        &self.words
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = bool> + '_ {
        (0..self.len).map(|row| self.is_null(row))
    }

    pub fn to_bools(&self) -> Vec<bool> {
        self.iter().collect()
    }
}

impl Default for NullMask {
    fn default() -> Self {
        Self::new()
    }
}

impl FromIterator<bool> for NullMask {
    fn from_iter<I: IntoIterator<Item = bool>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let mut mask = Self::with_capacity_bits(iter.size_hint().0);
        for is_null in iter {
            mask.push(is_null);
        }
        mask
    }
}

impl Serialize for NullMask {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

impl<'de> Deserialize<'de> for NullMask {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let bools = Vec::<bool>::deserialize(deserializer)?;
        Ok(bools.into_iter().collect())
    }
}
