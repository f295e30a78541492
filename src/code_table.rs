use std::collections::BTreeMap;
use std::fmt;

/// A root-to-leaf path, left = 0 and right = 1, first step first.
///
/// A tree over at most 256 symbols is at most 255 levels deep, so a code
/// never needs more than 256 bits.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Code {
    words: [u64; 4],
    len: u16,
}

impl Code {
    pub const CAPACITY: usize = 256;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.len as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Bit at `index`, counting from the root.
    pub fn bit(&self, index: usize) -> bool {
        debug_assert!(index < self.len());
        (self.words[index / 64] >> (63 - index % 64)) & 1 == 1
    }

    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        (0..self.len()).map(move |i| self.bit(i))
    }

    #[cfg(test)]
    pub(crate) fn parse(bits: &str) -> Self {
        bits.chars().fold(Code::new(), |code, c| code.with_bit(c == '1'))
    }

    /// Returns a copy extended by one bit.
    ///
    /// Only tree paths call this, and a tree over 256 symbols is at most 255
    /// levels deep, so the capacity check never fires.
    pub(crate) fn with_bit(mut self, bit: bool) -> Self {
        let index = self.len();
        assert!(index < Self::CAPACITY, "code longer than {} bits", Self::CAPACITY);
        if bit {
            self.words[index / 64] |= 1u64 << (63 - index % 64);
        }
        self.len += 1;
        self
    }

    /// Whether `self` is a (non-strict) prefix of `other`.
    pub fn is_prefix_of(&self, other: &Code) -> bool {
        self.len() <= other.len() && (0..self.len()).all(|i| self.bit(i) == other.bit(i))
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

impl fmt::Debug for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Code({})", self)
    }
}

/// Mapping from symbol to code, ordered by symbol.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeTable {
    codes: BTreeMap<u8, Code>,
}

impl CodeTable {
    pub(crate) fn insert(&mut self, symbol: u8, code: Code) {
        self.codes.insert(symbol, code);
    }

    pub fn get(&self, symbol: u8) -> Option<&Code> {
        self.codes.get(&symbol)
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u8, &Code)> + '_ {
        self.codes.iter().map(|(&symbol, code)| (symbol, code))
    }

    /// Length of the longest code, zero for an empty table.
    pub fn max_len(&self) -> usize {
        self.codes.values().map(Code::len).max().unwrap_or(0)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn code(bits: &str) -> Code {
        Code::parse(bits)
    }

    #[test]
    fn test_code_bits() {
        let c = code("1011");
        assert_eq!(c.len(), 4);
        assert!(c.bit(0));
        assert!(!c.bit(1));
        assert_eq!(c.to_string(), "1011");
        assert_eq!(format!("{:?}", c), "Code(1011)");
    }

    #[test]
    fn test_code_crosses_word_boundary() {
        let bits: String = (0..200).map(|i| if i % 3 == 0 { '1' } else { '0' }).collect();
        let c = code(&bits);
        assert_eq!(c.len(), 200);
        assert_eq!(c.to_string(), bits);
    }

    #[test]
    fn test_code_at_capacity() {
        let c = code(&"01".repeat(Code::CAPACITY / 2));
        assert_eq!(c.len(), Code::CAPACITY);
        assert!(c.bit(Code::CAPACITY - 1));
    }

    #[test]
    fn test_prefix() {
        assert!(code("10").is_prefix_of(&code("101")));
        assert!(code("101").is_prefix_of(&code("101")));
        assert!(!code("11").is_prefix_of(&code("101")));
        assert!(!code("1011").is_prefix_of(&code("101")));
        assert!(Code::new().is_prefix_of(&code("0")));
    }

    #[test]
    fn test_table_max_len() {
        let mut table = CodeTable::default();
        assert_eq!(table.max_len(), 0);
        table.insert(b'a', code("0"));
        table.insert(b'b', code("110"));
        assert_eq!(table.max_len(), 3);
        assert_eq!(table.get(b'b').map(Code::len), Some(3));
        assert!(table.get(b'c').is_none());
    }
}
