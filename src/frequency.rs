use std::collections::BTreeMap;

/// Occurrence count of every byte present in an input.
///
/// Every key has a count of at least one, and the counts sum to the length
/// of the sampled input. Iteration is ordered by byte value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: BTreeMap<u8, u64>,
}

impl FrequencyTable {
    pub fn sample(bytes: &[u8]) -> Self {
        let mut tally = [0u64; 256];
        for &byte in bytes {
            tally[byte as usize] += 1;
        }

        tally
            .iter()
            .enumerate()
            .map(|(byte, &count)| (byte as u8, count))
            .collect()
    }

    pub fn get(&self, symbol: u8) -> Option<u64> {
        self.counts.get(&symbol).copied()
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Sum of all counts, i.e. the length of the sampled input.
    pub fn total(&self) -> u64 {
        self.counts
            .values()
            .fold(0u64, |sum, &count| sum.saturating_add(count))
    }

    pub fn iter(&self) -> impl Iterator<Item = (u8, u64)> + '_ {
        self.counts.iter().map(|(&symbol, &count)| (symbol, count))
    }
}

/// Zero counts are dropped; repeated symbols accumulate, saturating at
/// `u64::MAX`.
impl FromIterator<(u8, u64)> for FrequencyTable {
    fn from_iter<I: IntoIterator<Item = (u8, u64)>>(iter: I) -> Self {
        let mut counts = BTreeMap::new();
        for (symbol, count) in iter.into_iter().filter(|&(_, count)| count > 0) {
            let total = counts.entry(symbol).or_insert(0u64);
            *total = total.saturating_add(count);
        }
        FrequencyTable { counts }
    }
}

impl From<&[u8]> for FrequencyTable {
    fn from(bytes: &[u8]) -> Self {
        FrequencyTable::sample(bytes)
    }
}
