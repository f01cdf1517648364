//! This module defines `CountParams`, the immutable configuration shared by every
//! stage of the counting pipeline: the validated k-mer size, the number of bins used
//! to partition the rank space, and the alphabet used to encode bases. It is built
//! once at startup and passed by reference into the encoder and aggregator.

use std::fmt;

use crate::alphabet::Alphabet;
use crate::error::{Result, YackError};

pub const DEFAULT_KMER_SIZE: u8 = 15;
pub const DEFAULT_NUM_BINS: u32 = 1000;
pub const MAX_KMER_SIZE: u8 = 32;
pub const MAX_NUM_BINS: u32 = 1_000_000;

/// A k-mer size known to lie in [1, 32], so every window fits in a `u64`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct KmerSize(u8);

impl KmerSize {
    pub fn new(k: u8) -> Result<Self> {
        if !(1..=MAX_KMER_SIZE).contains(&k) {
            return Err(YackError::InvalidKmerSize(k.to_string()));
        }

        Ok(KmerSize(k))
    }

    pub fn get(self) -> usize {
        self.0 as usize
    }

    /// Mask keeping the lower 2k bits of a rank.
    pub fn mask(self) -> u64 {
        u64::MAX >> (64 - 2 * self.get())
    }

    /// Number of distinct k-mers, 4^k.
    pub fn num_kmers(self) -> u128 {
        1u128 << (2 * self.get())
    }
}

impl Default for KmerSize {
    fn default() -> Self {
        KmerSize(DEFAULT_KMER_SIZE)
    }
}

impl std::str::FromStr for KmerSize {
    type Err = YackError;

    fn from_str(s: &str) -> Result<Self> {
        let k: u8 = s
            .trim()
            .parse()
            .map_err(|_| YackError::InvalidKmerSize(s.to_string()))?;

        KmerSize::new(k)
    }
}

impl fmt::Display for KmerSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct CountParams {
    kmer_size: KmerSize,
    num_bins: u32,
    alphabet: Alphabet,
}

impl Default for CountParams {
    fn default() -> Self {
        CountParams {
            kmer_size: KmerSize::default(),
            num_bins: DEFAULT_NUM_BINS,
            alphabet: Alphabet::dna(),
        }
    }
}

impl CountParams {
    pub fn new(kmer_size: KmerSize, num_bins: u32) -> Result<Self> {
        if !(1..=MAX_NUM_BINS).contains(&num_bins) {
            return Err(YackError::InvalidBinCount(num_bins));
        }

        Ok(CountParams {
            kmer_size,
            num_bins,
            alphabet: Alphabet::dna(),
        })
    }

    pub fn k(&self) -> KmerSize {
        self.kmer_size
    }

    pub fn num_bins(&self) -> u32 {
        self.num_bins
    }

    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    /// Width of each bin over the rank space [0, 4^k).
    ///
    /// Bins are contiguous key ranges, so bin `i` only holds ranks smaller than those
    /// in bin `i + 1` and every rank maps to a bin below `num_bins`.
    pub fn bin_step(&self) -> u128 {
        self.kmer_size.num_kmers() / self.num_bins as u128 + 1
    }

    /// Bin holding a rank.
    #[inline]
    pub fn bin_of(&self, rank: u64, bin_step: u128) -> usize {
        (rank as u128 / bin_step) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kmer_size_range() {
        assert!(KmerSize::new(0).is_err());
        assert!(KmerSize::new(1).is_ok());
        assert!(KmerSize::new(32).is_ok());
        assert!(matches!(KmerSize::new(33), Err(YackError::InvalidKmerSize(_))));
    }

    #[test]
    fn test_kmer_size_from_str() {
        assert_eq!("15".parse::<KmerSize>().unwrap().get(), 15);
        assert!("abc".parse::<KmerSize>().is_err());
        assert!("-1".parse::<KmerSize>().is_err());
        assert!("300".parse::<KmerSize>().is_err());
    }

    #[test]
    fn test_mask() {
        assert_eq!(KmerSize::new(1).unwrap().mask(), 0b11);
        assert_eq!(KmerSize::new(4).unwrap().mask(), 0xFF);
        assert_eq!(KmerSize::new(32).unwrap().mask(), u64::MAX);
    }

    #[test]
    fn test_zero_bins() {
        let k = KmerSize::new(4).unwrap();
        assert!(matches!(CountParams::new(k, 0), Err(YackError::InvalidBinCount(0))));
        assert!(CountParams::new(k, MAX_NUM_BINS).is_ok());
        assert!(matches!(
            CountParams::new(k, MAX_NUM_BINS + 1),
            Err(YackError::InvalidBinCount(_))
        ));
        assert!(matches!(CountParams::new(k, u32::MAX), Err(YackError::InvalidBinCount(_))));
    }

    #[test]
    fn test_bin_step_covers_rank_space() {
        for k in [1u8, 2, 5, 15, 31, 32] {
            for num_bins in [1u32, 7, 1000] {
                let params = CountParams::new(KmerSize::new(k).unwrap(), num_bins).unwrap();
                let step = params.bin_step();
                assert_eq!(params.bin_of(0, step), 0);
                assert!(params.bin_of(params.k().mask(), step) < num_bins as usize);
            }
        }
    }
}
