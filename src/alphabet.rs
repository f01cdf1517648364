//! Alphabet encoding and segmentation of raw sequences.
//!
//! Raw bases are mapped onto 2-bit codes (A=0, C=1, G=2, T=3) with a 256-entry lookup
//! table. Any other byte is treated as an unknown symbol and splits the sequence, so
//! that no k-mer window ever spans an ambiguous base.

/// Marker stored in the lookup table for bytes outside the alphabet.
pub const UNKNOWN: u8 = 0xFF;

/// A maximal run of in-alphabet bases, stored as codes in [0, 3].
pub type Segment = Vec<u8>;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Alphabet {
    table: [u8; 256],
}

impl Default for Alphabet {
    fn default() -> Self {
        Alphabet::dna()
    }
}

impl Alphabet {
    /// DNA alphabet {A, C, G, T}; lookup is case-insensitive.
    pub fn dna() -> Self {
        let mut table = [UNKNOWN; 256];
        for (code, base) in [b'A', b'C', b'G', b'T'].iter().enumerate() {
            table[*base as usize] = code as u8;
            table[base.to_ascii_lowercase() as usize] = code as u8;
        }

        Alphabet { table }
    }

    /// Code for a single base, or `None` for an unknown symbol.
    #[inline]
    pub fn encode(&self, base: u8) -> Option<u8> {
        match self.table[base as usize] {
            UNKNOWN => None,
            code => Some(code),
        }
    }

    /// Split a sequence on unknown symbols and encode each non-empty run.
    pub fn segment(&self, seq: &[u8]) -> Vec<Segment> {
        let mut segments = Vec::new();
        let mut current = Segment::new();

        for &base in seq {
            match self.encode(base) {
                Some(code) => current.push(code),
                None => {
                    if !current.is_empty() {
                        segments.push(std::mem::take(&mut current));
                    }
                }
            }
        }

        if !current.is_empty() {
            segments.push(current);
        }

        segments
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode() {
        let alphabet = Alphabet::dna();
        assert_eq!(alphabet.encode(b'A'), Some(0));
        assert_eq!(alphabet.encode(b'c'), Some(1));
        assert_eq!(alphabet.encode(b'G'), Some(2));
        assert_eq!(alphabet.encode(b't'), Some(3));
        assert_eq!(alphabet.encode(b'N'), None);
        assert_eq!(alphabet.encode(b'U'), None);
    }

    #[test]
    fn test_segment_on_unknown() {
        let alphabet = Alphabet::dna();
        let segments = alphabet.segment(b"ACGTNACGT");
        assert_eq!(segments, vec![vec![0, 1, 2, 3], vec![0, 1, 2, 3]]);
    }

    #[test]
    fn test_segment_mixed_case() {
        let alphabet = Alphabet::dna();
        assert_eq!(alphabet.segment(b"acgT"), vec![vec![0, 1, 2, 3]]);
    }

    #[test]
    fn test_empty_segments_dropped() {
        let alphabet = Alphabet::dna();
        let segments = alphabet.segment(b"NNAC--GTNN");
        assert_eq!(segments, vec![vec![0, 1], vec![2, 3]]);
    }

    #[test]
    fn test_all_unknown() {
        let alphabet = Alphabet::dna();
        assert!(alphabet.segment(b"NNNN").is_empty());
        assert!(alphabet.segment(b"").is_empty());
    }
}
