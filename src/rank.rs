//! Rank computation for k-mer windows.
//!
//! A rank is the base-4 positional value of a window of k codes, first code most
//! significant. Ranks are computed with a rolling update so each segment is processed
//! in time linear in its length.

use crate::count_params::KmerSize;

pub type Rank = u64;

const CODE_TO_BASE: [u8; 4] = [b'A', b'C', b'G', b'T'];

/// Ranks of every window of size `k` in a segment of 2-bit codes.
///
/// Segments shorter than `k` produce no ranks. Codes are expected to lie in [0, 3]
/// (see `Alphabet::segment`); higher bits of an out-of-range code are masked off.
pub fn compute_ranks(segment: &[u8], k: KmerSize) -> Vec<Rank> {
    let mask = k.mask();
    let k = k.get();
    let n = segment.len();

    if n < k {
        return Vec::new();
    }

    let mut ranks = Vec::with_capacity(n - k + 1);

    let mut rank: Rank = 0;
    for &code in &segment[..k - 1] {
        rank = (rank << 2) | (code & 0b11) as Rank;
    }

    for &code in &segment[k - 1..] {
        // at k = 32 the shift discards the leading base and the mask is all ones
        rank = ((rank << 2) | (code & 0b11) as Rank) & mask;
        ranks.push(rank);
    }

    ranks
}

/// K-mer string encoded by a rank.
pub fn decode_rank(rank: Rank, k: KmerSize) -> String {
    let k = k.get();

    (0..k)
        .rev()
        .map(|i| CODE_TO_BASE[((rank >> (2 * i)) & 0b11) as usize] as char)
        .collect()
}
