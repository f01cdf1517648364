//! This module provides the `KmerCounter` struct, the sparse aggregator at the heart of
//! yack. Sequences are split into segments, each segment is converted into k-mer ranks,
//! and every rank is routed to a bin covering a contiguous range of the rank space.
//! Bins are counted independently (and in parallel) with a hash map, sorted, and
//! concatenated in bin order. Since bins are disjoint and ordered by key, the merge is
//! a plain concatenation and the final table is sorted by rank without a global sort.

use rayon::prelude::*;
use rustc_hash::FxHashMap;

use crate::count_params::CountParams;
use crate::rank::{Rank, compute_ranks};
use crate::sparse_array::SparseArray;

#[derive(Clone, Debug)]
pub struct KmerCounter<'a> {
    params: &'a CountParams,
    bin_step: u128,
    bins: Vec<Vec<Rank>>,
    kmer_total_count: u64,
    bp_count: u64,
}

impl<'a> KmerCounter<'a> {
    pub fn new(params: &'a CountParams) -> Self {
        KmerCounter {
            params,
            bin_step: params.bin_step(),
            bins: vec![Vec::new(); params.num_bins() as usize],
            kmer_total_count: 0,
            bp_count: 0,
        }
    }

    /// Add all k-mers of a raw sequence, skipping windows that span unknown bases.
    pub fn add_sequence(&mut self, seq: &[u8]) {
        self.bp_count += seq.len() as u64;

        for segment in self.params.alphabet().segment(seq) {
            let ranks = compute_ranks(&segment, self.params.k());
            self.add_ranks(&ranks);
        }
    }

    /// Route precomputed ranks to their bins.
    pub fn add_ranks(&mut self, ranks: &[Rank]) {
        for &rank in ranks {
            let bin = self.params.bin_of(rank, self.bin_step);
            self.bins[bin].push(rank);
        }

        self.kmer_total_count += ranks.len() as u64;
    }

    pub fn kmer_total_count(&self) -> u64 {
        self.kmer_total_count
    }

    pub fn bp_count(&self) -> u64 {
        self.bp_count
    }

    /// Count each bin and merge the results into a sparse array sorted by rank.
    pub fn finish(self) -> SparseArray {
        let counted: Vec<Vec<(Rank, u64)>> = self
            .bins
            .into_par_iter()
            .map(count_bin)
            .collect();

        let pairs: Vec<(Rank, u64)> = counted.into_iter().flatten().collect();
        debug_assert!(pairs.windows(2).all(|w| w[0].0 < w[1].0));

        SparseArray::from_sorted_pairs(pairs)
    }
}

/// Count distinct ranks within a single bin, sorted by rank.
fn count_bin(bin: Vec<Rank>) -> Vec<(Rank, u64)> {
    let mut counts: FxHashMap<Rank, u64> = FxHashMap::default();
    for rank in bin {
        *counts.entry(rank).or_insert(0) += 1;
    }

    let mut pairs: Vec<(Rank, u64)> = counts.into_iter().collect();
    pairs.sort_unstable_by_key(|&(rank, _)| rank);
    pairs
}

/// Count a stream of ranks directly.
pub fn count_ranks<I>(ranks: I, params: &CountParams) -> SparseArray
where
    I: IntoIterator<Item = Rank>,
{
    let mut counter = KmerCounter::new(params);
    let ranks: Vec<Rank> = ranks.into_iter().collect();
    counter.add_ranks(&ranks);
    counter.finish()
}
