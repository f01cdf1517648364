//! The sparse k-mer count table produced by the aggregator.
//!
//! A `SparseArray` pairs strictly ascending ranks (`cols`) with their counts (`data`).
//! Counts are stored as `f64` so the array can be normalized in place. Arrays are
//! persisted with a short magic prefix followed by their `bincode` encoding.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, YackError};
use crate::rank::Rank;

const DUMP_MAGIC: &[u8; 8] = b"YACKSA01";

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SparseArray {
    cols: Vec<Rank>,
    data: Vec<f64>,
}

impl SparseArray {
    /// Build an array from parallel vectors of ranks and counts.
    ///
    /// Ranks must be strictly ascending and both vectors the same length.
    pub fn new(cols: Vec<Rank>, data: Vec<f64>) -> Result<Self> {
        let array = SparseArray { cols, data };
        array.validate()?;
        Ok(array)
    }

    /// Build an array from (rank, count) pairs already sorted by rank.
    pub(crate) fn from_sorted_pairs(pairs: Vec<(Rank, u64)>) -> Self {
        let (cols, data) = pairs
            .into_iter()
            .map(|(rank, count)| (rank, count as f64))
            .unzip();

        SparseArray { cols, data }
    }

    fn validate(&self) -> Result<()> {
        if self.cols.len() != self.data.len() {
            return Err(YackError::InvalidDump(format!(
                "{} ranks but {} counts",
                self.cols.len(),
                self.data.len()
            )));
        }

        if let Some(pos) = self.cols.windows(2).position(|w| w[0] >= w[1]) {
            return Err(YackError::InvalidDump(format!(
                "ranks not strictly ascending at position {}",
                pos + 1
            )));
        }

        Ok(())
    }

    pub fn cols(&self) -> &[Rank] {
        &self.cols
    }

    pub fn data(&self) -> &[f64] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.cols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cols.is_empty()
    }

    /// Sum of all counts.
    pub fn total(&self) -> f64 {
        self.data.iter().sum()
    }

    pub fn get(&self, rank: Rank) -> Option<f64> {
        self.cols
            .binary_search(&rank)
            .ok()
            .map(|idx| self.data[idx])
    }

    pub fn iter(&self) -> impl Iterator<Item = (Rank, f64)> + '_ {
        self.cols.iter().copied().zip(self.data.iter().copied())
    }

    /// Most abundant rank; ties resolve to the smallest rank.
    pub fn max_entry(&self) -> Option<(Rank, f64)> {
        self.iter()
            .fold(None, |best, (rank, count)| match best {
                Some((_, best_count)) if best_count >= count => best,
                _ => Some((rank, count)),
            })
    }

    /// Divide every count by the total so the counts sum to one.
    pub fn normalize(&mut self) -> Result<()> {
        let total = self.total();
        if total == 0.0 {
            return Err(YackError::ArithmeticInvalid);
        }

        for count in self.data.iter_mut() {
            *count /= total;
        }

        Ok(())
    }

    /// Write one `<rank>: <count>` line per rank in ascending rank order.
    pub fn hist<W: Write>(&self, writer: &mut W) -> Result<()> {
        for (rank, count) in self.iter() {
            writeln!(writer, "{}: {}", rank, count.trunc() as u64)?;
        }

        Ok(())
    }

    pub fn dump<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_all(DUMP_MAGIC)?;
        bincode::serialize_into(&mut *writer, self)?;
        Ok(())
    }

    pub fn load<R: Read>(reader: &mut R) -> Result<Self> {
        let mut magic = [0u8; 8];
        reader.read_exact(&mut magic)?;
        if &magic != DUMP_MAGIC {
            return Err(YackError::InvalidDump("unrecognized file header".to_string()));
        }

        let array: SparseArray = bincode::deserialize_from(reader)?;
        array.validate()?;

        Ok(array)
    }

    pub fn dump_file(&self, path: &Path) -> Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        self.dump(&mut writer)?;
        writer.flush()?;
        Ok(())
    }

    pub fn load_file(path: &Path) -> Result<Self> {
        let mut reader = BufReader::new(File::open(path)?);
        SparseArray::load(&mut reader)
    }
}
