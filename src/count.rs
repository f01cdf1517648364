//! This module implements the counting pipeline on top of the sparse aggregator.
//!
//! It provides functionality to:
//! - Count k-mers of in-memory sequence records.
//! - Count k-mers of a single FASTA/FASTQ sample file.
//! - Split a multi-sample file into per-sample files and count each sample in parallel,
//!   collecting a separate outcome for every sample.

use std::path::{Path, PathBuf};

use log::{debug, warn};
use needletail::parse_fastx_file;
use rayon::iter::{IntoParallelRefIterator, ParallelIterator};

use crate::count_params::CountParams;
use crate::counter::KmerCounter;
use crate::error::Result;
use crate::io_utils::SeqFormat;
use crate::progress::progress_bar;
use crate::seq_record::SeqRecord;
use crate::sparse_array::SparseArray;
use crate::splitter::split_sequences;

/// Result of counting one sample of a multi-sample file.
#[derive(Debug)]
pub struct SampleOutcome {
    pub sample_file: PathBuf,
    pub result: Result<SparseArray>,
}

/// Count k-mers across a collection of sequence records.
pub fn count_seqs<I>(records: I, params: &CountParams) -> SparseArray
where
    I: IntoIterator,
    I::Item: SeqRecord,
{
    let mut counter = KmerCounter::new(params);
    for record in records {
        counter.add_sequence(&record.bases());
    }

    counter.finish()
}

/// Count k-mers of all records in a FASTA/FASTQ file.
pub fn count_sample(seq_file: &Path, params: &CountParams) -> Result<SparseArray> {
    SeqFormat::from_path(seq_file)?;

    let mut counter = KmerCounter::new(params);
    let mut fastx_reader = parse_fastx_file(seq_file)?;
    let mut num_records = 0u64;
    while let Some(rec) = fastx_reader.next() {
        let record = rec?;
        counter.add_sequence(&record.bases());
        num_records += 1;
    }

    debug!(
        "{}: {} records, {} bp, {} k-mers",
        seq_file.display(),
        num_records,
        counter.bp_count(),
        counter.kmer_total_count()
    );

    Ok(counter.finish())
}

/// Split a multi-sample file by sample name and count every sample independently.
///
/// A failure while counting one sample is recorded in its outcome and does not stop
/// the remaining samples. Errors that prevent splitting abort the whole operation.
pub fn count_multiple_samples(
    input_file: &Path,
    split_dir: &Path,
    delimiter: &str,
    params: &CountParams,
) -> Result<Vec<SampleOutcome>> {
    let sample_files = split_sequences(input_file, split_dir, delimiter)?;

    let progress_bar = progress_bar(sample_files.len() as u64);
    let outcomes: Vec<SampleOutcome> = sample_files
        .par_iter()
        .map(|sample_file| {
            let result = count_sample(sample_file, params);
            if let Err(e) = &result {
                warn!("Failed to count {}: {}", sample_file.display(), e);
            }
            progress_bar.inc(1);

            SampleOutcome {
                sample_file: sample_file.clone(),
                result,
            }
        })
        .collect();

    progress_bar.finish_and_clear();

    Ok(outcomes)
}
