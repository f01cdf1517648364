//! Splitting of a multi-sample sequence file into one file per sample.
//!
//! The sample of a record is the part of its identifier before the first whitespace
//! and before the first occurrence of a delimiter (e.g. `s1_read7` -> `s1`). Records
//! are scanned in order and a new output file is opened whenever the sample changes
//! from the previous record.

use std::collections::{BTreeSet, HashSet};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use itertools::Itertools;
use log::debug;
use needletail::parse_fastx_file;

use crate::error::{Result, YackError};
use crate::io_utils::SeqFormat;
use crate::seq_record::SeqRecord;

pub const DEFAULT_DELIMITER: &str = "_";

/// Sample name encoded in a record identifier.
///
/// An empty delimiter disables delimiter splitting.
pub fn sample_name(identifier: &[u8], delimiter: &str) -> Result<String> {
    let identifier = String::from_utf8_lossy(identifier);
    let first_word = identifier.split_whitespace().next().unwrap_or("");

    let name = if delimiter.is_empty() {
        first_word
    } else {
        first_word.split(delimiter).next().unwrap_or("")
    };

    // sample names become file names in the output directory
    if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\']) {
        return Err(YackError::SampleParseError(identifier.to_string()));
    }

    Ok(name.to_string())
}

/// Output file of the sample currently being written.
struct SampleWriter {
    name: String,
    writer: BufWriter<File>,
}

impl SampleWriter {
    fn close(mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Split the records of `input_file` into per-sample files in `output_dir`.
///
/// Returns the sorted set of sample files written. A sample seen again after other
/// samples is appended to the file created for it earlier in this run.
pub fn split_sequences(input_file: &Path, output_dir: &Path, delimiter: &str) -> Result<Vec<PathBuf>> {
    let format = SeqFormat::from_path(input_file)?;
    std::fs::create_dir_all(output_dir)?;

    let mut output_files: BTreeSet<PathBuf> = BTreeSet::new();
    let mut opened: HashSet<String> = HashSet::new();
    let mut current: Option<SampleWriter> = None;

    let mut reader = parse_fastx_file(input_file)?;
    while let Some(rec) = reader.next() {
        let record = rec?;
        let name = sample_name(record.identifier(), delimiter)?;

        if current.as_ref().is_none_or(|c| c.name != name) {
            if let Some(previous) = current.take() {
                previous.close()?;
            }

            let path = output_dir.join(format!("{}.{}", name, format.extension()));
            let file = if opened.insert(name.clone()) {
                File::create(&path)?
            } else {
                debug!("Sample '{}' is not contiguous; appending to {}", name, path.display());
                OpenOptions::new().append(true).open(&path)?
            };

            output_files.insert(path);
            current = Some(SampleWriter {
                name,
                writer: BufWriter::new(file),
            });
        }

        if let Some(sample) = current.as_mut() {
            record.write(&mut sample.writer, None)?;
        }
    }

    if let Some(last) = current {
        last.close()?;
    }

    Ok(output_files.into_iter().collect_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seq_record::OwnedRecord;
    use needletail::parse_fastx_file;
    use std::fs::write;
    use tempfile::tempdir;

    fn record_ids(path: &Path) -> Vec<String> {
        let mut reader = parse_fastx_file(path).unwrap();
        let mut ids = Vec::new();
        while let Some(rec) = reader.next() {
            ids.push(String::from_utf8_lossy(rec.unwrap().id()).to_string());
        }
        ids
    }

    #[test]
    fn test_sample_name() {
        assert_eq!(sample_name(b"s1_read1 some description", "_").unwrap(), "s1");
        assert_eq!(sample_name(b"s1-read1_x", "-").unwrap(), "s1");
        assert_eq!(sample_name(b"sample", "_").unwrap(), "sample");
        assert_eq!(sample_name(b"s1_r1", "").unwrap(), "s1_r1");
    }

    #[test]
    fn test_sample_name_from_record() {
        let records = [
            OwnedRecord::new("gut_read1 length=150", "ACGT"),
            OwnedRecord::new("skin_read9", "GGCC"),
        ];
        let names: Vec<String> = records
            .iter()
            .map(|r| sample_name(r.identifier(), "_").unwrap())
            .collect();
        assert_eq!(names, vec!["gut", "skin"]);
    }

    #[test]
    fn test_sample_name_errors() {
        assert!(matches!(sample_name(b"", "_"), Err(YackError::SampleParseError(_))));
        assert!(matches!(sample_name(b"_read1", "_"), Err(YackError::SampleParseError(_))));
        assert!(matches!(sample_name(b"../x_r1", "_"), Err(YackError::SampleParseError(_))));
    }

    #[test]
    fn test_split_contiguous_samples() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("multi.fasta");
        write(
            &input,
            ">s1_r1\nACGT\n>s1_r2\nGGCC\n>s2_r1\nTTTT\n>s3_r1 extra\nAAAA\n",
        )
        .unwrap();

        let out_dir = dir.path().join("samples");
        let files = split_sequences(&input, &out_dir, "_").unwrap();

        assert_eq!(
            files,
            vec![
                out_dir.join("s1.fasta"),
                out_dir.join("s2.fasta"),
                out_dir.join("s3.fasta"),
            ]
        );
        assert_eq!(record_ids(&files[0]), vec!["s1_r1", "s1_r2"]);
        assert_eq!(record_ids(&files[1]), vec!["s2_r1"]);
        assert_eq!(record_ids(&files[2]), vec!["s3_r1 extra"]);
    }

    #[test]
    fn test_split_non_contiguous_sample() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("multi.fq");
        write(
            &input,
            "@a_1\nACGT\n+\nIIII\n@b_1\nCCCC\n+\nIIII\n@a_2\nGGGG\n+\nIIII\n",
        )
        .unwrap();

        let out_dir = dir.path().join("out");
        // a stale file from an earlier run must not be appended to
        std::fs::create_dir_all(&out_dir).unwrap();
        write(out_dir.join("a.fastq"), "@stale\nA\n+\nI\n").unwrap();

        let files = split_sequences(&input, &out_dir, "_").unwrap();
        assert_eq!(files, vec![out_dir.join("a.fastq"), out_dir.join("b.fastq")]);
        assert_eq!(record_ids(&files[0]), vec!["a_1", "a_2"]);
        assert_eq!(record_ids(&files[1]), vec!["b_1"]);
    }

    #[test]
    fn test_split_unsupported_format() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("multi.txt");
        write(&input, ">s1_r1\nACGT\n").unwrap();

        assert!(matches!(
            split_sequences(&input, dir.path(), "_"),
            Err(YackError::UnsupportedFileFormat(_))
        ));
    }
}
