use std::path::{Path, PathBuf};

use crate::error::{Result, YackError};

pub const OUTPUT_EXTENSION: &str = "yack";

/// Sequence file formats recognised from a file extension.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SeqFormat {
    Fasta,
    Fastq,
}

impl SeqFormat {
    /// Determine the format of a sequence file from its extension, ignoring a trailing `.gz`.
    pub fn from_path(seq_file: &Path) -> Result<Self> {
        let file_name = seq_file
            .file_name()
            .map(|name| name.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        let file_name = file_name.strip_suffix(".gz").unwrap_or(file_name.as_str());

        let ext = Path::new(file_name)
            .extension()
            .map(|ext| ext.to_string_lossy().to_string())
            .unwrap_or_default();

        match ext.as_str() {
            "fastq" | "fq" => Ok(SeqFormat::Fastq),
            "fasta" | "fa" | "fna" | "ffn" | "faa" | "frn" => Ok(SeqFormat::Fasta),
            _ => Err(YackError::UnsupportedFileFormat(ext)),
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            SeqFormat::Fasta => "fasta",
            SeqFormat::Fastq => "fastq",
        }
    }
}

/// Extracts sample identifier from a given sequence file path by removing common file extensions.
pub fn sample_id_from_filename(seq_file: &Path) -> String {
    let mut sample_id = seq_file
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_default();

    if let Some(stripped) = sample_id.strip_suffix(".gz") {
        sample_id = stripped.to_string();
    }

    for ext in [".fastq", ".fq", ".fasta", ".fa", ".fna", ".ffn", ".faa", ".frn"] {
        if let Some(stripped) = sample_id.strip_suffix(ext) {
            sample_id = stripped.to_string();
            break;
        }
    }

    sample_id
}

/// Default dump path for a sequence file: `<out_dir>/<sample id>.yack`.
pub fn default_output_path(seq_file: &Path, out_dir: &Path) -> PathBuf {
    out_dir.join(format!("{}.{}", sample_id_from_filename(seq_file), OUTPUT_EXTENSION))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_path() {
        assert_eq!(SeqFormat::from_path(Path::new("a/reads.fq")).unwrap(), SeqFormat::Fastq);
        assert_eq!(SeqFormat::from_path(Path::new("reads.FASTQ")).unwrap(), SeqFormat::Fastq);
        assert_eq!(SeqFormat::from_path(Path::new("genome.fna.gz")).unwrap(), SeqFormat::Fasta);
        assert_eq!(SeqFormat::from_path(Path::new("genes.ffn")).unwrap(), SeqFormat::Fasta);
    }

    #[test]
    fn test_unsupported_format() {
        match SeqFormat::from_path(Path::new("table.tsv")) {
            Err(YackError::UnsupportedFileFormat(ext)) => assert_eq!(ext, "tsv"),
            other => panic!("unexpected result: {other:?}"),
        }

        assert!(SeqFormat::from_path(Path::new("no_extension")).is_err());
    }

    #[test]
    fn test_sample_id_from_filename() {
        assert_eq!(sample_id_from_filename(Path::new("/data/s1.fasta")), "s1");
        assert_eq!(sample_id_from_filename(Path::new("s1.fq.gz")), "s1");
        assert_eq!(sample_id_from_filename(Path::new("s1.v2.fna")), "s1.v2");
    }

    #[test]
    fn test_default_output_path() {
        let path = default_output_path(Path::new("/data/reads.fastq"), Path::new("/out"));
        assert_eq!(path, PathBuf::from("/out/reads.yack"));
    }
}
