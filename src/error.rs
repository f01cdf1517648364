//! Error kinds reported by the counting engine.
//!
//! Every failure path maps onto a distinct `YackError` variant so callers (and the
//! multi-sample batch runner) can tell validation problems apart from I/O or
//! parsing failures.

use thiserror::Error;

pub const KMER_VALIDATE_MESSAGE: &str = "k-mer size must be an integer between 1 and 32";

#[derive(Debug, Error)]
pub enum YackError {
    /// k outside of [1, 32].
    #[error("{msg} (got {0})", msg = KMER_VALIDATE_MESSAGE)]
    InvalidKmerSize(String),

    /// Number of bins used to partition the rank space.
    #[error("number of bins must be between 1 and {max} (got {0})", max = crate::count_params::MAX_NUM_BINS)]
    InvalidBinCount(u32),

    #[error("unsupported file format: '{0}'")]
    UnsupportedFileFormat(String),

    /// Normalization of an array whose counts sum to zero.
    #[error("cannot normalize a sparse array with a total count of zero")]
    ArithmeticInvalid,

    #[error("unable to parse a sample name from record '{0}'")]
    SampleParseError(String),

    #[error("unknown output option '{0}' (expected 'dump' or 'hist')")]
    UnknownOutputOption(String),

    #[error("invalid sparse array dump: {0}")]
    InvalidDump(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("sequence parse error: {0}")]
    Parse(#[from] needletail::errors::ParseError),

    #[error("serialization error: {0}")]
    Serialization(#[from] bincode::Error),
}

pub type Result<T> = std::result::Result<T, YackError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kmer_size_message() {
        let err = YackError::InvalidKmerSize("33".to_string());
        assert!(err.to_string().starts_with(KMER_VALIDATE_MESSAGE));
    }
}
