//! Command-line interface definition for the yack application.
//!
//! This file defines the `Cli` struct using the `clap` crate. The `count` command counts
//! k-mers of a FASTA/FASTQ file (or of every sample in a multi-sample file) and either
//! dumps the resulting sparse array or prints it as a histogram. The `hist` command
//! prints a previously dumped array. The CLI output is styled using the `anstyle` crate.

use std::path::PathBuf;
use std::str::FromStr;

use clap::{Args, Parser, Subcommand};

use crate::count_params::{DEFAULT_NUM_BINS, KmerSize, MAX_NUM_BINS};
use crate::error::{KMER_VALIDATE_MESSAGE, YackError};
use crate::splitter::DEFAULT_DELIMITER;

#[derive(Parser)]
#[command(author, version, about = "Yack is yet another k-mer counter.", long_about = None)]
#[command(styles=get_styles())]
#[command(disable_help_subcommand = true)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Report debug messages
    #[arg(short, long, global = true, default_value_t = false)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Count k-mers of size k in INPUT_FILE (FASTA or FASTQ)
    Count(CountArgs),

    /// Print a dumped sparse array as a histogram
    Hist(HistArgs),
}

#[derive(Args)]
#[command(group(clap::ArgGroup::new("output").multiple(false)))]
pub struct CountArgs {
    /// FASTA/FASTQ file to process
    #[arg(value_parser = clap::value_parser!(PathBuf))]
    pub input_file: PathBuf,

    /// Length of k-mers to count
    #[arg(short = 'k', long, visible_alias = "kmer_size", help_heading = "Counting parameters", default_value_t = KmerSize::default(), value_parser = validate_kmer_size)]
    pub kmer_size: KmerSize,

    /// Number of bins used to partition k-mers while counting
    #[arg(long, help_heading = "Counting parameters", default_value_t = DEFAULT_NUM_BINS, value_parser = clap::value_parser!(u32).range(1..=MAX_NUM_BINS as i64))]
    pub num_bins: u32,

    /// Output directory [default: directory of INPUT_FILE]
    #[arg(short = 'o', long, visible_alias = "output_dir", help_heading = "Output", value_parser = clap::value_parser!(PathBuf))]
    pub output_dir: Option<PathBuf>,

    /// Dump sparse array to <OUTPUT_DIR>/<INPUT>.yack [default]
    #[arg(long, help_heading = "Output", group = "output")]
    pub dump: bool,

    /// Print k-mer ranks and counts to stdout
    #[arg(long, help_heading = "Output", group = "output")]
    pub hist: bool,

    /// Output mode given by name (dump or hist)
    #[arg(long, help_heading = "Output", group = "output")]
    pub output_mode: Option<String>,

    /// Normalize counts to frequencies before dumping
    #[arg(long, help_heading = "Output", conflicts_with = "hist")]
    pub normalize: bool,

    /// INPUT_FILE holds several samples identified by record name prefixes
    #[arg(long, help_heading = "Multiple samples")]
    pub multiple: bool,

    /// Delimiter separating the sample name from the rest of a record name
    #[arg(long, help_heading = "Multiple samples", default_value = DEFAULT_DELIMITER)]
    pub delimiter: String,

    /// Number of jobs to run in parallel
    #[arg(short = 'j', long, visible_alias = "num_jobs", default_value_t = 1, value_parser = validate_num_jobs)]
    pub num_jobs: usize,
}

#[derive(Args)]
pub struct HistArgs {
    /// Sparse array previously written with `count --dump`
    #[arg(value_parser = clap::value_parser!(PathBuf))]
    pub dump_file: PathBuf,
}

/// What to do with a counted sparse array.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputMode {
    Dump,
    Hist,
}

impl FromStr for OutputMode {
    type Err = YackError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dump" => Ok(OutputMode::Dump),
            "hist" => Ok(OutputMode::Hist),
            _ => Err(YackError::UnknownOutputOption(s.to_string())),
        }
    }
}

impl CountArgs {
    /// Selected output mode; dump unless otherwise requested.
    pub fn output_mode(&self) -> Result<OutputMode, YackError> {
        if let Some(mode) = &self.output_mode {
            return mode.parse();
        }

        if self.hist {
            Ok(OutputMode::Hist)
        } else {
            Ok(OutputMode::Dump)
        }
    }
}

fn validate_kmer_size(k: &str) -> Result<KmerSize, String> {
    k.parse().map_err(|_| KMER_VALIDATE_MESSAGE.to_string())
}

fn validate_num_jobs(jobs: &str) -> Result<usize, String> {
    let jobs: usize = jobs
        .parse()
        .map_err(|_| format!("`{jobs}` isn't a valid value"))?;

    if !(1..=1024).contains(&jobs) {
        return Err("Number of jobs must be in the range [1, 1024]".to_string());
    }

    Ok(jobs)
}

fn get_styles() -> clap::builder::Styles {
    clap::builder::Styles::styled()
        .usage(
            anstyle::Style::new()
                .bold()
                .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::White))),
        )
        .header(
            anstyle::Style::new()
                .bold()
                .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::White))),
        )
        .literal(
            anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))),
        )
        .invalid(
            anstyle::Style::new()
                .bold()
                .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
        )
        .error(
            anstyle::Style::new()
                .bold()
                .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
        )
        .valid(
            anstyle::Style::new()
                .bold()
                .underline()
                .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))),
        )
        .placeholder(
            anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::White))),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn count_args(args: &[&str]) -> CountArgs {
        let cli = Cli::try_parse_from(args.iter().copied()).unwrap();
        match cli.command {
            Command::Count(args) => args,
            Command::Hist(_) => panic!("expected count command"),
        }
    }

    #[test]
    fn test_verify_cli() {
        Cli::command().debug_assert()
    }

    #[test]
    fn test_count_defaults() {
        let args = count_args(&["yack", "count", "reads.fq"]);
        assert_eq!(args.kmer_size.get(), crate::count_params::DEFAULT_KMER_SIZE as usize);
        assert_eq!(args.num_bins, DEFAULT_NUM_BINS);
        assert_eq!(args.delimiter, "_");
        assert_eq!(args.num_jobs, 1);
        assert_eq!(args.output_mode().unwrap(), OutputMode::Dump);
        assert!(!args.multiple);
    }

    #[test]
    fn test_output_modes() {
        let args = count_args(&["yack", "count", "reads.fq", "--hist"]);
        assert_eq!(args.output_mode().unwrap(), OutputMode::Hist);

        let args = count_args(&["yack", "count", "reads.fq", "--output-mode", "dump"]);
        assert_eq!(args.output_mode().unwrap(), OutputMode::Dump);

        let args = count_args(&["yack", "count", "reads.fq", "--output-mode", "tsv"]);
        assert!(matches!(args.output_mode(), Err(YackError::UnknownOutputOption(_))));

        assert!(Cli::try_parse_from(["yack", "count", "reads.fq", "--dump", "--hist"]).is_err());
    }

    #[test]
    fn test_num_bins_bounds() {
        let args = count_args(&["yack", "count", "reads.fq", "--num-bins", "1000000"]);
        assert_eq!(args.num_bins, MAX_NUM_BINS);

        for bad in ["0", "1000001", "4294967295"] {
            assert!(Cli::try_parse_from(["yack", "count", "reads.fq", "--num-bins", bad]).is_err());
        }
    }

    #[test]
    fn test_kmer_size_validation() {
        let args = count_args(&["yack", "count", "reads.fq", "-k", "32"]);
        assert_eq!(args.kmer_size.get(), 32);

        for bad in ["0", "33", "x"] {
            let err = Cli::try_parse_from(["yack", "count", "reads.fq", "-k", bad])
                .err()
                .unwrap();
            assert!(err.to_string().contains(KMER_VALIDATE_MESSAGE));
        }
    }
}
