//! Main entry point for the yack application.
//!
//! This file handles command-line parsing, logging setup, input validation, and orchestrates
//! k-mer counting of a single FASTA/FASTQ file or of every sample in a multi-sample file.
//! Counted k-mers are either dumped as sparse arrays or printed as a histogram.

use std::env;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::Parser;
use log::{error, info};
use num_format::{Locale, ToFormattedString};

use crate::cli::{Cli, Command, CountArgs, HistArgs, OutputMode};
use crate::count::{count_multiple_samples, count_sample, SampleOutcome};
use crate::count_params::{CountParams, KmerSize};
use crate::io_utils::{default_output_path, sample_id_from_filename, SeqFormat};
use crate::logging::setup_logger;
use crate::rank::decode_rank;
use crate::sparse_array::SparseArray;

mod cli;
pub mod alphabet;
pub mod count;
pub mod count_params;
pub mod counter;
pub mod error;
pub mod io_utils;
pub mod logging;
pub mod progress;
pub mod rank;
pub mod seq_record;
pub mod sparse_array;
pub mod splitter;

/// Common initialization required by all commands.
fn init(jobs: usize) -> Result<()> {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    info!("{} v{}", env!("CARGO_PKG_NAME"), VERSION);
    info!("{}", env::args().collect::<Vec<String>>().join(" "));

    info!("Using {} jobs.", jobs);
    rayon::ThreadPoolBuilder::new()
        .num_threads(jobs)
        .build_global()?;

    Ok(())
}

/// Log a short summary of a counted sample.
fn report(sample: &str, sparse_array: &SparseArray, k: KmerSize) {
    info!(
        " - {}: {} distinct k-mers, {} total",
        sample,
        sparse_array.len().to_formatted_string(&Locale::en),
        (sparse_array.total() as u64).to_formatted_string(&Locale::en)
    );

    if let Some((rank, count)) = sparse_array.max_entry() {
        info!("   most abundant k-mer: {} ({})", decode_rank(rank, k), count as u64);
    }
}

/// Write a counted sample according to the requested output mode.
fn write_output<W: Write>(
    sparse_array: &mut SparseArray,
    mode: OutputMode,
    normalize: bool,
    output_file: &Path,
    stdout: &mut W,
) -> Result<()> {
    match mode {
        OutputMode::Dump => {
            if normalize {
                sparse_array.normalize()?;
            }
            sparse_array
                .dump_file(output_file)
                .with_context(|| format!("Failed to write {}", output_file.display()))?;
            info!("Output file: {}", output_file.display());
        }
        OutputMode::Hist => sparse_array.hist(stdout)?,
    }

    Ok(())
}

/// Write every successfully counted sample, returning the samples that failed.
///
/// A failing sample is logged and skipped; the remaining samples are still written.
fn write_outcomes<W: Write>(
    outcomes: Vec<SampleOutcome>,
    mode: OutputMode,
    normalize: bool,
    k: KmerSize,
    out_dir: &Path,
    stdout: &mut W,
) -> Vec<(String, anyhow::Error)> {
    let mut failures = Vec::new();
    for outcome in outcomes {
        let sample = sample_id_from_filename(&outcome.sample_file);
        let written = outcome.result.map_err(anyhow::Error::from).and_then(|mut sparse_array| {
            report(&sample, &sparse_array, k);
            if mode == OutputMode::Hist {
                writeln!(stdout, "# {}", sample)?;
            }
            let output_file = default_output_path(&outcome.sample_file, out_dir);
            write_output(&mut sparse_array, mode, normalize, &output_file, &mut *stdout)
        });

        if let Err(e) = written {
            error!("Sample '{}' failed: {:#}", sample, e);
            failures.push((sample, e));
        }
    }

    failures
}

fn run_count(args: CountArgs) -> Result<()> {
    // validate everything before any work begins
    let mode = args.output_mode()?;
    if mode == OutputMode::Hist && args.normalize {
        bail!("--normalize can only be used when dumping sparse arrays.");
    }
    SeqFormat::from_path(&args.input_file)?;
    if !args.input_file.exists() {
        bail!("Input file {} does not exist.", args.input_file.display());
    }
    let params = CountParams::new(args.kmer_size, args.num_bins)?;

    let out_dir: PathBuf = match &args.output_dir {
        Some(dir) => dir.clone(),
        None => args
            .input_file
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default(),
    };
    if mode == OutputMode::Dump {
        std::fs::create_dir_all(&out_dir)?;
    }

    init(args.num_jobs)?;
    info!("Counting {}-mers of {}", params.k(), args.input_file.display());

    let stdout = std::io::stdout();
    let mut stdout = BufWriter::new(stdout.lock());

    if !args.multiple {
        let mut sparse_array = count_sample(&args.input_file, &params)?;
        report(&sample_id_from_filename(&args.input_file), &sparse_array, params.k());

        let output_file = default_output_path(&args.input_file, &out_dir);
        write_output(&mut sparse_array, mode, args.normalize, &output_file, &mut stdout)?;
        stdout.flush()?;
        return Ok(());
    }

    let split_dir = out_dir.join("samples");
    info!("Splitting samples into {}", split_dir.display());
    let outcomes = count_multiple_samples(&args.input_file, &split_dir, &args.delimiter, &params)?;

    info!("Processed {} samples:", outcomes.len());
    let failures = write_outcomes(outcomes, mode, args.normalize, params.k(), &out_dir, &mut stdout);
    stdout.flush()?;

    if !failures.is_empty() {
        bail!("{} sample(s) failed; see log for details.", failures.len());
    }

    Ok(())
}

fn run_hist(args: HistArgs) -> Result<()> {
    let sparse_array = SparseArray::load_file(&args.dump_file)
        .with_context(|| format!("Failed to load {}", args.dump_file.display()))?;

    let stdout = std::io::stdout();
    let mut stdout = BufWriter::new(stdout.lock());
    sparse_array.hist(&mut stdout)?;
    stdout.flush()?;

    Ok(())
}

fn main() -> Result<()> {
    let start = Instant::now();

    let args = Cli::parse();

    match args.command {
        Command::Count(count_args) => {
            let log_dir = count_args.output_dir.clone();
            setup_logger(log_dir.as_deref(), args.verbose)?;
            run_count(count_args)?;
        }
        Command::Hist(hist_args) => {
            setup_logger(None, args.verbose)?;
            run_hist(hist_args)?;
        }
    }

    info!("Elapsed time (sec): {:.2}", start.elapsed().as_secs_f32());
    info!("Done.");

    Ok(())
}
