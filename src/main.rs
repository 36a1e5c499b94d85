use anyhow::{anyhow, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;

use fm_search::index::bwt::inverse_transform;
use fm_search::index::fm::{FmIndex, IndexStats};
use fm_search::index::IndexConfig;
use fm_search::io::dataset::{read_dataset, Dataset};
use fm_search::search::QueryDispatcher;
use fm_search::util::logging::init_logging;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

#[derive(Parser, Debug)]
#[command(name = "fm-search", author, version, about = "BWT / FM-index multi-pattern search", arg_required_else_help = true)]
struct Cli {
    /// Enable debug-level logging
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug)]
struct IndexArgs {
    /// Dataset file: text line, then pattern lines (approx: optional trailing mismatch bound)
    dataset: String,
    /// Occ checkpoint interval (C)
    #[arg(short = 'c', long = "checkpoint", default_value_t = 128)]
    checkpoint: usize,
    /// Suffix array sampling interval (K)
    #[arg(short = 'k', long = "sample", default_value_t = 32)]
    sample: usize,
    /// Sentinel symbol terminating the text
    #[arg(long, default_value_t = '$')]
    sentinel: char,
    /// Worker threads (0 = rayon default)
    #[arg(short = 't', long = "threads", default_value_t = 1)]
    threads: usize,
    /// Print a JSON report instead of plain positions
    #[arg(long)]
    json: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the Burrows-Wheeler transform of the dataset text
    Bwt {
        dataset: String,
        #[arg(long, default_value_t = '$')]
        sentinel: char,
    },
    /// Reconstruct the text from a BWT string
    Inverse {
        dataset: String,
        #[arg(long, default_value_t = '$')]
        sentinel: char,
    },
    /// Count exact occurrences of every pattern
    Count(IndexArgs),
    /// Report exact match positions of all patterns
    Search(IndexArgs),
    /// Report positions matching with at most d mismatches
    Approx {
        #[command(flatten)]
        args: IndexArgs,
        /// Mismatch bound (defaults to the dataset's trailing integer line)
        #[arg(short = 'd', long = "mismatches")]
        mismatches: Option<usize>,
    },
}

#[derive(Serialize)]
struct Report<'a, T: Serialize> {
    command: &'static str,
    config: &'a IndexConfig,
    stats: IndexStats,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_mismatches: Option<usize>,
    patterns: Vec<String>,
    results: T,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(if cli.verbose { log::LevelFilter::Debug } else { log::LevelFilter::Info });

    match cli.command {
        Commands::Bwt { dataset, sentinel } => run_bwt(&dataset, sentinel_byte(sentinel)?),
        Commands::Inverse { dataset, sentinel } => run_inverse(&dataset, sentinel_byte(sentinel)?),
        Commands::Count(args) => run_query("count", &args, None),
        Commands::Search(args) => run_query("search", &args, None),
        Commands::Approx { args, mismatches } => {
            let d = mismatches.map_or(Bound::FromDataset, Bound::Given);
            run_query("approx", &args, Some(d))
        }
    }
}

/// 错配上限来源
#[derive(Debug, Clone, Copy)]
enum Bound {
    Given(usize),
    FromDataset,
}

fn sentinel_byte(c: char) -> Result<u8> {
    u8::try_from(c)
        .ok()
        .filter(u8::is_ascii)
        .ok_or_else(|| anyhow!("sentinel '{}' must be a single ASCII character", c))
}

fn run_bwt(path: &str, sentinel: u8) -> Result<()> {
    let ds = read_dataset(path, false)?;
    let config = IndexConfig::default().with_sentinel(sentinel);
    let fm = FmIndex::build(&ds.terminated_text(sentinel), &config)?;
    println!("{}", String::from_utf8_lossy(&fm.bwt_string()));
    Ok(())
}

fn run_inverse(path: &str, sentinel: u8) -> Result<()> {
    let ds = read_dataset(path, false)?;
    let text = inverse_transform(&ds.text, sentinel)?;
    println!("{}", String::from_utf8_lossy(&text));
    Ok(())
}

fn run_query(command: &'static str, args: &IndexArgs, bound: Option<Bound>) -> Result<()> {
    let sentinel = sentinel_byte(args.sentinel)?;
    let config = IndexConfig::new(args.checkpoint, args.sample).with_sentinel(sentinel);
    let ds = read_dataset(&args.dataset, bound.is_some())?;
    if ds.patterns.is_empty() {
        anyhow::bail!("dataset '{}' contains no patterns", args.dataset);
    }
    let max_mismatches = match bound {
        None => None,
        Some(Bound::Given(d)) => Some(d),
        Some(Bound::FromDataset) => Some(
            ds.mismatches
                .ok_or_else(|| anyhow!("no mismatch bound given and dataset '{}' has none", args.dataset))?,
        ),
    };

    let fm = FmIndex::build(&ds.terminated_text(sentinel), &config)
        .map_err(|e| anyhow!("cannot build index for '{}': {}", args.dataset, e))?;
    let qd = QueryDispatcher::new(&fm, args.threads)?;

    let results: Vec<usize> = match (command, max_mismatches) {
        ("count", _) => qd.count_all(&ds.patterns)?,
        (_, Some(d)) => qd.find_all_approx(&ds.patterns, d)?,
        (_, None) => qd.find_all(&ds.patterns)?,
    };

    if args.json {
        print_report(command, &config, &fm, max_mismatches, &ds, results)
    } else {
        println!("{}", join(&results));
        Ok(())
    }
}

fn print_report(
    command: &'static str,
    config: &IndexConfig,
    fm: &FmIndex,
    max_mismatches: Option<usize>,
    ds: &Dataset,
    results: Vec<usize>,
) -> Result<()> {
    let report = Report {
        command,
        config,
        stats: fm.stats(),
        max_mismatches,
        patterns: ds.patterns.iter().map(|p| String::from_utf8_lossy(p).into_owned()).collect(),
        results,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn join(values: &[usize]) -> String {
    values.iter().map(ToString::to_string).collect::<Vec<_>>().join(" ")
}
