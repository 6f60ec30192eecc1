use clap::{Parser, Subcommand, ValueEnum};
use flexi_logger::{Logger, LoggerHandle};
use indicatif::{ProgressBar, ProgressStyle};
use kanken_collator::{
    assemble_parallel, find_config_file, Assemble, Batch, BatchReport, CharacterEntry,
    CollateError, CollatorConfig, Document, DocumentKind, ParallelConfig, ReferenceData, Result,
    ToTsvRow, WordEntry,
};
use log::info;
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Processing strategy for assembly
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Strategy {
    /// Sequential processing (baseline)
    Sequential,
    /// Batch-parallel processing with one thread per chunk
    BatchParallel,
}

/// Output file format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One JSON record per line
    Jsonl,
    /// One tab-separated row per line
    Tsv,
}

#[derive(Parser)]
#[command(name = "kanken-collator")]
#[command(about = "Parses Kanjipedia pages into Kanken entries reconciled with a reading dataset")]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Config file naming the reference datasets (default: collator.yaml, then supplementary/collator.yaml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Processing strategy
    #[arg(short, long, value_enum, default_value_t = Strategy::Sequential, global = true)]
    strategy: Strategy,

    /// Number of threads for batch-parallel (0 = auto-detect)
    #[arg(short, long, default_value_t = 0, global = true)]
    threads: usize,

    /// Limit number of pages to process (for testing)
    #[arg(long, global = true)]
    limit: Option<usize>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Jsonl, global = true)]
    format: OutputFormat,

    /// Quiet mode - minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Log level (RUST_LOG takes precedence)
    #[arg(long, default_value = "info", global = true)]
    log_level: String,
}

#[derive(Subcommand)]
enum Command {
    /// Collate character pages into character entries
    CollateKanji {
        /// Directory of saved character pages (*.html)
        input: PathBuf,
        /// Output file
        output: PathBuf,
    },
    /// Collate word pages into word entries
    CollateWords {
        /// Directory of saved word pages (*.html)
        input: PathBuf,
        /// Output file
        output: PathBuf,
    },
    /// List the four-character idioms heading a set of word pages
    CollectYojijukugo {
        /// Directory of saved word pages (*.html)
        input: PathBuf,
        /// Output file
        output: PathBuf,
    },
}

impl Command {
    fn kind(&self) -> DocumentKind {
        match self {
            Command::CollateKanji { .. } => DocumentKind::Character,
            Command::CollateWords { .. } | Command::CollectYojijukugo { .. } => DocumentKind::Word,
        }
    }

    fn paths(&self) -> (&Path, &Path) {
        match self {
            Command::CollateKanji { input, output }
            | Command::CollateWords { input, output }
            | Command::CollectYojijukugo { input, output } => (input.as_path(), output.as_path()),
        }
    }
}

#[derive(Default)]
struct Stats {
    documents_processed: usize,
    entries_written: usize,
    failed: usize,
    failed_documents: Vec<String>,
    elapsed: Duration,
}

fn init_logging(level: &str) -> std::result::Result<LoggerHandle, String> {
    Logger::try_with_env_or_str(level)
        .map_err(|err| format!("invalid log level `{level}`: {err}"))?
        .start()
        .map_err(|err| format!("failed to start logger: {err}"))
}

fn progress_bar(len: usize, quiet: bool) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new(len as u64);
    if let Ok(style) = ProgressStyle::with_template("{spinner} [{elapsed_precise}] {bar:40} {pos}/{len} {msg}") {
        pb.set_style(style);
    }
    pb
}

fn collate<T>(documents: &[Document], data: &ReferenceData, args: &Args, output: &Path) -> Result<Stats>
where
    T: Assemble + Serialize + ToTsvRow,
{
    let start_time = Instant::now();
    let pb = progress_bar(documents.len(), args.quiet);

    let report: BatchReport<T> = match args.strategy {
        Strategy::Sequential => Batch::new(documents, data)
            .entries::<T>()
            .inspect(|result| {
                pb.inc(1);
                if let Ok(entry) = result {
                    pb.set_message(entry.identity().to_string());
                }
            })
            .collect(),
        Strategy::BatchParallel => {
            let config = ParallelConfig::with_threads(args.threads);
            pb.set_message(format!("{} threads", config.num_threads));
            let results = assemble_parallel::<T>(documents, data, &config);
            pb.inc(results.len() as u64);
            results.into_iter().collect()
        }
    };
    pb.finish_and_clear();

    write_entries(&report.entries, args.format, output)?;
    info!(
        "Collated {} entries ({} failed) into {}",
        report.succeeded(),
        report.failed(),
        output.display()
    );

    Ok(Stats {
        documents_processed: documents.len(),
        entries_written: report.succeeded(),
        failed: report.failed(),
        failed_documents: report.failures.iter().map(|f| f.to_string()).collect(),
        elapsed: start_time.elapsed(),
    })
}

/// Headword extraction is cheap, so it always runs sequentially.
fn collect_yojijukugo(documents: &[Document], data: &ReferenceData, args: &Args, output: &Path) -> Result<Stats> {
    let start_time = Instant::now();
    let pb = progress_bar(documents.len(), args.quiet);

    let report: BatchReport<String> = Batch::new(documents, data)
        .four_character_headwords()
        .inspect(|result| {
            pb.inc(1);
            if let Ok(headword) = result {
                pb.set_message(headword.clone());
            }
        })
        .collect();
    pb.finish_and_clear();

    write_entries(&report.entries, args.format, output)?;
    info!(
        "Collected {} four-character headwords ({} failed) into {}",
        report.succeeded(),
        report.failed(),
        output.display()
    );

    Ok(Stats {
        documents_processed: documents.len(),
        entries_written: report.succeeded(),
        failed: report.failed(),
        failed_documents: report.failures.iter().map(|f| f.to_string()).collect(),
        elapsed: start_time.elapsed(),
    })
}

fn write_entries<T: Serialize + ToTsvRow>(entries: &[T], format: OutputFormat, path: &Path) -> Result<()> {
    let io_error = |source: std::io::Error| CollateError::Io {
        path: path.to_path_buf(),
        source,
    };
    let file = File::create(path).map_err(io_error)?;
    let mut writer = BufWriter::with_capacity(256 * 1024, file);

    for entry in entries {
        let line = match format {
            OutputFormat::Jsonl => serde_json::to_string(entry).map_err(|source| CollateError::Json {
                path: path.to_path_buf(),
                source,
            })?,
            OutputFormat::Tsv => entry.to_tsv_row(),
        };
        writeln!(writer, "{}", line).map_err(io_error)?;
    }
    writer.flush().map_err(io_error)
}

fn run(args: &Args) -> Result<Stats> {
    let config_path = find_config_file(args.config.as_deref())?;
    let config = CollatorConfig::from_file(&config_path)?;
    let data = ReferenceData::load(&config)?;

    let (input, output) = args.command.paths();
    let mut documents = Document::load_dir(input, args.command.kind())?;
    if let Some(limit) = args.limit {
        documents.truncate(limit);
    }

    if !args.quiet {
        println!("Config: {}", config_path.display());
        println!("Input: {}", input.display());
        println!("Output: {}", output.display());
        println!("Strategy: {:?}", args.strategy);
        if let Some(limit) = args.limit {
            println!("Page limit: {}", limit);
        }
        println!();
    }

    match args.command {
        Command::CollateKanji { .. } => collate::<CharacterEntry>(&documents, &data, args, output),
        Command::CollateWords { .. } => collate::<WordEntry>(&documents, &data, args, output),
        Command::CollectYojijukugo { .. } => collect_yojijukugo(&documents, &data, args, output),
    }
}

fn print_stats(stats: &Stats, strategy_name: &str) {
    println!();
    println!("============================================================");
    println!("Strategy: {}", strategy_name);
    println!("Documents processed: {}", stats.documents_processed);
    println!("Entries written: {}", stats.entries_written);
    println!("Failed: {}", stats.failed);
    if !stats.failed_documents.is_empty() {
        println!("------------------------------------------------------------");
        for failure in stats.failed_documents.iter().take(20) {
            println!("  {}", failure);
        }
        if stats.failed_documents.len() > 20 {
            println!("  ... and {} more", stats.failed_documents.len() - 20);
        }
    }
    println!("------------------------------------------------------------");
    println!("Time: {}m {}s", stats.elapsed.as_secs() / 60, stats.elapsed.as_secs() % 60);
    println!(
        "Rate: {:.0} docs/sec",
        stats.documents_processed as f64 / stats.elapsed.as_secs_f64().max(f64::EPSILON)
    );
    println!("============================================================");
}

fn main() {
    let args = Args::parse();

    // Keep the handle alive so buffered log lines are flushed on exit
    let _logger = match init_logging(&args.log_level) {
        Ok(handle) => handle,
        Err(e) => {
            eprintln!("Error initialising logging: {}", e);
            std::process::exit(1);
        }
    };

    match run(&args) {
        Ok(stats) => {
            if !args.quiet {
                print_stats(&stats, &format!("{:?}", args.strategy));
            }
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
