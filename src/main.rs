//! Command-line entry point
//!
//! With no arguments the binary behaves as a Git clean filter: stdin
//! in, cleaned document out. Given file arguments it converts them in
//! place. `install` wires the filter into the local Git configuration.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use svgscrub::files::{convert, filter, install};
use svgscrub::Stripper;

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Strip editor session metadata from SVG files",
    args_conflicts_with_subcommands = true
)]
struct Cli {
    /// SVG files to rewrite in place; with no files, reads stdin and
    /// writes stdout
    #[arg(value_name = "FILE", value_hint = clap::ValueHint::FilePath)]
    files: Vec<PathBuf>,

    /// Print cleaned documents to stdout instead of rewriting the files
    #[arg(long)]
    stdout: bool,

    /// Only report errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Report per-file results and every removed attribute
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Configure the current Git repository to run this binary as an
    /// SVG clean filter
    Install {
        /// Write to the user-level Git configuration instead
        #[arg(long)]
        global: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.quiet {
        log::LevelFilter::Error
    } else if cli.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level);
    }

    if let Err(e) = run(&cli) {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    if let Some(Commands::Install { global }) = &cli.command {
        install::install(*global)?;
        return Ok(());
    }

    let stripper = Stripper::new()?;

    if cli.files.is_empty() {
        filter::run_stdio(&stripper)?;
        return Ok(());
    }

    if cli.stdout {
        let stdout = std::io::stdout();
        let mut handle = stdout.lock();
        for path in &cli.files {
            let data = std::fs::read(path)
                .with_context(|| format!("cannot read {}", path.display()))?;
            let cleaned = stripper
                .strip(&data)
                .with_context(|| format!("cannot clean {}", path.display()))?;
            handle.write_all(&cleaned)?;
        }
        handle.flush()?;
        return Ok(());
    }

    let summary = convert::convert_files(&stripper, &cli.files);
    log::info!(
        "{} cleaned, {} already clean, {} failed",
        summary.modified,
        summary.unchanged,
        summary.failed
    );
    if summary.failed > 0 {
        anyhow::bail!("{} of {} file(s) failed", summary.failed, cli.files.len());
    }
    Ok(())
}

static LOGGER: StderrLogger = StderrLogger;

struct StderrLogger;

impl log::Log for StderrLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &log::Record) {
        if self.enabled(record.metadata()) {
            match record.level() {
                log::Level::Error => eprintln!("error: {}", record.args()),
                log::Level::Warn => eprintln!("warning: {}", record.args()),
                _ => eprintln!("{}", record.args()),
            }
        }
    }

    fn flush(&self) {}
}
