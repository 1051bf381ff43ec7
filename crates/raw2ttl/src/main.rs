//! Binary entrypoint: converts raw provenance logs to Turtle on stdout.
use anyhow::Context;
use clap::Parser;
use raw2ttl::{ConvertOptions, Converter};
use std::fs::File;
use std::io::{self, BufReader, BufWriter};
use std::path::PathBuf;
use tracing::info_span;

#[derive(Debug, Parser)]
#[command(name = "raw2ttl", version)]
#[command(about = "Convert raw provenance logs to PROV/Turtle", long_about = None)]
struct Cli {
    /// Input files, read in order as one stream. Reads stdin when empty; `-` names stdin.
    #[arg(value_name = "FILE")]
    files: Vec<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    setup_tracing();
    let cli = Cli::parse();

    // RAW2TTL_ON_ERROR, RAW2TTL_DEBUG and RAW2TTL_TEMPLATES tune the run.
    let options = ConvertOptions::from_env();
    let stdout = io::stdout();
    let mut converter = Converter::new(BufWriter::new(stdout.lock()), options)
        .context("failed to set up the turtle emitter")?;

    let inputs = if cli.files.is_empty() {
        vec![PathBuf::from("-")]
    } else {
        cli.files
    };

    for path in &inputs {
        let span = info_span!("input", path = %path.display());
        let _guard = span.enter();

        if path.as_os_str() == "-" {
            converter.convert(io::stdin().lock()).context("failed to convert stdin")?;
        } else {
            let file = File::open(path)
                .with_context(|| format!("failed to open {}", path.display()))?;
            converter
                .convert(BufReader::new(file))
                .with_context(|| format!("failed to convert {}", path.display()))?;
        }
    }

    converter.finish().context("failed to write output")?;
    Ok(())
}

fn setup_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}
