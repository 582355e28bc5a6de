use std::{
    fs::File,
    io::{self, BufReader},
    path::PathBuf,
};

use anyhow::Context;
use clap::Parser;
use ocr_layout::{config::load_config, Config, Formatter, OcrResult};
use tracing_subscriber::{fmt::format::FmtSpan, EnvFilter};

/// Annotates OCR engine output with the layout role of every fragment
#[derive(Parser, Debug)]
#[command(name = "ocr-layout")]
struct Args {
    /// Engine output as JSON; reads stdin when absent or `-`
    input: Option<PathBuf>,

    /// TOML file with thresholds and markers
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print `role<TAB>text` instead of marker lines
    #[arg(long)]
    roles: bool,

    /// Print the effective configuration and exit
    #[arg(long)]
    print_config: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_span_events(FmtSpan::CLOSE)
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => load_config(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => Config::default(),
    };
    if args.print_config {
        print!("{}", config.to_toml()?);
        return Ok(());
    }

    let result = match &args.input {
        Some(path) if path.as_os_str() != "-" => {
            let file = File::open(path)
                .with_context(|| format!("Failed to open {}", path.display()))?;
            OcrResult::from_reader(BufReader::new(file))?
        }
        _ => OcrResult::from_reader(io::stdin().lock())?,
    };

    let formatter = Formatter::from_config(&config);
    if args.roles {
        for line in formatter.classify(&result) {
            println!("{}", line.to_record());
        }
    } else {
        let text = formatter.format(&result);
        if !text.is_empty() {
            println!("{text}");
        }
    }
    Ok(())
}
