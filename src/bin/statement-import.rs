use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process;

use anyhow::Context;
use bank_statement_import::{CsvMapping, FileFormat, ParserBuilder, PartnerRegistry};
use clap::{Parser, ValueEnum};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(
    name = "statement-import",
    version,
    about = "Imports a QIF or vendor CSV bank statement and prints it as JSON.",
    long_about = None,
)]
struct Args {
    /// Statement file to import
    input: PathBuf,

    /// Skip content sniffing and force a format
    #[arg(long, value_enum)]
    format: Option<Format>,

    /// TOML field mapping for CSV input
    #[arg(long)]
    mapping: Option<PathBuf>,

    /// TOML file with `[[partners]]` entries for name resolution
    #[arg(long)]
    partners: Option<PathBuf>,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum Format {
    Qif,
    Csv,
}

impl From<Format> for FileFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Qif => FileFormat::Qif,
            Format::Csv => FileFormat::Csv,
        }
    }
}

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    if let Err(err) = run(Args::parse()) {
        eprintln!("Error: {err:#}");
        process::exit(1);
    }
}

fn run(args: Args) -> anyhow::Result<()> {
    let content = fs::read(&args.input)
        .with_context(|| format!("failed to read {}", args.input.display()))?;

    let mut builder = ParserBuilder::new().content(content);
    if let Some(name) = args.input.file_name().and_then(|n| n.to_str()) {
        builder = builder.filename(name);
    }
    if let Some(format) = args.format {
        builder = builder.format(format.into());
    }
    if let Some(path) = &args.mapping {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read mapping {}", path.display()))?;
        builder = builder.mapping(CsvMapping::from_toml(&text)?);
    }

    let partners = match &args.partners {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read partners {}", path.display()))?;
            PartnerRegistry::from_toml(&text)?
        }
        None => PartnerRegistry::default(),
    };
    info!("Loaded {} partners", partners.len());

    let batch = builder.import(&partners)?;
    info!("Imported {} transactions", batch.transactions().count());

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    if args.pretty {
        serde_json::to_writer_pretty(&mut handle, &batch)?;
    } else {
        serde_json::to_writer(&mut handle, &batch)?;
    }
    writeln!(handle)?;
    Ok(())
}
