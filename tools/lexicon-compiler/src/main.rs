use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::Parser;
use macron_engine::Lexicon;
use macron_protocol::LexiconArchive;
use rkyv::ser::{serializers::AllocSerializer, Serializer};
use serde::Serialize;
use tracing::{debug, info};

#[derive(Parser)]
#[command(author, version, about = "Compiles quantity lexicons (word list, TSV or JSON) to an rkyv archive")]
struct Cli {
    /// Source files: `.tsv` as form<TAB>markup, `.json` as an archive
    /// document, anything else as one markup word per line.
    #[arg(short, long, value_name = "FILE", required = true, num_args = 1..)]
    input: Vec<PathBuf>,

    #[arg(short, long, value_name = "FILE")]
    output: PathBuf,

    /// Name stored in the archive; defaults to the output file stem.
    #[arg(short, long)]
    name: Option<String>,

    /// Print a JSON summary on stdout.
    #[arg(long)]
    report: bool,
}

#[derive(Serialize)]
struct Report<'a> {
    name: &'a str,
    version: u32,
    sources: usize,
    entries: usize,
    bytes: usize,
}

fn read_source(path: &Path) -> anyhow::Result<Lexicon> {
    let name = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    if path.extension().and_then(|e| e.to_str()) == Some("json") {
        let data = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        let archive: LexiconArchive =
            serde_json::from_str(&data).with_context(|| format!("parsing {}", path.display()))?;
        let mut lexicon = Lexicon::new(name);
        for entry in &archive.entries {
            for markup in &entry.candidates {
                lexicon.insert(markup);
            }
        }
        return Ok(lexicon);
    }
    Lexicon::load(path).with_context(|| format!("loading {}", path.display()))
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let cli = Cli::parse();
    let name = cli.name.clone().unwrap_or_else(|| {
        cli.output
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "lexicon".to_string())
    });

    let mut lexicon = Lexicon::new(name.as_str());
    for path in &cli.input {
        let source = read_source(path)?;
        debug!(source = %path.display(), entries = source.len(), "read");
        lexicon.extend(&source);
    }
    if lexicon.is_empty() {
        bail!("no entries found in {} source file(s)", cli.input.len());
    }

    let archive = lexicon.to_archive();
    let mut serializer = AllocSerializer::<256>::default();
    serializer
        .serialize_value(&archive)
        .map_err(|e| anyhow::anyhow!("serializing archive: {e:?}"))?;
    let bytes = serializer.into_serializer().into_inner();

    // what the engine will load must pass its own validation
    let reloaded = Lexicon::from_archive_bytes(name.as_str(), &bytes)?;
    if reloaded.len() != lexicon.len() {
        bail!("archive holds {} entries, expected {}", reloaded.len(), lexicon.len());
    }

    fs::write(&cli.output, &bytes).with_context(|| format!("writing {}", cli.output.display()))?;
    info!(output = %cli.output.display(), entries = lexicon.len(), bytes = bytes.len(), "archive written");

    if cli.report {
        let report = Report {
            name: &name,
            version: archive.version,
            sources: cli.input.len(),
            entries: archive.entries.len(),
            bytes: bytes.len(),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    }
    Ok(())
}
