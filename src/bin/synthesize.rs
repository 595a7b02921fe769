use std::{
    fs,
    io::{self, Read as _},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use papersynth::{
    config,
    logging::{self, ConsoleTarget},
    processing::{Document, ProcessingService, SynthesisReport, prepare_documents, render_report},
    summarization,
};
use serde::Deserialize;

#[derive(Parser)]
#[command(
    name = "synthesize",
    about = "Summarize extracted paper text and synthesize a batch of papers"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Summarize each document of a JSON batch, then synthesize them.
    Batch {
        /// JSON array of `{ "id"?: string, "text": string }`; `-` reads stdin.
        #[arg(long)]
        input: PathBuf,
        /// Print the structured report as JSON instead of text.
        #[arg(long)]
        json: bool,
    },
    /// Summarize one plain-text file directly.
    Text {
        /// Plain-text file; `-` reads stdin.
        #[arg(long)]
        input: PathBuf,
    },
}

#[derive(Deserialize)]
struct DocumentInput {
    #[serde(default)]
    id: Option<String>,
    text: String,
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = config::init_config().context("Failed to load configuration")?;
    logging::init_tracing(ConsoleTarget::Stderr);
    config.log_loaded();

    let engine = summarization::build_engine(config).context("Failed to build engine")?;
    let service = ProcessingService::new(engine, config.pipeline_config());

    match cli.command {
        Command::Batch { input, json } => {
            let documents = load_documents(&read_input(&input)?)?;
            let result = service.synthesize(&documents).await;
            if json {
                let report = SynthesisReport::from(&result);
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("{}", render_report(&result));
            }
        }
        Command::Text { input } => {
            let text = read_input(&input)?;
            let summary = service.summarize_text(&text).await;
            if summary.summarized == 0 {
                bail!(
                    "no summary produced ({} chunk(s) attempted)",
                    summary.chunk_count
                );
            }
            println!("{}", summary.text);
        }
    }
    Ok(())
}

fn read_input(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("reading stdin")?;
        return Ok(buffer);
    }
    fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}

fn load_documents(raw: &str) -> Result<Vec<Document>> {
    let inputs: Vec<DocumentInput> =
        serde_json::from_str(raw).context("parsing document batch")?;
    Ok(prepare_documents(
        inputs.into_iter().map(|input| (input.id, input.text)),
    )?)
}
