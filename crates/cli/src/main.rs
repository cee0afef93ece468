use anyhow::{Context, Result};
use clap::Parser;
use prd_chunker::{ChunkerConfig, DocumentProcessor, StrategyMode};
use settings::Overrides;
use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
#[cfg(any(feature = "tiktoken", feature = "hf-tokenizers"))]
use std::sync::Arc;

mod settings;

#[derive(Parser)]
#[command(name = "prd-chunk")]
#[command(about = "Split requirement documents into linked, annotated chunks", long_about = None)]
#[command(version)]
struct Cli {
    /// Markdown/text file to chunk, or `-` for stdin
    input: String,

    /// TOML file with chunker settings
    #[arg(long)]
    config: Option<PathBuf>,

    /// auto, none, fixed, hierarchical, semantic or hierarchical+semantic
    #[arg(long)]
    strategy: Option<StrategyMode>,

    /// Maximum tokens per chunk
    #[arg(long)]
    max_tokens: Option<usize>,

    /// Overlap tokens at fixed-size boundaries
    #[arg(long)]
    overlap: Option<usize>,

    /// Tokenizer encoding (cl100k_base, p50k_base, ...)
    #[arg(long)]
    encoding: Option<String>,

    /// Token count below which the document is kept whole
    #[arg(long)]
    threshold: Option<usize>,

    /// Identifier written to the result (defaults to the input path)
    #[arg(long)]
    source_id: Option<String>,

    /// Skip the exact tokenizer and use the character estimate
    #[arg(long)]
    approximate: bool,

    /// HuggingFace tokenizer.json used for exact counts
    #[cfg(feature = "hf-tokenizers")]
    #[arg(long)]
    tokenizer_file: Option<PathBuf>,

    /// Pretty-print the JSON result
    #[arg(long)]
    pretty: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Only log warnings and errors
    #[arg(short, long)]
    quiet: bool,
}

fn print_stdout(text: &str) -> Result<()> {
    let mut stdout = io::stdout().lock();
    if let Err(err) = stdout
        .write_all(text.as_bytes())
        .and_then(|_| stdout.write_all(b"\n"))
        .and_then(|_| stdout.flush())
    {
        if err.kind() == io::ErrorKind::BrokenPipe {
            return Ok(());
        }
        return Err(err.into());
    }
    Ok(())
}

fn read_input(input: &str) -> Result<String> {
    if input == "-" {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read stdin")?;
        return Ok(buf);
    }
    fs::read_to_string(input).with_context(|| format!("failed to read {input}"))
}

#[cfg_attr(
    not(any(feature = "tiktoken", feature = "hf-tokenizers")),
    allow(unused_variables)
)]
fn build_processor(config: ChunkerConfig, cli: &Cli) -> Result<DocumentProcessor> {
    #[cfg(feature = "hf-tokenizers")]
    if let Some(path) = &cli.tokenizer_file {
        let counter = prd_chunker::HfTokenizerCounter::from_file(path, config.encoding.clone())?;
        return Ok(DocumentProcessor::with_token_counter(config, Arc::new(counter))?);
    }

    #[cfg(feature = "tiktoken")]
    if !cli.approximate {
        match prd_chunker::TiktokenCounter::new(&config.encoding) {
            Ok(counter) => {
                return Ok(DocumentProcessor::with_token_counter(config, Arc::new(counter))?)
            }
            Err(err) => log::warn!("{err}; falling back to approximate token counts"),
        }
    }

    Ok(DocumentProcessor::new(config)?)
}

fn run(cli: &Cli) -> Result<()> {
    let overrides = Overrides {
        strategy: cli.strategy,
        max_tokens: cli.max_tokens,
        overlap: cli.overlap,
        encoding: cli.encoding.clone(),
        chunk_threshold: cli.threshold,
    };
    let config = settings::resolve(cli.config.as_deref(), overrides)?;
    let processor = build_processor(config, cli)?;

    let text = read_input(&cli.input)?;
    let source_id = cli.source_id.clone().unwrap_or_else(|| match cli.input.as_str() {
        "-" => "stdin".to_string(),
        path => path.to_string(),
    });

    let result = processor.process(&source_id, &text);
    log::info!(
        "{source_id}: {} | {}",
        result.strategy,
        DocumentProcessor::get_stats(&result)
    );

    let json = if cli.pretty {
        serde_json::to_string_pretty(&result)?
    } else {
        serde_json::to_string(&result)?
    };
    print_stdout(&json)
}

fn main() {
    let cli = Cli::parse();

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    if let Err(err) = run(&cli) {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}
