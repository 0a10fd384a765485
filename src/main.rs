use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use kbqa::config::Config;
use kbqa::engine::QaEngine;
use kbqa::kb::renumber;
use kbqa::kb::sample::sample_document;
use kbqa::mcp::server::{McpContext, McpServer};
use kbqa::repl::{self, MenuOptions};

#[derive(Parser)]
#[command(
    name = "kbqa",
    version,
    about = "Local knowledge-base question answering (TF-IDF retrieval)"
)]
struct Cli {
    /// Config file (JSON)
    #[arg(short, long, default_value = "config.json")]
    config: String,

    /// Knowledge base file, overrides the config
    #[arg(short, long)]
    knowledge: Option<PathBuf>,

    /// Fall back to the built-in sample corpus when the knowledge file is missing
    #[arg(long)]
    sample: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Answer a question
    Ask {
        query: String,
        #[arg(long)]
        top_n: Option<usize>,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Search for matching evidence
    Search {
        query: String,
        #[arg(long)]
        top_n: Option<usize>,
        #[arg(long)]
        json: bool,
    },
    /// Show knowledge base statistics
    Stats {
        #[arg(long)]
        json: bool,
    },
    /// Interactive menu
    Repl,
    /// Serve the engine as MCP tools over stdio
    Serve,
    /// Rename a question ID and its evidence IDs in a knowledge file
    Renumber {
        input: PathBuf,
        output: PathBuf,
        old_id: String,
        /// New ID (generated from --prefix if omitted)
        new_id: Option<String>,
        /// Prefix for generated IDs (defaults to the config value)
        #[arg(long)]
        prefix: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr: stdout carries JSON output and the MCP transport.
    let filter = if cli.verbose { "kbqa=debug" } else { "kbqa=info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    let mut config = Config::load(&cli.config)?;
    if let Some(path) = &cli.knowledge {
        config.knowledge_file = path.display().to_string();
    }
    config.validate().context("invalid configuration")?;

    match cli.command {
        Commands::Ask { query, top_n, json } => {
            let engine = open_engine(&config, cli.sample)?;
            let answer = engine.generate_answer(&query, top_n.unwrap_or(config.answer_top_n));
            let mut stdout = io::stdout().lock();
            if json {
                writeln!(stdout, "{}", serde_json::to_string_pretty(&answer)?)?;
            } else {
                repl::write_answer(&mut stdout, &answer, config.snippet_chars)?;
            }
        }
        Commands::Search { query, top_n, json } => {
            let engine = open_engine(&config, cli.sample)?;
            let results = engine.search(&query, top_n.unwrap_or(config.search_top_n));
            let mut stdout = io::stdout().lock();
            if json {
                writeln!(stdout, "{}", serde_json::to_string_pretty(&results)?)?;
            } else {
                repl::write_results(&mut stdout, &results, config.snippet_chars)?;
            }
        }
        Commands::Stats { json } => {
            let engine = open_engine(&config, cli.sample)?;
            let stats = engine.stats();
            let mut stdout = io::stdout().lock();
            if json {
                writeln!(stdout, "{}", serde_json::to_string_pretty(&stats)?)?;
            } else {
                repl::write_stats(&mut stdout, &stats)?;
            }
        }
        Commands::Repl => {
            let engine = open_engine(&config, cli.sample)?;
            let options = MenuOptions {
                answer_top_n: config.answer_top_n,
                search_top_n: config.search_top_n,
                snippet_chars: config.snippet_chars,
            };
            let mut stdin = io::stdin().lock();
            let mut stdout = io::stdout().lock();
            repl::run_menu(&engine, options, &mut stdin, &mut stdout)?;
        }
        Commands::Serve => {
            let engine = open_engine(&config, cli.sample)?;
            let ctx = McpContext::new(engine, config);
            McpServer::new(ctx).start().await?;
        }
        Commands::Renumber {
            input,
            output,
            old_id,
            new_id,
            prefix,
        } => {
            let prefix = prefix.unwrap_or_else(|| config.renumber_prefix.clone());
            let new_id =
                renumber::renumber_file(&input, &output, &old_id, new_id.as_deref(), &prefix)?;
            println!("Renamed question '{old_id}' to '{new_id}'");
        }
    }

    Ok(())
}

/// Build the tokenizer and load the configured knowledge base.
fn open_engine(config: &Config, allow_sample: bool) -> Result<QaEngine> {
    let tokenizer = config.build_tokenizer()?;
    let mut engine = QaEngine::new(tokenizer);

    let path = config.knowledge_path();
    if path.exists() {
        engine
            .load(path.as_path())
            .with_context(|| format!("failed to load {}", path.display()))?;
    } else if allow_sample {
        warn!("{} not found, using the sample knowledge base", path.display());
        engine.load(sample_document())?;
    } else {
        bail!(
            "knowledge file not found: {} (pass --sample to use the demo corpus)",
            path.display()
        );
    }

    info!("Engine ready: {:?}", engine.stats());
    Ok(engine)
}
