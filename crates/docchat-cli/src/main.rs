//! docchat CLI: upload a PDF and ask questions about it

use clap::{Parser, Subcommand};
use docchat_engine::{
    Config, DocChatClient, SessionController, UploadFile, CONFIG_DIR, SERVER_URL_ENV,
};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Chat with a PDF through a document question-answering service
#[derive(Parser)]
#[command(name = "docchat")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Config file (default: .docchat/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Base URL of the document service
    #[arg(long, global = true, env = SERVER_URL_ENV)]
    server: Option<String>,

    /// Log at debug level unless DOCCHAT_LOG says otherwise
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the TUI (default when no command specified)
    Tui,

    /// Upload a PDF for processing
    Upload {
        /// Path to the PDF
        file: PathBuf,
    },

    /// Ask a question about the processed document
    Ask {
        /// The question
        question: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the effective configuration
    Config {
        /// Write it to the config file instead
        #[arg(long)]
        init: bool,
    },
}

/// Environment variable holding the log filter.
const LOG_ENV: &str = "DOCCHAT_LOG";

type CmdResult = Result<(), Box<dyn std::error::Error>>;

fn main() {
    let cli = Cli::parse();

    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| Config::default_path(Path::new(".")));
    let config = match Config::load_or_default(&config_path) {
        Ok(config) => config.with_server_url(cli.server.clone()),
        Err(e) => {
            eprintln!("Error: failed to load {}: {e}", config_path.display());
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        None | Some(Commands::Tui) => {
            // The TUI owns the terminal, so logs go to a file.
            if let Err(e) = init_file_logging(cli.verbose) {
                eprintln!("Warning: logging disabled: {e}");
            }
            block_on(docchat_tui::run_tui(config))
        }
        Some(Commands::Upload { file }) => {
            init_stderr_logging(cli.verbose);
            block_on(cmd_upload(&config, &file))
        }
        Some(Commands::Ask { question, json }) => {
            init_stderr_logging(cli.verbose);
            block_on(cmd_ask(&config, &question, json))
        }
        Some(Commands::Config { init }) => {
            init_stderr_logging(cli.verbose);
            cmd_config(&config, &config_path, init)
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn block_on<F>(future: F) -> CmdResult
where
    F: std::future::Future<Output = CmdResult>,
{
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(future)
}

fn log_filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "info" }))
}

fn init_stderr_logging(verbose: bool) {
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(verbose))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn init_file_logging(verbose: bool) -> std::io::Result<()> {
    let dir = Path::new(CONFIG_DIR);
    std::fs::create_dir_all(dir)?;
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join("docchat.log"))?;

    tracing_subscriber::fmt()
        .with_env_filter(log_filter(verbose))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

async fn cmd_upload(config: &Config, path: &Path) -> CmdResult {
    let file = UploadFile::from_path(path)
        .map_err(|e| format!("cannot read {}: {e}", path.display()))?;

    let mut session = SessionController::new();
    let ticket = session.submit_upload(file)?;
    let client = DocChatClient::new(config)?;

    println!("Uploading {} to {}...", ticket.file.name, config.upload_url());
    let outcome = client.upload(&ticket.file).await;
    session.on_processing_complete(ticket.generation, outcome.clone());
    outcome.map_err(|e| e.user_message())?;

    if let Some(document) = session.document() {
        println!("Processed {} ({})", document.name, document.size_label());
    }
    Ok(())
}

async fn cmd_ask(config: &Config, question: &str, json: bool) -> CmdResult {
    let question = question.trim();
    if question.is_empty() {
        return Err("question is empty".into());
    }

    let client = DocChatClient::new(config)?;
    let answer = client.ask(question).await.map_err(|e| e.user_message())?;

    if json {
        let output = serde_json::json!({
            "question": question,
            "answer": answer.content,
            "sources": answer.sources,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("{}", answer.content);
    if let Some(sources) = answer.sources.filter(|s| !s.is_empty()) {
        println!("\nSources:");
        for (i, source) in sources.iter().enumerate() {
            println!("  [{}] {source}", i + 1);
        }
    }
    Ok(())
}

fn cmd_config(config: &Config, path: &Path, init: bool) -> CmdResult {
    if !init {
        println!("{}", serde_json::to_string_pretty(config)?);
        return Ok(());
    }

    if path.exists() {
        println!("Config already exists at {}", path.display());
        return Ok(());
    }
    config.save(path)?;
    println!("Created {}", path.display());
    Ok(())
}
