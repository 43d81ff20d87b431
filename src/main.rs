mod cli;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use quire::config::QuireConfig;

#[derive(Parser)]
#[command(name = "quire", version, about = "Private journal with a local AI reflection companion")]
struct Cli {
    /// Config file to use instead of ~/.quire/config.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Write a new entry, or replace the text of an existing one
    Write {
        /// Entry text; read from stdin when omitted
        text: Vec<String>,
        /// Update the entry with this id instead of creating one
        #[arg(long)]
        id: Option<String>,
    },
    /// List entries grouped by day
    List {
        /// Only show entries whose text or date contains this
        #[arg(long, short)]
        search: Option<String>,
    },
    /// Print one entry
    Show { id: String },
    /// Delete an entry
    Delete { id: String },
    /// Set or clear an entry's title
    Title {
        id: String,
        title: Option<String>,
        #[arg(long, conflicts_with = "title")]
        clear: bool,
    },
    /// Export the journal as JSON to stdout
    Export,
    /// Merge entries from an export file
    Import { file: PathBuf },
    /// Ask the assistant about your journal
    Ask {
        question: Vec<String>,
        /// Treat this entry as the one currently being viewed
        #[arg(long)]
        entry: Option<String>,
    },
    /// Print the context (or full prompt) that would be sent for a question
    Context {
        question: Vec<String>,
        #[arg(long)]
        entry: Option<String>,
        /// Print the complete prompt instead of just the journal context
        #[arg(long)]
        prompt: bool,
    },
    /// Probe Ollama once and print the status
    Status,
    /// Keep probing Ollama and print every status change
    Watch,
    /// List the built-in models
    Models,
    /// Manage the selected model
    Model {
        #[command(subcommand)]
        action: ModelAction,
    },
    /// Run database and endpoint diagnostics
    Doctor,
}

#[derive(Subcommand)]
enum ModelAction {
    /// Select a model, downloading it through Ollama if needed
    Use {
        id: String,
        /// Keep polling until the model is ready
        #[arg(long)]
        wait: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => QuireConfig::load_from(path)?,
        None => QuireConfig::load()?,
    };

    // Log to stderr so stdout stays clean for exports and answers.
    let filter = EnvFilter::try_new(&config.logging.level)
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Write { text, id } => cli::entries::write(&config, id.as_deref(), &text)?,
        Command::List { search } => cli::entries::list(&config, search.as_deref())?,
        Command::Show { id } => cli::entries::show(&config, &id)?,
        Command::Delete { id } => cli::entries::delete(&config, &id)?,
        Command::Title { id, title, clear } => {
            cli::entries::title(&config, &id, title.as_deref(), clear)?
        }
        Command::Export => cli::export::export(&config)?,
        Command::Import { file } => cli::import::import(&config, &file)?,
        Command::Ask { question, entry } => {
            cli::ask::ask(&config, &question.join(" "), entry.as_deref()).await?
        }
        Command::Context {
            question,
            entry,
            prompt,
        } => cli::ask::context(&config, &question.join(" "), entry.as_deref(), prompt)?,
        Command::Status => cli::status::status(&config).await?,
        Command::Watch => cli::status::watch(&config).await?,
        Command::Models => cli::models::list(&config)?,
        Command::Model { action } => match action {
            ModelAction::Use { id, wait } => cli::models::use_model(&config, &id, wait).await?,
        },
        Command::Doctor => cli::doctor::doctor(&config).await?,
    }

    Ok(())
}
