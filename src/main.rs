// ABOUTME: Entry point for the flowstash binary.
// ABOUTME: Parses CLI arguments, initializes tracing, opens the store, and runs one operation.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use flowstash_core::{ArtifactKind, HeaderBlock, LibraryEntry};
use flowstash_store::{LocalStore, StoreConfig};
use serde_json::Value;
use tokio::io::AsyncReadExt;

#[derive(Debug, Parser)]
#[command(name = "flowstash", version, about = "Inspect and edit a flowstash store")]
struct Cli {
    /// User directory (overrides FLOWSTASH_HOME)
    #[arg(long)]
    home: Option<PathBuf>,

    /// Flow file (overrides FLOWSTASH_FLOW_FILE)
    #[arg(long)]
    flow_file: Option<PathBuf>,

    /// Indent saved credentials and library flows
    #[arg(long)]
    pretty: bool,

    /// Ignore all saves
    #[arg(long)]
    read_only: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Flow definitions (YAML, backed up)
    Flows {
        #[command(subcommand)]
        action: DocumentAction,
    },
    /// Credential map (JSON, backed up)
    Credentials {
        #[command(subcommand)]
        action: DocumentAction,
    },
    /// Settings map
    Settings {
        #[command(subcommand)]
        action: DocumentAction,
    },
    /// Sessions map
    Sessions {
        #[command(subcommand)]
        action: DocumentAction,
    },
    /// Library entries
    Library {
        #[command(subcommand)]
        action: LibraryAction,
    },
}

#[derive(Debug, Subcommand)]
enum DocumentAction {
    /// Print the document as JSON
    Get,
    /// Replace the document with JSON read from FILE or stdin
    Put { file: Option<PathBuf> },
}

#[derive(Debug, Subcommand)]
enum LibraryAction {
    /// Print a file body or a directory listing
    Get {
        kind: String,
        #[arg(default_value = "")]
        path: String,
    },
    /// Write an entry whose body is read from FILE or stdin
    Put {
        kind: String,
        path: String,
        /// Header entry as key=value; repeatable
        #[arg(long = "meta", value_parser = parse_meta)]
        meta: Vec<(String, String)>,
        file: Option<PathBuf>,
    },
}

fn parse_meta(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got {raw:?}"))?;
    let valid = !key.is_empty() && key.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_');
    if !valid {
        return Err(format!("header keys may only contain [A-Za-z0-9_], got {key:?}"));
    }
    Ok((key.to_string(), value.to_string()))
}

async fn read_input(file: Option<PathBuf>) -> anyhow::Result<String> {
    match file {
        Some(path) => tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("failed to read {}", path.display())),
        None => {
            let mut text = String::new();
            tokio::io::stdin()
                .read_to_string(&mut text)
                .await
                .context("failed to read stdin")?;
            Ok(text)
        }
    }
}

async fn run_document(
    store: &LocalStore,
    kind: ArtifactKind,
    action: DocumentAction,
) -> anyhow::Result<()> {
    match action {
        DocumentAction::Get => {
            let doc = store.load(kind).await.into_document(kind);
            println!("{}", serde_json::to_string_pretty(&doc)?);
        }
        DocumentAction::Put { file } => {
            let text = read_input(file).await?;
            let doc: Value = serde_json::from_str(&text).context("input is not valid JSON")?;
            store
                .save(kind, &doc)
                .await
                .with_context(|| format!("failed to save {kind}"))?;
            tracing::info!("saved {}", kind);
        }
    }
    Ok(())
}

async fn run_library(store: &LocalStore, action: LibraryAction) -> anyhow::Result<()> {
    match action {
        LibraryAction::Get { kind, path } => match store.get_library_entry(&kind, &path).await? {
            LibraryEntry::Body(body) => print!("{body}"),
            listing @ LibraryEntry::Listing(_) => {
                println!("{}", serde_json::to_string_pretty(&listing)?)
            }
        },
        LibraryAction::Put {
            kind,
            path,
            meta,
            file,
        } => {
            let body = read_input(file).await?;
            let meta: HeaderBlock = meta.into_iter().collect();
            store
                .save_library_entry(&kind, &path, &meta, &body)
                .await
                .with_context(|| format!("failed to save library entry {kind}/{path}"))?;
            tracing::info!("saved library entry {}/{}", kind, path);
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new("flowstash=info,flowstash_store=info")
            }),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = StoreConfig::from_env()?;
    if let Some(home) = cli.home {
        config.user_dir = home;
    }
    if let Some(flow_file) = cli.flow_file {
        config.flow_file = Some(flow_file);
    }
    config.flow_file_pretty |= cli.pretty;
    config.read_only |= cli.read_only;

    let store = LocalStore::open(config)
        .await
        .context("failed to open store")?;

    match cli.command {
        Command::Flows { action } => run_document(&store, ArtifactKind::Flows, action).await,
        Command::Credentials { action } => {
            run_document(&store, ArtifactKind::Credentials, action).await
        }
        Command::Settings { action } => run_document(&store, ArtifactKind::Settings, action).await,
        Command::Sessions { action } => run_document(&store, ArtifactKind::Sessions, action).await,
        Command::Library { action } => run_library(&store, action).await,
    }
}
