///
/// This module implements the CLI interface for content-tree: command parsing,
/// repository setup and user-visible output.
///
/// All indexing logic (routes, classification, the tree walk and its event
/// stream) lives in the [`content-tree-core`] crate. This module is strictly
/// CLI glue.
///
/// ## Commands
/// - `index`: walk a repository and print every item as it is produced.
/// - `show`: print the content of the item or file at a route.
///
/// [`content-tree-core`]: ../../content-tree-core/
use crate::load_config::{load_config, resolve_root, CliConfig};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use content_tree_core::item::{Item, ItemKind};
use content_tree_core::{ItemIndex, Repository, Route};
use futures::StreamExt;
use serde::Serialize;
use std::io::Write;
use std::path::PathBuf;

/// CLI for content-tree: index a directory tree of documents.
#[derive(Parser)]
#[clap(
    name = "content-tree",
    version,
    about = "Index a directory tree of markdown documents into a catalog of content items"
)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Walk the repository and print every item
    Index {
        /// Path to the YAML config file
        #[clap(long)]
        config: Option<PathBuf>,
        /// Repository root directory
        #[clap(long)]
        root: Option<PathBuf>,
        /// Print one JSON object per item
        #[clap(long)]
        json: bool,
    },
    /// Print the content of the item or file at ROUTE
    Show {
        /// Path to the YAML config file
        #[clap(long)]
        config: Option<PathBuf>,
        /// Repository root directory
        #[clap(long)]
        root: Option<PathBuf>,
        /// Route such as `/docs/intro` or `docs/intro/files/diagram.png`
        route: String,
    },
}

/// One line of `index --json` output.
#[derive(Debug, Serialize)]
pub struct ItemSummary {
    pub route: String,
    pub kind: ItemKind,
    pub files: Vec<String>,
}

impl From<&Item> for ItemSummary {
    fn from(item: &Item) -> Self {
        Self {
            route: item.route().pretty_value(),
            kind: item.kind(),
            files: item.files().iter().map(|f| f.route().pretty_value()).collect(),
        }
    }
}

/// Extracted async CLI logic entrypoint for integration tests and main()
pub async fn run(cli: Cli) -> Result<()> {
    // Emit a top-level 'trace_initialised' event at the very start
    tracing::info!("trace_initialised");

    match cli.command {
        Commands::Index { config, root, json } => {
            let repository = open_repository(config, root)?;
            tracing::info!(command = "index", repository = %repository.path().display(), "Starting index");
            index(&repository, json).await
        }
        Commands::Show {
            config,
            root,
            route,
        } => {
            let repository = open_repository(config, root)?;
            tracing::info!(command = "show", route = %route, "Looking up route");
            show(&repository, &Route::from_request(&route)).await
        }
    }
}

fn open_repository(config: Option<PathBuf>, root: Option<PathBuf>) -> Result<Repository> {
    let config = match config {
        Some(path) => load_config(path)?,
        None => CliConfig::default(),
    };
    config.indexer.trace_loaded();

    let rules = config
        .indexer
        .compile()
        .context("Invalid indexer configuration")?;
    let root = resolve_root(root, &config)?;
    Repository::new(&root, rules)
        .with_context(|| format!("Cannot open repository at {}", root.display()))
}

async fn index(repository: &Repository, json: bool) -> Result<()> {
    let mut stream = repository.items();
    let mut items = 0usize;
    let mut errors = 0usize;

    while let Some(event) = stream.next().await {
        match event.into_result() {
            Ok(item) => {
                items += 1;
                if json {
                    let line = serde_json::to_string(&ItemSummary::from(&item))
                        .context("Failed to serialise item summary")?;
                    println!("{line}");
                } else {
                    println!(
                        "{:<10} {} ({} files)",
                        item.kind(),
                        item.route().pretty_value(),
                        item.files().len()
                    );
                }
            }
            Err(e) => {
                errors += 1;
                tracing::error!(command = "index", error = %e, "Item failed to index");
            }
        }
    }

    tracing::info!(command = "index", items, errors, "Index complete");
    if !json {
        println!(
            "Indexed {items} items ({errors} errors) from {} [id {}]",
            repository.path().display(),
            repository.id()
        );
    }
    Ok(())
}

async fn show(repository: &Repository, route: &Route) -> Result<()> {
    let (index, _errors) = ItemIndex::from_stream(repository.items()).await;

    let data = index
        .read(route)
        .await
        .ok_or_else(|| anyhow::anyhow!("No item or file matches route {}", route.pretty_value()))?
        .with_context(|| format!("Failed to read content of {}", route.pretty_value()))?;

    let mut stdout = std::io::stdout();
    stdout.write_all(&data).context("Failed to write content")?;
    stdout.flush().context("Failed to flush stdout")?;
    Ok(())
}
