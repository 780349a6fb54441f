use std::io::Read;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;

use filetree::core::config::TreeConfig;
use filetree::core::telemetry::logging::init_logging;
use filetree::models::snapshot::EntryDto;
use filetree::services::search::{ByName, ByPath, SearchPriority};
use filetree::services::tree::build::{build_with, parse, to_json, DefaultFactory};
use filetree::{Entry, ItemKind};

#[derive(Parser, Debug)]
#[command(name = "filetree")]
#[command(about = "Inspect and edit serialized file trees", long_about = None)]
struct Cli {
    /// JSON file with tree settings (default names, search priority, sorting)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the tree, one entry per line
    Show {
        /// Serialized tree, or `-` for stdin
        input: String,
        /// Print a nested JSON snapshot instead
        #[arg(long)]
        json: bool,
    },
    /// Look entries up by exact path or by name
    Find {
        input: String,
        #[arg(long, conflicts_with = "name", required_unless_present = "name")]
        path: Option<String>,
        #[arg(long)]
        name: Option<String>,
        #[arg(long, value_enum)]
        priority: Option<PriorityArg>,
    },
    /// List the context-menu items offered for an entry
    Menu { input: String, path: String },
    /// Rename an entry and print the resulting tree
    Rename {
        input: String,
        path: String,
        new_name: String,
    },
    /// Create an entry under a folder and print the resulting tree
    Add {
        input: String,
        /// Parent folder; `/` for the top level
        parent: String,
        #[arg(long, value_enum, default_value_t = KindArg::File)]
        kind: KindArg,
        /// Name to settle on; the default name is kept when omitted
        #[arg(long)]
        name: Option<String>,
    },
    /// Rewrite the tree in canonical form
    Normalize {
        input: String,
        /// Sort every folder's children
        #[arg(long)]
        sort: bool,
        #[arg(long)]
        pretty: bool,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum KindArg {
    File,
    Folder,
    Symlink,
}

impl From<KindArg> for ItemKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::File => ItemKind::File,
            KindArg::Folder => ItemKind::Folder,
            KindArg::Symlink => ItemKind::Symlink,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum PriorityArg {
    Depth,
    PseudoBreadth,
}

impl From<PriorityArg> for SearchPriority {
    fn from(priority: PriorityArg) -> Self {
        match priority {
            PriorityArg::Depth => SearchPriority::Depth,
            PriorityArg::PseudoBreadth => SearchPriority::PseudoBreadth,
        }
    }
}

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => TreeConfig::from_path(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => TreeConfig::default(),
    };

    match cli.command {
        Command::Show { input, json } => {
            let root = load(&input, &config)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&EntryDto::from(&root))?);
            } else {
                print_tree(&root);
            }
        }
        Command::Find {
            input,
            path,
            name,
            priority,
        } => {
            let root = load(&input, &config)?;
            if let Some(path) = path {
                let mut query = ByPath::new(&path);
                if let Some(priority) = priority {
                    query = query.with_priority(priority.into());
                }
                match root.find(query) {
                    Some(entry) => println!("{}\t{}", entry.kind(), entry.path()),
                    None => bail!("no entry at {path}"),
                }
            } else if let Some(name) = name {
                for entry in root.find(ByName::new(name)) {
                    println!("{}\t{}", entry.kind(), entry.path());
                }
            }
        }
        Command::Menu { input, path } => {
            let root = load(&input, &config)?;
            let entry = locate(&root, &path)?;
            for item in entry.context_menu_items() {
                println!("{}", item.label);
            }
        }
        Command::Rename {
            input,
            path,
            new_name,
        } => {
            let root = load(&input, &config)?;
            let entry = locate(&root, &path)?;
            entry
                .rename(&new_name)
                .with_context(|| format!("failed to rename {path}"))?;
            info!(from = %path, to = %entry.path(), "renamed");
            println!("{}", to_json(&root, false)?);
        }
        Command::Add {
            input,
            parent,
            kind,
            name,
        } => {
            let root = load(&input, &config)?;
            let parent_entry = locate(&root, &parent)?;
            let child = parent_entry
                .add(ItemKind::from(kind), None)
                .with_context(|| format!("failed to add under {parent}"))?;
            // Let the deferred rename request run, then settle it.
            root.run_pending();
            child
                .rename(name.as_deref().unwrap_or_default())
                .with_context(|| format!("failed to name new entry under {parent}"))?;
            info!(path = %child.path(), "added");
            println!("{}", to_json(&root, false)?);
        }
        Command::Normalize {
            input,
            sort,
            pretty,
        } => {
            let root = load(&input, &config)?;
            if sort {
                sort_all(&root)?;
            }
            println!("{}", to_json(&root, pretty)?);
        }
    }
    Ok(())
}

fn read_input(input: &str) -> Result<String> {
    if input == "-" {
        let mut raw = String::new();
        std::io::stdin()
            .read_to_string(&mut raw)
            .context("failed to read tree from stdin")?;
        Ok(raw)
    } else {
        std::fs::read_to_string(input).with_context(|| format!("failed to read {input}"))
    }
}

fn load(input: &str, config: &TreeConfig) -> Result<Entry> {
    let raw = read_input(input)?;
    let entries = parse(&raw).with_context(|| format!("failed to parse {input}"))?;
    let root = build_with(&DefaultFactory, config.hooks(), &entries)
        .with_context(|| format!("failed to build tree from {input}"))?;
    Ok(root)
}

/// `/` or an empty path selects the root.
fn locate(root: &Entry, path: &str) -> Result<Entry> {
    if path.is_empty() || path == "/" {
        return Ok(root.clone());
    }
    root.find(ByPath::new(path))
        .with_context(|| format!("no entry at {path}"))
}

fn print_tree(root: &Entry) {
    root.walk(|entry| {
        let indent = "  ".repeat(entry.depth().saturating_sub(1));
        let name = entry.name().unwrap_or_default();
        if entry.is_folder() {
            println!("{indent}{name}/");
        } else {
            println!("{indent}{name}");
        }
    });
}

fn sort_all(root: &Entry) -> Result<()> {
    root.sort()?;
    let mut folders = Vec::new();
    root.walk(|entry| {
        if entry.is_folder() {
            folders.push(entry.clone());
        }
    });
    for folder in folders {
        folder.sort()?;
    }
    Ok(())
}
