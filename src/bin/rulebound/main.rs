//! rulebound CLI
//!
//! Command-line shell over the navigation core: print a rulebook
//! hierarchy, show one rule with breadcrumbs and resolved
//! cross-references, search a dataset, or lint it for structural
//! inconsistencies.
//!
//! ## Commands
//!
//! - `tree <path>`: print the (optionally rooted/depth-capped) hierarchy
//! - `show <path> <id>`: print one rule's detail view (`--json` for the
//!   serialized form consumed by other shells)
//! - `search <path> <query>`: ranked search hits
//! - `check <path>`: load diagnostics; exits non-zero on structural ones

use std::{path::PathBuf, process::ExitCode, sync::Arc};

use clap::{Parser, Subcommand};

use rulebound_core::{
    codec,
    config::AppConfig,
    crossref,
    rule::RuleId,
    search,
    tree::{RowFlag, RuleTree},
    viewer, RuleboundError,
};

#[derive(Parser)]
#[command(name = "rulebound")]
#[command(author, version, about = "A navigator for hierarchical rulebook datasets", long_about = None)]
struct Cli {
    /// Shell configuration file (home label, default root, depth cap)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the rule hierarchy of a dataset file or directory
    Tree {
        /// Path to the dataset (file or directory)
        path: PathBuf,

        /// Render only the subtree rooted at this id
        #[arg(long)]
        root: Option<String>,

        /// Hard cap on rendered nesting depth
        #[arg(long)]
        max_depth: Option<usize>,
    },

    /// Show one rule: breadcrumbs, content, cross-references, siblings
    Show {
        /// Path to the dataset (file or directory)
        path: PathBuf,

        /// Rule id to display
        id: String,

        /// Emit the serialized view instead of text
        #[arg(long)]
        json: bool,
    },

    /// Search the dataset
    Search {
        /// Path to the dataset (file or directory)
        path: PathBuf,

        /// Query text
        query: String,

        /// Maximum number of hits
        #[arg(long, default_value = "10")]
        limit: usize,
    },

    /// Load a dataset and report structural diagnostics
    Check {
        /// Path to the dataset (file or directory)
        path: PathBuf,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode, RuleboundError> {
    let config = AppConfig::load_or_default(cli.config.as_deref())?;

    match cli.command {
        Commands::Tree {
            path,
            root,
            max_depth,
        } => {
            let (index, _) = codec::load_path(&path)?;
            let index = Arc::new(index);
            let root = root.map(RuleId::from).or_else(|| config.root.clone());
            let max_depth = max_depth.or(config.max_depth);
            let mut tree = RuleTree::new(index.clone(), root, max_depth);
            tree.expand_all();
            for row in tree.rows() {
                let node = match index.get(&row.id) {
                    Some(node) => node,
                    None => continue,
                };
                let marker = node.rank().descriptor().marker;
                println!("{}{} {}", "  ".repeat(row.depth), marker, node.label());
                if row.is(RowFlag::Leaf) && !node.children.is_empty() {
                    tracing::debug!("'{}' truncated at depth cap", node.id);
                }
            }
            Ok(ExitCode::SUCCESS)
        }

        Commands::Show { path, id, json } => {
            let (index, _) = codec::load_path(&path)?;
            let id = RuleId::from(id);
            let view = viewer::view(&index, &id, &config.home_label)
                .ok_or_else(|| RuleboundError::NotFound(format!("rule '{id}'")))?;

            if json {
                println!("{}", serde_json::to_string_pretty(&view)?);
                return Ok(ExitCode::SUCCESS);
            }

            let trail: Vec<&str> = view
                .breadcrumbs
                .iter()
                .map(|crumb| crumb.label.as_str())
                .collect();
            println!("{}", trail.join(" > "));
            println!();
            println!("{}", view.node.label());
            let content = crossref::plain_text(&view.segments);
            if !content.is_empty() {
                println!();
                println!("{content}");
            }
            if !view.cross_refs.is_empty() {
                println!();
                println!("References:");
                for target in &view.cross_refs {
                    println!("  {} {} ({})", target.number, target.title, target.id);
                }
            }
            if !view.referenced_by.is_empty() {
                println!();
                println!("Referenced by:");
                for source in &view.referenced_by {
                    println!("  {} {} ({})", source.number, source.title, source.id);
                }
            }
            if view.previous.is_some() || view.next.is_some() {
                println!();
                if let Some(previous) = &view.previous {
                    println!("Previous: {} {}", previous.number, previous.title);
                }
                if let Some(next) = &view.next {
                    println!("Next: {} {}", next.number, next.title);
                }
            }
            Ok(ExitCode::SUCCESS)
        }

        Commands::Search { path, query, limit } => {
            let (index, _) = codec::load_path(&path)?;
            let hits = search::search(&index, &query, limit);
            if hits.is_empty() {
                println!("no matches for '{query}'");
                return Ok(ExitCode::SUCCESS);
            }
            for hit in hits {
                println!("{:>4}  {} {} ({})", hit.score, hit.number, hit.title, hit.id);
            }
            Ok(ExitCode::SUCCESS)
        }

        Commands::Check { path } => {
            let (index, diagnostics) = codec::load_path(&path)?;
            println!(
                "{} rules loaded (revision {})",
                index.len(),
                &index.revision()[..12.min(index.revision().len())]
            );
            if diagnostics.is_empty() {
                println!("no diagnostics");
                return Ok(ExitCode::SUCCESS);
            }
            for diagnostic in &diagnostics {
                println!("warning: {diagnostic}");
            }
            let structural = diagnostics.iter().filter(|d| d.is_structural()).count();
            println!(
                "{} diagnostics ({} structural)",
                diagnostics.len(),
                structural
            );
            if structural > 0 {
                Ok(ExitCode::FAILURE)
            } else {
                Ok(ExitCode::SUCCESS)
            }
        }
    }
}
