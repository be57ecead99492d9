//! Lingograph CLI
//!
//! Loads a dataset, runs the graph pipeline, and reports on the result:
//! - `load`: entity counts and diagnostic totals
//! - `show`: one entity as JSON
//! - `diagnostics`: every advisory diagnostic, grouped by kind
//! - `top`: entities with the largest resolved populations
//! - `tree`: ancestors and descendant counts in one hierarchy

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use lingograph_graph::{build, CompleteGraph, DiagnosticKind, Hierarchy, PipelineConfig, Severity};
use lingograph_ingest::load_dataset;
use lingograph_model::{EntityKind, LanguageSource, PopulationSource};
use std::path::{Path, PathBuf};

mod report;

#[derive(Parser)]
#[command(name = "lingograph")]
#[command(author, version, about = "Lingograph: languages, territories and who speaks what where")]
struct Cli {
    /// Pipeline configuration (JSON); defaults apply to anything it omits
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// More logging (-v debug, -vv trace); RUST_LOG takes precedence
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the graph and print a summary
    Load {
        /// Dataset JSON
        dataset: PathBuf,
    },

    /// Print one entity as JSON
    Show {
        dataset: PathBuf,
        /// language, locale, territory, writing_system, census, variant_tag
        kind: EntityKind,
        id: String,
    },

    /// List diagnostics grouped by kind
    Diagnostics {
        dataset: PathBuf,
        /// Only warnings, hiding informational entries
        #[arg(long)]
        warnings_only: bool,
    },

    /// Entities with the largest resolved populations
    Top {
        dataset: PathBuf,
        kind: EntityKind,
        #[arg(short = 'n', long, default_value_t = 10)]
        limit: usize,
    },

    /// Ancestors and descendant counts of one node
    Tree {
        dataset: PathBuf,
        /// language, territory, writing_system
        kind: EntityKind,
        id: String,
        /// Authority whose language tree to walk
        #[arg(long, default_value = "Combined")]
        source: LanguageSource,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_tracing(cli.verbose);
    let config = match &cli.config {
        Some(path) => PipelineConfig::load(path)?,
        None => PipelineConfig::default(),
    };

    match cli.command {
        Commands::Load { dataset } => cmd_load(&dataset, config),
        Commands::Show { dataset, kind, id } => cmd_show(&dataset, config, kind, &id),
        Commands::Diagnostics {
            dataset,
            warnings_only,
        } => cmd_diagnostics(&dataset, config, warnings_only),
        Commands::Top {
            dataset,
            kind,
            limit,
        } => cmd_top(&dataset, config, kind, limit),
        Commands::Tree {
            dataset,
            kind,
            id,
            source,
        } => cmd_tree(&dataset, config, kind, &id, source),
    }
}

fn setup_tracing(verbose: u8) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(match verbose {
            0 => "warn",
            1 => "debug",
            _ => "trace",
        })
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn build_graph(dataset: &Path, config: PipelineConfig) -> Result<CompleteGraph> {
    tracing::debug!(path = %dataset.display(), "loading dataset");
    let raw = load_dataset(dataset)?;
    Ok(build(&raw, config))
}

fn cmd_load(dataset: &Path, config: PipelineConfig) -> Result<()> {
    let complete = build_graph(dataset, config)?;
    let graph = complete.graph();
    println!("{} {}", "Loaded".green().bold(), dataset.display());
    for kind in report::KINDS {
        println!("  {:<16} {}", kind.to_string(), graph.count(kind));
    }

    let synthesized = graph.locales().filter(|l| l.origin.is_synthesized()).count();
    println!("  {} {} synthesized locales", "→".yellow(), synthesized);

    let diagnostics = complete.diagnostics();
    if diagnostics.is_empty() {
        println!("{} no diagnostics", "ok".green().bold());
    } else {
        let warnings = diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
            .count();
        println!(
            "{} {} diagnostics ({} warnings); run `lingograph diagnostics` for details",
            "info:".yellow().bold(),
            diagnostics.len(),
            warnings
        );
    }
    Ok(())
}

fn cmd_show(dataset: &Path, config: PipelineConfig, kind: EntityKind, id: &str) -> Result<()> {
    let complete = build_graph(dataset, config)?;
    let value = complete
        .graph()
        .entity_json(kind, id)
        .ok_or_else(|| anyhow!("no {} with id `{}`", kind, id))?;
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}

fn cmd_diagnostics(dataset: &Path, config: PipelineConfig, warnings_only: bool) -> Result<()> {
    let complete = build_graph(dataset, config)?;
    let diagnostics = complete.diagnostics();
    let counts = diagnostics.counts_by_kind();
    if counts.is_empty() {
        println!("{} no diagnostics", "ok".green().bold());
        return Ok(());
    }

    for (kind, count) in counts {
        let entries: Vec<_> = diagnostics
            .of_kind(kind)
            .filter(|d| !warnings_only || d.severity == Severity::Warning)
            .collect();
        if entries.is_empty() {
            continue;
        }
        let heading = format!("{:?} ({})", kind, count);
        if report::is_structural(kind) {
            println!("{}", heading.red().bold());
        } else {
            println!("{}", heading.yellow().bold());
        }
        for entry in entries {
            println!("  {}", entry);
        }
    }
    Ok(())
}

fn cmd_top(dataset: &Path, config: PipelineConfig, kind: EntityKind, limit: usize) -> Result<()> {
    let complete = build_graph(dataset, config)?;
    let rows = report::ranked(complete.graph(), kind)?;
    for (rank, row) in rows.iter().take(limit).enumerate() {
        let provenance = row
            .source
            .map(PopulationSource::label)
            .unwrap_or("territory rollup");
        println!(
            "{:>3}. {:<12} {:<32} {:>14}  {}",
            rank + 1,
            row.id.bold(),
            row.name,
            report::thousands(row.population),
            provenance.dimmed()
        );
    }
    Ok(())
}

fn cmd_tree(
    dataset: &Path,
    config: PipelineConfig,
    kind: EntityKind,
    id: &str,
    source: LanguageSource,
) -> Result<()> {
    let max_depth = config.max_depth;
    let complete = build_graph(dataset, config)?;
    let graph = complete.graph();
    let hierarchy = match kind {
        EntityKind::Language => Hierarchy::Language(source),
        EntityKind::Territory => Hierarchy::Territory,
        EntityKind::WritingSystem => Hierarchy::WritingSystem,
        other => return Err(anyhow!("{} has no hierarchy", other)),
    };
    if graph.entity_json(kind, id).is_none() {
        return Err(anyhow!("no {} with id `{}`", kind, id));
    }

    let mut ancestors = graph.ancestors(hierarchy, id, max_depth);
    ancestors.reverse();
    ancestors.push(id.to_string());
    println!("{}", ancestors.join(" › ").bold());

    let counts = graph.descendant_counts(hierarchy, id, max_depth);
    println!("  descendants  {}", counts.descendants);
    println!("  depth below  {}", counts.depth);
    println!("  locales      {}", counts.locales);
    println!("  censuses     {}", counts.censuses);
    for child in graph.children_in(hierarchy, id) {
        println!("  {} {}", "└".dimmed(), child);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parses_subcommands() {
        let cli = Cli::try_parse_from([
            "lingograph",
            "-vv",
            "top",
            "world.json",
            "language",
            "-n",
            "5",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Top { kind, limit, .. } => {
                assert_eq!(kind, EntityKind::Language);
                assert_eq!(limit, 5);
            }
            _ => panic!("expected top"),
        }
    }

    #[test]
    fn tree_source_parses_case_insensitively() {
        let cli = Cli::try_parse_from([
            "lingograph",
            "tree",
            "world.json",
            "language",
            "elv",
            "--source",
            "glottolog",
        ])
        .unwrap();
        match cli.command {
            Commands::Tree { source, .. } => assert_eq!(source, LanguageSource::Glottolog),
            _ => panic!("expected tree"),
        }
    }

    #[test]
    fn structural_kinds_are_highlighted() {
        assert!(report::is_structural(DiagnosticKind::CycleDetected));
        assert!(!report::is_structural(DiagnosticKind::UnresolvedReference));
    }
}
