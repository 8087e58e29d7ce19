use anyhow::Result;
use asyncgen_compiler::{ArtifactKind, BuildError, Selection};
use colored::Colorize;
use std::path::Path;

use super::{build_graph, load_options, Directions};

pub fn check(config_path: &str, directions: Directions, document: &str) -> Result<()> {
    let (_, options) = load_options(config_path, directions)?;

    println!("{} Checking {}...\n", "→".blue().bold(), document);

    let graph = match build_graph(Path::new(document), options) {
        Ok(graph) => graph,
        Err(err) => {
            if let Some(BuildError::Link(errors)) = err.downcast_ref::<BuildError>() {
                println!("{} {} unresolved reference(s):", "✗".red().bold(), errors.len());
                for error in errors.iter() {
                    println!("  {} {}", "•".dimmed(), error);
                }
                println!();
                anyhow::bail!("Link failed");
            }
            return Err(err);
        }
    };

    let report = Selection::new(&graph).report();

    println!(
        "{} Linked {} document(s), {} artifact(s)",
        "✓".green().bold(),
        report.documents.len(),
        report.artifact_count
    );
    for (kind, count) in &report.counts {
        if *count > 0 {
            println!("  {} {:<10} {}", "•".dimmed(), kind.to_string(), count);
        }
    }

    let channels = report
        .units
        .iter()
        .filter(|unit| unit.kind == ArtifactKind::Channel);
    for unit in channels {
        let protocols = if unit.protocols.is_empty() {
            "no servers".dimmed().to_string()
        } else {
            unit.protocols.join(", ")
        };
        println!("  {} {} [{}]", "→".blue(), unit.name.bold(), protocols);
    }

    if !report.diagnostics.is_empty() {
        println!();
        println!("{} {} warning(s):", "!".yellow().bold(), report.diagnostics.len());
        for diagnostic in &report.diagnostics {
            println!("  {} {}", "•".dimmed(), diagnostic);
        }
    }
    Ok(())
}
