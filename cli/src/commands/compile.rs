use anyhow::{Context, Result};
use asyncgen_compiler::Selection;
use colored::Colorize;
use std::fs;
use std::path::{Path, PathBuf};

use super::{build_graph, load_options, Directions};

pub fn compile(
    config_path: &str,
    directions: Directions,
    document: &str,
    out: Option<&str>,
) -> Result<()> {
    let (config, options) = load_options(config_path, directions)?;
    let graph = build_graph(Path::new(document), options)?;
    let report = Selection::new(&graph).report();
    let json = serde_json::to_string_pretty(&report)?;

    let target = out
        .map(PathBuf::from)
        .or_else(|| config.as_ref().and_then(|c| c.output_path()));

    match target {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create output directory: {}", parent.display())
                })?;
            }
            fs::write(&path, json)
                .with_context(|| format!("Failed to write report: {}", path.display()))?;
            eprintln!(
                "{} Wrote {} unit(s) to {}",
                "✓".green().bold(),
                report.units.len(),
                path.display()
            );
        }
        None => println!("{}", json),
    }

    for diagnostic in &report.diagnostics {
        eprintln!("{} {}", "warning:".yellow().bold(), diagnostic);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compile_writes_report() {
        let dir = tempfile::tempdir().unwrap();
        let document = dir.path().join("api.json");
        fs::write(
            &document,
            r#"{
                "servers": { "prod": { "url": "broker:1883", "protocol": "mqtt" } },
                "channels": { "light/on": { "subscribe": { "message": { "payload": { "type": "string" } } } } }
            }"#,
        )
        .unwrap();
        let out = dir.path().join("out/graph.json");
        let missing_config = dir.path().join("asyncgen.toml");

        compile(
            missing_config.to_str().unwrap(),
            Directions::FromConfig,
            document.to_str().unwrap(),
            out.to_str(),
        )
        .unwrap();

        let report: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
        assert_eq!(report["documents"], serde_json::json!(["api.json"]));
        assert_eq!(report["counts"]["channel"], 1);
    }
}
