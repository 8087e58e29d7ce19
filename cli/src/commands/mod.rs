pub mod check;
pub mod compile;
pub mod init;
pub mod search;

use anyhow::{Context, Result};
use asyncgen_compiler::{CompileOptions, LinkedGraph, Project};
use asyncgen_spec::parse::parse_document_file;
use std::path::Path;
use tracing::info;

use crate::config::AsyncgenConfig;
use crate::resolver::FsResolver;

/// Direction override from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Directions {
    FromConfig,
    PublishOnly,
    SubscribeOnly,
}

impl Directions {
    pub fn from_flags(publish_only: bool, subscribe_only: bool) -> Self {
        match (publish_only, subscribe_only) {
            (true, _) => Directions::PublishOnly,
            (_, true) => Directions::SubscribeOnly,
            _ => Directions::FromConfig,
        }
    }

    fn apply(self, options: CompileOptions) -> CompileOptions {
        match self {
            Directions::FromConfig => options,
            Directions::PublishOnly => options.with_directions(true, false),
            Directions::SubscribeOnly => options.with_directions(false, true),
        }
    }
}

/// Compile options from the optional config file plus command-line
/// overrides.
pub fn load_options(
    config_path: &str,
    directions: Directions,
) -> Result<(Option<AsyncgenConfig>, CompileOptions)> {
    let config = AsyncgenConfig::load_optional(config_path)?;
    let options = config
        .as_ref()
        .map(AsyncgenConfig::compile_options)
        .unwrap_or_default();
    Ok((config, directions.apply(options)))
}

/// Parse, compile and link the document at `path`. External documents are
/// resolved relative to its directory.
pub fn build_graph(path: &Path, options: CompileOptions) -> Result<LinkedGraph> {
    let root = parse_document_file(path)
        .with_context(|| format!("Failed to load document: {}", path.display()))?;
    let root_id = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    let resolver = FsResolver::for_root(path);
    let project = Project::new(options, &resolver)?;
    let graph = project.build(&root_id, &root)?;
    info!(
        document = %root_id,
        artifacts = graph.len(),
        "document linked"
    );
    Ok(graph)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_flags() {
        assert_eq!(Directions::from_flags(false, false), Directions::FromConfig);
        assert_eq!(Directions::from_flags(true, false), Directions::PublishOnly);
        assert_eq!(Directions::from_flags(false, true), Directions::SubscribeOnly);

        let options = Directions::SubscribeOnly.apply(CompileOptions::default());
        assert!(!options.publish);
        assert!(options.subscribe);
    }

    #[test]
    fn test_build_graph_follows_relative_documents() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("main.json"),
            r##"{
                "channels": {
                    "orders": { "$ref": "shared.json#/components/channels/orders" }
                }
            }"##,
        )
        .unwrap();
        std::fs::write(
            dir.path().join("shared.json"),
            r#"{ "components": { "channels": { "orders": { "description": "Order events" } } } }"#,
        )
        .unwrap();

        let graph = build_graph(&dir.path().join("main.json"), CompileOptions::default()).unwrap();
        let documents: Vec<&str> = graph.documents().collect();
        assert_eq!(documents, vec!["main.json", "shared.json"]);
    }

    #[test]
    fn test_build_graph_follows_nested_directories() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("shared")).unwrap();
        std::fs::write(
            dir.path().join("main.json"),
            r##"{
                "channels": {
                    "orders": { "$ref": "shared/a.json#/components/channels/orders" },
                    "refunds": { "$ref": "./shared/a.json#/components/channels/orders" }
                }
            }"##,
        )
        .unwrap();
        std::fs::write(
            dir.path().join("shared/a.json"),
            r##"{ "components": { "channels": { "orders": { "$ref": "b.json#/components/channels/orders" } } } }"##,
        )
        .unwrap();
        std::fs::write(
            dir.path().join("shared/b.json"),
            r#"{ "components": { "channels": { "orders": { "description": "Order events" } } } }"#,
        )
        .unwrap();

        let graph = build_graph(&dir.path().join("main.json"), CompileOptions::default()).unwrap();
        let documents: Vec<&str> = graph.documents().collect();
        assert_eq!(documents, vec!["main.json", "shared/a.json", "shared/b.json"]);
    }
}
