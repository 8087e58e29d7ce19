use anyhow::{Context, Result};
use colored::Colorize;
use std::fs;
use std::path::Path;

use crate::config::{AsyncgenConfig, GenerateConfig, OutputConfig, ProjectConfig};

pub fn init(config_path: &str, name: &str) -> Result<()> {
    let path = Path::new(config_path);

    if path.exists() {
        anyhow::bail!(
            "Configuration file already exists: {}\nUse a different path or remove the existing file.",
            path.display()
        );
    }

    let config = AsyncgenConfig {
        project: ProjectConfig {
            name: name.to_string(),
        },
        generate: GenerateConfig::default(),
        output: Some(OutputConfig {
            path: "./generated/graph.json".to_string(),
        }),
    };
    config.validate()?;

    let config_toml = toml::to_string_pretty(&config)?;
    fs::write(path, &config_toml)
        .with_context(|| format!("Failed to write config file: {}", path.display()))?;

    println!("{} Created {}", "✓".green().bold(), path.display());
    println!();
    println!("{}", "Next steps:".bold());
    println!("  1. Check your document: {}", "agen check asyncapi.json".cyan());
    println!("  2. Write the report:    {}", "agen compile asyncapi.json".cyan());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_writes_loadable_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("asyncgen.toml");
        let path_str = path.to_str().unwrap();

        init(path_str, "lights").unwrap();
        let config = AsyncgenConfig::load(&path).unwrap();
        assert_eq!(config.project.name, "lights");
        assert!(config.output_path().is_some());

        let err = init(path_str, "lights").unwrap_err();
        assert!(err.to_string().contains("already exists"));
    }
}
