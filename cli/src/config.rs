use anyhow::{Context, Result};
use asyncgen_compiler::{CompileOptions, DEFAULT_CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Configuration loaded from asyncgen.toml.
/// Optional: every command works without it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AsyncgenConfig {
    pub project: ProjectConfig,

    #[serde(default)]
    pub generate: GenerateConfig,

    #[serde(default)]
    pub output: Option<OutputConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    pub name: String,
}

/// What the compiler builds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateConfig {
    #[serde(default = "default_true")]
    pub publish: bool,

    #[serde(default = "default_true")]
    pub subscribe: bool,

    #[serde(default = "default_content_type")]
    pub default_content_type: String,

    /// Protocols to build variants for. All built-in protocols when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protocols: Option<Vec<String>>,
}

impl Default for GenerateConfig {
    fn default() -> Self {
        Self {
            publish: true,
            subscribe: true,
            default_content_type: default_content_type(),
            protocols: None,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_content_type() -> String {
    DEFAULT_CONTENT_TYPE.to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// File the compile report is written to
    pub path: String,
}

impl AsyncgenConfig {
    /// Load configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: AsyncgenConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        config.validate()?;
        Ok(config)
    }

    /// Try to load config, returning None if file doesn't exist
    pub fn load_optional<P: AsRef<Path>>(path: P) -> Result<Option<Self>> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(None);
        }
        Self::load(path).map(Some)
    }

    pub fn validate(&self) -> Result<()> {
        if self.project.name.is_empty() {
            anyhow::bail!("Project name cannot be empty");
        }

        let generate = &self.generate;
        if !generate.publish && !generate.subscribe {
            anyhow::bail!("At least one of generate.publish and generate.subscribe must be enabled");
        }
        if !generate.default_content_type.contains('/') {
            anyhow::bail!(
                "Invalid default content type: {:?}",
                generate.default_content_type
            );
        }

        if let Some(protocols) = &generate.protocols {
            let mut seen = HashSet::new();
            for protocol in protocols {
                if !seen.insert(protocol.as_str()) {
                    anyhow::bail!("Duplicate protocol: {}", protocol);
                }
            }
        }

        if let Some(output) = &self.output {
            if output.path.is_empty() {
                anyhow::bail!("Output path cannot be empty");
            }
        }

        Ok(())
    }

    pub fn compile_options(&self) -> CompileOptions {
        let generate = &self.generate;
        let options = CompileOptions::new()
            .with_directions(generate.publish, generate.subscribe)
            .with_default_content_type(generate.default_content_type.clone());
        match &generate.protocols {
            Some(protocols) => options.with_protocols(protocols.iter().cloned()),
            None => options,
        }
    }

    pub fn output_path(&self) -> Option<PathBuf> {
        self.output.as_ref().map(|o| PathBuf::from(&o.path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_full_config() {
        let file = write_config(
            r#"
[project]
name = "lights"

[generate]
subscribe = false
default_content_type = "application/avro"
protocols = ["kafka", "mqtt"]

[output]
path = "out/graph.json"
"#,
        );

        let config = AsyncgenConfig::load(file.path()).unwrap();
        assert_eq!(config.project.name, "lights");
        assert_eq!(config.output_path(), Some(PathBuf::from("out/graph.json")));

        let options = config.compile_options();
        assert!(options.publish);
        assert!(!options.subscribe);
        assert_eq!(options.default_content_type, "application/avro");
        assert_eq!(
            options.protocols,
            Some(vec!["kafka".to_string(), "mqtt".to_string()])
        );
    }

    #[test]
    fn test_defaults_apply() {
        let file = write_config("[project]\nname = \"bare\"\n");
        let config = AsyncgenConfig::load(file.path()).unwrap();
        let options = config.compile_options();
        assert!(options.publish && options.subscribe);
        assert_eq!(options.default_content_type, DEFAULT_CONTENT_TYPE);
        assert!(options.protocols.is_none());
        assert!(config.output_path().is_none());
    }

    #[test]
    fn test_validation_errors() {
        let cases = [
            ("[project]\nname = \"\"\n", "Project name cannot be empty"),
            (
                "[project]\nname = \"x\"\n[generate]\npublish = false\nsubscribe = false\n",
                "At least one of",
            ),
            (
                "[project]\nname = \"x\"\n[generate]\nprotocols = [\"kafka\", \"kafka\"]\n",
                "Duplicate protocol: kafka",
            ),
            (
                "[project]\nname = \"x\"\n[generate]\ndefault_content_type = \"json\"\n",
                "Invalid default content type",
            ),
        ];
        for (contents, expected) in cases {
            let file = write_config(contents);
            let err = AsyncgenConfig::load(file.path()).unwrap_err();
            assert!(
                err.to_string().contains(expected),
                "expected {:?} in {:?}",
                expected,
                err.to_string()
            );
        }
    }

    #[test]
    fn test_missing_optional_config() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("asyncgen.toml");
        assert!(AsyncgenConfig::load_optional(&missing).unwrap().is_none());
    }
}
