use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::common::errors::PipelineError;
use crate::fsops::exclusion::ExclusionPolicy;
use crate::pipeline::registry::{ArtifactCategory, Package, PackageRegistry};

/// File name looked up in the project root when `--config` is not given
pub const CONFIG_FILE_NAME: &str = "gendist.toml";

/// Static pipeline configuration.
///
/// Loaded once per run and handed to the orchestrator; nothing mutates it
/// afterwards. Every field has a default, so a missing or partial file
/// reproduces the historical setup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Shared output directory the generator writes into
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Prefix of each package's subtree inside `output_dir`
    #[serde(default = "default_output_prefix")]
    pub output_prefix: String,

    /// Name of the generated-code directory inside each package root
    #[serde(default = "default_generated_dir")]
    pub generated_dir: String,

    /// Abort when the generator fails; `false` logs and keeps going
    #[serde(default = "default_true")]
    pub strict: bool,

    /// Move fresh enum converters into the package tree (disabled historically)
    #[serde(default)]
    pub relocate_enum_converters: bool,

    /// Files the generator leaves in the working directory
    #[serde(default = "default_transient_files")]
    pub transient_files: Vec<PathBuf>,

    #[serde(default)]
    pub generator: GeneratorConfig,

    #[serde(default)]
    pub exclusions: ExclusionPolicy,

    /// Packages in processing order
    #[serde(default = "default_packages")]
    pub packages: Vec<Package>,

    #[serde(default = "default_special_relocations")]
    pub special_relocations: Vec<SpecialRelocation>,
}

/// How to call the external code generator
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GeneratorConfig {
    #[serde(default = "default_executable")]
    pub executable: PathBuf,

    /// Pass `--statistics`
    #[serde(default = "default_true")]
    pub statistics: bool,

    /// File names the generator must not analyze (one `--exclude` each)
    #[serde(default = "default_generator_excludes")]
    pub exclude: Vec<String>,

    /// Kill the generator after this many seconds; no limit when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

/// A single named file moved out of the shared output after distribution
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SpecialRelocation {
    pub package: String,
    pub category: ArtifactCategory,
    pub file: String,
    /// Destination directory, relative to the project root
    pub destination: PathBuf,
}

fn default_true() -> bool {
    true
}
fn default_output_dir() -> PathBuf {
    PathBuf::from("Out")
}
fn default_output_prefix() -> String {
    "LSDC_".to_string()
}
fn default_generated_dir() -> String {
    "Generated".to_string()
}
fn default_executable() -> PathBuf {
    Path::new("Tools").join("LSDC").join("LSDC")
}
fn default_generator_excludes() -> Vec<String> {
    vec!["pugixml.hpp".to_string()]
}
fn default_transient_files() -> Vec<PathBuf> {
    vec![
        PathBuf::from("Debug_NETTypes.list"),
        PathBuf::from("Debug_StringCvt.list"),
    ]
}

fn default_packages() -> Vec<Package> {
    let app = |name: &str| Package::new(name, Path::new("Apps").join(name).join("Src"));
    vec![
        Package::new("LinderdaumCore", "Src"),
        app("FightingChess"),
        app("Runner"),
        app("PuzzL"),
        app("Paratrooper"),
    ]
}

fn default_special_relocations() -> Vec<SpecialRelocation> {
    let managed_api = Path::new("Apps.NET").join("ManagedAPI");
    ["LinderdaumNET.cpp", "LinderdaumNET.h"]
        .iter()
        .map(|file| SpecialRelocation {
            package: "LinderdaumCore".to_string(),
            category: ArtifactCategory::LanguageInterop,
            file: file.to_string(),
            destination: managed_api.clone(),
        })
        .collect()
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            executable: default_executable(),
            statistics: true,
            exclude: default_generator_excludes(),
            timeout_secs: None,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            output_prefix: default_output_prefix(),
            generated_dir: default_generated_dir(),
            strict: true,
            relocate_enum_converters: false,
            transient_files: default_transient_files(),
            generator: GeneratorConfig::default(),
            exclusions: ExclusionPolicy::default(),
            packages: default_packages(),
            special_relocations: default_special_relocations(),
        }
    }
}

impl Config {
    /// Resolve the config file location for a project
    pub fn resolve_path(project_root: &Path, explicit: Option<&Path>) -> PathBuf {
        match explicit {
            Some(p) => p.to_path_buf(),
            None => project_root.join(CONFIG_FILE_NAME),
        }
    }

    /// Load config from file, or fall back to defaults if it does not exist
    pub fn load(path: &Path) -> Result<Self, PipelineError> {
        let config = if path.exists() {
            let contents = std::fs::read_to_string(path).map_err(|e| PipelineError::Config {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
            Self::parse(path, &contents)?
        } else {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            Config::default()
        };
        config.validate(path)?;
        Ok(config)
    }

    fn parse(path: &Path, contents: &str) -> Result<Self, PipelineError> {
        toml::from_str(contents).map_err(|e| PipelineError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Check cross-field consistency
    pub fn validate(&self, path: &Path) -> Result<(), PipelineError> {
        let registry = self.registry().map_err(|message| PipelineError::Config {
            path: path.to_path_buf(),
            message,
        })?;

        for special in &self.special_relocations {
            if registry.get(&special.package).is_none() {
                return Err(PipelineError::Config {
                    path: path.to_path_buf(),
                    message: format!(
                        "special relocation of '{}' names unknown package '{}'",
                        special.file, special.package
                    ),
                });
            }
        }

        Ok(())
    }

    /// Build the package registry in configured order
    pub fn registry(&self) -> Result<PackageRegistry, String> {
        PackageRegistry::new(self.packages.clone())
    }

    /// Save config to file
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create config dir: {}", dir.display()))?;
        }
        let contents = self.to_toml()?;
        std::fs::write(path, contents)
            .with_context(|| format!("Failed to write config: {}", path.display()))?;
        Ok(())
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_historical_registry() {
        let config = Config::default();
        let names: Vec<&str> = config.packages.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(
            names,
            ["LinderdaumCore", "FightingChess", "Runner", "PuzzL", "Paratrooper"]
        );
        assert_eq!(config.packages[1].root, Path::new("Apps/FightingChess/Src"));
        assert_eq!(config.special_relocations.len(), 2);
        assert!(config.strict);
        assert!(!config.relocate_enum_converters);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let toml = r#"
            strict = false

            [[packages]]
            name = "Foo"
            root = "Apps/Foo/Src"
        "#;
        let config = Config::parse(Path::new("gendist.toml"), toml).unwrap();
        assert!(!config.strict);
        assert_eq!(config.packages.len(), 1);
        assert_eq!(config.output_prefix, "LSDC_");
        assert_eq!(config.generator.exclude, vec!["pugixml.hpp"]);
    }

    #[test]
    fn test_duplicate_package_rejected() {
        let mut config = Config::default();
        config.packages.push(Package::new("Runner", "Elsewhere"));
        let err = config.validate(Path::new("gendist.toml")).unwrap_err();
        assert!(err.to_string().contains("Runner"));
    }

    #[test]
    fn test_special_relocation_unknown_package_rejected() {
        let mut config = Config::default();
        config.packages.retain(|p| p.name != "LinderdaumCore");
        assert!(config.validate(Path::new("gendist.toml")).is_err());
    }

    #[test]
    fn test_toml_roundtrip_of_defaults() {
        let config = Config::default();
        let text = config.to_toml().unwrap();
        let back = Config::parse(Path::new("x.toml"), &text).unwrap();
        assert_eq!(back.packages, config.packages);
        assert_eq!(back.special_relocations, config.special_relocations);
        assert_eq!(back.generator, config.generator);
    }
}
