use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// A named unit of source code with its own generated-code destination
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Package {
    pub name: String,
    /// Source root, relative to the project root unless absolute
    pub root: PathBuf,
}

impl Package {
    pub fn new(name: impl Into<String>, root: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            root: root.into(),
        }
    }
}

/// Ordered, duplicate-free list of packages taking part in a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageRegistry {
    packages: Vec<Package>,
}

impl PackageRegistry {
    pub fn new(packages: Vec<Package>) -> Result<Self, String> {
        let mut seen = HashSet::new();
        for package in &packages {
            if package.name.is_empty() {
                return Err(format!(
                    "package with root '{}' has an empty name",
                    package.root.display()
                ));
            }
            if !seen.insert(package.name.as_str()) {
                return Err(format!("package '{}' is registered twice", package.name));
            }
        }
        Ok(Self { packages })
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Package> {
        self.packages.iter()
    }

    pub fn get(&self, name: &str) -> Option<&Package> {
        self.packages.iter().find(|p| p.name == name)
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }
}

impl<'a> IntoIterator for &'a PackageRegistry {
    type Item = &'a Package;
    type IntoIter = std::slice::Iter<'a, Package>;

    fn into_iter(self) -> Self::IntoIter {
        self.packages.iter()
    }
}

/// Kind of generated code, each with fixed source and destination folders
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactCategory {
    Serialization,
    Export,
    Script,
    EnumConverters,
    LanguageInterop,
}

impl ArtifactCategory {
    /// Categories distributed by folder during post-processing, in order
    pub const DISTRIBUTED: [ArtifactCategory; 3] = [
        ArtifactCategory::Serialization,
        ArtifactCategory::Export,
        ArtifactCategory::Script,
    ];

    /// Folder inside the package's shared output subtree.
    /// Enum converters sit directly in the subtree root.
    pub fn output_subdir(&self) -> Option<&'static str> {
        match self {
            ArtifactCategory::Serialization => Some("Serialization"),
            ArtifactCategory::Export => Some("Export"),
            ArtifactCategory::Script => Some("Script"),
            ArtifactCategory::EnumConverters => None,
            ArtifactCategory::LanguageInterop => Some("NET"),
        }
    }

    /// Folder inside `<root>/Generated`. Export and Script share one.
    pub fn destination_subdir(&self) -> Option<&'static str> {
        match self {
            ArtifactCategory::Serialization => Some("Serialization"),
            ArtifactCategory::Export | ArtifactCategory::Script => Some("Exports"),
            ArtifactCategory::EnumConverters | ArtifactCategory::LanguageInterop => None,
        }
    }

    /// Apply `output_subdir` to a base path
    pub fn join_output(&self, base: &Path) -> PathBuf {
        match self.output_subdir() {
            Some(dir) => base.join(dir),
            None => base.to_path_buf(),
        }
    }
}

impl std::fmt::Display for ArtifactCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ArtifactCategory::Serialization => write!(f, "serialization"),
            ArtifactCategory::Export => write!(f, "export"),
            ArtifactCategory::Script => write!(f, "script"),
            ArtifactCategory::EnumConverters => write!(f, "enum_converters"),
            ArtifactCategory::LanguageInterop => write!(f, "language_interop"),
        }
    }
}
