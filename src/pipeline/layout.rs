use std::path::{Path, PathBuf};

use super::registry::{ArtifactCategory, Package};
use crate::common::config::Config;

/// Extensions of the per-package enum converter pair
const ENUM_CONVERTER_EXTENSIONS: [&str; 2] = ["h", "cpp"];

/// Path conventions for one project: where the generator writes and where
/// each package keeps its generated code.
#[derive(Debug, Clone)]
pub struct Layout {
    project_root: PathBuf,
    output_dir: PathBuf,
    output_prefix: String,
    generated_dir: String,
}

impl Layout {
    pub fn new(project_root: &Path, config: &Config) -> Self {
        let output_dir = resolve_under(project_root, &config.output_dir);
        Self {
            project_root: project_root.to_path_buf(),
            output_dir,
            output_prefix: config.output_prefix.clone(),
            generated_dir: config.generated_dir.clone(),
        }
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Resolve a configured path against the project root
    pub fn resolve(&self, path: &Path) -> PathBuf {
        resolve_under(&self.project_root, path)
    }

    /// `<output>/<prefix><name>`
    pub fn package_output(&self, package: &Package) -> PathBuf {
        self.output_dir
            .join(format!("{}{}", self.output_prefix, package.name))
    }

    pub fn category_output(&self, package: &Package, category: ArtifactCategory) -> PathBuf {
        category.join_output(&self.package_output(package))
    }

    pub fn source_root(&self, package: &Package) -> PathBuf {
        self.resolve(&package.root)
    }

    /// `<root>/Generated`
    pub fn generated_root(&self, package: &Package) -> PathBuf {
        self.source_root(package).join(&self.generated_dir)
    }

    pub fn destination(&self, package: &Package, category: ArtifactCategory) -> PathBuf {
        let base = self.generated_root(package);
        match category.destination_subdir() {
            Some(dir) => base.join(dir),
            None => base,
        }
    }

    /// (freshly generated, installed) paths of the enum converter pair
    pub fn enum_converter_files(&self, package: &Package) -> Vec<(PathBuf, PathBuf)> {
        let source = self.category_output(package, ArtifactCategory::EnumConverters);
        let dest = self.destination(package, ArtifactCategory::EnumConverters);
        ENUM_CONVERTER_EXTENSIONS
            .iter()
            .map(|ext| {
                let name = format!("{}_EnumConverters.{}", package.name, ext);
                (source.join(&name), dest.join(&name))
            })
            .collect()
    }
}

fn resolve_under(root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}
