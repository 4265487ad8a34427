use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::PathBuf;

/// Pipeline stages, entered strictly in declaration order
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Idle,
    PreProcessing,
    Generating,
    PostProcessing,
    Finalizing,
    Done,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stage::Idle => write!(f, "idle"),
            Stage::PreProcessing => write!(f, "pre-processing"),
            Stage::Generating => write!(f, "generating"),
            Stage::PostProcessing => write!(f, "post-processing"),
            Stage::Finalizing => write!(f, "finalizing"),
            Stage::Done => write!(f, "done"),
        }
    }
}

/// Summary of one pipeline run
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub started_at: DateTime<Utc>,
    pub duration_secs: f64,
    pub stage: Stage,
    pub generator: Option<GeneratorReport>,
    pub packages: Vec<PackageReport>,
    /// Destinations of special single-file relocations that happened
    pub special_relocations: Vec<PathBuf>,
    pub transient_files_removed: Vec<PathBuf>,
}

impl RunReport {
    pub fn new() -> Self {
        Self {
            started_at: Utc::now(),
            duration_secs: 0.0,
            stage: Stage::Idle,
            generator: None,
            packages: Vec::new(),
            special_relocations: Vec::new(),
            transient_files_removed: Vec::new(),
        }
    }

    pub fn total_relocated(&self) -> usize {
        self.packages.iter().map(|p| p.relocated()).sum()
    }

    pub fn total_stale_removed(&self) -> usize {
        self.packages.iter().map(|p| p.stale_removed).sum()
    }
}

impl Default for RunReport {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GeneratorReport {
    pub command: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Per-package counts
#[derive(Debug, Clone, Default, Serialize)]
pub struct PackageReport {
    pub name: String,
    /// Leftover files removed from the shared output before generation
    pub output_swept: usize,
    /// Old generated files removed from the package's destinations
    pub stale_removed: usize,
    pub serialization: usize,
    pub export: usize,
    pub script: usize,
    pub enum_converters_removed: usize,
    pub enum_converters_relocated: usize,
}

impl PackageReport {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    pub fn relocated(&self) -> usize {
        self.serialization + self.export + self.script + self.enum_converters_relocated
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_order_is_linear() {
        let stages = [
            Stage::Idle,
            Stage::PreProcessing,
            Stage::Generating,
            Stage::PostProcessing,
            Stage::Finalizing,
            Stage::Done,
        ];
        assert!(stages.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_totals() {
        let mut report = RunReport::new();
        let mut a = PackageReport::new("A");
        a.serialization = 2;
        a.script = 1;
        a.stale_removed = 4;
        let mut b = PackageReport::new("B");
        b.export = 3;
        report.packages = vec![a, b];
        assert_eq!(report.total_relocated(), 6);
        assert_eq!(report.total_stale_removed(), 4);
    }
}
