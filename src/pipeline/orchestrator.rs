use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::time::Instant;

use super::generator::{Generator, GeneratorInvocation};
use super::layout::Layout;
use super::registry::{ArtifactCategory, Package, PackageRegistry};
use super::report::{GeneratorReport, PackageReport, RunReport, Stage};
use crate::common::config::Config;
use crate::common::errors::PipelineError;
use crate::fsops::{self, relocate, replace_file, sweep};

/// Sequences clean → generate → distribute for every registered package.
///
/// The configuration is fixed at construction. Execution is single-threaded
/// and stops at the first fatal error; packages already post-processed keep
/// their new contents.
pub struct Pipeline<G: Generator> {
    config: Config,
    registry: PackageRegistry,
    layout: Layout,
    generator: G,
    show_progress: bool,
    stage: Stage,
}

impl<G: Generator> Pipeline<G> {
    pub fn new(config: Config, project_root: &Path, generator: G) -> Result<Self, PipelineError> {
        let registry = config.registry().map_err(|message| PipelineError::Config {
            path: project_root.to_path_buf(),
            message,
        })?;
        let layout = Layout::new(project_root, &config);

        Ok(Self {
            config,
            registry,
            layout,
            generator,
            show_progress: false,
            stage: Stage::Idle,
        })
    }

    /// Show a progress bar over packages during post-processing
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Last stage entered. After a failed run this is where it stopped.
    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn registry(&self) -> &PackageRegistry {
        &self.registry
    }

    fn enter(&mut self, stage: Stage) {
        tracing::info!(from = %self.stage, to = %stage, "stage");
        self.stage = stage;
    }

    /// Run every stage in order
    pub fn run(&mut self) -> Result<RunReport, PipelineError> {
        let started = Instant::now();
        let mut report = RunReport::new();
        self.stage = Stage::Idle;

        self.check_sources()?;

        self.enter(Stage::PreProcessing);
        report.packages = self.pre_process()?;

        self.enter(Stage::Generating);
        report.generator = Some(self.generate()?);

        self.enter(Stage::PostProcessing);
        self.post_process(&mut report.packages)?;

        self.enter(Stage::Finalizing);
        self.finalize(&mut report)?;

        self.enter(Stage::Done);
        report.stage = Stage::Done;
        report.duration_secs = started.elapsed().as_secs_f64();
        Ok(report)
    }

    /// Every package source root must be an existing directory
    pub fn check_sources(&self) -> Result<(), PipelineError> {
        for package in &self.registry {
            let root = self.layout.source_root(package);
            if !root.is_dir() {
                return Err(PipelineError::MissingPath { path: root });
            }
        }
        Ok(())
    }

    /// Clear leftover generator output for every package
    pub fn pre_process(&self) -> Result<Vec<PackageReport>, PipelineError> {
        let mut reports = Vec::with_capacity(self.registry.len());
        for package in &self.registry {
            let mut report = PackageReport::new(&package.name);
            report.output_swept = sweep(
                &self.layout.package_output(package),
                &self.config.exclusions,
            )?;
            reports.push(report);
        }
        Ok(reports)
    }

    /// One generator call for the whole registry.
    ///
    /// In lenient mode a failure is logged and reported, and the run goes on.
    pub fn generate(&self) -> Result<GeneratorReport, PipelineError> {
        let invocation = GeneratorInvocation::build(
            &self.config.generator,
            &self.registry,
            self.layout.project_root(),
        );
        let command = invocation.command_line();

        match self.generator.generate(&invocation) {
            Ok(()) => Ok(GeneratorReport {
                command,
                success: true,
                error: None,
            }),
            Err(e) if !self.config.strict => {
                tracing::warn!(error = %e, "generator failed, continuing (lenient mode)");
                Ok(GeneratorReport {
                    command,
                    success: false,
                    error: Some(e.to_string()),
                })
            }
            Err(e) => Err(e),
        }
    }

    /// Distribute generated output into every package, in registry order
    pub fn post_process(&self, reports: &mut Vec<PackageReport>) -> Result<(), PipelineError> {
        let pb = if self.show_progress {
            let pb = ProgressBar::new(self.registry.len() as u64);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("{spinner:.cyan} [{bar:40.cyan/blue}] {pos}/{len} Distributing... {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_bar())
                    .progress_chars("━━░"),
            );
            Some(pb)
        } else {
            None
        };

        for package in &self.registry {
            if let Some(ref pb) = pb {
                pb.set_message(package.name.clone());
            }

            let idx = match reports.iter().position(|r| r.name == package.name) {
                Some(idx) => idx,
                None => {
                    reports.push(PackageReport::new(&package.name));
                    reports.len() - 1
                }
            };
            self.post_process_package(package, &mut reports[idx])?;

            if let Some(ref pb) = pb {
                pb.inc(1);
            }
        }

        if let Some(ref pb) = pb {
            pb.finish_and_clear();
        }

        Ok(())
    }

    /// Replace one package's generated code with the fresh output
    pub fn post_process_package(
        &self,
        package: &Package,
        report: &mut PackageReport,
    ) -> Result<(), PipelineError> {
        let exclusions = &self.config.exclusions;
        let exports = self.layout.destination(package, ArtifactCategory::Export);
        let serialization = self.layout.destination(package, ArtifactCategory::Serialization);

        // Stale generated code goes first so removed symbols do not linger
        report.stale_removed += sweep(&exports, exclusions)?;
        report.stale_removed += sweep(&serialization, exclusions)?;

        for category in ArtifactCategory::DISTRIBUTED {
            let moved = relocate(
                &self.layout.category_output(package, category),
                &self.layout.destination(package, category),
                exclusions,
            )?;
            match category {
                ArtifactCategory::Serialization => report.serialization += moved,
                ArtifactCategory::Export => report.export += moved,
                ArtifactCategory::Script => report.script += moved,
                _ => {}
            }
        }

        self.handle_enum_converters(package, report)?;

        tracing::info!(
            package = %package.name,
            stale = report.stale_removed,
            relocated = report.relocated(),
            "package distributed"
        );
        Ok(())
    }

    /// Installed converters are always deleted. Fresh ones stay in the
    /// shared output unless `relocate_enum_converters` is set; relocation
    /// has been switched off historically and it is unclear whether for good.
    fn handle_enum_converters(
        &self,
        package: &Package,
        report: &mut PackageReport,
    ) -> Result<(), PipelineError> {
        for (fresh, installed) in self.layout.enum_converter_files(package) {
            if fsops::remove_if_exists(&installed)? {
                report.enum_converters_removed += 1;
            }
            if self.config.relocate_enum_converters && replace_file(&fresh, &installed)? {
                report.enum_converters_relocated += 1;
            }
        }
        Ok(())
    }

    /// Special single-file moves, then removal of the generator's list files
    pub fn finalize(&self, report: &mut RunReport) -> Result<(), PipelineError> {
        for special in &self.config.special_relocations {
            let Some(package) = self.registry.get(&special.package) else {
                tracing::warn!(package = %special.package, "special relocation for unknown package");
                continue;
            };
            let from = self
                .layout
                .category_output(package, special.category)
                .join(&special.file);
            let to = self.layout.resolve(&special.destination).join(&special.file);

            if replace_file(&from, &to)? {
                tracing::debug!(from = %from.display(), to = %to.display(), "special relocation");
                report.special_relocations.push(to);
            } else {
                tracing::debug!(path = %from.display(), "special relocation source absent");
            }
        }

        for transient in &self.config.transient_files {
            let path = self.layout.resolve(transient);
            if fsops::remove_if_exists(&path)? {
                report.transient_files_removed.push(path);
            } else {
                tracing::warn!(path = %path.display(), "transient file not found");
            }
        }

        Ok(())
    }
}
