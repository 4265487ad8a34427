use colored::*;
use serde::Serialize;

use crate::common::format::{self, format_count, format_path};
use crate::pipeline::{Layout, PackageReport, PackageRegistry, RunReport};

/// Print a run report in human-readable format
pub fn print_run_report(report: &RunReport, layout: &Layout) {
    let base = layout.project_root();

    println!();
    println!("{}  Generated Code Distribution", "⚙");
    println!("{}", "─".repeat(60).dimmed());
    println!(
        "  Finished in {}  •  {} distributed  •  {} stale removed",
        format::format_duration(report.duration_secs).cyan(),
        format_count(report.total_relocated()).green(),
        format_count(report.total_stale_removed()).dimmed()
    );
    println!("{}", "─".repeat(60).dimmed());

    if let Some(ref generator) = report.generator {
        let status = if generator.success {
            "ok".green()
        } else {
            "failed".red().bold()
        };
        println!("  Generator: {}", status);
        if let Some(ref error) = generator.error {
            println!("    {}", error.red());
        }
    }
    println!();

    for package in &report.packages {
        print_package_row(package);
    }

    if !report.special_relocations.is_empty() {
        println!();
        for path in &report.special_relocations {
            println!("  {} {}", "→".cyan(), format_path(path, base));
        }
    }

    println!();
    println!("  Stage: {}", format::format_stage(report.stage));
}

fn print_package_row(package: &PackageReport) {
    println!(
        "  {} {:<20} {:>4} serialization  {:>4} export  {:>4} script  {}",
        "●".green(),
        package.name.bold(),
        package.serialization,
        package.export,
        package.script,
        if package.enum_converters_removed > 0 {
            format!("({} enum converters removed)", package.enum_converters_removed)
                .dimmed()
                .to_string()
        } else {
            String::new()
        }
    );
}

/// Print any serializable value as pretty JSON
pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// One-line summary: relocated, stale removed, stage
pub fn print_run_quiet(report: &RunReport) {
    println!(
        "{}  {}  {}",
        report.total_relocated(),
        report.total_stale_removed(),
        report.stage
    );
}

/// Print the result of sweeping the shared output
pub fn print_clean_result(reports: &[PackageReport], layout: &Layout) {
    println!();
    println!(
        "  Swept {}",
        format_path(layout.output_dir(), layout.project_root()).cyan()
    );
    for report in reports {
        println!(
            "  {} {:<20} {}",
            "●".green(),
            report.name.bold(),
            format_count(report.output_swept).dimmed()
        );
    }
    println!();
}

#[derive(Serialize)]
pub struct PackageListing {
    pub name: String,
    pub root: String,
    pub output: String,
    pub generated: String,
    pub exists: bool,
}

/// Resolve display paths for every registered package
pub fn package_listing(registry: &PackageRegistry, layout: &Layout) -> Vec<PackageListing> {
    let base = layout.project_root();
    registry
        .iter()
        .map(|package| {
            let root = layout.source_root(package);
            PackageListing {
                name: package.name.clone(),
                exists: root.is_dir(),
                root: format_path(&root, base),
                output: format_path(&layout.package_output(package), base),
                generated: format_path(&layout.generated_root(package), base),
            }
        })
        .collect()
}

pub fn print_packages(listing: &[PackageListing]) {
    format_header("Registered Packages");
    for entry in listing {
        let marker = if entry.exists { "●".green() } else { "✗".red() };
        println!("  {} {}", marker, entry.name.bold());
        format::print_kv("source", &entry.root);
        format::print_kv("output", &entry.output);
        format::print_kv("generated", &entry.generated);
    }
    println!();
}

fn format_header(title: &str) {
    println!();
    println!("{}", title.bold().underline());
    println!();
}
