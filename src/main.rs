use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use std::process::ExitCode;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use gendist::cli::args::{Cli, Commands, ConfigAction, OutputFormat};
use gendist::cli::output;
use gendist::common::config::Config;
use gendist::common::errors::PipelineError;
use gendist::pipeline::{Layout, Pipeline, ProcessGenerator};

fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
    }

    let _log_guard = init_logging(&cli);

    let result = match cli.command {
        Commands::Run { lenient, timeout } => cmd_run(&cli, lenient, timeout),
        Commands::Clean => cmd_clean(&cli),
        Commands::Packages => cmd_packages(&cli),
        Commands::Config { ref action } => cmd_config(&cli, action),
        Commands::Completions { ref shell } => {
            use clap::CommandFactory;
            let mut cmd = Cli::command();
            let shell = match shell {
                gendist::cli::args::CompletionShell::Bash => clap_complete::Shell::Bash,
                gendist::cli::args::CompletionShell::Zsh => clap_complete::Shell::Zsh,
                gendist::cli::args::CompletionShell::Fish => clap_complete::Shell::Fish,
            };
            clap_complete::generate(shell, &mut cmd, "gendist", &mut std::io::stdout());
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("  {} {:#}", "✗".red(), e);
            let code = e
                .downcast_ref::<PipelineError>()
                .map(|p| p.exit_code())
                .unwrap_or(1);
            ExitCode::from(code)
        }
    }
}

/// stderr logging filtered by `RUST_LOG` (or `--verbose`), plus an
/// optional plain-text log file
fn init_logging(cli: &Cli) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if cli.verbose {
            "gendist=debug"
        } else {
            "gendist=warn"
        })
    });

    let (file_layer, guard) = match cli.log_file.as_deref() {
        Some(path) => match path.file_name() {
            Some(name) => {
                let dir = path
                    .parent()
                    .filter(|d| !d.as_os_str().is_empty())
                    .unwrap_or_else(|| std::path::Path::new("."));
                let appender = tracing_appender::rolling::never(dir, name);
                let (writer, guard) = tracing_appender::non_blocking(appender);
                (
                    Some(fmt::layer().with_writer(writer).with_ansi(false)),
                    Some(guard),
                )
            }
            None => (None, None),
        },
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(file_layer)
        .init();

    guard
}

fn load_config(cli: &Cli) -> Result<Config> {
    let path = Config::resolve_path(&cli.project_root, cli.config.as_deref());
    Ok(Config::load(&path)?)
}

// ─── Run ──────────────────────────────────────────────────────────────────────

fn cmd_run(cli: &Cli, lenient: bool, timeout: Option<u64>) -> Result<()> {
    let mut config = load_config(cli)?;
    if lenient {
        config.strict = false;
    }
    if timeout.is_some() {
        config.generator.timeout_secs = timeout;
    }

    let show_progress = !cli.quiet && matches!(cli.format, OutputFormat::Human);

    if show_progress {
        println!();
        println!("  Rebuilding generated code database");
    }

    let mut pipeline =
        Pipeline::new(config, &cli.project_root, ProcessGenerator)?.with_progress(show_progress);

    let report = match pipeline.run() {
        Ok(report) => report,
        Err(e) => {
            tracing::error!(stage = %pipeline.stage(), error = %e, "run aborted");
            return Err(e.into());
        }
    };

    match cli.format {
        OutputFormat::Human => {
            if !cli.quiet {
                output::print_run_report(&report, pipeline.layout());
            }
            println!("Done.");
        }
        OutputFormat::Json => output::print_json(&report)?,
        OutputFormat::Quiet => output::print_run_quiet(&report),
    }

    Ok(())
}

// ─── Clean ────────────────────────────────────────────────────────────────────

fn cmd_clean(cli: &Cli) -> Result<()> {
    let config = load_config(cli)?;
    let pipeline = Pipeline::new(config, &cli.project_root, ProcessGenerator)?;
    let reports = pipeline.pre_process()?;

    match cli.format {
        OutputFormat::Human => output::print_clean_result(&reports, pipeline.layout()),
        OutputFormat::Json => output::print_json(&reports)?,
        OutputFormat::Quiet => {
            println!("{}", reports.iter().map(|r| r.output_swept).sum::<usize>());
        }
    }

    Ok(())
}

// ─── Packages ─────────────────────────────────────────────────────────────────

fn cmd_packages(cli: &Cli) -> Result<()> {
    let config = load_config(cli)?;
    let registry = config.registry().map_err(anyhow::Error::msg)?;
    let layout = Layout::new(&cli.project_root, &config);
    let listing = output::package_listing(&registry, &layout);

    match cli.format {
        OutputFormat::Human => output::print_packages(&listing),
        OutputFormat::Json => output::print_json(&listing)?,
        OutputFormat::Quiet => {
            for entry in &listing {
                println!("{}\t{}", entry.name, entry.root);
            }
        }
    }

    Ok(())
}

// ─── Config ───────────────────────────────────────────────────────────────────

fn cmd_config(cli: &Cli, action: &ConfigAction) -> Result<()> {
    let path = Config::resolve_path(&cli.project_root, cli.config.as_deref());
    match action {
        ConfigAction::Show => {
            let config = Config::load(&path)?;
            println!("{}", config.to_toml()?);
            Ok(())
        }
        ConfigAction::Init { force } => {
            if path.exists() && !force {
                anyhow::bail!(
                    "Config already exists: {} (use --force to overwrite)",
                    path.display()
                );
            }
            Config::default().save(&path)?;
            println!("  {} Wrote {}", "✓".green(), path.display());
            Ok(())
        }
        ConfigAction::Path => {
            println!("{}", path.display());
            Ok(())
        }
    }
}
