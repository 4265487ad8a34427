use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// gendist: regenerate and distribute generated code across packages
#[derive(Parser, Debug)]
#[command(
    name = "gendist",
    version,
    about = "Regenerates derived source code and distributes it into each package",
    long_about = "gendist clears stale generator output, runs the code generator once for\n\
                   every package, and moves the generated artifacts into each package's\n\
                   Generated/ tree.",
    after_help = "EXAMPLES:\n  \
        gendist run                            Full regeneration with gendist.toml\n  \
        gendist run --lenient                  Keep going if the generator fails\n  \
        gendist run --timeout 600              Kill the generator after 10 minutes\n  \
        gendist clean                          Clear the shared output directory\n  \
        gendist packages                       List registered packages\n  \
        gendist config init                    Write the default gendist.toml\n  \
        gendist run --format json              Machine-readable run report"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Project root that package paths are relative to
    #[arg(long, short = 'C', global = true, value_name = "DIR", default_value = ".")]
    pub project_root: PathBuf,

    /// Config file (defaults to <project-root>/gendist.toml)
    #[arg(long, global = true, value_name = "FILE", env = "GENDIST_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, default_value = "human")]
    pub format: OutputFormat,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Verbose output
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Quiet mode, minimal output
    #[arg(long, short, global = true)]
    pub quiet: bool,

    /// Also write logs to this file
    #[arg(long, global = true, value_name = "FILE")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the full clean → generate → distribute pipeline
    Run {
        /// Continue distributing even if the generator fails
        #[arg(long)]
        lenient: bool,

        /// Kill the generator after this many seconds
        #[arg(long, value_name = "SECS")]
        timeout: Option<u64>,
    },

    /// Sweep every package's subtree of the shared output directory
    Clean,

    /// List registered packages and their resolved paths
    Packages,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: CompletionShell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show the effective configuration
    Show,
    /// Write the default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Print the config file path
    Path,
}

#[derive(ValueEnum, Clone, Debug, PartialEq)]
pub enum OutputFormat {
    Human,
    Json,
    Quiet,
}

#[derive(ValueEnum, Clone, Debug)]
pub enum CompletionShell {
    Bash,
    Zsh,
    Fish,
}
