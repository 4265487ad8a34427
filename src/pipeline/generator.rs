use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::time::{Duration, Instant};

use super::registry::PackageRegistry;
use crate::common::config::GeneratorConfig;
use crate::common::errors::{GeneratorFailure, PipelineError};

/// Poll interval while waiting on a generator with a timeout
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// One batched call of the external generator covering every package
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorInvocation {
    pub executable: PathBuf,
    pub args: Vec<OsString>,
    pub working_dir: PathBuf,
    pub timeout: Option<Duration>,
}

impl GeneratorInvocation {
    /// `<exe> (--package <root>)+ [--statistics] (--exclude <name>)*`
    pub fn build(config: &GeneratorConfig, registry: &PackageRegistry, working_dir: &Path) -> Self {
        // Anchor to the caller's cwd; the child runs inside working_dir
        let working_dir = std::path::absolute(working_dir).unwrap_or_else(|_| working_dir.to_path_buf());
        let mut args = Vec::with_capacity(registry.len() * 2 + 1 + config.exclude.len() * 2);
        for package in registry {
            args.push(OsString::from("--package"));
            args.push(package.root.clone().into_os_string());
        }
        if config.statistics {
            args.push(OsString::from("--statistics"));
        }
        for name in &config.exclude {
            args.push(OsString::from("--exclude"));
            args.push(OsString::from(name));
        }

        Self {
            executable: resolve_executable(&config.executable, &working_dir),
            args,
            working_dir,
            timeout: config.timeout_secs.map(Duration::from_secs),
        }
    }

    /// Printable form of the command, for logs and error messages
    pub fn command_line(&self) -> String {
        let mut line = self.executable.display().to_string();
        for arg in &self.args {
            line.push(' ');
            line.push_str(&arg.to_string_lossy());
        }
        line
    }

    fn failed(&self, failure: GeneratorFailure) -> PipelineError {
        PipelineError::GeneratorInvocation {
            command: self.command_line(),
            failure,
        }
    }
}

/// Runs a generator invocation to completion
pub trait Generator {
    fn generate(&self, invocation: &GeneratorInvocation) -> Result<(), PipelineError>;
}

impl<G: Generator + ?Sized> Generator for &G {
    fn generate(&self, invocation: &GeneratorInvocation) -> Result<(), PipelineError> {
        (**self).generate(invocation)
    }
}

/// Runs the generator as a blocking child process
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessGenerator;

impl Generator for ProcessGenerator {
    fn generate(&self, invocation: &GeneratorInvocation) -> Result<(), PipelineError> {
        tracing::info!(command = %invocation.command_line(), "invoking generator");

        let mut child = Command::new(&invocation.executable)
            .args(&invocation.args)
            .current_dir(&invocation.working_dir)
            // stdout carries the run report
            .stdout(Stdio::from(std::io::stderr()))
            .spawn()
            .map_err(|e| invocation.failed(GeneratorFailure::Spawn(e)))?;

        let status = match invocation.timeout {
            Some(timeout) => wait_with_timeout(&mut child, timeout)
                .map_err(|failure| invocation.failed(failure))?,
            None => child
                .wait()
                .map_err(|e| invocation.failed(GeneratorFailure::Spawn(e)))?,
        };

        check_status(status).map_err(|failure| invocation.failed(failure))
    }
}

fn wait_with_timeout(child: &mut Child, timeout: Duration) -> Result<ExitStatus, GeneratorFailure> {
    let started = Instant::now();
    loop {
        if let Some(status) = child.try_wait().map_err(GeneratorFailure::Spawn)? {
            return Ok(status);
        }
        if started.elapsed() >= timeout {
            tracing::warn!(pid = child.id(), "generator timed out, killing");
            if let Err(e) = child.kill() {
                tracing::warn!(pid = child.id(), error = %e, "failed to kill generator");
            }
            if let Err(e) = child.wait() {
                tracing::warn!(pid = child.id(), error = %e, "failed to reap generator");
            }
            return Err(GeneratorFailure::TimedOut(timeout));
        }
        std::thread::sleep(POLL_INTERVAL);
    }
}

fn check_status(status: ExitStatus) -> Result<(), GeneratorFailure> {
    if status.success() {
        return Ok(());
    }
    match status.code() {
        Some(code) => Err(GeneratorFailure::ExitCode(code)),
        None => Err(GeneratorFailure::Signal),
    }
}

/// Relative paths with a directory part are taken from the working
/// directory; bare names are left for `PATH` lookup.
fn resolve_executable(executable: &Path, working_dir: &Path) -> PathBuf {
    if executable.is_relative() && executable.components().count() > 1 {
        working_dir.join(executable)
    } else {
        executable.to_path_buf()
    }
}
