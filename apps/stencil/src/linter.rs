//! External linter invocation.
//!
//! The linter runs synchronously as `<program> [args...] --jobs=<N> <path>`.
//! Its stdout is the report input; the exit status is surfaced as-is and
//! never stops report generation.

use crate::error::{Result, StencilError};
use std::path::Path;
use std::process::{Command, Stdio};

#[derive(Debug, Clone)]
/// How to launch the linter.
pub struct LinterCommand {
    pub program: String,
    pub args: Vec<String>,
    pub jobs: usize,
}

impl LinterCommand {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            jobs: default_jobs(),
        }
    }

    /// Full argument list for a target path.
    pub fn argv(&self, path: &str) -> Vec<String> {
        let mut argv = self.args.clone();
        argv.push(format!("--jobs={}", self.jobs));
        argv.push(path.to_string());
        argv
    }
}

/// Captured result of one linter run.
#[derive(Debug, Clone)]
pub struct LintRun {
    pub output: String,
    /// Process exit code; `-1` when terminated by a signal.
    pub status: i32,
}

impl LintRun {
    pub fn passed(&self) -> bool {
        self.status == 0
    }
}

/// Worker count handed to the linter when none is configured.
pub fn default_jobs() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

/// Run the linter on `path` from `cwd`, capturing stdout and exit status.
///
/// Failing to launch the program is an error; a nonzero exit is not.
pub fn run_linter(cmd: &LinterCommand, path: &str, cwd: &Path) -> Result<LintRun> {
    let argv = cmd.argv(path);
    tracing::debug!(program = %cmd.program, args = ?argv, "running linter");
    let out = Command::new(&cmd.program)
        .args(&argv)
        .current_dir(cwd)
        .stdin(Stdio::null())
        .output()
        .map_err(|source| StencilError::LinterLaunch {
            program: cmd.program.clone(),
            source,
        })?;
    if !out.stderr.is_empty() {
        tracing::debug!(
            target_path = path,
            stderr = %String::from_utf8_lossy(&out.stderr),
            "linter stderr"
        );
    }
    let status = out.status.code().unwrap_or(-1);
    tracing::info!(target_path = path, status, "linter finished");
    Ok(LintRun {
        output: String::from_utf8_lossy(&out.stdout).into_owned(),
        status,
    })
}
