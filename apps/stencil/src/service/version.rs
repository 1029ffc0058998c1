//! Version string derived from the git checkout.

use crate::error::{Result, StencilError};
use chrono::DateTime;
use std::path::Path;
use std::process::Command;

fn git(dir: &Path, args: &[&str]) -> Result<String> {
    let out = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .map_err(|e| StencilError::Other(format!("failed to run git: {e}")))?;
    if !out.status.success() {
        return Err(StencilError::Other(format!(
            "git {} failed: {}",
            args.join(" "),
            String::from_utf8_lossy(&out.stderr).trim()
        )));
    }
    Ok(String::from_utf8_lossy(&out.stdout).trim().to_string())
}

/// `v0.<YYYYmmdd.HHMMSS> (<hash>-<branch>)`, with the commit time in UTC.
pub fn format_version(branch: &str, hash: &str, commit_ts: i64) -> String {
    let date = DateTime::from_timestamp(commit_ts, 0)
        .map(|d| d.format("%Y%m%d.%H%M%S").to_string())
        .unwrap_or_else(|| "00000000.000000".to_string());
    format!("v0.{} ({}-{})", date, hash, branch)
}

/// Describe the checkout containing `dir`.
pub fn describe(dir: &Path) -> Result<String> {
    let branch = git(dir, &["rev-parse", "--abbrev-ref", "HEAD"])?;
    let hash = git(dir, &["rev-parse", "--short", "HEAD"])?;
    let ts_raw = git(dir, &["show", "-s", "--format=%ct", "HEAD"])?;
    let ts: i64 = ts_raw
        .parse()
        .map_err(|_| StencilError::Other(format!("unexpected commit timestamp '{ts_raw}'")))?;
    Ok(format_version(&branch, &hash, ts))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_version() {
        assert_eq!(
            format_version("master", "1a2b3c4", 1_458_000_000),
            "v0.20160315.000000 (1a2b3c4-master)"
        );
    }

    #[test]
    fn test_describe_outside_repo_is_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(describe(dir.path()).is_err());
    }
}
