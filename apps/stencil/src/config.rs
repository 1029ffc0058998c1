//! Configuration discovery and effective settings resolution.
//!
//! Stencil reads `stencil.toml|yaml|yml` from the repository root (or closest
//! ancestor) and merges it with CLI flags to produce an `Effective` config.
//! Defaults:
//! - `output`: `human`
//! - `lint.targets`: `["package", "tests"]`
//! - `lint.out_dir`: `results/pylint`
//! - `lint.linter`: `pylint`, `lint.jobs`: available CPUs
//! - `init.placeholder`: `package`
//! - `serve.host|port`: `0.0.0.0:5000`
//! - `serve.excludes`: `["/", "/static/<path:filename>"]`
//!
//! Overrides precedence: CLI > config file > defaults.

use crate::linter::{default_jobs, LinterCommand};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_OUT_DIR: &str = "results/pylint";
pub const DEFAULT_LINTER: &str = "pylint";
pub const DEFAULT_PLACEHOLDER: &str = "package";
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 5000;

pub fn default_targets() -> Vec<String> {
    vec!["package".to_string(), "tests".to_string()]
}

pub fn default_excludes() -> Vec<String> {
    vec!["/".to_string(), "/static/<path:filename>".to_string()]
}

#[derive(Debug, Default, Deserialize, Clone)]
/// Lint pipeline section under `[lint]`.
pub struct LintCfg {
    pub targets: Option<Vec<String>>,
    pub out_dir: Option<String>,
    pub linter: Option<String>,
    pub args: Option<Vec<String>>,
    pub jobs: Option<usize>,
    pub templates: Option<String>,
}

#[derive(Debug, Default, Deserialize, Clone)]
/// Scaffold initializer section under `[init]`.
pub struct InitCfg {
    pub placeholder: Option<String>,
}

#[derive(Debug, Default, Deserialize, Clone)]
/// Introspection service section under `[serve]`.
pub struct ServeCfg {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub project: Option<String>,
    pub excludes: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize, Clone)]
/// Root configuration loaded from `stencil.toml|yaml`.
pub struct StencilConfig {
    pub output: Option<String>,
    #[serde(default)]
    pub lint: Option<LintCfg>,
    #[serde(default)]
    pub init: Option<InitCfg>,
    #[serde(default)]
    pub serve: Option<ServeCfg>,
}

#[derive(Debug, Default, Clone)]
/// Values given on the command line; `None` falls through to config/defaults.
pub struct CliOverrides {
    pub repo_root: Option<String>,
    pub output: Option<String>,
    pub targets: Vec<String>,
    pub out_dir: Option<String>,
    pub linter: Option<String>,
    pub jobs: Option<usize>,
    pub templates: Option<String>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub project: Option<String>,
}

#[derive(Debug, Clone)]
/// Fully-resolved configuration used by commands after applying precedence.
pub struct Effective {
    pub repo_root: PathBuf,
    pub output: String,
    pub targets: Vec<String>,
    pub out_dir: PathBuf,
    pub linter: LinterCommand,
    pub templates: Option<PathBuf>,
    pub placeholder: String,
    pub host: String,
    pub port: u16,
    pub project: String,
    pub excludes: Vec<String>,
}

/// Walk upward from `start` to detect the repository root.
///
/// Stops when a `stencil.toml|yaml|yml` or a `.git` directory is found.
/// Relative starts are taken against the working directory first, since
/// `.` has no parent to walk to.
pub fn detect_repo_root(start: &Path) -> PathBuf {
    let start = absolutize(start);
    let mut cur = start.as_path();
    loop {
        if CONFIG_NAMES.iter().any(|n| cur.join(n).exists()) {
            return cur.to_path_buf();
        }
        if cur.join(".git").exists() {
            return cur.to_path_buf();
        }
        match cur.parent() {
            Some(p) => cur = p,
            None => return start,
        }
    }
}

fn absolutize(path: &Path) -> PathBuf {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        match std::env::current_dir() {
            Ok(wd) => wd.join(path),
            Err(_) => return path.to_path_buf(),
        }
    };
    // drops `.` segments; `..` is left for the walk
    joined.components().collect()
}

const CONFIG_NAMES: [&str; 3] = ["stencil.toml", "stencil.yaml", "stencil.yml"];

/// Load `StencilConfig` from `stencil.toml` or `stencil.yaml|yml` if present.
///
/// Unreadable or malformed files count as absent.
pub fn load_config(root: &Path) -> Option<StencilConfig> {
    let toml_path = root.join("stencil.toml");
    if toml_path.exists() {
        let s = fs::read_to_string(&toml_path).ok()?;
        return match toml::from_str::<StencilConfig>(&s) {
            Ok(cfg) => Some(cfg),
            Err(e) => {
                tracing::warn!(path = %toml_path.display(), error = %e, "ignoring malformed config");
                None
            }
        };
    }
    for yml in ["stencil.yaml", "stencil.yml"] {
        let p = root.join(yml);
        if p.exists() {
            let s = fs::read_to_string(&p).ok()?;
            return match serde_yaml::from_str::<StencilConfig>(&s) {
                Ok(cfg) => Some(cfg),
                Err(e) => {
                    tracing::warn!(path = %p.display(), error = %e, "ignoring malformed config");
                    None
                }
            };
        }
    }
    None
}

/// Resolve `Effective` by merging CLI flags, discovered config, and defaults.
pub fn resolve_effective(cli: &CliOverrides) -> Effective {
    let start = PathBuf::from(cli.repo_root.as_deref().unwrap_or("."));
    let repo_root = detect_repo_root(&start);
    let cfg = load_config(&repo_root).unwrap_or_default();
    let lint = cfg.lint.unwrap_or_default();
    let init = cfg.init.unwrap_or_default();
    let serve = cfg.serve.unwrap_or_default();

    let output = cli
        .output
        .clone()
        .or(cfg.output)
        .unwrap_or_else(|| "human".to_string());

    let targets = if cli.targets.is_empty() {
        lint.targets.unwrap_or_else(default_targets)
    } else {
        cli.targets.clone()
    };

    let out_dir = repo_root.join(
        cli.out_dir
            .clone()
            .or(lint.out_dir)
            .unwrap_or_else(|| DEFAULT_OUT_DIR.to_string()),
    );

    let linter = LinterCommand {
        program: cli
            .linter
            .clone()
            .or(lint.linter)
            .unwrap_or_else(|| DEFAULT_LINTER.to_string()),
        args: lint.args.unwrap_or_default(),
        jobs: cli.jobs.or(lint.jobs).unwrap_or_else(default_jobs).max(1),
    };

    let templates = cli
        .templates
        .clone()
        .or(lint.templates)
        .map(|t| repo_root.join(t));

    let placeholder = init
        .placeholder
        .unwrap_or_else(|| DEFAULT_PLACEHOLDER.to_string());

    let host = cli
        .host
        .clone()
        .or(serve.host)
        .unwrap_or_else(|| DEFAULT_HOST.to_string());
    let port = cli.port.or(serve.port).unwrap_or(DEFAULT_PORT);
    let project = cli
        .project
        .clone()
        .or(serve.project)
        .unwrap_or_else(|| placeholder.clone());
    let excludes = serve.excludes.unwrap_or_else(default_excludes);

    Effective {
        repo_root,
        output,
        targets,
        out_dir,
        linter,
        templates,
        placeholder,
        host,
        port,
        project,
        excludes,
    }
}
