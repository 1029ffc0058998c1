//! Scaffold initializer: turn the freshly cloned template into a project.
//!
//! The template ships a placeholder package (`package` by default) plus demo
//! and web-service files. Initialization renames the package, rewrites the
//! few files that mention it, and removes whatever the chosen configuration
//! does not need. Steps are planned first and then applied, so a dry run
//! reports exactly what a real run would touch.

use crate::error::{Result, StencilError};
use regex::Regex;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Markers delimiting microservice-only blocks in `__main__.py`.
pub const MICROSERVICE_START: &str = "#### START MICROSERVICE";
pub const MICROSERVICE_END: &str = "#### END MICROSERVICE";

#[derive(Debug, Clone)]
pub struct InitOptions {
    pub project: String,
    pub placeholder: String,
    pub microservice: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// One filesystem change; paths are relative to the template root.
pub enum InitStep {
    Remove(PathBuf),
    Rename { from: PathBuf, to: PathBuf },
    Replace { file: PathBuf, find: String, replace: String },
    StripBlocks { file: PathBuf, start: String, end: String },
}

impl InitStep {
    fn kind(&self) -> &'static str {
        match self {
            InitStep::Remove(_) => "remove",
            InitStep::Rename { .. } => "rename",
            InitStep::Replace { .. } => "replace",
            InitStep::StripBlocks { .. } => "strip",
        }
    }

    fn path(&self) -> &Path {
        match self {
            InitStep::Remove(p) => p,
            InitStep::Rename { from, .. } => from,
            InitStep::Replace { file, .. } => file,
            InitStep::StripBlocks { file, .. } => file,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
/// Outcome of one step.
pub struct InitAction {
    pub step: String,
    pub path: String,
    pub detail: String,
    pub wrote: bool,
    pub would_write: bool,
    pub skipped: bool,
}

/// Check that `name` can serve as a package name.
pub fn validate_project_name(name: &str, placeholder: &str) -> Result<()> {
    let re = Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").map_err(|e| StencilError::Other(e.to_string()))?;
    if !re.is_match(name) || name == placeholder {
        return Err(StencilError::InvalidProjectName(name.to_string()));
    }
    Ok(())
}

/// Build the ordered step list for `opts`.
pub fn plan(opts: &InitOptions) -> Vec<InitStep> {
    let ph = opts.placeholder.as_str();
    let p = opts.project.as_str();
    let mut steps = vec![
        InitStep::Remove(PathBuf::from(format!("{ph}/dummy.py"))),
        InitStep::Remove(PathBuf::from("tests/dummy_test.py")),
        InitStep::Rename {
            from: PathBuf::from(ph),
            to: PathBuf::from(p),
        },
        InitStep::Replace {
            file: PathBuf::from("tests/__init__.py"),
            find: ph.to_string(),
            replace: p.to_string(),
        },
        InitStep::Replace {
            file: PathBuf::from("tests/pylint_test.py"),
            find: format!("PROJECT_NAME=\"{ph}\""),
            replace: format!("PROJECT_NAME=\"{p}\""),
        },
        InitStep::Replace {
            file: PathBuf::from("nose.cfg"),
            find: format!("cover-package={ph},tests"),
            replace: format!("cover-package={p},tests"),
        },
        InitStep::Replace {
            file: PathBuf::from("pylintrc"),
            find: format!("sys.path.insert[0](\"./{ph}\")"),
            replace: format!("sys.path.insert[0](\"./{p}\")"),
        },
    ];
    if !opts.microservice {
        steps.push(InitStep::StripBlocks {
            file: PathBuf::from(format!("{p}/__main__.py")),
            start: MICROSERVICE_START.to_string(),
            end: MICROSERVICE_END.to_string(),
        });
        for f in [
            format!("{p}/builder.py"),
            format!("{p}/service.py"),
            "tests/service_test.py".to_string(),
        ] {
            steps.push(InitStep::Remove(PathBuf::from(f)));
        }
    }
    steps
}

/// Remove every line from a `start` marker line through the next `end`
/// marker line, inclusive. An unterminated block runs to end of file.
pub fn strip_blocks(text: &str, start: &str, end: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut inside = false;
    for line in text.split_inclusive('\n') {
        let trimmed = line.trim_start();
        if !inside && trimmed.starts_with(start) {
            inside = true;
            continue;
        }
        if inside {
            if trimmed.starts_with(end) {
                inside = false;
            }
            continue;
        }
        out.push_str(line);
    }
    out
}

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| StencilError::io(e, path))
}

fn write(path: &Path, body: &str) -> Result<()> {
    fs::write(path, body).map_err(|e| StencilError::io(e, path))
}

fn rename_target_free(src: &Path, dst: &Path) -> Result<()> {
    if dst.exists() {
        return Err(StencilError::Other(format!(
            "cannot rename {} to {}: target exists",
            src.display(),
            dst.display()
        )));
    }
    Ok(())
}

/// Reject plans whose renames would fail, before any step touches disk.
pub fn preflight(root: &Path, steps: &[InitStep]) -> Result<()> {
    for step in steps {
        if let InitStep::Rename { from, to } = step {
            let src = root.join(from);
            if src.exists() {
                rename_target_free(&src, &root.join(to))?;
            }
        }
    }
    Ok(())
}

/// Apply one step under `root`. Missing sources are skipped, not errors;
/// with `write = false` nothing on disk changes.
fn apply_step(root: &Path, step: &InitStep, write_enabled: bool) -> Result<InitAction> {
    let mut action = InitAction {
        step: step.kind().to_string(),
        path: step.path().to_string_lossy().to_string(),
        detail: String::new(),
        wrote: false,
        would_write: false,
        skipped: false,
    };
    match step {
        InitStep::Remove(rel) => {
            let path = root.join(rel);
            if !path.exists() {
                action.skipped = true;
                return Ok(action);
            }
            action.would_write = true;
            if write_enabled {
                let res = if path.is_dir() {
                    fs::remove_dir_all(&path)
                } else {
                    fs::remove_file(&path)
                };
                res.map_err(|e| StencilError::io(e, &path))?;
                action.wrote = true;
            }
        }
        InitStep::Rename { from, to } => {
            action.detail = to.to_string_lossy().to_string();
            let src = root.join(from);
            if !src.exists() {
                action.skipped = true;
                return Ok(action);
            }
            let dst = root.join(to);
            rename_target_free(&src, &dst)?;
            action.would_write = true;
            if write_enabled {
                fs::rename(&src, &dst).map_err(|e| StencilError::io(e, &src))?;
                action.wrote = true;
            }
        }
        InitStep::Replace { file, find, replace } => {
            action.detail = format!("{find} -> {replace}");
            let path = root.join(file);
            if !path.is_file() {
                tracing::warn!(path = %path.display(), "file to update not found; skipping");
                action.skipped = true;
                return Ok(action);
            }
            let original = read(&path)?;
            let updated = original.replace(find.as_str(), replace);
            action.would_write = updated != original;
            if write_enabled && action.would_write {
                write(&path, &updated)?;
                action.wrote = true;
            }
        }
        InitStep::StripBlocks { file, start, end } => {
            action.detail = format!("{start} .. {end}");
            let path = root.join(file);
            if !path.is_file() {
                tracing::warn!(path = %path.display(), "file to strip not found; skipping");
                action.skipped = true;
                return Ok(action);
            }
            let original = read(&path)?;
            let updated = strip_blocks(&original, start, end);
            action.would_write = updated != original;
            if write_enabled && action.would_write {
                write(&path, &updated)?;
                action.wrote = true;
            }
        }
    }
    Ok(action)
}

/// Apply steps in order and report what happened.
///
/// In a dry run later steps see the untouched tree, so a replace inside the
/// renamed package is evaluated against the placeholder path instead.
pub fn apply(root: &Path, steps: &[InitStep], write_enabled: bool) -> Result<Vec<InitAction>> {
    let mut actions = Vec::with_capacity(steps.len());
    let mut renames: Vec<(PathBuf, PathBuf)> = Vec::new();
    for step in steps {
        let effective = if write_enabled {
            step.clone()
        } else {
            redirect_for_dry_run(step, &renames)
        };
        let mut action = apply_step(root, &effective, write_enabled)?;
        action.path = step.path().to_string_lossy().to_string();
        if let InitStep::Rename { from, to } = step {
            if action.would_write {
                renames.push((to.clone(), from.clone()));
            }
        }
        tracing::debug!(step = %action.step, path = %action.path, wrote = action.wrote, "init step");
        actions.push(action);
    }
    Ok(actions)
}

/// Map a path below a planned rename target back to its current location.
fn redirect_for_dry_run(step: &InitStep, renames: &[(PathBuf, PathBuf)]) -> InitStep {
    let map = |p: &Path| -> PathBuf {
        for (to, from) in renames {
            if let Ok(rest) = p.strip_prefix(to) {
                return from.join(rest);
            }
        }
        p.to_path_buf()
    };
    match step {
        InitStep::Remove(p) => InitStep::Remove(map(p)),
        InitStep::Replace { file, find, replace } => InitStep::Replace {
            file: map(file),
            find: find.clone(),
            replace: replace.clone(),
        },
        InitStep::StripBlocks { file, start, end } => InitStep::StripBlocks {
            file: map(file),
            start: start.clone(),
            end: end.clone(),
        },
        InitStep::Rename { .. } => step.clone(),
    }
}

/// Validate, plan and apply in one call.
pub fn run_init(root: &Path, opts: &InitOptions, write_enabled: bool) -> Result<Vec<InitAction>> {
    validate_project_name(&opts.project, &opts.placeholder)?;
    let steps = plan(opts);
    tracing::info!(project = %opts.project, steps = steps.len(), dry_run = !write_enabled, "initializing project");
    preflight(root, &steps)?;
    apply(root, &steps, write_enabled)
}
