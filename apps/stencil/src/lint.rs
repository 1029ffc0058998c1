//! Lint pipeline: run the linter per target and write HTML reports.
//!
//! Linter processes for all targets run in parallel; parsing, registry
//! updates and rendering then happen sequentially in target order, so the
//! registry never sees concurrent writers.

use crate::config::Effective;
use crate::error::{Result, StencilError};
use crate::linter::{run_linter, LintRun};
use crate::models::SummaryEntry;
use crate::report::render::{self, HandlebarsRenderer, Renderer};
use crate::report::summary::Registry;
use crate::report::ReportGenerator;
use glob::glob;
use rayon::prelude::*;
use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize)]
/// Result for one lint target.
pub struct TargetOutcome {
    pub target: String,
    pub status: i32,
    pub summary: SummaryEntry,
    pub report: String,
}

#[derive(Debug, Serialize)]
/// Everything one `stencil lint` run produced.
pub struct LintOutcome {
    pub targets: Vec<TargetOutcome>,
    pub index: String,
    #[serde(skip)]
    pub registry: Registry,
}

impl LintOutcome {
    /// True when every linter invocation exited with status 0.
    pub fn passed(&self) -> bool {
        self.targets.iter().all(|t| t.status == 0)
    }
}

/// Expand target patterns relative to `root`.
///
/// Patterns without glob metacharacters are kept verbatim, even when they
/// do not exist, so the linter reports on them itself. Glob matches are
/// returned relative to `root`, sorted.
pub fn expand_targets(root: &Path, patterns: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for pat in patterns {
        if !pat.contains(['*', '?', '[']) {
            push_unique(&mut out, pat.clone());
            continue;
        }
        let abs = root.join(pat).to_string_lossy().to_string();
        let mut matched: Vec<PathBuf> = match glob(&abs) {
            Ok(paths) => paths.flatten().collect(),
            Err(e) => {
                tracing::warn!(pattern = %pat, error = %e, "invalid target pattern");
                continue;
            }
        };
        matched.sort();
        for p in matched {
            let rel = pathdiff::diff_paths(&p, root).unwrap_or(p);
            push_unique(&mut out, rel.to_string_lossy().to_string());
        }
    }
    out
}

fn push_unique(out: &mut Vec<String>, item: String) {
    if !out.contains(&item) {
        out.push(item);
    }
}

/// Fail when two targets would flatten onto the same report page.
pub fn check_report_names(targets: &[String]) -> Result<()> {
    let mut seen: HashMap<String, &str> = HashMap::new();
    for t in targets {
        let file = render::report_file_name(t);
        if let Some(prev) = seen.insert(file.clone(), t) {
            return Err(StencilError::Other(format!(
                "targets {prev} and {t} would both be written to {file}"
            )));
        }
    }
    Ok(())
}

/// Run the full pipeline with the built-in or configured templates.
pub fn run_lint(eff: &Effective) -> Result<LintOutcome> {
    let renderer = HandlebarsRenderer::resolve(eff.templates.as_deref())?;
    run_lint_with(eff, &renderer)
}

/// Run the full pipeline with an explicit renderer.
pub fn run_lint_with(eff: &Effective, renderer: &dyn Renderer) -> Result<LintOutcome> {
    let targets = expand_targets(&eff.repo_root, &eff.targets);
    check_report_names(&targets)?;
    tracing::info!(targets = ?targets, jobs = eff.linter.jobs, "linting");

    let runs: Vec<Result<(String, LintRun)>> = targets
        .par_iter()
        .map(|t| run_linter(&eff.linter, t, &eff.repo_root).map(|run| (t.clone(), run)))
        .collect();

    let mut registry = Registry::new();
    let mut outcomes = Vec::with_capacity(runs.len());
    for run in runs {
        let (target, run) = run?;
        let rg = ReportGenerator::new(target.clone(), &run.output);
        rg.record(&mut registry);
        let page = rg.persist(renderer, &eff.out_dir)?;
        outcomes.push(TargetOutcome {
            target,
            status: run.status,
            summary: rg.summary().clone(),
            report: page.to_string_lossy().to_string(),
        });
    }
    let index = render::persist_index(renderer, &eff.out_dir, &registry)?;
    Ok(LintOutcome {
        targets: outcomes,
        index: index.to_string_lossy().to_string(),
        registry,
    })
}

/// Report on already-captured linter output for a single module.
///
/// Writes `<module>.html` plus an index holding just this module.
pub fn run_report(eff: &Effective, module_name: &str, raw: &str) -> Result<LintOutcome> {
    let renderer = HandlebarsRenderer::resolve(eff.templates.as_deref())?;
    let mut registry = Registry::new();
    let rg = ReportGenerator::new(module_name, raw);
    rg.record(&mut registry);
    let page = rg.persist(&renderer, &eff.out_dir)?;
    let index = render::persist_index(&renderer, &eff.out_dir, &registry)?;
    Ok(LintOutcome {
        targets: vec![TargetOutcome {
            target: module_name.to_string(),
            status: 0,
            summary: rg.summary().clone(),
            report: page.to_string_lossy().to_string(),
        }],
        index: index.to_string_lossy().to_string(),
        registry,
    })
}
