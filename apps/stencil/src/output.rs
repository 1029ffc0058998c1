//! Output rendering for lint, report, and init commands.
//!
//! Supports `human` (default) and `json` outputs. The JSON form includes
//! per-item fields and a top-level summary.

use crate::init::InitAction;
use crate::lint::LintOutcome;
use crate::models::State;
use crate::utils::{rel_to_wd, use_colors};
use owo_colors::OwoColorize;
use serde_json::json;
use serde_json::Value as JsonVal;

fn state_label(state: State, color: bool) -> String {
    let label = format!("⟦{}⟧", state);
    if !color {
        return label;
    }
    match state {
        State::Ok => label.green().bold().to_string(),
        State::Convention | State::Refactor => label.blue().bold().to_string(),
        State::Warning => label.yellow().bold().to_string(),
        State::Error | State::Fatal => label.red().bold().to_string(),
    }
}

fn print_json(value: &JsonVal) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{}", s),
        Err(e) => eprintln!("{} {}", crate::utils::error_prefix(), e),
    }
}

/// Print one line per lint target followed by a summary.
pub fn print_lint(res: &LintOutcome, output: &str) {
    match output {
        "json" => print_json(&compose_lint_json(res)),
        _ => {
            let color = use_colors(output);
            for t in &res.targets {
                let icon = if t.status == 0 {
                    "✔".green().to_string()
                } else {
                    "✖".red().to_string()
                };
                let target = if color {
                    t.target.clone().bold().to_string()
                } else {
                    t.target.clone()
                };
                let s = &t.summary;
                println!(
                    "{} {} {} ❲C={} R={} W={} E={} F={}❳ — {}",
                    icon,
                    state_label(s.state, color),
                    target,
                    s.convention,
                    s.refactor,
                    s.warning,
                    s.error,
                    s.fatal,
                    rel_to_wd(std::path::Path::new(&t.report))
                );
            }
            let summary = format!(
                "— Summary — targets={} failed={} worst={} index={}",
                res.targets.len(),
                res.targets.iter().filter(|t| t.status != 0).count(),
                res.registry.worst_state(),
                rel_to_wd(std::path::Path::new(&res.index))
            );
            if color {
                println!("{}", summary.bold());
            } else {
                println!("{}", summary);
            }
        }
    }
}

/// Print init actions: what was (or would be) changed and what was skipped.
pub fn print_init(actions: &[InitAction], output: &str, dry_run: bool) {
    match output {
        "json" => print_json(&compose_init_json(actions, dry_run)),
        _ => {
            let color = use_colors(output);
            for a in actions {
                let detail = if a.detail.is_empty() {
                    String::new()
                } else {
                    format!(" ({})", a.detail)
                };
                let (tag, line) = if a.skipped {
                    ("⏭️  skipped (missing):", format!("{} {}", a.step, a.path))
                } else if a.wrote {
                    ("✏️  applied:", format!("{} {}{}", a.step, a.path, detail))
                } else if a.would_write {
                    ("📋 planned:", format!("{} {}{}", a.step, a.path, detail))
                } else {
                    ("no changes:", format!("{} {}", a.step, a.path))
                };
                let tag = if !color {
                    tag.to_string()
                } else if a.skipped {
                    tag.yellow().bold().to_string()
                } else if a.wrote || a.would_write {
                    tag.green().bold().to_string()
                } else {
                    tag.bright_black().to_string()
                };
                println!("{} {}", tag, line);
            }
        }
    }
}

/// Compose lint JSON object (pure) for testing/snapshot purposes.
pub fn compose_lint_json(res: &LintOutcome) -> JsonVal {
    let items: Vec<_> = res
        .targets
        .iter()
        .map(|t| {
            json!({
                "target": t.target,
                "status": t.status,
                "state": t.summary.state,
                "counts": {
                    "convention": t.summary.convention,
                    "refactor": t.summary.refactor,
                    "warning": t.summary.warning,
                    "error": t.summary.error,
                    "fatal": t.summary.fatal,
                },
                "report": t.report,
            })
        })
        .collect();
    let summary = json!({
        "targets": res.targets.len(),
        "failed": res.targets.iter().filter(|t| t.status != 0).count(),
        "worst": res.registry.worst_state(),
        "index": res.index,
    });
    json!({"results": items, "summary": summary})
}

/// Compose init JSON object (pure) for testing/snapshot purposes.
pub fn compose_init_json(actions: &[InitAction], dry_run: bool) -> JsonVal {
    let summary = json!({
        "dry_run": dry_run,
        "wrote": actions.iter().filter(|a| a.wrote).count(),
        "planned": actions.iter().filter(|a| a.would_write).count(),
        "skipped": actions.iter().filter(|a| a.skipped).count(),
        "total": actions.len(),
    });
    json!({"results": actions, "summary": summary})
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lint::TargetOutcome;
    use crate::report::summary::{summarize, Registry};
    use crate::report::parser::parse_report;

    #[test]
    fn test_compose_lint_json_shape() {
        let parsed = parse_report("************* Module a\nW:warning:W1:1:0:o:m:s\n");
        let entry = summarize(parsed.values().flatten());
        let mut registry = Registry::new();
        registry.record("a", entry.clone());
        let res = LintOutcome {
            targets: vec![TargetOutcome {
                target: "a".into(),
                status: 4,
                summary: entry,
                report: "out/a.html".into(),
            }],
            index: "out/index.html".into(),
            registry,
        };
        let out = compose_lint_json(&res);
        assert_eq!(out["results"][0]["state"], "warning");
        assert_eq!(out["results"][0]["counts"]["warning"], 1);
        assert_eq!(out["summary"]["failed"], 1);
        assert_eq!(out["summary"]["worst"], "warning");
    }

    #[test]
    fn test_compose_init_json_counts() {
        let mk = |wrote, would_write, skipped| InitAction {
            step: "remove".into(),
            path: "p".into(),
            detail: String::new(),
            wrote,
            would_write,
            skipped,
        };
        let actions = vec![mk(false, true, false), mk(false, false, true)];
        let out = compose_init_json(&actions, true);
        assert_eq!(out["summary"]["planned"], 1);
        assert_eq!(out["summary"]["skipped"], 1);
        assert_eq!(out["summary"]["wrote"], 0);
        assert_eq!(out["results"][1]["skipped"], true);
    }
}
