//! Lint report generation: parse linter output, summarize, render HTML.
//!
//! A [`ReportGenerator`] covers one linter invocation (one target). Its
//! summary totals every module block found in that output and is recorded
//! into a caller-owned [`Registry`], which later drives the index page.

pub mod parser;
pub mod render;
pub mod summary;

use crate::error::Result;
use crate::models::{ParsedReport, SummaryEntry};
use render::Renderer;
use std::path::{Path, PathBuf};
use summary::Registry;

pub struct ReportGenerator {
    module_name: String,
    parsed: ParsedReport,
    summary: SummaryEntry,
}

impl ReportGenerator {
    /// Parse `raw` linter output for `module_name` and compute its summary.
    pub fn new(module_name: impl Into<String>, raw: &str) -> Self {
        let parsed = parser::parse_report(raw);
        let summary = summary::summarize(parsed.values().flatten());
        let module_name = module_name.into();
        tracing::debug!(
            module = %module_name,
            submodules = parsed.len(),
            state = %summary.state,
            "parsed linter output"
        );
        Self {
            module_name,
            parsed,
            summary,
        }
    }

    pub fn module_name(&self) -> &str {
        &self.module_name
    }

    pub fn parsed(&self) -> &ParsedReport {
        &self.parsed
    }

    pub fn summary(&self) -> &SummaryEntry {
        &self.summary
    }

    /// Store this run's summary, replacing any earlier entry for the module.
    pub fn record(&self, registry: &mut Registry) {
        registry.record(self.module_name.clone(), self.summary.clone());
    }

    /// Write `<out_dir>/<module>.html`.
    pub fn persist(&self, renderer: &dyn Renderer, out_dir: &Path) -> Result<PathBuf> {
        render::persist_module(renderer, out_dir, &self.module_name, &self.parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::State;
    use render::HandlebarsRenderer;
    use tempfile::tempdir;

    #[test]
    fn test_end_to_end_single_module() {
        let raw = "************* Module foo\nC:convention:C0111:1:2:myobj:no docstring:missing-docstring\n";
        let rg = ReportGenerator::new("foo", raw);
        assert_eq!(rg.parsed().len(), 1);
        let findings = &rg.parsed()["foo"];
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].category, "C");
        assert_eq!(findings[0].line, "1");
        assert_eq!(rg.summary().state, State::Convention);

        let dir = tempdir().unwrap();
        let renderer = HandlebarsRenderer::builtin().unwrap();
        let mut registry = Registry::new();
        rg.record(&mut registry);
        let page = rg.persist(&renderer, dir.path()).unwrap();
        assert_eq!(page, dir.path().join("foo.html"));
        let html = std::fs::read_to_string(page).unwrap();
        assert_eq!(html.matches("<tr class=\"C\">").count(), 1);
        assert!(html.contains("no docstring"));

        render::persist_index(&renderer, dir.path(), &registry).unwrap();
        assert!(dir.path().join("index.html").exists());
    }

    #[test]
    fn test_summary_totals_all_submodules() {
        let raw = "\
************* Module pkg.a
W:warning:W0611:1:0::Unused import os:unused-import
************* Module pkg.b
E:error:E1101:7:4:f:Instance has no member:no-member
C:convention:C0103:2:0::Invalid name:invalid-name
";
        let rg = ReportGenerator::new("pkg", raw);
        assert_eq!(rg.summary().warning, 1);
        assert_eq!(rg.summary().error, 1);
        assert_eq!(rg.summary().convention, 1);
        assert_eq!(rg.summary().state, State::Error);
    }

    #[test]
    fn test_clean_output_is_ok() {
        let rg = ReportGenerator::new("tests", "\n-----\nYour code has been rated at 10.00/10\n");
        assert!(rg.parsed().is_empty());
        assert_eq!(rg.summary().state, State::Ok);
    }
}
