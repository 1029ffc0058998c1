//! Per-module aggregation and the run-wide registry feeding the index page.

use crate::models::{Finding, State, SummaryEntry};
use serde::Serialize;
use std::collections::BTreeMap;

/// Count findings per known category and derive the module state.
///
/// Unknown category codes are ignored. The state is the most severe
/// category with a nonzero count, or `ok` when nothing was counted.
pub fn summarize<'a>(findings: impl IntoIterator<Item = &'a Finding>) -> SummaryEntry {
    let mut entry = SummaryEntry::default();
    for f in findings {
        if let Some(c) = f.known_category() {
            entry.bump(c);
        }
    }
    entry.state = derive_state(&entry);
    entry
}

/// Walk categories in ascending severity; each nonzero one overrides.
pub fn derive_state(entry: &SummaryEntry) -> State {
    let mut state = State::Ok;
    for c in crate::models::Category::ALL {
        if entry.count(c) > 0 {
            state = State::from(c);
        }
    }
    state
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
/// Summaries recorded during one run, keyed by module name.
///
/// Written once per module; recording an existing name replaces the old
/// entry. Read once at the end to render the index.
pub struct Registry {
    entries: BTreeMap<String, SummaryEntry>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, module: impl Into<String>, entry: SummaryEntry) {
        let module = module.into();
        if self.entries.insert(module.clone(), entry).is_some() {
            tracing::debug!(module = %module, "replaced existing summary entry");
        }
    }

    pub fn get(&self, module: &str) -> Option<&SummaryEntry> {
        self.entries.get(module)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &SummaryEntry)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Most severe state across all recorded modules.
    pub fn worst_state(&self) -> State {
        self.entries
            .values()
            .map(|e| e.state)
            .max()
            .unwrap_or(State::Ok)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Category;

    fn finding(code: &str) -> Finding {
        Finding::from_record(&format!("{code}:x:X0000:1:0:obj:msg:sym")).unwrap()
    }

    #[test]
    fn test_summarize_highest_category_wins() {
        let fs = vec![finding("C"), finding("W")];
        let entry = summarize(&fs);
        assert_eq!(entry.count(Category::Convention), 1);
        assert_eq!(entry.count(Category::Warning), 1);
        assert_eq!(entry.count(Category::Fatal), 0);
        assert_eq!(entry.state, State::Warning);
    }

    #[test]
    fn test_summarize_empty_is_ok() {
        let entry = summarize(&Vec::<Finding>::new());
        assert_eq!(entry.total(), 0);
        assert_eq!(entry.state, State::Ok);
    }

    #[test]
    fn test_summarize_ignores_unknown_codes() {
        let fs = vec![finding("I"), finding("R")];
        let entry = summarize(&fs);
        assert_eq!(entry.total(), 1);
        assert_eq!(entry.state, State::Refactor);
    }

    #[test]
    fn test_summarize_fatal_overrides_everything() {
        let fs = vec![finding("E"), finding("F"), finding("C"), finding("R")];
        assert_eq!(summarize(&fs).state, State::Fatal);
    }

    #[test]
    fn test_registry_record_overwrites() {
        let mut reg = Registry::new();
        reg.record("project", summarize(&vec![finding("E")]));
        reg.record("project", summarize(&vec![finding("C")]));
        assert_eq!(reg.len(), 1);
        assert_eq!(reg.get("project").unwrap().state, State::Convention);
        assert_eq!(reg.get("project").unwrap().error, 0);
    }

    #[test]
    fn test_registry_worst_state() {
        let mut reg = Registry::new();
        assert_eq!(reg.worst_state(), State::Ok);
        reg.record("a", summarize(&vec![finding("C")]));
        reg.record("b", summarize(&vec![finding("E")]));
        assert_eq!(reg.worst_state(), State::Error);
    }
}
