//! Shared data models for parsed findings and per-module summaries.

pub mod finding;

pub use finding::{Category, Finding};

use serde::Serialize;
use std::collections::BTreeMap;

/// Parsed linter output: module name -> findings ordered by line.
pub type ParsedReport = BTreeMap<String, Vec<Finding>>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
/// Highest-severity label for a module. `Ok` means nothing was counted.
pub enum State {
    #[default]
    Ok,
    Convention,
    Refactor,
    Warning,
    Error,
    Fatal,
}

impl State {
    pub fn as_str(self) -> &'static str {
        match self {
            State::Ok => "ok",
            State::Convention => "convention",
            State::Refactor => "refactor",
            State::Warning => "warning",
            State::Error => "error",
            State::Fatal => "fatal",
        }
    }
}

impl From<Category> for State {
    fn from(c: Category) -> Self {
        match c {
            Category::Convention => State::Convention,
            Category::Refactor => State::Refactor,
            Category::Warning => State::Warning,
            Category::Error => State::Error,
            Category::Fatal => State::Fatal,
        }
    }
}

impl std::fmt::Display for State {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
/// Per-module finding counts plus the derived state.
pub struct SummaryEntry {
    pub convention: usize,
    pub refactor: usize,
    pub warning: usize,
    pub error: usize,
    pub fatal: usize,
    pub state: State,
}

impl SummaryEntry {
    pub fn count(&self, c: Category) -> usize {
        match c {
            Category::Convention => self.convention,
            Category::Refactor => self.refactor,
            Category::Warning => self.warning,
            Category::Error => self.error,
            Category::Fatal => self.fatal,
        }
    }

    pub(crate) fn bump(&mut self, c: Category) {
        match c {
            Category::Convention => self.convention += 1,
            Category::Refactor => self.refactor += 1,
            Category::Warning => self.warning += 1,
            Category::Error => self.error += 1,
            Category::Fatal => self.fatal += 1,
        }
    }

    pub fn total(&self) -> usize {
        Category::ALL.iter().map(|c| self.count(*c)).sum()
    }
}
