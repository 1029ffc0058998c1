//! Stencil core library.
//!
//! Companion tooling for the project template: lint reports, the one-shot
//! project initializer, and the introspection service.
//!
//! High-level modules:
//! - `cli`: CLI argument parsing (binary uses this).
//! - `config`: Discovery and effective configuration resolution.
//! - `linter`: External linter invocation.
//! - `report`: Linter output parsing, summaries, HTML rendering.
//! - `lint`: End-to-end pipeline over all targets.
//! - `init`: Template initialization (rename, rewrite, prune).
//! - `service`: `/version` and `/sitemap` endpoints.
//! - `models`: Findings, categories, summary entries.
//! - `output`: Human/JSON printers.
//! - `utils`: Supporting helpers.
pub mod cli;
pub mod config;
pub mod error;
pub mod init;
pub mod lint;
pub mod linter;
pub mod models;
pub mod output;
pub mod report;
pub mod service;
pub mod utils;
