//! Error type shared by the report pipeline, initializer, and service.
//!
//! Parsing never fails (malformed linter lines are dropped); everything here
//! is fatal for the command that hit it.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StencilError {
    #[error("I/O error: {source} (path: {path})")]
    Io {
        source: std::io::Error,
        path: PathBuf,
    },

    #[error("failed to launch linter '{program}': {source}")]
    LinterLaunch {
        program: String,
        source: std::io::Error,
    },

    #[error("template '{name}' not found in {dir}")]
    TemplateMissing { name: String, dir: PathBuf },

    #[error("template error: {0}")]
    Template(#[from] handlebars::TemplateError),

    #[error("render error: {0}")]
    Render(#[from] handlebars::RenderError),

    #[error("invalid project name '{0}' (expected a valid identifier)")]
    InvalidProjectName(String),

    #[error("prompt failed: {0}")]
    Prompt(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, StencilError>;

impl StencilError {
    /// Attach the offending path to an I/O error.
    pub fn io(source: std::io::Error, path: impl Into<PathBuf>) -> Self {
        StencilError::Io {
            source,
            path: path.into(),
        }
    }
}

impl From<std::io::Error> for StencilError {
    fn from(source: std::io::Error) -> Self {
        StencilError::Io {
            source,
            path: PathBuf::from("<unknown>"),
        }
    }
}
