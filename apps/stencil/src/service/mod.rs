//! Introspection endpoints of the skeleton web service.
//!
//! - `GET /version`: version string built from git metadata.
//! - `GET /sitemap`: JSON list of `{url, methods}` for registered routes,
//!   minus the configured exclusions.

pub mod app;
pub mod server;
pub mod version;

pub use app::{make_app, App, SitemapEntry};
