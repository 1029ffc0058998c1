//! Route table for the skeleton web service and its sitemap.

use serde::Serialize;
use std::path::PathBuf;

pub const STATIC_ROUTE: &str = "/static/<path:filename>";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Static,
    Version,
    Sitemap,
    /// Registered by callers; answers with an empty body.
    Custom,
}

#[derive(Debug, Clone)]
pub struct Route {
    pub url: String,
    pub methods: Vec<String>,
    pub endpoint: Endpoint,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
/// One sitemap row: url plus comma-joined methods.
pub struct SitemapEntry {
    pub url: String,
    pub methods: String,
}

#[derive(Debug, Clone)]
/// A named application with its routes.
///
/// Like common web frameworks, every app starts with a static-files route
/// and `GET` routes implicitly accept `HEAD` and `OPTIONS`.
pub struct App {
    pub name: String,
    pub root: PathBuf,
    routes: Vec<Route>,
}

impl App {
    pub fn new(name: impl Into<String>, root: impl Into<PathBuf>) -> Self {
        let mut app = Self {
            name: name.into(),
            root: root.into(),
            routes: Vec::new(),
        };
        app.add(STATIC_ROUTE, &["GET"], Endpoint::Static);
        app
    }

    fn add(&mut self, url: &str, methods: &[&str], endpoint: Endpoint) {
        let mut ms: Vec<String> = methods.iter().map(|m| m.to_ascii_uppercase()).collect();
        if ms.iter().any(|m| m == "GET") {
            ms.push("HEAD".into());
        }
        ms.push("OPTIONS".into());
        ms.sort();
        ms.dedup();
        self.routes.push(Route {
            url: url.to_string(),
            methods: ms,
            endpoint,
        });
    }

    /// Register a plain route.
    pub fn route(&mut self, url: &str, methods: &[&str]) -> &mut Self {
        self.add(url, methods, Endpoint::Custom);
        self
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// Exact-match lookup by request path.
    pub fn find(&self, path: &str) -> Option<&Route> {
        self.routes.iter().find(|r| r.url == path)
    }

    /// Routes sorted by url, skipping any listed in `excludes`.
    pub fn sitemap(&self, excludes: &[String]) -> Vec<SitemapEntry> {
        let mut entries: Vec<SitemapEntry> = self
            .routes
            .iter()
            .filter(|r| !excludes.iter().any(|e| e == &r.url))
            .map(|r| SitemapEntry {
                url: r.url.clone(),
                methods: r.methods.join(","),
            })
            .collect();
        entries.sort_by(|a, b| a.url.cmp(&b.url));
        entries
    }
}

/// Build the service app with `/version` and `/sitemap`.
pub fn make_app(project: &str, root: impl Into<PathBuf>) -> App {
    let mut app = App::new(project, root);
    app.add("/version", &["GET"], Endpoint::Version);
    app.add("/sitemap", &["GET"], Endpoint::Sitemap);
    app
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_excludes;

    #[test]
    fn test_sitemap_bare_app_default_excludes() {
        let app = App::new("test_app", ".");
        assert!(app.sitemap(&default_excludes()).is_empty());
    }

    #[test]
    fn test_sitemap_excludes() {
        let mut app = App::new("test_app", ".");
        app.route("/", &["GET"]);
        let all = app.sitemap(&[]);
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].url, "/");
        assert_eq!(all[0].methods, "GET,HEAD,OPTIONS");
        assert!(app.sitemap(&default_excludes()).is_empty());
    }

    #[test]
    fn test_make_app_sitemap_sorted() {
        let mut app = make_app("package", ".");
        app.route("/users", &["post", "GET"]);
        let urls: Vec<_> = app
            .sitemap(&default_excludes())
            .into_iter()
            .map(|e| (e.url, e.methods))
            .collect();
        assert_eq!(
            urls,
            vec![
                ("/sitemap".to_string(), "GET,HEAD,OPTIONS".to_string()),
                ("/users".to_string(), "GET,HEAD,OPTIONS,POST".to_string()),
                ("/version".to_string(), "GET,HEAD,OPTIONS".to_string()),
            ]
        );
        assert_eq!(app.find("/version").map(|r| r.endpoint), Some(Endpoint::Version));
        assert!(app.find("/nope").is_none());
    }
}
