//! HTML rendering of module reports and the overview index.
//!
//! Parsing and aggregation only build JSON contexts; the actual templating
//! sits behind [`Renderer`] so another engine can be plugged in.

use crate::error::{Result, StencilError};
use crate::models::{Category, ParsedReport};
use crate::report::summary::Registry;
use handlebars::Handlebars;
use serde_json::{json, Value as Json};
use std::fs;
use std::path::{Path, PathBuf};

pub const MODULE_TEMPLATE: &str = "module.html";
pub const INDEX_TEMPLATE: &str = "index.html";
pub const INDEX_FILE: &str = "index.html";

const BUILTIN_MODULE: &str = include_str!("../../templates/module.html");
const BUILTIN_INDEX: &str = include_str!("../../templates/index.html");

/// Turns a named template plus context into text.
pub trait Renderer {
    fn render(&self, template: &str, context: &Json) -> Result<String>;
}

/// Handlebars-backed renderer holding the module and index templates.
pub struct HandlebarsRenderer {
    registry: Handlebars<'static>,
}

impl HandlebarsRenderer {
    /// Renderer using the templates compiled into the binary.
    pub fn builtin() -> Result<Self> {
        Self::from_sources(BUILTIN_MODULE, BUILTIN_INDEX)
    }

    /// Renderer loading `module.html` and `index.html` from `dir`.
    ///
    /// Both templates must exist; a missing one is a configuration error.
    pub fn from_dir(dir: &Path) -> Result<Self> {
        let load = |name: &str| -> Result<String> {
            let path = dir.join(name);
            if !path.is_file() {
                return Err(StencilError::TemplateMissing {
                    name: name.to_string(),
                    dir: dir.to_path_buf(),
                });
            }
            fs::read_to_string(&path).map_err(|e| StencilError::io(e, path))
        };
        let module = load(MODULE_TEMPLATE)?;
        let index = load(INDEX_TEMPLATE)?;
        tracing::debug!(dir = %dir.display(), "loaded report templates");
        Self::from_sources(&module, &index)
    }

    /// Pick the template directory when configured, otherwise the built-ins.
    pub fn resolve(dir: Option<&Path>) -> Result<Self> {
        match dir {
            Some(d) => Self::from_dir(d),
            None => Self::builtin(),
        }
    }

    fn from_sources(module: &str, index: &str) -> Result<Self> {
        let mut registry = Handlebars::new();
        registry.set_strict_mode(true);
        registry.register_template_string(MODULE_TEMPLATE, module)?;
        registry.register_template_string(INDEX_TEMPLATE, index)?;
        Ok(Self { registry })
    }
}

impl Renderer for HandlebarsRenderer {
    fn render(&self, template: &str, context: &Json) -> Result<String> {
        Ok(self.registry.render(template, context)?)
    }
}

/// File name used for a module's report. Path separators are flattened so
/// targets such as `src/pkg` stay inside the output directory.
pub fn report_file_name(module_name: &str) -> String {
    let flat = module_name.replace(['/', '\\'], "__");
    format!("{}.html", flat)
}

/// Context for the per-module page: every parsed submodule with findings.
pub fn module_context(module_name: &str, parsed: &ParsedReport) -> Json {
    let modules: Vec<Json> = parsed
        .iter()
        .map(|(name, findings)| json!({ "name": name, "findings": findings }))
        .collect();
    json!({
        "module_name": module_name,
        "modules": modules,
    })
}

/// Context for the index page: category table plus one row per module.
pub fn index_context(registry: &Registry) -> Json {
    let categories: Vec<Json> = Category::ALL
        .iter()
        .map(|c| json!({ "code": c.code(), "name": c.name() }))
        .collect();
    let reports: Vec<Json> = registry
        .iter()
        .map(|(module, entry)| {
            let counts: Vec<Json> = Category::ALL
                .iter()
                .map(|c| json!({ "code": c.code(), "count": entry.count(*c) }))
                .collect();
            json!({
                "module": module,
                "file": report_file_name(module),
                "counts": counts,
                "state": entry.state.as_str(),
            })
        })
        .collect();
    json!({ "categories": categories, "reports": reports })
}

fn write_output(out_dir: &Path, file: &str, body: &str) -> Result<PathBuf> {
    fs::create_dir_all(out_dir).map_err(|e| StencilError::io(e, out_dir))?;
    let path = out_dir.join(file);
    fs::write(&path, body).map_err(|e| StencilError::io(e, &path))?;
    Ok(path)
}

/// Render and write `<out_dir>/<module>.html`.
pub fn persist_module(
    renderer: &dyn Renderer,
    out_dir: &Path,
    module_name: &str,
    parsed: &ParsedReport,
) -> Result<PathBuf> {
    let html = renderer.render(MODULE_TEMPLATE, &module_context(module_name, parsed))?;
    let path = write_output(out_dir, &report_file_name(module_name), &html)?;
    tracing::info!(module = module_name, path = %path.display(), "wrote module report");
    Ok(path)
}

/// Render and write `<out_dir>/index.html` from the registry.
pub fn persist_index(renderer: &dyn Renderer, out_dir: &Path, registry: &Registry) -> Result<PathBuf> {
    let html = renderer.render(INDEX_TEMPLATE, &index_context(registry))?;
    let path = write_output(out_dir, INDEX_FILE, &html)?;
    tracing::info!(modules = registry.len(), path = %path.display(), "wrote index report");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::parser::parse_report;
    use crate::report::summary::summarize;
    use tempfile::tempdir;

    const RAW: &str = "************* Module foo\nC:convention:C0111:1:2:myobj:no docstring:missing-docstring\n";

    struct Echo;

    impl Renderer for Echo {
        fn render(&self, template: &str, context: &Json) -> Result<String> {
            Ok(format!("{}|{}", template, context))
        }
    }

    #[test]
    fn test_builtin_module_page_lists_findings() {
        let r = HandlebarsRenderer::builtin().unwrap();
        let parsed = parse_report(RAW);
        let html = r.render(MODULE_TEMPLATE, &module_context("foo", &parsed)).unwrap();
        assert!(html.contains("<h1>foo</h1>"));
        assert!(html.contains("<td>myobj</td>"));
        assert!(html.contains("<td>missing-docstring</td>"));
    }

    #[test]
    fn test_builtin_escapes_html_in_messages() {
        let r = HandlebarsRenderer::builtin().unwrap();
        let parsed = parse_report("************* Module m\nW:warning:W1:1:0:o:bad <script>:sym\n");
        let html = r.render(MODULE_TEMPLATE, &module_context("m", &parsed)).unwrap();
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_render_twice_identical() {
        let dir = tempdir().unwrap();
        let r = HandlebarsRenderer::builtin().unwrap();
        let parsed = parse_report(RAW);
        let p = persist_module(&r, dir.path(), "foo", &parsed).unwrap();
        let first = fs::read_to_string(&p).unwrap();
        persist_module(&r, dir.path(), "foo", &parsed).unwrap();
        let second = fs::read_to_string(&p).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_index_lists_registry_rows() {
        let dir = tempdir().unwrap();
        let r = HandlebarsRenderer::builtin().unwrap();
        let mut reg = Registry::new();
        let parsed = parse_report(RAW);
        reg.record("foo", summarize(parsed.values().flatten()));
        reg.record("tests", summarize(std::iter::empty()));
        let p = persist_index(&r, dir.path(), &reg).unwrap();
        assert_eq!(p, dir.path().join("index.html"));
        let html = fs::read_to_string(p).unwrap();
        assert!(html.contains("<a href=\"foo.html\">foo</a>"));
        assert!(html.contains("Fatal Error"));
        assert!(html.contains("class=\"convention\""));
        assert!(html.contains("class=\"ok\""));
    }

    #[test]
    fn test_renderer_is_injectable() {
        let dir = tempdir().unwrap();
        let parsed = parse_report(RAW);
        let p = persist_module(&Echo, &dir.path().join("nested"), "pkg/sub", &parsed).unwrap();
        assert_eq!(p.file_name().unwrap(), "pkg__sub.html");
        let body = fs::read_to_string(p).unwrap();
        assert!(body.starts_with("module.html|"));
        assert!(body.contains("\"module_name\":\"pkg/sub\""));
    }

    #[test]
    fn test_from_dir_missing_template_is_error() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(MODULE_TEMPLATE), "{{module_name}}").unwrap();
        match HandlebarsRenderer::from_dir(dir.path()) {
            Err(StencilError::TemplateMissing { name, .. }) => assert_eq!(name, INDEX_TEMPLATE),
            other => panic!("expected missing template, got {:?}", other.err()),
        }
    }

    #[test]
    fn test_from_dir_uses_custom_templates() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(MODULE_TEMPLATE), "M={{module_name}}").unwrap();
        fs::write(dir.path().join(INDEX_TEMPLATE), "{{#each reports}}{{module}};{{/each}}").unwrap();
        let r = HandlebarsRenderer::resolve(Some(dir.path())).unwrap();
        let parsed = parse_report(RAW);
        assert_eq!(r.render(MODULE_TEMPLATE, &module_context("foo", &parsed)).unwrap(), "M=foo");
    }
}
