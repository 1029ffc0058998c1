//! CLI argument parsing via `clap`.

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "stencil",
    version,
    about = "Project template companion",
    long_about = "Stencil — lint reports, one-shot project initialization, and introspection endpoints for the project template.\n\nConfiguration precedence: CLI > stencil.toml > defaults.",
    after_help = "Examples:\n  stencil init --name acme --no-microservice\n  stencil lint\n  stencil lint acme tests --out-dir build/lint --output json\n  stencil report --name acme --input pylint.txt\n  stencil serve --port 8080",
    arg_required_else_help = true
)]
/// Top-level CLI options and subcommands.
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand)]
/// Supported subcommands.
pub enum Commands {
    /// Show version
    #[command(about = "Show version", long_about = "Print the current stencil version.")]
    Version,
    /// Lint targets and write HTML reports
    #[command(
        about = "Run the linter and write HTML reports",
        long_about = "Run the linter on every target, write <out-dir>/<target>.html per target and <out-dir>/index.html. Exits 1 when any linter run reports issues.",
        after_help = "Examples:\n  stencil lint\n  stencil lint 'pkgs/*' tests --jobs 4"
    )]
    Lint {
        #[arg(help = "Paths or glob patterns to lint (default: [lint].targets)")]
        targets: Vec<String>,
        #[arg(long, help = "Repository root (default: current dir)")]
        repo_root: Option<String>,
        #[arg(long, help = "Output mode: human|json (default: human)")]
        output: Option<String>,
        #[arg(long, help = "Directory for HTML reports (default: results/pylint)")]
        out_dir: Option<String>,
        #[arg(long, help = "Linter program (default: pylint)")]
        linter: Option<String>,
        #[arg(long, help = "Worker count passed to the linter (default: CPU count)")]
        jobs: Option<usize>,
        #[arg(long, help = "Directory holding module.html and index.html templates")]
        templates: Option<String>,
    },
    /// Render reports from captured linter output
    #[command(
        about = "Render a report from saved linter output",
        long_about = "Parse linter output from a file (or '-' for stdin) and write <out-dir>/<name>.html plus an index.",
        after_help = "Examples:\n  pylint acme > lint.txt; stencil report --name acme --input lint.txt"
    )]
    Report {
        #[arg(long, help = "Module name used for the report file")]
        name: String,
        #[arg(long, default_value = "-", help = "Linter output file, '-' for stdin")]
        input: String,
        #[arg(long, help = "Repository root (default: current dir)")]
        repo_root: Option<String>,
        #[arg(long, help = "Output mode: human|json (default: human)")]
        output: Option<String>,
        #[arg(long, help = "Directory for HTML reports (default: results/pylint)")]
        out_dir: Option<String>,
        #[arg(long, help = "Directory holding module.html and index.html templates")]
        templates: Option<String>,
    },
    /// Initialize a project from the template
    #[command(
        about = "Initialize the template for a new project",
        long_about = "Rename the placeholder package, update test and linter configuration, and drop files the project does not need. Prompts for missing values.",
        after_help = "Examples:\n  stencil init\n  stencil init --name acme --microservice --dry-run"
    )]
    Init {
        #[arg(long, help = "Project (package) name")]
        name: Option<String>,
        #[arg(long, action = clap::ArgAction::SetTrue, conflicts_with = "no_microservice", help = "Keep the web-service files")]
        microservice: bool,
        #[arg(long, action = clap::ArgAction::SetTrue, help = "Remove the web-service files")]
        no_microservice: bool,
        #[arg(long, action = clap::ArgAction::SetTrue, help = "Show planned changes without touching files")]
        dry_run: bool,
        #[arg(long, help = "Repository root (default: current dir)")]
        repo_root: Option<String>,
        #[arg(long, help = "Output mode: human|json (default: human)")]
        output: Option<String>,
    },
    /// Serve /version and /sitemap
    #[command(
        about = "Serve the introspection endpoints",
        long_about = "Serve GET /version and GET /sitemap over HTTP until interrupted."
    )]
    Serve {
        #[arg(long, help = "Bind address (default: 0.0.0.0)")]
        host: Option<String>,
        #[arg(long, help = "Port (default: 5000)")]
        port: Option<u16>,
        #[arg(long, help = "Application name (default: [init].placeholder)")]
        project: Option<String>,
        #[arg(long, help = "Repository root (default: current dir)")]
        repo_root: Option<String>,
    },
}
