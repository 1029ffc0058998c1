//! Stencil CLI binary entry point.
//! Delegates to library modules and prints results.

use clap::Parser;
use dialoguer::{Confirm, Input};
use std::io::Read;
use std::path::PathBuf;
use stencil::cli::{Cli, Commands};
use stencil::config::{self, CliOverrides, Effective};
use stencil::error::{Result, StencilError};
use stencil::utils::{error_prefix, info_prefix, note_prefix};
use stencil::{init, lint, output, service};
use tracing_subscriber::EnvFilter;

fn main() {
    // STENCIL_LOG=debug for verbose logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("STENCIL_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let code = match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {}", error_prefix(), e);
            2
        }
    };
    std::process::exit(code);
}

fn resolve(cli: CliOverrides) -> Effective {
    let eff = config::resolve_effective(&cli);
    if config::load_config(&eff.repo_root).is_none() {
        eprintln!("{} No stencil.toml found; using defaults.", note_prefix());
    }
    eff
}

fn run(cli: Cli) -> Result<i32> {
    match cli.cmd {
        Commands::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
            Ok(0)
        }
        Commands::Lint {
            targets,
            repo_root,
            output,
            out_dir,
            linter,
            jobs,
            templates,
        } => {
            let eff = resolve(CliOverrides {
                repo_root,
                output,
                targets,
                out_dir,
                linter,
                jobs,
                templates,
                ..Default::default()
            });
            let outcome = lint::run_lint(&eff)?;
            output::print_lint(&outcome, &eff.output);
            Ok(if outcome.passed() { 0 } else { 1 })
        }
        Commands::Report {
            name,
            input,
            repo_root,
            output,
            out_dir,
            templates,
        } => {
            let eff = resolve(CliOverrides {
                repo_root,
                output,
                out_dir,
                templates,
                ..Default::default()
            });
            let raw = read_input(&input)?;
            let outcome = lint::run_report(&eff, &name, &raw)?;
            output::print_lint(&outcome, &eff.output);
            Ok(0)
        }
        Commands::Init {
            name,
            microservice,
            no_microservice,
            dry_run,
            repo_root,
            output,
        } => {
            let eff = resolve(CliOverrides {
                repo_root,
                output,
                ..Default::default()
            });
            let project = match name {
                Some(n) => n,
                None => Input::<String>::new()
                    .with_prompt("Please give your project name")
                    .interact_text()
                    .map_err(|e| StencilError::Prompt(e.to_string()))?,
            };
            let microservice = if microservice {
                true
            } else if no_microservice {
                false
            } else {
                Confirm::new()
                    .with_prompt("Do you want to build a microservice?")
                    .default(true)
                    .interact()
                    .map_err(|e| StencilError::Prompt(e.to_string()))?
            };
            let opts = init::InitOptions {
                project,
                placeholder: eff.placeholder.clone(),
                microservice,
            };
            let actions = init::run_init(&eff.repo_root, &opts, !dry_run)?;
            output::print_init(&actions, &eff.output, dry_run);
            Ok(0)
        }
        Commands::Serve {
            host,
            port,
            project,
            repo_root,
        } => {
            let eff = resolve(CliOverrides {
                repo_root,
                host,
                port,
                project,
                ..Default::default()
            });
            let app = service::make_app(&eff.project, eff.repo_root.clone());
            eprintln!(
                "{} Serving {} on http://{}:{}",
                info_prefix(),
                app.name,
                eff.host,
                eff.port
            );
            service::server::serve(&app, &eff.excludes, &eff.host, eff.port)?;
            Ok(0)
        }
    }
}

fn read_input(input: &str) -> Result<String> {
    if input == "-" {
        let mut s = String::new();
        std::io::stdin()
            .read_to_string(&mut s)
            .map_err(|e| StencilError::io(e, "<stdin>"))?;
        return Ok(s);
    }
    let path = PathBuf::from(input);
    std::fs::read_to_string(&path).map_err(|e| StencilError::io(e, path))
}
