//! Integration test: config discovery from a nested working directory.
//!
//! Without `--repo-root` the start is `.`; discovery must still walk up to
//! the directory holding `stencil.toml`. Lives in its own test binary because
//! it changes the process working directory.

use std::process::Command;
use stencil::config::{resolve_effective, CliOverrides};
use tempfile::TempDir;

fn workspace() -> TempDir {
    let dir = TempDir::new().expect("failed to create temp dir");
    std::fs::write(
        dir.path().join("stencil.toml"),
        "[lint]\nout_dir = \"build/lint\"\n",
    )
    .expect("failed to write stencil.toml");
    std::fs::create_dir_all(dir.path().join("pkg/sub")).expect("failed to create pkg/sub");
    dir
}

#[test]
fn resolves_root_from_nested_working_dir() {
    let dir = workspace();
    let root = dir.path().canonicalize().unwrap();
    let before = std::env::current_dir().unwrap();
    std::env::set_current_dir(root.join("pkg/sub")).unwrap();
    let eff = resolve_effective(&CliOverrides::default());
    std::env::set_current_dir(before).unwrap();

    assert_eq!(eff.repo_root, root);
    assert_eq!(eff.out_dir, root.join("build/lint"));
}

#[test]
fn report_command_writes_under_discovered_root() {
    let dir = workspace();
    let input = dir.path().join("lint.txt");
    std::fs::write(
        &input,
        "************* Module foo\nC:convention:C0111:1:0:obj:no docstring:missing-docstring\n",
    )
    .unwrap();
    let output = Command::new(env!("CARGO_BIN_EXE_stencil"))
        .args(["report", "--name", "foo", "--input"])
        .arg(&input)
        .current_dir(dir.path().join("pkg/sub"))
        .output()
        .expect("failed to execute stencil");

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert!(dir.path().join("build/lint/foo.html").exists());
    assert!(dir.path().join("build/lint/index.html").exists());
    assert!(!dir.path().join("pkg/sub/results").exists());
}
