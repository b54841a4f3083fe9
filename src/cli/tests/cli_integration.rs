//! Integration test: drive both binaries end to end.
//!
//! Engine calls are either printed (`-n`) or routed to `true`/`false`
//! through `OSAFT_ENGINE`, so no container engine is needed.
//!
//! ```bash
//! cargo test -p osaft-docker-cli --test cli_integration
//! ```

use std::path::Path;
use std::process::{Command, Output};

fn command(bin: &str, engine: &str) -> Command {
    let mut cmd = Command::new(bin);
    cmd.env_remove("OSAFT_REGISTRY")
        .env_remove("OSAFT_TAG")
        .env_remove("RUST_LOG")
        .env("OSAFT_ENGINE", engine)
        .env("DISPLAY", ":0");
    cmd
}

fn runner(args: &[&str]) -> Output {
    command(env!("CARGO_BIN_EXE_o-saft-docker"), "docker")
        .args(args)
        .output()
        .expect("run o-saft-docker")
}

fn build_tool(engine: &str, args: &[&str]) -> Output {
    command(env!("CARGO_BIN_EXE_o-saft-docker-build"), engine)
        .env("OSAFT_TAG", "19.01.19")
        .args(args)
        .output()
        .expect("run o-saft-docker-build")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

fn entries(dir: &Path) -> Vec<String> {
    std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .collect()
}

#[test]
fn test_runner_without_arguments() {
    let output = runner(&[]);
    assert_eq!(output.status.code(), Some(2));
    assert!(stdout(&output).starts_with("Usage: o-saft-docker "));
    assert!(!stdout(&output).contains("docker run"));
}

#[test]
fn test_runner_forwards_arguments() {
    let output = runner(&["-n", "-tag=9.9", "+check", "--header", "example.org"]);
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(
        stdout(&output),
        "docker run --rm -it owasp/o-saft:9.9 +check --header example.org\n"
    );
}

#[test]
fn test_runner_modes_in_dry_run() {
    let output = runner(&["-n", "status"]);
    assert_eq!(
        stdout(&output),
        "docker image ls owasp/o-saft\n\
         docker container ls -a --filter ancestor=owasp/o-saft:latest\n"
    );

    let output = runner(&["-n", "call"]);
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("**ERROR:"));
}

#[test]
fn test_runner_hacker_runs_nothing() {
    let output = runner(&["hacker"]);
    assert_eq!(output.status.code(), Some(0));
    let text = stdout(&output);
    assert!(text.contains("# gui\ndocker run --rm -it -e DISPLAY=:0"));
    assert!(text.contains("# build\ndocker build --force-rm --rm -f Dockerfile"));
}

#[test]
fn test_build_tool_without_mode_warns() {
    let output = build_tool("false", &["-debian"]);
    assert_eq!(output.status.code(), Some(4));
    assert!(stderr(&output).starts_with("**WARNING:"));
    assert!(stdout(&output).is_empty());
}

#[test]
fn test_build_tool_dry_run() {
    let dir = tempfile::tempdir().unwrap();
    let workdir = format!("-workdir={}", dir.path().display());
    let output = build_tool(
        "docker",
        &["-n", "-alpine", workdir.as_str(), "build", "--", "--no-cache"],
    );
    assert_eq!(output.status.code(), Some(0), "{}", stderr(&output));

    let text = stdout(&output);
    let lines: Vec<&str> = text.lines().collect();
    assert!(lines[0].starts_with(&format!("mkdir {}/o-saft-docker-", dir.path().display())));
    assert!(text.contains("FROM alpine:3.10\n"));
    assert!(text.contains("\nEOF\ndocker build --force-rm --rm -f "));
    assert!(text.contains(" -t owasp/o-saft:19.01.19 --no-cache "));
    assert!(lines.last().unwrap().starts_with("rm -rf "));
    assert!(entries(dir.path()).is_empty());
}

#[test]
fn test_build_tool_removes_workdir_after_engine_failure() {
    let dir = tempfile::tempdir().unwrap();
    let workdir = format!("-workdir={}", dir.path().display());
    let output = build_tool("false", &[workdir.as_str(), "build"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("**ERROR: Engine command failed"));
    assert!(entries(dir.path()).is_empty());
}

#[test]
fn test_build_tool_keeps_workdir_on_request() {
    let dir = tempfile::tempdir().unwrap();
    let workdir = format!("-workdir={}", dir.path().display());
    let output = build_tool("true", &[workdir.as_str(), "-keep-workdir", "-debian", "build"]);
    assert_eq!(output.status.code(), Some(0), "{}", stderr(&output));

    let kept = entries(dir.path());
    assert_eq!(kept.len(), 1);
    let recipe = std::fs::read_to_string(dir.path().join(&kept[0]).join("Dockerfile")).unwrap();
    assert!(recipe.starts_with("# O-Saft image, debian platform\nFROM debian:stable-slim\n"));
}

#[test]
fn test_build_tool_rejects_tampered_archive() {
    let dir = tempfile::tempdir().unwrap();
    let archive = dir.path().join("o-saft.tgz");
    std::fs::write(&archive, b"not the release").unwrap();
    let workdir = format!("-workdir={}", dir.path().display());
    let tar = format!("-tar-osaft={}", archive.display());
    let sha = format!("-sha-osaft={}", "ab".repeat(32));

    let output = build_tool("true", &[workdir.as_str(), tar.as_str(), sha.as_str(), "build"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("Checksum mismatch"));
    // nothing was staged
    assert_eq!(entries(dir.path()), vec!["o-saft.tgz"]);
}
