//! Integration test: parsed invocations through a recording step runner.

use std::io::Write;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use osaft_docker_cli::{build_tool, runner};
use osaft_docker_core::error::Result;
use osaft_docker_core::{EnvDefaults, OsaftError};
use osaft_docker_runtime::{DispatchMode, Dispatcher, Step, StepRunner};

/// Records every step; fails the engine step whose line contains `fail_on`.
#[derive(Clone, Default)]
struct Recorder {
    steps: Arc<Mutex<Vec<String>>>,
    fail_on: Option<&'static str>,
}

impl Recorder {
    fn failing(fail_on: &'static str) -> Self {
        Self {
            fail_on: Some(fail_on),
            ..Self::default()
        }
    }

    fn recorded(&self) -> Vec<String> {
        self.steps.lock().unwrap().clone()
    }
}

#[async_trait]
impl StepRunner for Recorder {
    async fn run(&self, step: &Step) -> Result<()> {
        let line = step.to_string();
        self.steps.lock().unwrap().push(line.clone());
        match self.fail_on {
            Some(needle) if matches!(step, Step::Engine(_)) && line.contains(needle) => {
                Err(OsaftError::EngineFailed {
                    command: line,
                    code: 125,
                })
            }
            _ => Ok(()),
        }
    }
}

fn env() -> EnvDefaults {
    EnvDefaults {
        tag: Some("19.01.19".to_string()),
        ..EnvDefaults::default()
    }
}

fn args(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

fn dispatcher(recorder: &Recorder) -> Dispatcher<Recorder> {
    Dispatcher::new(recorder.clone(), DispatchMode::default())
        .with_echo(Box::new(std::io::sink()))
}

async fn build(recorder: &Recorder, list: &[&str]) -> Result<()> {
    let invocation = build_tool::parse(&args(list), &env())?;
    let mut out: Vec<u8> = Vec::new();
    build_tool::execute(&invocation, &mut dispatcher(recorder), &mut out).await?;
    out.flush()?;
    Ok(())
}

async fn run(recorder: &Recorder, list: &[&str]) -> Result<String> {
    let invocation = runner::parse(&args(list), &EnvDefaults::default())?;
    let mut out: Vec<u8> = Vec::new();
    runner::execute(&invocation, &mut dispatcher(recorder), &mut out).await?;
    Ok(String::from_utf8(out).unwrap())
}

#[tokio::test]
async fn test_build_chain_and_cleanup() {
    let recorder = Recorder::default();
    build(
        &recorder,
        &["-workdir=/w", "-alias", "-archive=o.tar", "build"],
    )
    .await
    .unwrap();

    let steps = recorder.recorded();
    assert_eq!(steps.len(), 6);
    assert!(steps[0].starts_with("mkdir /w/o-saft-docker-"));
    assert!(steps[1].starts_with("cat > /w/o-saft-docker-"));
    assert!(steps[2].starts_with("docker build --force-rm --rm -f /w/o-saft-docker-"));
    assert_eq!(steps[3], "docker tag owasp/o-saft:19.01.19 owasp/o-saft:latest");
    assert_eq!(steps[4], "docker save -o o.tar owasp/o-saft:19.01.19");
    assert!(steps[5].starts_with("rm -rf /w/o-saft-docker-"));
}

#[tokio::test]
async fn test_failed_build_skips_tag_but_cleans_up() {
    let recorder = Recorder::failing(" build ");
    let err = build(&recorder, &["-alias", "build"]).await.unwrap_err();
    assert_eq!(err.exit_code(), 125);

    let steps = recorder.recorded();
    assert_eq!(steps.len(), 4);
    assert!(steps.iter().all(|s| !s.starts_with("docker tag")));
    assert!(steps[3].starts_with("rm -rf ./o-saft-docker-"));
}

#[tokio::test]
async fn test_load_then_delete_archive() {
    let recorder = Recorder::default();
    build(&recorder, &["-archive=o.tar", "-rm-archive", "load"])
        .await
        .unwrap();
    assert_eq!(
        recorder.recorded(),
        vec!["docker load -i o.tar", "rm -f o.tar"]
    );

    let recorder = Recorder::failing("load");
    build(&recorder, &["-archive=o.tar", "-clean", "load"])
        .await
        .unwrap_err();
    assert_eq!(recorder.recorded(), vec!["docker load -i o.tar"]);
}

#[tokio::test]
async fn test_pull_forwards_passthrough() {
    let recorder = Recorder::default();
    build(&recorder, &["-tag=9.9", "pull", "--platform", "linux/amd64"])
        .await
        .unwrap();
    assert_eq!(
        recorder.recorded(),
        vec!["docker pull owasp/o-saft:9.9 --platform linux/amd64"]
    );
}

#[tokio::test]
async fn test_status_stops_at_first_failure() {
    let recorder = Recorder::failing("image ls");
    let err = run(&recorder, &["status"]).await.unwrap_err();
    assert!(matches!(err, OsaftError::EngineFailed { code: 125, .. }));
    assert_eq!(recorder.recorded(), vec!["docker image ls owasp/o-saft"]);
}

#[tokio::test]
async fn test_runner_default_and_text_modes() {
    let recorder = Recorder::default();
    let text = run(&recorder, &["-id=3f2a9c", "+version"]).await.unwrap();
    assert!(text.is_empty());
    assert_eq!(
        recorder.recorded(),
        vec!["docker run --rm -it 3f2a9c +version"]
    );

    let recorder = Recorder::default();
    let text = run(&recorder, &["hacker"]).await.unwrap();
    assert!(text.contains("# rmi\ndocker image rm owasp/o-saft:latest\n"));
    assert!(recorder.recorded().is_empty());

    let text = run(&recorder, &["-help"]).await.unwrap();
    assert!(text.starts_with("Usage: o-saft-docker "));
}
