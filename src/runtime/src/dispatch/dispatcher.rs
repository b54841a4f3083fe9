//! Sequential plan execution with dry-run and trace output.

use std::io::Write;

use osaft_docker_core::error::Result;

use super::runner::StepRunner;
use super::step::{Plan, Step};

/// How the dispatcher treats the steps it is given.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchMode {
    /// Print steps instead of running them
    pub dry_run: bool,
    /// Print each step before running it
    pub verbose: bool,
}

/// Runs plans one step at a time through a [`StepRunner`].
pub struct Dispatcher<R> {
    runner: R,
    mode: DispatchMode,
    echo: Box<dyn Write + Send>,
}

impl<R: StepRunner> Dispatcher<R> {
    /// Dry-run output goes to stdout, verbose traces to stderr.
    pub fn new(runner: R, mode: DispatchMode) -> Self {
        let echo: Box<dyn Write + Send> = if mode.dry_run {
            Box::new(std::io::stdout())
        } else {
            Box::new(std::io::stderr())
        };
        Self { runner, mode, echo }
    }

    /// Redirect dry-run and trace output.
    pub fn with_echo(mut self, echo: Box<dyn Write + Send>) -> Self {
        self.echo = echo;
        self
    }

    pub fn mode(&self) -> DispatchMode {
        self.mode
    }

    /// Execute a plan.
    ///
    /// The chain stops at the first failing step and that error is returned.
    /// Cleanup steps run once the first chain step has succeeded; their
    /// failures are logged only.
    pub async fn dispatch(&mut self, plan: &Plan) -> Result<()> {
        if self.mode.dry_run {
            for step in plan.steps() {
                writeln!(self.echo, "{}", step)?;
            }
            self.echo.flush()?;
            return Ok(());
        }

        let mut started = false;
        let mut outcome = Ok(());
        for (index, step) in plan.chain.iter().enumerate() {
            if let Err(e) = self.execute(step).await {
                tracing::debug!(step = index, error = %e, "Chain aborted");
                outcome = Err(e);
                break;
            }
            if index == 0 {
                started = true;
            }
        }

        if started {
            for step in &plan.cleanup {
                if let Err(e) = self.execute(step).await {
                    tracing::warn!(step = %step, error = %e, "Cleanup step failed");
                }
            }
        }

        outcome
    }

    async fn execute(&mut self, step: &Step) -> Result<()> {
        if self.mode.verbose {
            writeln!(self.echo, "+ {}", step)?;
            self.echo.flush()?;
        }
        if let Step::Engine(command) = step {
            tracing::info!(command = %command, "Running engine command");
        }
        self.runner.run(step).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::step::EngineCommand;
    use async_trait::async_trait;
    use osaft_docker_core::OsaftError;
    use std::path::PathBuf;
    use std::sync::{Arc, Mutex};

    /// Records steps instead of running them; optionally fails one.
    #[derive(Clone, Default)]
    struct RecordingRunner {
        pub steps: Arc<Mutex<Vec<Step>>>,
        pub fail_at: Option<usize>,
    }

    impl RecordingRunner {
        pub fn recorded(&self) -> Vec<String> {
            self.steps
                .lock()
                .unwrap()
                .iter()
                .map(|s| s.to_string())
                .collect()
        }
    }

    #[async_trait]
    impl StepRunner for RecordingRunner {
        async fn run(&self, step: &Step) -> Result<()> {
            let mut steps = self.steps.lock().unwrap();
            let index = steps.len();
            steps.push(step.clone());
            if self.fail_at == Some(index) {
                return Err(OsaftError::EngineFailed {
                    command: step.to_string(),
                    code: 125,
                });
            }
            Ok(())
        }
    }

    /// Cloneable in-memory writer.
    #[derive(Clone, Default)]
    struct SharedBuf(pub Arc<Mutex<Vec<u8>>>);

    impl SharedBuf {
        pub fn text(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).to_string()
        }
    }

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn build_plan() -> Plan {
        Plan::new()
            .then(Step::CreateDir(PathBuf::from("w")))
            .then(Step::Engine(
                EngineCommand::new("docker").args(["build", "-t", "owasp/o-saft:1", "w"]),
            ))
            .then(Step::Engine(
                EngineCommand::new("docker").args(["tag", "owasp/o-saft:1", "owasp/o-saft:latest"]),
            ))
            .finally(Step::RemoveDir(PathBuf::from("w")))
    }

    fn dispatcher(
        runner: RecordingRunner,
        dry_run: bool,
        verbose: bool,
    ) -> (Dispatcher<RecordingRunner>, SharedBuf) {
        let out = SharedBuf::default();
        let d = Dispatcher::new(runner, DispatchMode { dry_run, verbose })
            .with_echo(Box::new(out.clone()));
        (d, out)
    }

    #[tokio::test]
    async fn test_dry_run_never_executes() {
        let runner = RecordingRunner::default();
        let (mut d, out) = dispatcher(runner.clone(), true, false);
        d.dispatch(&build_plan()).await.unwrap();
        assert!(runner.recorded().is_empty());
        assert_eq!(
            out.text(),
            "mkdir w\n\
             docker build -t owasp/o-saft:1 w\n\
             docker tag owasp/o-saft:1 owasp/o-saft:latest\n\
             rm -rf w\n"
        );
    }

    #[tokio::test]
    async fn test_runs_in_order() {
        let runner = RecordingRunner::default();
        let (mut d, out) = dispatcher(runner.clone(), false, false);
        d.dispatch(&build_plan()).await.unwrap();
        assert_eq!(
            runner.recorded(),
            vec![
                "mkdir w",
                "docker build -t owasp/o-saft:1 w",
                "docker tag owasp/o-saft:1 owasp/o-saft:latest",
                "rm -rf w",
            ]
        );
        assert!(out.text().is_empty());
    }

    #[tokio::test]
    async fn test_verbose_traces_before_execution() {
        let runner = RecordingRunner::default();
        let (mut d, out) = dispatcher(runner.clone(), false, true);
        d.dispatch(&Plan::engine(EngineCommand::new("docker").arg("images")))
            .await
            .unwrap();
        assert_eq!(out.text(), "+ docker images\n");
        assert_eq!(runner.recorded(), vec!["docker images"]);
    }

    #[tokio::test]
    async fn test_failure_short_circuits_and_cleans_up() {
        let runner = RecordingRunner {
            fail_at: Some(1),
            ..RecordingRunner::default()
        };
        let (mut d, _) = dispatcher(runner.clone(), false, false);
        let err = d.dispatch(&build_plan()).await.unwrap_err();
        assert_eq!(err.exit_code(), 125);
        // the tag step never ran, the cleanup did
        assert_eq!(
            runner.recorded(),
            vec!["mkdir w", "docker build -t owasp/o-saft:1 w", "rm -rf w"]
        );
    }

    #[tokio::test]
    async fn test_no_cleanup_when_first_step_fails() {
        let runner = RecordingRunner {
            fail_at: Some(0),
            ..RecordingRunner::default()
        };
        let (mut d, _) = dispatcher(runner.clone(), false, false);
        assert!(d.dispatch(&build_plan()).await.is_err());
        assert_eq!(runner.recorded(), vec!["mkdir w"]);
    }

    #[tokio::test]
    async fn test_cleanup_failure_is_not_reported() {
        let runner = RecordingRunner {
            fail_at: Some(3),
            ..RecordingRunner::default()
        };
        let (mut d, _) = dispatcher(runner.clone(), false, false);
        assert!(d.dispatch(&build_plan()).await.is_ok());
        assert_eq!(runner.recorded().len(), 4);
    }
}
