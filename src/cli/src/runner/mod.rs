//! `o-saft-docker`: run O-Saft in its container image.

pub mod options;
pub mod plans;

use std::io::Write;

use osaft_docker_core::error::Result;
use osaft_docker_core::EnvDefaults;
use osaft_docker_runtime::{DispatchMode, Dispatcher, HostRunner, StepRunner};

pub use options::{parse, RunInvocation, RunMode};

use crate::logging;
use crate::usage::RUN_USAGE;

/// Perform the invocation's mode. Usage and `hacker` text go to `out`.
pub async fn execute<R: StepRunner>(
    invocation: &RunInvocation,
    dispatcher: &mut Dispatcher<R>,
    out: &mut dyn Write,
) -> Result<()> {
    match invocation.mode {
        RunMode::Help => out.write_all(RUN_USAGE.as_bytes())?,
        RunMode::Hacker => {
            out.write_all(plans::hacker_text(&invocation.config, &invocation.args)?.as_bytes())?
        }
        mode => {
            let plan = plans::plan(mode, &invocation.config, &invocation.args)?;
            dispatcher.dispatch(&plan).await?;
        }
    }
    out.flush()?;
    Ok(())
}

/// Entry point of the runner; returns the process exit code.
pub async fn run(args: &[String], env: &EnvDefaults) -> i32 {
    let invocation = match parse(args, env) {
        Ok(invocation) => invocation,
        Err(e) => {
            if args.is_empty() {
                print!("{}", RUN_USAGE);
            }
            return logging::report(&e);
        }
    };
    logging::init(invocation.config.verbose);

    let mode = DispatchMode {
        dry_run: invocation.config.dry_run,
        verbose: invocation.config.verbose,
    };
    let mut dispatcher = Dispatcher::new(HostRunner, mode);
    let mut stdout = std::io::stdout();
    match execute(&invocation, &mut dispatcher, &mut stdout).await {
        Ok(()) => 0,
        Err(e) => logging::report(&e),
    }
}
