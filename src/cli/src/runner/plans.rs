//! Step plans for the runner's modes.

use std::path::Path;

use osaft_docker_core::error::{OsaftError, Result};
use osaft_docker_core::RunConfig;
use osaft_docker_runtime::recipe::OSAFT_DIR;
use osaft_docker_runtime::{BuildRequest, Engine, Plan, RunRequest, Step};

use super::options::RunMode;

/// X11 socket directory shared with the GUI container.
const X11_SOCKET_DIR: &str = "/tmp/.X11-unix";

/// Plan for an engine-backed mode. `Help` and `Hacker` have none.
pub fn plan(mode: RunMode, config: &RunConfig, args: &[String]) -> Result<Plan> {
    let engine = Engine::new(&config.engine);
    let target = config.target();
    let interactive = |entrypoint: Option<&str>, user: Option<&str>, args: &[String]| {
        engine.run(&RunRequest {
            image: &target,
            interactive: true,
            entrypoint,
            user,
            args,
            ..RunRequest::default()
        })
    };

    let plan = match mode {
        RunMode::Run => Plan::engine(interactive(None, None, args)),
        RunMode::Build => {
            let image = config.image.to_string();
            Plan::engine(engine.build(&BuildRequest {
                recipe: Path::new("Dockerfile"),
                context: Path::new("."),
                image: &image,
                force_rm: true,
                rm: true,
                extra: args,
            }))
        }
        RunMode::Usage => {
            let help = ["--norc".to_string(), "--help=docker".to_string()];
            Plan::engine(engine.run(&RunRequest {
                image: &target,
                args: &help,
                ..RunRequest::default()
            }))
        }
        RunMode::Shell => Plan::engine(interactive(Some("/bin/sh"), None, args)),
        RunMode::Root => Plan::engine(interactive(Some("/bin/sh"), Some("root"), args)),
        RunMode::Call => {
            let (command, rest) = args
                .split_first()
                .ok_or_else(|| OsaftError::Usage("call needs a command".to_string()))?;
            Plan::engine(interactive(Some(command.as_str()), None, rest))
        }
        RunMode::Status => Plan::engine(engine.images(&config.image.registry))
            .then(Step::Engine(engine.containers(&target))),
        RunMode::Rmi => Plan::engine(engine.rmi(&target, args)),
        RunMode::Gui => {
            let display = config.display.clone().unwrap_or_else(|| {
                tracing::warn!("DISPLAY is not set, the GUI will not find an X server");
                String::new()
            });
            let gui = format!("{}/o-saft.tcl", OSAFT_DIR);
            Plan::engine(engine.run(&RunRequest {
                image: &target,
                interactive: true,
                entrypoint: Some(gui.as_str()),
                env: &[("DISPLAY".to_string(), display)],
                volumes: &[(X11_SOCKET_DIR.to_string(), X11_SOCKET_DIR.to_string())],
                args,
                ..RunRequest::default()
            }))
        }
        RunMode::Hacker | RunMode::Help => {
            return Err(OsaftError::Usage(format!(
                "'{}' does not run the engine",
                mode.keyword()
            )))
        }
    };
    Ok(plan)
}

/// Commands of every engine-backed mode, for `hacker`.
pub fn hacker_text(config: &RunConfig, args: &[String]) -> Result<String> {
    let placeholder = vec!["COMMAND".to_string()];
    let mut text = String::new();
    for mode in RunMode::ENGINE_MODES {
        let mode_args = match (mode, args.is_empty()) {
            (RunMode::Call, true) => &placeholder[..],
            _ => args,
        };
        text.push_str(&format!("# {}\n", mode.keyword()));
        for step in plan(mode, config, mode_args)?.steps() {
            text.push_str(&format!("{}\n", step));
        }
    }
    Ok(text)
}
