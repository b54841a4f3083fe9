//! `o-saft-docker-build`: recipe generation and image lifecycle.

pub mod options;
pub mod plans;

use std::io::Write;

use osaft_docker_core::error::{OsaftError, Result};
use osaft_docker_core::EnvDefaults;
use osaft_docker_runtime::workdir::workdir_path;
use osaft_docker_runtime::{generate, DispatchMode, Dispatcher, HostRunner, StepRunner};

pub use options::{parse, BuildInvocation, BuildMode};

use crate::logging;
use crate::usage::BUILD_USAGE;

/// Perform the invocation's terminal action.
///
/// Text results (`config`, `dockerfile`, `help`) go to `out`; engine
/// actions go through the dispatcher.
pub async fn execute<R: StepRunner>(
    invocation: &BuildInvocation,
    dispatcher: &mut Dispatcher<R>,
    out: &mut dyn Write,
) -> Result<()> {
    let config = &invocation.config;
    let Some(mode) = invocation.mode else {
        return Err(OsaftError::UnknownMode(
            "expected one of build, load, pull, config, dockerfile or help; nothing done"
                .to_string(),
        ));
    };

    match mode {
        BuildMode::Help => out.write_all(BUILD_USAGE.as_bytes())?,
        BuildMode::Config => out.write_all(config.to_yaml()?.as_bytes())?,
        BuildMode::Dockerfile => write!(out, "{}", generate(config)?)?,
        BuildMode::Build => {
            let recipe = generate(config)?;
            if !dispatcher.mode().dry_run {
                plans::verify_local_archives(config).await?;
            }
            let workdir = workdir_path(&config.workdir_parent);
            let plan = plans::build(config, &recipe, &workdir, &invocation.passthrough)?;
            tracing::info!(image = %config.image, workdir = %workdir.display(), "Building image");
            dispatcher.dispatch(&plan).await?;
        }
        BuildMode::Load => dispatcher.dispatch(&plans::load(config)?).await?,
        BuildMode::Pull => {
            dispatcher
                .dispatch(&plans::pull(config, &invocation.passthrough))
                .await?
        }
    }
    out.flush()?;
    Ok(())
}

/// Entry point of the build tool; returns the process exit code.
pub async fn run(args: &[String], env: &EnvDefaults) -> i32 {
    let invocation = match parse(args, env) {
        Ok(invocation) => invocation,
        Err(e) => return logging::report(&e),
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

#[cfg(test)]
mod tests {
    use super::*;

    fn invocation(list: &[&str]) -> BuildInvocation {
        let args: Vec<String> = list.iter().map(|s| s.to_string()).collect();
        let env = EnvDefaults {
            tag: Some("19.01.19".to_string()),
            ..EnvDefaults::default()
        };
        parse(&args, &env).unwrap()
    }

    async fn text_of(list: &[&str]) -> Result<String> {
        let invocation = invocation(list);
        let mut dispatcher = Dispatcher::new(
            HostRunner,
            DispatchMode {
                dry_run: true,
                verbose: false,
            },
        )
        .with_echo(Box::new(std::io::sink()));
        let mut out = Vec::new();
        execute(&invocation, &mut dispatcher, &mut out).await?;
        Ok(String::from_utf8(out).unwrap())
    }

    #[tokio::test]
    async fn test_no_mode_is_warning() {
        let err = text_of(&["-debian"]).await.unwrap_err();
        assert!(matches!(err, OsaftError::UnknownMode(_)));
        assert_eq!(err.exit_code(), 4);
    }

    #[tokio::test]
    async fn test_help() {
        let text = text_of(&["-help"]).await.unwrap();
        assert!(text.starts_with("Usage: o-saft-docker-build"));
    }

    #[tokio::test]
    async fn test_dockerfile_mode_prints_recipe() {
        let text = text_of(&["dockerfile", "-debian"]).await.unwrap();
        assert!(text.contains("FROM debian:stable-slim\n"));
        assert!(text.contains("ENTRYPOINT [\"perl\", \"/O-Saft/o-saft.pl\"]"));
    }

    #[tokio::test]
    async fn test_config_mode_prints_yaml() {
        let text = text_of(&["config", "-tag=9.9", "-no-openssl"]).await.unwrap();
        assert!(text.contains("platform: alpine"));
        assert!(text.contains("tag: '9.9'") || text.contains("tag: \"9.9\""));
        assert!(text.contains("openssl: false"));
    }

    #[tokio::test]
    async fn test_custom_without_base_image_fails() {
        let err = text_of(&["dockerfile", "-custom"]).await.unwrap_err();
        assert!(matches!(err, OsaftError::Config(_)));
    }

    #[tokio::test]
    async fn test_load_without_archive_is_usage_error() {
        let err = text_of(&["load"]).await.unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
