//! Option table of `o-saft-docker`.

use osaft_docker_core::error::{OsaftError, Result};
use osaft_docker_core::{EnvDefaults, RunConfig};

use crate::args::{Flow, Rule, RuleTable};

/// Terminal action of the runner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Pass every argument to the containerized tool
    Run,
    Build,
    Usage,
    Shell,
    Root,
    Call,
    Status,
    Rmi,
    Gui,
    Hacker,
    Help,
}

impl RunMode {
    /// Modes shown by `hacker`, in display order.
    pub const ENGINE_MODES: [RunMode; 9] = [
        RunMode::Run,
        RunMode::Build,
        RunMode::Usage,
        RunMode::Shell,
        RunMode::Root,
        RunMode::Call,
        RunMode::Status,
        RunMode::Rmi,
        RunMode::Gui,
    ];

    pub fn keyword(&self) -> &'static str {
        match self {
            Self::Run => "run",
            Self::Build => "build",
            Self::Usage => "usage",
            Self::Shell => "shell",
            Self::Root => "root",
            Self::Call => "call",
            Self::Status => "status",
            Self::Rmi => "rmi",
            Self::Gui => "gui",
            Self::Hacker => "hacker",
            Self::Help => "help",
        }
    }
}

/// Parsed command line of the runner.
#[derive(Debug, Clone)]
pub struct RunInvocation {
    pub mode: RunMode,
    pub config: RunConfig,
    /// Arguments following the mode keyword, or all remaining arguments
    pub args: Vec<String>,
}

struct Draft {
    mode: Option<RunMode>,
    config: RunConfig,
}

/// Parse the runner's arguments on top of environment defaults.
///
/// An empty argument list is a usage error.
pub fn parse(args: &[String], env: &EnvDefaults) -> Result<RunInvocation> {
    if args.is_empty() {
        return Err(OsaftError::Usage("no arguments given".to_string()));
    }
    let mut draft = Draft {
        mode: None,
        config: RunConfig::new(env),
    };
    let rest = rules().parse(&mut draft, args)?;
    let mode = draft.mode.unwrap_or(RunMode::Run);
    tracing::debug!(mode = mode.keyword(), image = %draft.config.target(), "Parsed run options");

    Ok(RunInvocation {
        mode,
        config: draft.config,
        args: rest,
    })
}

fn mode(mode: RunMode) -> impl Fn(&mut Draft, &str) -> Result<Flow> {
    move |d: &mut Draft, _: &str| {
        d.mode = Some(mode);
        Ok(Flow::Finish)
    }
}

fn rules() -> RuleTable<Draft> {
    RuleTable::new(vec![
        Rule::exact(&["-n"], |d: &mut Draft, _| {
            d.config.dry_run = true;
            Ok(Flow::Continue)
        }),
        Rule::exact(&["-v"], |d: &mut Draft, _| {
            d.config.verbose = true;
            Ok(Flow::Continue)
        }),
        Rule::value("-id=", |d: &mut Draft, v| {
            d.config.image_id = Some(v.to_string());
            Ok(Flow::Continue)
        }),
        Rule::value("-tag=", |d: &mut Draft, v| {
            d.config.image.tag = v.to_string();
            Ok(Flow::Continue)
        }),
        Rule::value("-registry=", |d: &mut Draft, v| {
            d.config.image.registry = v.to_string();
            Ok(Flow::Continue)
        }),
        Rule::exact(&["-h", "-help", "--help"], mode(RunMode::Help)),
        Rule::exact(&["build"], mode(RunMode::Build)),
        Rule::exact(&["usage"], mode(RunMode::Usage)),
        Rule::exact(&["shell"], mode(RunMode::Shell)),
        Rule::exact(&["root"], mode(RunMode::Root)),
        Rule::exact(&["call"], mode(RunMode::Call)),
        Rule::exact(&["status"], mode(RunMode::Status)),
        Rule::exact(&["rmi"], mode(RunMode::Rmi)),
        Rule::exact(&["gui"], mode(RunMode::Gui)),
        Rule::exact(&["hacker"], mode(RunMode::Hacker)),
    ])
}
