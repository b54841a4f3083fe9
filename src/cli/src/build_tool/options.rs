//! Option table of `o-saft-docker-build`.

use std::path::PathBuf;

use osaft_docker_core::error::Result;
use osaft_docker_core::{
    BuildConfig, BuildOptions, Checksum, Component, EnvDefaults, Feature, Platform, SourceOrigin,
};

use crate::args::{Flow, Rule, RuleTable};

/// Terminal action of the build tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildMode {
    Build,
    Load,
    Pull,
    /// Print the resolved configuration
    Config,
    /// Print the generated recipe
    Dockerfile,
    Help,
}

/// Parsed command line of the build tool.
#[derive(Debug, Clone)]
pub struct BuildInvocation {
    pub mode: Option<BuildMode>,
    pub config: BuildConfig,
    /// Arguments after `--` or the first unrecognised token
    pub passthrough: Vec<String>,
}

/// Parse state: feature flags are collected and applied after the
/// platform defaults, whatever their position on the command line.
struct Draft {
    mode: Option<BuildMode>,
    config: BuildConfig,
    overrides: Vec<(Feature, bool)>,
}

impl Draft {
    fn feature(&mut self, feature: Feature, on: bool) -> Result<Flow> {
        self.overrides.push((feature, on));
        Ok(Flow::Continue)
    }

    fn option(&mut self, set: impl Fn(&mut BuildOptions)) -> Result<Flow> {
        set(&mut self.config.options);
        Ok(Flow::Continue)
    }
}

/// Parse the build tool's arguments on top of environment defaults.
pub fn parse(args: &[String], env: &EnvDefaults) -> Result<BuildInvocation> {
    let mut draft = Draft {
        mode: None,
        config: BuildConfig::new(env),
        overrides: Vec::new(),
    };
    let passthrough = rules().parse(&mut draft, args)?;
    draft.config.features.apply(&draft.overrides);

    tracing::debug!(
        mode = ?draft.mode,
        platform = %draft.config.platform,
        image = %draft.config.image,
        passthrough = passthrough.len(),
        "Parsed build options"
    );

    Ok(BuildInvocation {
        mode: draft.mode,
        config: draft.config,
        passthrough,
    })
}

fn mode(mode: BuildMode) -> impl Fn(&mut Draft, &str) -> Result<Flow> {
    move |d: &mut Draft, _: &str| {
        if d.mode.is_some() {
            return Ok(Flow::Reject);
        }
        d.mode = Some(mode);
        Ok(Flow::Continue)
    }
}

fn platform(platform: Platform) -> impl Fn(&mut Draft, &str) -> Result<Flow> {
    move |d: &mut Draft, _: &str| {
        d.config.set_platform(platform);
        Ok(Flow::Continue)
    }
}

/// `-name` / `-no-name` pair for a feature.
fn feature_pair(name: &str, feature: Feature) -> [Rule<Draft>; 2] {
    let (on, off) = (format!("-{}", name), format!("-no-{}", name));
    [
        Rule::exact(&[on.as_str()], move |d: &mut Draft, _| d.feature(feature, true)),
        Rule::exact(&[off.as_str()], move |d: &mut Draft, _| d.feature(feature, false)),
    ]
}

/// `-name` / `-no-name` pair for a build option.
fn option_pair(name: &str, set: fn(&mut BuildOptions, bool)) -> [Rule<Draft>; 2] {
    let (on, off) = (format!("-{}", name), format!("-no-{}", name));
    [
        Rule::exact(&[on.as_str()], move |d: &mut Draft, _| d.option(|o| set(o, true))),
        Rule::exact(&[off.as_str()], move |d: &mut Draft, _| d.option(|o| set(o, false))),
    ]
}

/// `-src-`, `-tar-` and `-sha-` options of one component.
fn source_rules(component: Component) -> [Rule<Draft>; 3] {
    let name = component.option_name();
    [
        Rule::value(format!("-src-{}=", name), move |d: &mut Draft, v| {
            d.config.source_mut(component).origin = Some(SourceOrigin::Remote(v.to_string()));
            Ok(Flow::Continue)
        }),
        Rule::value(format!("-tar-{}=", name), move |d: &mut Draft, v| {
            d.config.source_mut(component).origin = Some(SourceOrigin::Local(PathBuf::from(v)));
            Ok(Flow::Continue)
        }),
        Rule::value(format!("-sha-{}=", name), move |d: &mut Draft, v| {
            d.config.source_mut(component).checksum = Checksum::parse(v)?;
            Ok(Flow::Continue)
        }),
    ]
}

fn rules() -> RuleTable<Draft> {
    let mut rules = vec![
        Rule::exact(&["build"], mode(BuildMode::Build)),
        Rule::exact(&["load"], mode(BuildMode::Load)),
        Rule::exact(&["pull"], mode(BuildMode::Pull)),
        Rule::exact(&["config"], mode(BuildMode::Config)),
        Rule::exact(&["dockerfile"], mode(BuildMode::Dockerfile)),
        Rule::exact(&["help", "-h", "-help", "--help"], |d: &mut Draft, _| {
            if d.mode.is_some() {
                return Ok(Flow::Reject);
            }
            d.mode = Some(BuildMode::Help);
            Ok(Flow::Finish)
        }),
        Rule::exact(&["-n"], |d: &mut Draft, _| {
            d.config.dry_run = true;
            Ok(Flow::Continue)
        }),
        Rule::exact(&["-v"], |d: &mut Draft, _| {
            d.config.verbose = true;
            Ok(Flow::Continue)
        }),
        Rule::exact(&["-alpine"], platform(Platform::Alpine)),
        Rule::exact(&["-debian"], platform(Platform::Debian)),
        Rule::exact(&["-custom"], platform(Platform::Custom)),
        Rule::value("-from=", |d: &mut Draft, v| {
            d.config.base_image = Some(v.to_string());
            Ok(Flow::Continue)
        }),
        Rule::value("-registry=", |d: &mut Draft, v| {
            d.config.image.registry = v.to_string();
            Ok(Flow::Continue)
        }),
        Rule::value("-tag=", |d: &mut Draft, v| {
            d.config.image.tag = v.to_string();
            Ok(Flow::Continue)
        }),
        Rule::value("-archive=", |d: &mut Draft, v| {
            d.config.archive = Some(PathBuf::from(v));
            Ok(Flow::Continue)
        }),
        Rule::value("-workdir=", |d: &mut Draft, v| {
            d.config.workdir_parent = PathBuf::from(v);
            Ok(Flow::Continue)
        }),
        Rule::value("-user=", |d: &mut Draft, v| {
            d.config.user = v.to_string();
            Ok(Flow::Continue)
        }),
        Rule::exact(&["-clean"], |d: &mut Draft, _| d.option(|o| o.set_clean(true))),
        Rule::exact(&["-no-clean"], |d: &mut Draft, _| d.option(|o| o.set_clean(false))),
    ];

    for (name, feature) in [
        ("openssl", Feature::Openssl),
        ("ssleay", Feature::TlsSocketLib),
        ("libressl", Feature::SslLibAlt),
        ("tcl", Feature::TclGui),
        ("wget", Feature::WgetTool),
        ("sha256", Feature::ChecksumVerify),
    ] {
        rules.extend(feature_pair(name, feature));
    }

    let options: [(&str, fn(&mut BuildOptions, bool)); 5] = [
        ("force-rm", |o, on| o.force_remove_intermediate = on),
        ("rm", |o, on| o.remove_after_build = on),
        ("rm-archive", |o, on| o.delete_saved_archive_after_load = on),
        ("alias", |o, on| o.tag_result_as_alias = on),
        ("keep-workdir", |o, on| o.remove_workdir = !on),
    ];
    for (name, set) in options {
        rules.extend(option_pair(name, set));
    }

    for component in Component::ALL {
        rules.extend(source_rules(component));
    }

    RuleTable::new(rules)
}
