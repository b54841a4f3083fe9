//! Recipe generation from a [`BuildConfig`].
//!
//! Every component is installed by exactly one `RUN` block which updates
//! the package index, installs build dependencies, fetches, verifies,
//! extracts, builds and installs the source, then purges the build
//! dependencies again. Blocks are emitted in a fixed order: base system,
//! application, TLS helper library, cryptographic library, entrypoint.


use osaft_docker_core::error::{OsaftError, Result};
use osaft_docker_core::{BuildConfig, Component, Feature, SourceOrigin};

use super::instruction::{Instruction, Recipe};
use super::packages::{add_user, build_dependencies, runtime_packages, PackageManager};

/// Installation directory of the application inside the image.
pub const OSAFT_DIR: &str = "/O-Saft";
/// Installation prefix of the custom OpenSSL build.
pub const OPENSSL_DIR: &str = "/openssl";

/// Generate the build recipe for a configuration.
///
/// Deterministic: the same configuration always yields the same recipe.
pub fn generate(config: &BuildConfig) -> Result<Recipe> {
    let manager = PackageManager::for_platform(config.platform);
    let mut recipe = Recipe::new();

    header(config, &mut recipe)?;
    base_system(config, manager, &mut recipe);
    for component in [
        Component::Osaft,
        Component::TlsSocketLib,
        Component::OpensslVariant,
    ] {
        if config.builds(component) {
            component_block(config, manager, component, &mut recipe)?;
        } else {
            tracing::debug!(component = %component, "Component disabled, no block emitted");
        }
    }
    footer(config, &mut recipe);

    Ok(recipe)
}

fn header(config: &BuildConfig, recipe: &mut Recipe) -> Result<()> {
    let base_image = config.base_image()?;

    recipe.push(Instruction::Comment(format!(
        "O-Saft image, {} platform",
        config.platform
    )));
    recipe.push(Instruction::From {
        image: base_image.clone(),
    });
    for (key, value) in [
        ("org.opencontainers.image.title", "O-Saft".to_string()),
        ("org.opencontainers.image.vendor", "OWASP".to_string()),
        ("org.opencontainers.image.version", config.image.tag.clone()),
        (
            "org.opencontainers.image.description",
            "O-Saft - OWASP SSL advanced forensic tool".to_string(),
        ),
        ("osaft.vm.platform", config.platform.to_string()),
    ] {
        recipe.push(Instruction::Label {
            key: key.to_string(),
            value,
        });
    }
    for (key, value) in [
        ("OSAFT_DIR", OSAFT_DIR.to_string()),
        ("OPENSSL_DIR", OPENSSL_DIR.to_string()),
        ("OSAFT_VM_FROM", base_image),
        ("TERM", "dumb".to_string()),
        (
            "PATH",
            "${OSAFT_DIR}:${OSAFT_DIR}/contrib:${OPENSSL_DIR}/bin:$PATH".to_string(),
        ),
    ] {
        recipe.push(Instruction::Env {
            key: key.to_string(),
            value,
        });
    }
    recipe.push(Instruction::Workdir {
        path: "/".to_string(),
    });
    Ok(())
}

fn base_system(config: &BuildConfig, manager: Option<PackageManager>, recipe: &mut Recipe) {
    let Some(manager) = manager else {
        tracing::debug!(platform = %config.platform, "No package manager, skipping base system");
        return;
    };
    let packages = runtime_packages(config);
    recipe.push(Instruction::Comment("base system".to_string()));
    recipe.push(Instruction::Run {
        steps: vec![
            manager.update(),
            manager.install(&packages),
            manager.clean(),
        ],
    });
}

fn component_block(
    config: &BuildConfig,
    manager: Option<PackageManager>,
    component: Component,
    recipe: &mut Recipe,
) -> Result<()> {
    let source = config.source(component);
    let origin = source.and_then(|s| s.origin.as_ref()).ok_or_else(|| {
        OsaftError::Config(format!(
            "{} is enabled but has no source (use -src-{name}=URL or -tar-{name}=PATH)",
            component,
            name = component.option_name()
        ))
    })?;
    let archive = format!("/tmp/{}", component.archive_name());
    let deps = match manager {
        Some(_) => build_dependencies(config, component),
        None => Vec::new(),
    };

    recipe.push(Instruction::Comment(block_title(component).to_string()));

    let mut steps = Vec::new();
    if let (Some(manager), false) = (manager, deps.is_empty()) {
        steps.push(manager.update());
        steps.push(manager.install(&deps));
    }

    match origin {
        SourceOrigin::Local(_) => recipe.push(Instruction::Copy {
            src: context_name(component).to_string(),
            dst: archive.clone(),
        }),
        SourceOrigin::Remote(url) if config.enabled(Feature::WgetTool) => {
            steps.push(format!("wget -q -O {} {}", archive, url));
        }
        SourceOrigin::Remote(url) => recipe.push(Instruction::Add {
            src: url.clone(),
            dst: archive.clone(),
        }),
    }

    if config.enabled(Feature::ChecksumVerify) {
        if let Some(digest) = source.and_then(|s| s.checksum.digest()) {
            steps.push(format!("echo \"{}  {}\" | sha256sum -c -", digest, archive));
        }
    }

    steps.extend(build_steps(config, component, &archive));
    steps.push(format!("rm -f {}", archive));

    if let (Some(manager), false) = (manager, deps.is_empty()) {
        steps.push(manager.remove(&deps));
        steps.push(manager.clean());
    }

    recipe.push(Instruction::Run { steps });
    Ok(())
}

/// Extract, build and install steps of one component.
fn build_steps(config: &BuildConfig, component: Component, archive: &str) -> Vec<String> {
    let extract = |dir: &str| {
        vec![
            format!("mkdir -p {}", dir),
            format!("tar -xzf {} -C {} --strip-components=1", archive, dir),
        ]
    };
    match component {
        Component::Osaft => {
            let mut steps = extract("$OSAFT_DIR");
            steps.push("ln -sf $OSAFT_DIR/o-saft.pl /usr/local/bin/o-saft".to_string());
            steps.push(add_user(config.platform, &config.user, "$OSAFT_DIR"));
            steps.push(format!("chown -R {} $OSAFT_DIR", config.user));
            steps
        }
        Component::TlsSocketLib => {
            let dir = "/src/Net-SSLeay";
            let mut steps = extract(dir);
            steps.extend([
                format!("cd {}", dir),
                "PERL_MM_USE_DEFAULT=1 perl Makefile.PL".to_string(),
                "make".to_string(),
                "make install".to_string(),
                "cd /".to_string(),
                format!("rm -rf {}", dir),
            ]);
            steps
        }
        Component::OpensslVariant => {
            let dir = "/src/openssl";
            let mut steps = extract(dir);
            steps.extend([
                format!("cd {}", dir),
                "./config --prefix=$OPENSSL_DIR --openssldir=$OPENSSL_DIR/ssl \
                 enable-ssl2 enable-ssl3 enable-weak-ssl-ciphers enable-zlib shared"
                    .to_string(),
                "make depend".to_string(),
                "make".to_string(),
                "make install_sw".to_string(),
                "cd /".to_string(),
                format!("rm -rf {}", dir),
            ]);
            steps
        }
    }
}

fn footer(config: &BuildConfig, recipe: &mut Recipe) {
    recipe.push(Instruction::Comment("runtime".to_string()));
    recipe.push(Instruction::User {
        user: config.user.clone(),
    });
    recipe.push(Instruction::Workdir {
        path: OSAFT_DIR.to_string(),
    });
    recipe.push(Instruction::Entrypoint {
        exec: vec!["perl".to_string(), format!("{}/o-saft.pl", OSAFT_DIR)],
    });
    recipe.push(Instruction::Cmd {
        exec: vec!["--norc".to_string(), "--help=docker".to_string()],
    });
}

fn block_title(component: Component) -> &'static str {
    match component {
        Component::Osaft => "O-Saft",
        Component::TlsSocketLib => "Net::SSLeay",
        Component::OpensslVariant => "OpenSSL with all ciphers",
    }
}

/// Name a component's local archive is staged under in the build context.
///
/// Fixed per component, so two archives sharing a file name never collide.
pub fn context_name(component: Component) -> &'static str {
    component.archive_name()
}
