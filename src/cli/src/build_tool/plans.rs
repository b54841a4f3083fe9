//! Step plans for the build tool's engine actions.

use std::path::Path;

use osaft_docker_core::error::{OsaftError, Result};
use osaft_docker_core::{BuildConfig, Component, Feature, SourceOrigin};
use osaft_docker_runtime::checksum;
use osaft_docker_runtime::recipe::{context_name, Recipe};
use osaft_docker_runtime::{BuildRequest, Engine, Plan, Step};

/// File name of the recipe inside the working directory.
pub const RECIPE_FILE: &str = "Dockerfile";

/// Components built by this configuration whose sources are local archives.
fn local_archives(config: &BuildConfig) -> impl Iterator<Item = (Component, &Path)> {
    config.sources.iter().filter_map(move |(component, spec)| {
        match &spec.origin {
            Some(SourceOrigin::Local(path)) if config.builds(*component) => {
                Some((*component, path.as_path()))
            }
            _ => None,
        }
    })
}

/// Plan for `build`: stage the context, build, tag and save.
pub fn build(
    config: &BuildConfig,
    recipe: &Recipe,
    workdir: &Path,
    passthrough: &[String],
) -> Result<Plan> {
    let engine = Engine::new(&config.engine);
    let image = config.image.to_string();
    let recipe_path = workdir.join(RECIPE_FILE);

    let mut plan = Plan::new()
        .then(Step::CreateDir(workdir.to_path_buf()))
        .then(Step::WriteFile {
            path: recipe_path.clone(),
            contents: recipe.to_string(),
        });

    for (component, path) in local_archives(config) {
        plan = plan.then(Step::CopyFile {
            from: path.to_path_buf(),
            to: workdir.join(context_name(component)),
        });
    }

    plan = plan.then(Step::Engine(engine.build(&BuildRequest {
        recipe: &recipe_path,
        context: workdir,
        image: &image,
        force_rm: config.options.force_remove_intermediate,
        rm: config.options.remove_after_build,
        extra: passthrough,
    })));

    if config.options.tag_result_as_alias {
        let alias = config.image.with_tag("latest").to_string();
        plan = plan.then(Step::Engine(engine.tag(&image, &alias)));
    }
    if let Some(archive) = &config.archive {
        plan = plan.then(Step::Engine(engine.save(&image, archive)));
    }
    if config.options.remove_workdir {
        plan = plan.finally(Step::RemoveDir(workdir.to_path_buf()));
    }
    Ok(plan)
}

/// Plan for `load`: import the saved archive, optionally delete it afterwards.
pub fn load(config: &BuildConfig) -> Result<Plan> {
    let archive = config
        .archive
        .as_deref()
        .ok_or_else(|| OsaftError::Usage("load needs -archive=FILE".to_string()))?;
    let mut plan = Plan::engine(Engine::new(&config.engine).load(archive));
    if config.options.delete_saved_archive_after_load {
        plan = plan.then(Step::RemoveFile(archive.to_path_buf()));
    }
    Ok(plan)
}

/// Plan for `pull`.
pub fn pull(config: &BuildConfig, passthrough: &[String]) -> Plan {
    let image = config.image.to_string();
    Plan::engine(Engine::new(&config.engine).pull(&image, passthrough))
}

/// Hash local archives that carry a digest before anything is built.
pub async fn verify_local_archives(config: &BuildConfig) -> Result<()> {
    if !config.enabled(Feature::ChecksumVerify) {
        return Ok(());
    }
    for (component, path) in local_archives(config) {
        let Some(digest) = config.source(component).and_then(|s| s.checksum.digest()) else {
            continue;
        };
        tracing::debug!(component = %component, path = %path.display(), "Verifying archive");
        checksum::verify_file(path, digest).await?;
    }
    Ok(())
}
