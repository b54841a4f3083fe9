//! Command lines for the container engine.
//!
//! The engine is an opaque collaborator; this module only knows how its
//! command lines look.

use std::path::Path;

use crate::dispatch::EngineCommand;

/// Options of an engine image build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildRequest<'a> {
    pub recipe: &'a Path,
    pub context: &'a Path,
    pub image: &'a str,
    pub force_rm: bool,
    pub rm: bool,
    /// Extra arguments placed before the context directory
    pub extra: &'a [String],
}

/// Options of an engine container run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunRequest<'a> {
    pub image: &'a str,
    pub interactive: bool,
    pub entrypoint: Option<&'a str>,
    pub user: Option<&'a str>,
    pub env: &'a [(String, String)],
    pub volumes: &'a [(String, String)],
    pub args: &'a [String],
}

/// Builds command lines for one engine program (`docker`, `podman`, ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Engine {
    program: String,
}

impl Engine {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    fn command(&self) -> EngineCommand {
        EngineCommand::new(&self.program)
    }

    /// Build an image from a recipe.
    pub fn build(&self, req: &BuildRequest<'_>) -> EngineCommand {
        let mut cmd = self.command().arg("build");
        if req.force_rm {
            cmd = cmd.arg("--force-rm");
        }
        if req.rm {
            cmd = cmd.arg("--rm");
        }
        cmd.arg("-f")
            .arg(req.recipe.to_string_lossy())
            .args(["-t", req.image])
            .args(req.extra.iter().cloned())
            .arg(req.context.to_string_lossy())
    }

    pub fn tag(&self, image: &str, alias: &str) -> EngineCommand {
        self.command().args(["tag", image, alias])
    }

    /// Save an image to a tar archive.
    pub fn save(&self, image: &str, archive: &Path) -> EngineCommand {
        self.command()
            .args(["save", "-o"])
            .arg(archive.to_string_lossy())
            .arg(image)
    }

    /// Load an image from a tar archive.
    pub fn load(&self, archive: &Path) -> EngineCommand {
        self.command()
            .args(["load", "-i"])
            .arg(archive.to_string_lossy())
    }

    pub fn pull(&self, image: &str, extra: &[String]) -> EngineCommand {
        self.command()
            .args(["pull", image])
            .args(extra.iter().cloned())
    }

    /// Remove an image by reference or id.
    pub fn rmi(&self, image: &str, extra: &[String]) -> EngineCommand {
        self.command()
            .args(["image", "rm", image])
            .args(extra.iter().cloned())
    }

    /// List images of a repository.
    pub fn images(&self, repository: &str) -> EngineCommand {
        self.command().args(["image", "ls", repository])
    }

    /// List containers started from an image.
    pub fn containers(&self, image: &str) -> EngineCommand {
        self.command()
            .args(["container", "ls", "-a", "--filter"])
            .arg(format!("ancestor={}", image))
    }

    /// Run a throw-away container.
    pub fn run(&self, req: &RunRequest<'_>) -> EngineCommand {
        let mut cmd = self.command().args(["run", "--rm"]);
        if req.interactive {
            cmd = cmd.arg("-it");
        }
        if let Some(user) = req.user {
            cmd = cmd.args(["--user", user]);
        }
        for (key, value) in req.env {
            cmd = cmd.arg("-e").arg(format!("{}={}", key, value));
        }
        for (host, guest) in req.volumes {
            cmd = cmd.arg("-v").arg(format!("{}:{}", host, guest));
        }
        if let Some(entrypoint) = req.entrypoint {
            cmd = cmd.args(["--entrypoint", entrypoint]);
        }
        cmd.arg(req.image).args(req.args.iter().cloned())
    }
}
