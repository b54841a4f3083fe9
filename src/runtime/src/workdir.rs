//! Naming of the transient per-invocation working directory.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

/// Prefix of every working directory name.
pub const WORKDIR_PREFIX: &str = "o-saft-docker-";

/// Directory name derived from a timestamp, e.g. `o-saft-docker-20261019-142501`.
pub fn workdir_name(now: &DateTime<Local>) -> String {
    format!("{}{}", WORKDIR_PREFIX, now.format("%Y%m%d-%H%M%S"))
}

/// Working directory for the current moment below `parent`.
pub fn workdir_path(parent: &Path) -> PathBuf {
    parent.join(workdir_name(&Local::now()))
}
