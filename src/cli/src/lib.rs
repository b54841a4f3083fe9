//! O-Saft Docker CLI - the `o-saft-docker-build` and `o-saft-docker` tools.

pub mod args;
pub mod build_tool;
pub mod logging;
pub mod runner;
pub mod usage;
