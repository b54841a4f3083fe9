//! O-Saft Docker Runtime - recipe generation and engine dispatch.
//!
//! This module turns a build configuration into a Dockerfile, prepares
//! the transient working directory and drives the container engine.

pub mod checksum;
pub mod dispatch;
pub mod engine;
pub mod recipe;
pub mod workdir;

// Re-export common types
pub use dispatch::{DispatchMode, Dispatcher, EngineCommand, HostRunner, Plan, Step, StepRunner};
pub use engine::{BuildRequest, Engine, RunRequest};
pub use recipe::{generate, Instruction, Recipe};

/// O-Saft Docker Runtime version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
