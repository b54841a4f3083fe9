//! O-Saft Docker Core - configuration model shared by the docker tools.
//!
//! Holds the build configuration record, platform defaults, the
//! environment-seeded defaults and the error type used across the
//! workspace.

pub mod config;
pub mod env;
pub mod error;
pub mod platform;

// Re-export commonly used types
pub use config::{
    BuildConfig, BuildOptions, Checksum, Component, ImageRef, RunConfig, SourceOrigin, SourceSpec,
};
pub use env::EnvDefaults;
pub use error::{OsaftError, Result};
pub use platform::{Feature, FeatureToggles, Platform};

/// O-Saft docker tooling version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
