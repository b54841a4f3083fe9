//! Build recipe (Dockerfile) generation.
//!
//! The generator turns a [`BuildConfig`](osaft_docker_core::BuildConfig)
//! into typed [`Instruction`]s; [`Recipe`] renders them as Dockerfile text.
//!
//! # Blocks
//!
//! base system, O-Saft, Net::SSLeay, OpenSSL, entrypoint

pub mod generator;
pub mod instruction;
pub mod packages;

pub use generator::{context_name, generate, OPENSSL_DIR, OSAFT_DIR};
pub use instruction::{Instruction, Recipe};
pub use packages::PackageManager;
