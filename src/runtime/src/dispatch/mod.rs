//! Command dispatch.
//!
//! Terminal actions are expressed as a [`Plan`] of [`Step`]s. The
//! [`Dispatcher`] either prints them (dry run) or hands them one at a time
//! to a [`StepRunner`], stopping at the first failure.

pub mod dispatcher;
pub mod runner;
pub mod step;

pub use dispatcher::{DispatchMode, Dispatcher};
pub use runner::{HostRunner, StepRunner};
pub use step::{shell_quote, EngineCommand, Plan, Step};
