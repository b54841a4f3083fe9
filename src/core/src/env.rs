//! Defaults seeded from the process environment.
//!
//! Read once at startup; command-line flags override every value.

/// Environment variable naming the image registry.
pub const ENV_REGISTRY: &str = "OSAFT_REGISTRY";
/// Environment variable naming the image tag.
pub const ENV_TAG: &str = "OSAFT_TAG";
/// Environment variable naming the container engine program.
pub const ENV_ENGINE: &str = "OSAFT_ENGINE";

pub const DEFAULT_REGISTRY: &str = "owasp/o-saft";
pub const DEFAULT_ENGINE: &str = "docker";

/// Values taken from the environment before argument parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvDefaults {
    pub registry: String,
    /// Explicit tag, if `OSAFT_TAG` was set.
    pub tag: Option<String>,
    pub engine: String,
    /// X11 display forwarded by the runner's `gui` mode.
    pub display: Option<String>,
}

impl EnvDefaults {
    /// Read the real process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build defaults from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());
        Self {
            registry: get(ENV_REGISTRY).unwrap_or_else(|| DEFAULT_REGISTRY.to_string()),
            tag: get(ENV_TAG),
            engine: get(ENV_ENGINE).unwrap_or_else(|| DEFAULT_ENGINE.to_string()),
            display: get("DISPLAY"),
        }
    }
}

impl Default for EnvDefaults {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

/// Date-derived tag used for freshly built images, e.g. `261019`.
pub fn date_tag() -> String {
    chrono::Local::now().format("%y%m%d").to_string()
}
