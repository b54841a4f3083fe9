//! Platform variants and their feature defaults.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::error::{OsaftError, Result};

/// Target base-image family.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// Alpine Linux, `apk` package manager (default).
    #[default]
    Alpine,
    /// Debian, `apt-get` package manager.
    Debian,
    /// User supplied base image without a known package manager.
    Custom,
}

impl Platform {
    /// Base image used when no `-from=` override is given.
    pub fn default_base_image(&self) -> Option<&'static str> {
        match self {
            Self::Alpine => Some("alpine:3.10"),
            Self::Debian => Some("debian:stable-slim"),
            Self::Custom => None,
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Alpine => write!(f, "alpine"),
            Self::Debian => write!(f, "debian"),
            Self::Custom => write!(f, "custom"),
        }
    }
}

impl std::str::FromStr for Platform {
    type Err = OsaftError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "alpine" => Ok(Self::Alpine),
            "debian" => Ok(Self::Debian),
            "custom" => Ok(Self::Custom),
            _ => Err(OsaftError::Config(format!(
                "unknown platform: '{}' (supported: alpine, debian, custom)",
                s
            ))),
        }
    }
}

/// Optional parts of the image that can be switched on and off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    /// Build the custom cryptographic library from source.
    Openssl,
    /// Build the TLS helper library (Net::SSLeay) from source.
    TlsSocketLib,
    /// Use the alternative SSL library packages.
    SslLibAlt,
    /// Install Tcl/Tk for the GUI.
    TclGui,
    /// Download sources with wget inside the build blocks.
    WgetTool,
    /// Verify source checksums.
    ChecksumVerify,
}

impl Feature {
    pub const ALL: [Feature; 6] = [
        Feature::Openssl,
        Feature::TlsSocketLib,
        Feature::SslLibAlt,
        Feature::TclGui,
        Feature::WgetTool,
        Feature::ChecksumVerify,
    ];
}

/// Feature name to on/off mapping; every [`Feature`] always has an entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FeatureToggles(BTreeMap<Feature, bool>);

impl FeatureToggles {
    /// Defaults for a platform variant.
    pub fn for_platform(platform: Platform) -> Self {
        let on: &[Feature] = match platform {
            Platform::Alpine => &[
                Feature::Openssl,
                Feature::TlsSocketLib,
                Feature::WgetTool,
                Feature::ChecksumVerify,
            ],
            Platform::Debian => &[Feature::WgetTool, Feature::ChecksumVerify],
            Platform::Custom => &[Feature::ChecksumVerify],
        };
        Self(
            Feature::ALL
                .iter()
                .map(|f| (*f, on.contains(f)))
                .collect(),
        )
    }

    pub fn enabled(&self, feature: Feature) -> bool {
        self.0.get(&feature).copied().unwrap_or(false)
    }

    pub fn set(&mut self, feature: Feature, on: bool) {
        self.0.insert(feature, on);
    }

    /// Apply explicit overrides in command-line order; the last one wins.
    pub fn apply(&mut self, overrides: &[(Feature, bool)]) {
        for (feature, on) in overrides {
            self.set(*feature, *on);
        }
    }
}

impl Default for FeatureToggles {
    fn default() -> Self {
        Self::for_platform(Platform::default())
    }
}
