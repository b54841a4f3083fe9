use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::env::{date_tag, EnvDefaults};
use crate::error::{OsaftError, Result};
use crate::platform::{Feature, FeatureToggles, Platform};

/// Software built into the image from a source archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Component {
    /// The O-Saft application itself
    Osaft,
    /// OpenSSL variant with all legacy ciphers enabled
    OpensslVariant,
    /// Net::SSLeay perl binding
    TlsSocketLib,
}

impl Component {
    pub const ALL: [Component; 3] = [
        Component::Osaft,
        Component::OpensslVariant,
        Component::TlsSocketLib,
    ];

    /// Name used in `-src-<name>=` style options.
    pub fn option_name(&self) -> &'static str {
        match self {
            Self::Osaft => "osaft",
            Self::OpensslVariant => "openssl",
            Self::TlsSocketLib => "ssleay",
        }
    }

    /// File name the source archive gets inside the image.
    pub fn archive_name(&self) -> &'static str {
        match self {
            Self::Osaft => "o-saft.tgz",
            Self::OpensslVariant => "openssl.tgz",
            Self::TlsSocketLib => "Net-SSLeay.tgz",
        }
    }

    /// Feature gating this component; the application is always built.
    pub fn feature(&self) -> Option<Feature> {
        match self {
            Self::Osaft => None,
            Self::OpensslVariant => Some(Feature::Openssl),
            Self::TlsSocketLib => Some(Feature::TlsSocketLib),
        }
    }

    fn default_url(&self) -> &'static str {
        match self {
            Self::Osaft => "https://github.com/OWASP/O-Saft/raw/master/o-saft.tgz",
            Self::OpensslVariant => {
                "https://github.com/PeterMosmans/openssl/archive/1.0.2-chacha.tar.gz"
            }
            Self::TlsSocketLib => {
                "https://cpan.metacpan.org/authors/id/C/CH/CHRISN/Net-SSLeay-1.88.tar.gz"
            }
        }
    }
}

impl std::fmt::Display for Component {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.option_name())
    }
}

/// Where a source archive comes from. A descriptor has at most one origin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceOrigin {
    Remote(String),
    Local(PathBuf),
}

/// Expected digest of a source archive.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Checksum {
    /// Sentinel: do not verify.
    #[default]
    Absent,
    /// Lowercase hex SHA-256 digest.
    Sha256(String),
}

impl Checksum {
    /// Parse `none` or a 64 digit hex SHA-256 digest.
    pub fn parse(value: &str) -> Result<Self> {
        let value = value.trim();
        if value.eq_ignore_ascii_case("none") {
            return Ok(Self::Absent);
        }
        let bytes = hex::decode(value)
            .map_err(|e| OsaftError::Config(format!("invalid checksum '{}': {}", value, e)))?;
        if bytes.len() != 32 {
            return Err(OsaftError::Config(format!(
                "invalid checksum '{}': expected 64 hex digits",
                value
            )));
        }
        Ok(Self::Sha256(value.to_ascii_lowercase()))
    }

    pub fn digest(&self) -> Option<&str> {
        match self {
            Self::Absent => None,
            Self::Sha256(d) => Some(d),
        }
    }
}

/// Source archive descriptor for one component.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SourceSpec {
    pub origin: Option<SourceOrigin>,
    pub checksum: Checksum,
}

impl SourceSpec {
    pub fn remote(url: impl Into<String>) -> Self {
        Self {
            origin: Some(SourceOrigin::Remote(url.into())),
            checksum: Checksum::Absent,
        }
    }
}

/// `registry:tag` image identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageRef {
    pub registry: String,
    pub tag: String,
}

impl ImageRef {
    /// Same registry, different tag.
    pub fn with_tag(&self, tag: &str) -> Self {
        Self {
            registry: self.registry.clone(),
            tag: tag.to_string(),
        }
    }
}

impl std::fmt::Display for ImageRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.registry, self.tag)
    }
}

/// Engine-side build and cleanup behaviour.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildOptions {
    /// Pass `--force-rm` to the engine build
    pub force_remove_intermediate: bool,
    /// Pass `--rm` to the engine build
    pub remove_after_build: bool,
    /// Delete the saved image archive after a successful load
    pub delete_saved_archive_after_load: bool,
    /// Additionally tag the built image as `<registry>:latest`
    pub tag_result_as_alias: bool,
    /// Delete the transient working directory at the end of a build
    pub remove_workdir: bool,
}

impl BuildOptions {
    /// `-clean` / `-no-clean`: switch every removal option at once.
    pub fn set_clean(&mut self, on: bool) {
        self.force_remove_intermediate = on;
        self.remove_after_build = on;
        self.delete_saved_archive_after_load = on;
        self.remove_workdir = on;
    }
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            force_remove_intermediate: true,
            remove_after_build: true,
            delete_saved_archive_after_load: false,
            tag_result_as_alias: false,
            remove_workdir: true,
        }
    }
}

/// Everything the recipe generator and the dispatcher need for one invocation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BuildConfig {
    pub platform: Platform,
    pub dry_run: bool,
    pub verbose: bool,
    pub image: ImageRef,
    /// `-from=` override of the platform's base image
    pub base_image: Option<String>,
    pub sources: BTreeMap<Component, SourceSpec>,
    pub features: FeatureToggles,
    pub options: BuildOptions,
    /// Saved image archive for `build` (save) and `load`
    pub archive: Option<PathBuf>,
    /// Parent of the transient working directory
    pub workdir_parent: PathBuf,
    /// Unprivileged user the container runs as
    pub user: String,
    /// Container engine program
    pub engine: String,
}

impl BuildConfig {
    /// Defaults for the default platform, seeded from the environment.
    pub fn new(env: &EnvDefaults) -> Self {
        let platform = Platform::default();
        Self {
            platform,
            dry_run: false,
            verbose: false,
            image: ImageRef {
                registry: env.registry.clone(),
                tag: env.tag.clone().unwrap_or_else(date_tag),
            },
            base_image: None,
            sources: Component::ALL
                .iter()
                .map(|c| (*c, SourceSpec::remote(c.default_url())))
                .collect(),
            features: FeatureToggles::for_platform(platform),
            options: BuildOptions::default(),
            archive: None,
            workdir_parent: PathBuf::from("."),
            user: "osaft".to_string(),
            engine: env.engine.clone(),
        }
    }

    /// Select a platform and reset the feature toggles to its defaults.
    pub fn set_platform(&mut self, platform: Platform) {
        self.platform = platform;
        self.features = FeatureToggles::for_platform(platform);
    }

    pub fn enabled(&self, feature: Feature) -> bool {
        self.features.enabled(feature)
    }

    /// Whether the component's block belongs in the recipe.
    pub fn builds(&self, component: Component) -> bool {
        component.feature().map_or(true, |f| self.enabled(f))
    }

    pub fn source(&self, component: Component) -> Option<&SourceSpec> {
        self.sources.get(&component)
    }

    pub fn source_mut(&mut self, component: Component) -> &mut SourceSpec {
        self.sources.entry(component).or_default()
    }

    /// Base image of the recipe's `FROM`.
    pub fn base_image(&self) -> Result<String> {
        match (&self.base_image, self.platform.default_base_image()) {
            (Some(image), _) => Ok(image.clone()),
            (None, Some(image)) => Ok(image.to_string()),
            (None, None) => Err(OsaftError::Config(format!(
                "platform '{}' needs a base image (-from=IMAGE)",
                self.platform
            ))),
        }
    }

    /// Render the resolved configuration as YAML.
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}

/// Configuration of the runner tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub dry_run: bool,
    pub verbose: bool,
    pub image: ImageRef,
    /// `-id=` override targeting a specific image id
    pub image_id: Option<String>,
    pub engine: String,
    pub display: Option<String>,
}

impl RunConfig {
    pub fn new(env: &EnvDefaults) -> Self {
        Self {
            dry_run: false,
            verbose: false,
            image: ImageRef {
                registry: env.registry.clone(),
                tag: env.tag.clone().unwrap_or_else(|| "latest".to_string()),
            },
            image_id: None,
            engine: env.engine.clone(),
            display: env.display.clone(),
        }
    }

    /// Image the engine commands operate on.
    pub fn target(&self) -> String {
        self.image_id
            .clone()
            .unwrap_or_else(|| self.image.to_string())
    }
}
