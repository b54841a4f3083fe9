//! Package manager verbs and package lists per platform variant.

use osaft_docker_core::{BuildConfig, Component, Feature, Platform};

/// Package manager of a platform variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageManager {
    Apk,
    Apt,
}

impl PackageManager {
    /// Package manager for a platform; custom images have none we know of.
    pub fn for_platform(platform: Platform) -> Option<Self> {
        match platform {
            Platform::Alpine => Some(Self::Apk),
            Platform::Debian => Some(Self::Apt),
            Platform::Custom => None,
        }
    }

    pub fn update(&self) -> String {
        match self {
            Self::Apk => "apk update".to_string(),
            Self::Apt => "apt-get update".to_string(),
        }
    }

    pub fn install(&self, packages: &[&str]) -> String {
        match self {
            Self::Apk => format!("apk add --no-cache {}", packages.join(" ")),
            Self::Apt => format!(
                "apt-get install -y --no-install-recommends {}",
                packages.join(" ")
            ),
        }
    }

    pub fn remove(&self, packages: &[&str]) -> String {
        match self {
            Self::Apk => format!("apk del --purge {}", packages.join(" ")),
            Self::Apt => format!("apt-get purge -y --auto-remove {}", packages.join(" ")),
        }
    }

    pub fn clean(&self) -> String {
        match self {
            Self::Apk => "rm -rf /var/cache/apk/*".to_string(),
            Self::Apt => "rm -rf /var/lib/apt/lists/*".to_string(),
        }
    }
}

/// Shell command creating the unprivileged user owning `home`.
pub fn add_user(platform: Platform, user: &str, home: &str) -> String {
    match platform {
        Platform::Debian => format!("useradd -M -d {} -s /bin/sh {}", home, user),
        // busybox syntax
        Platform::Alpine | Platform::Custom => format!("adduser -D -H -h {} {}", home, user),
    }
}

/// Packages the final image needs at runtime.
pub fn runtime_packages(config: &BuildConfig) -> Vec<&'static str> {
    let alt = config.enabled(Feature::SslLibAlt);
    let mut packages = match config.platform {
        Platform::Alpine => {
            let mut p = vec![
                "perl",
                "perl-readonly",
                "perl-net-dns",
                "perl-mozilla-ca",
                "ncurses",
                "ca-certificates",
            ];
            p.push(if alt { "libressl" } else { "openssl" });
            if !config.enabled(Feature::TlsSocketLib) {
                p.extend(["perl-net-ssleay", "perl-io-socket-ssl"]);
            }
            p
        }
        Platform::Debian => {
            let mut p = vec![
                "perl",
                "libreadonly-perl",
                "libnet-dns-perl",
                "libmozilla-ca-perl",
                "ncurses-bin",
                "ca-certificates",
            ];
            p.push(if alt { "libssl1.0.2" } else { "openssl" });
            if !config.enabled(Feature::TlsSocketLib) {
                p.extend(["libnet-ssleay-perl", "libio-socket-ssl-perl"]);
            }
            p
        }
        Platform::Custom => return Vec::new(),
    };
    if config.enabled(Feature::TclGui) {
        packages.extend(["tcl", "tk"]);
    }
    if config.enabled(Feature::WgetTool) {
        packages.push("wget");
    }
    packages
}

/// Packages needed only while building a component, purged afterwards.
pub fn build_dependencies(config: &BuildConfig, component: Component) -> Vec<&'static str> {
    let alt = config.enabled(Feature::SslLibAlt);
    match (config.platform, component) {
        (Platform::Custom, _) | (_, Component::Osaft) => Vec::new(),
        (Platform::Alpine, Component::TlsSocketLib) => vec![
            "make",
            "gcc",
            "musl-dev",
            "perl-dev",
            "zlib-dev",
            if alt { "libressl-dev" } else { "openssl-dev" },
        ],
        (Platform::Alpine, Component::OpensslVariant) => {
            vec!["make", "gcc", "musl-dev", "linux-headers", "zlib-dev"]
        }
        (Platform::Debian, Component::TlsSocketLib) => vec![
            "make",
            "gcc",
            "libc6-dev",
            "libperl-dev",
            "zlib1g-dev",
            if alt { "libssl1.0-dev" } else { "libssl-dev" },
        ],
        (Platform::Debian, Component::OpensslVariant) => {
            vec!["make", "gcc", "libc6-dev", "zlib1g-dev"]
        }
    }
}
