use std::time::Duration;

use crate::shared::constants::{
    CORE_BASE_URL, CORE_URL_ENV, CORE_VERSION, CORE_VERSION_ENV, DEFAULT_LOAD_TIMEOUT,
    GLUE_RESOURCE_STEM, PAYLOAD_RESOURCE_STEM,
};

/// Where the engine resources live and how long loading may take.
#[derive(Clone, Debug, PartialEq)]
pub struct EngineConfig {
    /// Base URL; `{version}` is replaced with `version`.
    pub base_url: String,
    pub version: String,
    pub glue_name: String,
    pub payload_name: String,
    /// Upper bound for each resource fetch.
    pub load_timeout: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        let platform = platform_suffix();
        Self {
            base_url: CORE_BASE_URL.to_string(),
            version: CORE_VERSION.to_string(),
            glue_name: format!("{GLUE_RESOURCE_STEM}-{platform}"),
            payload_name: format!("{PAYLOAD_RESOURCE_STEM}-{platform}"),
            load_timeout: DEFAULT_LOAD_TIMEOUT,
        }
    }
}

impl EngineConfig {
    /// Defaults overlaid with the pinned-location environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(url) = lookup(CORE_URL_ENV).filter(|v| !v.trim().is_empty()) {
            config.base_url = url.trim().to_string();
        }
        if let Some(version) = lookup(CORE_VERSION_ENV).filter(|v| !v.trim().is_empty()) {
            config.version = version.trim().to_string();
        }
        config
    }

    pub fn with_load_timeout(mut self, timeout: Duration) -> Self {
        self.load_timeout = timeout;
        self
    }

    pub fn glue_url(&self) -> String {
        self.resource_url(&self.glue_name)
    }

    pub fn payload_url(&self) -> String {
        self.resource_url(&self.payload_name)
    }

    fn resource_url(&self, name: &str) -> String {
        let base = self.base_url.replace("{version}", &self.version);
        format!(
            "{}/{}",
            base.trim_end_matches('/'),
            name.trim_start_matches('/')
        )
    }
}

/// Platform tag used by the static ffmpeg release assets.
pub fn platform_suffix() -> &'static str {
    match (std::env::consts::OS, std::env::consts::ARCH) {
        ("macos", "aarch64") => "darwin-arm64",
        ("macos", _) => "darwin-x64",
        ("windows", _) => "win32-x64",
        ("linux", "aarch64") => "linux-arm64",
        _ => "linux-x64",
    }
}
