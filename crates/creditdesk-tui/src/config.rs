//! TUI-owned configuration: a TOML file plus `CREDITDESK_` environment
//! overrides. CLI flags take priority over both; core never sees these
//! types — it receives a ready-made directory handle.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

/// Contents of `config.toml`.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    /// Directory service base URL. When absent, the TUI runs against
    /// the built-in demo directory.
    pub service_url: Option<String>,

    /// Accept invalid TLS certificates (self-signed internal services).
    #[serde(default)]
    pub insecure: bool,

    /// HTTP timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// How long save-outcome toasts stay visible.
    #[serde(default = "default_toast_duration")]
    pub toast_duration_ms: u64,
}

fn default_timeout() -> u64 {
    30
}

fn default_toast_duration() -> u64 {
    5000
}

/// Default config file location (`~/.config/creditdesk/config.toml` on
/// Linux).
pub fn default_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "creditdesk").map(|dirs| dirs.config_dir().join("config.toml"))
}

/// Load configuration: defaults ← TOML file ← environment.
///
/// A missing file is fine — defaults and environment still apply.
pub fn load_config(path_override: Option<&Path>) -> Result<Config, figment::Error> {
    let mut figment = Figment::from(Serialized::defaults(Config {
        service_url: None,
        insecure: false,
        timeout_secs: default_timeout(),
        toast_duration_ms: default_toast_duration(),
    }));

    let path = path_override
        .map(Path::to_path_buf)
        .or_else(default_config_path);
    if let Some(path) = path {
        figment = figment.merge(Toml::file(path));
    }

    figment.merge(Env::prefixed("CREDITDESK_")).extract()
}
