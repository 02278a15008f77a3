//! Configuration for wabaman.
//!
//! Settings are layered, later layers overriding earlier ones:
//!
//! 1. Built-in defaults ([`Config::default`]).
//! 2. A TOML file, by default `config.toml` in the platform configuration
//!    directory (see [`Config::default_path`]). A missing file is skipped.
//! 3. Environment variables prefixed with `WABAMAN_`, for example
//!    `WABAMAN_GRAPH_API_VERSION=v20.0`.

pub mod error;

use crate::error::{ErrorKind, Result};
use directories::ProjectDirs;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::instrument;
use wabaman_graph::ApiVersion;

const ENV_PREFIX: &str = "WABAMAN_";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Graph API version used unless an operation negotiates its own.
    pub graph_api_version: ApiVersion,
}
impl Default for Config {
    fn default() -> Self {
        Self { graph_api_version: ApiVersion::DEFAULT }
    }
}

impl Config {
    /// Location of the configuration file when none is given explicitly.
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "wabaman").map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Loads configuration from the default file location and the environment.
    pub fn load() -> Result<Self> {
        match Self::default_path() {
            Some(path) => Self::load_from(path),
            None => {
                tracing::debug!("No configuration directory available; skipping configuration file");
                Self::extract(Self::figment(None))
            },
        }
    }

    /// Loads configuration from the given TOML file and the environment.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        Self::extract(Self::figment(Some(path.as_ref())))
    }

    /// The layered providers, exposed so callers can merge in their own.
    pub fn figment(path: Option<&Path>) -> Figment {
        let figment = Figment::from(Serialized::defaults(Self::default()));
        let figment = match path {
            Some(path) => figment.merge(Toml::file(path)),
            None => figment,
        };
        figment.merge(Env::prefixed(ENV_PREFIX))
    }

    fn extract(figment: Figment) -> Result<Self> {
        let config: Self = match figment.extract() {
            Ok(config) => config,
            Err(e) => exn::bail!(ErrorKind::Invalid(e.to_string())),
        };
        tracing::debug!(graph_api_version = %config.graph_api_version, "Configuration loaded");
        Ok(config)
    }
}
