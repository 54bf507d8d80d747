use std::fs;
use std::path::{Path, PathBuf};

use manifest::{ContentId, DEFAULT_MANIFEST_FILE};
use permadeploy_std::env;
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::{CliResult, PermadeployCliError};

pub const DEFAULT_CONFIG_DIR: &str = ".permadeploy";

pub const DEFAULT_CONFIG_NAME: &str = "settings.toml";

pub const WALLET_FILE: &str = "wallet.json";

pub const BUILD_OUTPUT_DIR: &str = "dist";

pub const DEFAULT_GATEWAY_URL: &str = "https://arweave.net";

pub const UPLOAD_URL_ENV: &str = "PERMADEPLOY_UPLOAD_URL";

pub const GATEWAY_URL_ENV: &str = "PERMADEPLOY_GATEWAY_URL";

/// Well-known locations within a project directory.
#[derive(Clone, Debug)]
pub struct ProjectPaths {
    root: PathBuf,
}

impl ProjectPaths {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn wallet(&self) -> PathBuf {
        self.root.join(WALLET_FILE)
    }

    pub fn build_output(&self) -> PathBuf {
        self.root.join(BUILD_OUTPUT_DIR)
    }

    pub fn manifest(&self) -> PathBuf {
        self.root.join(DEFAULT_MANIFEST_FILE)
    }

    pub fn settings(&self) -> PathBuf {
        self.root.join(DEFAULT_CONFIG_DIR).join(DEFAULT_CONFIG_NAME)
    }
}

/// Service endpoints. Read from `.permadeploy/settings.toml` when present, with
/// `PERMADEPLOY_UPLOAD_URL` and `PERMADEPLOY_GATEWAY_URL` taking precedence.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct Settings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upload_url: Option<Url>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gateway_url: Option<Url>,
}

impl Settings {
    pub fn from_path(path: &Path) -> CliResult<Self> {
        let mut settings = if path.is_file() {
            let content = fs::read_to_string(path)?;
            toml::from_str::<Settings>(&content).map_err(|source| {
                PermadeployCliError::InvalidSettings {
                    path: path.to_path_buf(),
                    source,
                }
            })?
        } else {
            debug!(
                "settings file {} not found, using defaults",
                path.to_string_lossy()
            );
            Settings::default()
        };

        settings.apply_env()?;
        Ok(settings)
    }

    fn apply_env(&mut self) -> CliResult<()> {
        if let Some(url) = env::parse_optional::<Url>(UPLOAD_URL_ENV)? {
            self.upload_url = Some(url);
        }

        if let Some(url) = env::parse_optional::<Url>(GATEWAY_URL_ENV)? {
            self.gateway_url = Some(url);
        }

        Ok(())
    }

    pub fn upload_url(&self) -> CliResult<Url> {
        match &self.upload_url {
            Some(url) => Ok(url.clone()),
            None => Ok(Url::parse(turbo::DEFAULT_UPLOAD_URL)?),
        }
    }

    pub fn gateway_url(&self) -> CliResult<Url> {
        match &self.gateway_url {
            Some(url) => Ok(url.clone()),
            None => Ok(Url::parse(DEFAULT_GATEWAY_URL)?),
        }
    }

    /// Address the deployment can be browsed at once the manifest is available.
    pub fn viewer_url(&self, id: &ContentId) -> CliResult<String> {
        let gateway = self.gateway_url()?;
        Ok(format!("{}/{}", gateway.as_str().trim_end_matches('/'), id))
    }
}
