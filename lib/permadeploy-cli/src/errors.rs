use std::path::PathBuf;

use thiserror::Error;

use crate::store::StoreError;

#[remain::sorted]
#[derive(Debug, Error)]
pub enum PermadeployCliError {
    #[error("turbo client error: {0}")]
    ClientError(#[from] turbo::ClientError),

    #[error("invalid settings file {}: {source}", .path.display())]
    InvalidSettings {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid wallet format. Must be JSON or base64 encoded JSON")]
    InvalidWallet,

    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("manifest error: {0}")]
    ManifestError(#[from] manifest::ManifestError),

    #[error("build output {} not found. Run your build first.", .0.display())]
    MissingBuildOutput(PathBuf),

    #[error("{} not found in project root", .0.display())]
    MissingWallet(PathBuf),

    #[error(transparent)]
    PermadeployStdError(#[from] permadeploy_std::error::PermadeployStdError),

    #[error("failed to upload {path}: {source}")]
    Upload {
        path: String,
        #[source]
        source: StoreError,
    },

    #[error("url error: {0}")]
    UrlParse(#[from] url::ParseError),
}

pub type CliResult<T> = Result<T, PermadeployCliError>;
