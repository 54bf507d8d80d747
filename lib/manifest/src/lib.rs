//! Path manifests map the files of a deployed site to the content identifiers they were uploaded
//! under.
//!
//! A manifest is the document a gateway resolves when the deployment root is requested: it names
//! an entry point (the document served for `/`) and the identifier of every path beneath it. The
//! manifest is kept alongside the project between deploys so that paths which already have an
//! identifier are not uploaded again.
//!
//! Change detection is by path only. A file whose contents change while its path stays the same is
//! not re-uploaded; builds are expected to emit content-hashed file names.

use std::path::PathBuf;

use thiserror::Error;

mod content_id;
mod manifest;
mod store;

pub use content_id::ContentId;
pub use manifest::{
    is_entry_point_candidate, IndexEntry, Manifest, PathEntry, MANIFEST_CONTENT_TYPE,
    MANIFEST_KIND, MANIFEST_VERSION,
};
pub use store::{ManifestStore, DEFAULT_MANIFEST_FILE};

#[remain::sorted]
#[derive(Debug, Error)]
pub enum ManifestError {
    /// Error that may occur while I/O operations.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("json serialize/deserialize error: {0}")]
    SerdeJson(#[from] serde_json::Error),

    #[error("unsupported manifest kind `{kind}` in {}", .path.display())]
    UnsupportedKind { kind: String, path: PathBuf },
}

pub type ManifestResult<T> = Result<T, ManifestError>;
