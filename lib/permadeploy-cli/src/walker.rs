//! Incremental deploys of a build output directory.
//!
//! Every file under the build output is keyed by its `/` separated path relative to the build
//! output root. Keys already present in the stored manifest are skipped without looking at the
//! file contents, everything else is uploaded and recorded. Once the walk completes the hashed
//! index document becomes the manifest's entry point, the manifest is saved and then uploaded
//! itself. The manifest's identifier is the deployment identifier.
//!
//! Uploads happen one at a time in walk order. The first failed upload aborts the deploy before
//! the manifest is saved so the next run starts from the previously saved manifest.

use std::collections::HashSet;
use std::io;
use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};

use manifest::{ContentId, Manifest, ManifestStore, MANIFEST_CONTENT_TYPE};
use tracing::{debug, info};

use crate::content_type;
use crate::fs::{relative_key, DeployFileSystem, DirEntry};
use crate::store::ContentStore;
use crate::{CliResult, PermadeployCliError};

/// Result of a completed deploy.
#[derive(Clone, Debug)]
pub struct Deployment {
    /// Identifier of the uploaded manifest.
    pub manifest_id: ContentId,
    pub manifest: Manifest,
    pub uploaded: Vec<String>,
    pub skipped: Vec<String>,
}

pub struct DeployWalker<'a, F, S> {
    fs: &'a F,
    store: &'a S,
    build_dir: PathBuf,
    manifests: ManifestStore,
}

impl<'a, F, S> DeployWalker<'a, F, S>
where
    F: DeployFileSystem,
    S: ContentStore,
{
    pub fn new(
        fs: &'a F,
        store: &'a S,
        build_dir: impl Into<PathBuf>,
        manifests: ManifestStore,
    ) -> Self {
        Self {
            fs,
            store,
            build_dir: build_dir.into(),
            manifests,
        }
    }

    pub fn deploy(&self) -> CliResult<Deployment> {
        if !self.fs.is_dir(&self.build_dir) {
            return Err(PermadeployCliError::MissingBuildOutput(
                self.build_dir.to_owned(),
            ));
        }

        let mut manifest = self.manifests.load();
        debug!(
            "loaded manifest with {} paths from {}",
            manifest.len(),
            self.manifests.path().to_string_lossy()
        );

        let mut walked = HashSet::new();
        let mut uploaded = Vec::new();
        let mut skipped = Vec::new();

        // depth first, children in name order
        let mut pending = self.children(&self.build_dir)?;
        while let Some(entry) = pending.pop() {
            if entry.is_dir {
                pending.extend(self.children(&entry.path)?);
                continue;
            }

            if entry.path == self.manifests.path() {
                debug!(
                    "skipping manifest document {}",
                    entry.path.to_string_lossy()
                );
                continue;
            }

            let Some(key) = relative_key(&self.build_dir, &entry.path) else {
                continue;
            };

            if manifest.contains(&key) {
                info!("- {key} (unchanged, skipping)");
                skipped.push(key.to_owned());
            } else {
                info!("- {key} (changed, uploading)");
                let id = self.upload_file(&entry.path, &key)?;
                manifest.insert(key.to_owned(), id);
                uploaded.push(key.to_owned());
            }
            walked.insert(key);
        }

        if manifest.update_entry_point(|path| walked.contains(path)) {
            info!("entry point {}", manifest.index.path);
        } else {
            debug!("no hashed index document found, entry point unchanged");
        }

        let document = self.manifests.save(&manifest)?;
        let manifest_id = self.upload_manifest(document)?;

        info!(
            "uploaded {} files, skipped {} unchanged",
            uploaded.len(),
            skipped.len()
        );

        Ok(Deployment {
            manifest_id,
            manifest,
            uploaded,
            skipped,
        })
    }

    /// Children of `dir` reversed so popping yields them in name order.
    fn children(&self, dir: &Path) -> CliResult<Vec<DirEntry>> {
        let mut entries = self.fs.read_dir(dir)?;
        entries.reverse();
        Ok(entries)
    }

    fn upload_file(&self, path: &Path, key: &str) -> CliResult<ContentId> {
        let size = self.fs.size(path)?;
        let content_type = content_type::infer(path);
        self.store
            .upload(&|| self.fs.open(path), size, &content_type)
            .map_err(|source| PermadeployCliError::Upload {
                path: key.to_string(),
                source,
            })
    }

    fn upload_manifest(&self, document: Vec<u8>) -> CliResult<ContentId> {
        let size = document.len() as u64;
        let open = || -> io::Result<Box<dyn Read + Send>> {
            Ok(Box::new(Cursor::new(document.clone())))
        };
        self.store
            .upload(&open, size, MANIFEST_CONTENT_TYPE)
            .map_err(|source| PermadeployCliError::Upload {
                path: self.manifests.path().to_string_lossy().to_string(),
                source,
            })
    }
}
