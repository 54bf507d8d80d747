use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::{Manifest, ManifestError, ManifestResult, MANIFEST_KIND};

pub const DEFAULT_MANIFEST_FILE: &str = "manifest.json";

/// Reads and writes the manifest kept between deploys.
#[derive(Clone, Debug)]
pub struct ManifestStore {
    path: PathBuf,
}

impl ManifestStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store for the well-known manifest location within `dir`.
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join(DEFAULT_MANIFEST_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the stored manifest, falling back to an empty one when there is no usable document.
    /// A missing or malformed manifest is treated as a first deploy.
    pub fn load(&self) -> Manifest {
        match self.try_load() {
            Ok(manifest) => manifest,
            Err(e) => {
                debug!(
                    "using empty manifest, unable to read {}: {}",
                    self.path.to_string_lossy(),
                    e
                );
                Manifest::default()
            }
        }
    }

    pub fn try_load(&self) -> ManifestResult<Manifest> {
        let content = fs::read(&self.path)?;
        let manifest: Manifest = serde_json::from_slice(&content)?;
        if manifest.kind != MANIFEST_KIND {
            return Err(ManifestError::UnsupportedKind {
                kind: manifest.kind,
                path: self.path.to_owned(),
            });
        }

        Ok(manifest)
    }

    /// Writes `manifest` over any existing document and returns the bytes written.
    pub fn save(&self, manifest: &Manifest) -> ManifestResult<Vec<u8>> {
        let document = serde_json::to_vec_pretty(manifest)?;
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.path, &document)?;
        Ok(document)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use crate::{ContentId, Manifest, ManifestError, ManifestStore};

    #[test]
    fn should_default_when_manifest_missing() {
        let dir = TempDir::new().unwrap();
        let store = ManifestStore::in_dir(dir.path());

        assert_eq!(Manifest::default(), store.load());
        assert!(!store.path().exists());

        dir.close().unwrap();
    }

    #[test]
    fn should_default_when_manifest_malformed() {
        let dir = TempDir::new().unwrap();
        let store = ManifestStore::in_dir(dir.path());
        fs::write(store.path(), "{ \"manifest\": \"arweave/paths\", ").unwrap();

        assert!(store.try_load().is_err());
        assert_eq!(Manifest::default(), store.load());

        dir.close().unwrap();
    }

    #[test]
    fn should_reject_other_document_kinds() {
        let dir = TempDir::new().unwrap();
        let store = ManifestStore::in_dir(dir.path());
        fs::write(
            store.path(),
            r#"{"manifest": "other/kind", "version": "1", "index": {"path": ""}, "paths": {}}"#,
        )
        .unwrap();

        assert!(matches!(
            store.try_load(),
            Err(ManifestError::UnsupportedKind { .. })
        ));
        assert_eq!(Manifest::default(), store.load());

        dir.close().unwrap();
    }

    #[test]
    fn should_round_trip_saved_manifest() {
        let dir = TempDir::new().unwrap();
        let store = ManifestStore::in_dir(dir.path());

        let mut manifest = Manifest::default();
        manifest.insert("index-ab12.html", ContentId::new("id-index"));
        manifest.insert("assets/img/logo.png", ContentId::new("id-logo"));
        manifest.index.path = "index-ab12.html".to_string();

        store.save(&manifest).unwrap();
        let loaded = store.load();

        assert_eq!(manifest.paths, loaded.paths);
        assert_eq!(Some("index-ab12.html"), loaded.entry_point());

        dir.close().unwrap();
    }

    #[test]
    fn should_replace_existing_content() {
        let dir = TempDir::new().unwrap();
        let store = ManifestStore::in_dir(dir.path());
        fs::write(store.path(), "x".repeat(4096)).unwrap();

        let document = store.save(&Manifest::default()).unwrap();

        assert_eq!(document, fs::read(store.path()).unwrap());
        assert_eq!(Manifest::default(), store.try_load().unwrap());

        dir.close().unwrap();
    }

    #[test]
    fn should_write_readable_document() {
        let dir = TempDir::new().unwrap();
        let store = ManifestStore::in_dir(dir.path());

        let mut manifest = Manifest::default();
        manifest.insert("about.html", ContentId::new("abc"));
        manifest.insert("index-ab12.html", ContentId::new("def"));
        manifest.index.path = "index-ab12.html".to_string();

        let document = String::from_utf8(store.save(&manifest).unwrap()).unwrap();

        insta::assert_snapshot!(document, @r###"
        {
          "manifest": "arweave/paths",
          "version": "0.2.0",
          "index": {
            "path": "index-ab12.html"
          },
          "paths": {
            "about.html": {
              "id": "abc"
            },
            "index-ab12.html": {
              "id": "def"
            }
          }
        }
        "###);

        dir.close().unwrap();
    }
}
