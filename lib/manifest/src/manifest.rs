use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::ContentId;

/// Document kind written to the `manifest` field.
pub const MANIFEST_KIND: &str = "arweave/paths";

pub const MANIFEST_VERSION: &str = "0.2.0";

/// Media type the manifest is uploaded with so gateways resolve it as a path manifest.
pub const MANIFEST_CONTENT_TYPE: &str = "application/x.arweave-manifest+json";

const ENTRY_POINT_PREFIX: &str = "index-";
const ENTRY_POINT_SUFFIX: &str = ".html";

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Manifest {
    #[serde(rename = "manifest")]
    pub kind: String,

    pub version: String,

    pub index: IndexEntry,

    /// Relative, forward-slash separated path to the identifier it was uploaded under.
    pub paths: BTreeMap<String, PathEntry>,
}

/// Default document served for the deployment root. An empty `path` means no entry point has been
/// detected yet.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct IndexEntry {
    pub path: String,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct PathEntry {
    pub id: ContentId,
}

impl Default for Manifest {
    fn default() -> Self {
        Self {
            kind: MANIFEST_KIND.to_string(),
            version: MANIFEST_VERSION.to_string(),
            index: IndexEntry::default(),
            paths: BTreeMap::new(),
        }
    }
}

impl Manifest {
    pub fn contains(&self, path: &str) -> bool {
        self.paths.contains_key(path)
    }

    pub fn get(&self, path: &str) -> Option<&ContentId> {
        self.paths.get(path).map(|entry| &entry.id)
    }

    pub fn insert(&mut self, path: impl Into<String>, id: ContentId) {
        self.paths.insert(path.into(), PathEntry { id });
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn entry_point(&self) -> Option<&str> {
        if self.index.path.is_empty() {
            None
        } else {
            Some(self.index.path.as_str())
        }
    }

    /// Finds the hashed index document among the manifest paths.
    ///
    /// Candidates for which `prefer` returns true win over other candidates. Ties are broken by
    /// path order.
    pub fn find_entry_point<F>(&self, prefer: F) -> Option<&str>
    where
        F: Fn(&str) -> bool,
    {
        let mut candidates = self
            .paths
            .keys()
            .map(String::as_str)
            .filter(|path| is_entry_point_candidate(path));

        let first = candidates.next()?;
        if prefer(first) {
            return Some(first);
        }

        Some(candidates.find(|path| prefer(path)).unwrap_or(first))
    }

    /// Points `index.path` at the detected entry point. Leaves it untouched when the manifest has
    /// no candidate and returns whether an entry point was set.
    pub fn update_entry_point<F>(&mut self, prefer: F) -> bool
    where
        F: Fn(&str) -> bool,
    {
        match self.find_entry_point(prefer).map(str::to_string) {
            Some(path) => {
                self.index.path = path;
                true
            }
            None => false,
        }
    }
}

/// Whether the final segment of `path` looks like a content-hashed index document,
/// `index-<anything>.html`, ignoring case.
pub fn is_entry_point_candidate(path: &str) -> bool {
    let file_name = path.rsplit('/').next().unwrap_or(path).to_ascii_lowercase();
    file_name.starts_with(ENTRY_POINT_PREFIX) && file_name.ends_with(ENTRY_POINT_SUFFIX)
}
