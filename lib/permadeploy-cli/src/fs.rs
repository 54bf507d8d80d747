use std::fs;
use std::fs::File;
use std::io;
use std::io::Read;
use std::path::{Path, PathBuf, MAIN_SEPARATOR};

/// A child of a directory being deployed.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DirEntry {
    pub path: PathBuf,
    pub is_dir: bool,
}

/// The filesystem operations a deploy walk needs.
pub trait DeployFileSystem {
    fn is_dir(&self, path: &Path) -> bool;

    /// Children of `path`, ordered by name.
    fn read_dir(&self, path: &Path) -> io::Result<Vec<DirEntry>>;

    /// Size of the file at `path` in bytes.
    fn size(&self, path: &Path) -> io::Result<u64>;

    /// Opens `path` for streaming. May be called more than once for the same path.
    fn open(&self, path: &Path) -> io::Result<Box<dyn Read + Send>>;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct LocalFileSystem;

impl DeployFileSystem for LocalFileSystem {
    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn read_dir(&self, path: &Path) -> io::Result<Vec<DirEntry>> {
        let mut entries = Vec::new();
        for entry in fs::read_dir(path)? {
            let path = entry?.path();
            // follows symlinks
            let is_dir = path.is_dir();
            entries.push(DirEntry { path, is_dir });
        }
        entries.sort_by(|a, b| a.path.file_name().cmp(&b.path.file_name()));

        Ok(entries)
    }

    fn size(&self, path: &Path) -> io::Result<u64> {
        Ok(fs::metadata(path)?.len())
    }

    fn open(&self, path: &Path) -> io::Result<Box<dyn Read + Send>> {
        Ok(Box::new(File::open(path)?))
    }
}

/// Manifest key for `path` relative to `root`, always separated by `/`.
pub fn relative_key(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let key = normalize_key(&relative.to_string_lossy(), MAIN_SEPARATOR);
    if key.is_empty() {
        None
    } else {
        Some(key)
    }
}

/// Rewrites a relative path written with the host `separator` into a `/` separated key.
pub fn normalize_key(relative: &str, separator: char) -> String {
    relative
        .split(|c| c == separator || c == '/')
        .filter(|segment| !segment.is_empty() && *segment != ".")
        .collect::<Vec<_>>()
        .join("/")
}
