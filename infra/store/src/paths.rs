use crate::error::{Result, StoreError};
use std::ffi::OsString;
use std::path::{Component, Path, PathBuf};
use tokio::fs;

/// Suffix appended to the final record path while a write is staged.
pub(crate) const TMP_SUFFIX: &str = "tmp";

/// Collapse `.` / `..` lexically, refusing anything that would leave the store root.
fn normalize_relative(path: &Path) -> Result<PathBuf> {
    let mut out = PathBuf::new();

    for c in path.components() {
        match c {
            Component::CurDir => {},
            Component::Normal(seg) => out.push(seg),
            Component::ParentDir => {
                if !out.pop() {
                    return Err(StoreError::invalid(path.display().to_string())
                        .with_context("Path escapes the store root via '..'"));
                }
            },
            Component::RootDir | Component::Prefix(_) => {
                return Err(StoreError::invalid(path.display().to_string())
                    .with_context("Absolute paths are not allowed"));
            },
        }
    }

    Ok(out)
}

/// Appends `.<ext>` to the whole file name, keeping any dots already present.
pub(crate) fn with_suffix(path: &Path, ext: &str) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".");
    name.push(ext);
    PathBuf::from(name)
}

/// A validated collection directory beneath the store root.
#[derive(Debug, Clone)]
pub(crate) struct CollectionPath {
    /// Normalized relative name; also the lock registry key.
    pub(crate) key: String,
    pub(crate) dir: PathBuf,
}

impl CollectionPath {
    pub(crate) fn new(root: &Path, collection: &str) -> Result<Self> {
        if collection.is_empty() {
            return Err(StoreError::invalid("Missing collection, no place to keep the record"));
        }

        let rel = normalize_relative(Path::new(collection))?;
        if rel.as_os_str().is_empty() {
            return Err(StoreError::invalid(collection.to_owned())
                .with_context("Collection resolves to the store root"));
        }

        Ok(Self { key: rel.to_string_lossy().into_owned(), dir: root.join(rel) })
    }
}

/// Both spellings a resource may live under: as given, and with the codec extension.
#[derive(Debug, Clone)]
pub(crate) struct RecordPath {
    pub(crate) bare: PathBuf,
    pub(crate) qualified: PathBuf,
}

impl RecordPath {
    /// Builds the paths for `resource` inside `collection`.
    ///
    /// A resource that collapses to nothing (`""`, `"."`, `"a/.."`) would address
    /// the collection directory and is rejected.
    pub(crate) fn new(collection: &CollectionPath, resource: &str, ext: &str) -> Result<Self> {
        let rel = normalize_relative(Path::new(resource))?;
        if rel.as_os_str().is_empty() {
            return Err(StoreError::invalid(resource.to_owned())
                .with_context("Resource resolves to the collection directory"));
        }

        let bare = collection.dir.join(rel);
        let qualified = with_suffix(&bare, ext);
        Ok(Self { bare, qualified })
    }

    /// The collection directory itself, as a delete target.
    pub(crate) fn whole(collection: &CollectionPath) -> Self {
        Self { bare: collection.dir.clone(), qualified: collection.dir.clone() }
    }

    pub(crate) fn staging(&self) -> PathBuf {
        with_suffix(&self.qualified, TMP_SUFFIX)
    }

    /// Picks the first existing regular file: the bare path, then the qualified one.
    pub(crate) async fn resolve_file(&self) -> Option<&Path> {
        for candidate in [&self.bare, &self.qualified] {
            if fs::metadata(candidate).await.is_ok_and(|m| m.is_file()) {
                return Some(candidate.as_path());
            }
        }
        None
    }

    /// Stats the bare path, falling back to the qualified path only when the bare
    /// one does not exist.
    pub(crate) async fn classify(&self) -> Option<(&Path, std::fs::Metadata)> {
        match fs::metadata(&self.bare).await {
            Ok(meta) => Some((self.bare.as_path(), meta)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                fs::metadata(&self.qualified).await.ok().map(|m| (self.qualified.as_path(), m))
            },
            Err(_) => None,
        }
    }
}
