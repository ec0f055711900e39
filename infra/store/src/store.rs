//! The collection store: record addressing, per-collection locking, atomic writes,
//! and the read/enumerate/delete operations over the directory layout.

use crate::builder::StoreBuilder;
use crate::codec::{Codec, JsonCodec};
use crate::error::{Result, StoreError, StoreErrorExt};
use crate::locks::LockRegistry;
use crate::maintenance::{self, PurgeReport};
use crate::paths::{CollectionPath, RecordPath, TMP_SUFFIX};
use crate::sink::LogSink;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::ops::Deref;
use std::path::Path;
use std::sync::Arc;
use tokio::fs;
use tokio::io::AsyncWriteExt;

#[cfg(unix)]
const DIR_MODE: u32 = 0o755;
#[cfg(unix)]
const FILE_MODE: u32 = 0o644;

/// Shared state behind every [`CollectionStore`] clone.
#[derive(Debug)]
pub struct StoreInner<C> {
    /// Canonicalized store root.
    pub(crate) root: std::path::PathBuf,
    pub(crate) codec: C,
    pub(crate) sink: Arc<dyn LogSink>,
    pub(crate) locks: LockRegistry,
}

/// A thread-safe handle to a directory-backed record store.
///
/// Records live at `<root>/<collection>/<resource>.<ext>`. Writes and deletes
/// take the collection's lock, so they serialize per collection while other
/// collections proceed in parallel. Reads take no lock and rely on atomic
/// renames to never observe a partially written record.
///
/// The handle is reference-counted and cheap to clone across tasks.
///
/// # Example
///
/// ```rust
/// use tome_store::{CollectionStore, StoreError};
///
/// #[derive(serde::Serialize, serde::Deserialize, PartialEq, Debug)]
/// struct User {
///     name: String,
/// }
///
/// #[tokio::main]
/// async fn main() -> Result<(), StoreError> {
///     # let tmp = tempfile::tempdir().unwrap();
///     # let root = tmp.path().join("db");
///     let store = CollectionStore::builder().root(&root).open().await?;
///
///     store.write("users", "1_john", &User { name: "john".to_owned() }).await?;
///     let user: User = store.read("users", "1_john").await?;
///     assert_eq!(user.name, "john");
///
///     let raw = store.read_all("users").await?;
///     assert_eq!(raw.len(), 1);
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct CollectionStore<C: Codec = JsonCodec> {
    pub(crate) inner: Arc<StoreInner<C>>,
}

impl<C: Codec> Clone for CollectionStore<C> {
    fn clone(&self) -> Self {
        Self { inner: Arc::clone(&self.inner) }
    }
}

impl<C: Codec> Deref for CollectionStore<C> {
    type Target = StoreInner<C>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl CollectionStore {
    #[must_use = "The store is not opened until you call .open()"]
    pub fn builder() -> StoreBuilder {
        StoreBuilder::new()
    }
}

impl<C: Codec> CollectionStore<C> {
    /// The canonicalized root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[must_use]
    pub fn codec(&self) -> &C {
        &self.codec
    }

    /// Number of collections that have had a lock created so far.
    #[must_use]
    pub fn lock_count(&self) -> usize {
        self.locks.len()
    }

    fn record(&self, collection: &str, resource: &str) -> Result<(CollectionPath, RecordPath)> {
        let col = CollectionPath::new(&self.root, collection)?;
        if resource.is_empty() {
            return Err(StoreError::invalid("Missing resource, no name for the record"));
        }
        let record = RecordPath::new(&col, resource, self.codec.extension())?;
        Ok((col, record))
    }

    /// Persists `value` as `<collection>/<resource>.<ext>`.
    ///
    /// The record is encoded first, then written to `<resource>.<ext>.tmp`, synced,
    /// and renamed over the final path. A failure at any step leaves the previous
    /// version intact; a failed rename may leave the staging file behind.
    ///
    /// # Errors
    ///
    /// - [`StoreError::InvalidArgument`] for empty or escaping identifiers.
    /// - [`StoreError::Serialization`] if the codec rejects the value.
    /// - [`StoreError::Io`] on directory creation, write, sync, or rename failure.
    pub async fn write<T>(&self, collection: &str, resource: &str, value: &T) -> Result<()>
    where
        T: Serialize + ?Sized,
    {
        let (col, record) = self.record(collection, resource)?;

        let lock = self.locks.get_or_create(&col.key);
        let _guard = lock.lock().await;

        let bytes = self
            .codec
            .encode(value)
            .context(format!("Failed to encode {collection}/{resource}"))?;

        if let Some(parent) = record.qualified.parent() {
            create_dir_all(parent)
                .await
                .context(format!("Failed to create collection: {}", parent.display()))?;
        }

        let staging = record.staging();
        {
            let mut file = open_for_write(&staging)
                .await
                .context(format!("Staging file creation failed: {}", staging.display()))?;
            file.write_all(&bytes).await.context("Staging write failed")?;
            file.sync_all().await.context("Staging sync failed")?;
        }

        fs::rename(&staging, &record.qualified).await.context(format!(
            "Atomic swap failed: {} -> {}",
            staging.display(),
            record.qualified.display()
        ))?;

        if let Some(parent) = record.qualified.parent() {
            sync_dir(parent).await;
        }

        Ok(())
    }

    /// Reads and decodes a record.
    ///
    /// `resource` may be given with or without the codec extension.
    ///
    /// # Errors
    ///
    /// - [`StoreError::InvalidArgument`] for empty or escaping identifiers.
    /// - [`StoreError::NotFound`] if neither spelling of the resource exists.
    /// - [`StoreError::Io`] on read failure.
    /// - [`StoreError::Serialization`] on malformed content.
    pub async fn read<T>(&self, collection: &str, resource: &str) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let bytes = self.read_raw(collection, resource).await?;
        self.codec.decode(&bytes).context(format!("Failed to decode {collection}/{resource}"))
    }

    /// Reads a record's bytes without decoding them.
    ///
    /// # Errors
    ///
    /// Same as [`read`](Self::read), minus decoding.
    pub async fn read_raw(&self, collection: &str, resource: &str) -> Result<Vec<u8>> {
        let (_, record) = self.record(collection, resource)?;

        let Some(path) = record.resolve_file().await else {
            return Err(StoreError::not_found(format!("{collection}/{resource}")));
        };

        match fs::read(path).await {
            Ok(bytes) => Ok(bytes),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                Err(StoreError::not_found(format!("{collection}/{resource}"))
                    .with_context("Removed while reading"))
            },
            Err(err) => Err(err).context(format!("Read failed: {}", path.display())),
        }
    }

    /// Checks whether a record exists under either spelling.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidArgument`] for empty or escaping identifiers.
    pub async fn exists(&self, collection: &str, resource: &str) -> Result<bool> {
        let (_, record) = self.record(collection, resource)?;
        Ok(record.resolve_file().await.is_some())
    }

    /// Returns the raw bytes of every record in a collection, in directory order.
    ///
    /// Sub-collection directories and in-flight `.tmp` staging files are skipped.
    ///
    /// # Errors
    ///
    /// - [`StoreError::InvalidArgument`] if `collection` is empty.
    /// - [`StoreError::NotFound`] if the collection directory does not exist.
    /// - [`StoreError::Io`] if enumeration or any single read fails; no partial
    ///   result is returned.
    pub async fn read_all(&self, collection: &str) -> Result<Vec<Vec<u8>>> {
        let col = CollectionPath::new(&self.root, collection)?;

        let mut entries = match fs::read_dir(&col.dir).await {
            Ok(entries) => entries,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Err(StoreError::not_found(collection.to_owned()));
            },
            Err(err) => {
                return Err(err).context(format!("Failed to list: {}", col.dir.display()));
            },
        };

        let staging_suffix = format!(".{TMP_SUFFIX}");
        let mut records = Vec::new();

        while let Some(entry) = entries
            .next_entry()
            .await
            .context(format!("Failed to list: {}", col.dir.display()))?
        {
            let path = entry.path();
            let file_type =
                entry.file_type().await.context(format!("Failed to stat: {}", path.display()))?;

            if !file_type.is_file() || entry.file_name().to_string_lossy().ends_with(&staging_suffix)
            {
                continue;
            }

            let bytes = fs::read(&path).await.context(format!("Read failed: {}", path.display()))?;
            records.push(bytes);
        }

        Ok(records)
    }

    /// Reads every record in a collection and decodes each with the store codec.
    ///
    /// # Errors
    ///
    /// Everything [`read_all`](Self::read_all) returns, plus
    /// [`StoreError::Serialization`] if any record fails to decode.
    pub async fn read_all_as<T>(&self, collection: &str) -> Result<Vec<T>>
    where
        T: DeserializeOwned,
    {
        self.read_all(collection)
            .await?
            .iter()
            .map(|bytes| self.codec.decode(bytes))
            .collect::<Result<Vec<T>>>()
            .context(format!("Failed to decode collection {collection}"))
    }

    /// Deletes a record, or a whole directory when `resource` names one.
    ///
    /// An empty `resource` addresses the collection directory itself. Otherwise the
    /// target is resolved like [`read`](Self::read): the name as given wins, and
    /// `<resource>.<ext>` is only considered when the bare path does not exist. When
    /// both `users/x` and `users/x.json` exist, `delete("users", "x")` removes
    /// `users/x` and leaves `users/x.json` in place.
    ///
    /// # Errors
    ///
    /// - [`StoreError::InvalidArgument`] if `collection` is empty, any part escapes
    ///   the root, or a non-empty `resource` collapses to nothing (`"."`).
    /// - [`StoreError::NotFound`] if neither spelling of the target exists.
    /// - [`StoreError::Io`] if removal fails.
    pub async fn delete(&self, collection: &str, resource: &str) -> Result<()> {
        let col = CollectionPath::new(&self.root, collection)?;
        let record = if resource.is_empty() {
            RecordPath::whole(&col)
        } else {
            RecordPath::new(&col, resource, self.codec.extension())?
        };

        let lock = self.locks.get_or_create(&col.key);
        let _guard = lock.lock().await;

        let Some((path, meta)) = record.classify().await else {
            return Err(StoreError::not_found(format!("{collection}/{resource}"))
                .with_context("Unable to find file or directory"));
        };

        if meta.is_dir() {
            fs::remove_dir_all(path)
                .await
                .context(format!("Failed to remove directory: {}", path.display()))
        } else {
            fs::remove_file(path).await.context(format!("Failed to delete: {}", path.display()))
        }
    }

    /// Names of all collection directories directly under the root, sorted.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the root cannot be enumerated.
    pub async fn collections(&self) -> Result<Vec<String>> {
        let mut entries = fs::read_dir(&self.root).await.context("Failed to list store root")?;
        let mut names = Vec::new();

        while let Some(entry) = entries.next_entry().await.context("Failed to list store root")? {
            if entry.file_type().await.is_ok_and(|t| t.is_dir()) {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }

        names.sort_unstable();
        Ok(names)
    }

    /// Removes stale staging files left behind by interrupted or failed writes.
    ///
    /// Only files older than the staleness window are touched, so writes in flight
    /// are never disturbed. Failures are counted and logged, never returned.
    pub async fn purge_orphans(&self) -> PurgeReport {
        let suffix = format!(".{}.{TMP_SUFFIX}", self.codec.extension());
        let report =
            maintenance::purge_orphans(&self.root, suffix, maintenance::STALE_AFTER).await;

        if report.removed > 0 || report.failed > 0 {
            self.sink.info(format_args!(
                "Cleaned up staging files in {}: {} removed, {} failed",
                self.root.display(),
                report.removed,
                report.failed
            ));
        }
        report
    }
}

pub(crate) async fn create_dir_all(path: &Path) -> std::io::Result<()> {
    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    builder.mode(DIR_MODE);
    builder.create(path).await
}

async fn open_for_write(path: &Path) -> std::io::Result<fs::File> {
    let mut options = fs::OpenOptions::new();
    options.create(true).write(true).truncate(true);
    #[cfg(unix)]
    options.mode(FILE_MODE);
    options.open(path).await
}

async fn sync_dir(path: &Path) {
    match fs::File::open(path).await {
        Ok(dir) => {
            if let Err(err) = dir.sync_all().await {
                tracing::warn!(path = %path.display(), error = %err, "Directory sync failed");
            }
        },
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "Directory open failed");
        },
    }
}
