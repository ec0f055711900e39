use crate::codec::{Codec, JsonCodec};
use crate::error::{Result, StoreErrorExt};
use crate::locks::LockRegistry;
use crate::sink::{LogSink, TracingSink};
use crate::store::{CollectionStore, StoreInner, create_dir_all};
use private::Sealed;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::fs;

#[derive(Debug, Default)]
pub struct NoRoot;
#[derive(Debug)]
pub struct WithRoot(PathBuf);

mod private {
    pub(super) trait Sealed {}
}
impl Sealed for NoRoot {}
impl Sealed for WithRoot {}

/// Options for opening a [`CollectionStore`].
///
/// The root directory is mandatory and enforced at compile time: `open` only
/// exists once [`root`](StoreBuilder::root) has been called.
#[allow(private_bounds)]
#[derive(Debug)]
pub struct StoreBuilder<S: Sealed = NoRoot, C: Codec = JsonCodec> {
    state: S,
    codec: C,
    sink: Option<Arc<dyn LogSink>>,
    purge_orphans: bool,
}

impl Default for StoreBuilder {
    fn default() -> Self {
        Self { state: NoRoot, codec: JsonCodec, sink: None, purge_orphans: false }
    }
}

#[allow(private_bounds)]
impl<S: Sealed, C: Codec> StoreBuilder<S, C> {
    /// Replaces the default [`TracingSink`] (`INFO`) with a custom sink.
    #[must_use = "Sets the log sink for the store"]
    pub fn sink(mut self, sink: impl LogSink) -> Self {
        self.sink = Some(Arc::new(sink));
        self
    }

    /// Same as [`sink`](Self::sink) for an already shared sink.
    #[must_use = "Sets the log sink for the store"]
    pub fn shared_sink(mut self, sink: Arc<dyn LogSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Swaps the record codec. The codec's extension decides the on-disk file names.
    #[must_use = "Sets the record codec for the store"]
    pub fn codec<N: Codec>(self, codec: N) -> StoreBuilder<S, N> {
        StoreBuilder {
            state: self.state,
            codec,
            sink: self.sink,
            purge_orphans: self.purge_orphans,
        }
    }

    /// Sweeps stale `.tmp` staging files left by interrupted writes while opening.
    #[must_use = "Sets whether orphaned staging files are removed on open"]
    pub const fn purge_orphans(mut self, enable: bool) -> Self {
        self.purge_orphans = enable;
        self
    }
}

impl StoreBuilder {
    #[must_use = "Creates a new store builder with default configuration"]
    pub fn new() -> Self {
        Self::default()
    }
}

impl<C: Codec> StoreBuilder<NoRoot, C> {
    #[must_use = "Sets the root directory of the store"]
    pub fn root(self, path: impl Into<PathBuf>) -> StoreBuilder<WithRoot, C> {
        StoreBuilder {
            state: WithRoot(path.into()),
            codec: self.codec,
            sink: self.sink,
            purge_orphans: self.purge_orphans,
        }
    }
}

impl<C: Codec> StoreBuilder<WithRoot, C> {
    /// Opens the store, creating the root directory (and its parents) when absent.
    ///
    /// An existing directory is adopted as-is; its contents are not validated.
    /// The root is canonicalized afterwards, so [`CollectionStore::root`] always
    /// returns an absolute physical path.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`](crate::StoreError::Io) if the root cannot be
    /// created or resolved.
    pub async fn open(self) -> Result<CollectionStore<C>> {
        let root = self.state.0;
        let sink = self.sink.unwrap_or_else(|| Arc::new(TracingSink::default()));

        let exists = fs::try_exists(&root)
            .await
            .context(format!("Failed to probe store root: {}", root.display()))?;

        if exists {
            sink.debug(format_args!("Database {} already exists", root.display()));
        } else {
            sink.debug(format_args!("Creating database {}", root.display()));
            create_dir_all(&root)
                .await
                .context(format!("Failed to create store root: {}", root.display()))?;
        }

        let canonical = fs::canonicalize(&root)
            .await
            .context(format!("Failed to resolve store root: {}", root.display()))?;

        let store = CollectionStore {
            inner: Arc::new(StoreInner {
                root: canonical,
                codec: self.codec,
                sink,
                locks: LockRegistry::default(),
            }),
        };

        if self.purge_orphans {
            store.purge_orphans().await;
        }

        Ok(store)
    }
}
