//! A small, embeddable record store that maps named collections onto a directory tree.
//!
//! Every record is one human-readable document on disk:
//!
//! ```text
//! <root>/
//! └── users/
//!     ├── 1_john.json
//!     └── 2_jane.json
//! ```
//!
//! # Core Features
//!
//! - **Atomic Writes**: Records are staged as `<resource>.<ext>.tmp`, synced, and renamed
//!   into place, so readers see either the old or the new version and never a torn file.
//! - **Per-Collection Locking**: Writes and deletes serialize per collection through a lazily
//!   grown lock registry; unrelated collections never contend.
//! - **Lock-Free Reads**: `read` and `read_all` go straight to the filesystem with no cache.
//! - **Pluggable Codec**: Records are any `serde` type; the [`Codec`] decides the bytes and
//!   the file extension (pretty JSON by default).
//! - **Pluggable Log Sink**: Store events go through a [`LogSink`], defaulting to `tracing`.
//!
//! # Examples
//!
//! ```rust
//! use tome_store::{CollectionStore, NullSink, StoreError};
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), StoreError> {
//!     # let tmp = tempfile::tempdir().unwrap();
//!     # let root = tmp.path().join("db");
//!     let store = CollectionStore::builder().root(&root).sink(NullSink).open().await?;
//!
//!     store.write("users", "alice", &json!({ "name": "alice" })).await?;
//!     store.write("users", "bob", &json!({ "name": "bob" })).await?;
//!
//!     let users: Vec<serde_json::Value> = store.read_all_as("users").await?;
//!     assert_eq!(users.len(), 2);
//!
//!     store.delete("users", "alice").await?;
//!     assert!(store.read::<serde_json::Value>("users", "alice").await.unwrap_err().is_not_found());
//!     Ok(())
//! }
//! ```

mod builder;
mod codec;
mod error;
mod locks;
mod maintenance;
mod paths;
mod sink;
mod store;

pub use builder::StoreBuilder;
pub use codec::{Codec, JsonCodec};
pub use error::{CodecFailure, Result, StoreError, StoreErrorExt};
pub use maintenance::PurgeReport;
pub use sink::{LogSink, NullSink, TracingSink};
pub use store::CollectionStore;
pub use tracing::level_filters::LevelFilter;
