use fxhash::FxHashMap;
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::Mutex as CollectionLock;

/// Lazily populated map of per-collection locks.
///
/// The outer mutex only guards the map itself and is released before the caller
/// awaits the returned collection lock. Entries are never removed, so two callers
/// asking for the same name always serialize on the same instance.
#[derive(Debug, Default)]
pub(crate) struct LockRegistry {
    locks: Mutex<FxHashMap<String, Arc<CollectionLock<()>>>>,
}

impl LockRegistry {
    pub(crate) fn get_or_create(&self, collection: &str) -> Arc<CollectionLock<()>> {
        let mut locks = self.locks.lock();
        if let Some(lock) = locks.get(collection) {
            return Arc::clone(lock);
        }
        let lock = Arc::new(CollectionLock::new(()));
        locks.insert(collection.to_owned(), Arc::clone(&lock));
        lock
    }

    pub(crate) fn len(&self) -> usize {
        self.locks.lock().len()
    }
}
