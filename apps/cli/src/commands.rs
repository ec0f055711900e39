use crate::seed::{self, User};
use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;
use tome_store::CollectionStore;
use tracing::info;

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn decode_all(records: &[Vec<u8>]) -> Result<Vec<Value>> {
    records
        .iter()
        .map(|bytes| serde_json::from_slice(bytes).context("Stored record is not valid JSON"))
        .collect()
}

pub async fn write(store: &CollectionStore, collection: &str, resource: &str, json: &str) -> Result<()> {
    let value: Value = serde_json::from_str(json).context("Record body must be valid JSON")?;
    store.write(collection, resource, &value).await?;
    info!(collection, resource, "Record written");
    Ok(())
}

pub async fn read(store: &CollectionStore, collection: &str, resource: &str) -> Result<()> {
    let value: Value = store.read(collection, resource).await?;
    print_json(&value)
}

pub async fn read_all(store: &CollectionStore, collection: &str) -> Result<()> {
    let records = store.read_all(collection).await?;
    print_json(&decode_all(&records)?)
}

pub async fn delete(store: &CollectionStore, collection: &str, resource: &str) -> Result<()> {
    store.delete(collection, resource).await?;
    info!(collection, resource, "Deleted");
    Ok(())
}

pub async fn collections(store: &CollectionStore) -> Result<()> {
    for name in store.collections().await? {
        println!("{name}");
    }
    Ok(())
}

pub async fn purge(store: &CollectionStore) -> Result<()> {
    let report = store.purge_orphans().await;
    println!("removed: {}, failed: {}", report.removed, report.failed);
    Ok(())
}

pub async fn seed(store: &CollectionStore) -> Result<()> {
    for (key, user) in seed::employees() {
        store
            .write(seed::COLLECTION, &key, &user)
            .await
            .with_context(|| format!("Failed to seed record {key}"))?;
    }

    let users: Vec<User> = store.read_all_as(seed::COLLECTION).await?;
    info!(count = users.len(), "Seeded sample users");
    print_json(&users)
}
