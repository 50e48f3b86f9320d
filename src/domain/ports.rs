use crate::domain::model::{CatalogEntry, PackageSize};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Store of available package sizes.
///
/// Mutations are atomic with respect to `list`; implementations serialize
/// writers. Sizes are validated on `add`, duplicates are allowed.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// All entries in insertion order.
    async fn list(&self) -> Result<Vec<CatalogEntry>>;

    /// Fails with `InvalidSize` unless `size >= 1`.
    async fn add(&self, size: i64) -> Result<CatalogEntry>;

    /// Fails with `NotFound` when no entry has `id`.
    async fn remove(&self, id: &str) -> Result<CatalogEntry>;

    /// Distinct sizes currently present, ascending.
    async fn sizes(&self) -> Result<Vec<PackageSize>> {
        let mut sizes: Vec<PackageSize> = self.list().await?.into_iter().map(|e| e.size).collect();
        sizes.sort_unstable();
        sizes.dedup();
        Ok(sizes)
    }
}
