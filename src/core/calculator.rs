use crate::core::optimizer::Optimizer;
use crate::core::{CatalogStore, EntryId, FulfillmentPlan, PackageSize};
use crate::utils::error::{CalcError, Result};
use indexmap::IndexMap;
use std::sync::Arc;
use tokio::sync::Semaphore;

/// Searches allowed to hold a table at the same time.
pub const DEFAULT_MAX_CONCURRENT_SEARCHES: usize = 4;

/// Catalog maintenance and plan calculation over an injected store.
pub struct PackCalculator<C: CatalogStore> {
    catalog: C,
    optimizer: Optimizer,
    searches: Arc<Semaphore>,
}

impl<C: CatalogStore> PackCalculator<C> {
    pub fn new(catalog: C) -> Self {
        Self::with_optimizer(catalog, Optimizer::new())
    }

    pub fn with_optimizer(catalog: C, optimizer: Optimizer) -> Self {
        Self {
            catalog,
            optimizer,
            searches: Arc::new(Semaphore::new(DEFAULT_MAX_CONCURRENT_SEARCHES)),
        }
    }

    /// At most `limit` searches (minimum 1) run at once; later calls wait
    /// for a slot.
    pub fn with_search_limit(mut self, limit: usize) -> Self {
        self.searches = Arc::new(Semaphore::new(limit.max(1)));
        self
    }

    pub fn available_search_slots(&self) -> usize {
        self.searches.available_permits()
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    /// Entry ids mapped to sizes, in insertion order.
    pub async fn list_packages(&self) -> Result<IndexMap<EntryId, PackageSize>> {
        let entries = self.catalog.list().await?;
        tracing::debug!("Listing {} catalog entries", entries.len());
        Ok(entries.into_iter().map(|e| (e.id, e.size)).collect())
    }

    pub async fn add_package(&self, size: i64) -> Result<EntryId> {
        match self.catalog.add(size).await {
            Ok(entry) => {
                tracing::info!("Added package {} (size {})", entry.id, entry.size);
                Ok(entry.id)
            }
            Err(e) => {
                tracing::warn!("Rejected package size {}: {}", size, e);
                Err(e)
            }
        }
    }

    pub async fn remove_package(&self, id: &str) -> Result<()> {
        match self.catalog.remove(id).await {
            Ok(entry) => {
                tracing::info!("Removed package {} (size {})", entry.id, entry.size);
                Ok(())
            }
            Err(e) => {
                tracing::warn!("Failed to remove package {}: {}", id, e);
                Err(e)
            }
        }
    }

    /// Plans against the sizes present when the call starts. The search runs
    /// on the blocking pool and holds a search slot until it finishes, even
    /// if the caller stops waiting.
    pub async fn calculate(&self, order_size: i64) -> Result<FulfillmentPlan> {
        let sizes = self.catalog.sizes().await?;
        tracing::debug!("Calculating order {} over {} sizes", order_size, sizes.len());

        let permit = Arc::clone(&self.searches)
            .acquire_owned()
            .await
            .map_err(|e| CalcError::TaskFailed {
                message: e.to_string(),
            })?;

        let optimizer = self.optimizer;
        let plan = tokio::task::spawn_blocking(move || {
            let _permit = permit;
            optimizer.compute(&sizes, order_size)
        })
        .await
        .map_err(|e| CalcError::TaskFailed {
            message: e.to_string(),
        })?;

        match plan {
            Ok(plan) => {
                tracing::info!(
                    "Order {} -> {} packages, shipped {}, overage {}",
                    order_size,
                    plan.total_packages(),
                    plan.shipped(),
                    plan.overage(order_size as u64)
                );
                Ok(plan)
            }
            Err(e) => {
                tracing::warn!("Calculation for order {} failed: {}", order_size, e);
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::catalog::InMemoryCatalog;
    use crate::core::CatalogEntry;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn standard() -> PackCalculator<InMemoryCatalog> {
        let catalog = InMemoryCatalog::with_sizes([250, 500, 1000, 2000, 5000]).unwrap();
        PackCalculator::new(catalog)
    }

    #[tokio::test]
    async fn test_list_packages_in_insertion_order() {
        let calculator = PackCalculator::new(InMemoryCatalog::new());
        calculator.add_package(1000).await.unwrap();
        calculator.add_package(250).await.unwrap();

        let packages = calculator.list_packages().await.unwrap();
        let pairs: Vec<(&str, u64)> = packages.iter().map(|(k, v)| (k.as_str(), v.get())).collect();
        assert_eq!(pairs, vec![("1", 1000), ("2", 250)]);
    }

    #[tokio::test]
    async fn test_calculate_reflects_catalog_changes() {
        let calculator = standard();
        let plan = calculator.calculate(251).await.unwrap();
        assert_eq!(plan.count_of(PackageSize::new(500).unwrap()), 1);

        // drop the 500 entry (id 2); one 1000 still beats two 250s on count
        calculator.remove_package("2").await.unwrap();
        let plan = calculator.calculate(251).await.unwrap();
        assert_eq!(plan.total_packages(), 1);
        assert_eq!(plan.count_of(PackageSize::new(1000).unwrap()), 1);
    }

    #[tokio::test]
    async fn test_errors_pass_through() {
        let calculator = PackCalculator::new(InMemoryCatalog::new());
        assert!(matches!(
            calculator.calculate(10).await,
            Err(CalcError::NoPackagesAvailable)
        ));
        assert!(matches!(
            calculator.add_package(0).await,
            Err(CalcError::InvalidSize { .. })
        ));
        assert!(matches!(
            calculator.remove_package("nonexistent").await,
            Err(CalcError::NotFound { .. })
        ));
        assert!(matches!(
            standard().calculate(0).await,
            Err(CalcError::InvalidOrderSize { .. })
        ));
    }

    #[tokio::test]
    async fn test_table_limit_applies() {
        let catalog = InMemoryCatalog::with_sizes([1000, 999]).unwrap();
        let calculator = PackCalculator::with_optimizer(catalog, Optimizer::with_max_table_entries(10));
        assert!(matches!(
            calculator.calculate(5000).await,
            Err(CalcError::SearchSpaceTooLarge { .. })
        ));
        // a covering size needs no table
        assert_eq!(calculator.calculate(1).await.unwrap().total_packages(), 1);
    }

    #[tokio::test]
    async fn test_search_limit_queues_calculations() {
        let catalog = InMemoryCatalog::with_sizes([23, 31, 53]).unwrap();
        let calculator = Arc::new(PackCalculator::new(catalog).with_search_limit(1));
        assert_eq!(calculator.available_search_slots(), 1);

        // hold the only slot so the next calculation has to wait
        let held = Arc::clone(&calculator.searches).acquire_owned().await.unwrap();
        let pending = tokio::spawn({
            let calculator = Arc::clone(&calculator);
            async move { calculator.calculate(263).await }
        });
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        assert!(!pending.is_finished());

        drop(held);
        let plan = pending.await.unwrap().unwrap();
        assert_eq!(plan.total_packages(), 5);
        assert_eq!(calculator.available_search_slots(), 1);
    }

    #[tokio::test]
    async fn test_search_limit_is_at_least_one() {
        let calculator = standard().with_search_limit(0);
        assert_eq!(calculator.available_search_slots(), 1);
        assert!(calculator.calculate(251).await.is_ok());
    }

    /// Store that counts reads, to check calculate snapshots the catalog once.
    struct CountingStore {
        inner: InMemoryCatalog,
        lists: AtomicUsize,
    }

    #[async_trait::async_trait]
    impl CatalogStore for CountingStore {
        async fn list(&self) -> Result<Vec<CatalogEntry>> {
            self.lists.fetch_add(1, Ordering::SeqCst);
            self.inner.list().await
        }

        async fn add(&self, size: i64) -> Result<CatalogEntry> {
            self.inner.add(size).await
        }

        async fn remove(&self, id: &str) -> Result<CatalogEntry> {
            self.inner.remove(id).await
        }
    }

    #[tokio::test]
    async fn test_calculate_reads_one_snapshot() {
        let store = CountingStore {
            inner: InMemoryCatalog::with_sizes([23, 31, 53]).unwrap(),
            lists: AtomicUsize::new(0),
        };
        let calculator = PackCalculator::new(store);

        let plan = calculator.calculate(263).await.unwrap();
        assert_eq!(plan.total_packages(), 5);
        assert_eq!(calculator.catalog().lists.load(Ordering::SeqCst), 1);
    }
}
