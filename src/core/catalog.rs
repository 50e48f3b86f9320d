use crate::core::{CatalogEntry, CatalogStore, EntryId, PackageSize};
use crate::utils::error::{CalcError, Result};
use indexmap::IndexMap;
use std::sync::{PoisonError, RwLock};

#[derive(Debug, Default)]
struct CatalogState {
    entries: IndexMap<EntryId, CatalogEntry>,
    next_id: u64,
}

/// In-process catalog. Ids are decimal counters starting at 1 and are never
/// reused by the same instance.
#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    state: RwLock<CatalogState>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the catalog; every size is validated like `add`.
    pub fn with_sizes<I: IntoIterator<Item = i64>>(sizes: I) -> Result<Self> {
        let catalog = Self::new();
        for size in sizes {
            catalog.insert(size)?;
        }
        Ok(catalog)
    }

    pub fn len(&self) -> usize {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .entries
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn insert(&self, size: i64) -> Result<CatalogEntry> {
        let size = PackageSize::new(size)?;

        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        state.next_id += 1;
        let entry = CatalogEntry {
            id: EntryId::new(state.next_id.to_string()),
            size,
        };
        state.entries.insert(entry.id.clone(), entry.clone());
        Ok(entry)
    }

    fn delete(&self, id: &str) -> Result<CatalogEntry> {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        // shift_remove keeps the remaining entries in insertion order
        state
            .entries
            .shift_remove(&EntryId::new(id))
            .ok_or_else(|| CalcError::NotFound { id: id.to_string() })
    }

    fn snapshot(&self) -> Vec<CatalogEntry> {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .entries
            .values()
            .cloned()
            .collect()
    }
}

#[async_trait::async_trait]
impl CatalogStore for InMemoryCatalog {
    async fn list(&self) -> Result<Vec<CatalogEntry>> {
        Ok(self.snapshot())
    }

    async fn add(&self, size: i64) -> Result<CatalogEntry> {
        self.insert(size)
    }

    async fn remove(&self, id: &str) -> Result<CatalogEntry> {
        self.delete(id)
    }
}
