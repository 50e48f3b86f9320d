use crate::utils::error::{CalcError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Capacity of one package. Always at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u64")]
pub struct PackageSize(u64);

impl PackageSize {
    pub fn new(raw: i64) -> Result<Self> {
        if raw < 1 {
            return Err(CalcError::invalid_size(raw));
        }
        Ok(Self(raw as u64))
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl TryFrom<i64> for PackageSize {
    type Error = CalcError;

    fn try_from(raw: i64) -> Result<Self> {
        Self::new(raw)
    }
}

impl From<PackageSize> for u64 {
    fn from(size: PackageSize) -> u64 {
        size.0
    }
}

impl fmt::Display for PackageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque catalog key assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(String);

impl EntryId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: EntryId,
    pub size: PackageSize,
}

/// Package counts per size. Iterates in ascending size order and serializes
/// as `{"<size>": count}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FulfillmentPlan {
    counts: BTreeMap<PackageSize, u64>,
}

impl FulfillmentPlan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, size: PackageSize, count: u64) {
        if count > 0 {
            *self.counts.entry(size).or_insert(0) += count;
        }
    }

    pub fn count_of(&self, size: PackageSize) -> u64 {
        self.counts.get(&size).copied().unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (PackageSize, u64)> + '_ {
        self.counts.iter().map(|(size, count)| (*size, *count))
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn total_packages(&self) -> u64 {
        self.counts.values().sum()
    }

    pub fn shipped(&self) -> u64 {
        self.iter().map(|(size, count)| size.get() * count).sum()
    }

    pub fn overage(&self, order_size: u64) -> u64 {
        self.shipped().saturating_sub(order_size)
    }
}

impl FromIterator<(PackageSize, u64)> for FulfillmentPlan {
    fn from_iter<I: IntoIterator<Item = (PackageSize, u64)>>(iter: I) -> Self {
        let mut plan = FulfillmentPlan::new();
        for (size, count) in iter {
            plan.add(size, count);
        }
        plan
    }
}
