pub mod calculator;
pub mod catalog;
pub mod optimizer;

pub use crate::domain::model::{CatalogEntry, EntryId, FulfillmentPlan, PackageSize};
pub use crate::domain::ports::CatalogStore;
pub use crate::utils::error::Result;
