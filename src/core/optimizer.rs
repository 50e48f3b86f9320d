//! Package-combination search.
//!
//! A plan is ranked by `(package count, overage)`. Every optimal plan ships a
//! total in `[order, order + largest - 1]`: dropping any package from a larger
//! total still covers the order with fewer packages. Minimum package counts
//! for every exact total up to that horizon come from an unbounded
//! coin-change table; parent pointers rebuild one combination.
//!
//! Large orders are reduced before the table is built. In a minimum-count
//! combination the packages other than the largest size number at most
//! `largest - 1` (any `largest` of them contain a group whose sum is a
//! multiple of `largest`, which fewer largest packages replace). Their sum is
//! therefore at most `(largest - 1) * second_largest`, so past that bound a
//! fixed number of largest packages appears in every optimal plan and in
//! every reconstruction path. Those are counted directly and the table only
//! covers the remainder. The result is identical to the unreduced search.
//!
//! Orders that some single size covers, and catalogs with one distinct size,
//! are answered directly and never hit the table limit.

use crate::core::{FulfillmentPlan, PackageSize};
use crate::utils::error::{CalcError, Result};

/// Upper bound on table entries a single search may allocate. Each entry
/// costs 8 bytes, so the default allows about 400 MB per search; callers
/// bound how many searches run at once (see `PackCalculator`).
pub const DEFAULT_MAX_TABLE_ENTRIES: usize = 50_000_000;

const UNREACHABLE: u32 = u32::MAX;

/// Bounded search range for one order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Horizon {
    /// Largest-size packages every optimal plan contains.
    pub forced: u64,
    /// Order quantity left after the forced packages.
    pub residual: u64,
    /// Last candidate total for the residual (inclusive).
    pub end: u64,
}

impl Horizon {
    /// `sizes_desc` must be non-empty, distinct and sorted descending.
    pub fn new(sizes_desc: &[PackageSize], order_size: u64) -> Self {
        let largest = sizes_desc[0].get();
        let bound = match sizes_desc.get(1) {
            Some(second) => (largest - 1).saturating_mul(second.get()),
            None => 0,
        };
        let forced = if order_size > bound {
            (order_size - bound) / largest
        } else {
            0
        };
        let residual = order_size - forced * largest;

        Self {
            forced,
            residual,
            end: residual + largest - 1,
        }
    }

    /// Number of DP entries, totals `0..=end`.
    pub fn table_len(&self) -> u64 {
        self.end + 1
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Optimizer {
    max_table_entries: usize,
}

impl Default for Optimizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Optimizer {
    pub fn new() -> Self {
        Self {
            max_table_entries: DEFAULT_MAX_TABLE_ENTRIES,
        }
    }

    /// Package counts are stored as `u32`, so the limit is capped there.
    pub fn with_max_table_entries(limit: usize) -> Self {
        Self {
            max_table_entries: limit.clamp(1, UNREACHABLE as usize),
        }
    }

    pub fn max_table_entries(&self) -> usize {
        self.max_table_entries
    }

    /// Computes the plan with the fewest packages, then the least overage.
    ///
    /// `sizes` may contain duplicates and be in any order. Ties on both
    /// criteria go to the smallest shipped total; when several sizes reach a
    /// total with the same count, the largest size is taken first.
    pub fn compute(&self, sizes: &[PackageSize], order_size: i64) -> Result<FulfillmentPlan> {
        if order_size < 1 {
            return Err(CalcError::invalid_order_size(order_size));
        }
        let order = order_size as u64;

        let mut sizes_desc = sizes.to_vec();
        sizes_desc.sort_unstable_by(|a, b| b.cmp(a));
        sizes_desc.dedup();
        if sizes_desc.is_empty() {
            return Err(CalcError::NoPackagesAvailable);
        }

        if let Some(plan) = closed_form(&sizes_desc, order) {
            return Ok(plan);
        }

        let horizon = Horizon::new(&sizes_desc, order);
        if horizon.table_len() > self.max_table_entries as u64 {
            return Err(CalcError::SearchSpaceTooLarge {
                required: horizon.table_len(),
                limit: self.max_table_entries,
            });
        }
        tracing::debug!(
            order,
            sizes = sizes_desc.len(),
            forced = horizon.forced,
            residual = horizon.residual,
            table = horizon.table_len(),
            "searching package combinations"
        );

        // Every size is at most `largest <= table_len <= max_table_entries`.
        let steps: Vec<usize> = sizes_desc.iter().map(|s| s.get() as usize).collect();
        let table = MinCountTable::build(&steps, horizon.table_len() as usize);
        let total = table.best_total(horizon.residual as usize, steps[0]);

        let mut counts = vec![0u64; steps.len()];
        let mut remaining = total;
        while remaining > 0 {
            let idx = table.parent[remaining] as usize;
            counts[idx] += 1;
            remaining -= steps[idx];
        }
        counts[0] += horizon.forced;

        Ok(sizes_desc.into_iter().zip(counts).collect())
    }
}

/// Plans that need no table: one package when some size covers the order
/// (smallest such size), or a lone size repeated.
fn closed_form(sizes_desc: &[PackageSize], order: u64) -> Option<FulfillmentPlan> {
    if let Some(&size) = sizes_desc.iter().rev().find(|s| s.get() >= order) {
        return Some(FulfillmentPlan::from_iter([(size, 1)]));
    }
    match sizes_desc {
        [only] => Some(FulfillmentPlan::from_iter([(
            *only,
            order.div_ceil(only.get()),
        )])),
        _ => None,
    }
}

/// Minimum package counts for each exact total.
struct MinCountTable {
    best: Vec<u32>,
    /// Index into the descending size list of the last package on an
    /// optimal path to each total.
    parent: Vec<u32>,
}

impl MinCountTable {
    fn build(steps_desc: &[usize], len: usize) -> Self {
        let mut best = vec![UNREACHABLE; len];
        let mut parent = vec![0u32; len];
        best[0] = 0;

        for total in 1..len {
            for (idx, &step) in steps_desc.iter().enumerate() {
                if step > total {
                    continue;
                }
                let prev = best[total - step];
                // strict `<` keeps the first (largest) size on ties
                if prev != UNREACHABLE && prev + 1 < best[total] {
                    best[total] = prev + 1;
                    parent[total] = idx as u32;
                }
            }
        }

        Self { best, parent }
    }

    /// Reachable total in `[order, len)` with the lowest count, smallest
    /// total first.
    fn best_total(&self, order: usize, largest: usize) -> usize {
        // some multiple of the largest size always lands in the window
        let mut chosen = order.div_ceil(largest) * largest;
        for total in order..self.best.len() {
            if self.best[total] < self.best[chosen] {
                chosen = total;
            } else if self.best[total] == self.best[chosen] && total < chosen {
                chosen = total;
            }
        }
        chosen
    }
}

/// Runs the search with the default table limit.
pub fn compute_plan(sizes: &[PackageSize], order_size: i64) -> Result<FulfillmentPlan> {
    Optimizer::new().compute(sizes, order_size)
}
