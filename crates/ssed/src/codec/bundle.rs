//! Packing of outbound rows into bounded bundles.

use std::mem;

use crate::proto::BundledRows;

use super::cell::Row;

/// Accumulates rows and releases a bundle whenever the limit is reached.
#[derive(Debug)]
pub struct Bundler {
    limit: usize,
    pending: BundledRows,
}

impl Bundler {
    /// Creates a bundler releasing at most `limit` rows per bundle.
    /// A zero limit is treated as one.
    #[must_use]
    pub fn new(limit: usize) -> Self {
        let capped = limit.max(1);
        Self {
            limit: capped,
            pending: BundledRows {
                rows: Vec::with_capacity(capped),
            },
        }
    }

    /// Adds a row, returning a full bundle when the limit is reached.
    pub fn push(&mut self, row: Row) -> Option<BundledRows> {
        self.pending.rows.push(row.into_wire());
        (self.pending.rows.len() >= self.limit).then(|| self.take())
    }

    /// Releases any rows still pending.
    pub fn finish(&mut self) -> Option<BundledRows> {
        (!self.pending.rows.is_empty()).then(|| self.take())
    }

    /// Rows waiting for the next release.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.pending.rows.len()
    }

    fn take(&mut self) -> BundledRows {
        mem::replace(
            &mut self.pending,
            BundledRows {
                rows: Vec::with_capacity(self.limit),
            },
        )
    }
}
