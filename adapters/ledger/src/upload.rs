//! Batched publication of a level catalogue.

use delve_catalogue::{
    document::{LevelEntry, Metadata},
    LevelCatalogue,
};

use crate::LedgerError;

/// Catalogue split into upload batches.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UploadPlan {
    metadata: Metadata,
    levels: Vec<LevelEntry>,
    batch_size: usize,
}

impl UploadPlan {
    /// Splits `catalogue` into batches of at most `batch_size` levels.
    pub fn new(catalogue: &LevelCatalogue, batch_size: usize) -> Result<Self, LedgerError> {
        if batch_size == 0 {
            return Err(LedgerError::ZeroBatchSize);
        }
        let document = catalogue.to_document();
        Ok(Self {
            metadata: document.metadata,
            levels: document.levels,
            batch_size,
        })
    }

    /// Parameters shared by every level.
    #[must_use]
    pub const fn metadata(&self) -> Metadata {
        self.metadata
    }

    /// Number of levels in the plan.
    #[must_use]
    pub fn level_count(&self) -> u32 {
        u32::try_from(self.levels.len()).unwrap_or(u32::MAX)
    }

    /// Number of batches the plan produces.
    #[must_use]
    pub fn batch_count(&self) -> usize {
        self.levels.len().div_ceil(self.batch_size)
    }

    /// Iterator over the batches in upload order.
    pub fn batches(&self) -> impl Iterator<Item = UploadBatch<'_>> {
        let total = self.levels.len();
        let batch_size = self.batch_size;
        self.levels
            .chunks(batch_size)
            .enumerate()
            .map(move |(index, levels)| {
                let uploaded = index * batch_size + levels.len();
                UploadBatch {
                    first_level: u32::try_from(index * batch_size + 1).unwrap_or(u32::MAX),
                    levels,
                    progress_percent: progress(uploaded, total),
                }
            })
    }
}

/// One batch of an [`UploadPlan`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UploadBatch<'a> {
    /// One-based index of the first level in the batch.
    pub first_level: u32,
    /// Levels contained in the batch.
    pub levels: &'a [LevelEntry],
    /// Share of the catalogue uploaded once this batch lands.
    pub progress_percent: u8,
}

fn progress(uploaded: usize, total: usize) -> u8 {
    if total == 0 {
        return 100;
    }
    u8::try_from(uploaded.min(total) * 100 / total).unwrap_or(100)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_rounds_down_and_caps() {
        assert_eq!(progress(1, 3), 33);
        assert_eq!(progress(3, 3), 100);
        assert_eq!(progress(5, 3), 100);
    }
}
