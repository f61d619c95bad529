#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Ledger adapter that records session milestones for an external contract.
//!
//! The adapter only observes events. It converts the ones worth recording into
//! [`LedgerRecord`] values, numbers them, and hands them to a [`LedgerSink`].
//! Level catalogues are published in batches through an [`UploadPlan`].

use std::io::Write;

use delve_catalogue::{
    document::{LevelEntry, Metadata},
    LevelCatalogue,
};
use delve_core::{CellCoord, Event};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

mod upload;

pub use upload::{UploadBatch, UploadPlan};

/// Milestone recorded on the ledger.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LedgerRecord {
    /// A treasure was picked up.
    TreasureCollected {
        /// Level the treasure belonged to.
        level: u32,
        /// Cell that held the treasure.
        cell: CellCoord,
        /// Diamonds awarded.
        diamonds: u64,
    },
    /// A chest was opened.
    ChestOpened {
        /// Level the chest belonged to.
        level: u32,
        /// Cell that held the chest.
        cell: CellCoord,
        /// Diamonds rolled for the chest.
        diamonds: u64,
    },
    /// A level was completed.
    LevelCompleted {
        /// Completed level.
        level: u32,
        /// Diamonds gathered on that level.
        diamonds_this_level: u64,
    },
    /// The session was won.
    GameWon {
        /// Steps taken across the session.
        total_steps: u64,
        /// Diamonds gathered across the session.
        total_diamonds: u64,
    },
    /// Catalogue parameters published ahead of the level batches.
    CatalogueMetadata {
        /// Shared grid size and reward parameters.
        metadata: Metadata,
        /// Number of levels that will follow.
        level_count: u32,
    },
    /// A batch of level layouts.
    LevelBatch {
        /// One-based index of the first level in the batch.
        first_level: u32,
        /// Level layouts in document form.
        levels: Vec<LevelEntry>,
        /// Upload progress after this batch, in percent.
        progress_percent: u8,
    },
}

/// Record stamped with its position in the ledger.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// Zero-based submission order.
    pub sequence: u64,
    /// Recorded milestone.
    pub record: LedgerRecord,
}

/// Destination for ledger entries.
pub trait LedgerSink {
    /// Stores a single entry.
    fn submit(&mut self, entry: &LedgerEntry) -> Result<(), LedgerError>;
}

/// Sink that keeps every entry in memory.
#[derive(Clone, Debug, Default)]
pub struct MemorySink {
    entries: Vec<LedgerEntry>,
}

impl MemorySink {
    /// Entries submitted so far.
    #[must_use]
    pub fn entries(&self) -> &[LedgerEntry] {
        &self.entries
    }
}

impl LedgerSink for MemorySink {
    fn submit(&mut self, entry: &LedgerEntry) -> Result<(), LedgerError> {
        self.entries.push(entry.clone());
        Ok(())
    }
}

/// Sink that appends entries to a writer as JSON lines.
#[derive(Debug)]
pub struct JournalSink<W> {
    writer: W,
}

impl<W: Write> JournalSink<W> {
    /// Wraps `writer`.
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Returns the wrapped writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> LedgerSink for JournalSink<W> {
    fn submit(&mut self, entry: &LedgerEntry) -> Result<(), LedgerError> {
        serde_json::to_writer(&mut self.writer, entry)?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        Ok(())
    }
}

/// Errors raised while recording milestones.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// The journal could not be written.
    #[error("ledger journal write failed: {0}")]
    Io(#[from] std::io::Error),
    /// An entry could not be encoded.
    #[error("ledger entry could not be encoded: {0}")]
    Encode(#[from] serde_json::Error),
    /// Upload batches must hold at least one level.
    #[error("upload batch size must be positive")]
    ZeroBatchSize,
}

/// Observes session events and forwards ledger-worthy ones to a sink.
#[derive(Debug)]
pub struct LedgerClient<S> {
    sink: S,
    sequence: u64,
    level: u32,
}

impl<S: LedgerSink> LedgerClient<S> {
    /// Creates a client that starts tracking at level one.
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            sequence: 0,
            level: 1,
        }
    }

    /// Number of entries submitted so far.
    #[must_use]
    pub const fn submitted(&self) -> u64 {
        self.sequence
    }

    /// Read-only access to the sink.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Returns the sink.
    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Records every milestone contained in `events`.
    ///
    /// Returns the number of entries submitted.
    pub fn observe(&mut self, events: &[Event]) -> Result<usize, LedgerError> {
        let mut recorded = 0;
        for event in events {
            if let Some(record) = self.record_for(event) {
                self.record(record)?;
                recorded += 1;
            }
        }
        Ok(recorded)
    }

    /// Publishes a catalogue in batches of `batch_size` levels.
    pub fn upload(
        &mut self,
        catalogue: &LevelCatalogue,
        batch_size: usize,
    ) -> Result<UploadPlan, LedgerError> {
        let plan = UploadPlan::new(catalogue, batch_size)?;
        self.record(LedgerRecord::CatalogueMetadata {
            metadata: plan.metadata(),
            level_count: plan.level_count(),
        })?;
        for batch in plan.batches() {
            info!(
                first_level = batch.first_level,
                levels = batch.levels.len(),
                progress = batch.progress_percent,
                "uploading level batch"
            );
            self.record(LedgerRecord::LevelBatch {
                first_level: batch.first_level,
                levels: batch.levels.to_vec(),
                progress_percent: batch.progress_percent,
            })?;
        }
        Ok(plan)
    }

    fn record_for(&mut self, event: &Event) -> Option<LedgerRecord> {
        match *event {
            Event::LevelStarted { level, .. } => {
                self.level = level;
                None
            }
            Event::SessionReset => {
                self.level = 1;
                None
            }
            Event::TreasureCollected { cell, diamonds } => Some(LedgerRecord::TreasureCollected {
                level: self.level,
                cell,
                diamonds,
            }),
            Event::ChestOpened { cell, diamonds } => Some(LedgerRecord::ChestOpened {
                level: self.level,
                cell,
                diamonds,
            }),
            Event::LevelCompleted {
                level,
                diamonds_this_level,
            } => Some(LedgerRecord::LevelCompleted {
                level,
                diamonds_this_level,
            }),
            Event::GameWon {
                total_steps,
                total_diamonds,
            } => Some(LedgerRecord::GameWon {
                total_steps,
                total_diamonds,
            }),
            Event::PlayerMoved { .. }
            | Event::MoveRejected { .. }
            | Event::PortalReached { .. } => None,
        }
    }

    fn record(&mut self, record: LedgerRecord) -> Result<(), LedgerError> {
        let entry = LedgerEntry {
            sequence: self.sequence,
            record,
        };
        self.sink.submit(&entry)?;
        debug!(sequence = entry.sequence, record = ?entry.record, "ledger entry submitted");
        self.sequence += 1;
        Ok(())
    }
}
