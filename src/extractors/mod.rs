//! Extractors: one pass over an input table producing a derived table.

pub mod paper_locations;
pub mod paper_recommendations;
pub mod paper_scores;
pub mod primary_workload;
pub mod review_declines;
pub mod reviewer_balance;
pub mod reviewer_workload;

pub use paper_locations::PaperLocations;
pub use paper_recommendations::{PaperRecommendations, UnknownCodePolicy};
pub use paper_scores::PaperScores;
pub use primary_workload::PrimaryWorkload;
pub use review_declines::{Decline, ReviewDeclines};
pub use reviewer_balance::ReviewerBalance;
pub use reviewer_workload::ReviewerWorkload;

use crate::error::Result;
use crate::output::OutputTable;
use crate::table::Record;
use serde::Serialize;
use std::fmt;
use tracing::warn;

/// Row counts for one pass over an input table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PassStats {
    pub rows_read: usize,
    pub rows_kept: usize,
    pub rows_skipped: usize,
}

impl PassStats {
    /// Counts a row and checks it is wide enough for the resolved columns.
    /// Short rows are logged and counted as skipped.
    pub fn admit(&mut self, extractor: &str, record: &Record, width: usize) -> bool {
        self.rows_read += 1;
        match record.ensure_width(width) {
            Ok(()) => true,
            Err(e) => {
                self.skip(extractor, e);
                false
            }
        }
    }

    pub fn keep(&mut self) {
        self.rows_kept += 1;
    }

    pub fn skip(&mut self, extractor: &str, reason: impl fmt::Display) {
        warn!("{}: skipping row: {}", extractor, reason);
        self.rows_skipped += 1;
    }

    pub fn merge(self, other: PassStats) -> PassStats {
        PassStats {
            rows_read: self.rows_read + other.rows_read,
            rows_kept: self.rows_kept + other.rows_kept,
            rows_skipped: self.rows_skipped + other.rows_skipped,
        }
    }
}

/// Result of running an extractor.
#[derive(Debug, Clone)]
pub struct Extraction {
    pub output: OutputTable,
    pub stats: PassStats,
}

/// A single-table extractor. Auxiliary inputs (lookup tables, cutoff dates)
/// are supplied when the extractor is constructed.
pub trait Extractor {
    /// Name used for logging and metrics labels; matches the CLI subcommand.
    fn name(&self) -> &'static str;

    fn extract(&self, input: &crate::table::Table) -> Result<Extraction>;
}
