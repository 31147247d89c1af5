use crate::aggregate::{Groups, NameCounts};
use crate::error::{Result, TallyError};
use crate::extractors::{Decline, Extraction, Extractor, PassStats, ReviewDeclines, ReviewerBalance};
use crate::output::OutputTable;
use crate::table::Table;
use metrics::counter;
use serde::Serialize;
use std::time::Instant;
use tracing::{info, instrument, warn};

/// A declined reviewer who still has a positive assignment balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AvailableDecline {
    pub name: String,
    pub declines_count: u32,
    pub reviewer_count: i64,
}

pub struct Pipeline;

impl Pipeline {
    /// Run one extractor over its input, logging and recording pass counts.
    #[instrument(skip(extractor, input), fields(extractor = %extractor.name()))]
    pub fn run(extractor: &dyn Extractor, input: &Table) -> Result<Extraction> {
        let started = Instant::now();
        let extraction = extractor.extract(input)?;
        Self::record(extractor.name(), &extraction.stats, extraction.output.len());
        info!(
            "Read {} rows ({} kept, {} skipped), emitted {} rows in {:?}",
            extraction.stats.rows_read,
            extraction.stats.rows_kept,
            extraction.stats.rows_skipped,
            extraction.output.len(),
            started.elapsed()
        );
        Ok(extraction)
    }

    fn record(name: &'static str, stats: &PassStats, output_rows: usize) {
        counter!("review_tally_rows_read_total", "extractor" => name).increment(stats.rows_read as u64);
        counter!("review_tally_rows_kept_total", "extractor" => name).increment(stats.rows_kept as u64);
        counter!("review_tally_rows_skipped_total", "extractor" => name).increment(stats.rows_skipped as u64);
        counter!("review_tally_output_rows_total", "extractor" => name).increment(output_rows as u64);
    }

    /// Joins reviewer balances from the submissions with declines from the
    /// email log. Either stage failing aborts the join.
    #[instrument(skip_all)]
    pub fn available_declines(
        balance: &ReviewerBalance,
        declines: &ReviewDeclines,
        submissions: &Table,
        email_log: &Table,
    ) -> Result<Extraction> {
        let (counts, balance_stats) = balance
            .tally(submissions)
            .map_err(|e| TallyError::in_stage(ReviewerBalance::NAME, e))?;
        info!("Tallied {} reviewer balances", counts.len());
        let (declined, decline_stats) = declines
            .scan(email_log)
            .map_err(|e| TallyError::in_stage(ReviewDeclines::NAME, e))?;
        info!("Found {} declines", declined.len());

        let joined = join_declines(&counts, &declined);
        if joined.is_empty() {
            warn!("No matching names found with a reviewer count greater than zero");
        }
        let stats = balance_stats.merge(decline_stats);
        Self::record("available-declines", &stats, joined.len());
        Ok(Extraction {
            output: render_available(&joined),
            stats,
        })
    }
}

/// Declined names whose balance is strictly positive, sorted by name.
pub fn join_declines(balances: &NameCounts, declines: &[Decline]) -> Vec<AvailableDecline> {
    let mut per_name: Groups<u32> = Groups::new();
    for decline in declines {
        *per_name.entry(&decline.name) += 1;
    }
    per_name
        .iter()
        .filter_map(|(name, &declines_count)| match balances.get(name) {
            Some(&reviewer_count) if reviewer_count > 0 => Some(AvailableDecline {
                name: name.clone(),
                declines_count,
                reviewer_count,
            }),
            _ => None,
        })
        .collect()
}

pub fn render_available(rows: &[AvailableDecline]) -> OutputTable {
    let mut output = OutputTable::new(["name", "declines_count", "reviewer_count"]);
    for row in rows {
        output.push_row(vec![
            row.name.clone(),
            row.declines_count.to_string(),
            row.reviewer_count.to_string(),
        ]);
    }
    output
}
