use super::{Extraction, Extractor, PassStats};
use crate::aggregate::{coverage_deficit, coverage_surplus, Groups};
use crate::columns::{slots_span, span, ColumnResolver, FamilyPattern, ReviewSlot};
use crate::constants::{
    COVERAGE_TARGET, DECISION_COLUMN, EXTERNAL_PREFIX, NAME_SUFFIX, PC_PREFIX, PRIMARY_COLUMN, SCORE_SUFFIX,
    SUBCOMMITTEE_COLUMN,
};
use crate::error::Result;
use crate::filter::DecisionFilter;
use crate::output::OutputTable;
use crate::table::{Record, Table};
use crate::transform::SlotState;
use serde::Serialize;

/// Reviewer coverage of the active papers led by one primary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PrimaryTally {
    pub subcommittee: String,
    pub papers_needing_reviewers: u32,
    pub overcommitted: u32,
    pub total_papers: u32,
    pub tentative: u32,
    pub missing: u32,
    pub assigned: u32,
    pub completed_external: u32,
    pub completed_pc: u32,
}

/// Per-paper counts feeding a `PrimaryTally`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PaperCoverage {
    pub confirmed: u32,
    pub tentative: u32,
    pub completed_external: u32,
    pub completed_pc: u32,
}

impl PaperCoverage {
    pub fn of(record: &Record, externals: &[ReviewSlot], pc: &[ReviewSlot]) -> Self {
        let mut coverage = PaperCoverage::default();
        for slot in externals {
            match SlotState::classify(record.field(slot.name), record.field(slot.score)) {
                SlotState::Vacant => {}
                SlotState::Tentative => coverage.tentative += 1,
                SlotState::Confirmed => coverage.confirmed += 1,
                SlotState::Completed => {
                    coverage.confirmed += 1;
                    coverage.completed_external += 1;
                }
            }
        }
        for slot in pc {
            if SlotState::classify(record.field(slot.name), record.field(slot.score)) == SlotState::Completed {
                coverage.completed_pc += 1;
            }
        }
        coverage
    }
}

impl PrimaryTally {
    pub fn add(&mut self, paper: PaperCoverage) {
        self.total_papers += 1;
        self.assigned += paper.confirmed;
        self.tentative += paper.tentative;
        self.missing += coverage_deficit(paper.confirmed, paper.tentative);
        self.overcommitted += coverage_surplus(paper.confirmed);
        if paper.confirmed < COVERAGE_TARGET {
            self.papers_needing_reviewers += 1;
        }
        self.completed_external += paper.completed_external;
        self.completed_pc += paper.completed_pc;
    }
}

/// External-reviewer coverage grouped by each paper's primary (`Pname`).
pub struct PrimaryWorkload {
    filter: DecisionFilter,
}

impl PrimaryWorkload {
    pub const NAME: &'static str = "primary-workload";

    pub const HEADER: [&'static str; 10] = [
        "Primary",
        "Subcommittee",
        "Papers Needing Reviewers",
        "Overcommitted Papers",
        "Total Papers",
        "Tentative Reviewers",
        "Missing Reviewers",
        "Assigned Reviewers",
        "Completed External Reviews",
        "Completed PC Reviews",
    ];

    pub fn new(filter: DecisionFilter) -> Self {
        Self { filter }
    }

    pub fn tally(&self, input: &Table) -> Result<(Groups<PrimaryTally>, PassStats)> {
        let columns = ColumnResolver::new(input.header());
        let [primary, decision] = columns.require([PRIMARY_COLUMN, DECISION_COLUMN])?;
        let subcommittee = columns.position(SUBCOMMITTEE_COLUMN);
        let externals = columns.slots(
            &FamilyPattern::new(EXTERNAL_PREFIX, NAME_SUFFIX),
            &FamilyPattern::new(EXTERNAL_PREFIX, SCORE_SUFFIX),
        );
        let pc = columns.slots(
            &FamilyPattern::new(PC_PREFIX, NAME_SUFFIX),
            &FamilyPattern::new(PC_PREFIX, SCORE_SUFFIX),
        );
        let width = span([primary, decision])
            .max(slots_span(&externals))
            .max(slots_span(&pc))
            .max(span(subcommittee));

        let mut groups: Groups<PrimaryTally> = Groups::new();
        let mut stats = PassStats::default();
        for record in input.records() {
            if !stats.admit(Self::NAME, record, width) {
                continue;
            }
            if !self.filter.accepts(record.field(decision)) {
                continue;
            }
            stats.keep();

            // The subcommittee label is taken from the first paper seen for a primary.
            let tally = groups.entry_with(record.trimmed(primary), || PrimaryTally {
                subcommittee: subcommittee.map(|c| record.trimmed(c).to_string()).unwrap_or_default(),
                ..PrimaryTally::default()
            });
            tally.add(PaperCoverage::of(record, &externals, &pc));
        }
        Ok((groups, stats))
    }

    pub fn render(groups: &Groups<PrimaryTally>) -> OutputTable {
        let mut output = OutputTable::new(Self::HEADER);
        for (primary, t) in groups {
            output.push_row(vec![
                primary.clone(),
                t.subcommittee.clone(),
                t.papers_needing_reviewers.to_string(),
                t.overcommitted.to_string(),
                t.total_papers.to_string(),
                t.tentative.to_string(),
                t.missing.to_string(),
                t.assigned.to_string(),
                t.completed_external.to_string(),
                t.completed_pc.to_string(),
            ]);
        }
        output
    }
}

impl Extractor for PrimaryWorkload {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn extract(&self, input: &Table) -> Result<Extraction> {
        let (groups, stats) = self.tally(input)?;
        Ok(Extraction {
            output: Self::render(&groups),
            stats,
        })
    }
}
