use super::{Extraction, Extractor, PassStats};
use crate::aggregate::Groups;
use crate::columns::{slots_span, span, ColumnResolver, FamilyPattern};
use crate::constants::{DECISION_COLUMN, EXTERNAL_PREFIX, NAME_SUFFIX, PC_PREFIX, SCORE_SUFFIX};
use crate::error::Result;
use crate::filter::DecisionFilter;
use crate::output::OutputTable;
use crate::table::Table;
use crate::transform::SlotState;
use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReviewerTally {
    pub completed: u32,
    pub assigned: u32,
}

/// Completed versus assigned reviews per reviewer, PC and external kept apart.
#[derive(Debug, Clone, Default)]
pub struct Workloads {
    pub pc: Groups<ReviewerTally>,
    pub external: Groups<ReviewerTally>,
}

/// Reviews completed and assigned for each PC member and external reviewer.
/// A PC slot is assigned whenever a name is present; an external slot
/// only once the reviewer has confirmed.
pub struct ReviewerWorkload {
    filter: DecisionFilter,
}

impl ReviewerWorkload {
    pub const NAME: &'static str = "reviewer-workload";

    pub fn new(filter: DecisionFilter) -> Self {
        Self { filter }
    }

    pub fn tally(&self, input: &Table) -> Result<(Workloads, PassStats)> {
        let columns = ColumnResolver::new(input.header());
        let [decision] = columns.require([DECISION_COLUMN])?;
        let externals = columns.slots(
            &FamilyPattern::new(EXTERNAL_PREFIX, NAME_SUFFIX),
            &FamilyPattern::new(EXTERNAL_PREFIX, SCORE_SUFFIX),
        );
        let pc = columns.slots(
            &FamilyPattern::new(PC_PREFIX, NAME_SUFFIX),
            &FamilyPattern::new(PC_PREFIX, SCORE_SUFFIX),
        );
        let width = span([decision]).max(slots_span(&externals)).max(slots_span(&pc));

        let mut workloads = Workloads::default();
        let mut stats = PassStats::default();
        for record in input.records() {
            if !stats.admit(Self::NAME, record, width) {
                continue;
            }
            if !self.filter.accepts(record.field(decision)) {
                continue;
            }
            stats.keep();

            for slot in &externals {
                let state = SlotState::classify(record.field(slot.name), record.field(slot.score));
                if state == SlotState::Vacant {
                    continue;
                }
                // A tentative slot lists the reviewer but never counts as assigned,
                // not even on the reviewer's first sighting.
                let tally = workloads.external.entry(record.trimmed(slot.name));
                if state.is_confirmed() {
                    tally.assigned += 1;
                }
                if state == SlotState::Completed {
                    tally.completed += 1;
                }
            }
            for slot in &pc {
                let state = SlotState::classify(record.field(slot.name), record.field(slot.score));
                if state == SlotState::Vacant {
                    continue;
                }
                let tally = workloads.pc.entry(record.trimmed(slot.name));
                tally.assigned += 1;
                if state == SlotState::Completed {
                    tally.completed += 1;
                }
            }
        }
        Ok((workloads, stats))
    }

    /// PC members first, then external reviewers, each sorted by name.
    pub fn render(workloads: &Workloads) -> OutputTable {
        let mut output = OutputTable::new(["Reviewer", "PC?", "Reviews Completed", "Total Reviews Assigned"]);
        for (is_pc, group) in [("true", &workloads.pc), ("false", &workloads.external)] {
            for (name, tally) in group {
                output.push_row(vec![
                    name.clone(),
                    is_pc.to_string(),
                    tally.completed.to_string(),
                    tally.assigned.to_string(),
                ]);
            }
        }
        output
    }
}

impl Extractor for ReviewerWorkload {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn extract(&self, input: &Table) -> Result<Extraction> {
        let (workloads, stats) = self.tally(input)?;
        Ok(Extraction {
            output: Self::render(&workloads),
            stats,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SUBMISSIONS: &str = "Decision,S1name,S1score,E1name,E1score,E2name,E2score\n\
                               RER,Sam,3.00,Alice,T,Bob,2.50\n\
                               ERER,Sam,,Alice,1.00,Bob,\n\
                               A,Sam,4.00,Carl,4.00,,\n";

    #[test]
    fn test_pc_and_external_tallies() {
        let input = Table::from_reader(SUBMISSIONS.as_bytes()).unwrap();
        let (workloads, stats) = ReviewerWorkload::new(DecisionFilter::default()).tally(&input).unwrap();
        assert_eq!(stats.rows_kept, 2);
        assert_eq!(workloads.pc.get("Sam"), Some(&ReviewerTally { completed: 1, assigned: 2 }));
        assert_eq!(workloads.external.get("Alice"), Some(&ReviewerTally { completed: 1, assigned: 1 }));
        assert_eq!(workloads.external.get("Bob"), Some(&ReviewerTally { completed: 1, assigned: 2 }));
        assert!(workloads.external.get("Carl").is_none());
    }

    #[test]
    fn test_render_lists_pc_before_external() {
        let input = Table::from_reader(SUBMISSIONS.as_bytes()).unwrap();
        let output = ReviewerWorkload::new(DecisionFilter::default()).extract(&input).unwrap().output;
        assert_eq!(
            output.to_csv_string().unwrap(),
            "Reviewer,PC?,Reviews Completed,Total Reviews Assigned\n\
             Sam,true,1,2\n\
             Alice,false,1,1\n\
             Bob,false,1,2\n"
        );
    }

    #[test]
    fn test_first_sighting_as_tentative_is_not_assigned() {
        let input = Table::from_reader("Decision,E1name,E1score\nRER,Tia,T\nRER,Tia,2.00\n".as_bytes()).unwrap();
        let (workloads, _) = ReviewerWorkload::new(DecisionFilter::default()).tally(&input).unwrap();
        assert_eq!(workloads.external.get("Tia"), Some(&ReviewerTally { completed: 1, assigned: 1 }));
    }

    #[test]
    fn test_only_tentative_reviewer_has_nothing_assigned() {
        let input = Table::from_reader("Decision,E1name,E1score\nRER,Tia,T\n".as_bytes()).unwrap();
        let (workloads, _) = ReviewerWorkload::new(DecisionFilter::default()).tally(&input).unwrap();
        assert_eq!(workloads.external.get("Tia"), Some(&ReviewerTally::default()));
    }
}
