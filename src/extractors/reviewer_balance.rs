use super::{Extraction, Extractor, PassStats};
use crate::aggregate::NameCounts;
use crate::columns::{span, ColumnResolver, FamilyPattern};
use crate::constants::{DECISION_COLUMN, EXTERNAL_PREFIX, NAME_SUFFIX, STATIC_REVIEWER_COLUMNS};
use crate::error::Result;
use crate::filter::DecisionFilter;
use crate::output::OutputTable;
use crate::table::Table;
use crate::transform::split_list;
use tracing::info;

/// Balance of reviewer names on active papers: each mention in a
/// `Reviewer 1..3` column counts +1, each mention in an `E<n>name`
/// column counts -1. Every name seen is reported, including zero and
/// negative balances.
pub struct ReviewerBalance {
    filter: DecisionFilter,
}

impl ReviewerBalance {
    pub const NAME: &'static str = "reviewer-balance";

    pub fn new(filter: DecisionFilter) -> Self {
        Self { filter }
    }

    pub fn tally(&self, input: &Table) -> Result<(NameCounts, PassStats)> {
        let columns = ColumnResolver::new(input.header());
        let [decision, first, second, third] = columns.require([
            DECISION_COLUMN,
            STATIC_REVIEWER_COLUMNS[0],
            STATIC_REVIEWER_COLUMNS[1],
            STATIC_REVIEWER_COLUMNS[2],
        ])?;
        let assigned = [first, second, third];
        let externals = columns.family(&FamilyPattern::new(EXTERNAL_PREFIX, NAME_SUFFIX));
        let width = span(assigned.into_iter().chain([decision]).chain(externals.iter().map(|c| c.column)));

        let mut counts = NameCounts::new();
        let mut stats = PassStats::default();
        for record in input.records() {
            if !stats.admit(Self::NAME, record, width) {
                continue;
            }
            if !self.filter.accepts(record.field(decision)) {
                continue;
            }
            stats.keep();

            for &column in &assigned {
                for name in split_list(record.field(column)) {
                    counts.add(name, 1);
                }
            }
            for external in &externals {
                for name in split_list(record.field(external.column)) {
                    counts.add(name, -1);
                }
            }
        }
        if counts.is_empty() {
            info!("No reviewer data found to combine");
        }
        Ok((counts, stats))
    }

    pub fn render(counts: &NameCounts) -> OutputTable {
        let mut output = OutputTable::new(["name", "count"]);
        for (name, count) in counts {
            output.push_row(vec![name.clone(), count.to_string()]);
        }
        output
    }
}

impl Extractor for ReviewerBalance {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn extract(&self, input: &Table) -> Result<Extraction> {
        let (counts, stats) = self.tally(input)?;
        Ok(Extraction {
            output: Self::render(&counts),
            stats,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TallyError;

    fn table(csv: &str) -> Table {
        Table::from_reader(csv.as_bytes()).unwrap()
    }

    #[test]
    fn test_static_mentions_minus_external_mentions() {
        let input = table(
            "Decision,Reviewer 1,Reviewer 2,Reviewer 3,E1name,E2name\n\
             RER,\"Dave, Erin\",Frank,,Dave,\n\
             ERER,Dave,,,Gail,\n\
             A,Dave,Dave,Dave,,\n",
        );
        let (counts, stats) = ReviewerBalance::new(DecisionFilter::default()).tally(&input).unwrap();
        assert_eq!(counts.get("Dave"), Some(&1));
        assert_eq!(counts.get("Erin"), Some(&1));
        assert_eq!(counts.get("Frank"), Some(&1));
        assert_eq!(counts.get("Gail"), Some(&-1));
        assert_eq!(stats.rows_read, 3);
        assert_eq!(stats.rows_kept, 2);
    }

    #[test]
    fn test_render_sorted_by_name() {
        let input = table("Decision,Reviewer 1,Reviewer 2,Reviewer 3\nRER,Zoe,Amy,\n");
        let output = ReviewerBalance::new(DecisionFilter::default()).extract(&input).unwrap().output;
        assert_eq!(output.to_csv_string().unwrap(), "name,count\nAmy,1\nZoe,1\n");
    }

    #[test]
    fn test_no_active_rows_gives_empty_balance() {
        let input = table("Decision,Reviewer 1,Reviewer 2,Reviewer 3\nA,Amy,,\n");
        let extraction = ReviewerBalance::new(DecisionFilter::default()).extract(&input).unwrap();
        assert!(extraction.output.is_empty());
        assert_eq!(extraction.output.to_csv_string().unwrap(), "name,count\n");
        assert_eq!(extraction.stats.rows_read, 1);
    }

    #[test]
    fn test_missing_static_columns_abort() {
        let input = table("Decision,Reviewer 1\nRER,Amy\n");
        let err = ReviewerBalance::new(DecisionFilter::default()).tally(&input).unwrap_err();
        match err {
            TallyError::MissingColumns(missing) => assert_eq!(missing, vec!["Reviewer 2", "Reviewer 3"]),
            other => panic!("unexpected error: {other}"),
        }
    }
}
