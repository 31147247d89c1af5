use super::{Extraction, Extractor, PassStats};
use crate::columns::{span, ColumnResolver, FamilyPattern};
use crate::constants::{
    DECISION_COLUMN, EXTERNAL_PREFIX, ID_COLUMN, PC_PREFIX, PRIMARY_SCORE_COLUMN, SCORE_SUFFIX,
};
use crate::error::Result;
use crate::filter::DecisionFilter;
use crate::output::OutputTable;
use crate::table::Table;
use crate::transform::is_completed_score;

/// Paper ID, primary score and every completed PC then external score,
/// packed to the left of a fixed `Score 1..N` header for spreadsheet import.
pub struct PaperScores {
    filter: DecisionFilter,
}

impl PaperScores {
    pub const NAME: &'static str = "paper-scores";

    pub fn new(filter: DecisionFilter) -> Self {
        Self { filter }
    }
}

impl Extractor for PaperScores {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn extract(&self, input: &Table) -> Result<Extraction> {
        let columns = ColumnResolver::new(input.header());
        let [id, pscore, decision] = columns.require([ID_COLUMN, PRIMARY_SCORE_COLUMN, DECISION_COLUMN])?;
        let score_columns: Vec<usize> = columns
            .family(&FamilyPattern::new(PC_PREFIX, SCORE_SUFFIX))
            .into_iter()
            .chain(columns.family(&FamilyPattern::new(EXTERNAL_PREFIX, SCORE_SUFFIX)))
            .map(|c| c.column)
            .collect();
        let width = span([id, pscore, decision].into_iter().chain(score_columns.iter().copied()));

        let header = [ID_COLUMN.to_string(), PRIMARY_SCORE_COLUMN.to_string()]
            .into_iter()
            .chain((1..=score_columns.len()).map(|n| format!("Score {n}")));
        let mut output = OutputTable::new(header);
        let mut stats = PassStats::default();

        for record in input.records() {
            if !stats.admit(Self::NAME, record, width) {
                continue;
            }
            if !self.filter.accepts(record.field(decision)) {
                continue;
            }
            stats.keep();

            let mut row = vec![record.trimmed(id).to_string(), record.trimmed(pscore).to_string()];
            row.extend(
                score_columns
                    .iter()
                    .map(|&column| record.trimmed(column))
                    .filter(|score| is_completed_score(score))
                    .map(str::to_string),
            );
            output.push_row(row);
        }

        Ok(Extraction { output, stats })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(csv: &str) -> String {
        let input = Table::from_reader(csv.as_bytes()).unwrap();
        PaperScores::new(DecisionFilter::default())
            .extract(&input)
            .unwrap()
            .output
            .to_csv_string()
            .unwrap()
    }

    #[test]
    fn test_single_active_paper() {
        assert_eq!(extract("ID,Decision,Pscore\n1,RER,4.50\n"), "ID,Pscore\n1,4.50\n");
    }

    #[test]
    fn test_completed_scores_packed_left_and_padded() {
        let csv = "ID,Decision,Pscore,S1score,E2score,E1score\n\
                   1,RER,3.00,T,2.50,\n\
                   2,ERER,,1.00,3.25,4.00\n\
                   3,A,4.00,4.00,4.00,4.00\n";
        assert_eq!(
            extract(csv),
            "ID,Pscore,Score 1,Score 2,Score 3\n1,3.00,2.50,,\n2,,1.00,4.00,3.25\n"
        );
    }

    #[test]
    fn test_short_row_is_skipped() {
        let input = Table::from_reader("ID,Decision,Pscore\n1,RER\n2,RER,1.50\n".as_bytes()).unwrap();
        let extraction = PaperScores::new(DecisionFilter::default()).extract(&input).unwrap();
        assert_eq!(extraction.stats.rows_skipped, 1);
        assert_eq!(extraction.output.len(), 1);
    }
}
