use super::{Extraction, Extractor, PassStats};
use crate::columns::{span, ColumnResolver, FamilyPattern, IndexedColumn};
use crate::constants::{DECISION_COLUMN, EXTERNAL_PREFIX, ID_COLUMN, PC_PREFIX, RECOMMENDATION_SUFFIX};
use crate::error::{Result, TallyError};
use crate::filter::{relabel_decision, DecisionFilter};
use crate::output::OutputTable;
use crate::table::{Record, Table};
use crate::transform::DecisionCode;
use serde::{Deserialize, Serialize};

/// What to do with a recommendation outside the known code set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UnknownCodePolicy {
    /// Fail the whole run.
    #[default]
    Abort,
    /// Drop the offending row with a warning.
    SkipRow,
}

/// Recommendation codes of every PC and external reviewer, as numeric scores.
pub struct PaperRecommendations {
    filter: DecisionFilter,
    on_unknown: UnknownCodePolicy,
    blank_decision: Option<String>,
}

impl PaperRecommendations {
    pub const NAME: &'static str = "paper-recommendations";

    pub fn new(filter: DecisionFilter, on_unknown: UnknownCodePolicy, blank_decision: Option<String>) -> Self {
        Self {
            filter,
            on_unknown,
            blank_decision,
        }
    }

    fn scores(record: &Record, header: &[String], columns: &[IndexedColumn]) -> Result<Vec<String>> {
        columns
            .iter()
            .map(|c| {
                let cell = record.trimmed(c.column);
                if cell.is_empty() {
                    return Ok(String::new());
                }
                cell.parse::<DecisionCode>()
                    .map(|code| code.score().to_string())
                    .map_err(|unknown| TallyError::UnknownRecommendationCode {
                        code: unknown.0,
                        column: header[c.column].clone(),
                        line: record.line,
                    })
            })
            .collect()
    }
}

impl Extractor for PaperRecommendations {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn extract(&self, input: &Table) -> Result<Extraction> {
        let header = input.header();
        let columns = ColumnResolver::new(header);
        let [id, decision] = columns.require([ID_COLUMN, DECISION_COLUMN])?;
        let recommendations: Vec<IndexedColumn> = columns
            .family(&FamilyPattern::new(PC_PREFIX, RECOMMENDATION_SUFFIX))
            .into_iter()
            .chain(columns.family(&FamilyPattern::new(EXTERNAL_PREFIX, RECOMMENDATION_SUFFIX)))
            .collect();
        let width = span([id, decision].into_iter().chain(recommendations.iter().map(|c| c.column)));

        let mut output = OutputTable::new(
            [ID_COLUMN.to_string(), DECISION_COLUMN.to_string()]
                .into_iter()
                .chain(recommendations.iter().map(|c| header[c.column].clone())),
        );
        let mut stats = PassStats::default();
        for record in input.records() {
            if !stats.admit(Self::NAME, record, width) {
                continue;
            }
            if !self.filter.accepts(record.field(decision)) {
                continue;
            }

            let scores = match Self::scores(record, header, &recommendations) {
                Ok(scores) => scores,
                Err(e) => match self.on_unknown {
                    UnknownCodePolicy::Abort => return Err(e),
                    UnknownCodePolicy::SkipRow => {
                        stats.skip(Self::NAME, e);
                        continue;
                    }
                },
            };
            stats.keep();

            let mut row = vec![
                record.trimmed(id).to_string(),
                relabel_decision(record.field(decision), self.blank_decision.as_deref()).to_string(),
            ];
            row.extend(scores);
            output.push_row(row);
        }
        Ok(Extraction { output, stats })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SUBMISSIONS: &str = "ID,Decision,S1rec,E1rec,S2rec\n\
                               1,RER,A,R,\n\
                               2,ERER,RER,,ERER\n";

    fn extractor(on_unknown: UnknownCodePolicy) -> PaperRecommendations {
        PaperRecommendations::new(DecisionFilter::default(), on_unknown, Some("RER".to_string()))
    }

    #[test]
    fn test_codes_become_scores_in_family_order() {
        let input = Table::from_reader(SUBMISSIONS.as_bytes()).unwrap();
        let output = extractor(UnknownCodePolicy::Abort).extract(&input).unwrap().output;
        assert_eq!(
            output.to_csv_string().unwrap(),
            "ID,Decision,S1rec,S2rec,E1rec\n1,,4,,1\n2,ERER,2,3,\n"
        );
    }

    #[test]
    fn test_unknown_code_aborts_by_default() {
        let input = Table::from_reader("ID,Decision,E1rec\n1,RER,A\n2,RER,maybe\n".as_bytes()).unwrap();
        let err = extractor(UnknownCodePolicy::Abort).extract(&input).unwrap_err();
        match err {
            TallyError::UnknownRecommendationCode { code, column, line } => {
                assert_eq!(code, "maybe");
                assert_eq!(column, "E1rec");
                assert_eq!(line, 3);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_unknown_code_skips_row_when_configured() {
        let input = Table::from_reader("ID,Decision,E1rec\n1,RER,A\n2,RER,maybe\n".as_bytes()).unwrap();
        let extraction = extractor(UnknownCodePolicy::SkipRow).extract(&input).unwrap();
        assert_eq!(extraction.output.len(), 1);
        assert_eq!(extraction.stats.rows_skipped, 1);
    }

    #[test]
    fn test_inactive_rows_are_not_validated() {
        let input = Table::from_reader("ID,Decision,E1rec\n1,A,maybe\n".as_bytes()).unwrap();
        let extraction = extractor(UnknownCodePolicy::Abort).extract(&input).unwrap();
        assert!(extraction.output.is_empty());
    }
}
