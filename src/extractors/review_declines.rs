use super::{Extraction, Extractor, PassStats};
use crate::columns::{span, ColumnResolver};
use crate::constants::{
    CUTOFF_DATE_FORMAT, DATE_COLUMN, DECLINE_PHRASE, LOG_DATE_FORMAT, SUBJECT_PREFIX, SUBMISSION_COLUMN,
};
use crate::error::{Result, TallyError};
use crate::output::OutputTable;
use crate::table::Table;
use chrono::{Datelike, Local, NaiveDate, NaiveDateTime};
use serde::Serialize;

/// A reviewer who declined a review request for a submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Decline {
    pub submission: String,
    pub name: String,
}

/// Parses a `YYYY-MM-DD` cutoff date.
pub fn parse_cutoff(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), CUTOFF_DATE_FORMAT)
        .map_err(|_| TallyError::MalformedDate(value.to_string()))
}

/// Scans an email log for "<name> declines to review" subjects sent on or
/// after a cutoff date. Log timestamps have no year; `year` is assumed.
pub struct ReviewDeclines {
    cutoff: NaiveDate,
    year: i32,
}

impl ReviewDeclines {
    pub const NAME: &'static str = "review-declines";

    pub fn new(cutoff: NaiveDate, year: i32) -> Self {
        Self { cutoff, year }
    }

    /// Log dates are read as falling in the current local year.
    pub fn in_current_year(cutoff: NaiveDate) -> Self {
        Self::new(cutoff, Local::now().year())
    }

    fn log_date(&self, cell: &str) -> std::result::Result<NaiveDate, chrono::ParseError> {
        let stamped = format!("{} {}", cell.trim(), self.year);
        NaiveDateTime::parse_from_str(&stamped, LOG_DATE_FORMAT).map(|dt| dt.date())
    }

    pub fn scan(&self, input: &Table) -> Result<(Vec<Decline>, PassStats)> {
        let columns = ColumnResolver::new(input.header());
        let ([date, submission], subject) =
            columns.require_with_prefixed([DATE_COLUMN, SUBMISSION_COLUMN], SUBJECT_PREFIX)?;
        let width = span([date, submission, subject]);

        let mut declines = Vec::new();
        let mut stats = PassStats::default();
        for record in input.records() {
            if !stats.admit(Self::NAME, record, width) {
                continue;
            }
            let sent = match self.log_date(record.field(date)) {
                Ok(sent) => sent,
                Err(e) => {
                    stats.skip(
                        Self::NAME,
                        format!("could not parse date '{}' at line {}: {}", record.field(date), record.line, e),
                    );
                    continue;
                }
            };

            let subject_text = record.field(subject);
            if sent < self.cutoff || !subject_text.contains(DECLINE_PHRASE) {
                continue;
            }
            let name = subject_text
                .split(&format!(" {DECLINE_PHRASE}"))
                .next()
                .unwrap_or_default()
                .trim();
            stats.keep();
            declines.push(Decline {
                submission: record.field(submission).to_string(),
                name: name.to_string(),
            });
        }
        Ok((declines, stats))
    }

    pub fn render(declines: &[Decline]) -> OutputTable {
        let mut output = OutputTable::new([SUBMISSION_COLUMN, "Name"]);
        for decline in declines {
            output.push_row(vec![decline.submission.clone(), decline.name.clone()]);
        }
        output
    }
}

impl Extractor for ReviewDeclines {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn extract(&self, input: &Table) -> Result<Extraction> {
        let (declines, stats) = self.scan(input)?;
        Ok(Extraction {
            output: Self::render(&declines),
            stats,
        })
    }
}
