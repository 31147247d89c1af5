use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TallyError {
    #[error("The file '{}' was not found", .0.display())]
    FileNotFound(PathBuf),

    #[error("The following required columns are missing from the CSV file: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("Invalid date '{0}'. Please use YYYY-MM-DD")]
    MalformedDate(String),

    #[error("Row at line {line} has {found} fields, expected at least {expected}")]
    RowShape {
        line: u64,
        found: usize,
        expected: usize,
    },

    #[error("Unknown recommendation code '{code}' in column '{column}' at line {line}")]
    UnknownRecommendationCode {
        code: String,
        column: String,
        line: u64,
    },

    #[error("Stage '{stage}' failed: {source}")]
    Stage {
        stage: &'static str,
        #[source]
        source: Box<TallyError>,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

impl TallyError {
    /// Wraps a failure raised inside one stage of a composed run.
    pub fn in_stage(stage: &'static str, source: TallyError) -> Self {
        TallyError::Stage {
            stage,
            source: Box::new(source),
        }
    }
}

pub type Result<T> = std::result::Result<T, TallyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_columns_lists_every_name() {
        let err = TallyError::MissingColumns(vec!["ID".to_string(), "Pscore".to_string()]);
        assert_eq!(
            err.to_string(),
            "The following required columns are missing from the CSV file: ID, Pscore"
        );
    }

    #[test]
    fn test_stage_error_surfaces_inner_diagnostic() {
        let inner = TallyError::MalformedDate("2024-13-01".to_string());
        let err = TallyError::in_stage("review-declines", inner);
        let text = err.to_string();
        assert!(text.contains("review-declines"));
        assert!(text.contains("Invalid date '2024-13-01'"));
    }

    #[test]
    fn test_row_shape_message() {
        let err = TallyError::RowShape {
            line: 4,
            found: 2,
            expected: 5,
        };
        assert_eq!(err.to_string(), "Row at line 4 has 2 fields, expected at least 5");
    }
}
