/// Column names and domain policy shared by the extractors.
/// Header names match the review system's CSV export exactly.

// Submission export columns
pub const ID_COLUMN: &str = "ID";
pub const DECISION_COLUMN: &str = "Decision";
pub const PRIMARY_COLUMN: &str = "Pname";
pub const PRIMARY_SCORE_COLUMN: &str = "Pscore";
pub const SUBCOMMITTEE_COLUMN: &str = "Subcommittee";
pub const STATIC_REVIEWER_COLUMNS: [&str; 3] = ["Reviewer 1", "Reviewer 2", "Reviewer 3"];

// Email log columns
pub const DATE_COLUMN: &str = "Date";
pub const SUBMISSION_COLUMN: &str = "Submission";
pub const SUBJECT_PREFIX: &str = "Subject";

// Location lookup columns
pub const LOOKUP_NAME_COLUMN: &str = "Name";
pub const LOOKUP_SLOTS_COLUMN: &str = "Slots available";

// Indexed families: PC members are `S<n>…`, external reviewers `E<n>…`
pub const PC_PREFIX: &str = "S";
pub const EXTERNAL_PREFIX: &str = "E";
pub const NAME_SUFFIX: &str = "name";
pub const SCORE_SUFFIX: &str = "score";
pub const RECOMMENDATION_SUFFIX: &str = "rec";

/// Decisions that mark a submission as still under review.
pub const DEFAULT_ACTIVE_DECISIONS: [&str; 2] = ["RER", "ERER"];

/// Score placeholder for a claimed but unresolved reviewer slot.
pub const TENTATIVE_MARKER: &str = "T";

/// Minimum number of confirmed reviewers expected per paper.
pub const COVERAGE_TARGET: u32 = 2;

/// Marker in an email subject announcing a declined review request.
pub const DECLINE_PHRASE: &str = "declines to review";

/// Email log timestamps carry no year, e.g. `Sep 14 10:32`.
pub const LOG_DATE_FORMAT: &str = "%b %d %H:%M %Y";
pub const CUTOFF_DATE_FORMAT: &str = "%Y-%m-%d";

pub const DEFAULT_CONFIG_FILE: &str = "review_tally.toml";
pub const CONFIG_ENV_VAR: &str = "REVIEW_TALLY_CONFIG";
pub const DEFAULT_LOG_FILTER: &str = "review_tally=info";
