//! Per-row transforms shared by the extractors.

use crate::constants::TENTATIVE_MARKER;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

static COMPLETED_SCORE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d+\.\d+$").expect("score pattern is a valid regex"));

/// Splits a comma-separated cell into trimmed, non-empty tokens.
pub fn split_list(cell: &str) -> Vec<&str> {
    cell.split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .collect()
}

/// A score counts as a completed review only when it is a plain decimal like `3.50`.
pub fn is_completed_score(score: &str) -> bool {
    COMPLETED_SCORE.is_match(score.trim())
}

/// State of one reviewer slot on one paper.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotState {
    /// No reviewer named in the slot.
    Vacant,
    /// Reviewer claimed the slot but has not confirmed.
    Tentative,
    /// Reviewer confirmed, no review score yet.
    Confirmed,
    /// Reviewer confirmed and submitted a score.
    Completed,
}

impl SlotState {
    pub fn classify(name: &str, score: &str) -> Self {
        if name.trim().is_empty() {
            return SlotState::Vacant;
        }
        let score = score.trim();
        if score == TENTATIVE_MARKER {
            SlotState::Tentative
        } else if is_completed_score(score) {
            SlotState::Completed
        } else {
            SlotState::Confirmed
        }
    }

    pub fn is_confirmed(self) -> bool {
        matches!(self, SlotState::Confirmed | SlotState::Completed)
    }
}

/// Recommendation codes a reviewer can enter, in the review system's vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DecisionCode {
    Accept,
    EarlyExternalReview,
    ExternalReview,
    Reject,
}

impl DecisionCode {
    pub fn code(self) -> &'static str {
        match self {
            DecisionCode::Accept => "A",
            DecisionCode::EarlyExternalReview => "ERER",
            DecisionCode::ExternalReview => "RER",
            DecisionCode::Reject => "R",
        }
    }

    /// Numeric score used when recommendations are exported to a spreadsheet.
    pub fn score(self) -> &'static str {
        match self {
            DecisionCode::Accept => "4",
            DecisionCode::EarlyExternalReview => "3",
            DecisionCode::ExternalReview => "2",
            DecisionCode::Reject => "1",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCode(pub String);

impl FromStr for DecisionCode {
    type Err = UnknownCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "A" => Ok(DecisionCode::Accept),
            "ERER" => Ok(DecisionCode::EarlyExternalReview),
            "RER" => Ok(DecisionCode::ExternalReview),
            "R" => Ok(DecisionCode::Reject),
            other => Err(UnknownCode(other.to_string())),
        }
    }
}

impl fmt::Display for DecisionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Participant name to the scheduling slots they can attend.
#[derive(Debug, Clone, Default)]
pub struct LocationLookup {
    slots: BTreeMap<String, BTreeSet<String>>,
}

impl LocationLookup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds tags for `name`; repeated names accumulate.
    pub fn insert<'a>(&mut self, name: &str, tags: impl IntoIterator<Item = &'a str>) {
        self.slots
            .entry(name.trim().to_string())
            .or_default()
            .extend(tags.into_iter().map(str::trim).filter(|t| !t.is_empty()).map(str::to_string));
    }

    pub fn contains(&self, name: &str) -> bool {
        self.slots.contains_key(name.trim())
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Slots shared by every participant found in the lookup, sorted.
    /// Participants missing from the lookup do not narrow the result.
    pub fn shared_slots<'a>(&self, participants: impl IntoIterator<Item = &'a str>) -> Vec<String> {
        let mut shared: Option<BTreeSet<&String>> = None;
        for name in participants {
            let Some(tags) = self.slots.get(name.trim()) else {
                continue;
            };
            shared = Some(match shared {
                None => tags.iter().collect(),
                Some(acc) => acc.into_iter().filter(|t| tags.contains(*t)).collect(),
            });
        }
        shared
            .map(|set| set.into_iter().cloned().collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_list_trims_and_drops_empty_tokens() {
        assert_eq!(split_list(" Alice ,Bob,, "), vec!["Alice", "Bob"]);
        assert!(split_list("").is_empty());
        assert!(split_list("  ").is_empty());
    }

    #[test]
    fn test_split_then_join_reproduces_tokens() {
        let tokens = split_list("Carol, Dave ,Erin");
        let rejoined = tokens.join(",");
        assert_eq!(split_list(&rejoined), tokens);
    }

    #[test]
    fn test_completed_score_is_strict_decimal() {
        assert!(is_completed_score("4.50"));
        assert!(is_completed_score(" 10.0 "));
        assert!(!is_completed_score("4"));
        assert!(!is_completed_score(".5"));
        assert!(!is_completed_score("4.5x"));
        assert!(!is_completed_score("T"));
        assert!(!is_completed_score(""));
    }

    #[test]
    fn test_slot_state_classification() {
        assert_eq!(SlotState::classify("", "3.00"), SlotState::Vacant);
        assert_eq!(SlotState::classify("Alice", "T"), SlotState::Tentative);
        assert_eq!(SlotState::classify("Bob", "3.50"), SlotState::Completed);
        assert_eq!(SlotState::classify("Carol", ""), SlotState::Confirmed);
        assert_eq!(SlotState::classify("Dave", "X"), SlotState::Confirmed);
        assert!(SlotState::Completed.is_confirmed());
        assert!(!SlotState::Tentative.is_confirmed());
    }

    #[test]
    fn test_decision_codes_parse_and_score() {
        assert_eq!("A".parse::<DecisionCode>(), Ok(DecisionCode::Accept));
        assert_eq!(" RER ".parse::<DecisionCode>().map(DecisionCode::score), Ok("2"));
        assert_eq!("ERER".parse::<DecisionCode>().map(DecisionCode::score), Ok("3"));
        assert_eq!("R".parse::<DecisionCode>().map(|c| c.to_string()), Ok("R".to_string()));
        assert_eq!("maybe".parse::<DecisionCode>(), Err(UnknownCode("maybe".to_string())));
    }

    #[test]
    fn test_shared_slots_intersects_known_participants() {
        let mut lookup = LocationLookup::new();
        lookup.insert("Alice", ["US-East", "US-West"]);
        lookup.insert("Bob", ["US-West", "EU"]);
        assert_eq!(lookup.shared_slots(["Alice", "Bob"]), vec!["US-West"]);
        assert_eq!(lookup.shared_slots(["Alice", "Zed", "Bob"]), vec!["US-West"]);
        assert_eq!(lookup.shared_slots(["Alice"]), vec!["US-East", "US-West"]);
    }

    #[test]
    fn test_shared_slots_empty_when_nobody_matches() {
        let mut lookup = LocationLookup::new();
        lookup.insert("Alice", ["EU"]);
        lookup.insert("Bob", ["Asia"]);
        assert!(lookup.shared_slots(["Zed"]).is_empty());
        assert!(lookup.shared_slots(["Alice", "Bob"]).is_empty());
    }
}
