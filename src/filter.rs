use crate::constants::DEFAULT_ACTIVE_DECISIONS;
use std::collections::BTreeSet;

/// Keeps rows whose trimmed decision is in the allow-set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecisionFilter {
    allowed: BTreeSet<String>,
}

impl DecisionFilter {
    pub fn new<I, S>(allowed: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            allowed: allowed
                .into_iter()
                .map(|s| {
                    let s: String = s.into();
                    s.trim().to_string()
                })
                .collect(),
        }
    }

    pub fn accepts(&self, decision: &str) -> bool {
        self.allowed.contains(decision.trim())
    }
}

impl Default for DecisionFilter {
    fn default() -> Self {
        Self::new(DEFAULT_ACTIVE_DECISIONS)
    }
}

/// Output shaping for the decision column: one literal is emitted blank.
pub fn relabel_decision<'a>(decision: &'a str, blank: Option<&str>) -> &'a str {
    let decision = decision.trim();
    match blank {
        Some(literal) if literal == decision => "",
        _ => decision,
    }
}
