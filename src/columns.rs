//! Column role resolution.
//!
//! Every extractor resolves its columns once, before the first row is read,
//! into plain indices. Exact roles are mandatory and reported together;
//! indexed families (`E1name`, `E2name`, ...) are optional and may be empty.

use crate::error::{Result, TallyError};
use regex::Regex;
use tracing::debug;

/// A family of columns named `<prefix><n><suffix>`, e.g. `E3score`.
#[derive(Debug, Clone)]
pub struct FamilyPattern {
    prefix: String,
    suffix: String,
    regex: Regex,
}

impl FamilyPattern {
    pub fn new(prefix: &str, suffix: &str) -> Self {
        let regex = Regex::new(&format!(
            r"^{}(\d+){}$",
            regex::escape(prefix),
            regex::escape(suffix)
        ))
        .expect("escaped family pattern is a valid regex");
        Self {
            prefix: prefix.to_string(),
            suffix: suffix.to_string(),
            regex,
        }
    }

    /// The embedded index of a matching column name.
    pub fn slot_of(&self, column: &str) -> Option<u32> {
        self.regex
            .captures(column)
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse().ok())
    }

    pub fn column_name(&self, slot: u32) -> String {
        format!("{}{}{}", self.prefix, slot, self.suffix)
    }
}

/// One column of an indexed family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexedColumn {
    pub slot: u32,
    pub column: usize,
}

/// A reviewer slot: a name column with its paired score column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReviewSlot {
    pub slot: u32,
    pub name: usize,
    pub score: usize,
}

pub struct ColumnResolver<'h> {
    header: &'h [String],
}

impl<'h> ColumnResolver<'h> {
    pub fn new(header: &'h [String]) -> Self {
        Self { header }
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.header.iter().position(|column| column == name)
    }

    fn resolve<const N: usize>(&self, names: [&str; N], missing: &mut Vec<String>) -> [usize; N] {
        let mut resolved = [0usize; N];
        for (slot, name) in names.iter().enumerate() {
            match self.position(name) {
                Some(index) => resolved[slot] = index,
                None => missing.push(name.to_string()),
            }
        }
        resolved
    }

    /// Resolves every mandatory column or fails listing all that are absent.
    pub fn require<const N: usize>(&self, names: [&str; N]) -> Result<[usize; N]> {
        let mut missing = Vec::new();
        let resolved = self.resolve(names, &mut missing);
        if !missing.is_empty() {
            return Err(TallyError::MissingColumns(missing));
        }
        debug!("Resolved columns {:?} -> {:?}", names, resolved);
        Ok(resolved)
    }

    /// First column whose name starts with `prefix`.
    pub fn prefixed(&self, prefix: &str) -> Option<usize> {
        self.header.iter().position(|column| column.starts_with(prefix))
    }

    /// Like `require`, plus one column matched by name prefix. An absent
    /// prefix column is reported as `<prefix>*` alongside the exact names.
    pub fn require_with_prefixed<const N: usize>(
        &self,
        names: [&str; N],
        prefix: &str,
    ) -> Result<([usize; N], usize)> {
        let mut missing = Vec::new();
        let resolved = self.resolve(names, &mut missing);
        let prefixed = self.prefixed(prefix);
        match prefixed {
            Some(column) if missing.is_empty() => {
                debug!("Resolved columns {:?} + {}* -> {:?}, {}", names, prefix, resolved, column);
                Ok((resolved, column))
            }
            _ => {
                if prefixed.is_none() {
                    missing.push(format!("{prefix}*"));
                }
                Err(TallyError::MissingColumns(missing))
            }
        }
    }

    /// All columns of a family, ordered by their embedded index.
    pub fn family(&self, pattern: &FamilyPattern) -> Vec<IndexedColumn> {
        let mut found: Vec<IndexedColumn> = self
            .header
            .iter()
            .enumerate()
            .filter_map(|(column, name)| {
                pattern
                    .slot_of(name)
                    .map(|slot| IndexedColumn { slot, column })
            })
            .collect();
        found.sort_by_key(|c| (c.slot, c.column));
        found
    }

    /// Name columns paired with the score column of the same index.
    /// A name column without its partner is skipped.
    pub fn slots(&self, names: &FamilyPattern, scores: &FamilyPattern) -> Vec<ReviewSlot> {
        self.family(names)
            .into_iter()
            .filter_map(|name| {
                let partner = scores.column_name(name.slot);
                match self.position(&partner) {
                    Some(score) => Some(ReviewSlot {
                        slot: name.slot,
                        name: name.column,
                        score,
                    }),
                    None => {
                        debug!("Skipping slot {}: no '{}' column", name.slot, partner);
                        None
                    }
                }
            })
            .collect()
    }
}

/// Smallest row width that holds every listed column.
pub fn span(columns: impl IntoIterator<Item = usize>) -> usize {
    columns.into_iter().max().map_or(0, |max| max + 1)
}

/// Row width needed by a set of reviewer slots.
pub fn slots_span(slots: &[ReviewSlot]) -> usize {
    span(slots.iter().flat_map(|s| [s.name, s.score]))
}
