use super::{Extraction, Extractor, PassStats};
use crate::columns::{span, ColumnResolver, FamilyPattern};
use crate::constants::{
    DECISION_COLUMN, EXTERNAL_PREFIX, ID_COLUMN, LOOKUP_NAME_COLUMN, LOOKUP_SLOTS_COLUMN, NAME_SUFFIX, PC_PREFIX,
    PRIMARY_COLUMN,
};
use crate::error::Result;
use crate::filter::DecisionFilter;
use crate::output::OutputTable;
use crate::table::Table;
use crate::transform::{split_list, LocationLookup};
use std::collections::BTreeSet;
use tracing::debug;

/// Builds the participant lookup from a `Name`, `Slots available` table.
///
/// Slot lists are normally quoted; when `Slots available` is the last
/// column, unquoted lists spilling into extra fields are read as well.
pub fn load_lookup(table: &Table) -> Result<LocationLookup> {
    let columns = ColumnResolver::new(table.header());
    let [name, slots] = columns.require([LOOKUP_NAME_COLUMN, LOOKUP_SLOTS_COLUMN])?;
    let slots_last = slots + 1 == table.header().len();

    let mut lookup = LocationLookup::new();
    for record in table.records() {
        let participant = record.trimmed(name);
        if participant.is_empty() {
            continue;
        }
        if slots_last {
            lookup.insert(participant, record.fields_from(slots).iter().flat_map(|cell| split_list(cell)));
        } else {
            lookup.insert(participant, split_list(record.field(slots)));
        }
    }
    debug!("Loaded slots for {} participants", lookup.len());
    Ok(lookup)
}

/// Scheduling slots shared by everyone attached to an active paper: its
/// primary, PC members and external reviewers.
pub struct PaperLocations {
    filter: DecisionFilter,
    lookup: LocationLookup,
}

impl PaperLocations {
    pub const NAME: &'static str = "paper-locations";

    pub fn new(filter: DecisionFilter, lookup: LocationLookup) -> Self {
        Self { filter, lookup }
    }
}

impl Extractor for PaperLocations {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn extract(&self, input: &Table) -> Result<Extraction> {
        let columns = ColumnResolver::new(input.header());
        let [id, decision] = columns.require([ID_COLUMN, DECISION_COLUMN])?;
        let participant_columns: Vec<usize> = columns
            .position(PRIMARY_COLUMN)
            .into_iter()
            .chain(columns.family(&FamilyPattern::new(PC_PREFIX, NAME_SUFFIX)).into_iter().map(|c| c.column))
            .chain(columns.family(&FamilyPattern::new(EXTERNAL_PREFIX, NAME_SUFFIX)).into_iter().map(|c| c.column))
            .collect();
        let width = span([id, decision].into_iter().chain(participant_columns.iter().copied()));

        let mut output = OutputTable::new([ID_COLUMN, "Participants", "Shared slots"]);
        let mut stats = PassStats::default();
        for record in input.records() {
            if !stats.admit(Self::NAME, record, width) {
                continue;
            }
            if !self.filter.accepts(record.field(decision)) {
                continue;
            }
            stats.keep();

            let participants: BTreeSet<&str> = participant_columns
                .iter()
                .flat_map(|&column| split_list(record.field(column)))
                .collect();
            let located = participants.iter().filter(|name| self.lookup.contains(name)).count();
            let shared = self.lookup.shared_slots(participants.iter().copied());

            output.push_row(vec![
                record.trimmed(id).to_string(),
                located.to_string(),
                shared.join(", "),
            ]);
        }
        Ok(Extraction { output, stats })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup(csv: &str) -> LocationLookup {
        load_lookup(&Table::from_reader(csv.as_bytes()).unwrap()).unwrap()
    }

    #[test]
    fn test_unquoted_slot_lists_are_read() {
        let lookup = lookup("Name,Slots available\nAlice,US-East,US-West\nBob,US-West,EU\n");
        assert_eq!(lookup.shared_slots(["Alice", "Bob"]), vec!["US-West"]);
    }

    #[test]
    fn test_quoted_slot_lists_in_middle_column() {
        let lookup = lookup("Slots available,Name,Notes\n\"EU, Asia\",Ann,x\n");
        assert_eq!(lookup.shared_slots(["Ann"]), vec!["Asia", "EU"]);
    }

    #[test]
    fn test_shared_slots_per_paper() {
        let lookup = lookup("Name,Slots available\nAlice,US-East,US-West\nBob,US-West,EU\n");
        let input = Table::from_reader(
            "ID,Decision,Pname,S1name,E1name\n\
             11,RER,Alice,,Bob\n\
             12,RER,Zed,Alice,\n\
             13,ERER,Zed,,\n\
             14,A,Alice,,Bob\n"
                .as_bytes(),
        )
        .unwrap();
        let output = PaperLocations::new(DecisionFilter::default(), lookup)
            .extract(&input)
            .unwrap()
            .output;
        assert_eq!(
            output.to_csv_string().unwrap(),
            "ID,Participants,Shared slots\n\
             11,2,US-West\n\
             12,1,\"US-East, US-West\"\n\
             13,0,\n"
        );
    }

    #[test]
    fn test_lookup_requires_columns() {
        let table = Table::from_reader("Name,Zone\nAlice,EU\n".as_bytes()).unwrap();
        assert!(load_lookup(&table).is_err());
    }
}
