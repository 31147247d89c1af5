use crate::error::Result;
use serde_json::{Map, Value};
use std::io::Write;

/// Rendering of an output table on the sink.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Csv,
    Json,
}

/// A derived table: fixed header, rows padded to the header width.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OutputTable {
    header: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl OutputTable {
    pub fn new<I, S>(header: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            header: header.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Appends a row; missing trailing fields are emitted empty.
    pub fn push_row(&mut self, mut row: Vec<String>) {
        debug_assert!(row.len() <= self.header.len(), "row wider than header");
        if row.len() < self.header.len() {
            row.resize(self.header.len(), String::new());
        }
        self.rows.push(row);
    }

    pub fn header(&self) -> &[String] {
        &self.header
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn write<W: Write>(&self, format: OutputFormat, sink: W) -> Result<()> {
        match format {
            OutputFormat::Csv => self.write_csv(sink),
            OutputFormat::Json => self.write_json(sink),
        }
    }

    /// Header first, then every row; fields are quoted only when needed.
    pub fn write_csv<W: Write>(&self, sink: W) -> Result<()> {
        let mut writer = csv::Writer::from_writer(sink);
        writer.write_record(&self.header)?;
        for row in &self.rows {
            writer.write_record(row)?;
        }
        writer.flush()?;
        Ok(())
    }

    pub fn write_json<W: Write>(&self, mut sink: W) -> Result<()> {
        serde_json::to_writer_pretty(&mut sink, &self.to_json())?;
        writeln!(sink)?;
        Ok(())
    }

    /// Rows as objects keyed by header name.
    pub fn to_json(&self) -> Value {
        let rows = self
            .rows
            .iter()
            .map(|row| {
                let object: Map<String, Value> = self
                    .header
                    .iter()
                    .zip(row)
                    .map(|(column, value)| (column.clone(), Value::String(value.clone())))
                    .collect();
                Value::Object(object)
            })
            .collect();
        Value::Array(rows)
    }

    pub fn to_csv_string(&self) -> Result<String> {
        let mut buffer = Vec::new();
        self.write_csv(&mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_csv_header_only_when_empty() {
        let table = OutputTable::new(["name", "count"]);
        assert_eq!(table.to_csv_string().unwrap(), "name,count\n");
    }

    #[test]
    fn test_csv_quotes_separators() {
        let mut table = OutputTable::new(["ID", "Shared slots"]);
        table.push_row(vec!["1".to_string(), "EU, US-West".to_string()]);
        assert_eq!(table.to_csv_string().unwrap(), "ID,Shared slots\n1,\"EU, US-West\"\n");
    }

    #[test]
    fn test_short_rows_are_padded() {
        let mut table = OutputTable::new(["ID", "Pscore", "Score 1", "Score 2"]);
        table.push_row(vec!["4".to_string(), "2.00".to_string()]);
        assert_eq!(table.rows()[0].len(), 4);
        assert_eq!(table.to_csv_string().unwrap(), "ID,Pscore,Score 1,Score 2\n4,2.00,,\n");
    }

    #[test]
    fn test_json_rows_keyed_by_header() {
        let mut table = OutputTable::new(["name", "count"]);
        table.push_row(vec!["Dave".to_string(), "3".to_string()]);
        assert_eq!(table.to_json(), json!([{ "name": "Dave", "count": "3" }]));
    }

    #[test]
    fn test_same_table_renders_identically_twice() {
        let mut table = OutputTable::new(["a"]);
        table.push_row(vec!["x".to_string()]);
        assert_eq!(table.to_csv_string().unwrap(), table.to_csv_string().unwrap());
    }
}
