use crate::error::{Result, TallyError};
use csv::ReaderBuilder;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;
use tracing::debug;

/// One data row of an input table, with the line it was read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub line: u64,
    fields: Vec<String>,
}

impl Record {
    pub fn new(line: u64, fields: Vec<String>) -> Self {
        Self { line, fields }
    }

    /// Raw cell value; columns past the end of a short row read as empty.
    pub fn field(&self, index: usize) -> &str {
        self.fields.get(index).map(String::as_str).unwrap_or("")
    }

    pub fn trimmed(&self, index: usize) -> &str {
        self.field(index).trim()
    }

    /// Cells from `index` to the end of the row.
    pub fn fields_from(&self, index: usize) -> &[String] {
        self.fields.get(index..).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Fails with `RowShape` when the row cannot hold column `width - 1`.
    pub fn ensure_width(&self, width: usize) -> Result<()> {
        if self.fields.len() < width {
            return Err(TallyError::RowShape {
                line: self.line,
                found: self.fields.len(),
                expected: width,
            });
        }
        Ok(())
    }
}

/// A header plus rows, read once from a CSV source and discarded after one pass.
#[derive(Debug, Clone, Default)]
pub struct Table {
    header: Vec<String>,
    records: Vec<Record>,
}

impl Table {
    pub fn new(header: Vec<String>, records: Vec<Record>) -> Self {
        Self { header, records }
    }

    /// Reads a comma-delimited UTF-8 file whose first row is the header.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => TallyError::FileNotFound(path.to_path_buf()),
            _ => TallyError::Io(e),
        })?;
        let table = Self::from_reader(file)?;
        debug!(
            "Read {} rows with {} columns from {}",
            table.records.len(),
            table.header.len(),
            path.display()
        );
        Ok(table)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        // Rows may be short or long; shape is checked per extractor.
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let header: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();
        let mut records = Vec::new();
        for result in rdr.records() {
            let record = result?;
            let line = record.position().map(|p| p.line()).unwrap_or_default();
            records.push(Record::new(line, record.iter().map(str::to_string).collect()));
        }

        Ok(Self { header, records })
    }

    pub fn header(&self) -> &[String] {
        &self.header
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_reads_header_and_rows_with_lines() {
        let table = Table::from_reader("ID,Decision\n1,RER\n2,A\n".as_bytes()).unwrap();
        assert_eq!(table.header(), &["ID".to_string(), "Decision".to_string()]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.records()[0].field(1), "RER");
        assert_eq!(table.records()[1].line, 3);
    }

    #[test]
    fn test_short_rows_are_kept_and_checked_later() {
        let table = Table::from_reader("a,b,c\n1,2,3\n4\n".as_bytes()).unwrap();
        let short = &table.records()[1];
        assert_eq!(short.len(), 1);
        assert_eq!(short.field(2), "");
        let err = short.ensure_width(3).unwrap_err();
        assert!(matches!(err, TallyError::RowShape { found: 1, expected: 3, .. }));
        assert!(table.records()[0].ensure_width(3).is_ok());
    }

    #[test]
    fn test_quoted_cells_keep_commas() {
        let table = Table::from_reader("Name,Slots available\nAlice,\"US-East, US-West\"\n".as_bytes()).unwrap();
        assert_eq!(table.records()[0].field(1), "US-East, US-West");
    }

    #[test]
    fn test_missing_file_is_file_not_found() {
        let err = Table::from_path("/definitely/not/here.csv").unwrap_err();
        assert!(matches!(err, TallyError::FileNotFound(_)));
    }

    #[test]
    fn test_from_path_reads_file() -> Result<()> {
        let mut file = NamedTempFile::new()?;
        writeln!(file, "ID,Pscore")?;
        writeln!(file, "7,3.25")?;
        let table = Table::from_path(file.path())?;
        assert_eq!(table.records()[0].trimmed(1), "3.25");
        Ok(())
    }
}
