//! Trial record reader for stop-task CSV files
//!
//! Wraps a `csv::Reader` and turns each row into a [`TrialRecord`]. Column
//! positions are resolved from the header once, so a file lacking one of the
//! required columns fails before any row is read.

use crate::config::ColumnNames;
use crate::types::{Flag, PickerError, Result, TrialRecord};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Resolved positions of the required columns
#[derive(Debug, Clone, Copy)]
struct ColumnIndex {
    stop_signal: usize,
    is_correct: usize,
    onset: usize,
}

/// Lazy iterator over the trial records of one file
pub struct TrialReader<R: Read> {
    records: csv::StringRecordsIntoIter<R>,
    columns: ColumnNames,
    index: ColumnIndex,
    row: usize,
}

impl TrialReader<File> {
    /// Open a result file from disk
    pub fn open(path: &Path, columns: &ColumnNames) -> Result<Self> {
        log::debug!("Opening trial file: {:?}", path);
        let file = File::open(path)?;
        Self::from_reader(file, columns)
    }
}

impl<R: Read> TrialReader<R> {
    /// Build a reader over any byte source with a header row
    pub fn from_reader(reader: R, columns: &ColumnNames) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        // Duplicate header names resolve to the last matching column
        let headers = csv_reader.headers()?.clone();
        let find = |name: &str| -> Result<usize> {
            headers
                .iter()
                .enumerate()
                .filter(|(_, h)| h.trim() == name)
                .map(|(i, _)| i)
                .last()
                .ok_or_else(|| PickerError::MissingField {
                    field: name.to_string(),
                    location: "in header row".to_string(),
                })
        };

        let index = ColumnIndex {
            stop_signal: find(&columns.stop_signal)?,
            is_correct: find(&columns.is_correct)?,
            onset: find(&columns.onset)?,
        };

        Ok(Self {
            records: csv_reader.into_records(),
            columns: columns.clone(),
            index,
            row: 0,
        })
    }

    fn field<'r>(&self, record: &'r csv::StringRecord, position: usize, name: &str) -> Result<&'r str> {
        record.get(position).ok_or_else(|| PickerError::MissingField {
            field: name.to_string(),
            location: format!("in data row {}", self.row),
        })
    }

    fn flag(&self, record: &csv::StringRecord, position: usize, name: &str) -> Result<Flag> {
        let value = self.field(record, position, name)?;
        value.parse().map_err(|_| PickerError::InvalidField {
            field: name.to_string(),
            value: value.to_string(),
            row: self.row,
        })
    }

    /// Convert one CSV row into a trial record
    fn parse_record(&self, record: &csv::StringRecord) -> Result<TrialRecord> {
        let stop_signal = self.flag(record, self.index.stop_signal, &self.columns.stop_signal)?;
        let is_correct = self.flag(record, self.index.is_correct, &self.columns.is_correct)?;
        let onset = self.field(record, self.index.onset, &self.columns.onset)?;

        Ok(TrialRecord::new(stop_signal, is_correct, onset))
    }
}

impl<R: Read> Iterator for TrialReader<R> {
    type Item = Result<TrialRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        let record = match self.records.next()? {
            Ok(record) => record,
            Err(e) => return Some(Err(e.into())),
        };
        self.row += 1;
        Some(self.parse_record(&record))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read_all(data: &str) -> Result<Vec<TrialRecord>> {
        TrialReader::from_reader(data.as_bytes(), &ColumnNames::default())?.collect()
    }

    #[test]
    fn test_reads_records_in_order() {
        let data = "Trial,StopSignal,IsCorrect,TimeAtStartOfTrial\n\
                    1,Yes,No,120\n\
                    2,No,Yes,125.5\n";
        let records = read_all(data).unwrap();
        assert_eq!(
            records,
            vec![
                TrialRecord::new(Flag::Yes, Flag::No, "120"),
                TrialRecord::new(Flag::No, Flag::Yes, "125.5"),
            ]
        );
    }

    #[test]
    fn test_onset_passed_through_verbatim() {
        let data = "StopSignal,IsCorrect,TimeAtStartOfTrial\nYes,Yes,00:01:02.500\nNo,Yes,\" 7 \"\n";
        let records = read_all(data).unwrap();
        assert_eq!(records[0].onset, "00:01:02.500");
        assert_eq!(records[1].onset, " 7 ");
    }

    #[test]
    fn test_missing_header_column() {
        let data = "StopSignal,TimeAtStartOfTrial\nYes,120\n";
        match TrialReader::from_reader(data.as_bytes(), &ColumnNames::default()) {
            Err(PickerError::MissingField { field, .. }) => assert_eq!(field, "IsCorrect"),
            other => panic!("expected MissingField, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_short_row_is_missing_field() {
        let data = "StopSignal,IsCorrect,TimeAtStartOfTrial\nYes,No,120\nYes,No\n";
        let mut reader = TrialReader::from_reader(data.as_bytes(), &ColumnNames::default()).unwrap();

        assert!(reader.next().unwrap().is_ok());
        match reader.next().unwrap() {
            Err(PickerError::MissingField { field, location }) => {
                assert_eq!(field, "TimeAtStartOfTrial");
                assert_eq!(location, "in data row 2");
            }
            other => panic!("expected MissingField, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_flag_value() {
        let data = "StopSignal,IsCorrect,TimeAtStartOfTrial\nMaybe,No,120\n";
        match read_all(data) {
            Err(PickerError::InvalidField { field, value, row }) => {
                assert_eq!(field, "StopSignal");
                assert_eq!(value, "Maybe");
                assert_eq!(row, 1);
            }
            other => panic!("expected InvalidField, got {:?}", other),
        }
    }

    #[test]
    fn test_custom_columns() {
        let columns = ColumnNames {
            stop_signal: "Signal".to_string(),
            is_correct: "Correct".to_string(),
            onset: "Onset".to_string(),
        };
        let data = "Onset,Correct,Signal\n3.2,Yes,No\n";
        let records: Vec<_> = TrialReader::from_reader(data.as_bytes(), &columns)
            .unwrap()
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(records, vec![TrialRecord::new(Flag::No, Flag::Yes, "3.2")]);
    }

    #[test]
    fn test_duplicate_header_uses_last_column() {
        let data = "StopSignal,IsCorrect,TimeAtStartOfTrial,TimeAtStartOfTrial\nYes,No,1.0,2.0\n";
        let records = read_all(data).unwrap();
        assert_eq!(records, vec![TrialRecord::new(Flag::Yes, Flag::No, "2.0")]);
    }

    #[test]
    fn test_header_only_file() {
        let records = read_all("StopSignal,IsCorrect,TimeAtStartOfTrial\n").unwrap();
        assert!(records.is_empty());
    }
}
