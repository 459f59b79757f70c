//! Core types for the onset picker library
//!
//! This module defines the values that flow through a batch: the trial record
//! read from a result file, the outcome category it is sorted into, the visit
//! phase derived from the filename, and the error type shared by every stage.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Result type for picker operations
pub type Result<T> = std::result::Result<T, PickerError>;

/// Trial outcome category
///
/// Each category produces one output file per input file. The declaration
/// order is the priority order used by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Stop cue shown, subject responded anyway
    FailedStop,
    /// Stop cue shown, subject withheld the response
    SuccessfulStop,
    /// No stop cue, subject responded correctly
    GoCorrect,
}

impl Category {
    /// All categories, in classification priority order
    pub const ALL: [Category; 3] = [
        Category::FailedStop,
        Category::SuccessfulStop,
        Category::GoCorrect,
    ];

    /// Name used in output filenames
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::FailedStop => "failed_stop",
            Category::SuccessfulStop => "successful_stop",
            Category::GoCorrect => "go_correct",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Visit phase relative to the intervention
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Pre,
    Post,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Pre => "pre",
            Phase::Post => "post",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Yes/No column value as written by the task software
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flag {
    Yes,
    No,
}

impl FromStr for Flag {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim() {
            "Yes" => Ok(Flag::Yes),
            "No" => Ok(Flag::No),
            _ => Err(()),
        }
    }
}

/// One trial row of a result file
///
/// Only the columns the classifier needs are kept. The onset is never parsed,
/// it is written out exactly as it appeared in the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrialRecord {
    /// Whether a stop cue was presented
    pub stop_signal: Flag,
    /// Whether the response matched the expected outcome
    pub is_correct: Flag,
    /// Trial start timestamp, verbatim
    pub onset: String,
}

impl TrialRecord {
    pub fn new(stop_signal: Flag, is_correct: Flag, onset: impl Into<String>) -> Self {
        Self {
            stop_signal,
            is_correct,
            onset: onset.into(),
        }
    }
}

/// Errors that can occur while picking onsets
#[derive(Debug, thiserror::Error)]
pub enum PickerError {
    #[error("Input directory not found or unreadable: {path:?}")]
    DirectoryNotFound {
        path: PathBuf,
        #[source]
        source: Option<std::io::Error>,
    },

    #[error("Malformed filename {filename:?}: {reason}")]
    MalformedFilename { filename: String, reason: String },

    #[error("Missing field {field:?} {location}")]
    MissingField { field: String, location: String },

    #[error("Invalid value {value:?} for field {field:?} in data row {row}")]
    InvalidField {
        field: String,
        value: String,
        row: usize,
    },

    #[error("Failed to write output file {path:?}: {reason}")]
    WriteError { path: PathBuf, reason: String },

    #[error("Output file {path:?} was already written for {first_input:?} in this batch")]
    DuplicateOutput { path: PathBuf, first_input: PathBuf },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PickerError {
    pub(crate) fn malformed(filename: &str, reason: impl Into<String>) -> Self {
        PickerError::MalformedFilename {
            filename: filename.to_string(),
            reason: reason.into(),
        }
    }
}
