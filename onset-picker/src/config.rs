//! Picker configuration types
//!
//! Every naming and column convention the picker relies on lives here so a
//! different site or task version can be handled without code changes. The
//! defaults match the stop-task exports the tool was written for.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for the onset picker
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PickerConfig {
    /// Filename segment that marks a stop-task result file
    #[serde(default = "default_task_marker")]
    pub task_marker: String,

    /// Extension of result files, without the leading dot
    #[serde(default = "default_extension")]
    pub extension: String,

    /// Filename prefix whose participant ids must carry the prefix as well
    #[serde(default = "default_site_prefix")]
    pub site_prefix: Option<String>,

    /// First letters of visit codes recorded before the intervention
    #[serde(default = "default_pre_visit_letters")]
    pub pre_visit_letters: Vec<char>,

    /// Input column names
    #[serde(default)]
    pub columns: ColumnNames,

    /// Directory the category files are written to (default: working directory)
    #[serde(default)]
    pub output_dir: Option<PathBuf>,

    /// What to do when a single file fails
    #[serde(default)]
    pub failure_policy: FailurePolicy,
}

fn default_task_marker() -> String {
    "StopTask".to_string()
}

fn default_extension() -> String {
    "csv".to_string()
}

fn default_site_prefix() -> Option<String> {
    Some("RTAD".to_string())
}

fn default_pre_visit_letters() -> Vec<char> {
    vec!['A', 'B']
}

/// Names of the CSV columns read from each trial row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnNames {
    #[serde(default = "default_stop_signal_column")]
    pub stop_signal: String,
    #[serde(default = "default_is_correct_column")]
    pub is_correct: String,
    #[serde(default = "default_onset_column")]
    pub onset: String,
}

fn default_stop_signal_column() -> String {
    "StopSignal".to_string()
}

fn default_is_correct_column() -> String {
    "IsCorrect".to_string()
}

fn default_onset_column() -> String {
    "TimeAtStartOfTrial".to_string()
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            stop_signal: default_stop_signal_column(),
            is_correct: default_is_correct_column(),
            onset: default_onset_column(),
        }
    }
}

/// Per-file failure handling for a batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Record the failure and carry on with the next file
    #[default]
    Isolate,
    /// Stop the batch at the first failing file
    Abort,
}

impl Default for PickerConfig {
    fn default() -> Self {
        Self {
            task_marker: default_task_marker(),
            extension: default_extension(),
            site_prefix: default_site_prefix(),
            pre_visit_letters: default_pre_visit_letters(),
            columns: ColumnNames::default(),
            output_dir: None,
            failure_policy: FailurePolicy::default(),
        }
    }
}

impl PickerConfig {
    /// Create a new configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: set the task marker segment
    pub fn with_task_marker(mut self, marker: impl Into<String>) -> Self {
        self.task_marker = marker.into();
        self
    }

    /// Builder method: set the result file extension
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into().trim_start_matches('.').to_string();
        self
    }

    /// Builder method: set or clear the site prefix
    pub fn with_site_prefix(mut self, prefix: Option<String>) -> Self {
        self.site_prefix = prefix;
        self
    }

    /// Builder method: set the visit letters that mean "pre"
    pub fn with_pre_visit_letters(mut self, letters: Vec<char>) -> Self {
        self.pre_visit_letters = letters;
        self
    }

    /// Builder method: set the input column names
    pub fn with_columns(mut self, columns: ColumnNames) -> Self {
        self.columns = columns;
        self
    }

    /// Builder method: write output files under `dir`
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    /// Builder method: set the failure policy
    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    /// Check whether a bare file name looks like a task result file
    pub fn matches_file_name(&self, name: &str) -> bool {
        let suffix = format!(".{}", self.extension);
        name.ends_with(&suffix) && name.contains(&self.task_marker)
    }

    /// Check whether a visit code letter belongs to the pre phase
    pub fn is_pre_visit(&self, letter: char) -> bool {
        self.pre_visit_letters.contains(&letter)
    }
}
