//! Main picker API
//!
//! The `OnsetPicker` ties the stages together: locate result files, derive
//! the output names, classify every trial row and write the category files.
//! Progress goes through a [`Reporter`] chosen by the caller instead of a
//! global verbosity switch.

use crate::classifier::RowClassifier;
use crate::config::{FailurePolicy, PickerConfig};
use crate::filename::OutputTemplate;
use crate::locator::locate_task_files;
use crate::reader::TrialReader;
use crate::types::{PickerError, Result};
use crate::writer::{write_onsets, CategoryCounts, OnsetBuckets};
use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Receives progress notifications while a batch runs
pub trait Reporter {
    /// A file is about to be processed
    fn file_started(&self, _input: &Path) {}

    /// A category file has been written
    fn output_written(&self, _output: &Path) {}

    /// A file could not be processed
    fn file_failed(&self, _input: &Path, _error: &PickerError) {}
}

/// Reports progress through the `log` facade
#[derive(Debug, Clone, Copy, Default)]
pub struct LogReporter;

impl Reporter for LogReporter {
    fn file_started(&self, input: &Path) {
        log::info!("Processing file: {}", input.display());
    }

    fn output_written(&self, output: &Path) {
        log::info!("Outputting file: {}", output.display());
    }

    fn file_failed(&self, input: &Path, error: &PickerError) {
        log::warn!("Failed to process {}: {}", input.display(), error);
    }
}

/// Discards all progress notifications
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentReporter;

impl Reporter for SilentReporter {}

/// Outcome of one successfully processed file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileSummary {
    pub input: PathBuf,
    pub participant: String,
    pub phase: String,
    pub outputs: Vec<PathBuf>,
    pub counts: CategoryCounts,
}

/// A file that could not be processed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileFailure {
    pub input: PathBuf,
    pub error: String,
}

/// Outcome of a directory run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    pub processed: Vec<FileSummary>,
    pub failures: Vec<FileFailure>,
    /// True if the batch stopped early under the abort policy
    pub aborted: bool,
}

impl BatchReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// Number of files found in the directory that were attempted
    pub fn attempted(&self) -> usize {
        self.processed.len() + self.failures.len()
    }
}

/// The onset picker - entry point for processing files and directories
pub struct OnsetPicker {
    config: PickerConfig,
    classifier: RowClassifier,
    reporter: Box<dyn Reporter>,
}

impl OnsetPicker {
    /// Create a picker that reports through the `log` facade
    pub fn new(config: PickerConfig) -> Self {
        Self::with_reporter(config, Box::new(LogReporter))
    }

    /// Create a picker with a specific reporter
    pub fn with_reporter(config: PickerConfig, reporter: Box<dyn Reporter>) -> Self {
        Self {
            config,
            classifier: RowClassifier::new(),
            reporter,
        }
    }

    /// Replace the classification rules
    pub fn with_classifier(mut self, classifier: RowClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn config(&self) -> &PickerConfig {
        &self.config
    }

    /// Process a single result file
    ///
    /// The output names are derived before the file is opened, and the whole
    /// file is classified before any output is written. Any error therefore
    /// leaves the category files of this input untouched.
    ///
    /// # Arguments
    /// * `path` - Path to the stop-task CSV file
    ///
    /// # Returns
    /// * `Result<FileSummary>` - Written paths and per-category counts
    pub fn process_file(&self, path: &Path) -> Result<FileSummary> {
        self.reporter.file_started(path);

        let template = OutputTemplate::parse(&path.to_string_lossy(), &self.config)?;
        self.pick(path, template)
    }

    /// Classify `path` and write its category files using `template`
    fn pick(&self, path: &Path, template: OutputTemplate) -> Result<FileSummary> {
        let records = TrialReader::open(path, &self.config.columns)?;
        let buckets = OnsetBuckets::collect(records, &self.classifier)?;

        let counts = buckets.counts();
        log::debug!(
            "{}: {} failed_stop, {} successful_stop, {} go_correct, {} unmatched",
            path.display(),
            counts.failed_stop,
            counts.successful_stop,
            counts.go_correct,
            counts.unmatched
        );

        let outputs = write_onsets(&buckets, &template)?;
        for output in &outputs {
            self.reporter.output_written(output);
        }

        Ok(FileSummary {
            input: path.to_path_buf(),
            participant: template.participant,
            phase: template.phase.to_string(),
            outputs,
            counts,
        })
    }

    /// Like `process_file`, but refuses outputs already written earlier in the batch
    fn process_claimed(&self, path: &Path, claimed: &mut HashMap<PathBuf, PathBuf>) -> Result<FileSummary> {
        self.reporter.file_started(path);

        let template = OutputTemplate::parse(&path.to_string_lossy(), &self.config)?;
        for (_, output) in template.paths() {
            if let Some(first_input) = claimed.get(&output) {
                return Err(PickerError::DuplicateOutput {
                    path: output,
                    first_input: first_input.clone(),
                });
            }
        }

        let summary = self.pick(path, template)?;
        for output in &summary.outputs {
            claimed.insert(output.clone(), path.to_path_buf());
        }
        Ok(summary)
    }

    /// Process every result file in a directory
    ///
    /// A missing directory fails the whole run. Failures of individual files
    /// are collected in the report, or end the batch early when the failure
    /// policy is `Abort`. Files written before the abort are kept. A file whose
    /// outputs were already written by an earlier file of the same batch fails
    /// with `DuplicateOutput` and writes nothing.
    pub fn process_directory(&self, dir: &Path) -> Result<BatchReport> {
        let files = locate_task_files(dir, &self.config)?;
        if files.is_empty() {
            log::info!("No {} files found in {}", self.config.task_marker, dir.display());
        }

        let mut report = BatchReport::default();
        let mut claimed = HashMap::new();
        for file in files {
            match self.process_claimed(&file, &mut claimed) {
                Ok(summary) => report.processed.push(summary),
                Err(e) => {
                    self.reporter.file_failed(&file, &e);
                    report.failures.push(FileFailure {
                        input: file,
                        error: e.to_string(),
                    });
                    if self.config.failure_policy == FailurePolicy::Abort {
                        report.aborted = true;
                        break;
                    }
                }
            }
        }

        Ok(report)
    }
}

impl Default for OnsetPicker {
    fn default() -> Self {
        Self::new(PickerConfig::default())
    }
}
