//! Stop-Task Onset Picker Library
//!
//! A small, reusable library that turns stop-signal task result files (CSV)
//! into onset lists for downstream imaging or statistical analysis.
//!
//! # Architecture
//!
//! Processing is a single synchronous pass per file:
//! - Locate result files in a directory by name
//! - Derive participant id and visit phase from each filename
//! - Classify every trial row as failed stop, successful stop or correct go
//! - Write one onset file per category (`{participant}_{category}_{phase}.txt`)
//!
//! Argument parsing, configuration files and log setup live in the
//! application layer (onset-picker-cli).
//!
//! # Example Usage
//!
//! ```no_run
//! use onset_picker::{OnsetPicker, PickerConfig};
//! use std::path::Path;
//!
//! let config = PickerConfig::new().with_output_dir("onsets");
//! let picker = OnsetPicker::new(config);
//!
//! let report = picker.process_directory(Path::new("raw")).unwrap();
//! for failure in &report.failures {
//!     eprintln!("{:?}: {}", failure.input, failure.error);
//! }
//! ```

// Public modules
pub mod classifier;
pub mod config;
pub mod filename;
pub mod locator;
pub mod picker;
pub mod reader;
pub mod types;
pub mod writer;

// Re-export main types for convenience
pub use classifier::{ClassificationRule, RowClassifier};
pub use config::{ColumnNames, FailurePolicy, PickerConfig};
pub use filename::OutputTemplate;
pub use locator::locate_task_files;
pub use picker::{
    BatchReport, FileFailure, FileSummary, LogReporter, OnsetPicker, Reporter, SilentReporter,
};
pub use reader::TrialReader;
pub use types::{Category, Flag, Phase, PickerError, Result, TrialRecord};
pub use writer::{write_onsets, CategoryCounts, OnsetBuckets};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
