//! Onset accumulation and category file output

use crate::classifier::RowClassifier;
use crate::filename::OutputTemplate;
use crate::types::{Category, PickerError, Result, TrialRecord};
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Onsets of one input file, grouped by category
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OnsetBuckets {
    failed_stop: Vec<String>,
    successful_stop: Vec<String>,
    go_correct: Vec<String>,
    unmatched: usize,
}

/// Number of records that went into each category
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CategoryCounts {
    pub failed_stop: usize,
    pub successful_stop: usize,
    pub go_correct: usize,
    /// Records that matched no rule and were left out of every file
    pub unmatched: usize,
}

impl CategoryCounts {
    pub fn total(&self) -> usize {
        self.failed_stop + self.successful_stop + self.go_correct + self.unmatched
    }
}

impl OnsetBuckets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Classify a whole record stream
    ///
    /// The stream is consumed completely. The first record error is returned
    /// as is, so a bad file never yields a partial set of buckets.
    pub fn collect<I>(records: I, classifier: &RowClassifier) -> Result<Self>
    where
        I: IntoIterator<Item = Result<TrialRecord>>,
    {
        let mut buckets = Self::new();
        for record in records {
            let record = record?;
            match classifier.classify(&record) {
                Some(category) => buckets.push(category, record.onset),
                None => {
                    log::trace!("Dropping unmatched trial with onset {:?}", record.onset);
                    buckets.unmatched += 1;
                }
            }
        }
        Ok(buckets)
    }

    /// Append an onset to a category, keeping order of appearance
    pub fn push(&mut self, category: Category, onset: String) {
        self.bucket_mut(category).push(onset);
    }

    pub fn get(&self, category: Category) -> &[String] {
        match category {
            Category::FailedStop => &self.failed_stop,
            Category::SuccessfulStop => &self.successful_stop,
            Category::GoCorrect => &self.go_correct,
        }
    }

    fn bucket_mut(&mut self, category: Category) -> &mut Vec<String> {
        match category {
            Category::FailedStop => &mut self.failed_stop,
            Category::SuccessfulStop => &mut self.successful_stop,
            Category::GoCorrect => &mut self.go_correct,
        }
    }

    pub fn unmatched(&self) -> usize {
        self.unmatched
    }

    pub fn counts(&self) -> CategoryCounts {
        CategoryCounts {
            failed_stop: self.failed_stop.len(),
            successful_stop: self.successful_stop.len(),
            go_correct: self.go_correct.len(),
            unmatched: self.unmatched,
        }
    }

    /// File contents for one category: onsets joined by newlines, no trailing newline
    pub fn render(&self, category: Category) -> String {
        self.get(category).join("\n")
    }
}

/// Write the three category files for one input file
///
/// Every target is checked before anything is written: its directory must
/// exist and the path itself must not be a directory. Contents are staged in
/// temporary files next to the targets and only renamed into place once all
/// three are written, so a failure leaves the previous files untouched.
/// Existing files are overwritten. Returns the written paths in priority order.
pub fn write_onsets(buckets: &OnsetBuckets, template: &OutputTemplate) -> Result<Vec<PathBuf>> {
    let targets = template.paths();

    for (_, path) in &targets {
        check_target(path)?;
    }

    let mut staged = Vec::with_capacity(targets.len());
    for (category, path) in targets {
        let file = stage(&path, &buckets.render(category)).map_err(|e| PickerError::WriteError {
            path: path.clone(),
            reason: e.to_string(),
        })?;
        staged.push((file, path));
    }

    let mut written = Vec::with_capacity(staged.len());
    for (file, path) in staged {
        file.persist(&path).map_err(|e| PickerError::WriteError {
            path: path.clone(),
            reason: e.error.to_string(),
        })?;
        written.push(path);
    }

    Ok(written)
}

fn stage(path: &Path, contents: &str) -> std::io::Result<NamedTempFile> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut file = NamedTempFile::new_in(dir)?;
    file.write_all(contents.as_bytes())?;
    file.flush()?;
    Ok(file)
}

fn check_target(path: &Path) -> Result<()> {
    if path.is_dir() {
        return Err(PickerError::WriteError {
            path: path.to_path_buf(),
            reason: "target is a directory".to_string(),
        });
    }
    match path.parent() {
        // Bare file names resolve against the working directory
        Some(parent) if parent.as_os_str().is_empty() => Ok(()),
        Some(parent) if !parent.is_dir() => Err(PickerError::WriteError {
            path: path.to_path_buf(),
            reason: format!("output directory {:?} does not exist", parent),
        }),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PickerConfig;
    use crate::types::Flag;
    use std::fs;
    use tempfile::TempDir;

    fn records() -> Vec<Result<TrialRecord>> {
        vec![
            Ok(TrialRecord::new(Flag::No, Flag::Yes, "1.0")),
            Ok(TrialRecord::new(Flag::Yes, Flag::No, "2.0")),
            Ok(TrialRecord::new(Flag::No, Flag::No, "3.0")),
            Ok(TrialRecord::new(Flag::No, Flag::Yes, "4.0")),
            Ok(TrialRecord::new(Flag::Yes, Flag::Yes, "5.0")),
        ]
    }

    fn template_in(dir: &Path) -> OutputTemplate {
        let config = PickerConfig::new().with_output_dir(dir);
        OutputTemplate::parse("StopTask_P01_A1.csv", &config).unwrap()
    }

    #[test]
    fn test_collect_preserves_order() {
        let buckets = OnsetBuckets::collect(records(), &RowClassifier::new()).unwrap();

        assert_eq!(buckets.get(Category::GoCorrect), ["1.0", "4.0"]);
        assert_eq!(buckets.get(Category::FailedStop), ["2.0"]);
        assert_eq!(buckets.get(Category::SuccessfulStop), ["5.0"]);
        assert_eq!(buckets.unmatched(), 1);
        assert_eq!(buckets.counts().total(), 5);
    }

    #[test]
    fn test_collect_stops_on_record_error() {
        let mut input = records();
        input.insert(
            2,
            Err(PickerError::MissingField {
                field: "IsCorrect".to_string(),
                location: "in data row 3".to_string(),
            }),
        );
        let result = OnsetBuckets::collect(input, &RowClassifier::new());
        assert!(matches!(result, Err(PickerError::MissingField { .. })));
    }

    #[test]
    fn test_render_has_no_trailing_newline() {
        let buckets = OnsetBuckets::collect(records(), &RowClassifier::new()).unwrap();
        assert_eq!(buckets.render(Category::GoCorrect), "1.0\n4.0");
        assert_eq!(OnsetBuckets::new().render(Category::GoCorrect), "");
    }

    #[test]
    fn test_write_creates_all_files() {
        let tmp = TempDir::new().unwrap();
        let mut buckets = OnsetBuckets::new();
        buckets.push(Category::FailedStop, "120".to_string());

        let written = write_onsets(&buckets, &template_in(tmp.path())).unwrap();
        assert_eq!(written.len(), 3);

        let failed = fs::read_to_string(tmp.path().join("P01_failed_stop_pre.txt")).unwrap();
        assert_eq!(failed, "120");
        let go = fs::read(tmp.path().join("P01_go_correct_pre.txt")).unwrap();
        assert!(go.is_empty());
    }

    #[test]
    fn test_write_overwrites() {
        let tmp = TempDir::new().unwrap();
        let target = tmp.path().join("P01_successful_stop_pre.txt");
        fs::write(&target, "stale\ncontent\nlonger than new").unwrap();

        let mut buckets = OnsetBuckets::new();
        buckets.push(Category::SuccessfulStop, "7".to_string());
        write_onsets(&buckets, &template_in(tmp.path())).unwrap();

        assert_eq!(fs::read_to_string(target).unwrap(), "7");
    }

    #[test]
    fn test_missing_output_dir_writes_nothing() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("missing");

        let result = write_onsets(&OnsetBuckets::new(), &template_in(&missing));
        assert!(matches!(result, Err(PickerError::WriteError { .. })));
        assert!(!missing.exists());
        assert_eq!(fs::read_dir(tmp.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_directory_target_keeps_previous_files() {
        let tmp = TempDir::new().unwrap();
        let failed = tmp.path().join("P01_failed_stop_pre.txt");
        fs::write(&failed, "OLD").unwrap();
        fs::create_dir(tmp.path().join("P01_successful_stop_pre.txt")).unwrap();

        let mut buckets = OnsetBuckets::new();
        buckets.push(Category::FailedStop, "120".to_string());
        let result = write_onsets(&buckets, &template_in(tmp.path()));

        assert!(matches!(result, Err(PickerError::WriteError { .. })));
        assert_eq!(fs::read_to_string(&failed).unwrap(), "OLD");
        assert!(!tmp.path().join("P01_go_correct_pre.txt").exists());
        // No staged temporaries left behind
        assert_eq!(fs::read_dir(tmp.path()).unwrap().count(), 2);
    }
}
