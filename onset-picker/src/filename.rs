//! Output naming derived from input filenames
//!
//! Result files are named `<...>_<marker>_<participant>_<visit>...`, for
//! example `StopTask_P01_A1.csv`. The participant id and the visit phase are
//! pulled out of the name and used to build one output path per category:
//! `{participant}_{category}_{phase}.txt`.

use crate::config::PickerConfig;
use crate::types::{Category, Phase, PickerError, Result};
use std::path::PathBuf;

/// Structured output path template for one input file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputTemplate {
    /// Participant id, including the site prefix where it applies
    pub participant: String,
    /// Visit phase
    pub phase: Phase,
    /// Directory the outputs are rooted in (None = relative to the working directory)
    pub output_dir: Option<PathBuf>,
}

impl OutputTemplate {
    /// Parse an input filename into an output template
    ///
    /// # Arguments
    /// * `raw` - File name or path; both `/` and `\` separators are accepted
    /// * `config` - Naming conventions (task marker, site prefix, pre letters, output dir)
    ///
    /// # Returns
    /// * `Result<OutputTemplate>` - Err(MalformedFilename) if the marker,
    ///   participant or visit segment cannot be found
    ///
    /// # Example
    /// ```
    /// use onset_picker::{Category, OutputTemplate, PickerConfig};
    ///
    /// let template = OutputTemplate::parse("StopTask_P01_A1.csv", &PickerConfig::new()).unwrap();
    /// assert_eq!(
    ///     template.path_for(Category::FailedStop).to_str(),
    ///     Some("P01_failed_stop_pre.txt")
    /// );
    /// ```
    pub fn parse(raw: &str, config: &PickerConfig) -> Result<Self> {
        let file_name = base_name(raw);
        let segments: Vec<&str> = file_name.split('_').collect();

        let marker_index = segments
            .iter()
            .position(|s| *s == config.task_marker)
            .ok_or_else(|| {
                PickerError::malformed(
                    raw,
                    format!("no segment equal to {:?}", config.task_marker),
                )
            })?;

        let participant = segments
            .get(marker_index + 1)
            .ok_or_else(|| PickerError::malformed(raw, "no participant segment after task marker"))?;

        let participant = match &config.site_prefix {
            Some(prefix) if file_name.starts_with(prefix.as_str()) => {
                format!("{}{}", prefix, participant)
            }
            _ => participant.to_string(),
        };

        let visit_letter = segments
            .get(marker_index + 2)
            .and_then(|s| s.chars().next())
            .ok_or_else(|| PickerError::malformed(raw, "no visit segment after participant"))?;

        let phase = if config.is_pre_visit(visit_letter) {
            Phase::Pre
        } else {
            Phase::Post
        };

        Ok(Self {
            participant,
            phase,
            output_dir: config.output_dir.clone(),
        })
    }

    /// File name for one category, without the output directory
    pub fn file_name(&self, category: Category) -> String {
        format!("{}_{}_{}.txt", self.participant, category, self.phase)
    }

    /// Full output path for one category
    pub fn path_for(&self, category: Category) -> PathBuf {
        let name = self.file_name(category);
        match &self.output_dir {
            Some(dir) => dir.join(name),
            None => PathBuf::from(name),
        }
    }

    /// Output paths for all categories, in priority order
    pub fn paths(&self) -> Vec<(Category, PathBuf)> {
        Category::ALL
            .iter()
            .map(|&category| (category, self.path_for(category)))
            .collect()
    }
}

/// Strip leading path components written with either separator style
fn base_name(raw: &str) -> &str {
    raw.rsplit(['/', '\\']).next().unwrap_or(raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::path::Path;

    fn parse(raw: &str) -> Result<OutputTemplate> {
        OutputTemplate::parse(raw, &PickerConfig::new())
    }

    #[test]
    fn test_base_name() {
        assert_eq!(base_name("a/b/StopTask_P01_A1.csv"), "StopTask_P01_A1.csv");
        assert_eq!(base_name(r"C:\data\StopTask_P01_A1.csv"), "StopTask_P01_A1.csv");
        assert_eq!(base_name(r"mixed/dir\StopTask_P01_A1.csv"), "StopTask_P01_A1.csv");
        assert_eq!(base_name("StopTask_P01_A1.csv"), "StopTask_P01_A1.csv");
    }

    #[test]
    fn test_basic_filename() {
        let template = parse("StopTask_P01_A1.csv").unwrap();
        assert_eq!(template.participant, "P01");
        assert_eq!(template.phase, Phase::Pre);

        assert_eq!(template.path_for(Category::FailedStop), PathBuf::from("P01_failed_stop_pre.txt"));
        assert_eq!(
            template.path_for(Category::SuccessfulStop),
            PathBuf::from("P01_successful_stop_pre.txt")
        );
        assert_eq!(template.path_for(Category::GoCorrect), PathBuf::from("P01_go_correct_pre.txt"));
    }

    #[test]
    fn test_site_prefix() {
        let template = parse("RTAD_StopTask_005_B2.csv").unwrap();
        assert_eq!(template.participant, "RTAD005");
        assert_eq!(template.phase, Phase::Pre);
    }

    #[test]
    fn test_site_prefix_checked_after_directory_strip() {
        let template = parse("RTAD/StopTask_005_C1.csv").unwrap();
        assert_eq!(template.participant, "005");
        assert_eq!(template.phase, Phase::Post);
    }

    #[test]
    fn test_post_phase_letters() {
        for visit in ["C1", "D2", "a1", "1A"] {
            let template = parse(&format!("StopTask_P01_{}.csv", visit)).unwrap();
            assert_eq!(template.phase, Phase::Post, "visit {}", visit);
        }
    }

    #[test]
    fn test_windows_path() {
        let template = parse(r"D:\study\raw\Site_StopTask_P07_B1.csv").unwrap();
        assert_eq!(template.participant, "P07");
        assert_eq!(template.phase, Phase::Pre);
    }

    #[test]
    fn test_output_dir() {
        let config = PickerConfig::new().with_output_dir("/tmp/onsets");
        let template = OutputTemplate::parse("StopTask_P01_C1.csv", &config).unwrap();
        assert_eq!(
            template.path_for(Category::GoCorrect),
            Path::new("/tmp/onsets").join("P01_go_correct_post.txt")
        );
    }

    #[test]
    fn test_paths_are_distinct() {
        let template = parse("RTAD_StopTask_005_B2.csv").unwrap();
        let paths: HashSet<PathBuf> = template.paths().into_iter().map(|(_, p)| p).collect();
        assert_eq!(paths.len(), 3);
    }

    #[test]
    fn test_marker_must_be_whole_segment() {
        let result = parse("MyStopTask_P01_A1.csv");
        assert!(matches!(result, Err(PickerError::MalformedFilename { .. })));
    }

    #[test]
    fn test_missing_segments() {
        assert!(matches!(parse("P01_StopTask"), Err(PickerError::MalformedFilename { .. })));
        assert!(matches!(parse("StopTask_P01"), Err(PickerError::MalformedFilename { .. })));
        assert!(matches!(parse("StopTask_P01_"), Err(PickerError::MalformedFilename { .. })));
    }

    #[test]
    fn test_custom_marker() {
        let config = PickerConfig::new().with_task_marker("SST");
        let template = OutputTemplate::parse("SST_P03_B1.csv", &config).unwrap();
        assert_eq!(template.participant, "P03");
    }
}
