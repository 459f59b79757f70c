//! Batch summary output (plain text or JSON)

use anyhow::Result;
use onset_picker::BatchReport;
use std::fmt::Write;

/// Render a human readable summary of a batch run
pub fn render_text(report: &BatchReport) -> String {
    let mut out = String::new();

    let _ = writeln!(
        out,
        "Processed {} of {} file(s)",
        report.processed.len(),
        report.attempted()
    );

    for summary in &report.processed {
        let c = &summary.counts;
        let _ = writeln!(
            out,
            "  {} -> {} ({}): failed_stop={} successful_stop={} go_correct={} unmatched={}",
            summary.input.display(),
            summary.participant,
            summary.phase,
            c.failed_stop,
            c.successful_stop,
            c.go_correct,
            c.unmatched
        );
    }

    if !report.failures.is_empty() {
        let _ = writeln!(out, "Failed {} file(s):", report.failures.len());
        for failure in &report.failures {
            let _ = writeln!(out, "  {}: {}", failure.input.display(), failure.error);
        }
    }

    if report.aborted {
        let _ = writeln!(out, "Batch stopped at the first failure (--fail-fast)");
    }

    out
}

pub fn render_json(report: &BatchReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use onset_picker::{CategoryCounts, FileFailure, FileSummary};
    use std::path::PathBuf;

    fn report() -> BatchReport {
        BatchReport {
            processed: vec![FileSummary {
                input: PathBuf::from("raw/StopTask_P01_A1.csv"),
                participant: "P01".to_string(),
                phase: "pre".to_string(),
                outputs: vec![],
                counts: CategoryCounts {
                    failed_stop: 2,
                    successful_stop: 3,
                    go_correct: 10,
                    unmatched: 1,
                },
            }],
            failures: vec![FileFailure {
                input: PathBuf::from("raw/StopTask.csv"),
                error: "Malformed filename".to_string(),
            }],
            aborted: false,
        }
    }

    #[test]
    fn test_text_summary() {
        let text = render_text(&report());
        assert!(text.starts_with("Processed 1 of 2 file(s)\n"));
        assert!(text.contains("P01 (pre): failed_stop=2 successful_stop=3 go_correct=10 unmatched=1"));
        assert!(text.contains("Failed 1 file(s):\n  raw/StopTask.csv: Malformed filename"));
        assert!(!text.contains("--fail-fast"));
    }

    #[test]
    fn test_json_summary() {
        let json = render_json(&report()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["processed"][0]["counts"]["go_correct"], 10);
        assert_eq!(value["aborted"], false);
    }
}
