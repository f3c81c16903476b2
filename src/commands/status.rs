use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::cli::StatusArgs;
use crate::commands::scan::RESULT_FILE_SUFFIX;
use crate::model::ResultRecord;
use crate::util::read_json;

#[derive(Debug, Default, PartialEq, Eq)]
pub struct StatusSummary {
    pub records: usize,
    pub verified: usize,
    pub unreadable: usize,
}

pub fn run(args: StatusArgs) -> Result<()> {
    info!(output_dir = %args.output_dir.display(), "status requested");

    if !args.output_dir.is_dir() {
        warn!(path = %args.output_dir.display(), "output directory missing");
        return Ok(());
    }

    let summary = summarize(&args.output_dir)?;
    info!(
        records = summary.records,
        verified = summary.verified,
        unreadable = summary.unreadable,
        "status completed"
    );

    Ok(())
}

fn summarize(output_dir: &Path) -> Result<StatusSummary> {
    let mut summary = StatusSummary::default();

    for path in discover_results(output_dir)? {
        let record: ResultRecord = match read_json(&path) {
            Ok(record) => record,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "unreadable result record");
                summary.unreadable += 1;
                continue;
            }
        };

        summary.records += 1;
        if record.verification.verified {
            summary.verified += 1;
        }

        let extracted = record
            .verification
            .extracted_data
            .iter()
            .map(|(field, value)| format!("{field}={value}"))
            .collect::<Vec<String>>()
            .join(",");

        info!(
            path = %path.display(),
            source = %record.source_file,
            page_count = record.page_count,
            words = record.elements.word_count(),
            document_type = record.verification.document_type.as_str(),
            verified = record.verification.verified,
            extracted = %extracted,
            "loaded result record"
        );
    }

    Ok(summary)
}

fn discover_results(output_dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(output_dir)
        .with_context(|| format!("failed to read {}", output_dir.display()))?;

    let mut results = Vec::new();
    for entry in entries {
        let entry =
            entry.with_context(|| format!("failed to read entry in {}", output_dir.display()))?;
        let path = entry.path();

        let is_result = path
            .file_name()
            .and_then(|name| name.to_str())
            .map(|name| name.ends_with(RESULT_FILE_SUFFIX))
            .unwrap_or(false);
        if is_result && path.is_file() {
            results.push(path);
        }
    }

    results.sort();
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{DocumentClassifier, compose, group};
    use crate::model::{BoundingBox, ImageDimensions, WordObservation};
    use crate::util::write_json_pretty;

    fn record_for(words: &[&str]) -> ResultRecord {
        let observations: Vec<WordObservation> = words
            .iter()
            .enumerate()
            .map(|(position, text)| WordObservation {
                text: text.to_string(),
                confidence: 90,
                bounding_box: BoundingBox::default(),
                page: 1,
                block: 1,
                paragraph: 1,
                line: 1,
                word: position as u32 + 1,
            })
            .collect();
        let index = group(&observations);
        let verdict = DocumentClassifier::new()
            .expect("classifier")
            .classify(&index);
        compose("card.pdf", 1, ImageDimensions::default(), index, verdict)
    }

    #[test]
    fn summarize_counts_verified_and_unreadable_records() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_json_pretty(
            &dir.path().join("aadhaar_ocr_results.json"),
            &record_for(&["1234", "5678", "9012"]),
        )
        .expect("write");
        write_json_pretty(
            &dir.path().join("letter_ocr_results.json"),
            &record_for(&["Dear", "Sir"]),
        )
        .expect("write");
        fs::write(dir.path().join("broken_ocr_results.json"), b"{").expect("write");
        fs::write(dir.path().join("aadhaar.pdf"), b"%PDF").expect("write");

        let summary = summarize(dir.path()).expect("summarize");

        assert_eq!(
            summary,
            StatusSummary {
                records: 2,
                verified: 1,
                unreadable: 1,
            }
        );
    }

    #[test]
    fn missing_output_dir_is_not_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");

        run(StatusArgs {
            output_dir: dir.path().join("uploads"),
        })
        .expect("status");
    }
}
