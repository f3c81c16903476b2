use std::fs;

use anyhow::{Context, Result};
use tracing::info;

use crate::cli::ClassifyArgs;
use crate::document::{DocumentClassifier, group};
use crate::error::ScanError;
use crate::tsv::parse_tesseract_tsv;
use crate::util::write_json_stdout;

pub fn run(args: ClassifyArgs) -> Result<()> {
    if !args.tsv.is_file() {
        return Err(ScanError::InputNotFound { path: args.tsv }.into());
    }

    let raw = fs::read_to_string(&args.tsv)
        .with_context(|| format!("failed to read {}", args.tsv.display()))?;
    let observations = parse_tesseract_tsv(&raw)
        .with_context(|| format!("failed to parse {}", args.tsv.display()))?;

    let index = group(&observations);
    let verdict = DocumentClassifier::new()?.classify(&index);

    info!(
        path = %args.tsv.display(),
        observations = observations.len(),
        words = index.word_count(),
        document_type = verdict.document_type.as_str(),
        verified = verdict.verified,
        "classification completed"
    );
    for (field, value) in &verdict.extracted_data {
        info!(field = %field, value = %value, "extracted field");
    }

    if args.json {
        write_json_stdout(&verdict)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::error::exit_code_for;

    #[test]
    fn missing_tsv_is_input_not_found() {
        let err = run(ClassifyArgs {
            tsv: PathBuf::from("does/not/exist.tsv"),
            json: false,
        })
        .unwrap_err();

        assert_eq!(exit_code_for(&err), 2);
    }

    #[test]
    fn classifies_saved_tsv() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("page.tsv");
        fs::write(
            &path,
            "level\tpage_num\tblock_num\tpar_num\tline_num\tword_num\tleft\ttop\twidth\theight\tconf\ttext\n\
             5\t1\t1\t1\t1\t1\t10\t10\t50\t20\t91.2\tINCOME\n\
             5\t1\t1\t1\t1\t2\t70\t10\t40\t20\t93.0\tTAX\n",
        )
        .expect("write");

        run(ClassifyArgs {
            tsv: path,
            json: false,
        })
        .expect("classify");
    }

    #[test]
    fn malformed_tsv_is_reported() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("page.tsv");
        fs::write(&path, "level\tconf\n5\t90\n").expect("write");

        let err = run(ClassifyArgs {
            tsv: path,
            json: false,
        })
        .unwrap_err();

        assert_eq!(exit_code_for(&err), 1);
        assert!(format!("{err:#}").contains("page_num"));
    }
}
