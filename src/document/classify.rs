use anyhow::{Context, Result};
use regex::Regex;
use tracing::info;

use super::lines::{AssembledLine, assemble_line};
use crate::model::{
    AADHAAR_NUMBER_FIELD, ClassificationVerdict, DocumentType, HierarchicalIndex, LineKey,
    PAN_NUMBER_FIELD,
};

pub const TAX_ID_HEADER: &str = "INCOME TAX DEPARTMENT GOVT. OF INDIA";

const TAX_ID_HEADER_TERMS: [&str; 2] = ["INCOME", "TAX"];
const ID_NUMBER_WORD_COUNT: usize = 3;

/// Detects Aadhaar and PAN cards from the grouped OCR lines.
#[derive(Debug, Clone)]
pub struct DocumentClassifier {
    pub(super) id_number: Regex,
    pub(super) tax_id_code: Regex,
}

impl DocumentClassifier {
    pub fn new() -> Result<Self> {
        Ok(Self {
            id_number: Regex::new(r"^\p{Nd}{12}$")
                .context("failed to compile ID number regex")?,
            // The tenth character is deliberately left unchecked.
            tax_id_code: Regex::new(r"(?s)^\p{L}{5}\p{Nd}{4}.$")
                .context("failed to compile tax ID code regex")?,
        })
    }

    /// Scans lines in document order and stops after the first line on which
    /// any detector fires. An empty index is always `NOT_VERIFIED`.
    pub fn classify(&self, index: &HierarchicalIndex) -> ClassificationVerdict {
        let mut verdict = ClassificationVerdict::default();

        for (key, group) in index.lines() {
            let line = assemble_line(group);
            let id_number_found = self.detect_id_number(key, &line, &mut verdict);
            let header_found = self.detect_tax_header(key, &line, &mut verdict);
            if id_number_found || header_found {
                break;
            }
        }

        if index.is_empty() {
            verdict.verified = false;
            verdict.document_type = DocumentType::NotVerified;
        }

        verdict
    }

    pub(super) fn detect_id_number(
        &self,
        key: LineKey,
        line: &AssembledLine<'_>,
        verdict: &mut ClassificationVerdict,
    ) -> bool {
        if line.word_count() != ID_NUMBER_WORD_COUNT {
            return false;
        }

        let joined = line.compact_text();
        if !self.id_number.is_match(&joined) {
            return false;
        }

        info!(
            page = key.page,
            block = key.block,
            paragraph = key.paragraph,
            line = key.line,
            "verified Aadhaar number line"
        );
        verdict.document_type = DocumentType::AadhaarId;
        verdict.verified = true;
        verdict
            .extracted_data
            .insert(AADHAAR_NUMBER_FIELD.to_string(), joined);
        true
    }

    pub(super) fn detect_tax_header(
        &self,
        key: LineKey,
        line: &AssembledLine<'_>,
        verdict: &mut ClassificationVerdict,
    ) -> bool {
        if !TAX_ID_HEADER_TERMS
            .iter()
            .any(|term| line.normalized_text.contains(term))
        {
            return false;
        }
        if line.normalized_text != TAX_ID_HEADER {
            return false;
        }

        info!(
            page = key.page,
            block = key.block,
            paragraph = key.paragraph,
            line = key.line,
            text = %line.raw_text,
            "verified income tax header line"
        );
        verdict.document_type = DocumentType::TaxId;
        verdict.verified = true;

        if let Some(code) = line
            .words
            .iter()
            .find(|word| self.tax_id_code.is_match(word))
        {
            verdict
                .extracted_data
                .entry(PAN_NUMBER_FIELD.to_string())
                .or_insert_with(|| code.to_string());
        }
        true
    }
}
