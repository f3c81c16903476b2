use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub left: u32,
    pub top: u32,
    pub width: u32,
    pub height: u32,
}

/// One token as reported by the OCR engine, before any filtering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordObservation {
    pub text: String,
    pub confidence: i32,
    pub bounding_box: BoundingBox,
    pub page: u32,
    pub block: u32,
    pub paragraph: u32,
    pub line: u32,
    pub word: u32,
}

impl WordObservation {
    pub fn key(&self) -> WordKey {
        WordKey {
            page: self.page,
            block: self.block,
            paragraph: self.paragraph,
            line: self.line,
            word: self.word,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LineKey {
    pub page: u32,
    pub block: u32,
    pub paragraph: u32,
    pub line: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WordKey {
    pub page: u32,
    pub block: u32,
    pub paragraph: u32,
    pub line: u32,
    pub word: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordElement {
    pub text: String,
    pub confidence: i32,
    pub bounding_box: BoundingBox,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LineGroup {
    pub words: BTreeMap<u32, WordElement>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParagraphGroup {
    pub lines: BTreeMap<u32, LineGroup>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockGroup {
    pub paragraphs: BTreeMap<u32, ParagraphGroup>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageGroup {
    pub blocks: BTreeMap<u32, BlockGroup>,
}

/// page -> block -> paragraph -> line -> word. Presence of an element means
/// it passed the confidence filter; keys are numeric and iterate in order.
/// serde_json renders the integer keys as strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HierarchicalIndex {
    pub pages: BTreeMap<u32, PageGroup>,
}

impl HierarchicalIndex {
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Inserts `element` at `key`, creating the enclosing groups as needed.
    /// Returns the element previously stored at the same key.
    pub fn upsert(&mut self, key: WordKey, element: WordElement) -> Option<WordElement> {
        let line = self
            .pages
            .entry(key.page)
            .or_default()
            .blocks
            .entry(key.block)
            .or_default()
            .paragraphs
            .entry(key.paragraph)
            .or_default()
            .lines
            .entry(key.line)
            .or_default();

        match line.words.entry(key.word) {
            Entry::Occupied(mut slot) => Some(slot.insert(element)),
            Entry::Vacant(slot) => {
                slot.insert(element);
                None
            }
        }
    }

    /// Lines in page, block, paragraph, line order.
    pub fn lines(&self) -> impl Iterator<Item = (LineKey, &LineGroup)> + '_ {
        self.pages.iter().flat_map(|(&page, page_group)| {
            page_group.blocks.iter().flat_map(move |(&block, block_group)| {
                block_group
                    .paragraphs
                    .iter()
                    .flat_map(move |(&paragraph, paragraph_group)| {
                        paragraph_group.lines.iter().map(move |(&line, group)| {
                            (
                                LineKey {
                                    page,
                                    block,
                                    paragraph,
                                    line,
                                },
                                group,
                            )
                        })
                    })
            })
        })
    }

    pub fn word_count(&self) -> usize {
        self.lines().map(|(_, group)| group.words.len()).sum()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentType {
    #[default]
    #[serde(rename = "UNKNOWN")]
    Unknown,
    #[serde(rename = "AADHAR")]
    AadhaarId,
    #[serde(rename = "PAN")]
    TaxId,
    #[serde(rename = "NOT_VERIFIED")]
    NotVerified,
}

impl DocumentType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unknown => "UNKNOWN",
            Self::AadhaarId => "AADHAR",
            Self::TaxId => "PAN",
            Self::NotVerified => "NOT_VERIFIED",
        }
    }
}

pub const AADHAAR_NUMBER_FIELD: &str = "aadhaar_number";
pub const PAN_NUMBER_FIELD: &str = "pan_number";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationVerdict {
    pub document_type: DocumentType,
    pub verified: bool,
    pub extracted_data: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageDimensions {
    pub width: u32,
    pub height: u32,
}

/// Fixed schema illustration shipped in every result record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleObject {
    #[serde(rename = "page number")]
    pub page: SampleBlock,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleBlock {
    #[serde(rename = "block number")]
    pub block: SampleParagraph,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleParagraph {
    #[serde(rename = "paragraph number")]
    pub paragraph: SampleLine,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleLine {
    #[serde(rename = "line number")]
    pub line: SampleWord,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleWord {
    #[serde(rename = "word number")]
    pub word: WordElement,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultRecord {
    pub source_file: String,
    pub page_count: usize,
    pub processed_page: usize,
    pub image_dimensions: ImageDimensions,
    pub sample_object: SampleObject,
    pub elements: HierarchicalIndex,
    pub verification: ClassificationVerdict,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ToolVersions {
    pub pdfinfo: Option<String>,
    pub pdftoppm: Option<String>,
    pub tesseract: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ScanCounts {
    pub observations_total: usize,
    pub observations_kept: usize,
    pub lines_total: usize,
    pub words_total: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScanRunManifest {
    pub manifest_version: u32,
    pub run_id: String,
    pub status: String,
    pub started_at: String,
    pub updated_at: String,
    pub command: String,
    pub tool_versions: ToolVersions,
    pub source_file: String,
    pub source_sha256: String,
    pub result_path: String,
    pub document_type: DocumentType,
    pub verified: bool,
    pub counts: ScanCounts,
    pub warnings: Vec<String>,
}
