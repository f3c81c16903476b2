use crate::model::{
    BoundingBox, ClassificationVerdict, HierarchicalIndex, ImageDimensions, ResultRecord,
    SampleBlock, SampleLine, SampleObject, SampleParagraph, SampleWord, WordElement,
};

/// Only the first page of a source document is ever processed.
pub const PROCESSED_PAGE: usize = 0;

pub fn sample_object() -> SampleObject {
    SampleObject {
        page: SampleBlock {
            block: SampleParagraph {
                paragraph: SampleLine {
                    line: SampleWord {
                        word: WordElement {
                            text: "SampleText".to_string(),
                            confidence: 99,
                            bounding_box: BoundingBox {
                                left: 100,
                                top: 200,
                                width: 50,
                                height: 20,
                            },
                        },
                    },
                },
            },
        },
    }
}

pub fn compose(
    source_file: &str,
    page_count: usize,
    image_dimensions: ImageDimensions,
    elements: HierarchicalIndex,
    verification: ClassificationVerdict,
) -> ResultRecord {
    ResultRecord {
        source_file: source_file.to_string(),
        page_count,
        processed_page: PROCESSED_PAGE,
        image_dimensions,
        sample_object: sample_object(),
        elements,
        verification,
    }
}
