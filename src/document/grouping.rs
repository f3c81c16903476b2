use tracing::debug;

use crate::model::{HierarchicalIndex, WordElement, WordObservation};

/// Observations at or below this engine confidence never enter the index.
pub const MIN_WORD_CONFIDENCE: i32 = 60;

pub fn passes_filter(observation: &WordObservation) -> bool {
    observation.confidence > MIN_WORD_CONFIDENCE && !observation.text.trim().is_empty()
}

/// Builds the page/block/paragraph/line/word index from raw engine output.
/// A later observation at an already occupied position replaces the earlier one.
pub fn group(observations: &[WordObservation]) -> HierarchicalIndex {
    let mut index = HierarchicalIndex::default();

    for observation in observations.iter().filter(|value| passes_filter(value)) {
        let key = observation.key();
        let element = WordElement {
            text: observation.text.trim().to_string(),
            confidence: observation.confidence,
            bounding_box: observation.bounding_box,
        };

        if let Some(previous) = index.upsert(key, element) {
            debug!(
                page = key.page,
                block = key.block,
                paragraph = key.paragraph,
                line = key.line,
                word = key.word,
                replaced = %previous.text,
                "word position collision, keeping later observation"
            );
        }
    }

    index
}
