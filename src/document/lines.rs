use crate::model::LineGroup;

/// Read-only text view of one line, words in numeric word-index order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssembledLine<'a> {
    pub words: Vec<&'a str>,
    pub raw_text: String,
    pub normalized_text: String,
}

impl AssembledLine<'_> {
    pub fn word_count(&self) -> usize {
        self.words.len()
    }

    /// Word texts joined with every space removed.
    pub fn compact_text(&self) -> String {
        self.words.concat().replace(' ', "")
    }
}

pub fn assemble_line(line: &LineGroup) -> AssembledLine<'_> {
    let words: Vec<&str> = line.words.values().map(|element| element.text.as_str()).collect();
    let raw_text = words.join(" ");
    let normalized_text = normalize_header_text(&raw_text);

    AssembledLine {
        words,
        raw_text,
        normalized_text,
    }
}

fn normalize_header_text(text: &str) -> String {
    text.to_uppercase()
        .split_whitespace()
        .collect::<Vec<&str>>()
        .join(" ")
}
