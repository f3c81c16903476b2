use std::collections::HashMap;

use anyhow::{Context, Result, bail};

use crate::model::{BoundingBox, WordObservation};

const REQUIRED_COLUMNS: [&str; 11] = [
    "page_num", "block_num", "par_num", "line_num", "word_num", "left", "top", "width", "height",
    "conf", "text",
];

/// Parses `tesseract ... tsv` output. Columns are located by header name.
pub fn parse_tesseract_tsv(raw: &str) -> Result<Vec<WordObservation>> {
    let mut lines = raw.lines();
    let header = lines.next().context("tesseract TSV output is empty")?;
    let columns: HashMap<&str, usize> = header
        .split('\t')
        .enumerate()
        .map(|(position, name)| (name.trim(), position))
        .collect();

    let mut positions = [0_usize; REQUIRED_COLUMNS.len()];
    for (slot, name) in positions.iter_mut().zip(REQUIRED_COLUMNS) {
        *slot = *columns
            .get(name)
            .with_context(|| format!("tesseract TSV header is missing column '{name}'"))?;
    }
    let [page, block, paragraph, line, word, left, top, width, height, conf, text] = positions;

    let mut observations = Vec::new();
    for (offset, row) in lines.enumerate() {
        let row_number = offset + 2;
        if row.trim().is_empty() {
            continue;
        }
        let fields: Vec<&str> = row.split('\t').collect();
        let field = |position: usize| -> Result<&str> {
            match fields.get(position) {
                Some(value) => Ok(*value),
                // tesseract omits the trailing empty text cell on non-word rows
                None if position == text => Ok(""),
                None => bail!("tesseract TSV row {row_number} has {} fields", fields.len()),
            }
        };
        let number = |position: usize, name: &str| -> Result<u32> {
            let value = field(position)?;
            value.trim().parse::<u32>().with_context(|| {
                format!("invalid {name} '{value}' in tesseract TSV row {row_number}")
            })
        };

        let confidence_raw = field(conf)?;
        let confidence = parse_confidence(confidence_raw).with_context(|| {
            format!("invalid conf '{confidence_raw}' in tesseract TSV row {row_number}")
        })?;

        observations.push(WordObservation {
            text: field(text)?.to_string(),
            confidence,
            bounding_box: BoundingBox {
                left: number(left, "left")?,
                top: number(top, "top")?,
                width: number(width, "width")?,
                height: number(height, "height")?,
            },
            page: number(page, "page_num")?,
            block: number(block, "block_num")?,
            paragraph: number(paragraph, "par_num")?,
            line: number(line, "line_num")?,
            word: number(word, "word_num")?,
        });
    }

    Ok(observations)
}

/// Newer tesseract builds report fractional confidences; truncate toward zero.
fn parse_confidence(value: &str) -> Result<i32> {
    let parsed = value.trim().parse::<f64>()?;
    if !parsed.is_finite() {
        bail!("confidence is not finite");
    }
    Ok(parsed.trunc() as i32)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str =
        "level\tpage_num\tblock_num\tpar_num\tline_num\tword_num\tleft\ttop\twidth\theight\tconf\ttext";

    #[test]
    fn parses_word_rows_and_structural_rows() {
        let raw = format!(
            "{HEADER}\n\
             1\t1\t0\t0\t0\t0\t0\t0\t1654\t2339\t-1\n\
             5\t1\t1\t1\t1\t1\t120\t88\t210\t42\t96.063751\t1234\n\
             5\t1\t1\t1\t1\t2\t350\t88\t212\t41\t60.9\t5678\n"
        );

        let observations = parse_tesseract_tsv(&raw).expect("parse");

        assert_eq!(observations.len(), 3);
        assert_eq!(observations[0].confidence, -1);
        assert_eq!(observations[0].text, "");
        assert_eq!(observations[1].text, "1234");
        assert_eq!(observations[1].confidence, 96);
        assert_eq!(
            observations[1].bounding_box,
            BoundingBox {
                left: 120,
                top: 88,
                width: 210,
                height: 42,
            }
        );
        assert_eq!(observations[2].confidence, 60);
        assert_eq!(observations[2].word, 2);
    }

    #[test]
    fn locates_columns_by_header_name() {
        let raw = "text\tconf\tword_num\tline_num\tpar_num\tblock_num\tpage_num\theight\twidth\ttop\tleft\n\
                   GOVT.\t91\t4\t2\t1\t3\t1\t20\t60\t10\t5\n";

        let observations = parse_tesseract_tsv(raw).expect("parse");

        assert_eq!(observations[0].text, "GOVT.");
        assert_eq!(observations[0].block, 3);
        assert_eq!(observations[0].line, 2);
        assert_eq!(observations[0].bounding_box.left, 5);
    }

    #[test]
    fn rejects_missing_columns() {
        let err = parse_tesseract_tsv("level\tpage_num\ttext\n").unwrap_err();
        assert!(err.to_string().contains("block_num"));
    }

    #[test]
    fn rejects_malformed_rows_with_row_number() {
        let raw = format!("{HEADER}\n5\t1\t1\t1\t1\tx\t0\t0\t1\t1\t90\tword\n");

        let err = parse_tesseract_tsv(&raw).unwrap_err();

        assert!(err.to_string().contains("row 2"));
        assert!(err.to_string().contains("word_num"));
    }

    #[test]
    fn rejects_empty_output() {
        assert!(parse_tesseract_tsv("").is_err());
    }
}
