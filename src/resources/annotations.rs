/*
    Gold word pair scores, WordSim style: `word1,word2,score` (tabs also
    accepted). A first line whose score is not a number is a header.
*/

use std::path::Path;

use tracing::info;

use super::{is_data_line, parse_number, read_file, FileResult, ResourceError, ResourceErrorType};
use crate::error_handling::{collect_lines, Location};

#[derive(Debug, Clone, PartialEq)]
pub struct AnnotatedPair {
    pub first: String,
    pub second: String,
    pub score: f64,
}

fn parse_line(line: &str, scale: f64) -> std::result::Result<AnnotatedPair, ResourceErrorType> {
    let mut fields = line.split([',', '\t']).map(str::trim).filter(|f| !f.is_empty());

    let first = fields.next().ok_or(ResourceErrorType::MissingField("word1"))?;
    let second = fields.next().ok_or(ResourceErrorType::MissingField("word2"))?;
    let score = fields.next().ok_or(ResourceErrorType::MissingField("score"))?;

    Ok(AnnotatedPair {
        first: first.replace('_', " "),
        second: second.replace('_', " "),
        score: parse_number(score)? / scale,
    })
}

/// Gold scores are divided by `scale` (10 for WordSim353).
pub fn parse_word_pairs(text: &str, path: &Path, scale: f64) -> FileResult<Vec<AnnotatedPair>> {
    let mut lines = text
        .lines()
        .enumerate()
        .filter(|(_, line)| is_data_line(line))
        .peekable();

    if lines.peek().is_some_and(|(_, line)| parse_line(line, scale).is_err()) {
        lines.next();
    }

    collect_lines(lines.map(|(num, line)| {
        parse_line(line, scale).map_err(|error| ResourceError::new(Location::line(path, num + 1), error))
    }))
}

pub fn load_word_pairs(path: &Path, scale: f64) -> FileResult<Vec<AnnotatedPair>> {
    let pairs = parse_word_pairs(&read_file(path)?, path, scale)?;
    info!(file = %path.display(), pairs = pairs.len(), "word pairs loaded");
    Ok(pairs)
}
