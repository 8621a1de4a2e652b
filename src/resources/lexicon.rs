/*
    File backed sense inventory: `lemma <TAB> LANG <TAB> id,id,...`
*/

use std::collections::HashMap;
use std::path::Path;

use tracing::info;

use super::{is_data_line, read_file, FileResult, ResourceError, ResourceErrorType, SenseLookup};
use crate::error_handling::{collect_lines, Location};
use crate::hierarchy::normalize_lemma;

#[derive(Debug, Default, Clone)]
pub struct Lexicon {
    senses: HashMap<(String, String), Vec<String>>,
}

fn key(lemma: &str, language: &str) -> (String, String) {
    (normalize_lemma(lemma), language.trim().to_uppercase())
}

fn parse_line(line: &str) -> std::result::Result<(String, String, Vec<String>), ResourceErrorType> {
    let mut fields = line.split('\t');

    let lemma = fields.next().map(str::trim).filter(|l| !l.is_empty()).ok_or(ResourceErrorType::MissingField("lemma"))?;
    let language = fields.next().map(str::trim).filter(|l| !l.is_empty()).ok_or(ResourceErrorType::MissingField("language"))?;
    let ids = fields
        .next()
        .ok_or(ResourceErrorType::MissingField("senses"))?
        .split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .collect();

    Ok((lemma.to_string(), language.to_string(), ids))
}

impl Lexicon {
    pub fn new() -> Self {
        Self::default()
    }

    // Appends, so a lemma listed twice keeps the senses of both lines
    pub fn insert(&mut self, lemma: &str, language: &str, ids: impl IntoIterator<Item = String>) {
        let entry = self.senses.entry(key(lemma, language)).or_default();
        for id in ids {
            if !entry.contains(&id) {
                entry.push(id);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.senses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.senses.is_empty()
    }

    pub fn parse_str(text: &str, path: &Path) -> FileResult<Self> {
        let entries = collect_lines(text
            .lines()
            .enumerate()
            .filter(|(_, line)| is_data_line(line))
            .map(|(num, line)| parse_line(line).map_err(|error| ResourceError::new(Location::line(path, num + 1), error))))?;

        let mut lexicon = Lexicon::new();
        for (lemma, language, ids) in entries {
            lexicon.insert(&lemma, &language, ids);
        }
        Ok(lexicon)
    }

    pub fn load(path: &Path) -> FileResult<Self> {
        let lexicon = Self::parse_str(&read_file(path)?, path)?;
        info!(file = %path.display(), lemmas = lexicon.len(), "lexicon loaded");
        Ok(lexicon)
    }
}

impl SenseLookup for Lexicon {
    fn lookup(&self, lemma: &str, language: &str) -> Vec<String> {
        self.senses.get(&key(lemma, language)).cloned().unwrap_or_default()
    }
}
