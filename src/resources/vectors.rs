/*
    In-memory sense vectors, loaded from tab separated text

    Dense:   id <TAB> 0.12 <TAB> -0.4 ...      (an `__Label` suffix on the id is dropped)
    Ranked:  id <TAB> lemma_weight <TAB> ...   (the lemma ends at the last `_`)
*/

use std::collections::HashMap;
use std::path::Path;

use tracing::info;

use super::{
    is_data_line, parse_number, read_file, FileResult, RankedTerm, ResourceError, ResourceErrorType, SenseVector,
    VectorSource,
};
use crate::error_handling::{collect_lines, Location};

type LineResult<T> = std::result::Result<T, ResourceErrorType>;

#[derive(Debug, Default, Clone)]
pub struct VectorStore {
    vectors: HashMap<String, SenseVector>,
}

fn split_id(line: &str) -> LineResult<(&str, std::str::Split<'_, char>)> {
    let mut fields = line.split('\t');
    let id = fields
        .next()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .ok_or(ResourceErrorType::MissingField("id"))?;
    Ok((id, fields))
}

fn parse_dense_line(line: &str) -> LineResult<SenseVector> {
    let (id, fields) = split_id(line)?;
    let id = id.split_once("__").map_or(id, |(head, _)| head);

    let values = fields
        .filter(|f| !f.trim().is_empty())
        .map(parse_number)
        .collect::<LineResult<Vec<f64>>>()?;

    if values.is_empty() {
        return Err(ResourceErrorType::EmptyVector);
    }
    Ok(SenseVector::dense(id, values))
}

fn parse_term(field: &str) -> LineResult<RankedTerm> {
    let field = field.trim();
    let (lemma, weight) = field
        .rsplit_once('_')
        .filter(|(lemma, _)| !lemma.is_empty())
        .ok_or_else(|| ResourceErrorType::MalformedTerm(field.to_string()))?;

    Ok(RankedTerm::new(&lemma.to_lowercase(), parse_number(weight)?))
}

fn parse_ranked_line(line: &str) -> LineResult<SenseVector> {
    let (id, fields) = split_id(line)?;

    let terms = fields
        .filter(|f| !f.trim().is_empty())
        .map(parse_term)
        .collect::<LineResult<Vec<RankedTerm>>>()?;

    if terms.is_empty() {
        return Err(ResourceErrorType::EmptyVector);
    }
    Ok(SenseVector::ranked(id, terms))
}

impl VectorStore {
    pub fn new() -> Self {
        Self::default()
    }

    // A later vector with the same id replaces the earlier one
    pub fn insert(&mut self, vector: SenseVector) {
        self.vectors.insert(vector.id.clone(), vector);
    }

    pub fn get(&self, sense_id: &str) -> Option<&SenseVector> {
        self.vectors.get(sense_id)
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    fn parse_with(&mut self, text: &str, path: &Path, parse: fn(&str) -> LineResult<SenseVector>) -> FileResult<()> {
        let vectors = collect_lines(text
            .lines()
            .enumerate()
            .filter(|(_, line)| is_data_line(line))
            .map(|(num, line)| parse(line).map_err(|error| ResourceError::new(Location::line(path, num + 1), error))))?;

        for vector in vectors {
            self.insert(vector);
        }
        Ok(())
    }

    pub fn parse_dense(&mut self, text: &str, path: &Path) -> FileResult<()> {
        self.parse_with(text, path, parse_dense_line)
    }

    pub fn parse_ranked(&mut self, text: &str, path: &Path) -> FileResult<()> {
        self.parse_with(text, path, parse_ranked_line)
    }

    pub fn load_dense(&mut self, path: &Path) -> FileResult<()> {
        self.parse_dense(&read_file(path)?, path)?;
        info!(file = %path.display(), vectors = self.len(), "dense vectors loaded");
        Ok(())
    }

    pub fn load_ranked(&mut self, path: &Path) -> FileResult<()> {
        self.parse_ranked(&read_file(path)?, path)?;
        info!(file = %path.display(), vectors = self.len(), "ranked vectors loaded");
        Ok(())
    }
}

impl VectorSource for VectorStore {
    fn fetch(&self, sense_id: &str) -> Option<SenseVector> {
        self.vectors.get(sense_id).cloned()
    }
}
