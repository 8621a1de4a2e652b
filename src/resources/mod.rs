/*
    Boundary with the semantic resources: sense lookup by lemma and sense
    vectors by id. The scoring code only sees the two traits below; file
    backed stores and caching are composed on top of them.
*/

mod annotations;
mod lexicon;
mod vectors;

use std::collections::HashMap;
use std::fmt::Display;
use std::sync::{Mutex, PoisonError};

use tracing::trace;

use crate::error_handling::*;

pub use annotations::{load_word_pairs, parse_word_pairs, AnnotatedPair};
pub use lexicon::Lexicon;
pub use vectors::VectorStore;

/// Lemma to sense identifiers, best first. Failures are an empty list.
pub trait SenseLookup {
    fn lookup(&self, lemma: &str, language: &str) -> Vec<String>;
}

pub trait VectorSource {
    fn fetch(&self, sense_id: &str) -> Option<SenseVector>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct RankedTerm {
    pub lemma: String,
    pub weight: f64,
}

impl RankedTerm {
    pub fn new(lemma: &str, weight: f64) -> Self {
        RankedTerm {
            lemma: lemma.to_string(),
            weight
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SenseData {
    Dense(Vec<f64>),
    // Sorted by descending weight
    Ranked(Vec<RankedTerm>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SenseVector {
    pub id: String,
    pub data: SenseData,
}

impl SenseVector {
    pub fn dense(id: &str, values: Vec<f64>) -> Self {
        SenseVector {
            id: id.to_string(),
            data: SenseData::Dense(values)
        }
    }

    // Orders the terms by weight, heaviest first; equal weights keep their order
    pub fn ranked(id: &str, mut terms: Vec<RankedTerm>) -> Self {
        terms.sort_by(|a, b| b.weight.total_cmp(&a.weight));
        SenseVector {
            id: id.to_string(),
            data: SenseData::Ranked(terms)
        }
    }

    pub fn as_dense(&self) -> Option<&[f64]> {
        match &self.data {
            SenseData::Dense(values) => Some(values),
            SenseData::Ranked(_) => None,
        }
    }

    pub fn as_ranked(&self) -> Option<&[RankedTerm]> {
        match &self.data {
            SenseData::Ranked(terms) => Some(terms),
            SenseData::Dense(_) => None,
        }
    }
}

/// Memoizes another lookup in memory.
pub struct CachedLookup<L> {
    inner: L,
    cache: Mutex<HashMap<(String, String), Vec<String>>>,
}

impl<L: SenseLookup> CachedLookup<L> {
    pub fn new(inner: L) -> Self {
        CachedLookup {
            inner,
            cache: Mutex::new(HashMap::new())
        }
    }

    pub fn cached(&self) -> usize {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}

impl<L: SenseLookup> SenseLookup for CachedLookup<L> {
    fn lookup(&self, lemma: &str, language: &str) -> Vec<String> {
        let key = (lemma.to_string(), language.to_string());

        if let Some(hit) = self.cache.lock().unwrap_or_else(PoisonError::into_inner).get(&key) {
            trace!(lemma, language, "sense lookup cache hit");
            return hit.clone();
        }

        // The lock is not held across the inner call, which may be slow
        let senses = self.inner.lookup(lemma, language);
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, senses.clone());
        senses
    }
}

#[derive(Debug)]
pub enum ResourceErrorType {
    MissingField(&'static str),
    BadNumber(String),
    // A ranked entry without the `lemma_weight` shape
    MalformedTerm(String),
    EmptyVector,
    // A document without a title line
    MissingTitle,
    FileError(std::io::Error),
}

impl ErrorType for ResourceErrorType {}

impl PartialEq for ResourceErrorType {
    fn eq(&self, other: &Self) -> bool {
        use ResourceErrorType::*;
        match (self, other) {
            (MissingField(a), MissingField(b)) => a == b,
            (BadNumber(a), BadNumber(b)) => a == b,
            (MalformedTerm(a), MalformedTerm(b)) => a == b,
            (FileError(a), FileError(b)) => a.kind() == b.kind(),
            _ => std::mem::discriminant(self) == std::mem::discriminant(other)
        }
    }
}

impl Display for ResourceErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResourceErrorType::MissingField(field) => write!(f, "Missing `{}` column", field),
            ResourceErrorType::BadNumber(text) => write!(f, "`{}` is not a number", text),
            ResourceErrorType::MalformedTerm(text) => write!(f, "`{}` is not a lemma_weight pair", text),
            ResourceErrorType::EmptyVector => write!(f, "Vector has no components"),
            ResourceErrorType::MissingTitle => write!(f, "Document needs a link line and a title line"),
            ResourceErrorType::FileError(e) => write!(f, "File error: {}", e),
        }
    }
}

pub type ResourceError = Error<ResourceErrorType>;
pub type ResourceErrors = Errors<ResourceErrorType>;
pub type FileResult<T> = std::result::Result<T, ResourceErrors>;

pub(crate) fn read_file(path: &std::path::Path) -> FileResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| vec![ResourceError::new(Location::file(path), ResourceErrorType::FileError(e))])
}

pub(crate) fn is_data_line(line: &str) -> bool {
    !line.trim().is_empty() && !line.starts_with('#')
}

pub(crate) fn parse_number(text: &str) -> std::result::Result<f64, ResourceErrorType> {
    text.trim()
        .parse::<f64>()
        .map_err(|_| ResourceErrorType::BadNumber(text.trim().to_string()))
}
