/*
    Similarity between sense vectors: cosine for dense vectors, weighted
    overlap for ranked term lists, and sense pair selection on top of cosine
*/

use std::collections::HashMap;
use std::fmt::Display;

use itertools::Itertools;
use tracing::{debug, warn};

use crate::resources::{RankedTerm, SenseLookup, VectorSource};

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum VectorError {
    DimensionMismatch { left: usize, right: usize },
}

impl Display for VectorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VectorError::DimensionMismatch { left, right } => write!(f, "Cannot compare vectors of length {} and {}", left, right),
        }
    }
}

fn norm(v: &[f64]) -> f64 {
    v.iter().map(|x| x * x).sum::<f64>().sqrt()
}

// A zero vector is similar to nothing
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> Result<f64, VectorError> {
    if a.len() != b.len() {
        return Err(VectorError::DimensionMismatch { left: a.len(), right: b.len() });
    }

    let dot: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norms = norm(a) * norm(b);
    if norms == 0.0 {
        return Ok(0.0);
    }
    Ok(dot / norms)
}

/// Rank based overlap of two term lists ordered by descending weight.
///
/// For the `K` shared terms: `sum 1/(r1 + r2)` over `sum_{i=1..|K|} 1/(2i)`,
/// ranks being 1-based positions of a term's first occurrence. Identical
/// lists score 1.0, disjoint ones 0.0.
pub fn weighted_overlap(first: &[RankedTerm], second: &[RankedTerm]) -> f64 {
    let ranks = |terms: &[RankedTerm]| -> HashMap<String, usize> {
        let mut ranks = HashMap::new();
        for (position, term) in terms.iter().enumerate() {
            ranks.entry(term.lemma.clone()).or_insert(position + 1);
        }
        ranks
    };
    let ranks1 = ranks(first);
    let ranks2 = ranks(second);

    let shared = ranks1
        .iter()
        .filter_map(|(lemma, r1)| ranks2.get(lemma).map(|r2| r1 + r2))
        .collect_vec();

    if shared.is_empty() {
        return 0.0;
    }

    let numerator: f64 = shared.iter().map(|r| 1.0 / *r as f64).sum();
    let denominator: f64 = (1..=shared.len()).map(|i| 1.0 / (2 * i) as f64).sum();
    numerator / denominator
}

#[derive(Debug, Clone, PartialEq)]
pub struct SenseMatch {
    pub first: String,
    pub second: String,
    pub score: f64,
}

// Sense ids of a word that come with a dense vector, in lookup order
fn dense_senses(word: &str, language: &str, lookup: &impl SenseLookup, vectors: &impl VectorSource) -> Vec<(String, Vec<f64>)> {
    lookup
        .lookup(word, language)
        .into_iter()
        .filter_map(|id| {
            let vector = vectors.fetch(&id)?;
            let values = vector.as_dense()?.to_vec();
            Some((id, values))
        })
        .collect()
}

/// The pair of senses whose vectors have the highest cosine similarity.
///
/// `None` when either word has no sense with a dense vector. Ties go to the
/// earliest pair in lookup order; pairs of mismatched length are skipped.
pub fn best_sense_pair(
    first: &str,
    second: &str,
    language: &str,
    lookup: &impl SenseLookup,
    vectors: &impl VectorSource,
) -> Option<SenseMatch> {
    let senses1 = dense_senses(first, language, lookup, vectors);
    let senses2 = dense_senses(second, language, lookup, vectors);
    debug!(first, second, candidates1 = senses1.len(), candidates2 = senses2.len(), "disambiguating");

    let mut best: Option<SenseMatch> = None;
    for ((id1, v1), (id2, v2)) in senses1.iter().cartesian_product(senses2.iter()) {
        let score = match cosine_similarity(v1, v2) {
            Ok(score) => score,
            Err(error) => {
                warn!(%id1, %id2, "skipping sense pair: {}", error);
                continue;
            }
        };

        if best.as_ref().map_or(true, |b| score > b.score) {
            best = Some(SenseMatch {
                first: id1.clone(),
                second: id2.clone(),
                score
            });
        }
    }
    best
}
