/*
    Word similarity from the hypernym hierarchy

    Every measure takes the best score over all pairs of candidate senses of
    the two words. A word without senses gives no score at all (`None`),
    which callers keep apart from a genuine 0.0.
*/

mod evaluation;
mod vector;

use std::fmt::Display;

use itertools::Itertools;
use tracing::trace;

use crate::hierarchy::{HierarchyGraph, SenseIndex};

pub use evaluation::{annotator_agreement, evaluate, evaluate_vectors, Agreement, AgreementError, MeasureReport, VectorReport};
pub use vector::{best_sense_pair, cosine_similarity, weighted_overlap, SenseMatch, VectorError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scale {
    Normalized,
    Raw,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Measure {
    WuPalmer,
    LeacockChodorow,
    ShortestPath,
}

impl Measure {
    pub const ALL: [Measure; 3] = [Measure::WuPalmer, Measure::LeacockChodorow, Measure::ShortestPath];
}

impl Display for Measure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Measure::WuPalmer => write!(f, "WP"),
            Measure::LeacockChodorow => write!(f, "LC"),
            Measure::ShortestPath => write!(f, "SP"),
        }
    }
}

/// `2 * depth(lcs) / (depth(a) + depth(b))`, maximised over every lowest
/// common hypernym; 0.0 when the senses share no ancestor.
pub fn wu_palmer_senses(graph: &HierarchyGraph, a: SenseIndex, b: SenseIndex) -> f64 {
    let depths = (graph.max_depth(a) + graph.max_depth(b)) as f64;

    graph
        .lowest_common_hypernyms(a, b)
        .into_iter()
        .map(|lcs| {
            if depths == 0.0 {
                // Two roots only share an ancestor when they are the same node
                1.0
            } else {
                2.0 * graph.max_depth(lcs) as f64 / depths
            }
        })
        .fold(0.0, f64::max)
}

// Identical senses count as one hop apart, which keeps the log finite
pub fn leacock_chodorow_senses(graph: &HierarchyGraph, a: SenseIndex, b: SenseIndex, max_depth: usize) -> Option<f64> {
    let distance = graph.shortest_path_distance(a, b)?.max(1) as f64;
    Some(-(distance / (2.0 * max_depth as f64)).log10())
}

pub struct TaxonomyScorer<'g> {
    graph: &'g HierarchyGraph,
    max_depth: usize,
}

impl<'g> TaxonomyScorer<'g> {
    // Uses the deepest node of the hierarchy as its depth bound
    pub fn new(graph: &'g HierarchyGraph) -> Self {
        TaxonomyScorer {
            graph,
            max_depth: graph.max_hierarchy_depth().max(1)
        }
    }

    pub fn with_max_depth(self, max_depth: usize) -> Self {
        TaxonomyScorer {
            max_depth: max_depth.max(1),
            ..self
        }
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    fn sense_pairs(&self, first: &str, second: &str) -> Option<Vec<(SenseIndex, SenseIndex)>> {
        let senses1 = self.graph.senses(first);
        let senses2 = self.graph.senses(second);

        if senses1.is_empty() || senses2.is_empty() {
            trace!(first, second, "word without senses");
            return None;
        }
        Some(senses1.iter().copied().cartesian_product(senses2.iter().copied()).collect())
    }

    pub fn wu_palmer(&self, first: &str, second: &str) -> Option<f64> {
        let pairs = self.sense_pairs(first, second)?;
        Some(pairs
            .into_iter()
            .map(|(a, b)| wu_palmer_senses(self.graph, a, b))
            .fold(0.0, f64::max))
    }

    /// `-log10(d / 2D)` over the closest reachable sense pair, optionally
    /// divided by `log10(2D + 1)`. Unreachable pairs do not count.
    pub fn leacock_chodorow(&self, first: &str, second: &str, scale: Scale) -> Option<f64> {
        let pairs = self.sense_pairs(first, second)?;
        let best = pairs
            .into_iter()
            .filter_map(|(a, b)| leacock_chodorow_senses(self.graph, a, b, self.max_depth))
            .fold(0.0, f64::max);

        Some(match scale {
            Scale::Raw => best,
            Scale::Normalized => best / (2.0 * self.max_depth as f64 + 1.0).log10(),
        })
    }

    /// `2D - d` for the closest sense pair, unreachable pairs count as `2D`.
    pub fn shortest_path(&self, first: &str, second: &str, scale: Scale) -> Option<f64> {
        let pairs = self.sense_pairs(first, second)?;
        let cap = 2 * self.max_depth;

        let closest = pairs
            .into_iter()
            .map(|(a, b)| self.graph.shortest_path_distance(a, b).unwrap_or(cap).min(cap))
            .min()
            .unwrap_or(cap);

        let similarity = (cap - closest) as f64;
        Some(match scale {
            Scale::Raw => similarity,
            Scale::Normalized => similarity / cap as f64,
        })
    }

    pub fn score(&self, measure: Measure, first: &str, second: &str, scale: Scale) -> Option<f64> {
        match measure {
            Measure::WuPalmer => self.wu_palmer(first, second),
            Measure::LeacockChodorow => self.leacock_chodorow(first, second, scale),
            Measure::ShortestPath => self.shortest_path(first, second, scale),
        }
    }
}
