/*
    Scores annotated word pairs with every taxonomy measure, or with the best
    sense cosine, and correlates the result with the human judgements. Two
    annotators can also be correlated with each other.
*/

use std::fmt::Display;

use itertools::Itertools;
use tracing::{debug, info, warn};

use super::{best_sense_pair, Measure, Scale, SenseMatch, TaxonomyScorer};
use crate::resources::{AnnotatedPair, SenseLookup, VectorSource};
use crate::stats::{pearson, spearman};

#[derive(Debug, Clone, PartialEq)]
pub struct MeasureReport {
    pub measure: Measure,
    pub scores: Vec<f64>,
    pub pearson: Option<f64>,
    pub spearman: Option<f64>,
    // Pairs where a word had no senses, scored as 0.0
    pub missing: usize,
}

fn show(correlation: Option<f64>) -> String {
    correlation.map_or_else(|| "n/a".to_string(), |c| format!("{:.4}", c))
}

impl Display for MeasureReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: pearson {}, spearman {} ({} of {} pairs without senses)",
            self.measure,
            show(self.pearson),
            show(self.spearman),
            self.missing,
            self.scores.len()
        )
    }
}

pub fn evaluate(scorer: &TaxonomyScorer, pairs: &[AnnotatedPair], scale: Scale) -> Vec<MeasureReport> {
    let gold = gold_scores(pairs);

    Measure::ALL
        .into_iter()
        .map(|measure| {
            let predicted = pairs
                .iter()
                .map(|pair| scorer.score(measure, &pair.first, &pair.second, scale))
                .collect_vec();

            let missing = predicted.iter().filter(|score| score.is_none()).count();
            let scores = predicted.into_iter().map(|score| score.unwrap_or(0.0)).collect_vec();
            debug!(%measure, pairs = scores.len(), missing, "pairs scored");

            let report = MeasureReport {
                measure,
                pearson: pearson(&scores, &gold),
                spearman: spearman(&scores, &gold),
                scores,
                missing
            };
            info!("{}", report);
            report
        })
        .collect()
}

fn gold_scores(pairs: &[AnnotatedPair]) -> Vec<f64> {
    pairs.iter().map(|pair| pair.score).collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct VectorReport {
    pub matches: Vec<Option<SenseMatch>>,
    pub scores: Vec<f64>,
    pub pearson: Option<f64>,
    pub spearman: Option<f64>,
}

impl VectorReport {
    // Pairs where a word had no sense vector
    pub fn missing(&self) -> usize {
        self.matches.iter().filter(|m| m.is_none()).count()
    }
}

impl Display for VectorReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "cosine: pearson {}, spearman {} ({} of {} pairs without sense vectors)",
            show(self.pearson),
            show(self.spearman),
            self.missing(),
            self.scores.len()
        )
    }
}

/// Best sense cosine for every pair. A pair without sense vectors scores the
/// mean of the other pairs, or 0.0 when no pair could be scored.
pub fn evaluate_vectors(
    pairs: &[AnnotatedPair],
    language: &str,
    lookup: &impl SenseLookup,
    vectors: &impl VectorSource,
) -> VectorReport {
    let matches = pairs
        .iter()
        .map(|pair| best_sense_pair(&pair.first, &pair.second, language, lookup, vectors))
        .collect_vec();

    let found = matches.iter().flatten().map(|m| m.score).collect_vec();
    let fallback = if found.is_empty() { 0.0 } else { found.iter().sum::<f64>() / found.len() as f64 };
    let scores = matches.iter().map(|m| m.as_ref().map_or(fallback, |m| m.score)).collect_vec();

    let gold = gold_scores(pairs);
    let report = VectorReport {
        pearson: pearson(&scores, &gold),
        spearman: spearman(&scores, &gold),
        matches,
        scores
    };
    info!("{}", report);
    report
}

#[derive(Debug, Clone, PartialEq)]
pub enum AgreementError {
    LengthMismatch { first: usize, second: usize },
    PairMismatch { index: usize, first: (String, String), second: (String, String) },
}

impl Display for AgreementError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AgreementError::LengthMismatch { first, second } => {
                write!(f, "Annotations cover {} and {} pairs", first, second)
            }
            AgreementError::PairMismatch { index, first, second } => write!(
                f,
                "Pair {} is `{} {}` in one annotation and `{} {}` in the other",
                index + 1, first.0, first.1, second.0, second.1
            ),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Agreement {
    pub pairs: usize,
    pub pearson: Option<f64>,
    pub spearman: Option<f64>,
}

impl Display for Agreement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "agreement over {} pairs: pearson {}, spearman {}",
            self.pairs,
            show(self.pearson),
            show(self.spearman)
        )
    }
}

/// Correlation between two annotations of the same pairs, in the same order.
pub fn annotator_agreement(first: &[AnnotatedPair], second: &[AnnotatedPair]) -> Result<Agreement, AgreementError> {
    if first.len() != second.len() {
        return Err(AgreementError::LengthMismatch { first: first.len(), second: second.len() });
    }

    for (index, (a, b)) in first.iter().zip(second).enumerate() {
        if a.first != b.first || a.second != b.second {
            warn!(index, "annotations disagree on the pair");
            return Err(AgreementError::PairMismatch {
                index,
                first: (a.first.clone(), a.second.clone()),
                second: (b.first.clone(), b.second.clone())
            });
        }
    }

    let (x, y) = (gold_scores(first), gold_scores(second));
    let agreement = Agreement {
        pairs: first.len(),
        pearson: pearson(&x, &y),
        spearman: spearman(&x, &y)
    };
    info!("{}", agreement);
    Ok(agreement)
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;
    use crate::hierarchy::tests::example;
    use crate::resources::{load_word_pairs, parse_word_pairs, Lexicon, SenseVector, VectorStore};

    #[test]
    fn evaluate_example_pairs() {
        let graph = example();
        let scorer = TaxonomyScorer::new(&graph);
        let pairs = parse_word_pairs(
            "word1,word2,score\ndog,cat,7\ndog,car,1\ncar,automobile,9.5\ndog,unicorn,4\n",
            Path::new("pairs.csv"),
            10.0
        ).unwrap();

        let reports = evaluate(&scorer, &pairs, Scale::Normalized);
        assert_eq!(reports.iter().map(|r| r.measure).collect_vec(), Measure::ALL.to_vec());

        for report in &reports {
            assert_eq!(report.scores.len(), 4);
            assert_eq!(report.missing, 1);
            assert_eq!(report.scores[3], 0.0);
            assert!(report.pearson.unwrap() > 0.0, "{}", report);
        }

        let wp = &reports[0];
        assert_eq!(wp.scores[..3], [0.75, 0.0, 1.0]);
    }

    #[test]
    fn too_few_pairs() {
        let graph = example();
        let scorer = TaxonomyScorer::new(&graph);
        let pairs = vec![AnnotatedPair { first: "dog".to_string(), second: "cat".to_string(), score: 0.7 }];

        let reports = evaluate(&scorer, &pairs, Scale::Raw);
        assert!(reports.iter().all(|r| r.pearson.is_none() && r.spearman.is_none()));
        assert!(reports[0].to_string().contains("n/a"));
    }

    fn vector_resources() -> (Lexicon, VectorStore) {
        let lexicon = Lexicon::parse_str(
            "car\tEN\tbn:car\nautomobile\tEN\tbn:car\nbank\tEN\tbn:bank_money,bn:bank_river\n\
             money\tEN\tbn:money\nriver\tEN\tbn:river\nbread\tEN\tbn:bread\n",
            Path::new("lex.tsv")
        ).unwrap();

        let mut store = VectorStore::new();
        store.insert(SenseVector::dense("bn:car", vec![1.0, 0.0, 0.0]));
        store.insert(SenseVector::dense("bn:bank_money", vec![0.0, 1.0, 0.1]));
        store.insert(SenseVector::dense("bn:bank_river", vec![0.0, 0.1, 1.0]));
        store.insert(SenseVector::dense("bn:money", vec![0.0, 1.0, 0.0]));
        store.insert(SenseVector::dense("bn:river", vec![0.0, 0.0, 1.0]));
        (lexicon, store)
    }

    #[test]
    fn evaluate_sense_vectors() {
        let (lexicon, store) = vector_resources();
        let pairs = parse_word_pairs(
            "car,automobile,9\nbank,money,8\nbank,river,7\ncar,river,1\ncar,bread,5\n",
            Path::new("pairs.csv"),
            10.0
        ).unwrap();

        let report = evaluate_vectors(&pairs, "EN", &lexicon, &store);
        assert_eq!(report.scores.len(), 5);
        assert_eq!(report.missing(), 1);
        assert_eq!(report.matches[4], None);

        let chosen = report.matches.iter().flatten().map(|m| m.first.as_str()).collect_vec();
        assert_eq!(chosen, vec!["bn:car", "bn:bank_money", "bn:bank_river", "bn:car"]);

        // The missing pair takes the mean of the other four
        let mean = report.scores[..4].iter().sum::<f64>() / 4.0;
        assert!((report.scores[4] - mean).abs() < 1e-9);
        assert!(report.pearson.unwrap() > 0.9, "{}", report);
        assert!(report.to_string().contains("1 of 5 pairs"));
    }

    #[test]
    fn no_sense_vectors_at_all() {
        let (lexicon, store) = vector_resources();
        let pairs = parse_word_pairs("bread,toast,5\nghost,car,2\n", Path::new("pairs.csv"), 10.0).unwrap();

        let report = evaluate_vectors(&pairs, "EN", &lexicon, &store);
        assert_eq!(report.scores, vec![0.0, 0.0]);
        assert_eq!(report.missing(), 2);
        assert_eq!(report.pearson, None);
    }

    #[test]
    fn agreement_between_annotators() {
        let path = Path::new("a.txt");
        let first = parse_word_pairs("a,b,1\nc,d,2\ne,f,3\n", path, 4.0).unwrap();
        let second = parse_word_pairs("a,b,1\nc,d,3\ne,f,2\n", path, 4.0).unwrap();

        let agreement = annotator_agreement(&first, &second).unwrap();
        assert_eq!(agreement.pairs, 3);
        assert!((agreement.pearson.unwrap() - 0.5).abs() < 1e-9);
        assert!((agreement.spearman.unwrap() - 0.5).abs() < 1e-9);

        let perfect = annotator_agreement(&first, &first).unwrap();
        assert!((perfect.pearson.unwrap() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn agreement_needs_the_same_pairs() {
        let path = Path::new("a.txt");
        let first = parse_word_pairs("a,b,1\nc,d,2\n", path, 4.0).unwrap();
        let shorter = parse_word_pairs("a,b,1\n", path, 4.0).unwrap();
        let swapped = parse_word_pairs("a,b,1\nd,c,2\n", path, 4.0).unwrap();

        assert_eq!(
            annotator_agreement(&first, &shorter),
            Err(AgreementError::LengthMismatch { first: 2, second: 1 })
        );
        assert_eq!(
            annotator_agreement(&first, &swapped),
            Err(AgreementError::PairMismatch {
                index: 1,
                first: ("c".to_string(), "d".to_string()),
                second: ("d".to_string(), "c".to_string())
            })
        );
    }

    #[test]
    fn example_annotations() {
        let first = load_word_pairs(Path::new("example_data/annotator_a.tsv"), 4.0).unwrap();
        let second = load_word_pairs(Path::new("example_data/annotator_b.tsv"), 4.0).unwrap();
        let agreement = annotator_agreement(&first, &second).unwrap();
        assert!(agreement.pearson.unwrap() > 0.8, "{}", agreement);

        let lexicon = Lexicon::load(Path::new("example_data/lexicon.tsv")).unwrap();
        let mut store = VectorStore::new();
        store.load_dense(Path::new("example_data/dense.tsv")).unwrap();

        let report = evaluate_vectors(&first, "EN", &lexicon, &store);
        assert_eq!(report.scores.len(), 6);
        assert_eq!(report.missing(), 1);
        assert!(report.pearson.unwrap() > 0.0, "{}", report);
    }
}
