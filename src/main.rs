mod cli;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use itertools::Itertools;
use tracing_subscriber::{fmt, EnvFilter};

use cli::{Cli, Command};
use lexsim::cyk::Chart;
use lexsim::error_handling::{ErrorType, Errors};
use lexsim::grammar::{Grammar, Symbol};
use lexsim::hierarchy::loader;
use lexsim::parser;
use lexsim::resources::{load_word_pairs, CachedLookup, Lexicon, VectorStore};
use lexsim::similarity::{
    annotator_agreement, best_sense_pair, evaluate, evaluate_vectors, Measure, Scale, TaxonomyScorer
};
use lexsim::summarize::{Document, Stopwords, Summarizer};
use lexsim::tree::transfer;

type CommandResult = Result<(), Vec<String>>;

fn messages<T: ErrorType>(errors: Errors<T>) -> Vec<String> {
    errors.iter().map(ToString::to_string).collect()
}

fn scale(raw: bool) -> Scale {
    if raw { Scale::Raw } else { Scale::Normalized }
}

fn load_grammar(path: &Path, start: Option<String>) -> Result<Grammar, Vec<String>> {
    let grammar = parser::parse_file(path).map_err(messages)?.grammar;
    Ok(match start {
        Some(start) => grammar.with_start(Symbol::new(&start)),
        None => grammar,
    })
}

fn parse(grammar: &Path, sentence: &str, start: Option<String>) -> CommandResult {
    let grammar = load_grammar(grammar, start)?;
    let tokens = sentence.split_whitespace().collect_vec();
    let chart = Chart::parse(&grammar, &tokens);

    let trees = chart.root_trees();
    if trees.is_empty() {
        return Err(vec![format!("No derivation of `{}` from {}", sentence, grammar.start_symbol)]);
    }

    for tree in trees {
        println!("{}", tree);
    }
    Ok(())
}

fn language_transfer(grammar: &Path, sentence: &str, moves: &[String], start: Option<String>) -> CommandResult {
    let grammar = load_grammar(grammar, start)?;
    let tokens = sentence.split_whitespace().collect_vec();
    let chart = Chart::parse(&grammar, &tokens);

    let tree = match chart.root_trees().first() {
        Some(tree) => *tree,
        None => return Err(vec![format!("No derivation of `{}` from {}", sentence, grammar.start_symbol)]),
    };

    let targets = moves.iter().map(|m| Symbol::new(m)).collect_vec();
    let moved = transfer(tree, &targets).map_err(|e| vec![e.to_string()])?;

    println!("{}", tree);
    println!("{}", moved);
    println!("{}", moved.sentence());
    Ok(())
}

fn similarity(hierarchy: &Path, first: &str, second: &str, max_depth: Option<usize>, raw: bool) -> CommandResult {
    let graph = loader::load_file(hierarchy).map_err(messages)?;
    let mut scorer = TaxonomyScorer::new(&graph);
    if let Some(depth) = max_depth {
        scorer = scorer.with_max_depth(depth);
    }

    for measure in Measure::ALL {
        match scorer.score(measure, first, second, scale(raw)) {
            Some(score) => println!("{}\t{:.4}", measure, score),
            None => println!("{}\t-", measure),
        }
    }
    Ok(())
}

fn evaluation(hierarchy: &Path, pairs: &Path, max_depth: Option<usize>, gold_scale: f64, raw: bool) -> CommandResult {
    let graph = loader::load_file(hierarchy).map_err(messages)?;
    let pairs = load_word_pairs(pairs, gold_scale).map_err(messages)?;

    let mut scorer = TaxonomyScorer::new(&graph);
    if let Some(depth) = max_depth {
        scorer = scorer.with_max_depth(depth);
    }

    for report in evaluate(&scorer, &pairs, scale(raw)) {
        println!("{}", report);
    }
    Ok(())
}

fn vector_evaluation(lexicon: &Path, vectors: &Path, pairs: &Path, gold_scale: f64, language: &str) -> CommandResult {
    let lexicon = Lexicon::load(lexicon).map_err(messages)?;
    let mut store = VectorStore::new();
    store.load_dense(vectors).map_err(messages)?;
    let pairs = load_word_pairs(pairs, gold_scale).map_err(messages)?;

    let report = evaluate_vectors(&pairs, language, &lexicon, &store);
    for (pair, found) in pairs.iter().zip(&report.matches) {
        match found {
            Some(best) => println!("{}\t{}\t{}\t{}\t{:.4}", pair.first, best.first, pair.second, best.second, best.score),
            None => println!("{}\t-\t{}\t-", pair.first, pair.second),
        }
    }
    println!("{}", report);
    Ok(())
}

fn agreement(first: &Path, second: &Path, gold_scale: f64) -> CommandResult {
    let first = load_word_pairs(first, gold_scale).map_err(messages)?;
    let second = load_word_pairs(second, gold_scale).map_err(messages)?;

    let agreement = annotator_agreement(&first, &second).map_err(|e| vec![e.to_string()])?;
    println!("{}", agreement);
    Ok(())
}

fn senses(lexicon: &Path, vectors: &Path, first: &str, second: &str, language: &str) -> CommandResult {
    let lexicon = Lexicon::load(lexicon).map_err(messages)?;
    let mut store = VectorStore::new();
    store.load_dense(vectors).map_err(messages)?;

    match best_sense_pair(first, second, language, &lexicon, &store) {
        Some(best) => {
            println!("{}\t{}\t{:.4}", best.first, best.second, best.score);
            Ok(())
        }
        None => Err(vec![format!("No sense vectors for `{}` or `{}`", first, second)]),
    }
}

fn summarize(lexicon: &Path, vectors: &Path, documents: &[PathBuf], stopwords: Option<&Path>, language: &str) -> CommandResult {
    let lookup = CachedLookup::new(Lexicon::load(lexicon).map_err(messages)?);
    let mut store = VectorStore::new();
    store.load_ranked(vectors).map_err(messages)?;

    let stopwords = match stopwords {
        Some(path) => Stopwords::load(path).map_err(messages)?,
        None => Stopwords::default(),
    };
    let summarizer = Summarizer::new(&lookup, &store, language).with_stopwords(stopwords);

    let mut errors = Vec::new();
    for path in documents {
        let document = match Document::load(path) {
            Ok(document) => document,
            Err(e) => {
                errors.extend(messages(e));
                continue;
            }
        };

        match summarizer.summarize(&document) {
            Some(best) => println!("{}\t{:.4}\t{}", document.title, best.score, document.paragraphs[best.index]),
            None => println!("{}\t-", document.title),
        }
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Command::Parse { grammar, sentence, start } => parse(&grammar, &sentence, start),
        Command::Transfer { grammar, sentence, moves, start } => language_transfer(&grammar, &sentence, &moves, start),
        Command::Similarity { hierarchy, word1, word2, max_depth, raw } => {
            similarity(&hierarchy, &word1, &word2, max_depth, raw)
        }
        Command::Evaluate { hierarchy, pairs, max_depth, gold_scale, raw } => {
            evaluation(&hierarchy, &pairs, max_depth, gold_scale, raw)
        }
        Command::EvaluateVectors { lexicon, vectors, pairs, gold_scale, language } => {
            vector_evaluation(&lexicon, &vectors, &pairs, gold_scale, &language)
        }
        Command::Agreement { first, second, gold_scale } => agreement(&first, &second, gold_scale),
        Command::Senses { lexicon, vectors, word1, word2, language } => {
            senses(&lexicon, &vectors, &word1, &word2, &language)
        }
        Command::Summarize { lexicon, vectors, documents, stopwords, language } => {
            summarize(&lexicon, &vectors, &documents, stopwords.as_deref(), &language)
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(errors) => {
            for error in errors {
                eprintln!("{}", error);
            }
            ExitCode::FAILURE
        }
    }
}
