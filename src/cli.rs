use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(version, about)]
pub struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Parse a sentence with a CNF grammar and print every derivation
    Parse {
        /// File containing the grammar
        grammar: PathBuf,

        /// Space separated tokens
        sentence: String,

        /// Start symbol (default: first in the file)
        #[arg(short, long, value_name = "SYMBOL")]
        start: Option<String>,
    },

    /// Parse a sentence and move constituents to the front of the tree
    Transfer {
        /// File containing the grammar
        grammar: PathBuf,

        /// Space separated tokens
        sentence: String,

        /// Symbol to move, applied in the given order
        #[arg(short = 'm', long = "move", value_name = "SYMBOL")]
        moves: Vec<String>,

        /// Start symbol (default: first in the file)
        #[arg(short, long, value_name = "SYMBOL")]
        start: Option<String>,
    },

    /// Taxonomy similarity of two words
    Similarity {
        /// Hierarchy file
        hierarchy: PathBuf,

        word1: String,

        word2: String,

        /// Depth bound for LC and SP (default: deepest sense in the hierarchy)
        #[arg(short = 'd', long, value_name = "DEPTH")]
        max_depth: Option<usize>,

        /// Print unnormalized LC and SP scores
        #[arg(long)]
        raw: bool,
    },

    /// Correlate the taxonomy measures with annotated word pairs
    Evaluate {
        /// Hierarchy file
        hierarchy: PathBuf,

        /// Word pairs with gold scores, `word1,word2,score`
        pairs: PathBuf,

        /// Depth bound for LC and SP (default: deepest sense in the hierarchy)
        #[arg(short = 'd', long, value_name = "DEPTH")]
        max_depth: Option<usize>,

        /// Scale gold scores are divided by
        #[arg(long, default_value_t = 10.0)]
        gold_scale: f64,

        /// Score with unnormalized LC and SP
        #[arg(long)]
        raw: bool,
    },

    /// Correlate the best sense cosine with annotated word pairs
    EvaluateVectors {
        /// Lemma to sense id file
        lexicon: PathBuf,

        /// Dense sense vectors
        vectors: PathBuf,

        /// Word pairs with gold scores, `word1,word2,score`
        pairs: PathBuf,

        /// Scale gold scores are divided by
        #[arg(long, default_value_t = 10.0)]
        gold_scale: f64,

        #[arg(short, long, default_value = "EN")]
        language: String,
    },

    /// Correlate two annotations of the same word pairs
    Agreement {
        first: PathBuf,

        second: PathBuf,

        /// Scale scores are divided by
        #[arg(long, default_value_t = 4.0)]
        gold_scale: f64,
    },

    /// Pick the closest pair of senses of two words by vector similarity
    Senses {
        /// Lemma to sense id file
        lexicon: PathBuf,

        /// Dense sense vectors
        vectors: PathBuf,

        word1: String,

        word2: String,

        #[arg(short, long, default_value = "EN")]
        language: String,
    },

    /// Pick the paragraph of each document that best matches its title
    Summarize {
        /// Lemma to sense id file
        lexicon: PathBuf,

        /// Ranked sense vectors
        vectors: PathBuf,

        /// Documents to summarize
        #[arg(required = true)]
        documents: Vec<PathBuf>,

        /// File of words to ignore
        #[arg(long, value_name = "FILE")]
        stopwords: Option<PathBuf>,

        #[arg(short, long, default_value = "EN")]
        language: String,
    },
}
