/*
    Extractive summarization: picks the paragraph whose words overlap most
    with the senses of the title words

    Every title word has a context, the ranked vectors of all its senses. A
    paragraph word contributes, per context, the best square rooted weighted
    overlap between one of its own vectors and one of the context's.
*/

use std::collections::HashSet;
use std::path::Path;

use tracing::{debug, info};

use crate::error_handling::Location;
use crate::resources::{read_file, FileResult, RankedTerm, ResourceError, ResourceErrorType, SenseLookup, VectorSource};
use crate::similarity::weighted_overlap;

#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub link: String,
    pub title: String,
    pub paragraphs: Vec<String>,
}

impl Document {
    /// First non-blank line is the link, the second the title, every other
    /// non-blank line one paragraph.
    pub fn parse(text: &str, path: &Path) -> FileResult<Self> {
        let mut lines = text.lines().map(str::trim).filter(|line| !line.is_empty());

        let (link, title) = match (lines.next(), lines.next()) {
            (Some(link), Some(title)) => (link.to_string(), title.to_string()),
            _ => return Err(vec![ResourceError::new(Location::file(path), ResourceErrorType::MissingTitle)]),
        };

        Ok(Document {
            link,
            title,
            paragraphs: lines.map(str::to_string).collect()
        })
    }

    pub fn load(path: &Path) -> FileResult<Self> {
        let document = Self::parse(&read_file(path)?, path)?;
        debug!(file = %path.display(), paragraphs = document.paragraphs.len(), "document loaded");
        Ok(document)
    }
}

/// Lowercased words, split on whitespace and `.,;`, with everything but
/// letters and digits dropped.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| c.is_whitespace() || matches!(c, '.' | ',' | ';'))
        .map(|word| word.chars().filter(|c| c.is_alphanumeric()).collect::<String>().to_lowercase())
        .filter(|word| !word.is_empty())
        .collect()
}

#[derive(Debug, Default, Clone)]
pub struct Stopwords {
    words: HashSet<String>,
}

impl Stopwords {
    // One or more words per line
    pub fn parse(text: &str) -> Self {
        Stopwords {
            words: text.lines().flat_map(tokenize).collect()
        }
    }

    pub fn load(path: &Path) -> FileResult<Self> {
        let stopwords = Self::parse(&read_file(path)?);
        info!(file = %path.display(), words = stopwords.len(), "stopwords loaded");
        Ok(stopwords)
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParagraphScore {
    pub index: usize,
    pub score: f64,
}

// Ranked vectors of every sense of one word
type Context = Vec<Vec<RankedTerm>>;

pub struct Summarizer<'a, L, V> {
    lookup: &'a L,
    vectors: &'a V,
    language: String,
    stopwords: Stopwords,
}

impl<'a, L: SenseLookup, V: VectorSource> Summarizer<'a, L, V> {
    pub fn new(lookup: &'a L, vectors: &'a V, language: &str) -> Self {
        Summarizer {
            lookup,
            vectors,
            language: language.to_string(),
            stopwords: Stopwords::default()
        }
    }

    pub fn with_stopwords(self, stopwords: Stopwords) -> Self {
        Summarizer { stopwords, ..self }
    }

    pub fn context(&self, word: &str) -> Context {
        self.lookup
            .lookup(word, &self.language)
            .iter()
            .filter_map(|id| self.vectors.fetch(id))
            .filter_map(|vector| vector.as_ranked().map(<[RankedTerm]>::to_vec))
            .collect()
    }

    fn content_words(&self, text: &str) -> Vec<String> {
        tokenize(text)
            .into_iter()
            .filter(|word| !self.stopwords.contains(word))
            .collect()
    }

    fn title_contexts(&self, title: &str) -> Vec<Context> {
        self.content_words(title).iter().map(|word| self.context(word)).collect()
    }

    fn overlap(word: &Context, context: &Context) -> f64 {
        word.iter()
            .flat_map(|w| context.iter().map(move |c| weighted_overlap(w, c).sqrt()))
            .fold(0.0, f64::max)
    }

    pub fn paragraph_score(&self, title_contexts: &[Context], paragraph: &str) -> f64 {
        let word_contexts: Vec<Context> = self.content_words(paragraph).iter().map(|word| self.context(word)).collect();

        title_contexts
            .iter()
            .map(|context| word_contexts.iter().map(|word| Self::overlap(word, context)).sum::<f64>())
            .sum()
    }

    /// The best scoring paragraph, the first one on ties. `None` for a
    /// document without paragraphs.
    pub fn summarize(&self, document: &Document) -> Option<ParagraphScore> {
        let contexts = self.title_contexts(&document.title);
        debug!(title = %document.title, contexts = contexts.len(), "title contexts built");

        let mut best: Option<ParagraphScore> = None;
        for (index, paragraph) in document.paragraphs.iter().enumerate() {
            let score = self.paragraph_score(&contexts, paragraph);
            debug!(index, score, "paragraph scored");

            if best.map_or(true, |b| score > b.score) {
                best = Some(ParagraphScore { index, score });
            }
        }

        if let Some(best) = best {
            info!(link = %document.link, paragraph = best.index, score = best.score, "summary picked");
        }
        best
    }
}
