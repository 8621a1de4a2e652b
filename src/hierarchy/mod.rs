/*
    The lexical hierarchy: sense nodes in a flat arena, hypernym edges and
    the wider "border" relation stored as index lists

    The graph is read-only once built. Depths are computed while building,
    which is also where hypernym cycles are rejected, so every query below is
    a pure read and the graph can be shared across threads.
*/

pub mod loader;

use std::collections::{BTreeSet, HashMap};
use std::fmt::Display;

use tracing::debug;

use crate::error_handling::ErrorType;
use crate::resources::SenseLookup;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SenseIndex(usize);

impl SenseIndex {
    pub fn get(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PartOfSpeech {
    Noun,
    Verb,
    Adjective,
    Adverb,
}

impl PartOfSpeech {
    // WordNet style tags; satellite adjectives count as adjectives
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "n" => Some(PartOfSpeech::Noun),
            "v" => Some(PartOfSpeech::Verb),
            "a" | "s" => Some(PartOfSpeech::Adjective),
            "r" => Some(PartOfSpeech::Adverb),
            _ => None,
        }
    }

    pub fn tag(self) -> char {
        match self {
            PartOfSpeech::Noun => 'n',
            PartOfSpeech::Verb => 'v',
            PartOfSpeech::Adjective => 'a',
            PartOfSpeech::Adverb => 'r',
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SenseNode {
    pub id: String,
    pub pos: PartOfSpeech,
    pub lemmas: Vec<String>,
    hypernyms: Vec<SenseIndex>,
    border: Vec<SenseIndex>,
}

impl SenseNode {
    pub fn hypernyms(&self) -> &[SenseIndex] {
        &self.hypernyms
    }

    // Every node one pointer away, in either direction
    pub fn border(&self) -> &[SenseIndex] {
        &self.border
    }

    pub fn is_root(&self) -> bool {
        self.hypernyms.is_empty()
    }
}

#[derive(Debug)]
pub enum HierarchyErrorType {
    // A required column is missing from a line
    MissingField(&'static str),
    UnknownPartOfSpeech(String),
    DuplicateSense(String),
    // An edge points at an identifier that was never declared
    UnknownSense(String),
    // Following hypernyms from this sense leads back to it
    HypernymCycle(String),
    FileError(std::io::Error),
}

impl ErrorType for HierarchyErrorType {}

impl PartialEq for HierarchyErrorType {
    fn eq(&self, other: &Self) -> bool {
        use HierarchyErrorType::*;
        match (self, other) {
            (MissingField(a), MissingField(b)) => a == b,
            (UnknownPartOfSpeech(a), UnknownPartOfSpeech(b)) => a == b,
            (DuplicateSense(a), DuplicateSense(b)) => a == b,
            (UnknownSense(a), UnknownSense(b)) => a == b,
            (HypernymCycle(a), HypernymCycle(b)) => a == b,
            (FileError(a), FileError(b)) => a.kind() == b.kind(),
            _ => false
        }
    }
}

impl Display for HierarchyErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HierarchyErrorType::MissingField(field) => write!(f, "Missing `{}` column", field),
            HierarchyErrorType::UnknownPartOfSpeech(tag) => write!(f, "Unknown part of speech `{}`", tag),
            HierarchyErrorType::DuplicateSense(id) => write!(f, "Sense `{}` is declared twice", id),
            HierarchyErrorType::UnknownSense(id) => write!(f, "No sense named `{}`", id),
            HierarchyErrorType::HypernymCycle(id) => write!(f, "Hypernyms of `{}` form a cycle", id),
            HierarchyErrorType::FileError(e) => write!(f, "File error: {}", e),
        }
    }
}

pub type Result<T> = std::result::Result<T, HierarchyErrorType>;

// Lemma keys are case-insensitive and use `_` for spaces
pub fn normalize_lemma(word: &str) -> String {
    word.trim().to_lowercase().replace(' ', "_")
}

#[derive(Debug, Default)]
pub struct HierarchyBuilder {
    nodes: Vec<SenseNode>,
    by_id: HashMap<String, SenseIndex>,
}

impl HierarchyBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_sense(&mut self, id: &str, pos: PartOfSpeech, lemmas: &[&str]) -> Result<SenseIndex> {
        if self.by_id.contains_key(id) {
            return Err(HierarchyErrorType::DuplicateSense(id.to_string()));
        }

        let index = SenseIndex(self.nodes.len());
        self.nodes.push(SenseNode {
            id: id.to_string(),
            pos,
            lemmas: lemmas.iter().map(|l| normalize_lemma(l)).collect(),
            hypernyms: Vec::new(),
            border: Vec::new(),
        });
        self.by_id.insert(id.to_string(), index);
        Ok(index)
    }

    fn resolve(&self, id: &str) -> Result<SenseIndex> {
        self.by_id
            .get(id)
            .copied()
            .ok_or_else(|| HierarchyErrorType::UnknownSense(id.to_string()))
    }

    fn link(&mut self, a: SenseIndex, b: SenseIndex) {
        if !self.nodes[a.0].border.contains(&b) {
            self.nodes[a.0].border.push(b);
        }
        if !self.nodes[b.0].border.contains(&a) {
            self.nodes[b.0].border.push(a);
        }
    }

    // The hypernym edge also enters the border in both directions, which is
    // what makes shortest paths symmetric
    pub fn add_hypernym(&mut self, child: &str, parent: &str) -> Result<()> {
        let child = self.resolve(child)?;
        let parent = self.resolve(parent)?;

        if !self.nodes[child.0].hypernyms.contains(&parent) {
            self.nodes[child.0].hypernyms.push(parent);
        }
        self.link(child, parent);
        Ok(())
    }

    // Any other pointer type (meronym, similar-to, ...): border only
    pub fn add_pointer(&mut self, from: &str, to: &str) -> Result<()> {
        let from = self.resolve(from)?;
        let to = self.resolve(to)?;
        self.link(from, to);
        Ok(())
    }

    pub fn build(self) -> Result<HierarchyGraph> {
        let depths = compute_depths(&self.nodes)
            .map_err(|index| HierarchyErrorType::HypernymCycle(self.nodes[index.0].id.clone()))?;

        let mut by_lemma: HashMap<String, Vec<SenseIndex>> = HashMap::new();
        for (index, node) in self.nodes.iter().enumerate() {
            for lemma in &node.lemmas {
                by_lemma.entry(lemma.clone()).or_default().push(SenseIndex(index));
            }
        }

        let max_hierarchy_depth = depths.iter().copied().max().unwrap_or(0);
        debug!(senses = self.nodes.len(), lemmas = by_lemma.len(), max_hierarchy_depth, "hierarchy built");

        Ok(HierarchyGraph {
            nodes: self.nodes,
            by_id: self.by_id,
            by_lemma,
            depths,
            max_hierarchy_depth,
        })
    }
}

#[derive(Clone, Copy)]
enum Mark {
    New,
    Open,
    Done(usize),
}

// Longest hypernym chain to a root for every node, memoized so each node is
// settled once. Iterative so deep chains cannot blow the stack. Returns the
// node where a cycle was detected.
fn compute_depths(nodes: &[SenseNode]) -> std::result::Result<Vec<usize>, SenseIndex> {
    let mut marks = vec![Mark::New; nodes.len()];

    for start in 0..nodes.len() {
        let mut stack = vec![(start, false)];

        while let Some((node, expanded)) = stack.pop() {
            if expanded {
                let depth = nodes[node].hypernyms
                    .iter()
                    .map(|parent| match marks[parent.0] {
                        Mark::Done(depth) => depth + 1,
                        _ => 0,
                    })
                    .max()
                    .unwrap_or(0);
                marks[node] = Mark::Done(depth);
                continue;
            }

            match marks[node] {
                Mark::Done(_) => continue,
                Mark::Open => return Err(SenseIndex(node)),
                Mark::New => {
                    marks[node] = Mark::Open;
                    stack.push((node, true));
                    stack.extend(nodes[node].hypernyms.iter().map(|parent| (parent.0, false)));
                }
            }
        }
    }

    Ok(marks
        .into_iter()
        .map(|mark| match mark {
            Mark::Done(depth) => depth,
            _ => 0,
        })
        .collect())
}

#[derive(Debug, Clone)]
pub struct HierarchyGraph {
    nodes: Vec<SenseNode>,
    by_id: HashMap<String, SenseIndex>,
    by_lemma: HashMap<String, Vec<SenseIndex>>,
    depths: Vec<usize>,
    max_hierarchy_depth: usize,
}

impl HierarchyGraph {
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, index: SenseIndex) -> &SenseNode {
        &self.nodes[index.0]
    }

    pub fn find(&self, id: &str) -> Option<SenseIndex> {
        self.by_id.get(id).copied()
    }

    pub fn indices(&self) -> impl Iterator<Item = SenseIndex> {
        (0..self.nodes.len()).map(SenseIndex)
    }

    /// Candidate senses of a word, in declaration order.
    pub fn senses(&self, word: &str) -> &[SenseIndex] {
        self.by_lemma
            .get(&normalize_lemma(word))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn hypernyms_of(&self, index: SenseIndex) -> &[SenseIndex] {
        self.nodes[index.0].hypernyms()
    }

    /// 0 for roots, otherwise one more than the deepest hypernym.
    pub fn max_depth(&self, index: SenseIndex) -> usize {
        self.depths[index.0]
    }

    // Deepest node in the whole hierarchy
    pub fn max_hierarchy_depth(&self) -> usize {
        self.max_hierarchy_depth
    }

    // Every direct hypernym of the frontier, once each
    fn climb(&self, frontier: &BTreeSet<SenseIndex>) -> BTreeSet<SenseIndex> {
        frontier
            .iter()
            .flat_map(|node| self.hypernyms_of(*node))
            .copied()
            .collect()
    }

    /// The shallowest shared ancestors of `a` and `b`.
    ///
    /// Both sides climb one generation at a time in lock-step, and the result
    /// is the intersection of the two current frontiers. The search stops at
    /// the first generation with a non-empty intersection, or with an empty
    /// set once both sides run out of hypernyms. A node is its own generation
    /// 0, so `lch(a, a) == {a}`. A sense and an ancestor at a different
    /// generation never meet.
    pub fn lowest_common_hypernyms(&self, a: SenseIndex, b: SenseIndex) -> BTreeSet<SenseIndex> {
        if a == b {
            return BTreeSet::from([a]);
        }

        let mut frontier_a = BTreeSet::from([a]);
        let mut frontier_b = BTreeSet::from([b]);

        loop {
            frontier_a = self.climb(&frontier_a);
            frontier_b = self.climb(&frontier_b);

            if frontier_a.is_empty() && frontier_b.is_empty() {
                return BTreeSet::new();
            }

            let common: BTreeSet<SenseIndex> = frontier_a.intersection(&frontier_b).copied().collect();
            if !common.is_empty() {
                return common;
            }
        }
    }

    /// Hop count over the border relation, `None` when `b` is unreachable.
    pub fn shortest_path_distance(&self, a: SenseIndex, b: SenseIndex) -> Option<usize> {
        if a == b {
            return Some(0);
        }

        let mut visited = vec![false; self.nodes.len()];
        visited[a.0] = true;
        let mut frontier = vec![a];
        let mut distance = 0;

        while !frontier.is_empty() {
            distance += 1;

            let mut next = Vec::new();
            for node in &frontier {
                for neighbour in self.nodes[node.0].border() {
                    if *neighbour == b {
                        return Some(distance);
                    }
                    if !visited[neighbour.0] {
                        visited[neighbour.0] = true;
                        next.push(*neighbour);
                    }
                }
            }
            frontier = next;
        }

        None
    }
}

impl SenseLookup for HierarchyGraph {
    // The hierarchy has a single language
    fn lookup(&self, lemma: &str, _language: &str) -> Vec<String> {
        self.senses(lemma)
            .iter()
            .map(|index| self.node(*index).id.clone())
            .collect()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::path::Path;

    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use super::*;

    pub(crate) fn example() -> HierarchyGraph {
        loader::load_file(Path::new("example_data/hierarchy.tsv")).unwrap()
    }

    fn idx(graph: &HierarchyGraph, id: &str) -> SenseIndex {
        graph.find(id).unwrap()
    }

    fn ids(graph: &HierarchyGraph, set: &BTreeSet<SenseIndex>) -> Vec<String> {
        set.iter().map(|i| graph.node(*i).id.clone()).collect()
    }

    // Nodes only ever take hypernyms among earlier nodes, so the result is a DAG
    pub(crate) fn random_hierarchy(seed: u64, size: usize) -> HierarchyGraph {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut builder = HierarchyBuilder::new();

        for i in 0..size {
            let lemma = format!("w{}", rng.gen_range(0..size / 2 + 1));
            builder.add_sense(&format!("s{}", i), PartOfSpeech::Noun, &[lemma.as_str()]).unwrap();
            if i == 0 {
                continue;
            }
            for _ in 0..rng.gen_range(0..3) {
                let parent = rng.gen_range(0..i);
                builder.add_hypernym(&format!("s{}", i), &format!("s{}", parent)).unwrap();
            }
            if rng.gen_bool(0.2) {
                let other = rng.gen_range(0..i);
                builder.add_pointer(&format!("s{}", i), &format!("s{}", other)).unwrap();
            }
        }

        builder.build().unwrap()
    }

    #[test]
    fn depths() {
        let graph = example();
        let cases = vec![
            ("entity.n.01", 0),
            ("organism.n.01", 1),
            ("animal.n.01", 2),
            ("domestic_animal.n.01", 3),
            ("dog.n.01", 4),
            ("car.n.01", 3),
            ("follow.v.01", 0),
            ("dog.v.01", 1),
        ];

        for (id, depth) in cases {
            assert_eq!(graph.max_depth(idx(&graph, id)), depth, "{}", id);
        }
        assert_eq!(graph.max_hierarchy_depth(), 4);
    }

    #[test]
    fn senses_by_lemma() {
        let graph = example();
        let dog: Vec<&str> = graph.senses("Dog").iter().map(|i| graph.node(*i).id.as_str()).collect();
        assert_eq!(dog, vec!["dog.n.01", "dog.v.01"]);
        assert_eq!(graph.senses("domestic animal"), &[idx(&graph, "domestic_animal.n.01")]);
        assert!(graph.senses("unicorn").is_empty());
        assert_eq!(graph.lookup("auto", "EN"), vec!["car.n.01".to_string()]);
    }

    #[test]
    fn lowest_common_hypernyms() {
        let graph = example();
        let cases = vec![
            ("dog.n.01", "cat.n.01", vec!["domestic_animal.n.01"]),
            ("dog.n.01", "wolf.n.01", vec!["canine.n.02"]),
            ("dog.n.01", "animal.n.01", vec![]),
            ("animal.n.01", "dog.n.01", vec![]),
            ("canine.n.02", "feline.n.01", vec!["animal.n.01"]),
            ("dog.n.01", "car.n.01", vec![]),
            ("wolf.n.01", "wheel.n.01", vec![]),
            ("animal.n.01", "vehicle.n.01", vec!["entity.n.01"]),
            ("organism.n.01", "artifact.n.01", vec!["entity.n.01"]),
            ("dog.n.01", "dog.n.01", vec!["dog.n.01"]),
            ("dog.n.01", "dog.v.01", vec![]),
        ];

        for (a, b, answer) in cases {
            let found = graph.lowest_common_hypernyms(idx(&graph, a), idx(&graph, b));
            assert_eq!(ids(&graph, &found), answer, "{} / {}", a, b);
        }
    }

    #[test]
    fn shortest_paths() {
        let graph = example();
        let cases = vec![
            ("dog.n.01", "dog.n.01", Some(0)),
            ("dog.n.01", "canine.n.02", Some(1)),
            ("dog.n.01", "cat.n.01", Some(2)),
            ("dog.n.01", "wolf.n.01", Some(2)),
            ("wheel.n.01", "car.n.01", Some(1)),
            ("dog.n.01", "car.n.01", Some(7)),
            ("dog.n.01", "dog.v.01", None),
        ];

        for (a, b, answer) in cases {
            assert_eq!(graph.shortest_path_distance(idx(&graph, a), idx(&graph, b)), answer, "{} / {}", a, b);
        }
    }

    #[test]
    fn hypernym_cycles_are_rejected() {
        let mut builder = HierarchyBuilder::new();
        builder.add_sense("a", PartOfSpeech::Noun, &["a"]).unwrap();
        builder.add_sense("b", PartOfSpeech::Noun, &["b"]).unwrap();
        builder.add_sense("c", PartOfSpeech::Noun, &["c"]).unwrap();
        builder.add_hypernym("a", "b").unwrap();
        builder.add_hypernym("b", "c").unwrap();
        builder.add_hypernym("c", "a").unwrap();

        assert!(matches!(builder.build(), Err(HierarchyErrorType::HypernymCycle(_))));
    }

    #[test]
    fn builder_errors() {
        let mut builder = HierarchyBuilder::new();
        builder.add_sense("a", PartOfSpeech::Noun, &[]).unwrap();
        assert_eq!(builder.add_sense("a", PartOfSpeech::Verb, &[]), Err(HierarchyErrorType::DuplicateSense("a".to_string())));
        assert_eq!(builder.add_hypernym("a", "zzz"), Err(HierarchyErrorType::UnknownSense("zzz".to_string())));
    }

    #[test]
    fn random_depth_invariants() {
        for seed in 0..20 {
            let graph = random_hierarchy(seed, 40);
            for node in graph.indices() {
                let depth = graph.max_depth(node);
                assert_eq!(depth == 0, graph.hypernyms_of(node).is_empty());
                for parent in graph.hypernyms_of(node) {
                    assert!(depth > graph.max_depth(*parent));
                }
            }
        }
    }

    #[test]
    fn random_symmetry() {
        for seed in 0..10 {
            let graph = random_hierarchy(seed, 30);
            for a in graph.indices() {
                assert_eq!(graph.shortest_path_distance(a, a), Some(0));
                assert_eq!(graph.lowest_common_hypernyms(a, a), BTreeSet::from([a]));
                for b in graph.indices() {
                    assert_eq!(graph.shortest_path_distance(a, b), graph.shortest_path_distance(b, a));
                    assert_eq!(graph.lowest_common_hypernyms(a, b), graph.lowest_common_hypernyms(b, a));
                }
            }
        }
    }
}
