/*
    CYK chart parsing over a CNF grammar

    Cell (i, j) holds every distinct tree deriving tokens i..j. Cells are
    filled by increasing span, trying every split point and every pair of
    trees from the two halves, so all derivations are kept, not just one
    per symbol.
*/

use std::collections::HashSet;

use tracing::{debug, trace};

use crate::grammar::{Grammar, Symbol};
use crate::tree::ParseTree;

#[derive(Debug, Default, Clone, PartialEq)]
pub struct ChartCell {
    trees: Vec<ParseTree>,
    seen: HashSet<ParseTree>,
}

impl ChartCell {
    // False when a structurally equal tree is already present
    pub fn insert(&mut self, tree: ParseTree) -> bool {
        if !self.seen.insert(tree.clone()) {
            return false;
        }
        self.trees.push(tree);
        true
    }

    pub fn trees(&self) -> &[ParseTree] {
        &self.trees
    }

    pub fn len(&self) -> usize {
        self.trees.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trees.is_empty()
    }

    pub fn with_root<'a>(&'a self, symbol: &Symbol) -> impl Iterator<Item = &'a ParseTree> + 'a {
        let symbol = symbol.clone();
        self.trees.iter().filter(move |tree| tree.symbol == symbol)
    }
}

#[derive(Debug, Clone)]
pub struct Chart {
    tokens: Vec<String>,
    start_symbol: Symbol,
    // Row-major n * n, only i < j is ever used
    cells: Vec<ChartCell>,
}

impl Chart {
    fn index(&self, i: usize, j: usize) -> usize {
        i * self.tokens.len() + (j - 1)
    }

    pub fn parse<T: AsRef<str>>(grammar: &Grammar, tokens: &[T]) -> Self {
        let n = tokens.len();
        let mut chart = Chart {
            tokens: tokens.iter().map(|t| t.as_ref().to_string()).collect(),
            start_symbol: grammar.start_symbol.clone(),
            cells: vec![ChartCell::default(); n * n],
        };

        for i in 0..n {
            let token = Symbol::new(&chart.tokens[i]);
            let index = chart.index(i, i + 1);
            for lhs in grammar.producers_of_terminal(token.as_str()) {
                chart.cells[index].insert(ParseTree::terminal(lhs.clone(), token.clone()));
            }
            if chart.cells[index].is_empty() {
                debug!(position = i, token = %token, "no rule produces token");
            }
        }

        for span in 2..=n {
            for i in 0..=(n - span) {
                let j = i + span;
                let mut cell = ChartCell::default();

                for k in (i + 1)..j {
                    let left_cell = &chart.cells[chart.index(i, k)];
                    let right_cell = &chart.cells[chart.index(k, j)];

                    for left in left_cell.trees() {
                        for right in right_cell.trees() {
                            for lhs in grammar.producers_of_pair(&left.symbol, &right.symbol) {
                                cell.insert(ParseTree::binary(lhs.clone(), left.clone(), right.clone()));
                            }
                        }
                    }
                }

                trace!(i, j, trees = cell.len(), "cell filled");
                let index = chart.index(i, j);
                chart.cells[index] = cell;
            }
        }

        debug!(
            tokens = n,
            trees = chart.cells.iter().map(ChartCell::len).sum::<usize>(),
            derivations = chart.root_trees().len(),
            "chart filled"
        );
        chart
    }

    /// The cell spanning tokens `i..j`, if `0 <= i < j <= n`.
    pub fn cell(&self, i: usize, j: usize) -> Option<&ChartCell> {
        if i >= j || j > self.tokens.len() {
            return None;
        }
        self.cells.get(self.index(i, j))
    }

    // Trees for the whole input rooted at `symbol`
    pub fn derivations_of(&self, symbol: &Symbol) -> Vec<&ParseTree> {
        match self.cell(0, self.tokens.len()) {
            Some(cell) => cell.with_root(symbol).collect(),
            None => Vec::new(),
        }
    }

    /// Complete derivations rooted at the grammar's start symbol.
    pub fn root_trees(&self) -> Vec<&ParseTree> {
        self.derivations_of(&self.start_symbol)
    }

    pub fn is_recognized(&self) -> bool {
        !self.root_trees().is_empty()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }
}
