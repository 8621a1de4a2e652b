/*
    This module is for storing and querying grammars in Chomsky normal form
*/

use std::collections::{BTreeSet, HashMap};
use std::fmt::Display;
use std::sync::Arc;

use itertools::Itertools;

// A grammar label, terminal or nonterminal. Cloning only bumps a refcount.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Symbol(Arc<str>);

impl Symbol {
    pub fn new(text: &str) -> Self {
        Symbol(Arc::from(text))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Symbol {
    fn from(text: &str) -> Self {
        Symbol::new(text)
    }
}

impl Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// The only two right hand sides CNF allows
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Rhs {
    Terminal(Symbol),
    Binary(Symbol, Symbol),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GrammarRule {
    pub lhs: Symbol,
    pub rhs: Rhs,
}

impl GrammarRule {
    pub fn terminal(lhs: &str, literal: &str) -> Self {
        GrammarRule {
            lhs: Symbol::new(lhs),
            rhs: Rhs::Terminal(Symbol::new(literal))
        }
    }

    pub fn binary(lhs: &str, left: &str, right: &str) -> Self {
        GrammarRule {
            lhs: Symbol::new(lhs),
            rhs: Rhs::Binary(Symbol::new(left), Symbol::new(right))
        }
    }
}

impl Display for GrammarRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.rhs {
            Rhs::Terminal(literal) => write!(f, "{} -> '{}'", self.lhs, literal),
            Rhs::Binary(left, right) => write!(f, "{} -> {} {}", self.lhs, left, right),
        }
    }
}

/// An immutable CNF grammar.
///
/// Rules are kept as a set, so duplicates collapse. Lookup tables for the
/// two rule shapes are built once here so the chart parser never scans the
/// full rule list.
#[derive(Debug, Clone)]
pub struct Grammar {
    pub start_symbol: Symbol,
    rules: BTreeSet<GrammarRule>,
    by_terminal: HashMap<Symbol, Vec<Symbol>>,
    by_children: HashMap<(Symbol, Symbol), Vec<Symbol>>,
}

impl Grammar {
    pub fn new(start_symbol: Symbol, rules: impl IntoIterator<Item = GrammarRule>) -> Self {
        let rules: BTreeSet<GrammarRule> = rules.into_iter().collect();

        let mut by_terminal: HashMap<Symbol, Vec<Symbol>> = HashMap::new();
        let mut by_children: HashMap<(Symbol, Symbol), Vec<Symbol>> = HashMap::new();
        for rule in &rules {
            match &rule.rhs {
                Rhs::Terminal(literal) => by_terminal
                    .entry(literal.clone())
                    .or_default()
                    .push(rule.lhs.clone()),
                Rhs::Binary(left, right) => by_children
                    .entry((left.clone(), right.clone()))
                    .or_default()
                    .push(rule.lhs.clone()),
            }
        }

        Grammar {
            start_symbol,
            rules,
            by_terminal,
            by_children
        }
    }

    pub fn rules(&self) -> impl Iterator<Item = &GrammarRule> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn contains(&self, rule: &GrammarRule) -> bool {
        self.rules.contains(rule)
    }

    // Every A such that A -> 'token'
    pub fn producers_of_terminal(&self, token: &str) -> &[Symbol] {
        self.by_terminal
            .get(&Symbol::new(token))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    // Every A such that A -> left right
    pub fn producers_of_pair(&self, left: &Symbol, right: &Symbol) -> &[Symbol] {
        self.by_children
            .get(&(left.clone(), right.clone()))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn defines(&self, symbol: &Symbol) -> bool {
        self.rules.iter().any(|rule| rule.lhs == *symbol)
    }

    pub fn with_start(self, start_symbol: Symbol) -> Self {
        Grammar { start_symbol, ..self }
    }
}

impl PartialEq for Grammar {
    fn eq(&self, other: &Self) -> bool {
        self.start_symbol == other.start_symbol && self.rules == other.rules
    }
}

// One `LHS -> RHS` line per rule, start symbol first so that reparsing the
// output picks the same start symbol
impl Display for Grammar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (start, rest): (Vec<_>, Vec<_>) = self.rules
            .iter()
            .partition(|rule| rule.lhs == self.start_symbol);

        let lines = start.into_iter().chain(rest).join("\n");
        if lines.is_empty() {
            Ok(())
        } else {
            writeln!(f, "{}", lines)
        }
    }
}
