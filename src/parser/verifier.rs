use std::collections::HashSet;

use itertools::Itertools;

use crate::grammar::{GrammarRule, Rhs};
use super::GrammarErrorType::UndefinedNonterminal;
use super::{GrammarError, GrammarErrors, Location};

fn defined_symbols(rules: &[(GrammarRule, Location)]) -> HashSet<&str> {
    rules.iter().map(|(rule, _)| rule.lhs.as_str()).collect()
}

// Nonterminals on a binary right hand side that nothing rewrites. The chart
// parser can never build them, so every rule using them is dead.
fn get_undefined_symbols(rules: &[(GrammarRule, Location)]) -> GrammarErrors {
    let defined = defined_symbols(rules);

    rules.iter()
        .flat_map(|(rule, location)| match &rule.rhs {
            Rhs::Binary(left, right) => vec![(left, location), (right, location)],
            Rhs::Terminal(_) => Vec::new()
        })
        .filter(|(symbol, _)| !defined.contains(symbol.as_str()))
        .unique_by(|(symbol, _)| (*symbol).clone())
        .map(|(symbol, location)| GrammarError {
            location: location.to_owned(),
            error: UndefinedNonterminal(symbol.to_string())
        })
        .collect()
}

pub fn verify_rules(rules: &[(GrammarRule, Location)]) -> GrammarErrors {
    get_undefined_symbols(rules)
}
