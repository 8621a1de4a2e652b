/*
    This module parses CNF grammar files

    A rule line looks like `LHS -> ALT | ALT | ...` where every alternative is
    either a quoted terminal ('word') or exactly two nonterminals (B C).
    Lines starting with `#` and blank lines are ignored. Anything else that
    does not fit is skipped and reported, never fatal.
*/

mod lexer;
mod verifier;

use std::fmt::Display;
use std::path::Path;

use itertools::Itertools;
use tracing::{debug, warn};

use crate::error_handling::*;
use crate::grammar::*;
use lexer::Token;
use verifier::verify_rules;

// Used when a source contains no rules at all
pub const DEFAULT_START: &str = "S";

#[derive(Debug)]
pub enum GrammarErrorType {
    // A rule line without `->` after its nonterminal
    MissingArrow,
    // More than one `->` on a line
    UnexpectedArrow,
    // The line starts with something other than a nonterminal
    MissingNonterminal,
    // There is an unclosed quote
    UnmatchedQuote,
    // A character that cannot start any token
    UnexpectedCharacter(char),
    // Nothing after the arrow
    EmptyRewrite,
    // An alternative that is neither 'terminal' nor two nonterminals
    MalformedAlternative(String),
    // A nonterminal used on a right hand side that no rule defines
    UndefinedNonterminal(String),
    // There was an issue with reading a file
    FileError(std::io::Error),
}

impl ErrorType for GrammarErrorType {}

impl PartialEq for GrammarErrorType {
    fn eq(&self, other: &Self) -> bool {
        use GrammarErrorType::*;
        match (self, other) {
            (FileError(a), FileError(b)) => a.kind() == b.kind(),
            (UnexpectedCharacter(a), UnexpectedCharacter(b)) => a == b,
            (MalformedAlternative(a), MalformedAlternative(b)) => a == b,
            (UndefinedNonterminal(a), UndefinedNonterminal(b)) => a == b,
            _ => std::mem::discriminant(self) == std::mem::discriminant(other)
        }
    }
}

impl Display for GrammarErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GrammarErrorType::MissingArrow => write!(f, "Expected `->` after nonterminal"),
            GrammarErrorType::UnexpectedArrow => write!(f, "Unexpected `->` encountered"),
            GrammarErrorType::MissingNonterminal => write!(f, "Tried to define something other than a nonterminal"),
            GrammarErrorType::UnmatchedQuote => write!(f, "Unmatched quotes"),
            GrammarErrorType::UnexpectedCharacter(c) => write!(f, "Unexpected character `{}`", c),
            GrammarErrorType::EmptyRewrite => write!(f, "Rule has no alternatives"),
            GrammarErrorType::MalformedAlternative(text) => write!(f, "`{}` is neither a terminal nor a pair of nonterminals", text),
            GrammarErrorType::UndefinedNonterminal(nonterminal) => write!(f, "Could not find definition for `{}`", nonterminal),
            GrammarErrorType::FileError(e) => write!(f, "File error: {}", e),
        }
    }
}

pub type GrammarError = Error<GrammarErrorType>;
pub type GrammarErrors = Errors<GrammarErrorType>;

pub type Result<T> = std::result::Result<T, GrammarErrorType>;
pub type FileResult<T> = std::result::Result<T, GrammarErrors>;

// A parsed grammar plus everything that was skipped or looked suspicious
#[derive(Debug)]
pub struct GrammarLoad {
    pub grammar: Grammar,
    pub diagnostics: GrammarErrors,
}

// A rule line, before its alternatives are checked one by one
#[derive(PartialEq, Debug)]
struct RuleLine {
    symbol: Symbol,
    alternatives: Vec<Result<Rhs>>,
}

fn parse_alternative(tokens: &[Token]) -> Result<Rhs> {
    match tokens {
        [Token::Terminal(literal)] => Ok(Rhs::Terminal(Symbol::new(literal))),
        [Token::Nonterminal(left), Token::Nonterminal(right)] => Ok(Rhs::Binary(Symbol::new(left), Symbol::new(right))),
        _ if tokens.contains(&Token::Arrow) => Err(GrammarErrorType::UnexpectedArrow),
        _ => Err(GrammarErrorType::MalformedAlternative(tokens.iter().join(" "))),
    }
}

fn parse_line(tokens: &[Token]) -> Result<RuleLine> {
    let symbol = match tokens.first() {
        Some(Token::Nonterminal(s)) => Ok(Symbol::new(s)),
        _ => Err(GrammarErrorType::MissingNonterminal)
    }?;

    if tokens.get(1) != Some(&Token::Arrow) {
        return Err(GrammarErrorType::MissingArrow);
    }

    let rewrite = &tokens[2..];
    if rewrite.is_empty() {
        return Err(GrammarErrorType::EmptyRewrite);
    }

    let alternatives = rewrite
        .split(|t| *t == Token::Or)
        .map(parse_alternative)
        .collect();

    return Ok(RuleLine { symbol, alternatives });
}

fn is_rule_line(line: &str) -> bool {
    let trimmed = line.trim();
    !trimmed.is_empty() && !trimmed.starts_with('#')
}

/// Parses grammar text. `source` only labels diagnostics.
pub fn parse_str(text: &str, source: &Path) -> GrammarLoad {
    let mut rules = Vec::new();
    let mut diagnostics = Vec::new();
    let mut start = None;

    for (num, line) in text.lines().enumerate().filter(|(_, line)| is_rule_line(line)) {
        let location = Location::line(source, num + 1);

        let parsed = lexer::lex_line(line).and_then(|tokens| parse_line(&tokens));
        let rule_line = match parsed {
            Ok(rule_line) => rule_line,
            Err(error) => {
                diagnostics.push(GrammarError::new(location, error));
                continue;
            }
        };

        for alternative in rule_line.alternatives {
            match alternative {
                Ok(rhs) => {
                    start.get_or_insert_with(|| rule_line.symbol.clone());
                    rules.push((GrammarRule { lhs: rule_line.symbol.clone(), rhs }, location.clone()));
                }
                Err(error) => diagnostics.push(GrammarError::new(location.clone(), error)),
            }
        }
    }

    diagnostics.extend(verify_rules(&rules));

    for diagnostic in &diagnostics {
        warn!(location = %diagnostic.location, "skipping grammar input: {}", diagnostic.error);
    }

    let start_symbol = start.unwrap_or_else(|| Symbol::new(DEFAULT_START));
    let grammar = Grammar::new(start_symbol, rules.into_iter().map(|(rule, _)| rule));
    debug!(rules = grammar.len(), start = %grammar.start_symbol, "grammar loaded");

    return GrammarLoad { grammar, diagnostics };
}

pub fn parse_file(path: &Path) -> FileResult<GrammarLoad> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| vec![GrammarError::new(Location::file(path), GrammarErrorType::FileError(e))])?;

    Ok(parse_str(&text, path))
}

#[cfg(test)]
mod tests {
    use std::iter::zip;
    use std::path::PathBuf;

    use super::*;

    fn lex(text: &str) -> Vec<Token> {
        lexer::lex_line(text).unwrap()
    }

    fn load(text: &str) -> GrammarLoad {
        parse_str(text, Path::new("inline.cfg"))
    }

    #[test]
    fn parse_normal_alternative() {
        let alternatives = vec![
            lex("'dog'"),
            lex("NP VP"),
            lex("'New York'")
        ];
        let answers = vec![
            Rhs::Terminal(Symbol::new("dog")),
            Rhs::Binary(Symbol::new("NP"), Symbol::new("VP")),
            Rhs::Terminal(Symbol::new("New York"))
        ];

        for (alternative, answer) in zip(alternatives, answers) {
            assert_eq!(parse_alternative(&alternative), Ok(answer));
        }
    }

    #[test]
    fn parse_malformed_alternative() {
        assert_eq!(parse_alternative(&lex("B")), Err(GrammarErrorType::MalformedAlternative("B".to_string())));
        assert_eq!(parse_alternative(&lex("A B C")), Err(GrammarErrorType::MalformedAlternative("A B C".to_string())));
        assert_eq!(parse_alternative(&lex("'a' B")), Err(GrammarErrorType::MalformedAlternative("'a' B".to_string())));
        assert_eq!(parse_alternative(&lex("A -> B")), Err(GrammarErrorType::UnexpectedArrow));
        assert_eq!(parse_alternative(&[]), Err(GrammarErrorType::MalformedAlternative(String::new())));
    }

    #[test]
    fn parse_normal_line() {
        let answer = RuleLine {
            symbol: Symbol::new("S"),
            alternatives: vec![
                Ok(Rhs::Terminal(Symbol::new("a"))),
                Ok(Rhs::Binary(Symbol::new("B"), Symbol::new("C")))
            ]
        };

        assert_eq!(parse_line(&lex("S -> 'a' | B C")), Ok(answer));

        let apostrophe = RuleLine {
            symbol: Symbol::new("A"),
            alternatives: vec![
                Ok(Rhs::Terminal(Symbol::new("l'uomo"))),
                Ok(Rhs::Binary(Symbol::new("B"), Symbol::new("C")))
            ]
        };
        assert_eq!(parse_line(&lex("A -> 'l'uomo' | B C")), Ok(apostrophe));
    }

    #[test]
    fn parse_malformed_line() {
        assert_eq!(parse_line(&lex("alpha bravo charlie")), Err(GrammarErrorType::MissingArrow));
        assert_eq!(parse_line(&lex("'alpha' -> bravo charlie")), Err(GrammarErrorType::MissingNonterminal));
        assert_eq!(parse_line(&lex("| -> alpha bravo")), Err(GrammarErrorType::MissingNonterminal));
        assert_eq!(parse_line(&lex("-> alpha bravo")), Err(GrammarErrorType::MissingNonterminal));
        assert_eq!(parse_line(&lex("S ->")), Err(GrammarErrorType::EmptyRewrite));
    }

    #[test]
    fn single_nonterminal_is_rejected() {
        let loaded = load("S -> B\nB -> 'b'\n");

        assert!(!loaded.grammar.contains(&GrammarRule { lhs: "S".into(), rhs: Rhs::Terminal("B".into()) }));
        assert_eq!(loaded.grammar.len(), 1);
        assert_eq!(loaded.diagnostics, vec![GrammarError::new(
            Location::line(Path::new("inline.cfg"), 1),
            GrammarErrorType::MalformedAlternative("B".to_string())
        )]);
    }

    #[test]
    fn bad_alternatives_do_not_sink_the_line() {
        let loaded = load("S -> 'a' | B | A A\nA -> 'a'");

        assert_eq!(loaded.grammar, Grammar::new(Symbol::new("S"), vec![
            GrammarRule::terminal("S", "a"),
            GrammarRule::binary("S", "A", "A"),
            GrammarRule::terminal("A", "a"),
        ]));
        assert_eq!(loaded.diagnostics.len(), 1);
    }

    #[test]
    fn comments_and_blank_lines_are_ignored() {
        let loaded = load("# a comment\n\n   \nS -> 'x'\n  # indented comment\n");

        assert!(loaded.diagnostics.is_empty());
        assert_eq!(loaded.grammar.len(), 1);
    }

    #[test]
    fn start_symbol_is_first_rule() {
        assert_eq!(load("VP -> 'runs'\nS -> NP VP\nNP -> 'Luke'").grammar.start_symbol, Symbol::new("VP"));
        assert_eq!(load("").grammar.start_symbol, Symbol::new(DEFAULT_START));
    }

    #[test]
    fn serialized_grammar_reparses_to_same_rules() {
        let grammar = Grammar::new(Symbol::new("S"), vec![
            GrammarRule::binary("S", "NP", "VP"),
            GrammarRule::binary("VP", "V", "NP"),
            GrammarRule::terminal("NP", "Luke"),
            GrammarRule::terminal("NP", "the force"),
            GrammarRule::terminal("V", "uses"),
            GrammarRule::terminal("NP", "l'uomo"),
            GrammarRule::terminal("NP", "rock 'n roll"),
        ]);

        let reparsed = load(&grammar.to_string());
        assert!(reparsed.diagnostics.is_empty());
        assert_eq!(reparsed.grammar, grammar);
    }

    #[test]
    fn parse_normal_file() {
        let path = PathBuf::from("example_data/yoda.cfg");
        let loaded = parse_file(&path).unwrap();

        assert!(loaded.diagnostics.is_empty());
        assert_eq!(loaded.grammar.start_symbol, Symbol::new("S"));
        assert!(loaded.grammar.contains(&GrammarRule::binary("S", "NP", "VP")));
        assert!(loaded.grammar.contains(&GrammarRule::terminal("ADVP", "lì")));
    }

    #[test]
    fn parse_malformed_file() {
        let path = PathBuf::from("example_data/malformed.cfg");
        let loaded = parse_file(&path).unwrap();

        assert_eq!(loaded.diagnostics, vec![
            GrammarError::new(Location::line(&path, 3), GrammarErrorType::MalformedAlternative("NP".to_string())),
            GrammarError::new(Location::line(&path, 5), GrammarErrorType::MissingArrow),
            GrammarError::new(Location::line(&path, 6), GrammarErrorType::UnmatchedQuote),
            GrammarError::new(Location::line(&path, 2), GrammarErrorType::UndefinedNonterminal("VP".to_string())),
        ]);
        assert_eq!(loaded.grammar, Grammar::new(Symbol::new("S"), vec![
            GrammarRule::binary("S", "NP", "VP"),
            GrammarRule::terminal("NP", "Han"),
        ]));
    }

    #[test]
    fn missing_file() {
        let errors = parse_file(Path::new("example_data/nope.cfg")).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].error, GrammarErrorType::FileError(std::io::ErrorKind::NotFound.into()));
    }
}
