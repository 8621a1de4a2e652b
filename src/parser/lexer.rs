use itertools::{Itertools, PeekingNext};

use super::{GrammarErrorType, Result};

#[derive(PartialEq, Debug, Clone)]
pub enum Token {
    Arrow,
    Or,
    Nonterminal(String),
    Terminal(String)
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::Arrow => write!(f, "->"),
            Token::Or => write!(f, "|"),
            Token::Nonterminal(s) => write!(f, "{}", s),
            Token::Terminal(s) => write!(f, "'{}'", s),
        }
    }
}

fn is_symbol_char(c: &char) -> bool {
    c.is_alphanumeric() || *c == '_'
}

/// A quote closes the terminal unless a word character follows it, so
/// apostrophes inside words (`'l'uomo'`) stay part of the text.
pub fn lex_terminal(line: &mut impl PeekingNext<Item = char>) -> Result<Token> {
    line.next(); // Consume open quote
    let mut token_text = String::new();

    loop {
        token_text.extend(line.peeking_take_while(|&c| c != '\''));

        // Check if there is a close quote and consume it if there is
        if line.next() != Some('\'') {
            return Err(GrammarErrorType::UnmatchedQuote);
        }

        match line.peeking_next(is_symbol_char) {
            Some(c) => {
                token_text.push('\'');
                token_text.push(c);
            }
            None => break,
        }
    }

    Ok(Token::Terminal(token_text))
}

pub fn lex_nonterminal(line: &mut impl PeekingNext<Item = char>) -> Result<Token> {
    Ok(Token::Nonterminal(line.peeking_take_while(is_symbol_char).collect()))
}

pub fn lex_arrow(line: &mut impl PeekingNext<Item = char>) -> Result<Token> {
    line.next(); // Consume '-'
    match line.next() {
        Some('>') => Ok(Token::Arrow),
        _ => Err(GrammarErrorType::UnexpectedCharacter('-'))
    }
}

pub fn lex_line(line: &str) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();

    let mut line_chars = line.chars().peekable();

    while let Some(c) = line_chars.peek() {
        if *c == '-' {
            tokens.push(lex_arrow(&mut line_chars)?);
        } else if *c == '|' {
            line_chars.next();
            tokens.push(Token::Or);
        } else if *c == '\'' {
            tokens.push(lex_terminal(&mut line_chars)?);
        } else if is_symbol_char(c) {
            tokens.push(lex_nonterminal(&mut line_chars)?);
        } else if c.is_whitespace() {
            line_chars.next();
        } else {
            return Err(GrammarErrorType::UnexpectedCharacter(*c));
        }
    }

    return Ok(tokens);
}
