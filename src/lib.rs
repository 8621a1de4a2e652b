/*
    Lexical similarity over a hypernym hierarchy and sense vectors, plus CYK
    parsing over CNF grammars with a tree movement transform
*/

pub mod cyk;
pub mod error_handling;
pub mod grammar;
pub mod hierarchy;
pub mod parser;
pub mod resources;
pub mod similarity;
pub mod stats;
pub mod summarize;
pub mod tree;
