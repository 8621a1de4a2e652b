/*
    Binary parse trees shared by the chart parser and the movement transform
*/

mod transform;

use std::collections::VecDeque;
use std::fmt::Display;

use crate::grammar::Symbol;

pub use transform::{move_to_front, transfer, TransformError, MOVED_ROOT};

// Children are absent only on leaves. A terminal production has a single
// left child holding the terminal; after movement a node may be left with
// just one child on either side.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ParseTree {
    pub symbol: Symbol,
    pub left: Option<Box<ParseTree>>,
    pub right: Option<Box<ParseTree>>,
}

impl ParseTree {
    pub fn leaf(symbol: Symbol) -> Self {
        ParseTree {
            symbol,
            left: None,
            right: None
        }
    }

    // A -> 'terminal'
    pub fn terminal(symbol: Symbol, terminal: Symbol) -> Self {
        ParseTree {
            symbol,
            left: Some(Box::new(ParseTree::leaf(terminal))),
            right: None
        }
    }

    // A -> B C
    pub fn binary(symbol: Symbol, left: ParseTree, right: ParseTree) -> Self {
        ParseTree {
            symbol,
            left: Some(Box::new(left)),
            right: Some(Box::new(right))
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }

    pub fn children(&self) -> impl Iterator<Item = &ParseTree> {
        self.left.iter().chain(self.right.iter()).map(Box::as_ref)
    }

    /// Level-order walk starting at the root, left child before right.
    pub fn breadth_first(&self) -> BreadthFirst<'_> {
        BreadthFirst {
            queue: VecDeque::from([self])
        }
    }

    // The terminals in left to right order, i.e. the sentence this tree derives
    pub fn leaves(&self) -> Vec<&Symbol> {
        if self.is_leaf() {
            return vec![&self.symbol];
        }
        self.children().flat_map(ParseTree::leaves).collect()
    }

    pub fn sentence(&self) -> String {
        self.leaves().iter().map(|s| s.as_str()).collect::<Vec<_>>().join(" ")
    }

    pub fn size(&self) -> usize {
        1 + self.children().map(ParseTree::size).sum::<usize>()
    }
}

pub struct BreadthFirst<'a> {
    queue: VecDeque<&'a ParseTree>,
}

impl<'a> Iterator for BreadthFirst<'a> {
    type Item = &'a ParseTree;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.queue.pop_front()?;
        self.queue.extend(node.children());
        Some(node)
    }
}

// Bracketed form: (S (A a) (B b))
impl Display for ParseTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_leaf() {
            return write!(f, "{}", self.symbol);
        }

        write!(f, "({}", self.symbol)?;
        for child in self.children() {
            write!(f, " {}", child)?;
        }
        write!(f, ")")
    }
}
