/*
    Movement: lift a constituent to the front of the sentence

    The first node (in level order) with a direct child labelled with the
    target loses that child, and a new root adopts the child on the left and
    the rest of the tree on the right. Trees are never modified in place; each
    step returns a fresh tree.
*/

use std::collections::VecDeque;
use std::fmt::Display;

use tracing::trace;

use super::ParseTree;
use crate::grammar::Symbol;

// Label of the synthetic root each movement step creates
pub const MOVED_ROOT: &str = "S'";

#[derive(Debug, PartialEq, Clone)]
pub enum TransformError {
    // No node in the tree has a child with this label
    TargetNotFound(Symbol),
}

impl Display for TransformError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransformError::TargetNotFound(symbol) => write!(f, "No constituent labelled `{}` to move", symbol),
        }
    }
}

#[derive(Debug, PartialEq, Clone, Copy)]
enum Side {
    Left,
    Right,
}

fn child(node: &ParseTree, side: Side) -> Option<&ParseTree> {
    match side {
        Side::Left => node.left.as_deref(),
        Side::Right => node.right.as_deref(),
    }
}

// Path from the root to the parent of the target, plus which child it is
fn find_parent_of(tree: &ParseTree, target: &Symbol) -> Option<(Vec<Side>, Side)> {
    let mut queue = VecDeque::from([(tree, Vec::new())]);

    while let Some((node, path)) = queue.pop_front() {
        for side in [Side::Left, Side::Right] {
            if child(node, side).is_some_and(|c| c.symbol == *target) {
                return Some((path, side));
            }
        }

        for side in [Side::Left, Side::Right] {
            if let Some(next) = child(node, side) {
                let mut next_path = path.clone();
                next_path.push(side);
                queue.push_back((next, next_path));
            }
        }
    }

    None
}

// Rebuilds the spine along `path` without the detached child. Subtrees off
// the spine are cloned as they are.
fn detach(node: &ParseTree, path: &[Side], side: Side) -> Option<(ParseTree, ParseTree)> {
    let Some((step, rest)) = path.split_first() else {
        let moved = child(node, side)?.clone();
        let remaining = ParseTree {
            symbol: node.symbol.clone(),
            left: if side == Side::Left { None } else { node.left.clone() },
            right: if side == Side::Right { None } else { node.right.clone() },
        };
        return Some((remaining, moved));
    };

    let (rebuilt, moved) = detach(child(node, *step)?, rest, side)?;
    let rebuilt = Some(Box::new(rebuilt));
    let remaining = ParseTree {
        symbol: node.symbol.clone(),
        left: if *step == Side::Left { rebuilt.clone() } else { node.left.clone() },
        right: if *step == Side::Right { rebuilt } else { node.right.clone() },
    };
    Some((remaining, moved))
}

pub fn move_to_front(tree: &ParseTree, target: &Symbol) -> Result<ParseTree, TransformError> {
    let not_found = || TransformError::TargetNotFound(target.clone());

    let (path, side) = find_parent_of(tree, target).ok_or_else(not_found)?;
    trace!(%target, depth = path.len(), "moving constituent");

    let (remaining, moved) = detach(tree, &path, side).ok_or_else(not_found)?;
    Ok(ParseTree::binary(Symbol::new(MOVED_ROOT), moved, remaining))
}

/// Applies one movement per target, in order.
pub fn transfer(tree: &ParseTree, targets: &[Symbol]) -> Result<ParseTree, TransformError> {
    targets
        .iter()
        .try_fold(tree.clone(), |current, target| move_to_front(&current, target))
}
