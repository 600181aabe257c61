//! Generic post-order tree walking.
//!
//! Both directions of the conversion, and the HTML import, are written as a
//! single visitor over a [`TreeNode`]. The walker owns the recursion so that
//! child ordering and void handling are decided in one place.
//!
//! # The Algorithm
//!
//! 1. Walk every child of the node, left to right.
//! 2. Concatenate what the children produced. A child may produce nothing
//!    ([`Walked::Drop`]), one node ([`Walked::One`]) or several
//!    ([`Walked::Splice`]); spliced nodes take the child's place in order.
//! 3. Hand the original node and the transformed children to the visitor,
//!    which decides what the node itself becomes.
//!
//! The first error returned by the visitor aborts the walk.

use std::borrow::Cow;

/// A node whose children can be enumerated in document order.
pub trait TreeNode: Clone {
    fn child_nodes(&self) -> Cow<'_, [Self]>;
}

/// Result of visiting one node.
#[derive(Debug, Clone, PartialEq)]
pub enum Walked<T> {
    /// The node disappears from the output.
    Drop,
    /// The node maps to exactly one output node.
    One(T),
    /// The node maps to a run of output nodes spliced into the parent.
    Splice(Vec<T>),
}

impl<T> Walked<T> {
    pub fn into_vec(self) -> Vec<T> {
        let mut out = Vec::new();
        self.append_to(&mut out);
        out
    }

    fn append_to(self, out: &mut Vec<T>) {
        match self {
            Walked::Drop => {}
            Walked::One(node) => out.push(node),
            Walked::Splice(nodes) => out.extend(nodes),
        }
    }
}

impl<T> From<Vec<T>> for Walked<T> {
    fn from(nodes: Vec<T>) -> Self {
        Walked::Splice(nodes)
    }
}

/// Walks `node` depth-first, calling `visitor` once per node in post-order.
pub fn walk<N, T, E, F>(node: &N, visitor: &mut F) -> Result<Walked<T>, E>
where
    N: TreeNode,
    F: FnMut(&N, Vec<T>) -> Result<Walked<T>, E>,
{
    let mut children = Vec::new();
    for child in node.child_nodes().iter() {
        walk(child, visitor)?.append_to(&mut children);
    }
    visitor(node, children)
}

/// Walks a sequence of sibling roots, concatenating their outputs.
pub fn walk_forest<N, T, E, F>(nodes: &[N], visitor: &mut F) -> Result<Vec<T>, E>
where
    N: TreeNode,
    F: FnMut(&N, Vec<T>) -> Result<Walked<T>, E>,
{
    let mut out = Vec::new();
    for node in nodes {
        walk(node, visitor)?.append_to(&mut out);
    }
    Ok(out)
}
