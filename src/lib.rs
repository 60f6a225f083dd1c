//! This crate exposes a Binary Search Tree (BST) that keeps subtree sizes, turning it into an
//! ordered symbol table with order-statistic queries.
//!
//! ## Binary Search Tree
//!
//! A Binary Search Tree is a data structure supporting operations to
//! insert, find, and delete stored records. BSTs are typically defined
//! recursively using the notion of a `Node`. A `Node` will typically store
//! some sort of value (the value that was inserted, for example) and will
//! sometimes have child `Node`s. The most important invariants of a BST are:
//!
//! 1. For every `Node` in a BST, all the `Node`s in its left subtree have a
//!    key less than its own key.
//! 2. For every `Node` in a BST, all the `Node`s in its right subtree have a
//!    key greater than its own key.
//!
//! > Note that some `Node`s have no children. These `Node`s are called "leaf nodes".
//!
//! ## Subtree sizes
//!
//! Every `Node` in this crate's [`Tree`] also records how many `Node`s are in the subtree rooted
//! at it. That single number is enough to answer:
//!
//! - [`select`][Tree::select]: which key has exactly `i` smaller keys?
//! - [`rank`][Tree::rank]: how many keys are smaller than `k`?
//!
//! in `O(height)`, alongside the usual [`floor`][Tree::floor], [`min`][Tree::min],
//! [`keys`][Tree::keys] range queries and so on. Insertions and deletions rebuild the path they
//! touched on the way back up so the counts stay exact.
//!
//! The tree does not rebalance itself. With random insertion order the height is
//! `O(lg N)`; with sorted insertion order it is `N`.

#![deny(missing_docs, clippy::clone_on_ref_ptr)]

mod error;
mod key;
mod tree;

pub use error::{Error, Result};
pub use key::Key;
pub use tree::{Iter, Node, Tree};
