//! Property tests exercising `rank_bst::Tree` only through its public API.

mod tree;
