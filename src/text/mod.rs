//! Spoken-Chinese text rewriting.

pub mod naturalize;

pub use naturalize::naturalize;
