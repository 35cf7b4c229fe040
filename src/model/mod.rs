//! Classifier implementation
//!
//! A single decision-tree classifier; ensemble averaging over repeated
//! fits lives in `predict`.

pub mod tree;

pub use tree::DecisionTree;
