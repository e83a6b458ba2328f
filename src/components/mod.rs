//! UI components.

pub mod graph;
