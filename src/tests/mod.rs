//! Library tests and fixtures

pub mod fixtures;
mod tree_tests;
