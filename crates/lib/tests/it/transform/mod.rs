//! Transformation integration tests
//!
//! This module tests wildcard transformations, chains and versioned
//! migrations on whole documents.

mod migration_tests;
mod path_order_tests;
mod wildcard_tests;
