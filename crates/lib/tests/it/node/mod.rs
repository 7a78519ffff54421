//! Node data model integration tests
//!
//! This module tests attachment and detachment of nodes, structural
//! reshaping, and metadata carried through updates and copies.

mod structure_tests;
