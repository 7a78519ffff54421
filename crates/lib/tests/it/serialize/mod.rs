//! Typed mapping integration tests
//!
//! This module tests reading and writing Rust values through the default
//! serializer registry, custom registries and the serde bridge.

mod enum_tests;
mod registry_tests;
mod scalar_tests;
