// Lib file to expose modules for testing and external usage.
// This file serves as the root for the library crate.

/// Module containing the core engine and the directory-scanning shell.
/// This includes `detect_mocks`, `ParseError`, and the `MockBuster` struct.
pub mod analyzer;

/// Module containing the import resolver.
/// This builds the flat local-name to qualified-path mapping for one file.
pub mod resolver;

/// Module containing the five detection matchers.
/// Each matcher is an independent pass over the parsed tree.
pub mod matchers;

/// Module containing the ignore registry.
/// This scans comment trivia for `mockbuster: ignore` markers.
pub mod ignores;

/// Module defining the violation data structures.
/// This includes the `Violation` struct and the `Category` enum.
pub mod violation;

/// Module containing utility functions.
/// This includes the byte-offset to line-number index.
pub mod utils;

pub use analyzer::{detect_mocks, MockBuster, ParseError};
pub use violation::{Category, Violation};
