//! Infrastructure layer - adapters and wiring.
//!
//! This layer provides:
//! - Clock adapters (system time vs mock)
//! - Sharded client storage with LRU eviction
//! - Settings loaded from the environment
//! - The builder that assembles a `SummaryService`

pub mod builder;
pub mod clock;
pub mod eviction;
pub mod settings;
pub mod storage;

/// Mock implementations for testing.
///
/// Only available with the `test-helpers` feature or in test builds.
///
/// ```toml
/// [dev-dependencies]
/// textdigest = { version = "*", features = ["test-helpers"] }
/// ```
#[cfg(any(test, feature = "test-helpers"))]
pub mod mocks;
