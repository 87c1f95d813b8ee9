//! Domain layer - pure logic with no shared state.
//!
//! This layer contains the core concepts of the service:
//! - Text normalization, sentence segmentation and tokenization
//! - Stop-word filtering and word frequency tables
//! - Summary results
//! - The sliding-window admission policy and per-client request logs
//!
//! All types in this layer are plain values and easily testable.

pub mod frequency;
pub mod stopwords;
pub mod summary;
pub mod text;
pub mod window;
