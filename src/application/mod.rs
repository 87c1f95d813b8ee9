//! Application layer - orchestration of domain logic.
//!
//! This layer coordinates the domain logic and owns the shared state:
//! - Client registry (per-client request logs)
//! - Admission controller (sliding-window decisions)
//! - Summarizer (sentence scoring and selection)
//! - Idle sweeper (periodic cleanup)
//! - Summary service (the request boundary)
//!
//! ## Ports
//!
//! The application layer defines ports (traits) that infrastructure
//! adapters implement, keeping this layer independent of storage and time.

pub mod admission;
pub mod metrics;
pub mod ports;
pub mod registry;
pub mod service;
pub mod summarizer;
pub mod sweeper;
