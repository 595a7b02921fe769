#![deny(missing_docs)]

//! Core library for Paper Synth, a research-paper summarization and synthesis service.

/// HTTP routing and REST handlers.
pub mod api;
/// Environment-driven configuration management.
pub mod config;
/// Structured logging and tracing setup.
pub mod logging;
/// Pipeline activity counters.
pub mod metrics;
/// Summarization pipeline: chunking, concurrent summaries, and synthesis.
pub mod processing;
/// External summarization engine abstraction and adapters.
pub mod summarization;
