#![deny(missing_docs)]

//! Core library for the in-memory address book server.

/// HTTP routing and REST handlers for the contacts resources.
pub mod api;
/// Environment-driven configuration management.
pub mod config;
/// Person records, identifiers, and the in-memory repository.
pub mod contacts;
/// Structured logging and tracing setup.
pub mod logging;
/// Mutation counters exposed over HTTP.
pub mod metrics;
/// Address book seeding from JSON documents.
pub mod seed;
