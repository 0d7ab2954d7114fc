//! Core data types for mediant.
//!
//! This crate defines the values the resolution engine consumes and produces
//! that carry no resolution logic of their own: artifact coordinates and
//! conflict identities, dependency scopes, declared dependency edges with
//! their exclusions, managed-version entries, and the TOML resolution
//! manifest with its settings.
//!
//! This crate is intentionally free of async code and I/O beyond reading a
//! manifest file.

pub mod config;
pub mod coordinate;
pub mod dependency;
pub mod manifest;
