//! Shared utilities for mediant.
//!
//! This crate provides the cross-cutting error type used by every other
//! mediant crate.

pub mod errors;
