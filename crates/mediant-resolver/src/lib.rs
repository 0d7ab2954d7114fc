//! Dependency resolution engine: Maven-compatible nearest-wins mediation,
//! version-range algebra, scope propagation, cycle detection and managed
//! versions.
//!
//! [`resolver::resolve`] expands the graph breadth-first with a
//! [`builder::GraphBuilder`], feeds every candidate to a
//! [`mediator::ConflictMediator`] and returns a [`resolver::ResolutionResult`]
//! holding one node per conflict identity plus the diagnostics gathered on
//! the way.

pub mod builder;
pub mod cache;
pub mod conflict;
pub mod cycle;
pub mod filter;
pub mod mediator;
pub mod resolver;
pub mod scope;
pub mod source;
pub mod tree;
pub mod version;
