//! Diagnostics gathered while resolving: lost mediations, range and cycle
//! violations, and artifacts left out on purpose.

use std::fmt;

use mediant_core::coordinate::ConflictId;
use mediant_core::dependency::Exclusion;
use serde::Serialize;
use tracing::{debug, warn};

use crate::cycle::{CycleError, DisplayTrail};
use crate::version::VersionSpec;

/// A report of all version conflicts encountered during resolution.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ConflictReport {
    pub conflicts: Vec<VersionConflict>,
}

/// A single version conflict where multiple versions of the same artifact
/// were requested but only one was kept.
#[derive(Debug, Clone, Serialize)]
pub struct VersionConflict {
    pub identity: ConflictId,
    pub requested: String,
    pub resolved: String,
    /// Trail of the declaration that lost.
    pub path: Vec<ConflictId>,
    pub reason: String,
}

impl ConflictReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, conflict: VersionConflict) {
        self.conflicts.push(conflict);
    }

    pub fn is_empty(&self) -> bool {
        self.conflicts.is_empty()
    }

    pub fn len(&self) -> usize {
        self.conflicts.len()
    }
}

impl fmt::Display for ConflictReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.conflicts.is_empty() {
            return write!(f, "No version conflicts.");
        }
        writeln!(f, "Version conflicts ({}):", self.conflicts.len())?;
        for c in &self.conflicts {
            writeln!(
                f,
                "  {} requested {} but resolved {} ({})",
                c.identity.key(),
                c.requested,
                c.resolved,
                c.reason
            )?;
        }
        Ok(())
    }
}

impl fmt::Display for VersionConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} -> {} ({})",
            self.identity.key(),
            self.requested,
            self.resolved,
            self.reason
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RangeViolationReason {
    /// The requested ranges have no version in common.
    Disjoint,
    /// No known version lies inside the accumulated range.
    Unsatisfiable,
}

/// Ranges requested for one identity that could not be honoured.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RangeViolation {
    pub identity: ConflictId,
    pub ranges: Vec<VersionSpec>,
    /// One trail per range, in the same order.
    pub paths: Vec<Vec<ConflictId>>,
    pub reason: RangeViolationReason,
}

impl fmt::Display for RangeViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ranges: Vec<String> = self.ranges.iter().map(|r| r.to_string()).collect();
        match self.reason {
            RangeViolationReason::Disjoint => write!(
                f,
                "{}: ranges {} have no version in common",
                self.identity.key(),
                ranges.join(" and ")
            )?,
            RangeViolationReason::Unsatisfiable => write!(
                f,
                "{}: no available version satisfies {}",
                self.identity.key(),
                ranges.join(" and ")
            )?,
        }
        for path in &self.paths {
            write!(f, "\n    via {}", DisplayTrail(path))?;
        }
        Ok(())
    }
}

/// A dependency edge that would have closed a cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CycleViolation {
    pub trail: Vec<ConflictId>,
    pub closing: ConflictId,
}

impl From<CycleError> for CycleViolation {
    fn from(err: CycleError) -> Self {
        Self {
            trail: err.trail,
            closing: err.closing,
        }
    }
}

impl fmt::Display for CycleViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", DisplayTrail(&self.trail), self.closing.key())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case", tag = "kind")]
pub enum OmissionReason {
    /// Matched an exclusion declared somewhere up the path.
    Excluded { pattern: Exclusion },
    /// Rejected by the node filter.
    Filtered,
}

/// A dependency deliberately left out of the graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Omission {
    pub identity: ConflictId,
    pub trail: Vec<ConflictId>,
    pub reason: OmissionReason,
}

impl fmt::Display for Omission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.reason {
            OmissionReason::Excluded { pattern } => write!(
                f,
                "{} excluded by {pattern} via {}",
                self.identity.key(),
                DisplayTrail(&self.trail)
            ),
            OmissionReason::Filtered => write!(
                f,
                "{} filtered out via {}",
                self.identity.key(),
                DisplayTrail(&self.trail)
            ),
        }
    }
}

/// Everything recorded during one run.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    pub range_violations: Vec<RangeViolation>,
    pub cycle_violations: Vec<CycleViolation>,
    pub conflicts: ConflictReport,
    pub omissions: Vec<Omission>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a range violation. A repeat of an already recorded violation
    /// for the same identity, reason and ranges is dropped.
    pub fn range_violation(&mut self, violation: RangeViolation) {
        let repeated = self.range_violations.iter().any(|v| {
            v.identity == violation.identity
                && v.reason == violation.reason
                && v.ranges == violation.ranges
        });
        if repeated {
            return;
        }
        warn!("{violation}");
        self.range_violations.push(violation);
    }

    pub fn cycle(&mut self, violation: CycleViolation) {
        warn!("dependency cycle: {violation}");
        self.cycle_violations.push(violation);
    }

    pub fn conflict(&mut self, conflict: VersionConflict) {
        debug!("{conflict}");
        self.conflicts.add(conflict);
    }

    pub fn omission(&mut self, omission: Omission) {
        debug!("{omission}");
        self.omissions.push(omission);
    }

    pub fn is_clean(&self) -> bool {
        self.range_violations.is_empty() && self.cycle_violations.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> ConflictId {
        ConflictId::parse(s).unwrap()
    }

    #[test]
    fn empty_report() {
        let report = ConflictReport::new();
        assert!(report.is_empty());
        assert_eq!(report.len(), 0);
        assert_eq!(report.to_string(), "No version conflicts.");
    }

    #[test]
    fn report_with_conflicts() {
        let mut report = ConflictReport::new();
        report.add(VersionConflict {
            identity: id("org.example:lib"),
            requested: "2.0".to_string(),
            resolved: "1.0".to_string(),
            path: vec![id("org.example:app"), id("org.example:lib")],
            reason: "nearest wins (depth 1 vs 2)".to_string(),
        });
        assert!(!report.is_empty());
        assert_eq!(report.len(), 1);
        let s = report.to_string();
        assert!(s.contains("org.example:lib"));
        assert!(s.contains("requested 2.0 but resolved 1.0"));
    }

    #[test]
    fn range_violation_lists_paths() {
        let violation = RangeViolation {
            identity: id("g:c"),
            ranges: vec![
                VersionSpec::parse("[2.4,3.0]").unwrap(),
                VersionSpec::parse("[1.0,2.0]").unwrap(),
            ],
            paths: vec![vec![id("g:a"), id("g:c")], vec![id("g:a"), id("g:b"), id("g:c")]],
            reason: RangeViolationReason::Disjoint,
        };
        let text = violation.to_string();
        assert!(text.starts_with("g:c: ranges [2.4,3.0] and [1.0,2.0] have no version in common"));
        assert!(text.contains("via g:a -> g:b -> g:c"));
    }

    #[test]
    fn repeated_range_violation_is_recorded_once() {
        let violation = RangeViolation {
            identity: id("g:c"),
            ranges: vec![VersionSpec::parse("[5.0,)").unwrap()],
            paths: vec![vec![id("g:a"), id("g:c")]],
            reason: RangeViolationReason::Unsatisfiable,
        };
        let mut diagnostics = Diagnostics::new();
        diagnostics.range_violation(violation.clone());
        diagnostics.range_violation(violation);
        assert_eq!(diagnostics.range_violations.len(), 1);
        assert!(!diagnostics.is_clean());
    }

    #[test]
    fn omission_display() {
        let omission = Omission {
            identity: id("g:x"),
            trail: vec![id("g:a"), id("g:b"), id("g:x")],
            reason: OmissionReason::Excluded {
                pattern: Exclusion::new("g", Some("x")),
            },
        };
        assert_eq!(omission.to_string(), "g:x excluded by g:x via g:a -> g:b -> g:x");
    }
}
