//! Cycle detection over dependency trails.

use std::fmt;

use mediant_core::coordinate::ConflictId;
use thiserror::Error;

/// Re-entering an identity that is already on the trail.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("dependency cycle: {} -> {}", DisplayTrail(.trail), .closing.key())]
pub struct CycleError {
    pub trail: Vec<ConflictId>,
    pub closing: ConflictId,
}

/// Extend `trail` with `candidate`, or fail if `candidate` is already on it.
pub fn check_and_extend(
    trail: &[ConflictId],
    candidate: &ConflictId,
) -> Result<Vec<ConflictId>, CycleError> {
    if trail.contains(candidate) {
        return Err(CycleError {
            trail: trail.to_vec(),
            closing: candidate.clone(),
        });
    }
    let mut extended = Vec::with_capacity(trail.len() + 1);
    extended.extend_from_slice(trail);
    extended.push(candidate.clone());
    Ok(extended)
}

/// Renders a trail as `a -> b -> c` using `group:artifact` keys.
pub struct DisplayTrail<'a>(pub &'a [ConflictId]);

impl fmt::Display for DisplayTrail<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, id) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" -> ")?;
            }
            f.write_str(&id.key())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> ConflictId {
        ConflictId::parse(s).unwrap()
    }

    #[test]
    fn extends_fresh_identity() {
        let trail = vec![id("g:a"), id("g:b")];
        let extended = check_and_extend(&trail, &id("g:c")).unwrap();
        assert_eq!(extended, vec![id("g:a"), id("g:b"), id("g:c")]);
    }

    #[test]
    fn detects_reentry() {
        let trail = vec![id("g:a"), id("g:b")];
        let err = check_and_extend(&trail, &id("g:a")).unwrap_err();
        assert_eq!(err.closing, id("g:a"));
        assert_eq!(err.trail, trail);
        assert_eq!(err.to_string(), "dependency cycle: g:a -> g:b -> g:a");
    }

    #[test]
    fn classifier_is_a_different_identity() {
        let trail = vec![id("g:a")];
        assert!(check_and_extend(&trail, &id("g:a:jar:tests")).is_ok());
    }
}
