//! Maven version parsing, comparison, and range algebra.
//!
//! Maven versions use a custom ordering that differs from semver:
//! - Items are split on `.`, `-` and `+`, and at every switch between
//!   digits and letters; `-` and a switch open a nested list
//! - Numeric items compare as numbers of any length
//! - Qualifiers have a special ordering:
//!   `alpha` < `beta` < `milestone` < `rc` < `snapshot` < unknown < `""` (release) < `sp`
//! - Unknown qualifiers compare case-insensitively and lexically
//! - Trailing zeros and release qualifiers are dropped, so `1`, `1.0.0` and
//!   `1.0-ga` are the same version
//!
//! A [`VersionSpec`] is either a soft recommendation (a bare version) or a
//! range made of one or more restriction sets such as `[1.0,2.0),[3.0,)`.

use std::cmp::Ordering;
use std::fmt;

use mediant_util::errors::MediantError;
use serde::{Serialize, Serializer};
use thiserror::Error;

/// A parsed Maven version with comparable items.
#[derive(Debug, Clone)]
pub struct MavenVersion {
    pub original: String,
    items: Vec<Item>,
}

impl PartialEq for MavenVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for MavenVersion {}

#[derive(Debug, Clone)]
enum Item {
    /// Digits without leading zeros, `"0"` for zero.
    Number(String),
    Qualifier(Qualifier),
    List(Vec<Item>),
}

/// Well-known Maven qualifiers with defined ordering.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum Qualifier {
    Alpha,
    Beta,
    Milestone,
    Rc,
    Snapshot,
    Other(String),
    Release,
    Sp,
}

impl MavenVersion {
    pub fn parse(version: &str) -> Self {
        Self {
            original: version.to_string(),
            items: parse_items(version),
        }
    }

    pub fn is_snapshot(&self) -> bool {
        self.original.ends_with("-SNAPSHOT")
    }
}

impl fmt::Display for MavenVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.original)
    }
}

impl Serialize for MavenVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.original)
    }
}

impl Ord for MavenVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        compare_lists(&self.items, &other.items)
    }
}

impl PartialOrd for MavenVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Item {
    fn number(digits: &str) -> Self {
        match digits.trim_start_matches('0') {
            "" => Item::Number("0".to_string()),
            trimmed => Item::Number(trimmed.to_string()),
        }
    }

    /// `a1`, `b1` and `m1` abbreviate alpha, beta and milestone.
    fn qualifier(text: &str, followed_by_digit: bool) -> Self {
        let qualifier = match text {
            "a" if followed_by_digit => Qualifier::Alpha,
            "b" if followed_by_digit => Qualifier::Beta,
            "m" if followed_by_digit => Qualifier::Milestone,
            "alpha" => Qualifier::Alpha,
            "beta" => Qualifier::Beta,
            "milestone" => Qualifier::Milestone,
            "rc" | "cr" => Qualifier::Rc,
            "snapshot" => Qualifier::Snapshot,
            "" | "ga" | "final" | "release" => Qualifier::Release,
            "sp" => Qualifier::Sp,
            other => Qualifier::Other(other.to_string()),
        };
        Item::Qualifier(qualifier)
    }

    fn token(is_digit: bool, text: &str) -> Self {
        if is_digit {
            Item::number(text)
        } else {
            Item::qualifier(text, false)
        }
    }

    fn is_null(&self) -> bool {
        match self {
            Item::Number(n) => n == "0",
            Item::Qualifier(q) => *q == Qualifier::Release,
            Item::List(items) => items.is_empty(),
        }
    }

    /// Compare against an item the other version does not have.
    fn compare_to_missing(&self) -> Ordering {
        match self {
            Item::Number(n) if n == "0" => Ordering::Equal,
            Item::Number(_) => Ordering::Greater,
            Item::Qualifier(q) => q.cmp(&Qualifier::Release),
            Item::List(items) => items
                .iter()
                .map(Item::compare_to_missing)
                .find(|ord| ord.is_ne())
                .unwrap_or(Ordering::Equal),
        }
    }

    fn compare(&self, other: &Item) -> Ordering {
        match (self, other) {
            (Item::Number(a), Item::Number(b)) => a.len().cmp(&b.len()).then_with(|| a.cmp(b)),
            (Item::Number(_), _) => Ordering::Greater,
            (_, Item::Number(_)) => Ordering::Less,
            (Item::Qualifier(a), Item::Qualifier(b)) => a.cmp(b),
            (Item::Qualifier(_), Item::List(_)) => Ordering::Less,
            (Item::List(_), Item::Qualifier(_)) => Ordering::Greater,
            (Item::List(a), Item::List(b)) => compare_lists(a, b),
        }
    }
}

fn compare_lists(a: &[Item], b: &[Item]) -> Ordering {
    (0..a.len().max(b.len()))
        .map(|i| match (a.get(i), b.get(i)) {
            (Some(x), Some(y)) => x.compare(y),
            (Some(x), None) => x.compare_to_missing(),
            (None, Some(y)) => y.compare_to_missing().reverse(),
            (None, None) => Ordering::Equal,
        })
        .find(|ord| ord.is_ne())
        .unwrap_or(Ordering::Equal)
}

/// Drop trailing null items; a null item directly before a nested list goes too.
fn normalize(items: &mut Vec<Item>) {
    let mut i = items.len();
    while i > 0 {
        i -= 1;
        if items[i].is_null() {
            items.remove(i);
        } else if !matches!(items[i], Item::List(_)) {
            break;
        }
    }
}

/// The list being filled plus the lists it is nested in.
struct ItemStack {
    current: Vec<Item>,
    parents: Vec<Vec<Item>>,
}

impl ItemStack {
    fn push(&mut self, item: Item) {
        self.current.push(item);
    }

    fn open(&mut self) {
        self.parents.push(std::mem::take(&mut self.current));
    }

    fn close(mut self) -> Vec<Item> {
        while let Some(mut parent) = self.parents.pop() {
            normalize(&mut self.current);
            parent.push(Item::List(self.current));
            self.current = parent;
        }
        normalize(&mut self.current);
        self.current
    }
}

fn parse_items(version: &str) -> Vec<Item> {
    let version = version.to_lowercase();
    let mut stack = ItemStack {
        current: Vec::new(),
        parents: Vec::new(),
    };
    let mut is_digit = false;
    let mut start = 0;

    for (i, c) in version.char_indices() {
        if matches!(c, '.' | '-' | '+') {
            if i == start {
                stack.push(Item::number("0"));
            } else {
                stack.push(Item::token(is_digit, &version[start..i]));
            }
            start = i + 1;
            if c != '.' || !is_digit {
                stack.open();
            }
        } else if c.is_ascii_digit() {
            if !is_digit && i > start {
                // `1.0.RC1` reads like `1.0-RC-1`
                if !stack.current.is_empty() {
                    stack.open();
                }
                stack.push(Item::qualifier(&version[start..i], true));
                start = i;
                stack.open();
            }
            is_digit = true;
        } else {
            if is_digit && i > start {
                stack.push(Item::number(&version[start..i]));
                start = i;
                stack.open();
            }
            is_digit = false;
        }
    }

    if version.len() > start {
        if !is_digit && !stack.current.is_empty() {
            stack.open();
        }
        stack.push(Item::token(is_digit, &version[start..]));
    }
    stack.close()
}

/// One end of a restriction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bound {
    pub version: MavenVersion,
    pub inclusive: bool,
}

/// A single interval. `None` on either side means unbounded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Restriction {
    pub lower: Option<Bound>,
    pub upper: Option<Bound>,
}

impl Restriction {
    /// `[version]`
    pub fn exactly(version: MavenVersion) -> Self {
        Self {
            lower: Some(Bound {
                version: version.clone(),
                inclusive: true,
            }),
            upper: Some(Bound {
                version,
                inclusive: true,
            }),
        }
    }

    /// Check if a version satisfies this restriction.
    pub fn contains(&self, version: &MavenVersion) -> bool {
        if let Some(ref lower) = self.lower {
            match version.cmp(&lower.version) {
                Ordering::Less => return false,
                Ordering::Equal if !lower.inclusive => return false,
                _ => {}
            }
        }
        if let Some(ref upper) = self.upper {
            match version.cmp(&upper.version) {
                Ordering::Greater => return false,
                Ordering::Equal if !upper.inclusive => return false,
                _ => {}
            }
        }
        true
    }

    /// The overlap of two restrictions, or `None` when they are disjoint.
    pub fn intersect(&self, other: &Restriction) -> Option<Restriction> {
        let lower = tighter(&self.lower, &other.lower, Ordering::Greater);
        let upper = tighter(&self.upper, &other.upper, Ordering::Less);
        if let (Some(l), Some(u)) = (&lower, &upper) {
            match l.version.cmp(&u.version) {
                Ordering::Greater => return None,
                Ordering::Equal if !(l.inclusive && u.inclusive) => return None,
                _ => {}
            }
        }
        Some(Restriction { lower, upper })
    }

    /// Whether `self` ends strictly before `next` starts.
    fn precedes(&self, next: &Restriction) -> bool {
        match (&self.upper, &next.lower) {
            (Some(u), Some(l)) => match u.version.cmp(&l.version) {
                Ordering::Less => true,
                Ordering::Equal => !(u.inclusive && l.inclusive),
                Ordering::Greater => false,
            },
            _ => false,
        }
    }
}

/// Pick the more restrictive of two bounds. `wins` is the ordering a
/// version must have against the other to be the tighter one.
fn tighter(a: &Option<Bound>, b: &Option<Bound>, wins: Ordering) -> Option<Bound> {
    match (a, b) {
        (None, None) => None,
        (Some(x), None) | (None, Some(x)) => Some(x.clone()),
        (Some(x), Some(y)) => match x.version.cmp(&y.version) {
            Ordering::Equal => Some(Bound {
                version: x.version.clone(),
                inclusive: x.inclusive && y.inclusive,
            }),
            ord if ord == wins => Some(x.clone()),
            _ => Some(y.clone()),
        },
    }
}

impl fmt::Display for Restriction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let (Some(l), Some(u)) = (&self.lower, &self.upper) {
            if l.version == u.version && l.inclusive && u.inclusive {
                return write!(f, "[{}]", l.version);
            }
        }
        match &self.lower {
            Some(l) => write!(f, "{}{}", if l.inclusive { '[' } else { '(' }, l.version)?,
            None => f.write_str("(")?,
        }
        f.write_str(",")?;
        match &self.upper {
            Some(u) => write!(f, "{}{}", u.version, if u.inclusive { ']' } else { ')' }),
            None => f.write_str(")"),
        }
    }
}

/// A union of disjoint, ordered restrictions plus an optional recommended
/// version that lies inside them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionRange {
    pub restrictions: Vec<Restriction>,
    pub recommended: Option<MavenVersion>,
}

impl VersionRange {
    pub fn contains(&self, version: &MavenVersion) -> bool {
        self.restrictions.iter().any(|r| r.contains(version))
    }

    fn with_recommended(&self, candidates: [Option<&MavenVersion>; 2]) -> VersionRange {
        let recommended = candidates
            .into_iter()
            .flatten()
            .find(|v| self.contains(v))
            .cloned();
        VersionRange {
            restrictions: self.restrictions.clone(),
            recommended,
        }
    }
}

/// A parsed version specifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionSpec {
    /// A bare version: a recommendation that gives way to any range.
    Soft(MavenVersion),
    /// A bracketed range.
    Range(VersionRange),
}

/// Two specifiers with no version in common.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{a} and {b} have no version in common")]
pub struct RangeConflict {
    pub a: VersionSpec,
    pub b: VersionSpec,
}

impl VersionSpec {
    /// Parse a bare version or a bracketed range such as `[1.0,2.0)`,
    /// `(,1.0]`, `[1.0,)`, `[1.5]` or `[1.0,2.0),[3.0,)`.
    pub fn parse(spec: &str) -> Result<Self, MediantError> {
        let s = spec.trim();
        if s.is_empty() {
            return Err(MediantError::malformed_version(spec, "empty version"));
        }
        if !s.starts_with('[') && !s.starts_with('(') {
            check_token(spec, s)?;
            return Ok(VersionSpec::Soft(MavenVersion::parse(s)));
        }

        let mut restrictions: Vec<Restriction> = Vec::new();
        let mut rest = s;
        while !rest.is_empty() {
            if !rest.starts_with('[') && !rest.starts_with('(') {
                return Err(MediantError::malformed_version(
                    spec,
                    "only bracketed sets may follow a range",
                ));
            }
            let close = rest
                .find(|c| c == ']' || c == ')')
                .ok_or_else(|| MediantError::malformed_version(spec, "unclosed range"))?;
            let restriction = parse_restriction(spec, &rest[..=close])?;
            if let Some(previous) = restrictions.last() {
                if !previous.precedes(&restriction) {
                    return Err(MediantError::malformed_version(
                        spec,
                        "range sets overlap or are out of order",
                    ));
                }
            }
            restrictions.push(restriction);

            rest = rest[close + 1..].trim_start();
            if let Some(after) = rest.strip_prefix(',') {
                rest = after.trim_start();
                if rest.is_empty() {
                    return Err(MediantError::malformed_version(spec, "trailing comma"));
                }
            } else if !rest.is_empty() {
                return Err(MediantError::malformed_version(
                    spec,
                    "expected ',' between range sets",
                ));
            }
        }

        Ok(VersionSpec::Range(VersionRange {
            restrictions,
            recommended: None,
        }))
    }

    /// Whether `version` is acceptable. A soft recommendation accepts anything.
    pub fn contains(&self, version: &MavenVersion) -> bool {
        match self {
            VersionSpec::Soft(_) => true,
            VersionSpec::Range(range) => range.contains(version),
        }
    }

    pub fn is_range(&self) -> bool {
        matches!(self, VersionSpec::Range(_))
    }

    /// The version this spec would pick without enumerating a repository.
    pub fn recommended(&self) -> Option<&MavenVersion> {
        match self {
            VersionSpec::Soft(v) => Some(v),
            VersionSpec::Range(range) => range.recommended.as_ref(),
        }
    }

    /// The narrowest spec satisfying both `self` and `other`.
    ///
    /// Soft recommendations never conflict: they survive as the
    /// recommendation of a range when they lie inside it, `self`'s first.
    pub fn intersect(&self, other: &VersionSpec) -> Result<VersionSpec, RangeConflict> {
        match (self, other) {
            (VersionSpec::Soft(a), VersionSpec::Soft(_)) => Ok(VersionSpec::Soft(a.clone())),
            (VersionSpec::Soft(a), VersionSpec::Range(r)) => Ok(VersionSpec::Range(
                r.with_recommended([Some(a), r.recommended.as_ref()]),
            )),
            (VersionSpec::Range(r), VersionSpec::Soft(b)) => Ok(VersionSpec::Range(
                r.with_recommended([r.recommended.as_ref(), Some(b)]),
            )),
            (VersionSpec::Range(a), VersionSpec::Range(b)) => {
                let restrictions: Vec<Restriction> = a
                    .restrictions
                    .iter()
                    .flat_map(|ra| b.restrictions.iter().filter_map(|rb| ra.intersect(rb)))
                    .collect();
                if restrictions.is_empty() {
                    return Err(RangeConflict {
                        a: self.clone(),
                        b: other.clone(),
                    });
                }
                let narrowed = VersionRange {
                    restrictions,
                    recommended: None,
                };
                Ok(VersionSpec::Range(narrowed.with_recommended([
                    a.recommended.as_ref(),
                    b.recommended.as_ref(),
                ])))
            }
        }
    }

    /// Pick a concrete version: the recommendation when there is one,
    /// otherwise the highest of `available` inside the range.
    pub fn select_version(&self, available: &[MavenVersion]) -> Option<MavenVersion> {
        match self {
            VersionSpec::Soft(v) => Some(v.clone()),
            VersionSpec::Range(range) => range.recommended.clone().or_else(|| {
                available
                    .iter()
                    .filter(|v| range.contains(v))
                    .max()
                    .cloned()
            }),
        }
    }
}

impl fmt::Display for VersionSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionSpec::Soft(v) => write!(f, "{v}"),
            VersionSpec::Range(range) => {
                for (i, r) in range.restrictions.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{r}")?;
                }
                Ok(())
            }
        }
    }
}

impl Serialize for VersionSpec {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

fn parse_restriction(spec: &str, set: &str) -> Result<Restriction, MediantError> {
    let lower_inclusive = set.starts_with('[');
    let upper_inclusive = set.ends_with(']');
    let inner = &set[1..set.len() - 1];

    let Some((lower, upper)) = inner.split_once(',') else {
        let token = inner.trim();
        check_token(spec, token)?;
        if !(lower_inclusive && upper_inclusive) {
            return Err(MediantError::malformed_version(
                spec,
                "a single version must be written as [version]",
            ));
        }
        return Ok(Restriction::exactly(MavenVersion::parse(token)));
    };

    let (lower, upper) = (lower.trim(), upper.trim());
    if lower.is_empty() && upper.is_empty() {
        return Err(MediantError::malformed_version(
            spec,
            "a range must bound at least one side",
        ));
    }
    let bound = |token: &str, inclusive: bool| -> Result<Option<Bound>, MediantError> {
        if token.is_empty() {
            return Ok(None);
        }
        check_token(spec, token)?;
        Ok(Some(Bound {
            version: MavenVersion::parse(token),
            inclusive,
        }))
    };
    let restriction = Restriction {
        lower: bound(lower, lower_inclusive)?,
        upper: bound(upper, upper_inclusive)?,
    };

    if let (Some(l), Some(u)) = (&restriction.lower, &restriction.upper) {
        match l.version.cmp(&u.version) {
            Ordering::Greater => {
                return Err(MediantError::malformed_version(
                    spec,
                    "lower bound is greater than upper bound",
                ))
            }
            Ordering::Equal if !(l.inclusive && u.inclusive) => {
                return Err(MediantError::malformed_version(
                    spec,
                    "range contains no version",
                ))
            }
            _ => {}
        }
    }
    Ok(restriction)
}

fn check_token(spec: &str, token: &str) -> Result<(), MediantError> {
    if token.is_empty() {
        return Err(MediantError::malformed_version(spec, "empty version"));
    }
    if let Some(c) = token
        .chars()
        .find(|c| c.is_whitespace() || "[](),".contains(*c))
    {
        return Err(MediantError::malformed_version(
            spec,
            format!("unexpected '{c}' in version '{token}'"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> MavenVersion {
        MavenVersion::parse(s)
    }

    fn spec(s: &str) -> VersionSpec {
        VersionSpec::parse(s).unwrap()
    }

    fn versions(list: &[&str]) -> Vec<MavenVersion> {
        list.iter().map(|s| v(s)).collect()
    }

    #[test]
    fn basic_ordering() {
        assert!(v("1.0") < v("2.0"));
        assert!(v("1.0.0") < v("1.0.1"));
        assert!(v("1.0.1") < v("1.1.0"));
        assert!(v("1.9") < v("1.10"));
    }

    #[test]
    fn qualifier_ordering() {
        assert!(v("1.0-alpha") < v("1.0-beta"));
        assert!(v("1.0-beta") < v("1.0-rc"));
        assert!(v("1.0-rc") < v("1.0"));
        assert!(v("1.0") < v("1.0-sp"));
    }

    #[test]
    fn snapshot_before_release() {
        let snap = v("1.0-SNAPSHOT");
        assert!(snap.is_snapshot());
        assert!(snap < v("1.0"));
        assert!(v("1.0-rc") < snap);
    }

    #[test]
    fn trailing_zeros_equal() {
        assert_eq!(v("1.0"), v("1.0.0"));
        assert_eq!(v("1"), v("1.0-ga"));
    }

    #[test]
    fn unknown_qualifiers_are_lexical() {
        assert!(v("1.0-android") < v("1.0-jre"));
        assert!(v("1.0.0-jre") < v("1.0.0"));
        assert!(v("31.0-jre") < v("32.0-jre"));
    }

    #[test]
    fn ordering_is_total_on_a_mixed_set() {
        let mut list = versions(&[
            "2.0", "1.0-SNAPSHOT", "1.0-jre", "1.0", "1.0-alpha", "1.0-sp", "1.0.1",
        ]);
        list.sort();
        let sorted: Vec<String> = list.iter().map(|x| x.to_string()).collect();
        assert_eq!(
            sorted,
            ["1.0-alpha", "1.0-SNAPSHOT", "1.0-jre", "1.0", "1.0-sp", "1.0.1", "2.0"]
        );
    }

    #[test]
    fn equal_versions_order_alike() {
        let list = versions(&[
            "1", "1.0", "1.0.0", "1-ga", "1.0-ga", "1.0-final", "1.0-sp", "1.0.0-sp", "1-sp",
            "1.0-alpha", "1.0-rc", "1.0.1", "1-1", "1.0-jre", "1.0-SNAPSHOT", "1.0.0.RC1",
            "1.0.0-RC2", "1.ga.5", "1.0-alpha1",
        ]);
        for a in &list {
            for b in &list {
                assert_eq!(a.cmp(b), b.cmp(a).reverse(), "{a} vs {b}");
                for c in &list {
                    if a == b {
                        assert_eq!(a.cmp(c), b.cmp(c), "{a} == {b} but differ against {c}");
                    }
                    if a <= b && b <= c {
                        assert!(a <= c, "{a} <= {b} <= {c}");
                    }
                }
            }
        }
        assert_eq!(v("1.0"), v("1.0-ga"));
        assert!(v("1.0.0") < v("1.0-sp"));
        assert!(spec("[1.0-sp,)").contains(&v("1.0-sp")));
        assert!(!spec("[1.0-sp,)").contains(&v("1.0.0")));
    }

    #[test]
    fn letters_and_digits_split() {
        assert!(v("1.0-alpha1") < v("1.0-rc"));
        assert!(v("1.0-alpha1") < v("1.0-beta-1"));
        assert!(v("1.0-alpha1") < v("1.0-alpha2"));
        assert_eq!(v("1.0-a1"), v("1.0-alpha-1"));
        assert!(v("1.0.0.RC1") < v("1.0.0-RC2"));
        assert!(v("1.0-rc1") < v("1.0"));
    }

    #[test]
    fn long_numbers_compare_numerically() {
        assert!(v("1.99999999999999999999") > v("1.1"));
        assert!(v("1.99999999999999999999") < v("1.100000000000000000000"));
        assert_eq!(v("1.007"), v("1.7"));
    }

    #[test]
    fn parse_soft_version() {
        assert_eq!(spec("1.2.3"), VersionSpec::Soft(v("1.2.3")));
        assert!(!spec("1.2.3").is_range());
    }

    #[test]
    fn parse_ranges() {
        let r = spec("[1.0,2.0)");
        assert!(r.contains(&v("1.0")));
        assert!(r.contains(&v("1.9.9")));
        assert!(!r.contains(&v("2.0")));

        let r = spec("(,1.0]");
        assert!(r.contains(&v("0.1")));
        assert!(r.contains(&v("1.0")));
        assert!(!r.contains(&v("1.0.1")));

        let r = spec("[1.0,)");
        assert!(r.contains(&v("99")));
        assert!(!r.contains(&v("0.9")));

        let r = spec("[1.5]");
        assert!(r.contains(&v("1.5")));
        assert!(!r.contains(&v("1.6")));
    }

    #[test]
    fn parse_multiple_sets() {
        let r = spec("(,1.0],[1.2,)");
        assert!(r.contains(&v("0.5")));
        assert!(!r.contains(&v("1.1")));
        assert!(r.contains(&v("1.2")));
        assert_eq!(r.to_string(), "(,1.0],[1.2,)");
    }

    #[test]
    fn malformed_specs() {
        for bad in [
            "", " ", "[1.0", "[1.0,2.0", "(1.0)", "[1.0)", "[2.0,1.0]", "[1.0,1.0)", "[,]",
            "[1.0,2.0,3.0]", "[1.0,2.0]x", "[1.0,2.0],", "[1.0,2.0],[1.5,3.0]", "1.0 2.0",
            "1.0)", "[1.0,2.0] [3.0,)",
        ] {
            let err = VersionSpec::parse(bad);
            assert!(
                matches!(err, Err(MediantError::MalformedVersion { .. })),
                "expected {bad:?} to be rejected, got {err:?}"
            );
        }
    }

    #[test]
    fn display_round_trips() {
        for text in ["[1.0,2.0)", "(,1.0]", "[1.0,)", "[1.5]", "1.2-SNAPSHOT"] {
            assert_eq!(spec(text).to_string(), text);
        }
    }

    #[test]
    fn intersect_ranges() {
        let narrowed = spec("[1.0,3.0]").intersect(&spec("[2.0,2.5]")).unwrap();
        assert_eq!(narrowed.to_string(), "[2.0,2.5]");

        let narrowed = spec("[1.0,2.0)").intersect(&spec("(1.5,3.0]")).unwrap();
        assert_eq!(narrowed.to_string(), "(1.5,2.0)");
    }

    #[test]
    fn intersect_touching_bounds() {
        let narrowed = spec("[1.0,2.0]").intersect(&spec("[2.0,3.0]")).unwrap();
        assert_eq!(narrowed.to_string(), "[2.0]");

        let conflict = spec("[1.0,2.0)").intersect(&spec("[2.0,3.0]"));
        assert!(conflict.is_err());
    }

    #[test]
    fn intersect_disjoint_reports_both_sides() {
        let conflict = spec("[2.4,3.0]").intersect(&spec("[1.0,2.0]")).unwrap_err();
        assert_eq!(conflict.a.to_string(), "[2.4,3.0]");
        assert_eq!(conflict.b.to_string(), "[1.0,2.0]");
        assert_eq!(
            conflict.to_string(),
            "[2.4,3.0] and [1.0,2.0] have no version in common"
        );
    }

    #[test]
    fn intersect_multi_set_ranges() {
        let narrowed = spec("[1.0,2.0),[3.0,4.0)")
            .intersect(&spec("[1.5,3.5]"))
            .unwrap();
        assert_eq!(narrowed.to_string(), "[1.5,2.0),[3.0,3.5]");
    }

    #[test]
    fn soft_versions_never_conflict() {
        assert_eq!(spec("3.0").intersect(&spec("2.0")).unwrap(), spec("3.0"));
    }

    #[test]
    fn soft_inside_range_becomes_recommendation() {
        let narrowed = spec("2.0").intersect(&spec("[1.0,3.0]")).unwrap();
        assert!(narrowed.is_range());
        assert_eq!(narrowed.recommended(), Some(&v("2.0")));

        let narrowed = spec("[1.0,3.0]").intersect(&spec("2.0")).unwrap();
        assert_eq!(narrowed.recommended(), Some(&v("2.0")));
    }

    #[test]
    fn soft_outside_range_is_dropped() {
        let narrowed = spec("5.0").intersect(&spec("[1.0,3.0]")).unwrap();
        assert_eq!(narrowed.recommended(), None);
        assert_eq!(narrowed.to_string(), "[1.0,3.0]");
    }

    #[test]
    fn recommendation_outside_narrowed_range_is_dropped() {
        let with_rec = spec("2.0").intersect(&spec("[1.0,3.0]")).unwrap();
        let narrowed = with_rec.intersect(&spec("[2.5,3.0]")).unwrap();
        assert_eq!(narrowed.recommended(), None);
    }

    #[test]
    fn select_highest_in_range() {
        let available = versions(&["1.0", "2.0", "2.5", "3.0"]);
        let selected = spec("[2.0,2.5]").select_version(&available);
        assert_eq!(selected, Some(v("2.5")));

        let selected = spec("[1.0,)").select_version(&available);
        assert_eq!(selected, Some(v("3.0")));
    }

    #[test]
    fn select_prefers_recommendation() {
        let available = versions(&["1.0", "2.0", "3.0"]);
        let narrowed = spec("2.0").intersect(&spec("[1.0,3.0]")).unwrap();
        assert_eq!(narrowed.select_version(&available), Some(v("2.0")));
    }

    #[test]
    fn select_soft_ignores_available() {
        assert_eq!(spec("4.2").select_version(&[]), Some(v("4.2")));
    }

    #[test]
    fn select_none_when_nothing_fits() {
        let available = versions(&["1.0", "3.0"]);
        assert_eq!(spec("[2.0,2.5]").select_version(&available), None);
        assert_eq!(spec("[2.0,2.5]").select_version(&[]), None);
    }
}
