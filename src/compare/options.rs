//! Comparison options and their resolution into a [`ComparisonMode`].
//!
//! Options are resolved once per deduplication with this precedence:
//!
//! 1. a custom comparator
//! 2. a `compare` token (`"strict"`/`"==="` or `"loose"`/`"=="`)
//! 3. a `by` or `skip` path restriction
//! 4. full structural comparison, strict unless `strict` is `false`

use std::fmt;
use std::str::FromStr;

use super::path::PathSpecInput;
use super::projector::Projection;
use super::{Comparator, ComparisonMode, LeafEquality};
use crate::error::DedupError;
use crate::value::Value;

/// Tokens accepted for [`Compare::Strict`].
pub const STRICT_TOKENS: &[&str] = &["strict", "==="];

/// Tokens accepted for [`Compare::Loose`].
pub const LOOSE_TOKENS: &[&str] = &["loose", "=="];

/// Explicit comparison override.
#[derive(Debug, Clone)]
pub enum Compare {
    /// Shallow strict operator.
    Strict,
    /// Shallow loose (coercing) operator.
    Loose,
    /// Caller-supplied predicate.
    Custom(Comparator),
}

impl Compare {
    /// Wrap a predicate.
    pub fn custom(f: impl Fn(&Value, &Value) -> bool + 'static) -> Self {
        Self::Custom(Comparator::new(f))
    }

    /// Canonical token, or `None` for a custom predicate.
    #[must_use]
    pub fn token(&self) -> Option<&'static str> {
        match self {
            Self::Strict => Some("strict"),
            Self::Loose => Some("loose"),
            Self::Custom(_) => None,
        }
    }
}

impl fmt::Display for Compare {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token().unwrap_or("custom"))
    }
}

impl FromStr for Compare {
    type Err = DedupError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        let trimmed = token.trim();
        if STRICT_TOKENS.contains(&trimmed) {
            return Ok(Self::Strict);
        }
        if LOOSE_TOKENS.contains(&trimmed) {
            return Ok(Self::Loose);
        }
        Err(DedupError::UnknownCompareToken {
            token: token.to_string(),
            suggestion: closest_token(trimmed),
        })
    }
}

/// Closest known token within a small edit distance.
fn closest_token(token: &str) -> Option<String> {
    let lowered = token.to_lowercase();
    STRICT_TOKENS
        .iter()
        .chain(LOOSE_TOKENS)
        .map(|known| (known, strsim::levenshtein(&lowered, known)))
        .filter(|(_, distance)| *distance <= 2)
        .min_by_key(|(_, distance)| *distance)
        .map(|(known, _)| (*known).to_string())
}

/// Options controlling when two values count as equal.
///
/// # Example
///
/// ```
/// use nodups::compare::EqualOptions;
///
/// let options = EqualOptions::new().with_by("id");
/// assert!(options.resolve().is_ok());
///
/// let conflicting = EqualOptions::new().with_by("id").with_skip("meta");
/// assert!(conflicting.resolve().is_err());
/// ```
#[derive(Debug, Clone)]
pub struct EqualOptions {
    /// Explicit override; when set, `by` and `skip` are ignored
    pub compare: Option<Compare>,
    /// Strict primitive leaves for structural and restricted comparison
    pub strict: bool,
    /// Compare only these fields
    pub by: Option<PathSpecInput>,
    /// Compare everything but these fields
    pub skip: Option<PathSpecInput>,
}

impl Default for EqualOptions {
    fn default() -> Self {
        Self {
            compare: None,
            strict: true,
            by: None,
            skip: None,
        }
    }
}

impl EqualOptions {
    /// Create default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the comparison override.
    #[must_use]
    pub fn with_compare(mut self, compare: Compare) -> Self {
        self.compare = Some(compare);
        self
    }

    /// Use a caller-supplied predicate.
    #[must_use]
    pub fn with_comparator(self, f: impl Fn(&Value, &Value) -> bool + 'static) -> Self {
        self.with_compare(Compare::custom(f))
    }

    /// Set strict or loose primitive leaves.
    #[must_use]
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Restrict comparison to the given fields.
    #[must_use]
    pub fn with_by(mut self, by: impl Into<PathSpecInput>) -> Self {
        self.by = Some(by.into());
        self
    }

    /// Exclude the given fields from comparison.
    #[must_use]
    pub fn with_skip(mut self, skip: impl Into<PathSpecInput>) -> Self {
        self.skip = Some(skip.into());
        self
    }

    /// Resolve into a single comparison mode.
    ///
    /// # Errors
    ///
    /// Returns [`DedupError::ConflictingRestrictions`] if both `by` and
    /// `skip` are set without a `compare` override, or
    /// [`DedupError::InvalidPathSpec`] if the active path spec is malformed.
    pub fn resolve(&self) -> Result<ComparisonMode, DedupError> {
        if let Some(compare) = &self.compare {
            if self.by.is_some() || self.skip.is_some() {
                log::debug!("Ignoring by/skip restriction: compare is set to {compare}");
            }
            return Ok(match compare {
                Compare::Strict => ComparisonMode::Operator(LeafEquality::Strict),
                Compare::Loose => ComparisonMode::Operator(LeafEquality::Loose),
                Compare::Custom(comparator) => ComparisonMode::CustomFn(comparator.clone()),
            });
        }

        let leaf = LeafEquality::from_strict(self.strict);
        let projection = match (&self.by, &self.skip) {
            (Some(_), Some(_)) => return Err(DedupError::ConflictingRestrictions),
            (Some(by), None) => Projection::include(by)?,
            (None, Some(skip)) => Projection::exclude(skip)?,
            (None, None) => {
                return Ok(match leaf {
                    LeafEquality::Strict => ComparisonMode::StrictValue,
                    LeafEquality::Loose => ComparisonMode::LooseValue,
                });
            }
        };

        log::debug!(
            "Restricting comparison ({:?}) to paths: {}",
            projection.restriction,
            projection.tree.paths().join(", ")
        );
        Ok(ComparisonMode::PathRestricted { projection, leaf })
    }
}
