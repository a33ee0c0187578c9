//! Structured error handling for deduplication and comparison.

use std::path::PathBuf;

/// Errors that can occur while configuring or running a deduplication.
///
/// Comparison itself never fails: once a [`crate::compare::ComparisonMode`]
/// has been resolved, every equality check is a pure computation. Errors
/// surface while validating options, path specs and configuration.
#[derive(thiserror::Error, Debug)]
pub enum DedupError {
    /// A `by`/`skip` path element could not be turned into a field path.
    #[error("Invalid path spec: {reason}")]
    InvalidPathSpec {
        /// What was wrong with the element
        reason: String,
    },

    /// Both an inclusion (`by`) and an exclusion (`skip`) restriction were given.
    #[error("Conflicting restrictions: 'by' and 'skip' cannot be combined")]
    ConflictingRestrictions,

    /// A `compare` token was not one of the known operators.
    #[error("Unknown compare token '{token}'{}", suggestion_hint(.suggestion))]
    UnknownCompareToken {
        /// The token as supplied
        token: String,
        /// Closest known token, if any is reasonably close
        suggestion: Option<String>,
    },

    /// A cyclic value was asked to convert into a tree-shaped format.
    #[error("Value contains a reference cycle")]
    CyclicValue,

    /// Configuration could not be loaded or extracted.
    #[error("Configuration error: {0}")]
    Config(Box<figment::Error>),

    /// Configuration could not be written.
    #[error("Failed to write configuration to {path}: {source}")]
    ConfigWrite {
        /// Destination path
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Configuration could not be encoded as TOML.
    #[error("Failed to encode configuration: {0}")]
    ConfigEncode(#[from] toml::ser::Error),

    /// No platform configuration directory could be determined.
    #[error("Could not determine a configuration directory")]
    NoConfigDir,
}

impl DedupError {
    /// Create an [`DedupError::InvalidPathSpec`] with the given reason.
    pub(crate) fn invalid_path(reason: impl Into<String>) -> Self {
        Self::InvalidPathSpec {
            reason: reason.into(),
        }
    }

    /// Get the machine-readable code prefix.
    #[must_use]
    pub fn code_prefix(&self) -> &'static str {
        match self {
            Self::InvalidPathSpec { .. } => "ND001",
            Self::ConflictingRestrictions => "ND002",
            Self::UnknownCompareToken { .. } => "ND003",
            Self::CyclicValue => "ND004",
            Self::Config(_) => "ND010",
            Self::ConfigWrite { .. } => "ND011",
            Self::ConfigEncode(_) => "ND012",
            Self::NoConfigDir => "ND013",
        }
    }
}

fn suggestion_hint(suggestion: &Option<String>) -> String {
    suggestion
        .as_ref()
        .map(|s| format!(" (did you mean '{s}'?)"))
        .unwrap_or_default()
}

impl From<figment::Error> for DedupError {
    fn from(err: figment::Error) -> Self {
        Self::Config(Box::new(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_token_message_with_suggestion() {
        let err = DedupError::UnknownCompareToken {
            token: "lose".to_string(),
            suggestion: Some("loose".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "Unknown compare token 'lose' (did you mean 'loose'?)"
        );
    }

    #[test]
    fn test_unknown_token_message_without_suggestion() {
        let err = DedupError::UnknownCompareToken {
            token: "xyzzy".to_string(),
            suggestion: None,
        };
        assert_eq!(err.to_string(), "Unknown compare token 'xyzzy'");
    }

    #[test]
    fn test_code_prefixes_are_distinct() {
        let errors = [
            DedupError::invalid_path("empty"),
            DedupError::ConflictingRestrictions,
            DedupError::CyclicValue,
        ];
        let codes: Vec<_> = errors.iter().map(DedupError::code_prefix).collect();
        assert_eq!(codes, vec!["ND001", "ND002", "ND004"]);
    }
}
