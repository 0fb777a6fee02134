//! Error types for lazy attributes
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Attr Error Enum ==
/// Unified error type for memoization and precondition checks.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AttrError {
    /// Programming mistake at the call site (missing block, bad predicate)
    #[error("Invalid usage: {0}")]
    InvalidUsage(String),

    /// Attribute value failed its required check
    #[error("Attribute `{name}` {verb} be {predicate}: {value}")]
    RequirementFailed {
        name: String,
        verb: &'static str,
        predicate: String,
        value: String,
    },

    /// Slot holds a value of another type than the one requested
    #[error("Attribute `{name}` is not a `{expected}`")]
    TypeMismatch {
        name: String,
        expected: &'static str,
    },

    /// Write-through setter returned without populating its slot
    #[error("Setter for `{0}` did not store a value")]
    SetterDidNotStore(String),

    /// Owner type installed twice under the strict policy
    #[error("Already installed: {0}")]
    AlreadyInstalled(&'static str),
}

impl AttrError {
    /// Returns true for errors caused by a mistake at the call site rather
    /// than by the attribute's value.
    pub fn is_usage_error(&self) -> bool {
        !matches!(self, AttrError::RequirementFailed { .. })
    }
}

// == Result Type Alias ==
/// Convenience Result type for lazy attributes.
pub type Result<T> = std::result::Result<T, AttrError>;
