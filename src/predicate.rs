//! Predicate Module
//!
//! Parses predicate tokens such as `present?` or `not_empty?` and evaluates
//! them against attribute values.

use std::any::type_name;
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

use tracing::debug;

use crate::error::{AttrError, Result};

/// Prefix that turns a predicate token into its negation.
pub const NEGATION_PREFIX: &str = "not_";

// == Checkable ==
/// Queries a value can answer for precondition checks.
///
/// Every method has a default, so implementors only override what makes sense
/// for their type. A query returning `None` is not supported by the type and
/// fails the check with an invalid-usage error.
pub trait Checkable: fmt::Debug {
    /// Value is absent.
    fn check_nil(&self) -> bool {
        false
    }

    /// Value has no elements.
    fn check_empty(&self) -> Option<bool> {
        None
    }

    /// Value is nil, empty, or otherwise carries no information.
    fn check_blank(&self) -> bool {
        self.check_nil() || self.check_empty() == Some(true)
    }

    /// Value passes its own validation.
    fn check_valid(&self) -> Option<bool> {
        None
    }

    /// Sign of a numeric value relative to zero.
    fn check_sign(&self) -> Option<Ordering> {
        None
    }
}

// == Predicate ==
/// Supported predicate queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Predicate {
    Nil,
    Empty,
    Blank,
    Present,
    Valid,
    Zero,
    Positive,
    Negative,
}

impl Predicate {
    pub const ALL: [Predicate; 8] = [
        Predicate::Nil,
        Predicate::Empty,
        Predicate::Blank,
        Predicate::Present,
        Predicate::Valid,
        Predicate::Zero,
        Predicate::Positive,
        Predicate::Negative,
    ];

    /// Name as it appears in tokens and error messages, without `?`.
    pub fn name(self) -> &'static str {
        match self {
            Predicate::Nil => "nil",
            Predicate::Empty => "empty",
            Predicate::Blank => "blank",
            Predicate::Present => "present",
            Predicate::Valid => "valid",
            Predicate::Zero => "zero",
            Predicate::Positive => "positive",
            Predicate::Negative => "negative",
        }
    }

    /// Runs the query. `None` means the value's type does not support it.
    pub fn evaluate<V: Checkable + ?Sized>(self, value: &V) -> Option<bool> {
        match self {
            Predicate::Nil => Some(value.check_nil()),
            Predicate::Empty => value.check_empty(),
            Predicate::Blank => Some(value.check_blank()),
            Predicate::Present => Some(!value.check_blank()),
            Predicate::Valid => value.check_valid(),
            Predicate::Zero => value.check_sign().map(|sign| sign == Ordering::Equal),
            Predicate::Positive => value.check_sign().map(|sign| sign == Ordering::Greater),
            Predicate::Negative => value.check_sign().map(|sign| sign == Ordering::Less),
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Predicate {
    type Err = AttrError;

    /// Accepts the bare name or the name with a trailing `?`.
    fn from_str(token: &str) -> Result<Self> {
        let name = token.strip_suffix('?').unwrap_or(token);
        Predicate::ALL
            .into_iter()
            .find(|predicate| predicate.name() == name)
            .ok_or_else(|| AttrError::InvalidUsage(format!("Unknown predicate: {:?}", token)))
    }
}

// == Requirement ==
/// A parsed predicate token: which query to run and whether to negate it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Requirement {
    pub predicate: Predicate,
    pub negated: bool,
}

impl Requirement {
    pub fn new(predicate: Predicate, negated: bool) -> Self {
        Self { predicate, negated }
    }

    /// Verb phrase used in failure messages.
    pub fn verb(&self) -> &'static str {
        if self.negated {
            "must not"
        } else {
            "must"
        }
    }

    // == Check ==
    /// Checks `value`, the current value of attribute `name`.
    ///
    /// Returns the value unchanged when the requirement holds.
    pub fn check<V: Checkable>(&self, name: &str, value: V) -> Result<V> {
        let outcome = self.predicate.evaluate(&value).ok_or_else(|| {
            AttrError::InvalidUsage(format!(
                "Attribute `{}` of type `{}` does not support `{}?`",
                name,
                type_name::<V>(),
                self.predicate
            ))
        })?;

        if outcome != self.negated {
            return Ok(value);
        }

        debug!(
            attribute = name,
            requirement = %self,
            "attribute requirement failed"
        );
        Err(AttrError::RequirementFailed {
            name: name.to_string(),
            verb: self.verb(),
            predicate: self.predicate.name().to_string(),
            value: format!("{:?}", value),
        })
    }
}

impl Default for Requirement {
    /// `not_nil?`
    fn default() -> Self {
        Self::new(Predicate::Nil, true)
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negated {
            f.write_str(NEGATION_PREFIX)?;
        }
        write!(f, "{}?", self.predicate)
    }
}

impl FromStr for Requirement {
    type Err = AttrError;

    fn from_str(token: &str) -> Result<Self> {
        let (base, negated) = match token.strip_prefix(NEGATION_PREFIX) {
            Some(rest) => (rest, true),
            None => (token, false),
        };

        if base.is_empty() {
            return Err(AttrError::InvalidUsage(format!(
                "Invalid predicate: {:?}",
                token
            )));
        }

        let predicate = base.parse()?;
        Ok(Self::new(predicate, negated))
    }
}

// == Checkable Implementations ==

impl<T: Checkable + ?Sized> Checkable for &T {
    fn check_nil(&self) -> bool {
        (**self).check_nil()
    }

    fn check_empty(&self) -> Option<bool> {
        (**self).check_empty()
    }

    fn check_blank(&self) -> bool {
        (**self).check_blank()
    }

    fn check_valid(&self) -> Option<bool> {
        (**self).check_valid()
    }

    fn check_sign(&self) -> Option<Ordering> {
        (**self).check_sign()
    }
}

impl<T: Checkable + ?Sized> Checkable for Box<T> {
    fn check_nil(&self) -> bool {
        (**self).check_nil()
    }

    fn check_empty(&self) -> Option<bool> {
        (**self).check_empty()
    }

    fn check_blank(&self) -> bool {
        (**self).check_blank()
    }

    fn check_valid(&self) -> Option<bool> {
        (**self).check_valid()
    }

    fn check_sign(&self) -> Option<Ordering> {
        (**self).check_sign()
    }
}

impl<T: Checkable> Checkable for Option<T> {
    fn check_nil(&self) -> bool {
        self.is_none()
    }

    fn check_empty(&self) -> Option<bool> {
        self.as_ref().and_then(Checkable::check_empty)
    }

    fn check_blank(&self) -> bool {
        self.as_ref().map_or(true, Checkable::check_blank)
    }

    fn check_valid(&self) -> Option<bool> {
        self.as_ref().and_then(Checkable::check_valid)
    }

    fn check_sign(&self) -> Option<Ordering> {
        self.as_ref().and_then(Checkable::check_sign)
    }
}

impl Checkable for bool {
    fn check_blank(&self) -> bool {
        !*self
    }
}

impl Checkable for str {
    fn check_empty(&self) -> Option<bool> {
        Some(self.is_empty())
    }

    fn check_blank(&self) -> bool {
        self.trim().is_empty()
    }
}

impl Checkable for String {
    fn check_empty(&self) -> Option<bool> {
        Some(self.is_empty())
    }

    fn check_blank(&self) -> bool {
        self.trim().is_empty()
    }
}

impl<T: fmt::Debug> Checkable for [T] {
    fn check_empty(&self) -> Option<bool> {
        Some(self.is_empty())
    }
}

impl<T: fmt::Debug> Checkable for Vec<T> {
    fn check_empty(&self) -> Option<bool> {
        Some(self.is_empty())
    }
}

impl<K: fmt::Debug, V: fmt::Debug, S> Checkable for HashMap<K, V, S> {
    fn check_empty(&self) -> Option<bool> {
        Some(self.is_empty())
    }
}

impl<K: fmt::Debug, V: fmt::Debug> Checkable for BTreeMap<K, V> {
    fn check_empty(&self) -> Option<bool> {
        Some(self.is_empty())
    }
}

impl<T: fmt::Debug, S> Checkable for HashSet<T, S> {
    fn check_empty(&self) -> Option<bool> {
        Some(self.is_empty())
    }
}

macro_rules! impl_checkable_int {
    ($($ty:ty),*) => {
        $(
            impl Checkable for $ty {
                fn check_sign(&self) -> Option<Ordering> {
                    Some(self.cmp(&0))
                }
            }
        )*
    };
}

impl_checkable_int!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

macro_rules! impl_checkable_float {
    ($($ty:ty),*) => {
        $(
            impl Checkable for $ty {
                // NaN has no sign
                fn check_sign(&self) -> Option<Ordering> {
                    self.partial_cmp(&0.0)
                }
            }
        )*
    };
}

impl_checkable_float!(f32, f64);

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Address {
        city: String,
    }

    impl Checkable for Address {
        fn check_valid(&self) -> Option<bool> {
            Some(!self.city.is_empty())
        }
    }

    #[test]
    fn test_parse_plain_token() {
        let req: Requirement = "present?".parse().unwrap();
        assert_eq!(req, Requirement::new(Predicate::Present, false));

        let req: Requirement = "valid".parse().unwrap();
        assert_eq!(req, Requirement::new(Predicate::Valid, false));
    }

    #[test]
    fn test_parse_negated_token() {
        let req: Requirement = "not_empty?".parse().unwrap();
        assert_eq!(req, Requirement::new(Predicate::Empty, true));
        assert_eq!(req.verb(), "must not");
        assert_eq!(req.to_string(), "not_empty?");
    }

    #[test]
    fn test_parse_empty_base_rejected() {
        for token in ["not_", ""] {
            let result = token.parse::<Requirement>();
            assert!(
                matches!(result, Err(AttrError::InvalidUsage(ref msg)) if msg.starts_with("Invalid predicate")),
                "token {:?} should be rejected",
                token
            );
        }
    }

    #[test]
    fn test_parse_unknown_rejected() {
        let result = "not_shiny?".parse::<Requirement>();
        assert!(matches!(result, Err(AttrError::InvalidUsage(_))));

        let result = "?".parse::<Requirement>();
        assert!(matches!(result, Err(AttrError::InvalidUsage(_))));
    }

    #[test]
    fn test_default_is_not_nil() {
        let req = Requirement::default();
        assert_eq!(req.to_string(), "not_nil?");
        assert_eq!(req, "not_nil?".parse().unwrap());
    }

    #[test]
    fn test_check_returns_value() {
        let req: Requirement = "not_empty".parse().unwrap();
        assert_eq!(req.check("items", vec![1]).unwrap(), vec![1]);
    }

    #[test]
    fn test_check_failure_message() {
        let req: Requirement = "not_empty?".parse().unwrap();
        let err = req.check("items", Vec::<i32>::new()).unwrap_err();
        assert_eq!(err.to_string(), "Attribute `items` must not be empty: []");

        let req: Requirement = "present?".parse().unwrap();
        let err = req.check("name", "  ").unwrap_err();
        assert_eq!(err.to_string(), "Attribute `name` must be present: \"  \"");
    }

    #[test]
    fn test_check_unsupported_query() {
        let req: Requirement = "empty?".parse().unwrap();
        let err = req.check("age", 42u32).unwrap_err();
        assert!(err.is_usage_error());
        assert!(err.to_string().contains("does not support `empty?`"));
    }

    #[test]
    fn test_blank_semantics() {
        assert!(None::<String>.check_blank());
        assert!(false.check_blank());
        assert!(!true.check_blank());
        assert!("".check_blank());
        assert!(" \t".check_blank());
        assert!(!"x".check_blank());
        assert!(Vec::<u8>::new().check_blank());
        assert!(!0i32.check_blank());
    }

    #[test]
    fn test_option_delegates() {
        assert_eq!(Predicate::Empty.evaluate(&Some(String::new())), Some(true));
        assert_eq!(Predicate::Empty.evaluate(&None::<String>), None);
        assert_eq!(Predicate::Nil.evaluate(&None::<String>), Some(true));
        assert_eq!(Predicate::Positive.evaluate(&Some(3i64)), Some(true));
    }

    #[test]
    fn test_numeric_predicates() {
        assert_eq!(Predicate::Zero.evaluate(&0u8), Some(true));
        assert_eq!(Predicate::Negative.evaluate(&-1.5f64), Some(true));
        assert_eq!(Predicate::Positive.evaluate(&f64::NAN), None);
    }

    #[test]
    fn test_valid_on_owner_type() {
        let req: Requirement = "valid?".parse().unwrap();
        assert!(req.check("address", Address { city: "Paris".into() }).is_ok());

        let err = req.check("address", Address { city: String::new() }).unwrap_err();
        assert!(matches!(err, AttrError::RequirementFailed { .. }));

        let req: Requirement = "valid?".parse().unwrap();
        assert!(req.check("name", "Ada").unwrap_err().is_usage_error());
    }
}
