//! Slot Module
//!
//! Defines the per-attribute storage cell of an attribute cache.

use std::any::{type_name, Any};
use std::fmt;

use crate::error::{AttrError, Result};

// == Slot ==
/// A single attribute slot.
///
/// `Set` holds any value, including falsy ones such as `false`, `None` or `0`.
/// Only `Unset` means "never computed". Stored values are `Send + Sync`, so
/// owners keep their auto traits and can sit behind `Arc<RwLock<..>>`.
#[derive(Default)]
pub enum Slot {
    #[default]
    Unset,
    Set(Box<dyn Any + Send + Sync>),
}

impl Slot {
    // == Constructor ==
    /// Creates a populated slot holding `value`.
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Slot::Set(Box::new(value))
    }

    // == Is Set ==
    /// Returns true if the slot holds a value, whatever that value is.
    pub fn is_set(&self) -> bool {
        matches!(self, Slot::Set(_))
    }

    // == Read ==
    /// Returns a clone of the stored value.
    ///
    /// # Returns
    /// - `Ok(None)` if the slot is unset
    /// - `Ok(Some(value))` if the slot holds a `T`
    /// - `Err(TypeMismatch)` if the slot holds anything else
    pub fn read<T: Any + Clone>(&self, name: &str) -> Result<Option<T>> {
        match self {
            Slot::Unset => Ok(None),
            Slot::Set(value) => value
                .downcast_ref::<T>()
                .cloned()
                .map(Some)
                .ok_or_else(|| AttrError::TypeMismatch {
                    name: name.to_string(),
                    expected: type_name::<T>(),
                }),
        }
    }
}

impl fmt::Debug for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Slot::Unset => f.write_str("Unset"),
            Slot::Set(_) => f.write_str("Set(..)"),
        }
    }
}
