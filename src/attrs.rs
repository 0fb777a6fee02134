//! Lazy Attributes Module
//!
//! The `LazyAttrs` trait gives an owner type memoized attribute readers and
//! precondition checks on top of its private `AttributeCache`.
//!
//! # Example
//! ```
//! use lazy_attrs::{AttributeCache, LazyAttrs, Result};
//!
//! #[derive(Default)]
//! struct Person {
//!     first_name: Option<String>,
//!     last_name: Option<String>,
//!     attrs: AttributeCache,
//! }
//!
//! impl LazyAttrs for Person {
//!     fn attr_cache(&self) -> &AttributeCache {
//!         &self.attrs
//!     }
//!
//!     fn attr_cache_mut(&mut self) -> &mut AttributeCache {
//!         &mut self.attrs
//!     }
//! }
//!
//! impl Person {
//!     fn full_name(&mut self) -> Result<String> {
//!         self.try_get_or_compute("full_name", |p| {
//!             let first = p.require_attr("first_name", "present?", |p| p.first_name.clone())?;
//!             let parts = [first, p.last_name.clone()];
//!             Ok(parts.into_iter().flatten().collect::<Vec<_>>().join(" "))
//!         })
//!     }
//! }
//!
//! let mut person = Person {
//!     first_name: Some("Ada".into()),
//!     last_name: Some("Lovelace".into()),
//!     ..Default::default()
//! };
//! assert_eq!(person.full_name().unwrap(), "Ada Lovelace");
//! ```

use std::any::Any;

use tracing::debug;

use crate::cache::AttributeCache;
use crate::error::{AttrError, Result};
use crate::predicate::{Checkable, Requirement};

fn missing_block(name: &str) -> AttrError {
    AttrError::InvalidUsage(format!(
        "Code block must be given to compute `{}`",
        name
    ))
}

/// Hands `value` to the owner's `setter` and reads back what it stored.
fn write_through<O, T, S>(owner: &mut O, name: &str, value: T, setter: S) -> Result<T>
where
    O: LazyAttrs + ?Sized,
    T: Any + Clone + Send + Sync,
    S: FnOnce(&mut O, T),
{
    setter(owner, value);
    let stored = owner
        .attr_cache()
        .get::<T>(name)?
        .ok_or_else(|| AttrError::SetterDidNotStore(name.to_string()))?;

    owner.attr_cache_mut().record_write_through();
    debug!(attribute = name, "lazy attribute written through setter");
    Ok(stored)
}

// == Lazy Attrs ==
/// Memoized attributes for an owner type.
///
/// Implementors only expose their cache; every operation is provided.
/// Compute closures receive the owner, so they can read other attributes,
/// including other lazy ones, and check preconditions.
pub trait LazyAttrs {
    /// Shared access to the owner's slot map.
    fn attr_cache(&self) -> &AttributeCache;

    /// Exclusive access to the owner's slot map.
    fn attr_cache_mut(&mut self) -> &mut AttributeCache;

    // == Get Or Compute ==
    /// Returns the cached value of `name`, computing and storing it on the
    /// first call.
    ///
    /// A populated slot is returned as is, even when it holds a falsy value;
    /// `compute` is then never invoked.
    ///
    /// # Errors
    /// - `InvalidUsage` if the slot is unset and no `compute` was given
    /// - `TypeMismatch` if the slot holds something other than a `T`
    fn get_or_compute<T, F>(&mut self, name: &str, compute: Option<F>) -> Result<T>
    where
        T: Any + Clone + Send + Sync,
        F: FnOnce(&mut Self) -> T,
    {
        if let Some(cached) = self.attr_cache_mut().lookup::<T>(name)? {
            return Ok(cached);
        }
        let compute = compute.ok_or_else(|| missing_block(name))?;

        let value = compute(self);
        debug!(attribute = name, "lazy attribute computed");
        let cache = self.attr_cache_mut();
        cache.record_computation();
        cache.set(name, value.clone());
        Ok(value)
    }

    /// `get_or_compute` with a computation that is always supplied.
    fn memoize<T, F>(&mut self, name: &str, compute: F) -> Result<T>
    where
        T: Any + Clone + Send + Sync,
        F: FnOnce(&mut Self) -> T,
    {
        self.get_or_compute(name, Some(compute))
    }

    // == Try Get Or Compute ==
    /// Like `memoize`, for computations that can fail.
    ///
    /// Only an `Ok` value is cached. On error the slot stays unset and the
    /// next call computes again.
    fn try_get_or_compute<T, E, F>(&mut self, name: &str, compute: F) -> std::result::Result<T, E>
    where
        T: Any + Clone + Send + Sync,
        E: From<AttrError>,
        F: FnOnce(&mut Self) -> std::result::Result<T, E>,
    {
        if let Some(cached) = self.attr_cache_mut().lookup::<T>(name)? {
            return Ok(cached);
        }

        let value = compute(self)?;
        debug!(attribute = name, "lazy attribute computed");
        let cache = self.attr_cache_mut();
        cache.record_computation();
        cache.set(name, value.clone());
        Ok(value)
    }

    // == Get Or Compute Via Setter ==
    /// Same as `get_or_compute`, but stores the computed value by calling the
    /// owner's `setter` instead of writing the slot directly.
    ///
    /// The setter is expected to populate the slot for `name`, possibly with a
    /// normalized value. The value returned is whatever the slot holds
    /// afterwards.
    ///
    /// # Errors
    /// Those of `get_or_compute`, plus `SetterDidNotStore` if the slot is
    /// still unset after the setter returns.
    fn get_or_compute_via_setter<T, F, S>(
        &mut self,
        name: &str,
        compute: Option<F>,
        setter: S,
    ) -> Result<T>
    where
        T: Any + Clone + Send + Sync,
        F: FnOnce(&mut Self) -> T,
        S: FnOnce(&mut Self, T),
    {
        if let Some(cached) = self.attr_cache_mut().lookup::<T>(name)? {
            return Ok(cached);
        }
        let compute = compute.ok_or_else(|| missing_block(name))?;

        let value = compute(self);
        self.attr_cache_mut().record_computation();
        write_through(self, name, value, setter)
    }

    // == Try Get Or Compute Via Setter ==
    /// Like `memoize_via_setter`, for computations that can fail.
    ///
    /// On error the setter is not called and the slot stays unset.
    fn try_get_or_compute_via_setter<T, E, F, S>(
        &mut self,
        name: &str,
        compute: F,
        setter: S,
    ) -> std::result::Result<T, E>
    where
        T: Any + Clone + Send + Sync,
        E: From<AttrError>,
        F: FnOnce(&mut Self) -> std::result::Result<T, E>,
        S: FnOnce(&mut Self, T),
    {
        if let Some(cached) = self.attr_cache_mut().lookup::<T>(name)? {
            return Ok(cached);
        }

        let value = compute(self)?;
        self.attr_cache_mut().record_computation();
        Ok(write_through(self, name, value, setter)?)
    }

    /// `get_or_compute_via_setter` with a computation that is always supplied.
    fn memoize_via_setter<T, F, S>(&mut self, name: &str, compute: F, setter: S) -> Result<T>
    where
        T: Any + Clone + Send + Sync,
        F: FnOnce(&mut Self) -> T,
        S: FnOnce(&mut Self, T),
    {
        self.get_or_compute_via_setter(name, Some(compute), setter)
    }

    // == Require Attr ==
    /// Reads attribute `name` through `reader` and checks it against
    /// `predicate`.
    ///
    /// ```text
    /// require_attr("name", "not_nil?", ..)     // must not be nil
    /// require_attr("obj", "valid", ..)         // must be valid
    /// require_attr("items", "present?", ..)    // must be present
    /// require_attr("items", "not_empty?", ..)  // must not be empty
    /// ```
    ///
    /// Returns the value unchanged, so `reader` may hand out a borrow of the
    /// owner. Never touches the cache.
    ///
    /// # Errors
    /// - `InvalidUsage` for an empty, unknown or unsupported predicate
    /// - `RequirementFailed` if the check does not hold
    fn require_attr<'a, V, R>(&'a self, name: &str, predicate: &str, reader: R) -> Result<V>
    where
        V: Checkable,
        R: FnOnce(&'a Self) -> V,
    {
        let requirement: Requirement = predicate.parse()?;
        requirement.check(name, reader(self))
    }

    /// `require_attr` with the default `not_nil?` predicate.
    fn require_attr_default<'a, V, R>(&'a self, name: &str, reader: R) -> Result<V>
    where
        V: Checkable,
        R: FnOnce(&'a Self) -> V,
    {
        Requirement::default().check(name, reader(self))
    }
}
