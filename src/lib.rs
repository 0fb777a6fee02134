//! Lazy Attrs - memoized attributes with precondition checks
//!
//! Gives any owner type compute-once attribute readers, write-through
//! memoization via the owner's own setter, and declarative checks such as
//! `present?` or `not_empty?` on attribute values.

pub mod attrs;
pub mod cache;
pub mod config;
pub mod error;
pub mod install;
pub mod predicate;

pub use attrs::LazyAttrs;
pub use cache::{AttributeCache, CacheStats};
pub use config::Config;
pub use error::{AttrError, Result};
pub use install::{install, install_with, is_installed, InstallPolicy};
pub use predicate::{Checkable, Predicate, Requirement};
