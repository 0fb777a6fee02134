//! Install Registry
//!
//! Records which owner types have been given lazy attributes. Loaders call
//! `install::<Owner>()` once per type before instances are used.

use std::any::{type_name, TypeId};
use std::collections::HashSet;

use once_cell::sync::Lazy;
use parking_lot::Mutex;
use tracing::{debug, info};

use crate::attrs::LazyAttrs;
use crate::error::{AttrError, Result};

static INSTALLED: Lazy<Mutex<HashSet<TypeId>>> = Lazy::new(|| Mutex::new(HashSet::new()));

// == Install Policy ==
/// What to do when an owner type is installed a second time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InstallPolicy {
    /// Re-installation is a silent no-op
    #[default]
    Idempotent,
    /// Re-installation is an `AlreadyInstalled` error
    Strict,
}

impl InstallPolicy {
    pub fn from_strict(strict: bool) -> Self {
        if strict {
            InstallPolicy::Strict
        } else {
            InstallPolicy::Idempotent
        }
    }
}

/// Installs lazy attributes on `O` with the idempotent policy.
///
/// Returns true on first installation, false if `O` was already installed.
pub fn install<O: LazyAttrs + 'static>() -> Result<bool> {
    install_with::<O>(InstallPolicy::Idempotent)
}

/// Installs lazy attributes on `O` under `policy`.
pub fn install_with<O: LazyAttrs + 'static>(policy: InstallPolicy) -> Result<bool> {
    let owner = type_name::<O>();
    let newly_installed = INSTALLED.lock().insert(TypeId::of::<O>());

    if newly_installed {
        info!(owner, "lazy attributes installed");
        return Ok(true);
    }

    match policy {
        InstallPolicy::Idempotent => {
            debug!(owner, "lazy attributes already installed");
            Ok(false)
        }
        InstallPolicy::Strict => Err(AttrError::AlreadyInstalled(owner)),
    }
}

/// Returns true if `O` has been installed.
pub fn is_installed<O: 'static>() -> bool {
    INSTALLED.lock().contains(&TypeId::of::<O>())
}
