//! Lazy Attrs demo
//!
//! Builds a sample person from the environment, derives its lazy attributes
//! and prints the cache statistics as JSON.

use std::env;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lazy_attrs::{install_with, AttributeCache, Config, LazyAttrs, Result};

/// Sample owner with two plain fields and three lazy attributes.
#[derive(Debug, Default)]
struct Person {
    first_name: Option<String>,
    last_name: Option<String>,
    attrs: AttributeCache,
}

impl LazyAttrs for Person {
    fn attr_cache(&self) -> &AttributeCache {
        &self.attrs
    }

    fn attr_cache_mut(&mut self) -> &mut AttributeCache {
        &mut self.attrs
    }
}

impl Person {
    /// Sample person named by `LAZY_ATTRS_FIRST_NAME` and `LAZY_ATTRS_LAST_NAME`
    /// (defaults: Ada Lovelace).
    fn from_env() -> Self {
        Self {
            first_name: Some(env::var("LAZY_ATTRS_FIRST_NAME").unwrap_or_else(|_| "Ada".into())),
            last_name: Some(env::var("LAZY_ATTRS_LAST_NAME").unwrap_or_else(|_| "Lovelace".into())),
            ..Default::default()
        }
    }

    fn full_name(&mut self) -> Result<String> {
        self.try_get_or_compute("full_name", |p| {
            let first = p.require_attr("first_name", "present?", |p| p.first_name.as_deref())?;
            let parts = [first, p.last_name.as_deref()];
            Ok(parts.into_iter().flatten().collect::<Vec<_>>().join(" ").trim().to_string())
        })
    }

    fn initials(&mut self) -> Result<String> {
        let full_name = self.full_name()?;
        self.memoize_via_setter(
            "initials",
            |_| {
                full_name
                    .split_whitespace()
                    .filter_map(|word| word.chars().next())
                    .collect::<String>()
            },
            Person::set_initials,
        )
    }

    /// Stores initials upper-cased.
    fn set_initials(&mut self, value: String) {
        self.attrs.set("initials", value.to_uppercase());
    }

    /// Derived once, even though the answer is "none".
    fn nickname(&mut self) -> Result<Option<String>> {
        self.memoize("nickname", |p| {
            p.first_name
                .as_deref()
                .filter(|name| name.len() > 6)
                .map(|name| name.chars().take(3).collect())
        })
    }
}

/// Main entry point for the lazy attributes demo.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Install lazy attributes on the sample owner type
/// 4. Build the sample person from environment variables
/// 5. Derive attributes twice and report statistics
fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lazy_attrs=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    info!(
        "Configuration loaded: strict_install={}",
        config.strict_install
    );

    install_with::<Person>(config.install_policy()).context("installing lazy attributes")?;

    let mut person = Person::from_env();

    for _ in 0..2 {
        let full_name = person.full_name().context("deriving full_name")?;
        let initials = person.initials().context("deriving initials")?;
        let nickname = person.nickname().context("deriving nickname")?;
        info!(%full_name, %initials, ?nickname, "attributes derived");
    }

    let stats = serde_json::to_string_pretty(&person.attr_cache().stats())?;
    println!("{}", stats);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_person_attributes() {
        let mut person = Person {
            first_name: Some("Grace".to_string()),
            last_name: Some("hopper".to_string()),
            ..Default::default()
        };

        assert_eq!(person.full_name().unwrap(), "Grace hopper");
        assert_eq!(person.initials().unwrap(), "GH");
        assert_eq!(person.nickname().unwrap(), None);
        assert_eq!(person.attr_cache().stats().write_throughs, 1);
    }

    #[test]
    fn test_person_requires_first_name() {
        let mut person = Person {
            first_name: Some("  ".to_string()),
            ..Default::default()
        };

        let err = person.initials().unwrap_err();
        assert_eq!(err.to_string(), "Attribute `first_name` must be present: Some(\"  \")");
    }
}
