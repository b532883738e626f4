use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Tunables for a [`crate::GenericResolver`].
///
/// Deserializes from a `[generics]`-style TOML table; missing keys take their defaults.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResolverConfig {
    /// Treat a primitive and its wrapper class as interchangeable in compatibility checks.
    pub boxing: bool,
    /// Emit a `debug` event whenever a type variable falls back to `java.lang.Object`.
    pub log_unresolved_type_vars: bool,
    /// Maximum nesting of a declared shape before resolution gives up.
    pub max_shape_depth: usize,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            boxing: true,
            log_unresolved_type_vars: true,
            max_shape_depth: 256,
        }
    }
}

impl ResolverConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_take_defaults() {
        let config = ResolverConfig::from_toml_str("boxing = false").unwrap();
        assert_eq!(
            config,
            ResolverConfig {
                boxing: false,
                ..ResolverConfig::default()
            }
        );
        assert_eq!(ResolverConfig::from_toml_str("").unwrap(), ResolverConfig::default());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = ResolverConfig::from_toml_str("boxng = true").unwrap_err();
        assert!(err.to_string().contains("boxng"), "{err}");
    }
}
