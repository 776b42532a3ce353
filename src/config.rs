//! Renderer configuration.
//!
//! The only tunable is the name of the attribute that carries a render
//! context's identifier on its root UI node. Every lookup during a cell write
//! goes through that attribute, so it must be a valid attribute name and must
//! not collide with attributes components set themselves.

use crate::error::ConfigError;

/// Default attribute used to stamp render identifiers.
pub const DEFAULT_ID_ATTRIBUTE: &str = "data-render-id";

/// Environment variable overriding [`RenderConfig::id_attribute`].
pub const ID_ATTRIBUTE_ENV: &str = "SPARK_DOM_ID_ATTRIBUTE";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderConfig {
    /// Attribute holding the decimal render id of a component's root node.
    pub id_attribute: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            id_attribute: DEFAULT_ID_ATTRIBUTE.to_string(),
        }
    }
}

impl RenderConfig {
    pub fn with_id_attribute(mut self, name: impl Into<String>) -> Self {
        self.id_attribute = name.into();
        self
    }

    /// Build a config from the environment, falling back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = match std::env::var(ID_ATTRIBUTE_ENV) {
            Ok(name) => Self::default().with_id_attribute(name),
            Err(_) => Self::default(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Check that `id_attribute` is usable as an attribute name.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if is_attribute_name(&self.id_attribute) {
            Ok(())
        } else {
            Err(ConfigError::InvalidAttributeName(self.id_attribute.clone()))
        }
    }
}

/// Conservative attribute-name check: ASCII letter first, then letters,
/// digits, `-`, `_` or `:`.
fn is_attribute_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | ':'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_attribute() {
        let config = RenderConfig::default();
        assert_eq!(config.id_attribute, "data-render-id");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_custom_attribute() {
        let config = RenderConfig::default().with_id_attribute("data-rid");
        assert_eq!(config.id_attribute, "data-rid");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_attribute() {
        for name in ["", "1abc", "data render", "data\"x"] {
            let config = RenderConfig::default().with_id_attribute(name);
            assert_eq!(
                config.validate(),
                Err(ConfigError::InvalidAttributeName(name.to_string()))
            );
        }
    }
}
