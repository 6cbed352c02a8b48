use serde::Deserialize;

use crate::error::EngineError;

/// Mapper settings, parsed from TOML.
///
/// ```toml
/// cache_plans = true
/// name_separators = "-_."
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MapperSettings {
    /// Memoize mapping plans per (record shape, type).
    /// Disable to build a fresh plan on every `provide_*` call.
    #[serde(default = "default_cache_plans")]
    pub cache_plans: bool,

    /// Characters stripped from names before matching. Whitespace is always stripped.
    #[serde(default = "default_name_separators")]
    pub name_separators: String,
}

fn default_cache_plans() -> bool {
    true
}

fn default_name_separators() -> String {
    "-_.".to_string()
}

impl Default for MapperSettings {
    fn default() -> Self {
        Self {
            cache_plans: default_cache_plans(),
            name_separators: default_name_separators(),
        }
    }
}

impl MapperSettings {
    /// Load settings from a TOML file.
    pub fn load(path: &str) -> Result<Self, EngineError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| EngineError::Config(format!("{path}: {e}")))?;
        Self::parse(&content).map_err(|e| e.with_context(path))
    }

    /// Parse settings from a TOML string.
    pub fn parse(toml_str: &str) -> Result<Self, EngineError> {
        toml::from_str(toml_str).map_err(|e| EngineError::Config(e.to_string()))
    }
}
