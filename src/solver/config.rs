//! Search budgets for the constraint solvers.

use thiserror::Error;

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[cfg(feature = "serde")]
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Configuration for [`Solver`](super::Solver).
///
/// Both solvers are exact while they stay within their budget. The budgets
/// only matter for constraints whose start and end grains are both large and
/// coprime, where the number of residue classes to inspect grows with the
/// grains.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "snake_case"))]
pub struct SolverConfig {
    /// Maximum aligned candidates visited while looking for the longest length.
    pub search_limit: usize,
    /// Maximum aligned starts visited around the reference in a nearest search.
    pub nearest_limit: usize,
}

impl SolverConfig {
    pub const DEFAULT_SEARCH_LIMIT: usize = 1 << 22;
    pub const DEFAULT_NEAREST_LIMIT: usize = 1 << 16;

    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search_limit(mut self, limit: usize) -> Self {
        self.search_limit = limit;
        self
    }

    pub fn with_nearest_limit(mut self, limit: usize) -> Self {
        self.nearest_limit = limit;
        self
    }

    /// Rejects budgets that would make every search fail.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.search_limit == 0 {
            return Err(ConfigError::Invalid("search_limit must be > 0".to_string()));
        }
        if self.nearest_limit == 0 {
            return Err(ConfigError::Invalid("nearest_limit must be > 0".to_string()));
        }
        Ok(())
    }

    /// Parses configuration from a TOML string; missing keys keep their defaults.
    #[cfg(feature = "serde")]
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            search_limit: Self::DEFAULT_SEARCH_LIMIT,
            nearest_limit: Self::DEFAULT_NEAREST_LIMIT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let cfg = SolverConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.search_limit, SolverConfig::DEFAULT_SEARCH_LIMIT);
        assert_eq!(cfg.nearest_limit, SolverConfig::DEFAULT_NEAREST_LIMIT);
    }

    #[test]
    fn zero_limits_are_rejected() {
        assert!(SolverConfig::new().with_search_limit(0).validate().is_err());
        assert!(SolverConfig::new().with_nearest_limit(0).validate().is_err());
    }

    #[test]
    fn builder_sets_limits() {
        let cfg = SolverConfig::new()
            .with_search_limit(10)
            .with_nearest_limit(20);
        assert_eq!(cfg.search_limit, 10);
        assert_eq!(cfg.nearest_limit, 20);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn toml_overrides_and_defaults() {
        let cfg = SolverConfig::from_toml_str("search_limit = 4096\n").unwrap();
        assert_eq!(cfg.search_limit, 4096);
        assert_eq!(cfg.nearest_limit, SolverConfig::DEFAULT_NEAREST_LIMIT);

        assert!(matches!(
            SolverConfig::from_toml_str("nearest_limit = 0\n"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            SolverConfig::from_toml_str("search_limit = \"lots\"\n"),
            Err(ConfigError::Toml(_))
        ));
    }
}
