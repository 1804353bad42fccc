//! Pool configuration
//!
//! Construction parameters for a pool. Immutable once the pool exists.
//!
//! ```toml
//! levels = 10
//! denomination = 100000000
//! withdraw_event_includes_claimant = true
//! ```

use std::path::Path;

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

use crate::error::{PoolError, Result};
use crate::require;
use crate::state::merkle_tree::MAX_TREE_DEPTH;

/// Default tree depth (1024 deposits)
pub const DEFAULT_LEVELS: u8 = MAX_TREE_DEPTH;

#[derive(
    Clone, Debug, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize,
)]
#[serde(deny_unknown_fields)]
pub struct PoolConfig {
    /// Merkle tree depth (capacity = 2^levels)
    #[serde(default = "default_levels")]
    pub levels: u8,

    /// Exact value every deposit must carry and every withdrawal pays out
    pub denomination: u64,

    /// Whether withdraw events name the claimant (off-chain indexing)
    #[serde(default = "default_include_claimant")]
    pub withdraw_event_includes_claimant: bool,
}

fn default_levels() -> u8 {
    DEFAULT_LEVELS
}

fn default_include_claimant() -> bool {
    true
}

impl PoolConfig {
    pub fn new(levels: u8, denomination: u64) -> Self {
        Self {
            levels,
            denomination,
            withdraw_event_includes_claimant: default_include_claimant(),
        }
    }

    pub fn with_claimant_in_events(mut self, include: bool) -> Self {
        self.withdraw_event_includes_claimant = include;
        self
    }

    /// Check construction parameters.
    ///
    /// # Errors
    /// * `TreeTooDeep` if `levels > 10`
    /// * `ZeroDenomination` if `denomination == 0`
    pub fn validate(&self) -> Result<()> {
        require!(
            self.levels <= MAX_TREE_DEPTH,
            PoolError::TreeTooDeep {
                levels: self.levels,
                max: MAX_TREE_DEPTH
            }
        );
        require!(self.denomination > 0, PoolError::ZeroDenomination);
        Ok(())
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text).map_err(|e| PoolError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| PoolError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&text)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string(self).map_err(|e| PoolError::Config(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_document() {
        let config = PoolConfig::from_toml_str(
            "levels = 4\ndenomination = 1000\nwithdraw_event_includes_claimant = false\n",
        )
        .unwrap();
        assert_eq!(config, PoolConfig::new(4, 1000).with_claimant_in_events(false));
    }

    #[test]
    fn test_defaults_applied() {
        let config = PoolConfig::from_toml_str("denomination = 5").unwrap();
        assert_eq!(config.levels, DEFAULT_LEVELS);
        assert!(config.withdraw_event_includes_claimant);
    }

    #[test]
    fn test_invalid_documents_rejected() {
        assert_eq!(
            PoolConfig::from_toml_str("levels = 11\ndenomination = 5"),
            Err(PoolError::TreeTooDeep { levels: 11, max: 10 })
        );
        assert_eq!(
            PoolConfig::from_toml_str("denomination = 0"),
            Err(PoolError::ZeroDenomination)
        );
        assert!(matches!(
            PoolConfig::from_toml_str("levels = 2"),
            Err(PoolError::Config(_))
        ));
        assert!(matches!(
            PoolConfig::from_toml_str("denomination = 5\nfee = 1"),
            Err(PoolError::Config(_))
        ));
    }

    #[test]
    fn test_toml_round_trip() {
        let config = PoolConfig::new(3, 42);
        let text = config.to_toml_string().unwrap();
        assert_eq!(PoolConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn test_load_missing_file() {
        assert!(matches!(
            PoolConfig::load("/nonexistent/mixer-pool.toml"),
            Err(PoolError::Config(_))
        ));
    }
}
