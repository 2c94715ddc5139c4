/*!
 * Allocator Configuration
 *
 * Pool capacity and placement policy are passed explicitly at
 * construction; nothing is read from ambient state except the optional
 * environment overrides in `from_env`.
 */

use super::strategy::FitKind;
use crate::core::limits::{
    DEFAULT_SPLIT_THRESHOLD, ENV_MAX_BLOCKS, ENV_SPLIT_THRESHOLD, MAX_MEM_BLKS,
};
use crate::core::types::Size;
use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

/// Configuration errors
#[derive(Error, Debug, Clone, PartialEq, Eq, Diagnostic)]
pub enum ConfigError {
    #[error("Pool capacity must be greater than zero")]
    #[diagnostic(
        code(config::zero_capacity),
        help("The first line of the input file must hold a positive capacity.")
    )]
    ZeroCapacity,

    #[error("Block table must allow at least one block")]
    #[diagnostic(code(config::zero_max_blocks), help("Set max_blocks to 1 or more."))]
    ZeroMaxBlocks,
}

/// Allocator configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocatorConfig {
    /// Total units in the pool
    pub pool_capacity: Size,

    /// Placement policy
    pub strategy: FitKind,

    /// Leftovers at or below this stay attached to the allocated block (default: 10)
    #[serde(default = "default_split_threshold")]
    pub split_threshold: Size,

    /// Maximum number of blocks in the table (default: 100)
    #[serde(default = "default_max_blocks")]
    pub max_blocks: usize,
}

fn default_split_threshold() -> Size {
    DEFAULT_SPLIT_THRESHOLD
}

fn default_max_blocks() -> usize {
    MAX_MEM_BLKS
}

impl AllocatorConfig {
    /// Create configuration with default threshold and table size
    pub fn new(pool_capacity: Size, strategy: FitKind) -> Self {
        Self {
            pool_capacity,
            strategy,
            split_threshold: DEFAULT_SPLIT_THRESHOLD,
            max_blocks: MAX_MEM_BLKS,
        }
    }

    /// Create configuration, applying `PARTSIM_SPLIT_THRESHOLD` and
    /// `PARTSIM_MAX_BLOCKS` when set
    pub fn from_env(pool_capacity: Size, strategy: FitKind) -> Self {
        let mut config = Self::new(pool_capacity, strategy);
        if let Some(threshold) = env_override(ENV_SPLIT_THRESHOLD) {
            config.split_threshold = threshold;
        }
        if let Some(max_blocks) = env_override(ENV_MAX_BLOCKS) {
            config.max_blocks = max_blocks;
        }
        config
    }

    pub fn with_strategy(mut self, strategy: FitKind) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_split_threshold(mut self, split_threshold: Size) -> Self {
        self.split_threshold = split_threshold;
        self
    }

    pub fn with_max_blocks(mut self, max_blocks: usize) -> Self {
        self.max_blocks = max_blocks;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pool_capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        if self.max_blocks == 0 {
            return Err(ConfigError::ZeroMaxBlocks);
        }
        Ok(())
    }
}

fn env_override(key: &str) -> Option<usize> {
    let raw = std::env::var(key).ok()?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(key, value = %raw, "Ignoring unparseable environment override");
            None
        }
    }
}
