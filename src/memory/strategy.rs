/*!
 * Fit Strategies
 * Placement policies over the block table
 *
 * Each policy scans the full table on every call. Only blocks that are
 * free and at least as large as the request qualify; ties always go to
 * the lowest address.
 */

use super::table::BlockTable;
use super::traits::FitStrategy;
use crate::core::types::{BlockIndex, Size};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lowest-addressed qualifying block
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstFit;

/// Qualifying block with the smallest leftover
#[derive(Debug, Clone, Copy, Default)]
pub struct BestFit;

/// Qualifying block with the largest leftover
#[derive(Debug, Clone, Copy, Default)]
pub struct WorstFit;

fn candidates(table: &BlockTable, size: Size) -> impl Iterator<Item = (BlockIndex, Size)> + '_ {
    table
        .iter()
        .enumerate()
        .filter(move |(_, b)| b.free && b.size >= size)
        .map(move |(i, b)| (i, b.size - size))
}

impl FitStrategy for FirstFit {
    fn select(&self, table: &BlockTable, size: Size) -> Option<BlockIndex> {
        candidates(table, size).next().map(|(i, _)| i)
    }
}

impl FitStrategy for BestFit {
    fn select(&self, table: &BlockTable, size: Size) -> Option<BlockIndex> {
        let mut best: Option<(BlockIndex, Size)> = None;
        for (i, leftover) in candidates(table, size) {
            // strict comparison keeps the earlier block on ties
            if best.map_or(true, |(_, min)| leftover < min) {
                best = Some((i, leftover));
            }
        }
        best.map(|(i, _)| i)
    }
}

impl FitStrategy for WorstFit {
    fn select(&self, table: &BlockTable, size: Size) -> Option<BlockIndex> {
        let mut worst: Option<(BlockIndex, Size)> = None;
        for (i, leftover) in candidates(table, size) {
            if worst.map_or(true, |(_, max)| leftover > max) {
                worst = Some((i, leftover));
            }
        }
        worst.map(|(i, _)| i)
    }
}

/// Placement policy selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FitKind {
    First,
    Best,
    Worst,
}

impl FitKind {
    /// All policies in comparison order
    pub const ALL: [FitKind; 3] = [FitKind::First, FitKind::Best, FitKind::Worst];

    pub fn strategy(&self) -> &'static dyn FitStrategy {
        match self {
            FitKind::First => &FirstFit,
            FitKind::Best => &BestFit,
            FitKind::Worst => &WorstFit,
        }
    }

    pub fn select(&self, table: &BlockTable, size: Size) -> Option<BlockIndex> {
        self.strategy().select(table, size)
    }

    /// Short label used in summary tables
    pub fn label(&self) -> &'static str {
        match self {
            FitKind::First => "First Fit",
            FitKind::Best => "Best Fit",
            FitKind::Worst => "Worst Fit",
        }
    }
}

impl fmt::Display for FitKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            FitKind::First => write!(f, "First-Fit"),
            FitKind::Best => write!(f, "Best-Fit"),
            FitKind::Worst => write!(f, "Worst-Fit"),
        }
    }
}

impl FromStr for FitKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "first" | "first-fit" | "first_fit" => Ok(FitKind::First),
            "best" | "best-fit" | "best_fit" => Ok(FitKind::Best),
            "worst" | "worst-fit" | "worst_fit" => Ok(FitKind::Worst),
            other => Err(format!("unknown fit strategy '{}'", other)),
        }
    }
}
