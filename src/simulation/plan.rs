/*!
 * Simulation Plan
 * Scripted answers for the four phases of a run
 */

use crate::core::limits::DEFAULT_LARGE_PERCENT;
use crate::core::types::Pid;
use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Plan validation errors
#[derive(Error, Debug, Clone, PartialEq, Diagnostic)]
pub enum PlanError {
    #[error("Large allocation percentage {0} is outside 1-100")]
    #[diagnostic(
        code(plan::large_percent_out_of_range),
        help("Pass a percentage of free memory between 1 and 100.")
    )]
    LargePercentOutOfRange(f64),

    #[error("Invalid termination list '{0}'")]
    #[diagnostic(
        code(plan::invalid_termination),
        help("Use 'none', 'all' or a comma separated list of process ids.")
    )]
    InvalidTermination(String),
}

/// Which running processes to terminate in phase 2
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    #[default]
    None,
    All,
    Ids(Vec<Pid>),
}

impl FromStr for Termination {
    type Err = PlanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "none" | "0" => Ok(Termination::None),
            "all" | "-1" => Ok(Termination::All),
            list => list
                .split(',')
                .map(|tok| tok.trim().trim_start_matches(['p', 'P']).parse::<Pid>())
                .collect::<Result<Vec<_>, _>>()
                .map(Termination::Ids)
                .map_err(|_| PlanError::InvalidTermination(s.to_string())),
        }
    }
}

impl fmt::Display for Termination {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Termination::None => write!(f, "none"),
            Termination::All => write!(f, "all"),
            Termination::Ids(ids) => {
                let ids: Vec<String> = ids.iter().map(|id| id.to_string()).collect();
                write!(f, "{}", ids.join(","))
            }
        }
    }
}

/// Decisions for one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationPlan {
    /// Requests placed in phase 1, taken in input order (clamped to 1..=n)
    pub initial: usize,
    pub termination: Termination,
    /// Further `New` requests placed in phase 3 (clamped to those remaining)
    pub additional: usize,
    /// Size of the phase 4 allocation, as a percentage of free memory
    pub large_percent: f64,
}

impl Default for SimulationPlan {
    fn default() -> Self {
        Self {
            initial: usize::MAX,
            termination: Termination::None,
            additional: 0,
            large_percent: DEFAULT_LARGE_PERCENT,
        }
    }
}

impl SimulationPlan {
    pub fn validate(&self) -> Result<(), PlanError> {
        if !(1.0..=100.0).contains(&self.large_percent) {
            return Err(PlanError::LargePercentOutOfRange(self.large_percent));
        }
        Ok(())
    }
}
