/*!
 * Strategy Comparison
 * Run every placement policy over the same workload
 */

use super::plan::SimulationPlan;
use super::session::{Session, StrategyReport};
use crate::core::errors::SimError;
use crate::memory::{AllocatorConfig, FitKind};
use crate::monitoring::OperationTimer;
use crate::process::ProcessDescriptor;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Reports of several strategy runs over one workload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    pub reports: Vec<StrategyReport>,
}

impl Comparison {
    pub fn report(&self, strategy: FitKind) -> Option<&StrategyReport> {
        self.reports.iter().find(|r| r.strategy == strategy)
    }

    /// Strategy with the highest success rate; earlier strategies win ties
    pub fn best_success_rate(&self) -> Option<FitKind> {
        let mut best: Option<&StrategyReport> = None;
        for report in &self.reports {
            if best.map_or(true, |b| report.stats.success_rate() > b.stats.success_rate()) {
                best = Some(report);
            }
        }
        best.map(|r| r.strategy)
    }
}

/// Run `strategies` in order, each on a fresh table and request set
///
/// `base` supplies capacity, threshold and table size; its strategy is
/// replaced for each run.
pub fn compare_strategies(
    base: AllocatorConfig,
    strategies: &[FitKind],
    descriptors: &[ProcessDescriptor],
    plan: &SimulationPlan,
) -> Result<Comparison, SimError> {
    plan.validate()?;
    let mut reports = Vec::with_capacity(strategies.len());
    for strategy in strategies {
        info!(%strategy, "Starting strategy run");
        let _timer = OperationTimer::new("strategy_run");
        let session = Session::new(base.with_strategy(*strategy), descriptors)?;
        reports.push(session.run(plan)?);
    }
    Ok(Comparison { reports })
}

/// Run first-fit, best-fit and worst-fit
pub fn compare(
    base: AllocatorConfig,
    descriptors: &[ProcessDescriptor],
    plan: &SimulationPlan,
) -> Result<Comparison, SimError> {
    compare_strategies(base, &FitKind::ALL, descriptors, plan)
}
