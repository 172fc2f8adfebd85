//! Scenario runner for batch projections
//!
//! Holds a base scenario and a reference date, then runs single scenarios,
//! edits of the base, or whole batches in parallel.

use chrono::NaiveDate;
use rayon::prelude::*;

use crate::projection::{ProjectionEngine, ProjectionResult, ProjectionSummary};
use crate::scenario::{ScenarioParams, Variant};

/// Scenario runner with a fixed "today" for unset start months
///
/// # Example
/// ```ignore
/// let runner = ScenarioRunner::new(today);
///
/// // Same inputs through every calculator
/// let results = runner.run_variants();
/// ```
#[derive(Debug, Clone)]
pub struct ScenarioRunner {
    base: ScenarioParams,
    today: NaiveDate,
}

impl ScenarioRunner {
    /// Runner over the default scenario
    pub fn new(today: NaiveDate) -> Self {
        Self::with_params(ScenarioParams::default(), today)
    }

    /// Runner over a given base scenario
    pub fn with_params(base: ScenarioParams, today: NaiveDate) -> Self {
        Self {
            base: base.sanitized(),
            today,
        }
    }

    /// Run the base scenario
    pub fn run_base(&self) -> ProjectionResult {
        self.run(&self.base)
    }

    /// Run a single scenario
    pub fn run(&self, params: &ScenarioParams) -> ProjectionResult {
        ProjectionEngine::for_params(params, self.today).project()
    }

    /// Run many scenarios in parallel; results keep the input order
    pub fn run_batch(&self, scenarios: &[ScenarioParams]) -> Vec<ProjectionResult> {
        scenarios.par_iter().map(|p| self.run(p)).collect()
    }

    /// Run the base scenario through every calculator
    pub fn run_variants(&self) -> Vec<ProjectionResult> {
        let scenarios: Vec<_> = Variant::ALL
            .iter()
            .map(|&v| self.base.with_variant(v))
            .collect();
        self.run_batch(&scenarios)
    }

    /// Summaries only, for side-by-side comparison
    pub fn summarize_batch(&self, scenarios: &[ScenarioParams]) -> Vec<ProjectionSummary> {
        scenarios.par_iter().map(|p| self.run(p).summary()).collect()
    }

    /// Base scenario for inspection
    pub fn params(&self) -> &ScenarioParams {
        &self.base
    }

    /// Replace the base scenario, returning a new runner
    pub fn with_base(&self, base: ScenarioParams) -> Self {
        Self::with_params(base, self.today)
    }
}
