//! Core projection engine for monthly cash-flow projections

use chrono::NaiveDate;

use super::calendar::MonthSequence;
use super::cashflows::{MonthRow, ProjectionResult};
use super::state::BalanceState;
use crate::events::{self, EventRule};
use crate::scenario::{ScenarioParams, Variant};

/// Configuration for a projection run
#[derive(Debug, Clone)]
pub struct ProjectionConfig {
    /// Calculator the rules were built for
    pub variant: Variant,

    /// First projected month (day 1)
    pub start_month: NaiveDate,

    /// Number of months to project
    pub horizon_months: u32,

    /// Cash before the first month
    pub cash_start: f64,

    /// Cash event generators applied to every month
    pub rules: Vec<EventRule>,

    /// Item labels exported as extra CSV columns
    pub extra_columns: Vec<String>,
}

impl ProjectionConfig {
    /// Build the run configuration for a scenario
    ///
    /// `today` supplies the start month when the scenario does not fix one.
    pub fn from_params(params: &ScenarioParams, today: NaiveDate) -> Self {
        let params = params.sanitized();
        let start_month = params.resolve_start(today);
        Self {
            variant: params.variant,
            start_month,
            horizon_months: params.horizon_months,
            cash_start: params.cash_start,
            rules: events::build_rules(&params, start_month),
            extra_columns: events::extra_columns(params.variant),
        }
    }
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self::from_params(&ScenarioParams::default(), chrono::Local::now().date_naive())
    }
}

/// Main projection engine
pub struct ProjectionEngine {
    config: ProjectionConfig,
}

impl ProjectionEngine {
    pub fn new(config: ProjectionConfig) -> Self {
        Self { config }
    }

    /// Engine for a scenario, starting in `today`'s month unless the scenario fixes one
    pub fn for_params(params: &ScenarioParams, today: NaiveDate) -> Self {
        Self::new(ProjectionConfig::from_params(params, today))
    }

    pub fn config(&self) -> &ProjectionConfig {
        &self.config
    }

    /// Months covered by the projection
    pub fn months(&self) -> MonthSequence {
        MonthSequence::with_horizon(self.config.start_month, self.config.horizon_months)
    }

    /// Run the projection
    ///
    /// Every month is recomputed from the rules; nothing carries over between
    /// runs.
    pub fn project(&self) -> ProjectionResult {
        let config = &self.config;
        let mut result =
            ProjectionResult::new(config.variant, config.start_month, config.cash_start);
        result.extra_columns = config.extra_columns.clone();

        let recurring_income: f64 = config.rules.iter().map(EventRule::recurring_income).sum();
        let mut state = BalanceState::new(config.cash_start);
        let mut items = Vec::new();

        for slot in self.months() {
            let mut row = MonthRow::new(&slot);

            for rule in &config.rules {
                rule.apply(&slot, recurring_income, &mut items);
            }
            for item in items.drain(..) {
                row.add_item(item);
            }

            row.balance = state.apply(row.net);
            result.add_row(row);
        }

        log::debug!(
            "Projected {} months from {} with {} rules ({})",
            result.rows.len(),
            config.start_month.format("%Y-%m"),
            config.rules.len(),
            config.variant.as_str(),
        );

        result
    }
}
