//! Scenario parameters: defaults, form coercion and file loading

mod params;
mod form;
pub mod loader;

pub use params::{
    FinancingParams, MilestoneDates, MilestoneParams, OneOffParams, ScenarioParams, Variant,
    DEFAULT_DEED_OFFSET_MONTHS, DEFAULT_HORIZON_MONTHS, MAX_HORIZON_MONTHS,
};
pub use form::{coerce_bool, coerce_month, coerce_number, parse_month_field};
pub use loader::{load_many, load_params, load_params_from_reader};
