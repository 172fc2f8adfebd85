//! Cash-flow planner - monthly cash projection calculators
//!
//! This library provides:
//! - A month-by-month projection engine with running balance
//! - Event rules for recurring, one-off, staged and amortized flows
//! - Basic, financing and real-estate milestone calculators
//! - CSV export and a Basic-auth protected HTTP surface
//! - Parallel batch runs over many scenarios

pub mod error;
pub mod config;
pub mod events;
pub mod projection;
pub mod scenario;
pub mod runner;
pub mod server;

// Re-export commonly used types
pub use error::{PlannerError, Result};
pub use events::{CashItem, EventRule, Flow, LoanSchedule, LoanTerms, Trigger};
pub use projection::{MonthRow, ProjectionConfig, ProjectionEngine, ProjectionResult, ProjectionSummary};
pub use scenario::{ScenarioParams, Variant};
pub use runner::ScenarioRunner;
