//! Projection engine: month sequence, event application and running balance

pub mod calendar;
mod state;
mod engine;
mod cashflows;
pub mod export;

pub use calendar::{horizon_from_f64, MonthSequence, MonthSlot};
pub use state::BalanceState;
pub use engine::{ProjectionConfig, ProjectionEngine};
pub use cashflows::{ChartPoint, MonthRow, ProjectionResult, ProjectionSummary};
pub use export::{read_totals, to_csv_string, write_csv, write_csv_file, ExportTotals};
