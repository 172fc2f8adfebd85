//! Cash events: rule definitions, loan schedules and per-calculator builders

mod rule;
mod loan;
pub mod milestones;

pub use rule::{CashItem, EventRule, Flow, Loan, Trigger};
pub use loan::{LoanInstallment, LoanSchedule, LoanTerms};
pub use milestones::{build_rules, extra_columns};
