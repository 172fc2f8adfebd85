//! Monthly output rows and projection summaries

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::calendar::MonthSlot;
use crate::events::{CashItem, Flow};
use crate::scenario::Variant;

/// A single row of projection output for one month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthRow {
    // Timing
    pub index: u32,
    pub date: NaiveDate,
    pub label: String,

    // Cash movements
    pub inflow: f64,
    pub outflow: f64,
    pub net: f64,

    /// Running balance after this month
    pub balance: f64,

    /// Every item landing on the month, recurring ones included
    pub items: Vec<CashItem>,
}

impl MonthRow {
    /// Empty row for a month
    pub fn new(slot: &MonthSlot) -> Self {
        Self {
            index: slot.index,
            date: slot.date,
            label: slot.label(),
            inflow: 0.0,
            outflow: 0.0,
            net: 0.0,
            balance: 0.0,
            items: Vec::new(),
        }
    }

    /// Add an item to the row's totals
    pub fn add_item(&mut self, item: CashItem) {
        match item.flow {
            Flow::Inflow => self.inflow += item.amount,
            Flow::Outflow => self.outflow += item.amount,
        }
        self.net = self.inflow - self.outflow;
        self.items.push(item);
    }

    /// Sum of items carrying `label`, as a positive amount
    pub fn amount_for(&self, label: &str) -> f64 {
        self.items
            .iter()
            .filter(|i| i.label == label)
            .map(|i| i.amount)
            .sum()
    }

    /// Labels of the non-recurring events on this month
    pub fn events(&self) -> Vec<&str> {
        self.items
            .iter()
            .filter(|i| !i.recurring)
            .map(|i| i.label.as_str())
            .collect()
    }
}

/// One point of the balance chart
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub month: u32,
    pub balance: f64,
    pub income: f64,
    /// Outflow, negated so it plots below the axis
    pub expense: f64,
}

/// Complete projection result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectionResult {
    pub variant: Variant,

    pub start_month: NaiveDate,

    /// Cash before the first month
    pub cash_start: f64,

    /// Monthly rows, in month order
    pub rows: Vec<MonthRow>,

    /// Item labels exported as extra CSV columns
    pub extra_columns: Vec<String>,
}

impl ProjectionResult {
    pub fn new(variant: Variant, start_month: NaiveDate, cash_start: f64) -> Self {
        Self {
            variant,
            start_month,
            cash_start,
            rows: Vec::new(),
            extra_columns: Vec::new(),
        }
    }

    pub fn add_row(&mut self, row: MonthRow) {
        self.rows.push(row);
    }

    pub fn balances(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.balance).collect()
    }

    /// Balance, income and (negated) expense series for charting
    pub fn chart_series(&self) -> Vec<ChartPoint> {
        self.rows
            .iter()
            .map(|r| ChartPoint {
                month: r.index,
                balance: r.balance,
                income: r.inflow,
                expense: -r.outflow,
            })
            .collect()
    }

    /// Get summary statistics
    pub fn summary(&self) -> ProjectionSummary {
        let total_inflow: f64 = self.rows.iter().map(|r| r.inflow).sum();
        let total_outflow: f64 = self.rows.iter().map(|r| r.outflow).sum();
        let total_net: f64 = self.rows.iter().map(|r| r.net).sum();

        let final_balance = self.rows.last().map(|r| r.balance).unwrap_or(self.cash_start);

        let lowest = self
            .rows
            .iter()
            .fold(None::<&MonthRow>, |low, r| match low {
                Some(l) if l.balance <= r.balance => Some(l),
                _ => Some(r),
            });

        ProjectionSummary {
            total_months: self.rows.len() as u32,
            starting_balance: self.cash_start,
            final_balance,
            min_balance: lowest.map(|r| r.balance).unwrap_or(self.cash_start),
            min_balance_month: lowest.map(|r| r.index),
            first_negative_month: self.rows.iter().find(|r| r.balance < 0.0).map(|r| r.index),
            total_inflow,
            total_outflow,
            total_net,
        }
    }
}

/// Summary statistics for a projection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionSummary {
    pub total_months: u32,
    pub starting_balance: f64,
    pub final_balance: f64,
    /// Lowest running balance, month 0 included
    pub min_balance: f64,
    /// Earliest month at which the lowest balance is reached
    pub min_balance_month: Option<u32>,
    pub first_negative_month: Option<u32>,
    pub total_inflow: f64,
    pub total_outflow: f64,
    pub total_net: f64,
}

impl ProjectionSummary {
    /// True when the balance ever drops below zero
    pub fn goes_negative(&self) -> bool {
        self.first_negative_month.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(index: u32, inflow: f64, outflow: f64, balance: f64) -> MonthRow {
        let slot = MonthSlot {
            index,
            date: NaiveDate::from_ymd_opt(2025, 1 + index, 1).unwrap(),
        };
        let mut r = MonthRow::new(&slot);
        r.add_item(CashItem {
            label: "Income".into(),
            flow: Flow::Inflow,
            amount: inflow,
            recurring: true,
        });
        r.add_item(CashItem {
            label: "Rent".into(),
            flow: Flow::Outflow,
            amount: outflow,
            recurring: false,
        });
        r.balance = balance;
        r
    }

    fn result(rows: Vec<MonthRow>) -> ProjectionResult {
        let mut result = ProjectionResult::new(
            Variant::Basic,
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            100.0,
        );
        for r in rows {
            result.add_row(r);
        }
        result
    }

    #[test]
    fn test_row_totals() {
        let r = row(0, 500.0, 200.0, 0.0);
        assert_eq!(r.inflow, 500.0);
        assert_eq!(r.outflow, 200.0);
        assert_eq!(r.net, 300.0);
        assert_eq!(r.amount_for("Rent"), 200.0);
        assert_eq!(r.amount_for("Missing"), 0.0);
        assert_eq!(r.events(), vec!["Rent"]);
        assert_eq!(r.label, "2025-01");
    }

    #[test]
    fn test_summary() {
        let res = result(vec![
            row(0, 100.0, 50.0, 150.0),
            row(1, 100.0, 300.0, -50.0),
            row(2, 100.0, 50.0, 0.0),
        ]);
        let s = res.summary();
        assert_eq!(s.total_months, 3);
        assert_eq!(s.final_balance, 0.0);
        assert_eq!(s.min_balance, -50.0);
        assert_eq!(s.min_balance_month, Some(1));
        assert_eq!(s.first_negative_month, Some(1));
        assert!(s.goes_negative());
        assert_eq!(s.total_inflow, 300.0);
        assert_eq!(s.total_outflow, 400.0);
        assert_eq!(s.total_net, -100.0);
    }

    #[test]
    fn test_min_includes_first_month() {
        let res = result(vec![row(0, 0.0, 90.0, 10.0), row(1, 50.0, 0.0, 60.0)]);
        assert_eq!(res.summary().min_balance, 10.0);
        assert_eq!(res.summary().min_balance_month, Some(0));
    }

    #[test]
    fn test_empty_summary_uses_cash_start() {
        let s = result(Vec::new()).summary();
        assert_eq!(s.total_months, 0);
        assert_eq!(s.final_balance, 100.0);
        assert_eq!(s.min_balance, 100.0);
        assert_eq!(s.min_balance_month, None);
    }

    #[test]
    fn test_chart_series_negates_expense() {
        let res = result(vec![row(0, 100.0, 40.0, 160.0)]);
        let chart = res.chart_series();
        assert_eq!(chart[0].balance, 160.0);
        assert_eq!(chart[0].income, 100.0);
        assert_eq!(chart[0].expense, -40.0);
    }
}
