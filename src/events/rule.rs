//! Cash event rules applied to each month of a projection

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::loan::{LoanSchedule, LoanTerms};
use crate::projection::MonthSlot;

/// Direction of a cash movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Flow {
    Inflow,
    Outflow,
}

/// Condition selecting the months an event lands on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// Exactly the month with this 0-based index
    AtIndex(u32),
    /// The month whose label matches this date's year and month
    InMonth(NaiveDate),
    /// Every month with index >= threshold
    FromIndex(u32),
    /// Every month at or after this date's month
    FromMonth(NaiveDate),
}

impl Trigger {
    pub fn matches(&self, slot: &MonthSlot) -> bool {
        match *self {
            Trigger::AtIndex(index) => slot.index == index,
            Trigger::InMonth(date) => slot.same_month(date),
            Trigger::FromIndex(threshold) => slot.index >= threshold,
            Trigger::FromMonth(date) => slot.on_or_after(date),
        }
    }
}

/// A single amount landing on a month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashItem {
    pub label: String,
    pub flow: Flow,
    pub amount: f64,
    /// Applied identically every month (base income/expense)
    pub recurring: bool,
}

impl CashItem {
    fn new(label: &str, flow: Flow, amount: f64, recurring: bool) -> Self {
        Self {
            label: label.to_string(),
            flow,
            amount,
            recurring,
        }
    }

    /// Amount with outflows negated
    pub fn signed_amount(&self) -> f64 {
        match self.flow {
            Flow::Inflow => self.amount,
            Flow::Outflow => -self.amount,
        }
    }
}

/// Loan disbursement plus its repayment schedule
#[derive(Debug, Clone, PartialEq)]
pub struct Loan {
    pub label: String,
    pub terms: LoanTerms,
    schedule: LoanSchedule,
}

impl Loan {
    pub fn new(label: impl Into<String>, terms: LoanTerms) -> Self {
        Self {
            label: label.into(),
            schedule: LoanSchedule::new(&terms),
            terms,
        }
    }

    pub fn schedule(&self) -> &LoanSchedule {
        &self.schedule
    }

    /// Column label for principal repayments
    pub fn principal_label(&self) -> String {
        format!("{}Principal", self.label)
    }

    /// Column label for interest charges
    pub fn interest_label(&self) -> String {
        format!("{}Interest", self.label)
    }
}

/// A generator of cash items over the month sequence
///
/// Items from different rules on the same month simply add up, so rule order
/// never changes a projection.
#[derive(Debug, Clone, PartialEq)]
pub enum EventRule {
    /// Same amount every month
    Recurring {
        label: String,
        flow: Flow,
        amount: f64,
    },
    /// Amount on every month the trigger selects
    OneOff {
        label: String,
        flow: Flow,
        amount: f64,
        trigger: Trigger,
    },
    /// `total` split evenly over `months` months starting at `first_month`
    Staged {
        label: String,
        flow: Flow,
        total: f64,
        /// May be negative when the stage began before the projection start
        first_month: i64,
        months: u32,
    },
    /// Loan disbursement, principal and interest
    Amortized(Loan),
    /// Percentage of the month's recurring income, paid out
    Commission { label: String, rate_pct: f64 },
}

impl EventRule {
    pub fn recurring(label: &str, flow: Flow, amount: f64) -> Self {
        EventRule::Recurring {
            label: label.to_string(),
            flow,
            amount,
        }
    }

    pub fn one_off(label: &str, flow: Flow, amount: f64, trigger: Trigger) -> Self {
        EventRule::OneOff {
            label: label.to_string(),
            flow,
            amount,
            trigger,
        }
    }

    pub fn staged(label: &str, flow: Flow, total: f64, first_month: i64, months: u32) -> Self {
        EventRule::Staged {
            label: label.to_string(),
            flow,
            total,
            first_month,
            months,
        }
    }

    pub fn amortized(label: &str, terms: LoanTerms) -> Self {
        EventRule::Amortized(Loan::new(label, terms))
    }

    pub fn commission(label: &str, rate_pct: f64) -> Self {
        EventRule::Commission {
            label: label.to_string(),
            rate_pct,
        }
    }

    /// Labels of every item this rule can emit, for column discovery
    pub fn labels(&self) -> Vec<String> {
        match self {
            EventRule::Recurring { label, .. }
            | EventRule::OneOff { label, .. }
            | EventRule::Staged { label, .. }
            | EventRule::Commission { label, .. } => vec![label.clone()],
            EventRule::Amortized(loan) => vec![
                loan.label.clone(),
                loan.principal_label(),
                loan.interest_label(),
            ],
        }
    }

    /// Recurring inflow contributed every month, used as the commission base
    pub fn recurring_income(&self) -> f64 {
        match self {
            EventRule::Recurring {
                flow: Flow::Inflow,
                amount,
                ..
            } => *amount,
            _ => 0.0,
        }
    }

    /// Push the items this rule lands on `slot` into `out`
    ///
    /// Zero amounts are skipped; they would not move the balance.
    pub fn apply(&self, slot: &MonthSlot, recurring_income: f64, out: &mut Vec<CashItem>) {
        let mut push = |label: &str, flow: Flow, amount: f64, recurring: bool| {
            if amount != 0.0 {
                out.push(CashItem::new(label, flow, amount, recurring));
            }
        };

        match self {
            EventRule::Recurring {
                label,
                flow,
                amount,
            } => push(label, *flow, *amount, true),
            EventRule::OneOff {
                label,
                flow,
                amount,
                trigger,
            } => {
                if trigger.matches(slot) {
                    push(label, *flow, *amount, false);
                }
            }
            EventRule::Staged {
                label,
                flow,
                total,
                first_month,
                months,
            } => {
                let offset = i64::from(slot.index) - *first_month;
                if *months > 0 && offset >= 0 && offset < i64::from(*months) {
                    push(label, *flow, *total / f64::from(*months), false);
                }
            }
            EventRule::Amortized(loan) => {
                // A non-positive principal is no loan at all
                if slot.index == loan.terms.disbursement_month && loan.terms.principal > 0.0 {
                    push(&loan.label, Flow::Inflow, loan.terms.principal, false);
                }
                if let Some(inst) = loan.schedule.installment_for_month(slot.index) {
                    push(&loan.principal_label(), Flow::Outflow, inst.principal, false);
                    push(&loan.interest_label(), Flow::Outflow, inst.interest, false);
                }
            }
            EventRule::Commission { label, rate_pct } => {
                push(label, Flow::Outflow, recurring_income * rate_pct / 100.0, false);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot(index: u32, y: i32, m: u32) -> MonthSlot {
        MonthSlot {
            index,
            date: NaiveDate::from_ymd_opt(y, m, 1).unwrap(),
        }
    }

    fn items(rule: &EventRule, slot: &MonthSlot) -> Vec<CashItem> {
        let mut out = Vec::new();
        rule.apply(slot, 5_000.0, &mut out);
        out
    }

    #[test]
    fn test_triggers() {
        let april = NaiveDate::from_ymd_opt(2025, 4, 20).unwrap();
        let s = slot(3, 2025, 4);
        assert!(Trigger::AtIndex(3).matches(&s));
        assert!(!Trigger::AtIndex(2).matches(&s));
        assert!(Trigger::InMonth(april).matches(&s));
        assert!(Trigger::FromIndex(3).matches(&s));
        assert!(!Trigger::FromIndex(4).matches(&s));
        assert!(Trigger::FromMonth(april).matches(&s));
        assert!(!Trigger::InMonth(april).matches(&slot(4, 2025, 5)));
        assert!(Trigger::FromMonth(april).matches(&slot(4, 2025, 5)));
    }

    #[test]
    fn test_staged_spreads_evenly() {
        let rule = EventRule::staged("Fee", Flow::Outflow, 9_000.0, 2, 3);
        assert!(items(&rule, &slot(1, 2025, 2)).is_empty());
        for index in 2..5 {
            let out = items(&rule, &slot(index, 2025, 1 + index));
            assert_eq!(out.len(), 1);
            assert_eq!(out[0].amount, 3_000.0);
        }
        assert!(items(&rule, &slot(5, 2025, 6)).is_empty());
    }

    #[test]
    fn test_staged_started_before_projection() {
        // Stage spans months -2..=1; only indices 0 and 1 are in the projection
        let rule = EventRule::staged("Fee", Flow::Outflow, 4_000.0, -2, 4);
        assert_eq!(items(&rule, &slot(0, 2025, 1))[0].amount, 1_000.0);
        assert_eq!(items(&rule, &slot(1, 2025, 2)).len(), 1);
        assert!(items(&rule, &slot(2, 2025, 3)).is_empty());
    }

    #[test]
    fn test_staged_zero_months_is_inert() {
        let rule = EventRule::staged("Fee", Flow::Outflow, 9_000.0, 0, 0);
        assert!(items(&rule, &slot(0, 2025, 1)).is_empty());
    }

    #[test]
    fn test_amortized_emits_disbursement_and_installments() {
        let rule = EventRule::amortized(
            "Loan",
            LoanTerms {
                principal: 12_000.0,
                term_months: 12,
                annual_rate_pct: 12.0,
                disbursement_month: 1,
            },
        );
        assert!(items(&rule, &slot(0, 2025, 1)).is_empty());

        let first = items(&rule, &slot(1, 2025, 2));
        let labels: Vec<_> = first.iter().map(|i| i.label.as_str()).collect();
        assert_eq!(labels, vec!["Loan", "LoanPrincipal", "LoanInterest"]);
        assert_eq!(first[0].signed_amount(), 12_000.0);
        assert_eq!(first[1].signed_amount(), -1_000.0);
        assert!((first[2].amount - 120.0).abs() < 1e-9);

        assert_eq!(items(&rule, &slot(12, 2026, 1)).len(), 2);
        assert!(items(&rule, &slot(13, 2026, 2)).is_empty());
    }

    #[test]
    fn test_negative_principal_moves_no_cash() {
        let rule = EventRule::amortized(
            "Loan",
            LoanTerms {
                principal: -5_000.0,
                term_months: 12,
                annual_rate_pct: 5.0,
                disbursement_month: 0,
            },
        );
        assert!(items(&rule, &slot(0, 2025, 1)).is_empty());
        assert!(items(&rule, &slot(1, 2025, 2)).is_empty());
    }

    #[test]
    fn test_zero_term_loan_still_disburses() {
        let rule = EventRule::amortized(
            "Loan",
            LoanTerms {
                principal: 5_000.0,
                term_months: 0,
                annual_rate_pct: 5.0,
                disbursement_month: 0,
            },
        );
        let out = items(&rule, &slot(0, 2025, 1));
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].signed_amount(), 5_000.0);
    }

    #[test]
    fn test_commission_uses_recurring_income() {
        let rule = EventRule::commission("Commission", 10.0);
        let out = items(&rule, &slot(0, 2025, 1));
        assert_eq!(out[0].flow, Flow::Outflow);
        assert_eq!(out[0].amount, 500.0);
    }

    #[test]
    fn test_zero_amounts_are_skipped() {
        let rule = EventRule::one_off("Bonus", Flow::Inflow, 0.0, Trigger::AtIndex(0));
        assert!(items(&rule, &slot(0, 2025, 1)).is_empty());
    }

    #[test]
    fn test_labels_cover_loan_columns() {
        let rule = EventRule::amortized(
            "Loan",
            LoanTerms {
                principal: 1.0,
                term_months: 1,
                annual_rate_pct: 0.0,
                disbursement_month: 0,
            },
        );
        assert_eq!(rule.labels(), vec!["Loan", "LoanPrincipal", "LoanInterest"]);
    }
}
