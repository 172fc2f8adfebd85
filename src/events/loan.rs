//! Flat-amortization loan schedule
//!
//! Principal is repaid in equal installments of `principal / term`; interest
//! each month is charged on the balance still outstanding at the start of
//! that month.

use serde::{Deserialize, Serialize};

/// Terms of a fixed-rate, fixed-term loan
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoanTerms {
    /// Amount disbursed
    pub principal: f64,

    /// Number of monthly installments
    pub term_months: u32,

    /// Nominal annual rate in percent (5.0 = 5%)
    pub annual_rate_pct: f64,

    /// Projection month index at which the loan is disbursed
    pub disbursement_month: u32,
}

impl LoanTerms {
    /// Monthly interest rate as a decimal
    pub fn monthly_rate(&self) -> f64 {
        self.annual_rate_pct / 100.0 / 12.0
    }

    /// Constant principal repaid each period; zero for a zero-term loan
    pub fn principal_payment(&self) -> f64 {
        if self.term_months == 0 {
            0.0
        } else {
            self.principal / f64::from(self.term_months)
        }
    }

    /// True when repayments can be scheduled at all
    pub fn is_amortizing(&self) -> bool {
        self.term_months > 0 && self.principal > 0.0
    }
}

/// One period of the repayment schedule
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoanInstallment {
    /// 0-based period within the term
    pub period: u32,

    /// Projection month index the installment lands on
    pub month: u32,

    pub opening_balance: f64,
    pub principal: f64,
    pub interest: f64,
    pub closing_balance: f64,
}

impl LoanInstallment {
    /// Total cash paid in the period
    pub fn payment(&self) -> f64 {
        self.principal + self.interest
    }
}

/// Repayment schedule for a loan
///
/// Installments are computed on demand from the terms, so a long term costs
/// nothing until its periods are actually visited.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LoanSchedule {
    terms: Option<LoanTerms>,
}

impl LoanSchedule {
    /// Build the schedule; empty for a zero term or non-positive principal
    pub fn new(terms: &LoanTerms) -> Self {
        Self {
            terms: terms.is_amortizing().then_some(*terms),
        }
    }

    /// Number of installments
    pub fn len(&self) -> u32 {
        self.terms.map_or(0, |t| t.term_months)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Installment for a 0-based period of the term
    ///
    /// `None` past the term, or when the period would land beyond the last
    /// representable month index.
    pub fn installment(&self, period: u32) -> Option<LoanInstallment> {
        let terms = self.terms.as_ref()?;
        if period >= terms.term_months {
            return None;
        }
        let month = terms.disbursement_month.checked_add(period)?;
        let payment = terms.principal_payment();
        let opening_balance = terms.principal - payment * f64::from(period);
        Some(LoanInstallment {
            period,
            month,
            opening_balance,
            principal: payment,
            interest: opening_balance * terms.monthly_rate(),
            closing_balance: opening_balance - payment,
        })
    }

    /// Every installment of the term, in order
    pub fn installments(&self) -> impl Iterator<Item = LoanInstallment> + '_ {
        (0..self.len()).map_while(|period| self.installment(period))
    }

    /// Installment falling on a projection month, if any
    pub fn installment_for_month(&self, month: u32) -> Option<LoanInstallment> {
        let terms = self.terms.as_ref()?;
        let period = month.checked_sub(terms.disbursement_month)?;
        self.installment(period)
    }

    /// Principal repaid over the whole term
    pub fn total_principal(&self) -> f64 {
        self.terms.map_or(0.0, |t| t.principal)
    }

    /// Interest charged over the whole term
    ///
    /// Opening balances fall linearly from `P` to `P/n`, so their sum is
    /// `P * (n + 1) / 2`.
    pub fn total_interest(&self) -> f64 {
        self.terms.map_or(0.0, |t| {
            t.principal * (f64::from(t.term_months) + 1.0) / 2.0 * t.monthly_rate()
        })
    }
}
