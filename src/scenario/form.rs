//! Coercion of raw form fields into scenario parameters
//!
//! Every field arrives as text. Anything that does not parse as a number
//! becomes 0 instead of being rejected.

use std::collections::HashMap;

use chrono::NaiveDate;

use super::params::{ScenarioParams, Variant};
use crate::projection::calendar::horizon_from_f64;

/// Parse a numeric field; empty, garbage and non-finite input give 0
pub fn coerce_number(raw: &str) -> f64 {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

/// Parse a month index or count; negative and fractional parts are dropped
pub fn coerce_month(raw: &str) -> u32 {
    horizon_from_f64(coerce_number(raw))
}

/// Parse a toggle; `true`, `1`, `on` and `yes` switch it on
pub fn coerce_bool(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "true" | "1" | "on" | "yes"
    )
}

/// Parse a month field, `YYYY-MM` or a full `YYYY-MM-DD` date
pub fn parse_month_field(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(&format!("{raw}-01"), "%Y-%m-%d"))
        .ok()
}

impl ScenarioParams {
    /// Build parameters from form fields on top of the defaults
    pub fn from_form(fields: &HashMap<String, String>) -> Self {
        Self::default().apply_form(fields)
    }

    /// New record with every recognised field in `fields` replaced
    ///
    /// Unknown keys are ignored; the result is sanitized.
    pub fn apply_form(&self, fields: &HashMap<String, String>) -> Self {
        let mut p = self.clone();

        for (key, raw) in fields {
            let raw = raw.as_str();
            match key.as_str() {
                "variant" => {
                    if let Some(variant) = Variant::parse(raw) {
                        p.variant = variant;
                    }
                }
                "start_month" => p.start_month = parse_month_field(raw),
                "horizon_months" => p.horizon_months = coerce_month(raw),
                "cash_start" => p.cash_start = coerce_number(raw),
                "monthly_income" => p.monthly_income = coerce_number(raw),
                "monthly_expense" => p.monthly_expense = coerce_number(raw),

                "show_one_off_income" => p.one_off_income.enabled = coerce_bool(raw),
                "one_off_income" => p.one_off_income.amount = coerce_number(raw),
                "one_off_income_month" => p.one_off_income.month = coerce_month(raw),
                "show_one_off_expense" => p.one_off_expense.enabled = coerce_bool(raw),
                "one_off_expense" => p.one_off_expense.amount = coerce_number(raw),
                "one_off_expense_month" => p.one_off_expense.month = coerce_month(raw),

                "investment_amount" => p.financing.investment_amount = coerce_number(raw),
                "investment_month" => p.financing.investment_month = coerce_month(raw),
                "loan_principal" => p.financing.loan_principal = coerce_number(raw),
                "loan_term_months" => p.financing.loan_term_months = coerce_month(raw),
                "loan_rate_pct" => p.financing.loan_rate_pct = coerce_number(raw),
                "loan_month" => p.financing.loan_month = coerce_month(raw),
                "commission_pct" => p.financing.commission_pct = coerce_number(raw),

                "arras_amount" => p.milestones.arras_amount = coerce_number(raw),
                "arras_month" => p.milestones.arras_month = parse_month_field(raw),
                "deed_amount" => p.milestones.deed_amount = coerce_number(raw),
                "deed_month" => p.milestones.deed_month = parse_month_field(raw),
                "license_month" => p.milestones.license_month = parse_month_field(raw),
                "project_fee_total" => p.milestones.project_fee_total = coerce_number(raw),
                "final_fee" => p.milestones.final_fee = coerce_number(raw),
                "construction_cost" => p.milestones.construction_cost = coerce_number(raw),
                "construction_months" => p.milestones.construction_months = coerce_month(raw),
                "financed_pct" => p.milestones.financed_pct = coerce_number(raw),
                "promoter_fee_monthly" => p.milestones.promoter_fee_monthly = coerce_number(raw),

                _ => {}
            }
        }

        p.sanitized()
    }
}
