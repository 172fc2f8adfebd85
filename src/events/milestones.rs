//! Translate scenario parameters into event rules for each calculator

use chrono::NaiveDate;

use super::loan::LoanTerms;
use super::rule::{EventRule, Flow, Trigger};
use crate::projection::calendar::month_offset;
use crate::scenario::{ScenarioParams, Variant};

pub const INCOME: &str = "Income";
pub const EXPENSE: &str = "Expense";
pub const ONE_OFF_INCOME: &str = "OneOffIncome";
pub const ONE_OFF_EXPENSE: &str = "OneOffExpense";

pub const INVESTMENT: &str = "Investment";
pub const LOAN: &str = "Loan";
pub const COMMISSION: &str = "Commission";

pub const ARRAS: &str = "Arras";
pub const DEED: &str = "Deed";
pub const PROJECT_FEE: &str = "ProjectFee";
pub const FINAL_FEE: &str = "FinalFee";
pub const CONSTRUCTION: &str = "Construction";
pub const PROMOTER_FEE: &str = "PromoterFee";

/// Months over which the project fee is disbursed, from the arras month
pub const PROJECT_FEE_MONTHS: u32 = 6;

/// Rules for a scenario whose first month is `start`
pub fn build_rules(params: &ScenarioParams, start: NaiveDate) -> Vec<EventRule> {
    let mut rules = base_rules(params);
    match params.variant {
        Variant::Basic => {}
        Variant::Financing => rules.extend(financing_rules(params)),
        Variant::Milestones => rules.extend(milestone_rules(params, start)),
    }
    rules
}

/// Extra CSV columns exported for a calculator, in order
pub fn extra_columns(variant: Variant) -> Vec<String> {
    let labels: &[&str] = match variant {
        Variant::Basic => &[],
        Variant::Financing => &[
            INVESTMENT,
            LOAN,
            "LoanPrincipal",
            "LoanInterest",
            COMMISSION,
        ],
        Variant::Milestones => &[
            ARRAS,
            DEED,
            PROJECT_FEE,
            FINAL_FEE,
            CONSTRUCTION,
            PROMOTER_FEE,
        ],
    };
    labels.iter().map(|l| l.to_string()).collect()
}

fn base_rules(params: &ScenarioParams) -> Vec<EventRule> {
    let mut rules = vec![
        EventRule::recurring(INCOME, Flow::Inflow, params.monthly_income),
        EventRule::recurring(EXPENSE, Flow::Outflow, params.monthly_expense),
    ];
    if params.one_off_income.enabled {
        rules.push(EventRule::one_off(
            ONE_OFF_INCOME,
            Flow::Inflow,
            params.one_off_income.amount,
            Trigger::AtIndex(params.one_off_income.month),
        ));
    }
    if params.one_off_expense.enabled {
        rules.push(EventRule::one_off(
            ONE_OFF_EXPENSE,
            Flow::Outflow,
            params.one_off_expense.amount,
            Trigger::AtIndex(params.one_off_expense.month),
        ));
    }
    rules
}

fn financing_rules(params: &ScenarioParams) -> Vec<EventRule> {
    let f = &params.financing;
    vec![
        EventRule::one_off(
            INVESTMENT,
            Flow::Inflow,
            f.investment_amount,
            Trigger::AtIndex(f.investment_month),
        ),
        EventRule::amortized(
            LOAN,
            LoanTerms {
                principal: f.loan_principal,
                term_months: f.loan_term_months,
                annual_rate_pct: f.loan_rate_pct,
                disbursement_month: f.loan_month,
            },
        ),
        EventRule::commission(COMMISSION, f.commission_pct),
    ]
}

fn milestone_rules(params: &ScenarioParams, start: NaiveDate) -> Vec<EventRule> {
    let m = &params.milestones;
    let dates = m.resolve(start);
    if dates.license_from_deed {
        log::debug!(
            "No license month given; using the deed month {} for final fee, construction and promoter fee",
            dates.deed.format("%Y-%m")
        );
    }

    let cash_share = 1.0 - m.financed_pct / 100.0;

    vec![
        EventRule::one_off(ARRAS, Flow::Outflow, m.arras_amount, Trigger::InMonth(dates.arras)),
        EventRule::one_off(DEED, Flow::Outflow, m.deed_amount, Trigger::InMonth(dates.deed)),
        EventRule::staged(
            PROJECT_FEE,
            Flow::Outflow,
            m.project_fee_total,
            month_offset(start, dates.arras),
            PROJECT_FEE_MONTHS,
        ),
        EventRule::one_off(FINAL_FEE, Flow::Outflow, m.final_fee, Trigger::InMonth(dates.license)),
        EventRule::staged(
            CONSTRUCTION,
            Flow::Outflow,
            m.construction_cost * cash_share,
            month_offset(start, dates.license),
            m.construction_months,
        ),
        EventRule::one_off(
            PROMOTER_FEE,
            Flow::Outflow,
            m.promoter_fee_monthly,
            Trigger::FromMonth(dates.license),
        ),
    ]
}
