//! Scenario parameter record and its defaults

use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::projection::calendar::first_of_month;

/// Longest horizon the planner accepts
pub const MAX_HORIZON_MONTHS: u32 = 60;

/// Default horizon when none is given
pub const DEFAULT_HORIZON_MONTHS: u32 = 24;

/// Months between arras and deed when no deed month is given
pub const DEFAULT_DEED_OFFSET_MONTHS: u32 = 3;

/// Which calculator a scenario runs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    /// Recurring income/expense plus optional one-offs
    #[default]
    Basic,
    /// Basic plus investment, amortizing loan and revenue commission
    Financing,
    /// Basic plus real-estate milestones (arras, deed, fees, construction)
    Milestones,
}

impl Variant {
    pub const ALL: [Variant; 3] = [Variant::Basic, Variant::Financing, Variant::Milestones];

    pub fn as_str(&self) -> &'static str {
        match self {
            Variant::Basic => "basic",
            Variant::Financing => "financing",
            Variant::Milestones => "milestones",
        }
    }

    /// Parse a variant name, case-insensitively
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "basic" => Some(Variant::Basic),
            "financing" | "loan" => Some(Variant::Financing),
            "milestones" | "hitos" => Some(Variant::Milestones),
            _ => None,
        }
    }
}

/// An optional single income or expense
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OneOffParams {
    pub enabled: bool,
    pub amount: f64,
    /// 0-based month index
    pub month: u32,
}

impl OneOffParams {
    fn disabled_at(month: u32) -> Self {
        Self {
            enabled: false,
            amount: 0.0,
            month,
        }
    }
}

impl Default for OneOffParams {
    fn default() -> Self {
        Self::disabled_at(0)
    }
}

/// Inputs of the financing calculator
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FinancingParams {
    pub investment_amount: f64,
    pub investment_month: u32,
    pub loan_principal: f64,
    pub loan_term_months: u32,
    /// Nominal annual rate in percent
    pub loan_rate_pct: f64,
    /// Month index of the loan disbursement
    pub loan_month: u32,
    /// Percent of recurring income paid out as commission
    pub commission_pct: f64,
}

impl Default for FinancingParams {
    fn default() -> Self {
        Self {
            investment_amount: 0.0,
            investment_month: 0,
            loan_principal: 0.0,
            loan_term_months: 36,
            loan_rate_pct: 5.0,
            loan_month: 0,
            commission_pct: 0.0,
        }
    }
}

/// Inputs of the real-estate milestone calculator
///
/// Dates are calendar months; unset dates resolve relative to the
/// projection start (see [`MilestoneParams::resolve`]).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MilestoneParams {
    /// Deposit paid when the purchase contract is signed
    pub arras_amount: f64,
    pub arras_month: Option<NaiveDate>,

    /// Balance paid at the deed (escritura)
    pub deed_amount: f64,
    pub deed_month: Option<NaiveDate>,

    /// Month the building license is granted; the deed month when unset
    pub license_month: Option<NaiveDate>,

    /// Project fee, staged evenly from the arras month
    pub project_fee_total: f64,

    /// Fee due when the license is granted
    pub final_fee: f64,

    pub construction_cost: f64,
    pub construction_months: u32,
    /// Percent of construction cost covered by financing
    pub financed_pct: f64,

    /// Monthly promoter fee charged from the license month onwards
    pub promoter_fee_monthly: f64,
}

impl Default for MilestoneParams {
    fn default() -> Self {
        Self {
            arras_amount: 0.0,
            arras_month: None,
            deed_amount: 0.0,
            deed_month: None,
            license_month: None,
            project_fee_total: 0.0,
            final_fee: 0.0,
            construction_cost: 0.0,
            construction_months: 18,
            financed_pct: 0.0,
            promoter_fee_monthly: 0.0,
        }
    }
}

/// Milestone dates after defaults are filled in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MilestoneDates {
    pub arras: NaiveDate,
    pub deed: NaiveDate,
    pub license: NaiveDate,
    /// True when the license month fell back to the deed month
    pub license_from_deed: bool,
}

impl MilestoneParams {
    /// Fill unset milestone dates relative to `start`
    pub fn resolve(&self, start: NaiveDate) -> MilestoneDates {
        let arras = first_of_month(self.arras_month.unwrap_or(start));
        let deed = self.deed_month.map(first_of_month).unwrap_or_else(|| {
            arras
                .checked_add_months(Months::new(DEFAULT_DEED_OFFSET_MONTHS))
                .unwrap_or(arras)
        });
        let (license, license_from_deed) = match self.license_month {
            Some(date) => (first_of_month(date), false),
            None => (deed, true),
        };
        MilestoneDates {
            arras,
            deed,
            license,
            license_from_deed,
        }
    }
}

/// Every input of a planning scenario
///
/// Treated as immutable: edits go through [`ScenarioParams::apply_form`] or
/// the `with_*` helpers, which return a new record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioParams {
    pub variant: Variant,

    /// First projected month; the current month when unset
    pub start_month: Option<NaiveDate>,

    pub horizon_months: u32,

    pub cash_start: f64,
    pub monthly_income: f64,
    pub monthly_expense: f64,

    pub one_off_income: OneOffParams,
    pub one_off_expense: OneOffParams,

    pub financing: FinancingParams,
    pub milestones: MilestoneParams,
}

impl Default for ScenarioParams {
    fn default() -> Self {
        Self {
            variant: Variant::Basic,
            start_month: None,
            horizon_months: DEFAULT_HORIZON_MONTHS,
            cash_start: 50_000.0,
            monthly_income: 5_000.0,
            monthly_expense: 3_500.0,
            one_off_income: OneOffParams::disabled_at(6),
            one_off_expense: OneOffParams::disabled_at(12),
            financing: FinancingParams::default(),
            milestones: MilestoneParams::default(),
        }
    }
}

impl ScenarioParams {
    /// Defaults for a given calculator
    pub fn for_variant(variant: Variant) -> Self {
        Self {
            variant,
            ..Self::default()
        }
    }

    pub fn with_variant(&self, variant: Variant) -> Self {
        Self {
            variant,
            ..self.clone()
        }
    }

    pub fn with_start_month(&self, start: NaiveDate) -> Self {
        Self {
            start_month: Some(first_of_month(start)),
            ..self.clone()
        }
    }

    pub fn with_horizon(&self, months: u32) -> Self {
        Self {
            horizon_months: months,
            ..self.clone()
        }
        .sanitized()
    }

    /// Start month, falling back to `today`'s month
    pub fn resolve_start(&self, today: NaiveDate) -> NaiveDate {
        first_of_month(self.start_month.unwrap_or(today))
    }

    /// Clamp the horizon and month indices, zero out non-finite amounts
    ///
    /// Month indices past the longest horizon can never land, so they are
    /// pinned to `MAX_HORIZON_MONTHS`; that keeps index arithmetic in range.
    pub fn sanitized(&self) -> Self {
        let mut out = self.clone();
        out.horizon_months = out.horizon_months.min(MAX_HORIZON_MONTHS);

        for month in [
            &mut out.one_off_income.month,
            &mut out.one_off_expense.month,
            &mut out.financing.investment_month,
            &mut out.financing.loan_month,
        ] {
            *month = (*month).min(MAX_HORIZON_MONTHS);
        }

        for value in [
            &mut out.cash_start,
            &mut out.monthly_income,
            &mut out.monthly_expense,
            &mut out.one_off_income.amount,
            &mut out.one_off_expense.amount,
            &mut out.financing.investment_amount,
            &mut out.financing.loan_principal,
            &mut out.financing.loan_rate_pct,
            &mut out.financing.commission_pct,
            &mut out.milestones.arras_amount,
            &mut out.milestones.deed_amount,
            &mut out.milestones.project_fee_total,
            &mut out.milestones.final_fee,
            &mut out.milestones.construction_cost,
            &mut out.milestones.financed_pct,
            &mut out.milestones.promoter_fee_monthly,
        ] {
            if !value.is_finite() {
                *value = 0.0;
            }
        }
        out.milestones.financed_pct = out.milestones.financed_pct.clamp(0.0, 100.0);
        out.financing.loan_principal = out.financing.loan_principal.max(0.0);
        out
    }
}
