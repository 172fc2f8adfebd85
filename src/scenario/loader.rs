//! Load scenario parameters from JSON files
//!
//! Every field is optional; anything missing keeps its default.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use super::params::ScenarioParams;
use crate::error::Result;

/// Load one scenario from a JSON file
pub fn load_params<P: AsRef<Path>>(path: P) -> Result<ScenarioParams> {
    let file = File::open(path.as_ref())?;
    let params = load_params_from_reader(BufReader::new(file))?;
    log::debug!("Loaded scenario {} ({})", path.as_ref().display(), params.variant.as_str());
    Ok(params)
}

/// Load one scenario from any reader (e.g. a request body or a string buffer)
pub fn load_params_from_reader<R: Read>(reader: R) -> Result<ScenarioParams> {
    let params: ScenarioParams = serde_json::from_reader(reader)?;
    Ok(params.sanitized())
}

/// Load several scenario files, stopping at the first failure
pub fn load_many<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<ScenarioParams>> {
    paths.iter().map(load_params).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PlannerError;
    use crate::scenario::params::Variant;
    use chrono::NaiveDate;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let json = r#"{
            "variant": "financing",
            "start_month": "2025-01-01",
            "cash_start": 20000,
            "financing": { "loan_principal": 30000, "loan_term_months": 24 }
        }"#;
        let p = load_params_from_reader(json.as_bytes()).unwrap();
        assert_eq!(p.variant, Variant::Financing);
        assert_eq!(p.start_month, NaiveDate::from_ymd_opt(2025, 1, 1));
        assert_eq!(p.cash_start, 20_000.0);
        assert_eq!(p.monthly_income, 5_000.0);
        assert_eq!(p.financing.loan_principal, 30_000.0);
        assert_eq!(p.financing.loan_term_months, 24);
        assert_eq!(p.financing.loan_rate_pct, 5.0);
    }

    #[test]
    fn test_horizon_is_clamped_on_load() {
        let p = load_params_from_reader(r#"{"horizon_months": 240}"#.as_bytes()).unwrap();
        assert_eq!(p.horizon_months, 60);
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        let err = load_params_from_reader("{ not json".as_bytes()).unwrap_err();
        assert!(matches!(err, PlannerError::Json(_)));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let err = load_params("does/not/exist.json").unwrap_err();
        assert!(matches!(err, PlannerError::Io(_)));
    }
}
