//! Running balance state carried from month to month

/// Balance accumulator for a single projection
///
/// Each month's net is folded onto the previous balance, in month order.
#[derive(Debug, Clone)]
pub struct BalanceState {
    /// Balance after the last applied month; the starting cash before any
    pub balance: f64,
}

impl BalanceState {
    pub fn new(cash_start: f64) -> Self {
        Self {
            balance: cash_start,
        }
    }

    /// Apply one month's net and return the closing balance
    pub fn apply(&mut self, net: f64) -> f64 {
        self.balance += net;
        self.balance
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fold(cash_start: f64, nets: &[f64]) -> Vec<f64> {
        let mut state = BalanceState::new(cash_start);
        nets.iter().map(|&net| state.apply(net)).collect()
    }

    #[test]
    fn test_fold_example() {
        assert_eq!(
            fold(50_000.0, &[1_500.0, 1_500.0, 1_500.0]),
            vec![51_500.0, 53_000.0, 54_500.0]
        );
    }

    #[test]
    fn test_fold_with_one_off() {
        assert_eq!(
            fold(50_000.0, &[1_500.0, -8_500.0, 1_500.0]),
            vec![51_500.0, 43_000.0, 44_500.0]
        );
    }

    #[test]
    fn test_new_state_holds_cash_start() {
        let state = BalanceState::new(10.0);
        assert_eq!(state.balance, 10.0);
    }
}
