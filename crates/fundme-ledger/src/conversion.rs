//! Native amount → USD conversion.
//!
//! ```text
//! usd_value = amount * answer / 10^decimals
//! ```
//!
//! With `amount` in wei (18 decimals) the result is USD with 18 decimals,
//! directly comparable with the scaled minimum.

use fundme_types::{FundMeError, PriceData, Result, Wei};

/// USD value of `amount` at `price`.
///
/// # Errors
/// - `OracleUnavailable` if the answer is not positive or decimals unsupported
/// - `ArithmeticOverflow` if `amount * answer` exceeds `u128`
pub fn usd_value(amount: Wei, price: &PriceData) -> Result<u128> {
    let answer = price.positive_answer()?;
    let scale = price.scale()?;
    amount
        .checked_mul(answer)
        .map(|product| product / scale)
        .ok_or(FundMeError::ArithmeticOverflow {
            operation: "usd conversion",
        })
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use fundme_types::constants::{MOCK_INITIAL_ANSWER, USD_SCALE, WEI_PER_ETHER};

    use super::*;

    fn mock_price() -> PriceData {
        PriceData::new(MOCK_INITIAL_ANSWER, 8, Utc::now())
    }

    #[test]
    fn one_ether_at_2000() {
        let usd = usd_value(WEI_PER_ETHER, &mock_price()).unwrap();
        assert_eq!(usd, 2000 * USD_SCALE);
    }

    #[test]
    fn zero_amount_is_zero_usd() {
        assert_eq!(usd_value(0, &mock_price()).unwrap(), 0);
    }

    #[test]
    fn fifty_usd_boundary() {
        // 50 / 2000 = 0.025 ether
        let amount = WEI_PER_ETHER / 40;
        assert_eq!(usd_value(amount, &mock_price()).unwrap(), 50 * USD_SCALE);
        assert!(usd_value(amount - 1, &mock_price()).unwrap() < 50 * USD_SCALE);
    }

    #[test]
    fn decimals_are_respected() {
        // Same 2000 USD price expressed with 18 decimals.
        let price = PriceData::new(2000 * 1_000_000_000_000_000_000, 18, Utc::now());
        assert_eq!(
            usd_value(WEI_PER_ETHER / 10, &price).unwrap(),
            200 * USD_SCALE
        );
    }

    #[test]
    fn overflow_is_reported() {
        let err = usd_value(u128::MAX, &mock_price()).unwrap_err();
        assert!(matches!(err, FundMeError::ArithmeticOverflow { .. }));
    }

    #[test]
    fn negative_answer_is_oracle_error() {
        let price = PriceData::new(-1, 8, Utc::now());
        let err = usd_value(WEI_PER_ETHER, &price).unwrap_err();
        assert!(matches!(err, FundMeError::OracleUnavailable { .. }));
    }
}
