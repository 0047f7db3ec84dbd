//! Price data published by an external oracle.

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{FundMeError, Result, constants};

/// One round of oracle output: a fixed-point `answer` with `decimals`
/// places, and when it was last updated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceData {
    /// Price of one native coin in USD, scaled by `10^decimals`.
    pub answer: i128,
    /// Decimal places in `answer`.
    pub decimals: u8,
    /// When the oracle last updated this round.
    pub updated_at: DateTime<Utc>,
}

impl PriceData {
    #[must_use]
    pub fn new(answer: i128, decimals: u8, updated_at: DateTime<Utc>) -> Self {
        Self {
            answer,
            decimals,
            updated_at,
        }
    }

    /// The answer as an unsigned integer.
    ///
    /// # Errors
    /// `OracleUnavailable` if the answer is zero or negative.
    pub fn positive_answer(&self) -> Result<u128> {
        match u128::try_from(self.answer) {
            Ok(answer) if answer > 0 => Ok(answer),
            _ => Err(FundMeError::OracleUnavailable {
                reason: format!("non-positive answer {}", self.answer),
            }),
        }
    }

    /// `10^decimals`.
    ///
    /// # Errors
    /// `OracleUnavailable` if `decimals` exceeds [`constants::MAX_PRICE_DECIMALS`].
    pub fn scale(&self) -> Result<u128> {
        if self.decimals > constants::MAX_PRICE_DECIMALS {
            return Err(FundMeError::OracleUnavailable {
                reason: format!("unsupported decimals {}", self.decimals),
            });
        }
        Ok(10u128.pow(u32::from(self.decimals)))
    }

    /// How old this round is relative to `now`. Negative ages clamp to zero.
    #[must_use]
    pub fn age(&self, now: DateTime<Utc>) -> Duration {
        (now - self.updated_at).max(Duration::zero())
    }

    /// Human-readable price, e.g. `2000.00000000`. `None` if it cannot be
    /// represented as a [`Decimal`].
    #[must_use]
    pub fn as_decimal(&self) -> Option<Decimal> {
        Decimal::try_from_i128_with_scale(self.answer, u32::from(self.decimals)).ok()
    }
}
