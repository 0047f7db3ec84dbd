//! Configuration for a FundMe ledger instance.

use chrono::Duration;
use rust_decimal::{Decimal, prelude::ToPrimitive};
use serde::{Deserialize, Serialize};

use crate::{Address, FundMeError, Result, constants};

/// Construction-time parameters of a ledger.
///
/// Loaded from JSON, e.g.:
/// ```json
/// { "owner": "0x00000000000000000000000000000000000000aa",
///   "minimum_usd": "50",
///   "max_price_age_secs": 3600 }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// The only address allowed to settle. Fixed for the ledger's lifetime.
    pub owner: Address,
    /// Minimum contribution in USD (at most 18 decimal places).
    #[serde(default = "default_minimum_usd")]
    pub minimum_usd: Decimal,
    /// Reject oracle rounds older than this many seconds. `None` accepts
    /// any age.
    #[serde(default)]
    pub max_price_age_secs: Option<u64>,
}

fn default_minimum_usd() -> Decimal {
    Decimal::from(constants::DEFAULT_MINIMUM_USD)
}

impl LedgerConfig {
    /// Config with the default 50 USD minimum and no staleness limit.
    #[must_use]
    pub fn new(owner: Address) -> Self {
        Self {
            owner,
            minimum_usd: default_minimum_usd(),
            max_price_age_secs: None,
        }
    }

    #[must_use]
    pub fn with_minimum_usd(mut self, minimum_usd: Decimal) -> Self {
        self.minimum_usd = minimum_usd;
        self
    }

    #[must_use]
    pub fn with_max_price_age_secs(mut self, secs: u64) -> Self {
        self.max_price_age_secs = Some(secs);
        self
    }

    /// Parse and validate a JSON config.
    ///
    /// # Errors
    /// `Serialization` for malformed JSON or an unparsable address, and
    /// `Configuration` if [`Self::validate`] rejects the values.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let cfg: Self = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Check the config is usable.
    ///
    /// # Errors
    /// `Configuration` for a zero owner or an unrepresentable minimum.
    pub fn validate(&self) -> Result<()> {
        if self.owner.is_zero() {
            return Err(FundMeError::Configuration(
                "owner must not be the zero address".into(),
            ));
        }
        self.minimum_usd_scaled().map(|_| ())
    }

    /// Minimum contribution as an integer with [`constants::USD_DECIMALS`]
    /// places (50 USD → `50 * 10^18`).
    ///
    /// # Errors
    /// `Configuration` if the minimum is not positive, has more than 18
    /// decimal places, or overflows.
    pub fn minimum_usd_scaled(&self) -> Result<u128> {
        if self.minimum_usd <= Decimal::ZERO {
            return Err(FundMeError::Configuration(format!(
                "minimum_usd must be positive, got {}",
                self.minimum_usd
            )));
        }
        let scale = Decimal::from(10u64.pow(constants::USD_DECIMALS));
        let scaled = self
            .minimum_usd
            .checked_mul(scale)
            .ok_or_else(|| FundMeError::Configuration(format!(
                "minimum_usd {} overflows",
                self.minimum_usd
            )))?;
        if scaled.fract() != Decimal::ZERO {
            return Err(FundMeError::Configuration(format!(
                "minimum_usd {} has more than {} decimal places",
                self.minimum_usd,
                constants::USD_DECIMALS
            )));
        }
        scaled.to_u128().ok_or_else(|| {
            FundMeError::Configuration(format!("minimum_usd {} out of range", self.minimum_usd))
        })
    }

    /// Staleness limit as a duration, if configured.
    #[must_use]
    pub fn max_price_age(&self) -> Option<Duration> {
        self.max_price_age_secs
            .and_then(|secs| i64::try_from(secs).ok())
            .and_then(Duration::try_seconds)
    }
}
