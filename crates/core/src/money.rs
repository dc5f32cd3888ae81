//! Price value object.
//!
//! The CMS stores prices as decimal strings (`"1000"`, `"2499.50"`). They are
//! read into `rust_decimal::Decimal` so comparisons and splits never go
//! through binary floating point. Accepted input is a plain, non-negative
//! decimal: no thousands separators, no currency symbols.

use core::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// Scale used when prices are shown to shoppers.
pub const DISPLAY_SCALE: u32 = 2;

/// A non-negative decimal price in the store currency.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// Parse a price string as delivered by the CMS.
    pub fn parse(raw: &str) -> DomainResult<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(DomainError::invalid_price("empty price"));
        }

        let value = Decimal::from_str(trimmed)
            .map_err(|e| DomainError::invalid_price(format!("{trimmed:?}: {e}")))?;

        Self::from_decimal(value)
    }

    pub fn from_decimal(value: Decimal) -> DomainResult<Self> {
        if value.is_sign_negative() && !value.is_zero() {
            return Err(DomainError::invalid_price(format!("negative price {value}")));
        }
        Ok(Self(value))
    }

    pub fn amount(&self) -> Decimal {
        self.0
    }

    /// Round to `dp` places (half away from zero) and pad to exactly `dp`
    /// digits, e.g. `300` → `"300.00"`.
    pub fn to_fixed(&self, dp: u32) -> String {
        let mut value = self
            .0
            .round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero);
        value.rescale(dp);
        value.to_string()
    }

    /// One of `parts` equal installments, rounded to the display scale.
    ///
    /// The sum of the installments may differ from the price by the rounding
    /// remainder; this is a display hint, not a payment schedule.
    pub fn installment(&self, parts: u32) -> DomainResult<Self> {
        if parts == 0 {
            return Err(DomainError::validation("installment count must be positive"));
        }
        let share = self
            .0
            .checked_div(Decimal::from(parts))
            .ok_or_else(|| DomainError::validation("installment split overflowed"))?;
        Ok(Self(share.round_dp_with_strategy(
            DISPLAY_SCALE,
            RoundingStrategy::MidpointAwayFromZero,
        )))
    }

    /// `"<currency> <amount>"` using the amount exactly as parsed.
    pub fn display_with(&self, currency: &str) -> String {
        format!("{currency} {}", self.0)
    }
}

impl FromStr for Price {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl core::fmt::Display for Price {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}
