//! External rate source seam.
//!
//! A source returns every rate it knows relative to one base currency; the
//! calculator only ever needs the two legs of the mid-market cross rate.

pub mod exchangerate_api;

use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::FetchError;
use crate::models::CrossRate;

pub use exchangerate_api::ExchangeRateApi;

/// Mid-market legs derived from a rate table.
pub type MidRates = CrossRate;

/// Rates relative to `base`: one `base` unit buys `rates[code]` units of `code`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateTable {
    pub base: String,
    pub rates: HashMap<String, f64>,
}

impl RateTable {
    /// Derives `base per intermediate` and `target per intermediate`.
    ///
    /// With base RUB, intermediate USD and target KRW this yields RUB per USD
    /// (`1 / USD`) and KRW per USD (`KRW / USD`).
    pub fn mid_rates(&self, intermediate: &str, target: &str) -> Result<MidRates, FetchError> {
        let via = self.positive(intermediate)?;
        let to = self.positive(target)?;
        Ok(CrossRate::new(1.0 / via, to / via))
    }

    fn positive(&self, code: &str) -> Result<f64, FetchError> {
        match self.rates.get(code) {
            Some(&r) if r.is_finite() && r > 0.0 => Ok(r),
            Some(&r) => Err(FetchError::MalformedResponse(format!(
                "{code} rate {r} is not positive"
            ))),
            None => Err(FetchError::MalformedResponse(format!(
                "{code} missing from {} rates",
                self.base
            ))),
        }
    }
}

#[async_trait]
pub trait RateSource: Send + Sync {
    async fn latest(&self, base: &str) -> Result<RateTable, FetchError>;
}
