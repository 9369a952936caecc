use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, info};
use url::Url;

use crate::config::Settings;
use crate::error::FetchError;
use crate::rates::{RateSource, RateTable};

pub const DEFAULT_ENDPOINT: &str = "https://api.exchangerate-api.com/v4/latest/";

/// Public `latest/{BASE}` rates endpoint: `GET https://.../v4/latest/RUB`.
#[derive(Debug, Clone)]
pub struct ExchangeRateApi {
    client: reqwest::Client,
    endpoint: Url,
}

#[derive(Debug, Deserialize)]
struct LatestResponse {
    base: Option<String>,
    rates: Option<HashMap<String, f64>>,
}

impl ExchangeRateApi {
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: normalize_endpoint(endpoint)?,
        })
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, FetchError> {
        Self::new(
            &settings.rate_endpoint,
            Duration::from_secs(settings.request_timeout_secs),
        )
    }

    pub fn url_for(&self, base: &str) -> Result<Url, FetchError> {
        Ok(self.endpoint.join(&base.to_uppercase())?)
    }
}

#[async_trait]
impl RateSource for ExchangeRateApi {
    async fn latest(&self, base: &str) -> Result<RateTable, FetchError> {
        let url = self.url_for(base)?;
        debug!("fetching rates from {}", url);

        let resp = self.client.get(url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = resp.text().await?;
        let table = parse_latest(&body, base)?;
        info!("{}: fetched {} rates", table.base, table.rates.len());
        Ok(table)
    }
}

/// Trailing slash matters for `Url::join`; without it the last segment is replaced.
fn normalize_endpoint(endpoint: &str) -> Result<Url, FetchError> {
    if endpoint.ends_with('/') {
        Ok(Url::parse(endpoint)?)
    } else {
        Ok(Url::parse(&format!("{endpoint}/"))?)
    }
}

fn parse_latest(body: &str, requested_base: &str) -> Result<RateTable, FetchError> {
    let parsed: LatestResponse = serde_json::from_str(body)
        .map_err(|e| FetchError::MalformedResponse(e.to_string()))?;

    let rates = parsed
        .rates
        .ok_or_else(|| FetchError::MalformedResponse("missing rates".to_string()))?;

    Ok(RateTable {
        base: parsed.base.unwrap_or_else(|| requested_base.to_uppercase()),
        rates,
    })
}
