use error_stack::{Report, ResultExt};
use futures::future::BoxFuture;
use serde::Deserialize;
use tracing::info;

use crate::config::{Secret, TaapiConfig};
use crate::error::IndicatorError;
use crate::indicator::IndicatorSource;

/// Money flow index endpoint.
const MFI_PATH: &str = "/mfi";

/// Client for the taapi.io indicator API.
pub struct TaapiClient {
    client: reqwest::Client,
    base_url: String,
    api_key: Secret,
    exchange: String,
    interval: String,
}

impl TaapiClient {
    pub fn new(client: reqwest::Client, config: &TaapiConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_owned(),
            api_key: config.api_key.clone(),
            exchange: config.exchange.clone(),
            interval: config.interval.clone(),
        }
    }
}

impl IndicatorSource for TaapiClient {
    fn fetch(&self, symbol: &str) -> BoxFuture<'_, Result<f64, Report<IndicatorError>>> {
        let symbol = symbol.to_owned();
        Box::pin(async move {
            let url = format!("{}{}", self.base_url, MFI_PATH);
            let params = [
                ("secret", self.api_key.expose()),
                ("exchange", self.exchange.as_str()),
                ("symbol", symbol.as_str()),
                ("interval", self.interval.as_str()),
            ];

            // `without_url` keeps the API secret out of transport error messages
            let response = self
                .client
                .get(&url)
                .query(&params)
                .send()
                .await
                .map_err(reqwest::Error::without_url)
                .change_context(IndicatorError::Request {
                    symbol: symbol.clone(),
                })?;

            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(Report::new(IndicatorError::Status {
                    symbol: symbol.clone(),
                })
                .attach(format!("HTTP status: {status}"))
                .attach(format!("body: {body}")));
            }

            let payload: TaapiValue =
                response
                    .json()
                    .await
                    .change_context(IndicatorError::ResponseParse {
                        symbol: symbol.clone(),
                    })?;

            let value = payload.value.ok_or_else(|| {
                Report::new(IndicatorError::MissingValue {
                    symbol: symbol.clone(),
                })
            })?;

            info!(symbol = %symbol, mfi = value, "MFI for {symbol}: {value}");

            Ok(value)
        })
    }
}

#[derive(Debug, Deserialize)]
struct TaapiValue {
    value: Option<f64>,
}
