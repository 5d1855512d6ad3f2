//! Exchange rate gateway: the one concrete endpoint of the application.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::instrument;

use crate::amount::wire_amount;
use crate::api::{ApiClient, EndpointDescriptor};
use crate::currency::Currency;
use crate::error::ApplicationError;

/// A decoded exchange-rate response: the converted amount and its currency.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "RawQuote")]
pub struct ExchangeQuote {
    pub amount: f64,
    pub currency: String,
}

impl ExchangeQuote {
    pub fn currency_type(&self) -> Option<Currency> {
        Currency::from_code(&self.currency)
    }
}

// The server is inconsistent about the amount field: it may arrive as a JSON
// string or a number. An unparseable string decodes to 0.0.
#[derive(Deserialize)]
struct RawQuote {
    amount: RawAmount,
    currency: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawAmount {
    Number(f64),
    Text(String),
}

impl From<RawQuote> for ExchangeQuote {
    fn from(raw: RawQuote) -> Self {
        let amount = match raw.amount {
            RawAmount::Number(n) => n,
            RawAmount::Text(s) => s.trim().parse().unwrap_or(0.0),
        };
        ExchangeQuote {
            amount,
            currency: raw.currency,
        }
    }
}

#[async_trait]
pub trait RateGateway: Send + Sync {
    /// Converts `from_amount` units of `from` into `to` at the current rate.
    async fn fetch_rate(
        &self,
        from_amount: f64,
        from: Currency,
        to: Currency,
    ) -> Result<ExchangeQuote, ApplicationError>;
}

pub struct HttpRateGateway {
    client: ApiClient,
    base_url: String,
    timeout: Duration,
}

impl HttpRateGateway {
    pub fn new(client: ApiClient, base_url: &str, timeout: Duration) -> Self {
        HttpRateGateway {
            client,
            base_url: base_url.to_string(),
            timeout,
        }
    }
}

#[async_trait]
impl RateGateway for HttpRateGateway {
    #[instrument(
        name = "FetchRate",
        skip(self),
        fields(amount = %from_amount, from = %from, to = %to)
    )]
    async fn fetch_rate(
        &self,
        from_amount: f64,
        from: Currency,
        to: Currency,
    ) -> Result<ExchangeQuote, ApplicationError> {
        // The amount format in the path is part of the wire contract: two
        // fraction digits, dot separator, no grouping.
        let path = format!(
            "/currency/commercial/exchange/{}-{}/{}/latest",
            wire_amount(from_amount),
            from.code(),
            to.code()
        );
        let descriptor = EndpointDescriptor::get(&self.base_url, &path).timeout(self.timeout);
        self.client.execute(&descriptor).await
    }
}
