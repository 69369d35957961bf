use std::{num::NonZeroU32, time::Duration};

use async_trait::async_trait;
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use nonzero_ext::nonzero;
use reqwest::{Client, Url, header::HeaderValue};
use snafu::{IntoError, ResultExt};
use tracing::{debug, warn};

use crate::{
    config::ProviderConfig,
    models::{request_params::HistoryRequest, stock_series::StockSeries},
    providers::{
        ApiSnafu, ClientBuildSnafu, DecodeSnafu, HistoryProvider, InternalSnafu,
        InvalidBaseUrlSnafu, InvalidUserAgentSnafu, ProviderError, ProviderInitError,
        ReqwestSnafu,
        yahoo::{
            params::{YahooChartParams, construct_params},
            response::YahooChartResponse,
        },
    },
};

/// Longest slice of an error body carried into an error message.
const MAX_ERROR_BODY: usize = 200;

pub struct YahooProvider {
    client: Client,
    base_url: Url,
    params: YahooChartParams,
    limiter: DefaultDirectRateLimiter,
}

impl YahooProvider {
    /// Creates a new Yahoo provider from the `[provider]` config section.
    pub fn new(cfg: &ProviderConfig) -> Result<Self, ProviderInitError> {
        let base_url = Url::parse(&cfg.base_url).context(InvalidBaseUrlSnafu {
            url: cfg.base_url.clone(),
        })?;
        let user_agent = HeaderValue::from_str(&cfg.user_agent).context(InvalidUserAgentSnafu)?;

        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()
            .context(ClientBuildSnafu)?;

        let per_second = NonZeroU32::new(cfg.requests_per_second).unwrap_or(nonzero!(1u32));

        Ok(Self {
            client,
            base_url,
            params: YahooChartParams::default(),
            limiter: RateLimiter::direct(Quota::per_second(per_second)),
        })
    }

    fn chart_url(&self, symbol: &str) -> Result<Url, ProviderError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                InternalSnafu {
                    message: format!("base URL {} cannot carry a path", self.base_url),
                }
                .build()
            })?
            .pop_if_empty()
            .extend(["v8", "finance", "chart", symbol]);
        Ok(url)
    }
}

#[async_trait]
impl HistoryProvider for YahooProvider {
    async fn history(&self, request: HistoryRequest) -> Result<StockSeries, ProviderError> {
        let url = self.chart_url(&request.symbol)?;
        let query = construct_params(&request, &self.params);

        self.limiter.until_ready().await;
        debug!(symbol = %request.symbol, period = %request.period, "requesting yahoo chart");

        let response = self
            .client
            .get(url)
            .query(&query)
            .send()
            .await
            .context(ReqwestSnafu)?;
        let status = response.status();
        let body = response.text().await.context(ReqwestSnafu)?;

        match serde_json::from_str::<YahooChartResponse>(&body) {
            Ok(YahooChartResponse { chart }) => {
                if let Some(err) = chart.error {
                    if err.is_not_found() {
                        warn!(symbol = %request.symbol, "yahoo has no data for symbol");
                        return Ok(StockSeries::empty(request.symbol));
                    }
                    return ApiSnafu {
                        message: err.message(),
                    }
                    .fail();
                }
                if !status.is_success() {
                    return ApiSnafu {
                        message: format!("HTTP {status}"),
                    }
                    .fail();
                }
                Ok(match chart.result.and_then(|r| r.into_iter().next()) {
                    Some(result) => result.into_series(&request.symbol),
                    None => StockSeries::empty(request.symbol),
                })
            }
            Err(source) if status.is_success() => Err(DecodeSnafu.into_error(source)),
            Err(_) => {
                let excerpt: String = body.chars().take(MAX_ERROR_BODY).collect();
                ApiSnafu {
                    message: format!("HTTP {status}: {excerpt}"),
                }
                .fail()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider(base: &str) -> YahooProvider {
        let cfg = ProviderConfig {
            base_url: base.to_string(),
            ..ProviderConfig::default()
        };
        YahooProvider::new(&cfg).unwrap()
    }

    #[test]
    fn chart_url_appends_symbol_segment() {
        let p = provider("https://query1.finance.yahoo.com");
        let url = p.chart_url("M&M.NS").unwrap();
        assert_eq!(
            url.as_str(),
            "https://query1.finance.yahoo.com/v8/finance/chart/M&M.NS"
        );

        let p = provider("http://127.0.0.1:9000/proxy/");
        let url = p.chart_url("ACME.NS").unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:9000/proxy/v8/finance/chart/ACME.NS");
    }

    #[test]
    fn bad_base_url_is_an_init_error() {
        let cfg = ProviderConfig {
            base_url: "not a url".to_string(),
            ..ProviderConfig::default()
        };
        assert!(matches!(
            YahooProvider::new(&cfg),
            Err(ProviderInitError::InvalidBaseUrl { .. })
        ));
    }
}
