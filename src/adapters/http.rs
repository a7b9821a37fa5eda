//! Shared HTTP plumbing for provider adapters.
//!
//! Every outbound provider request goes through one [`ProviderClient`]: a
//! pooled reqwest client with the configured transport timeout and a
//! client-side token bucket shared by the embedding and generation adapters.
//! Throttling only delays requests; failed requests are never retried here.

use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::domain::errors::{RagError, RagResult};
use crate::domain::models::config::{ProviderConfig, RateLimitConfig};

/// Rate-limited HTTP client shared by provider adapters.
#[derive(Clone)]
pub struct ProviderClient {
    http: reqwest::Client,
    limiter: Arc<DefaultDirectRateLimiter>,
}

impl std::fmt::Debug for ProviderClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderClient").finish_non_exhaustive()
    }
}

impl ProviderClient {
    pub fn new(provider: &ProviderConfig, rate_limit: &RateLimitConfig) -> RagResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(provider.timeout_secs))
            .build()
            .map_err(|e| RagError::Configuration(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            limiter: Arc::new(RateLimiter::direct(quota(rate_limit)?)),
        })
    }

    /// POST `body` as JSON and decode a JSON response.
    ///
    /// Transport failures, non-2xx statuses and undecodable bodies all map to
    /// [`RagError::Provider`] tagged with `provider`.
    pub async fn post_json<B, R>(
        &self,
        provider: &str,
        request: reqwest::RequestBuilder,
        body: &B,
    ) -> RagResult<R>
    where
        B: Serialize + Sync + ?Sized,
        R: DeserializeOwned,
    {
        self.limiter.until_ready().await;

        let response = request
            .json(body)
            .send()
            .await
            .map_err(|e| RagError::provider(provider, format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unable to read response body".to_string());
            return Err(RagError::provider(
                provider,
                format!("API returned {status}: {}", truncate(&body, 500)),
            ));
        }

        response
            .json::<R>()
            .await
            .map_err(|e| RagError::provider(provider, format!("failed to parse response: {e}")))
    }

    pub fn post(&self, url: &str) -> reqwest::RequestBuilder {
        self.http.post(url)
    }
}

fn quota(config: &RateLimitConfig) -> RagResult<Quota> {
    let invalid = || {
        RagError::Configuration(format!(
            "invalid rate limit: {} requests/second",
            config.requests_per_second
        ))
    };
    if config.requests_per_second.is_nan() || config.requests_per_second <= 0.0 {
        return Err(invalid());
    }
    let burst = NonZeroU32::new(config.burst_size)
        .ok_or_else(|| RagError::Configuration("burst_size must be at least 1".to_string()))?;

    let period = Duration::try_from_secs_f64(1.0 / config.requests_per_second)
        .map_err(|_| invalid())?;
    let quota = Quota::with_period(period)
        .unwrap_or_else(|| Quota::per_second(NonZeroU32::MAX));
    Ok(quota.allow_burst(burst))
}

fn truncate(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
