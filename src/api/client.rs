//! Backend REST client with timeout, paging and retry handling.
//!
//! # Responsibilities
//! - Build collection URLs against the configured base URL
//! - Page through list endpoints until the last page
//! - Retry transient failures with jittered backoff
//! - Map transport and status failures to [`ApiError`]

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use url::Url;

use crate::api::source::ConfigSource;
use crate::api::types::{ApiError, ApiResult, ListResult};
use crate::config::{ApiConfig, RetryConfig};
use crate::domain::{Access, AccessGroup, EmailsSetting, Setting, EMAILS_SETTING};
use crate::observability::metrics;
use crate::resilience::backoff::delay_for;
use crate::resilience::retries::{is_retryable_error, is_retryable_status};

pub const ACCESS_PATH: &str = "api/collections/access/records";
pub const ACCESS_GROUPS_PATH: &str = "api/collections/access_groups/records";
pub const SETTINGS_PATH: &str = "api/collections/settings/records";

/// REST client for the certificate backend.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: Url,
    config: ApiConfig,
    retries: RetryConfig,
}

impl ApiClient {
    /// Create a new client.
    ///
    /// # Arguments
    /// * `config` - Backend location, credentials and paging
    /// * `retries` - Retry policy applied to every request
    pub fn new(config: ApiConfig, retries: RetryConfig) -> ApiResult<Self> {
        let mut base_url = Url::parse(&config.base_url)
            .map_err(|e| ApiError::InvalidUrl(format!("'{}': {}", config.base_url, e)))?;
        // Url::join drops the last segment unless the base ends with '/'
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let mut headers = HeaderMap::new();
        if let Some(token) = &config.auth_token {
            let value = HeaderValue::from_str(token)
                .map_err(|_| ApiError::InvalidUrl("auth token is not a valid header value".to_string()))?;
            headers.insert(AUTHORIZATION, value);
        }

        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(headers)
            .build()
            .map_err(|e| ApiError::Transport {
                path: base_url.to_string(),
                message: e.to_string(),
            })?;

        tracing::debug!(base_url = %base_url, "Backend API client initialized");

        Ok(Self {
            http,
            base_url,
            config,
            retries,
        })
    }

    /// Get the base URL requests are resolved against.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn url(&self, path: &str) -> ApiResult<Url> {
        self.base_url
            .join(path)
            .map_err(|e| ApiError::InvalidUrl(format!("'{}': {}", path, e)))
    }

    /// GET `path` with query parameters, decoding JSON, retrying transient failures.
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> ApiResult<T> {
        let url = self.url(path)?;
        let attempts = self.retries.attempts();
        let mut attempt = 0;

        loop {
            let result = self.get_once(&url, path, query).await;
            attempt += 1;

            match result {
                Ok(value) => return Ok(value),
                Err((err, retryable)) if retryable && attempt < attempts => {
                    let delay = delay_for(&self.retries, attempt);
                    tracing::warn!(
                        path,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "Transient backend failure, retrying"
                    );
                    metrics::record_retry(path);
                    tokio::time::sleep(delay).await;
                }
                Err((err, _)) => return Err(err),
            }
        }
    }

    /// One attempt. The flag tells whether the failure is transient.
    async fn get_once<T: DeserializeOwned>(
        &self,
        url: &Url,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, (ApiError, bool)> {
        let response = match self.http.get(url.clone()).query(query).send().await {
            Ok(response) => response,
            Err(e) => {
                let retryable = is_retryable_error(&e);
                let err = if e.is_timeout() {
                    ApiError::Timeout {
                        path: path.to_string(),
                        secs: self.config.timeout_secs,
                    }
                } else {
                    ApiError::Transport {
                        path: path.to_string(),
                        message: e.to_string(),
                    }
                };
                return Err((err, retryable));
            }
        };

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err((
                ApiError::Status {
                    path: path.to_string(),
                    status: status.as_u16(),
                    body,
                },
                is_retryable_status(status),
            ));
        }

        let bytes = response.bytes().await.map_err(|e| {
            (
                ApiError::Transport {
                    path: path.to_string(),
                    message: e.to_string(),
                },
                true,
            )
        })?;

        serde_json::from_slice(&bytes).map_err(|e| {
            (
                ApiError::Decode {
                    path: path.to_string(),
                    message: e.to_string(),
                },
                false,
            )
        })
    }

    /// Fetch every page of a collection listing.
    async fn get_full_list<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> ApiResult<Vec<T>> {
        let mut items = Vec::new();
        let mut page: u32 = 1;

        loop {
            let mut query: Vec<(&str, String)> = params.iter().map(|(k, v)| (*k, v.to_string())).collect();
            query.push(("page", page.to_string()));
            query.push(("perPage", self.config.page_size.to_string()));
            query.push(("skipTotal", "0".to_string()));

            let result: ListResult<T> = self.get_json(path, &query).await?;
            let has_more = result.has_more() && !result.items.is_empty();
            items.extend(result.items);

            if !has_more {
                break;
            }
            page += 1;
        }

        tracing::debug!(path, count = items.len(), pages = page, "Fetched full list");
        Ok(items)
    }
}

impl ConfigSource for ApiClient {
    async fn list_accesses(&self) -> ApiResult<Vec<Access>> {
        self.get_full_list(ACCESS_PATH, &[("sort", "-created"), ("filter", "deleted=null")])
            .await
    }

    async fn list_access_groups(&self) -> ApiResult<Vec<AccessGroup>> {
        self.get_full_list(ACCESS_GROUPS_PATH, &[("sort", "-created"), ("expand", "access")])
            .await
    }

    async fn get_emails(&self) -> ApiResult<Setting<EmailsSetting>> {
        let query = [
            ("page", "1".to_string()),
            ("perPage", "1".to_string()),
            ("skipTotal", "1".to_string()),
            ("filter", format!("name='{}'", EMAILS_SETTING)),
        ];
        let result: ListResult<Setting<EmailsSetting>> = self.get_json(SETTINGS_PATH, &query).await?;

        // No record yet means nobody has configured recipients
        Ok(result
            .items
            .into_iter()
            .next()
            .unwrap_or_else(Setting::empty_emails))
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url.as_str())
            .field("timeout_secs", &self.config.timeout_secs)
            .field("authenticated", &self.config.auth_token.is_some())
            .finish()
    }
}
