//! Signed HTTP requests to the DNS Made Easy API

use chrono::Utc;
use reqwest::Method;
use reqwest::header::{CONTENT_TYPE, USER_AGENT as USER_AGENT_HEADER};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{ProviderError, Result};
use crate::http_client::HttpUtils;
use crate::traits::{ErrorContext, ProviderErrorMapper, RawApiError};
use crate::utils::log_sanitizer::truncate_for_log;

use super::sign::request_date;
use super::types::ErrorResponse;
use super::{DnsMadeEasyClient, USER_AGENT};

const HEADER_API_KEY: &str = "x-dnsme-apiKey";
const HEADER_HMAC: &str = "x-dnsme-hmac";
const HEADER_REQUEST_DATE: &str = "x-dnsme-requestDate";

impl DnsMadeEasyClient {
    /// GET `path` and parse the JSON body
    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str, ctx: ErrorContext) -> Result<T> {
        let text = self.request(Method::GET, path, &[], None, ctx).await?;
        HttpUtils::parse_json(&text, self.provider_name())
    }

    /// POST `body` to `path`, returning the raw response text
    pub(crate) async fn post<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        ctx: ErrorContext,
    ) -> Result<String> {
        let payload =
            serde_json::to_string(body).map_err(|e| ProviderError::SerializationError {
                provider: self.provider_name().to_string(),
                detail: e.to_string(),
            })?;
        self.request(Method::POST, path, &[], Some(payload), ctx)
            .await
    }

    /// DELETE `path` with the given query parameters
    pub(crate) async fn delete(
        &self,
        path: &str,
        query: &[(&str, String)],
        ctx: ErrorContext,
    ) -> Result<String> {
        self.request(Method::DELETE, path, query, None, ctx).await
    }

    /// Signs and sends one request.
    ///
    /// Non-2xx statuses are mapped to errors. The rate-limit delay runs after
    /// a successful response only.
    async fn request(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        payload: Option<String>,
        ctx: ErrorContext,
    ) -> Result<String> {
        // Fresh date per request
        let now = request_date(Utc::now());
        let hmac = self.sign(&now)?;

        let url = format!("{}{path}", self.base_url);
        let mut request = self
            .client
            .request(method.clone(), &url)
            .header(HEADER_API_KEY, &self.api_key)
            .header(HEADER_HMAC, hmac)
            .header(HEADER_REQUEST_DATE, &now)
            .header(USER_AGENT_HEADER, USER_AGENT);

        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(payload) = payload {
            log::debug!("Request Body: {}", truncate_for_log(&payload));
            request = request
                .header(CONTENT_TYPE, "application/json")
                .body(payload);
        }

        let (status, response_text) =
            HttpUtils::execute_request(request, self.provider_name(), method.as_str(), path)
                .await?;

        if !(200..300).contains(&status) {
            let messages = serde_json::from_str::<ErrorResponse>(&response_text)
                .map(|e| e.error)
                .unwrap_or_default();
            let raw = RawApiError::new(status, response_text).with_messages(messages);
            let error = self.map_error(raw, ctx);
            match &error {
                ProviderError::NotFound { .. } => log::debug!("{error}"),
                e if e.is_expected() => log::warn!("{error}"),
                _ => log::error!("{error}"),
            }
            return Err(error);
        }

        if !self.ratelimit_delay.is_zero() {
            tokio::time::sleep(self.ratelimit_delay).await;
        }

        Ok(response_text)
    }
}
