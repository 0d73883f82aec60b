//! Instant On cloud API client

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use tokio::sync::RwLock;

use crate::config::InstantOnConfig;
use crate::error::ApiError;
use crate::instant_on::models::{ClientSummary, TokenResponse};
use crate::instant_on::ClientSummaryApi;

const TOKEN_PATH: &str = "/aio/api/v1/mfa/validate/full";
const DEFAULT_TOKEN_LIFETIME_SECS: i64 = 1800;
const TOKEN_REFRESH_MARGIN_SECS: i64 = 60;
const MAX_TOKEN_LIFETIME_SECS: i64 = 24 * 60 * 60;

#[derive(Debug, Clone)]
struct TokenInfo {
    access_token: String,
    expires_at: Instant,
}

impl TokenInfo {
    fn from_response(resp: TokenResponse, now: Instant) -> Self {
        let lifetime = resp.expires_in.unwrap_or(DEFAULT_TOKEN_LIFETIME_SECS);
        let usable = lifetime
            .saturating_sub(TOKEN_REFRESH_MARGIN_SECS)
            .clamp(0, MAX_TOKEN_LIFETIME_SECS) as u64;
        // an unrepresentable expiry leaves the token uncached
        let expires_at = now.checked_add(Duration::from_secs(usable)).unwrap_or(now);
        Self {
            access_token: resp.access_token,
            expires_at,
        }
    }

    fn is_valid(&self, now: Instant) -> bool {
        self.expires_at > now
    }
}

pub struct InstantOnClient {
    config: InstantOnConfig,
    token: RwLock<Option<TokenInfo>>,
    http_client: Client,
}

impl InstantOnClient {
    pub fn new(config: InstantOnConfig) -> Result<Self, ApiError> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            config,
            token: RwLock::new(None),
            http_client,
        })
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}{}", self.config.api_base_url.trim_end_matches('/'), path)
    }

    fn token_url(&self) -> String {
        format!("{}{}", self.config.sso_url.trim_end_matches('/'), TOKEN_PATH)
    }

    async fn ensure_token(&self) -> Result<String, ApiError> {
        {
            let token = self.token.read().await;
            if let Some(ref t) = *token {
                if t.is_valid(Instant::now()) {
                    return Ok(t.access_token.clone());
                }
            }
        }

        let form = [
            ("username", self.config.username.as_str()),
            ("password", self.config.password.as_str()),
        ];

        let resp = self
            .http_client
            .post(self.token_url())
            .form(&form)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ApiError::Auth(format!("token request returned {}: {}", status, body)));
        }

        let token_resp: TokenResponse = resp
            .json()
            .await
            .map_err(|e| ApiError::Decode(format!("token response: {}", e)))?;

        let token_info = TokenInfo::from_response(token_resp, Instant::now());
        let access_token = token_info.access_token.clone();

        {
            let mut token = self.token.write().await;
            *token = Some(token_info);
        }

        tracing::info!("[InstantOn] Token acquired for {}", self.config.username);
        Ok(access_token)
    }

    async fn invalidate_token(&self) {
        let mut token = self.token.write().await;
        *token = None;
    }

    /// GET an API path and decode the JSON body
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let token = self.ensure_token().await?;
        let url = self.api_url(path);

        let resp = self
            .http_client
            .get(&url)
            .bearer_auth(token)
            .header("Accept", "application/json")
            .header("x-ion-api-version", self.config.api_version.as_str())
            .send()
            .await?;

        let status = resp.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            self.invalidate_token().await;
            return Err(ApiError::Auth(format!("GET {} returned {}", path, status)));
        }

        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }

        resp.json::<T>()
            .await
            .map_err(|e| ApiError::Decode(format!("GET {}: {}", path, e)))
    }
}

#[async_trait]
impl ClientSummaryApi for InstantOnClient {
    async fn client_summary(&self, site_id: &str) -> Result<ClientSummary, ApiError> {
        self.get_json(&format!("/sites/{}/clientSummary", site_id)).await
    }
}
