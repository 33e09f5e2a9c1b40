use crate::error::{AppError, AppResult};
use crate::store::TokenPair;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Bearer-authenticated HTTP wrapper around the Spotify Web API.
///
/// Shares the live token pair with the session orchestrator; it never
/// refreshes tokens itself, it only reports 401s as `AuthRequired`.
pub struct SpotifyClient {
    http: reqwest::Client,
    api_url: String,
    tokens: Arc<RwLock<TokenPair>>,
}

impl SpotifyClient {
    pub fn new(api_url: String, tokens: Arc<RwLock<TokenPair>>) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .user_agent("spottray/0.1.0")
            .timeout(HTTP_TIMEOUT)
            .build()?;

        Ok(Self {
            http,
            api_url,
            tokens,
        })
    }

    async fn auth_headers(&self) -> AppResult<HeaderMap> {
        let tokens = self.tokens.read().await;
        let token = tokens.access_token.as_ref().ok_or(AppError::AuthRequired)?;

        let mut headers = HeaderMap::new();
        let auth_value = format!("Bearer {}", token);
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&auth_value).map_err(|e| AppError::Config(e.to_string()))?,
        );
        Ok(headers)
    }

    pub async fn get(&self, path: &str) -> AppResult<reqwest::Response> {
        let url = format!("{}{}", self.api_url, path);
        let headers = self.auth_headers().await?;
        let response = self.http.get(&url).headers(headers).send().await?;
        self.check_response(response).await
    }

    pub async fn put(&self, path: &str) -> AppResult<reqwest::Response> {
        let url = format!("{}{}", self.api_url, path);
        let headers = self.auth_headers().await?;
        let response = self.http.put(&url).headers(headers).send().await?;
        self.check_response(response).await
    }

    pub async fn post(&self, path: &str) -> AppResult<reqwest::Response> {
        let url = format!("{}{}", self.api_url, path);
        let headers = self.auth_headers().await?;
        let response = self.http.post(&url).headers(headers).send().await?;
        self.check_response(response).await
    }

    async fn check_response(&self, response: reqwest::Response) -> AppResult<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else if status == reqwest::StatusCode::UNAUTHORIZED {
            Err(AppError::AuthRequired)
        } else {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".into());
            Err(AppError::SpotifyApi {
                status: status.as_u16(),
                message,
            })
        }
    }

    pub fn http_client(&self) -> &reqwest::Client {
        &self.http
    }
}
