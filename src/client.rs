use crate::config::ConsoleConfig;
use crate::errors::{ApiErrorBody, ConsoleError};
use reqwest::{Method, RequestBuilder};
use serde::{de::DeserializeOwned, Serialize};
use std::sync::RwLock;
use std::time::Duration;
use tracing::{debug, instrument, warn};
use url::Url;

/// Backend paths, relative to the configured API base URL.
pub mod endpoints {
    pub const LOGIN: &str = "auth/login";
    pub const FORGOT_PASSWORD: &str = "auth/forgot-password";
    pub const RESET_PASSWORD: &str = "auth/reset-password";
    pub const MILLS: &str = "mills";
    pub const SHADES: &str = "shades";
    pub const PAPER_MASTER: &str = "paper-master";
    pub const PAPER_MASTER_SEARCH: &str = "paper-master/search";
    pub const REELS: &str = "reels";
    pub const REELS_SEARCH: &str = "reels/search";
    pub const REELS_HISTORY: &str = "reels/history";
    pub const REELS_STOCK_OUT: &str = "reels/stock-out";
    pub const INVENTORY_SEARCH: &str = "inventory/search";
    pub const PAPER_PURCHASES: &str = "paper-purchases";
    pub const GENERATE_REEL_NUMBER: &str = "paper-purchases/generate-reel-number";
    pub const MASTER_PAPER_NAMES: &str = "master-data/paper-names";
    pub const MASTER_MILL_NAMES: &str = "master-data/mill-names";
    pub const MASTER_SHADES: &str = "master-data/shades";
}

/// Thin JSON-over-HTTP client shared by every service.
///
/// Holds the base URL and, once logged in, the session token which is sent
/// as a bearer credential. There is no retry or backoff: a failed call is
/// reported to the caller as-is.
#[derive(Debug)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    token: RwLock<Option<String>>,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ConsoleError> {
        let mut normalized = base_url.trim().trim_end_matches('/').to_string();
        normalized.push('/');
        let base_url = Url::parse(&normalized)?;

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("paperstock/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url,
            token: RwLock::new(None),
        })
    }

    pub fn from_config(config: &ConsoleConfig) -> Result<Self, ConsoleError> {
        Self::new(&config.api_base_url(), config.request_timeout())
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn set_token(&self, token: Option<String>) {
        match self.token.write() {
            Ok(mut guard) => *guard = token,
            Err(poisoned) => *poisoned.into_inner() = token,
        }
    }

    pub fn token(&self) -> Option<String> {
        match self.token.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn endpoint(&self, path: &str) -> Result<Url, ConsoleError> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ConsoleError> {
        let request = self.request(Method::GET, path)?;
        self.send(Method::GET, path, request).await
    }

    pub async fn get_with_query<Q, T>(&self, path: &str, query: &Q) -> Result<T, ConsoleError>
    where
        Q: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.request(Method::GET, path)?.query(query);
        self.send(Method::GET, path, request).await
    }

    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, ConsoleError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.request(Method::POST, path)?.json(body);
        self.send(Method::POST, path, request).await
    }

    pub async fn put<B, T>(&self, path: &str, body: &B) -> Result<T, ConsoleError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.request(Method::PUT, path)?.json(body);
        self.send(Method::PUT, path, request).await
    }

    pub async fn delete(&self, path: &str) -> Result<(), ConsoleError> {
        let request = self.request(Method::DELETE, path)?;
        let _: serde_json::Value = self.send(Method::DELETE, path, request).await?;
        Ok(())
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, ConsoleError> {
        let url = self.endpoint(path)?;
        let mut request = self
            .http
            .request(method, url)
            .header(reqwest::header::ACCEPT, "application/json");
        if let Some(token) = self.token() {
            request = request.bearer_auth(token);
        }
        Ok(request)
    }

    #[instrument(skip(self, request))]
    async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        request: RequestBuilder,
    ) -> Result<T, ConsoleError> {
        debug!("sending request");
        let response = request.send().await.map_err(|e| {
            warn!(error = %e, "request failed before a response arrived");
            ConsoleError::Http(e)
        })?;

        let status = response.status();
        let bytes = response.bytes().await?;

        if !status.is_success() {
            let message = serde_json::from_slice::<ApiErrorBody>(&bytes)
                .ok()
                .and_then(ApiErrorBody::into_message);
            warn!(status = status.as_u16(), message = ?message, "backend rejected request");
            return Err(ConsoleError::from_status(status.as_u16(), message));
        }

        // Some endpoints answer 200/204 with an empty body.
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(serde_json::from_slice(b"null")?);
        }
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_join_under_base_path() {
        let client = ApiClient::new("http://localhost:9090/api", Duration::from_secs(5)).unwrap();
        assert_eq!(
            client.endpoint(endpoints::MILLS).unwrap().as_str(),
            "http://localhost:9090/api/mills"
        );
        assert_eq!(
            client.endpoint("/mills/7").unwrap().as_str(),
            "http://localhost:9090/api/mills/7"
        );
    }

    #[test]
    fn token_round_trips() {
        let client = ApiClient::new("http://localhost:9090/api/", Duration::from_secs(5)).unwrap();
        assert_eq!(client.token(), None);
        client.set_token(Some("abc".into()));
        assert_eq!(client.token().as_deref(), Some("abc"));
        client.set_token(None);
        assert_eq!(client.token(), None);
    }

    #[test]
    fn rejects_garbage_base_url() {
        assert!(ApiClient::new("not a url", Duration::from_secs(5)).is_err());
    }
}
