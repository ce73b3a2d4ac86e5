//! Typed client for the Glyph backend `/auth` surface.
//!
//! Normalizes application errors into [`GlyphError::Api`]: a non-2xx
//! response surfaces the body's `detail` field when present, otherwise a
//! generic `HTTP <status>` message. Nothing is retried automatically.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::error::{GlyphError, Result};
use crate::token::GlyphToken;
use crate::trust::SignalSettings;
use crate::webauthn::types::{
    AuthenticationCredential, AuthenticationOptions, RegistrationCredential, RegistrationOptions,
};

const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000/auth";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Backend connection configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL including the `/auth` path segment.
    pub base_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ApiConfig {
    /// Load configuration from environment variables.
    ///
    /// Optional: `GLYPH_API_BASE`, `GLYPH_HTTP_TIMEOUT_SECS`.
    pub fn from_env() -> Self {
        let base_url = std::env::var("GLYPH_API_BASE")
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        let timeout = std::env::var("GLYPH_HTTP_TIMEOUT_SECS")
            .ok()
            .and_then(|secs| secs.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_TIMEOUT);

        Self { base_url, timeout }
    }
}

/// Federated login provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OauthProvider {
    Google,
    Microsoft,
    Github,
    Twitter,
}

impl OauthProvider {
    pub const ALL: [OauthProvider; 4] = [
        Self::Google,
        Self::Microsoft,
        Self::Github,
        Self::Twitter,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Google => "google",
            Self::Microsoft => "microsoft",
            Self::Github => "github",
            Self::Twitter => "twitter",
        }
    }
}

impl fmt::Display for OauthProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OauthProvider {
    type Err = GlyphError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "google" => Ok(Self::Google),
            "microsoft" => Ok(Self::Microsoft),
            "github" => Ok(Self::Github),
            "twitter" | "x" => Ok(Self::Twitter),
            other => Err(GlyphError::Validation(format!(
                "Unknown provider '{other}' (expected google, microsoft, github or twitter)"
            ))),
        }
    }
}

/// Backend surface the ceremony adapter depends on.
#[async_trait]
pub trait AuthApi: Send + Sync {
    async fn register_start(&self, email: &str) -> Result<RegistrationOptions>;
    async fn register_finish(
        &self,
        email: &str,
        credential: &RegistrationCredential,
    ) -> Result<GlyphToken>;
    async fn authenticate_start(&self, email: &str) -> Result<AuthenticationOptions>;
    async fn authenticate_finish(
        &self,
        email: &str,
        credential: &AuthenticationCredential,
    ) -> Result<GlyphToken>;
}

/// Backend surface the trust-signal registry depends on.
#[async_trait]
pub trait SettingsApi: Send + Sync {
    async fn fetch_signal_settings(&self) -> Result<SignalSettings>;
    async fn submit_signal_settings(&self, settings: &SignalSettings) -> Result<()>;
}

#[derive(Debug, Serialize)]
struct EmailRequest<'a> {
    email: &'a str,
}

#[derive(Debug, Serialize)]
struct FinishRequest<'a, C: Serialize> {
    email: &'a str,
    credential: &'a C,
}

/// Error body shape for non-2xx responses: `{detail}` is optional.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: Option<String>,
}

pub struct ApiClient {
    client: Client,
    config: ApiConfig,
}

impl ApiClient {
    pub fn new(config: ApiConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    pub fn from_env() -> Result<Self> {
        Self::new(ApiConfig::from_env())
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Redirect URL for a federated login flow. The flow itself runs in a
    /// browser; the client only constructs the entry point.
    pub fn login_url(&self, provider: OauthProvider) -> String {
        format!("{}/login/{}", self.config.base_url, provider.as_str())
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.config.base_url, endpoint)
    }

    #[instrument(level = "debug", skip(self, body))]
    async fn post_json<B, R>(&self, endpoint: &str, body: &B) -> Result<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let response = self.client.post(self.url(endpoint)).json(body).send().await?;
        let response = Self::check(response).await?;
        debug!("Request completed");
        Ok(response.json().await?)
    }

    #[instrument(level = "debug", skip(self))]
    async fn get_json<R: DeserializeOwned>(&self, endpoint: &str) -> Result<R> {
        let response = self.client.get(self.url(endpoint)).send().await?;
        let response = Self::check(response).await?;
        Ok(response.json().await?)
    }

    #[instrument(level = "debug", skip(self, body))]
    async fn put_json<B: Serialize + ?Sized>(&self, endpoint: &str, body: &B) -> Result<()> {
        let response = self.client.put(self.url(endpoint)).json(body).send().await?;
        Self::check(response).await?;
        Ok(())
    }

    /// Map a non-2xx response to [`GlyphError::Api`].
    async fn check(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.bytes().await.unwrap_or_default();
        let message = error_message(status, &body);
        warn!(status = status.as_u16(), message = %message, "Backend returned an error");
        Err(GlyphError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

/// User-facing message for an error response: the `detail` field when the
/// body carries one, else `HTTP <status>`.
fn error_message(status: StatusCode, body: &[u8]) -> String {
    serde_json::from_slice::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.detail)
        .unwrap_or_else(|| format!("HTTP {}", status.as_u16()))
}

#[async_trait]
impl AuthApi for ApiClient {
    async fn register_start(&self, email: &str) -> Result<RegistrationOptions> {
        self.post_json("/webauthn/register/start", &EmailRequest { email })
            .await
    }

    async fn register_finish(
        &self,
        email: &str,
        credential: &RegistrationCredential,
    ) -> Result<GlyphToken> {
        self.post_json(
            "/webauthn/register/finish",
            &FinishRequest { email, credential },
        )
        .await
    }

    async fn authenticate_start(&self, email: &str) -> Result<AuthenticationOptions> {
        self.post_json("/webauthn/authenticate/start", &EmailRequest { email })
            .await
    }

    async fn authenticate_finish(
        &self,
        email: &str,
        credential: &AuthenticationCredential,
    ) -> Result<GlyphToken> {
        self.post_json(
            "/webauthn/authenticate/finish",
            &FinishRequest { email, credential },
        )
        .await
    }
}

#[async_trait]
impl SettingsApi for ApiClient {
    async fn fetch_signal_settings(&self) -> Result<SignalSettings> {
        self.get_json("/settings/trust-signals").await
    }

    async fn submit_signal_settings(&self, settings: &SignalSettings) -> Result<()> {
        self.put_json("/settings/trust-signals", settings).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_prefers_detail() {
        let message = error_message(
            StatusCode::TOO_MANY_REQUESTS,
            br#"{"detail": "rate limited"}"#,
        );
        assert_eq!(message, "rate limited");
    }

    #[test]
    fn test_error_message_falls_back_to_status() {
        assert_eq!(error_message(StatusCode::BAD_GATEWAY, b""), "HTTP 502");
        assert_eq!(
            error_message(StatusCode::NOT_FOUND, b"<html>not json</html>"),
            "HTTP 404"
        );
        assert_eq!(
            error_message(StatusCode::INTERNAL_SERVER_ERROR, br#"{"other": 1}"#),
            "HTTP 500"
        );
    }

    #[test]
    fn test_login_url_per_provider() {
        let client = ApiClient::new(ApiConfig {
            base_url: "https://glyph.id/auth".into(),
            ..ApiConfig::default()
        })
        .unwrap();
        assert_eq!(
            client.login_url(OauthProvider::Google),
            "https://glyph.id/auth/login/google"
        );
        assert_eq!(
            client.login_url(OauthProvider::Twitter),
            "https://glyph.id/auth/login/twitter"
        );
    }

    #[test]
    fn test_provider_from_str() {
        assert_eq!(
            "GitHub".parse::<OauthProvider>().unwrap(),
            OauthProvider::Github
        );
        assert_eq!("x".parse::<OauthProvider>().unwrap(), OauthProvider::Twitter);
        assert!(matches!(
            "facebook".parse::<OauthProvider>(),
            Err(GlyphError::Validation(_))
        ));
    }

    #[test]
    fn test_config_default() {
        let config = ApiConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
    }
}
