//! Google Sheets sink.
//!
//! # Responsibilities
//! - Sign a service account assertion (RS256 JWT)
//! - Exchange it for an access token and cache the token until shortly before expiry
//! - Append one row per submission with `values:append`
//!
//! # Security Constraints
//! - The private key is only read from the environment
//! - The key is never logged; `Debug` redacts it

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use url::Url;

use crate::clock::Clock;
use crate::config::SinkConfig;
use crate::sink::{SinkError, SubmissionSink};
use crate::submission::SheetRow;

pub const SERVICE_ACCOUNT_EMAIL_ENV: &str = "GOOGLE_SERVICE_ACCOUNT_EMAIL";
pub const PRIVATE_KEY_ENV: &str = "GOOGLE_PRIVATE_KEY";
pub const SHEET_ID_ENV: &str = "GOOGLE_SHEET_ID";

/// OAuth scope granting read/write access to spreadsheets.
pub const SHEETS_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets";

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_LIFETIME_SECS: i64 = 3600;
/// Refresh the cached token this long before it expires.
const REFRESH_MARGIN_SECS: i64 = 60;

/// Service account identity used to sign token requests.
#[derive(Clone)]
pub struct ServiceAccountKey {
    pub client_email: String,
    /// PEM-encoded RSA private key.
    pub private_key: String,
}

impl ServiceAccountKey {
    pub fn new(client_email: impl Into<String>, private_key: impl Into<String>) -> Self {
        Self {
            client_email: client_email.into(),
            private_key: normalize_pem(&private_key.into()),
        }
    }

    /// Read the key from `GOOGLE_SERVICE_ACCOUNT_EMAIL` and `GOOGLE_PRIVATE_KEY`.
    pub fn from_env() -> Result<Self, SinkError> {
        let client_email = require_env(SERVICE_ACCOUNT_EMAIL_ENV)?;
        let private_key = require_env(PRIVATE_KEY_ENV)?;
        Ok(Self::new(client_email, private_key))
    }
}

impl fmt::Debug for ServiceAccountKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceAccountKey")
            .field("client_email", &self.client_email)
            .field("private_key", &"<redacted>")
            .finish()
    }
}

fn require_env(name: &str) -> Result<String, SinkError> {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(SinkError::Credentials(format!(
            "Environment variable {} not set",
            name
        ))),
    }
}

/// Keys pasted into a single-line env var carry literal `\n` sequences.
fn normalize_pem(raw: &str) -> String {
    raw.replace("\\n", "\n")
}

#[derive(Debug, Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
}

#[derive(Debug, Clone)]
struct CachedToken {
    value: String,
    /// Epoch seconds.
    expires_at: i64,
}

/// Appends rows to a Google spreadsheet.
pub struct SheetsSink {
    http: reqwest::Client,
    client_email: String,
    encoding_key: EncodingKey,
    token_uri: String,
    append_url: Url,
    clock: Arc<dyn Clock>,
    token: Mutex<Option<CachedToken>>,
}

impl SheetsSink {
    pub fn new(
        config: &SinkConfig,
        spreadsheet_id: &str,
        key: ServiceAccountKey,
        timeout: Duration,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, SinkError> {
        let encoding_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes())
            .map_err(|e| SinkError::Credentials(format!("Invalid private key: {}", e)))?;

        let http = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http,
            client_email: key.client_email,
            encoding_key,
            token_uri: config.token_uri.clone(),
            append_url: append_url(config, spreadsheet_id)?,
            clock,
            token: Mutex::new(None),
        })
    }

    /// The fully built `values:append` endpoint.
    pub fn append_url(&self) -> &Url {
        &self.append_url
    }

    /// Return a cached access token, fetching a new one when needed.
    async fn access_token(&self) -> Result<String, SinkError> {
        let mut cached = self.token.lock().await;
        let now = self.clock.now().timestamp();

        if let Some(token) = cached.as_ref() {
            if token.expires_at - REFRESH_MARGIN_SECS > now {
                return Ok(token.value.clone());
            }
        }

        let fresh = self.fetch_token(now).await?;
        let value = fresh.value.clone();
        *cached = Some(fresh);
        Ok(value)
    }

    async fn fetch_token(&self, now: i64) -> Result<CachedToken, SinkError> {
        let claims = AssertionClaims {
            iss: &self.client_email,
            scope: SHEETS_SCOPE,
            aud: &self.token_uri,
            iat: now,
            exp: now + ASSERTION_LIFETIME_SECS,
        };
        let assertion =
            jsonwebtoken::encode(&Header::new(Algorithm::RS256), &claims, &self.encoding_key)?;

        let response = self
            .http
            .post(&self.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SinkError::Token(format!("{}: {}", status, body)));
        }

        let token: TokenResponse = response.json().await?;
        tracing::debug!(expires_in = ?token.expires_in, "Fetched sheets access token");

        Ok(CachedToken {
            value: token.access_token,
            expires_at: now + token.expires_in.unwrap_or(ASSERTION_LIFETIME_SECS),
        })
    }

    async fn forget_token(&self) {
        *self.token.lock().await = None;
    }
}

/// `{base}/v4/spreadsheets/{id}/values/{range}:append?valueInputOption={option}`
fn append_url(config: &SinkConfig, spreadsheet_id: &str) -> Result<Url, SinkError> {
    let mut url = Url::parse(&config.api_base_url)
        .map_err(|e| SinkError::Config(format!("api_base_url: {}", e)))?;

    let range = format!("{}:append", config.range);
    url.path_segments_mut()
        .map_err(|_| SinkError::Config("api_base_url cannot be a base".into()))?
        .pop_if_empty()
        .extend([
            "v4",
            "spreadsheets",
            spreadsheet_id,
            "values",
            range.as_str(),
        ]);
    url.query_pairs_mut()
        .append_pair("valueInputOption", &config.value_input_option);

    Ok(url)
}

#[derive(Serialize)]
struct AppendBody {
    values: [[String; 4]; 1],
}

#[async_trait]
impl SubmissionSink for SheetsSink {
    async fn append(&self, row: SheetRow) -> Result<(), SinkError> {
        let token = self.access_token().await?;
        let body = AppendBody {
            values: [row.into_values()],
        };

        let response = self
            .http
            .post(self.append_url.clone())
            .bearer_auth(token)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        if status == reqwest::StatusCode::UNAUTHORIZED {
            self.forget_token().await;
        }
        let body = response.text().await.unwrap_or_default();
        Err(SinkError::Status {
            status: status.as_u16(),
            body,
        })
    }
}
