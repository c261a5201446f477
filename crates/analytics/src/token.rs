//! OAuth credential exchange and time-bound caching of access tokens.

use std::{fmt, sync::Arc, time::Duration};

use http::{HeaderValue, Method, header::AUTHORIZATION};
use jiff::Timestamp;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use sha2::{Digest, Sha256};
use url::Url;

use crate::{
    cache::ExpiringCache,
    clock::{Clock, deadline},
    credentials::{Credentials, CredentialsKey},
    error::{AuthError, Result},
    transport::{HttpRequest, HttpTransport, TransportError},
};

const GRANT_TYPE: &str = "account_credentials";

/// A bearer token, valid while `now < issued_at + ttl`. Never mutated.
pub struct Token {
    value: SecretString,
    authorization: HeaderValue,
    issued_at: Timestamp,
    ttl: Duration,
}

impl Token {
    pub fn value(&self) -> &SecretString {
        &self.value
    }

    pub fn issued_at(&self) -> Timestamp {
        self.issued_at
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn expires_at(&self) -> Timestamp {
        deadline(self.issued_at, self.ttl)
    }

    pub fn is_valid_at(&self, now: Timestamp) -> bool {
        now < self.expires_at()
    }

    /// `Bearer <token>`, marked sensitive.
    pub(crate) fn authorization(&self) -> HeaderValue {
        self.authorization.clone()
    }

    pub(crate) fn identity(&self) -> TokenIdentity {
        TokenIdentity(Sha256::digest(self.value.expose_secret().as_bytes()).into())
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Token")
            .field("value", &"[REDACTED]")
            .field("issued_at", &self.issued_at)
            .field("ttl", &self.ttl)
            .finish()
    }
}

/// Digest of a token value, used to key results fetched with that token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct TokenIdentity([u8; 32]);

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Exchanges credentials for access tokens and reuses each token until its
/// ttl runs out. One token is kept per distinct credentials value.
///
/// Concurrent misses for the same credentials may each run an exchange; the
/// last one to finish replaces the cached token.
pub struct TokenCache {
    transport: Arc<dyn HttpTransport>,
    clock: Arc<dyn Clock>,
    token_url: Url,
    timeout: Duration,
    ttl: Duration,
    tokens: ExpiringCache<CredentialsKey, Arc<Token>>,
}

impl TokenCache {
    pub fn new(transport: Arc<dyn HttpTransport>, clock: Arc<dyn Clock>, config: &config::Config) -> Self {
        let tokens = ExpiringCache::new(config.cache.max_entries, clock.clone());

        Self {
            transport,
            clock,
            token_url: config.zoom.token_url.clone(),
            timeout: config.fetch.token_timeout,
            ttl: config.cache.token_ttl,
            tokens,
        }
    }

    /// Returns the cached token for `credentials`, exchanging them for a new
    /// one when nothing valid is cached.
    pub async fn get_token(&self, credentials: &Credentials) -> Result<Arc<Token>> {
        credentials.validate()?;

        let key = credentials.cache_key();

        if let Some(token) = self.tokens.get(&key) {
            log::debug!("Reusing access token for account {}", credentials.account_id());
            return Ok(token);
        }

        let token = Arc::new(self.exchange(credentials).await?);
        self.tokens.insert(key, token.clone(), token.expires_at());

        Ok(token)
    }

    /// Drops the cached token for `credentials`, if any.
    pub fn invalidate(&self, credentials: &Credentials) {
        self.tokens.invalidate(&credentials.cache_key());
    }

    async fn exchange(&self, credentials: &Credentials) -> std::result::Result<Token, AuthError> {
        log::debug!("Requesting access token for account {}", credentials.account_id());

        let mut basic = HeaderValue::try_from(format!("Basic {}", credentials.basic_authorization()))
            .map_err(|e| AuthError::Transport(format!("invalid authorization header: {e}")))?;
        basic.set_sensitive(true);

        let request = HttpRequest::new(Method::POST, self.token_url.clone(), self.timeout)
            .header(AUTHORIZATION, basic)
            .query("grant_type", GRANT_TYPE)
            .query("account_id", credentials.account_id());

        let response = self.transport.send(request).await.map_err(|e| match e {
            TransportError::Timeout => {
                log::error!("Token exchange timed out after {:?}", self.timeout);
                AuthError::Timeout
            }
            TransportError::Connection(message) => {
                log::error!("Failed to send token request: {message}");
                AuthError::Transport(message)
            }
        })?;

        if !response.is_success() {
            let body = response.text();
            log::error!("Token exchange rejected ({}): {body}", response.status);

            return Err(AuthError::Rejected {
                status: response.status.as_u16(),
                body,
            });
        }

        let TokenResponse { access_token } = serde_json::from_slice(&response.body).map_err(|e| {
            log::error!("Failed to parse token response: {e}");
            AuthError::MalformedResponse(e.to_string())
        })?;

        let mut authorization = HeaderValue::try_from(format!("Bearer {access_token}"))
            .map_err(|_| AuthError::MalformedResponse("access_token is not a valid header value".to_string()))?;
        authorization.set_sensitive(true);

        Ok(Token {
            value: SecretString::from(access_token),
            authorization,
            issued_at: self.clock.now(),
            ttl: self.ttl,
        })
    }
}
