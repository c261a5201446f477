use std::fmt;

use base64::{Engine, engine::general_purpose::STANDARD};
use secrecy::{ExposeSecret, SecretString};
use sha2::{Digest, Sha256};

use crate::error::AuthError;

/// Server-to-Server OAuth credentials. Held in memory only.
#[derive(Clone)]
pub struct Credentials {
    account_id: String,
    client_id: String,
    client_secret: SecretString,
}

impl Credentials {
    /// Surrounding whitespace is trimmed from every field.
    pub fn new(account_id: &str, client_id: &str, client_secret: &SecretString) -> Self {
        Self {
            account_id: account_id.trim().to_string(),
            client_id: client_id.trim().to_string(),
            client_secret: SecretString::from(client_secret.expose_secret().trim().to_string()),
        }
    }

    pub fn account_id(&self) -> &str {
        &self.account_id
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub(crate) fn validate(&self) -> Result<(), AuthError> {
        if self.account_id.is_empty() {
            return Err(AuthError::MissingCredential("account_id"));
        }

        if self.client_id.is_empty() {
            return Err(AuthError::MissingCredential("client_id"));
        }

        if self.client_secret.expose_secret().is_empty() {
            return Err(AuthError::MissingCredential("client_secret"));
        }

        Ok(())
    }

    /// `base64(client_id:client_secret)` for the Basic authorization scheme.
    pub(crate) fn basic_authorization(&self) -> String {
        STANDARD.encode(format!("{}:{}", self.client_id, self.client_secret.expose_secret()))
    }

    /// Digest of all three fields, so cache keys never hold the secret.
    pub(crate) fn cache_key(&self) -> CredentialsKey {
        let mut hasher = Sha256::new();

        for field in [
            self.account_id.as_str(),
            self.client_id.as_str(),
            self.client_secret.expose_secret(),
        ] {
            hasher.update((field.len() as u64).to_be_bytes());
            hasher.update(field.as_bytes());
        }

        CredentialsKey(hasher.finalize().into())
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("account_id", &self.account_id)
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct CredentialsKey([u8; 32]);
