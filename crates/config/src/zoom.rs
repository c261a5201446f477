//! Provider endpoints and Server-to-Server OAuth credentials.

use secrecy::SecretString;
use serde::Deserialize;
use url::Url;

/// Zoom account and endpoint settings.
///
/// Credentials are optional here so they can also come from the command line
/// or the environment; the client refuses to run until all three are known.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ZoomConfig {
    /// Account the Server-to-Server OAuth app belongs to.
    pub account_id: Option<String>,
    /// OAuth client id.
    pub client_id: Option<String>,
    /// OAuth client secret.
    pub client_secret: Option<SecretString>,
    /// Token exchange endpoint.
    pub token_url: Url,
    /// Base URL of the REST API, without a trailing slash.
    pub api_url: Url,
}

impl Default for ZoomConfig {
    fn default() -> Self {
        Self {
            account_id: None,
            client_id: None,
            client_secret: None,
            token_url: Url::parse("https://zoom.us/oauth/token").expect("default URL should be valid"),
            api_url: Url::parse("https://api.zoom.us/v2").expect("default URL should be valid"),
        }
    }
}
