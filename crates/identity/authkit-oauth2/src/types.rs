//! Provider wire payloads.

use serde::Deserialize;

/// Token endpoint response.
///
/// GitHub reports a rejected grant with a 200 and an error body, so the
/// access token is optional and its absence is the failure signal.
#[derive(Debug, Deserialize)]
pub struct TokenExchangeResponse {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
}

/// Google OIDC userinfo payload.
#[derive(Debug, Deserialize)]
pub struct GoogleProfile {
    pub sub: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

/// GitHub `/user` payload. The email is only present when the user made
/// it public; otherwise the email list endpoint has it.
#[derive(Debug, Deserialize)]
pub struct GitHubProfile {
    pub id: u64,
    pub login: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// One entry from GitHub `/user/emails`.
#[derive(Debug, Deserialize)]
pub struct GitHubEmail {
    pub email: String,
    pub primary: bool,
    pub verified: bool,
}
