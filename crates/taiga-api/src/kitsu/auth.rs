//! Kitsu OAuth2 Resource Owner Password Grant.
//!
//! Kitsu tokens expire; the broker schedules a local expiry-warning
//! notification from `expires_in` when it stores one.

use serde::Deserialize;

use crate::error::AuthError;

pub const TOKEN_URL: &str = "https://kitsu.io/api/oauth/token";

#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub expires_in: Option<u64>,
    pub token_type: Option<String>,
}

/// Authenticate with username and password.
pub(crate) async fn password_grant(
    http: &reqwest::Client,
    username: &str,
    password: &str,
) -> Result<TokenResponse, AuthError> {
    let resp = http
        .post(TOKEN_URL)
        .form(&[
            ("grant_type", "password"),
            ("username", username),
            ("password", password),
        ])
        .send()
        .await?;

    if !resp.status().is_success() {
        let status = resp.status().as_u16();
        let body = resp.text().await.unwrap_or_default();
        return Err(AuthError::Endpoint {
            status,
            message: body,
        });
    }

    resp.json::<TokenResponse>()
        .await
        .map_err(|e| AuthError::Decode(e.to_string()))
}
