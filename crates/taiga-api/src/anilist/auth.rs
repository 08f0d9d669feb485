//! AniList OAuth2 Authorization Code Grant.
//!
//! The UI opens the consent page in a browser; the app-custom-URL-scheme
//! redirect carries `?code=...` back, and the broker exchanges it here.
//! AniList tokens are long-lived; expiry is handled by re-auth, not by
//! proactive refresh.

use serde::Deserialize;
use url::Url;

use crate::error::AuthError;

pub const AUTH_URL: &str = "https://anilist.co/api/v2/oauth/authorize";
pub const TOKEN_URL: &str = "https://anilist.co/api/v2/oauth/token";

#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: Option<String>,
    pub token_type: Option<String>,
    pub expires_in: Option<u64>,
}

/// Browser consent URL for the given app registration.
pub fn authorize_url(client_id: &str, redirect_uri: &str) -> String {
    format!("{AUTH_URL}?client_id={client_id}&redirect_uri={redirect_uri}&response_type=code")
}

/// Extract the `code` query parameter from the redirect the OS handed back.
pub fn code_from_redirect(redirect: &str) -> Option<String> {
    let parsed = Url::parse(redirect).ok()?;
    parsed
        .query_pairs()
        .find(|(k, _)| k == "code")
        .map(|(_, v)| v.to_string())
}

/// Exchange the authorization code for an access token.
pub(crate) async fn exchange_code(
    http: &reqwest::Client,
    client_id: &str,
    client_secret: &str,
    redirect_uri: &str,
    code: &str,
) -> Result<TokenResponse, AuthError> {
    let resp = http
        .post(TOKEN_URL)
        .json(&serde_json::json!({
            "grant_type": "authorization_code",
            "client_id": client_id,
            "client_secret": client_secret,
            "redirect_uri": redirect_uri,
            "code": code,
        }))
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_from_redirect() {
        assert_eq!(
            code_from_redirect("taiga://anilist-auth?code=abc123").as_deref(),
            Some("abc123")
        );
        assert_eq!(
            code_from_redirect("taiga://anilist-auth?state=x&code=abc").as_deref(),
            Some("abc")
        );
        assert!(code_from_redirect("taiga://anilist-auth?error=denied").is_none());
        assert!(code_from_redirect("not a url").is_none());
    }

    #[test]
    fn test_authorize_url_shape() {
        let url = authorize_url("1234", "taiga://anilist-auth");
        assert!(url.starts_with(AUTH_URL));
        assert!(url.contains("client_id=1234"));
        assert!(url.contains("response_type=code"));
    }

    #[test]
    fn test_token_response_tolerates_missing_fields() {
        let resp: TokenResponse = serde_json::from_str("{}").unwrap();
        assert!(resp.access_token.is_none());
        assert!(resp.token_type.is_none());
        assert!(resp.expires_in.is_none());
    }
}
