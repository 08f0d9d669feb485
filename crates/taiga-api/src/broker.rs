//! Credential / token broker.
//!
//! Owns the bearer tokens for the providers that authenticate. Successful
//! exchanges atomically replace any stored credential (delete the old
//! entry, then insert the new one), and a failure at any stage leaves the
//! store exactly as it was. Callers of authenticated operations go through
//! [`TokenBroker::access_token`], which fails fast before any network call
//! when no credential exists.
//!
//! At most one auth exchange is expected to be in flight at a time; see
//! the note on [`taiga_core::credentials::CredentialStore`].

use std::time::Duration;

use reqwest::{Client, RequestBuilder};

use taiga_core::credentials::{CredentialKey, CredentialStore};
use taiga_core::notify::{Notification, Notifier};

use crate::anilist;
use crate::error::AuthError;
use crate::kitsu;
use crate::traits::Provider;

pub const ANILIST_SERVICE: &str = "taiga.AniListToken";
pub const ANILIST_ACCOUNT: &str = "AniListAccessToken";
pub const KITSU_SERVICE: &str = "taiga.KitsuToken";
pub const KITSU_ACCOUNT: &str = "KitsuAccessToken";

/// Attach `Authorization: Bearer <token>` to a request.
pub fn attach_auth(request: RequestBuilder, token: &str) -> RequestBuilder {
    request.header("Authorization", format!("Bearer {token}"))
}

pub struct TokenBroker<S, N> {
    store: S,
    notifier: N,
    http: Client,
}

impl<S: CredentialStore, N: Notifier> TokenBroker<S, N> {
    pub fn new(store: S, notifier: N) -> Self {
        Self {
            store,
            notifier,
            http: Client::new(),
        }
    }

    fn credential_key(provider: Provider) -> Result<CredentialKey, AuthError> {
        match provider {
            Provider::AniList => Ok(CredentialKey::new(ANILIST_SERVICE, ANILIST_ACCOUNT)),
            Provider::Kitsu => Ok(CredentialKey::new(KITSU_SERVICE, KITSU_ACCOUNT)),
            Provider::Jikan => Err(AuthError::Unsupported(provider)),
        }
    }

    /// Exchange an AniList authorization code for an access token and
    /// store it.
    pub async fn exchange_anilist_code(
        &self,
        client_id: &str,
        client_secret: &str,
        redirect_uri: &str,
        code: &str,
    ) -> Result<(), AuthError> {
        let resp =
            anilist::auth::exchange_code(&self.http, client_id, client_secret, redirect_uri, code)
                .await?;
        self.store_token(Provider::AniList, resp.access_token)?;
        tracing::info!("AniList token stored");
        Ok(())
    }

    /// Log in to Kitsu with the password grant and store the token.
    pub async fn login_kitsu(&self, username: &str, password: &str) -> Result<(), AuthError> {
        let resp = kitsu::auth::password_grant(&self.http, username, password).await?;
        let expires_in = resp.expires_in;
        self.store_token(Provider::Kitsu, resp.access_token)?;
        tracing::info!("Kitsu token stored");

        if let Some(secs) = expires_in {
            self.notifier.notify(Notification::TokenExpiry {
                service: KITSU_SERVICE.to_string(),
                expires_in: Duration::from_secs(secs),
            });
        }
        Ok(())
    }

    /// Validate the extracted token and atomically replace the stored
    /// credential: delete the old entry, then insert the new one. Nothing
    /// is written when the token is missing.
    fn store_token(&self, provider: Provider, token: Option<String>) -> Result<(), AuthError> {
        let token = token
            .filter(|t| !t.is_empty())
            .ok_or(AuthError::MissingField("access_token"))?;
        let key = Self::credential_key(provider)?;
        self.store
            .delete(&key)
            .map_err(|e| AuthError::StoreWrite(e.to_string()))?;
        self.store
            .insert(&key, &token)
            .map_err(|e| AuthError::StoreWrite(e.to_string()))
    }

    /// The stored bearer token for authenticated calls.
    pub fn access_token(&self, provider: Provider) -> Result<String, AuthError> {
        let key = Self::credential_key(provider)?;
        self.store
            .get(&key)
            .map_err(|e| AuthError::StoreWrite(e.to_string()))?
            .ok_or(AuthError::MissingCredential(provider))
    }

    pub fn has_credential(&self, provider: Provider) -> bool {
        Self::credential_key(provider)
            .ok()
            .and_then(|key| self.store.get(&key).ok().flatten())
            .is_some()
    }

    /// Drop the stored credential for a provider.
    pub fn sign_out(&self, provider: Provider) -> Result<(), AuthError> {
        let key = Self::credential_key(provider)?;
        self.store
            .delete(&key)
            .map_err(|e| AuthError::StoreWrite(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use taiga_core::credentials::MemoryCredentialStore;

    use super::*;

    #[derive(Default)]
    struct RecordingNotifier {
        events: Mutex<Vec<Notification>>,
    }

    impl Notifier for RecordingNotifier {
        fn notify(&self, event: Notification) {
            self.events.lock().unwrap().push(event);
        }
    }

    fn broker() -> TokenBroker<MemoryCredentialStore, RecordingNotifier> {
        TokenBroker::new(MemoryCredentialStore::new(), RecordingNotifier::default())
    }

    #[test]
    fn test_store_token_replaces_existing() {
        let broker = broker();
        broker
            .store_token(Provider::AniList, Some("old".into()))
            .unwrap();
        broker
            .store_token(Provider::AniList, Some("new".into()))
            .unwrap();
        assert_eq!(broker.access_token(Provider::AniList).unwrap(), "new");
    }

    #[test]
    fn test_missing_access_token_leaves_store_unchanged() {
        let broker = broker();
        broker
            .store_token(Provider::AniList, Some("old".into()))
            .unwrap();

        let err = broker.store_token(Provider::AniList, None).unwrap_err();
        assert!(matches!(err, AuthError::MissingField("access_token")));
        // the previous token survives a failed exchange
        assert_eq!(broker.access_token(Provider::AniList).unwrap(), "old");
    }

    #[test]
    fn test_empty_access_token_is_rejected() {
        let broker = broker();
        let err = broker
            .store_token(Provider::Kitsu, Some(String::new()))
            .unwrap_err();
        assert!(matches!(err, AuthError::MissingField("access_token")));
        assert!(!broker.has_credential(Provider::Kitsu));
    }

    #[test]
    fn test_access_token_fails_fast_without_credential() {
        let broker = broker();
        let err = broker.access_token(Provider::Kitsu).unwrap_err();
        assert!(matches!(
            err,
            AuthError::MissingCredential(Provider::Kitsu)
        ));
    }

    #[test]
    fn test_jikan_is_unsupported() {
        let broker = broker();
        assert!(matches!(
            broker.access_token(Provider::Jikan),
            Err(AuthError::Unsupported(Provider::Jikan))
        ));
    }

    #[test]
    fn test_sign_out_removes_credential() {
        let broker = broker();
        broker
            .store_token(Provider::Kitsu, Some("token".into()))
            .unwrap();
        broker.sign_out(Provider::Kitsu).unwrap();
        assert!(!broker.has_credential(Provider::Kitsu));
        // signing out twice is fine
        broker.sign_out(Provider::Kitsu).unwrap();
    }

    #[test]
    fn test_attach_auth_sets_bearer_header() {
        let req = attach_auth(Client::new().get("https://example.com"), "token-1")
            .build()
            .unwrap();
        assert_eq!(
            req.headers().get("Authorization").unwrap(),
            "Bearer token-1"
        );
    }
}
