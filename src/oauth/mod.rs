//! Facebook login client, built once at startup from config.

use crate::config::Config;
use oauth2::{
    basic::BasicClient, AuthUrl, AuthorizationCode, ClientId, ClientSecret, CsrfToken,
    RedirectUrl, Scope, TokenResponse, TokenUrl,
};
use serde::Deserialize;

const FACEBOOK_AUTH_URL: &str = "https://www.facebook.com/v14.0/dialog/oauth";
const FACEBOOK_TOKEN_URL: &str = "https://graph.facebook.com/v14.0/oauth/access_token";
const FACEBOOK_PROFILE_URL: &str = "https://graph.facebook.com/v14.0/me";

#[derive(Debug, Deserialize)]
pub struct FacebookProfile {
    pub id: String,
    pub name: String,
    pub email: Option<String>,
}

pub struct FacebookClient {
    client: BasicClient,
    http: reqwest::Client,
}

impl FacebookClient {
    pub fn from_config(env: &Config) -> Option<Self> {
        let client_id = env.facebook_client_id.clone()?;
        let client_secret = env.facebook_client_secret.clone()?;

        let auth_url = AuthUrl::new(FACEBOOK_AUTH_URL.to_string()).ok()?;
        let token_url = TokenUrl::new(FACEBOOK_TOKEN_URL.to_string()).ok()?;
        let redirect_url = RedirectUrl::new(format!(
            "{}/api/oauth/facebook/callback",
            env.public_url.trim_end_matches('/')
        ))
        .ok()?;

        let client = BasicClient::new(
            ClientId::new(client_id),
            Some(ClientSecret::new(client_secret)),
            auth_url,
            Some(token_url),
        )
        .set_redirect_uri(redirect_url);

        Some(Self {
            client,
            http: reqwest::Client::new(),
        })
    }

    /// Authorize URL with a fresh CSRF state, to be matched on callback.
    pub fn authorize_url(&self) -> (url::Url, CsrfToken) {
        self.client
            .authorize_url(CsrfToken::new_random)
            .add_scope(Scope::new(String::from("email")))
            .add_scope(Scope::new(String::from("public_profile")))
            .url()
    }

    pub async fn exchange_code(&self, code: String) -> Result<String, String> {
        let token = self
            .client
            .exchange_code(AuthorizationCode::new(code))
            .request_async(oauth2::reqwest::async_http_client)
            .await
            .map_err(|e| format!("Code exchange failed: {}", e))?;
        Ok(token.access_token().secret().clone())
    }

    pub async fn fetch_profile(&self, access_token: &str) -> Result<FacebookProfile, String> {
        self.http
            .get(FACEBOOK_PROFILE_URL)
            .query(&[("fields", "id,name,email"), ("access_token", access_token)])
            .send()
            .await
            .map_err(|e| format!("Profile request failed: {}", e))?
            .error_for_status()
            .map_err(|e| format!("Profile request failed: {}", e))?
            .json::<FacebookProfile>()
            .await
            .map_err(|e| format!("Invalid profile response: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> Config {
        Config {
            app_name: String::from("Aikotoba"),
            server_address: String::from("127.0.0.1"),
            server_port: 3000,
            database_url: String::from("sqlite::memory:"),
            public_url: String::from("https://aikotoba.example/"),
            jwt_secret: String::from("secret"),
            jwt_maxage_hour: 24,
            confirm_ttl_sec: 3600,
            smtp_host: None,
            smtp_port: 587,
            smtp_username: String::new(),
            smtp_password: String::new(),
            smtp_from_email: String::new(),
            smtp_from_name: String::new(),
            facebook_client_id: Some(String::from("fb-client-id")),
            facebook_client_secret: Some(String::from("fb-client-secret")),
        }
    }

    #[test]
    fn from_config_requires_both_credentials() {
        let mut env = test_config();
        env.facebook_client_secret = None;
        assert!(FacebookClient::from_config(&env).is_none());
        assert!(FacebookClient::from_config(&test_config()).is_some());
    }

    #[test]
    fn authorize_url_carries_state_and_redirect() {
        let client = FacebookClient::from_config(&test_config()).unwrap();
        let (url, state) = client.authorize_url();

        assert!(!state.secret().is_empty());
        let query: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert!(query.contains(&(
            String::from("client_id"),
            String::from("fb-client-id")
        )));
        assert!(query.contains(&(
            String::from("redirect_uri"),
            String::from("https://aikotoba.example/api/oauth/facebook/callback")
        )));
        assert!(query
            .iter()
            .any(|(k, v)| k == "state" && v == state.secret()));
    }

    #[test]
    fn profile_deserializes_without_email() {
        let profile: FacebookProfile =
            serde_json::from_str(r#"{"id":"10001","name":"Alice Example"}"#).unwrap();
        assert_eq!(profile.id, "10001");
        assert!(profile.email.is_none());
    }
}
