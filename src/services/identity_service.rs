use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::{Value, json};
use url::Url;
use uuid::Uuid;

use crate::{
    config::IdentityConfig,
    error::{AppError, Result},
};

/// REST client for the managed auth service (GoTrue API under `/auth/v1`).
#[derive(Clone)]
pub struct IdentityClient {
    http: reqwest::Client,
    base_url: String,
    service_key: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct UserMetadata {
    pub full_name: Option<String>,
    pub name: Option<String>,
    pub avatar_url: Option<String>,
    pub picture: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProviderUser {
    pub id: Uuid,
    pub email: Option<String>,
    pub role: Option<String>,
    #[serde(default)]
    pub user_metadata: UserMetadata,
}

#[derive(Debug, Deserialize)]
pub struct ProviderSession {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub user: ProviderUser,
}

impl IdentityClient {
    pub fn new(config: &IdentityConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            service_key: config.service_key.clone(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/auth/v1/{}", self.base_url, path)
    }

    async fn post<T: DeserializeOwned>(&self, url: &str, body: Value) -> Result<T> {
        let response = self
            .http
            .post(url)
            .header("apikey", &self.service_key)
            .bearer_auth(&self.service_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::InternalError(format!("Auth provider request failed: {}", e)))?;

        let status = response.status();
        let payload: Value = response.json().await.unwrap_or(Value::Null);

        if !status.is_success() {
            return Err(AppError::Upstream(provider_error_message(
                &payload,
                status.as_u16(),
            )));
        }

        serde_json::from_value(payload).map_err(|e| {
            AppError::InternalError(format!("Failed to parse auth provider response: {}", e))
        })
    }

    pub async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<ProviderSession> {
        self.post(
            &self.endpoint("token?grant_type=password"),
            json!({ "email": email, "password": password }),
        )
        .await
    }

    /// Creates the account. Depending on the provider's confirmation setting
    /// the response is either the user or a session wrapping it.
    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        name: Option<&str>,
    ) -> Result<ProviderUser> {
        let mut body = json!({ "email": email, "password": password });
        if let Some(name) = name {
            body["data"] = json!({ "name": name });
        }

        let payload: Value = self.post(&self.endpoint("signup"), body).await?;
        let user = match payload.get("user") {
            Some(user) if !user.is_null() => user.clone(),
            _ => payload,
        };

        serde_json::from_value(user).map_err(|e| {
            AppError::InternalError(format!("Failed to parse auth provider user: {}", e))
        })
    }

    pub async fn send_password_reset(&self, email: &str, redirect_to: &str) -> Result<()> {
        let url = Url::parse_with_params(&self.endpoint("recover"), &[("redirect_to", redirect_to)])
            .map_err(|e| AppError::InternalError(format!("Invalid recover URL: {}", e)))?;

        let _: Value = self.post(url.as_str(), json!({ "email": email })).await?;
        Ok(())
    }

    /// Provider login page for the PKCE flow; the provider redirects back with `?code=`.
    pub fn authorize_url(&self, provider: &str, redirect_to: &str, challenge: &str) -> Result<String> {
        let url = Url::parse_with_params(
            &self.endpoint("authorize"),
            &[
                ("provider", provider),
                ("redirect_to", redirect_to),
                ("code_challenge", challenge),
                ("code_challenge_method", "s256"),
            ],
        )
        .map_err(|e| AppError::InternalError(format!("Invalid authorize URL: {}", e)))?;

        Ok(url.into())
    }

    pub async fn exchange_code_for_session(
        &self,
        code: &str,
        verifier: &str,
    ) -> Result<ProviderSession> {
        self.post(
            &self.endpoint("token?grant_type=pkce"),
            json!({ "auth_code": code, "code_verifier": verifier }),
        )
        .await
    }
}

fn provider_error_message(payload: &Value, status: u16) -> String {
    ["error_description", "msg", "message", "error"]
        .iter()
        .find_map(|key| payload.get(*key).and_then(Value::as_str))
        .map(str::to_string)
        .unwrap_or_else(|| format!("Auth provider returned status {}", status))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> IdentityClient {
        IdentityClient::new(&IdentityConfig {
            base_url: "https://project.supabase.co/".to_string(),
            service_key: "service-key".to_string(),
        })
    }

    #[test]
    fn authorize_url_carries_pkce_parameters() {
        let url = client()
            .authorize_url("google", "http://localhost:3000/auth/google/callback", "abc")
            .unwrap();
        let parsed = Url::parse(&url).unwrap();

        assert_eq!(parsed.path(), "/auth/v1/authorize");
        let params: Vec<(String, String)> = parsed.query_pairs().into_owned().collect();
        assert!(params.contains(&("provider".to_string(), "google".to_string())));
        assert!(params.contains(&("code_challenge".to_string(), "abc".to_string())));
        assert!(params.contains(&("code_challenge_method".to_string(), "s256".to_string())));
        assert!(params.contains(&(
            "redirect_to".to_string(),
            "http://localhost:3000/auth/google/callback".to_string()
        )));
    }

    #[test]
    fn error_message_prefers_description() {
        let payload = json!({ "error": "invalid_grant", "error_description": "Invalid login credentials" });
        assert_eq!(provider_error_message(&payload, 400), "Invalid login credentials");

        let payload = json!({ "code": 422, "msg": "User already registered" });
        assert_eq!(provider_error_message(&payload, 422), "User already registered");

        assert_eq!(
            provider_error_message(&Value::Null, 503),
            "Auth provider returned status 503"
        );
    }

    #[test]
    fn provider_user_tolerates_missing_metadata() {
        let user: ProviderUser = serde_json::from_value(json!({
            "id": "2f0c3f0e-6a43-4a5e-9d5c-1f1d1f2b0c11",
            "email": "ana@example.com",
            "role": "authenticated"
        }))
        .unwrap();

        assert_eq!(user.email.as_deref(), Some("ana@example.com"));
        assert!(user.user_metadata.full_name.is_none());
    }
}
