use crate::config::IdentitySettings;
use crate::domain::model::{AuthSession, AuthUser, SignUpRequest};
use crate::domain::ports::IdentityProvider;
use crate::utils::error::{ContactError, Result};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::{json, Map, Value};
use std::time::Duration;

/// Supabase GoTrue client for the `/auth/v1` REST endpoints.
#[derive(Debug, Clone)]
pub struct SupabaseAuth {
    client: Client,
    base_url: String,
    api_key: String,
}

impl SupabaseAuth {
    pub fn new(settings: &IdentitySettings) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            base_url: settings.url.trim_end_matches('/').to_string(),
            api_key: settings.service_key.clone(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/auth/v1/{}", self.base_url, path)
    }

    fn with_key(&self, request: RequestBuilder) -> RequestBuilder {
        request.header("apikey", &self.api_key)
    }

    async fn read<T: DeserializeOwned>(response: Response) -> Result<T> {
        let status = response.status();
        tracing::debug!("Identity provider response status: {}", status);

        if status.is_success() {
            return Ok(response.json().await?);
        }

        let body: Value = response.json().await.unwrap_or(Value::Null);
        let message = ["msg", "error_description", "message", "error"]
            .iter()
            .find_map(|key| body.get(*key).and_then(Value::as_str))
            .map(str::to_string)
            .unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("identity provider request failed")
                    .to_string()
            });

        Err(ContactError::Upstream {
            status: Some(status.as_u16()),
            message,
        })
    }
}

#[async_trait]
impl IdentityProvider for SupabaseAuth {
    async fn sign_up(&self, request: &SignUpRequest) -> Result<AuthUser> {
        let mut profile = Map::new();
        if let Some(first_name) = &request.first_name {
            profile.insert("firstName".to_string(), json!(first_name));
        }
        if let Some(last_name) = &request.last_name {
            profile.insert("lastName".to_string(), json!(last_name));
        }

        let body = json!({
            "email": request.email,
            "password": request.password,
            "data": profile,
        });

        let response = self
            .with_key(self.client.post(self.endpoint("signup")))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        // A bare user when email confirmation is pending, otherwise a session wrapping it.
        let mut payload: Value = Self::read(response).await?;
        let user = match payload.get_mut("user").map(Value::take) {
            Some(user) if !user.is_null() => user,
            _ => payload,
        };
        Ok(serde_json::from_value(user)?)
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession> {
        let response = self
            .with_key(self.client.post(self.endpoint("token")))
            .query(&[("grant_type", "password")])
            .bearer_auth(&self.api_key)
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;

        Self::read(response).await
    }

    async fn get_user(&self, token: &str) -> Result<AuthUser> {
        let response = self
            .with_key(self.client.get(self.endpoint("user")))
            .bearer_auth(token)
            .send()
            .await?;

        Self::read(response).await
    }
}
