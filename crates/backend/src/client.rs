use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use shared_types::{AppError, BackendConfig};
use std::sync::Arc;

use crate::error_convert::ReqwestErrorExt;

/// The authenticated user as reported by the auth service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// Token grant returned by password sign-in and refresh.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenGrant {
    pub access_token: String,
    pub refresh_token: String,
    #[serde(default)]
    pub expires_in: Option<u64>,
    pub user: AuthUser,
}

/// HTTP client for the hosted backend: auth endpoints under `/auth/v1`,
/// table access under `/rest/v1` and edge functions under `/functions/v1`.
///
/// Every request carries the project `apikey`. The bearer token is the
/// caller's access token when one is given, otherwise the anon key.
#[derive(Clone)]
pub struct BackendClient {
    http: reqwest::Client,
    config: Arc<BackendConfig>,
}

impl BackendClient {
    pub fn new(config: BackendConfig) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| e.into_app_error())?;
        Ok(Self {
            http,
            config: Arc::new(config),
        })
    }

    pub fn config(&self) -> &BackendConfig {
        &self.config
    }

    fn request(&self, method: Method, path: &str, access_token: Option<&str>) -> RequestBuilder {
        let url = format!("{}{}", self.config.base_url(), path);
        let bearer = access_token.unwrap_or(self.config.anon_key.as_str());
        self.http
            .request(method, url)
            .header("apikey", &self.config.anon_key)
            .bearer_auth(bearer)
    }

    async fn send(builder: RequestBuilder) -> Result<Response, AppError> {
        let response = builder.send().await.map_err(|e| e.into_app_error())?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(AppError::from_upstream(status.as_u16(), &body))
    }

    async fn read_json<T: DeserializeOwned>(builder: RequestBuilder) -> Result<T, AppError> {
        Self::send(builder)
            .await?
            .json::<T>()
            .await
            .map_err(|e| e.into_app_error())
    }

    // --- Auth ---

    #[tracing::instrument(skip(self, body))]
    pub async fn token_grant<B: Serialize>(
        &self,
        grant_type: &str,
        body: &B,
    ) -> Result<TokenGrant, AppError> {
        let builder = self
            .request(Method::POST, "/auth/v1/token", None)
            .query(&[("grant_type", grant_type)])
            .json(body);
        Self::read_json(builder).await
    }

    #[tracing::instrument(skip_all)]
    pub async fn auth_user(&self, access_token: &str) -> Result<AuthUser, AppError> {
        Self::read_json(self.request(Method::GET, "/auth/v1/user", Some(access_token))).await
    }

    #[tracing::instrument(skip_all)]
    pub async fn logout(&self, access_token: &str) -> Result<(), AppError> {
        Self::send(self.request(Method::POST, "/auth/v1/logout", Some(access_token))).await?;
        Ok(())
    }

    // --- Tables ---

    #[tracing::instrument(skip(self, access_token))]
    pub async fn rest_get<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &[(&str, String)],
        access_token: Option<&str>,
    ) -> Result<Vec<T>, AppError> {
        let builder = self
            .request(Method::GET, &format!("/rest/v1/{table}"), access_token)
            .query(query);
        Self::read_json(builder).await
    }

    /// Update rows matching `filter` and return them as stored.
    #[tracing::instrument(skip(self, body, access_token))]
    pub async fn rest_patch<B: Serialize, T: DeserializeOwned>(
        &self,
        table: &str,
        filter: &[(&str, String)],
        body: &B,
        access_token: Option<&str>,
    ) -> Result<Vec<T>, AppError> {
        let builder = self
            .request(Method::PATCH, &format!("/rest/v1/{table}"), access_token)
            .query(filter)
            .header("Prefer", "return=representation")
            .json(body);
        Self::read_json(builder).await
    }

    #[tracing::instrument(skip(self, access_token))]
    pub async fn rest_delete(
        &self,
        table: &str,
        filter: &[(&str, String)],
        access_token: Option<&str>,
    ) -> Result<(), AppError> {
        let builder = self
            .request(Method::DELETE, &format!("/rest/v1/{table}"), access_token)
            .query(filter);
        Self::send(builder).await?;
        Ok(())
    }

    // --- Functions ---

    #[tracing::instrument(skip(self, body, access_token))]
    pub async fn invoke_function<B: Serialize, T: DeserializeOwned>(
        &self,
        name: &str,
        body: &B,
        access_token: Option<&str>,
    ) -> Result<T, AppError> {
        let builder = self
            .request(Method::POST, &format!("/functions/v1/{name}"), access_token)
            .json(body);
        Self::read_json(builder).await
    }
}

/// `column=eq.value` filter in the REST layer's syntax.
pub fn eq_filter(column: &'static str, value: impl std::fmt::Display) -> (&'static str, String) {
    (column, format!("eq.{value}"))
}
