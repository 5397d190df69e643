//! Finance API client
//!
//! Thin wrapper over the REST endpoints:
//!
//! - `GET/POST /api/{transactions,savings}`
//! - `PUT/DELETE /api/{transactions,savings}/{id}`
//! - `POST /api/login`, `POST /api/register`
//! - `GET/PUT /api/auth/me`
//!
//! Authenticated calls send `Authorization: Bearer <token>`. Error bodies of
//! the form `{"error": "..."}` are surfaced in the returned error. Requests
//! have no client-side timeout and are never retried.

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::models::{AuthResponse, Credentials, Origin, ProfileUpdate, Record, RecordId, User};

use super::RecordStore;

/// Error body returned by the API
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
    message: Option<String>,
}

/// Client for the finance API
#[derive(Debug, Clone)]
pub struct ApiClient {
    http_client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            http_client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.api_url)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/{}", self.base_url, path)
    }

    fn record_url<R: Record>(&self, id: Option<&RecordId>) -> String {
        match id {
            Some(id) => self.url(&format!("{}/{}", R::RESOURCE.path(), id)),
            None => self.url(R::RESOURCE.path()),
        }
    }

    /// Fetch every record of `R`'s resource
    pub async fn fetch_remote<R: Record>(&self, token: &str) -> Result<Vec<R>> {
        let response = self
            .http_client
            .get(self.record_url::<R>(None))
            .bearer_auth(token)
            .send()
            .await?;

        let records: Vec<R> = parse(response, R::RESOURCE.label(), true).await?;
        debug!(resource = %R::RESOURCE, count = records.len(), "Fetched records");
        Ok(records)
    }

    /// Create a record; the server assigns its id
    pub async fn create_remote<R: Record>(&self, draft: &R::Draft, token: &str) -> Result<R> {
        let response = self
            .http_client
            .post(self.record_url::<R>(None))
            .bearer_auth(token)
            .json(draft)
            .send()
            .await?;

        let record: R = parse(response, R::RESOURCE.label(), true).await?;
        debug!(resource = %R::RESOURCE, id = %record.id(), "Created record");
        Ok(record.with_origin(Origin::Remote))
    }

    /// Replace the user-supplied fields of record `id`
    pub async fn update_remote<R: Record>(
        &self,
        id: &RecordId,
        draft: &R::Draft,
        token: &str,
    ) -> Result<R> {
        let response = self
            .http_client
            .put(self.record_url::<R>(Some(id)))
            .bearer_auth(token)
            .json(draft)
            .send()
            .await?;

        let subject = format!("{} {}", R::RESOURCE.label(), id);
        let record: R = parse(response, &subject, true).await?;
        debug!(resource = %R::RESOURCE, id = %id, "Updated record");
        Ok(record.with_origin(Origin::Remote))
    }

    pub async fn delete_remote<R: Record>(&self, id: &RecordId, token: &str) -> Result<()> {
        let response = self
            .http_client
            .delete(self.record_url::<R>(Some(id)))
            .bearer_auth(token)
            .send()
            .await?;

        let subject = format!("{} {}", R::RESOURCE.label(), id);
        check(response, &subject, true).await?;
        debug!(resource = %R::RESOURCE, id = %id, "Deleted record");
        Ok(())
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse> {
        self.authenticate("login", email, password).await
    }

    pub async fn register(&self, email: &str, password: &str) -> Result<AuthResponse> {
        self.authenticate("register", email, password).await
    }

    async fn authenticate(&self, path: &str, email: &str, password: &str) -> Result<AuthResponse> {
        let credentials = Credentials {
            email: email.to_string(),
            password: password.to_string(),
        };
        let response = self
            .http_client
            .post(self.url(path))
            .json(&credentials)
            .send()
            .await?;

        let auth: AuthResponse = parse(response, "Account", false).await?;
        debug!(email = %email, endpoint = path, "Authenticated");
        Ok(auth)
    }

    /// The profile behind `token`; also verifies the token is still valid
    pub async fn me(&self, token: &str) -> Result<User> {
        let response = self
            .http_client
            .get(self.url("auth/me"))
            .bearer_auth(token)
            .send()
            .await?;

        parse(response, "Account", true).await
    }

    pub async fn update_me(&self, token: &str, first_name: &str, last_name: &str) -> Result<User> {
        let body = ProfileUpdate {
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
        };
        let response = self
            .http_client
            .put(self.url("auth/me"))
            .bearer_auth(token)
            .json(&body)
            .send()
            .await?;

        parse(response, "Account", true).await
    }
}

/// Map a non-success response to an error.
///
/// With `authenticated` set, 401/403 mean the token was rejected. Without
/// it (login, register) they are ordinary server errors such as bad
/// credentials.
async fn check(response: Response, subject: &str, authenticated: bool) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&body)
        .ok()
        .and_then(|b| b.error.or(b.message))
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("Request failed")
                .to_string()
        });
    debug!(status = status.as_u16(), message = %message, "API request failed");

    Err(match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN if authenticated => Error::Auth(message),
        StatusCode::NOT_FOUND => Error::NotFound(subject.to_string()),
        _ => Error::Server {
            status: status.as_u16(),
            message,
        },
    })
}

async fn parse<T: DeserializeOwned>(
    response: Response,
    subject: &str,
    authenticated: bool,
) -> Result<T> {
    let response = check(response, subject, authenticated).await?;
    Ok(response.json::<T>().await?)
}

/// [`RecordStore`] backed by the finance API
#[derive(Debug, Clone)]
pub struct RemoteStore {
    client: ApiClient,
    token: String,
}

impl RemoteStore {
    pub fn new(client: ApiClient, token: impl Into<String>) -> Self {
        Self {
            client,
            token: token.into(),
        }
    }
}

#[async_trait]
impl<R: Record> RecordStore<R> for RemoteStore {
    fn origin(&self) -> Origin {
        Origin::Remote
    }

    async fn list(&self) -> Result<Vec<R>> {
        self.client.fetch_remote(&self.token).await
    }

    async fn create(&self, draft: &R::Draft) -> Result<R> {
        self.client.create_remote::<R>(draft, &self.token).await
    }

    async fn update(&self, id: &RecordId, draft: &R::Draft) -> Result<R> {
        self.client.update_remote::<R>(id, draft, &self.token).await
    }

    async fn delete(&self, id: &RecordId) -> Result<()> {
        self.client.delete_remote::<R>(id, &self.token).await
    }
}
