//! HttpBackend - REST client for the catalog backend.
//!
//! One `reqwest` client with a shared cookie store serves both the identity
//! endpoints and the catalog endpoint, so the session cookie set by
//! `/api/login` rides along on every later request.

use crate::cookie_token::CookieTokenSource;
use async_trait::async_trait;
use reqwest::cookie::Jar;
use reqwest::header::ACCEPT;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response, StatusCode, Url};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;
use updater_core::config::RootConfig;
use updater_core::error::{Result, UpdaterError};
use updater_core::project::{ProjectApi, ProjectSubmission};
use updater_core::session::{IdentityApi, LoginResponse};

const LOGIN_PATH: &str = "api/login";
const LOGOUT_PATH: &str = "api/logout";
const VERIFY_PATH: &str = "api/verify_token";
const ADD_PROJECT_PATH: &str = "api/add_project";

/// Backend client implementing both [`IdentityApi`] and [`ProjectApi`].
#[derive(Clone)]
pub struct HttpBackend {
    client: Client,
    jar: Arc<Jar>,
    base_url: Url,
    image_field: String,
    token_cookie: String,
}

impl HttpBackend {
    /// Builds a client from configuration.
    ///
    /// Fails with a config error when the base URL does not parse.
    pub fn from_config(config: &RootConfig) -> Result<Self> {
        let base_url = parse_base_url(&config.api.base_url)?;
        let jar = Arc::new(Jar::default());

        let mut builder = Client::builder().cookie_provider(jar.clone());
        if let Some(secs) = config.api.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| UpdaterError::config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            jar,
            base_url,
            image_field: config.form.image_field.clone(),
            token_cookie: config.auth.token_cookie.clone(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Token source reading the bearer cookie from this client's cookie store.
    pub fn token_source(&self) -> CookieTokenSource {
        CookieTokenSource::new(
            self.jar.clone(),
            self.base_url.clone(),
            self.token_cookie.clone(),
        )
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|e| UpdaterError::config(format!("Invalid endpoint '{path}': {e}")))
    }

    fn build_form(&self, submission: &ProjectSubmission) -> Result<Form> {
        let mut form = Form::new()
            .text("heading", submission.heading.clone())
            .text("projectTitle", submission.project_title.clone())
            .text("year", submission.year.clone())
            .text("location", submission.location.clone());

        // Order is the pairing key between the two repeated fields.
        for service in &submission.services {
            form = form.text("services", service.clone());
        }
        for detail in &submission.service_details {
            form = form.text("serviceDetails", detail.clone());
        }

        for image in &submission.images {
            let part = Part::bytes(image.bytes.clone())
                .file_name(image.name.clone())
                .mime_str(&image.mime_type)
                .map_err(|e| {
                    UpdaterError::internal(format!(
                        "Invalid MIME type '{}' for {}: {e}",
                        image.mime_type, image.name
                    ))
                })?;
            form = form.part(self.image_field.clone(), part);
        }

        Ok(form)
    }
}

#[async_trait]
impl IdentityApi for HttpBackend {
    async fn login(&self, credential: &str) -> Result<LoginResponse> {
        let response = self
            .client
            .post(self.endpoint(LOGIN_PATH)?)
            .header(ACCEPT, "application/json")
            .json(&LoginRequest { credential })
            .send()
            .await
            .map_err(request_failed)?;

        match response.status() {
            status if status.is_success() => Ok(LoginResponse::Accepted),
            StatusCode::UNAUTHORIZED => Ok(LoginResponse::Unauthorized),
            _ => Err(http_fault(response).await),
        }
    }

    async fn logout(&self) -> Result<()> {
        let response = self
            .client
            .post(self.endpoint(LOGOUT_PATH)?)
            .send()
            .await
            .map_err(request_failed)?;

        if !response.status().is_success() {
            return Err(http_fault(response).await);
        }
        Ok(())
    }

    async fn verify_token(&self) -> Result<bool> {
        let response = self
            .client
            .get(self.endpoint(VERIFY_PATH)?)
            .send()
            .await
            .map_err(request_failed)?;

        match response.status() {
            StatusCode::UNAUTHORIZED => Ok(false),
            status if status.is_success() => {
                let body: VerifyResponse = response.json().await.map_err(|e| {
                    UpdaterError::transport(
                        Some(status.as_u16()),
                        format!("Failed to parse verify response: {e}"),
                    )
                })?;
                debug!(valid = body.valid, "verify_token answered");
                Ok(body.valid)
            }
            _ => Err(http_fault(response).await),
        }
    }
}

#[async_trait]
impl ProjectApi for HttpBackend {
    async fn add_project(&self, submission: &ProjectSubmission, bearer_token: &str) -> Result<()> {
        let form = self.build_form(submission)?;

        let response = self
            .client
            .post(self.endpoint(ADD_PROJECT_PATH)?)
            .bearer_auth(bearer_token)
            .multipart(form)
            .send()
            .await
            .map_err(request_failed)?;

        if !response.status().is_success() {
            return Err(http_fault(response).await);
        }
        Ok(())
    }
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    credential: &'a str,
}

#[derive(Deserialize)]
struct VerifyResponse {
    valid: bool,
}

#[derive(Deserialize)]
struct ErrorResponse {
    #[serde(alias = "error")]
    message: String,
}

/// Normalizes the base so relative endpoint paths join under it.
fn parse_base_url(raw: &str) -> Result<Url> {
    let mut raw = raw.trim().to_string();
    if !raw.ends_with('/') {
        raw.push('/');
    }
    let url = Url::parse(&raw)
        .map_err(|e| UpdaterError::config(format!("Invalid API base URL '{raw}': {e}")))?;
    if url.cannot_be_a_base() {
        return Err(UpdaterError::config(format!(
            "API base URL '{raw}' cannot be used as a base"
        )));
    }
    Ok(url)
}

fn request_failed(err: reqwest::Error) -> UpdaterError {
    let kind = if err.is_timeout() {
        "timed out"
    } else if err.is_connect() {
        "could not connect"
    } else {
        "failed"
    };
    UpdaterError::transport(
        err.status().map(|s| s.as_u16()),
        format!("Request {kind}: {err}"),
    )
}

async fn http_fault(response: Response) -> UpdaterError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorResponse>(&body)
        .map(|wrapper| wrapper.message)
        .ok()
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| {
            if body.trim().is_empty() {
                status
                    .canonical_reason()
                    .unwrap_or("Unexpected response")
                    .to_string()
            } else {
                body
            }
        });
    UpdaterError::transport(Some(status.as_u16()), message)
}
