//! # API Client
//!
//! This module provides a client for the KYB backend. It handles request
//! construction, bearer authentication, and error extraction from the
//! backend's `{"detail": ...}` error bodies.
//!
//! Credentials are never read from ambient state: every authenticated call
//! takes the caller's [`Credentials`] explicitly.

use crate::errors::KybError;
use crate::types::{
    Company, CompanyDocument, DeleteCompanyResponse, HealthStatus, ReportSnapshot,
    SaveProfilePayload, TokenResponse, UploadResponse,
};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{error, info};

/// The default timeout for a single backend request. Generation runs the whole
/// extraction pipeline synchronously, so this is generous.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// A bearer token obtained from `POST /auth/login`.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    access_token: String,
}

impl Credentials {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
        }
    }

    pub fn token(&self) -> &str {
        &self.access_token
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials").finish_non_exhaustive()
    }
}

impl From<TokenResponse> for Credentials {
    fn from(response: TokenResponse) -> Self {
        Credentials::new(response.access_token)
    }
}

/// The two backend calls a review session depends on.
#[async_trait]
pub trait KybBackend: Send + Sync {
    /// Runs the extraction pipeline for `company_id` and returns the report.
    async fn generate_kyb(
        &self,
        credentials: &Credentials,
        company_id: &str,
    ) -> Result<ReportSnapshot, KybError>;

    /// Persists the reviewed report together with the manual edits.
    async fn save_profile(
        &self,
        credentials: &Credentials,
        company_id: &str,
        payload: &SaveProfilePayload,
    ) -> Result<Value, KybError>;
}

/// The client for making API calls to the KYB backend.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Creates a new `ApiClient` with [`DEFAULT_TIMEOUT`].
    pub fn new(base_url: impl Into<String>) -> Result<Self, KybError> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self, KybError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(KybError::ClientBuild)?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Exchanges a username and password for a bearer token.
    pub async fn login(&self, username: &str, password: &str) -> Result<TokenResponse, KybError> {
        let url = self.url("/auth/login");
        info!("Logging in as '{}' at: {}", username, url);

        let form = [
            ("grant_type", "password"),
            ("username", username),
            ("password", password),
            ("scope", ""),
            ("client_id", "string"),
            ("client_secret", "string"),
        ];
        let response = self
            .client
            .post(&url)
            .header("accept", "application/json")
            .form(&form)
            .send()
            .await?;

        parse_json(ensure_success(response, "Login failed").await?).await
    }

    /// Checks that the backend is reachable and the token is accepted.
    pub async fn health(&self, credentials: &Credentials) -> Result<HealthStatus, KybError> {
        let url = self.url("/health");
        info!("Checking backend health at: {}", url);

        let response = self
            .client
            .get(&url)
            .bearer_auth(credentials.token())
            .send()
            .await?;

        parse_json(ensure_success(response, "Health check failed").await?).await
    }

    pub async fn create_company(
        &self,
        credentials: &Credentials,
        name: &str,
    ) -> Result<Company, KybError> {
        let url = self.url("/companies/");
        info!("Creating company '{}'", name);

        let payload = serde_json::json!({ "name": name, "status": "active" });
        let response = self
            .client
            .post(&url)
            .bearer_auth(credentials.token())
            .json(&payload)
            .send()
            .await?;

        parse_json(ensure_success(response, "Failed to create company").await?).await
    }

    pub async fn list_companies(&self, credentials: &Credentials) -> Result<Vec<Company>, KybError> {
        let url = self.url("/companies/");
        info!("Fetching companies from: {}", url);

        let response = self
            .client
            .get(&url)
            .bearer_auth(credentials.token())
            .send()
            .await?;

        parse_json(ensure_success(response, "Failed to fetch companies").await?).await
    }

    pub async fn delete_company(
        &self,
        credentials: &Credentials,
        company_id: &str,
    ) -> Result<DeleteCompanyResponse, KybError> {
        let url = self.url(&format!("/companies/{company_id}"));
        info!("Deleting company {}", company_id);

        let response = self
            .client
            .delete(&url)
            .bearer_auth(credentials.token())
            .send()
            .await?;

        parse_json(ensure_success(response, "Failed to delete company").await?).await
    }

    /// Uploads `files` as supporting documents for `company_id`.
    pub async fn upload_documents(
        &self,
        credentials: &Credentials,
        company_id: &str,
        files: &[PathBuf],
    ) -> Result<UploadResponse, KybError> {
        if files.is_empty() {
            return Err(KybError::NoFiles);
        }

        let mut form = Form::new().text("company_id", company_id.to_string());
        for path in files {
            let bytes = tokio::fs::read(path).await?;
            let file_name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());
            let part = Part::bytes(bytes)
                .file_name(file_name)
                .mime_str(content_type_for(path))?;
            form = form.part("files", part);
        }

        let url = self.url("/documents/upload");
        info!("Uploading {} documents for company {}", files.len(), company_id);

        let response = self
            .client
            .post(&url)
            .header("accept", "application/json")
            .bearer_auth(credentials.token())
            .multipart(form)
            .send()
            .await?;

        parse_json(ensure_success(response, "Failed to upload documents").await?).await
    }

    pub async fn list_documents(
        &self,
        credentials: &Credentials,
        company_id: &str,
    ) -> Result<Vec<CompanyDocument>, KybError> {
        let url = self.url(&format!("/documents/by-company/{company_id}"));
        info!("Fetching documents for company {}", company_id);

        let response = self
            .client
            .get(&url)
            .bearer_auth(credentials.token())
            .send()
            .await?;

        parse_json(ensure_success(response, "Failed to fetch documents").await?).await
    }
}

#[async_trait]
impl KybBackend for ApiClient {
    async fn generate_kyb(
        &self,
        credentials: &Credentials,
        company_id: &str,
    ) -> Result<ReportSnapshot, KybError> {
        let url = self.url(&format!("/companies/{company_id}/generate-kyb"));
        info!("Generating KYB report for company {}", company_id);

        let response = self
            .client
            .post(&url)
            .header("accept", "application/json")
            .bearer_auth(credentials.token())
            .send()
            .await?;

        let raw: Value =
            parse_json(ensure_success(response, "Failed to generate KYB data").await?).await?;
        ReportSnapshot::from_value(raw)
    }

    async fn save_profile(
        &self,
        credentials: &Credentials,
        company_id: &str,
        payload: &SaveProfilePayload,
    ) -> Result<Value, KybError> {
        let url = self.url(&format!("/companies/{company_id}/save_profile"));
        info!(
            "Saving profile for company {} with {} manual edits",
            company_id,
            payload.manual_edits.len()
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(credentials.token())
            .json(payload)
            .send()
            .await?;

        parse_json(ensure_success(response, "Failed to save profile").await?).await
    }
}

/// Passes successful responses through; turns anything else into
/// [`KybError::Api`], preferring the backend's `detail` message over `fallback`.
async fn ensure_success(response: Response, fallback: &str) -> Result<Response, KybError> {
    if response.status().is_success() {
        return Ok(response);
    }

    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    let message = error_detail(&body).unwrap_or_else(|| fallback.to_string());
    error!("Backend responded with {}: {}", status, body);
    Err(KybError::Api { status, message })
}

async fn parse_json<T: DeserializeOwned>(response: Response) -> Result<T, KybError> {
    let body = response.text().await?;
    Ok(serde_json::from_str(&body)?)
}

/// Extracts a non-empty string `detail` from a JSON error body.
pub fn error_detail(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    value
        .get("detail")?
        .as_str()
        .filter(|detail| !detail.is_empty())
        .map(str::to_string)
}

fn content_type_for(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    match extension.as_str() {
        "pdf" => "application/pdf",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "txt" => "text/plain",
        _ => "application/octet-stream",
    }
}
