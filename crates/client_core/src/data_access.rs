use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use shared::{
    domain::{Company, CompanyId, Location},
    error::ApiException,
};
use tracing::debug;
use url::Url;

use crate::error::FetchError;

/// Source of company and location records. Each call resolves or fails on its
/// own; implementations never retry.
#[async_trait]
pub trait DataAccess: Send + Sync {
    async fn fetch_companies(&self) -> Result<Vec<Company>, FetchError>;
    async fn fetch_company(&self, id: CompanyId) -> Result<Company, FetchError>;
    async fn fetch_locations(&self, company_id: CompanyId) -> Result<Vec<Location>, FetchError>;
}

/// [`DataAccess`] over the company REST API.
#[derive(Debug, Clone)]
pub struct HttpDataAccess {
    http: Client,
    base_url: Url,
}

impl HttpDataAccess {
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, FetchError> {
        let base_url = parse_base_url(base_url)?;
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, FetchError> {
        self.base_url
            .join(path)
            .map_err(|err| FetchError::InvalidBaseUrl {
                url: self.base_url.to_string(),
                reason: err.to_string(),
            })
    }

    async fn get(&self, path: &str) -> Result<reqwest::Response, FetchError> {
        let url = self.endpoint(path)?;
        debug!(%url, "issuing data request");
        Ok(self.http.get(url).send().await?)
    }
}

#[async_trait]
impl DataAccess for HttpDataAccess {
    async fn fetch_companies(&self) -> Result<Vec<Company>, FetchError> {
        let response = self.get("companies").await?;
        decode(response).await
    }

    async fn fetch_company(&self, id: CompanyId) -> Result<Company, FetchError> {
        let response = self.get(&format!("companies/{id}")).await?;
        decode(response).await
    }

    async fn fetch_locations(&self, company_id: CompanyId) -> Result<Vec<Location>, FetchError> {
        let response = self.get(&format!("companies/{company_id}/locations")).await?;
        // The API reports "no locations for this company" as 404.
        if response.status() == StatusCode::NOT_FOUND {
            debug!(company_id = company_id.0, "no locations recorded for company");
            return Ok(Vec::new());
        }
        decode(response).await
    }
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, FetchError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        let exception = ApiException::from_response(status.as_u16(), &body);
        return Err(FetchError::from_api(status.as_u16(), exception));
    }
    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|err| FetchError::Decode(err.to_string()))
}

fn parse_base_url(raw: &str) -> Result<Url, FetchError> {
    let trimmed = raw.trim().trim_end_matches('/');
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(FetchError::InvalidBaseUrl {
            url: raw.to_string(),
            reason: "must start with http:// or https://".to_string(),
        });
    }
    // Joining relative paths keeps any prefix only when the base ends in '/'.
    Url::parse(&format!("{trimmed}/")).map_err(|err| FetchError::InvalidBaseUrl {
        url: raw.to_string(),
        reason: err.to_string(),
    })
}

#[cfg(test)]
#[path = "tests/data_access_tests.rs"]
mod tests;
