//! HTTP client for the remote employee directory API.

use async_trait::async_trait;
use reqwest::StatusCode;
use thiserror::Error;
use url::Url;

use super::types::{Employee, EmployeeDraft, EmployeePatch};

/// Errors from the remote API tier.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("request failed: {0}")]
  Transport(#[from] reqwest::Error),
  #[error("unexpected status {0}")]
  Status(StatusCode),
}

/// Remote side of the employee store.
///
/// Kept behind a trait so the fallback logic can be exercised against
/// a fake in tests, and so the store never touches reqwest directly.
#[async_trait]
pub trait EmployeeApi: Send + Sync {
  async fn list(&self) -> Result<Vec<Employee>, ApiError>;
  async fn get(&self, id: u64) -> Result<Employee, ApiError>;
  async fn add(&self, draft: &EmployeeDraft) -> Result<Employee, ApiError>;
  async fn update(&self, id: u64, patch: &EmployeePatch) -> Result<Employee, ApiError>;
  async fn delete(&self, id: u64) -> Result<(), ApiError>;
}

/// `EmployeeApi` backed by reqwest.
#[derive(Clone)]
pub struct HttpApi {
  client: reqwest::Client,
  base_url: Url,
}

impl HttpApi {
  pub fn new(base_url: Url) -> Self {
    Self {
      client: reqwest::Client::new(),
      base_url,
    }
  }

  fn endpoint(&self, path: &str) -> String {
    format!("{}/{}", self.base_url.as_str().trim_end_matches('/'), path)
  }

  fn check(response: &reqwest::Response) -> Result<(), ApiError> {
    if response.status().is_success() {
      Ok(())
    } else {
      Err(ApiError::Status(response.status()))
    }
  }
}

#[async_trait]
impl EmployeeApi for HttpApi {
  async fn list(&self) -> Result<Vec<Employee>, ApiError> {
    let response = self.client.get(self.endpoint("employees")).send().await?;
    Self::check(&response)?;
    Ok(response.json().await?)
  }

  async fn get(&self, id: u64) -> Result<Employee, ApiError> {
    let response = self
      .client
      .get(self.endpoint(&format!("employees/{id}")))
      .send()
      .await?;
    Self::check(&response)?;
    Ok(response.json().await?)
  }

  async fn add(&self, draft: &EmployeeDraft) -> Result<Employee, ApiError> {
    let response = self
      .client
      .post(self.endpoint("employees"))
      .json(draft)
      .send()
      .await?;
    Self::check(&response)?;
    Ok(response.json().await?)
  }

  async fn update(&self, id: u64, patch: &EmployeePatch) -> Result<Employee, ApiError> {
    let response = self
      .client
      .put(self.endpoint(&format!("employees/{id}")))
      .json(patch)
      .send()
      .await?;
    Self::check(&response)?;
    Ok(response.json().await?)
  }

  async fn delete(&self, id: u64) -> Result<(), ApiError> {
    let response = self
      .client
      .delete(self.endpoint(&format!("employees/{id}")))
      .send()
      .await?;
    Self::check(&response)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_endpoint_joins_regardless_of_trailing_slash() {
    let with_slash = HttpApi::new(Url::parse("https://api.example.com/v1/").unwrap());
    let without = HttpApi::new(Url::parse("https://api.example.com/v1").unwrap());

    assert_eq!(
      with_slash.endpoint("employees"),
      "https://api.example.com/v1/employees"
    );
    assert_eq!(
      without.endpoint("employees/3"),
      "https://api.example.com/v1/employees/3"
    );
  }
}
