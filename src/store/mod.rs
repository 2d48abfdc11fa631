//! Employee store: network-first data access with a local fallback
//! roster.
//!
//! Every operation tries the directory API first. When the call fails
//! (transport error or non-2xx status) and the policy allows it, the
//! operation degrades to the persisted roster instead of surfacing an
//! error. Successful writes rewrite the roster slot wholesale so later
//! fallbacks see the freshest state.

pub mod api;
pub mod types;

use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;
use tracing::warn;

use crate::cache::{CacheError, CacheStore};
use api::{ApiError, EmployeeApi};
use types::{next_local_id, Employee, EmployeeDraft, EmployeePatch};

#[derive(Debug, Error)]
pub enum StoreError {
  #[error("employee {0} not found")]
  NotFound(u64),
  #[error(transparent)]
  Api(#[from] ApiError),
  #[error(transparent)]
  Cache(#[from] CacheError),
}

/// Per-operation switch controlling whether an API failure degrades to
/// the fallback roster instead of surfacing an error.
///
/// The default masks failures for every operation; `get` still reports
/// `NotFound` when the id is absent from both tiers, which makes it the
/// one operation whose failure a caller can observe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FallbackPolicy {
  pub list: bool,
  pub get: bool,
  pub add: bool,
  pub update: bool,
  pub delete: bool,
}

impl FallbackPolicy {
  /// Degrade every operation to the fallback roster on API failure.
  pub fn degrade_all() -> Self {
    Self {
      list: true,
      get: true,
      add: true,
      update: true,
      delete: true,
    }
  }

  /// Propagate every API failure to the caller.
  #[allow(dead_code)]
  pub fn strict() -> Self {
    Self {
      list: false,
      get: false,
      add: false,
      update: false,
      delete: false,
    }
  }
}

impl Default for FallbackPolicy {
  fn default() -> Self {
    Self::degrade_all()
  }
}

/// Which tier produced a store result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provenance {
  /// Fresh data straight from the directory API.
  Remote,
  /// Served from the local roster after an API failure.
  Fallback,
}

/// A store result tagged with the tier it came from, so callers can
/// surface degraded data instead of silently mixing tiers.
#[derive(Debug, Clone)]
pub struct Sourced<T> {
  pub data: T,
  pub provenance: Provenance,
  /// When the fallback roster was written, for data served locally.
  pub saved_at: Option<DateTime<Utc>>,
}

impl<T> Sourced<T> {
  fn remote(data: T) -> Self {
    Self {
      data,
      provenance: Provenance::Remote,
      saved_at: None,
    }
  }

  fn fallback(data: T, saved_at: Option<DateTime<Utc>>) -> Self {
    Self {
      data,
      provenance: Provenance::Fallback,
      saved_at,
    }
  }

  pub fn is_fallback(&self) -> bool {
    self.provenance == Provenance::Fallback
  }
}

/// Data access layer for the employee directory.
#[derive(Clone)]
pub struct EmployeeStore {
  api: Arc<dyn EmployeeApi>,
  cache: Arc<dyn CacheStore>,
  policy: FallbackPolicy,
}

impl EmployeeStore {
  pub fn new(api: Arc<dyn EmployeeApi>, cache: Arc<dyn CacheStore>) -> Self {
    Self {
      api,
      cache,
      policy: FallbackPolicy::default(),
    }
  }

  #[allow(dead_code)]
  pub fn with_policy(mut self, policy: FallbackPolicy) -> Self {
    self.policy = policy;
    self
  }

  /// Roster slot contents plus its write time; empty if never written.
  fn cached(&self) -> Result<(Vec<Employee>, Option<DateTime<Utc>>), CacheError> {
    Ok(match self.cache.load()? {
      Some(roster) => (roster.employees, Some(roster.saved_at)),
      None => (Vec::new(), None),
    })
  }

  /// List all employees. Falls back to the cached roster, empty if the
  /// slot has never been written.
  pub async fn list(&self) -> Result<Sourced<Vec<Employee>>, StoreError> {
    match self.api.list().await {
      Ok(employees) => Ok(Sourced::remote(employees)),
      Err(err) if self.policy.list => {
        warn!(error = %err, "listing employees failed, serving fallback roster");
        let (employees, saved_at) = self.cached()?;
        Ok(Sourced::fallback(employees, saved_at))
      }
      Err(err) => Err(err.into()),
    }
  }

  /// Get one employee. Falls back to a cache lookup by id; `NotFound`
  /// when the id is absent from both tiers.
  pub async fn get(&self, id: u64) -> Result<Sourced<Employee>, StoreError> {
    match self.api.get(id).await {
      Ok(employee) => Ok(Sourced::remote(employee)),
      Err(err) if self.policy.get => {
        warn!(error = %err, id, "fetching employee failed, searching fallback roster");
        let (employees, saved_at) = self.cached()?;
        employees
          .into_iter()
          .find(|e| e.id == id)
          .map(|e| Sourced::fallback(e, saved_at))
          .ok_or(StoreError::NotFound(id))
      }
      Err(err) => Err(err.into()),
    }
  }

  /// Create an employee. On API success the server record is appended
  /// to the roster for future fallback reads; on failure the record is
  /// created locally with a synthesized id and the failure is masked.
  pub async fn add(&self, draft: EmployeeDraft) -> Result<Sourced<Employee>, StoreError> {
    match self.api.add(&draft).await {
      Ok(created) => {
        let (mut employees, _) = self.cached()?;
        employees.push(created.clone());
        self.cache.save(&employees)?;
        Ok(Sourced::remote(created))
      }
      Err(err) if self.policy.add => {
        warn!(error = %err, "adding employee failed, creating locally");
        let (mut employees, _) = self.cached()?;
        let created = draft.with_id(next_local_id(&employees));
        employees.push(created.clone());
        self.cache.save(&employees)?;
        Ok(Sourced::fallback(created, None))
      }
      Err(err) => Err(err.into()),
    }
  }

  /// Update an employee. On API success the cached record is replaced
  /// with the server object; on failure the patch is merged into the
  /// cached record. The id never changes either way.
  pub async fn update(&self, id: u64, patch: EmployeePatch) -> Result<Sourced<Employee>, StoreError> {
    match self.api.update(id, &patch).await {
      Ok(updated) => {
        let (mut employees, _) = self.cached()?;
        for slot in employees.iter_mut() {
          if slot.id == id {
            *slot = updated.clone();
          }
        }
        self.cache.save(&employees)?;
        Ok(Sourced::remote(updated))
      }
      Err(err) if self.policy.update => {
        warn!(error = %err, id, "updating employee failed, merging into fallback roster");
        let (mut employees, _) = self.cached()?;
        let merged = employees
          .iter_mut()
          .find(|e| e.id == id)
          .map(|e| {
            patch.apply_to(e);
            e.clone()
          })
          .ok_or(StoreError::NotFound(id))?;
        self.cache.save(&employees)?;
        Ok(Sourced::fallback(merged, None))
      }
      Err(err) => Err(err.into()),
    }
  }

  /// Delete an employee. The id is removed from the roster whether or
  /// not the API call worked, so the operation reports success either
  /// way; the result is tagged `Fallback` when the API call failed.
  pub async fn delete(&self, id: u64) -> Result<Sourced<()>, StoreError> {
    let outcome = self.api.delete(id).await;

    let (mut employees, _) = self.cached()?;
    employees.retain(|e| e.id != id);
    self.cache.save(&employees)?;

    match outcome {
      Ok(()) => Ok(Sourced::remote(())),
      Err(err) if self.policy.delete => {
        warn!(error = %err, id, "deleting employee failed remotely, removed from fallback roster");
        Ok(Sourced::fallback((), None))
      }
      Err(err) => Err(err.into()),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::cache::MemoryStore;
  use async_trait::async_trait;
  use chrono::NaiveDate;
  use reqwest::StatusCode;
  use std::sync::atomic::{AtomicBool, Ordering};
  use std::sync::Mutex;

  /// In-memory stand-in for the directory API. Flipping `online` to
  /// false makes every call fail the way an unreachable server would.
  struct FakeApi {
    employees: Mutex<Vec<Employee>>,
    online: AtomicBool,
  }

  impl FakeApi {
    fn online(employees: Vec<Employee>) -> Self {
      Self {
        employees: Mutex::new(employees),
        online: AtomicBool::new(true),
      }
    }

    fn offline() -> Self {
      Self {
        employees: Mutex::new(Vec::new()),
        online: AtomicBool::new(false),
      }
    }

    fn go_offline(&self) {
      self.online.store(false, Ordering::SeqCst);
    }

    fn check_online(&self) -> Result<(), ApiError> {
      if self.online.load(Ordering::SeqCst) {
        Ok(())
      } else {
        Err(ApiError::Status(StatusCode::SERVICE_UNAVAILABLE))
      }
    }
  }

  #[async_trait]
  impl EmployeeApi for FakeApi {
    async fn list(&self) -> Result<Vec<Employee>, ApiError> {
      self.check_online()?;
      Ok(self.employees.lock().unwrap().clone())
    }

    async fn get(&self, id: u64) -> Result<Employee, ApiError> {
      self.check_online()?;
      self
        .employees
        .lock()
        .unwrap()
        .iter()
        .find(|e| e.id == id)
        .cloned()
        .ok_or(ApiError::Status(StatusCode::NOT_FOUND))
    }

    async fn add(&self, draft: &EmployeeDraft) -> Result<Employee, ApiError> {
      self.check_online()?;
      let mut employees = self.employees.lock().unwrap();
      let created = draft.clone().with_id(next_local_id(&employees));
      employees.push(created.clone());
      Ok(created)
    }

    async fn update(&self, id: u64, patch: &EmployeePatch) -> Result<Employee, ApiError> {
      self.check_online()?;
      let mut employees = self.employees.lock().unwrap();
      let employee = employees
        .iter_mut()
        .find(|e| e.id == id)
        .ok_or(ApiError::Status(StatusCode::NOT_FOUND))?;
      patch.apply_to(employee);
      Ok(employee.clone())
    }

    async fn delete(&self, id: u64) -> Result<(), ApiError> {
      self.check_online()?;
      self.employees.lock().unwrap().retain(|e| e.id != id);
      Ok(())
    }
  }

  fn employee(id: u64, name: &str) -> Employee {
    Employee {
      id,
      full_name: name.to_string(),
      job_title: "Engineer".to_string(),
      department: "R&D".to_string(),
      date_of_joining: NaiveDate::from_ymd_opt(2022, 9, 1).unwrap(),
      profile_picture: None,
    }
  }

  fn draft(name: &str) -> EmployeeDraft {
    EmployeeDraft {
      full_name: name.to_string(),
      job_title: "Engineer".to_string(),
      department: "R&D".to_string(),
      date_of_joining: NaiveDate::from_ymd_opt(2022, 9, 1).unwrap(),
      profile_picture: None,
    }
  }

  fn store(api: FakeApi, cache: MemoryStore) -> EmployeeStore {
    EmployeeStore::new(Arc::new(api), Arc::new(cache))
  }

  #[tokio::test]
  async fn test_add_then_list_includes_record_with_unique_id() {
    let store = store(FakeApi::online(vec![employee(1, "Ada Lovelace")]), MemoryStore::new());

    let added = store.add(draft("Grace Hopper")).await.unwrap();
    assert_eq!(added.provenance, Provenance::Remote);

    let listed = store.list().await.unwrap();
    assert!(listed.data.iter().any(|e| e.full_name == "Grace Hopper"));

    let mut ids: Vec<u64> = listed.data.iter().map(|e| e.id).collect();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), listed.data.len());
  }

  #[tokio::test]
  async fn test_update_preserves_id_and_unset_fields() {
    let store = store(FakeApi::online(vec![employee(4, "Ada Lovelace")]), MemoryStore::new());

    let patch = EmployeePatch {
      job_title: Some("Staff Engineer".to_string()),
      ..Default::default()
    };
    let updated = store.update(4, patch).await.unwrap();

    assert_eq!(updated.data.id, 4);
    assert_eq!(updated.data.job_title, "Staff Engineer");
    assert_eq!(updated.data.full_name, "Ada Lovelace");
    assert_eq!(updated.data.department, "R&D");
  }

  #[tokio::test]
  async fn test_delete_then_get_is_not_found_online() {
    let store = store(FakeApi::online(vec![employee(2, "Ada Lovelace")]), MemoryStore::new());

    store.delete(2).await.unwrap();

    match store.get(2).await {
      Err(StoreError::NotFound(2)) => {}
      other => panic!("expected NotFound(2), got {other:?}"),
    }
  }

  #[tokio::test]
  async fn test_delete_then_get_is_not_found_offline() {
    let cache = MemoryStore::seeded(vec![employee(2, "Ada Lovelace")]);
    let store = store(FakeApi::offline(), cache);

    let deleted = store.delete(2).await.unwrap();
    assert!(deleted.is_fallback());

    match store.get(2).await {
      Err(StoreError::NotFound(2)) => {}
      other => panic!("expected NotFound(2), got {other:?}"),
    }
  }

  #[tokio::test]
  async fn test_offline_add_assigns_max_plus_one() {
    let cache = MemoryStore::seeded(vec![employee(1, "Ada Lovelace"), employee(3, "Grace Hopper")]);
    let store = store(FakeApi::offline(), cache);

    let added = store.add(draft("Margaret Hamilton")).await.unwrap();

    assert_eq!(added.data.id, 4);
    assert!(added.is_fallback());
  }

  #[tokio::test]
  async fn test_offline_add_to_empty_roster_assigns_one() {
    let store = store(FakeApi::offline(), MemoryStore::new());

    let added = store.add(draft("Margaret Hamilton")).await.unwrap();

    assert_eq!(added.data.id, 1);
  }

  #[tokio::test]
  async fn test_offline_list_serves_cached_roster() {
    let cache = MemoryStore::seeded(vec![employee(1, "Ada Lovelace")]);
    let store = store(FakeApi::offline(), cache);

    let listed = store.list().await.unwrap();

    assert_eq!(listed.provenance, Provenance::Fallback);
    assert!(listed.saved_at.is_some());
    assert_eq!(listed.data.len(), 1);
  }

  #[tokio::test]
  async fn test_offline_list_with_cold_cache_is_empty() {
    let store = store(FakeApi::offline(), MemoryStore::new());

    let listed = store.list().await.unwrap();

    assert!(listed.data.is_empty());
    assert!(listed.is_fallback());
  }

  #[tokio::test]
  async fn test_offline_get_reads_cached_record() {
    let cache = MemoryStore::seeded(vec![employee(9, "Ada Lovelace")]);
    let store = store(FakeApi::offline(), cache);

    let got = store.get(9).await.unwrap();

    assert_eq!(got.data.full_name, "Ada Lovelace");
    assert!(got.is_fallback());
  }

  #[tokio::test]
  async fn test_offline_update_merges_into_cached_record() {
    let cache = MemoryStore::seeded(vec![employee(5, "Ada Lovelace")]);
    let store = store(FakeApi::offline(), cache);

    let patch = EmployeePatch {
      department: Some("Platform".to_string()),
      ..Default::default()
    };
    let updated = store.update(5, patch).await.unwrap();

    assert!(updated.is_fallback());
    assert_eq!(updated.data.department, "Platform");
    assert_eq!(updated.data.full_name, "Ada Lovelace");

    // The merge is persisted for later fallback reads
    let got = store.get(5).await.unwrap();
    assert_eq!(got.data.department, "Platform");
  }

  #[tokio::test]
  async fn test_offline_update_of_unknown_id_is_not_found() {
    let store = store(FakeApi::offline(), MemoryStore::new());

    match store.update(99, EmployeePatch::default()).await {
      Err(StoreError::NotFound(99)) => {}
      other => panic!("expected NotFound(99), got {other:?}"),
    }
  }

  #[tokio::test]
  async fn test_fallback_roster_survives_server_loss() {
    let api = Arc::new(FakeApi::online(Vec::new()));
    let store = EmployeeStore::new(api.clone(), Arc::new(MemoryStore::new()));

    store.add(draft("Ada Lovelace")).await.unwrap();
    api.go_offline();

    let listed = store.list().await.unwrap();
    assert!(listed.is_fallback());
    assert_eq!(listed.data.len(), 1);
    assert_eq!(listed.data[0].full_name, "Ada Lovelace");
  }

  #[tokio::test]
  async fn test_strict_policy_propagates_api_errors() {
    let cache = MemoryStore::seeded(vec![employee(1, "Ada Lovelace")]);
    let store = store(FakeApi::offline(), cache).with_policy(FallbackPolicy::strict());

    assert!(matches!(store.list().await, Err(StoreError::Api(_))));
    assert!(matches!(store.get(1).await, Err(StoreError::Api(_))));
    assert!(matches!(
      store.add(draft("Grace Hopper")).await,
      Err(StoreError::Api(_))
    ));
    assert!(matches!(
      store.update(1, EmployeePatch::default()).await,
      Err(StoreError::Api(_))
    ));
    assert!(matches!(store.delete(1).await, Err(StoreError::Api(_))));
  }

  #[tokio::test]
  async fn test_strict_delete_still_clears_cache() {
    let cache = Arc::new(MemoryStore::seeded(vec![employee(1, "Ada Lovelace")]));
    let store = EmployeeStore::new(Arc::new(FakeApi::offline()), cache.clone())
      .with_policy(FallbackPolicy::strict());

    // Cache removal is unconditional even when the error propagates
    assert!(store.delete(1).await.is_err());
    assert!(cache.load().unwrap().unwrap().employees.is_empty());
  }
}
