//! Employee record types shared by the API client, the fallback cache
//! and the UI. Wire names are camelCase to match the directory API.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single employee record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
  pub id: u64,
  pub full_name: String,
  pub job_title: String,
  pub department: String,
  pub date_of_joining: NaiveDate,
  /// Remote URL or inline base64 data URI.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub profile_picture: Option<String>,
}

/// A new employee before the server (or the fallback store) assigns an id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeDraft {
  pub full_name: String,
  pub job_title: String,
  pub department: String,
  pub date_of_joining: NaiveDate,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub profile_picture: Option<String>,
}

impl EmployeeDraft {
  /// Promote the draft to a full record with the given id.
  pub fn with_id(self, id: u64) -> Employee {
    Employee {
      id,
      full_name: self.full_name,
      job_title: self.job_title,
      department: self.department,
      date_of_joining: self.date_of_joining,
      profile_picture: self.profile_picture,
    }
  }
}

/// Partial update for an existing employee. `None` fields are left
/// untouched; an explicitly empty `profile_picture` clears the picture.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeePatch {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub full_name: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub job_title: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub department: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub date_of_joining: Option<NaiveDate>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub profile_picture: Option<String>,
}

impl EmployeePatch {
  /// Merge the set fields into an existing record. The id never changes.
  pub fn apply_to(&self, employee: &mut Employee) {
    if let Some(full_name) = &self.full_name {
      employee.full_name = full_name.clone();
    }
    if let Some(job_title) = &self.job_title {
      employee.job_title = job_title.clone();
    }
    if let Some(department) = &self.department {
      employee.department = department.clone();
    }
    if let Some(date_of_joining) = self.date_of_joining {
      employee.date_of_joining = date_of_joining;
    }
    if let Some(picture) = &self.profile_picture {
      employee.profile_picture = if picture.is_empty() {
        None
      } else {
        Some(picture.clone())
      };
    }
  }
}

/// Next id for records created while the API is unreachable:
/// `max(existing) + 1`, or 1 for an empty roster.
///
/// Not safe under concurrent writers, and deleting the highest id frees
/// it for reuse. Acceptable here: the cache has a single logical writer.
pub fn next_local_id(employees: &[Employee]) -> u64 {
  employees.iter().map(|e| e.id).max().map_or(1, |max| max + 1)
}
