//! Add/edit form state: five fields, focus cycling and validation.

use chrono::NaiveDate;
use crossterm::event::{KeyCode, KeyEvent};

use crate::store::types::{Employee, EmployeeDraft, EmployeePatch};

use super::input::TextInput;

/// Form fields in focus order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
  FullName,
  JobTitle,
  Department,
  DateOfJoining,
  ProfilePicture,
}

impl FormField {
  pub const ALL: [FormField; 5] = [
    FormField::FullName,
    FormField::JobTitle,
    FormField::Department,
    FormField::DateOfJoining,
    FormField::ProfilePicture,
  ];

  pub fn label(&self) -> &'static str {
    match self {
      FormField::FullName => "Full Name",
      FormField::JobTitle => "Job Title",
      FormField::Department => "Department",
      FormField::DateOfJoining => "Date of Joining (YYYY-MM-DD)",
      FormField::ProfilePicture => "Profile Picture (URL or data URI, optional)",
    }
  }

  fn index(&self) -> usize {
    Self::ALL.iter().position(|f| f == self).unwrap_or(0)
  }
}

/// What the form did with a key press.
#[derive(Debug, PartialEq, Eq)]
pub enum FormResult {
  /// Key handled, form still open
  Consumed,
  /// Enter pressed and the fields validated
  Submitted,
  /// Esc pressed
  Cancelled,
}

#[derive(Debug, Clone)]
pub struct EmployeeForm {
  pub full_name: TextInput,
  pub job_title: TextInput,
  pub department: TextInput,
  pub date_of_joining: TextInput,
  pub profile_picture: TextInput,
  pub focus: FormField,
  /// Validation message shown inline until the next key press
  pub error: Option<String>,
}

impl EmployeeForm {
  pub fn empty() -> Self {
    Self {
      full_name: TextInput::new(),
      job_title: TextInput::new(),
      department: TextInput::new(),
      date_of_joining: TextInput::new(),
      profile_picture: TextInput::new(),
      focus: FormField::FullName,
      error: None,
    }
  }

  /// Form pre-filled from an existing record, for editing.
  pub fn prefilled(employee: &Employee) -> Self {
    Self {
      full_name: TextInput::with_value(&employee.full_name),
      job_title: TextInput::with_value(&employee.job_title),
      department: TextInput::with_value(&employee.department),
      date_of_joining: TextInput::with_value(employee.date_of_joining.format("%Y-%m-%d").to_string()),
      profile_picture: TextInput::with_value(employee.profile_picture.clone().unwrap_or_default()),
      focus: FormField::FullName,
      error: None,
    }
  }

  pub fn input(&self, field: FormField) -> &TextInput {
    match field {
      FormField::FullName => &self.full_name,
      FormField::JobTitle => &self.job_title,
      FormField::Department => &self.department,
      FormField::DateOfJoining => &self.date_of_joining,
      FormField::ProfilePicture => &self.profile_picture,
    }
  }

  fn focused_input_mut(&mut self) -> &mut TextInput {
    match self.focus {
      FormField::FullName => &mut self.full_name,
      FormField::JobTitle => &mut self.job_title,
      FormField::Department => &mut self.department,
      FormField::DateOfJoining => &mut self.date_of_joining,
      FormField::ProfilePicture => &mut self.profile_picture,
    }
  }

  fn focus_next(&mut self) {
    let next = (self.focus.index() + 1) % FormField::ALL.len();
    self.focus = FormField::ALL[next];
  }

  fn focus_prev(&mut self) {
    let len = FormField::ALL.len();
    let prev = (self.focus.index() + len - 1) % len;
    self.focus = FormField::ALL[prev];
  }

  /// Handle a key press. Submission only happens once the fields
  /// validate; otherwise the error is shown and the form stays open.
  pub fn handle_key(&mut self, key: KeyEvent) -> FormResult {
    self.error = None;
    match key.code {
      KeyCode::Esc => FormResult::Cancelled,
      KeyCode::Enter => match self.validate() {
        Ok(()) => FormResult::Submitted,
        Err(msg) => {
          self.error = Some(msg);
          FormResult::Consumed
        }
      },
      KeyCode::Tab | KeyCode::Down => {
        self.focus_next();
        FormResult::Consumed
      }
      KeyCode::BackTab | KeyCode::Up => {
        self.focus_prev();
        FormResult::Consumed
      }
      _ => {
        self.focused_input_mut().handle_key(key);
        FormResult::Consumed
      }
    }
  }

  fn validate(&self) -> Result<(), String> {
    if self.full_name.is_empty() {
      return Err("Full name is required".to_string());
    }
    if self.job_title.is_empty() {
      return Err("Job title is required".to_string());
    }
    if self.department.is_empty() {
      return Err("Department is required".to_string());
    }
    self.parse_date()?;
    Ok(())
  }

  fn parse_date(&self) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(self.date_of_joining.value().trim(), "%Y-%m-%d")
      .map_err(|_| "Date of joining must be a valid YYYY-MM-DD date".to_string())
  }

  /// Build a draft for a new record. Assumes `validate` passed.
  pub fn draft(&self) -> Result<EmployeeDraft, String> {
    self.validate()?;
    let picture = self.profile_picture.value().trim();
    Ok(EmployeeDraft {
      full_name: self.full_name.value().trim().to_string(),
      job_title: self.job_title.value().trim().to_string(),
      department: self.department.value().trim().to_string(),
      date_of_joining: self.parse_date()?,
      profile_picture: (!picture.is_empty()).then(|| picture.to_string()),
    })
  }

  /// Build a full-field patch for an edit submit. An emptied picture
  /// field becomes an empty string so the merge clears it.
  pub fn patch(&self) -> Result<EmployeePatch, String> {
    self.validate()?;
    Ok(EmployeePatch {
      full_name: Some(self.full_name.value().trim().to_string()),
      job_title: Some(self.job_title.value().trim().to_string()),
      department: Some(self.department.value().trim().to_string()),
      date_of_joining: Some(self.parse_date()?),
      profile_picture: Some(self.profile_picture.value().trim().to_string()),
    })
  }
}
