use crate::cache::{CacheStore, MemoryStore, SqliteStore};
use crate::config::Config;
use crate::event::{Event, EventHandler, StoreEvent};
use crate::store::api::HttpApi;
use crate::store::types::{Employee, EmployeeDraft, EmployeePatch};
use crate::store::{EmployeeStore, StoreError};
use crate::ui;
use crate::ui::components::{EmployeeForm, FormResult};
use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{
  disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::prelude::*;
use std::io::stdout;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::info;

/// Current screen. `List` reads the roster held on the App; the other
/// variants own their screen-local data.
#[derive(Debug)]
pub enum ViewState {
  List,
  Detail { employee: Box<Employee>, fallback: bool },
  Add { form: EmployeeForm },
  Edit { id: u64, form: EmployeeForm },
}

/// Main application state
pub struct App {
  /// Current screen
  view: ViewState,

  /// In-memory roster backing the list screen
  employees: Vec<Employee>,

  /// Selected row in the list screen
  selected: usize,

  /// A store call is in flight
  loading: bool,

  /// The last roster came from the fallback cache
  offline: bool,

  /// Error line for the status bar, cleared on the next key press
  error: Option<String>,

  /// Informational line for the status bar, cleared on the next key press
  notice: Option<String>,

  /// Armed delete waiting for confirmation
  pending_delete: Option<u64>,

  /// Application configuration
  config: Config,

  /// Employee store (API + fallback cache)
  store: EmployeeStore,

  /// Event sender for async store tasks
  event_tx: mpsc::UnboundedSender<Event>,

  /// Whether to quit
  should_quit: bool,
}

impl App {
  pub fn new(config: Config, no_cache: bool) -> Result<Self> {
    let api = Arc::new(HttpApi::new(config.api.base_url.clone()));
    let cache: Arc<dyn CacheStore> = if no_cache {
      Arc::new(MemoryStore::new())
    } else {
      Arc::new(SqliteStore::open()?)
    };
    let store = EmployeeStore::new(api, cache);
    let (tx, _rx) = mpsc::unbounded_channel();

    Ok(Self {
      view: ViewState::List,
      employees: Vec::new(),
      selected: 0,
      loading: true,
      offline: false,
      error: None,
      notice: None,
      pending_delete: None,
      config,
      store,
      event_tx: tx,
      should_quit: false,
    })
  }

  pub async fn run(&mut self) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    // Create event handler
    let mut events = EventHandler::new(Duration::from_millis(250));
    self.event_tx = events.sender();

    // Initial roster load
    self.load_roster();

    // Main loop
    while !self.should_quit {
      terminal.draw(|frame| ui::draw(frame, self))?;

      if let Some(event) = events.next().await {
        self.handle_event(event);
      }
    }

    // Cleanup terminal
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    Ok(())
  }

  fn handle_event(&mut self, event: Event) {
    match event {
      Event::Key(key) => self.handle_key(key),
      Event::Tick => {} // UI refresh happens automatically
      Event::Store(store_event) => self.handle_store_event(store_event),
      Event::Error(msg) => {
        self.loading = false;
        self.error = Some(msg);
        // A failed submit falls back to the list rather than trapping
        // the user in the form
        self.view = ViewState::List;
      }
    }
  }

  fn handle_key(&mut self, key: KeyEvent) {
    self.error = None;
    self.notice = None;

    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
      self.should_quit = true;
      return;
    }

    // An armed delete swallows the next key: y confirms, anything else cancels
    if let Some(id) = self.pending_delete.take() {
      if matches!(key.code, KeyCode::Char('y') | KeyCode::Char('Y')) {
        self.delete_employee(id);
      }
      return;
    }

    match &mut self.view {
      ViewState::List => self.handle_list_key(key),
      ViewState::Detail { .. } => self.handle_detail_key(key),
      ViewState::Add { form } => match form.handle_key(key) {
        FormResult::Submitted => {
          // Validation passed, so draft() cannot fail here
          if let Ok(draft) = form.draft() {
            self.add_employee(draft);
          }
        }
        FormResult::Cancelled => self.view = ViewState::List,
        FormResult::Consumed => {}
      },
      ViewState::Edit { id, form } => match form.handle_key(key) {
        FormResult::Submitted => {
          let id = *id;
          if let Ok(patch) = form.patch() {
            self.update_employee(id, patch);
          }
        }
        FormResult::Cancelled => self.view = ViewState::List,
        FormResult::Consumed => {}
      },
    }
  }

  fn handle_list_key(&mut self, key: KeyEvent) {
    match key.code {
      KeyCode::Char('q') => self.should_quit = true,
      KeyCode::Up | KeyCode::Char('k') => self.move_selection(-1),
      KeyCode::Down | KeyCode::Char('j') => self.move_selection(1),
      KeyCode::Enter => self.view_selected(),
      KeyCode::Char('a') => {
        self.view = ViewState::Add {
          form: EmployeeForm::empty(),
        };
      }
      KeyCode::Char('e') => {
        if let Some(employee) = self.employees.get(self.selected) {
          self.view = ViewState::Edit {
            id: employee.id,
            form: EmployeeForm::prefilled(employee),
          };
        }
      }
      KeyCode::Char('d') => {
        if let Some(employee) = self.employees.get(self.selected) {
          self.pending_delete = Some(employee.id);
        }
      }
      KeyCode::Char('r') => self.load_roster(),
      _ => {}
    }
  }

  fn handle_detail_key(&mut self, key: KeyEvent) {
    match key.code {
      KeyCode::Char('e') => {
        if let ViewState::Detail { employee, .. } = &self.view {
          let id = employee.id;
          let form = EmployeeForm::prefilled(employee);
          self.view = ViewState::Edit { id, form };
        }
      }
      KeyCode::Char('q') | KeyCode::Esc => self.view = ViewState::List,
      _ => {}
    }
  }

  fn move_selection(&mut self, delta: i32) {
    let len = self.employees.len();
    if len > 0 {
      self.selected = (self.selected as i32 + delta).rem_euclid(len as i32) as usize;
    }
  }

  fn load_roster(&mut self) {
    let store = self.store.clone();
    let tx = self.event_tx.clone();
    self.loading = true;

    tokio::spawn(async move {
      match store.list().await {
        Ok(roster) => {
          let _ = tx.send(Event::Store(StoreEvent::RosterLoaded(roster)));
        }
        Err(_) => {
          let _ = tx.send(Event::Error("Failed to load employees".to_string()));
        }
      }
    });
  }

  fn view_selected(&mut self) {
    let Some(employee) = self.employees.get(self.selected) else {
      return;
    };
    let id = employee.id;
    let store = self.store.clone();
    let tx = self.event_tx.clone();
    self.loading = true;

    tokio::spawn(async move {
      match store.get(id).await {
        Ok(employee) => {
          let _ = tx.send(Event::Store(StoreEvent::EmployeeLoaded(Box::new(employee))));
        }
        Err(StoreError::NotFound(_)) => {
          let _ = tx.send(Event::Error("Employee not found".to_string()));
        }
        Err(_) => {
          let _ = tx.send(Event::Error("Failed to load employees".to_string()));
        }
      }
    });
  }

  fn add_employee(&mut self, draft: EmployeeDraft) {
    let store = self.store.clone();
    let tx = self.event_tx.clone();
    self.loading = true;

    tokio::spawn(async move {
      match store.add(draft).await {
        Ok(added) => {
          let _ = tx.send(Event::Store(StoreEvent::Added(Box::new(added))));
        }
        Err(_) => {
          let _ = tx.send(Event::Error("Failed to add employee".to_string()));
        }
      }
    });
  }

  fn update_employee(&mut self, id: u64, patch: EmployeePatch) {
    let store = self.store.clone();
    let tx = self.event_tx.clone();
    self.loading = true;

    tokio::spawn(async move {
      match store.update(id, patch).await {
        Ok(updated) => {
          let _ = tx.send(Event::Store(StoreEvent::Updated(Box::new(updated))));
        }
        Err(StoreError::NotFound(_)) => {
          let _ = tx.send(Event::Error("Employee not found".to_string()));
        }
        Err(_) => {
          let _ = tx.send(Event::Error("Failed to update employee".to_string()));
        }
      }
    });
  }

  fn delete_employee(&mut self, id: u64) {
    let store = self.store.clone();
    let tx = self.event_tx.clone();
    self.loading = true;

    tokio::spawn(async move {
      match store.delete(id).await {
        Ok(deleted) => {
          let _ = tx.send(Event::Store(StoreEvent::Deleted {
            id,
            fallback: deleted.is_fallback(),
          }));
        }
        Err(_) => {
          let _ = tx.send(Event::Error("Failed to delete employee".to_string()));
        }
      }
    });
  }

  fn handle_store_event(&mut self, event: StoreEvent) {
    self.loading = false;
    match event {
      StoreEvent::RosterLoaded(roster) => {
        self.offline = roster.is_fallback();
        self.employees = roster.data;
        self.clamp_selection();
        info!(count = self.employees.len(), offline = self.offline, "roster loaded");
      }
      StoreEvent::EmployeeLoaded(loaded) => {
        self.view = ViewState::Detail {
          fallback: loaded.is_fallback(),
          employee: Box::new(loaded.data),
        };
      }
      StoreEvent::Added(added) => {
        if added.is_fallback() {
          self.notice = Some(format!(
            "Added {} locally; directory API unreachable",
            added.data.full_name
          ));
        }
        self.employees.push(added.data);
        self.selected = self.employees.len() - 1;
        self.view = ViewState::List;
      }
      StoreEvent::Updated(updated) => {
        if updated.is_fallback() {
          self.notice = Some(format!(
            "Updated {} locally; directory API unreachable",
            updated.data.full_name
          ));
        }
        let id = updated.data.id;
        for slot in self.employees.iter_mut() {
          if slot.id == id {
            *slot = updated.data.clone();
          }
        }
        self.view = ViewState::List;
      }
      StoreEvent::Deleted { id, fallback } => {
        if fallback {
          self.notice = Some("Deleted locally; directory API unreachable".to_string());
        }
        self.employees.retain(|e| e.id != id);
        self.clamp_selection();
        self.view = ViewState::List;
      }
    }
  }

  fn clamp_selection(&mut self) {
    if self.selected >= self.employees.len() {
      self.selected = self.employees.len().saturating_sub(1);
    }
  }

  // Accessors for UI rendering
  pub fn current_view(&self) -> &ViewState {
    &self.view
  }

  pub fn employees(&self) -> &[Employee] {
    &self.employees
  }

  pub fn selected(&self) -> usize {
    self.selected
  }

  pub fn loading(&self) -> bool {
    self.loading
  }

  pub fn offline(&self) -> bool {
    self.offline
  }

  pub fn error(&self) -> Option<&str> {
    self.error.as_deref()
  }

  pub fn notice(&self) -> Option<&str> {
    self.notice.as_deref()
  }

  pub fn header_title(&self) -> String {
    self.config.header_title()
  }

  /// Name of the employee an armed delete is pointing at.
  pub fn pending_delete_name(&self) -> Option<&str> {
    let id = self.pending_delete?;
    self
      .employees
      .iter()
      .find(|e| e.id == id)
      .map(|e| e.full_name.as_str())
  }
}
