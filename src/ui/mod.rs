pub mod components;
mod views;

use crate::app::{App, ViewState};
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

/// Main draw function
pub fn draw(frame: &mut Frame, app: &App) {
  let chunks = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Min(1),    // Main content
      Constraint::Length(1), // Status bar
    ])
    .split(frame.area());

  match app.current_view() {
    ViewState::List => {
      let title = format!("Employees · {}", app.header_title());
      views::list::draw_employee_list(
        frame,
        chunks[0],
        app.employees(),
        app.selected(),
        &title,
        app.loading(),
      );
    }
    ViewState::Detail { employee, fallback } => {
      views::detail::draw_employee_detail(frame, chunks[0], employee, *fallback);
    }
    ViewState::Add { form } => {
      views::form::draw_employee_form(frame, chunks[0], form, "Add New Employee");
    }
    ViewState::Edit { form, .. } => {
      views::form::draw_employee_form(frame, chunks[0], form, "Edit Employee");
    }
  }

  draw_status_bar(frame, chunks[1], app);
}

fn draw_status_bar(frame: &mut Frame, area: Rect, app: &App) {
  let (content, style) = if let Some(error) = app.error() {
    (format!(" {}", error), Style::default().fg(Color::Red))
  } else if let Some(name) = app.pending_delete_name() {
    (
      format!(" Delete {}? y/N", name),
      Style::default().fg(Color::Yellow),
    )
  } else if let Some(notice) = app.notice() {
    (format!(" {}", notice), Style::default().fg(Color::Yellow))
  } else {
    let hints = match app.current_view() {
      ViewState::List => " a:add  Enter:view  e:edit  d:delete  r:reload  j/k:nav  q:quit",
      ViewState::Detail { .. } => " e:edit  q:back",
      ViewState::Add { .. } | ViewState::Edit { .. } => {
        " Tab/Shift-Tab:move  Enter:save  Esc:cancel"
      }
    };
    (hints.to_string(), Style::default().fg(Color::DarkGray))
  };

  let mut spans = vec![Span::styled(content, style)];
  if app.offline() {
    spans.push(Span::styled(
      "  [offline roster]",
      Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
    ));
  }

  frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
