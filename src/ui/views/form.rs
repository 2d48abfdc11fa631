use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::ui::components::{EmployeeForm, FormField};

pub fn draw_employee_form(frame: &mut Frame, area: Rect, form: &EmployeeForm, title: &str) {
  let block = Block::default()
    .title(format!(" {} ", title))
    .title_alignment(Alignment::Center)
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::Blue));

  let inner = block.inner(area);
  frame.render_widget(block, area);

  // One labeled row per field, plus error and hint lines
  let mut constraints: Vec<Constraint> = FormField::ALL.iter().map(|_| Constraint::Length(2)).collect();
  constraints.push(Constraint::Length(1)); // error
  constraints.push(Constraint::Min(1)); // hint
  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints(constraints)
    .split(inner);

  for (i, field) in FormField::ALL.iter().enumerate() {
    draw_field(frame, rows[i], form, *field);
  }

  let error_row = rows[FormField::ALL.len()];
  if let Some(error) = &form.error {
    let paragraph = Paragraph::new(error.clone()).style(Style::default().fg(Color::Red));
    frame.render_widget(paragraph, error_row);
  }

  let hint = Paragraph::new("Tab/Shift-Tab:move  Enter:save  Esc:cancel")
    .style(Style::default().fg(Color::DarkGray));
  frame.render_widget(hint, rows[FormField::ALL.len() + 1]);
}

fn draw_field(frame: &mut Frame, area: Rect, form: &EmployeeForm, field: FormField) {
  let focused = form.focus == field;
  let input = form.input(field);

  let label_style = if focused {
    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
  } else {
    Style::default().fg(Color::DarkGray)
  };
  let marker = if focused { "> " } else { "  " };

  let lines = vec![
    Line::from(Span::styled(format!("{}{}", marker, field.label()), label_style)),
    Line::from(Span::raw(format!("    {}", input.value()))),
  ];
  frame.render_widget(Paragraph::new(lines), area);

  if focused {
    // Terminal cursor inside the focused value
    let x = area.x + 4 + input.cursor() as u16;
    if x < area.right() && area.height > 1 {
      frame.set_cursor_position((x, area.y + 1));
    }
  }
}
