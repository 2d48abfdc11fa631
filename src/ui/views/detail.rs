use crate::store::types::Employee;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};

pub fn draw_employee_detail(frame: &mut Frame, area: Rect, employee: &Employee, fallback: bool) {
  let title = if fallback {
    format!(" {} (offline copy) ", employee.full_name)
  } else {
    format!(" {} ", employee.full_name)
  };

  let block = Block::default()
    .title(title)
    .title_alignment(Alignment::Center)
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::Blue));

  let inner = block.inner(area);
  frame.render_widget(block, area);

  let label = Style::default().fg(Color::DarkGray);

  let picture_line = match employee
    .profile_picture
    .as_deref()
    .filter(|p| !p.is_empty())
  {
    Some(p) if p.starts_with("data:") => Span::raw("inline image (base64)"),
    Some(p) => Span::styled(p.to_string(), Style::default().fg(Color::Cyan)),
    None => Span::styled(
      format!("none (initials: {})", initials(&employee.full_name)),
      Style::default().fg(Color::DarkGray),
    ),
  };

  let lines = vec![
    Line::from(vec![
      Span::styled("Name:            ", label),
      Span::styled(
        employee.full_name.clone(),
        Style::default().add_modifier(Modifier::BOLD),
      ),
    ]),
    Line::from(vec![
      Span::styled("Job Title:       ", label),
      Span::raw(employee.job_title.clone()),
    ]),
    Line::from(vec![
      Span::styled("Department:      ", label),
      Span::styled(employee.department.clone(), Style::default().fg(Color::Green)),
    ]),
    Line::from(vec![
      Span::styled("Date of Joining: ", label),
      Span::raw(employee.date_of_joining.format("%Y-%m-%d").to_string()),
    ]),
    Line::from(vec![Span::styled("Profile Picture: ", label), picture_line]),
    Line::raw(""),
    Line::from(Span::styled(
      "e:edit  q:back",
      Style::default().fg(Color::DarkGray),
    )),
  ];

  frame.render_widget(Paragraph::new(lines), inner);
}

/// Initials shown in place of a missing profile picture.
pub fn initials(full_name: &str) -> String {
  full_name
    .split_whitespace()
    .filter_map(|word| word.chars().next())
    .collect::<String>()
    .to_uppercase()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_initials_from_full_name() {
    assert_eq!(initials("Ada Lovelace"), "AL");
    assert_eq!(initials("Margaret Heafield Hamilton"), "MHH");
  }

  #[test]
  fn test_initials_single_name() {
    assert_eq!(initials("Cher"), "C");
  }

  #[test]
  fn test_initials_empty_name() {
    assert_eq!(initials(""), "");
  }
}
