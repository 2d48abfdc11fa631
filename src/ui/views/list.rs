use crate::store::types::Employee;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};

pub fn draw_employee_list(
  frame: &mut Frame,
  area: Rect,
  employees: &[Employee],
  selected: usize,
  title: &str,
  loading: bool,
) {
  let block_title = if loading {
    format!(" {} (loading...) ", title)
  } else {
    format!(" {} ({}) ", title, employees.len())
  };

  let block = Block::default()
    .title(block_title)
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::Blue));

  if employees.is_empty() && !loading {
    let paragraph = Paragraph::new("No employees found. Press 'a' to add one.")
      .block(block)
      .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(paragraph, area);
    return;
  }

  let items: Vec<ListItem> = employees
    .iter()
    .map(|employee| {
      let line = Line::from(vec![
        Span::styled(
          format!("{:>4}", employee.id),
          Style::default().fg(Color::Cyan),
        ),
        Span::raw("  "),
        Span::styled(
          format!("{:<24}", truncate(&employee.full_name, 24)),
          Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::raw(format!("{:<20}", truncate(&employee.job_title, 20))),
        Span::raw("  "),
        Span::styled(
          truncate(&employee.department, 18),
          Style::default().fg(Color::Green),
        ),
      ]);
      ListItem::new(line)
    })
    .collect();

  let list = List::new(items)
    .block(block)
    .highlight_style(
      Style::default()
        .bg(Color::DarkGray)
        .add_modifier(Modifier::BOLD),
    )
    .highlight_symbol("> ");

  let mut state = ListState::default();
  state.select(Some(selected));

  frame.render_stateful_widget(list, area, &mut state);
}

fn truncate(s: &str, max_len: usize) -> String {
  if s.chars().count() <= max_len {
    s.to_string()
  } else {
    let cut: String = s.chars().take(max_len.saturating_sub(3)).collect();
    format!("{}...", cut)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_truncate_short_string_unchanged() {
    assert_eq!(truncate("Ada", 10), "Ada");
  }

  #[test]
  fn test_truncate_long_string_adds_ellipsis() {
    assert_eq!(truncate("Margaret Hamilton", 10), "Margare...");
  }

  #[test]
  fn test_truncate_counts_chars_not_bytes() {
    // Multibyte names must not panic on a byte boundary
    assert_eq!(truncate("Zoë Müller-Lengyel", 8), "Zoë M...");
  }
}
