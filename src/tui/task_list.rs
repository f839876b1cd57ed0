//! One column of the board: a table of the tasks in a single bucket.

use chrono::NaiveDate;
use crossterm::event::KeyCode;
use ratatui::{
    layout::{Constraint, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Cell, Row, Table, TableState},
    Frame,
};

use crate::dates::format_due_relative;
use crate::fields::{Bucket, Priority};
use crate::task::Task;
use crate::tracker::Action;
use crate::tui::colors::{bucket_color, DARK_RED, GOLD};

/// Selection state for one bucket column. Task data is passed in on every
/// call; the list never keeps its own copy.
pub struct TaskList {
    pub bucket: Bucket,
    pub state: TableState,
}

impl TaskList {
    pub fn new(bucket: Bucket) -> Self {
        Self {
            bucket,
            state: TableState::default(),
        }
    }

    /// Keep the selection inside a list of `len` rows.
    pub fn clamp(&mut self, len: usize) {
        match self.state.selected() {
            _ if len == 0 => self.state.select(None),
            Some(i) if i >= len => self.state.select(Some(len - 1)),
            None => self.state.select(Some(0)),
            _ => {}
        }
    }

    pub fn select_next(&mut self, len: usize) {
        if len == 0 {
            return;
        }
        let next = self.state.selected().map_or(0, |i| (i + 1).min(len - 1));
        self.state.select(Some(next));
    }

    pub fn select_prev(&mut self, len: usize) {
        if len == 0 {
            return;
        }
        let prev = self.state.selected().map_or(0, |i| i.saturating_sub(1));
        self.state.select(Some(prev));
    }

    pub fn selected_id(&self, tasks: &[&Task]) -> Option<u64> {
        self.state.selected().and_then(|i| tasks.get(i)).map(|t| t.id)
    }

    /// Move the selection onto the task with `id`, if it is in `tasks`.
    pub fn select_id(&mut self, tasks: &[&Task], id: u64) -> bool {
        match tasks.iter().position(|t| t.id == id) {
            Some(i) => {
                self.state.select(Some(i));
                true
            }
            None => false,
        }
    }

    /// Map a key to an action on the selected task.
    ///
    /// `Up`/`Down` only move the selection and return `None`.
    pub fn handle_key(&mut self, key: KeyCode, tasks: &[&Task]) -> Option<Action> {
        match key {
            KeyCode::Up | KeyCode::Char('k') => {
                self.select_prev(tasks.len());
                None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.select_next(tasks.len());
                None
            }
            KeyCode::Char('e') | KeyCode::Enter => self.selected_id(tasks).map(Action::BeginEdit),
            KeyCode::Char('d') | KeyCode::Delete => self.selected_id(tasks).map(Action::Delete),
            KeyCode::Char(' ') | KeyCode::Char('x') => {
                self.selected_id(tasks).map(Action::ToggleComplete)
            }
            _ => None,
        }
    }

    pub fn render(&mut self, f: &mut Frame, area: Rect, tasks: &[&Task], focused: bool, today: NaiveDate) {
        let color = bucket_color(self.bucket);
        let header = Row::new(["Title", "Priority", "Due"].map(|h| {
            Cell::from(h).style(Style::default().add_modifier(Modifier::BOLD))
        }))
        .style(Style::default().fg(color))
        .height(1);

        let rows: Vec<Row> = tasks
            .iter()
            .map(|task| {
                let style = if task.completed {
                    Style::default().fg(Color::DarkGray).add_modifier(Modifier::CROSSED_OUT)
                } else {
                    Style::default().fg(Color::White)
                };
                Row::new(vec![
                    Cell::from(task.title.clone()),
                    Cell::from(task.priority.map(|p| p.label()).unwrap_or("-"))
                        .style(Style::default().fg(priority_color(task.priority))),
                    Cell::from(format_due_relative(task.due_date, today)),
                ])
                .style(style)
            })
            .collect();

        let widths = [
            Constraint::Min(12),    // Title
            Constraint::Length(8),  // Priority
            Constraint::Length(10), // Due
        ];

        let border_style = if focused {
            Style::default().fg(color).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };

        let table = Table::new(rows, widths)
            .header(header)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(border_style)
                    .title(format!("{} ({})", self.bucket.title(), tasks.len())),
            )
            .row_highlight_style(if focused {
                Style::default().bg(Color::Gray).fg(Color::Black)
            } else {
                Style::default()
            })
            .highlight_symbol(if focused { ">> " } else { "   " });

        f.render_stateful_widget(table, area, &mut self.state);
    }
}

fn priority_color(priority: Option<Priority>) -> Color {
    match priority {
        Some(Priority::High) => DARK_RED,
        Some(Priority::Medium) => GOLD,
        Some(Priority::Low) => Color::Green,
        None => Color::Gray,
    }
}
