//! Search box and priority selector shown above the board.

use crossterm::event::KeyCode;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::fields::PriorityFilter;
use crate::tracker::Action;
use crate::tui::input::InputField;

/// Filter inputs. Every change is reported straight away as an [`Action`].
#[derive(Default)]
pub struct FilterControls {
    pub search: InputField,
    pub priority: PriorityFilter,
}

impl FilterControls {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn focus_search(&mut self) {
        self.search.active = true;
    }

    pub fn is_searching(&self) -> bool {
        self.search.active
    }

    /// Handle a key while the search box has focus.
    ///
    /// Returns the action to apply, if the key changed the search term.
    /// `Enter` keeps the term and leaves the box, `Esc` clears it and leaves.
    pub fn handle_search_key(&mut self, key: KeyCode) -> Option<Action> {
        match key {
            KeyCode::Enter => {
                self.search.active = false;
                None
            }
            KeyCode::Esc => {
                self.search.active = false;
                if self.search.value.is_empty() {
                    return None;
                }
                self.search.clear();
                Some(self.search_action())
            }
            KeyCode::Backspace => {
                let before = self.search.value.len();
                self.search.handle_backspace();
                (self.search.value.len() != before).then(|| self.search_action())
            }
            KeyCode::Delete => {
                let before = self.search.value.len();
                self.search.handle_delete();
                (self.search.value.len() != before).then(|| self.search_action())
            }
            KeyCode::Left => {
                self.search.move_cursor_left();
                None
            }
            KeyCode::Right => {
                self.search.move_cursor_right();
                None
            }
            KeyCode::Char(c) => {
                self.search.handle_char(c);
                Some(self.search_action())
            }
            _ => None,
        }
    }

    /// Step the priority selector and report the new value.
    pub fn cycle_priority(&mut self, forward: bool) -> Action {
        self.priority = self.priority.cycle(forward);
        Action::SetPriority(self.priority)
    }

    fn search_action(&self) -> Action {
        Action::SetSearch(self.search.value.clone())
    }

    pub fn render(&self, f: &mut Frame, area: Rect) {
        let search_style = if self.search.active {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };
        let search_text = if self.search.value.is_empty() && !self.search.active {
            "(press / to search)".to_string()
        } else {
            self.search.value.clone()
        };

        let line = Line::from(vec![
            Span::styled("Search: ", Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(search_text, search_style),
            Span::raw("    "),
            Span::styled("Priority: ", Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(
                format!("< {} >", self.priority),
                Style::default().fg(Color::Cyan),
            ),
        ]);
        let paragraph = Paragraph::new(line)
            .block(Block::default().borders(Borders::ALL).title("Filter"));
        f.render_widget(paragraph, area);

        if self.search.active {
            let x = area.x + 1 + "Search: ".len() as u16 + self.search.cursor as u16;
            f.set_cursor_position((x.min(area.right().saturating_sub(2)), area.y + 1));
        }
    }
}
