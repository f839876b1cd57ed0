//! Main application logic for the terminal user interface.
//!
//! This module contains the `App` struct which wraps the `Tracker`, turns key
//! presses into tracker actions, and renders the filter controls, the three
//! bucket columns, the task form and the dialogs.

use std::io;
use std::time::Duration;

use chrono::NaiveDate;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use ratatui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame, Terminal,
};

use crate::dates::today;
use crate::fields::Bucket;
use crate::store::Storage;
use crate::tracker::{Action, Tracker};
use crate::tui::{
    colors::{bucket_color, DARK_RED},
    enums::AppState,
    filter_controls::FilterControls,
    task_form::{FormEvent, TaskForm, DUE_FIELD, PRIORITY_FIELD, TITLE_FIELD},
    task_list::TaskList,
    utils::centered_rect,
};

/// Main application state for the terminal user interface.
pub struct App<S: Storage> {
    state: AppState,
    tracker: Tracker<S>,
    lists: [TaskList; 3],
    focus: usize,
    task_form: TaskForm,
    filters: FilterControls,
    status_message: String,
    pending_delete: Option<u64>,
    today: NaiveDate,
}

impl<S: Storage> App<S> {
    pub fn new(tracker: Tracker<S>) -> Self {
        Self::with_today(tracker, today())
    }

    /// Create an app that classifies tasks against a fixed date.
    pub fn with_today(tracker: Tracker<S>, today: NaiveDate) -> Self {
        let mut app = App {
            state: AppState::Board,
            tracker,
            lists: Bucket::ALL.map(TaskList::new),
            focus: 0,
            task_form: TaskForm::new(),
            filters: FilterControls::new(),
            status_message: String::new(),
            pending_delete: None,
            today,
        };
        app.sync_lists();
        app
    }

    pub fn tracker(&self) -> &Tracker<S> {
        &self.tracker
    }

    pub fn state(&self) -> AppState {
        self.state
    }

    pub fn focused_bucket(&self) -> Bucket {
        self.lists[self.focus].bucket
    }

    pub fn status_message(&self) -> &str {
        &self.status_message
    }

    fn set_status_message(&mut self, msg: impl Into<String>) {
        self.status_message = msg.into();
    }

    /// Keep every column's selection inside its current bucket.
    fn sync_lists(&mut self) {
        let board = self.tracker.board(self.today);
        for list in self.lists.iter_mut() {
            list.clamp(board.bucket(list.bucket).len());
        }
    }

    /// Move focus and selection to wherever the task now lives.
    fn follow_task(&mut self, id: u64) {
        let board = self.tracker.board(self.today);
        if let Some(bucket) = board.locate(id) {
            if let Some(idx) = self.lists.iter().position(|l| l.bucket == bucket) {
                self.lists[idx].select_id(board.bucket(bucket), id);
                self.focus = idx;
            }
        }
    }

    /// Apply an action to the tracker, reporting failures in the status bar.
    fn dispatch(&mut self, action: Action) -> bool {
        let result = self.tracker.apply(action);
        self.sync_lists();
        match result {
            Ok(()) => true,
            Err(e) => {
                self.set_status_message(format!("Error: {e}"));
                false
            }
        }
    }

    /// Handle one key press. Returns true if the application should quit.
    pub fn handle_key(&mut self, key: KeyCode, modifiers: KeyModifiers) -> bool {
        if modifiers.contains(KeyModifiers::CONTROL) && matches!(key, KeyCode::Char('c') | KeyCode::Char('q')) {
            return true;
        }
        match self.state {
            AppState::Board => return self.handle_board_input(key),
            AppState::AddTask | AppState::EditTask => self.handle_form_input(key),
            AppState::Confirm => self.handle_confirm_input(key),
            AppState::Help => self.handle_help_input(key),
        }
        false
    }

    fn handle_board_input(&mut self, key: KeyCode) -> bool {
        if self.filters.is_searching() {
            if let Some(action) = self.filters.handle_search_key(key) {
                self.dispatch(action);
            }
            return false;
        }

        match key {
            KeyCode::Char('q') => return true,
            KeyCode::Esc => {
                if self.filters.search.value.is_empty() {
                    return true;
                }
                self.filters.search.clear();
                self.dispatch(Action::SetSearch(String::new()));
                self.set_status_message("Search cleared");
            }
            KeyCode::Tab | KeyCode::Right => self.focus = (self.focus + 1) % self.lists.len(),
            KeyCode::BackTab | KeyCode::Left => {
                self.focus = (self.focus + self.lists.len() - 1) % self.lists.len()
            }
            KeyCode::Char('/') => self.filters.focus_search(),
            KeyCode::Char('p') => {
                let action = self.filters.cycle_priority(true);
                self.dispatch(action);
            }
            KeyCode::Char('P') => {
                let action = self.filters.cycle_priority(false);
                self.dispatch(action);
            }
            KeyCode::Char('a') => {
                self.tracker.cancel_edit();
                self.task_form = TaskForm::new();
                self.state = AppState::AddTask;
            }
            KeyCode::Char('h') | KeyCode::Char('?') => self.state = AppState::Help,
            _ => {
                let action = {
                    let board = self.tracker.board(self.today);
                    let list = &mut self.lists[self.focus];
                    let bucket = list.bucket;
                    list.handle_key(key, board.bucket(bucket))
                };
                if let Some(action) = action {
                    self.handle_list_action(action);
                }
            }
        }
        false
    }

    fn handle_list_action(&mut self, action: Action) {
        match action {
            Action::BeginEdit(id) => {
                if !self.dispatch(Action::BeginEdit(id)) {
                    return;
                }
                if let Some(task) = self.tracker.editing() {
                    self.task_form = TaskForm::from_task(task);
                    self.state = AppState::EditTask;
                }
            }
            Action::Delete(id) => {
                self.pending_delete = Some(id);
                self.state = AppState::Confirm;
            }
            Action::ToggleComplete(id) => {
                if self.dispatch(Action::ToggleComplete(id)) {
                    let done = self.tracker.get(id).is_some_and(|t| t.completed);
                    self.set_status_message(if done { "Task completed" } else { "Task reopened" });
                }
            }
            other => {
                self.dispatch(other);
            }
        }
    }

    fn handle_form_input(&mut self, key: KeyCode) {
        match key {
            KeyCode::Esc => {
                self.tracker.cancel_edit();
                self.state = AppState::Board;
            }
            KeyCode::Tab | KeyCode::Down => self.task_form.next_field(),
            KeyCode::BackTab | KeyCode::Up => self.task_form.prev_field(),
            KeyCode::Left => self.task_form.handle_left_right(false),
            KeyCode::Right => self.task_form.handle_left_right(true),
            KeyCode::Backspace => self.task_form.handle_backspace(),
            KeyCode::Delete => self.task_form.handle_delete(),
            KeyCode::Enter => self.submit_form(),
            KeyCode::Char(c) => self.task_form.handle_char(c),
            _ => {}
        }
    }

    /// Turn the form event into tracker transitions.
    fn submit_form(&mut self) {
        let event = match self.task_form.submit(self.today) {
            Ok(event) => event,
            Err(msg) => {
                self.set_status_message(msg);
                return;
            }
        };

        let result = match event {
            FormEvent::Create(draft) => {
                self.tracker.cancel_edit();
                self.tracker.submit(draft)
            }
            FormEvent::Update { id, draft } => {
                if self.tracker.editing_id() != Some(id) {
                    if let Err(e) = self.tracker.begin_edit(id) {
                        self.set_status_message(format!("Error: {e}"));
                        return;
                    }
                }
                self.tracker.submit(draft)
            }
        };
        self.sync_lists();

        match result {
            Ok(id) => {
                let msg = if self.state == AppState::EditTask { "Task updated" } else { "Task created" };
                self.state = AppState::Board;
                self.follow_task(id);
                let hidden = self.tracker.board(self.today).locate(id).is_none();
                self.set_status_message(if hidden {
                    format!("{msg} (not shown: due today, undated or filtered out)")
                } else {
                    msg.to_string()
                });
            }
            Err(e) => self.set_status_message(format!("Error: {e}")),
        }
    }

    fn handle_confirm_input(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                if let Some(id) = self.pending_delete.take() {
                    if self.dispatch(Action::Delete(id)) {
                        self.set_status_message("Task deleted");
                    }
                }
                self.state = AppState::Board;
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                self.pending_delete = None;
                self.state = AppState::Board;
            }
            _ => {}
        }
    }

    fn handle_help_input(&mut self, key: KeyCode) {
        if matches!(key, KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('h') | KeyCode::Char('?')) {
            self.state = AppState::Board;
        }
    }

    /// Poll for and handle keyboard events.
    ///
    /// Returns true if the application should quit.
    fn handle_input(&mut self) -> io::Result<bool> {
        if event::poll(Duration::from_millis(250))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    return Ok(false);
                }
                self.status_message.clear();
                return Ok(self.handle_key(key.code, key.modifiers));
            }
        }
        Ok(false)
    }

    fn render_header(&self, f: &mut Frame, area: Rect) {
        let visible = self.tracker.visible().len();
        let total = self.tracker.tasks().len();
        let header = Paragraph::new(Line::from(vec![
            Span::styled("TASK TRACKER", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw("  "),
            Span::styled(
                format!("{visible}/{total} tasks match  |  {}", self.today.format("%a %d %b %Y")),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::ITALIC),
            ),
        ]))
        .block(Block::default().borders(Borders::ALL))
        .alignment(Alignment::Center);
        f.render_widget(header, area);
    }

    fn render_board(&mut self, f: &mut Frame, area: Rect) {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Ratio(1, 3),
                Constraint::Ratio(1, 3),
                Constraint::Ratio(1, 3),
            ])
            .split(area);

        let board = self.tracker.board(self.today);
        for (i, list) in self.lists.iter_mut().enumerate() {
            let tasks = board.bucket(list.bucket);
            list.render(f, columns[i], tasks, i == self.focus, self.today);
        }
    }

    fn render_task_form(&mut self, f: &mut Frame, area: Rect, is_edit: bool) {
        let area = centered_rect(60, 60, area);
        f.render_widget(Clear, area);

        let block = Block::default()
            .borders(Borders::ALL)
            .title(if is_edit { "Edit Task" } else { "Add Task" })
            .style(Style::default().fg(Color::White));
        let inner = block.inner(area);
        f.render_widget(block, area);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Title
                Constraint::Length(3), // Priority
                Constraint::Length(3), // Due
                Constraint::Min(0),    // Hints
            ])
            .split(inner);

        let field_style = |idx: usize| {
            if self.task_form.current_field == idx {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default().fg(Color::Gray)
            }
        };

        let title = Paragraph::new(self.task_form.title.value.as_str())
            .block(Block::default().borders(Borders::ALL).title("Title").border_style(field_style(TITLE_FIELD)));
        f.render_widget(title, rows[0]);

        let priority = self
            .task_form
            .selected_priority()
            .map(|p| p.label())
            .unwrap_or("None");
        let priority = Paragraph::new(format!("< {priority} >"))
            .block(Block::default().borders(Borders::ALL).title("Priority").border_style(field_style(PRIORITY_FIELD)));
        f.render_widget(priority, rows[1]);

        let due = Paragraph::new(self.task_form.due.value.as_str())
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("Due (YYYY-MM-DD, today, tomorrow, fri, in 3d)")
                    .border_style(field_style(DUE_FIELD)),
            );
        f.render_widget(due, rows[2]);

        let hints = Paragraph::new(vec![
            Line::from(""),
            Line::from("Tab/Up/Down: move field   Left/Right: cursor or priority"),
            Line::from("Enter: save   Esc: cancel"),
        ])
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
        f.render_widget(hints, rows[3]);

        let cursor = match self.task_form.current_field {
            TITLE_FIELD => Some((rows[0], self.task_form.title.cursor)),
            DUE_FIELD => Some((rows[2], self.task_form.due.cursor)),
            _ => None,
        };
        if let Some((row, offset)) = cursor {
            let x = (row.x + 1 + offset as u16).min(row.right().saturating_sub(2));
            f.set_cursor_position((x, row.y + 1));
        }
    }

    fn render_help(&self, f: &mut Frame, area: Rect) {
        let area = centered_rect(60, 70, area);
        f.render_widget(Clear, area);

        let key = |k: &'static str, desc: &'static str| {
            Line::from(vec![
                Span::styled(format!("{k:<14}"), Style::default().fg(Color::Yellow)),
                Span::raw(desc),
            ])
        };
        let text = vec![
            Line::from(Span::styled("Board", Style::default().add_modifier(Modifier::BOLD))),
            key("a", "Add a task"),
            key("e / Enter", "Edit selected task"),
            key("space / x", "Toggle completed"),
            key("d / Del", "Delete selected task"),
            key("Tab / Left", "Switch column"),
            key("Up / Down", "Select task"),
            key("/", "Search titles"),
            key("p / P", "Cycle priority filter"),
            key("q / Esc", "Quit (Esc clears search first)"),
            Line::from(""),
            Line::from(Span::styled("Columns", Style::default().add_modifier(Modifier::BOLD))),
            Line::from("Tasks due today or without a due date only show once completed."),
        ];
        let help = Paragraph::new(text)
            .block(Block::default().borders(Borders::ALL).title("Help"))
            .wrap(Wrap { trim: true });
        f.render_widget(help, area);
    }

    /// Render a confirmation dialog for deleting a task.
    fn render_confirm(&self, f: &mut Frame, area: Rect) {
        let block = Block::default()
            .title("Confirm Action")
            .borders(Borders::ALL)
            .style(Style::default().bg(DARK_RED));

        let area = centered_rect(50, 25, area);
        f.render_widget(Clear, area);

        let title = self
            .pending_delete
            .and_then(|id| self.tracker.get(id))
            .map(|t| t.title.as_str())
            .unwrap_or("");
        let text = vec![
            Line::from(""),
            Line::from(Span::styled(
                "Delete this task?",
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(title.to_string()),
            Line::from(""),
            Line::from("Press 'y' to confirm, 'n' to cancel"),
        ];

        let paragraph = Paragraph::new(text)
            .block(block)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        f.render_widget(paragraph, area);
    }

    /// Render the status bar at the bottom of the screen.
    fn render_status_bar(&self, f: &mut Frame, area: Rect) {
        let status_text = if !self.status_message.is_empty() {
            self.status_message.clone()
        } else if self.filters.is_searching() {
            "Search: type to filter (Enter to keep, Esc to clear)".to_string()
        } else {
            match self.state {
                AppState::Board => "Press 'h' for help".to_string(),
                AppState::AddTask => "Add New Task".to_string(),
                AppState::EditTask => "Edit Task".to_string(),
                AppState::Help => "Help".to_string(),
                AppState::Confirm => "Confirm Action".to_string(),
            }
        };

        let status = Paragraph::new(status_text)
            .style(Style::default().bg(bucket_color(self.focused_bucket())).fg(Color::White))
            .alignment(Alignment::Left);
        f.render_widget(status, area);
    }

    /// Main render function that dispatches to the appropriate views.
    pub fn render(&mut self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Length(3), // Filter controls
                Constraint::Min(0),    // Board
                Constraint::Length(1), // Status bar
            ])
            .split(f.area());

        self.render_header(f, chunks[0]);
        self.filters.render(f, chunks[1]);
        self.render_board(f, chunks[2]);

        match self.state {
            AppState::Board => {}
            AppState::AddTask => self.render_task_form(f, chunks[2], false),
            AppState::EditTask => self.render_task_form(f, chunks[2], true),
            AppState::Help => self.render_help(f, chunks[2]),
            AppState::Confirm => self.render_confirm(f, chunks[2]),
        }

        self.render_status_bar(f, chunks[3]);
    }

    /// Main event loop for the TUI application.
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            let now = today();
            if now != self.today {
                self.today = now;
                self.sync_lists();
            }

            terminal.draw(|f| self.render(f))?;

            if self.handle_input()? {
                break;
            }
        }
        Ok(())
    }
}
