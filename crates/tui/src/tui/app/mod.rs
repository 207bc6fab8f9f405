use std::time::Instant;

use chrono::{Local, NaiveDate};
use ratatui::style::{Color, Style};
use ratatui::widgets::TableState;
use tracing::debug;

use super::constants::*;
use super::form::{ConfirmChoice, DateForm, TaskForm};
use crate::config::AppConfig;
use crate::db::{Database, Result};
use crate::model::{DaySummary, Task};
use crate::parser::format_heading;

mod input;
mod render;
#[cfg(test)]
mod tests;

/// What the controller is doing right now. Each variant owns the data its
/// overlay needs, so leaving a mode drops its state.
#[derive(Debug, Clone)]
pub(crate) enum Mode {
    Browsing,
    AddForm(TaskForm),
    EditForm {
        id: i64,
        form: TaskForm,
    },
    ConfirmDelete {
        task: Task,
        choice: ConfirmChoice,
    },
    ConfirmCarry {
        candidates: Vec<Task>,
        target: NaiveDate,
        choice: ConfirmChoice,
    },
    ViewDateForm(DateForm),
}

#[derive(Debug, Clone)]
struct StatusMessage {
    text: String,
    kind: StatusKind,
    created_at: Instant,
}

impl StatusMessage {
    fn new<T: Into<String>>(text: T, kind: StatusKind) -> Self {
        Self {
            text: text.into(),
            kind,
            created_at: Instant::now(),
        }
    }

    fn prefix(&self) -> &'static str {
        match self.kind {
            StatusKind::Info => "ℹ️  ",
            StatusKind::Error => "⚠️  ",
        }
    }

    fn style(&self) -> Style {
        match self.kind {
            StatusKind::Info => Style::default().fg(Color::Cyan),
            StatusKind::Error => Style::default().fg(Color::Red),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StatusKind {
    Info,
    Error,
}

pub(crate) struct App {
    config: AppConfig,
    database: Database,
    today: NaiveDate,
    date: NaiveDate,
    context: String,
    tasks: Vec<Task>,
    latest_open_day: Option<NaiveDate>,
    selected: usize,
    table_state: TableState,
    mode: Mode,
    status: Option<StatusMessage>,
    show_help: bool,
    should_quit: bool,
}

impl App {
    pub(crate) fn new(
        config: AppConfig,
        database: Database,
        date: NaiveDate,
        context: String,
    ) -> Result<Self> {
        let mut app = Self {
            config,
            database,
            today: Local::now().date_naive(),
            date,
            context,
            tasks: Vec::new(),
            latest_open_day: None,
            selected: 0,
            table_state: TableState::default(),
            mode: Mode::Browsing,
            status: None,
            show_help: false,
            should_quit: false,
        };
        app.refresh()?;
        Ok(app)
    }

    pub(crate) fn into_database(self) -> Database {
        self.database
    }

    /// Re-read the current day. On failure the previous list is kept.
    pub(crate) fn refresh(&mut self) -> Result<()> {
        let tasks = self.database.tasks_for_date(self.date, &self.context)?;
        let latest_open_day = if tasks.is_empty() {
            self.database
                .latest_date_with_incomplete(self.date, &self.context)?
        } else {
            None
        };
        self.tasks = tasks;
        self.latest_open_day = latest_open_day;
        self.clamp_selection();
        Ok(())
    }

    fn clamp_selection(&mut self) {
        if self.tasks.is_empty() {
            self.selected = 0;
            self.table_state.select(None);
        } else {
            if self.selected >= self.tasks.len() {
                self.selected = self.tasks.len() - 1;
            }
            self.table_state.select(Some(self.selected));
        }
    }

    /// Move to another day, restoring the previous one if it cannot be read.
    fn switch_date(&mut self, date: NaiveDate) -> Result<()> {
        let previous = self.date;
        self.date = date;
        if let Err(err) = self.refresh() {
            self.date = previous;
            return Err(err);
        }
        self.selected = 0;
        self.clamp_selection();
        debug!(%date, context = %self.context, "switched day");
        Ok(())
    }

    pub(crate) fn on_tick(&mut self) {
        if let Some(status) = &self.status {
            if status.created_at.elapsed() > STATUS_TTL {
                self.status = None;
            }
        }
    }

    pub(crate) fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub(crate) fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub(crate) fn date(&self) -> NaiveDate {
        self.date
    }

    pub(crate) fn context(&self) -> &str {
        &self.context
    }

    pub(crate) fn selected(&self) -> Option<usize> {
        if self.tasks.is_empty() {
            None
        } else {
            Some(self.selected)
        }
    }

    pub(crate) fn mode(&self) -> &Mode {
        &self.mode
    }

    pub(crate) fn summary(&self) -> DaySummary {
        DaySummary::from_tasks(&self.tasks)
    }

    pub(crate) fn status_text(&self) -> Option<&str> {
        self.status.as_ref().map(|status| status.text.as_str())
    }

    /// Shown on an empty day when an earlier day still has open work.
    pub(crate) fn hint(&self) -> Option<String> {
        if !self.tasks.is_empty() {
            return None;
        }
        self.latest_open_day.map(|day| {
            format!(
                "Open tasks remain on {}. Press 'i' to import them.",
                format_heading(day)
            )
        })
    }

    fn selected_task(&self) -> Option<&Task> {
        self.tasks.get(self.selected)
    }

    fn select_next(&mut self) {
        if self.tasks.is_empty() {
            return;
        }
        self.selected = (self.selected + 1).min(self.tasks.len() - 1);
        self.table_state.select(Some(self.selected));
    }

    fn select_prev(&mut self) {
        if self.tasks.is_empty() {
            return;
        }
        self.selected = self.selected.saturating_sub(1);
        self.table_state.select(Some(self.selected));
    }

    fn select_first(&mut self) {
        if !self.tasks.is_empty() {
            self.selected = 0;
            self.table_state.select(Some(0));
        }
    }

    fn select_last(&mut self) {
        if !self.tasks.is_empty() {
            self.selected = self.tasks.len() - 1;
            self.table_state.select(Some(self.selected));
        }
    }

    fn select_task_by_id(&mut self, id: i64) {
        if let Some(idx) = self.tasks.iter().position(|task| task.id == id) {
            self.selected = idx;
            self.table_state.select(Some(idx));
        }
    }

    pub(crate) fn set_status_info<T: Into<String>>(&mut self, message: T) {
        self.status = Some(StatusMessage::new(message, StatusKind::Info));
    }

    pub(crate) fn set_status_error<T: Into<String>>(&mut self, message: T) {
        self.status = Some(StatusMessage::new(message, StatusKind::Error));
    }
}
