use chrono::{Duration, NaiveDate};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::warn;

use crate::db::Result;
use crate::model::Task;
use crate::parser::format_heading;
use crate::tui::constants::*;
use crate::tui::form::{ConfirmChoice, ConfirmOutcome, DateForm, FormOutcome, TaskForm};

use super::{App, Mode};

/// Everything the browsing view can be asked to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Command {
    Quit,
    Add,
    Edit,
    ToggleDone,
    Delete,
    Carry,
    Import,
    ViewDate,
    PrevDay,
    NextDay,
    Today,
    Refresh,
    ToggleHelp,
    SelectNext,
    SelectPrev,
    SelectFirst,
    SelectLast,
}

impl Command {
    pub(crate) fn from_key(key: &KeyEvent) -> Option<Self> {
        if is_interrupt(key) {
            return Some(Self::Quit);
        }

        match key.code {
            KeyCode::Char('q') => Some(Self::Quit),
            KeyCode::Char('a') => Some(Self::Add),
            KeyCode::Char('e') | KeyCode::Enter => Some(Self::Edit),
            KeyCode::Char(' ') | KeyCode::Char('d') => Some(Self::ToggleDone),
            KeyCode::Char('x') | KeyCode::Delete => Some(Self::Delete),
            KeyCode::Char('c') => Some(Self::Carry),
            KeyCode::Char('i') => Some(Self::Import),
            KeyCode::Char('g') => Some(Self::ViewDate),
            KeyCode::Char('[') | KeyCode::Left => Some(Self::PrevDay),
            KeyCode::Char(']') | KeyCode::Right => Some(Self::NextDay),
            KeyCode::Char('t') => Some(Self::Today),
            KeyCode::Char('r') => Some(Self::Refresh),
            KeyCode::Char('h') | KeyCode::Char('?') => Some(Self::ToggleHelp),
            KeyCode::Char('j') | KeyCode::Down => Some(Self::SelectNext),
            KeyCode::Char('k') | KeyCode::Up => Some(Self::SelectPrev),
            KeyCode::Home => Some(Self::SelectFirst),
            KeyCode::End => Some(Self::SelectLast),
            _ => None,
        }
    }
}

fn is_interrupt(key: &KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('c')) && key.modifiers.contains(KeyModifiers::CONTROL)
}

impl App {
    /// Feed one key press to the state machine. Store failures never escape:
    /// they end the current mode and surface in the status line.
    pub(crate) fn on_key(&mut self, key: KeyEvent) {
        if is_interrupt(&key) {
            self.should_quit = true;
            return;
        }

        let mode = std::mem::replace(&mut self.mode, Mode::Browsing);
        let result = match mode {
            Mode::Browsing => self.handle_browsing(key),
            Mode::AddForm(form) => self.handle_add_form(form, key),
            Mode::EditForm { id, form } => self.handle_edit_form(id, form, key),
            Mode::ConfirmDelete { task, choice } => self.handle_confirm_delete(task, choice, key),
            Mode::ConfirmCarry {
                candidates,
                target,
                choice,
            } => self.handle_confirm_carry(candidates, target, choice, key),
            Mode::ViewDateForm(form) => self.handle_view_date(form, key),
        };

        if let Err(err) = result {
            warn!(error = %err, "command failed");
            self.mode = Mode::Browsing;
            self.set_status_error(err.to_string());
            if let Err(err) = self.refresh() {
                warn!(error = %err, "re-reading the day failed");
            }
        }
    }

    fn handle_browsing(&mut self, key: KeyEvent) -> Result<()> {
        let command = Command::from_key(&key);
        if self.show_help && command != Some(Command::Quit) {
            if matches!(
                key.code,
                KeyCode::Esc | KeyCode::Enter | KeyCode::Char('h') | KeyCode::Char('?')
            ) {
                self.show_help = false;
            }
            return Ok(());
        }

        match command {
            Some(command) => self.dispatch(command),
            None => Ok(()),
        }
    }

    pub(crate) fn dispatch(&mut self, command: Command) -> Result<()> {
        match command {
            Command::Quit => self.should_quit = true,
            Command::Add => {
                self.mode = Mode::AddForm(TaskForm::new());
                self.set_status_info(STATUS_ENTER_ADD);
            }
            Command::Edit => match self.selected_task().cloned() {
                Some(task) => {
                    self.mode = Mode::EditForm {
                        id: task.id,
                        form: TaskForm::from_task(&task),
                    };
                    self.set_status_info(STATUS_ENTER_EDIT);
                }
                None => self.set_status_info(STATUS_NOTHING_SELECTED),
            },
            Command::ToggleDone => self.toggle_done()?,
            Command::Delete => match self.selected_task().cloned() {
                Some(task) => {
                    self.mode = Mode::ConfirmDelete {
                        task,
                        choice: ConfirmChoice::No,
                    };
                    self.set_status_info(STATUS_CONFIRM_DELETE);
                }
                None => self.set_status_info(STATUS_NOTHING_SELECTED),
            },
            Command::Carry => self.prompt_carry()?,
            Command::Import => self.import_open_tasks()?,
            Command::ViewDate => {
                self.mode = Mode::ViewDateForm(DateForm::new());
                self.set_status_info(STATUS_ENTER_DATE);
            }
            Command::PrevDay => self.step_day(-1)?,
            Command::NextDay => self.step_day(1)?,
            Command::Today => self.switch_date(self.today)?,
            Command::Refresh => {
                self.refresh()?;
                self.set_status_info(STATUS_REFRESHED);
            }
            Command::ToggleHelp => self.show_help = !self.show_help,
            Command::SelectNext => self.select_next(),
            Command::SelectPrev => self.select_prev(),
            Command::SelectFirst => self.select_first(),
            Command::SelectLast => self.select_last(),
        }
        Ok(())
    }

    fn toggle_done(&mut self) -> Result<()> {
        let Some(task) = self.selected_task().cloned() else {
            self.set_status_info(STATUS_NOTHING_SELECTED);
            return Ok(());
        };

        if task.is_completed {
            self.database.mark_incomplete(task.id)?;
            self.set_status_info(format!("Marked '{}' as not done", task.description));
        } else {
            self.database.mark_complete(task.id)?;
            self.set_status_info(format!("Marked '{}' as done", task.description));
        }
        self.refresh()
    }

    fn prompt_carry(&mut self) -> Result<()> {
        let Some(target) = self.date.succ_opt() else {
            self.set_status_error("There is no day after this one");
            return Ok(());
        };

        let candidates = self
            .database
            .carry_over_candidates(self.date, target, &self.context)?;
        if candidates.is_empty() {
            if self.tasks.iter().any(|task| !task.is_completed) {
                self.set_status_info(format!(
                    "All incomplete tasks already carried over to {}",
                    format_heading(target)
                ));
            } else {
                self.set_status_info(STATUS_NOTHING_TO_CARRY);
            }
            return Ok(());
        }

        self.mode = Mode::ConfirmCarry {
            candidates,
            target,
            choice: ConfirmChoice::Yes,
        };
        self.set_status_info(STATUS_CONFIRM_CARRY);
        Ok(())
    }

    fn import_open_tasks(&mut self) -> Result<()> {
        if !self.tasks.is_empty() {
            self.set_status_info(STATUS_IMPORT_NEEDS_EMPTY_DAY);
            return Ok(());
        }
        let Some(from) = self.latest_open_day else {
            self.set_status_info(STATUS_NOTHING_TO_IMPORT);
            return Ok(());
        };

        let copied = self
            .database
            .copy_incomplete_tasks(from, self.date, &self.context)?;
        self.refresh()?;
        self.set_status_info(format!(
            "Imported {} task(s) from {}",
            copied,
            format_heading(from)
        ));
        Ok(())
    }

    fn step_day(&mut self, days: i64) -> Result<()> {
        match self.date.checked_add_signed(Duration::days(days)) {
            Some(date) => self.switch_date(date),
            None => {
                self.set_status_error("Date out of range");
                Ok(())
            }
        }
    }

    fn handle_add_form(&mut self, mut form: TaskForm, key: KeyEvent) -> Result<()> {
        match form.handle_key(key) {
            FormOutcome::Pending => self.mode = Mode::AddForm(form),
            FormOutcome::Cancel => self.status = None,
            FormOutcome::Submit(input) => {
                let id = self.database.add_task(self.date, &self.context, &input)?;
                self.refresh()?;
                self.select_task_by_id(id);
                self.set_status_info(format!("Added '{}'", input.description));
            }
        }
        Ok(())
    }

    fn handle_edit_form(&mut self, id: i64, mut form: TaskForm, key: KeyEvent) -> Result<()> {
        match form.handle_key(key) {
            FormOutcome::Pending => self.mode = Mode::EditForm { id, form },
            FormOutcome::Cancel => self.status = None,
            FormOutcome::Submit(input) => {
                self.database.update_task(id, &input)?;
                self.refresh()?;
                self.select_task_by_id(id);
                self.set_status_info(format!("Updated '{}'", input.description));
            }
        }
        Ok(())
    }

    fn handle_confirm_delete(
        &mut self,
        task: Task,
        choice: ConfirmChoice,
        key: KeyEvent,
    ) -> Result<()> {
        match choice.handle_key(key) {
            ConfirmOutcome::Pending(choice) => self.mode = Mode::ConfirmDelete { task, choice },
            ConfirmOutcome::Declined => self.set_status_info("Deletion cancelled"),
            ConfirmOutcome::Confirmed => {
                self.database.delete_task(task.id)?;
                self.refresh()?;
                self.set_status_info(format!("Deleted '{}'", task.description));
            }
        }
        Ok(())
    }

    fn handle_confirm_carry(
        &mut self,
        candidates: Vec<Task>,
        target: NaiveDate,
        choice: ConfirmChoice,
        key: KeyEvent,
    ) -> Result<()> {
        match choice.handle_key(key) {
            ConfirmOutcome::Pending(choice) => {
                self.mode = Mode::ConfirmCarry {
                    candidates,
                    target,
                    choice,
                }
            }
            ConfirmOutcome::Declined => self.set_status_info("Carry over cancelled"),
            ConfirmOutcome::Confirmed => {
                let copied = self
                    .database
                    .carry_over_tasks(&candidates, target, &self.context)?;
                self.refresh()?;
                self.set_status_info(format!(
                    "Carried {} task(s) over to {}",
                    copied,
                    format_heading(target)
                ));
            }
        }
        Ok(())
    }

    fn handle_view_date(&mut self, mut form: DateForm, key: KeyEvent) -> Result<()> {
        match form.handle_key(key, self.today) {
            FormOutcome::Pending => self.mode = Mode::ViewDateForm(form),
            FormOutcome::Cancel => self.status = None,
            FormOutcome::Submit(date) => {
                self.switch_date(date)?;
                self.set_status_info(format!("Viewing {}", format_heading(date)));
            }
        }
        Ok(())
    }
}
