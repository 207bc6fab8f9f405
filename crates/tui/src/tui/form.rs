use chrono::NaiveDate;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::capture::TaskInput;
use crate::model::{Priority, Task};
use crate::parser::parse_day;

use super::buffer::TextBuffer;

/// Result of feeding one key to a form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum FormOutcome<T> {
    Pending,
    Submit(T),
    Cancel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TaskField {
    Description,
    Priority,
    TimeEstimate,
}

impl TaskField {
    fn next(self) -> Self {
        match self {
            TaskField::Description => TaskField::Priority,
            TaskField::Priority => TaskField::TimeEstimate,
            TaskField::TimeEstimate => TaskField::Description,
        }
    }

    fn prev(self) -> Self {
        match self {
            TaskField::Description => TaskField::TimeEstimate,
            TaskField::Priority => TaskField::Description,
            TaskField::TimeEstimate => TaskField::Priority,
        }
    }

    fn from_name(name: &str) -> Self {
        match name {
            "Time estimate" => TaskField::TimeEstimate,
            _ => TaskField::Description,
        }
    }
}

/// Add/edit form. Enter submits once both text fields are filled (or from the
/// last field), otherwise it advances focus. A failed submit keeps the form
/// open with the error inline.
#[derive(Debug, Clone)]
pub(crate) struct TaskForm {
    description: TextBuffer,
    priority: Priority,
    time_estimate: TextBuffer,
    focus: TaskField,
    error: Option<String>,
}

impl TaskForm {
    pub(crate) fn new() -> Self {
        Self {
            description: TextBuffer::new(),
            priority: Priority::default(),
            time_estimate: TextBuffer::new(),
            focus: TaskField::Description,
            error: None,
        }
    }

    pub(crate) fn from_task(task: &Task) -> Self {
        let TaskInput {
            description,
            priority,
            time_estimate,
        } = TaskInput::from(task);
        let mut form = Self::new();
        form.description.set(description);
        form.priority = priority;
        form.time_estimate.set(time_estimate);
        form
    }

    pub(crate) fn description(&self) -> &TextBuffer {
        &self.description
    }

    pub(crate) fn priority(&self) -> Priority {
        self.priority
    }

    pub(crate) fn time_estimate(&self) -> &TextBuffer {
        &self.time_estimate
    }

    pub(crate) fn focus(&self) -> TaskField {
        self.focus
    }

    pub(crate) fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub(crate) fn handle_key(&mut self, key: KeyEvent) -> FormOutcome<TaskInput> {
        match key.code {
            KeyCode::Esc => return FormOutcome::Cancel,
            KeyCode::Enter => {
                if self.focus == TaskField::TimeEstimate || self.is_filled() {
                    return self.submit();
                }
                self.focus = self.focus.next();
            }
            KeyCode::Tab | KeyCode::Down => self.focus = self.focus.next(),
            KeyCode::BackTab | KeyCode::Up => self.focus = self.focus.prev(),
            _ => match self.focus {
                TaskField::Priority => self.handle_priority_key(key),
                TaskField::Description => edit_buffer(&mut self.description, key),
                TaskField::TimeEstimate => edit_buffer(&mut self.time_estimate, key),
            },
        }
        FormOutcome::Pending
    }

    fn is_filled(&self) -> bool {
        !self.description.as_str().trim().is_empty()
            && !self.time_estimate.as_str().trim().is_empty()
    }

    fn handle_priority_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Left => self.priority = self.priority.prev(),
            KeyCode::Right | KeyCode::Char(' ') => self.priority = self.priority.next(),
            KeyCode::Char(ch) => {
                if let Ok(priority) = ch.to_string().parse::<Priority>() {
                    self.priority = priority;
                }
            }
            _ => {}
        }
    }

    fn submit(&mut self) -> FormOutcome<TaskInput> {
        let input = TaskInput::new(
            self.description.as_str(),
            self.priority,
            self.time_estimate.as_str(),
        );
        match input.validate() {
            Ok(input) => FormOutcome::Submit(input),
            Err(err) => {
                self.focus = TaskField::from_name(err.field);
                self.error = Some(err.to_string());
                FormOutcome::Pending
            }
        }
    }
}

/// Single-field "view date" form.
#[derive(Debug, Clone, Default)]
pub(crate) struct DateForm {
    input: TextBuffer,
    error: Option<String>,
}

impl DateForm {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn input(&self) -> &TextBuffer {
        &self.input
    }

    pub(crate) fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub(crate) fn handle_key(&mut self, key: KeyEvent, today: NaiveDate) -> FormOutcome<NaiveDate> {
        match key.code {
            KeyCode::Esc => FormOutcome::Cancel,
            KeyCode::Enter => match parse_day(self.input.as_str(), today) {
                Ok(date) => FormOutcome::Submit(date),
                Err(err) => {
                    self.error = Some(err.to_string());
                    FormOutcome::Pending
                }
            },
            _ => {
                edit_buffer(&mut self.input, key);
                FormOutcome::Pending
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ConfirmChoice {
    Yes,
    No,
}

impl ConfirmChoice {
    fn toggle(self) -> Self {
        match self {
            ConfirmChoice::Yes => ConfirmChoice::No,
            ConfirmChoice::No => ConfirmChoice::Yes,
        }
    }

    /// `y`/`n` answer immediately; arrows and space flip the highlighted
    /// button and Enter accepts it.
    pub(crate) fn handle_key(self, key: KeyEvent) -> ConfirmOutcome {
        match key.code {
            KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => ConfirmOutcome::Declined,
            KeyCode::Char('y') | KeyCode::Char('Y') => ConfirmOutcome::Confirmed,
            KeyCode::Enter => match self {
                ConfirmChoice::Yes => ConfirmOutcome::Confirmed,
                ConfirmChoice::No => ConfirmOutcome::Declined,
            },
            KeyCode::Left | KeyCode::Right | KeyCode::Tab | KeyCode::Char(' ') => {
                ConfirmOutcome::Pending(self.toggle())
            }
            _ => ConfirmOutcome::Pending(self),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ConfirmOutcome {
    Pending(ConfirmChoice),
    Confirmed,
    Declined,
}

fn edit_buffer(buffer: &mut TextBuffer, key: KeyEvent) {
    if key
        .modifiers
        .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
    {
        return;
    }
    match key.code {
        KeyCode::Char(ch) => buffer.insert_char(ch),
        KeyCode::Backspace => buffer.backspace(),
        KeyCode::Delete => buffer.delete_char(),
        KeyCode::Left => buffer.move_left(),
        KeyCode::Right => buffer.move_right(),
        KeyCode::Home => buffer.move_home(),
        KeyCode::End => buffer.move_end(),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_into(form: &mut TaskForm, text: &str) {
        for ch in text.chars() {
            form.handle_key(key(KeyCode::Char(ch)));
        }
    }

    #[test]
    fn enter_walks_fields_then_submits() {
        let mut form = TaskForm::new();
        type_into(&mut form, "Write report");
        assert_eq!(form.handle_key(key(KeyCode::Enter)), FormOutcome::Pending);
        assert_eq!(form.focus(), TaskField::Priority);
        form.handle_key(key(KeyCode::Char('a')));
        form.handle_key(key(KeyCode::Enter));
        type_into(&mut form, "2h");

        let outcome = form.handle_key(key(KeyCode::Enter));

        assert_eq!(
            outcome,
            FormOutcome::Submit(TaskInput::new("Write report", Priority::A, "2h"))
        );
    }

    #[test]
    fn failed_submit_focuses_the_offending_field() {
        let mut form = TaskForm::new();
        form.handle_key(key(KeyCode::Tab));
        form.handle_key(key(KeyCode::Tab));
        type_into(&mut form, "30m");

        assert_eq!(form.handle_key(key(KeyCode::Enter)), FormOutcome::Pending);
        assert_eq!(form.focus(), TaskField::Description);
        assert_eq!(form.error(), Some("Description is required"));
    }

    #[test]
    fn priority_cycles_with_arrows() {
        let mut form = TaskForm::new();
        form.handle_key(key(KeyCode::Tab));
        form.handle_key(key(KeyCode::Right));
        assert_eq!(form.priority(), Priority::C);
        form.handle_key(key(KeyCode::Left));
        form.handle_key(key(KeyCode::Left));
        assert_eq!(form.priority(), Priority::A);
    }

    #[test]
    fn date_form_reports_parse_errors_inline() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 4).unwrap();
        let mut form = DateForm::new();
        for ch in "soon".chars() {
            form.handle_key(key(KeyCode::Char(ch)), today);
        }

        assert_eq!(form.handle_key(key(KeyCode::Enter), today), FormOutcome::Pending);
        assert!(form.error().is_some());

        for _ in 0..4 {
            form.handle_key(key(KeyCode::Backspace), today);
        }
        for ch in "+1d".chars() {
            form.handle_key(key(KeyCode::Char(ch)), today);
        }
        assert_eq!(
            form.handle_key(key(KeyCode::Enter), today),
            FormOutcome::Submit(NaiveDate::from_ymd_opt(2025, 6, 5).unwrap())
        );
    }

    #[test]
    fn date_form_rejects_non_ascii_offsets() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 4).unwrap();
        let mut form = DateForm::new();
        for ch in "+é".chars() {
            form.handle_key(key(KeyCode::Char(ch)), today);
        }

        assert_eq!(form.handle_key(key(KeyCode::Enter), today), FormOutcome::Pending);
        assert_eq!(form.input().as_str(), "+é");
        assert!(form.error().is_some_and(|err| err.contains("+é")));
    }

    #[test]
    fn confirm_choice_answers() {
        assert_eq!(
            ConfirmChoice::No.handle_key(key(KeyCode::Enter)),
            ConfirmOutcome::Declined
        );
        assert_eq!(
            ConfirmChoice::No.handle_key(key(KeyCode::Left)),
            ConfirmOutcome::Pending(ConfirmChoice::Yes)
        );
        assert_eq!(
            ConfirmChoice::No.handle_key(key(KeyCode::Char('y'))),
            ConfirmOutcome::Confirmed
        );
        assert_eq!(
            ConfirmChoice::Yes.handle_key(key(KeyCode::Char('q'))),
            ConfirmOutcome::Pending(ConfirmChoice::Yes)
        );
    }
}
