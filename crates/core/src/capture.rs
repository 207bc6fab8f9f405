use crate::error::ValidationError;
use crate::model::{Priority, Task};

/// Fields entered through the add and edit forms.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskInput {
    pub description: String,
    pub priority: Priority,
    pub time_estimate: String,
}

impl TaskInput {
    pub fn new<D, T>(description: D, priority: Priority, time_estimate: T) -> Self
    where
        D: Into<String>,
        T: Into<String>,
    {
        Self {
            description: description.into(),
            priority,
            time_estimate: time_estimate.into(),
        }
    }

    /// Trim both text fields and reject empty ones.
    pub fn validate(self) -> Result<Self, ValidationError> {
        let description = self.description.trim();
        if description.is_empty() {
            return Err(ValidationError::required("Description"));
        }
        let time_estimate = self.time_estimate.trim();
        if time_estimate.is_empty() {
            return Err(ValidationError::required("Time estimate"));
        }
        Ok(Self {
            description: description.to_string(),
            priority: self.priority,
            time_estimate: time_estimate.to_string(),
        })
    }
}

impl From<&Task> for TaskInput {
    fn from(task: &Task) -> Self {
        Self {
            description: task.description.clone(),
            priority: task.priority,
            time_estimate: task.time_estimate.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn validate_trims_fields() {
        let input = TaskInput::new("  Fix server ", Priority::A, " 2h ")
            .validate()
            .unwrap();
        assert_eq!(input, TaskInput::new("Fix server", Priority::A, "2h"));
    }

    #[test]
    fn validate_rejects_blank_description() {
        let err = TaskInput::new("   ", Priority::B, "1h")
            .validate()
            .unwrap_err();
        assert_eq!(err.to_string(), "Description is required");
    }

    #[test]
    fn validate_rejects_blank_estimate() {
        let err = TaskInput::new("Write docs", Priority::B, "")
            .validate()
            .unwrap_err();
        assert_eq!(err.field, "Time estimate");
    }
}
