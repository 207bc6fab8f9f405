use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Serialize, Serializer};

use crate::error::UnknownPriority;

/// Task urgency, `A` being the most urgent. The derived ordering is the
/// primary sort key of every day view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Priority {
    A,
    #[default]
    B,
    C,
    D,
}

impl Priority {
    pub const ALL: [Priority; 4] = [Priority::A, Priority::B, Priority::C, Priority::D];

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::A => "A",
            Priority::B => "B",
            Priority::C => "C",
            Priority::D => "D",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Priority::A => "A - Must do",
            Priority::B => "B - Should do",
            Priority::C => "C - Nice to do",
            Priority::D => "D - Delegate/defer",
        }
    }

    pub fn next(self) -> Self {
        match self {
            Priority::A => Priority::B,
            Priority::B => Priority::C,
            Priority::C => Priority::D,
            Priority::D => Priority::A,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Priority::A => Priority::D,
            Priority::B => Priority::A,
            Priority::C => Priority::B,
            Priority::D => Priority::C,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Priority {
    type Err = UnknownPriority;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "A" => Ok(Priority::A),
            "B" => Ok(Priority::B),
            "C" => Ok(Priority::C),
            "D" => Ok(Priority::D),
            _ => Err(UnknownPriority(s.to_string())),
        }
    }
}

impl Serialize for Priority {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// A single to-do item belonging to one day in one context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Task {
    pub id: i64,
    pub date: NaiveDate,
    pub context: String,
    pub description: String,
    pub priority: Priority,
    pub time_estimate: String,
    pub is_completed: bool,
    /// Id of the task this row was copied from. Informational only: the
    /// source may since have been deleted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub carried_from_id: Option<i64>,
}

impl Task {
    pub fn was_carried_over(&self) -> bool {
        self.carried_from_id.is_some()
    }

    pub fn display_description(&self) -> String {
        if self.was_carried_over() {
            format!("{} (carried over)", self.description)
        } else {
            self.description.clone()
        }
    }

    pub fn done_display(&self) -> &'static str {
        if self.is_completed {
            "Yes"
        } else {
            ""
        }
    }
}

/// Completion counts for one day view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DaySummary {
    pub completed: usize,
    pub total: usize,
}

impl DaySummary {
    pub fn from_tasks(tasks: &[Task]) -> Self {
        Self {
            completed: tasks.iter().filter(|task| task.is_completed).count(),
            total: tasks.len(),
        }
    }

    pub fn incomplete(&self) -> usize {
        self.total - self.completed
    }
}

impl fmt::Display for DaySummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{} tasks completed", self.completed, self.total)
    }
}

/// One (date, context) day view with its completion summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayView {
    pub date: NaiveDate,
    pub context: String,
    pub tasks: Vec<Task>,
    #[serde(flatten)]
    pub summary: DaySummary,
}

impl DayView {
    pub fn new(date: NaiveDate, context: impl Into<String>, tasks: Vec<Task>) -> Self {
        let summary = DaySummary::from_tasks(&tasks);
        Self {
            date,
            context: context.into(),
            tasks,
            summary,
        }
    }
}
