use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

pub type TaskId = u32;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TaskStatus {
    #[default]
    #[serde(rename = "To Do")]
    ToDo,
    #[serde(rename = "In Progress")]
    InProgress,
    #[serde(rename = "Done")]
    Done,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 3] = [TaskStatus::ToDo, TaskStatus::InProgress, TaskStatus::Done];

    pub fn label(self) -> &'static str {
        match self {
            TaskStatus::ToDo => "To Do",
            TaskStatus::InProgress => "In Progress",
            TaskStatus::Done => "Done",
        }
    }

    /// Steps through `ALL`, wrapping at both ends.
    pub fn cycle(self, direction: isize) -> TaskStatus {
        let len = Self::ALL.len() as isize;
        let index = Self::ALL.iter().position(|s| *s == self).unwrap_or(0) as isize;
        Self::ALL[(index + direction).rem_euclid(len) as usize]
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown task status: {0:?}")]
pub struct UnknownStatus(pub String);

impl FromStr for TaskStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TaskStatus::ALL
            .into_iter()
            .find(|status| status.label() == s)
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
}

/// Form-side task before an id is assigned.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DraftTask {
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
}

/// A single committed cell edit coming back from the grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskEdit {
    Title(String),
    Description(String),
    Status(TaskStatus),
}

impl Task {
    pub fn apply(&mut self, edit: TaskEdit) {
        match edit {
            TaskEdit::Title(title) => self.title = title,
            TaskEdit::Description(description) => self.description = description,
            TaskEdit::Status(status) => self.status = status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_parse_back() {
        for status in TaskStatus::ALL {
            assert_eq!(status.label().parse::<TaskStatus>(), Ok(status));
        }
        assert!("Blocked".parse::<TaskStatus>().is_err());
        assert!("".parse::<TaskStatus>().is_err());
    }

    #[test]
    fn cycle_wraps() {
        assert_eq!(TaskStatus::Done.cycle(1), TaskStatus::ToDo);
        assert_eq!(TaskStatus::ToDo.cycle(-1), TaskStatus::Done);
        assert_eq!(TaskStatus::ToDo.cycle(1), TaskStatus::InProgress);
    }

    #[test]
    fn status_serializes_as_label() {
        let json = serde_json::to_string(&TaskStatus::InProgress).unwrap();
        assert_eq!(json, "\"In Progress\"");
    }
}
