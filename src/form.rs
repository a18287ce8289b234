use crate::{
    store::TaskStore,
    task::{DraftTask, Task},
};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("Please fill in all fields.")]
    MissingFields,
    #[error("No task id left to assign.")]
    NoFreeId,
}

/// The character a key press types into a text field. Chords other than
/// Shift are commands, not text.
pub(crate) fn typed_char(key: &KeyEvent) -> Option<char> {
    match key.code {
        KeyCode::Char(c) if key.modifiers.difference(KeyModifiers::SHIFT).is_empty() => Some(c),
        _ => None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormField {
    #[default]
    Title,
    Description,
    Status,
    Submit,
}

impl FormField {
    const ORDER: [FormField; 4] = [
        FormField::Title,
        FormField::Description,
        FormField::Status,
        FormField::Submit,
    ];

    fn step(self, direction: isize) -> FormField {
        let len = Self::ORDER.len() as isize;
        let index = Self::ORDER.iter().position(|f| *f == self).unwrap_or(0) as isize;
        Self::ORDER[(index + direction).rem_euclid(len) as usize]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormAction {
    None,
    Submit,
}

#[derive(Debug, Default)]
pub struct AddTaskForm {
    pub draft: DraftTask,
    pub focus: FormField,
}

impl AddTaskForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> FormAction {
        if let Some(c) = typed_char(&key) {
            match self.focus {
                FormField::Title => self.draft.title.push(c),
                FormField::Description => self.draft.description.push(c),
                FormField::Status if c == ' ' => self.draft.status = self.draft.status.cycle(1),
                _ => {}
            }
            return FormAction::None;
        }
        match (self.focus, key.code) {
            (_, KeyCode::Enter) => return FormAction::Submit,
            (_, KeyCode::Up) => self.focus = self.focus.step(-1),
            (_, KeyCode::Down) => self.focus = self.focus.step(1),
            (FormField::Status, KeyCode::Left) => self.draft.status = self.draft.status.cycle(-1),
            (FormField::Status, KeyCode::Right) => self.draft.status = self.draft.status.cycle(1),
            (FormField::Title, KeyCode::Backspace) => {
                self.draft.title.pop();
            }
            (FormField::Description, KeyCode::Backspace) => {
                self.draft.description.pop();
            }
            _ => {}
        }
        FormAction::None
    }

    /// Appends the draft when title and description are both filled in,
    /// then resets the form. Nothing changes on error.
    pub fn submit(&mut self, store: &mut TaskStore) -> Result<Task, FormError> {
        if self.draft.title.is_empty() || self.draft.description.is_empty() {
            warn!(
                title_empty = self.draft.title.is_empty(),
                description_empty = self.draft.description.is_empty(),
                "add-task submission rejected"
            );
            return Err(FormError::MissingFields);
        }
        let task = store
            .append(self.draft.clone())
            .cloned()
            .ok_or(FormError::NoFreeId)?;
        self.draft = DraftTask::default();
        self.focus = FormField::Title;
        info!(id = task.id, status = %task.status, "task added");
        Ok(task)
    }
}
