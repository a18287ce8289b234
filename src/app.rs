use crate::{
    filter::StatusFilter,
    form::{AddTaskForm, FormAction},
    grid::{GridAdapter, GridOutcome, TableGrid},
    notify::Notifier,
    store::TaskStore,
    task::Task,
};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::{
    sync::mpsc::{Receiver, TryRecvError},
    time::Instant,
};
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Form,
    Filter,
    Grid,
}

impl Focus {
    fn next(self) -> Focus {
        match self {
            Focus::Form => Focus::Filter,
            Focus::Filter => Focus::Grid,
            Focus::Grid => Focus::Form,
        }
    }

    fn prev(self) -> Focus {
        match self {
            Focus::Form => Focus::Grid,
            Focus::Filter => Focus::Form,
            Focus::Grid => Focus::Filter,
        }
    }
}

/// Owns every piece of UI state. All store writes go through here.
pub struct App {
    pub store: TaskStore,
    pub grid: GridAdapter<TableGrid>,
    pub filter: StatusFilter,
    pub form: AddTaskForm,
    pub notifier: Notifier,
    pub focus: Focus,
    /// Blocking message; swallows keys until dismissed.
    pub alert: Option<String>,
    pub should_quit: bool,
    seed: Option<Receiver<Vec<Task>>>,
}

impl App {
    pub fn new(seed: Option<Receiver<Vec<Task>>>) -> Self {
        let store = TaskStore::new();
        let mut grid = GridAdapter::new(TableGrid::new);
        grid.sync(&store);
        Self {
            store,
            grid,
            filter: StatusFilter::default(),
            form: AddTaskForm::new(),
            notifier: Notifier::new(),
            focus: Focus::Grid,
            alert: None,
            should_quit: false,
            seed,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.seed.is_some()
    }

    pub fn tick(&mut self, now: Instant) {
        self.poll_seed();
        self.notifier.prune(now);
        self.grid.sync(&self.store);
    }

    fn poll_seed(&mut self) {
        let Some(rx) = &self.seed else {
            return;
        };
        match rx.try_recv() {
            Ok(tasks) => {
                info!(count = tasks.len(), "seed tasks applied");
                self.store.replace_all(tasks);
                self.seed = None;
            }
            Err(TryRecvError::Empty) => {}
            Err(TryRecvError::Disconnected) => {
                debug!("seed loader finished without data");
                self.seed = None;
            }
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }
        if self.alert.is_some() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                self.alert = None;
            }
            return;
        }

        let editing = self.focus == Focus::Grid && self.grid.is_editing();
        match key.code {
            KeyCode::Tab if !editing => self.focus = self.focus.next(),
            KeyCode::BackTab if !editing => self.focus = self.focus.prev(),
            _ => match self.focus {
                Focus::Form => self.handle_form_key(key),
                Focus::Filter => self.handle_filter_key(key),
                Focus::Grid => self.handle_grid_key(key, editing),
            },
        }
        self.grid.sync(&self.store);
    }

    fn handle_form_key(&mut self, key: KeyEvent) {
        if self.form.handle_key(key) == FormAction::Submit {
            self.submit_form();
        }
    }

    fn handle_filter_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Left | KeyCode::Up => self.filter.cycle(-1, &mut self.grid),
            KeyCode::Right | KeyCode::Down | KeyCode::Enter | KeyCode::Char(' ') => {
                self.filter.cycle(1, &mut self.grid)
            }
            _ => {}
        }
    }

    fn handle_grid_key(&mut self, key: KeyEvent, editing: bool) {
        if !editing && key.code == KeyCode::Char('q') {
            self.should_quit = true;
            return;
        }
        let Some(event) = self.grid.handle_key(key) else {
            return;
        };
        match self.grid.dispatch(event, &mut self.store) {
            Some(GridOutcome::Deleted(task)) => {
                info!(id = task.id, "task deleted");
                self.notifier.notify("Task deleted successfully");
            }
            Some(GridOutcome::Edited(id)) => {
                info!(id, "task edited");
                self.notifier.notify("Task updated successfully");
            }
            None => debug!("grid gesture matched no task"),
        }
    }

    pub fn submit_form(&mut self) {
        match self.form.submit(&mut self.store) {
            Ok(_) => self.notifier.notify("Task added successfully"),
            Err(err) => self.alert = Some(err.to_string()),
        }
    }
}
