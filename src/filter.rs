use crate::{
    grid::{Column, FilterOp, GridAdapter, GridWidget},
    task::{TaskStatus, UnknownStatus},
};
use tracing::debug;

/// Status filter over the grid. `None` is the "All" option, written `""`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusFilter {
    selected: Option<TaskStatus>,
}

impl StatusFilter {
    pub const OPTIONS: [Option<TaskStatus>; 4] = [
        None,
        Some(TaskStatus::ToDo),
        Some(TaskStatus::InProgress),
        Some(TaskStatus::Done),
    ];

    pub fn selected(&self) -> Option<TaskStatus> {
        self.selected
    }

    pub fn value(&self) -> &'static str {
        self.selected.map_or("", TaskStatus::label)
    }

    pub fn label(&self) -> &'static str {
        self.selected.map_or("All", TaskStatus::label)
    }

    pub fn set_value<W: GridWidget>(
        &mut self,
        value: &str,
        grid: &mut GridAdapter<W>,
    ) -> Result<(), UnknownStatus> {
        self.selected = if value.is_empty() {
            None
        } else {
            Some(value.parse()?)
        };
        self.apply(grid);
        Ok(())
    }

    pub fn cycle<W: GridWidget>(&mut self, direction: isize, grid: &mut GridAdapter<W>) {
        let len = Self::OPTIONS.len() as isize;
        let index = Self::OPTIONS.iter().position(|o| *o == self.selected).unwrap_or(0) as isize;
        self.selected = Self::OPTIONS[(index + direction).rem_euclid(len) as usize];
        self.apply(grid);
    }

    pub fn apply<W: GridWidget>(&self, grid: &mut GridAdapter<W>) {
        debug!(filter = self.label(), "status filter changed");
        match self.selected {
            Some(status) => grid.set_filter(Column::Status, FilterOp::Eq, status.label()),
            None => grid.clear_filter(),
        }
    }
}
