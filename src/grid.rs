use crate::{
    form::typed_char,
    store::TaskStore,
    task::{Task, TaskEdit, TaskId, TaskStatus},
};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Row, Table, TableState},
    Frame,
};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Id,
    Title,
    Description,
    Status,
    Actions,
}

impl Column {
    pub const ALL: [Column; 5] = [
        Column::Id,
        Column::Title,
        Column::Description,
        Column::Status,
        Column::Actions,
    ];

    pub fn header(self) -> &'static str {
        match self {
            Column::Id => "Task ID",
            Column::Title => "Title",
            Column::Description => "Description",
            Column::Status => "Status",
            Column::Actions => "Actions",
        }
    }

    fn value(self, task: &Task) -> Option<String> {
        match self {
            Column::Id => Some(task.id.to_string()),
            Column::Title => Some(task.title.clone()),
            Column::Description => Some(task.description.clone()),
            Column::Status => Some(task.status.label().to_string()),
            Column::Actions => None,
        }
    }

    fn step(self, direction: isize) -> Column {
        let index = Self::ALL.iter().position(|c| *c == self).unwrap_or(0) as isize;
        let last = Self::ALL.len() as isize - 1;
        Self::ALL[(index + direction).clamp(0, last) as usize]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    Eq,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridFilter {
    pub column: Column,
    pub op: FilterOp,
    pub value: String,
}

impl GridFilter {
    pub fn matches(&self, task: &Task) -> bool {
        match (self.op, self.column.value(task)) {
            (FilterOp::Eq, Some(value)) => value == self.value,
            (FilterOp::Eq, None) => false,
        }
    }
}

/// Gestures a grid widget reports back to whoever owns the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridEvent {
    CellEdited { id: TaskId, edit: TaskEdit },
    DeleteClicked { id: TaskId },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridOutcome {
    Edited(TaskId),
    Deleted(Task),
}

/// The table widget as seen by the adapter. Widgets never touch the store.
pub trait GridWidget {
    fn render(&mut self, tasks: &[Task]);
    fn set_filter(&mut self, column: Column, op: FilterOp, value: &str);
    fn clear_filter(&mut self);
    fn handle_key(&mut self, key: KeyEvent) -> Option<GridEvent>;
    fn destroy(&mut self);

    fn is_editing(&self) -> bool {
        false
    }

    fn cursor(&self) -> Option<usize> {
        None
    }

    fn restore_cursor(&mut self, _cursor: Option<usize>) {}
}

/// Keeps exactly one live widget bound to the current store revision.
pub struct GridAdapter<W: GridWidget> {
    factory: Box<dyn Fn() -> W>,
    widget: Option<W>,
    bound_revision: Option<u64>,
    filter: Option<GridFilter>,
}

impl<W: GridWidget> GridAdapter<W> {
    pub fn new(factory: impl Fn() -> W + 'static) -> Self {
        Self {
            factory: Box::new(factory),
            widget: None,
            bound_revision: None,
            filter: None,
        }
    }

    /// Rebuilds the widget when the store changed since the last sync.
    /// The previous widget is destroyed and dropped before the new one is built.
    /// A widget with an open cell editor is kept until the edit ends.
    pub fn sync(&mut self, store: &TaskStore) -> bool {
        if self.widget.is_some() && self.bound_revision == Some(store.revision()) {
            return false;
        }
        if self.is_editing() {
            debug!(revision = store.revision(), "grid rebuild deferred while editing");
            return false;
        }

        let cursor = self.widget.as_ref().and_then(|w| w.cursor());
        if let Some(mut old) = self.widget.take() {
            old.destroy();
        }

        let mut widget = (self.factory)();
        widget.render(store.tasks());
        if let Some(filter) = &self.filter {
            widget.set_filter(filter.column, filter.op, &filter.value);
        }
        widget.restore_cursor(cursor);

        debug!(revision = store.revision(), rows = store.len(), "grid rebuilt");
        self.widget = Some(widget);
        self.bound_revision = Some(store.revision());
        true
    }

    pub fn set_filter(&mut self, column: Column, op: FilterOp, value: &str) {
        if let Some(widget) = self.widget.as_mut() {
            widget.set_filter(column, op, value);
        }
        self.filter = Some(GridFilter {
            column,
            op,
            value: value.to_string(),
        });
    }

    pub fn clear_filter(&mut self) {
        if let Some(widget) = self.widget.as_mut() {
            widget.clear_filter();
        }
        self.filter = None;
    }

    pub fn filter(&self) -> Option<&GridFilter> {
        self.filter.as_ref()
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Option<GridEvent> {
        self.widget.as_mut()?.handle_key(key)
    }

    pub fn is_editing(&self) -> bool {
        self.widget.as_ref().is_some_and(|w| w.is_editing())
    }

    /// Applies a widget gesture to the store. Unknown ids are ignored.
    pub fn dispatch(&mut self, event: GridEvent, store: &mut TaskStore) -> Option<GridOutcome> {
        match event {
            GridEvent::CellEdited { id, edit } => store.update(id, edit).then_some(GridOutcome::Edited(id)),
            GridEvent::DeleteClicked { id } => store.remove(id).map(GridOutcome::Deleted),
        }
    }

    pub fn widget(&self) -> Option<&W> {
        self.widget.as_ref()
    }

    pub fn widget_mut(&mut self) -> Option<&mut W> {
        self.widget.as_mut()
    }
}

impl<W: GridWidget> Drop for GridAdapter<W> {
    fn drop(&mut self) {
        if let Some(mut widget) = self.widget.take() {
            widget.destroy();
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum CellEditor {
    Text { column: Column, buffer: String },
    Select { status: TaskStatus },
}

/// Terminal table with inline text and select editors.
#[derive(Debug)]
pub struct TableGrid {
    rows: Vec<Task>,
    filter: Option<GridFilter>,
    state: TableState,
    column: Column,
    editor: Option<CellEditor>,
}

impl Default for TableGrid {
    fn default() -> Self {
        Self::new()
    }
}

impl TableGrid {
    pub fn new() -> Self {
        Self {
            rows: Vec::new(),
            filter: None,
            state: TableState::default(),
            column: Column::Title,
            editor: None,
        }
    }

    pub fn visible_rows(&self) -> Vec<&Task> {
        self.rows
            .iter()
            .filter(|t| self.filter.as_ref().map_or(true, |f| f.matches(t)))
            .collect()
    }

    pub fn selected_task(&self) -> Option<&Task> {
        let index = self.state.selected()?;
        self.visible_rows().get(index).copied()
    }

    pub fn selected_column(&self) -> Column {
        self.column
    }

    fn clamp_selection(&mut self) {
        let len = self.visible_rows().len();
        if len == 0 {
            self.state.select(None);
        } else {
            let index = self.state.selected().unwrap_or(0).min(len - 1);
            self.state.select(Some(index));
        }
    }

    fn move_row(&mut self, direction: isize) {
        let len = self.visible_rows().len();
        if len == 0 {
            return;
        }
        let current = self.state.selected().unwrap_or(0) as isize;
        let next = (current + direction).clamp(0, len as isize - 1) as usize;
        self.state.select(Some(next));
    }

    fn activate(&mut self) -> Option<GridEvent> {
        let task = self.selected_task()?.clone();
        match self.column {
            Column::Id => None,
            Column::Title => {
                self.editor = Some(CellEditor::Text {
                    column: Column::Title,
                    buffer: task.title,
                });
                None
            }
            Column::Description => {
                self.editor = Some(CellEditor::Text {
                    column: Column::Description,
                    buffer: task.description,
                });
                None
            }
            Column::Status => {
                self.editor = Some(CellEditor::Select { status: task.status });
                None
            }
            Column::Actions => Some(GridEvent::DeleteClicked { id: task.id }),
        }
    }

    fn edit_key(&mut self, key: KeyEvent) -> Option<GridEvent> {
        match key.code {
            KeyCode::Esc => {
                self.editor = None;
                return None;
            }
            KeyCode::Enter => return self.commit_edit(),
            _ => {}
        }
        let typed = typed_char(&key);
        match (self.editor.as_mut()?, key.code) {
            (CellEditor::Text { buffer, .. }, KeyCode::Char(_)) => buffer.extend(typed),
            (CellEditor::Text { buffer, .. }, KeyCode::Backspace) => {
                buffer.pop();
            }
            (CellEditor::Select { status }, KeyCode::Up | KeyCode::Left) => *status = status.cycle(-1),
            (CellEditor::Select { status }, KeyCode::Down | KeyCode::Right) => *status = status.cycle(1),
            _ => {}
        }
        None
    }

    fn commit_edit(&mut self) -> Option<GridEvent> {
        let editor = self.editor.take()?;
        let id = self.selected_task()?.id;
        let edit = match editor {
            // Titles stay non-empty.
            CellEditor::Text { column: Column::Title, buffer } if buffer.is_empty() => return None,
            CellEditor::Text { column: Column::Title, buffer } => TaskEdit::Title(buffer),
            CellEditor::Text { buffer, .. } => TaskEdit::Description(buffer),
            CellEditor::Select { status } => TaskEdit::Status(status),
        };
        Some(GridEvent::CellEdited { id, edit })
    }

    pub fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool) {
        let header = Row::new(Column::ALL.iter().map(|c| {
            Cell::from(c.header()).style(Style::default().add_modifier(Modifier::BOLD))
        }))
        .style(Style::default().bg(Color::Blue).fg(Color::White))
        .height(1);

        let selected = self.state.selected();
        let rows: Vec<Row> = self
            .visible_rows()
            .into_iter()
            .enumerate()
            .map(|(index, task)| {
                let is_selected = selected == Some(index);
                let cells = Column::ALL.iter().map(|column| {
                    let text = match (&self.editor, column) {
                        (Some(CellEditor::Text { column: editing, buffer }), c)
                            if is_selected && editing == c =>
                        {
                            format!("{buffer}_")
                        }
                        (Some(CellEditor::Select { status }), Column::Status) if is_selected => {
                            format!("< {} >", status.label())
                        }
                        _ => column.value(task).unwrap_or_default(),
                    };
                    let mut cell = if *column == Column::Actions {
                        Cell::from(Line::from(Span::styled(
                            "[Delete]",
                            Style::default().fg(Color::Red),
                        )))
                    } else {
                        Cell::from(text)
                    };
                    if is_selected && focused && *column == self.column {
                        cell = cell.style(Style::default().add_modifier(Modifier::REVERSED));
                    }
                    cell
                });
                let style = match task.status {
                    TaskStatus::Done => Style::default().fg(Color::DarkGray),
                    TaskStatus::InProgress => Style::default().fg(Color::Yellow),
                    TaskStatus::ToDo => Style::default().fg(Color::White),
                };
                Row::new(cells).style(style)
            })
            .collect();

        let widths = [
            Constraint::Length(8),
            Constraint::Percentage(35),
            Constraint::Min(20),
            Constraint::Length(15),
            Constraint::Length(10),
        ];

        let table = Table::new(rows, widths)
            .header(header)
            .block(
                Block::default()
                    .title(format!("Tasks ({}/{})", self.visible_rows().len(), self.rows.len()))
                    .borders(Borders::ALL)
                    .border_style(if focused {
                        Style::default().fg(Color::Cyan)
                    } else {
                        Style::default()
                    }),
            )
            .row_highlight_style(Style::default().add_modifier(Modifier::BOLD))
            .highlight_symbol("> ");

        frame.render_stateful_widget(table, area, &mut self.state);
    }
}

impl GridWidget for TableGrid {
    fn render(&mut self, tasks: &[Task]) {
        self.rows = tasks.to_vec();
        self.editor = None;
        self.clamp_selection();
    }

    fn set_filter(&mut self, column: Column, op: FilterOp, value: &str) {
        self.filter = Some(GridFilter {
            column,
            op,
            value: value.to_string(),
        });
        self.editor = None;
        self.clamp_selection();
    }

    fn clear_filter(&mut self) {
        self.filter = None;
        self.clamp_selection();
    }

    fn handle_key(&mut self, key: KeyEvent) -> Option<GridEvent> {
        if self.editor.is_some() {
            return self.edit_key(key);
        }
        match key.code {
            KeyCode::Up => self.move_row(-1),
            KeyCode::Down => self.move_row(1),
            KeyCode::Left => self.column = self.column.step(-1),
            KeyCode::Right => self.column = self.column.step(1),
            KeyCode::Enter => return self.activate(),
            KeyCode::Char('d') | KeyCode::Delete => {
                return self.selected_task().map(|t| GridEvent::DeleteClicked { id: t.id });
            }
            _ => {}
        }
        None
    }

    fn destroy(&mut self) {
        self.rows.clear();
        self.editor = None;
        self.state.select(None);
    }

    fn is_editing(&self) -> bool {
        self.editor.is_some()
    }

    fn cursor(&self) -> Option<usize> {
        self.state.selected()
    }

    fn restore_cursor(&mut self, cursor: Option<usize>) {
        self.state.select(cursor);
        self.clamp_selection();
    }
}
