use crate::task::{DraftTask, Task, TaskEdit, TaskId, TaskStatus};
use std::collections::HashSet;
use tracing::{debug, warn};

/// In-memory task list. Every successful mutation bumps `revision`.
#[derive(Debug)]
pub struct TaskStore {
    tasks: Vec<Task>,
    /// `None` once the counter has handed out `TaskId::MAX`.
    next_id: Option<TaskId>,
    revision: u64,
}

impl Default for TaskStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskStore {
    pub fn new() -> Self {
        Self {
            tasks: Vec::new(),
            next_id: Some(1),
            revision: 0,
        }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn replace_all(&mut self, tasks: Vec<Task>) {
        if let Some(max_id) = tasks.iter().map(|t| t.id).max() {
            self.next_id = match (self.next_id, max_id.checked_add(1)) {
                (Some(current), Some(after_max)) => Some(current.max(after_max)),
                _ => None,
            };
        }
        self.tasks = tasks;
        self.bump();
    }

    /// Ids come from a counter that never goes backwards, so they stay unique
    /// after deletions. Returns `None` only when every id is taken.
    pub fn append(&mut self, draft: DraftTask) -> Option<&Task> {
        let id = self.allocate_id()?;
        self.tasks.push(Task {
            id,
            title: draft.title,
            description: draft.description,
            status: draft.status,
        });
        self.bump();
        self.tasks.last()
    }

    fn allocate_id(&mut self) -> Option<TaskId> {
        if let Some(id) = self.next_id {
            self.next_id = id.checked_add(1);
            if self.get(id).is_none() {
                return Some(id);
            }
        }
        // Counter exhausted: fall back to the lowest id no live task holds.
        let used: HashSet<TaskId> = self.tasks.iter().map(|t| t.id).collect();
        let id = (1..=TaskId::MAX).find(|id| !used.contains(id));
        warn!(reused = ?id, "task id counter exhausted");
        id
    }

    pub fn remove(&mut self, id: TaskId) -> Option<Task> {
        let index = self.tasks.iter().position(|t| t.id == id)?;
        let removed = self.tasks.remove(index);
        self.bump();
        Some(removed)
    }

    pub fn update(&mut self, id: TaskId, edit: TaskEdit) -> bool {
        match self.tasks.iter_mut().find(|t| t.id == id) {
            Some(task) => {
                task.apply(edit);
                self.bump();
                true
            }
            None => false,
        }
    }

    pub fn tasks_with_status(&self, status: TaskStatus) -> Vec<&Task> {
        self.tasks.iter().filter(|t| t.status == status).collect()
    }

    fn bump(&mut self) {
        self.revision += 1;
        debug!(revision = self.revision, len = self.tasks.len(), "task store changed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(title: &str) -> DraftTask {
        DraftTask {
            title: title.to_string(),
            description: "desc".to_string(),
            status: TaskStatus::ToDo,
        }
    }

    fn seeded(n: u32) -> TaskStore {
        let mut store = TaskStore::new();
        store.replace_all(
            (1..=n)
                .map(|id| Task {
                    id,
                    title: format!("task {id}"),
                    description: String::new(),
                    status: TaskStatus::ToDo,
                })
                .collect(),
        );
        store
    }

    #[test]
    fn append_assigns_next_id_and_grows_by_one() {
        let mut store = seeded(3);
        let id = store.append(draft("new")).unwrap().id;
        assert_eq!(id, 4);
        assert_eq!(store.len(), 4);
    }

    #[test]
    fn ids_do_not_collide_after_delete() {
        let mut store = seeded(5);
        store.remove(3);
        let id = store.append(draft("new")).unwrap().id;
        assert_eq!(id, 6);
        let mut ids: Vec<_> = store.tasks().iter().map(|t| t.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), store.len());
    }

    #[test]
    fn remove_keeps_order_of_the_rest() {
        let mut store = seeded(4);
        let removed = store.remove(2).unwrap();
        assert_eq!(removed.id, 2);
        let ids: Vec<_> = store.tasks().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 3, 4]);
    }

    #[test]
    fn remove_missing_is_noop() {
        let mut store = seeded(2);
        let rev = store.revision();
        assert!(store.remove(42).is_none());
        assert_eq!(store.revision(), rev);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn update_writes_the_edit() {
        let mut store = seeded(2);
        assert!(store.update(2, TaskEdit::Status(TaskStatus::Done)));
        assert_eq!(store.get(2).unwrap().status, TaskStatus::Done);
        assert_eq!(store.tasks_with_status(TaskStatus::Done).len(), 1);
        assert!(!store.update(9, TaskEdit::Title("x".into())));
    }

    #[test]
    fn replace_all_never_lowers_the_counter() {
        let mut store = seeded(10);
        store.replace_all(vec![Task {
            id: 2,
            title: "only".into(),
            description: String::new(),
            status: TaskStatus::Done,
        }]);
        assert_eq!(store.append(draft("x")).unwrap().id, 11);
    }

    fn single(id: TaskId) -> Task {
        Task {
            id,
            title: "edge".into(),
            description: String::new(),
            status: TaskStatus::ToDo,
        }
    }

    fn distinct_ids(store: &TaskStore) -> usize {
        store.tasks().iter().map(|t| t.id).collect::<HashSet<_>>().len()
    }

    #[test]
    fn seed_at_max_id_still_yields_unique_ids() {
        let mut store = TaskStore::new();
        store.replace_all(vec![single(TaskId::MAX)]);
        let first = store.append(draft("a")).unwrap().id;
        let second = store.append(draft("b")).unwrap().id;
        assert_eq!((first, second), (1, 2));
        assert_eq!(store.len(), 3);
        assert_eq!(distinct_ids(&store), 3);
    }

    #[test]
    fn counter_running_into_max_wraps_to_free_ids() {
        let mut store = TaskStore::new();
        store.replace_all(vec![single(1), single(TaskId::MAX - 1)]);
        assert_eq!(store.append(draft("a")).unwrap().id, TaskId::MAX);
        assert_eq!(store.append(draft("b")).unwrap().id, 2);
        assert_eq!(distinct_ids(&store), store.len());
    }
}
