//! In-memory task storage, keyed by task id.
//!
//! Session-scoped; nothing is written to disk. The caller serializes
//! mutation, so there is no interior locking.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::task::Task;

#[derive(Debug, Default)]
pub struct TaskStore {
    tasks: HashMap<Uuid, Task>,
}

impl TaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a task, returning its id.
    pub fn add(&mut self, task: Task) -> Uuid {
        let id = task.id;
        self.tasks.insert(id, task);
        id
    }

    pub fn get(&self, id: Uuid) -> Option<&Task> {
        self.tasks.get(&id)
    }

    /// All tasks, ordered by creation time (id as a stable tie-break).
    pub fn get_all(&self) -> Vec<Task> {
        let mut out: Vec<Task> = self.tasks.values().cloned().collect();
        out.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        out
    }

    /// Replace an existing task, stamping `updated_at`.
    /// Returns false if the id is unknown.
    pub fn update(&mut self, mut task: Task, now: DateTime<Utc>) -> bool {
        if !self.tasks.contains_key(&task.id) {
            return false;
        }
        task.updated_at = now;
        self.tasks.insert(task.id, task);
        true
    }

    pub fn delete(&mut self, id: Uuid) -> bool {
        self.tasks.remove(&id).is_some()
    }

    pub fn count(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 15, 10, 0, 0).unwrap()
    }

    #[test]
    fn add_and_get() {
        let mut store = TaskStore::new();
        let id = store.add(Task::new("First", now()));
        assert_eq!(store.get(id).unwrap().title, "First");
        assert_eq!(store.count(), 1);
    }

    #[test]
    fn get_unknown_id_is_none() {
        let store = TaskStore::new();
        assert!(store.get(Uuid::new_v4()).is_none());
    }

    #[test]
    fn get_all_orders_by_creation_time() {
        let mut store = TaskStore::new();
        store.add(Task::new("Second", now() + Duration::minutes(5)));
        store.add(Task::new("First", now()));
        let all = store.get_all();
        assert_eq!(all[0].title, "First");
        assert_eq!(all[1].title, "Second");
    }

    #[test]
    fn update_stamps_updated_at() {
        let mut store = TaskStore::new();
        let id = store.add(Task::new("Original", now()));
        let mut task = store.get(id).unwrap().clone();
        task.title = "Renamed".to_string();

        let later = now() + Duration::hours(1);
        assert!(store.update(task, later));

        let task = store.get(id).unwrap();
        assert_eq!(task.title, "Renamed");
        assert_eq!(task.updated_at, later);
    }

    #[test]
    fn update_unknown_task_is_false() {
        let mut store = TaskStore::new();
        assert!(!store.update(Task::new("Ghost", now()), now()));
        assert!(store.is_empty());
    }

    #[test]
    fn delete_removes_task() {
        let mut store = TaskStore::new();
        let id = store.add(Task::new("Gone", now()));
        assert!(store.delete(id));
        assert!(!store.delete(id));
        assert!(store.is_empty());
    }
}
