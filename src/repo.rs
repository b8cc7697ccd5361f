use chrono::{DateTime, NaiveDate, Utc};
use tracing::debug;

use crate::error::{BenkyoError, Result};
use crate::model::{Category, NewTask, Priority, Task, TaskFilter, TaskId};
use crate::store::{keys, Store};

/// Ordered, in-memory task collection. The whole collection is serialized
/// to the `tasks` slot on every mutation; insertion order is the display
/// order and is never re-sorted.
pub struct TaskRepository {
    tasks: Vec<Task>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskStats {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
    pub due_today: usize,
    pub completed_today: usize,
    pub overdue: usize,
}

impl TaskRepository {
    /// Loads from the store, seeding two sample tasks when the `tasks`
    /// slot has never been written. Seeding keys off slot absence only, so
    /// an explicitly emptied list stays empty.
    pub fn load(store: &mut Store, today: NaiveDate, now: DateTime<Utc>) -> Self {
        if let Some(tasks) = store.get_json::<Vec<Task>>(keys::TASKS) {
            return Self { tasks };
        }

        if store.contains(keys::TASKS) {
            // Slot exists but is malformed; treat as absent and reseed.
            debug!("tasks slot unreadable, reseeding");
        }

        let mut repo = Self {
            tasks: sample_tasks(today, now),
        };
        repo.persist(store);
        repo
    }

    fn persist(&self, store: &mut Store) {
        store.set_json(keys::TASKS, &self.tasks);
    }

    pub fn add(&mut self, store: &mut Store, new: NewTask, now: DateTime<Utc>) -> Result<Task> {
        if new.title.trim().is_empty() {
            return Err(BenkyoError::Validation("task title must not be empty".into()));
        }

        let task = Task {
            id: self.next_id(now),
            title: new.title,
            category: new.category,
            priority: new.priority,
            due_date: new.due_date,
            description: new.description,
            completed: false,
            created_at: now,
            completed_at: None,
        };

        self.tasks.push(task.clone());
        self.persist(store);
        Ok(task)
    }

    /// Marks a task completed. Idempotent on the completion edge: only the
    /// first transition stamps `completed_at`.
    pub fn complete(&mut self, store: &mut Store, id: TaskId, now: DateTime<Utc>) -> Result<Task> {
        let task = self
            .tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(BenkyoError::NotFound(id))?;

        if !task.completed {
            task.completed = true;
            task.completed_at = Some(now);
        }

        let task = task.clone();
        self.persist(store);
        Ok(task)
    }

    pub fn delete(&mut self, store: &mut Store, id: TaskId) -> Result<Task> {
        let index = self
            .tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or(BenkyoError::NotFound(id))?;

        let removed = self.tasks.remove(index);
        self.persist(store);
        Ok(removed)
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn all(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn query(&self, filter: &TaskFilter) -> Vec<&Task> {
        self.tasks.iter().filter(|t| filter.matches(t)).collect()
    }

    /// Completed count among tasks due today — the input the daily goal
    /// and streak are measured against.
    pub fn completed_due_today(&self, today: NaiveDate) -> u32 {
        self.tasks
            .iter()
            .filter(|t| t.due_date == today && t.completed)
            .count() as u32
    }

    pub fn stats(&self, today: NaiveDate) -> TaskStats {
        let due_today: Vec<&Task> = self.tasks.iter().filter(|t| t.due_date == today).collect();

        TaskStats {
            total: self.tasks.len(),
            completed: self.tasks.iter().filter(|t| t.completed).count(),
            pending: self.tasks.iter().filter(|t| !t.completed).count(),
            due_today: due_today.len(),
            completed_today: due_today.iter().filter(|t| t.completed).count(),
            overdue: self.tasks.iter().filter(|t| t.is_overdue(today)).count(),
        }
    }

    /// Ids are creation-time millisecond timestamps, bumped past any
    /// collision so they stay unique within the repository.
    fn next_id(&self, now: DateTime<Utc>) -> TaskId {
        let mut id = now.timestamp_millis();
        while self.tasks.iter().any(|t| t.id == id) {
            id += 1;
        }
        id
    }

    /// Wholesale replacement, used by snapshot import.
    pub fn replace_all(&mut self, store: &mut Store, tasks: Vec<Task>) {
        self.tasks = tasks;
        self.persist(store);
    }
}

fn sample_tasks(today: NaiveDate, now: DateTime<Utc>) -> Vec<Task> {
    let base = now.timestamp_millis();
    vec![
        Task {
            id: base,
            title: "Complete Math Assignment".into(),
            category: Category::Assignment,
            priority: Priority::High,
            due_date: today,
            description: String::new(),
            completed: false,
            created_at: now,
            completed_at: None,
        },
        Task {
            id: base + 1,
            title: "Read Physics Chapter 3".into(),
            category: Category::Reading,
            priority: Priority::Medium,
            due_date: today,
            description: String::new(),
            completed: false,
            created_at: now,
            completed_at: None,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::StatusFilter;
    use tempfile::TempDir;

    fn setup() -> (TempDir, Store, TaskRepository) {
        let dir = TempDir::new().unwrap();
        let mut store = Store::open(dir.path().join("state.json"));
        // Seed an empty list so tests start without sample tasks.
        store.set_json(keys::TASKS, &Vec::<Task>::new());
        let repo = TaskRepository::load(&mut store, today(), now());
        (dir, store, repo)
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 10).unwrap()
    }

    fn now() -> DateTime<Utc> {
        today().and_hms_opt(9, 0, 0).unwrap().and_utc()
    }

    fn new_task(title: &str) -> NewTask {
        NewTask::quick(title, today())
    }

    #[test]
    fn test_seeds_two_sample_tasks_on_first_load() {
        let dir = TempDir::new().unwrap();
        let mut store = Store::open(dir.path().join("state.json"));

        let repo = TaskRepository::load(&mut store, today(), now());
        assert_eq!(repo.len(), 2);
        assert!(repo.all().iter().all(|t| t.due_date == today()));

        // Seeding happens exactly once: a reload sees the persisted slot.
        let repo = TaskRepository::load(&mut store, today(), now());
        assert_eq!(repo.len(), 2);
    }

    #[test]
    fn test_no_reseed_after_emptying() {
        let dir = TempDir::new().unwrap();
        let mut store = Store::open(dir.path().join("state.json"));

        let mut repo = TaskRepository::load(&mut store, today(), now());
        let ids: Vec<TaskId> = repo.all().iter().map(|t| t.id).collect();
        for id in ids {
            repo.delete(&mut store, id).unwrap();
        }

        let repo = TaskRepository::load(&mut store, today(), now());
        assert_eq!(repo.len(), 0);
    }

    #[test]
    fn test_add_assigns_unique_ids() {
        let (_dir, mut store, mut repo) = setup();

        let a = repo.add(&mut store, new_task("a"), now()).unwrap();
        let b = repo.add(&mut store, new_task("b"), now()).unwrap();
        let c = repo.add(&mut store, new_task("c"), now()).unwrap();

        assert_ne!(a.id, b.id);
        assert_ne!(b.id, c.id);
        assert_ne!(a.id, c.id);
    }

    #[test]
    fn test_add_rejects_empty_title() {
        let (_dir, mut store, mut repo) = setup();

        let err = repo.add(&mut store, new_task("   "), now()).unwrap_err();
        assert!(matches!(err, BenkyoError::Validation(_)));
        assert_eq!(repo.len(), 0);
    }

    #[test]
    fn test_complete_sets_completed_at_once() {
        let (_dir, mut store, mut repo) = setup();
        let task = repo.add(&mut store, new_task("a"), now()).unwrap();

        let first = repo.complete(&mut store, task.id, now()).unwrap();
        assert!(first.completed);
        let stamped = first.completed_at.unwrap();

        let later = now() + chrono::Duration::hours(2);
        let second = repo.complete(&mut store, task.id, later).unwrap();
        assert_eq!(second.completed_at.unwrap(), stamped);
    }

    #[test]
    fn test_complete_missing_id_fails() {
        let (_dir, mut store, mut repo) = setup();
        let err = repo.complete(&mut store, 42, now()).unwrap_err();
        assert!(matches!(err, BenkyoError::NotFound(42)));
    }

    #[test]
    fn test_delete_missing_id_leaves_repo_unchanged() {
        let (_dir, mut store, mut repo) = setup();
        repo.add(&mut store, new_task("a"), now()).unwrap();

        let err = repo.delete(&mut store, 42).unwrap_err();
        assert!(matches!(err, BenkyoError::NotFound(42)));
        assert_eq!(repo.len(), 1);
    }

    #[test]
    fn test_query_status_completed_preserves_order() {
        let (_dir, mut store, mut repo) = setup();
        let a = repo.add(&mut store, new_task("first"), now()).unwrap();
        repo.add(&mut store, new_task("second"), now()).unwrap();
        let c = repo.add(&mut store, new_task("third"), now()).unwrap();

        repo.complete(&mut store, c.id, now()).unwrap();
        repo.complete(&mut store, a.id, now()).unwrap();

        let filter = TaskFilter {
            status: StatusFilter::Completed,
            ..Default::default()
        };
        let found = repo.query(&filter);
        assert_eq!(found.len(), 2);
        // Insertion order, not completion order.
        assert_eq!(found[0].title, "first");
        assert_eq!(found[1].title, "third");
    }

    #[test]
    fn test_query_search_is_case_insensitive() {
        let (_dir, mut store, mut repo) = setup();
        let mut new = new_task("Review lecture notes");
        new.description = "Chapters 4-6".into();
        repo.add(&mut store, new, now()).unwrap();
        repo.add(&mut store, new_task("Buy groceries"), now()).unwrap();

        let filter = TaskFilter {
            search: Some("LECTURE".into()),
            ..Default::default()
        };
        assert_eq!(repo.query(&filter).len(), 1);

        // Matches description and category too.
        let filter = TaskFilter {
            search: Some("chapters".into()),
            ..Default::default()
        };
        assert_eq!(repo.query(&filter).len(), 1);

        let filter = TaskFilter {
            search: Some("other".into()),
            ..Default::default()
        };
        assert_eq!(repo.query(&filter).len(), 2);
    }

    #[test]
    fn test_query_month_range_inclusive() {
        let (_dir, mut store, mut repo) = setup();
        for day in [1, 15, 31] {
            let mut new = new_task(&format!("march {}", day));
            new.due_date = NaiveDate::from_ymd_opt(2026, 3, day).unwrap();
            repo.add(&mut store, new, now()).unwrap();
        }
        let mut new = new_task("april");
        new.due_date = NaiveDate::from_ymd_opt(2026, 4, 1).unwrap();
        repo.add(&mut store, new, now()).unwrap();

        let filter = TaskFilter {
            month_range: Some((
                NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
                NaiveDate::from_ymd_opt(2026, 3, 31).unwrap(),
            )),
            ..Default::default()
        };
        assert_eq!(repo.query(&filter).len(), 3);
    }

    #[test]
    fn test_stats_counts() {
        let (_dir, mut store, mut repo) = setup();

        let done = repo.add(&mut store, new_task("done today"), now()).unwrap();
        repo.add(&mut store, new_task("open today"), now()).unwrap();
        let mut old = new_task("overdue");
        old.due_date = today() - chrono::Duration::days(3);
        repo.add(&mut store, old, now()).unwrap();

        repo.complete(&mut store, done.id, now()).unwrap();

        let stats = repo.stats(today());
        assert_eq!(stats.total, 3);
        assert_eq!(stats.completed, 1);
        assert_eq!(stats.pending, 2);
        assert_eq!(stats.due_today, 2);
        assert_eq!(stats.completed_today, 1);
        assert_eq!(stats.overdue, 1);
        assert_eq!(repo.completed_due_today(today()), 1);
    }

    #[test]
    fn test_persists_across_reload() {
        let (_dir, mut store, mut repo) = setup();
        let task = repo.add(&mut store, new_task("persist me"), now()).unwrap();
        repo.complete(&mut store, task.id, now()).unwrap();

        let reloaded = TaskRepository::load(&mut store, today(), now());
        assert_eq!(reloaded.len(), 1);
        let loaded = reloaded.get(task.id).unwrap();
        assert!(loaded.completed);
        assert!(loaded.completed_at.is_some());
    }
}
