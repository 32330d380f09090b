//! Board State
//!
//! In-memory tasks of one project, partitioned into status columns.
//! All changes go through `BoardState::apply`, fed by one event queue:
//! the initial load, local creates/deletes, move outcomes, and realtime
//! change notifications.
//!
//! Ordering rule: observations win in arrival order, except that a
//! pending local move keeps its optimistic status until the request for
//! that move resolves or a remote update carrying the same status
//! confirms it. Every task also remembers the last status the backend
//! reported; a failed move falls back to that, never to whatever the
//! board happened to show when the move started.

mod controller;

pub use controller::{dispatch_move, handle_drop, status_for_drop};

use crate::error::ApiError;
use crate::models::{Task, TaskStatus};

/// Optimistic status change waiting for confirmation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingMove {
    pub seq: u64,
    pub to: TaskStatus,
}

/// A task as shown on the board
#[derive(Debug, Clone, PartialEq)]
pub struct BoardTask {
    pub task: Task,
    pub pending: Option<PendingMove>,
    /// Last status observed from the backend
    pub confirmed: TaskStatus,
}

impl BoardTask {
    fn new(task: Task) -> Self {
        let confirmed = task.status;
        Self {
            task,
            pending: None,
            confirmed,
        }
    }

    pub fn id(&self) -> &str {
        &self.task.id
    }

    pub fn status(&self) -> TaskStatus {
        self.task.status
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

/// Row-level change from the realtime feed
#[derive(Debug, Clone, PartialEq)]
pub enum TaskChange {
    Insert(Task),
    Update(Task),
    Delete { id: String },
}

/// Status-update request produced by a move
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveCommand {
    pub task_id: String,
    pub status: TaskStatus,
    pub seq: u64,
}

/// Everything that can change the board
#[derive(Debug, Clone, PartialEq)]
pub enum BoardEvent {
    /// Fresh snapshot from the backend
    Loaded(Vec<Task>),
    Remote(TaskChange),
    /// Row returned by a local create
    Created(Task),
    /// Local delete succeeded
    Removed { id: String },
    MoveConfirmed { seq: u64, task: Task },
    MoveFailed { task_id: String, seq: u64, error: ApiError },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoardState {
    tasks: Vec<BoardTask>,
    next_seq: u64,
}

impl BoardState {
    pub fn new(tasks: Vec<Task>) -> Self {
        let mut state = Self::default();
        state.apply(BoardEvent::Loaded(tasks));
        state
    }

    pub fn tasks(&self) -> &[BoardTask] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn get(&self, task_id: &str) -> Option<&BoardTask> {
        self.tasks.iter().find(|t| t.id() == task_id)
    }

    /// Tasks shown in one column, in board order
    pub fn column(&self, status: TaskStatus) -> Vec<&BoardTask> {
        self.tasks.iter().filter(|t| t.status() == status).collect()
    }

    pub fn count(&self, status: TaskStatus) -> usize {
        self.tasks.iter().filter(|t| t.status() == status).count()
    }

    /// Move a task to `destination`.
    ///
    /// Returns the request to send, or `None` when there is nothing to do:
    /// unknown task, or the task already shows `destination`.
    pub fn begin_move(&mut self, task_id: &str, destination: TaskStatus) -> Option<MoveCommand> {
        let entry = self.tasks.iter_mut().find(|t| t.task.id == task_id)?;
        if entry.task.status == destination {
            return None;
        }

        self.next_seq += 1;
        let seq = self.next_seq;
        entry.pending = Some(PendingMove { seq, to: destination });
        entry.task.status = destination;
        log::debug!("Task {} moving to {} (seq {})", task_id, destination, seq);

        Some(MoveCommand {
            task_id: task_id.to_string(),
            status: destination,
            seq,
        })
    }

    pub fn apply(&mut self, event: BoardEvent) {
        match event {
            BoardEvent::Loaded(tasks) => {
                self.tasks = tasks.into_iter().map(BoardTask::new).collect();
            }
            BoardEvent::Remote(TaskChange::Insert(task)) | BoardEvent::Created(task) => {
                self.insert_front(task);
            }
            BoardEvent::Remote(TaskChange::Update(task)) => {
                self.apply_remote_update(task);
            }
            BoardEvent::Remote(TaskChange::Delete { id }) | BoardEvent::Removed { id } => {
                self.tasks.retain(|t| t.task.id != id);
            }
            BoardEvent::MoveConfirmed { seq, task } => {
                self.apply_confirmation(seq, task);
            }
            BoardEvent::MoveFailed { task_id, seq, error } => {
                if let Some(entry) = self.pending_entry(&task_id, seq) {
                    log::warn!("Move of task {} failed, reverting to {}: {}", task_id, entry.confirmed, error);
                    entry.pending = None;
                    entry.task.status = entry.confirmed;
                }
            }
        }
    }

    /// Duplicate inserts are ignored: one row per id, first copy wins
    fn insert_front(&mut self, task: Task) {
        if self.get(&task.id).is_some() {
            log::debug!("Ignoring duplicate insert for task {}", task.id);
            return;
        }
        self.tasks.insert(0, BoardTask::new(task));
    }

    fn apply_remote_update(&mut self, task: Task) {
        let Some(entry) = self.tasks.iter_mut().find(|t| t.task.id == task.id) else {
            log::debug!("Update for unknown task {} ignored", task.id);
            return;
        };
        entry.confirmed = task.status;
        match entry.pending {
            Some(pending) if task.status == pending.to => {
                entry.task = task;
                entry.pending = None;
            }
            Some(pending) => {
                // Keep the optimistic column until our own request resolves
                entry.task = Task { status: pending.to, ..task };
            }
            None => entry.task = task,
        }
    }

    /// The current move's outcome replaces the row. A superseded one
    /// still tells us what the backend held, as long as a newer move is
    /// in flight; once nothing is pending the newest outcome stands.
    fn apply_confirmation(&mut self, seq: u64, task: Task) {
        let Some(entry) = self.tasks.iter_mut().find(|t| t.task.id == task.id) else {
            return;
        };
        match entry.pending {
            Some(pending) if pending.seq == seq => {
                entry.confirmed = task.status;
                entry.task = task;
                entry.pending = None;
            }
            Some(pending) => {
                log::debug!("Stale confirmation for task {} (seq {} < {})", task.id, seq, pending.seq);
                entry.confirmed = task.status;
                entry.task = Task { status: pending.to, ..task };
            }
            None => log::debug!("Stale confirmation for task {} dropped", task.id),
        }
    }

    /// Entry whose pending move is exactly `seq`
    fn pending_entry(&mut self, task_id: &str, seq: u64) -> Option<&mut BoardTask> {
        self.tasks
            .iter_mut()
            .find(|t| t.task.id == task_id && t.pending.map(|p| p.seq) == Some(seq))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn task(id: &str, title: &str, status: TaskStatus) -> Task {
        Task {
            id: id.to_string(),
            project_id: "p-1".to_string(),
            title: title.to_string(),
            description: None,
            status,
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    fn ids(state: &BoardState) -> Vec<&str> {
        state.tasks().iter().map(|t| t.id()).collect()
    }

    #[test]
    fn test_columns_partition_by_status() {
        let state = BoardState::new(vec![
            task("a", "A", TaskStatus::Todo),
            task("b", "B", TaskStatus::Done),
            task("c", "C", TaskStatus::Todo),
        ]);
        let todo: Vec<&str> = state.column(TaskStatus::Todo).iter().map(|t| t.id()).collect();
        assert_eq!(todo, vec!["a", "c"]);
        assert_eq!(state.count(TaskStatus::InProgress), 0);
        assert_eq!(state.count(TaskStatus::Done), 1);
    }

    #[test]
    fn test_remote_insert_prepends_once() {
        let mut state = BoardState::new(vec![task("a", "A", TaskStatus::Todo)]);
        state.apply(BoardEvent::Remote(TaskChange::Insert(task("b", "B", TaskStatus::Todo))));
        assert_eq!(ids(&state), vec!["b", "a"]);

        // Duplicate insert is ignored
        state.apply(BoardEvent::Remote(TaskChange::Insert(task("b", "B changed", TaskStatus::Done))));
        assert_eq!(ids(&state), vec!["b", "a"]);
        assert_eq!(state.get("b").unwrap().task.title, "B");
    }

    #[test]
    fn test_remote_update_replaces_in_place() {
        let mut state = BoardState::new(vec![
            task("a", "A", TaskStatus::Todo),
            task("b", "B", TaskStatus::Todo),
            task("c", "C", TaskStatus::Todo),
        ]);
        state.apply(BoardEvent::Remote(TaskChange::Update(task("b", "B2", TaskStatus::Done))));
        assert_eq!(ids(&state), vec!["a", "b", "c"]);
        assert_eq!(state.get("b").unwrap().task.title, "B2");
        assert_eq!(state.get("b").unwrap().status(), TaskStatus::Done);

        // Unknown id is a no-op
        let before = state.clone();
        state.apply(BoardEvent::Remote(TaskChange::Update(task("zz", "Z", TaskStatus::Done))));
        assert_eq!(state, before);
    }

    #[test]
    fn test_remote_delete_removes() {
        let mut state = BoardState::new(vec![task("a", "A", TaskStatus::Todo), task("b", "B", TaskStatus::Todo)]);
        state.apply(BoardEvent::Remote(TaskChange::Delete { id: "a".to_string() }));
        assert_eq!(ids(&state), vec!["b"]);

        state.apply(BoardEvent::Remote(TaskChange::Delete { id: "missing".to_string() }));
        assert_eq!(ids(&state), vec!["b"]);
    }

    #[test]
    fn test_move_to_same_status_is_noop() {
        let mut state = BoardState::new(vec![task("a", "A", TaskStatus::InProgress)]);
        for status in TaskStatus::ALL {
            let before = state.clone();
            let command = state.begin_move("a", status);
            if status == TaskStatus::InProgress {
                assert_eq!(command, None);
                assert_eq!(state, before);
            } else {
                assert!(command.is_some());
                // put it back for the next iteration
                state = before;
            }
        }
        assert_eq!(state.begin_move("missing", TaskStatus::Done), None);
    }

    #[test]
    fn test_pending_flag_lifecycle() {
        let mut state = BoardState::new(vec![task("a", "A", TaskStatus::Todo)]);
        let command = state.begin_move("a", TaskStatus::Done).unwrap();

        let entry = state.get("a").unwrap();
        assert!(entry.is_pending());
        assert_eq!(entry.status(), TaskStatus::Done);

        state.apply(BoardEvent::MoveConfirmed {
            seq: command.seq,
            task: task("a", "A", TaskStatus::Done),
        });
        assert!(!state.get("a").unwrap().is_pending());
        assert_eq!(state.column(TaskStatus::Done).len(), 1);
    }

    #[test]
    fn test_failed_move_reverts() {
        let mut state = BoardState::new(vec![task("a", "A", TaskStatus::Todo)]);
        let command = state.begin_move("a", TaskStatus::InProgress).unwrap();
        state.apply(BoardEvent::MoveFailed {
            task_id: "a".to_string(),
            seq: command.seq,
            error: ApiError::Network("offline".to_string()),
        });

        let entry = state.get("a").unwrap();
        assert!(!entry.is_pending());
        assert_eq!(entry.status(), TaskStatus::Todo);
    }

    #[test]
    fn test_stale_outcomes_are_dropped() {
        let mut state = BoardState::new(vec![task("a", "A", TaskStatus::Todo)]);
        let first = state.begin_move("a", TaskStatus::InProgress).unwrap();
        let second = state.begin_move("a", TaskStatus::Done).unwrap();
        assert!(second.seq > first.seq);

        // First request answers late; the newer move stays visible
        state.apply(BoardEvent::MoveConfirmed {
            seq: first.seq,
            task: task("a", "A", TaskStatus::InProgress),
        });
        assert_eq!(state.get("a").unwrap().status(), TaskStatus::Done);
        assert!(state.get("a").unwrap().is_pending());

        state.apply(BoardEvent::MoveFailed {
            task_id: "a".to_string(),
            seq: first.seq,
            error: ApiError::NotFound,
        });
        assert_eq!(state.get("a").unwrap().status(), TaskStatus::Done);

        state.apply(BoardEvent::MoveConfirmed {
            seq: second.seq,
            task: task("a", "A", TaskStatus::Done),
        });
        assert!(!state.get("a").unwrap().is_pending());
    }

    #[test]
    fn test_remote_update_while_pending() {
        let mut state = BoardState::new(vec![task("a", "A", TaskStatus::Todo)]);
        state.begin_move("a", TaskStatus::Done).unwrap();

        // Someone renamed the task; our column choice survives
        state.apply(BoardEvent::Remote(TaskChange::Update(task("a", "Renamed", TaskStatus::Todo))));
        let entry = state.get("a").unwrap();
        assert_eq!(entry.task.title, "Renamed");
        assert_eq!(entry.status(), TaskStatus::Done);
        assert!(entry.is_pending());

        // Echo of our own write confirms it
        state.apply(BoardEvent::Remote(TaskChange::Update(task("a", "Renamed", TaskStatus::Done))));
        assert!(!state.get("a").unwrap().is_pending());
    }

    #[test]
    fn test_two_failed_moves_fall_back_to_backend_status() {
        let mut state = BoardState::new(vec![task("a", "A", TaskStatus::Todo)]);
        let first = state.begin_move("a", TaskStatus::InProgress).unwrap();
        let second = state.begin_move("a", TaskStatus::Done).unwrap();

        for command in [first, second] {
            state.apply(BoardEvent::MoveFailed {
                task_id: command.task_id,
                seq: command.seq,
                error: ApiError::Network("offline".to_string()),
            });
        }

        let entry = state.get("a").unwrap();
        assert!(!entry.is_pending());
        assert_eq!(entry.status(), TaskStatus::Todo);
    }

    #[test]
    fn test_failed_move_reverts_to_last_remote_write() {
        let mut state = BoardState::new(vec![task("a", "A", TaskStatus::Todo)]);
        let command = state.begin_move("a", TaskStatus::InProgress).unwrap();

        state.apply(BoardEvent::Remote(TaskChange::Update(task("a", "A", TaskStatus::Done))));
        assert_eq!(state.get("a").unwrap().status(), TaskStatus::InProgress);

        state.apply(BoardEvent::MoveFailed {
            task_id: "a".to_string(),
            seq: command.seq,
            error: ApiError::Unauthorized,
        });
        let entry = state.get("a").unwrap();
        assert!(!entry.is_pending());
        assert_eq!(entry.status(), TaskStatus::Done);
    }

    #[test]
    fn test_stale_confirmation_updates_fallback() {
        let mut state = BoardState::new(vec![task("a", "A", TaskStatus::Todo)]);
        let first = state.begin_move("a", TaskStatus::InProgress).unwrap();
        let second = state.begin_move("a", TaskStatus::Done).unwrap();

        state.apply(BoardEvent::MoveConfirmed {
            seq: first.seq,
            task: task("a", "A", TaskStatus::InProgress),
        });
        assert_eq!(state.get("a").unwrap().status(), TaskStatus::Done);
        assert_eq!(state.get("a").unwrap().confirmed, TaskStatus::InProgress);

        state.apply(BoardEvent::MoveFailed {
            task_id: "a".to_string(),
            seq: second.seq,
            error: ApiError::NotFound,
        });
        assert_eq!(state.get("a").unwrap().status(), TaskStatus::InProgress);
    }

    #[test]
    fn test_identical_titles_are_distinct_tasks() {
        let mut state = BoardState::new(vec![task("a", "Same", TaskStatus::Todo)]);
        state.apply(BoardEvent::Created(task("b", "Same", TaskStatus::Todo)));
        assert_eq!(state.column(TaskStatus::Todo).len(), 2);

        state.apply(BoardEvent::Removed { id: "a".to_string() });
        assert_eq!(ids(&state), vec!["b"]);
    }
}
