//! Move Controller
//!
//! Turns drops and menu picks into status-update requests and their
//! outcomes into board events.

use super::{BoardEvent, BoardState, MoveCommand};
use crate::api::TaskApi;
use crate::models::TaskStatus;

/// Droppable ids are the column status names
pub fn status_for_drop(droppable_id: &str) -> Option<TaskStatus> {
    droppable_id.parse().ok()
}

/// Resolve a finished drag. A drop outside every column, or onto the
/// column the task is already in, yields nothing.
pub fn handle_drop(state: &mut BoardState, task_id: &str, droppable_id: Option<&str>) -> Option<MoveCommand> {
    let destination = match droppable_id.and_then(status_for_drop) {
        Some(status) => status,
        None => {
            log::debug!("Drop of task {} outside any column", task_id);
            return None;
        }
    };
    state.begin_move(task_id, destination)
}

/// Send one status update and report its outcome
pub async fn dispatch_move<A: TaskApi + ?Sized>(api: &A, command: MoveCommand) -> BoardEvent {
    match api.update_task_status(&command.task_id, command.status).await {
        Ok(task) => {
            log::info!("Task {} moved to {}", task.id, task.status);
            BoardEvent::MoveConfirmed { seq: command.seq, task }
        }
        Err(error) => {
            log::warn!("Failed to move task {}: {}", command.task_id, error);
            BoardEvent::MoveFailed {
                task_id: command.task_id,
                seq: command.seq,
                error,
            }
        }
    }
}
