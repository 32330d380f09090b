//! UI Components
//!
//! Reusable Leptos components.

mod board_column;
mod delete_confirm_button;
mod new_project_dialog;
mod new_task_dialog;
mod notice_tray;
mod project_card;
mod sidebar;
mod task_card;

pub use board_column::BoardColumn;
pub use delete_confirm_button::DeleteConfirmButton;
pub use new_project_dialog::NewProjectDialog;
pub use new_task_dialog::NewTaskDialog;
pub use notice_tray::NoticeTray;
pub use project_card::ProjectCard;
pub use sidebar::{Layout, Sidebar};
pub use task_card::TaskCard;
