//! Form State
//!
//! Plain state behind the creation dialogs and the project list's
//! delete confirmation. Views keep these in signals; the logic lives
//! here so it can be tested without a DOM.

use crate::api::{ProjectApi, TaskApi};
use crate::error::ApiError;
use crate::models::{NewProject, NewTask, Project, Task, TaskStatus};

/// Trimmed text, `None` when nothing is left
fn optional_text(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Result of submitting a creation form
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome<T> {
    /// Required field empty; nothing was sent
    Invalid,
    Created(T),
    Failed(ApiError),
}

// ========================================================================
// New project
// ========================================================================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectDraft {
    pub open: bool,
    pub name: String,
    pub description: String,
    pub submitting: bool,
}

impl ProjectDraft {
    pub fn opened() -> Self {
        Self {
            open: true,
            ..Default::default()
        }
    }

    pub fn to_new_project(&self, owner_id: &str) -> Option<NewProject> {
        Some(NewProject {
            name: optional_text(&self.name)?,
            description: optional_text(&self.description),
            user_id: owner_id.to_string(),
        })
    }

    /// Record the outcome; only a successful create clears and closes the form
    pub fn settle<T>(&mut self, outcome: &SubmitOutcome<T>) {
        self.submitting = false;
        if matches!(outcome, SubmitOutcome::Created(_)) {
            *self = Self::default();
        }
    }
}

pub async fn submit_project<A: ProjectApi + ?Sized>(
    api: &A,
    draft: &ProjectDraft,
    owner_id: &str,
) -> SubmitOutcome<Project> {
    let Some(project) = draft.to_new_project(owner_id) else {
        return SubmitOutcome::Invalid;
    };
    match api.create_project(&project).await {
        Ok(created) => {
            log::info!("Created project {} ({})", created.name, created.id);
            SubmitOutcome::Created(created)
        }
        Err(e) => {
            log::warn!("Failed to create project: {}", e);
            SubmitOutcome::Failed(e)
        }
    }
}

// ========================================================================
// New task
// ========================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct TaskDraft {
    pub open: bool,
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub submitting: bool,
}

impl Default for TaskDraft {
    fn default() -> Self {
        Self {
            open: false,
            title: String::new(),
            description: String::new(),
            status: TaskStatus::Todo,
            submitting: false,
        }
    }
}

impl TaskDraft {
    pub fn opened() -> Self {
        Self {
            open: true,
            ..Default::default()
        }
    }

    pub fn to_new_task(&self, project_id: &str) -> Option<NewTask> {
        Some(NewTask {
            title: optional_text(&self.title)?,
            description: optional_text(&self.description),
            status: self.status,
            project_id: project_id.to_string(),
        })
    }

    pub fn settle<T>(&mut self, outcome: &SubmitOutcome<T>) {
        self.submitting = false;
        if matches!(outcome, SubmitOutcome::Created(_)) {
            *self = Self::default();
        }
    }
}

pub async fn submit_task<A: TaskApi + ?Sized>(api: &A, draft: &TaskDraft, project_id: &str) -> SubmitOutcome<Task> {
    let Some(task) = draft.to_new_task(project_id) else {
        return SubmitOutcome::Invalid;
    };
    match api.create_task(&task).await {
        Ok(created) => {
            log::info!("Created task {} in {}", created.id, created.status);
            SubmitOutcome::Created(created)
        }
        Err(e) => {
            log::warn!("Failed to create task: {}", e);
            SubmitOutcome::Failed(e)
        }
    }
}

// ========================================================================
// Project list
// ========================================================================

/// Visible projects plus the one awaiting delete confirmation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectList {
    pub projects: Vec<Project>,
    pub confirming: Option<String>,
}

impl ProjectList {
    pub fn new(projects: Vec<Project>) -> Self {
        Self {
            projects,
            confirming: None,
        }
    }

    /// Newly created projects go first, matching newest-first listing
    pub fn prepend(&mut self, project: Project) {
        self.projects.retain(|p| p.id != project.id);
        self.projects.insert(0, project);
    }

    pub fn request_delete(&mut self, project_id: &str) {
        if self.projects.iter().any(|p| p.id == project_id) {
            self.confirming = Some(project_id.to_string());
        }
    }

    pub fn cancel_delete(&mut self) {
        self.confirming = None;
    }

    pub fn is_confirming(&self, project_id: &str) -> bool {
        self.confirming.as_deref() == Some(project_id)
    }

    /// Id the user agreed to delete, if any
    pub fn confirm_delete(&mut self) -> Option<String> {
        self.confirming.take()
    }

    /// Drop a project after the backend delete succeeded
    pub fn remove(&mut self, project_id: &str) {
        self.projects.retain(|p| p.id != project_id);
    }
}

/// Delete a project taken from `ProjectList::confirm_delete`. The
/// confirmation is consumed before the request goes out, so a repeated
/// click finds nothing left to delete.
pub async fn delete_project<A: ProjectApi + ?Sized>(api: &A, project_id: String) -> Result<String, ApiError> {
    match api.delete_project(&project_id).await {
        Ok(()) => {
            log::info!("Deleted project {}", project_id);
            Ok(project_id)
        }
        Err(e) => {
            log::warn!("Failed to delete project {}: {}", project_id, e);
            Err(e)
        }
    }
}
