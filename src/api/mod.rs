//! Backend Access
//!
//! Data-access traits the pages program against, and their
//! implementation over the hosted backend's REST surface.
//! Every call is one request/response round trip; failures come back as
//! `ApiError` and are never retried here.

mod auth;
mod query;
mod rest;

#[cfg(test)]
pub mod memory;

use async_trait::async_trait;

use crate::error::ApiResult;
use crate::models::{DashboardStats, NewProject, NewTask, Project, Task, TaskStatus};

pub use auth::{AuthClient, SignUpOutcome};
pub use query::{RowQuery, PROJECTS, TASKS};
pub use rest::{Backend, RowClient};

/// Project table operations, always scoped to the owner
#[async_trait(?Send)]
pub trait ProjectApi {
    /// Owner's projects, newest first
    async fn list_projects(&self, owner_id: &str) -> ApiResult<Vec<Project>>;

    /// One project, `ApiError::NotFound` unless it exists and is owned by `owner_id`
    async fn get_project(&self, project_id: &str, owner_id: &str) -> ApiResult<Project>;

    async fn create_project(&self, project: &NewProject) -> ApiResult<Project>;

    /// Tasks are removed by the backend's cascade
    async fn delete_project(&self, project_id: &str) -> ApiResult<()>;

    async fn dashboard_stats(&self, owner_id: &str) -> ApiResult<DashboardStats>;
}

/// Task table operations
#[async_trait(?Send)]
pub trait TaskApi {
    /// Project's tasks, newest first
    async fn list_tasks(&self, project_id: &str) -> ApiResult<Vec<Task>>;

    async fn create_task(&self, task: &NewTask) -> ApiResult<Task>;

    /// Returns the updated row
    async fn update_task_status(&self, task_id: &str, status: TaskStatus) -> ApiResult<Task>;

    async fn delete_task(&self, task_id: &str) -> ApiResult<()>;
}
