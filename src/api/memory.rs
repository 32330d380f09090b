//! In-memory backend for tests. Records every request it receives.

use std::cell::{Cell, RefCell};

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};

use super::{ProjectApi, TaskApi};
use crate::error::{ApiError, ApiResult};
use crate::models::{DashboardStats, NewProject, NewTask, Project, Task, TaskStatus};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    ListProjects { owner_id: String },
    GetProject { project_id: String },
    CreateProject(NewProject),
    DeleteProject { project_id: String },
    DashboardStats { owner_id: String },
    ListTasks { project_id: String },
    CreateTask(NewTask),
    UpdateTaskStatus { task_id: String, status: TaskStatus },
    DeleteTask { task_id: String },
}

impl Call {
    pub fn is_write(&self) -> bool {
        matches!(
            self,
            Call::CreateProject(_)
                | Call::DeleteProject { .. }
                | Call::CreateTask(_)
                | Call::UpdateTaskStatus { .. }
                | Call::DeleteTask { .. }
        )
    }
}

#[derive(Default)]
pub struct MemoryBackend {
    pub projects: RefCell<Vec<Project>>,
    pub tasks: RefCell<Vec<Task>>,
    calls: RefCell<Vec<Call>>,
    next_id: Cell<u32>,
    fail_next: RefCell<Option<ApiError>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn writes(&self) -> Vec<Call> {
        self.calls.borrow().iter().filter(|c| c.is_write()).cloned().collect()
    }

    /// Make the next request fail with `error`
    pub fn fail_next(&self, error: ApiError) {
        *self.fail_next.borrow_mut() = Some(error);
    }

    /// Seed a task row directly, bypassing the call log
    pub fn seed_task(&self, project_id: &str, title: &str, status: TaskStatus) -> Task {
        let task = Task {
            id: self.fresh_id("t"),
            project_id: project_id.to_string(),
            title: title.to_string(),
            description: None,
            status,
            created_at: self.now(),
        };
        self.tasks.borrow_mut().push(task.clone());
        task
    }

    fn record(&self, call: Call) -> ApiResult<()> {
        self.calls.borrow_mut().push(call);
        match self.fail_next.borrow_mut().take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    fn fresh_id(&self, prefix: &str) -> String {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        format!("{}-{}", prefix, id)
    }

    /// Strictly increasing timestamps so newest-first ordering is stable
    fn now(&self) -> DateTime<Utc> {
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap();
        base + Duration::seconds(self.next_id.get() as i64)
    }
}

#[async_trait(?Send)]
impl ProjectApi for MemoryBackend {
    async fn list_projects(&self, owner_id: &str) -> ApiResult<Vec<Project>> {
        self.record(Call::ListProjects { owner_id: owner_id.to_string() })?;
        let mut projects: Vec<Project> = self
            .projects
            .borrow()
            .iter()
            .filter(|p| p.user_id == owner_id)
            .cloned()
            .collect();
        projects.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(projects)
    }

    async fn get_project(&self, project_id: &str, owner_id: &str) -> ApiResult<Project> {
        self.record(Call::GetProject { project_id: project_id.to_string() })?;
        self.projects
            .borrow()
            .iter()
            .find(|p| p.id == project_id && p.user_id == owner_id)
            .cloned()
            .ok_or(ApiError::NotFound)
    }

    async fn create_project(&self, project: &NewProject) -> ApiResult<Project> {
        self.record(Call::CreateProject(project.clone()))?;
        let row = Project {
            id: self.fresh_id("p"),
            user_id: project.user_id.clone(),
            name: project.name.clone(),
            description: project.description.clone(),
            created_at: self.now(),
        };
        self.projects.borrow_mut().push(row.clone());
        Ok(row)
    }

    async fn delete_project(&self, project_id: &str) -> ApiResult<()> {
        self.record(Call::DeleteProject { project_id: project_id.to_string() })?;
        self.projects.borrow_mut().retain(|p| p.id != project_id);
        self.tasks.borrow_mut().retain(|t| t.project_id != project_id);
        Ok(())
    }

    async fn dashboard_stats(&self, owner_id: &str) -> ApiResult<DashboardStats> {
        self.record(Call::DashboardStats { owner_id: owner_id.to_string() })?;
        let projects = self.projects.borrow();
        let owned: Vec<&str> = projects
            .iter()
            .filter(|p| p.user_id == owner_id)
            .map(|p| p.id.as_str())
            .collect();
        let statuses: Vec<TaskStatus> = self
            .tasks
            .borrow()
            .iter()
            .filter(|t| owned.contains(&t.project_id.as_str()))
            .map(|t| t.status)
            .collect();
        Ok(DashboardStats::from_rows(owned.len(), &statuses))
    }
}

#[async_trait(?Send)]
impl TaskApi for MemoryBackend {
    async fn list_tasks(&self, project_id: &str) -> ApiResult<Vec<Task>> {
        self.record(Call::ListTasks { project_id: project_id.to_string() })?;
        let mut tasks: Vec<Task> = self
            .tasks
            .borrow()
            .iter()
            .filter(|t| t.project_id == project_id)
            .cloned()
            .collect();
        tasks.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(tasks)
    }

    async fn create_task(&self, task: &NewTask) -> ApiResult<Task> {
        self.record(Call::CreateTask(task.clone()))?;
        let row = Task {
            id: self.fresh_id("t"),
            project_id: task.project_id.clone(),
            title: task.title.clone(),
            description: task.description.clone(),
            status: task.status,
            created_at: self.now(),
        };
        self.tasks.borrow_mut().push(row.clone());
        Ok(row)
    }

    async fn update_task_status(&self, task_id: &str, status: TaskStatus) -> ApiResult<Task> {
        self.record(Call::UpdateTaskStatus { task_id: task_id.to_string(), status })?;
        let mut tasks = self.tasks.borrow_mut();
        let task = tasks.iter_mut().find(|t| t.id == task_id).ok_or(ApiError::NotFound)?;
        task.status = status;
        Ok(task.clone())
    }

    async fn delete_task(&self, task_id: &str) -> ApiResult<()> {
        self.record(Call::DeleteTask { task_id: task_id.to_string() })?;
        self.tasks.borrow_mut().retain(|t| t.id != task_id);
        Ok(())
    }
}
