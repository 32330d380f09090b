//! REST Row Client
//!
//! `ProjectApi` / `TaskApi` over the backend's PostgREST endpoint.

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::query::{RowQuery, PROJECTS, TASKS};
use super::{AuthClient, ProjectApi, TaskApi};
use crate::config::BackendConfig;
use crate::error::{ApiError, ApiResult};
use crate::models::{DashboardStats, NewProject, NewTask, Project, Task, TaskStatus};
use crate::session::Session;

const SINGLE_OBJECT: &str = "application/vnd.pgrst.object+json";
const RETURN_REPRESENTATION: &str = "return=representation";

/// Handle to the hosted backend; cheap to clone
#[derive(Clone)]
pub struct Backend {
    http: reqwest::Client,
    config: BackendConfig,
}

impl Backend {
    pub fn new(config: BackendConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    pub fn config(&self) -> &BackendConfig {
        &self.config
    }

    /// Row access authorized as the session's user
    pub fn rows(&self, session: &Session) -> RowClient {
        RowClient {
            http: self.http.clone(),
            config: self.config.clone(),
            access_token: session.access_token.clone(),
        }
    }

    pub fn auth(&self) -> AuthClient {
        AuthClient::new(self.http.clone(), self.config.clone())
    }
}

/// Row client bound to one access token
#[derive(Clone)]
pub struct RowClient {
    http: reqwest::Client,
    config: BackendConfig,
    access_token: String,
}

#[derive(Serialize)]
struct StatusPatch {
    status: TaskStatus,
}

#[derive(Deserialize)]
struct IdRow {
    id: String,
}

#[derive(Deserialize)]
struct StatusRow {
    status: TaskStatus,
}

impl RowClient {
    fn request(&self, method: Method, query: &RowQuery) -> ApiResult<RequestBuilder> {
        if !self.config.is_configured() {
            return Err(ApiError::Config("set the backend URL and anon key in Settings".to_string()));
        }
        let mut builder = self
            .http
            .request(method, self.config.rest_url(query.name()))
            .header("apikey", &self.config.anon_key)
            .bearer_auth(&self.access_token)
            .query(&query.params());
        if query.is_single() {
            builder = builder.header("Accept", SINGLE_OBJECT);
        }
        Ok(builder)
    }

    async fn fetch_rows<T: DeserializeOwned>(&self, query: &RowQuery) -> ApiResult<Vec<T>> {
        let response = check(self.request(Method::GET, query)?.send().await?).await?;
        Ok(response.json().await?)
    }

    async fn fetch_one<T: DeserializeOwned>(&self, query: &RowQuery) -> ApiResult<T> {
        let response = check(self.request(Method::GET, &query.clone().single())?.send().await?).await?;
        Ok(response.json().await?)
    }

    async fn insert_one<T: DeserializeOwned, B: Serialize>(&self, table: &'static str, body: &B) -> ApiResult<T> {
        let query = RowQuery::table(table).select("*").single();
        let response = self
            .request(Method::POST, &query)?
            .header("Prefer", RETURN_REPRESENTATION)
            .json(body)
            .send()
            .await?;
        Ok(check(response).await?.json().await?)
    }

    async fn update_one<T: DeserializeOwned, B: Serialize>(&self, query: &RowQuery, body: &B) -> ApiResult<T> {
        let response = self
            .request(Method::PATCH, &query.clone().single())?
            .header("Prefer", RETURN_REPRESENTATION)
            .json(body)
            .send()
            .await?;
        Ok(check(response).await?.json().await?)
    }

    async fn delete(&self, query: &RowQuery) -> ApiResult<()> {
        check(self.request(Method::DELETE, query)?.send().await?).await?;
        Ok(())
    }
}

#[async_trait(?Send)]
impl ProjectApi for RowClient {
    async fn list_projects(&self, owner_id: &str) -> ApiResult<Vec<Project>> {
        let query = RowQuery::table(PROJECTS)
            .select("*")
            .eq("user_id", owner_id)
            .order_by("created_at", false);
        self.fetch_rows(&query).await
    }

    async fn get_project(&self, project_id: &str, owner_id: &str) -> ApiResult<Project> {
        let query = RowQuery::table(PROJECTS)
            .select("*")
            .eq("id", project_id)
            .eq("user_id", owner_id);
        self.fetch_one(&query).await
    }

    async fn create_project(&self, project: &NewProject) -> ApiResult<Project> {
        self.insert_one(PROJECTS, project).await
    }

    async fn delete_project(&self, project_id: &str) -> ApiResult<()> {
        self.delete(&RowQuery::table(PROJECTS).eq("id", project_id)).await
    }

    async fn dashboard_stats(&self, owner_id: &str) -> ApiResult<DashboardStats> {
        let projects: Vec<IdRow> = self
            .fetch_rows(&RowQuery::table(PROJECTS).select("id").eq("user_id", owner_id))
            .await?;
        if projects.is_empty() {
            return Ok(DashboardStats::default());
        }

        let ids: Vec<&str> = projects.iter().map(|p| p.id.as_str()).collect();
        let tasks: Vec<StatusRow> = self
            .fetch_rows(&RowQuery::table(TASKS).select("status").in_list("project_id", &ids))
            .await?;
        let statuses: Vec<TaskStatus> = tasks.into_iter().map(|t| t.status).collect();
        Ok(DashboardStats::from_rows(projects.len(), &statuses))
    }
}

#[async_trait(?Send)]
impl TaskApi for RowClient {
    async fn list_tasks(&self, project_id: &str) -> ApiResult<Vec<Task>> {
        let query = RowQuery::table(TASKS)
            .select("*")
            .eq("project_id", project_id)
            .order_by("created_at", false);
        self.fetch_rows(&query).await
    }

    async fn create_task(&self, task: &NewTask) -> ApiResult<Task> {
        self.insert_one(TASKS, task).await
    }

    async fn update_task_status(&self, task_id: &str, status: TaskStatus) -> ApiResult<Task> {
        let query = RowQuery::table(TASKS).select("*").eq("id", task_id);
        self.update_one(&query, &StatusPatch { status }).await
    }

    async fn delete_task(&self, task_id: &str) -> ApiResult<()> {
        self.delete(&RowQuery::table(TASKS).eq("id", task_id)).await
    }
}

/// Pass successful responses through, turn the rest into `ApiError`
pub(crate) async fn check(response: Response) -> ApiResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(classify_error(status.as_u16(), &body))
}

/// Map an error status and body (PostgREST or auth style) to `ApiError`
pub(crate) fn classify_error(status: u16, body: &str) -> ApiError {
    let parsed: serde_json::Value = serde_json::from_str(body).unwrap_or(serde_json::Value::Null);
    let field = |name: &str| -> Option<String> {
        match parsed.get(name)? {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    };

    let code = field("error_code").or_else(|| field("code")).or_else(|| field("error"));
    // PGRST116: single-row request matched zero rows
    if status == 406 || code.as_deref() == Some("PGRST116") {
        return ApiError::NotFound;
    }
    if status == 401 {
        return ApiError::Unauthorized;
    }

    let message = field("message")
        .or_else(|| field("msg"))
        .or_else(|| field("error_description"))
        .or_else(|| code.clone())
        .unwrap_or_else(|| format!("HTTP {}", status));
    ApiError::Backend { status, code, message }
}
