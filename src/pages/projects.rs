//! Projects Page
//!
//! The user's projects as cards, with creation and confirmed deletion.

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api::ProjectApi;
use crate::components::{NewProjectDialog, ProjectCard};
use crate::context::use_app_context;
use crate::forms::{delete_project, submit_project, ProjectDraft, ProjectList, SubmitOutcome};
use crate::routes::Route;
use crate::scope::CancelToken;
use crate::session::Session;
use crate::store::NoticeKind;

#[component]
pub fn ProjectsPage(session: Session) -> impl IntoView {
    let ctx = use_app_context();
    let list = RwSignal::new(ProjectList::default());
    let loading = RwSignal::new(true);
    let draft = RwSignal::new(ProjectDraft::default());
    let token = StoredValue::new(CancelToken::for_view());
    let rows = StoredValue::new_local(ctx.rows(&session));
    let owner_id = StoredValue::new(session.user_id().to_string());

    // Initial load
    {
        let rows = rows.get_value();
        let owner = owner_id.get_value();
        let token = token.get_value();
        spawn_local(async move {
            let result = rows.list_projects(&owner).await;
            let Some(result) = token.guard(result) else {
                return;
            };
            match result {
                Ok(projects) => {
                    log::debug!("Loaded {} projects", projects.len());
                    list.set(ProjectList::new(projects));
                }
                Err(e) => {
                    log::warn!("Failed to fetch projects: {}", e);
                    ctx.notify_error("Failed to fetch projects");
                }
            }
            loading.set(false);
        });
    }

    let create = Callback::new(move |_: ()| {
        let current = draft.get_untracked();
        if current.submitting {
            return;
        }
        let rows = rows.get_value();
        let owner = owner_id.get_value();
        let token = token.get_value();
        draft.update(|d| d.submitting = true);
        spawn_local(async move {
            let outcome = submit_project(&rows, &current, &owner).await;
            if token.is_cancelled() {
                return;
            }
            match &outcome {
                SubmitOutcome::Created(project) => {
                    list.update(|l| l.prepend(project.clone()));
                    ctx.notify_success("Project created successfully");
                }
                SubmitOutcome::Failed(_) => ctx.notify_error("Failed to create project"),
                SubmitOutcome::Invalid => {}
            }
            draft.update(|d| d.settle(&outcome));
        });
    });

    let confirm_delete = Callback::new(move |_: ()| {
        let Some(project_id) = list.try_update(|l| l.confirm_delete()).flatten() else {
            return;
        };
        let rows = rows.get_value();
        let token = token.get_value();
        spawn_local(async move {
            let result = delete_project(&rows, project_id).await;
            if token.is_cancelled() {
                return;
            }
            match result {
                Ok(project_id) => {
                    list.update(|l| l.remove(&project_id));
                    ctx.notify(NoticeKind::Success, "Deleted", "Project deleted successfully");
                }
                Err(_) => ctx.notify_error("Failed to delete project"),
            }
        });
    });

    view! {
        <div class="projects-page">
            <div class="page-header">
                <div>
                    <h1>"Projects"</h1>
                    <p class="page-subtitle">"Manage your team projects"</p>
                </div>
                <button class="btn-primary" on:click=move |_| draft.set(ProjectDraft::opened())>
                    "New Project"
                </button>
            </div>

            <Show when=move || !loading.get() fallback=|| view! { <p class="loading">"Loading projects..."</p> }>
                <Show
                    when=move || list.with(|l| !l.projects.is_empty())
                    fallback=move || view! {
                        <div class="empty-state">
                            <h3>"No projects yet"</h3>
                            <p>"Create your first project to get started"</p>
                            <button class="btn-primary" on:click=move |_| draft.set(ProjectDraft::opened())>
                                "Create Project"
                            </button>
                        </div>
                    }
                >
                    <div class="project-grid">
                        <For
                            each=move || list.with(|l| l.projects.clone())
                            key=|project| project.id.clone()
                            children=move |project| {
                                let id = project.id.clone();
                                view! {
                                    <ProjectCard
                                        project=project
                                        confirming=Signal::derive(move || list.with(|l| l.is_confirming(&id)))
                                        on_open=move |project_id: String| ctx.navigate(Route::Board(project_id))
                                        on_request_delete=move |project_id: String| {
                                            list.update(|l| l.request_delete(&project_id))
                                        }
                                        on_cancel_delete=move |_| list.update(|l| l.cancel_delete())
                                        on_confirm_delete=confirm_delete
                                    />
                                }
                            }
                        />
                    </div>
                </Show>
            </Show>

            <NewProjectDialog draft=draft on_submit=create />
        </div>
    }
}
