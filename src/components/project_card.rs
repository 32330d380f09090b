//! Project Card Component

use leptos::prelude::*;

use crate::components::DeleteConfirmButton;
use crate::models::Project;

#[component]
pub fn ProjectCard(
    project: Project,
    #[prop(into)] confirming: Signal<bool>,
    #[prop(into)] on_open: Callback<String>,
    #[prop(into)] on_request_delete: Callback<String>,
    #[prop(into)] on_cancel_delete: Callback<()>,
    #[prop(into)] on_confirm_delete: Callback<()>,
) -> impl IntoView {
    let open_id = project.id.clone();
    let delete_id = project.id.clone();
    let created = project.created_at.format("%b %-d, %Y").to_string();

    view! {
        <div class="project-card" on:click=move |_| on_open.run(open_id.clone())>
            <div class="project-card-header">
                <h3>{project.name.clone()}</h3>
                <DeleteConfirmButton
                    button_class="project-delete-btn"
                    prompt="Delete project? This cannot be undone."
                    confirming=confirming
                    on_request=move |_| on_request_delete.run(delete_id.clone())
                    on_cancel=on_cancel_delete
                    on_confirm=on_confirm_delete
                />
            </div>
            <p class="project-description">
                {project.description.clone().unwrap_or_else(|| "No description".to_string())}
            </p>
            <p class="project-created">"Created " {created}</p>
        </div>
    }
}
