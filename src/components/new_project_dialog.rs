//! New Project Dialog Component

use leptos::prelude::*;

use crate::forms::ProjectDraft;

#[component]
pub fn NewProjectDialog(draft: RwSignal<ProjectDraft>, #[prop(into)] on_submit: Callback<()>) -> impl IntoView {
    let submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        on_submit.run(());
    };
    let close = move |_| draft.set(ProjectDraft::default());

    view! {
        <Show when=move || draft.with(|d| d.open)>
            <div class="dialog-backdrop" on:click=close>
                <form class="dialog" on:click=|ev| ev.stop_propagation() on:submit=submit>
                    <h2>"Create New Project"</h2>
                    <label>
                        "Project Name"
                        <input
                            type="text"
                            placeholder="Enter project name"
                            prop:value=move || draft.with(|d| d.name.clone())
                            on:input=move |ev| {
                                let value = event_target_value(&ev);
                                draft.update(|d| d.name = value);
                            }
                        />
                    </label>
                    <label>
                        "Description"
                        <textarea
                            placeholder="Enter project description"
                            prop:value=move || draft.with(|d| d.description.clone())
                            on:input=move |ev| {
                                let value = event_target_value(&ev);
                                draft.update(|d| d.description = value);
                            }
                        />
                    </label>
                    <div class="dialog-actions">
                        <button type="button" class="btn-secondary" on:click=close>"Cancel"</button>
                        <button
                            type="submit"
                            class="btn-primary"
                            disabled=move || draft.with(|d| d.submitting)
                        >
                            {move || if draft.with(|d| d.submitting) { "Creating..." } else { "Create Project" }}
                        </button>
                    </div>
                </form>
            </div>
        </Show>
    }
}
