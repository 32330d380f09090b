//! New Task Dialog Component
//!
//! Title, description and initial column for a new task.

use leptos::prelude::*;

use crate::forms::TaskDraft;
use crate::models::TaskStatus;

#[component]
pub fn NewTaskDialog(draft: RwSignal<TaskDraft>, #[prop(into)] on_submit: Callback<()>) -> impl IntoView {
    let submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        on_submit.run(());
    };
    let close = move |_| draft.set(TaskDraft::default());

    view! {
        <Show when=move || draft.with(|d| d.open)>
            <div class="dialog-backdrop" on:click=close>
                <form class="dialog" on:click=|ev| ev.stop_propagation() on:submit=submit>
                    <h2>"Create New Task"</h2>
                    <label>
                        "Title"
                        <input
                            type="text"
                            placeholder="Enter task title"
                            prop:value=move || draft.with(|d| d.title.clone())
                            on:input=move |ev| {
                                let value = event_target_value(&ev);
                                draft.update(|d| d.title = value);
                            }
                        />
                    </label>
                    <label>
                        "Description"
                        <textarea
                            placeholder="Enter task description"
                            prop:value=move || draft.with(|d| d.description.clone())
                            on:input=move |ev| {
                                let value = event_target_value(&ev);
                                draft.update(|d| d.description = value);
                            }
                        />
                    </label>
                    <label>
                        "Status"
                        <select
                            prop:value=move || draft.with(|d| d.status.as_str().to_string())
                            on:change=move |ev| {
                                if let Ok(status) = event_target_value(&ev).parse::<TaskStatus>() {
                                    draft.update(|d| d.status = status);
                                }
                            }
                        >
                            {TaskStatus::ALL.into_iter().map(|status| view! {
                                <option value=status.as_str()>{status.title()}</option>
                            }).collect_view()}
                        </select>
                    </label>
                    <div class="dialog-actions">
                        <button type="button" class="btn-secondary" on:click=close>"Cancel"</button>
                        <button
                            type="submit"
                            class="btn-primary"
                            disabled=move || draft.with(|d| d.submitting)
                        >
                            {move || if draft.with(|d| d.submitting) { "Creating..." } else { "Create Task" }}
                        </button>
                    </div>
                </form>
            </div>
        </Show>
    }
}
