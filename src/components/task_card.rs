//! Task Card Component
//!
//! Draggable card for one task, with a move menu and delete.

use leptos::prelude::*;
use leptos_dragdrop::{make_on_mousedown, DndSignals};

use crate::board::BoardTask;
use crate::components::DeleteConfirmButton;
use crate::models::TaskStatus;

#[component]
pub fn TaskCard(
    entry: BoardTask,
    dnd: DndSignals,
    #[prop(into)] on_move: Callback<(String, TaskStatus)>,
    #[prop(into)] on_delete: Callback<String>,
) -> impl IntoView {
    let task_id = entry.task.id.clone();
    let status = entry.task.status;
    let pending = entry.is_pending();
    let (menu_open, set_menu_open) = signal(false);
    let (confirming, set_confirming) = signal(false);

    let drag_id = task_id.clone();
    let is_dragging = move || dnd.is_dragging(&drag_id);
    let card_class = {
        let is_dragging = is_dragging.clone();
        move || {
            let mut class = String::from("task-card");
            if is_dragging() {
                class.push_str(" dragging");
            }
            if pending {
                class.push_str(" pending");
            }
            class
        }
    };
    let card_style = move || {
        if is_dragging() {
            let offset = dnd.offset_read.get();
            format!("transform: translate({}px, {}px);", offset.x, offset.y)
        } else {
            String::new()
        }
    };

    let delete_id = task_id.clone();
    let on_mousedown = make_on_mousedown(dnd, task_id.clone());
    let move_targets: Vec<TaskStatus> = TaskStatus::ALL.into_iter().filter(|s| *s != status).collect();

    view! {
        <div
            class=card_class
            style=card_style
            on:mousedown=on_mousedown
        >
            <div class="task-card-header">
                <h4 class="task-title">{entry.task.title.clone()}</h4>
                <div class="task-actions">
                    <button
                        class="task-menu-btn"
                        title="Move to"
                        on:click=move |ev| {
                            ev.stop_propagation();
                            set_menu_open.update(|open| *open = !*open);
                        }
                    >
                        "⋯"
                    </button>
                    <DeleteConfirmButton
                        button_class="task-delete-btn"
                        prompt="Delete?"
                        confirming=confirming
                        on_request=move |_| set_confirming.set(true)
                        on_cancel=move |_| set_confirming.set(false)
                        on_confirm=move |_| {
                            set_confirming.set(false);
                            on_delete.run(delete_id.clone());
                        }
                    />
                </div>
            </div>
            {entry.task.description.clone().map(|description| view! {
                <p class="task-description">{description}</p>
            })}
            <Show when=move || pending>
                <span class="task-pending">"Saving…"</span>
            </Show>
            <Show when=move || menu_open.get()>
                <div class="task-menu">
                    {move_targets.iter().map(|target| {
                        let target = *target;
                        let id = task_id.clone();
                        view! {
                            <button
                                class="task-menu-item"
                                on:click=move |ev| {
                                    ev.stop_propagation();
                                    set_menu_open.set(false);
                                    on_move.run((id.clone(), target));
                                }
                            >
                                {format!("Move to {}", target.title())}
                            </button>
                        }
                    }).collect_view()}
                </div>
            </Show>
        </div>
    }
}
