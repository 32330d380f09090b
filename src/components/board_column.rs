//! Board Column Component
//!
//! One status column; registered as a drop target under the status name.

use leptos::html;
use leptos::prelude::*;
use leptos_dragdrop::{register_droppable, DndSignals};

use crate::board::BoardTask;
use crate::components::TaskCard;
use crate::models::TaskStatus;

#[component]
pub fn BoardColumn(
    status: TaskStatus,
    #[prop(into)] tasks: Signal<Vec<BoardTask>>,
    dnd: DndSignals,
    #[prop(into)] on_move: Callback<(String, TaskStatus)>,
    #[prop(into)] on_delete: Callback<String>,
) -> impl IntoView {
    let node = NodeRef::<html::Div>::new();
    let droppable_id = status.as_str().to_string();
    register_droppable(dnd, droppable_id.clone(), node);

    let is_over = move || dnd.is_target(&droppable_id);
    let count = move || tasks.with(|t| t.len());

    view! {
        <section class=format!("board-column {}", status.css_class())>
            <header class="column-header">
                <h3>{status.title()}</h3>
                <span class="column-count">{count}</span>
            </header>
            <div
                node_ref=node
                class=move || if is_over() { "column-drop-area drop-target" } else { "column-drop-area" }
            >
                <Show
                    when=move || { count() > 0 }
                    fallback=|| view! { <p class="column-empty">"No tasks"</p> }
                >
                    <For
                        each=move || tasks.get()
                        key=|entry| {
                            (
                                entry.task.id.clone(),
                                entry.task.title.clone(),
                                entry.task.description.clone(),
                                entry.is_pending(),
                            )
                        }
                        children=move |entry| {
                            view! {
                                <TaskCard entry=entry dnd=dnd on_move=on_move on_delete=on_delete />
                            }
                        }
                    />
                </Show>
            </div>
        </section>
    }
}
