//! Project Board Page
//!
//! Kanban view of one project. Loads the project and its tasks, keeps
//! them live through the realtime channel, and moves tasks between
//! columns by drag-and-drop or the card menu.

use futures::channel::mpsc;
use futures::StreamExt;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_dragdrop::{bind_global_listeners, create_dnd_signals};

use crate::api::{ProjectApi, TaskApi};
use crate::board::{dispatch_move, handle_drop, BoardEvent, BoardState, MoveCommand};
use crate::components::{BoardColumn, NewTaskDialog};
use crate::context::{use_app_context, AppContext};
use crate::error::ApiError;
use crate::forms::{submit_task, SubmitOutcome, TaskDraft};
use crate::models::{Project, TaskStatus};
use crate::realtime::{FeedHealth, RealtimeEvent, RealtimeSubscription};
use crate::routes::Route;
use crate::scope::{CancelToken, GuardSlot};
use crate::session::Session;
use crate::store::NoticeKind;

#[component]
pub fn ProjectBoardPage(session: Session, #[prop(into)] project_id: Signal<String>) -> impl IntoView {
    let ctx = use_app_context();
    let board = RwSignal::new(BoardState::default());
    let project = RwSignal::new(None::<Project>);
    let loading = RwSignal::new(true);
    let draft = RwSignal::new(TaskDraft::default());
    let dnd = create_dnd_signals();

    let rows = StoredValue::new_local(ctx.rows(&session));
    let session = StoredValue::new(session);
    let token = StoredValue::new(CancelToken::new());
    let subscription = StoredValue::new_local(GuardSlot::<RealtimeSubscription>::new());

    on_cleanup(move || {
        token.try_with_value(|t| t.cancel());
        subscription.try_update_value(|slot| slot.release());
    });

    // Load the project, then its tasks, then go live. Re-runs when the id
    // changes; everything belonging to the previous id is released first.
    Effect::new(move |_| {
        let id = project_id.get();
        if id.is_empty() {
            return;
        }

        token.with_value(|t| t.cancel());
        subscription.update_value(|slot| slot.release());
        let view_token = CancelToken::new();
        token.set_value(view_token.clone());
        loading.set(true);

        let rows = rows.get_value();
        let session = session.get_value();
        spawn_local(async move {
            let loaded = match rows.get_project(&id, session.user_id()).await {
                Ok(found) => match rows.list_tasks(&id).await {
                    Ok(tasks) => Ok((found, tasks)),
                    Err(e) => Err(e),
                },
                Err(e) => Err(e),
            };
            let Some(loaded) = view_token.guard(loaded) else {
                return;
            };

            let (found, tasks) = match loaded {
                Ok(pair) => pair,
                Err(ApiError::NotFound) => {
                    log::warn!("Project {} not found or not owned", id);
                    ctx.notify_error("Project not found");
                    ctx.navigate(Route::Projects);
                    return;
                }
                Err(e) => {
                    log::warn!("Failed to fetch project data: {}", e);
                    ctx.notify_error("Failed to fetch project data");
                    ctx.navigate(Route::Projects);
                    return;
                }
            };

            log::info!("Board {} loaded with {} tasks", found.name, tasks.len());
            project.set(Some(found));
            board.update(|b| b.apply(BoardEvent::Loaded(tasks)));
            loading.set(false);

            let (events_tx, events_rx) = mpsc::unbounded();
            let config = ctx.config();
            let opened = subscription
                .try_update_value(|slot| slot.acquire(|| RealtimeSubscription::open(&config, &session, &id, events_tx)));
            match opened {
                Some(Ok(())) => consume_realtime(events_rx, board, view_token, ctx),
                Some(Err(e)) => {
                    log::warn!("Realtime unavailable: {}", e);
                    live_updates_unavailable(ctx);
                }
                None => {}
            }
        });
    });

    let send_move = move |command: MoveCommand| {
        let rows = rows.get_value();
        let view_token = token.get_value();
        spawn_local(async move {
            let event = dispatch_move(&rows, command).await;
            if view_token.is_cancelled() {
                return;
            }
            if matches!(event, BoardEvent::MoveFailed { .. }) {
                ctx.notify_error("Failed to update task");
            }
            board.update(|b| b.apply(event));
        });
    };

    let on_move = Callback::new(move |(task_id, status): (String, TaskStatus)| {
        if let Some(command) = board.try_update(|b| b.begin_move(&task_id, status)).flatten() {
            send_move(command);
        }
    });

    let listeners = bind_global_listeners(dnd, move |dragged, droppable| {
        let command = board
            .try_update(|b| handle_drop(b, &dragged, Some(&droppable)))
            .flatten();
        if let Some(command) = command {
            send_move(command);
        }
    });
    let _listeners = StoredValue::new_local(listeners);

    let on_delete = Callback::new(move |task_id: String| {
        let rows = rows.get_value();
        let view_token = token.get_value();
        spawn_local(async move {
            let result = rows.delete_task(&task_id).await;
            let Some(result) = view_token.guard(result) else {
                return;
            };
            match result {
                Ok(()) => {
                    board.update(|b| b.apply(BoardEvent::Removed { id: task_id }));
                    ctx.notify_success("Task deleted successfully");
                }
                Err(e) => {
                    log::warn!("Failed to delete task {}: {}", task_id, e);
                    ctx.notify_error("Failed to delete task");
                }
            }
        });
    });

    let create = Callback::new(move |_: ()| {
        let current = draft.get_untracked();
        if current.submitting {
            return;
        }
        let rows = rows.get_value();
        let view_token = token.get_value();
        let id = project_id.get_untracked();
        draft.update(|d| d.submitting = true);
        spawn_local(async move {
            let outcome = submit_task(&rows, &current, &id).await;
            if view_token.is_cancelled() {
                return;
            }
            match &outcome {
                SubmitOutcome::Created(task) => {
                    board.update(|b| b.apply(BoardEvent::Created(task.clone())));
                    ctx.notify_success("Task created successfully");
                }
                SubmitOutcome::Failed(_) => ctx.notify_error("Failed to create task"),
                SubmitOutcome::Invalid => {}
            }
            draft.update(|d| d.settle(&outcome));
        });
    });

    let column_view = move |status: TaskStatus| {
        let tasks = Memo::new(move |_| board.with(|b| b.column(status).into_iter().cloned().collect::<Vec<_>>()));
        view! {
            <BoardColumn status=status tasks=tasks dnd=dnd on_move=on_move on_delete=on_delete />
        }
    };

    view! {
        <div class="board-page">
            <Show
                when=move || !loading.get()
                fallback=|| view! { <p class="loading">"Loading board..."</p> }
            >
                <div class="page-header">
                    <div>
                        <button class="btn-link" on:click=move |_| ctx.navigate(Route::Projects)>
                            "← Back to Projects"
                        </button>
                        <h1>{move || project.with(|p| p.as_ref().map(|p| p.name.clone()).unwrap_or_default())}</h1>
                        <p class="page-subtitle">
                            {move || project.with(|p| p.as_ref().and_then(|p| p.description.clone()).unwrap_or_default())}
                        </p>
                    </div>
                    <button class="btn-primary" on:click=move |_| draft.set(TaskDraft::opened())>
                        "Add Task"
                    </button>
                </div>
                <div class="board-columns">
                    {TaskStatus::ALL.into_iter().map(column_view).collect_view()}
                </div>
            </Show>
            <NewTaskDialog draft=draft on_submit=create />
        </div>
    }
}

/// Apply realtime changes until the view goes away
fn consume_realtime(
    mut events: mpsc::UnboundedReceiver<RealtimeEvent>,
    board: RwSignal<BoardState>,
    view_token: CancelToken,
    ctx: AppContext,
) {
    spawn_local(async move {
        let mut health = FeedHealth::default();
        while let Some(event) = events.next().await {
            if view_token.is_cancelled() {
                break;
            }
            if health.should_report(&event) {
                live_updates_unavailable(ctx);
            }
            match event {
                RealtimeEvent::Change(change) => board.update(|b| b.apply(BoardEvent::Remote(change))),
                RealtimeEvent::Subscribed => {}
                RealtimeEvent::Failed(e) => log::warn!("Realtime channel failed: {}", e),
            }
        }
    });
}

fn live_updates_unavailable(ctx: AppContext) {
    ctx.notify(
        NoticeKind::Info,
        "Live updates unavailable",
        "Showing the last loaded tasks. Reload to try again.",
    );
}
