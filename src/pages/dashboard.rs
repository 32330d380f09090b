//! Dashboard Page
//!
//! Project and task counters for the signed-in user.

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api::ProjectApi;
use crate::context::use_app_context;
use crate::models::DashboardStats;
use crate::routes::Route;
use crate::scope::CancelToken;
use crate::session::Session;

#[component]
fn StatCard(
    title: &'static str,
    #[prop(into)] value: Signal<Option<usize>>,
    #[prop(into)] caption: Signal<String>,
) -> impl IntoView {
    view! {
        <div class="stat-card">
            <h3 class="stat-title">{title}</h3>
            <div class="stat-value">
                {move || value.get().map(|v| v.to_string()).unwrap_or_else(|| "...".to_string())}
            </div>
            <p class="stat-caption">{move || caption.get()}</p>
        </div>
    }
}

#[component]
pub fn DashboardPage(session: Session) -> impl IntoView {
    let ctx = use_app_context();
    let stats = RwSignal::new(None::<DashboardStats>);
    let token = CancelToken::for_view();

    let rows = ctx.rows(&session);
    let owner_id = session.user_id().to_string();
    spawn_local(async move {
        let result = rows.dashboard_stats(&owner_id).await;
        let Some(result) = token.guard(result) else {
            return;
        };
        match result {
            Ok(loaded) => stats.set(Some(loaded)),
            Err(e) => {
                log::warn!("Failed to fetch dashboard statistics: {}", e);
                ctx.notify_error("Failed to fetch dashboard statistics");
                stats.set(Some(DashboardStats::default()));
            }
        }
    });

    view! {
        <div class="dashboard">
            <div class="page-header">
                <h1>"Dashboard"</h1>
                <p class="page-subtitle">"Welcome to your Team Project Manager"</p>
            </div>
            <div class="stat-grid">
                <StatCard
                    title="Total Projects"
                    value=Signal::derive(move || stats.get().map(|s| s.total_projects))
                    caption=Signal::derive(move || stats.get().unwrap_or_default().projects_caption())
                />
                <StatCard
                    title="Active Tasks"
                    value=Signal::derive(move || stats.get().map(|s| s.active_tasks))
                    caption=Signal::derive(|| "Tasks in progress".to_string())
                />
                <StatCard
                    title="Completed Tasks"
                    value=Signal::derive(move || stats.get().map(|s| s.completed_tasks))
                    caption=Signal::derive(|| "Tasks completed".to_string())
                />
            </div>
            <div class="quick-actions">
                <h2>"Quick Actions"</h2>
                <button class="btn-primary" on:click=move |_| ctx.navigate(Route::Projects)>
                    "View All Projects"
                </button>
                <button class="btn-outline" on:click=move |_| ctx.navigate(Route::Projects)>
                    "Create New Project"
                </button>
            </div>
        </div>
    }
}
