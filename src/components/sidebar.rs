//! Sidebar Component
//!
//! Navigation for signed-in pages: section links, collapse toggle, sign out.

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::context::use_app_context;
use crate::routes::Route;
use crate::session::{AuthState, Session};
use crate::store::{store_set_auth, store_toggle_sidebar, use_app_store, AppStateStoreFields};

const SECTIONS: &[(&str, &str)] = &[
    ("/dashboard", "Dashboard"),
    ("/projects", "Projects"),
    ("/settings", "Settings"),
];

#[component]
pub fn Sidebar() -> impl IntoView {
    let ctx = use_app_context();
    let store = use_app_store();
    let collapsed = move || store.sidebar_collapsed().get();
    let current_section = move || store.route().get().section();

    let sign_out = move |_| {
        let auth = ctx.backend().auth();
        let session = store.auth().get_untracked().session().cloned();
        Session::clear();
        store_set_auth(&store, AuthState::SignedOut);
        ctx.navigate(Route::Landing);
        if let Some(session) = session {
            spawn_local(async move {
                if let Err(e) = auth.sign_out(&session).await {
                    log::warn!("Server-side sign out failed: {}", e);
                }
            });
        }
    };

    view! {
        <aside class=move || if collapsed() { "sidebar collapsed" } else { "sidebar" }>
            <div class="sidebar-header">
                <Show when=move || !collapsed()>
                    <span class="sidebar-brand">"TeamBoard"</span>
                </Show>
                <button
                    class="sidebar-toggle"
                    title="Toggle sidebar"
                    on:click=move |_| store_toggle_sidebar(&store)
                >
                    {move || if collapsed() { "»" } else { "«" }}
                </button>
            </div>

            <nav class="sidebar-nav">
                {SECTIONS.iter().map(|(path, label)| {
                    let route = Route::parse(path);
                    let section = route.clone();
                    let is_active = move || current_section() == Some(section.clone());
                    view! {
                        <button
                            class=move || if is_active() { "nav-link active" } else { "nav-link" }
                            title=*label
                            on:click=move |_| ctx.navigate(route.clone())
                        >
                            <span class="nav-initial">{label.chars().next().unwrap_or(' ').to_string()}</span>
                            <Show when=move || !collapsed()>
                                <span class="nav-label">{*label}</span>
                            </Show>
                        </button>
                    }
                }).collect_view()}
            </nav>

            <button class="sign-out-btn" on:click=sign_out>
                {move || if collapsed() { "⎋" } else { "Sign Out" }}
            </button>
        </aside>
    }
}

/// Sidebar plus page content
#[component]
pub fn Layout(children: Children) -> impl IntoView {
    view! {
        <div class="app-layout">
            <Sidebar />
            <main class="main-content">{children()}</main>
        </div>
    }
}
