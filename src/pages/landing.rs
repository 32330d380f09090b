//! Landing Page

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::context::use_app_context;
use crate::routes::Route;
use crate::session::AuthState;
use crate::store::{store_set_auth, use_app_store, NoticeKind};

#[component]
pub fn LandingPage() -> impl IntoView {
    let ctx = use_app_context();
    let store = use_app_store();
    let (demo_loading, set_demo_loading) = signal(false);

    let try_demo = move |_| {
        if demo_loading.get_untracked() {
            return;
        }
        set_demo_loading.set(true);
        let auth = ctx.backend().auth();
        spawn_local(async move {
            match auth.sign_in_demo().await {
                Ok(session) => {
                    session.save();
                    store_set_auth(&store, AuthState::SignedIn(session));
                    ctx.notify(
                        NoticeKind::Success,
                        "Welcome to Demo!",
                        "You're now logged in with demo data. Feel free to explore!",
                    );
                }
                Err(e) => {
                    log::warn!("Demo sign-in failed: {}", e);
                    ctx.notify(
                        NoticeKind::Destructive,
                        "Demo Login Failed",
                        "Please try again or contact support",
                    );
                }
            }
            set_demo_loading.set(false);
        });
    };

    view! {
        <div class="landing">
            <h1>"Team Project Manager"</h1>
            <p class="landing-tagline">"Organize your projects with a simplified Trello-style board"</p>
            <div class="landing-actions">
                <button class="btn-primary" on:click=move |_| ctx.navigate(Route::Auth)>"Get Started"</button>
                <button class="btn-outline" on:click=move |_| ctx.navigate(Route::Auth)>"Sign In"</button>
                <button class="btn-secondary" disabled=move || demo_loading.get() on:click=try_demo>
                    {move || if demo_loading.get() { "Loading..." } else { "Try Demo" }}
                </button>
            </div>
            <p class="landing-note">"Demo account includes sample projects and tasks to explore the features"</p>
        </div>
    }
}
