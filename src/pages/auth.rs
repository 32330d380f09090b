//! Auth Page
//!
//! Email/password sign-in with a toggle to sign-up.

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api::SignUpOutcome;
use crate::context::use_app_context;
use crate::routes::Route;
use crate::session::AuthState;
use crate::store::{store_set_auth, use_app_store, NoticeKind};

#[component]
pub fn AuthPage() -> impl IntoView {
    let ctx = use_app_context();
    let store = use_app_store();
    let (email, set_email) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (signing_up, set_signing_up) = signal(false);
    let (busy, set_busy) = signal(false);

    let submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let email = email.get_untracked().trim().to_string();
        let password = password.get_untracked();
        if email.is_empty() || password.is_empty() || busy.get_untracked() {
            return;
        }
        set_busy.set(true);
        let auth = ctx.backend().auth();
        let sign_up = signing_up.get_untracked();

        spawn_local(async move {
            let result = if sign_up {
                auth.sign_up(&email, &password).await
            } else {
                auth.sign_in_with_password(&email, &password)
                    .await
                    .map(SignUpOutcome::SignedIn)
            };
            match result {
                Ok(SignUpOutcome::SignedIn(session)) => {
                    session.save();
                    store_set_auth(&store, AuthState::SignedIn(session));
                }
                Ok(SignUpOutcome::ConfirmationRequired) => {
                    ctx.notify(
                        NoticeKind::Info,
                        "Check your email",
                        "Confirm your address, then sign in.",
                    );
                    set_signing_up.set(false);
                }
                Err(e) => {
                    let title = if sign_up { "Sign Up Failed" } else { "Sign In Failed" };
                    ctx.notify(NoticeKind::Destructive, title, &e.to_string());
                }
            }
            set_busy.set(false);
        });
    };

    view! {
        <div class="auth-page">
            <form class="auth-card" on:submit=submit>
                <h1>{move || if signing_up.get() { "Create Account" } else { "Sign In" }}</h1>
                <label>
                    "Email"
                    <input
                        type="email"
                        placeholder="you@example.com"
                        prop:value=move || email.get()
                        on:input=move |ev| set_email.set(event_target_value(&ev))
                    />
                </label>
                <label>
                    "Password"
                    <input
                        type="password"
                        prop:value=move || password.get()
                        on:input=move |ev| set_password.set(event_target_value(&ev))
                    />
                </label>
                <button type="submit" class="btn-primary" disabled=move || busy.get()>
                    {move || match (busy.get(), signing_up.get()) {
                        (true, _) => "Please wait...",
                        (false, true) => "Sign Up",
                        (false, false) => "Sign In",
                    }}
                </button>
                <button
                    type="button"
                    class="btn-link"
                    on:click=move |_| set_signing_up.update(|s| *s = !*s)
                >
                    {move || if signing_up.get() {
                        "Already have an account? Sign in"
                    } else {
                        "Need an account? Sign up"
                    }}
                </button>
                <button type="button" class="btn-link" on:click=move |_| ctx.navigate(Route::Landing)>
                    "Back"
                </button>
            </form>
        </div>
    }
}
