//! Settings Page
//!
//! Account details, backend connection, and recent log output.

use leptos::prelude::*;

use crate::config::BackendConfig;
use crate::context::use_app_context;
use crate::session::Session;

/// Log lines shown on the page
const LOG_TAIL: usize = 50;

#[component]
pub fn SettingsPage(session: Session) -> impl IntoView {
    let ctx = use_app_context();
    let initial = ctx.config();
    let (url, set_url) = signal(initial.url.clone());
    let (anon_key, set_anon_key) = signal(initial.anon_key.clone());
    let (log_lines, set_log_lines) = signal(Vec::<String>::new());

    let refresh_logs = move || {
        let lines = rolling_logger::recent_lines();
        let skip = lines.len().saturating_sub(LOG_TAIL);
        set_log_lines.set(lines.iter().skip(skip).map(|l| l.format()).collect());
    };
    refresh_logs();

    let save = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let mut config = BackendConfig::new(&url.get_untracked(), &anon_key.get_untracked());
        let current = ctx.config();
        config.demo_email = current.demo_email;
        config.demo_password = current.demo_password;

        if let Err(e) = config.realtime_url() {
            ctx.notify_error(&e.to_string());
            return;
        }
        match config.save() {
            Ok(()) => {
                ctx.set_config(config);
                ctx.notify_success("Backend connection saved");
            }
            Err(e) => ctx.notify_error(&e),
        }
    };

    let reset = move |_| {
        let config = BackendConfig::reset();
        set_url.set(config.url.clone());
        set_anon_key.set(config.anon_key.clone());
        ctx.set_config(config);
        ctx.notify_success("Backend connection reset to defaults");
    };

    view! {
        <div class="settings-page">
            <div class="page-header">
                <h1>"Settings"</h1>
                <p class="page-subtitle">"Manage your account and connection"</p>
            </div>

            <section class="settings-card">
                <h2>"Account"</h2>
                <dl>
                    <dt>"Email"</dt>
                    <dd>{session.email().to_string()}</dd>
                    <dt>"User ID"</dt>
                    <dd class="mono">{session.user_id().to_string()}</dd>
                </dl>
            </section>

            <section class="settings-card">
                <h2>"Backend"</h2>
                <form class="settings-form" on:submit=save>
                    <label>
                        "Project URL"
                        <input
                            type="url"
                            placeholder="https://your-project.supabase.co"
                            prop:value=move || url.get()
                            on:input=move |ev| set_url.set(event_target_value(&ev))
                        />
                    </label>
                    <label>
                        "Anon key"
                        <input
                            type="text"
                            prop:value=move || anon_key.get()
                            on:input=move |ev| set_anon_key.set(event_target_value(&ev))
                        />
                    </label>
                    <div class="dialog-actions">
                        <button type="button" class="btn-secondary" on:click=reset>"Reset"</button>
                        <button type="submit" class="btn-primary">"Save"</button>
                    </div>
                </form>
            </section>

            <section class="settings-card">
                <div class="settings-card-header">
                    <h2>"Recent Log"</h2>
                    <button class="btn-link" on:click=move |_| refresh_logs()>"Refresh"</button>
                </div>
                <pre class="log-tail">
                    {move || log_lines.get().join("\n")}
                </pre>
            </section>
        </div>
    }
}
