use leptos::prelude::*;

use crate::context::use_app_context;
use crate::routes::Route;

#[component]
pub fn NotFoundPage(path: String) -> impl IntoView {
    let ctx = use_app_context();
    view! {
        <div class="not-found">
            <h1>"404"</h1>
            <p>"Page not found: " <code>{path}</code></p>
            <button class="btn-primary" on:click=move |_| ctx.navigate(Route::Dashboard)>
                "Back to Dashboard"
            </button>
        </div>
    }
}
