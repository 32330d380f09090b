//! Notice Tray Component
//!
//! Stack of transient notices in the corner of the screen.

use leptos::prelude::*;

use crate::store::{store_dismiss_notice, use_app_store, AppStateStoreFields};

#[component]
pub fn NoticeTray() -> impl IntoView {
    let store = use_app_store();

    view! {
        <div class="notice-tray">
            <For
                each=move || store.notices().get()
                key=|notice| notice.id
                children=move |notice| {
                    let id = notice.id;
                    view! {
                        <div class=notice.kind.css_class() role="status">
                            <div class="notice-body">
                                <strong class="notice-title">{notice.title}</strong>
                                <span class="notice-description">{notice.description}</span>
                            </div>
                            <button
                                class="notice-close"
                                on:click=move |_| store_dismiss_notice(&store, id)
                            >
                                "×"
                            </button>
                        </div>
                    }
                }
            />
        </div>
    }
}
