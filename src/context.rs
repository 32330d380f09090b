//! Application Context
//!
//! Shared handles provided via Leptos Context API.

use leptos::prelude::*;

use crate::api::{Backend, RowClient};
use crate::config::BackendConfig;
use crate::routes::Route;
use crate::session::Session;
use crate::store::{store_navigate, store_push_notice, AppStore, NoticeKind};

/// App-wide handles provided via context
#[derive(Clone, Copy)]
pub struct AppContext {
    /// Backend handle; not `Send`, so it lives in local storage
    backend: StoredValue<Backend, LocalStorage>,
    store: AppStore,
}

impl AppContext {
    pub fn new(backend: Backend, store: AppStore) -> Self {
        Self {
            backend: StoredValue::new_local(backend),
            store,
        }
    }

    pub fn backend(&self) -> Backend {
        self.backend.get_value()
    }

    pub fn config(&self) -> BackendConfig {
        self.backend.with_value(|b| b.config().clone())
    }

    /// Swap in a new backend connection. Pages pick it up the next time
    /// they mount.
    pub fn set_config(&self, config: BackendConfig) {
        log::info!("Backend set to {}", config.url);
        self.backend.set_value(Backend::new(config));
    }

    /// Row client for the signed-in user
    pub fn rows(&self, session: &Session) -> RowClient {
        self.backend.with_value(|b| b.rows(session))
    }

    pub fn navigate(&self, route: Route) {
        store_navigate(&self.store, route);
    }

    pub fn notify(&self, kind: NoticeKind, title: &str, description: &str) {
        store_push_notice(&self.store, kind, title, description);
    }

    pub fn notify_success(&self, description: &str) {
        self.notify(NoticeKind::Success, "Success", description);
    }

    pub fn notify_error(&self, description: &str) {
        self.notify(NoticeKind::Destructive, "Error", description);
    }
}

pub fn use_app_context() -> AppContext {
    use_context::<AppContext>().expect("AppContext should be provided")
}
