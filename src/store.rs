//! Global Application State Store
//!
//! Uses Leptos reactive_stores for fine-grained reactivity.

use gloo_timers::callback::Timeout;
use leptos::prelude::*;
use reactive_stores::Store;

use crate::routes::{push_history, Route};
use crate::session::AuthState;

/// Notices disappear on their own after this long
const NOTICE_TTL_MS: u32 = 5_000;

/// At most this many notices stack up; the oldest goes first
const MAX_NOTICES: usize = 4;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Info,
    Destructive,
}

impl NoticeKind {
    pub fn css_class(&self) -> &'static str {
        match self {
            NoticeKind::Success => "notice notice-success",
            NoticeKind::Info => "notice notice-info",
            NoticeKind::Destructive => "notice notice-destructive",
        }
    }
}

/// Transient toast message
#[derive(Clone, Debug, PartialEq)]
pub struct Notice {
    pub id: u32,
    pub kind: NoticeKind,
    pub title: String,
    pub description: String,
}

/// Global application state with field-level reactivity
#[derive(Clone, Debug, Default, Store)]
pub struct AppState {
    /// Current auth state, passed down to pages
    pub auth: AuthState,
    /// Page shown in the outlet
    pub route: Route,
    /// Visible notices, oldest first
    pub notices: Vec<Notice>,
    pub next_notice_id: u32,
    pub sidebar_collapsed: bool,
}

impl AppState {
    pub fn new(route: Route) -> Self {
        Self {
            route,
            ..Default::default()
        }
    }
}

/// Type alias for the store
pub type AppStore = Store<AppState>;

/// Get the app store from context
pub fn use_app_store() -> AppStore {
    expect_context::<AppStore>()
}

fn push_bounded(notices: &mut Vec<Notice>, notice: Notice) {
    notices.push(notice);
    if notices.len() > MAX_NOTICES {
        let excess = notices.len() - MAX_NOTICES;
        notices.drain(..excess);
    }
}

// ========================
// Store Helper Functions
// ========================

/// Show a notice and schedule its removal
pub fn store_push_notice(store: &AppStore, kind: NoticeKind, title: &str, description: &str) -> u32 {
    let id = store_next_notice_id(store);
    push_bounded(
        &mut store.notices().write(),
        Notice {
            id,
            kind,
            title: title.to_string(),
            description: description.to_string(),
        },
    );

    let store = *store;
    Timeout::new(NOTICE_TTL_MS, move || store_dismiss_notice(&store, id)).forget();
    id
}

fn store_next_notice_id(store: &AppStore) -> u32 {
    let field = store.next_notice_id();
    let mut next = field.write();
    *next += 1;
    *next
}

pub fn store_dismiss_notice(store: &AppStore, notice_id: u32) {
    store.notices().write().retain(|n| n.id != notice_id);
}

pub fn store_set_auth(store: &AppStore, auth: AuthState) {
    store.auth().set(auth);
}

pub fn store_toggle_sidebar(store: &AppStore) {
    store.sidebar_collapsed().update(|collapsed| *collapsed = !*collapsed);
}

/// Switch pages, recording the move in browser history
pub fn store_navigate(store: &AppStore, route: Route) {
    if store.route().get_untracked() == route {
        return;
    }
    log::debug!("[NAV] {}", route);
    push_history(&route);
    store.route().set(route);
}
