//! Routes
//!
//! URL paths for each page, and History API navigation.

use std::fmt;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Route {
    #[default]
    Landing,
    Auth,
    Dashboard,
    Projects,
    Board(String),
    Settings,
    NotFound(String),
}

impl Route {
    pub fn parse(path: &str) -> Self {
        let trimmed = path.split(['?', '#']).next().unwrap_or("");
        let segments: Vec<&str> = trimmed.split('/').filter(|s| !s.is_empty()).collect();
        match segments.as_slice() {
            [] => Route::Landing,
            ["auth"] => Route::Auth,
            ["dashboard"] => Route::Dashboard,
            ["projects"] => Route::Projects,
            ["projects", id] => Route::Board(id.to_string()),
            ["settings"] => Route::Settings,
            _ => Route::NotFound(trimmed.to_string()),
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Landing => "/".to_string(),
            Route::Auth => "/auth".to_string(),
            Route::Dashboard => "/dashboard".to_string(),
            Route::Projects => "/projects".to_string(),
            Route::Board(id) => format!("/projects/{}", id),
            Route::Settings => "/settings".to_string(),
            Route::NotFound(path) => path.clone(),
        }
    }

    /// Pages that need a signed-in user
    pub fn is_protected(&self) -> bool {
        matches!(
            self,
            Route::Dashboard | Route::Projects | Route::Board(_) | Route::Settings
        )
    }

    /// Sidebar section this route belongs to
    pub fn section(&self) -> Option<Route> {
        match self {
            Route::Dashboard => Some(Route::Dashboard),
            Route::Projects | Route::Board(_) => Some(Route::Projects),
            Route::Settings => Some(Route::Settings),
            _ => None,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

// ========================================================================
// Browser history
// ========================================================================

/// Route for the address bar's current path
pub fn current_route() -> Route {
    let path = web_sys::window()
        .and_then(|w| w.location().pathname().ok())
        .unwrap_or_else(|| "/".to_string());
    Route::parse(&path)
}

/// Push `route` onto the history stack
pub fn push_history(route: &Route) {
    let Some(history) = web_sys::window().and_then(|w| w.history().ok()) else {
        return;
    };
    if let Err(e) = history.push_state_with_url(&JsValue::NULL, "", Some(&route.path())) {
        log::warn!("pushState failed: {:?}", e);
    }
}

/// Keeps a `popstate` listener attached until dropped
pub struct PopStateListener {
    callback: Closure<dyn FnMut(web_sys::Event)>,
}

impl PopStateListener {
    pub fn attach(on_change: impl Fn(Route) + 'static) -> Option<Self> {
        let window = web_sys::window()?;
        let callback = Closure::<dyn FnMut(web_sys::Event)>::new(move |_: web_sys::Event| {
            on_change(current_route());
        });
        window
            .add_event_listener_with_callback("popstate", callback.as_ref().unchecked_ref())
            .ok()?;
        Some(Self { callback })
    }
}

impl Drop for PopStateListener {
    fn drop(&mut self) {
        if let Some(window) = web_sys::window() {
            let _ = window
                .remove_event_listener_with_callback("popstate", self.callback.as_ref().unchecked_ref());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_pages() {
        assert_eq!(Route::parse("/"), Route::Landing);
        assert_eq!(Route::parse(""), Route::Landing);
        assert_eq!(Route::parse("/auth"), Route::Auth);
        assert_eq!(Route::parse("/dashboard/"), Route::Dashboard);
        assert_eq!(Route::parse("/projects"), Route::Projects);
        assert_eq!(Route::parse("/projects/abc-123"), Route::Board("abc-123".to_string()));
        assert_eq!(Route::parse("/settings?tab=backend"), Route::Settings);
    }

    #[test]
    fn test_unknown_paths() {
        assert_eq!(Route::parse("/nope"), Route::NotFound("/nope".to_string()));
        assert_eq!(
            Route::parse("/projects/a/b"),
            Route::NotFound("/projects/a/b".to_string())
        );
    }

    #[test]
    fn test_path_round_trips_for_every_page() {
        let routes = [
            Route::Landing,
            Route::Auth,
            Route::Dashboard,
            Route::Projects,
            Route::Board("p-7".to_string()),
            Route::Settings,
        ];
        for route in routes {
            assert_eq!(Route::parse(&route.path()), route);
        }
    }

    #[test]
    fn test_protection_and_sections() {
        assert!(!Route::Landing.is_protected());
        assert!(!Route::Auth.is_protected());
        assert!(Route::Board("x".to_string()).is_protected());
        assert_eq!(Route::Board("x".to_string()).section(), Some(Route::Projects));
        assert_eq!(Route::Auth.section(), None);
    }
}
