//! Team Board App
//!
//! Root component: store and context, session restore, auth redirects,
//! and the route outlet.

use leptos::prelude::*;
use leptos::task::spawn_local;
use reactive_stores::Store;

use crate::api::Backend;
use crate::components::{Layout, NoticeTray};
use crate::config::BackendConfig;
use crate::context::AppContext;
use crate::pages::{
    AuthPage, DashboardPage, LandingPage, NotFoundPage, ProjectBoardPage, ProjectsPage, SettingsPage,
};
use crate::routes::{current_route, PopStateListener, Route};
use crate::session::{restore_session, AuthState, Session};
use crate::store::{store_set_auth, AppState, AppStateStoreFields};

/// What the outlet renders. Board pages for different ids share one
/// entry so switching projects reuses the page.
#[derive(Clone, Debug, PartialEq)]
enum Page {
    Loading,
    Landing,
    Auth,
    Dashboard(Session),
    Projects(Session),
    Board(Session),
    Settings(Session),
    NotFound(String),
}

impl Page {
    fn resolve(route: &Route, auth: &AuthState) -> Self {
        match (route, auth.session()) {
            (Route::Landing, _) => Page::Landing,
            (Route::Auth, _) => Page::Auth,
            (Route::NotFound(path), _) => Page::NotFound(path.clone()),
            (_, None) => Page::Loading,
            (Route::Dashboard, Some(session)) => Page::Dashboard(session.clone()),
            (Route::Projects, Some(session)) => Page::Projects(session.clone()),
            (Route::Board(_), Some(session)) => Page::Board(session.clone()),
            (Route::Settings, Some(session)) => Page::Settings(session.clone()),
        }
    }
}

/// Where to send the user instead, if anywhere
fn redirect_for(route: &Route, auth: &AuthState) -> Option<Route> {
    match auth {
        AuthState::SignedOut if route.is_protected() => Some(Route::Auth),
        AuthState::SignedIn(_) if matches!(route, Route::Landing | Route::Auth) => Some(Route::Dashboard),
        _ => None,
    }
}

#[component]
pub fn App() -> impl IntoView {
    let store = Store::new(AppState::new(current_route()));
    provide_context(store);

    let ctx = AppContext::new(Backend::new(BackendConfig::load()), store);
    provide_context(ctx);

    // Back/forward buttons
    let popstate = PopStateListener::attach(move |route| store.route().set(route));
    let _popstate = StoredValue::new_local(popstate);

    // Restore the session once at startup
    spawn_local(async move {
        let auth = ctx.backend().auth();
        let restored = restore_session(&auth).await;
        store_set_auth(&store, restored);
    });

    Effect::new(move |_| {
        let route = store.route().get();
        let auth = store.auth().get();
        if let Some(target) = redirect_for(&route, &auth) {
            ctx.navigate(target);
        }
    });

    let page = Memo::new(move |_| Page::resolve(&store.route().get(), &store.auth().get()));
    let board_id = Memo::new(move |previous: Option<&String>| match store.route().get() {
        Route::Board(id) => id,
        _ => previous.cloned().unwrap_or_default(),
    });

    view! {
        {move || match page.get() {
            Page::Loading => view! { <div class="loading-screen">"Loading..."</div> }.into_any(),
            Page::Landing => view! { <LandingPage /> }.into_any(),
            Page::Auth => view! { <AuthPage /> }.into_any(),
            Page::Dashboard(session) => view! { <Layout><DashboardPage session=session /></Layout> }.into_any(),
            Page::Projects(session) => view! { <Layout><ProjectsPage session=session /></Layout> }.into_any(),
            Page::Board(session) => {
                view! { <Layout><ProjectBoardPage session=session project_id=board_id /></Layout> }.into_any()
            }
            Page::Settings(session) => view! { <Layout><SettingsPage session=session /></Layout> }.into_any(),
            Page::NotFound(path) => view! { <NotFoundPage path=path /> }.into_any(),
        }}
        <NoticeTray />
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::User;
    use chrono::Utc;

    fn signed_in() -> AuthState {
        AuthState::SignedIn(Session {
            access_token: "a".to_string(),
            refresh_token: "r".to_string(),
            expires_at: Utc::now(),
            user: User { id: "u-1".to_string(), email: None },
        })
    }

    #[test]
    fn test_protected_pages_wait_for_session() {
        assert_eq!(Page::resolve(&Route::Dashboard, &AuthState::Loading), Page::Loading);
        assert_eq!(Page::resolve(&Route::Settings, &AuthState::SignedOut), Page::Loading);
        assert_eq!(Page::resolve(&Route::Landing, &AuthState::Loading), Page::Landing);
        assert!(matches!(Page::resolve(&Route::Projects, &signed_in()), Page::Projects(_)));
    }

    #[test]
    fn test_board_pages_share_an_entry() {
        let auth = signed_in();
        assert_eq!(
            Page::resolve(&Route::Board("a".to_string()), &auth),
            Page::resolve(&Route::Board("b".to_string()), &auth)
        );
    }

    #[test]
    fn test_redirects() {
        assert_eq!(redirect_for(&Route::Projects, &AuthState::SignedOut), Some(Route::Auth));
        assert_eq!(redirect_for(&Route::Projects, &AuthState::Loading), None);
        assert_eq!(redirect_for(&Route::Auth, &signed_in()), Some(Route::Dashboard));
        assert_eq!(redirect_for(&Route::Landing, &signed_in()), Some(Route::Dashboard));
        assert_eq!(redirect_for(&Route::Landing, &AuthState::SignedOut), None);
        assert_eq!(redirect_for(&Route::NotFound("/x".to_string()), &AuthState::SignedOut), None);
    }
}
