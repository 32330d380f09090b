//! Pages
//!
//! One component per route. Protected pages receive the signed-in
//! session as a prop.

mod auth;
mod dashboard;
mod landing;
mod not_found;
mod project_board;
mod projects;
mod settings;

pub use auth::AuthPage;
pub use dashboard::DashboardPage;
pub use landing::LandingPage;
pub use not_found::NotFoundPage;
pub use project_board::ProjectBoardPage;
pub use projects::ProjectsPage;
pub use settings::SettingsPage;
