pub mod applications;
pub mod auth;
pub mod error;
pub mod jobs;

use axum::{
    Router,
    routing::{get, post},
};

pub use auth::{AppState, AppStateInner};

/// All /api routes. Layers (CORS, tracing, body limit) are applied by the
/// server binary on top of this router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/register", post(auth::register))
        .route("/api/login", post(auth::login))
        .route("/api/jobs", get(jobs::list_jobs).post(jobs::post_job))
        .route("/api/applications", post(applications::apply))
        .route("/api/employer/jobs", get(applications::employer_jobs))
        .route("/api/applications/me", get(applications::my_applications))
        .with_state(state)
}
