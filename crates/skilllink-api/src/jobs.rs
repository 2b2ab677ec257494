use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};
use tracing::info;

use skilllink_db::Database;
use skilllink_db::models::JobRow;
use skilllink_types::api::{JobResponse, PostJobRequest, PostJobResponse};
use skilllink_types::role;

use crate::auth::{self, AppState};
use crate::error::ApiError;

/// Flatten a job row for the listing: employer display fields come from a
/// per-job user lookup, has_applied from a per-job application lookup for
/// the viewing caller (always false without one).
pub(crate) fn serialize_job(
    db: &Database,
    job: &JobRow,
    viewer_id: Option<i64>,
) -> anyhow::Result<JobResponse> {
    let employer = db.get_user_by_id(job.employer_id)?;

    let has_applied = match viewer_id {
        Some(uid) => db.has_application(job.id, uid)?,
        None => false,
    };

    let (employer_name, company_name) = match employer {
        Some(user) => (user.username, user.company_name),
        None => ("Unknown".to_string(), None),
    };

    Ok(JobResponse {
        id: job.id,
        title: job.title.clone(),
        location: job.location.clone(),
        description: job.description.clone(),
        employer_id: job.employer_id,
        employer_name,
        company_name,
        has_applied,
    })
}

/// GET /api/jobs — every job in storage order, no pagination.
/// Authentication is optional and only affects the has_applied flag.
pub async fn list_jobs(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    let token = auth::bearer_token(&headers);

    let jobs = tokio::task::spawn_blocking(move || -> anyhow::Result<Vec<JobResponse>> {
        let viewer_id = auth::resolve_token(&state.db, token.as_deref()).map(|u| u.id);
        let rows = state.db.all_jobs()?;
        rows.iter()
            .map(|job| serialize_job(&state.db, job, viewer_id))
            .collect()
    })
    .await
    .map_err(ApiError::internal)?
    .map_err(ApiError::internal)?;

    Ok(Json(jobs))
}

/// POST /api/jobs — employers only. The created job is echoed back without
/// caller context, so has_applied is false on this path.
pub async fn post_job(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<PostJobRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let token = auth::bearer_token(&headers);

    let job = tokio::task::spawn_blocking(move || {
        let user = auth::resolve_token(&state.db, token.as_deref())
            .filter(|u| u.role == role::EMPLOYER)
            .ok_or_else(ApiError::unauthorized)?;

        let job = state
            .db
            .create_job(&req.title, &req.location, &req.description, user.id)
            .map_err(ApiError::internal)?;

        info!("Job '{}' posted by {}", job.title, user.username);
        serialize_job(&state.db, &job, None).map_err(ApiError::internal)
    })
    .await
    .map_err(ApiError::internal)??;

    Ok((
        StatusCode::CREATED,
        Json(PostJobResponse {
            message: "Job posted successfully".to_string(),
            job,
        }),
    ))
}
