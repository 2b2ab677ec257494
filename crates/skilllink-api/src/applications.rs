use axum::{
    Json,
    body::Bytes,
    extract::{Multipart, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};
use base64::Engine;
use base64::engine::general_purpose::STANDARD as B64;
use tracing::info;

use skilllink_types::api::{
    EmployerJobResponse, JobApplicantResponse, JobSummary, MessageBody, SeekerApplicationResponse,
};
use skilllink_types::role;

use crate::auth::{self, AppState};
use crate::error::ApiError;

/// POST /api/applications — job seekers only. Multipart form with a
/// `job_id` field and a `resume` file part; the file bytes are stored
/// base64-encoded next to their original filename. One application per
/// (job, seeker) pair.
pub async fn apply(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let token = auth::bearer_token(&headers);

    let auth_state = state.clone();
    let user = tokio::task::spawn_blocking(move || {
        auth::resolve_token(&auth_state.db, token.as_deref())
            .filter(|u| u.role == role::JOB_SEEKER)
    })
    .await
    .map_err(ApiError::internal)?
    .ok_or_else(ApiError::unauthorized)?;

    let mut job_id_field: Option<String> = None;
    let mut resume: Option<(String, Bytes)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| ApiError::new(StatusCode::BAD_REQUEST, "Invalid form data"))?
    {
        match field.name().unwrap_or("") {
            "job_id" => {
                job_id_field = Some(
                    field
                        .text()
                        .await
                        .map_err(|_| ApiError::new(StatusCode::BAD_REQUEST, "Invalid form data"))?,
                );
            }
            "resume" => {
                let file_name = field.file_name().unwrap_or("unknown").to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|_| ApiError::new(StatusCode::BAD_REQUEST, "Invalid form data"))?;
                resume = Some((file_name, data));
            }
            _ => {}
        }
    }

    let Some((resume_filename, resume_bytes)) = resume else {
        return Err(ApiError::new(StatusCode::BAD_REQUEST, "Resume file missing"));
    };

    let job_id: i64 = job_id_field
        .and_then(|v| v.parse().ok())
        .ok_or_else(|| ApiError::new(StatusCode::BAD_REQUEST, "Invalid job ID"))?;

    let resume_data = B64.encode(&resume_bytes);

    tokio::task::spawn_blocking(move || {
        // Checked before insert; the UNIQUE constraint catches the rare race.
        if state
            .db
            .has_application(job_id, user.id)
            .map_err(ApiError::internal)?
        {
            return Err(ApiError::new(
                StatusCode::CONFLICT,
                "You have already applied for this job.",
            ));
        }

        state
            .db
            .create_application(job_id, user.id, &resume_filename, &resume_data)
            .map_err(ApiError::internal)?;

        info!("{} applied to job {}", user.username, job_id);
        Ok(())
    })
    .await
    .map_err(ApiError::internal)??;

    Ok((
        StatusCode::CREATED,
        Json(MessageBody {
            message: "Application submitted successfully".to_string(),
        }),
    ))
}

/// GET /api/employer/jobs — employers only. Each owned job with its full
/// applicant list, resume payloads included. This is the one place resume
/// content leaves the system in bulk.
pub async fn employer_jobs(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    let token = auth::bearer_token(&headers);

    let jobs = tokio::task::spawn_blocking(move || {
        let user = auth::resolve_token(&state.db, token.as_deref())
            .filter(|u| u.role == role::EMPLOYER)
            .ok_or_else(ApiError::unauthorized)?;

        let rows = state
            .db
            .jobs_by_employer(user.id)
            .map_err(ApiError::internal)?;

        let mut jobs = Vec::with_capacity(rows.len());
        for job in rows {
            let apps = state
                .db
                .applications_for_job(job.id)
                .map_err(ApiError::internal)?;

            let mut applications = Vec::with_capacity(apps.len());
            for app in apps {
                let Some(applicant) = state
                    .db
                    .get_user_by_id(app.applicant_id)
                    .map_err(ApiError::internal)?
                else {
                    continue;
                };
                applications.push(JobApplicantResponse {
                    applicant_name: applicant.username,
                    applicant_email: applicant.email,
                    resume_filename: app.resume_filename,
                    resume_data: app.resume_data,
                });
            }

            jobs.push(EmployerJobResponse {
                id: job.id,
                title: job.title,
                location: job.location,
                description: job.description,
                applications,
            });
        }
        Ok(jobs)
    })
    .await
    .map_err(ApiError::internal)??;

    Ok(Json(jobs))
}

/// GET /api/applications/me — job seekers only. The caller's applications
/// with the job's title/location and the stored resume filename; resume
/// content is not re-exposed here.
pub async fn my_applications(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    let token = auth::bearer_token(&headers);

    let entries = tokio::task::spawn_blocking(move || {
        let user = auth::resolve_token(&state.db, token.as_deref())
            .filter(|u| u.role == role::JOB_SEEKER)
            .ok_or_else(ApiError::unauthorized)?;

        let apps = state
            .db
            .applications_by_applicant(user.id)
            .map_err(ApiError::internal)?;

        let mut entries = Vec::with_capacity(apps.len());
        for app in apps {
            let Some(job) = state
                .db
                .get_job_by_id(app.job_id)
                .map_err(ApiError::internal)?
            else {
                continue;
            };
            entries.push(SeekerApplicationResponse {
                job: JobSummary {
                    title: job.title,
                    location: job.location,
                },
                resume_filename: app.resume_filename,
            });
        }
        Ok(entries)
    })
    .await
    .map_err(ApiError::internal)??;

    Ok(Json(entries))
}
