use std::sync::Arc;

use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode, header},
    response::IntoResponse,
};
use sha2::{Digest, Sha256};
use tracing::info;

use skilllink_db::Database;
use skilllink_db::models::UserRow;
use skilllink_types::api::{LoginRequest, LoginResponse, MessageBody, RegisterRequest, UserSummary};
use skilllink_types::role;

use crate::error::ApiError;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
}

/// Lowercase hex SHA-256 of the password bytes. Doubles as the bearer
/// token: logging in returns this digest and every authenticated request
/// presents it back. No salt, so equal passwords share a digest.
pub fn hash_password(password: &str) -> String {
    hex::encode(Sha256::digest(password.as_bytes()))
}

/// Pull the token out of the Authorization header. A `Token ` prefix is
/// stripped when present; otherwise the raw header value is used as-is.
pub fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Token ").unwrap_or(value);
    Some(token.to_string())
}

/// Resolve a presented token to its user. Storage errors read as anonymous,
/// never as a request failure.
pub fn resolve_token(db: &Database, token: Option<&str>) -> Option<UserRow> {
    let token = token?;
    db.get_user_by_password_hash(token).ok().flatten()
}

pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let digest = hash_password(&req.password);

    tokio::task::spawn_blocking(move || {
        if state
            .db
            .get_user_by_email(&req.email)
            .map_err(ApiError::internal)?
            .is_some()
        {
            return Err(ApiError::new(
                StatusCode::CONFLICT,
                "Email already registered",
            ));
        }

        // company_name is only stored for employers; username uniqueness is
        // left to the schema and surfaces as a storage failure.
        let company_name = if req.role == role::EMPLOYER {
            req.company_name.as_deref()
        } else {
            None
        };

        state
            .db
            .create_user(&req.name, &req.email, &digest, &req.role, company_name)
            .map_err(ApiError::internal)?;

        info!("Registered {} as {}", req.name, req.role);
        Ok(())
    })
    .await
    .map_err(ApiError::internal)??;

    Ok((
        StatusCode::CREATED,
        Json(MessageBody {
            message: "Registration successful".to_string(),
        }),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let digest = hash_password(&req.password);

    let user = tokio::task::spawn_blocking(move || state.db.get_user_by_email(&req.email))
        .await
        .map_err(ApiError::internal)?
        .map_err(ApiError::internal)?;

    // Unknown email and wrong password get the same generic response.
    match user {
        Some(user) if user.password_hash == digest => Ok(Json(LoginResponse {
            token: user.password_hash,
            user: UserSummary {
                id: user.id,
                name: user.username,
                email: user.email,
                role: user.role,
            },
        })),
        _ => Err(ApiError::new(
            StatusCode::UNAUTHORIZED,
            "Invalid email or password",
        )),
    }
}
