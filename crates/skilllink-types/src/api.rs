use serde::{Deserialize, Serialize};

// -- Auth --

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: String,
    pub company_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserSummary,
}

/// Public view of a user — never carries the password digest.
#[derive(Debug, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: String,
}

// -- Jobs --

#[derive(Debug, Deserialize)]
pub struct PostJobRequest {
    pub title: String,
    pub location: String,
    pub description: String,
}

/// One job in the public listing. `has_applied` is relative to the
/// authenticated caller and is always false for anonymous requests.
#[derive(Debug, Serialize, Deserialize)]
pub struct JobResponse {
    pub id: i64,
    pub title: String,
    pub location: String,
    pub description: String,
    pub employer_id: i64,
    pub employer_name: String,
    pub company_name: Option<String>,
    pub has_applied: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PostJobResponse {
    pub message: String,
    pub job: JobResponse,
}

// -- Applications --

/// One applicant row nested under an employer's job. `resume_data` is the
/// base64 payload the client decodes for download.
#[derive(Debug, Serialize, Deserialize)]
pub struct JobApplicantResponse {
    pub applicant_name: String,
    pub applicant_email: String,
    pub resume_filename: Option<String>,
    pub resume_data: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct EmployerJobResponse {
    pub id: i64,
    pub title: String,
    pub location: String,
    pub description: String,
    pub applications: Vec<JobApplicantResponse>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct JobSummary {
    pub title: String,
    pub location: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SeekerApplicationResponse {
    pub job: JobSummary,
    pub resume_filename: Option<String>,
}

// -- Plain confirmations and errors --

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageBody {
    pub message: String,
}
