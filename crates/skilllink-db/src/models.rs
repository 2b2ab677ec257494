/// Database row types — these map directly to SQLite rows.
/// Distinct from skilllink-types API models to keep the DB layer independent.

#[derive(Debug, Clone)]
pub struct UserRow {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub company_name: Option<String>,
}

#[derive(Debug, Clone)]
pub struct JobRow {
    pub id: i64,
    pub title: String,
    pub location: String,
    pub description: String,
    pub employer_id: i64,
}

#[derive(Debug, Clone)]
pub struct ApplicationRow {
    pub id: i64,
    pub job_id: i64,
    pub applicant_id: i64,
    pub application_date: String,
    pub resume_filename: Option<String>,
    pub resume_data: Option<String>,
}
