use crate::Database;
use crate::models::{ApplicationRow, JobRow, UserRow};
use anyhow::Result;
use rusqlite::{Connection, Row};

impl Database {
    // -- Users --

    pub fn create_user(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
        role: &str,
        company_name: Option<&str>,
    ) -> Result<i64> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO users (username, email, password_hash, role, company_name)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                rusqlite::params![username, email, password_hash, role, company_name],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    pub fn get_user_by_email(&self, email: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user(conn, "email = ?1", email))
    }

    pub fn get_user_by_id(&self, id: i64) -> Result<Option<UserRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!("{} WHERE id = ?1", USER_SELECT))?;
            stmt.query_row([id], user_from_row).optional()
        })
    }

    /// The bearer token is the stored password digest, so token resolution
    /// is a lookup on the password_hash column.
    pub fn get_user_by_password_hash(&self, password_hash: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user(conn, "password_hash = ?1", password_hash))
    }

    // -- Jobs --

    pub fn create_job(
        &self,
        title: &str,
        location: &str,
        description: &str,
        employer_id: i64,
    ) -> Result<JobRow> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO jobs (title, location, description, employer_id)
                 VALUES (?1, ?2, ?3, ?4)",
                rusqlite::params![title, location, description, employer_id],
            )?;
            Ok(JobRow {
                id: conn.last_insert_rowid(),
                title: title.to_string(),
                location: location.to_string(),
                description: description.to_string(),
                employer_id,
            })
        })
    }

    pub fn get_job_by_id(&self, id: i64) -> Result<Option<JobRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!("{} WHERE id = ?1", JOB_SELECT))?;
            stmt.query_row([id], job_from_row).optional()
        })
    }

    /// Every job, in storage order. The listing endpoint has no pagination.
    pub fn all_jobs(&self) -> Result<Vec<JobRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(JOB_SELECT)?;
            let rows = stmt.query_map([], job_from_row)?;
            rows.collect::<std::result::Result<Vec<_>, _>>()
                .map_err(Into::into)
        })
    }

    pub fn jobs_by_employer(&self, employer_id: i64) -> Result<Vec<JobRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!("{} WHERE employer_id = ?1", JOB_SELECT))?;
            let rows = stmt.query_map([employer_id], job_from_row)?;
            rows.collect::<std::result::Result<Vec<_>, _>>()
                .map_err(Into::into)
        })
    }

    // -- Applications --

    pub fn create_application(
        &self,
        job_id: i64,
        applicant_id: i64,
        resume_filename: &str,
        resume_data: &str,
    ) -> Result<i64> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO applications (job_id, applicant_id, resume_filename, resume_data)
                 VALUES (?1, ?2, ?3, ?4)",
                rusqlite::params![job_id, applicant_id, resume_filename, resume_data],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    pub fn has_application(&self, job_id: i64, applicant_id: i64) -> Result<bool> {
        self.with_conn(|conn| {
            let count: i64 = conn.query_row(
                "SELECT COUNT(*) FROM applications WHERE job_id = ?1 AND applicant_id = ?2",
                rusqlite::params![job_id, applicant_id],
                |r| r.get(0),
            )?;
            Ok(count > 0)
        })
    }

    pub fn applications_for_job(&self, job_id: i64) -> Result<Vec<ApplicationRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!("{} WHERE job_id = ?1", APPLICATION_SELECT))?;
            let rows = stmt.query_map([job_id], application_from_row)?;
            rows.collect::<std::result::Result<Vec<_>, _>>()
                .map_err(Into::into)
        })
    }

    pub fn applications_by_applicant(&self, applicant_id: i64) -> Result<Vec<ApplicationRow>> {
        self.with_conn(|conn| {
            let mut stmt =
                conn.prepare(&format!("{} WHERE applicant_id = ?1", APPLICATION_SELECT))?;
            let rows = stmt.query_map([applicant_id], application_from_row)?;
            rows.collect::<std::result::Result<Vec<_>, _>>()
                .map_err(Into::into)
        })
    }
}

const USER_SELECT: &str =
    "SELECT id, username, email, password_hash, role, company_name FROM users";
const JOB_SELECT: &str = "SELECT id, title, location, description, employer_id FROM jobs";
const APPLICATION_SELECT: &str =
    "SELECT id, job_id, applicant_id, application_date, resume_filename, resume_data
     FROM applications";

fn query_user(conn: &Connection, predicate: &str, param: &str) -> Result<Option<UserRow>> {
    let mut stmt = conn.prepare(&format!("{} WHERE {}", USER_SELECT, predicate))?;
    stmt.query_row([param], user_from_row).optional()
}

fn user_from_row(row: &Row) -> std::result::Result<UserRow, rusqlite::Error> {
    Ok(UserRow {
        id: row.get(0)?,
        username: row.get(1)?,
        email: row.get(2)?,
        password_hash: row.get(3)?,
        role: row.get(4)?,
        company_name: row.get(5)?,
    })
}

fn job_from_row(row: &Row) -> std::result::Result<JobRow, rusqlite::Error> {
    Ok(JobRow {
        id: row.get(0)?,
        title: row.get(1)?,
        location: row.get(2)?,
        description: row.get(3)?,
        employer_id: row.get(4)?,
    })
}

fn application_from_row(row: &Row) -> std::result::Result<ApplicationRow, rusqlite::Error> {
    Ok(ApplicationRow {
        id: row.get(0)?,
        job_id: row.get(1)?,
        applicant_id: row.get(2)?,
        application_date: row.get(3)?,
        resume_filename: row.get(4)?,
        resume_data: row.get(5)?,
    })
}

/// Extension trait for optional query results
trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>>;
}

impl<T> OptionalExt<T> for std::result::Result<T, rusqlite::Error> {
    fn optional(self) -> Result<Option<T>> {
        match self {
            Ok(val) => Ok(Some(val)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
