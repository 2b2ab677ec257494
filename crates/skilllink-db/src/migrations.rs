use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS users (
            id              INTEGER PRIMARY KEY AUTOINCREMENT,
            username        TEXT NOT NULL UNIQUE,
            email           TEXT NOT NULL UNIQUE,
            password_hash   TEXT NOT NULL,
            role            TEXT NOT NULL DEFAULT 'Job Seeker',
            company_name    TEXT
        );

        CREATE TABLE IF NOT EXISTS jobs (
            id              INTEGER PRIMARY KEY AUTOINCREMENT,
            title           TEXT NOT NULL,
            location        TEXT NOT NULL,
            description     TEXT NOT NULL,
            employer_id     INTEGER NOT NULL REFERENCES users(id)
        );

        CREATE TABLE IF NOT EXISTS applications (
            id                  INTEGER PRIMARY KEY AUTOINCREMENT,
            job_id              INTEGER NOT NULL REFERENCES jobs(id),
            applicant_id        INTEGER NOT NULL REFERENCES users(id),
            application_date    TEXT NOT NULL DEFAULT (datetime('now')),
            resume_filename     TEXT,
            resume_data         TEXT,
            UNIQUE(job_id, applicant_id)
        );

        CREATE INDEX IF NOT EXISTS idx_jobs_employer
            ON jobs(employer_id);

        CREATE INDEX IF NOT EXISTS idx_applications_job
            ON applications(job_id);
        ",
    )?;

    info!("Database migrations complete");
    Ok(())
}
