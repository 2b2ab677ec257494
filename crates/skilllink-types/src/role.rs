//! Role discriminator strings. Stored verbatim in the users table and
//! compared byte-for-byte by the route layer, so these must match what
//! clients send at registration.

pub const EMPLOYER: &str = "Employer";
pub const JOB_SEEKER: &str = "Job Seeker";
