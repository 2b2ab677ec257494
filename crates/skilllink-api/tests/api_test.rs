use std::path::Path;
use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use skilllink_api::auth::hash_password;
use skilllink_api::{AppStateInner, router};

fn app() -> Router {
    let db = skilllink_db::Database::open(Path::new(":memory:")).unwrap();
    router(Arc::new(AppStateInner { db }))
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

async fn post_json(
    app: &Router,
    path: &str,
    token: Option<&str>,
    body: Value,
) -> (StatusCode, Value) {
    let mut builder = Request::post(path).header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Token {}", token));
    }
    let req = builder.body(Body::from(body.to_string())).unwrap();
    send(app, req).await
}

async fn get(app: &Router, path: &str, token: Option<&str>) -> (StatusCode, Value) {
    let mut builder = Request::get(path);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Token {}", token));
    }
    let req = builder.body(Body::empty()).unwrap();
    send(app, req).await
}

const BOUNDARY: &str = "test-boundary-7MA4YWxkTrZu0gW";

fn multipart_apply(job_id: &str, resume: Option<(&str, &[u8])>) -> Request<Body> {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"job_id\"\r\n\r\n{job_id}\r\n"
        )
        .as_bytes(),
    );
    if let Some((filename, data)) = resume {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"resume\"; filename=\"{filename}\"\r\nContent-Type: application/pdf\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    Request::post("/api/applications")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

async fn register(app: &Router, name: &str, email: &str, role: &str, company: Option<&str>) {
    let (status, _) = post_json(
        app,
        "/api/register",
        None,
        json!({
            "name": name,
            "email": email,
            "password": "secret123",
            "role": role,
            "company_name": company,
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
}

async fn login(app: &Router, email: &str) -> String {
    let (status, body) = post_json(
        app,
        "/api/login",
        None,
        json!({"email": email, "password": "secret123"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn duplicate_email_registration_conflicts() {
    let app = app();
    register(&app, "Alice", "alice@test", "Job Seeker", None).await;

    let (status, body) = post_json(
        &app,
        "/api/register",
        None,
        json!({
            "name": "Alice Again",
            "email": "alice@test",
            "password": "other",
            "role": "Job Seeker",
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "Email already registered");

    // The first registration still logs in
    login(&app, "alice@test").await;
}

#[tokio::test]
async fn login_returns_the_stored_digest_as_token() {
    let app = app();
    register(&app, "Alice", "alice@test", "Job Seeker", None).await;

    let (status, body) = post_json(
        &app,
        "/api/login",
        None,
        json!({"email": "alice@test", "password": "secret123"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["token"], Value::String(hash_password("secret123")));
    assert_eq!(body["user"]["name"], "Alice");
    assert_eq!(body["user"]["role"], "Job Seeker");
    assert!(body["user"]["id"].is_i64());

    // Wrong password and unknown email are indistinguishable
    let (status, wrong_pw) = post_json(
        &app,
        "/api/login",
        None,
        json!({"email": "alice@test", "password": "nope"}),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, unknown) = post_json(
        &app,
        "/api/login",
        None,
        json!({"email": "nobody@test", "password": "secret123"}),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_pw, unknown);
}

#[tokio::test]
async fn job_posting_requires_an_employer() {
    let app = app();
    register(&app, "Alice", "alice@test", "Job Seeker", None).await;
    let seeker_token = login(&app, "alice@test").await;

    let job = json!({"title": "Engineer", "location": "Remote", "description": "Build"});

    let (status, _) = post_json(&app, "/api/jobs", None, job.clone()).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = post_json(&app, "/api/jobs", Some(&seeker_token), job.clone()).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Unauthorized");

    // No job was created
    let (status, jobs) = get(&app, "/api/jobs", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(jobs.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn has_applied_is_relative_to_the_caller() {
    let app = app();
    register(&app, "Acme", "hr@acme.test", "Employer", Some("Acme Corp")).await;
    let employer_token = login(&app, "hr@acme.test").await;

    for title in ["Engineer", "Designer"] {
        let (status, _) = post_json(
            &app,
            "/api/jobs",
            Some(&employer_token),
            json!({"title": title, "location": "Remote", "description": "Work"}),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    register(&app, "Alice", "alice@test", "Job Seeker", None).await;
    let seeker_token = login(&app, "alice@test").await;

    let (_, jobs) = get(&app, "/api/jobs", Some(&seeker_token)).await;
    let engineer_id = jobs
        .as_array()
        .unwrap()
        .iter()
        .find(|j| j["title"] == "Engineer")
        .unwrap()["id"]
        .to_string();

    let (status, _) = send(
        &app,
        multipart_apply(&engineer_id, Some(("cv.pdf", b"pdf bytes"))),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN); // no token on the request

    let req = {
        let mut req = multipart_apply(&engineer_id, Some(("cv.pdf", b"pdf bytes")));
        req.headers_mut().insert(
            header::AUTHORIZATION,
            format!("Token {}", seeker_token).parse().unwrap(),
        );
        req
    };
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::CREATED);

    // Authenticated listing: applied job flagged, the other not
    let (_, jobs) = get(&app, "/api/jobs", Some(&seeker_token)).await;
    for job in jobs.as_array().unwrap() {
        let expected = job["title"] == "Engineer";
        assert_eq!(job["has_applied"], Value::Bool(expected));
        assert_eq!(job["employer_name"], "Acme");
        assert_eq!(job["company_name"], "Acme Corp");
    }

    // Anonymous listing: never flagged
    let (_, jobs) = get(&app, "/api/jobs", None).await;
    for job in jobs.as_array().unwrap() {
        assert_eq!(job["has_applied"], Value::Bool(false));
    }
}

#[tokio::test]
async fn one_application_per_job_and_missing_file_is_rejected() {
    let app = app();
    register(&app, "Acme", "hr@acme.test", "Employer", Some("Acme Corp")).await;
    let employer_token = login(&app, "hr@acme.test").await;

    let (_, posted) = post_json(
        &app,
        "/api/jobs",
        Some(&employer_token),
        json!({"title": "Engineer", "location": "Remote", "description": "Build"}),
    )
    .await;
    let job_id = posted["job"]["id"].to_string();

    register(&app, "Alice", "alice@test", "Job Seeker", None).await;
    let seeker_token = login(&app, "alice@test").await;

    let with_token = |mut req: Request<Body>| {
        req.headers_mut().insert(
            header::AUTHORIZATION,
            format!("Token {}", seeker_token).parse().unwrap(),
        );
        req
    };

    // Missing file part
    let (status, body) = send(&app, with_token(multipart_apply(&job_id, None))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Resume file missing");

    let (status, _) = send(
        &app,
        with_token(multipart_apply(&job_id, Some(("cv.pdf", b"pdf bytes")))),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    // Second application to the same job conflicts
    let (status, body) = send(
        &app,
        with_token(multipart_apply(&job_id, Some(("cv2.pdf", b"other")))),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "You have already applied for this job.");

    // Only one application persisted
    let (_, mine) = get(&app, "/api/applications/me", Some(&seeker_token)).await;
    assert_eq!(mine.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn employer_and_seeker_views_round_trip() {
    let app = app();

    register(&app, "Acme", "hr@acme.test", "Employer", Some("Acme Corp")).await;
    let employer_token = login(&app, "hr@acme.test").await;

    let (status, posted) = post_json(
        &app,
        "/api/jobs",
        Some(&employer_token),
        json!({"title": "Engineer", "location": "Remote", "description": "Build things"}),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(posted["message"], "Job posted successfully");
    assert_eq!(posted["job"]["title"], "Engineer");
    assert_eq!(posted["job"]["has_applied"], Value::Bool(false));
    let job_id = posted["job"]["id"].to_string();

    register(&app, "Alice", "alice@test", "Job Seeker", None).await;
    let seeker_token = login(&app, "alice@test").await;

    let resume_bytes: &[u8] = b"%PDF-1.4 alice resume";
    let mut req = multipart_apply(&job_id, Some(("alice_resume.pdf", resume_bytes)));
    req.headers_mut().insert(
        header::AUTHORIZATION,
        format!("Token {}", seeker_token).parse().unwrap(),
    );
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Application submitted successfully");

    // Role gates: the employer view rejects the seeker and vice versa
    let (status, _) = get(&app, "/api/employer/jobs", Some(&seeker_token)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = get(&app, "/api/applications/me", Some(&employer_token)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Employer sees the job with Alice's application and resume payload
    let (status, jobs) = get(&app, "/api/employer/jobs", Some(&employer_token)).await;
    assert_eq!(status, StatusCode::OK);
    let jobs = jobs.as_array().unwrap();
    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0]["title"], "Engineer");
    let applications = jobs[0]["applications"].as_array().unwrap();
    assert_eq!(applications.len(), 1);
    assert_eq!(applications[0]["applicant_name"], "Alice");
    assert_eq!(applications[0]["applicant_email"], "alice@test");
    assert_eq!(applications[0]["resume_filename"], "alice_resume.pdf");

    // The payload decodes back to the uploaded bytes
    use base64::Engine;
    let decoded = base64::engine::general_purpose::STANDARD
        .decode(applications[0]["resume_data"].as_str().unwrap())
        .unwrap();
    assert_eq!(decoded, resume_bytes);

    // Seeker sees the job summary and filename, but no resume content
    let (status, mine) = get(&app, "/api/applications/me", Some(&seeker_token)).await;
    assert_eq!(status, StatusCode::OK);
    let mine = mine.as_array().unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0]["job"]["title"], "Engineer");
    assert_eq!(mine[0]["job"]["location"], "Remote");
    assert_eq!(mine[0]["resume_filename"], "alice_resume.pdf");
    assert!(mine[0].get("resume_data").is_none());
}
