//! 基于真实路由配置的 HTTP 端到端测试

use actix_web::http::{StatusCode, header};
use actix_web::{App, test, web};
use serde_json::{Value, json};
use std::path::PathBuf;
use std::sync::Arc;

use super::configure_app;
use crate::config::AppConfig;
use crate::middlewares::RateLimiters;
use crate::storage::{SeaOrmStorage, Storage};

const BOUNDARY: &str = "----tracker-test-boundary";
const PASSWORD: &str = "SecurePass123";

struct TestEnv {
    config: web::Data<AppConfig>,
    storage: Arc<dyn Storage>,
    limiters: RateLimiters,
    upload_dir: PathBuf,
}

impl Drop for TestEnv {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.upload_dir);
    }
}

async fn env() -> TestEnv {
    let upload_dir =
        std::env::temp_dir().join(format!("tracker-test-{}", uuid::Uuid::new_v4().simple()));

    let mut config = AppConfig::from_defaults().unwrap();
    config.jwt.secret = "test-secret-key-for-e2e".to_string();
    config.upload.dir = upload_dir.to_string_lossy().into_owned();
    config.argon2.memory_cost = 1024;
    config.argon2.time_cost = 1;
    config.rate_limit.enabled = false;

    let limiters = RateLimiters::from_config(&config.rate_limit);
    TestEnv {
        config: web::Data::new(config),
        storage: Arc::new(SeaOrmStorage::in_memory().await.unwrap()),
        limiters,
        upload_dir,
    }
}

macro_rules! test_app {
    ($env:expr) => {
        test::init_service(
            App::new()
                .app_data($env.config.clone())
                .app_data(web::Data::new($env.storage.clone()))
                .configure(|cfg| configure_app(cfg, &$env.config, &$env.limiters)),
        )
        .await
    };
}

/// 发送请求并解析 JSON 响应
macro_rules! call {
    ($app:expr, $req:expr) => {{
        let resp = test::call_service(&$app, $req.to_request()).await;
        let status = resp.status();
        let body: Value = test::read_body_json(resp).await;
        (status, body)
    }};
}

macro_rules! register {
    ($app:expr, $name:expr, $email:expr, $role:expr) => {{
        let (status, body) = call!(
            $app,
            test::TestRequest::post().uri("/api/auth/register").set_json(json!({
                "name": $name,
                "email": $email,
                "password": PASSWORD,
                "role": $role,
                "dept": "CSE"
            }))
        );
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["data"]["userId"].as_i64().unwrap()
    }};
}

macro_rules! login {
    ($app:expr, $email:expr) => {{
        let (status, body) = call!(
            $app,
            test::TestRequest::post()
                .uri("/api/auth/login")
                .set_json(json!({"email": $email, "password": PASSWORD}))
        );
        assert_eq!(status, StatusCode::OK, "{body}");
        format!("Bearer {}", body["data"]["token"].as_str().unwrap())
    }};
}

fn multipart_body(title: &str, file_name: &str, content_type: &str, content: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in [
        ("title", title),
        ("type", "internship"),
        ("domain", "Networks"),
        ("companyOrGuide", "ACME Labs"),
        ("studentId", "999"),
    ] {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"report\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn upload_request(token: &str, body: Vec<u8>) -> test::TestRequest {
    test::TestRequest::post()
        .uri("/api/submissions/upload")
        .insert_header((header::AUTHORIZATION, token.to_string()))
        .insert_header((
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        ))
        .set_payload(body)
}

fn pdf_upload(token: &str, title: &str) -> test::TestRequest {
    upload_request(
        token,
        multipart_body(title, "final report.pdf", "application/pdf", b"%PDF-1.4\n%test\n"),
    )
}

#[actix_web::test]
async fn test_full_submission_flow() {
    let env = env().await;
    let app = test_app!(env);

    let student_id = register!(app, "Alice", "Alice@Uni.edu", "student");
    let faculty_id = register!(app, "Bob", "bob@uni.edu", "faculty");
    register!(app, "Root", "root@uni.edu", "admin");

    let student = login!(app, "alice@uni.edu");
    let faculty = login!(app, "bob@uni.edu");
    let admin = login!(app, "root@uni.edu");

    // 上传
    let (status, body) = call!(app, pdf_upload(&student, "Summer internship"));
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["message"], "Uploaded");
    let submission = &body["data"]["submission"];
    let submission_id = submission["id"].as_i64().unwrap();
    assert_eq!(submission["status"], "Submitted");
    assert_eq!(submission["studentId"].as_i64(), Some(student_id));
    assert_eq!(submission["assignedFacultyId"], Value::Null);
    assert_eq!(submission["version"], 1);
    let file_path = submission["filePath"].as_str().unwrap().to_string();
    assert!(file_path.starts_with("/uploads/"));
    assert!(file_path.ends_with("-final_report.pdf"));

    // 文件可直接访问
    let resp = test::call_service(&app, test::TestRequest::get().uri(&file_path).to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers().get(header::CONTENT_TYPE).unwrap(),
        "application/pdf"
    );

    // 分配
    let (status, body) = call!(
        app,
        test::TestRequest::post()
            .uri("/api/admin/assign")
            .insert_header((header::AUTHORIZATION, admin.clone()))
            .set_json(json!({"submissionId": submission_id, "facultyId": faculty_id}))
    );
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["message"], "Assigned");
    assert_eq!(body["data"]["submission"]["status"], "Assigned");

    // 教师待审列表
    let (status, body) = call!(
        app,
        test::TestRequest::get()
            .uri("/api/faculty/assigned")
            .insert_header((header::AUTHORIZATION, faculty.clone()))
    );
    assert_eq!(status, StatusCode::OK, "{body}");
    let assigned = body["data"]["submissions"].as_array().unwrap();
    assert_eq!(assigned.len(), 1);
    assert_eq!(assigned[0]["student"]["name"], "Alice");

    // 评审
    let (status, body) = call!(
        app,
        test::TestRequest::post()
            .uri("/api/faculty/review")
            .insert_header((header::AUTHORIZATION, faculty.clone()))
            .set_json(json!({
                "submissionId": submission_id,
                "decision": "Approved",
                "marks": 88,
                "remarks": "Well written"
            }))
    );
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["message"], "Reviewed");
    assert_eq!(body["data"]["newStatus"], "Approved");

    // 学生看到一条 Approved 评审，版本为 2
    let (status, body) = call!(
        app,
        test::TestRequest::get()
            .uri("/api/submissions/mine")
            .insert_header((header::AUTHORIZATION, student.clone()))
    );
    assert_eq!(status, StatusCode::OK, "{body}");
    let data = &body["data"];
    assert_eq!(data["submissions"][0]["version"], 2);
    assert_eq!(data["submissions"][0]["status"], "Approved");
    let reviews = data["reviews"].as_array().unwrap();
    assert_eq!(reviews.len(), 1);
    assert_eq!(reviews[0]["decision"], "Approved");
    assert_eq!(reviews[0]["marks"], 88);
    assert_eq!(reviews[0]["faculty"]["name"], "Bob");
    assert_eq!(data["pagination"]["total"], 1);

    // 统计
    let (status, body) = call!(
        app,
        test::TestRequest::get()
            .uri("/api/faculty/stats")
            .insert_header((header::AUTHORIZATION, faculty))
    );
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["stats"]["approved"], 1);
    assert_eq!(body["data"]["stats"]["reviews"], 1);

    let (status, body) = call!(
        app,
        test::TestRequest::get()
            .uri("/api/admin/stats")
            .insert_header((header::AUTHORIZATION, admin))
    );
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["stats"]["users"]["total"], 3);
    assert_eq!(body["data"]["stats"]["submissions"]["approved"], 1);
}

#[actix_web::test]
async fn test_submission_ownership() {
    let env = env().await;
    let app = test_app!(env);

    register!(app, "Alice", "alice@uni.edu", "student");
    register!(app, "Carol", "carol@uni.edu", "student");
    register!(app, "Root", "root@uni.edu", "admin");
    let alice = login!(app, "alice@uni.edu");
    let carol = login!(app, "carol@uni.edu");
    let admin = login!(app, "root@uni.edu");

    let (_, body) = call!(app, pdf_upload(&alice, "Compiler project"));
    let id = body["data"]["submission"]["id"].as_i64().unwrap();
    let uri = format!("/api/submissions/{id}");

    let (status, body) = call!(
        app,
        test::TestRequest::get()
            .uri(&uri)
            .insert_header((header::AUTHORIZATION, carol))
    );
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["success"], false);

    let (status, body) = call!(
        app,
        test::TestRequest::get()
            .uri(&uri)
            .insert_header((header::AUTHORIZATION, admin.clone()))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["submission"]["title"], "Compiler project");
    assert_eq!(body["data"]["submission"]["companyOrGuide"], "ACME Labs");
    assert_eq!(body["data"]["submission"]["type"], "internship");

    let (status, _) = call!(
        app,
        test::TestRequest::get()
            .uri("/api/submissions/9999")
            .insert_header((header::AUTHORIZATION, admin))
    );
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_guard_responses() {
    let env = env().await;
    let app = test_app!(env);

    let (status, body) = call!(app, test::TestRequest::get().uri("/api/admin/stats"));
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Token missing");

    let (status, body) = call!(
        app,
        test::TestRequest::get()
            .uri("/api/auth/me")
            .insert_header((header::AUTHORIZATION, "Bearer not-a-token"))
    );
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid token");

    register!(app, "Alice", "alice@uni.edu", "student");
    let student = login!(app, "alice@uni.edu");

    let (status, body) = call!(
        app,
        test::TestRequest::get()
            .uri("/api/admin/stats")
            .insert_header((header::AUTHORIZATION, student.clone()))
    );
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Forbidden: Role mismatch");

    let (status, body) = call!(
        app,
        test::TestRequest::get()
            .uri("/api/auth/me")
            .insert_header((header::AUTHORIZATION, student))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["user"]["email"], "alice@uni.edu");
    assert!(body["data"]["user"].get("passwordHash").is_none());
}

#[actix_web::test]
async fn test_auth_errors() {
    let env = env().await;
    let app = test_app!(env);

    register!(app, "Alice", "alice@uni.edu", "student");

    let (status, body) = call!(
        app,
        test::TestRequest::post().uri("/api/auth/register").set_json(json!({
            "name": "Alice Again",
            "email": "ALICE@uni.edu",
            "password": PASSWORD
        }))
    );
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "Email already registered");

    let (status, body) = call!(
        app,
        test::TestRequest::post().uri("/api/auth/register").set_json(json!({
            "name": "A",
            "email": "not-an-email",
            "password": "short"
        }))
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"].as_array().unwrap().len(), 3);

    for (email, password) in [("alice@uni.edu", "WrongPass123"), ("nobody@uni.edu", PASSWORD)] {
        let (status, body) = call!(
            app,
            test::TestRequest::post()
                .uri("/api/auth/login")
                .set_json(json!({"email": email, "password": password}))
        );
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "Invalid credentials");
    }
}

#[actix_web::test]
async fn test_upload_rejects_non_pdf() {
    let env = env().await;
    let app = test_app!(env);

    register!(app, "Alice", "alice@uni.edu", "student");
    let student = login!(app, "alice@uni.edu");

    // 声明为 PDF 但内容不是
    let (status, _) = call!(
        app,
        upload_request(
            &student,
            multipart_body("Fake report", "fake.pdf", "application/pdf", b"MZ\x90\x00binary"),
        )
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = call!(
        app,
        upload_request(
            &student,
            multipart_body("Text report", "notes.txt", "text/plain", b"hello"),
        )
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // 标题过短，文件写入后被删除
    let (status, body) = call!(app, pdf_upload(&student, "ab"));
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"][0]["field"], "title");

    let leftover = std::fs::read_dir(&env.upload_dir)
        .map(|entries| entries.count())
        .unwrap_or(0);
    assert_eq!(leftover, 0);
}

#[actix_web::test]
async fn test_upload_with_long_file_name() {
    let env = env().await;
    let app = test_app!(env);

    register!(app, "Alice", "alice@uni.edu", "student");
    let student = login!(app, "alice@uni.edu");

    let file_name = format!("{}.pdf", "a".repeat(240));
    let (status, body) = call!(
        app,
        upload_request(
            &student,
            multipart_body("Long name report", &file_name, "application/pdf", b"%PDF-1.4\n%test\n"),
        )
    );
    assert_eq!(status, StatusCode::CREATED, "{body}");
    let file_path = body["data"]["submission"]["filePath"].as_str().unwrap().to_string();
    assert!(file_path.ends_with(".pdf"));

    let resp = test::call_service(&app, test::TestRequest::get().uri(&file_path).to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_page_far_past_the_end_is_empty() {
    let env = env().await;
    let app = test_app!(env);

    register!(app, "Alice", "alice@uni.edu", "student");
    register!(app, "Bob", "bob@uni.edu", "faculty");
    register!(app, "Root", "root@uni.edu", "admin");
    let student = login!(app, "alice@uni.edu");
    let faculty = login!(app, "bob@uni.edu");
    let admin = login!(app, "root@uni.edu");

    let (status, _) = call!(app, pdf_upload(&student, "Summer internship"));
    assert_eq!(status, StatusCode::CREATED);

    let query = "page=9223372036854775807&limit=100";
    for (uri, token, list, total) in [
        ("/api/submissions/mine", &student, "submissions", 1),
        ("/api/admin/users", &admin, "users", 3),
        ("/api/admin/submissions", &admin, "submissions", 1),
        ("/api/faculty/assigned", &faculty, "submissions", 0),
        ("/api/faculty/reviews", &faculty, "reviews", 0),
    ] {
        let (status, body) = call!(
            app,
            test::TestRequest::get()
                .uri(&format!("{uri}?{query}"))
                .insert_header((header::AUTHORIZATION, token.clone()))
        );
        assert_eq!(status, StatusCode::OK, "{uri}: {body}");
        assert_eq!(body["data"][list], json!([]), "{uri}");
        assert_eq!(body["data"]["pagination"]["total"], total, "{uri}");
        assert_eq!(body["data"]["pagination"]["page"], i64::MAX, "{uri}");
    }
}

#[actix_web::test]
async fn test_pagination_validation_and_health() {
    let env = env().await;
    let app = test_app!(env);

    register!(app, "Root", "root@uni.edu", "admin");
    let admin = login!(app, "root@uni.edu");

    let (status, _) = call!(
        app,
        test::TestRequest::get()
            .uri("/api/admin/users?limit=0")
            .insert_header((header::AUTHORIZATION, admin.clone()))
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = call!(
        app,
        test::TestRequest::get()
            .uri("/api/admin/users?limit=500")
            .insert_header((header::AUTHORIZATION, admin))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["pagination"]["limit"], 100);
    assert_eq!(body["data"]["pagination"]["total"], 1);

    let (status, body) = call!(app, test::TestRequest::get().uri("/health"));
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"ok": true, "message": "Server Running"}));
}
