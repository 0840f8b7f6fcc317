mod common;

use actix_web::{
    http::{header, StatusCode},
    test, web, App,
};
use edutrack::routes::{self, AppState};
use serde_json::json;

use common::{MockApi, STUDENT};

const BOUNDARY: &str = "----edutrack-test-boundary";

macro_rules! page {
    ($app:expr, $req:expr) => {{
        let body = test::call_and_read_body(&$app, $req.to_request()).await;
        String::from_utf8(body.to_vec()).unwrap()
    }};
}

fn multipart_body(filename: &str, contents: &str) -> String {
    format!(
        "--{BOUNDARY}\r\n\
         Content-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\n\
         Content-Type: text/csv\r\n\r\n\
         {contents}\r\n\
         --{BOUNDARY}--\r\n"
    )
}

fn upload_request(filename: &str, contents: &str) -> test::TestRequest {
    test::TestRequest::post()
        .uri("/predict_csv")
        .insert_header((
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        ))
        .set_payload(multipart_body(filename, contents))
}

macro_rules! app_with {
    ($mock:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new(AppState::new($mock.clone())))
                .configure(routes::configure::<MockApi>),
        )
        .await
    };
}

#[actix_web::test]
async fn index_renders_empty_form() {
    let mock = MockApi::replying(200, json!({}));
    let app = app_with!(mock);

    let html = page!(app, test::TestRequest::get().uri("/"));
    assert!(html.contains("🎓 EduTrack - Student Performance Predictor"));
    assert!(html.contains("📁 Upload Student Data (CSV)"));
    assert!(html.contains(r#"accept=".csv""#));
    assert_eq!(mock.call_count(), 0);
}

#[actix_web::test]
async fn predict_shows_label_and_sends_all_fields() {
    let mock = MockApi::replying(200, json!({"predicted_grade_class": 2}));
    let app = app_with!(mock);

    let req = test::TestRequest::post().uri("/predict").set_form(STUDENT);
    let html = page!(app, req);

    assert!(html.contains("Predicted Grade:"));
    assert!(html.contains("Good 👍"));
    assert_eq!(mock.call_count(), 1);

    let sent = mock.sent_values.lock().unwrap().clone().unwrap();
    let sent = serde_json::to_value(&sent).unwrap();
    let sent = sent.as_object().unwrap();
    assert_eq!(sent.len(), 13);
    assert_eq!(sent["GPA"], json!("3.1"));
    assert_eq!(sent["Gender"], json!("1"));
}

#[actix_web::test]
async fn predict_with_empty_field_makes_no_call() {
    let mock = MockApi::replying(200, json!({"predicted_grade_class": 1}));
    let app = app_with!(mock);

    let mut student = STUDENT;
    student[5].1 = "";
    let req = test::TestRequest::post().uri("/predict").set_form(student);
    let html = page!(app, req);

    assert_eq!(mock.call_count(), 0);
    assert!(html.contains("Absences is required"));
    assert!(!html.contains("Predicted Grade:"));
}

#[actix_web::test]
async fn predict_service_error_shows_generic_message() {
    let mock = MockApi::replying(200, json!({"error": "bad input"}));
    let app = app_with!(mock);

    let req = test::TestRequest::post().uri("/predict").set_form(STUDENT);
    let html = page!(app, req);

    assert!(html.contains("⚠️ Something went wrong. Please try again!"));
    assert!(!html.contains("bad input"));
    assert!(!html.contains("Predicted Grade:"));
}

#[actix_web::test]
async fn predict_server_failure_shows_generic_message() {
    let mock = MockApi::replying(500, json!({"predicted_grade_class": 1}));
    let app = app_with!(mock);

    let req = test::TestRequest::post().uri("/predict").set_form(STUDENT);
    let html = page!(app, req);

    assert!(html.contains("⚠️ Something went wrong. Please try again!"));
    assert!(!html.contains("Excellent"));
}

#[actix_web::test]
async fn upload_without_file_warns_and_makes_no_call() {
    let mock = MockApi::replying(200, json!({"message": "done"}));
    let app = app_with!(mock);

    let html = page!(app, upload_request("", ""));

    assert!(html.contains("⚠️ Please select a CSV file first."));
    assert_eq!(mock.call_count(), 0);
}

#[actix_web::test]
async fn upload_success_triggers_download_once() {
    let mock = MockApi::replying(200, json!({"message": "done", "download_url": "/files/out.csv"}));
    let app = app_with!(mock);

    let html = page!(app, upload_request("students.csv", "Age,Gender\n17,1"));
    assert!(html.contains("<p>done</p>"));
    assert!(html.contains(r#"href="/files/out.csv" download="predicted_output.csv""#));

    let sent = mock.sent_file.lock().unwrap().clone().unwrap();
    assert_eq!(sent.name, "students.csv");
    assert_eq!(sent.bytes, b"Age,Gender\n17,1".to_vec());

    let html = page!(app, test::TestRequest::get().uri("/"));
    assert!(html.contains("<p>done</p>"));
    assert!(!html.contains("result-download"));
}

#[actix_web::test]
async fn upload_service_error_is_shown_without_download() {
    let mock = MockApi::replying(200, json!({"error": "invalid csv"}));
    let app = app_with!(mock);

    let html = page!(app, upload_request("students.csv", "x"));
    assert!(html.contains("❌ invalid csv"));
    assert!(!html.contains("result-download"));
}

#[actix_web::test]
async fn theme_toggle_redirects_and_flips_class() {
    let mock = MockApi::replying(200, json!({}));
    let app = app_with!(mock);

    let resp = test::call_service(&app, test::TestRequest::post().uri("/theme").to_request()).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(resp.headers().get(header::LOCATION).unwrap(), "/");

    let html = page!(app, test::TestRequest::get().uri("/"));
    assert!(html.contains(r#"<body class="dark">"#));
    assert!(html.contains("🌞 Light Mode"));
}
