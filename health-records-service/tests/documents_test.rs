mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use common::{body_bytes, body_json, TestApp, TEST_PROFILE_ID};

const BOUNDARY: &str = "health-records-test-boundary";

fn multipart_body(fields: &[(&str, &str)], file: Option<(&str, &str, &[u8])>) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
                BOUNDARY, name, value
            )
            .as_bytes(),
        );
    }
    if let Some((file_name, content_type, data)) = file {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                BOUNDARY, file_name, content_type
            )
            .as_bytes(),
        );
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

async fn upload(app: &TestApp, body: Vec<u8>) -> axum::response::Response {
    app.request(
        Request::builder()
            .method("POST")
            .uri("/documents")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .header(header::AUTHORIZATION, format!("Bearer {}", app.token()))
            .body(Body::from(body))
            .unwrap(),
    )
    .await
}

#[tokio::test]
async fn upload_then_download_round_trips_the_file() {
    let app = TestApp::spawn().await;
    app.seed_profile();
    let pdf = b"%PDF-1.4 lab results".to_vec();

    let response = upload(
        &app,
        multipart_body(
            &[
                ("profile_id", TEST_PROFILE_ID),
                ("title", "Lipid panel"),
                ("document_type", "lab_result"),
                ("facility_name", "City Lab"),
            ],
            Some(("lipids.pdf", "application/pdf", &pdf)),
        ),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let document = body_json(response).await;
    let id = document["id"].as_str().unwrap().to_string();
    assert_eq!(document["title"], "Lipid panel");
    assert_eq!(document["facility_name"], "City Lab");
    assert_eq!(document["mime_type"], "application/pdf");
    assert_eq!(document["file_url"], format!("/documents/{}/file", id));
    assert_eq!(app.store.records("medical_documents").len(), 1);

    let response = app.get(&format!("/documents/{}/file", id)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "application/pdf");
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "inline; filename=\"Lipid_panel.pdf\""
    );
    assert_eq!(body_bytes(response).await, pdf);
}

#[tokio::test]
async fn upload_without_file_is_rejected() {
    let app = TestApp::spawn().await;
    app.seed_profile();

    let response = upload(
        &app,
        multipart_body(
            &[("profile_id", TEST_PROFILE_ID), ("document_type", "lab_result")],
            None,
        ),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(app.store.records("medical_documents").is_empty());
}

#[tokio::test]
async fn upload_for_unknown_profile_is_not_found() {
    let app = TestApp::spawn().await;

    let response = upload(
        &app,
        multipart_body(
            &[("profile_id", "nobody"), ("document_type", "imaging")],
            Some(("scan.png", "image/png", b"\x89PNG....")),
        ),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(app.store.records("medical_documents").is_empty());
}

#[tokio::test]
async fn download_of_unknown_document_is_not_found() {
    let app = TestApp::spawn().await;

    let response = app.get("/documents/missing/file").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
