//! HTTP-level integration tests for the contractor registry.

mod common;

use axum::http::{Method, StatusCode};
use common::{body_json, create_contractor, delete_auth, get_auth, login, send, MultipartForm};

#[tokio::test]
async fn create_with_logo_and_list() {
    let t = common::build_test_app();
    let token = login(&t.app).await;

    let request = MultipartForm::new()
        .text("name", "Metro Builders")
        .text("contactPerson", "Ana Santos")
        .text("email", "ana@metro.ph")
        .text("phone", "0917-111-2222")
        .text("experience", "8")
        .text("address", "Cubao")
        .text("expertise", "Roads, Drainage")
        .file("logo", "metro.png", b"png")
        .into_request(Method::POST, "/api/v1/contractors", &token);
    let response = send(&t.app, request).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let id = body_json(response).await["data"]["id"].as_str().unwrap().to_string();

    let response = get_auth(&t.app, "/api/v1/contractors", &token).await;
    let rows = body_json(response).await["data"].clone();
    assert_eq!(rows.as_array().unwrap().len(), 1);
    assert_eq!(rows[0]["id"], id.as_str());
    assert_eq!(rows[0]["logo"], "https://img.test/metro.png");
    assert_eq!(rows[0]["has_logo"], true);
    assert_eq!(rows[0]["expertise"], serde_json::json!(["Roads", "Drainage"]));

    let response = get_auth(&t.app, &format!("/api/v1/contractors/{id}"), &token).await;
    let stored = body_json(response).await["data"].clone();
    assert_eq!(stored["logo"]["path"], "https://img.test/metro.png");
    assert_eq!(stored["logo"]["name"], "Metro Builders");
    assert_eq!(stored["documents"], serde_json::json!([]));
}

#[tokio::test]
async fn failed_logo_upload_still_registers() {
    let t = common::build_test_app();
    let token = login(&t.app).await;
    t.image_host.set_failing(true);

    let request = MultipartForm::new()
        .text("name", "No Logo Inc")
        .file("logo", "logo.png", b"png")
        .into_request(Method::POST, "/api/v1/contractors", &token);
    let response = send(&t.app, request).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = get_auth(&t.app, "/api/v1/contractors", &token).await;
    let rows = body_json(response).await["data"].clone();
    assert_eq!(rows[0]["logo"], "No Logo");
    assert_eq!(rows[0]["has_logo"], false);
}

#[tokio::test]
async fn name_is_required() {
    let t = common::build_test_app();
    let token = login(&t.app).await;

    let request = MultipartForm::new()
        .text("name", "   ")
        .text("email", "x@y.ph")
        .into_request(Method::POST, "/api/v1/contractors", &token);
    let response = send(&t.app, request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn update_keeps_fields_left_out() {
    let t = common::build_test_app();
    let token = login(&t.app).await;
    let id = create_contractor(&t.app, &token, "BuildRight Corp").await;
    let uri = format!("/api/v1/contractors/{id}");

    let request = MultipartForm::new()
        .text("phone", "02-8888-0000")
        .into_request(Method::PUT, &uri, &token);
    let response = send(&t.app, request).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let stored = body_json(get_auth(&t.app, &uri, &token).await).await["data"].clone();
    assert_eq!(stored["name"], "BuildRight Corp");
    assert_eq!(stored["phone"], "02-8888-0000");
    assert_eq!(stored["contactPerson"], "Juan Dela Cruz");
}

#[tokio::test]
async fn update_of_missing_contractor_is_404() {
    let t = common::build_test_app();
    let token = login(&t.app).await;

    let request = MultipartForm::new()
        .text("name", "Ghost")
        .into_request(Method::PUT, "/api/v1/contractors/ghost", &token);
    let response = send(&t.app, request).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn options_start_with_placeholder() {
    let t = common::build_test_app();
    let token = login(&t.app).await;
    let id = create_contractor(&t.app, &token, "BuildRight Corp").await;

    let response = get_auth(&t.app, "/api/v1/contractors/options", &token).await;
    let options = body_json(response).await["data"].clone();
    assert_eq!(options[0]["value"], "");
    assert_eq!(options[0]["label"], "Select Contractor");
    assert_eq!(options[1]["value"], id.as_str());
    assert_eq!(options[1]["label"], "BuildRight Corp");
}

#[tokio::test]
async fn delete_contractor() {
    let t = common::build_test_app();
    let token = login(&t.app).await;
    let id = create_contractor(&t.app, &token, "Short Lived").await;
    let uri = format!("/api/v1/contractors/{id}");

    assert_eq!(delete_auth(&t.app, &uri, &token).await.status(), StatusCode::NO_CONTENT);
    assert_eq!(get_auth(&t.app, &uri, &token).await.status(), StatusCode::NOT_FOUND);
    assert_eq!(delete_auth(&t.app, &uri, &token).await.status(), StatusCode::NOT_FOUND);
}
