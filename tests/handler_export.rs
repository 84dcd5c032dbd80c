mod common;

use axum_test::TestServer;
use axum_test::multipart::{MultipartForm, Part};
use serde_json::Value;
use sqlx::PgPool;

fn csv_form(body: &str) -> MultipartForm {
    MultipartForm::new().add_part(
        "file",
        Part::bytes(body.as_bytes().to_vec())
            .file_name("patents.csv")
            .mime_type("text/csv"),
    )
}

#[sqlx::test]
async fn test_export_returns_csv_attachment(pool: PgPool) {
    common::insert_patent(&pool, 1, 1, "Способ", true).await;
    common::insert_patent(&pool, 2, 2, "Устройство", false).await;
    let server = TestServer::new(common::create_test_app(pool)).unwrap();

    let response = server.get("/patents/export?actual=true").await;
    response.assert_status_ok();
    assert_eq!(
        response.header("content-type").to_str().unwrap(),
        "text/csv; charset=utf-8"
    );
    assert!(
        response
            .header("content-disposition")
            .to_str()
            .unwrap()
            .contains("patents_export.csv")
    );

    let bytes = response.as_bytes();
    let text = String::from_utf8_lossy(&bytes[3..]).to_string();
    assert!(text.starts_with("kind,kind_name,reg_number,"));
    assert_eq!(text.lines().count(), 2);
    assert!(text.contains("Способ"));
}

#[sqlx::test]
async fn test_export_unknown_filter(pool: PgPool) {
    let server = TestServer::new(common::create_test_app(pool)).unwrap();

    server
        .get("/patents/export?filter_id=12")
        .await
        .assert_status_not_found();
}

#[sqlx::test]
async fn test_upload_imports_rows(pool: PgPool) {
    common::insert_patent(&pool, 3, 101, "Старое имя", true).await;
    let server = TestServer::new(common::create_test_app(pool)).unwrap();

    let csv = "kind;reg_number;name;patent_starting_date;actual\n\
               3;101;Флакон;01.02.2019;Неактуально\n\
               1;7;Способ;2020-05-05;Актуально\n";
    let response = server.post("/uploadfile").multipart(csv_form(csv)).await;
    response.assert_status_ok();
    let json = response.json::<Value>();
    assert_eq!(json["filename"], "patents.csv");
    assert_eq!(json["imported"], 2);

    let patent = server.get("/patents/3/101").await.json::<Value>();
    assert_eq!(patent["name"], "Флакон");
    assert_eq!(patent["actual"], false);
    assert_eq!(patent["patent_starting_date"], "2019-02-01");
}

#[sqlx::test]
async fn test_upload_reports_bad_line(pool: PgPool) {
    let server = TestServer::new(common::create_test_app(pool)).unwrap();

    let csv = "kind,reg_number,name,patent_starting_date\n\
               1,1,Способ,2020-01-01\n\
               9,2,Плохой,2020-01-01\n";
    let response = server.post("/uploadfile").multipart(csv_form(csv)).await;
    response.assert_status(axum::http::StatusCode::UNPROCESSABLE_ENTITY);
    let json = response.json::<Value>();
    assert_eq!(json["error"]["details"]["line"], 3);
    assert_eq!(json["error"]["details"]["filename"], "patents.csv");

    let list = server.get("/patents").await.json::<Value>();
    assert_eq!(list["total"], 0);
}

#[sqlx::test]
async fn test_upload_without_file_field(pool: PgPool) {
    let server = TestServer::new(common::create_test_app(pool)).unwrap();

    let form = MultipartForm::new().add_text("comment", "no file");
    server
        .post("/uploadfile")
        .multipart(form)
        .await
        .assert_status(axum::http::StatusCode::UNPROCESSABLE_ENTITY);
}
