mod common;

use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::{Value, json};
use sqlx::PgPool;

#[sqlx::test]
async fn test_filter_scopes_listing(pool: PgPool) {
    common::insert_person(&pool, "7701234567", "1027700132195", "г. Москва", 1).await;
    common::insert_patent(&pool, 1, 1, "owned", true).await;
    common::insert_patent(&pool, 1, 2, "other", true).await;
    common::link(&pool, "7701234567", 1, 1).await;
    let server = TestServer::new(common::create_test_app(pool)).unwrap();

    let response = server
        .post("/filters")
        .json(&json!({ "name": "Кластер", "tax_numbers": ["7701234567", " 7701234567 "] }))
        .await;
    response.assert_status(StatusCode::CREATED);
    let filter = response.json::<Value>();
    assert_eq!(filter["tax_numbers"], json!(["7701234567"]));
    let id = filter["id"].as_i64().unwrap();

    let json = server
        .get(&format!("/patents?filter_id={id}"))
        .await
        .json::<Value>();
    assert_eq!(json["total"], 1);
    assert_eq!(json["items"][0]["reg_number"], 1);

    let list = server.get("/filters").await.json::<Value>();
    assert_eq!(list[0]["size"], 1);

    server
        .delete(&format!("/filters/{id}"))
        .await
        .assert_status(StatusCode::NO_CONTENT);
    server
        .get(&format!("/filters/{id}"))
        .await
        .assert_status_not_found();
}

#[sqlx::test]
async fn test_filter_rejects_bad_tax_numbers(pool: PgPool) {
    let server = TestServer::new(common::create_test_app(pool)).unwrap();

    let response = server
        .post("/filters")
        .json(&json!({ "tax_numbers": ["7701234567", "abc"] }))
        .await;
    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        response.json::<Value>()["error"]["details"]["invalid"],
        json!(["abc"])
    );
}

#[sqlx::test]
async fn test_ownership_endpoints(pool: PgPool) {
    common::insert_person(&pool, "7701234567", "1027700132195", "г. Москва", 1).await;
    common::insert_patent(&pool, 2, 9, "m", true).await;
    let server = TestServer::new(common::create_test_app(pool)).unwrap();

    let response = server
        .post("/ownerships")
        .json(&json!({
            "person_tax_number": "7701234567",
            "patent_kind": 2,
            "patent_reg_number": 9
        }))
        .await;
    response.assert_status(StatusCode::CREATED);
    let id = response.json::<Value>()["id"].as_i64().unwrap();

    let list = server
        .get("/ownerships?person_tax_number=7701234567")
        .await
        .json::<Value>();
    assert_eq!(list.as_array().unwrap().len(), 1);

    let missing = server
        .post("/ownerships")
        .json(&json!({
            "person_tax_number": "7701234567",
            "patent_kind": 1,
            "patent_reg_number": 404
        }))
        .await;
    missing.assert_status_not_found();

    server
        .delete(&format!("/ownerships/{id}"))
        .await
        .assert_status(StatusCode::NO_CONTENT);
    server
        .delete(&format!("/ownerships/{id}"))
        .await
        .assert_status_not_found();
}
