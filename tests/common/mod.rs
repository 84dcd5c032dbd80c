#![allow(dead_code)]

use metrics_exporter_prometheus::PrometheusBuilder;
use patent_registry::api::routes::registry_routes;
use patent_registry::domain::export_worker::run_export_worker;
use patent_registry::infrastructure::cache::NullCache;
use patent_registry::state::{AppState, Repositories, StateOptions};
use axum::Router;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

pub async fn insert_patent(pool: &PgPool, kind: i32, reg_number: i32, name: &str, actual: bool) {
    sqlx::query(
        "INSERT INTO patent (kind, reg_number, name, actual, country_code, author_raw, \
         patent_starting_date) VALUES ($1, $2, $3, $4, 'RU', 'Иванов И.И., Петров П.П.', \
         DATE '2020-01-10')",
    )
    .bind(kind)
    .bind(reg_number)
    .bind(name)
    .bind(actual)
    .execute(pool)
    .await
    .unwrap();
}

pub async fn insert_foreign_patent(pool: &PgPool, kind: i32, reg_number: i32) {
    sqlx::query(
        "INSERT INTO patent (kind, reg_number, name, country_code, patent_starting_date) \
         VALUES ($1, $2, 'Foreign', 'US', DATE '2019-06-01')",
    )
    .bind(kind)
    .bind(reg_number)
    .execute(pool)
    .await
    .unwrap();
}

pub async fn insert_person(pool: &PgPool, tax_number: &str, ogrn: &str, region: &str, uk: i16) {
    sqlx::query(
        "INSERT INTO person (tax_number, kind, full_name, short_name, ogrn, region, uk, okopf, \
         category) VALUES ($1, 1, $2, $2, $3, $4, $5, '12300', 'Малое предприятие')",
    )
    .bind(tax_number)
    .bind(format!("ООО {tax_number}"))
    .bind(ogrn)
    .bind(region)
    .bind(uk)
    .execute(pool)
    .await
    .unwrap();
}

pub async fn link(pool: &PgPool, tax_number: &str, kind: i32, reg_number: i32) {
    sqlx::query(
        "INSERT INTO ownership (person_tax_number, patent_kind, patent_reg_number) \
         VALUES ($1, $2, $3)",
    )
    .bind(tax_number)
    .bind(kind)
    .bind(reg_number)
    .execute(pool)
    .await
    .unwrap();
}

pub async fn insert_filter(pool: &PgPool, tax_numbers: &[&str]) -> i32 {
    let id: i32 =
        sqlx::query_scalar("INSERT INTO tax_number_filter (name) VALUES ('test') RETURNING id")
            .fetch_one(pool)
            .await
            .unwrap();

    for tax_number in tax_numbers {
        sqlx::query("INSERT INTO filter_tax_number (filter_id, tax_number) VALUES ($1, $2)")
            .bind(id)
            .bind(tax_number)
            .execute(pool)
            .await
            .unwrap();
    }

    id
}

/// State over the given pool with caching disabled and a live export worker.
pub fn create_test_state(pool: PgPool) -> AppState {
    let repos = Repositories::postgres(Arc::new(pool));
    let (tx, rx) = mpsc::channel(8);
    tokio::spawn(run_export_worker(rx, repos.patents.clone(), 2));

    AppState::new(
        repos,
        Arc::new(NullCache::new()),
        tx,
        PrometheusBuilder::new().build_recorder().handle(),
        StateOptions {
            cache_ttl_seconds: 60,
            export_timeout: Duration::from_secs(5),
        },
    )
}

pub fn create_test_app(pool: PgPool) -> Router {
    registry_routes().with_state(create_test_state(pool))
}
