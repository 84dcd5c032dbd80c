mod common;

use patent_registry::domain::entities::{NewPerson, PatentKey};
use patent_registry::domain::repositories::PersonRepository;
use patent_registry::infrastructure::persistence::PgPersonRepository;
use patent_registry::prelude::AppError;
use sqlx::PgPool;
use std::sync::Arc;

fn new_person(tax_number: &str, ogrn: &str) -> NewPerson {
    NewPerson {
        tax_number: tax_number.to_string(),
        kind: 1,
        full_name: Some("ООО Альфа".to_string()),
        short_name: None,
        legal_address: None,
        fact_address: None,
        reg_date: None,
        active: true,
        category: None,
        okopf: Some("12300".to_string()),
        okvad: None,
        ogrn: ogrn.to_string(),
        region: Some("Тверская область".to_string()),
        uk: 0,
        support_type: None,
    }
}

#[sqlx::test]
async fn test_create_find_and_duplicate_ogrn(pool: PgPool) {
    let repo = PgPersonRepository::new(Arc::new(pool));

    let created = repo
        .create(new_person("7701234567", "1027700132195"))
        .await
        .unwrap();
    assert_eq!(
        repo.find("7701234567").await.unwrap(),
        Some(created.clone())
    );

    let err = repo
        .create(new_person("7709999999", "1027700132195"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict { .. }));
}

#[sqlx::test]
async fn test_patents_of(pool: PgPool) {
    common::insert_person(&pool, "7701234567", "1027700132195", "г. Москва", 0).await;
    common::insert_patent(&pool, 2, 5, "b", true).await;
    common::insert_patent(&pool, 1, 9, "a", true).await;
    common::link(&pool, "7701234567", 2, 5).await;
    common::link(&pool, "7701234567", 1, 9).await;
    let repo = PgPersonRepository::new(Arc::new(pool));

    let keys = repo.patents_of("7701234567").await.unwrap();
    assert_eq!(keys, vec![PatentKey::new(1, 9), PatentKey::new(2, 5)]);
    assert!(repo.patents_of("0000000000").await.unwrap().is_empty());
}

#[sqlx::test]
async fn test_update_renames_and_delete_cascades(pool: PgPool) {
    common::insert_person(&pool, "7701234567", "1027700132195", "г. Москва", 0).await;
    common::insert_patent(&pool, 1, 1, "a", true).await;
    common::link(&pool, "7701234567", 1, 1).await;
    let repo = PgPersonRepository::new(Arc::new(pool.clone()));

    let mut person = repo.find("7701234567").await.unwrap().unwrap();
    person.tax_number = "770123456789".to_string();
    let updated = repo.update("7701234567", person).await.unwrap().unwrap();
    assert_eq!(updated.tax_number, "770123456789");
    assert_eq!(repo.patents_of("770123456789").await.unwrap().len(), 1);

    assert!(repo.delete("770123456789").await.unwrap());
    assert!(!repo.delete("770123456789").await.unwrap());

    let left: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM ownership")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(left, 0);
}

#[sqlx::test]
async fn test_counts_and_moscow_counts(pool: PgPool) {
    common::insert_person(&pool, "7701234567", "1027700132195", "г. Москва", 1).await;
    common::insert_person(&pool, "7702345678", "1027700132196", "г. Москва", 0).await;
    common::insert_person(&pool, "6901234567", "1026900132197", "Тверская область", 1).await;
    let repo = PgPersonRepository::new(Arc::new(pool.clone()));

    let all = repo.counts(None).await.unwrap();
    assert_eq!(all.total, 3);
    assert_eq!(all.cluster_members, 2);
    assert_eq!(all.by_kind, vec![(1, 3)]);
    assert_eq!(
        all.by_category,
        vec![(Some("Малое предприятие".to_string()), 3)]
    );

    let msk = repo.moscow_counts(None).await.unwrap();
    assert_eq!(msk.total, 2);
    assert_eq!(msk.cluster_members, 1);

    let filter_id = common::insert_filter(&pool, &["7701234567", "6901234567"]).await;
    let scoped = repo.moscow_counts(Some(filter_id)).await.unwrap();
    assert_eq!(scoped.total, 1);
}

#[sqlx::test]
async fn test_patent_breakdown_counts_links(pool: PgPool) {
    common::insert_person(&pool, "7701234567", "1027700132195", "г. Москва", 1).await;
    common::insert_patent(&pool, 1, 1, "a", true).await;
    common::insert_patent(&pool, 3, 2, "b", true).await;
    common::link(&pool, "7701234567", 1, 1).await;
    common::link(&pool, "7701234567", 3, 2).await;
    let repo = PgPersonRepository::new(Arc::new(pool));

    let breakdown = repo.patent_breakdown().await.unwrap();
    assert_eq!(breakdown.okopf, vec![(Some("12300".to_string()), 2)]);
    // industrial designs carry no MPK class
    assert_eq!(breakdown.mpk, vec![(None, 1)]);
}
