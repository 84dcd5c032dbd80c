//! PostgreSQL implementation of the patent repository.

use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{
    NewPatent, Patent, PatentCounts, PatentHolder, PatentKey, PatentQuery,
};
use crate::domain::repositories::PatentRepository;
use crate::error::AppError;

macro_rules! patent_columns {
    () => {
        "kind, reg_number, reg_date, appl_date, author_raw, owner_raw, address, name, actual, \
         subcategory, country_code, region, city, appl_number, patent_starting_date, \
         publication_url, author_count"
    };
}

/// `$n` is the filter id; matches patents owned by any tax number in it.
macro_rules! owned_by_filter {
    ($n:literal) => {
        concat!(
            "($", $n, "::int IS NULL OR EXISTS (",
            "SELECT 1 FROM ownership o ",
            "JOIN filter_tax_number f ON f.tax_number = o.person_tax_number ",
            "WHERE o.patent_kind = p.kind AND o.patent_reg_number = p.reg_number ",
            "AND f.filter_id = $", $n, "))"
        )
    };
}

const HAS_HOLDER: &str = "EXISTS (SELECT 1 FROM ownership o \
     WHERE o.patent_kind = p.kind AND o.patent_reg_number = p.reg_number)";

/// PostgreSQL repository for patents.
///
/// Listing, counting and statistics share one predicate shape so that every
/// optional criterion is a bound parameter: `($n IS NULL OR ...)`.
pub struct PgPatentRepository {
    pool: Arc<PgPool>,
}

impl PgPatentRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PatentRepository for PgPatentRepository {
    async fn create(&self, p: NewPatent) -> Result<Patent, AppError> {
        let patent = sqlx::query_as::<_, Patent>(concat!(
            "INSERT INTO patent (kind, reg_number, reg_date, appl_date, author_raw, owner_raw, \
             address, name, actual, subcategory, country_code, region, city, appl_number, \
             patent_starting_date, publication_url) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16) \
             RETURNING ",
            patent_columns!()
        ))
        .bind(p.kind)
        .bind(p.reg_number)
        .bind(p.reg_date)
        .bind(p.appl_date)
        .bind(p.author_raw)
        .bind(p.owner_raw)
        .bind(p.address)
        .bind(p.name)
        .bind(p.actual)
        .bind(p.subcategory)
        .bind(p.country_code)
        .bind(p.region)
        .bind(p.city)
        .bind(p.appl_number)
        .bind(p.patent_starting_date)
        .bind(p.publication_url)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(patent)
    }

    async fn find(&self, key: PatentKey) -> Result<Option<Patent>, AppError> {
        let patent = sqlx::query_as::<_, Patent>(concat!(
            "SELECT ",
            patent_columns!(),
            " FROM patent WHERE kind = $1 AND reg_number = $2"
        ))
        .bind(key.kind)
        .bind(key.reg_number)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(patent)
    }

    async fn list(
        &self,
        query: &PatentQuery,
        offset: i64,
        limit: Option<i64>,
    ) -> Result<Vec<Patent>, AppError> {
        let patents = sqlx::query_as::<_, Patent>(concat!(
            "SELECT ",
            patent_columns!(),
            " FROM patent p \
             WHERE ($1::int IS NULL OR p.kind = $1) \
             AND ($2::bool IS NULL OR p.actual = $2) \
             AND ",
            owned_by_filter!("3"),
            " ORDER BY p.actual DESC, p.kind, p.reg_number \
             LIMIT $5 OFFSET $4"
        ))
        .bind(query.kind)
        .bind(query.actual)
        .bind(query.filter_id)
        .bind(offset)
        .bind(limit)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(patents)
    }

    async fn count(&self, query: &PatentQuery) -> Result<i64, AppError> {
        let total = sqlx::query_scalar::<_, i64>(concat!(
            "SELECT COUNT(*) FROM patent p \
             WHERE ($1::int IS NULL OR p.kind = $1) \
             AND ($2::bool IS NULL OR p.actual = $2) \
             AND ",
            owned_by_filter!("3")
        ))
        .bind(query.kind)
        .bind(query.actual)
        .bind(query.filter_id)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(total)
    }

    async fn holders(&self, keys: &[PatentKey]) -> Result<Vec<PatentHolder>, AppError> {
        if keys.is_empty() {
            return Ok(Vec::new());
        }

        let kinds: Vec<i32> = keys.iter().map(|k| k.kind).collect();
        let numbers: Vec<i32> = keys.iter().map(|k| k.reg_number).collect();

        let holders = sqlx::query_as::<_, PatentHolder>(
            r#"
            SELECT o.patent_kind, o.patent_reg_number, pe.tax_number, pe.full_name, pe.short_name
            FROM UNNEST($1::int4[], $2::int4[]) AS k(kind, reg_number)
            JOIN ownership o
              ON o.patent_kind = k.kind AND o.patent_reg_number = k.reg_number
            JOIN person pe ON pe.tax_number = o.person_tax_number
            ORDER BY o.patent_kind, o.patent_reg_number, o.id
            "#,
        )
        .bind(kinds)
        .bind(numbers)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(holders)
    }

    async fn update(&self, key: PatentKey, p: Patent) -> Result<Option<Patent>, AppError> {
        let patent = sqlx::query_as::<_, Patent>(concat!(
            "UPDATE patent SET kind = $3, reg_number = $4, reg_date = $5, appl_date = $6, \
             author_raw = $7, owner_raw = $8, address = $9, name = $10, actual = $11, \
             subcategory = $12, country_code = $13, region = $14, city = $15, \
             appl_number = $16, patent_starting_date = $17, publication_url = $18 \
             WHERE kind = $1 AND reg_number = $2 \
             RETURNING ",
            patent_columns!()
        ))
        .bind(key.kind)
        .bind(key.reg_number)
        .bind(p.kind)
        .bind(p.reg_number)
        .bind(p.reg_date)
        .bind(p.appl_date)
        .bind(p.author_raw)
        .bind(p.owner_raw)
        .bind(p.address)
        .bind(p.name)
        .bind(p.actual)
        .bind(p.subcategory)
        .bind(p.country_code)
        .bind(p.region)
        .bind(p.city)
        .bind(p.appl_number)
        .bind(p.patent_starting_date)
        .bind(p.publication_url)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(patent)
    }

    async fn delete(&self, key: PatentKey) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM patent WHERE kind = $1 AND reg_number = $2")
            .bind(key.kind)
            .bind(key.reg_number)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn upsert_many(&self, patents: Vec<NewPatent>) -> Result<u64, AppError> {
        let mut tx = self.pool.begin().await?;
        let mut written = 0;

        for p in patents {
            let result = sqlx::query(
                r#"
                INSERT INTO patent (kind, reg_number, reg_date, appl_date, author_raw, owner_raw,
                    address, name, actual, subcategory, country_code, region, city, appl_number,
                    patent_starting_date, publication_url)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
                ON CONFLICT (kind, reg_number) DO UPDATE SET
                    reg_date = EXCLUDED.reg_date,
                    appl_date = EXCLUDED.appl_date,
                    author_raw = EXCLUDED.author_raw,
                    owner_raw = EXCLUDED.owner_raw,
                    address = EXCLUDED.address,
                    name = EXCLUDED.name,
                    actual = EXCLUDED.actual,
                    subcategory = EXCLUDED.subcategory,
                    country_code = EXCLUDED.country_code,
                    region = EXCLUDED.region,
                    city = EXCLUDED.city,
                    appl_number = EXCLUDED.appl_number,
                    patent_starting_date = EXCLUDED.patent_starting_date,
                    publication_url = EXCLUDED.publication_url
                "#,
            )
            .bind(p.kind)
            .bind(p.reg_number)
            .bind(p.reg_date)
            .bind(p.appl_date)
            .bind(p.author_raw)
            .bind(p.owner_raw)
            .bind(p.address)
            .bind(p.name)
            .bind(p.actual)
            .bind(p.subcategory)
            .bind(p.country_code)
            .bind(p.region)
            .bind(p.city)
            .bind(p.appl_number)
            .bind(p.patent_starting_date)
            .bind(p.publication_url)
            .execute(&mut *tx)
            .await?;

            written += result.rows_affected();
        }

        tx.commit().await?;
        Ok(written)
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(self.pool.as_ref()).await?;
        Ok(())
    }

    async fn counts(&self, filter_id: Option<i32>) -> Result<PatentCounts, AppError> {
        let totals_sql = format!(
            "SELECT COUNT(*), \
             COUNT(*) FILTER (WHERE p.country_code = 'RU'), \
             COUNT(*) FILTER (WHERE {has}), \
             COUNT(*) FILTER (WHERE p.country_code = 'RU' AND {has}) \
             FROM patent p WHERE {filter}",
            has = HAS_HOLDER,
            filter = owned_by_filter!("1"),
        );
        let (total, total_ru, with_holders, ru_with_holders) =
            sqlx::query_as::<_, (i64, i64, i64, i64)>(&totals_sql)
                .bind(filter_id)
                .fetch_one(self.pool.as_ref())
                .await?;

        let by_author_count = sqlx::query_as::<_, (String, i64)>(concat!(
            "SELECT CASE \
                 WHEN p.author_count = 0 THEN '0' \
                 WHEN p.author_count = 1 THEN '1' \
                 WHEN p.author_count <= 5 THEN '2–5' \
                 ELSE '5+' END AS author_group, \
             COUNT(*) \
             FROM patent p WHERE ",
            owned_by_filter!("1"),
            " GROUP BY author_group ORDER BY author_group"
        ))
        .bind(filter_id)
        .fetch_all(self.pool.as_ref())
        .await?;

        let by_kind = sqlx::query_as::<_, (i32, i64)>(concat!(
            "SELECT p.kind, COUNT(*) FROM patent p WHERE ",
            owned_by_filter!("1"),
            " GROUP BY p.kind ORDER BY p.kind"
        ))
        .bind(filter_id)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(PatentCounts {
            total,
            total_ru,
            with_holders,
            ru_with_holders,
            by_author_count,
            by_kind,
        })
    }
}
