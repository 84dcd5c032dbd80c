//! PostgreSQL implementation of the tax-number filter repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{FilterSummary, NewFilter, TaxNumberFilter};
use crate::domain::repositories::FilterRepository;
use crate::error::AppError;

pub struct PgFilterRepository {
    pool: Arc<PgPool>,
}

impl PgFilterRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FilterRepository for PgFilterRepository {
    async fn create(&self, new_filter: NewFilter) -> Result<TaxNumberFilter, AppError> {
        let mut tx = self.pool.begin().await?;

        let (id, name, created_at) = sqlx::query_as::<_, (i32, Option<String>, DateTime<Utc>)>(
            "INSERT INTO tax_number_filter (name) VALUES ($1) RETURNING id, name, created_at",
        )
        .bind(new_filter.name)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO filter_tax_number (filter_id, tax_number)
            SELECT $1, t FROM UNNEST($2::text[]) AS t
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(id)
        .bind(&new_filter.tax_numbers)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(TaxNumberFilter {
            id,
            name,
            created_at,
            tax_numbers: new_filter.tax_numbers,
        })
    }

    async fn find(&self, id: i32) -> Result<Option<TaxNumberFilter>, AppError> {
        let header = sqlx::query_as::<_, (i32, Option<String>, DateTime<Utc>)>(
            "SELECT id, name, created_at FROM tax_number_filter WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        let Some((id, name, created_at)) = header else {
            return Ok(None);
        };

        let tax_numbers = sqlx::query_scalar::<_, String>(
            "SELECT tax_number FROM filter_tax_number WHERE filter_id = $1 ORDER BY tax_number",
        )
        .bind(id)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(Some(TaxNumberFilter {
            id,
            name,
            created_at,
            tax_numbers,
        }))
    }

    async fn exists(&self, id: i32) -> Result<bool, AppError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM tax_number_filter WHERE id = $1)",
        )
        .bind(id)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(exists)
    }

    async fn list(&self) -> Result<Vec<FilterSummary>, AppError> {
        let rows = sqlx::query_as::<_, FilterSummary>(
            r#"
            SELECT t.id, t.name, t.created_at, COUNT(f.tax_number) AS size
            FROM tax_number_filter t
            LEFT JOIN filter_tax_number f ON f.filter_id = t.id
            GROUP BY t.id
            ORDER BY t.id
            "#,
        )
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows)
    }

    async fn delete(&self, id: i32) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM tax_number_filter WHERE id = $1")
            .bind(id)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
