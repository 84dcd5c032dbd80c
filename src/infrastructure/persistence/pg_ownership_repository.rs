//! PostgreSQL implementation of the ownership repository.

use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{NewOwnership, Ownership, OwnershipQuery};
use crate::domain::repositories::OwnershipRepository;
use crate::error::AppError;

pub struct PgOwnershipRepository {
    pool: Arc<PgPool>,
}

impl PgOwnershipRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OwnershipRepository for PgOwnershipRepository {
    async fn create(&self, new_ownership: NewOwnership) -> Result<Ownership, AppError> {
        // FK violations surface as 404 through `map_sqlx_error`
        let ownership = sqlx::query_as::<_, Ownership>(
            r#"
            INSERT INTO ownership (person_tax_number, patent_kind, patent_reg_number)
            VALUES ($1, $2, $3)
            RETURNING id, person_tax_number, patent_kind, patent_reg_number
            "#,
        )
        .bind(new_ownership.person_tax_number)
        .bind(new_ownership.patent_kind)
        .bind(new_ownership.patent_reg_number)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(ownership)
    }

    async fn list(&self, query: &OwnershipQuery) -> Result<Vec<Ownership>, AppError> {
        let rows = sqlx::query_as::<_, Ownership>(
            r#"
            SELECT id, person_tax_number, patent_kind, patent_reg_number
            FROM ownership
            WHERE ($1::text IS NULL OR person_tax_number = $1)
              AND ($2::int IS NULL OR patent_kind = $2)
              AND ($3::int IS NULL OR patent_reg_number = $3)
            ORDER BY id
            "#,
        )
        .bind(query.person_tax_number.as_deref())
        .bind(query.patent_kind)
        .bind(query.patent_reg_number)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows)
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM ownership WHERE id = $1")
            .bind(id)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
