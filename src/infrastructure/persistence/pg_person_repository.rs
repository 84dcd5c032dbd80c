//! PostgreSQL implementation of the person repository.

use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::stats::NamedCount;
use crate::domain::entities::{
    NewPerson, PatentBreakdown, PatentKey, Person, PersonCounts,
};
use crate::domain::repositories::PersonRepository;
use crate::error::AppError;

macro_rules! person_columns {
    () => {
        "tax_number, kind, full_name, short_name, legal_address, fact_address, reg_date, \
         active, category, okopf, okvad, ogrn, region, uk, support_type"
    };
}

/// `$1` is the filter id; matches persons whose tax number is in it.
const IN_FILTER: &str = "($1::int IS NULL OR EXISTS (SELECT 1 FROM filter_tax_number f \
     WHERE f.tax_number = pe.tax_number AND f.filter_id = $1))";

const IN_MOSCOW: &str = "pe.region ILIKE '%москва%'";

/// PostgreSQL repository for persons and person-centric statistics.
pub struct PgPersonRepository {
    pool: Arc<PgPool>,
}

impl PgPersonRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    /// Shared body of [`PersonRepository::counts`] and
    /// [`PersonRepository::moscow_counts`]; `scope` is an extra SQL predicate.
    async fn counts_where(
        &self,
        scope: &str,
        filter_id: Option<i32>,
    ) -> Result<PersonCounts, AppError> {
        let where_clause = format!("{} AND {}", IN_FILTER, scope);

        let (total, cluster_members, with_support_type) =
            sqlx::query_as::<_, (i64, i64, i64)>(&format!(
                "SELECT COUNT(*), \
                 COUNT(*) FILTER (WHERE pe.uk = 1), \
                 COUNT(*) FILTER (WHERE pe.support_type IS NOT NULL) \
                 FROM person pe WHERE {}",
                where_clause
            ))
            .bind(filter_id)
            .fetch_one(self.pool.as_ref())
            .await?;

        let by_kind = sqlx::query_as::<_, (i32, i64)>(&format!(
            "SELECT pe.kind, COUNT(*) FROM person pe WHERE {} \
             GROUP BY pe.kind ORDER BY pe.kind",
            where_clause
        ))
        .bind(filter_id)
        .fetch_all(self.pool.as_ref())
        .await?;

        let by_category = sqlx::query_as::<_, NamedCount>(&format!(
            "SELECT pe.category, COUNT(*) FROM person pe WHERE {} \
             GROUP BY pe.category ORDER BY COUNT(*) DESC, pe.category",
            where_clause
        ))
        .bind(filter_id)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(PersonCounts {
            total,
            cluster_members,
            with_support_type,
            by_kind,
            by_category,
        })
    }

    async fn grouped(&self, sql: &str) -> Result<Vec<NamedCount>, AppError> {
        let rows = sqlx::query_as::<_, NamedCount>(sql)
            .fetch_all(self.pool.as_ref())
            .await?;
        Ok(rows)
    }
}

#[async_trait]
impl PersonRepository for PgPersonRepository {
    async fn create(&self, p: NewPerson) -> Result<Person, AppError> {
        let person = sqlx::query_as::<_, Person>(concat!(
            "INSERT INTO person (tax_number, kind, full_name, short_name, legal_address, \
             fact_address, reg_date, active, category, okopf, okvad, ogrn, region, uk, \
             support_type) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15) \
             RETURNING ",
            person_columns!()
        ))
        .bind(p.tax_number)
        .bind(p.kind)
        .bind(p.full_name)
        .bind(p.short_name)
        .bind(p.legal_address)
        .bind(p.fact_address)
        .bind(p.reg_date)
        .bind(p.active)
        .bind(p.category)
        .bind(p.okopf)
        .bind(p.okvad)
        .bind(p.ogrn)
        .bind(p.region)
        .bind(p.uk)
        .bind(p.support_type)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(person)
    }

    async fn find(&self, tax_number: &str) -> Result<Option<Person>, AppError> {
        let person = sqlx::query_as::<_, Person>(concat!(
            "SELECT ",
            person_columns!(),
            " FROM person WHERE tax_number = $1"
        ))
        .bind(tax_number)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(person)
    }

    async fn patents_of(&self, tax_number: &str) -> Result<Vec<PatentKey>, AppError> {
        let rows = sqlx::query_as::<_, (i32, i32)>(
            r#"
            SELECT patent_kind, patent_reg_number
            FROM ownership
            WHERE person_tax_number = $1
            ORDER BY patent_kind, patent_reg_number
            "#,
        )
        .bind(tax_number)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows
            .into_iter()
            .map(|(kind, reg_number)| PatentKey::new(kind, reg_number))
            .collect())
    }

    async fn update(&self, tax_number: &str, p: Person) -> Result<Option<Person>, AppError> {
        let person = sqlx::query_as::<_, Person>(concat!(
            "UPDATE person SET tax_number = $2, kind = $3, full_name = $4, short_name = $5, \
             legal_address = $6, fact_address = $7, reg_date = $8, active = $9, \
             category = $10, okopf = $11, okvad = $12, ogrn = $13, region = $14, uk = $15, \
             support_type = $16 \
             WHERE tax_number = $1 \
             RETURNING ",
            person_columns!()
        ))
        .bind(tax_number)
        .bind(p.tax_number)
        .bind(p.kind)
        .bind(p.full_name)
        .bind(p.short_name)
        .bind(p.legal_address)
        .bind(p.fact_address)
        .bind(p.reg_date)
        .bind(p.active)
        .bind(p.category)
        .bind(p.okopf)
        .bind(p.okvad)
        .bind(p.ogrn)
        .bind(p.region)
        .bind(p.uk)
        .bind(p.support_type)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(person)
    }

    async fn delete(&self, tax_number: &str) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM person WHERE tax_number = $1")
            .bind(tax_number)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn patent_breakdown(&self) -> Result<PatentBreakdown, AppError> {
        let okopf = self
            .grouped(
                "SELECT pe.okopf, COUNT(*) FROM person pe \
                 JOIN ownership o ON o.person_tax_number = pe.tax_number \
                 GROUP BY pe.okopf ORDER BY COUNT(*) DESC, pe.okopf",
            )
            .await?;

        let okvad = self
            .grouped(
                "SELECT pe.okvad, COUNT(*) FROM person pe \
                 JOIN ownership o ON o.person_tax_number = pe.tax_number \
                 GROUP BY pe.okvad ORDER BY COUNT(*) DESC, pe.okvad",
            )
            .await?;

        let mpk = self
            .grouped(
                "SELECT p.subcategory, COUNT(*) FROM patent p \
                 JOIN ownership o \
                   ON o.patent_kind = p.kind AND o.patent_reg_number = p.reg_number \
                 WHERE p.kind IN (1, 2) \
                 GROUP BY p.subcategory ORDER BY COUNT(*) DESC, p.subcategory",
            )
            .await?;

        Ok(PatentBreakdown { okopf, okvad, mpk })
    }

    async fn counts(&self, filter_id: Option<i32>) -> Result<PersonCounts, AppError> {
        self.counts_where("TRUE", filter_id).await
    }

    async fn moscow_counts(&self, filter_id: Option<i32>) -> Result<PersonCounts, AppError> {
        self.counts_where(IN_MOSCOW, filter_id).await
    }
}
