//! Person management and person statistics.

use crate::application::services::patent_service::ensure_filter;
use crate::domain::entities::{
    MoscowPersonsStats, NewPerson, Person, PersonCounts, PersonPatch, PersonWithPatents,
    PersonsBreakdown, PersonsStats,
};
use crate::domain::repositories::{FilterRepository, PersonRepository};
use crate::error::AppError;
use crate::infrastructure::cache::{CacheService, cached_json, invalidate_stats};
use crate::utils::stats::{named_map, percent_2dp, top_with_others};
use serde_json::json;
use std::collections::BTreeMap;
use std::sync::Arc;

const BREAKDOWN_KEY: &str = "persons_breakdown";

fn scoped_key(prefix: &str, filter_id: Option<i32>) -> String {
    match filter_id {
        Some(id) => format!("{prefix}:{id}"),
        None => format!("{prefix}:all"),
    }
}

fn person_not_found(tax_number: &str) -> AppError {
    AppError::not_found("Person not found", json!({ "tax_number": tax_number }))
}

pub fn build_persons_stats(counts: PersonCounts) -> PersonsStats {
    PersonsStats {
        total_persons: counts.total,
        by_kind: counts.by_kind.into_iter().collect::<BTreeMap<_, _>>(),
        by_category: named_map(counts.by_category),
    }
}

pub fn build_moscow_stats(counts: PersonCounts) -> MoscowPersonsStats {
    MoscowPersonsStats {
        moscow_cluster_percentage: percent_2dp(counts.cluster_members, counts.total),
        moscow_support_type_percentage: percent_2dp(counts.with_support_type, counts.total),
        total_persons: counts.total,
        by_kind: counts.by_kind.into_iter().collect::<BTreeMap<_, _>>(),
        by_category: named_map(counts.by_category),
    }
}

/// Service for persons (rights holders) and their statistics.
pub struct PersonService {
    persons: Arc<dyn PersonRepository>,
    filters: Arc<dyn FilterRepository>,
    cache: Arc<dyn CacheService>,
    cache_ttl: u64,
}

impl PersonService {
    pub fn new(
        persons: Arc<dyn PersonRepository>,
        filters: Arc<dyn FilterRepository>,
        cache: Arc<dyn CacheService>,
        cache_ttl: u64,
    ) -> Self {
        Self {
            persons,
            filters,
            cache,
            cache_ttl,
        }
    }

    /// Top OKOPF, OKVED and MPK groups by number of patents owned.
    pub async fn breakdown(&self) -> Result<PersonsBreakdown, AppError> {
        cached_json(self.cache.as_ref(), BREAKDOWN_KEY, self.cache_ttl, || async {
            let raw = self.persons.patent_breakdown().await?;
            Ok::<_, AppError>(PersonsBreakdown {
                okopf_stats: top_with_others(raw.okopf),
                okvad_stats: top_with_others(raw.okvad),
                mpk_stats: top_with_others(raw.mpk),
            })
        })
        .await
    }

    pub async fn all_stats(&self, filter_id: Option<i32>) -> Result<PersonsStats, AppError> {
        let key = scoped_key("persons_all_stats", filter_id);
        cached_json(self.cache.as_ref(), &key, self.cache_ttl, || async {
            ensure_filter(self.filters.as_ref(), filter_id).await?;
            Ok::<_, AppError>(build_persons_stats(self.persons.counts(filter_id).await?))
        })
        .await
    }

    /// Statistics over persons registered in Moscow.
    pub async fn moscow_stats(
        &self,
        filter_id: Option<i32>,
    ) -> Result<MoscowPersonsStats, AppError> {
        let key = scoped_key("persons_msk_stats", filter_id);
        cached_json(self.cache.as_ref(), &key, self.cache_ttl, || async {
            ensure_filter(self.filters.as_ref(), filter_id).await?;
            Ok::<_, AppError>(build_moscow_stats(
                self.persons.moscow_counts(filter_id).await?,
            ))
        })
        .await
    }

    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the tax number or OGRN is already registered.
    pub async fn create(&self, new_person: NewPerson) -> Result<Person, AppError> {
        let person = self.persons.create(new_person).await?;
        invalidate_stats(self.cache.as_ref()).await;

        tracing::info!(tax_number = %person.tax_number, "person created");
        Ok(person)
    }

    pub async fn get(&self, tax_number: &str) -> Result<PersonWithPatents, AppError> {
        let person = self
            .persons
            .find(tax_number)
            .await?
            .ok_or_else(|| person_not_found(tax_number))?;
        let patents = self.persons.patents_of(tax_number).await?;

        Ok(PersonWithPatents { person, patents })
    }

    pub async fn update(&self, tax_number: &str, patch: PersonPatch) -> Result<Person, AppError> {
        let mut person = self
            .persons
            .find(tax_number)
            .await?
            .ok_or_else(|| person_not_found(tax_number))?;

        person.apply(patch);

        let updated = self
            .persons
            .update(tax_number, person)
            .await?
            .ok_or_else(|| person_not_found(tax_number))?;
        invalidate_stats(self.cache.as_ref()).await;

        Ok(updated)
    }

    pub async fn delete(&self, tax_number: &str) -> Result<(), AppError> {
        if !self.persons.delete(tax_number).await? {
            return Err(person_not_found(tax_number));
        }
        invalidate_stats(self.cache.as_ref()).await;

        tracing::info!(tax_number, "person deleted");
        Ok(())
    }
}
