//! Patent management and patent statistics.

use crate::domain::entities::{
    NewPatent, Patent, PatentCounts, PatentKey, PatentPatch, PatentQuery,
    PatentWithHolders, PatentsStats,
};
use crate::domain::repositories::{FilterRepository, PatentRepository};
use crate::error::AppError;
use crate::infrastructure::cache::{CacheService, cached_json, invalidate_stats};
use crate::utils::stats::percent_rounded;
use serde_json::json;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Fails with 404 when `filter_id` names a filter that does not exist.
pub async fn ensure_filter(
    filters: &dyn FilterRepository,
    filter_id: Option<i32>,
) -> Result<(), AppError> {
    if let Some(id) = filter_id
        && !filters.exists(id).await?
    {
        return Err(AppError::not_found(
            "Filter not found",
            json!({ "filter_id": id }),
        ));
    }
    Ok(())
}

fn patent_not_found(key: PatentKey) -> AppError {
    AppError::not_found(
        "Patent not found",
        json!({ "kind": key.kind, "reg_number": key.reg_number }),
    )
}

/// Builds the served statistics from raw counters.
pub fn build_patents_stats(counts: PatentCounts) -> PatentsStats {
    PatentsStats {
        total_patents: counts.total,
        total_ru_patents: counts.total_ru,
        total_with_holders: counts.with_holders,
        total_ru_with_holders: counts.ru_with_holders,
        with_holders_percent: percent_rounded(counts.with_holders, counts.total),
        ru_with_holders_percent: percent_rounded(counts.ru_with_holders, counts.total_ru),
        by_author_count: counts.by_author_count.into_iter().collect::<BTreeMap<_, _>>(),
        by_patent_kind: counts.by_kind.into_iter().collect::<BTreeMap<_, _>>(),
    }
}

/// Service for patents: CRUD, listing, import and statistics.
///
/// Every write invalidates the cached statistics.
pub struct PatentService {
    patents: Arc<dyn PatentRepository>,
    filters: Arc<dyn FilterRepository>,
    cache: Arc<dyn CacheService>,
    cache_ttl: u64,
}

impl PatentService {
    pub fn new(
        patents: Arc<dyn PatentRepository>,
        filters: Arc<dyn FilterRepository>,
        cache: Arc<dyn CacheService>,
        cache_ttl: u64,
    ) -> Self {
        Self {
            patents,
            filters,
            cache,
            cache_ttl,
        }
    }

    /// Lists one page of patents with their holders.
    ///
    /// Returns `(total, items)`, where `total` counts every matching patent.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if `query.filter_id` names no filter.
    pub async fn list(
        &self,
        query: &PatentQuery,
        offset: i64,
        limit: i64,
    ) -> Result<(i64, Vec<PatentWithHolders>), AppError> {
        ensure_filter(self.filters.as_ref(), query.filter_id).await?;

        let total = self.patents.count(query).await?;
        let patents = self.patents.list(query, offset, Some(limit)).await?;
        let keys: Vec<PatentKey> = patents.iter().map(Patent::key).collect();
        let holders = self.patents.holders(&keys).await?;

        Ok((total, PatentWithHolders::attach(patents, holders)))
    }

    /// Aggregate statistics, cached under `patents_stats:{filter_id|all}@{generation}`.
    pub async fn stats(&self, filter_id: Option<i32>) -> Result<PatentsStats, AppError> {
        let key = format!(
            "patents_stats:{}",
            filter_id.map_or_else(|| "all".to_string(), |id| id.to_string())
        );

        cached_json(self.cache.as_ref(), &key, self.cache_ttl, || async {
            ensure_filter(self.filters.as_ref(), filter_id).await?;
            Ok::<_, AppError>(build_patents_stats(self.patents.counts(filter_id).await?))
        })
        .await
    }

    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the patent already exists.
    pub async fn create(&self, new_patent: NewPatent) -> Result<Patent, AppError> {
        let key = new_patent.key();
        if self.patents.find(key).await?.is_some() {
            return Err(AppError::conflict(
                "Patent already exists",
                json!({ "kind": key.kind, "reg_number": key.reg_number }),
            ));
        }

        let patent = self.patents.create(new_patent).await?;
        invalidate_stats(self.cache.as_ref()).await;

        tracing::info!(patent = %key, "patent created");
        Ok(patent)
    }

    /// Loads a patent with its holders.
    ///
    /// `owner_raw` in the result is replaced by the holders' short names when
    /// any are known.
    pub async fn get(&self, key: PatentKey) -> Result<PatentWithHolders, AppError> {
        let patent = self
            .patents
            .find(key)
            .await?
            .ok_or_else(|| patent_not_found(key))?;
        let holders = self.patents.holders(&[key]).await?;

        let mut full = PatentWithHolders { patent, holders };
        full.patent.owner_raw = full.owner_names();
        Ok(full)
    }

    /// Applies a partial update. The patch may change the key itself.
    pub async fn update(&self, key: PatentKey, patch: PatentPatch) -> Result<Patent, AppError> {
        let mut patent = self
            .patents
            .find(key)
            .await?
            .ok_or_else(|| patent_not_found(key))?;

        patent.apply(patch);

        let updated = self
            .patents
            .update(key, patent)
            .await?
            .ok_or_else(|| patent_not_found(key))?;
        invalidate_stats(self.cache.as_ref()).await;

        Ok(updated)
    }

    /// Deletes a patent; its ownership links go with it.
    pub async fn delete(&self, key: PatentKey) -> Result<(), AppError> {
        if !self.patents.delete(key).await? {
            return Err(patent_not_found(key));
        }
        invalidate_stats(self.cache.as_ref()).await;

        tracing::info!(patent = %key, "patent deleted");
        Ok(())
    }

    /// Checks the database answers.
    pub async fn ping(&self) -> Result<(), AppError> {
        self.patents.ping().await
    }

    /// Upserts imported patents in one transaction. Returns the rows written.
    pub async fn import(&self, patents: Vec<NewPatent>) -> Result<u64, AppError> {
        let count = patents.len();
        let written = self.patents.upsert_many(patents).await?;
        invalidate_stats(self.cache.as_ref()).await;

        tracing::info!(rows = count, written, "patents imported");
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::patent::fixtures::{holder, patent};
    use crate::domain::repositories::{MockFilterRepository, MockPatentRepository};
    use crate::infrastructure::cache::{CacheError, MockCacheService, NullCache, STATS_GROUP};
    use chrono::NaiveDate;

    fn service(
        patents: MockPatentRepository,
        filters: MockFilterRepository,
        cache: Arc<dyn CacheService>,
    ) -> PatentService {
        PatentService::new(Arc::new(patents), Arc::new(filters), cache, 300)
    }

    fn new_patent(kind: i32, reg_number: i32) -> NewPatent {
        NewPatent {
            kind,
            reg_number,
            reg_date: None,
            appl_date: None,
            author_raw: None,
            owner_raw: None,
            address: None,
            name: "Устройство".to_string(),
            actual: true,
            subcategory: None,
            country_code: Some("RU".to_string()),
            region: None,
            city: None,
            appl_number: None,
            patent_starting_date: NaiveDate::from_ymd_opt(2022, 1, 1).unwrap(),
            publication_url: None,
        }
    }

    fn counting_cache(invalidations: usize) -> Arc<dyn CacheService> {
        let mut cache = MockCacheService::new();
        cache
            .expect_invalidate_group()
            .withf(|g| g == STATS_GROUP)
            .times(invalidations)
            .returning(|_| Ok(()));
        Arc::new(cache)
    }

    #[test]
    fn test_build_stats_percentages() {
        let stats = build_patents_stats(PatentCounts {
            total: 8,
            total_ru: 0,
            with_holders: 1,
            ru_with_holders: 0,
            by_author_count: vec![("0".into(), 3), ("2–5".into(), 5)],
            by_kind: vec![(1, 6), (2, 2)],
        });

        assert_eq!(stats.with_holders_percent, 13);
        assert_eq!(stats.ru_with_holders_percent, 0);
        assert_eq!(stats.by_author_count.get("2–5"), Some(&5));
        assert_eq!(stats.by_patent_kind.get(&1), Some(&6));
    }

    #[tokio::test]
    async fn test_list_unknown_filter_is_not_found() {
        let mut filters = MockFilterRepository::new();
        filters.expect_exists().returning(|_| Ok(false));

        let svc = service(MockPatentRepository::new(), filters, Arc::new(NullCache::new()));
        let query = PatentQuery {
            filter_id: Some(42),
            ..Default::default()
        };

        let err = svc.list(&query, 0, 10).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_list_returns_total_and_holders() {
        let mut patents = MockPatentRepository::new();
        patents.expect_count().returning(|_| Ok(25));
        patents
            .expect_list()
            .withf(|_, offset, limit| *offset == 10 && *limit == Some(10))
            .returning(|_, _, _| Ok(vec![patent(1, 11), patent(1, 12)]));
        patents
            .expect_holders()
            .withf(|keys| keys.len() == 2)
            .returning(|_| Ok(vec![holder(PatentKey::new(1, 12), "7701234567", None)]));

        let svc = service(
            patents,
            MockFilterRepository::new(),
            Arc::new(NullCache::new()),
        );
        let (total, items) = svc.list(&PatentQuery::default(), 10, 10).await.unwrap();

        assert_eq!(total, 25);
        assert_eq!(items.len(), 2);
        assert!(items[0].holders.is_empty());
        assert_eq!(items[1].holders[0].tax_number, "7701234567");
    }

    #[tokio::test]
    async fn test_stats_served_from_cache() {
        let cached = build_patents_stats(PatentCounts {
            total: 3,
            ..Default::default()
        });
        let raw = serde_json::to_string(&cached).unwrap();

        let mut cache = MockCacheService::new();
        cache.expect_generation().returning(|_| Ok(0));
        cache
            .expect_get()
            .withf(|k| k == "patents_stats:all@0")
            .returning(move |_| Ok(Some(raw.clone())));

        // no repository expectations: a DB hit would panic
        let svc = service(
            MockPatentRepository::new(),
            MockFilterRepository::new(),
            Arc::new(cache),
        );
        let stats = svc.stats(None).await.unwrap();
        assert_eq!(stats.total_patents, 3);
    }

    #[tokio::test]
    async fn test_stats_miss_computes_and_stores() {
        let mut cache = MockCacheService::new();
        cache.expect_generation().returning(|_| Ok(3));
        cache
            .expect_get()
            .withf(|k| k == "patents_stats:7@3")
            .returning(|_| Err(CacheError::OperationError("down".into())));
        cache
            .expect_set()
            .withf(|_, k, _, ttl| k == "patents_stats:7@3" && *ttl == 300)
            .times(1)
            .returning(|_, _, _, _| Ok(()));

        let mut filters = MockFilterRepository::new();
        filters.expect_exists().returning(|_| Ok(true));

        let mut patents = MockPatentRepository::new();
        patents
            .expect_counts()
            .withf(|f| *f == Some(7))
            .returning(|_| {
                Ok(PatentCounts {
                    total: 4,
                    with_holders: 2,
                    ..Default::default()
                })
            });

        let svc = service(patents, filters, Arc::new(cache));
        let stats = svc.stats(Some(7)).await.unwrap();
        assert_eq!(stats.with_holders_percent, 50);
    }

    #[tokio::test]
    async fn test_create_duplicate_is_conflict() {
        let mut patents = MockPatentRepository::new();
        patents
            .expect_find()
            .returning(|k| Ok(Some(patent(k.kind, k.reg_number))));

        let svc = service(patents, MockFilterRepository::new(), counting_cache(0));
        let err = svc.create(new_patent(1, 5)).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict { .. }));
    }

    #[tokio::test]
    async fn test_create_invalidates_stats() {
        let mut patents = MockPatentRepository::new();
        patents.expect_find().returning(|_| Ok(None));
        patents
            .expect_create()
            .times(1)
            .returning(|p| Ok(patent(p.kind, p.reg_number)));

        let svc = service(patents, MockFilterRepository::new(), counting_cache(1));
        let created = svc.create(new_patent(2, 9)).await.unwrap();
        assert_eq!(created.key(), PatentKey::new(2, 9));
    }

    #[tokio::test]
    async fn test_get_uses_holder_names_for_owner_raw() {
        let mut patents = MockPatentRepository::new();
        patents
            .expect_find()
            .returning(|k| Ok(Some(patent(k.kind, k.reg_number))));
        patents.expect_holders().returning(|keys| {
            Ok(vec![
                holder(keys[0], "7701234567", Some("ООО Альфа")),
                holder(keys[0], "7707654321", Some("АО Бета")),
            ])
        });

        let svc = service(
            patents,
            MockFilterRepository::new(),
            Arc::new(NullCache::new()),
        );
        let full = svc.get(PatentKey::new(1, 3)).await.unwrap();
        assert_eq!(full.patent.owner_raw.as_deref(), Some("ООО Альфа, АО Бета"));
    }

    #[tokio::test]
    async fn test_get_missing_is_not_found() {
        let mut patents = MockPatentRepository::new();
        patents.expect_find().returning(|_| Ok(None));

        let svc = service(
            patents,
            MockFilterRepository::new(),
            Arc::new(NullCache::new()),
        );
        let err = svc.get(PatentKey::new(1, 3)).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_update_applies_patch_to_stored_row() {
        let mut patents = MockPatentRepository::new();
        patents
            .expect_find()
            .returning(|k| Ok(Some(patent(k.kind, k.reg_number))));
        patents
            .expect_update()
            .withf(|key, p| {
                *key == PatentKey::new(1, 3) && !p.actual && p.city.is_none() && p.name.starts_with("Способ")
            })
            .times(1)
            .returning(|_, p| Ok(Some(p)));

        let svc = service(patents, MockFilterRepository::new(), counting_cache(1));
        let updated = svc
            .update(
                PatentKey::new(1, 3),
                PatentPatch {
                    actual: Some(false),
                    city: Some(None),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(!updated.actual);
    }

    #[tokio::test]
    async fn test_delete_missing_is_not_found() {
        let mut patents = MockPatentRepository::new();
        patents.expect_delete().returning(|_| Ok(false));

        let svc = service(patents, MockFilterRepository::new(), counting_cache(0));
        let err = svc.delete(PatentKey::new(3, 1)).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_import_upserts_and_invalidates() {
        let mut patents = MockPatentRepository::new();
        patents
            .expect_upsert_many()
            .withf(|rows| rows.len() == 2)
            .returning(|rows| Ok(rows.len() as u64));

        let svc = service(patents, MockFilterRepository::new(), counting_cache(1));
        let written = svc
            .import(vec![new_patent(1, 1), new_patent(1, 2)])
            .await
            .unwrap();
        assert_eq!(written, 2);
    }
}
