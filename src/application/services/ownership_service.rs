use crate::domain::entities::{NewOwnership, Ownership, OwnershipQuery};
use crate::domain::repositories::OwnershipRepository;
use crate::error::AppError;
use crate::infrastructure::cache::{CacheService, invalidate_stats};
use serde_json::json;
use std::sync::Arc;

/// Links persons to the patents they hold.
pub struct OwnershipService {
    ownerships: Arc<dyn OwnershipRepository>,
    cache: Arc<dyn CacheService>,
}

impl OwnershipService {
    pub fn new(ownerships: Arc<dyn OwnershipRepository>, cache: Arc<dyn CacheService>) -> Self {
        Self { ownerships, cache }
    }

    pub async fn create(&self, new_ownership: NewOwnership) -> Result<Ownership, AppError> {
        let ownership = self.ownerships.create(new_ownership).await?;
        invalidate_stats(self.cache.as_ref()).await;

        tracing::info!(
            id = ownership.id,
            tax_number = %ownership.person_tax_number,
            patent = %ownership.patent_key(),
            "ownership created"
        );
        Ok(ownership)
    }

    pub async fn list(&self, query: &OwnershipQuery) -> Result<Vec<Ownership>, AppError> {
        self.ownerships.list(query).await
    }

    pub async fn delete(&self, id: i64) -> Result<(), AppError> {
        if !self.ownerships.delete(id).await? {
            return Err(AppError::not_found(
                "Ownership not found",
                json!({ "id": id }),
            ));
        }
        invalidate_stats(self.cache.as_ref()).await;
        Ok(())
    }
}
