//! Repository trait for ownership links.

use crate::domain::entities::{NewOwnership, Ownership, OwnershipQuery};
use crate::error::AppError;
use async_trait::async_trait;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OwnershipRepository: Send + Sync {
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the person or patent does not exist.
    /// Returns [`AppError::Conflict`] if the link already exists.
    async fn create(&self, new_ownership: NewOwnership) -> Result<Ownership, AppError>;

    async fn list(&self, query: &OwnershipQuery) -> Result<Vec<Ownership>, AppError>;

    /// Returns `false` if no link had this id.
    async fn delete(&self, id: i64) -> Result<bool, AppError>;
}
