//! Shared application state injected into every handler.

use std::sync::Arc;
use std::time::Duration;

use metrics_exporter_prometheus::PrometheusHandle;
use sqlx::PgPool;
use tokio::sync::mpsc;

use crate::application::services::{
    ExportService, FilterService, OwnershipService, PatentService, PersonService,
};
use crate::domain::export_job::ExportJob;
use crate::domain::repositories::{
    FilterRepository, OwnershipRepository, PatentRepository, PersonRepository,
};
use crate::infrastructure::cache::CacheService;
use crate::infrastructure::persistence::{
    PgFilterRepository, PgOwnershipRepository, PgPatentRepository, PgPersonRepository,
};

/// The repository set the services are built from.
#[derive(Clone)]
pub struct Repositories {
    pub patents: Arc<dyn PatentRepository>,
    pub persons: Arc<dyn PersonRepository>,
    pub ownerships: Arc<dyn OwnershipRepository>,
    pub filters: Arc<dyn FilterRepository>,
}

impl Repositories {
    pub fn postgres(pool: Arc<PgPool>) -> Self {
        Self {
            patents: Arc::new(PgPatentRepository::new(pool.clone())),
            persons: Arc::new(PgPersonRepository::new(pool.clone())),
            ownerships: Arc::new(PgOwnershipRepository::new(pool.clone())),
            filters: Arc::new(PgFilterRepository::new(pool)),
        }
    }
}

/// Tunables the services need from the configuration.
#[derive(Debug, Clone, Copy)]
pub struct StateOptions {
    pub cache_ttl_seconds: u64,
    pub export_timeout: Duration,
}

#[derive(Clone)]
pub struct AppState {
    pub patent_service: Arc<PatentService>,
    pub person_service: Arc<PersonService>,
    pub ownership_service: Arc<OwnershipService>,
    pub filter_service: Arc<FilterService>,
    pub export_service: Arc<ExportService>,
    pub cache: Arc<dyn CacheService>,
    pub metrics: PrometheusHandle,
}

impl AppState {
    pub fn new(
        repos: Repositories,
        cache: Arc<dyn CacheService>,
        export_tx: mpsc::Sender<ExportJob>,
        metrics: PrometheusHandle,
        options: StateOptions,
    ) -> Self {
        let ttl = options.cache_ttl_seconds;

        Self {
            patent_service: Arc::new(PatentService::new(
                repos.patents,
                repos.filters.clone(),
                cache.clone(),
                ttl,
            )),
            person_service: Arc::new(PersonService::new(
                repos.persons,
                repos.filters.clone(),
                cache.clone(),
                ttl,
            )),
            ownership_service: Arc::new(OwnershipService::new(repos.ownerships, cache.clone())),
            export_service: Arc::new(ExportService::new(
                export_tx,
                repos.filters.clone(),
                options.export_timeout,
            )),
            filter_service: Arc::new(FilterService::new(repos.filters, cache.clone())),
            cache,
            metrics,
        }
    }
}
