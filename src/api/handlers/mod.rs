//! HTTP request handlers for API endpoints.
//!
//! Each handler module corresponds to a logical grouping of endpoints.

pub mod export;
pub mod filters;
pub mod health;
pub mod metrics;
pub mod ownerships;
pub mod patents;
pub mod persons;

pub use export::{export_patents_handler, upload_handler};
pub use filters::{
    create_filter_handler, delete_filter_handler, get_filter_handler, list_filters_handler,
};
pub use health::health_handler;
pub use metrics::metrics_handler;
pub use ownerships::{
    create_ownership_handler, delete_ownership_handler, list_ownerships_handler,
};
pub use patents::{
    create_patent_handler, delete_patent_handler, get_patent_handler, list_patents_handler,
    patents_stats_handler, update_patent_handler,
};
pub use persons::{
    create_person_handler, delete_person_handler, get_person_handler, persons_all_stats_handler,
    persons_breakdown_handler, persons_msk_stats_handler, update_person_handler,
};
