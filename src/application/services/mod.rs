//! Business logic services for the application layer.

pub mod export_service;
pub mod filter_service;
pub mod ownership_service;
pub mod patent_service;
pub mod person_service;

pub use export_service::ExportService;
pub use filter_service::FilterService;
pub use ownership_service::OwnershipService;
pub use patent_service::PatentService;
pub use person_service::PersonService;
