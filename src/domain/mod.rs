//! Domain layer containing business entities and logic.
//!
//! Defines entities, repository interfaces and the export pipeline,
//! independent of infrastructure concerns.
//!
//! # Architecture
//!
//! - [`entities`] - Patents, persons, ownerships, filters and statistics
//! - [`repositories`] - Data access trait definitions
//! - [`export_job`] - Queued CSV export request
//! - [`export_worker`] - Bounded-concurrency export worker
//!
//! # Export Flow
//!
//! 1. HTTP handler builds an [`export_job::ExportJob`] with a reply channel
//! 2. The job is pushed onto a bounded queue (full queue is rejected)
//! 3. [`export_worker::run_export_worker`] renders the CSV, retrying reads
//! 4. The handler awaits the reply with a timeout

pub mod entities;
pub mod export_job;
pub mod export_worker;
pub mod repositories;
