//! Helpers shared across layers.
//!
//! - [`flag`] - Lenient parsing of the `actual` flag
//! - [`stats`] - Percentages and top-N folding for statistics
//! - [`csv_codec`] - Patent CSV export and import
//! - [`validation`] - Tax number and OGRN formats

pub mod csv_codec;
pub mod flag;
pub mod stats;
pub mod validation;
