//! On-disk formats: CSV snapshots (the cache) and JSON exports.

pub mod json;
pub mod snapshot;
