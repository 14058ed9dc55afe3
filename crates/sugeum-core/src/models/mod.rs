//! Data models for extracted fields, ledger records, and configuration.

pub mod config;
pub mod fields;
pub mod record;
