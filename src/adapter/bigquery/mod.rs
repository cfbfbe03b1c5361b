//! BigQuery Adapter Modules
//!
//! BigQuery統合のためのアダプターモジュール

pub mod client;
pub mod conversion;

pub use client::BigQueryWarehouseClient;
