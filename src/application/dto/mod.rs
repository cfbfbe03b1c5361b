//! # Data Transfer Objects

pub mod warehouse_config;
