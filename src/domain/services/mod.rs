//! # Domain Services
//!
//! エンティティに属さないビジネスルール

pub mod query_builder;
