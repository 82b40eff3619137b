//! Catalog query engine.
//!
//! This module provides:
//! - Criteria and Page: request-local filter and paging values
//! - SortSpec / OrderKey: whitelisted ORDER BY construction
//! - Plan: template selection
//! - query_builder: fixed SQL templates with positional binds
//! - stream: row-at-a-time JSON writing
//! - CatalogService: executes queries against the pool

mod catalog_service;
pub mod criteria;
pub mod error;
pub mod plan;
pub mod query_builder;
pub mod sort;
pub mod stream;

pub use catalog_service::{CatalogService, Streamed};
pub use criteria::{Criteria, DIGIT_CLASS, Page, TitleInitial, title_initials};
pub use error::CatalogError;
pub use plan::Plan;
pub use query_builder::{BindValue, MAX_RELATED, RenderedQuery, render};
pub use sort::{OrderKey, SortDirection, SortField, SortSpec, build_order_key};
pub use stream::{NullPolicy, StreamRecord, write_array, write_single};
