//! Marquee catalog kernel library.
//!
//! This library exposes the catalog engine and HTTP surface for integration
//! testing. The main entry point for running the server is the `marquee`
//! binary.

pub mod app;
pub mod catalog;
pub mod config;
pub mod db;
pub mod error;
pub mod metrics;
pub mod models;
pub mod routes;
pub mod state;
