//! Trust-tiered context aggregation and source verification for RAG prompting.

pub mod agents;
pub mod api;
pub mod classifier;
pub mod config;
pub mod db;
pub mod error;
pub mod fetcher;
pub mod llm_client;
pub mod metrics;
pub mod middleware;
pub mod mock;
pub mod models;
pub mod store;
pub mod trust;
pub mod validation;
