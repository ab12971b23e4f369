//! Shared test utilities for integration tests.
//!
//! Import from integration test files as:
//! ```ignore
//! mod common;
//! ```
#![allow(dead_code)]

use sds_graph::{
    catalog::{parse_catalog, CatalogEntry},
    config::SdsConfig,
    splinter::DatasetSplinter,
};
use std::path::PathBuf;
use tempfile::TempDir;

pub const DATASET_TTL: &str = include_str!("../fixtures/dataset.ttl");
pub const CATALOG_JSON: &str = include_str!("../fixtures/catalog.json");

pub const ROOT: &str = "https://api.example.org/datasets/ds-1";
pub const SUB_1: &str = "https://api.example.org/datasets/ds-1/subjects/sub-1";
pub const SUB_2: &str = "https://api.example.org/datasets/ds-1/subjects/sub-2";
pub const SAM_1: &str = "https://api.example.org/datasets/ds-1/samples/sam-1";
pub const SAM_2: &str = "https://api.example.org/datasets/ds-1/samples/sam-2";
pub const JANE: &str = "https://api.example.org/datasets/ds-1/contributors/jane";
pub const AWARD: &str = "https://awards.example.org/OT2OD000001";

pub fn folder(name: &str) -> String {
    format!("https://api.example.org/packages/{name}")
}

/// Initialize tracing for tests, respecting RUST_LOG env var.
///
/// Safe to call multiple times, subsequent calls are no-ops.
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init()
        .ok();
}

pub fn fixture_catalog() -> Vec<CatalogEntry> {
    parse_catalog(CATALOG_JSON).unwrap()
}

/// A splinter over the fixture dataset.
pub fn fixture_splinter(config: SdsConfig) -> DatasetSplinter {
    DatasetSplinter::new(DATASET_TTL, fixture_catalog(), config)
}

/// Write `content` as `sds-graph.toml` into a fresh temp dir.
///
/// Returns the temp dir (keep it alive) and the config path.
pub fn write_config(content: &str) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sds-graph.toml");
    std::fs::write(&path, content).unwrap();
    (dir, path)
}
