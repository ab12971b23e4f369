//! # sds-graph
//!
//! Turns the RDF description of a SPARC-style dataset and its flat file catalog into two
//! synchronized views: a typed, laid-out node-link graph and a hierarchical file tree.
//!
//! ## Overview
//!
//! A dataset arrives as two documents:
//!
//! - a Turtle document describing the dataset, its ontology header, subjects, samples,
//!   protocols, contributors and awards;
//! - a JSON array of catalog entries (folders and files), each pointing at its parent folder.
//!
//! The pipeline classifies every RDF subject by longest-prefix matching of its type
//! assertions, folds auxiliary and blank subjects into the nodes that own them, merges the
//! ontology header into the dataset root, gathers subjects, protocols and contributors under
//! three category nodes, hangs catalog folders and files below the nodes they describe, and
//! finally assigns every node a level and a horizontal position for a hierarchical renderer.
//!
//! ## Architecture
//!
//! - **[`rdf`]**: terms, quads, prefix tables, the [`rdf::QuadParser`] trait and the in-memory
//!   [`rdf::QuadStore`]
//! - **[`classify`]**: [`classify::SemanticType`] and the longest-prefix type classifier
//! - **[`node`]**: graph node records and the [`node::NodeFactory`]
//! - **[`graph`]**: ingestion, casting and category organization
//! - **[`catalog`]** / **[`tree`]**: the file catalog and its tree view
//! - **[`merge`]**: attaching catalog subtrees to graph nodes
//! - **[`layout`]**: lineage fixes, level index and horizontal positions
//! - **[`export`]**: the serializable [`export::GraphView`]
//! - **[`splinter`]**: [`splinter::DatasetSplinter`], the memoized async pipeline
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use sds_graph::{catalog::parse_catalog, config::SdsConfig, splinter::DatasetSplinter};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let turtle = std::fs::read_to_string("curation-export.ttl")?;
//!     let catalog = parse_catalog(&std::fs::read_to_string("catalog.json")?)?;
//!
//!     let splinter = DatasetSplinter::new(turtle, catalog, SdsConfig::default());
//!     let graph = splinter.graph().await?;
//!     println!("{} nodes, {} links", graph.nodes.len(), graph.links.len());
//!
//!     // Served from the cached run.
//!     let tree = splinter.tree().await?;
//!     println!("{} top-level folders", tree.items.len());
//!     Ok(())
//! }
//! ```

pub mod catalog;
pub mod classify;
pub mod config;
pub mod error;
pub mod export;
pub mod graph;
pub mod layout;
pub mod merge;
pub mod node;
pub mod rdf;
pub mod splinter;
#[cfg(test)]
mod tests;
pub mod tree;

pub use error::*;
