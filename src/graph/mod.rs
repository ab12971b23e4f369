//! Graph construction: from quads to the organized, typed node-link graph.
//!
//! The pipeline runs in three stages, each consuming or mutating state it owns outright:
//!
//! - [`ingest`]: quads → [`RawGraph`] (untyped nodes, raw edges, proxy map)
//! - [`cast`]: [`RawGraph`] → [`DatasetGraph`] (typed nodes, Unknowns excised, dataset and
//!   ontology merged into one root)
//! - [`DatasetGraph::organize_by_category`]: category nodes and the forced edge list

mod cast;
mod ingest;
mod organize;


pub use cast::cast;
pub use ingest::ingest;

use serde::{Deserialize, Serialize};
use std::{
    collections::BTreeMap,
    fmt::{Display, Formatter},
    ops::{Deref, DerefMut},
};

use crate::node::{GraphNode, RawNode};

/// Directed edge between two node ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Edge {
    pub source: String,
    pub target: String,
}

impl Edge {
    pub fn new<S: Into<String>, T: Into<String>>(source: S, target: T) -> Self {
        Edge {
            source: source.into(),
            target: target.into(),
        }
    }

    pub fn reversed(self) -> Self {
        Edge {
            source: self.target,
            target: self.source,
        }
    }

    pub fn touches(&self, id: &str) -> bool {
        self.source == id || self.target == id
    }
}

impl Display for Edge {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {}", self.source, self.target)
    }
}

/// Auxiliary id → id of the node whose property list holds it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProxyMap(pub BTreeMap<String, String>);

impl ProxyMap {
    pub fn owner(&self, id: &str) -> Option<&str> {
        self.0.get(id).map(String::as_str)
    }

    /// Point every entry owned by `from` at `to`.
    pub fn retarget(&mut self, from: &str, to: &str) {
        for owner in self.0.values_mut() {
            if owner == from {
                *owner = to.to_string();
            }
        }
    }
}

impl Deref for ProxyMap {
    type Target = BTreeMap<String, String>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for ProxyMap {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

/// Ingestion output: untyped nodes keyed by id, edges between them and the proxy map.
#[derive(Debug, Clone, Default)]
pub struct RawGraph {
    pub nodes: BTreeMap<String, RawNode>,
    pub edges: Vec<Edge>,
    pub proxies: ProxyMap,
}

impl RawGraph {
    /// Insert an empty node. Returns false, leaving the existing node untouched, if the id is
    /// already present.
    pub fn build_node(&mut self, id: &str) -> bool {
        if self.nodes.contains_key(id) {
            tracing::warn!("Node {id} is already present, skipping duplicate construction");
            return false;
        }
        self.nodes.insert(id.to_string(), RawNode::new(id));
        true
    }

    /// The node holding `id`'s properties: `id` itself when it is a node, else its proxy owner.
    pub fn resolve(&self, id: &str) -> Option<String> {
        if self.nodes.contains_key(id) {
            Some(id.to_string())
        } else {
            self.proxies
                .owner(id)
                .filter(|owner| self.nodes.contains_key(*owner))
                .map(str::to_string)
        }
    }
}

/// The typed graph anchored at the merged dataset root.
#[derive(Debug, Clone, Default)]
pub struct DatasetGraph {
    pub root: String,
    pub nodes: BTreeMap<String, GraphNode>,
    /// Raw edges, retargeted through the dataset merge.
    pub edges: Vec<Edge>,
    /// Display-adjusted edges. Filled by [`DatasetGraph::organize_by_category`] and extended
    /// by the catalog merge and lineage fixes.
    pub forced_edges: Vec<Edge>,
    pub proxies: ProxyMap,
}

impl DatasetGraph {
    pub fn root_node(&self) -> Option<&GraphNode> {
        self.nodes.get(&self.root)
    }

    pub fn level_of(&self, id: &str) -> Option<u32> {
        self.nodes.get(id).and_then(|n| n.level)
    }

    /// Direct id lookup, falling back to the proxy owner.
    pub fn find_reference(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.get(id).or_else(|| {
            self.proxies
                .owner(id)
                .and_then(|owner| self.nodes.get(owner))
        })
    }

    /// Ids of the targets of forced edges leaving `id`.
    pub fn children_of<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.forced_edges
            .iter()
            .filter(move |e| e.source == id)
            .map(|e| e.target.as_str())
    }
}
