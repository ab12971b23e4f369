//! Immutable snapshots handed to the renderer.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::{
    graph::{DatasetGraph, Edge},
    layout::Layout,
    rdf::Property,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportNode {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub level: Option<u32>,
    pub x_pos: Option<f64>,
    pub attributes: BTreeMap<String, Vec<String>>,
    pub properties: Vec<Property>,
    pub proxies: Vec<String>,
    pub neighbors: Vec<String>,
    pub links: Vec<Edge>,
    pub parent: Option<String>,
    pub children_counter: u32,
    pub tree_reference: Option<String>,
    pub img: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphView {
    pub nodes: Vec<ExportNode>,
    pub links: Vec<Edge>,
    /// Node count of the richest level, for the radial layout.
    pub radial_variant: usize,
    /// Richest level × 20, for the hierarchical layout.
    pub hierarchy_variant: u32,
}

impl GraphView {
    pub fn new(graph: &DatasetGraph, layout: &Layout) -> Self {
        let nodes = graph
            .nodes
            .values()
            .map(|node| ExportNode {
                id: node.id.clone(),
                name: node.name.clone(),
                kind: node.semantic_type().to_string(),
                level: node.level,
                x_pos: layout.positions.get(&node.id).copied(),
                attributes: node.attributes.clone(),
                properties: node.properties.clone(),
                proxies: node.proxies.clone(),
                neighbors: layout.neighbors.get(&node.id).cloned().unwrap_or_default(),
                links: layout.node_links.get(&node.id).cloned().unwrap_or_default(),
                parent: node.parent.clone(),
                children_counter: node.children_counter,
                tree_reference: node.tree_reference.clone(),
                img: node.marker.icon().to_string(),
            })
            .collect();
        GraphView {
            nodes,
            links: layout.links.clone(),
            radial_variant: layout.radial_variant,
            hierarchy_variant: layout.hierarchy_variant,
        }
    }

    pub fn node(&self, id: &str) -> Option<&ExportNode> {
        self.nodes.iter().find(|n| n.id == id)
    }
}
