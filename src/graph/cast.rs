use std::collections::BTreeMap;

use super::{DatasetGraph, RawGraph};
use crate::{
    error::SdsError,
    node::{GraphNode, NodeFactory, NodeKind},
};

/// Classify and type every raw node, excise Unknowns, and merge the ontology node into the
/// dataset node, which becomes the level 1 root.
///
/// Fails when there is not exactly one dataset node and exactly one ontology node.
pub fn cast(raw: RawGraph, factory: &NodeFactory) -> Result<DatasetGraph, SdsError> {
    let RawGraph {
        nodes: raw_nodes,
        mut edges,
        mut proxies,
    } = raw;

    let mut nodes: BTreeMap<String, GraphNode> = BTreeMap::new();
    let mut datasets = Vec::new();
    let mut ontologies = Vec::new();
    for (id, raw_node) in raw_nodes {
        match factory.create(raw_node) {
            Some(node) => {
                match node.kind {
                    NodeKind::Dataset => datasets.push(id.clone()),
                    NodeKind::Ontology => ontologies.push(id.clone()),
                    _ => {}
                }
                nodes.insert(id, node);
            }
            None => {
                tracing::warn!("Node {id} has no recognized type, removing it and its edges");
                edges.retain(|edge| !edge.touches(&id));
                proxies.retain(|_, owner| owner != &id);
            }
        }
    }

    let dataset_id = single_anchor("dataset", datasets)?;
    let ontology_id = single_anchor("ontology", ontologies)?;

    let ontology = nodes
        .remove(&ontology_id)
        .ok_or_else(|| SdsError::NotFound(ontology_id.clone()))?;
    let dataset = nodes
        .get_mut(&dataset_id)
        .ok_or_else(|| SdsError::NotFound(dataset_id.clone()))?;
    dataset.properties.extend(ontology.properties);
    dataset.proxies.extend(ontology.proxies);
    dataset.level = Some(1);

    for edge in edges.iter_mut() {
        if edge.source == ontology_id {
            edge.source = dataset_id.clone();
        }
        if edge.target == ontology_id {
            edge.target = dataset_id.clone();
        }
    }
    proxies.retarget(&ontology_id, &dataset_id);
    tracing::debug!(
        "Merged ontology {ontology_id} into dataset {dataset_id}: {} nodes, {} edges",
        nodes.len(),
        edges.len()
    );

    Ok(DatasetGraph {
        root: dataset_id,
        nodes,
        edges,
        forced_edges: Vec::new(),
        proxies,
    })
}

fn single_anchor(kind: &str, mut found: Vec<String>) -> Result<String, SdsError> {
    match found.len() {
        1 => Ok(found.remove(0)),
        0 => Err(SdsError::Structure(format!(
            "no {kind} node found, cannot anchor the graph"
        ))),
        _ => Err(SdsError::Structure(format!(
            "expected a single {kind} node, found {}: {}",
            found.len(),
            found.join(", ")
        ))),
    }
}
