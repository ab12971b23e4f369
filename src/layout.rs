//! Level assignment and horizontal placement for the hierarchical renderer.

use petgraph::{algo::toposort, graphmap::DiGraphMap};
use serde::{Deserialize, Serialize};
use std::{
    collections::{BTreeMap, HashMap, HashSet},
    ops::Deref,
};

use crate::{
    classify::SemanticType,
    graph::{DatasetGraph, Edge},
    node::Marker,
};

/// Level → ids of the nodes on that level.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelIndex(pub BTreeMap<u32, Vec<String>>);

impl LevelIndex {
    pub fn from_graph(graph: &DatasetGraph) -> Self {
        let mut index: BTreeMap<u32, Vec<String>> = BTreeMap::new();
        for node in graph.nodes.values() {
            if let Some(level) = node.level {
                index.entry(level).or_default().push(node.id.clone());
            }
        }
        LevelIndex(index)
    }

    /// The level holding the most nodes. Ties go to the deeper level.
    pub fn richest_level(&self) -> Option<(u32, usize)> {
        self.0
            .iter()
            .map(|(level, ids)| (*level, ids.len()))
            .fold(None, |best, (level, len)| match best {
                Some((_, best_len)) if best_len > len => best,
                _ => Some((level, len)),
            })
    }
}

impl Deref for LevelIndex {
    type Target = BTreeMap<u32, Vec<String>>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Add an explicit edge from each sample's lineage source, move the sample one level below
/// that source, and bucket every leveled node.
///
/// Lineage chains are resolved sources-first, so a sample derived from a derived sample ends up
/// below both.
pub fn fix_links(graph: &mut DatasetGraph) -> LevelIndex {
    let lineage = graph
        .nodes
        .values()
        .filter_map(|node| {
            node.lineage_source()
                .map(|source| (source.to_string(), node.id.clone()))
        })
        .filter(|(source, sample)| {
            let known = graph.nodes.contains_key(source) && source != sample;
            if !known {
                tracing::warn!("Sample {sample} is derived from unknown node {source}");
            }
            known
        })
        .collect::<Vec<_>>();

    let dag: DiGraphMap<&str, ()> = DiGraphMap::from_edges(
        lineage
            .iter()
            .map(|(source, sample)| (source.as_str(), sample.as_str())),
    );
    let order = match toposort(&dag, None) {
        Ok(order) => {
            let rank = order
                .iter()
                .enumerate()
                .map(|(idx, id)| (*id, idx))
                .collect::<HashMap<_, _>>();
            let mut sorted = lineage.iter().collect::<Vec<_>>();
            sorted.sort_by_key(|(_, sample)| rank.get(sample.as_str()).copied());
            sorted
        }
        Err(cycle) => {
            tracing::warn!(
                "Sample lineage contains a cycle through {}, levels follow map order",
                cycle.node_id()
            );
            lineage.iter().collect()
        }
    };

    let mut added = Vec::new();
    for (source_id, sample_id) in order {
        let source_level = match graph.nodes.get_mut(source_id) {
            Some(source) => {
                source.children_counter += 1;
                source.level
            }
            None => continue,
        };
        if let Some(sample) = graph.nodes.get_mut(sample_id) {
            match source_level {
                Some(level) => sample.level = Some(level + 1),
                None => tracing::debug!("Lineage source {source_id} has no level yet"),
            }
            sample.parent = Some(source_id.clone());
        }
        added.push(Edge::new(source_id.clone(), sample_id.clone()));
    }
    graph.forced_edges.extend(added);
    LevelIndex::from_graph(graph)
}

/// Flag subjects and samples that ended up with nothing beneath them.
pub fn identify_childless_parents(graph: &mut DatasetGraph) {
    for node in graph.nodes.values_mut() {
        if matches!(
            node.semantic_type(),
            SemanticType::Sample | SemanticType::Subject
        ) && !node.is_category()
            && node.children_counter == 0
        {
            node.marker = Marker::NoData;
        }
    }
}

/// Positions, adjacency and the two renderer hints.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Layout {
    pub levels: LevelIndex,
    pub positions: HashMap<String, f64>,
    /// Node id → neighbor ids, in link order.
    pub neighbors: HashMap<String, Vec<String>>,
    /// Node id → incident links.
    pub node_links: HashMap<String, Vec<Edge>>,
    /// Forced edges with duplicates and dangling endpoints removed.
    pub links: Vec<Edge>,
    pub radial_variant: usize,
    pub hierarchy_variant: u32,
}

pub struct LayoutEngine {
    spacing: f64,
}

impl LayoutEngine {
    pub fn new(spacing: f64) -> Self {
        LayoutEngine { spacing }
    }

    pub fn compute_positions(&self, graph: &DatasetGraph, mut levels: LevelIndex) -> Layout {
        let (links, neighbors, node_links) = link_nodes(graph);

        let Some((max_level, max_len)) = levels.richest_level() else {
            return Layout {
                levels,
                links,
                neighbors,
                node_links,
                ..Default::default()
            };
        };
        let furthest_left = -(max_len as f64 / 2.0 * self.spacing);
        let mut cursors = levels
            .keys()
            .map(|level| (*level, furthest_left + self.spacing / 2.0))
            .collect::<BTreeMap<_, _>>();

        let neighbor_count = |id: &String| neighbors.get(id).map_or(0, Vec::len);
        for (level, ids) in levels.0.iter_mut() {
            ids.sort_by(|a, b| {
                let path = |id: &String| graph.nodes.get(id).and_then(|n| n.relative_path());
                path(a).cmp(&path(b))
            });
            match *level {
                2 => ids.sort_by_key(|id| std::cmp::Reverse(neighbor_count(id))),
                3 => ids.sort_by_key(|id| {
                    graph
                        .nodes
                        .get(id)
                        .and_then(|n| n.parent.as_deref())
                        .and_then(|parent| graph.nodes.get(parent))
                        .map(|parent| parent.semantic_type().as_str())
                }),
                _ => {}
            }
        }

        // Bottom-up, so deeper neighbors are placed before the nodes above them.
        let mut positions: HashMap<String, f64> = HashMap::new();
        for (level, ids) in levels.iter().rev() {
            for id in ids {
                let deeper = neighbors
                    .get(id)
                    .into_iter()
                    .flatten()
                    .filter(|n| graph.level_of(n).is_some_and(|l| l > *level))
                    .filter_map(|n| positions.get(n).copied())
                    .collect::<Vec<_>>();
                let cursor = cursors.entry(*level).or_insert(furthest_left);
                let x = match (deeper.first(), deeper.last()) {
                    (Some(first), Some(last)) => {
                        let x = first + (last - first) * 0.5;
                        *cursor = x + self.spacing;
                        x
                    }
                    _ => {
                        let x = *cursor + self.spacing;
                        *cursor = x;
                        x
                    }
                };
                positions.insert(id.clone(), x);
            }
        }

        tracing::debug!(
            "Laid out {} nodes over {} levels, richest level {max_level} with {max_len} nodes",
            positions.len(),
            levels.len()
        );
        Layout {
            levels,
            positions,
            neighbors,
            node_links,
            links,
            radial_variant: max_len,
            hierarchy_variant: max_level * 20,
        }
    }
}

type Adjacency = (
    Vec<Edge>,
    HashMap<String, Vec<String>>,
    HashMap<String, Vec<Edge>>,
);

fn link_nodes(graph: &DatasetGraph) -> Adjacency {
    let mut seen = HashSet::new();
    let mut links = Vec::new();
    let mut neighbors: HashMap<String, Vec<String>> = HashMap::new();
    let mut node_links: HashMap<String, Vec<Edge>> = HashMap::new();
    for edge in &graph.forced_edges {
        if !graph.nodes.contains_key(&edge.source) || !graph.nodes.contains_key(&edge.target) {
            tracing::warn!("Dropping link {edge} with a missing endpoint");
            continue;
        }
        if !seen.insert(edge) {
            continue;
        }
        neighbors
            .entry(edge.source.clone())
            .or_default()
            .push(edge.target.clone());
        neighbors
            .entry(edge.target.clone())
            .or_default()
            .push(edge.source.clone());
        node_links
            .entry(edge.source.clone())
            .or_default()
            .push(edge.clone());
        node_links
            .entry(edge.target.clone())
            .or_default()
            .push(edge.clone());
        links.push(edge.clone());
    }
    (links, neighbors, node_links)
}
