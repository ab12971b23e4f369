use std::collections::HashSet;

use super::{DatasetGraph, Edge};
use crate::{
    classify::SemanticType,
    config::SdsConfig,
    node::{Category, NodeFactory},
};

impl DatasetGraph {
    /// Gather the root's subjects, protocols and contributors under the three category nodes
    /// and derive the forced edge list.
    ///
    /// Edges that are self loops or join two nodes on the same level are dropped, edges
    /// pointing at the root are flipped, and duplicates collapse. A root edge to a Subject,
    /// Protocol or Person is redirected to start at the matching category, and the remaining
    /// root edges are kept only when they reach an Award or a category node. Every distinct
    /// edge bumps its final source's `children_counter` before that last filter runs.
    pub fn organize_by_category(&mut self, config: &SdsConfig, factory: &NodeFactory) {
        let root = self.root.clone();
        let root_level = self.level_of(&root).unwrap_or(1);

        for category in Category::ALL {
            if self.nodes.contains_key(category.id()) {
                tracing::warn!("The {} node already exists", category.name());
                continue;
            }
            let node = factory.category_node(category, &root, config.category_level(category));
            self.nodes.insert(node.id.clone(), node);
            self.edges.push(Edge::new(root.clone(), category.id()));
        }

        // Levels are read before any redirection moves a target.
        let candidates = self
            .edges
            .iter()
            .filter(|edge| {
                edge.source != edge.target
                    && match (self.nodes.get(&edge.source), self.nodes.get(&edge.target)) {
                        (Some(source), Some(target)) => source.level != target.level,
                        _ => false,
                    }
            })
            .cloned()
            .collect::<Vec<_>>();

        let mut seen = HashSet::new();
        let mut forced = Vec::new();
        let mut dropped = 0;
        for mut edge in candidates {
            if edge.target == root {
                edge = edge.reversed();
            }
            if edge.source == root {
                if let Some(category) = self
                    .nodes
                    .get(&edge.target)
                    .filter(|target| !target.is_category())
                    .and_then(|target| Category::for_member(target.semantic_type()))
                {
                    let level = config.category_level(category).saturating_add(1);
                    if let Some(target) = self.nodes.get_mut(&edge.target) {
                        target.level = Some(level);
                        target.parent = Some(category.id().to_string());
                    }
                    edge.source = category.id().to_string();
                }
            }
            if !seen.insert(edge.clone()) {
                continue;
            }
            // Counted before the noise drop, so the root also tallies edges it loses.
            if let Some(source) = self.nodes.get_mut(&edge.source) {
                source.children_counter += 1;
            }
            if edge.source == root && !self.keeps_root_edge(&edge.target) {
                dropped += 1;
                continue;
            }
            forced.push(edge);
        }

        for edge in forced.iter().filter(|e| e.source == root) {
            if let Some(target) = self.nodes.get_mut(&edge.target) {
                if !target.is_category() {
                    target.level = Some(root_level + 1);
                    target.parent = Some(root.clone());
                }
            }
        }
        tracing::debug!(
            "Organized {} raw edges into {} forced edges ({} root edges dropped as noise)",
            self.edges.len(),
            forced.len(),
            dropped
        );
        self.forced_edges = forced;
    }

    fn keeps_root_edge(&self, target: &str) -> bool {
        Category::from_id(target).is_some()
            || self
                .nodes
                .get(target)
                .is_some_and(|node| node.semantic_type() == SemanticType::Award)
    }
}
