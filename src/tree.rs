//! The catalog as a pure hierarchy, linked back to the graph.

use serde::{Deserialize, Serialize};

use crate::{
    catalog::{CatalogEntry, CatalogIndex, ParentMap},
    graph::DatasetGraph,
};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeNode {
    /// External reference id of the catalog entry.
    pub id: String,
    pub text: String,
    pub items: Vec<TreeNode>,
    pub graph_reference: Option<String>,
    /// Own id first, dataset root last.
    pub path: Vec<String>,
}

impl TreeNode {
    /// Depth-first iterator over this node and everything below it.
    pub fn iter(&self) -> impl Iterator<Item = &TreeNode> {
        let mut stack = vec![self];
        std::iter::from_fn(move || {
            let node = stack.pop()?;
            stack.extend(node.items.iter().rev());
            Some(node)
        })
    }

    pub fn find(&self, id: &str) -> Option<&TreeNode> {
        self.iter().find(|n| n.id == id)
    }
}

/// Builds the tree by draining an owned parent multimap, so each entry is placed exactly once.
pub struct TreeBuilder {
    roots: Vec<CatalogEntry>,
    parents: ParentMap,
}

impl TreeBuilder {
    pub fn new(index: CatalogIndex) -> Self {
        let (roots, parents) = index.into_parent_map();
        TreeBuilder { roots, parents }
    }

    /// Build the tree below the catalog root. When the catalog has no single parentless entry,
    /// the dataset root becomes the tree root and every parentless entry hangs below it. An
    /// empty catalog yields a bare node for the graph root.
    pub fn build(&mut self, graph: &DatasetGraph) -> TreeNode {
        let tree = if self.roots.len() == 1 {
            let root = self.roots.remove(0);
            let mut tree = self.visit(graph, &root, &[]);
            tree.text = graph.root.clone();
            tree
        } else {
            if self.roots.len() > 1 {
                tracing::debug!(
                    "{} parentless catalog entries, placing them below the dataset root",
                    self.roots.len()
                );
            }
            let path = vec![graph.root.clone()];
            let roots = std::mem::take(&mut self.roots);
            let items = roots
                .iter()
                .map(|entry| self.visit(graph, entry, &path))
                .collect();
            TreeNode {
                id: graph.root.clone(),
                text: graph.root.clone(),
                items,
                graph_reference: Some(graph.root.clone()),
                path,
            }
        };

        let orphans = self.remaining();
        if orphans > 0 {
            tracing::warn!(
                "{orphans} catalog entries are unreachable from the root, under parents: {}",
                self.parents
                    .remaining_parents()
                    .cloned()
                    .collect::<Vec<_>>()
                    .join(", ")
            );
        }
        tree
    }

    /// Catalog entries never reached from the root.
    pub fn remaining(&self) -> usize {
        self.parents.remaining()
    }

    fn visit(&mut self, graph: &DatasetGraph, entry: &CatalogEntry, parent_path: &[String]) -> TreeNode {
        let mut path = Vec::with_capacity(parent_path.len() + 1);
        path.push(entry.uri_api.clone());
        path.extend_from_slice(parent_path);

        let children = self.parents.take(&entry.remote_id);
        let items = children
            .iter()
            .map(|child| self.visit(graph, child, &path))
            .collect();
        TreeNode {
            id: entry.uri_api.clone(),
            text: entry.basename.clone(),
            items,
            graph_reference: graph
                .find_reference(&entry.uri_api)
                .map(|node| node.id.clone()),
            path,
        }
    }
}

/// Point every referenced graph node back at its tree node.
pub fn assign_tree_references(graph: &mut DatasetGraph, tree: &TreeNode) {
    let mut linked = 0usize;
    for item in tree.iter() {
        let Some(reference) = &item.graph_reference else {
            continue;
        };
        if let Some(node) = graph.nodes.get_mut(reference) {
            if node.tree_reference.is_none() {
                node.tree_reference = Some(item.id.clone());
                linked += 1;
            }
        }
    }
    tracing::debug!("Linked {linked} graph nodes to tree nodes");
}
