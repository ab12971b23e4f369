//! Attaches catalog folders and files into the graph under the nodes they describe.

use regex::Regex;
use std::collections::HashSet;

use crate::{
    catalog::{CatalogEntry, CatalogIndex},
    graph::{DatasetGraph, Edge},
    node::NodeFactory,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeStats {
    /// New file and collection nodes.
    pub created: usize,
    /// Catalog entries resolved to a node already in the graph through the proxy map.
    pub reused: usize,
    /// Entries skipped by the temporary-file rule.
    pub excluded: usize,
}

pub struct TreeGraphMerger<'a> {
    catalog: &'a CatalogIndex,
    factory: &'a NodeFactory<'a>,
    exclude: &'a Regex,
    visited: HashSet<String>,
    stats: MergeStats,
}

impl<'a> TreeGraphMerger<'a> {
    pub fn new(catalog: &'a CatalogIndex, factory: &'a NodeFactory<'a>, exclude: &'a Regex) -> Self {
        TreeGraphMerger {
            catalog,
            factory,
            exclude,
            visited: HashSet::new(),
            stats: MergeStats::default(),
        }
    }

    /// Walk the catalog subtree of every node with an associated folder.
    ///
    /// The dataset root owns the top of the catalog: unless its own folder is in the catalog,
    /// the parentless entries hang directly below it. Shallow nodes go first so that nodes
    /// reused deeper down already know their level when their own folder is walked. Each
    /// catalog entry is attached at most once.
    pub fn merge(mut self, graph: &mut DatasetGraph) -> MergeStats {
        let catalog = self.catalog;
        let root = graph.root.clone();
        let root_has_folder = graph
            .root_node()
            .and_then(|node| node.folder())
            .is_some_and(|folder| catalog.by_uri(folder).is_some());
        if !root_has_folder {
            for entry in catalog.roots() {
                self.attach(graph, entry, &root);
            }
        }

        let mut pending = graph
            .nodes
            .values()
            .filter_map(|node| node.folder().map(|_| node.id.clone()))
            .collect::<Vec<_>>();

        while !pending.is_empty() {
            let next = pending
                .iter()
                .enumerate()
                .min_by_key(|(_, id)| graph.level_of(id).unwrap_or(u32::MAX))
                .map(|(idx, _)| idx)
                .unwrap_or(0);
            let node_id = pending.remove(next);
            let Some(folder) = graph
                .nodes
                .get(&node_id)
                .and_then(|n| n.folder())
                .map(str::to_string)
            else {
                continue;
            };
            let Some(entry) = catalog.by_uri(&folder) else {
                tracing::debug!("Folder {folder} of {node_id} is not in the catalog");
                continue;
            };
            for child in catalog.children(&entry.remote_id) {
                self.attach(graph, child, &node_id);
            }
        }
        tracing::debug!("Catalog merge: {:?}", self.stats);
        self.stats
    }

    fn is_excluded(&self, entry: &CatalogEntry) -> bool {
        self.exclude.is_match(&entry.basename)
    }

    fn attach(&mut self, graph: &mut DatasetGraph, entry: &CatalogEntry, parent_id: &str) {
        if !self.visited.insert(entry.remote_id.clone()) {
            return;
        }
        if self.is_excluded(entry) {
            self.stats.excluded += 1;
            return;
        }
        // An entry naming its parent, such as a dataset folder keyed by the dataset id, adds no
        // node of its own.
        if entry.uri_api == parent_id {
            let catalog = self.catalog;
            for child in catalog.children(&entry.remote_id) {
                self.attach(graph, child, parent_id);
            }
            return;
        }
        let Some(parent) = graph.nodes.get(parent_id) else {
            return;
        };
        // Under a derived sample, depth follows the lineage source rather than the folder.
        let parent_level = match parent.lineage_source() {
            Some(source) => graph.level_of(source).map(|l| l + 1).or(parent.level),
            None => parent.level,
        };
        let child_level = parent_level.map(|l| l + 1);

        let node_id = match graph.proxies.owner(&entry.uri_api).map(str::to_string) {
            Some(owner) if graph.nodes.contains_key(&owner) => {
                self.stats.reused += 1;
                if owner != parent_id {
                    if let Some(node) = graph.nodes.get_mut(&owner) {
                        if node.level.is_none() {
                            node.level = child_level;
                        }
                        if node.parent.is_none() {
                            node.parent = Some(parent_id.to_string());
                        }
                    }
                }
                owner
            }
            _ => {
                if graph.nodes.contains_key(&entry.uri_api) {
                    tracing::warn!(
                        "Catalog entry {} collides with existing node {}",
                        entry.remote_id,
                        entry.uri_api
                    );
                    return;
                }
                self.stats.created += 1;
                let node = self
                    .factory
                    .catalog_node(entry, parent_id, child_level);
                let id = node.id.clone();
                graph.nodes.insert(id.clone(), node);
                id
            }
        };

        if node_id != parent_id {
            if let Some(parent) = graph.nodes.get_mut(parent_id) {
                parent.children_counter += 1;
            }
            graph.forced_edges.push(Edge::new(parent_id, node_id.clone()));
        }

        let catalog = self.catalog;
        for child in catalog.children(&entry.remote_id) {
            self.attach(graph, child, &node_id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::helpers::{catalog_entry, organized_graph, sample_with_lineage};
    use crate::{classify::TypeModel, config::SdsConfig, node::NodeKind, rdf::PrefixTable};

    fn merge(graph: &mut DatasetGraph, entries: Vec<CatalogEntry>) -> MergeStats {
        let model = TypeModel::default();
        let prefixes = PrefixTable::default();
        let factory = NodeFactory::new(&model, &prefixes);
        let catalog = CatalogIndex::from_entries(entries);
        let exclude = SdsConfig::default().temp_file_regex().expect("default pattern");
        TreeGraphMerger::new(&catalog, &factory, &exclude).merge(graph)
    }

    #[test]
    fn temp_files_are_never_merged() {
        let mut graph = organized_graph();
        graph
            .nodes
            .get_mut("http://ex.org/D")
            .expect("root")
            .attributes
            .insert("hasFolderAboutIt".into(), vec!["folder-root".into()]);

        let stats = merge(
            &mut graph,
            vec![
                catalog_entry("0", None, "D", "inode/directory", "folder-root"),
                catalog_entry("1", Some("0"), "data", "inode/directory", "item-1"),
                catalog_entry("2", Some("1"), "x.tmp", "text/plain", "item-2"),
            ],
        );
        assert_eq!(stats.created, 1);
        assert_eq!(stats.excluded, 1);
        let data = graph.nodes.get("item-1").expect("item 1 merged");
        assert!(matches!(data.kind, NodeKind::Collection(_)));
        assert_eq!(data.level, Some(2));
        assert!(!graph.nodes.contains_key("item-2"));
        assert!(graph
            .forced_edges
            .contains(&Edge::new("http://ex.org/D", "item-1")));
    }

    #[test]
    fn proxied_entries_reuse_graph_nodes_and_lineage_sets_depth() {
        let mut graph = organized_graph();
        graph
            .nodes
            .get_mut("http://ex.org/D")
            .expect("root")
            .attributes
            .insert("hasFolderAboutIt".into(), vec!["folder-root".into()]);
        // Source sample at level 3, derived sample owning folder "sam-folder".
        let source = sample_with_lineage("http://ex.org/sam-1", None, Some(3));
        let mut derived = sample_with_lineage("http://ex.org/sam-2", Some("http://ex.org/sam-1"), None);
        derived
            .attributes
            .insert("hasFolderAboutIt".into(), vec!["sam-folder".into()]);
        graph.nodes.insert(source.id.clone(), source);
        graph.nodes.insert(derived.id.clone(), derived);
        graph
            .proxies
            .insert("sam-folder".into(), "http://ex.org/sam-2".into());

        let stats = merge(
            &mut graph,
            vec![
                catalog_entry("0", None, "D", "inode/directory", "folder-root"),
                catalog_entry("5", Some("0"), "sam-2", "inode/directory", "sam-folder"),
                catalog_entry("6", Some("5"), "scan.tif", "image/tiff", "file-6"),
            ],
        );
        assert_eq!(stats.created, 1);
        let file = graph.nodes.get("file-6").expect("file merged");
        assert!(matches!(file.kind, NodeKind::File(_)));
        // Parent depth follows the lineage source (3 + 1), the file sits one below.
        assert_eq!(file.level, Some(5));
        assert_eq!(file.parent.as_deref(), Some("http://ex.org/sam-2"));
        assert_eq!(graph.nodes["http://ex.org/sam-2"].children_counter, 1);
    }

    #[test]
    fn parentless_entries_hang_below_a_root_without_folder() {
        let mut graph = organized_graph();
        let stats = merge(
            &mut graph,
            vec![
                catalog_entry("1", None, "primary", "inode/directory", "item-1"),
                catalog_entry("2", Some("1"), "x.tmp", "text/plain", "item-2"),
            ],
        );
        assert_eq!(stats.created, 1);
        assert_eq!(stats.excluded, 1);
        assert_eq!(graph.level_of("item-1"), Some(2));
        assert_eq!(
            graph.nodes["item-1"].parent.as_deref(),
            Some("http://ex.org/D")
        );
        assert!(!graph.nodes.contains_key("item-2"));
    }

    #[test]
    fn each_entry_is_attached_once() {
        let mut graph = organized_graph();
        graph
            .nodes
            .get_mut("http://ex.org/S1")
            .expect("subject")
            .attributes
            .insert("hasFolderAboutIt".into(), vec!["item-1".into()]);
        let stats = merge(
            &mut graph,
            vec![
                catalog_entry("1", None, "sub-1", "inode/directory", "item-1"),
                catalog_entry("2", Some("1"), "a.csv", "text/csv", "item-2"),
            ],
        );
        // Reached from the root first, then again through the subject's folder.
        assert_eq!(stats.created, 2);
        let attached = graph
            .forced_edges
            .iter()
            .filter(|e| e.target == "item-2")
            .count();
        assert_eq!(attached, 1);
    }

    #[test]
    fn a_catalog_root_named_by_the_dataset_walks_into_the_dataset_node() {
        let mut graph = organized_graph();
        let stats = merge(
            &mut graph,
            vec![
                catalog_entry("0", None, "D", "inode/directory", "http://ex.org/D"),
                catalog_entry("1", Some("0"), "docs", "inode/directory", "item-1"),
                catalog_entry("2", Some("1"), "README.md", "text/markdown", "item-2"),
            ],
        );
        assert_eq!(stats.created, 2);
        assert_eq!(graph.level_of("item-1"), Some(2));
        assert_eq!(
            graph.nodes["item-1"].parent.as_deref(),
            Some("http://ex.org/D")
        );
        assert_eq!(graph.level_of("item-2"), Some(3));
        assert!(graph
            .forced_edges
            .contains(&Edge::new("http://ex.org/D", "item-1")));
        assert!(!graph
            .forced_edges
            .iter()
            .any(|e| e.source == e.target));
    }

    #[test]
    fn a_temp_file_reached_twice_is_excluded_once() {
        let mut graph = organized_graph();
        graph
            .nodes
            .get_mut("http://ex.org/S1")
            .expect("subject")
            .attributes
            .insert("hasFolderAboutIt".into(), vec!["item-1".into()]);
        let stats = merge(
            &mut graph,
            vec![
                catalog_entry("1", None, "sub-1", "inode/directory", "item-1"),
                catalog_entry("2", Some("1"), "upload.tmp", "text/plain", "item-2"),
            ],
        );
        assert_eq!(stats.excluded, 1);
        assert!(!graph.nodes.contains_key("item-2"));
    }
}
