//! One dataset in, one graph view and one tree out.
//!
//! A [`DatasetSplinter`] owns the inputs for a single dataset. The first request runs the whole
//! pipeline; later requests share the memoized result:
//!
//! ```text
//! parse (blocking worker) -> QuadStore -> ingest -> cast -> organize
//!     -> catalog merge -> lineage fixes -> tree -> layout -> GraphView
//! ```

use std::sync::Arc;
use tokio::{
    sync::{mpsc::unbounded_channel, OnceCell},
    task::spawn_blocking,
    time::timeout,
};

use crate::{
    catalog::{CatalogEntry, CatalogIndex},
    config::SdsConfig,
    error::SdsError,
    export::GraphView,
    graph::{cast, ingest},
    layout::{fix_links, identify_childless_parents, LayoutEngine},
    merge::{MergeStats, TreeGraphMerger},
    node::NodeFactory,
    rdf::{ParseEvent, QuadParser, QuadStore, TurtleQuadParser},
    tree::{assign_tree_references, TreeBuilder, TreeNode},
};

/// The immutable result of one pipeline run.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessedDataset {
    pub graph: GraphView,
    pub tree: TreeNode,
    pub merge: MergeStats,
    /// Catalog entries the tree could not reach from its root.
    pub orphans: usize,
}

pub struct DatasetSplinter {
    turtle: Arc<str>,
    catalog: Vec<CatalogEntry>,
    config: SdsConfig,
    parser: Arc<dyn QuadParser>,
    processed: OnceCell<Arc<ProcessedDataset>>,
}

impl DatasetSplinter {
    pub fn new<S: AsRef<str>>(turtle: S, catalog: Vec<CatalogEntry>, config: SdsConfig) -> Self {
        DatasetSplinter {
            turtle: Arc::from(turtle.as_ref()),
            catalog,
            config,
            parser: Arc::new(TurtleQuadParser::new()),
            processed: OnceCell::new(),
        }
    }

    /// Swap the default Turtle parser for another implementation.
    pub fn with_parser(mut self, parser: Arc<dyn QuadParser>) -> Self {
        self.parser = parser;
        self
    }

    pub fn config(&self) -> &SdsConfig {
        &self.config
    }

    pub fn is_processed(&self) -> bool {
        self.processed.initialized()
    }

    /// Run the pipeline once. A failed run is not cached, so a later call retries it.
    pub async fn process(&self) -> Result<Arc<ProcessedDataset>, SdsError> {
        self.processed
            .get_or_try_init(|| async {
                let store = self.load_store().await?;
                let processed = build_views(&store, self.catalog.clone(), &self.config)?;
                Ok(Arc::new(processed))
            })
            .await
            .cloned()
    }

    pub async fn graph(&self) -> Result<GraphView, SdsError> {
        Ok(self.process().await?.graph.clone())
    }

    pub async fn tree(&self) -> Result<TreeNode, SdsError> {
        Ok(self.process().await?.tree.clone())
    }

    /// Drive the parser on a blocking worker and collect its events until the terminal signal.
    async fn load_store(&self) -> Result<QuadStore, SdsError> {
        let (tx, mut rx) = unbounded_channel();
        let parser = self.parser.clone();
        let text = self.turtle.clone();
        let worker = spawn_blocking(move || parser.parse(&text, &tx));

        let mut store = QuadStore::new();
        let deadline = self.config.parse_timeout();
        let finished = timeout(deadline, async {
            while let Some(event) = rx.recv().await {
                match event {
                    ParseEvent::Prefix { prefix, iri } => store.add_prefix(prefix, iri),
                    ParseEvent::Quad(quad) => store.add_quad(quad),
                    ParseEvent::End => return true,
                }
            }
            false
        })
        .await;

        match finished {
            Ok(true) => {
                tracing::debug!(
                    "Loaded {} quads and {} prefixes",
                    store.len(),
                    store.prefixes().len()
                );
                Ok(store)
            }
            // The channel closed early. Report the parser's own failure when it has one.
            Ok(false) => {
                worker.await??;
                Err(SdsError::Parse(
                    "parser stopped without sending its terminal signal".to_string(),
                ))
            }
            Err(_) => {
                tracing::warn!("RDF parser missed its {}s deadline", deadline.as_secs());
                Err(SdsError::Timeout(deadline.as_secs()))
            }
        }
    }
}

/// The synchronous part of the pipeline, from a loaded store to the exported views.
pub fn build_views(
    store: &QuadStore,
    catalog: Vec<CatalogEntry>,
    config: &SdsConfig,
) -> Result<ProcessedDataset, SdsError> {
    let exclude = config.temp_file_regex()?;
    let factory = NodeFactory::new(&config.types, store.prefixes());

    let mut graph = cast(ingest(store), &factory)?;
    graph.organize_by_category(config, &factory);

    let index = CatalogIndex::from_entries(catalog);
    let merge = TreeGraphMerger::new(&index, &factory, &exclude).merge(&mut graph);

    let levels = fix_links(&mut graph);
    identify_childless_parents(&mut graph);

    let mut builder = TreeBuilder::new(index);
    let tree = builder.build(&graph);
    assign_tree_references(&mut graph, &tree);

    let layout = LayoutEngine::new(config.node_spacing).compute_positions(&graph, levels);
    let view = GraphView::new(&graph, &layout);
    tracing::info!(
        "Dataset {}: {} nodes, {} links, {} files merged",
        graph.root,
        view.nodes.len(),
        view.links.len(),
        merge.created
    );
    Ok(ProcessedDataset {
        graph: view,
        tree,
        merge,
        orphans: builder.remaining(),
    })
}
