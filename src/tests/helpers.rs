//! Shared test utilities for graph and catalog testing

use crate::{
    catalog::CatalogEntry,
    classify::TypeModel,
    config::SdsConfig,
    graph::{cast, ingest, DatasetGraph},
    node::{GraphNode, Marker, NodeFactory, NodeKind},
    rdf::{PrefixTable, Quad, QuadStore, Term, OWL_NS, RDF_TYPE},
};
use std::collections::BTreeMap;

pub const SPARC: &str = "http://uri.interlex.org/tgbugs/uris/readable/sparc/";
pub const TITLE: &str = "http://purl.org/dc/elements/1.1/title";

/// Initialize logging for tests
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init()
        .ok();
}

pub fn type_quad(subject: &str, type_iri: &str) -> Quad {
    Quad::new(Term::named(subject), RDF_TYPE, Term::named(type_iri))
}

pub fn literal_quad(subject: &str, predicate: &str, value: &str) -> Quad {
    Quad::new(Term::named(subject), predicate, Term::literal(value))
}

pub fn link_quad(subject: &str, predicate: &str, object: &str) -> Quad {
    Quad::new(Term::named(subject), predicate, Term::named(object))
}

/// Dataset `http://ex.org/D` and ontology `http://ex.org/O`, typed through the vocabulary.
pub fn anchor_quads() -> Vec<Quad> {
    vec![
        type_quad("http://ex.org/D", &format!("{SPARC}Dataset")),
        literal_quad("http://ex.org/D", TITLE, "Test dataset"),
        type_quad("http://ex.org/O", &format!("{OWL_NS}Ontology")),
    ]
}

/// Run ingest, cast and organize with the default type model.
pub fn build_graph(quads: Vec<Quad>) -> DatasetGraph {
    init_logging();
    let store = quads.into_iter().collect::<QuadStore>();
    let config = SdsConfig::default();
    let model = TypeModel::default();
    let prefixes = PrefixTable::default();
    let factory = NodeFactory::new(&model, &prefixes);
    let mut graph = cast(ingest(&store), &factory).expect("anchored graph");
    graph.organize_by_category(&config, &factory);
    graph
}

/// Root `http://ex.org/D` at level 1, the three categories at level 2, and one subject
/// `http://ex.org/S1` at level 3 under the Subjects category.
pub fn organized_graph() -> DatasetGraph {
    let mut quads = anchor_quads();
    quads.push(type_quad("http://ex.org/S1", &format!("{SPARC}Subject")));
    quads.push(link_quad(
        "http://ex.org/D",
        &format!("{SPARC}hasSubject"),
        "http://ex.org/S1",
    ));
    build_graph(quads)
}

pub fn sample_with_lineage(id: &str, derived_from: Option<&str>, level: Option<u32>) -> GraphNode {
    let kind = NodeKind::Sample {
        derived_from: derived_from.map(str::to_string),
    };
    let mut attributes = BTreeMap::new();
    if let Some(source) = derived_from {
        attributes.insert("derivedFrom".to_string(), vec![source.to_string()]);
    }
    GraphNode {
        id: id.to_string(),
        name: crate::node::local_name(id).to_string(),
        marker: Marker::for_kind(&kind),
        kind,
        attributes,
        properties: Vec::new(),
        types: Vec::new(),
        proxies: Vec::new(),
        level,
        parent: None,
        children_counter: 0,
        tree_reference: None,
    }
}

pub fn catalog_entry(
    remote_id: &str,
    parent: Option<&str>,
    basename: &str,
    mimetype: &str,
    uri_api: &str,
) -> CatalogEntry {
    CatalogEntry {
        remote_id: remote_id.to_string(),
        parent_id: parent.map(str::to_string),
        basename: basename.to_string(),
        dataset_relative_path: basename.to_string(),
        size_bytes: None,
        mimetype: mimetype.to_string(),
        timestamp_updated: None,
        status: None,
        uri_api: uri_api.to_string(),
    }
}
