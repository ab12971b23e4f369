use super::{Edge, RawGraph};
use crate::rdf::{Quad, QuadStore};

/// Build the untyped graph from every quad in `store`.
///
/// Every non-blank subject becomes a node. Literals and type assertions are attached to their
/// subject (or its proxy owner); statements linking two distinct nodes become edges; anything
/// else folds its object into the subject's owner as a proxy.
pub fn ingest(store: &QuadStore) -> RawGraph {
    let mut graph = RawGraph::default();
    for subject in store.subjects() {
        if !subject.is_blank() {
            graph.build_node(&subject.id());
        }
    }
    tracing::debug!("Created {} nodes from subjects", graph.nodes.len());

    let mut dropped = 0usize;
    for quad in store.quads() {
        let attached = if quad.object.is_literal() || quad.is_type_assertion() {
            attach(&mut graph, quad, false)
        } else {
            link(&mut graph, quad)
        };
        if !attached {
            dropped += 1;
        }
    }
    if dropped > 0 {
        tracing::warn!("{dropped} statements had no node or proxy owner and were dropped");
    }
    tracing::debug!(
        "Ingested {} quads: {} nodes, {} edges, {} proxies",
        store.len(),
        graph.nodes.len(),
        graph.edges.len(),
        graph.proxies.len()
    );
    graph
}

fn link(graph: &mut RawGraph, quad: &Quad) -> bool {
    let source = quad.subject.id();
    let target = quad.object.id();
    if source != target
        && graph.nodes.contains_key(&source)
        && graph.nodes.contains_key(&target)
    {
        graph.edges.push(Edge::new(source, target));
        attach(graph, quad, false)
    } else {
        attach(graph, quad, true)
    }
}

/// Attach `quad` to the node owning its subject. With `fold`, the object is also recorded as a
/// proxy of that owner.
fn attach(graph: &mut RawGraph, quad: &Quad, fold: bool) -> bool {
    let subject = quad.subject.id();
    let Some(owner_id) = graph.resolve(&subject) else {
        tracing::warn!("No node or proxy owner for statement {quad}, dropping it");
        return false;
    };
    let direct = owner_id == subject;
    let object_id = quad.object.id();
    let Some(owner) = graph.nodes.get_mut(&owner_id) else {
        return false;
    };

    if direct && quad.is_type_assertion() {
        owner.types.push(quad.as_property());
    } else {
        // Type assertions of a proxy describe the proxy, not its owner, so they stay plain
        // properties and never influence classification.
        owner.properties.push(quad.as_property());
    }

    if fold && object_id != owner_id {
        if !owner.proxies.contains(&object_id) {
            owner.proxies.push(object_id.clone());
        }
        graph.proxies.insert(object_id, owner_id);
    }
    true
}
