//! Graph node records and the factory that builds them.
//!
//! Ingestion accumulates untyped [`RawNode`]s. A single [`NodeFactory`] step classifies each one
//! and produces a [`GraphNode`] whose [`NodeKind`] carries the data specific to its category.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::{
    catalog::CatalogEntry,
    classify::{classify, SemanticType, TypeModel},
    rdf::{PrefixTable, Property},
};

pub const ATTR_FOLDER: &str = "hasFolderAboutIt";
pub const ATTR_LINEAGE: &str = "derivedFrom";
pub const ATTR_RELATIVE_PATH: &str = "relativePath";

pub const DIRECTORY_MIMETYPE: &str = "inode/directory";

/// The three dataset-wide organizing nodes.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub enum Category {
    Subjects,
    Protocols,
    Contributors,
}

impl Category {
    pub const ALL: [Category; 3] = [
        Category::Subjects,
        Category::Protocols,
        Category::Contributors,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            Category::Subjects => "category:subjects",
            Category::Protocols => "category:protocols",
            Category::Contributors => "category:contributors",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Category::Subjects => "Subjects",
            Category::Protocols => "Protocols",
            Category::Contributors => "Contributors",
        }
    }

    /// The type of node gathered under this category.
    pub fn member_type(&self) -> SemanticType {
        match self {
            Category::Subjects => SemanticType::Subject,
            Category::Protocols => SemanticType::Protocol,
            Category::Contributors => SemanticType::Person,
        }
    }

    pub fn for_member(kind: SemanticType) -> Option<Category> {
        Category::ALL.into_iter().find(|c| c.member_type() == kind)
    }

    pub fn from_id(id: &str) -> Option<Category> {
        Category::ALL.into_iter().find(|c| c.id() == id)
    }
}

/// Catalog metadata carried by file and collection nodes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogAttributes {
    pub identifier: String,
    pub relative_path: String,
    pub size: Option<u64>,
    pub mimetype: String,
    pub updated: Option<String>,
    pub status: Option<String>,
}

impl From<&CatalogEntry> for CatalogAttributes {
    fn from(entry: &CatalogEntry) -> Self {
        CatalogAttributes {
            identifier: entry.basename.clone(),
            relative_path: entry.dataset_relative_path.clone(),
            size: entry.size_bytes,
            mimetype: entry.mimetype.clone(),
            updated: entry.timestamp_updated.clone(),
            status: entry.status.clone(),
        }
    }
}

impl CatalogAttributes {
    fn as_attribute_map(&self) -> BTreeMap<String, Vec<String>> {
        let mut map = BTreeMap::new();
        map.insert("identifier".to_string(), vec![self.identifier.clone()]);
        map.insert(
            ATTR_RELATIVE_PATH.to_string(),
            vec![self.relative_path.clone()],
        );
        if let Some(size) = self.size {
            map.insert("size".to_string(), vec![size.to_string()]);
        }
        map.insert("mimetype".to_string(), vec![self.mimetype.clone()]);
        if let Some(updated) = &self.updated {
            map.insert("updated".to_string(), vec![updated.clone()]);
        }
        if let Some(status) = &self.status {
            map.insert("status".to_string(), vec![status.clone()]);
        }
        map
    }
}

/// Category-specific node data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NodeKind {
    Dataset,
    /// Only exists between classification and the dataset merge.
    Ontology,
    Category(Category),
    Subject,
    Sample { derived_from: Option<String> },
    Protocol,
    Person,
    Award,
    Collection(CatalogAttributes),
    File(CatalogAttributes),
}

impl NodeKind {
    /// Category nodes report the type of the nodes they gather.
    pub fn semantic_type(&self) -> SemanticType {
        match self {
            NodeKind::Dataset => SemanticType::Dataset,
            NodeKind::Ontology => SemanticType::Ontology,
            NodeKind::Category(category) => category.member_type(),
            NodeKind::Subject => SemanticType::Subject,
            NodeKind::Sample { .. } => SemanticType::Sample,
            NodeKind::Protocol => SemanticType::Protocol,
            NodeKind::Person => SemanticType::Person,
            NodeKind::Award => SemanticType::Award,
            NodeKind::Collection(_) => SemanticType::Collection,
            NodeKind::File(_) => SemanticType::File,
        }
    }
}

/// Display marker handed to the renderer.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, Hash, PartialEq, Eq)]
pub enum Marker {
    Dataset,
    Subjects,
    Protocols,
    Contributors,
    Subject,
    Sample,
    Protocol,
    Person,
    Award,
    Collection,
    File,
    /// A subject or sample with nothing underneath it.
    NoData,
}

impl Marker {
    pub fn for_kind(kind: &NodeKind) -> Marker {
        match kind {
            NodeKind::Dataset | NodeKind::Ontology => Marker::Dataset,
            NodeKind::Category(Category::Subjects) => Marker::Subjects,
            NodeKind::Category(Category::Protocols) => Marker::Protocols,
            NodeKind::Category(Category::Contributors) => Marker::Contributors,
            NodeKind::Subject => Marker::Subject,
            NodeKind::Sample { .. } => Marker::Sample,
            NodeKind::Protocol => Marker::Protocol,
            NodeKind::Person => Marker::Person,
            NodeKind::Award => Marker::Award,
            NodeKind::Collection(_) => Marker::Collection,
            NodeKind::File(_) => Marker::File,
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Marker::Dataset => "./images/graph/dataset.svg",
            Marker::Subjects => "./images/graph/subjects.svg",
            Marker::Protocols => "./images/graph/protocols.svg",
            Marker::Contributors => "./images/graph/contributors.svg",
            Marker::Subject => "./images/graph/subject.svg",
            Marker::Sample => "./images/graph/sample.svg",
            Marker::Protocol => "./images/graph/protocol.svg",
            Marker::Person => "./images/graph/person.svg",
            Marker::Award => "./images/graph/award.svg",
            Marker::Collection => "./images/graph/folder.svg",
            Marker::File => "./images/graph/file.svg",
            Marker::NoData => "./images/graph/question_mark.svg",
        }
    }
}

/// An ingested subject before classification.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawNode {
    pub id: String,
    pub types: Vec<Property>,
    pub properties: Vec<Property>,
    pub proxies: Vec<String>,
}

impl RawNode {
    pub fn new<S: Into<String>>(id: S) -> Self {
        RawNode {
            id: id.into(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: String,
    pub name: String,
    pub kind: NodeKind,
    pub attributes: BTreeMap<String, Vec<String>>,
    pub properties: Vec<Property>,
    pub types: Vec<Property>,
    /// Auxiliary subjects whose properties were folded into this node.
    pub proxies: Vec<String>,
    pub level: Option<u32>,
    /// Id of the parent node. Never an owning reference.
    pub parent: Option<String>,
    pub children_counter: u32,
    pub tree_reference: Option<String>,
    pub marker: Marker,
}

impl GraphNode {
    pub fn semantic_type(&self) -> SemanticType {
        self.kind.semantic_type()
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .get(key)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// External id of the catalog folder describing this node.
    pub fn folder(&self) -> Option<&str> {
        self.attribute(ATTR_FOLDER)
    }

    /// The sample this node was derived from, if it is a sample with recorded lineage.
    pub fn lineage_source(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Sample { derived_from } => derived_from.as_deref(),
            _ => None,
        }
    }

    pub fn relative_path(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Collection(attrs) | NodeKind::File(attrs) => Some(&attrs.relative_path),
            _ => self.attribute(ATTR_RELATIVE_PATH),
        }
    }

    pub fn is_category(&self) -> bool {
        matches!(self.kind, NodeKind::Category(_))
    }
}

/// Local name of an IRI: whatever follows the last `#` or `/`.
pub fn local_name(iri: &str) -> &str {
    iri.rsplit(['#', '/'])
        .find(|segment| !segment.is_empty())
        .unwrap_or(iri)
}

/// Predicate local name → values, in property order.
pub fn normalize_properties(properties: &[Property]) -> BTreeMap<String, Vec<String>> {
    let mut attributes: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for property in properties {
        attributes
            .entry(local_name(&property.predicate).to_string())
            .or_default()
            .push(property.value.clone());
    }
    attributes
}

fn display_name(id: &str, attributes: &BTreeMap<String, Vec<String>>) -> String {
    let first = |key: &str| attributes.get(key).and_then(|v| v.first()).cloned();
    if let Some(name) = first("label").or_else(|| first("title")).or_else(|| first("name")) {
        return name;
    }
    if let (Some(first_name), Some(last_name)) = (first("firstName"), first("lastName")) {
        return format!("{first_name} {last_name}");
    }
    local_name(id).to_string()
}

/// The node factory collaborator: classifies raw nodes and decorates them for display.
#[derive(Debug, Clone, Copy)]
pub struct NodeFactory<'a> {
    model: &'a TypeModel,
    prefixes: &'a PrefixTable,
}

impl<'a> NodeFactory<'a> {
    pub fn new(model: &'a TypeModel, prefixes: &'a PrefixTable) -> Self {
        NodeFactory { model, prefixes }
    }

    /// Build a typed node, or `None` when the raw node classifies as
    /// [`SemanticType::Unknown`].
    pub fn create(&self, raw: RawNode) -> Option<GraphNode> {
        let semantic_type = classify(&raw.id, &raw.types, self.prefixes, self.model);
        let attributes = normalize_properties(&raw.properties);
        let kind = match semantic_type {
            SemanticType::Dataset => NodeKind::Dataset,
            SemanticType::Ontology => NodeKind::Ontology,
            SemanticType::Subject => NodeKind::Subject,
            SemanticType::Sample => NodeKind::Sample {
                derived_from: attributes
                    .get(ATTR_LINEAGE)
                    .and_then(|v| v.first())
                    .cloned(),
            },
            SemanticType::Protocol => NodeKind::Protocol,
            SemanticType::Person => NodeKind::Person,
            SemanticType::Award => NodeKind::Award,
            SemanticType::Collection | SemanticType::File | SemanticType::Unknown => {
                return None;
            }
        };
        Some(GraphNode {
            name: display_name(&raw.id, &attributes),
            marker: Marker::for_kind(&kind),
            id: raw.id,
            kind,
            attributes,
            properties: raw.properties,
            types: raw.types,
            proxies: raw.proxies,
            level: None,
            parent: None,
            children_counter: 0,
            tree_reference: None,
        })
    }

    pub fn category_node(&self, category: Category, root: &str, level: u32) -> GraphNode {
        let kind = NodeKind::Category(category);
        GraphNode {
            id: category.id().to_string(),
            name: category.name().to_string(),
            marker: Marker::for_kind(&kind),
            kind,
            attributes: BTreeMap::new(),
            properties: Vec::new(),
            types: Vec::new(),
            proxies: Vec::new(),
            level: Some(level),
            parent: Some(root.to_string()),
            children_counter: 0,
            tree_reference: None,
        }
    }

    /// A file or collection node built from catalog metadata.
    pub fn catalog_node(&self, entry: &CatalogEntry, parent: &str, level: Option<u32>) -> GraphNode {
        let attrs = CatalogAttributes::from(entry);
        let attributes = attrs.as_attribute_map();
        let kind = if entry.mimetype == DIRECTORY_MIMETYPE {
            NodeKind::Collection(attrs)
        } else {
            NodeKind::File(attrs)
        };
        GraphNode {
            id: entry.uri_api.clone(),
            name: entry.basename.clone(),
            marker: Marker::for_kind(&kind),
            kind,
            attributes,
            properties: Vec::new(),
            types: Vec::new(),
            proxies: Vec::new(),
            level,
            parent: Some(parent.to_string()),
            children_counter: 0,
            tree_reference: None,
        }
    }
}
