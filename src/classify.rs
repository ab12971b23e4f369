//! Type classification: maps a node's `rdf:type` assertions onto the closed set of
//! [`SemanticType`] categories by longest matching IRI prefix.

use serde::{Deserialize, Serialize};
use std::{
    collections::BTreeMap,
    fmt::{Display, Formatter},
};

use crate::rdf::{PrefixTable, Property};

/// The closed set of semantic categories a graph node can fall into.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub enum SemanticType {
    Dataset,
    Ontology,
    Subject,
    Sample,
    Protocol,
    Person,
    Award,
    Collection,
    File,
    Unknown,
}

impl SemanticType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SemanticType::Dataset => "Dataset",
            SemanticType::Ontology => "Ontology",
            SemanticType::Subject => "Subject",
            SemanticType::Sample => "Sample",
            SemanticType::Protocol => "Protocol",
            SemanticType::Person => "Person",
            SemanticType::Award => "Award",
            SemanticType::Collection => "Collection",
            SemanticType::File => "File",
            SemanticType::Unknown => "Unknown",
        }
    }
}

impl Display for SemanticType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The type table: which prefixes and vocabulary terms mean what.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TypeModel {
    /// Prefix name of the domain vocabulary. A declaration with this name overrides
    /// `vocabulary_namespace`.
    pub vocabulary_prefix: String,
    pub vocabulary_namespace: String,
    /// Prefix name → category, applied to `owl:NamedIndividual` nodes whose id lives under the
    /// prefix IRI.
    pub individuals: BTreeMap<String, SemanticType>,
    /// Vocabulary term (IRI suffix) → category.
    pub vocabulary: BTreeMap<String, SemanticType>,
}

impl Default for TypeModel {
    fn default() -> Self {
        let individuals = [
            ("dataset", SemanticType::Dataset),
            ("subject", SemanticType::Subject),
            ("sample", SemanticType::Sample),
            ("contributor", SemanticType::Person),
            ("ORCID", SemanticType::Person),
            ("protocol", SemanticType::Protocol),
            ("award", SemanticType::Award),
        ];
        let vocabulary = [
            ("Dataset", SemanticType::Dataset),
            ("Resource", SemanticType::Dataset),
            ("Subject", SemanticType::Subject),
            ("Sample", SemanticType::Sample),
            ("Protocol", SemanticType::Protocol),
            ("Person", SemanticType::Person),
            ("Researcher", SemanticType::Person),
            ("Award", SemanticType::Award),
        ];
        TypeModel {
            vocabulary_prefix: "sparc".to_string(),
            vocabulary_namespace: "http://uri.interlex.org/tgbugs/uris/readable/sparc/"
                .to_string(),
            individuals: individuals
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
            vocabulary: vocabulary
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
        }
    }
}

impl TypeModel {
    fn vocabulary_namespace<'a>(&'a self, prefixes: &'a PrefixTable) -> &'a str {
        prefixes
            .iri(&self.vocabulary_prefix)
            .unwrap_or(&self.vocabulary_namespace)
    }
}

#[derive(Debug, Clone, Copy)]
struct Match {
    kind: SemanticType,
    length: usize,
}

impl Match {
    fn offer(&mut self, kind: SemanticType, length: usize) {
        if length > self.length {
            self.kind = kind;
            self.length = length;
        }
    }
}

/// Select the category with the longest matching IRI prefix across all of `types`.
///
/// Ties keep the first match found. Returns [`SemanticType::Unknown`] when no rule matches.
pub fn classify(
    node_id: &str,
    types: &[Property],
    prefixes: &PrefixTable,
    model: &TypeModel,
) -> SemanticType {
    let owl = prefixes.owl();
    let named_individual = format!("{owl}NamedIndividual");
    let ontology = format!("{owl}Ontology");
    let vocabulary = model.vocabulary_namespace(prefixes);

    let mut found = Match {
        kind: SemanticType::Unknown,
        length: 0,
    };
    for assertion in types {
        let type_iri = assertion.kind.as_deref().unwrap_or(&assertion.value);
        if type_iri == named_individual {
            for (prefix, iri) in prefixes.iter() {
                if let Some(kind) = model.individuals.get(prefix) {
                    if !iri.is_empty() && node_id.starts_with(iri.as_str()) {
                        found.offer(*kind, iri.len());
                    }
                }
            }
        } else if type_iri == ontology {
            found.offer(SemanticType::Ontology, type_iri.len());
        } else if let Some(term) = type_iri
            .strip_prefix(vocabulary)
            .filter(|_| !vocabulary.is_empty())
        {
            if let Some(kind) = model.vocabulary.get(term) {
                found.offer(*kind, type_iri.len());
            }
        }
    }
    found.kind
}
