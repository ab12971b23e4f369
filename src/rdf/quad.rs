use serde::{Deserialize, Serialize};
use std::{
    collections::BTreeMap,
    fmt::{Display, Formatter},
    ops::{Deref, DerefMut},
};

pub const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
pub const OWL_NS: &str = "http://www.w3.org/2002/07/owl#";
pub const XSD_STRING: &str = "http://www.w3.org/2001/XMLSchema#string";

/// A single RDF term as produced by the parser collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Term {
    Named(String),
    Blank(String),
    Literal {
        value: String,
        datatype: Option<String>,
        language: Option<String>,
    },
}

impl Term {
    pub fn named<S: Into<String>>(iri: S) -> Term {
        Term::Named(iri.into())
    }

    pub fn blank<S: Into<String>>(label: S) -> Term {
        Term::Blank(label.into())
    }

    pub fn literal<S: Into<String>>(value: S) -> Term {
        Term::Literal {
            value: value.into(),
            datatype: Some(XSD_STRING.to_string()),
            language: None,
        }
    }

    /// The identifier used as a node key. Blank nodes are rendered `_:label`, literals use
    /// their quoted lexical form so they never collide with an IRI.
    pub fn id(&self) -> String {
        match self {
            Term::Named(iri) => iri.clone(),
            Term::Blank(label) => format!("_:{label}"),
            Term::Literal {
                value, datatype, ..
            } => match datatype {
                Some(dt) => format!("\"{value}\"^^{dt}"),
                None => format!("\"{value}\""),
            },
        }
    }

    /// The bare value: IRI, blank label or literal lexical form.
    pub fn value(&self) -> &str {
        match self {
            Term::Named(iri) => iri,
            Term::Blank(label) => label,
            Term::Literal { value, .. } => value,
        }
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, Term::Blank(_))
    }

    pub fn is_literal(&self) -> bool {
        matches!(self, Term::Literal { .. })
    }

    pub fn datatype(&self) -> Option<&str> {
        match self {
            Term::Literal { datatype, .. } => datatype.as_deref(),
            _ => None,
        }
    }
}

impl Display for Term {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Term::Named(iri) => write!(f, "<{iri}>"),
            _ => write!(f, "{}", self.id()),
        }
    }
}

/// Subject, predicate, object plus the optional graph context. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Quad {
    pub subject: Term,
    pub predicate: String,
    pub object: Term,
    pub graph: Option<String>,
}

impl Quad {
    pub fn new<P: Into<String>>(subject: Term, predicate: P, object: Term) -> Quad {
        Quad {
            subject,
            predicate: predicate.into(),
            object,
            graph: None,
        }
    }

    pub fn is_type_assertion(&self) -> bool {
        self.predicate == RDF_TYPE
    }

    /// The property record this quad contributes to the node it is attached to.
    pub fn as_property(&self) -> Property {
        Property {
            predicate: self.predicate.clone(),
            kind: match &self.object {
                Term::Literal { datatype, .. } => datatype.clone(),
                other => Some(other.id()),
            },
            value: self.object.value().to_string(),
        }
    }
}

impl Display for Quad {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} <{}> {} .", self.subject, self.predicate, self.object)
    }
}

/// One predicate/type/value entry in a node's ordered property list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Property {
    pub predicate: String,
    /// Literal datatype IRI or object identifier.
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub value: String,
}

/// Namespace prefix declarations collected while parsing, keyed by prefix name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrefixTable(pub BTreeMap<String, String>);

impl PrefixTable {
    pub fn declare<P: Into<String>, I: Into<String>>(&mut self, prefix: P, iri: I) {
        self.0.insert(prefix.into(), iri.into());
    }

    pub fn iri(&self, prefix: &str) -> Option<&str> {
        self.0.get(prefix).map(String::as_str)
    }

    /// The OWL namespace as declared by the document, falling back to the W3C namespace.
    pub fn owl(&self) -> &str {
        self.iri("owl").unwrap_or(OWL_NS)
    }
}

impl Deref for PrefixTable {
    type Target = BTreeMap<String, String>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for PrefixTable {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl<P: Into<String>, I: Into<String>> FromIterator<(P, I)> for PrefixTable {
    fn from_iter<T: IntoIterator<Item = (P, I)>>(iter: T) -> Self {
        PrefixTable(
            iter.into_iter()
                .map(|(p, i)| (p.into(), i.into()))
                .collect(),
        )
    }
}
