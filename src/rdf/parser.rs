use oxrdf::{Subject, Term as OxTerm, Triple};
use oxttl::TurtleParser;
use std::collections::HashSet;
use tokio::sync::mpsc::UnboundedSender;

use super::{Quad, Term};
use crate::error::SdsError;

/// Events pushed by a [`QuadParser`] while it walks a document.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseEvent {
    /// A namespace prefix declaration.
    Prefix { prefix: String, iri: String },
    Quad(Quad),
    /// Terminal signal. Nothing follows it.
    End,
}

/// The RDF parser collaborator.
///
/// Implementations push every quad and prefix declaration into `tx` as they are read and
/// finish with [`ParseEvent::End`]. Parsing runs on a blocking worker, so implementations are
/// free to do synchronous work.
pub trait QuadParser: Send + Sync {
    fn parse(&self, text: &str, tx: &UnboundedSender<ParseEvent>) -> Result<(), SdsError>;
}

/// Turtle parser backed by `oxttl`.
#[derive(Debug, Clone, Default)]
pub struct TurtleQuadParser {
    base_iri: Option<String>,
}

impl TurtleQuadParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_base_iri<S: Into<String>>(mut self, base_iri: S) -> Self {
        self.base_iri = Some(base_iri.into());
        self
    }
}

impl QuadParser for TurtleQuadParser {
    fn parse(&self, text: &str, tx: &UnboundedSender<ParseEvent>) -> Result<(), SdsError> {
        let mut parser = TurtleParser::new();
        if let Some(base_iri) = &self.base_iri {
            parser = parser
                .with_base_iri(base_iri)
                .map_err(|e| SdsError::Parse(format!("Invalid base IRI {base_iri}: {e}")))?;
        }
        let mut reader = parser.for_reader(text.as_bytes());
        let mut announced = HashSet::new();
        let mut count = 0usize;
        while let Some(result) = reader.next() {
            let triple = result?;
            // Prefixes become visible as the reader passes their declarations.
            for (prefix, iri) in reader.prefixes() {
                if announced.insert(prefix.to_string()) {
                    tx.send(ParseEvent::Prefix {
                        prefix: prefix.to_string(),
                        iri: iri.to_string(),
                    })?;
                }
            }
            match quad_from_triple(triple) {
                Some(quad) => {
                    count += 1;
                    tx.send(ParseEvent::Quad(quad))?;
                }
                None => tracing::debug!("Skipping quoted triple statement"),
            }
        }
        for (prefix, iri) in reader.prefixes() {
            if announced.insert(prefix.to_string()) {
                tx.send(ParseEvent::Prefix {
                    prefix: prefix.to_string(),
                    iri: iri.to_string(),
                })?;
            }
        }
        tracing::debug!("Parsed {count} quads, {} prefixes", announced.len());
        tx.send(ParseEvent::End)?;
        Ok(())
    }
}

fn quad_from_triple(triple: Triple) -> Option<Quad> {
    #[allow(unreachable_patterns)]
    let subject = match triple.subject {
        Subject::NamedNode(node) => Term::Named(node.as_str().to_string()),
        Subject::BlankNode(node) => Term::Blank(node.as_str().to_string()),
        _ => return None,
    };
    #[allow(unreachable_patterns)]
    let object = match triple.object {
        OxTerm::NamedNode(node) => Term::Named(node.as_str().to_string()),
        OxTerm::BlankNode(node) => Term::Blank(node.as_str().to_string()),
        OxTerm::Literal(literal) => Term::Literal {
            value: literal.value().to_string(),
            datatype: Some(literal.datatype().as_str().to_string()),
            language: literal.language().map(str::to_string),
        },
        _ => return None,
    };
    Some(Quad::new(subject, triple.predicate.as_str(), object))
}
