use std::collections::HashSet;

use super::{PrefixTable, Quad, Term};

/// In-memory triple store fed one quad at a time by the parser.
///
/// Quads keep their arrival order, since ingestion is order-sensitive (proxy ownership is
/// established by earlier quads). Subjects are reported once each, in first-seen order.
#[derive(Debug, Clone, Default)]
pub struct QuadStore {
    quads: Vec<Quad>,
    subjects: Vec<Term>,
    seen: HashSet<Term>,
    prefixes: PrefixTable,
}

impl QuadStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_quad(&mut self, quad: Quad) {
        if self.seen.insert(quad.subject.clone()) {
            self.subjects.push(quad.subject.clone());
        }
        self.quads.push(quad);
    }

    pub fn add_prefix<P: Into<String>, I: Into<String>>(&mut self, prefix: P, iri: I) {
        self.prefixes.declare(prefix, iri);
    }

    /// Every distinct subject term, blank nodes included.
    pub fn subjects(&self) -> impl Iterator<Item = &Term> {
        self.subjects.iter()
    }

    pub fn quads(&self) -> &[Quad] {
        &self.quads
    }

    pub fn prefixes(&self) -> &PrefixTable {
        &self.prefixes
    }

    pub fn len(&self) -> usize {
        self.quads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quads.is_empty()
    }
}

impl FromIterator<Quad> for QuadStore {
    fn from_iter<T: IntoIterator<Item = Quad>>(iter: T) -> Self {
        let mut store = QuadStore::new();
        for quad in iter {
            store.add_quad(quad);
        }
        store
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subjects_are_distinct_and_ordered() {
        let store: QuadStore = [
            Quad::new(Term::named("b"), "p", Term::literal("1")),
            Quad::new(Term::named("a"), "p", Term::literal("2")),
            Quad::new(Term::named("b"), "q", Term::literal("3")),
            Quad::new(Term::blank("x"), "q", Term::literal("4")),
        ]
        .into_iter()
        .collect();

        let subjects = store.subjects().cloned().collect::<Vec<_>>();
        assert_eq!(
            subjects,
            vec![Term::named("b"), Term::named("a"), Term::blank("x")]
        );
        assert_eq!(store.len(), 4);
    }
}
