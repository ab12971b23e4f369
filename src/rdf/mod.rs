//! RDF input side of the pipeline.
//!
//! - [`quad`]: the term/quad model the rest of the crate consumes
//! - [`parser`]: the push-driven [`QuadParser`] seam and its Turtle implementation
//! - [`store`]: an in-memory [`QuadStore`] that remembers quad order and subjects

mod parser;
mod quad;
mod store;

pub use parser::{ParseEvent, QuadParser, TurtleQuadParser};
pub use quad::{PrefixTable, Property, Quad, Term, OWL_NS, RDF_TYPE};
pub use store::QuadStore;
