//! Lazy k-best derivation extraction over a weighted hypergraph.
//!
//! The hypergraph, feature functions, and symbol table are external
//! collaborators (see [`hypergraph`], [`features`], [`symbols`]); this crate
//! owns only the extraction algorithm itself: frontier management per node,
//! derivation-state signatures, recursive child expansion, serialization to
//! flat or tree-shaped hypothesis lines, and cost reconstruction.

pub mod config;
pub mod consumer;
pub mod error;
pub mod extractor;
pub mod features;
pub mod hypergraph;
pub mod symbols;
pub mod trace_init;

pub use config::ExtractorConfig;
pub use consumer::{HypothesisSink, SinkError, VecSink, WriteSink};
pub use error::ExtractError;
pub use extractor::Extractor;
pub use features::{ConstFeature, EdgeTransitionFeature, FeatureFunction};
pub use hypergraph::{Hyperedge, Hypergraph, Node, NodeId, Rule};
pub use symbols::{InMemorySymbolTable, SymbolTable};
