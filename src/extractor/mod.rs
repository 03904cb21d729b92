//! The lazy k-best extraction algorithm: derivation states, per-node
//! frontier bookkeeping, the top-level driver, serialization, and cost
//! reconstruction.

mod cost_reconstruct;
mod kbest;
mod serializer;
mod state;
mod virtual_node;

pub use kbest::Extractor;

#[cfg(test)]
mod tests;
