//! Error kinds for extraction (§7).
//!
//! `RankUnreachable` is deliberately absent: a request for a rank beyond the
//! total number of derivations degrades to `None`, never an error (see
//! `Extractor::kth_hypothesis`).

use thiserror::Error;

use crate::consumer::SinkError;

#[derive(Debug, Error)]
pub enum ExtractError {
    /// Duplicate signature at seeding, a missing node, or any other shape
    /// the input hypergraph is not allowed to take. Fatal.
    #[error("hypergraph corrupt: {0}")]
    HypergraphCorrupt(String),

    /// Sanity-check failure: the reconstructed per-feature costs don't sum
    /// (within tolerance) to the derivation's stored cost. Fatal.
    #[error("cost mismatch: expected {expected:.3}, actual {actual:.3} ({detail})")]
    CostMismatch {
        expected: f64,
        actual: f64,
        detail: String,
    },

    /// The consumer raised during `deliver`. Extraction unwinds, calls
    /// `finish` once, then propagates this.
    #[error("sink failure: {0}")]
    SinkFailure(#[from] SinkError),

    /// A state was popped that was never inserted, or some other breach of
    /// the frontier-completeness invariant. Fatal.
    #[error("internal invariant violated: {0}")]
    OverflowDerivationState(String),
}
