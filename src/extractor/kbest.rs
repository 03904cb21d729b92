//! The top-level extractor (§4.1): owns the hypergraph-node → virtual-node
//! mapping and drives enumeration from the goal.

use std::cell::RefCell;
use std::collections::HashMap;

use crate::config::ExtractorConfig;
use crate::consumer::HypothesisSink;
use crate::error::ExtractError;
use crate::features::FeatureFunction;
use crate::hypergraph::{Hypergraph, NodeId};
use crate::symbols::SymbolTable;

use super::cost_reconstruct;
use super::serializer;
use super::state::DerivationState;
use super::virtual_node::VirtualNode;

/// Owns the virtual-node table for one hypergraph and drives lazy k-best
/// enumeration from its goal. Feature functions and the symbol table are
/// stable external collaborators for the lifetime of the borrow.
pub struct Extractor<'a> {
    hg: &'a Hypergraph,
    symbols: &'a dyn SymbolTable,
    features: &'a [&'a dyn FeatureFunction],
    config: ExtractorConfig,
    vnodes: RefCell<HashMap<NodeId, VirtualNode>>,
}

impl<'a> Extractor<'a> {
    pub fn new(hg: &'a Hypergraph, symbols: &'a dyn SymbolTable, features: &'a [&'a dyn FeatureFunction]) -> Self {
        Self::with_config(hg, symbols, features, ExtractorConfig::default())
    }

    pub fn with_config(
        hg: &'a Hypergraph,
        symbols: &'a dyn SymbolTable,
        features: &'a [&'a dyn FeatureFunction],
        config: ExtractorConfig,
    ) -> Self {
        Self {
            hg,
            symbols,
            features,
            config,
            vnodes: RefCell::new(HashMap::new()),
        }
    }

    /// Discards all virtual-node state. Required before reusing an
    /// extractor against a different hypergraph.
    pub fn reset(&self) {
        self.vnodes.borrow_mut().clear();
    }

    /// The k-th best hypothesis rooted at `node` (1-based), or `None` if
    /// fewer than k derivations exist.
    pub fn kth_hypothesis(&self, node: NodeId, k: usize, sent_id: i64) -> Result<Option<String>, ExtractError> {
        match self.kth_hypothesis_state(node, k)? {
            Some(state) => Ok(Some(self.format_hypothesis(&state, sent_id)?)),
            None => Ok(None),
        }
    }

    /// The formatted k-th hypothesis at `node` together with its
    /// reconstructed per-feature cost breakdown, for diagnostic tooling
    /// (`kbtool explain`).
    pub fn explain(&self, node: NodeId, k: usize, sent_id: i64) -> Result<Option<(String, Vec<f64>)>, ExtractError> {
        match self.kth_hypothesis_state(node, k)? {
            Some(state) => {
                let line = self.format_hypothesis(&state, sent_id)?;
                let costs = cost_reconstruct::reconstruct(self, &state, sent_id)?;
                Ok(Some((line, costs)))
            }
            None => Ok(None),
        }
    }

    /// Enumerates up to `n` hypotheses from the goal node and delivers each
    /// formatted line to `sink`, calling `sink.finish()` exactly once on
    /// every exit path. Returns the number of hypotheses emitted.
    pub fn extract(&self, n: usize, sent_id: i64, sink: &mut dyn HypothesisSink) -> Result<usize, ExtractError> {
        let result = self.extract_inner(n, sent_id, sink);
        sink.finish();
        result
    }

    fn extract_inner(&self, n: usize, sent_id: i64, sink: &mut dyn HypothesisSink) -> Result<usize, ExtractError> {
        let _span = tracing::debug_span!("extract", n, sent_id).entered();
        let Some(goal) = self.hg.goal() else {
            return Ok(0);
        };
        let mut emitted = 0;
        for k in 1..=n {
            let Some(state) = self.kth_hypothesis_state(goal, k)? else {
                break;
            };
            let line = self.format_hypothesis(&state, sent_id)?;
            sink.deliver(&line)?;
            emitted += 1;
        }
        tracing::debug!(emitted, "extraction complete");
        Ok(emitted)
    }

    /// Fetches (seeding and expanding as needed) the k-th derivation state
    /// of `node`. The virtual node is removed from the table for the
    /// duration of the call so the recursive expansion can freely look up
    /// *other* nodes' entries without violating Rust's aliasing rules, then
    /// reinserted once the call returns.
    pub(crate) fn kth_hypothesis_state(&self, node: NodeId, k: usize) -> Result<Option<DerivationState>, ExtractError> {
        let mut vn = self
            .vnodes
            .borrow_mut()
            .remove(&node)
            .unwrap_or_else(|| VirtualNode::new(node));
        let result = vn.lazy_kbest_at_node(self, k);
        self.vnodes.borrow_mut().insert(node, vn);
        result
    }

    pub(crate) fn hypergraph(&self) -> &'a Hypergraph {
        self.hg
    }

    pub(crate) fn symbols(&self) -> &'a dyn SymbolTable {
        self.symbols
    }

    pub(crate) fn features(&self) -> &'a [&'a dyn FeatureFunction] {
        self.features
    }

    pub(crate) fn config(&self) -> ExtractorConfig {
        self.config
    }

    fn format_hypothesis(&self, state: &DerivationState, sent_id: i64) -> Result<String, ExtractError> {
        let yield_str = serializer::format_yield(self, state)?;

        let mut line = String::new();
        if sent_id >= 0 {
            line.push_str(&format!("{sent_id} ||| "));
        }
        line.push_str(&yield_str);

        if !self.features.is_empty() {
            let costs = cost_reconstruct::reconstruct(self, state, sent_id)?;
            if self.config.sanity_check {
                let actual: f64 = costs
                    .iter()
                    .zip(self.features.iter())
                    .map(|(cost, feature)| cost * feature.weight())
                    .sum();
                if (state.cost - actual).abs() > 1e-2 {
                    let detail = costs
                        .iter()
                        .zip(self.features.iter())
                        .map(|(cost, feature)| format!("(weight={:.3}, cost={:.3})", feature.weight(), cost))
                        .collect::<Vec<_>>()
                        .join(", ");
                    return Err(ExtractError::CostMismatch {
                        expected: state.cost,
                        actual,
                        detail,
                    });
                }
            }
            let scores: Vec<String> = costs.iter().map(|cost| format!("{:.3}", -cost)).collect();
            line.push_str(" ||| ");
            line.push_str(&scores.join(" "));
        }

        if self.config.add_combined_score {
            line.push_str(&format!(" ||| {:.3}", -state.cost));
        }

        Ok(line)
    }
}
