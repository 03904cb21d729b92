//! Per-hypergraph-node extraction bookkeeping (§3, §4.2): the frontier heap,
//! the materialized ranked list, and the dedup tables that keep a node's
//! lazy k-best expansion from doing the same work twice.

use std::collections::{BinaryHeap, HashSet};

use crate::error::ExtractError;
use crate::hypergraph::NodeId;

use super::kbest::Extractor;
use super::serializer;
use super::state::{signature, DerivationState};

pub(crate) struct VirtualNode {
    node: NodeId,
    nbests: Vec<DerivationState>,
    cand_heap: BinaryHeap<DerivationState>,
    derivation_tbl: HashSet<String>,
    nbest_str_tbl: HashSet<String>,
    seeded: bool,
}

impl VirtualNode {
    pub(crate) fn new(node: NodeId) -> Self {
        Self {
            node,
            nbests: Vec::new(),
            cand_heap: BinaryHeap::new(),
            derivation_tbl: HashSet::new(),
            nbest_str_tbl: HashSet::new(),
            seeded: false,
        }
    }

    /// The k-th best derivation of this node (1-based), or `None` if fewer
    /// than k derivations exist.
    pub(crate) fn lazy_kbest_at_node(
        &mut self,
        ex: &Extractor,
        k: usize,
    ) -> Result<Option<DerivationState>, ExtractError> {
        if self.nbests.len() >= k {
            return Ok(Some(self.nbests[k - 1].clone()));
        }
        if !self.seeded {
            self.seed(ex)?;
            self.seeded = true;
        }
        while self.nbests.len() < k {
            let Some(res) = self.cand_heap.pop() else {
                break;
            };
            tracing::trace!(node = ?self.node, cost = res.cost, "popped candidate");
            let accept = if ex.config().unique_nbest {
                let yield_str = serializer::flat_yield(ex, &res)?;
                self.nbest_str_tbl.insert(yield_str)
            } else {
                true
            };
            if accept {
                self.nbests.push(res.clone());
            }
            self.lazy_next(ex, &res)?;
        }
        Ok(self.nbests.get(k - 1).cloned())
    }

    /// Seed the frontier with each incoming hyperedge's rank-1 ("best")
    /// derivation state.
    fn seed(&mut self, ex: &Extractor) -> Result<(), ExtractError> {
        let node = ex.hypergraph().node(self.node).ok_or_else(|| {
            ExtractError::HypergraphCorrupt(format!("node {:?} not found while seeding", self.node))
        })?;
        for (edge_pos, edge) in node.hyperedges.iter().enumerate() {
            for &child in &edge.antecedents {
                if ex.kth_hypothesis_state(child, 1)?.is_none() {
                    return Err(ExtractError::HypergraphCorrupt(format!(
                        "antecedent {child:?} of node {:?} has no derivations",
                        self.node
                    )));
                }
            }
            let ranks = vec![1; edge.antecedents.len()];
            let sig = signature(edge_pos, &ranks);
            let state = DerivationState {
                node: self.node,
                edge_pos,
                ranks,
                cost: edge.best_derivation_cost,
            };
            if !self.derivation_tbl.insert(sig) {
                return Err(ExtractError::HypergraphCorrupt(format!(
                    "duplicate signature at seeding for node {:?}, edge {edge_pos}",
                    self.node
                )));
            }
            self.cand_heap.push(state);
        }
        Ok(())
    }

    /// Enqueue every not-yet-seen successor of `last` (one per antecedent
    /// position, incrementing that position's rank by one).
    fn lazy_next(&mut self, ex: &Extractor, last: &DerivationState) -> Result<(), ExtractError> {
        let node = ex.hypergraph().node(self.node).ok_or_else(|| {
            ExtractError::HypergraphCorrupt(format!("node {:?} not found in lazy_next", self.node))
        })?;
        let edge = node.hyperedges.get(last.edge_pos).ok_or_else(|| {
            ExtractError::OverflowDerivationState(format!(
                "edge_pos {} out of range for node {:?}",
                last.edge_pos, self.node
            ))
        })?;

        for i in 0..edge.antecedents.len() {
            let mut next_ranks = last.ranks.clone();
            next_ranks[i] += 1;
            let sig = signature(last.edge_pos, &next_ranks);
            if self.derivation_tbl.contains(&sig) {
                continue;
            }
            let child = edge.antecedents[i];
            let Some(child_next) = ex.kth_hypothesis_state(child, next_ranks[i])? else {
                continue;
            };
            let child_prev = ex
                .kth_hypothesis_state(child, last.ranks[i])?
                .ok_or_else(|| {
                    ExtractError::OverflowDerivationState(format!(
                        "predecessor rank {} of node {child:?} missing",
                        last.ranks[i]
                    ))
                })?;
            let cost = last.cost - child_prev.cost + child_next.cost;
            let new_state = DerivationState {
                node: self.node,
                edge_pos: last.edge_pos,
                ranks: next_ranks,
                cost,
            };
            self.derivation_tbl.insert(sig);
            self.cand_heap.push(new_state);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExtractorConfig;
    use crate::features::FeatureFunction;
    use crate::hypergraph::{Hyperedge, Hypergraph, Node};
    use crate::symbols::InMemorySymbolTable;

    #[test]
    fn seeding_two_axioms_yields_both_ranks_in_cost_order() {
        let mut hg = Hypergraph::new();
        hg.add_node(Node {
            id: NodeId(1),
            i: 0,
            j: 1,
            hyperedges: vec![
                Hyperedge {
                    antecedents: vec![],
                    rule: None,
                    source_path: "a".into(),
                    best_derivation_cost: 2.0,
                },
                Hyperedge {
                    antecedents: vec![],
                    rule: None,
                    source_path: "b".into(),
                    best_derivation_cost: 1.0,
                },
            ],
        });
        hg.set_goal(NodeId(1));
        let symbols = InMemorySymbolTable::new();
        let features: Vec<&dyn FeatureFunction> = vec![];
        let ex = Extractor::with_config(&hg, &symbols, &features, ExtractorConfig::default());

        let first = ex.kth_hypothesis_state(NodeId(1), 1).unwrap().unwrap();
        let second = ex.kth_hypothesis_state(NodeId(1), 2).unwrap().unwrap();
        assert_eq!(first.cost, 1.0);
        assert_eq!(second.cost, 2.0);
        assert!(ex.kth_hypothesis_state(NodeId(1), 3).unwrap().is_none());
    }

    #[test]
    fn seeding_rejects_an_empty_hyperedge_list_gracefully() {
        // add_node on an empty hyperedge list is itself rejected by
        // Hypergraph's TryFrom at deserialize time (see hypergraph.rs); this
        // just confirms a freshly built node with one edge seeds without error.
        let mut hg = Hypergraph::new();
        hg.add_node(Node {
            id: NodeId(5),
            i: 0,
            j: 1,
            hyperedges: vec![Hyperedge {
                antecedents: vec![],
                rule: None,
                source_path: "only".into(),
                best_derivation_cost: 1.0,
            }],
        });
        hg.set_goal(NodeId(5));
        let symbols = InMemorySymbolTable::new();
        let features: Vec<&dyn FeatureFunction> = vec![];
        let ex = Extractor::with_config(&hg, &symbols, &features, ExtractorConfig::default());
        assert_eq!(ex.kth_hypothesis_state(NodeId(5), 1).unwrap().unwrap().cost, 1.0);
        assert!(ex.kth_hypothesis_state(NodeId(5), 2).unwrap().is_none());
    }
}
