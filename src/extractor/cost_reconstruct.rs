//! Cost reconstruction (§4.5): recomputes each feature function's
//! transition-cost contribution along the hyperedges actually chosen by a
//! derivation, for the per-feature score block and the sanity check.

use crate::error::ExtractError;
use crate::features::TransitionContext;

use super::kbest::Extractor;
use super::state::DerivationState;

/// Returns one accumulated cost per feature function, in the same order as
/// `Extractor::features`.
pub(crate) fn reconstruct(
    ex: &Extractor,
    state: &DerivationState,
    sent_id: i64,
) -> Result<Vec<f64>, ExtractError> {
    let mut totals = vec![0.0; ex.features().len()];
    accumulate(ex, state, sent_id, &mut totals)?;
    Ok(totals)
}

fn accumulate(
    ex: &Extractor,
    state: &DerivationState,
    sent_id: i64,
    totals: &mut [f64],
) -> Result<(), ExtractError> {
    let node = ex.hypergraph().node(state.node).ok_or_else(|| {
        ExtractError::HypergraphCorrupt(format!("node {:?} vanished during cost reconstruction", state.node))
    })?;
    let edge = node.hyperedges.get(state.edge_pos).ok_or_else(|| {
        ExtractError::OverflowDerivationState(format!(
            "edge_pos {} out of range for node {:?}",
            state.edge_pos, state.node
        ))
    })?;

    let ctx = TransitionContext {
        edge,
        rule: edge.rule.as_ref(),
        antecedents: &edge.antecedents,
        parent_span: (node.i, node.j),
        source_path: &edge.source_path,
        sent_id,
    };
    for (total, feature) in totals.iter_mut().zip(ex.features().iter()) {
        *total += feature.transition_cost(&ctx);
    }

    for (pos, &child) in edge.antecedents.iter().enumerate() {
        let rank = *state.ranks.get(pos).ok_or_else(|| {
            ExtractError::OverflowDerivationState(format!(
                "derivation state at node {:?} has no rank for antecedent position {pos}",
                state.node
            ))
        })?;
        let child_state = ex.kth_hypothesis_state(child, rank)?.ok_or_else(|| {
            ExtractError::HypergraphCorrupt(format!(
                "antecedent {child:?} has no rank-{rank} derivation during cost reconstruction"
            ))
        })?;
        accumulate(ex, &child_state, sent_id, totals)?;
    }

    Ok(())
}
