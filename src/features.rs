//! The feature-function collaborator (§6, §4.5): a static weight plus a
//! helper that computes a transition cost for one hyperedge. Feature
//! function *implementations* are out of scope for this crate (§1);
//! [`ConstFeature`] is a trivial reference implementation used in tests and
//! as a CLI default.

use crate::hypergraph::{Hyperedge, Rule};

/// Everything a feature function needs to score one hyperedge transition.
pub struct TransitionContext<'a> {
    pub edge: &'a Hyperedge,
    pub rule: Option<&'a Rule>,
    pub antecedents: &'a [crate::hypergraph::NodeId],
    pub parent_span: (u32, u32),
    pub source_path: &'a str,
    pub sent_id: i64,
}

pub trait FeatureFunction: Send + Sync {
    fn weight(&self) -> f64;
    fn transition_cost(&self, ctx: &TransitionContext) -> f64;
}

/// A feature function whose transition cost is always the same constant,
/// independent of context. Useful for exercising the cost-reconstruction
/// sanity check without a real decoder feature behind it.
pub struct ConstFeature {
    pub weight: f64,
    pub cost: f64,
}

impl FeatureFunction for ConstFeature {
    fn weight(&self) -> f64 {
        self.weight
    }

    fn transition_cost(&self, _ctx: &TransitionContext) -> f64 {
        self.cost
    }
}

/// A feature function that reports the hyperedge's own stored
/// `best_derivation_cost` verbatim. Exact only for edges with no
/// antecedents (the cost then has nothing else folded into it); used in
/// tests built on axiom-only derivations where a single feature is meant to
/// reproduce the whole derivation cost.
pub struct EdgeTransitionFeature {
    pub weight: f64,
}

impl FeatureFunction for EdgeTransitionFeature {
    fn weight(&self) -> f64 {
        self.weight
    }

    fn transition_cost(&self, ctx: &TransitionContext) -> f64 {
        ctx.edge.best_derivation_cost
    }
}
