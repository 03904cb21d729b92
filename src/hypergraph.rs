//! The external hypergraph input: nodes, hyperedges, and grammar rules.
//!
//! Construction (parsing/decoding) is out of scope for this crate — callers
//! hand the extractor a fully built, read-only [`Hypergraph`]. The only
//! behavior owned here is the plain data model plus a small index for O(1)
//! node lookup; see `SPEC_FULL.md` §3 for the invariants callers must
//! uphold (every hyperedge's `best_derivation_cost` already reflects its
//! locally-best derivation, antecedent/rule nonterminal positions agree,
//! etc.) — this crate trusts them rather than re-deriving them.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::ExtractError;

/// Identifier for a hypergraph node (a recognized span).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u32);

/// A grammar-rule application: left-hand-side nonterminal plus source and
/// target symbol sequences. Some entries in either sequence are nonterminal
/// placeholders that refer back to antecedent positions (§3, §4.4).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rule {
    pub lhs: u32,
    pub source: Vec<u32>,
    pub target: Vec<u32>,
}

/// One incoming edge of a node: an ordered list of antecedent nodes, the
/// rule that licenses the edge (absent for a root/passthrough edge), the
/// grammar's provenance reference, and the cost of this edge's own
/// best-derivation (rule cost plus each antecedent's best cost).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hyperedge {
    pub antecedents: Vec<NodeId>,
    pub rule: Option<Rule>,
    pub source_path: String,
    pub best_derivation_cost: f64,
}

impl Hyperedge {
    pub fn is_axiom(&self) -> bool {
        self.antecedents.is_empty()
    }
}

/// A recognized span: its token endpoints (used for alignment annotations)
/// and its non-empty ordered list of incoming hyperedges.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub i: u32,
    pub j: u32,
    pub hyperedges: Vec<Hyperedge>,
}

/// Serde-friendly shape of a hypergraph: a flat node list plus the goal id.
/// `Hypergraph` itself keeps a derived index for O(1) lookup during
/// extraction, which this shape omits.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct HypergraphData {
    nodes: Vec<Node>,
    goal: Option<NodeId>,
}

/// A weighted hypergraph: read-only during extraction, owned by the caller.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(try_from = "HypergraphData", into = "HypergraphData")]
pub struct Hypergraph {
    nodes: Vec<Node>,
    index: HashMap<NodeId, usize>,
    goal: Option<NodeId>,
}

impl Hypergraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node, replacing any existing node with the same id.
    pub fn add_node(&mut self, node: Node) {
        match self.index.get(&node.id) {
            Some(&idx) => self.nodes[idx] = node,
            None => {
                self.index.insert(node.id, self.nodes.len());
                self.nodes.push(node);
            }
        }
    }

    pub fn set_goal(&mut self, id: NodeId) {
        self.goal = Some(id);
    }

    pub fn goal(&self) -> Option<NodeId> {
        self.goal
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.index.get(&id).map(|&idx| &self.nodes[idx])
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }
}

impl From<Hypergraph> for HypergraphData {
    fn from(hg: Hypergraph) -> Self {
        HypergraphData {
            nodes: hg.nodes,
            goal: hg.goal,
        }
    }
}

impl TryFrom<HypergraphData> for Hypergraph {
    type Error = ExtractError;

    fn try_from(data: HypergraphData) -> Result<Self, Self::Error> {
        let mut hg = Hypergraph {
            nodes: Vec::with_capacity(data.nodes.len()),
            index: HashMap::with_capacity(data.nodes.len()),
            goal: data.goal,
        };
        for node in data.nodes {
            if node.hyperedges.is_empty() {
                return Err(ExtractError::HypergraphCorrupt(format!(
                    "node {:?} has no incoming hyperedges",
                    node.id
                )));
            }
            hg.add_node(node);
        }
        Ok(hg)
    }
}
