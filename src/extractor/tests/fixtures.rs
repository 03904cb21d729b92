//! Shared hypergraph builders for scenario and property tests.

use crate::hypergraph::{Hyperedge, Hypergraph, Node, NodeId, Rule};
use crate::symbols::{InMemorySymbolTable, SymbolTable};

pub(super) const GOAL: NodeId = NodeId(1);
pub(super) const N_A: NodeId = NodeId(2);
pub(super) const N_B: NodeId = NodeId(3);

fn axiom_edge(target: Vec<u32>, cost: f64) -> Hyperedge {
    Hyperedge {
        antecedents: vec![],
        rule: Some(Rule {
            lhs: 0,
            source: target.clone(),
            target,
        }),
        source_path: "axiom".into(),
        best_derivation_cost: cost,
    }
}

/// `N_A` with two ranked derivations ("a" cost 1.0, "x" cost 3.0) and `N_B`
/// with two ("b" cost 2.0, "y" cost 5.0); goal has a single hyperedge with
/// rule `(S X0 X1)` and transition cost 0, matching the composed-derivation
/// scenario.
pub(super) fn composed() -> (Hypergraph, InMemorySymbolTable) {
    let mut symbols = InMemorySymbolTable::new();
    let a = symbols.add_terminal("a");
    let b = symbols.add_terminal("b");
    let x = symbols.add_terminal("x");
    let y = symbols.add_terminal("y");
    let x0 = symbols.add_nonterminal("X0");
    let x1 = symbols.add_nonterminal("X1");

    let mut hg = Hypergraph::new();
    hg.add_node(Node {
        id: N_A,
        i: 0,
        j: 1,
        hyperedges: vec![axiom_edge(vec![a], 1.0), axiom_edge(vec![x], 3.0)],
    });
    hg.add_node(Node {
        id: N_B,
        i: 1,
        j: 2,
        hyperedges: vec![axiom_edge(vec![b], 2.0), axiom_edge(vec![y], 5.0)],
    });
    hg.add_node(Node {
        id: GOAL,
        i: 0,
        j: 2,
        hyperedges: vec![Hyperedge {
            antecedents: vec![N_A, N_B],
            rule: Some(Rule {
                lhs: symbols.add_nonterminal("S"),
                source: vec![x0, x1],
                target: vec![x0, x1],
            }),
            source_path: "s-rule".into(),
            best_derivation_cost: 3.0,
        }],
    });
    hg.set_goal(GOAL);
    (hg, symbols)
}

/// Same topology as [`composed`] but with caller-supplied leaf costs, for
/// property tests that sweep the cost space.
pub(super) fn composed_with_costs(a1: f64, a2: f64, b1: f64, b2: f64) -> (Hypergraph, InMemorySymbolTable) {
    let mut symbols = InMemorySymbolTable::new();
    let a = symbols.add_terminal("a");
    let b = symbols.add_terminal("b");
    let x = symbols.add_terminal("x");
    let y = symbols.add_terminal("y");
    let x0 = symbols.add_nonterminal("X0");
    let x1 = symbols.add_nonterminal("X1");

    let mut hg = Hypergraph::new();
    hg.add_node(Node {
        id: N_A,
        i: 0,
        j: 1,
        hyperedges: vec![axiom_edge(vec![a], a1), axiom_edge(vec![x], a2)],
    });
    hg.add_node(Node {
        id: N_B,
        i: 1,
        j: 2,
        hyperedges: vec![axiom_edge(vec![b], b1), axiom_edge(vec![y], b2)],
    });
    hg.add_node(Node {
        id: GOAL,
        i: 0,
        j: 2,
        hyperedges: vec![Hyperedge {
            antecedents: vec![N_A, N_B],
            rule: Some(Rule {
                lhs: symbols.add_nonterminal("S"),
                source: vec![x0, x1],
                target: vec![x0, x1],
            }),
            source_path: "s-rule".into(),
            best_derivation_cost: a1.min(a2) + b1.min(b2),
        }],
    });
    hg.set_goal(GOAL);
    (hg, symbols)
}

/// A goal with two ambiguous hyperedges: `[a b]` cost 1.0, `[b a]` cost 2.0.
pub(super) fn two_way_ambiguity() -> (Hypergraph, InMemorySymbolTable) {
    let mut symbols = InMemorySymbolTable::new();
    let a = symbols.add_terminal("a");
    let b = symbols.add_terminal("b");
    let mut hg = Hypergraph::new();
    hg.add_node(Node {
        id: GOAL,
        i: 0,
        j: 2,
        hyperedges: vec![axiom_edge(vec![a, b], 1.0), axiom_edge(vec![b, a], 2.0)],
    });
    hg.set_goal(GOAL);
    (hg, symbols)
}
