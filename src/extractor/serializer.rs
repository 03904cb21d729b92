//! Hypothesis serialization (§4.4): derivation state → numeric token string
//! → surface string, in two clearly separated passes. Pure functions of
//! `(Extractor, DerivationState, flags)` — no I/O.

use crate::error::ExtractError;
use crate::symbols::SymbolTable;

use super::kbest::Extractor;
use super::state::DerivationState;

#[derive(Debug, Clone, Copy)]
pub(crate) struct SerializeOpts {
    pub tree: bool,
    pub include_alignment: bool,
    pub monolingual: bool,
}

/// The yield used for unique-string dedup at seeding time: always flat, no
/// alignment, but still respecting monolingual symbol choice.
pub(crate) fn flat_yield(ex: &Extractor, state: &DerivationState) -> Result<String, ExtractError> {
    let opts = SerializeOpts {
        tree: false,
        include_alignment: false,
        monolingual: ex.config().monolingual,
    };
    let numeric = build_numeric(ex, state, opts)?;
    Ok(resolve_tokens(&numeric, ex.symbols()))
}

/// The final yield honoring the extractor's full configuration.
pub(crate) fn format_yield(ex: &Extractor, state: &DerivationState) -> Result<String, ExtractError> {
    let opts = SerializeOpts {
        tree: ex.config().extract_tree,
        include_alignment: ex.config().include_alignment,
        monolingual: ex.config().monolingual,
    };
    let numeric = build_numeric(ex, state, opts)?;
    Ok(resolve_tokens(&numeric, ex.symbols()))
}

/// Recursively builds the numeric (un-resolved) token string for one
/// derivation. A closing paren in tree mode is appended directly to
/// whatever was just written — no separating space — which is how a single
/// `push(')')` at the end of each branch reproduces the grammar's
/// `tree := "(" LABEL ["{" i "-" j "}"] " " yield ")"` exactly, including
/// the case where `yield` itself ends in a nested close.
fn build_numeric(ex: &Extractor, state: &DerivationState, opts: SerializeOpts) -> Result<String, ExtractError> {
    let node = ex.hypergraph().node(state.node).ok_or_else(|| {
        ExtractError::HypergraphCorrupt(format!("node {:?} vanished during serialization", state.node))
    })?;
    let edge = node.hyperedges.get(state.edge_pos).ok_or_else(|| {
        ExtractError::OverflowDerivationState(format!(
            "edge_pos {} out of range for node {:?}",
            state.edge_pos, state.node
        ))
    })?;

    let mut out = String::new();

    match &edge.rule {
        None => {
            if opts.tree {
                out.push('(');
                out.push_str("ROOT");
                if opts.include_alignment {
                    out.push_str(&format!("{{{}-{}}}", node.i, node.j));
                }
                out.push(' ');
            }
            let mut parts = Vec::with_capacity(edge.antecedents.len());
            for (pos, &child) in edge.antecedents.iter().enumerate() {
                parts.push(recurse_antecedent(ex, state, pos, child, opts)?);
            }
            out.push_str(&parts.join(" "));
            if opts.tree {
                out.push(')');
            }
        }
        Some(rule) => {
            if opts.tree {
                out.push('(');
                out.push_str(&rule.lhs.to_string());
                if opts.include_alignment {
                    out.push_str(&format!("{{{}-{}}}", node.i, node.j));
                }
                out.push(' ');
            }
            let symbols = if opts.monolingual { &rule.source } else { &rule.target };
            let mut parts = Vec::with_capacity(symbols.len());
            let mut monolingual_counter = 0usize;
            for &sym in symbols {
                if ex.symbols().is_nonterminal(sym) {
                    let pos = if opts.monolingual {
                        let p = monolingual_counter;
                        monolingual_counter += 1;
                        p
                    } else {
                        ex.symbols().target_nonterminal_index(sym)
                    };
                    let child = *edge.antecedents.get(pos).ok_or_else(|| {
                        ExtractError::HypergraphCorrupt(format!(
                            "rule at node {:?} references antecedent position {pos} beyond {} antecedents",
                            state.node,
                            edge.antecedents.len()
                        ))
                    })?;
                    parts.push(recurse_antecedent(ex, state, pos, child, opts)?);
                } else {
                    parts.push(sym.to_string());
                }
            }
            out.push_str(&parts.join(" "));
            if opts.tree {
                out.push(')');
            }
        }
    }

    Ok(out)
}

fn recurse_antecedent(
    ex: &Extractor,
    state: &DerivationState,
    pos: usize,
    child: crate::hypergraph::NodeId,
    opts: SerializeOpts,
) -> Result<String, ExtractError> {
    let rank = *state.ranks.get(pos).ok_or_else(|| {
        ExtractError::OverflowDerivationState(format!(
            "derivation state at node {:?} has no rank for antecedent position {pos}",
            state.node
        ))
    })?;
    let child_state = ex.kth_hypothesis_state(child, rank)?.ok_or_else(|| {
        ExtractError::HypergraphCorrupt(format!(
            "antecedent {child:?} has no rank-{rank} derivation during serialization"
        ))
    })?;
    build_numeric(ex, &child_state, opts)
}

/// Resolves every whitespace-separated numeric token to its surface form.
fn resolve_tokens(raw: &str, symbols: &dyn SymbolTable) -> String {
    raw.split_whitespace()
        .map(|tok| resolve_token(tok, symbols))
        .collect::<Vec<_>>()
        .join(" ")
}

fn resolve_token(tok: &str, symbols: &dyn SymbolTable) -> String {
    if let Some(rest) = tok.strip_prefix('(') {
        let digit_end = rest.find(|c: char| !c.is_ascii_digit()).unwrap_or(rest.len());
        let (num, suffix) = rest.split_at(digit_end);
        return match num.parse::<u32>() {
            Ok(id) => format!("({}{}", symbols.word_of(id), suffix),
            Err(_) => tok.to_string(),
        };
    }
    if tok.ends_with(')') {
        let trimmed = tok.trim_end_matches(')');
        let close_count = tok.len() - trimmed.len();
        return match trimmed.parse::<u32>() {
            Ok(id) => format!("{}{}", symbols.word_of(id), ")".repeat(close_count)),
            Err(_) => tok.to_string(),
        };
    }
    match tok.parse::<u32>() {
        Ok(id) => symbols.word_of(id),
        Err(_) => tok.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbols::InMemorySymbolTable;

    #[test]
    fn resolve_token_maps_plain_leaf() {
        let mut st = InMemorySymbolTable::new();
        let a = st.add_terminal("a");
        assert_eq!(resolve_token(&a.to_string(), &st), "a");
    }

    #[test]
    fn resolve_token_preserves_alignment_suffix_on_open_bracket() {
        let mut st = InMemorySymbolTable::new();
        let s = st.add_nonterminal("S");
        let tok = format!("({s}{{0-2}}");
        assert_eq!(resolve_token(&tok, &st), "(S{0-2}");
    }

    #[test]
    fn resolve_token_preserves_multiple_trailing_closes() {
        let mut st = InMemorySymbolTable::new();
        let b = st.add_terminal("b");
        let tok = format!("{b}))");
        assert_eq!(resolve_token(&tok, &st), "b))");
    }

    #[test]
    fn non_numeric_token_passes_through_unchanged() {
        let st = InMemorySymbolTable::new();
        assert_eq!(resolve_token("(ROOT", &st), "(ROOT");
    }
}
