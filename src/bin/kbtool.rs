use std::collections::HashSet;
use std::fs;
use std::io::{self, BufWriter};
use std::process;

use clap::{Parser, Subcommand};
use serde::Deserialize;

use kbest_engine::{ConstFeature, Extractor, ExtractorConfig, FeatureFunction, Hypergraph, InMemorySymbolTable, WriteSink};

#[derive(Parser)]
#[command(name = "kbtool", about = "Lazy k-best derivation extraction diagnostics")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Extract up to N hypotheses from a hypergraph's goal node
    Extract {
        /// Path to the JSON-encoded hypergraph
        hypergraph: String,
        /// Path to the JSON vocabulary file (words + nonterminal ids)
        vocab: String,
        /// Path to a TOML config file (defaults to all flags off)
        #[arg(long)]
        config: Option<String>,
        /// Number of hypotheses to request
        #[arg(short = 'n', long, default_value = "10")]
        n: usize,
        /// Sentence id prefix (negative omits it)
        #[arg(long, default_value = "-1")]
        sent_id: i64,
        /// Write hypotheses here instead of stdout
        #[arg(long)]
        out: Option<String>,
        /// Path to a JSON array of feature weights; wires up one
        /// `ConstFeature` per weight (real feature-function implementations
        /// are an external collaborator this tool does not provide)
        #[arg(long)]
        weights: Option<String>,
    },

    /// Print the per-feature cost breakdown for ranks 1..=K at the goal node
    Explain {
        /// Path to the JSON-encoded hypergraph
        hypergraph: String,
        /// Path to the JSON vocabulary file (words + nonterminal ids)
        vocab: String,
        /// Path to a TOML config file (defaults to all flags off)
        #[arg(long)]
        config: Option<String>,
        /// Highest rank to explain
        #[arg(long)]
        rank: usize,
        /// Sentence id prefix (negative omits it)
        #[arg(long, default_value = "-1")]
        sent_id: i64,
        /// Path to a JSON array of feature weights (see `extract --weights`)
        #[arg(long)]
        weights: Option<String>,
    },
}

/// On-disk vocabulary shape: a flat word list plus the ids that are
/// nonterminals. Word ids are assigned by position, matching
/// `InMemorySymbolTable`'s own id assignment.
#[derive(Deserialize)]
struct VocabFile {
    words: Vec<String>,
    #[serde(default)]
    nonterminals: Vec<u32>,
}

fn load_hypergraph(path: &str) -> Hypergraph {
    let text = fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Failed to read hypergraph file {path}: {e}");
        process::exit(1);
    });
    serde_json::from_str(&text).unwrap_or_else(|e| {
        eprintln!("Failed to parse hypergraph file {path}: {e}");
        process::exit(1);
    })
}

fn load_symbols(path: &str) -> InMemorySymbolTable {
    let text = fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Failed to read vocabulary file {path}: {e}");
        process::exit(1);
    });
    let vocab: VocabFile = serde_json::from_str(&text).unwrap_or_else(|e| {
        eprintln!("Failed to parse vocabulary file {path}: {e}");
        process::exit(1);
    });
    let nonterminals: HashSet<u32> = vocab.nonterminals.into_iter().collect();
    let mut table = InMemorySymbolTable::new();
    for (id, word) in vocab.words.iter().enumerate() {
        if nonterminals.contains(&(id as u32)) {
            table.add_nonterminal(word);
        } else {
            table.add_terminal(word);
        }
    }
    table
}

/// Loads a JSON array of feature weights and wires up one `ConstFeature`
/// per entry. `ConstFeature` always reports a transition cost of `0.0`
/// regardless of context — real feature-function implementations are an
/// external collaborator (§1) this diagnostic tool does not provide — so
/// `explain`'s per-feature breakdown is only meaningful when `sanity_check`
/// is off and the hypergraph's own costs are being inspected directly.
fn load_weights(path: &Option<String>) -> Vec<ConstFeature> {
    let Some(path) = path else {
        return Vec::new();
    };
    let text = fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Failed to read weights file {path}: {e}");
        process::exit(1);
    });
    let weights: Vec<f64> = serde_json::from_str(&text).unwrap_or_else(|e| {
        eprintln!("Failed to parse weights file {path}: {e}");
        process::exit(1);
    });
    weights.into_iter().map(|weight| ConstFeature { weight, cost: 0.0 }).collect()
}

fn load_config(path: &Option<String>) -> ExtractorConfig {
    let Some(path) = path else {
        return ExtractorConfig::default();
    };
    let text = fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Failed to read config file {path}: {e}");
        process::exit(1);
    });
    ExtractorConfig::from_toml(&text).unwrap_or_else(|e| {
        eprintln!("Failed to parse config file {path}: {e}");
        process::exit(1);
    })
}

fn main() {
    kbest_engine::trace_init::init_tracing(std::path::Path::new("."));

    let cli = Cli::parse();

    match cli.command {
        Command::Extract {
            hypergraph,
            vocab,
            config,
            n,
            sent_id,
            out,
            weights,
        } => {
            let hg = load_hypergraph(&hypergraph);
            let symbols = load_symbols(&vocab);
            let cfg = load_config(&config);
            let const_features = load_weights(&weights);
            let features: Vec<&dyn FeatureFunction> = const_features.iter().map(|f| f as &dyn FeatureFunction).collect();
            let ex = Extractor::with_config(&hg, &symbols, &features, cfg);

            let emitted = match out {
                Some(ref path) => {
                    let file = fs::File::create(path).unwrap_or_else(|e| {
                        eprintln!("Failed to create output file {path}: {e}");
                        process::exit(1);
                    });
                    let mut sink = WriteSink::new(BufWriter::new(file));
                    ex.extract(n, sent_id, &mut sink)
                }
                None => {
                    let stdout = io::stdout();
                    let mut sink = WriteSink::new(BufWriter::new(stdout.lock()));
                    ex.extract(n, sent_id, &mut sink)
                }
            };

            let emitted = emitted.unwrap_or_else(|e| {
                eprintln!("Extraction failed: {e}");
                process::exit(1);
            });
            eprintln!("{emitted} hypotheses emitted");
        }

        Command::Explain {
            hypergraph,
            vocab,
            config,
            rank,
            sent_id,
            weights,
        } => {
            let hg = load_hypergraph(&hypergraph);
            let symbols = load_symbols(&vocab);
            let cfg = load_config(&config);
            let const_features = load_weights(&weights);
            let features: Vec<&dyn FeatureFunction> = const_features.iter().map(|f| f as &dyn FeatureFunction).collect();
            let ex = Extractor::with_config(&hg, &symbols, &features, cfg);

            let Some(goal) = hg.goal() else {
                eprintln!("Hypergraph has no goal node");
                process::exit(1);
            };

            for k in 1..=rank {
                match ex.explain(goal, k, sent_id) {
                    Ok(Some((line, costs))) => {
                        println!("rank {k}: {line}");
                        if !costs.is_empty() {
                            println!("  feature costs: {costs:?}");
                        }
                    }
                    Ok(None) => {
                        println!("rank {k}: (no further derivations)");
                        break;
                    }
                    Err(e) => {
                        eprintln!("Explain failed at rank {k}: {e}");
                        process::exit(1);
                    }
                }
            }
        }
    }
}
