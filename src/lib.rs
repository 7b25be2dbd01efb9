//! # k-PDG Minimum Theta Search
//!
//! An exhaustive search engine for the minimum value of the density ratio
//! theta over all *k-partially-directed hypergraphs* (k-PDGs) on up to `n`
//! vertices that avoid the generalized triangle `T_k`.
//!
//! This crate provides:
//! - A compact inline graph state with per-vertex **signature hashing**,
//!   canonicalization, and a group-restricted isomorphism search.
//! - A `T_k` containment oracle working directly on the edge array.
//! - A mixed-radix **edge-set generator** enumerating the extensions of a
//!   base graph by a new vertex, with superset and theta-lower-bound pruning.
//! - A level-by-level search driver with canonical deduplication and a
//!   rayon-parallel final enumeration.
//!
//! ## Quick Start
//!
//! ```
//! use kpdg::search::{run_search, SearchConfig};
//! use kpdg::fraction::Fraction;
//!
//! // Minimum theta over T_2-free 2-PDGs on up to 3 vertices.
//! let result = run_search::<2, 3>(&SearchConfig { quiet: true });
//! assert_eq!(result.min_theta, Fraction::new(3, 2));
//! ```
//!
//! ## Working with Graphs Directly
//!
//! ```
//! use kpdg::graph::Graph;
//!
//! let mut g = Graph::<3, 5>::parse_edges("{013, 123>2, 023, 234>2}").unwrap();
//! g.canonicalize();
//! assert_eq!(g.to_string(), "{013>3, 023>3, 014, 034}");
//! assert!(g.contains_tk(0));
//! ```
//!
//! ## Performance Notes
//!
//! - The representation assumes `n <= 7`, so a vertex set fits in one byte
//!   and a whole graph in a small flat struct; the enumeration allocates no
//!   heap memory per graph.
//! - The pair `(k, n)` is a pair of const generic parameters; the CLI
//!   dispatches to the monomorphized instantiation.
//! - For long runs, compile with `RUSTFLAGS="-C target-cpu=native"` and use
//!   the release profile.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::inline_always)] // Intentional for hot-path code
#![allow(clippy::many_single_char_names)] // Mathematical variable names
#![allow(clippy::needless_range_loop)] // Often clearer for bitmask indexing
#![allow(clippy::doc_markdown)]

pub mod counters;
pub mod edge_gen;
pub mod fraction;
pub mod graph;
pub mod permutator;
pub mod search;

/// Re-export of the commonly used types.
pub mod prelude {
    pub use crate::counters::BestTheta;
    pub use crate::edge_gen::EdgeGenerator;
    pub use crate::fraction::Fraction;
    pub use crate::graph::{Edge, Graph, UNDIRECTED};
    pub use crate::search::{run_search, SearchConfig, SearchResult};
}
