//! Process-wide run statistics, plus the shared running-minimum theta record.
//!
//! The tallies are plain relaxed atomics so the hot graph operations can
//! bump them from any thread without coordination. The running best is a
//! separate small record ([`BestTheta`]) owned by each search run: the
//! current minimum lives in one packed atomic word for cheap lock-free
//! reads on the enumeration path, and the witnessing edge list sits behind
//! a mutex that is only touched on the rare strict improvement.

use crate::fraction::Fraction;
use crate::graph::{format_edges, Edge, MAX_EDGES};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Minimum delay between two periodic stats printouts.
const PRINT_INTERVAL: Duration = Duration::from_secs(100);

// ============================================================================
// Counter
// ============================================================================

/// A relaxed monotonically increasing event tally.
pub struct Counter(AtomicU64);

impl Counter {
    const fn new() -> Self {
        Self(AtomicU64::new(0))
    }

    /// Adds one.
    #[inline]
    pub fn inc(&self) {
        self.0.fetch_add(1, Ordering::Relaxed);
    }

    /// Adds `v`.
    #[inline]
    pub fn add(&self, v: u64) {
        self.0.fetch_add(v, Ordering::Relaxed);
    }

    /// Current value.
    pub fn get(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }

    fn reset(&self) {
        self.0.store(0, Ordering::Relaxed);
    }
}

// ============================================================================
// BestTheta
// ============================================================================

/// The running minimum theta of one search run, with its witness edge set.
///
/// Reads are a single atomic load; the value only ever decreases. The
/// fraction is packed as `numer << 32 | denom`, which the infinity sentinel
/// and every real theta fit, since numerators are bounded by the total edge
/// count and the sentinel numerator is far below `2^32`.
pub struct BestTheta {
    packed: AtomicU64,
    witness: Mutex<Vec<Edge>>,
}

impl Default for BestTheta {
    fn default() -> Self {
        Self::new()
    }
}

impl BestTheta {
    /// Creates a record initialized to infinity with an empty witness.
    pub fn new() -> Self {
        Self {
            packed: AtomicU64::new(pack(Fraction::infinity())),
            witness: Mutex::new(Vec::new()),
        }
    }

    /// The current minimum.
    #[inline]
    pub fn get(&self) -> Fraction {
        unpack(self.packed.load(Ordering::Relaxed))
    }

    /// Replaces the minimum and its witness if `theta` is strictly smaller.
    /// Returns whether an update happened.
    pub fn record(&self, theta: Fraction, edges: &[Edge]) -> bool {
        if theta >= self.get() {
            return false;
        }
        // The mutex is the sole writer gate; re-check under it so concurrent
        // improvements stay monotonic.
        let mut witness = self.witness.lock().unwrap();
        if theta >= unpack(self.packed.load(Ordering::Relaxed)) {
            return false;
        }
        self.packed.store(pack(theta), Ordering::Relaxed);
        witness.clear();
        witness.extend_from_slice(&edges[..edges.len().min(MAX_EDGES)]);
        true
    }

    /// A copy of the witnessing edge set.
    pub fn witness(&self) -> Vec<Edge> {
        self.witness.lock().unwrap().clone()
    }
}

fn pack(f: Fraction) -> u64 {
    f.numer() << 32 | f.denom()
}

fn unpack(v: u64) -> Fraction {
    Fraction::new(v >> 32, v & 0xFFFF_FFFF)
}

// ============================================================================
// Counters
// ============================================================================

/// The process-wide statistics record.
#[allow(missing_docs)]
pub struct Counters {
    pub graph_copies: Counter,
    pub compute_vertex_signatures: Counter,
    pub graph_canonicalize_ops: Counter,
    pub graph_permute_ops: Counter,
    pub graph_permute_canonical_ops: Counter,
    pub graph_isomorphic_tests: Counter,
    pub graph_isomorphic_true: Counter,
    pub graph_isomorphic_expensive: Counter,
    pub graph_isomorphic_hash_no: Counter,
    pub graph_identical_tests: Counter,
    pub graph_contains_tk_tests: Counter,
    pub graph_accumulated_canonicals: Counter,
    pub edge_sets_generated: Counter,
    pub tk_skips: Counter,
    pub tk_skip_bits: Counter,
    pub theta_edge_skips: Counter,
    pub theta_directed_edge_skips: Counter,
    k: AtomicUsize,
    n: AtomicUsize,
    time: Mutex<Option<TimeState>>,
}

struct TimeState {
    start: Instant,
    last_print: Instant,
}

static GLOBAL: Counters = Counters::new();

/// The process-wide [`Counters`] instance.
pub fn global() -> &'static Counters {
    &GLOBAL
}

impl Counters {
    const fn new() -> Self {
        Self {
            graph_copies: Counter::new(),
            compute_vertex_signatures: Counter::new(),
            graph_canonicalize_ops: Counter::new(),
            graph_permute_ops: Counter::new(),
            graph_permute_canonical_ops: Counter::new(),
            graph_isomorphic_tests: Counter::new(),
            graph_isomorphic_true: Counter::new(),
            graph_isomorphic_expensive: Counter::new(),
            graph_isomorphic_hash_no: Counter::new(),
            graph_identical_tests: Counter::new(),
            graph_contains_tk_tests: Counter::new(),
            graph_accumulated_canonicals: Counter::new(),
            edge_sets_generated: Counter::new(),
            tk_skips: Counter::new(),
            tk_skip_bits: Counter::new(),
            theta_edge_skips: Counter::new(),
            theta_directed_edge_skips: Counter::new(),
            k: AtomicUsize::new(0),
            n: AtomicUsize::new(0),
            time: Mutex::new(None),
        }
    }

    /// Resets every tally and stamps the run start time.
    pub fn initialize(&self, k: usize, n: usize) {
        self.graph_copies.reset();
        self.compute_vertex_signatures.reset();
        self.graph_canonicalize_ops.reset();
        self.graph_permute_ops.reset();
        self.graph_permute_canonical_ops.reset();
        self.graph_isomorphic_tests.reset();
        self.graph_isomorphic_true.reset();
        self.graph_isomorphic_expensive.reset();
        self.graph_isomorphic_hash_no.reset();
        self.graph_identical_tests.reset();
        self.graph_contains_tk_tests.reset();
        self.graph_accumulated_canonicals.reset();
        self.edge_sets_generated.reset();
        self.tk_skips.reset();
        self.tk_skip_bits.reset();
        self.theta_edge_skips.reset();
        self.theta_directed_edge_skips.reset();
        self.k.store(k, Ordering::Relaxed);
        self.n.store(n, Ordering::Relaxed);
        let now = Instant::now();
        *self.time.lock().unwrap() = Some(TimeState {
            start: now,
            last_print: now,
        });
    }

    /// Prints the stats block if enough time has passed since the last one.
    pub fn print_at_time_interval(&self, best: &BestTheta) {
        let mut time = self.time.lock().unwrap();
        let due = match time.as_ref() {
            Some(state) => state.last_print.elapsed() >= PRINT_INTERVAL,
            None => false,
        };
        if due {
            if let Some(state) = time.as_mut() {
                state.last_print = Instant::now();
            }
            drop(time);
            self.print_counters(best);
        }
    }

    /// Prints the full stats block.
    pub fn print_counters(&self, best: &BestTheta) {
        let elapsed_ms = self
            .time
            .lock()
            .unwrap()
            .as_ref()
            .map_or(0, |state| state.start.elapsed().as_millis());
        let k = self.k.load(Ordering::Relaxed);
        let n = self.n.load(Ordering::Relaxed);

        println!("\n---------- k={k}, n={n} ----------");
        println!("Accumulated canonicals  = {}", self.graph_accumulated_canonicals.get());
        println!("Minimum theta           = {}", best.get());
        println!("Produced by graph:        {}", format_edges(&best.witness()));
        println!("Wall clock time           {elapsed_ms}ms");
        println!("Graph copies            = {}", self.graph_copies.get());
        println!("Vertex signature ops    = {}", self.compute_vertex_signatures.get());
        println!("Graph canonicalize ops  = {}", self.graph_canonicalize_ops.get());
        println!("Graph permute ops       = {}", self.graph_permute_ops.get());
        println!("Graph permute canonical = {}", self.graph_permute_canonical_ops.get());
        println!("Graph isomorphic tests  = {}", self.graph_isomorphic_tests.get());
        println!("    Returned true       = {}", self.graph_isomorphic_true.get());
        println!("    Expensive tests     = {}", self.graph_isomorphic_expensive.get());
        println!("    False w/ hash match = {}", self.graph_isomorphic_hash_no.get());
        println!("Graph identical tests   = {}", self.graph_identical_tests.get());
        println!("Graph contains T_k      = {}", self.graph_contains_tk_tests.get());
        println!("Edge sets generated     = {}", self.edge_sets_generated.get());
        println!("    T_k skips           = {}", self.tk_skips.get());
        println!("    T_k skip bits       = {}", self.tk_skip_bits.get());
        println!("    Theta edge skips    = {}", self.theta_edge_skips.get());
        println!("    Theta directed skips= {}", self.theta_directed_edge_skips.get());
        println!("--------------------------------------------------");
    }
}

// ============================================================================
// Tests
// ============================================================================
