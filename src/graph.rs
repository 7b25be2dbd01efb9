//! Graph state for k-partially-directed hypergraphs (k-PDGs) on at most 7
//! vertices, with the data layout optimized for canonicalization and
//! isomorphism testing.
//!
//! A k-PDG is a k-uniform hypergraph each of whose edges is either undirected
//! or directed with one of its K vertices designated as the head. Vertex sets
//! are bitmasks in a single byte, so an entire graph fits in a small inline
//! struct and millions of them can be instantiated per second without heap
//! traffic.

use crate::counters;
use crate::fraction::Fraction;
use crate::permutator::Permutator;
use std::cmp::Ordering;
use std::fmt;

// ============================================================================
// Compile-time parameters and lookup tables
// ============================================================================

/// Maximum number of vertices in a graph.
pub const MAX_VERTICES: usize = 7;

/// Maximum number of edges in a graph. Note `35 = C(7,3) = C(7,4)`.
pub const MAX_EDGES: usize = 35;

/// Head-vertex value marking an edge as undirected.
pub const UNDIRECTED: u8 = 0xFF;

/// Returns `C(n, k)` exactly (the running product stays integral).
pub(crate) const fn binom(n: usize, k: usize) -> usize {
    if k > n {
        return 0;
    }
    let mut result = 1usize;
    let mut i = 0;
    while i < k {
        result = result * (n - i) / (i + 1);
        i += 1;
    }
    result
}

/// Combines `value` into a 32-bit running hash.
#[inline]
fn hash_combine32(hash: u32, value: u32) -> u32 {
    hash ^ value
        .wrapping_add(0x9E37_79B9)
        .wrapping_add(hash << 6)
        .wrapping_add(hash >> 2)
}

/// Combines `value` into a 64-bit running hash.
#[inline]
fn hash_combine64(hash: u64, value: u64) -> u64 {
    hash ^ value
        .wrapping_add(0x9E37_79B9_7F4A_7C15)
        .wrapping_add(hash << 12)
        .wrapping_add(hash >> 4)
}

/// Maps a vertex bitmask through a permutation (`p[v]` = image of `v`).
#[inline]
fn permute_mask<const N: usize>(p: &[usize; MAX_VERTICES], mask: u8) -> u8 {
    let mut out = 0u8;
    for v in 0..N {
        if mask & (1 << v) != 0 {
            out |= 1 << p[v];
        }
    }
    out
}

/// All vertex bitmasks over `N` vertices grouped by popcount.
///
/// `masks[m][..count[m]]` lists every N-bit mask with exactly `m` one-bits in
/// ascending numeric order, for `1 <= m <= K`. Computed once at compile time
/// per `(K, N)` instantiation; nothing ever mutates it.
pub struct VertexMaskTable {
    /// Number of valid masks per popcount.
    pub count: [u8; MAX_VERTICES + 1],
    /// The masks, ascending, per popcount.
    pub masks: [[u8; MAX_EDGES]; MAX_VERTICES + 1],
}

const fn compute_vertex_masks(k: usize, n: usize) -> VertexMaskTable {
    let mut table = VertexMaskTable {
        count: [0; MAX_VERTICES + 1],
        masks: [[0; MAX_EDGES]; MAX_VERTICES + 1],
    };
    let mut m = 1;
    while m <= k {
        let mut bits: u16 = 0;
        while bits < (1 << n) {
            if (bits as u8).count_ones() as usize == m {
                table.masks[m][table.count[m] as usize] = bits as u8;
                table.count[m] += 1;
            }
            bits += 1;
        }
        m += 1;
    }
    table
}

// ============================================================================
// Edge
// ============================================================================

/// One edge of a k-PDG.
///
/// `vertex_set` is a bitmask of the K vertices in the edge (`0b1011` means
/// vertices `{0, 1, 3}`). `head_vertex` is the head's vertex id for a
/// directed edge, or [`UNDIRECTED`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Edge {
    /// Bitmask of the vertices in the edge.
    pub vertex_set: u8,
    /// Head vertex id, or [`UNDIRECTED`].
    pub head_vertex: u8,
}

impl Edge {
    /// Creates an edge.
    ///
    /// # Panics
    /// Panics in debug builds if a directed head is not a member of the
    /// vertex set.
    pub fn new(vertex_set: u8, head_vertex: u8) -> Self {
        debug_assert!(
            head_vertex == UNDIRECTED || vertex_set & (1 << head_vertex) != 0,
            "head vertex must be inside the edge"
        );
        Self {
            vertex_set,
            head_vertex,
        }
    }

    /// Returns whether the edge is directed.
    #[inline]
    pub fn is_directed(&self) -> bool {
        self.head_vertex != UNDIRECTED
    }
}

impl fmt::Display for Edge {
    /// An undirected edge prints as `013` (vertex set `{0,1,3}`); a directed
    /// edge as `013>1` (head vertex 1).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for v in 0..8 {
            if self.vertex_set & (1 << v) != 0 {
                write!(f, "{v}")?;
            }
        }
        if self.is_directed() {
            write!(f, ">{}", self.head_vertex)?;
        }
        Ok(())
    }
}

/// Formats an edge list as a brace-enclosed, comma-separated string, e.g.
/// `{013>3, 023>3, 014, 034}`.
pub fn format_edges(edges: &[Edge]) -> String {
    let mut out = String::from("{");
    for (i, e) in edges.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        out.push_str(&e.to_string());
    }
    out.push('}');
    out
}

// ============================================================================
// VertexSignature
// ============================================================================

/// Per-vertex isomorphism invariants: three degree counts plus a combined
/// hash of the neighboring vertices' degrees.
///
/// Both [`degrees`](VertexSignature::degrees) and
/// [`hash`](VertexSignature::hash) are invariant under graph isomorphisms;
/// `vertex_id` is deliberately excluded from the hash and only retained to
/// recover the canonicalizing permutation after sorting.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct VertexSignature {
    /// Combined hash of the degree signatures of the three neighbor sets.
    pub neighbor_hash: u32,
    /// Number of undirected edges through this vertex.
    pub degree_undirected: u8,
    /// Number of directed edges through this vertex with this vertex as head.
    pub degree_head: u8,
    /// Number of directed edges through this vertex with the head elsewhere.
    pub degree_tail: u8,
    /// The vertex id; not part of the invariant.
    pub vertex_id: u8,
}

impl VertexSignature {
    fn reset(&mut self, vertex_id: u8) {
        *self = Self {
            vertex_id,
            ..Self::default()
        };
    }

    /// The three degree counts packed into 24 bits (undirected lowest).
    #[inline]
    pub fn degrees(&self) -> u32 {
        u32::from(self.degree_undirected)
            | u32::from(self.degree_head) << 8
            | u32::from(self.degree_tail) << 16
    }

    /// The full vertex invariant: degrees in the high 32 bits, neighbor hash
    /// in the low 32.
    #[inline]
    pub fn hash(&self) -> u64 {
        u64::from(self.neighbor_hash) | u64::from(self.degrees()) << 32
    }
}

// ============================================================================
// Graph
// ============================================================================

/// A k-PDG on up to `N` vertices with edges of `K` vertices each.
///
/// All storage is inline with fixed capacity; cloning is a flat copy. A fresh
/// graph is empty and non-canonical. Grow it with
/// [`add_edge`](Graph::add_edge), then finalize with
/// [`canonicalize`](Graph::canonicalize) before identity or isomorphism
/// queries.
#[derive(Clone, Copy, Debug)]
pub struct Graph<const K: usize, const N: usize> {
    graph_hash: u32,
    is_canonical: bool,
    edge_count: u8,
    undirected_edge_count: u8,
    edges: [Edge; MAX_EDGES],
    vertices: [VertexSignature; MAX_VERTICES],
}

impl<const K: usize, const N: usize> Default for Graph<K, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const K: usize, const N: usize> Graph<K, N> {
    const PARAMS_OK: () = assert!(2 <= K && K <= N && N <= MAX_VERTICES);

    /// Number of edges in the complete graph, `C(N, K)`.
    pub const TOTAL_EDGES: usize = binom(N, K);

    /// Precomputed vertex bitmasks grouped by popcount (see
    /// [`VertexMaskTable`]).
    pub const VERTEX_MASKS: VertexMaskTable = compute_vertex_masks(K, N);

    /// Creates an empty graph.
    pub fn new() -> Self {
        let _ = Self::PARAMS_OK;
        Self {
            graph_hash: 0,
            is_canonical: false,
            edge_count: 0,
            undirected_edge_count: 0,
            edges: [Edge::default(); MAX_EDGES],
            vertices: [VertexSignature::default(); MAX_VERTICES],
        }
    }

    /// Number of edges in the graph.
    #[inline]
    pub fn edge_count(&self) -> usize {
        usize::from(self.edge_count)
    }

    /// Number of undirected edges in the graph.
    #[inline]
    pub fn undirected_edge_count(&self) -> usize {
        usize::from(self.undirected_edge_count)
    }

    /// Number of directed edges in the graph.
    #[inline]
    pub fn directed_edge_count(&self) -> usize {
        self.edge_count() - self.undirected_edge_count()
    }

    /// The edges of the graph.
    #[inline]
    pub fn edges(&self) -> &[Edge] {
        &self.edges[..self.edge_count()]
    }

    /// Returns whether the graph has been canonicalized.
    #[inline]
    pub fn is_canonical(&self) -> bool {
        self.is_canonical
    }

    /// The isomorphism-invariant graph hash.
    ///
    /// # Panics
    /// Panics in debug builds if the graph is not canonical.
    #[inline]
    pub fn get_graph_hash(&self) -> u32 {
        debug_assert!(self.is_canonical, "graph hash requires canonical form");
        self.graph_hash
    }

    /// Returns theta such that
    /// `(undirected edge density) + theta * (directed edge density) = 1`,
    /// namely `(C(N,K) - undirected_count) / directed_count`, or the infinity
    /// sentinel when the graph has no directed edges.
    pub fn get_theta(&self) -> Fraction {
        let directed = self.directed_edge_count();
        if directed > 0 {
            Fraction::new(
                (Self::TOTAL_EDGES - self.undirected_edge_count()) as u64,
                directed as u64,
            )
        } else {
            Fraction::infinity()
        }
    }

    /// Returns whether an edge with the given vertex set may still be added
    /// (no edge with the same vertex set exists yet).
    pub fn edge_allowed(&self, vertex_set: u8) -> bool {
        self.edges().iter().all(|e| e.vertex_set != vertex_set)
    }

    /// Adds an edge. The caller guarantees the edge is allowed.
    ///
    /// # Panics
    /// Panics in debug builds if the vertex set duplicates an existing edge
    /// or does not have exactly `K` vertices.
    pub fn add_edge(&mut self, edge: Edge) {
        debug_assert!(self.edge_allowed(edge.vertex_set), "duplicate edge");
        debug_assert_eq!(
            edge.vertex_set.count_ones() as usize,
            K,
            "edge must have K vertices"
        );
        self.edges[self.edge_count()] = edge;
        self.edge_count += 1;
        if !edge.is_directed() {
            self.undirected_edge_count += 1;
        }
    }

    /// Copies only the edge list into `g`; signatures and hash are zeroed and
    /// must be recomputed if needed.
    pub fn copy_edges(&self, g: &mut Self) {
        counters::global().graph_copies.inc();
        g.graph_hash = 0;
        g.is_canonical = false;
        g.edge_count = self.edge_count;
        g.undirected_edge_count = self.undirected_edge_count;
        g.edges = self.edges;
    }

    /// Computes the vertex signatures from the edge set.
    fn compute_vertex_signature(&mut self) {
        counters::global().compute_vertex_signatures.inc();

        for v in 0..MAX_VERTICES {
            self.vertices[v].reset(v as u8);
        }

        // First pass: degree counts, plus the neighbor set of each vertex
        // split by how the connecting edge relates to the vertex.
        let mut neighbors_undirected = [0u8; MAX_VERTICES];
        let mut neighbors_head = [0u8; MAX_VERTICES];
        let mut neighbors_tail = [0u8; MAX_VERTICES];

        for i in 0..self.edge_count() {
            let edge = self.edges[i];
            for v in 0..N {
                let mask = 1u8 << v;
                if edge.vertex_set & mask == 0 {
                    continue;
                }
                let others = edge.vertex_set & !mask;
                if !edge.is_directed() {
                    self.vertices[v].degree_undirected += 1;
                    neighbors_undirected[v] |= others;
                } else if usize::from(edge.head_vertex) == v {
                    self.vertices[v].degree_head += 1;
                    neighbors_head[v] |= others;
                } else {
                    self.vertices[v].degree_tail += 1;
                    neighbors_tail[v] |= others;
                }
            }
        }

        // Second pass: the neighbor hash. The order of the three combinations
        // is significant and must stay stable.
        for v in 0..N {
            let mut hash = self.vertices[v].neighbor_hash;
            hash = self.hash_neighbors(neighbors_undirected[v], hash);
            hash = self.hash_neighbors(neighbors_head[v], hash);
            hash = self.hash_neighbors(neighbors_tail[v], hash);
            self.vertices[v].neighbor_hash = hash;
        }
    }

    /// Combines the degree signatures of the given neighbor set into the
    /// hash, sorting them first so the result is invariant to the order the
    /// neighbors are listed in.
    fn hash_neighbors(&self, neighbors: u8, mut hash: u32) -> u32 {
        if neighbors == 0 {
            return hash_combine32(hash, 0x1234_5678);
        }
        let mut signatures = [0u32; MAX_VERTICES];
        let mut count = 0;
        let mut remaining = neighbors;
        let mut v = 0;
        while remaining != 0 {
            if remaining & 1 != 0 {
                signatures[count] = self.vertices[v].degrees();
                count += 1;
            }
            remaining >>= 1;
            v += 1;
        }
        signatures[..count].sort_unstable();
        for sig in &signatures[..count] {
            hash = hash_combine32(hash, *sig);
        }
        hash
    }

    /// Canonicalizes the graph: orders the vertices by decreasing signature
    /// hash, relabels the edges accordingly, sorts them, and computes the
    /// graph hash. Idempotent.
    pub fn canonicalize(&mut self) {
        counters::global().graph_canonicalize_ops.inc();

        self.compute_vertex_signature();
        // Decreasing order pushes the busy vertices to the low indices.
        self.vertices[..N].sort_unstable_by(|a, b| b.hash().cmp(&a.hash()));

        // Invert: p maps an old vertex id to its canonical index.
        let mut p = [0usize; MAX_VERTICES];
        for v in 0..N {
            p[usize::from(self.vertices[v].vertex_id)] = v;
        }

        let mut hash = 0u64;
        for v in 0..N {
            hash = hash_combine64(hash, self.vertices[v].hash());
        }
        self.graph_hash = ((hash >> 32) ^ hash) as u32;

        for i in 0..self.edge_count() {
            let edge = &mut self.edges[i];
            if edge.head_vertex != UNDIRECTED {
                edge.head_vertex = p[usize::from(edge.head_vertex)] as u8;
            }
            edge.vertex_set = permute_mask::<N>(&p, edge.vertex_set);
        }

        self.finalize_edges();
        self.is_canonical = true;
    }

    /// Sorts the edges by vertex set. Call this (or
    /// [`canonicalize`](Graph::canonicalize), which includes it) after all
    /// edges are added, before identity checks.
    pub fn finalize_edges(&mut self) {
        let count = self.edge_count();
        self.edges[..count].sort_unstable_by_key(|e| e.vertex_set);
    }

    /// Copies the edges through the permutation `p` into `g`, touching
    /// nothing but `g`'s edge array and edge count.
    fn permute_edges(&self, p: &[usize; MAX_VERTICES], g: &mut Self) {
        g.edge_count = self.edge_count;
        for i in 0..self.edge_count() {
            let edge = self.edges[i];
            g.edges[i].head_vertex = if edge.is_directed() {
                p[usize::from(edge.head_vertex)] as u8
            } else {
                UNDIRECTED
            };
            g.edges[i].vertex_set = permute_mask::<N>(&p, edge.vertex_set);
        }
    }

    /// Applies a canonical-form-preserving vertex permutation, writing the
    /// result into `g`. The permutation must only move vertices within groups
    /// of equal signature hash, so signatures, hash, and canonical status are
    /// inherited without recomputation.
    ///
    /// # Panics
    /// Panics in debug builds if the graph is not canonical.
    pub fn permute_canonical(&self, p: &[usize; MAX_VERTICES], g: &mut Self) {
        counters::global().graph_permute_canonical_ops.inc();
        debug_assert!(self.is_canonical, "permute_canonical requires canonical form");

        self.permute_edges(p, g);
        g.finalize_edges();
        g.graph_hash = self.graph_hash;
        g.is_canonical = self.is_canonical;
        g.undirected_edge_count = self.undirected_edge_count;
    }

    /// Applies an arbitrary vertex permutation, producing an isomorphic
    /// graph. Only used by tests to cross-check the optimized paths.
    #[cfg(test)]
    pub(crate) fn permute_for_testing(&self, p: &[usize; MAX_VERTICES], g: &mut Self) {
        counters::global().graph_permute_ops.inc();

        self.permute_edges(p, g);
        g.vertices = self.vertices;
        g.undirected_edge_count = self.undirected_edge_count;
        g.finalize_edges();
        g.is_canonical = self.is_canonical;
        g.graph_hash = self.graph_hash;
    }

    /// Returns whether the two graphs have exactly the same edge arrays.
    pub fn is_identical(&self, other: &Self) -> bool {
        counters::global().graph_identical_tests.inc();

        if self.edge_count != other.edge_count {
            return false;
        }
        self.edges() == other.edges()
    }

    /// Returns whether this graph is isomorphic to `other`.
    ///
    /// Fast-rejects on mismatched counts or hashes, fast-accepts on identity,
    /// and otherwise searches permutations within the groups of vertices
    /// whose signature hashes coincide. Complete because canonicalization
    /// fixes the vertex order across distinct-hash groups.
    ///
    /// # Panics
    /// Panics in debug builds unless both graphs are canonical.
    pub fn is_isomorphic(&self, other: &Self) -> bool {
        counters::global().graph_isomorphic_tests.inc();
        debug_assert!(self.is_canonical && other.is_canonical);

        if self.edge_count != other.edge_count
            || self.undirected_edge_count != other.undirected_edge_count
            || self.graph_hash != other.graph_hash
        {
            return false;
        }

        // Opportunistic: the two canonical forms often coincide outright.
        if self.is_identical(other) {
            counters::global().graph_isomorphic_true.inc();
            return true;
        }
        counters::global().graph_isomorphic_expensive.inc();

        // Maximal runs of equal signature hash; only these vertices are
        // interchangeable. Vertices with no edges need no permutation at all.
        let mut perm_sets = Vec::new();
        let mut v = 0;
        while v < N - 1 && self.vertices[v].degrees() > 0 {
            if self.vertices[v + 1].hash() == self.vertices[v].hash() {
                let mut t = v;
                while t < N && self.vertices[t].hash() == self.vertices[v].hash() {
                    t += 1;
                }
                perm_sets.push((v, t));
                v = t - 1;
            }
            v += 1;
        }

        if !perm_sets.is_empty() {
            let mut perm = Permutator::new(perm_sets);
            let mut h = Self::new();
            while perm.next() {
                self.permute_canonical(perm.p(), &mut h);
                if h.is_identical(other) {
                    counters::global().graph_isomorphic_true.inc();
                    return true;
                }
            }
        }

        counters::global().graph_isomorphic_hash_no.inc();
        false
    }

    /// Brute-force isomorphism check over all `N!` vertex permutations.
    /// Only used to verify the optimized algorithm in tests.
    #[cfg(test)]
    pub(crate) fn is_isomorphic_slow(&self, other: &Self) -> bool {
        if self.is_identical(other) {
            return true;
        }
        let mut perm = Permutator::new(vec![(0, N)]);
        let mut copy = Self::new();
        while perm.next() {
            self.permute_edges(perm.p(), &mut copy);
            copy.finalize_edges();
            if copy.is_identical(other) {
                return true;
            }
        }
        false
    }

    /// Returns whether the graph contains a generalized triangle `T_k`
    /// through vertex `v`.
    ///
    /// `T_k` is the 3-edge K-graph on K+1 vertices whose edges pairwise share
    /// a common (K-2)-vertex stem, with at least one edge directed into one
    /// of the three non-stem vertices. For example `T_2 = {12, 13, 23>3}`,
    /// `T_3 = {124, 134, 234>3}`. Subgraph containment here allows forgetting
    /// edge directions, so any head inside the triangle counts.
    ///
    /// Depends only on the edge array, so it works on non-canonical graphs.
    pub fn contains_tk(&self, v: usize) -> bool {
        counters::global().graph_contains_tk_tests.inc();

        // v participates either as one of the three triangle vertices or
        // inside the common stem; both cases are caught by scanning edge
        // pairs through v that differ in exactly one vertex each, extended
        // by a third edge one vertex away from their union.
        let count = self.edge_count();
        let v_mask = 1u8 << v;
        for i in 0..count.saturating_sub(1) {
            let e_i = self.edges[i].vertex_set;
            if e_i & v_mask == 0 {
                continue;
            }
            for j in (i + 1)..count {
                let e_j = self.edges[j].vertex_set;
                if e_j & v_mask == 0 {
                    continue;
                }
                let m = e_i ^ e_j;
                if m.count_ones() != 2 {
                    continue;
                }
                let mask = m | e_i;
                for k in 0..count {
                    if k == i || k == j {
                        continue;
                    }
                    let e_k = self.edges[k].vertex_set;
                    if (mask ^ e_k).count_ones() != 1 {
                        continue;
                    }
                    let stem = m ^ e_k;
                    let xyz = (e_i | e_j | e_k) & !stem;
                    let directed_into_triangle =
                        |e: &Edge| e.is_directed() && xyz & (1 << e.head_vertex) != 0;
                    if directed_into_triangle(&self.edges[i])
                        || directed_into_triangle(&self.edges[j])
                        || directed_into_triangle(&self.edges[k])
                    {
                        return true;
                    }
                }
            }
        }
        false
    }

    /// Parses a graph from the text format produced by `Display`, e.g.
    /// `{013>3, 023, 014}`. Vertex digits may appear in any order; the head
    /// of a directed edge must be one of the edge's vertices.
    ///
    /// # Errors
    /// Returns a [`ParseError`] for malformed edge literals.
    pub fn parse_edges(text: &str) -> Result<Self, ParseError> {
        let inner = text
            .strip_prefix('{')
            .and_then(|t| t.strip_suffix('}'))
            .ok_or(ParseError::MissingBraces)?;

        let mut g = Self::new();
        if inner.trim().is_empty() {
            return Ok(g);
        }
        for token in inner.split(',') {
            let token = token.trim();
            if token.is_empty() {
                return Err(ParseError::EmptyEdge);
            }
            let (digits, head_text) = match token.split_once('>') {
                None => (token, None),
                Some((d, h)) => (d, Some(h.trim())),
            };

            let mut vertex_set = 0u8;
            for c in digits.chars() {
                if c == ' ' {
                    continue;
                }
                if !('0'..='6').contains(&c) {
                    return Err(ParseError::InvalidChar(c));
                }
                vertex_set |= 1 << (c as u8 - b'0');
            }
            if vertex_set & !((1u8 << N) - 1) != 0 {
                return Err(ParseError::VertexOutOfRange { vertex_set, n: N });
            }
            if vertex_set.count_ones() as usize != K {
                return Err(ParseError::WrongVertexCount {
                    got: vertex_set.count_ones() as usize,
                    expected: K,
                });
            }

            let head_vertex = match head_text {
                None => UNDIRECTED,
                Some(h) => {
                    let mut chars = h.chars();
                    let c = match (chars.next(), chars.next()) {
                        (Some(c), None) if ('0'..='6').contains(&c) => c,
                        _ => return Err(ParseError::InvalidHead(h.to_string())),
                    };
                    let head = c as u8 - b'0';
                    if vertex_set & (1 << head) == 0 {
                        return Err(ParseError::HeadNotInEdge { head, vertex_set });
                    }
                    head
                }
            };

            if !g.edge_allowed(vertex_set) {
                return Err(ParseError::DuplicateEdge { vertex_set });
            }
            g.add_edge(Edge::new(vertex_set, head_vertex));
        }
        Ok(g)
    }
}

impl<const K: usize, const N: usize> fmt::Display for Graph<K, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_edges(self.edges()))
    }
}

// Edge-set identity; signatures and hashes are derived state and do not
// participate.
impl<const K: usize, const N: usize> PartialEq for Graph<K, N> {
    fn eq(&self, other: &Self) -> bool {
        self.edge_count == other.edge_count && self.edges() == other.edges()
    }
}

impl<const K: usize, const N: usize> Eq for Graph<K, N> {}

impl<const K: usize, const N: usize> PartialOrd for Graph<K, N> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<const K: usize, const N: usize> Ord for Graph<K, N> {
    /// Deterministic order used when growing the search tree: edge count
    /// first, then edge-by-edge by vertex set, ties broken by the head byte
    /// compared as signed so [`UNDIRECTED`] orders below any real head.
    fn cmp(&self, other: &Self) -> Ordering {
        self.edge_count.cmp(&other.edge_count).then_with(|| {
            for (a, b) in self.edges().iter().zip(other.edges()) {
                let ord = a
                    .vertex_set
                    .cmp(&b.vertex_set)
                    .then((a.head_vertex as i8).cmp(&(b.head_vertex as i8)));
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            Ordering::Equal
        })
    }
}

// ============================================================================
// Parse errors
// ============================================================================

/// Errors encountered while parsing an edge-list literal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParseError {
    /// The text is not enclosed in `{` ... `}`.
    MissingBraces,
    /// An empty edge token (stray comma).
    EmptyEdge,
    /// A character that is neither a vertex digit, a space, nor `>`.
    InvalidChar(char),
    /// The part after `>` is not a single vertex digit.
    InvalidHead(String),
    /// A directed head outside the edge's vertex set.
    HeadNotInEdge {
        /// The offending head vertex.
        head: u8,
        /// The edge's vertex set.
        vertex_set: u8,
    },
    /// An edge whose vertex count is not K.
    WrongVertexCount {
        /// Number of vertices found.
        got: usize,
        /// The required K.
        expected: usize,
    },
    /// A vertex beyond the graph's N vertices.
    VertexOutOfRange {
        /// The edge's vertex set.
        vertex_set: u8,
        /// The graph's N.
        n: usize,
    },
    /// Two edges with the same vertex set.
    DuplicateEdge {
        /// The duplicated vertex set.
        vertex_set: u8,
    },
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::MissingBraces => write!(f, "edge list must be enclosed in {{}}"),
            ParseError::EmptyEdge => write!(f, "empty edge in list"),
            ParseError::InvalidChar(c) => write!(f, "invalid character {c:?} in edge"),
            ParseError::InvalidHead(h) => write!(f, "invalid head {h:?} after '>'"),
            ParseError::HeadNotInEdge { head, vertex_set } => {
                write!(f, "head vertex {head} is not in edge {vertex_set:#09b}")
            }
            ParseError::WrongVertexCount { got, expected } => {
                write!(f, "edge has {got} vertices, expected {expected}")
            }
            ParseError::VertexOutOfRange { vertex_set, n } => {
                write!(f, "edge {vertex_set:#09b} uses vertices beyond n={n}")
            }
            ParseError::DuplicateEdge { vertex_set } => {
                write!(f, "duplicate edge {vertex_set:#09b}")
            }
        }
    }
}

impl std::error::Error for ParseError {}

// ============================================================================
// Test support
// ============================================================================

/// Generates a graph whose possible edges are each present with probability
/// `p`, with a uniformly random direction state.
#[cfg(test)]
pub(crate) fn random_graph<const K: usize, const N: usize, R: rand::Rng>(
    rng: &mut R,
    p: f64,
) -> Graph<K, N> {
    let table = Graph::<K, N>::VERTEX_MASKS;
    let mut g = Graph::new();
    for idx in 0..usize::from(table.count[K]) {
        let mask = table.masks[K][idx];
        if !rng.random_bool(p) {
            continue;
        }
        let choice = rng.random_range(0..=K);
        let head = if choice == 0 {
            UNDIRECTED
        } else {
            nth_member(mask, choice - 1)
        };
        g.add_edge(Edge::new(mask, head));
    }
    g
}

/// The i-th member of a vertex bitmask in ascending bit order.
#[cfg(test)]
pub(crate) fn nth_member(mask: u8, i: usize) -> u8 {
    let mut seen = 0;
    for v in 0..8u8 {
        if mask & (1 << v) != 0 {
            if seen == i {
                return v;
            }
            seen += 1;
        }
    }
    unreachable!("mask has fewer than {} members", i + 1)
}

// ============================================================================
// Tests
// ============================================================================
