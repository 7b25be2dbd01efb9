//! Enumeration of all extensions of a base graph by edges through one new
//! vertex.
//!
//! Growing the search tree from n-1 to n vertices means adding some set of
//! K-edges that each contain the new vertex `n-1`. Every candidate edge is a
//! (K-1)-subset of the old vertices plus the new one, and each candidate is
//! in one of K+2 states: absent, undirected, or directed with one of its K
//! members as the head. The generator walks a mixed-radix odometer over these
//! states and writes each resulting graph into a caller-provided buffer, with
//! two pruning hooks that let the driver skip large subtrees.

use crate::fraction::Fraction;
use crate::graph::{binom, Edge, Graph, MAX_EDGES, MAX_VERTICES, UNDIRECTED};

/// Sentinel for the unused head slot of an absent candidate.
const NOT_IN_SET: u8 = 0xEE;

/// Per-run statistics of one generator.
#[derive(Clone, Copy, Debug, Default)]
pub struct GeneratorStats {
    /// Calls to [`EdgeGenerator::notify_contain_tk_skip`].
    pub tk_skips: u64,
    /// Enumeration digits forced to their terminal value by those calls.
    pub tk_skip_bits: u64,
    /// States skipped for having too few new edges to beat the known theta.
    pub theta_edge_skips: u64,
    /// States skipped for having too few directed edges to beat it.
    pub theta_directed_edge_skips: u64,
    /// Graphs actually emitted.
    pub edge_sets: u64,
}

enum OptResult {
    FoundCandidate,
    ContinueSearch,
    Done,
}

/// Enumerator of the extensions of `base` to `n` vertices.
///
/// The all-absent state is the base graph itself and is never emitted; the
/// first emitted state has exactly the lowest candidate present, undirected.
/// The caller must not mutate the generator between calls except through
/// [`notify_contain_tk_skip`](EdgeGenerator::notify_contain_tk_skip).
pub struct EdgeGenerator<'a, const K: usize, const N: usize> {
    base: &'a Graph<K, N>,
    n: usize,
    edge_candidates: [u8; MAX_EDGES],
    edge_candidates_vidx: [[u8; MAX_VERTICES + 2]; MAX_EDGES],
    edge_candidate_count: usize,
    enum_state: [u8; MAX_EDGES],
    high_idx_non_zero_enum_state: usize,
    stats: GeneratorStats,
}

impl<'a, const K: usize, const N: usize> EdgeGenerator<'a, K, N> {
    /// Creates a generator extending `base` (a graph on `n - 1` vertices) to
    /// `n` vertices.
    ///
    /// # Panics
    /// Panics in debug builds if `n` is out of range or the base already
    /// touches the new vertex.
    pub fn new(n: usize, base: &'a Graph<K, N>) -> Self {
        debug_assert!(K <= n && n <= N, "target vertex count out of range");
        debug_assert!(
            base.edges().iter().all(|e| e.vertex_set & (1 << (n - 1)) == 0),
            "base graph must not touch the new vertex"
        );

        let new_vertex_bit = 1u8 << (n - 1);
        let mut gen = Self {
            base,
            n,
            edge_candidates: [0; MAX_EDGES],
            edge_candidates_vidx: [[NOT_IN_SET; MAX_VERTICES + 2]; MAX_EDGES],
            edge_candidate_count: 0,
            enum_state: [0; MAX_EDGES],
            high_idx_non_zero_enum_state: 0,
            stats: GeneratorStats::default(),
        };

        // Candidates in ascending base-mask order. The head table maps each
        // non-zero digit to a head vertex: digit 1 is undirected, digit 2 the
        // new vertex, digits 3..K+1 the base-mask members in ascending bit
        // order.
        for mask in 0u16..(1 << (n - 1)) {
            let mask = mask as u8;
            if mask.count_ones() as usize != K - 1 {
                continue;
            }
            let c = gen.edge_candidate_count;
            gen.edge_candidates[c] = mask | new_vertex_bit;
            let vidx = &mut gen.edge_candidates_vidx[c];
            vidx[0] = NOT_IN_SET;
            vidx[1] = UNDIRECTED;
            vidx[2] = (n - 1) as u8;
            let mut slot = 3;
            for v in 0..n - 1 {
                if mask & (1 << v) != 0 {
                    vidx[slot] = v as u8;
                    slot += 1;
                }
            }
            debug_assert_eq!(slot, K + 2);
            gen.edge_candidate_count += 1;
        }
        debug_assert_eq!(gen.edge_candidate_count, binom(n - 1, K - 1));
        gen
    }

    /// Number of candidate edges through the new vertex.
    pub fn candidate_count(&self) -> usize {
        self.edge_candidate_count
    }

    /// The statistics gathered so far.
    pub fn stats(&self) -> GeneratorStats {
        self.stats
    }

    /// Resets the statistics.
    pub fn clear_stats(&mut self) {
        self.stats = GeneratorStats::default();
    }

    /// Advances to the next edge set and writes the resulting graph into
    /// `out` (whose previous contents are discarded). Returns `false` once
    /// every extension has been enumerated.
    ///
    /// With `use_known_min_theta_opt`, states that cannot possibly beat
    /// `known_min_theta` are skipped wholesale: first by total new-edge
    /// count, then by directed-edge count. This is only sound on the final
    /// enumeration level (`n == N`) with a finite known minimum at least 1;
    /// both are asserted in debug builds. The remaining parameters describe
    /// the base graph and are ignored when the optimization is off.
    pub fn next(
        &mut self,
        out: &mut Graph<K, N>,
        use_known_min_theta_opt: bool,
        base_edge_count: usize,
        base_directed_edge_count: usize,
        known_min_theta: Fraction,
    ) -> bool {
        if use_known_min_theta_opt {
            debug_assert_eq!(self.n, N, "theta pruning is only sound on the final level");
            debug_assert!(known_min_theta >= Fraction::new(1, 1));
        }

        loop {
            let mut has_valid_candidate = false;
            for i in 0..self.edge_candidate_count {
                self.enum_state[i] += 1;
                if i > self.high_idx_non_zero_enum_state {
                    self.high_idx_non_zero_enum_state = i;
                }
                if usize::from(self.enum_state[i]) != K + 2 {
                    has_valid_candidate = true;
                    break;
                }
                self.enum_state[i] = 0;
            }
            if !has_valid_candidate {
                return false;
            }
            if !use_known_min_theta_opt {
                break;
            }
            match self.perform_min_theta_optimization(
                base_edge_count,
                base_directed_edge_count,
                known_min_theta,
            ) {
                OptResult::FoundCandidate => break,
                OptResult::Done => return false,
                OptResult::ContinueSearch => continue,
            }
        }

        self.generate_graph(out, 0);
        self.stats.edge_sets += 1;
        true
    }

    /// Builds the graph for the current state into `out`, ignoring the
    /// candidates below `skip_front`.
    fn generate_graph(&self, out: &mut Graph<K, N>, skip_front: usize) {
        self.base.copy_edges(out);
        for j in skip_front..=self.high_idx_non_zero_enum_state {
            let digit = usize::from(self.enum_state[j]);
            if digit != 0 {
                out.add_edge(Edge::new(
                    self.edge_candidates[j],
                    self.edge_candidates_vidx[j][digit],
                ));
            }
        }
    }

    /// Notifies the generator that the graph just emitted contains T_k, so
    /// every superset of its edge set does too and can be skipped.
    ///
    /// If the lowest digit is zero, the whole block reachable by varying only
    /// the digits below the lowest non-zero one is bypassed by pushing those
    /// digits to their terminal value. Otherwise, on the final level, the
    /// graph is re-emitted with growing skipped prefixes, and every prefix
    /// whose remainder still contains T_k at the new vertex has its preceding
    /// digit block bypassed the same way.
    pub fn notify_contain_tk_skip(&mut self) {
        self.stats.tk_skips += 1;
        if self.enum_state[0] == 0 {
            for i in 0..self.edge_candidate_count {
                if self.enum_state[i] != 0 {
                    return;
                }
                self.enum_state[i] = (K + 1) as u8;
                self.stats.tk_skip_bits += 1;
            }
        } else if self.n == N {
            let mut copy = Graph::new();
            for skip_front in 1..self.edge_candidate_count {
                self.generate_graph(&mut copy, skip_front);
                if copy.edge_count() == self.base.edge_count() {
                    return;
                }
                if copy.contains_tk(N - 1) {
                    self.enum_state[skip_front - 1] = (K + 1) as u8;
                    self.stats.tk_skip_bits += 1;
                }
            }
        }
    }

    /// Checks whether the current state can possibly beat `known_min_theta`,
    /// and if not, jumps the state forward past the hopeless block.
    fn perform_min_theta_optimization(
        &mut self,
        base_edge_count: usize,
        base_directed_edge_count: usize,
        known_min_theta: Fraction,
    ) -> OptResult {
        // To beat the known minimum even if every new edge were directed,
        // the state needs
        //    new_edges > (TOTAL - base_edges) / theta - base_directed,
        // with the division rounded down in integer arithmetic.
        let new_edge_threshold = (Graph::<K, N>::TOTAL_EDGES as i64 - base_edge_count as i64)
            * known_min_theta.denom() as i64
            / known_min_theta.numer() as i64
            - base_directed_edge_count as i64;

        let (new_edges, new_directed_edges, low_non_edge_idx, low_non_directed_idx) =
            self.count_edges();

        if (new_edges as i64) <= new_edge_threshold {
            self.stats.theta_edge_skips += 1;
            // Jump to the state that is ready to gain one more edge. From
            // [3, 0, 0, 1, 1, 1] the next state with more edges is
            // [3, 0, 1, 1, 1, 1], so leave [3, 0, 1, 1, 1, 0] for the
            // odometer increment at the top of the loop to finish.
            if low_non_edge_idx >= self.edge_candidate_count {
                return OptResult::Done;
            }
            for i in 1..=low_non_edge_idx {
                self.enum_state[i] = 1;
            }
            self.enum_state[0] = 0;
            return OptResult::ContinueSearch;
        }

        // Enough edges overall; the directed count alone may still fall
        // short.
        let total_directed = new_directed_edges + base_directed_edge_count;
        let total_undirected =
            new_edges - new_directed_edges + base_edge_count - base_directed_edge_count;
        if total_directed == 0
            || known_min_theta
                <= Fraction::new(
                    (Graph::<K, N>::TOTAL_EDGES - total_undirected) as u64,
                    total_directed as u64,
                )
        {
            self.stats.theta_directed_edge_skips += 1;
            // Same jump, but to the state ready to gain one more directed
            // edge: digits below become 2, digit 0 becomes 1.
            if low_non_directed_idx >= self.edge_candidate_count {
                return OptResult::Done;
            }
            for i in 1..=low_non_directed_idx {
                self.enum_state[i] = 2;
            }
            self.enum_state[0] = 1;
            return OptResult::ContinueSearch;
        }

        OptResult::FoundCandidate
    }

    /// Returns `(new edges, new directed edges, lowest index with no edge,
    /// lowest index with no directed edge)` for the current state.
    fn count_edges(&self) -> (usize, usize, usize, usize) {
        let mut edges = 0;
        let mut directed = 0;
        let mut first_non_edge = self.edge_candidate_count;
        let mut first_non_directed = self.edge_candidate_count;
        for i in 0..self.edge_candidate_count {
            let digit = self.enum_state[i];
            if digit != 0 {
                edges += 1;
                if digit != 1 {
                    directed += 1;
                }
            } else if first_non_edge == self.edge_candidate_count {
                first_non_edge = i;
            }
            if first_non_directed == self.edge_candidate_count && (digit == 0 || digit == 1) {
                first_non_directed = i;
            }
        }
        (edges, directed, first_non_edge, first_non_directed)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn empty_base<const K: usize, const N: usize>() -> Graph<K, N> {
        let mut g = Graph::new();
        g.canonicalize();
        g
    }

    /// Runs the generator to exhaustion without pruning and returns the
    /// serialized form of every emitted graph, in emission order.
    fn enumerate_all<const K: usize, const N: usize>(
        n: usize,
        base: &Graph<K, N>,
    ) -> Vec<String> {
        let mut gen = EdgeGenerator::new(n, base);
        let mut out = Graph::new();
        let mut result = Vec::new();
        while gen.next(&mut out, false, 0, 0, Fraction::infinity()) {
            result.push(out.to_string());
        }
        result
    }

    #[test]
    fn candidates_are_ascending_with_the_fixed_head_table() {
        let base = empty_base::<3, 5>();
        let gen = EdgeGenerator::new(5, &base);

        assert_eq!(gen.candidate_count(), binom(4, 2));
        let masks: Vec<u8> = gen.edge_candidates[..gen.edge_candidate_count].to_vec();
        assert_eq!(masks, vec![0b10011, 0b10101, 0b10110, 0b11001, 0b11010, 0b11100]);

        // Candidate {0,1,4}: absent, undirected, the new vertex, then the
        // base members ascending.
        assert_eq!(
            gen.edge_candidates_vidx[0][..5],
            [NOT_IN_SET, UNDIRECTED, 4, 0, 1]
        );
        // Candidate {2,3,4}.
        assert_eq!(
            gen.edge_candidates_vidx[5][..5],
            [NOT_IN_SET, UNDIRECTED, 4, 2, 3]
        );
    }

    #[test]
    fn first_states_follow_the_odometer() {
        let base = empty_base::<2, 3>();
        let all = enumerate_all(3, &base);
        // Candidates are {0,2} then {1,2}; digit order is undirected, head
        // new-vertex, head base-member.
        assert_eq!(
            &all[..6],
            &["{02}", "{02>2}", "{02>0}", "{12}", "{02, 12}", "{02>2, 12}"]
        );
        assert_eq!(all.len(), 4usize.pow(2) - 1);
    }

    #[test]
    fn enumeration_is_complete_and_duplicate_free() {
        let base = empty_base::<3, 5>();
        let all = enumerate_all(5, &base);
        assert_eq!(all.len(), 5usize.pow(6) - 1);
        let distinct: BTreeSet<_> = all.iter().collect();
        assert_eq!(distinct.len(), all.len());
    }

    #[test]
    fn enumeration_matches_the_brute_force_extension_universe() {
        let base = Graph::<2, 4>::parse_edges("{01>1}").unwrap();
        let all = enumerate_all(4, &base);
        assert_eq!(all.len(), 4usize.pow(3) - 1);

        // Independently enumerate every assignment of the three candidate
        // edges {03, 13, 23} and compare edge sets.
        let mut expected = BTreeSet::new();
        let candidates = [0b1001u8, 0b1010, 0b1100];
        for code in 1..4usize.pow(3) {
            let mut g = Graph::<2, 4>::new();
            base.copy_edges(&mut g);
            let mut c = code;
            for &mask in &candidates {
                let digit = c % 4;
                c /= 4;
                if digit == 0 {
                    continue;
                }
                let head = match digit {
                    1 => UNDIRECTED,
                    2 => 3,
                    _ => crate::graph::nth_member(mask & !0b1000, 0),
                };
                g.add_edge(Edge::new(mask, head));
            }
            expected.insert(g.to_string());
        }
        let produced: BTreeSet<_> = all.into_iter().collect();
        assert_eq!(produced, expected);
    }

    #[test]
    fn base_edges_are_carried_into_every_emission() {
        let base = Graph::<3, 5>::parse_edges("{012, 013>1}").unwrap();
        let mut gen = EdgeGenerator::new(5, &base);
        let mut out = Graph::new();
        for _ in 0..50 {
            assert!(gen.next(&mut out, false, 0, 0, Fraction::infinity()));
            assert!(out.edge_count() > base.edge_count());
            assert!(out.to_string().starts_with("{012, 013>1, "));
            assert!(out
                .edges()
                .iter()
                .skip(2)
                .all(|e| e.vertex_set & 0b10000 != 0));
        }
    }

    #[test]
    fn tk_superset_skip_never_loses_a_tk_free_extension() {
        let base = Graph::<3, 5>::parse_edges("{012}").unwrap();

        let full = enumerate_all(5, &base);
        let tk_free_full: BTreeSet<_> = full
            .iter()
            .filter(|text| {
                let g = Graph::<3, 5>::parse_edges(text).unwrap();
                !g.contains_tk(4)
            })
            .cloned()
            .collect();

        let mut gen = EdgeGenerator::new(5, &base);
        let mut out = Graph::new();
        let mut pruned_emitted = Vec::new();
        let mut tk_free_pruned = BTreeSet::new();
        while gen.next(&mut out, false, 0, 0, Fraction::infinity()) {
            pruned_emitted.push(out.to_string());
            if out.contains_tk(4) {
                gen.notify_contain_tk_skip();
            } else {
                tk_free_pruned.insert(out.to_string());
            }
        }

        // Pruning actually skipped something, emitted only real states, and
        // kept every T_k-free extension.
        assert!(pruned_emitted.len() < full.len());
        let full_set: BTreeSet<_> = full.iter().cloned().collect();
        assert!(pruned_emitted.iter().all(|s| full_set.contains(s)));
        assert_eq!(tk_free_pruned, tk_free_full);
        assert!(gen.stats().tk_skips > 0);
        assert!(gen.stats().tk_skip_bits > 0);
    }

    #[test]
    fn theta_pruning_keeps_every_state_that_could_beat_the_minimum() {
        // With theta* = 2 the only states that can survive are the ones
        // adding all three candidates as directed edges.
        let base = Graph::<2, 4>::parse_edges("{01}").unwrap();
        let known = Fraction::new(2, 1);

        let full = enumerate_all(4, &base);

        let mut gen = EdgeGenerator::new(4, &base);
        let mut out = Graph::new();
        let mut emitted = BTreeSet::new();
        while gen.next(
            &mut out,
            true,
            base.edge_count(),
            base.directed_edge_count(),
            known,
        ) {
            emitted.insert(out.to_string());
        }

        assert!(!emitted.is_empty());
        assert!(emitted.len() < full.len());
        let full_set: BTreeSet<_> = full.iter().cloned().collect();
        assert!(emitted.iter().all(|s| full_set.contains(s)));

        // Soundness: every skipped state's graph already fails the bound.
        for text in &full {
            if emitted.contains(text) {
                continue;
            }
            let g = Graph::<2, 4>::parse_edges(text).unwrap();
            assert!(
                g.get_theta() >= known,
                "skipped {text} with theta {} < {known}",
                g.get_theta()
            );
        }
        let stats = gen.stats();
        assert!(stats.theta_edge_skips > 0 || stats.theta_directed_edge_skips > 0);
    }

    #[test]
    fn theta_pruning_with_combined_tk_skip_finds_the_same_minimum() {
        // Drive the generator the way the final search level does, with both
        // prunings active, and compare the minimum against the unpruned run.
        let base = Graph::<3, 5>::parse_edges("{012, 013>1}").unwrap();
        let known = Fraction::new(3, 1);

        let mut unpruned_min = Fraction::infinity();
        for text in enumerate_all(5, &base) {
            let g = Graph::<3, 5>::parse_edges(&text).unwrap();
            if !g.contains_tk(4) {
                unpruned_min = unpruned_min.min(g.get_theta());
            }
        }

        let mut gen = EdgeGenerator::new(5, &base);
        let mut out = Graph::new();
        let mut pruned_min = Fraction::infinity();
        while gen.next(
            &mut out,
            true,
            base.edge_count(),
            base.directed_edge_count(),
            known,
        ) {
            if out.contains_tk(4) {
                gen.notify_contain_tk_skip();
            } else {
                pruned_min = pruned_min.min(out.get_theta());
            }
        }

        // The pruned run may drop graphs at or above the known bound, but
        // must find anything below it.
        if unpruned_min < known {
            assert_eq!(pruned_min, unpruned_min);
        } else {
            assert!(pruned_min >= known);
        }
    }

    #[test]
    fn clear_stats_resets_the_tallies() {
        let base = empty_base::<2, 3>();
        let mut gen = EdgeGenerator::new(3, &base);
        let mut out = Graph::new();
        assert!(gen.next(&mut out, false, 0, 0, Fraction::infinity()));
        assert_eq!(gen.stats().edge_sets, 1);
        gen.clear_stats();
        assert_eq!(gen.stats().edge_sets, 0);
    }
}
