//! The per-round swap conflict graph.
//!
//! Every swap command records its pair here before touching the grid.
//! When a swap fails, corruption spreads over the whole connected
//! component containing the failing pair: every cell that attempted to
//! swap with a corrupted cell, directly or through any chain of
//! attempts, is lost with it.
//!
//! The graph is owned by the round orchestrator and cleared at round
//! start, so the cascade is a pure function of (graph, failing pair).

use rustc_hash::{FxHashMap, FxHashSet};

/// Adjacency record of attempted swap partners for the current round.
#[derive(Clone, Debug, Default)]
pub struct SwapGraph {
    partners: FxHashMap<usize, FxHashSet<usize>>,
}

impl SwapGraph {
    /// Create an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget all recorded attempts. Called at round start.
    pub fn clear(&mut self) {
        self.partners.clear();
    }

    /// Record that `a` and `b` attempted to swap, bidirectionally. The
    /// same index may appear in several attempts within one round when
    /// distinct players target it.
    pub fn record(&mut self, a: usize, b: usize) {
        self.partners.entry(a).or_default().insert(b);
        self.partners.entry(b).or_default().insert(a);
    }

    /// All indices transitively connected to the failing pair,
    /// including the pair itself: the full closure over this round's
    /// attempts, not a single hop.
    #[must_use]
    pub fn component(&self, a: usize, b: usize) -> FxHashSet<usize> {
        let mut reached = FxHashSet::default();
        let mut pending = vec![a, b];
        while let Some(index) = pending.pop() {
            if !reached.insert(index) {
                continue;
            }
            if let Some(adjacent) = self.partners.get(&index) {
                pending.extend(adjacent.iter().copied());
            }
        }
        reached
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_component_includes_the_pair() {
        let mut graph = SwapGraph::new();
        graph.record(1, 2);

        let component = graph.component(1, 2);
        assert_eq!(component.len(), 2);
        assert!(component.contains(&1));
        assert!(component.contains(&2));
    }

    #[test]
    fn test_component_is_transitive() {
        let mut graph = SwapGraph::new();
        graph.record(1, 2);
        graph.record(2, 3);
        graph.record(3, 7);

        let component = graph.component(1, 2);
        assert_eq!(component.len(), 4);
        assert!(component.contains(&7));
    }

    #[test]
    fn test_component_ignores_disconnected_attempts() {
        let mut graph = SwapGraph::new();
        graph.record(1, 2);
        graph.record(5, 6);

        let component = graph.component(1, 2);
        assert!(!component.contains(&5));
        assert!(!component.contains(&6));
    }

    #[test]
    fn test_record_is_bidirectional() {
        let mut graph = SwapGraph::new();
        graph.record(4, 9);

        // Reached from either end.
        assert!(graph.component(9, 9).contains(&4));
        assert!(graph.component(4, 4).contains(&9));
    }

    #[test]
    fn test_clear_forgets_attempts() {
        let mut graph = SwapGraph::new();
        graph.record(1, 2);
        graph.record(2, 3);
        graph.clear();

        // Only the seeds themselves remain reachable.
        assert_eq!(graph.component(1, 2).len(), 2);
        assert!(!graph.component(1, 2).contains(&3));
    }

    #[test]
    fn test_self_swap_component() {
        let mut graph = SwapGraph::new();
        graph.record(3, 3);

        assert_eq!(graph.component(3, 3).len(), 1);
    }
}
