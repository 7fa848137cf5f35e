//! A small directed multigraph over [`NodeId`] vertices, with Tarjan
//! strongly-connected-components decomposition.
//!
//! Shaped after `mesh-common`'s module dependency graph: a `Vec` of vertices
//! in insertion order alongside an adjacency map, with the graph algorithms
//! (here, SCC and inversion) as inherent methods rather than free functions
//! operating on bare edge lists.

use rustc_hash::{FxHashMap, FxHashSet};

use crate::term::NodeId;

/// A directed graph keyed by [`NodeId`]. Duplicate edges are not stored
/// twice (`add_edge` is idempotent).
#[derive(Debug, Default, Clone)]
pub struct Graph {
    /// Vertices in insertion order, for deterministic SCC root iteration.
    order: Vec<NodeId>,
    /// Out-edges per vertex.
    adjacency: FxHashMap<NodeId, Vec<NodeId>>,
}

impl Graph {
    /// An empty graph.
    pub fn new() -> Graph {
        Graph::default()
    }

    /// Add a vertex with no edges, if not already present.
    pub fn add_vertex(&mut self, v: NodeId) {
        self.ensure_vertex(&v);
    }

    /// Add a directed edge `from -> to`. Adds either endpoint as a bare
    /// vertex first if new. Re-adding the same edge is a no-op.
    pub fn add_edge(&mut self, from: NodeId, to: NodeId) {
        self.ensure_vertex(&from);
        self.ensure_vertex(&to);
        let children = self.adjacency.get_mut(&from).expect("vertex just ensured");
        if !children.contains(&to) {
            children.push(to);
        }
    }

    fn ensure_vertex(&mut self, v: &NodeId) {
        if !self.adjacency.contains_key(v) {
            self.order.push(v.clone());
            self.adjacency.insert(v.clone(), Vec::new());
        }
    }

    /// The out-edges of `v`, empty if `v` is absent or has none.
    pub fn get_children(&self, v: &NodeId) -> &[NodeId] {
        self.adjacency.get(v).map(|c| c.as_slice()).unwrap_or(&[])
    }

    /// All vertices, in insertion order.
    pub fn vertices(&self) -> &[NodeId] {
        &self.order
    }

    /// The graph with every edge reversed.
    pub fn invert(&self) -> Graph {
        let mut inverted = Graph::new();
        for v in &self.order {
            inverted.ensure_vertex(v);
        }
        for (from, children) in &self.adjacency {
            for to in children {
                inverted.add_edge(to.clone(), from.clone());
            }
        }
        inverted
    }

    /// Depth-first traversal from `start`, invoking `visit` once per
    /// reachable vertex (including `start` itself) the first time it is
    /// seen.
    pub fn dfs(&self, start: &NodeId, mut visit: impl FnMut(&NodeId)) {
        let mut seen: FxHashSet<NodeId> = FxHashSet::default();
        let mut stack = vec![start.clone()];
        while let Some(v) = stack.pop() {
            if !seen.insert(v.clone()) {
                continue;
            }
            visit(&v);
            for child in self.get_children(&v) {
                if !seen.contains(child) {
                    stack.push(child.clone());
                }
            }
        }
    }

    /// Strongly connected components via Tarjan's algorithm, in the
    /// algorithm's natural emission order (reverse topological — sinks
    /// first, sources last). Every vertex appears in exactly one component.
    pub fn strongly_connected_components(&self) -> Vec<Vec<NodeId>> {
        let mut state = TarjanState::default();
        for v in &self.order {
            if !state.index.contains_key(v) {
                self.strongconnect(v, &mut state);
            }
        }
        state.components
    }

    fn strongconnect(&self, v: &NodeId, state: &mut TarjanState) {
        let idx = state.counter;
        state.counter += 1;
        state.index.insert(v.clone(), idx);
        state.lowlink.insert(v.clone(), idx);
        state.stack.push(v.clone());
        state.on_stack.insert(v.clone());

        for w in self.get_children(v) {
            if !state.index.contains_key(w) {
                self.strongconnect(w, state);
                let w_low = state.lowlink[w];
                let v_low = state.lowlink[v];
                state.lowlink.insert(v.clone(), v_low.min(w_low));
            } else if state.on_stack.contains(w) {
                let w_idx = state.index[w];
                let v_low = state.lowlink[v];
                state.lowlink.insert(v.clone(), v_low.min(w_idx));
            }
        }

        if state.lowlink[v] == state.index[v] {
            let mut component = Vec::new();
            loop {
                let w = state.stack.pop().expect("component root must be on stack");
                state.on_stack.remove(&w);
                let is_root = w == *v;
                component.push(w);
                if is_root {
                    break;
                }
            }
            state.components.push(component);
        }
    }
}

#[derive(Default)]
struct TarjanState {
    counter: usize,
    index: FxHashMap<NodeId, usize>,
    lowlink: FxHashMap<NodeId, usize>,
    stack: Vec<NodeId>,
    on_stack: FxHashSet<NodeId>,
    components: Vec<Vec<NodeId>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn n(i: u64) -> NodeId {
        NodeId::int(i)
    }

    fn scc_sets(g: &Graph) -> Vec<FxHashSet<NodeId>> {
        g.strongly_connected_components()
            .into_iter()
            .map(|c| c.into_iter().collect())
            .collect()
    }

    #[test]
    fn acyclic_graph_has_singleton_components() {
        let mut g = Graph::new();
        g.add_edge(n(1), n(2));
        g.add_edge(n(2), n(3));
        let sccs = g.strongly_connected_components();
        assert_eq!(sccs.len(), 3);
        assert!(sccs.iter().all(|c| c.len() == 1));
    }

    #[test]
    fn sinks_come_before_sources() {
        let mut g = Graph::new();
        g.add_edge(n(1), n(2));
        let sccs = g.strongly_connected_components();
        // n(2) has no outgoing edges, so its component completes (and is
        // emitted) before n(1)'s.
        let pos = |id: &NodeId| sccs.iter().position(|c| c.contains(id)).unwrap();
        assert!(pos(&n(2)) < pos(&n(1)));
    }

    #[test]
    fn cycle_collapses_into_one_component() {
        let mut g = Graph::new();
        g.add_edge(n(1), n(2));
        g.add_edge(n(2), n(1));
        let sccs = scc_sets(&g);
        assert_eq!(sccs.len(), 1);
        assert_eq!(sccs[0], [n(1), n(2)].into_iter().collect());
    }

    #[test]
    fn every_vertex_appears_exactly_once() {
        let mut g = Graph::new();
        g.add_edge(n(1), n(2));
        g.add_edge(n(2), n(3));
        g.add_edge(n(3), n(1));
        g.add_edge(n(3), n(4));
        let sccs = g.strongly_connected_components();
        let mut all: Vec<NodeId> = sccs.into_iter().flatten().collect();
        all.sort();
        assert_eq!(all, vec![n(1), n(2), n(3), n(4)]);
    }

    #[test]
    fn duplicate_edges_are_idempotent() {
        let mut g = Graph::new();
        g.add_edge(n(1), n(2));
        g.add_edge(n(1), n(2));
        assert_eq!(g.get_children(&n(1)), &[n(2)]);
    }

    #[test]
    fn invert_reverses_every_edge() {
        let mut g = Graph::new();
        g.add_edge(n(1), n(2));
        g.add_edge(n(1), n(3));
        let inv = g.invert();
        assert_eq!(inv.get_children(&n(2)), &[n(1)]);
        assert_eq!(inv.get_children(&n(3)), &[n(1)]);
        assert!(inv.get_children(&n(1)).is_empty());
    }

    #[test]
    fn dfs_visits_each_reachable_vertex_once() {
        let mut g = Graph::new();
        g.add_edge(n(1), n(2));
        g.add_edge(n(1), n(3));
        g.add_edge(n(2), n(3));
        let mut visited = Vec::new();
        g.dfs(&n(1), |v| visited.push(v.clone()));
        let mut sorted = visited.clone();
        sorted.sort();
        assert_eq!(sorted, vec![n(1), n(2), n(3)]);
        assert_eq!(visited.len(), 3);
    }
}
