//! Indexed adjacency lists and reachability.
//!
//! Every graph in this crate (groups and plugins) is stored as an
//! [`Adjacency`] over dense vertex indices. Successor lists are kept sorted so
//! that every traversal visits vertices in ascending index order, which is
//! what makes cycle reports and sort output reproducible.

use std::collections::VecDeque;

/// Directed graph over vertices `0..vertex_count`, stored as sorted
/// successor lists without duplicate edges.
///
/// # Example
///
/// ```
/// use loadorder_graph::adjacency::Adjacency;
///
/// let graph = Adjacency::from_edges(3, [(0, 2), (0, 1), (1, 2)]);
///
/// assert_eq!(graph.successors(0), [1, 2]);
/// assert_eq!(graph.shortest_path(0, 2), Some(vec![0, 2]));
/// assert_eq!(graph.shortest_path(2, 0), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Adjacency {
    successors: Vec<Vec<usize>>,
}

impl Adjacency {
    /// Creates a graph with `vertex_count` vertices and no edges.
    #[must_use]
    pub fn new(vertex_count: usize) -> Self {
        Self {
            successors: vec![Vec::new(); vertex_count],
        }
    }

    /// Creates a graph from `(source, target)` pairs.
    ///
    /// # Panics
    ///
    /// Panics if an edge references a vertex outside `0..vertex_count`.
    #[must_use]
    pub fn from_edges(vertex_count: usize, edges: impl IntoIterator<Item = (usize, usize)>) -> Self {
        let mut graph = Self::new(vertex_count);
        for (source, target) in edges {
            graph.add_edge(source, target);
        }
        graph
    }

    /// Returns the number of vertices.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.successors.len()
    }

    /// Returns the number of distinct edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.successors.iter().map(Vec::len).sum()
    }

    /// Adds `source -> target`, returning `false` if the edge already exists.
    ///
    /// # Panics
    ///
    /// Panics if either vertex is out of range.
    pub fn add_edge(&mut self, source: usize, target: usize) -> bool {
        assert!(
            target < self.successors.len(),
            "edge target {target} out of range for {} vertices",
            self.successors.len()
        );

        let list = &mut self.successors[source];
        match list.binary_search(&target) {
            Ok(_) => false,
            Err(position) => {
                list.insert(position, target);
                true
            }
        }
    }

    /// Returns the direct successors of `vertex`, in ascending order.
    #[must_use]
    pub fn successors(&self, vertex: usize) -> &[usize] {
        &self.successors[vertex]
    }

    /// Returns the in-degree of every vertex.
    #[must_use]
    pub fn in_degrees(&self) -> Vec<usize> {
        let mut degrees = vec![0; self.vertex_count()];
        for list in &self.successors {
            for &target in list {
                degrees[target] += 1;
            }
        }
        degrees
    }

    /// Finds the path from `from` to `to` with the fewest edges.
    ///
    /// Breadth-first search over ascending successors, so among equally
    /// short paths the one through lower indices wins. A vertex reaches itself
    /// through the single-element path.
    #[must_use]
    pub fn shortest_path(&self, from: usize, to: usize) -> Option<Vec<usize>> {
        if from == to {
            return Some(vec![from]);
        }

        let mut parent: Vec<Option<usize>> = vec![None; self.vertex_count()];
        let mut queue = VecDeque::from([from]);
        parent[from] = Some(from);

        while let Some(vertex) = queue.pop_front() {
            for &next in self.successors(vertex) {
                if parent[next].is_some() {
                    continue;
                }
                parent[next] = Some(vertex);

                if next == to {
                    let mut path = vec![to];
                    let mut current = to;
                    while current != from {
                        current = parent[current]?;
                        path.push(current);
                    }
                    path.reverse();
                    return Some(path);
                }
                queue.push_back(next);
            }
        }

        None
    }
}

/// Transitive closure of an acyclic [`Adjacency`], one bit row per vertex.
///
/// Bit `b` of row `a` is set when a non-empty path `a ~> b` exists. Rows are
/// packed into `u64` words so that merging descendant sets is word-parallel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Reachability {
    vertex_count: usize,
    words_per_row: usize,
    bits: Vec<u64>,
}

impl Reachability {
    /// Creates an empty closure over `vertex_count` vertices.
    pub(crate) fn new(vertex_count: usize) -> Self {
        let words_per_row = vertex_count.div_ceil(64);
        Self {
            vertex_count,
            words_per_row,
            bits: vec![0; words_per_row * vertex_count],
        }
    }

    /// Computes the closure of an acyclic graph.
    ///
    /// Rows are filled in DFS post-order, so every successor's row is final
    /// before it is merged into its predecessors. The graph must be acyclic.
    pub(crate) fn of_acyclic(graph: &Adjacency) -> Self {
        let vertex_count = graph.vertex_count();
        let mut closure = Self::new(vertex_count);
        let mut done = vec![false; vertex_count];
        let mut stack: Vec<(usize, usize)> = Vec::new();

        for root in 0..vertex_count {
            if done[root] {
                continue;
            }
            stack.push((root, 0));

            while let Some((vertex, cursor)) = stack.last_mut() {
                let vertex = *vertex;
                if let Some(&next) = graph.successors(vertex).get(*cursor) {
                    *cursor += 1;
                    if !done[next] {
                        stack.push((next, 0));
                    }
                    continue;
                }

                stack.pop();
                if done[vertex] {
                    continue;
                }
                for &next in graph.successors(vertex) {
                    closure.insert(vertex, next);
                    closure.merge_row(vertex, next);
                }
                done[vertex] = true;
            }
        }

        closure
    }

    /// Returns whether a path `from ~> to` exists.
    pub(crate) fn reaches(&self, from: usize, to: usize) -> bool {
        let word = self.bits[from * self.words_per_row + to / 64];
        word & (1 << (to % 64)) != 0
    }

    /// Returns whether `a` and `b` are ordered by a path in either direction.
    pub(crate) fn orders(&self, a: usize, b: usize) -> bool {
        self.reaches(a, b) || self.reaches(b, a)
    }

    /// Records the edge `source -> target` and every path it creates.
    ///
    /// `target` must not already reach `source`.
    pub(crate) fn add_edge(&mut self, source: usize, target: usize) {
        let mut delta = self.row(target).to_vec();
        delta[target / 64] |= 1 << (target % 64);

        for vertex in 0..self.vertex_count {
            if vertex == source || self.reaches(vertex, source) {
                self.merge_words(vertex, &delta);
            }
        }
    }

    /// Returns the descendant set of `vertex`.
    pub(crate) fn descendants(&self, vertex: usize) -> Vec<u64> {
        self.row(vertex).to_vec()
    }

    /// Returns the descendant set of `vertex` plus `vertex` itself.
    pub(crate) fn row_with_self(&self, vertex: usize) -> Vec<u64> {
        let mut row = self.row(vertex).to_vec();
        row[vertex / 64] |= 1 << (vertex % 64);
        row
    }

    /// Merges `words` into the descendant set of `vertex`.
    pub(crate) fn merge_words(&mut self, vertex: usize, words: &[u64]) {
        let start = vertex * self.words_per_row;
        for (dst, src) in self.bits[start..start + self.words_per_row]
            .iter_mut()
            .zip(words)
        {
            *dst |= *src;
        }
    }

    fn row(&self, vertex: usize) -> &[u64] {
        let start = vertex * self.words_per_row;
        &self.bits[start..start + self.words_per_row]
    }

    fn insert(&mut self, from: usize, to: usize) {
        self.bits[from * self.words_per_row + to / 64] |= 1 << (to % 64);
    }

    fn merge_row(&mut self, dst: usize, src: usize) {
        let words = self.row(src).to_vec();
        self.merge_words(dst, &words);
    }
}

/// Returns whether bit `index` is set in a packed row.
pub(crate) fn row_contains(words: &[u64], index: usize) -> bool {
    words[index / 64] & (1 << (index % 64)) != 0
}
