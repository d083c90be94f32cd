//! Cycle detection over indexed directed graphs.
//!
//! Used to validate the group graph and to re-validate the plugin graph after
//! every edge layer. The search is a depth-first traversal with three vertex
//! states; the first back edge found closes the reported cycle.

use crate::adjacency::Adjacency;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    InProgress,
    Done,
}

/// Finds a cycle in `graph`, if one exists.
///
/// Roots are tried in ascending index order and successors are visited in
/// ascending order, so identical graphs always report the identical cycle.
/// The cycle is returned as the active DFS path from the revisited vertex to
/// the vertex whose edge closes it; the closing edge back to the first element
/// is implied.
///
/// # Example
///
/// ```
/// use loadorder_graph::adjacency::Adjacency;
/// use loadorder_graph::cycle::find_cycle;
///
/// let acyclic = Adjacency::from_edges(3, [(0, 1), (1, 2)]);
/// assert_eq!(find_cycle(&acyclic), None);
///
/// let cyclic = Adjacency::from_edges(4, [(0, 1), (1, 2), (2, 3), (3, 1)]);
/// assert_eq!(find_cycle(&cyclic), Some(vec![1, 2, 3]));
/// ```
#[must_use]
pub fn find_cycle(graph: &Adjacency) -> Option<Vec<usize>> {
    let mut marks = vec![Mark::Unvisited; graph.vertex_count()];
    // Active path as (vertex, index of the next successor to visit).
    let mut path: Vec<(usize, usize)> = Vec::new();

    for root in 0..graph.vertex_count() {
        if marks[root] != Mark::Unvisited {
            continue;
        }
        marks[root] = Mark::InProgress;
        path.push((root, 0));

        while let Some((vertex, cursor)) = path.last_mut() {
            let vertex = *vertex;
            let Some(&next) = graph.successors(vertex).get(*cursor) else {
                marks[vertex] = Mark::Done;
                path.pop();
                continue;
            };
            *cursor += 1;

            match marks[next] {
                Mark::Unvisited => {
                    marks[next] = Mark::InProgress;
                    path.push((next, 0));
                }
                Mark::InProgress => {
                    let start = path.iter().position(|&(v, _)| v == next)?;
                    return Some(path[start..].iter().map(|&(v, _)| v).collect());
                }
                Mark::Done => {}
            }
        }
    }

    None
}

/// Finds a cycle in the graph described by `vertex_count` and `edges`.
///
/// Convenience wrapper around [`find_cycle`] for callers holding a plain edge
/// list.
#[must_use]
pub fn find_cycle_in_edges(
    vertex_count: usize,
    edges: impl IntoIterator<Item = (usize, usize)>,
) -> Option<Vec<usize>> {
    find_cycle(&Adjacency::from_edges(vertex_count, edges))
}
