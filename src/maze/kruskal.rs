use rand::{Rng, rngs::StdRng};

use super::{Cell, Edge, union_find::DisjointSet};

/// Collect every candidate edge of the grid graph: for each cell, the edge to
/// its right neighbor and the edge to its neighbor below, so each adjacent
/// pair appears exactly once. Weights are uniform random draws.
fn candidate_edges(width: u8, height: u8, rng: &mut StdRng) -> Vec<Edge> {
    let cell_count = width as usize * height as usize;
    let mut edges = Vec::with_capacity(2 * cell_count);
    for y in 0..height {
        for x in 0..width {
            let cell = Cell::new(x, y);
            if x + 1 < width {
                edges.push(Edge {
                    a: cell,
                    b: Cell::new(x + 1, y),
                    weight: rng.random(),
                });
            }
            if y + 1 < height {
                edges.push(Edge {
                    a: cell,
                    b: Cell::new(x, y + 1),
                    weight: rng.random(),
                });
            }
        }
    }
    edges
}

/// Carve a spanning tree over the `width` x `height` grid.
///
/// Considers every candidate edge once, heaviest first (minimality is not
/// required here, only a consistent total order; the stable sort keeps equal
/// weights in creation order). An edge that merges two components becomes a
/// passage; an edge whose endpoints are already connected becomes a wall.
///
/// Returns `(passages, walls)` with `passages.len() == width * height - 1`.
pub fn carve(width: u8, height: u8, rng: &mut StdRng) -> (Vec<Edge>, Vec<Edge>) {
    let candidates = {
        let mut edges = candidate_edges(width, height, rng);
        edges.sort_by_key(|edge| std::cmp::Reverse(edge.weight));
        edges
    };

    let mut set = DisjointSet::new();
    let mut passages = Vec::with_capacity(width as usize * height as usize - 1);
    let mut walls = Vec::new();
    for edge in candidates {
        if set.union(edge.a, edge.b) {
            passages.push(edge);
        } else {
            walls.push(edge);
        }
    }
    (passages, walls)
}
