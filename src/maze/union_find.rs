use std::collections::HashMap;

use super::Cell;

/// Tracks which cells belong to the same connected component while the
/// spanning tree is carved.
///
/// Parent pointers are created lazily: the first lookup of an unseen cell
/// makes it its own root. Lookups flatten the chain they walked; there is no
/// rank or size bookkeeping.
pub struct DisjointSet {
    parent: HashMap<Cell, Cell>,
}

impl DisjointSet {
    pub fn new() -> Self {
        DisjointSet {
            parent: HashMap::new(),
        }
    }

    /// Returns the representative cell of `cell`'s component.
    pub fn find(&mut self, cell: Cell) -> Cell {
        self.parent.entry(cell).or_insert(cell);

        // Walk to the root: the cell that is its own parent
        let mut root = cell;
        while self.parent[&root] != root {
            root = self.parent[&root];
        }

        // Flatten the walked chain so later lookups are short
        let mut walk = cell;
        while walk != root {
            let next = self.parent[&walk];
            self.parent.insert(walk, root);
            walk = next;
        }

        root
    }

    /// Merges the components of `a` and `b`.
    /// Returns true if two distinct components were merged, false if the
    /// cells already shared a root.
    pub fn union(&mut self, a: Cell, b: Cell) -> bool {
        let root_a = self.find(a);
        let root_b = self.find(b);

        if root_a == root_b {
            return false;
        }
        self.parent.insert(root_b, root_a);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_is_lazy_and_idempotent() {
        let mut set = DisjointSet::new();
        let cell = Cell::new(4, 2);
        // First lookup of an unseen cell makes it its own root
        assert_eq!(set.find(cell), cell);
        // Repeated lookups without intervening unions are stable
        assert_eq!(set.find(cell), cell);
        assert_eq!(set.find(cell), cell);
    }

    #[test]
    fn test_union_with_self_is_a_no_op() {
        let mut set = DisjointSet::new();
        let cell = Cell::new(0, 0);
        assert!(!set.union(cell, cell));
    }

    #[test]
    fn test_union_merges_once() {
        let mut set = DisjointSet::new();
        let a = Cell::new(0, 0);
        let b = Cell::new(0, 1);
        assert!(set.union(a, b));
        // Second union of the same pair finds a shared root
        assert!(!set.union(a, b));
        assert!(!set.union(b, a));
        assert_eq!(set.find(a), set.find(b));
    }

    #[test]
    fn test_union_is_transitive() {
        let mut set = DisjointSet::new();
        let a = Cell::new(0, 0);
        let b = Cell::new(1, 0);
        let c = Cell::new(2, 0);
        assert!(set.union(a, b));
        assert!(set.union(b, c));
        assert!(!set.union(a, c));
        assert_eq!(set.find(a), set.find(c));
    }

    #[test]
    fn test_find_flattens_chains() {
        let mut set = DisjointSet::new();
        let cells: Vec<Cell> = (0..6).map(|x| Cell::new(x, 0)).collect();
        for pair in cells.windows(2) {
            set.union(pair[0], pair[1]);
        }
        let root = set.find(cells[0]);
        // After a lookup, every walked cell points straight at the root
        let deep = set.find(cells[5]);
        assert_eq!(deep, root);
        assert_eq!(set.parent[&cells[5]], root);
    }
}
