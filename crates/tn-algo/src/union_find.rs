//! Disjoint-set forest.
//!
//! One slot per element in `0..n`.  `find` re-points every visited element
//! directly at its root; `union` hangs the smaller tree under the larger one.
//! Together they give near-constant amortized cost per operation.

use crate::{AlgoError, AlgoResult};

/// Union-find over the dense element range `0..n`.
///
/// ```
/// use tn_algo::DisjointSet;
///
/// let mut ds = DisjointSet::new(4);
/// assert!(ds.union(0, 1));
/// assert!(ds.union(2, 3));
/// assert!(!ds.union(1, 0)); // already joined: no-op
/// assert!(ds.same_set(0, 1));
/// assert!(!ds.same_set(1, 2));
/// assert_eq!(ds.set_count(), 2);
/// ```
#[derive(Clone, Debug)]
pub struct DisjointSet {
    parent: Vec<u32>,
    /// Tree size; meaningful only at roots.
    size: Vec<u32>,
    sets: usize,
}

impl DisjointSet {
    /// `n` singleton sets.
    pub fn new(n: usize) -> Self {
        Self {
            parent: (0..n as u32).collect(),
            size: vec![1; n],
            sets: n,
        }
    }

    pub fn len(&self) -> usize {
        self.parent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parent.is_empty()
    }

    /// Number of disjoint sets remaining.
    pub fn set_count(&self) -> usize {
        self.sets
    }

    /// Representative of `x`'s set.
    ///
    /// # Panics
    ///
    /// If `x >= len()`.  Use [`try_find`](Self::try_find) for unchecked input.
    pub fn find(&mut self, x: usize) -> usize {
        let mut root = x;
        while self.parent[root] as usize != root {
            root = self.parent[root] as usize;
        }
        // Compress: second pass re-points the whole chain at the root.
        let mut cur = x;
        while cur != root {
            let next = self.parent[cur] as usize;
            self.parent[cur] = root as u32;
            cur = next;
        }
        root
    }

    /// Merge the sets of `x` and `y`.
    ///
    /// Returns `false` (and changes nothing) if they were already joined.
    ///
    /// # Panics
    ///
    /// If either index is out of range.
    pub fn union(&mut self, x: usize, y: usize) -> bool {
        let rx = self.find(x);
        let ry = self.find(y);
        if rx == ry {
            return false;
        }
        let (big, small) = if self.size[rx] >= self.size[ry] { (rx, ry) } else { (ry, rx) };
        self.parent[small] = big as u32;
        self.size[big] += self.size[small];
        self.sets -= 1;
        true
    }

    pub fn same_set(&mut self, x: usize, y: usize) -> bool {
        self.find(x) == self.find(y)
    }

    /// Number of elements in `x`'s set.
    pub fn set_size(&mut self, x: usize) -> usize {
        let root = self.find(x);
        self.size[root] as usize
    }

    /// Bounds-checked [`find`](Self::find).
    pub fn try_find(&mut self, x: usize) -> AlgoResult<usize> {
        self.check(x)?;
        Ok(self.find(x))
    }

    /// Bounds-checked [`union`](Self::union).
    pub fn try_union(&mut self, x: usize, y: usize) -> AlgoResult<bool> {
        self.check(x)?;
        self.check(y)?;
        Ok(self.union(x, y))
    }

    fn check(&self, x: usize) -> AlgoResult<()> {
        if x < self.parent.len() {
            Ok(())
        } else {
            Err(AlgoError::IndexOutOfRange { index: x, len: self.parent.len() })
        }
    }
}
