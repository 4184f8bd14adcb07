//! Binary min-heap over dense indices with decrease-key.
//!
//! `std::collections::BinaryHeap` has no decrease-key, so Dijkstra built on
//! it pushes duplicates and skips stale entries on pop.  This heap tracks the
//! slot of every item instead, so each vertex is queued at most once and a
//! better tentative distance sifts the existing entry up in O(log n).
//!
//! Equal keys pop in ascending item order.

/// Sentinel slot for "not in the heap".
const ABSENT: usize = usize::MAX;

/// Min-heap of items `0..capacity` keyed by `f64`.
#[derive(Clone, Debug)]
pub struct IndexedMinHeap {
    /// Heap-ordered items.
    heap: Vec<usize>,
    /// `slot[item]` = position of `item` in `heap`, or `ABSENT`.
    slot: Vec<usize>,
    key:  Vec<f64>,
}

impl IndexedMinHeap {
    /// An empty heap accepting items in `0..capacity`.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            heap: Vec::new(),
            slot: vec![ABSENT; capacity],
            key:  vec![f64::INFINITY; capacity],
        }
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    #[inline]
    pub fn contains(&self, item: usize) -> bool {
        self.slot[item] != ABSENT
    }

    /// Current key of a queued item.
    pub fn key(&self, item: usize) -> Option<f64> {
        self.contains(item).then(|| self.key[item])
    }

    /// Insert `item`, or lower its key if it is queued with a larger one.
    ///
    /// Returns `true` if the heap changed.  A key that is not smaller than
    /// the queued one is ignored.
    pub fn push_or_decrease(&mut self, item: usize, key: f64) -> bool {
        if self.contains(item) {
            if key.total_cmp(&self.key[item]).is_ge() {
                return false;
            }
            self.key[item] = key;
            self.sift_up(self.slot[item]);
        } else {
            self.key[item] = key;
            self.slot[item] = self.heap.len();
            self.heap.push(item);
            self.sift_up(self.heap.len() - 1);
        }
        true
    }

    /// Remove and return the item with the smallest key.
    pub fn pop(&mut self) -> Option<(usize, f64)> {
        let last = self.heap.len().checked_sub(1)?;
        self.swap(0, last);
        let item = self.heap.pop()?;
        self.slot[item] = ABSENT;
        if !self.heap.is_empty() {
            self.sift_down(0);
        }
        Some((item, self.key[item]))
    }

    // ── Internals ─────────────────────────────────────────────────────────

    #[inline]
    fn less(&self, i: usize, j: usize) -> bool {
        let (a, b) = (self.heap[i], self.heap[j]);
        self.key[a].total_cmp(&self.key[b]).then(a.cmp(&b)).is_lt()
    }

    #[inline]
    fn swap(&mut self, i: usize, j: usize) {
        self.heap.swap(i, j);
        self.slot[self.heap[i]] = i;
        self.slot[self.heap[j]] = j;
    }

    fn sift_up(&mut self, mut i: usize) {
        while i > 0 {
            let parent = (i - 1) / 2;
            if !self.less(i, parent) {
                break;
            }
            self.swap(i, parent);
            i = parent;
        }
    }

    fn sift_down(&mut self, mut i: usize) {
        let n = self.heap.len();
        loop {
            let left = 2 * i + 1;
            if left >= n {
                break;
            }
            let right = left + 1;
            let child = if right < n && self.less(right, left) { right } else { left };
            if !self.less(child, i) {
                break;
            }
            self.swap(i, child);
            i = child;
        }
    }
}
