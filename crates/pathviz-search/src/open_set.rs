use std::cmp::Ordering;

/// Slot value for a node that is not in the heap.
const NOT_QUEUED: usize = usize::MAX;

#[derive(Clone, Copy, Debug)]
struct Entry {
    node: usize,
    priority: f64,
    /// Insertion order; breaks priority ties first-in-first-out.
    seq: u64,
}

impl Entry {
    #[inline]
    fn precedes(&self, other: &Entry) -> bool {
        match self.priority.total_cmp(&other.priority) {
            Ordering::Less => true,
            Ordering::Greater => false,
            Ordering::Equal => self.seq < other.seq,
        }
    }
}

/// Indexed binary min-heap over node indices `0..capacity`.
///
/// Unlike `BinaryHeap`, every node has at most one entry and its position is
/// tracked, so a queued node's priority can be lowered in place.
#[derive(Clone, Debug)]
pub(crate) struct OpenSet {
    heap: Vec<Entry>,
    /// node index -> position in `heap`, or `NOT_QUEUED`.
    slots: Vec<usize>,
    next_seq: u64,
}

impl OpenSet {
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            heap: Vec::new(),
            slots: vec![NOT_QUEUED; capacity],
            next_seq: 0,
        }
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.heap.len()
    }

    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    #[inline]
    pub(crate) fn contains(&self, node: usize) -> bool {
        self.slots.get(node).is_some_and(|&s| s != NOT_QUEUED)
    }

    /// Current priority of a queued node.
    pub(crate) fn priority(&self, node: usize) -> Option<f64> {
        match self.slots.get(node) {
            Some(&s) if s != NOT_QUEUED => Some(self.heap[s].priority),
            _ => None,
        }
    }

    /// Insert `node`. Returns `false` if it is out of range or already queued.
    pub(crate) fn push(&mut self, node: usize, priority: f64) -> bool {
        if node >= self.slots.len() || self.contains(node) {
            return false;
        }
        let pos = self.heap.len();
        self.heap.push(Entry {
            node,
            priority,
            seq: self.next_seq,
        });
        self.next_seq += 1;
        self.slots[node] = pos;
        self.sift_up(pos);
        true
    }

    /// Remove and return the node with the lowest priority.
    pub(crate) fn pop(&mut self) -> Option<(usize, f64)> {
        if self.heap.is_empty() {
            return None;
        }
        let last = self.heap.len() - 1;
        self.swap(0, last);
        let top = self.heap.pop()?;
        self.slots[top.node] = NOT_QUEUED;
        if !self.heap.is_empty() {
            self.sift_down(0);
        }
        Some((top.node, top.priority))
    }

    /// Lower the priority of a queued node. Returns `false` when the node is
    /// not queued or `priority` would not lower it.
    pub(crate) fn decrease(&mut self, node: usize, priority: f64) -> bool {
        let Some(&pos) = self.slots.get(node) else {
            return false;
        };
        if pos == NOT_QUEUED || priority >= self.heap[pos].priority {
            return false;
        }
        self.heap[pos].priority = priority;
        self.sift_up(pos);
        true
    }

    fn sift_up(&mut self, mut pos: usize) {
        while pos > 0 {
            let parent = (pos - 1) / 2;
            if !self.heap[pos].precedes(&self.heap[parent]) {
                break;
            }
            self.swap(pos, parent);
            pos = parent;
        }
    }

    fn sift_down(&mut self, mut pos: usize) {
        let len = self.heap.len();
        loop {
            let left = 2 * pos + 1;
            let right = left + 1;
            let mut best = pos;
            if left < len && self.heap[left].precedes(&self.heap[best]) {
                best = left;
            }
            if right < len && self.heap[right].precedes(&self.heap[best]) {
                best = right;
            }
            if best == pos {
                break;
            }
            self.swap(pos, best);
            pos = best;
        }
    }

    #[inline]
    fn swap(&mut self, a: usize, b: usize) {
        self.heap.swap(a, b);
        self.slots[self.heap[a].node] = a;
        self.slots[self.heap[b].node] = b;
    }
}
