//! Circular turn structure used to drive betting order.
//!
//! The ring is an index-based cycle over a slot arena: every node holds a
//! "next" index, the tail's successor is always the head, and node ids stay
//! stable across unrelated deletions. This avoids the aliasing problems of
//! raw mutable successor pointers while keeping all operations the obvious
//! linked-list shape.

use std::collections::BTreeSet;

/// Stable handle to a ring node. Valid until that node is deleted.
pub type NodeId = usize;

#[derive(Clone, Debug)]
struct Slot<T> {
    value: T,
    next: NodeId,
}

#[derive(Clone, Debug)]
pub struct Ring<T> {
    slots: Vec<Option<Slot<T>>>,
    free: Vec<NodeId>,
    head: Option<NodeId>,
    tail: Option<NodeId>,
    len: usize,
}

impl<T> Default for Ring<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Ring<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            head: None,
            tail: None,
            len: 0,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[must_use]
    pub fn head(&self) -> Option<NodeId> {
        self.head
    }

    #[must_use]
    pub fn tail(&self) -> Option<NodeId> {
        self.tail
    }

    /// The node after `id`, wrapping from tail back to head.
    #[must_use]
    pub fn next(&self, id: NodeId) -> Option<NodeId> {
        self.slots.get(id)?.as_ref().map(|slot| slot.next)
    }

    #[must_use]
    pub fn value(&self, id: NodeId) -> Option<&T> {
        self.slots.get(id)?.as_ref().map(|slot| &slot.value)
    }

    pub fn value_mut(&mut self, id: NodeId) -> Option<&mut T> {
        self.slots.get_mut(id)?.as_mut().map(|slot| &mut slot.value)
    }

    fn alloc(&mut self, value: T, next: NodeId) -> NodeId {
        match self.free.pop() {
            Some(id) => {
                self.slots[id] = Some(Slot { value, next });
                id
            }
            None => {
                self.slots.push(Some(Slot { value, next }));
                self.slots.len() - 1
            }
        }
    }

    fn slot(&self, id: NodeId) -> &Slot<T> {
        self.slots[id].as_ref().expect("dangling ring node")
    }

    fn slot_mut(&mut self, id: NodeId) -> &mut Slot<T> {
        self.slots[id].as_mut().expect("dangling ring node")
    }

    /// O(1) insertion before the current head. The new node becomes the
    /// head; the tail's successor is rewired to preserve circularity.
    pub fn insert_head(&mut self, value: T) -> NodeId {
        self.len += 1;
        match (self.head, self.tail) {
            (Some(head), Some(tail)) => {
                let id = self.alloc(value, head);
                self.slot_mut(tail).next = id;
                self.head = Some(id);
                id
            }
            _ => self.insert_first(value),
        }
    }

    /// O(1) insertion after the current tail. The new node becomes the
    /// tail and its successor is the head.
    pub fn insert_tail(&mut self, value: T) -> NodeId {
        self.len += 1;
        match self.tail {
            Some(tail) => {
                let head = self.slot(tail).next;
                let id = self.alloc(value, head);
                self.slot_mut(tail).next = id;
                self.tail = Some(id);
                id
            }
            None => self.insert_first(value),
        }
    }

    fn insert_first(&mut self, value: T) -> NodeId {
        // A single node is its own successor.
        let id = self.alloc(value, 0);
        self.slot_mut(id).next = id;
        self.head = Some(id);
        self.tail = Some(id);
        id
    }

    /// Linear scan for the first node whose key matches `target`.
    ///
    /// `start` defaults to the head; `end` defaults to `start`, making the
    /// scan a full circle. The start node is examined, the end node is not
    /// (except as the start itself).
    pub fn search_by<K, F>(
        &self,
        target: &K,
        start: Option<NodeId>,
        end: Option<NodeId>,
        key: F,
    ) -> Option<NodeId>
    where
        K: PartialEq,
        F: Fn(&T) -> K,
    {
        let start = start.or(self.head)?;
        let end = end.unwrap_or(start);
        let mut current = start;
        loop {
            if key(&self.slot(current).value) == *target {
                return Some(current);
            }
            current = self.slot(current).next;
            if current == end {
                return None;
            }
        }
    }

    /// Removes the first node whose key matches `target`, rewiring its
    /// predecessor and successor. Returns whether a node was removed;
    /// absence is for the caller to judge.
    pub fn delete_by<K, F>(&mut self, target: &K, key: F) -> bool
    where
        K: PartialEq,
        F: Fn(&T) -> K,
    {
        let (Some(head), Some(tail)) = (self.head, self.tail) else {
            return false;
        };

        if key(&self.slot(head).value) == *target {
            if self.len == 1 {
                self.head = None;
                self.tail = None;
            } else {
                let new_head = self.slot(head).next;
                self.slot_mut(tail).next = new_head;
                self.head = Some(new_head);
            }
            self.release(head);
            return true;
        }

        let mut prev = head;
        let mut current = self.slot(head).next;
        while current != head {
            if key(&self.slot(current).value) == *target {
                let next = self.slot(current).next;
                self.slot_mut(prev).next = next;
                if current == tail {
                    self.tail = Some(prev);
                }
                self.release(current);
                return true;
            }
            prev = current;
            current = self.slot(current).next;
        }
        false
    }

    fn release(&mut self, id: NodeId) {
        self.slots[id] = None;
        self.free.push(id);
        self.len -= 1;
    }

    /// Values in rotation order starting at the head.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            ring: self,
            current: self.head,
            remaining: self.len,
        }
    }

    #[must_use]
    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.iter().cloned().collect()
    }

    #[must_use]
    pub fn to_set(&self) -> BTreeSet<T>
    where
        T: Clone + Ord,
    {
        self.iter().cloned().collect()
    }
}

pub struct Iter<'a, T> {
    ring: &'a Ring<T>,
    current: Option<NodeId>,
    remaining: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let id = self.current?;
        let slot = self.ring.slot(id);
        self.current = Some(slot.next);
        Some(&slot.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ring_of(values: &[&str]) -> Ring<String> {
        let mut ring = Ring::new();
        for v in values {
            ring.insert_tail((*v).to_string());
        }
        ring
    }

    #[test]
    fn test_empty_ring() {
        let ring: Ring<String> = Ring::new();
        assert!(ring.is_empty());
        assert_eq!(ring.head(), None);
        assert_eq!(ring.tail(), None);
        assert_eq!(ring.to_vec(), Vec::<String>::new());
    }

    #[test]
    fn test_insert_tail_order_and_wrap() {
        let ring = ring_of(&["a", "b", "c"]);
        assert_eq!(ring.to_vec(), vec!["a", "b", "c"]);

        // Tail's successor is the head.
        let tail = ring.tail().unwrap();
        assert_eq!(ring.next(tail), ring.head());

        // Walking four steps from the head wraps back to "a".
        let mut node = ring.head().unwrap();
        for _ in 0..3 {
            node = ring.next(node).unwrap();
        }
        assert_eq!(node, ring.head().unwrap());
    }

    #[test]
    fn test_insert_head() {
        let mut ring = ring_of(&["b", "c"]);
        ring.insert_head("a".to_string());
        assert_eq!(ring.to_vec(), vec!["a", "b", "c"]);
        let tail = ring.tail().unwrap();
        assert_eq!(ring.next(tail), ring.head());
    }

    #[test]
    fn test_single_node_self_loop() {
        let ring = ring_of(&["a"]);
        let head = ring.head().unwrap();
        assert_eq!(ring.head(), ring.tail());
        assert_eq!(ring.next(head), Some(head));
    }

    #[test]
    fn test_delete_middle_preserves_circularity() {
        let mut ring = ring_of(&["a", "b", "c"]);
        assert!(ring.delete_by(&"b".to_string(), |v| v.clone()));
        assert_eq!(ring.to_vec(), vec!["a", "c"]);
        let tail = ring.tail().unwrap();
        assert_eq!(ring.next(tail), ring.head());
    }

    #[test]
    fn test_delete_head() {
        let mut ring = ring_of(&["a", "b", "c"]);
        assert!(ring.delete_by(&"a".to_string(), |v| v.clone()));
        assert_eq!(ring.to_vec(), vec!["b", "c"]);
        let tail = ring.tail().unwrap();
        assert_eq!(ring.next(tail), ring.head());
    }

    #[test]
    fn test_delete_tail_rewires_tail() {
        let mut ring = ring_of(&["a", "b", "c"]);
        assert!(ring.delete_by(&"c".to_string(), |v| v.clone()));
        assert_eq!(ring.to_vec(), vec!["a", "b"]);
        let tail = ring.tail().unwrap();
        assert_eq!(ring.value(tail), Some(&"b".to_string()));
        assert_eq!(ring.next(tail), ring.head());
    }

    #[test]
    fn test_delete_last_node_empties_ring() {
        let mut ring = ring_of(&["a"]);
        assert!(ring.delete_by(&"a".to_string(), |v| v.clone()));
        assert!(ring.is_empty());
        assert_eq!(ring.head(), None);
        assert_eq!(ring.tail(), None);
    }

    #[test]
    fn test_delete_missing_returns_false() {
        let mut ring = ring_of(&["a", "b"]);
        assert!(!ring.delete_by(&"z".to_string(), |v| v.clone()));
        assert_eq!(ring.len(), 2);
    }

    #[test]
    fn test_search_full_circle() {
        let ring = ring_of(&["a", "b", "c"]);
        let found = ring.search_by(&"c".to_string(), None, None, |v| v.clone());
        assert_eq!(found, ring.tail());
        assert_eq!(
            ring.search_by(&"z".to_string(), None, None, |v| v.clone()),
            None
        );
    }

    #[test]
    fn test_search_from_start_wraps() {
        let ring = ring_of(&["a", "b", "c"]);
        let b = ring.next(ring.head().unwrap()).unwrap();
        // Searching for "a" from "b" has to wrap past the tail.
        let found = ring.search_by(&"a".to_string(), Some(b), None, |v| v.clone());
        assert_eq!(found, ring.head());
    }

    #[test]
    fn test_search_bounded_excludes_end() {
        let ring = ring_of(&["a", "b", "c"]);
        let head = ring.head().unwrap();
        let b = ring.next(head).unwrap();
        // Scan [b, head): "a" lives at the excluded end node.
        let found = ring.search_by(&"a".to_string(), Some(b), Some(head), |v| v.clone());
        assert_eq!(found, None);
    }

    #[test]
    fn test_search_by_key_projection() {
        let mut ring = Ring::new();
        ring.insert_tail((0usize, false));
        ring.insert_tail((1usize, true));
        ring.insert_tail((2usize, false));
        // First node whose flag is true.
        let found = ring.search_by(&true, None, None, |&(_, flag)| flag);
        assert_eq!(ring.value(found.unwrap()), Some(&(1, true)));
    }

    #[test]
    fn test_node_ids_stable_across_deletes() {
        let mut ring = ring_of(&["a", "b", "c"]);
        let c = ring.tail().unwrap();
        ring.delete_by(&"b".to_string(), |v| v.clone());
        assert_eq!(ring.value(c), Some(&"c".to_string()));
    }

    #[test]
    fn test_reinsert_after_empty() {
        let mut ring = ring_of(&["a"]);
        ring.delete_by(&"a".to_string(), |v| v.clone());
        ring.insert_tail("b".to_string());
        assert_eq!(ring.to_vec(), vec!["b"]);
        let head = ring.head().unwrap();
        assert_eq!(ring.next(head), Some(head));
    }
}
