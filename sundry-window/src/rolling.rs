//! Fixed-capacity FIFO buffer.

use std::collections::vec_deque::{self, VecDeque};

/// A bounded buffer that discards its oldest item when full.
///
/// A window with capacity 0 accepts pushes but never retains anything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RollingWindow<T> {
    items: VecDeque<T>,
    capacity: usize,
}

impl<T> RollingWindow<T> {
    /// Create an empty window holding at most `capacity` items.
    pub fn new(capacity: usize) -> Self {
        Self {
            items: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append an item, returning the oldest one if it was evicted.
    pub fn push(&mut self, item: T) -> Option<T> {
        if self.capacity == 0 {
            return Some(item);
        }
        let evicted = if self.items.len() == self.capacity {
            self.items.pop_front()
        } else {
            None
        };
        self.items.push_back(item);
        evicted
    }

    /// Append every item in order.
    pub fn push_all<I: IntoIterator<Item = T>>(&mut self, items: I) {
        for item in items {
            self.push(item);
        }
    }

    /// Iterate oldest to newest.
    pub fn iter(&self) -> vec_deque::Iter<'_, T> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// True once `capacity` items are retained.
    pub fn is_full(&self) -> bool {
        self.items.len() == self.capacity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// The most recently pushed item.
    pub fn latest(&self) -> Option<&T> {
        self.items.back()
    }

    /// The oldest retained item.
    pub fn oldest(&self) -> Option<&T> {
        self.items.front()
    }
}

impl<T: Clone> RollingWindow<T> {
    /// Copy the retained items, oldest first.
    pub fn to_vec(&self) -> Vec<T> {
        self.items.iter().cloned().collect()
    }
}

impl<T: Copy + Into<f64>> RollingWindow<T> {
    /// Sum of the retained items, `None` when empty.
    pub fn sum(&self) -> Option<f64> {
        if self.items.is_empty() {
            return None;
        }
        Some(self.items.iter().map(|&v| v.into()).sum())
    }

    /// Mean of the retained items, `None` when empty.
    pub fn average(&self) -> Option<f64> {
        self.sum().map(|sum| sum / self.items.len() as f64)
    }
}

impl<T> Extend<T> for RollingWindow<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.push_all(iter);
    }
}

impl<'a, T> IntoIterator for &'a RollingWindow<T> {
    type Item = &'a T;
    type IntoIter = vec_deque::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn average_of_last(values: &[i32], capacity: usize) -> f64 {
        let tail = &values[values.len().saturating_sub(capacity)..];
        tail.iter().map(|&v| v as f64).sum::<f64>() / tail.len() as f64
    }

    #[test]
    fn partially_filled_window_averages_everything() {
        let values = [5, 7, 10];
        let mut window = RollingWindow::new(10);
        window.push_all(values);
        assert_eq!(window.average(), Some(average_of_last(&values, 10)));
        assert!(!window.is_full());
    }

    #[test]
    fn exactly_full_window() {
        let values = [5, 7, 10, 2, 6, 3, 5, 1, 2, 3];
        let mut window = RollingWindow::new(10);
        window.push_all(values);
        assert!(window.is_full());
        assert_eq!(window.average(), Some(average_of_last(&values, 10)));
    }

    #[test]
    fn overflow_keeps_last_capacity_items() {
        let values = [5, 7, 10, 2, 6, 3, 5, 1, 2, 3, 4, 7];
        let mut window = RollingWindow::new(10);
        window.push_all(values);

        assert_eq!(window.len(), 10);
        assert_eq!(window.oldest(), Some(&10));
        assert_eq!(window.latest(), Some(&7));
        assert_eq!(window.average(), Some(average_of_last(&values, 10)));
        assert_eq!(window.sum(), Some(43.0));
    }

    #[test]
    fn push_returns_evicted_item() {
        let mut window = RollingWindow::new(2);
        assert_eq!(window.push("a"), None);
        assert_eq!(window.push("b"), None);
        assert_eq!(window.push("c"), Some("a"));
        assert_eq!(window.to_vec(), vec!["b", "c"]);
    }

    #[test]
    fn zero_capacity_holds_nothing() {
        let mut window = RollingWindow::new(0);
        assert_eq!(window.push(1u8), Some(1));
        assert!(window.is_empty());
        assert_eq!(window.average(), None);
    }

    #[test]
    fn extend_and_iterate_in_order() {
        let mut window = RollingWindow::new(3);
        window.extend(1..=5u32);
        let seen: Vec<u32> = (&window).into_iter().copied().collect();
        assert_eq!(seen, vec![3, 4, 5]);
        assert_eq!(window.iter().count(), 3);

        window.clear();
        assert!(window.is_empty());
        assert_eq!(window.capacity(), 3);
    }
}
