//! Insertion-ordered set of identifiers.

use ahash::AHashSet;

/// Keeps the first occurrence of each id, in the order ids were first seen.
#[derive(Debug, Clone, Default)]
pub struct OrderedIdSet {
    order: Vec<String>,
    seen: AHashSet<String>,
}

impl OrderedIdSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if the id was not present yet.
    pub fn insert(&mut self, id: impl Into<String>) -> bool {
        let id = id.into();
        if self.seen.contains(&id) {
            return false;
        }
        self.seen.insert(id.clone());
        self.order.push(id);
        true
    }

    pub fn contains(&self, id: &str) -> bool {
        self.seen.contains(id)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn into_vec(self) -> Vec<String> {
        self.order
    }
}

impl<S: Into<String>> FromIterator<S> for OrderedIdSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

impl<S: Into<String>> Extend<S> for OrderedIdSet {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        for id in iter {
            self.insert(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keeps_first_seen_order() {
        let set: OrderedIdSet = ["b", "a", "b", "c", "a"].into_iter().collect();
        assert_eq!(set.into_vec(), vec!["b", "a", "c"]);
    }

    #[test]
    fn test_insert_reports_novelty() {
        let mut set = OrderedIdSet::new();
        assert!(set.insert("EU/3/01/001"));
        assert!(!set.insert("EU/3/01/001"));
        assert!(set.contains("EU/3/01/001"));
        assert_eq!(set.len(), 1);
    }
}
