//! Insertion-ordered, duplicate-free collections.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A list that keeps the first occurrence of every element.
///
/// Used for hint fields whose declaration order is meaningful (media types in
/// order of preference) but which must never repeat an element.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct OrderedSet<T> {
    items: Vec<T>,
}

impl<T: PartialEq> OrderedSet<T> {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Append `item` unless it is already present. Returns whether it was added.
    pub fn insert(&mut self, item: T) -> bool {
        if self.items.contains(&item) {
            false
        } else {
            self.items.push(item);
            true
        }
    }

    pub fn contains(&self, item: &T) -> bool {
        self.items.contains(item)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }
}

impl<T: PartialEq + Clone> OrderedSet<T> {
    /// Elements of `self` in order, followed by the elements of `other` not
    /// already present.
    pub fn union(&self, other: &OrderedSet<T>) -> OrderedSet<T> {
        let mut result = self.clone();
        for item in &other.items {
            if !result.contains(item) {
                result.items.push(item.clone());
            }
        }
        result
    }
}

impl<T: PartialEq> Default for OrderedSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: PartialEq> FromIterator<T> for OrderedSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = OrderedSet::new();
        for item in iter {
            set.insert(item);
        }
        set
    }
}

impl<T: PartialEq> From<Vec<T>> for OrderedSet<T> {
    fn from(items: Vec<T>) -> Self {
        items.into_iter().collect()
    }
}

impl<T> IntoIterator for OrderedSet<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a OrderedSet<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<T: fmt::Debug> fmt::Debug for OrderedSet<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(&self.items).finish()
    }
}

impl<T: Serialize> Serialize for OrderedSet<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.items.serialize(serializer)
    }
}

impl<'de, T: Deserialize<'de> + PartialEq> Deserialize<'de> for OrderedSet<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Vec::<T>::deserialize(deserializer).map(OrderedSet::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_drops_duplicates() {
        let mut set = OrderedSet::new();
        assert!(set.insert("text/html"));
        assert!(set.insert("application/json"));
        assert!(!set.insert("text/html"));
        assert_eq!(set.as_slice(), &["text/html", "application/json"]);
    }

    #[test]
    fn from_vec_keeps_first_occurrence() {
        let set = OrderedSet::from(vec![3, 1, 3, 2, 1]);
        assert_eq!(set.as_slice(), &[3, 1, 2]);
    }

    #[test]
    fn union_appends_new_elements_in_order() {
        let a: OrderedSet<_> = ["a", "b"].into_iter().collect();
        let b: OrderedSet<_> = ["c", "a", "d"].into_iter().collect();
        assert_eq!(a.union(&b).as_slice(), &["a", "b", "c", "d"]);
        assert_eq!(b.union(&a).as_slice(), &["c", "a", "d", "b"]);
    }

    #[test]
    fn union_with_empty_is_identity() {
        let a: OrderedSet<_> = ["a", "b"].into_iter().collect();
        assert_eq!(a.union(&OrderedSet::new()), a);
        assert_eq!(OrderedSet::new().union(&a), a);
    }

    #[test]
    fn serde_as_plain_list() {
        let set: OrderedSet<String> = serde_json::from_str(r#"["x", "y", "x"]"#).unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(serde_json::to_string(&set).unwrap(), r#"["x","y"]"#);
    }
}
