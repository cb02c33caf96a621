//! Priority insertion
//!
//! Providers are not sorted by priority. Walking the providers in their
//! original order, one without a priority is appended and one with priority
//! `P` is inserted at index `min(P, len)` of the sequence built so far. A
//! later claimant of an occupied index therefore pushes the earlier one
//! right, and a priority beyond the current length behaves like an append.

use crate::types::ProviderDescriptor;

/// Race order of `providers`
pub fn priority_order(providers: &[ProviderDescriptor]) -> Vec<&ProviderDescriptor> {
    insert_by_priority(providers.iter().map(|provider| (provider, provider.priority())))
}

/// Priority insertion over arbitrary items
pub fn insert_by_priority<T>(items: impl IntoIterator<Item = (T, Option<usize>)>) -> Vec<T> {
    let mut ordered = Vec::new();
    for (item, priority) in items {
        match priority {
            Some(index) => {
                let index = index.min(ordered.len());
                ordered.insert(index, item);
            }
            None => ordered.push(item),
        }
    }
    ordered
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order(items: &[(&'static str, Option<usize>)]) -> Vec<&'static str> {
        insert_by_priority(items.iter().copied())
    }

    #[test]
    fn test_no_priorities_keep_natural_order() {
        assert_eq!(order(&[("a", None), ("b", None), ("c", None)]), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_priority_zero_moves_to_front() {
        assert_eq!(order(&[("a", None), ("b", None), ("c", Some(0))]), vec!["c", "a", "b"]);
    }

    #[test]
    fn test_colliding_priorities_later_claimant_first() {
        assert_eq!(
            order(&[("x", None), ("a", Some(0)), ("b", Some(0))]),
            vec!["b", "a", "x"]
        );
        assert_eq!(
            order(&[("a", Some(1)), ("b", Some(1)), ("c", Some(1))]),
            vec!["a", "c", "b"]
        );
    }

    #[test]
    fn test_sparse_priorities_clamp_to_length() {
        assert_eq!(
            order(&[("a", Some(5)), ("b", None), ("c", Some(2))]),
            vec!["a", "b", "c"]
        );
        assert_eq!(
            order(&[("a", Some(9)), ("b", Some(0)), ("c", Some(9))]),
            vec!["b", "a", "c"]
        );
    }

    #[test]
    fn test_unprioritized_appended_after_preceding_insertions() {
        assert_eq!(
            order(&[("a", None), ("b", None), ("c", Some(1)), ("d", None)]),
            vec!["a", "c", "b", "d"]
        );
    }

    #[test]
    fn test_priority_order_on_descriptors() {
        let providers = vec![
            ProviderDescriptor::new("slow", "GET", "https://a.test", "/", "application/json"),
            ProviderDescriptor::new("fast", "GET", "https://b.test", "/", "application/json")
                .with_priority(0),
        ];

        let names: Vec<&str> = priority_order(&providers).iter().map(|p| p.name()).collect();
        assert_eq!(names, vec!["fast", "slow"]);
    }
}
