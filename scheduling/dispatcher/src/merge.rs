//! Merge policies that combine per-chunk partial results.
//!
//! Every policy folds item outputs into a chunk-private partial on the worker, then merges the
//! partials on the caller's thread in chunk order. For all policies the merged result equals what
//! folding every output serially, in input order, would produce.

use std::{
    collections::{HashMap, hash_map::Entry},
    hash::Hash,
    ops::AddAssign,
};

/// Combines the outputs of a per-item function into one result.
pub trait MergePolicy<O>: Send + Sync + 'static {
    /// Result of one chunk, built on the worker that ran the chunk.
    type Partial: Clone + Send + Sync + 'static;
    /// Result of the whole call.
    type Output;

    /// Creates an empty partial for a chunk of `len` items.
    fn empty(&self, len: usize) -> Self::Partial;

    /// Folds one item output into its chunk's partial. Called in item order.
    fn fold(&self, partial: &mut Self::Partial, output: O);

    /// Merges partials, given in increasing chunk order.
    fn merge(&self, partials: Vec<Self::Partial>) -> Self::Output;

    /// Folds `outputs` serially as one chunk. The reference result for parallel runs.
    fn serial(&self, outputs: impl IntoIterator<Item = O>) -> Self::Output {
        let mut partial = self.empty(0);
        for output in outputs {
            self.fold(&mut partial, output);
        }
        self.merge(vec![partial])
    }
}

/// Ordered concatenation: one output per input item, in input order.
#[derive(Clone, Copy, Debug, Default)]
pub struct Concat;

impl<O: Clone + Send + Sync + 'static> MergePolicy<O> for Concat {
    type Partial = Vec<O>;
    type Output = Vec<O>;

    fn empty(&self, len: usize) -> Vec<O> {
        Vec::with_capacity(len)
    }

    fn fold(&self, partial: &mut Vec<O>, output: O) {
        partial.push(output);
    }

    fn merge(&self, partials: Vec<Vec<O>>) -> Vec<O> {
        let mut merged = Vec::with_capacity(partials.iter().map(Vec::len).sum());
        for partial in partials {
            merged.extend(partial);
        }
        merged
    }
}

/// Ordered concatenation of iterable outputs, used by filters that emit zero or more values per
/// item (e.g. `Option<T>`).
#[derive(Clone, Copy, Debug, Default)]
pub struct Flatten;

impl<O> MergePolicy<O> for Flatten
where
    O: IntoIterator,
    O::Item: Clone + Send + Sync + 'static,
{
    type Partial = Vec<O::Item>;
    type Output = Vec<O::Item>;

    fn empty(&self, len: usize) -> Self::Partial {
        Vec::with_capacity(len)
    }

    fn fold(&self, partial: &mut Self::Partial, output: O) {
        partial.extend(output);
    }

    fn merge(&self, partials: Vec<Self::Partial>) -> Self::Output {
        Concat.merge(partials)
    }
}

/// Commutative accumulation: sums values per key.
///
/// Independent of chunk boundaries and completion order because `+=` is commutative and
/// associative.
#[derive(Clone, Copy, Debug, Default)]
pub struct Accumulate;

impl<K, V> MergePolicy<(K, V)> for Accumulate
where
    K: Eq + Hash + Clone + Send + Sync + 'static,
    V: AddAssign + Clone + Send + Sync + 'static,
{
    type Partial = HashMap<K, V>;
    type Output = HashMap<K, V>;

    fn empty(&self, _len: usize) -> HashMap<K, V> {
        HashMap::new()
    }

    fn fold(&self, partial: &mut HashMap<K, V>, (key, value): (K, V)) {
        match partial.entry(key) {
            Entry::Occupied(mut entry) => *entry.get_mut() += value,
            Entry::Vacant(entry) => {
                entry.insert(value);
            }
        }
    }

    fn merge(&self, partials: Vec<HashMap<K, V>>) -> HashMap<K, V> {
        let mut partials = partials.into_iter();
        let mut merged = partials.next().unwrap_or_default();
        for partial in partials {
            for entry in partial {
                self.fold(&mut merged, entry);
            }
        }
        merged
    }
}

/// Key-generation merge: one value per unique key.
///
/// When a key occurs more than once, the last occurrence in input order wins: later items
/// override earlier ones within a chunk, and the chunk with the highest index wins across chunks.
/// The outcome never depends on completion order.
#[derive(Clone, Copy, Debug, Default)]
pub struct KeepLast;

impl<K, V> MergePolicy<(K, V)> for KeepLast
where
    K: Eq + Hash + Clone + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    type Partial = HashMap<K, V>;
    type Output = HashMap<K, V>;

    fn empty(&self, len: usize) -> HashMap<K, V> {
        HashMap::with_capacity(len)
    }

    fn fold(&self, partial: &mut HashMap<K, V>, (key, value): (K, V)) {
        partial.insert(key, value);
    }

    fn merge(&self, partials: Vec<HashMap<K, V>>) -> HashMap<K, V> {
        let mut partials = partials.into_iter();
        let mut merged = partials.next().unwrap_or_default();
        for partial in partials {
            merged.extend(partial);
        }
        merged
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_concat_preserves_chunk_order() {
        let merged = Concat.merge(vec![vec![1, 2], vec![], vec![3], vec![4, 5]]);
        assert_eq!(merged, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_flatten_drops_empty_outputs() {
        let merged = Flatten.serial(vec![Some("a"), None, Some("b")]);
        assert_eq!(merged, vec!["a", "b"]);
    }

    #[test]
    fn test_accumulate_sums_across_partials() {
        let mut first = Accumulate.empty(0);
        Accumulate.fold(&mut first, ("a", 1));
        Accumulate.fold(&mut first, ("a", 1));
        let mut second = Accumulate.empty(0);
        Accumulate.fold(&mut second, ("a", 1));
        Accumulate.fold(&mut second, ("b", 1));

        let merged = Accumulate.merge(vec![first, second]);
        assert_eq!(merged, HashMap::from([("a", 3), ("b", 1)]));
    }

    #[test]
    fn test_keep_last_prefers_highest_chunk() {
        let merged = KeepLast.merge(vec![
            HashMap::from([("x", 0), ("y", 0)]),
            HashMap::from([("x", 1)]),
            HashMap::from([("x", 2), ("z", 2)]),
        ]);
        assert_eq!(merged, HashMap::from([("x", 2), ("y", 0), ("z", 2)]));
    }

    #[test]
    fn test_keep_last_within_chunk_prefers_later_item() {
        let merged = KeepLast.serial(vec![("k", 1), ("k", 2)]);
        assert_eq!(merged, HashMap::from([("k", 2)]));
    }
}
