use std::collections::HashMap;

use crate::verb::eigenverb::{BoundaryField, Eigenverb, RayOrigin};

/// Accumulated eigenverbs for one wavefront run, partitioned by
/// (ray origin, boundary).
///
/// Append-only while collisions are being notified; read-only while the
/// reverberation curve is computed. Individual records are never removed,
/// the store is only cleared wholesale between runs.
#[derive(Debug, Default)]
pub struct EigenverbStore {
    partitions: HashMap<(RayOrigin, BoundaryField), Vec<Eigenverb>>,
}

impl EigenverbStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an eigenverb to the partition for (origin, boundary).
    pub fn append(&mut self, origin: RayOrigin, boundary: BoundaryField, verb: Eigenverb) {
        self.partitions
            .entry((origin, boundary))
            .or_default()
            .push(verb);
    }

    /// Records of one partition, in insertion order.
    pub fn slice(&self, origin: RayOrigin, boundary: BoundaryField) -> &[Eigenverb] {
        self.partitions
            .get(&(origin, boundary))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Iterates one partition in insertion order. The iterator is finite
    /// and can be restarted by calling this again.
    pub fn iter(
        &self,
        origin: RayOrigin,
        boundary: BoundaryField,
    ) -> impl Iterator<Item = &Eigenverb> {
        self.slice(origin, boundary).iter()
    }

    /// Number of records in one partition.
    pub fn len(&self, origin: RayOrigin, boundary: BoundaryField) -> usize {
        self.slice(origin, boundary).len()
    }

    /// Total number of records across all partitions.
    pub fn total_len(&self) -> usize {
        self.partitions.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total_len() == 0
    }

    /// Drops all partitions. Used between independent runs.
    pub fn clear(&mut self) {
        self.partitions.clear();
    }

    /// Moves all records of `other` into this store, preserving each
    /// partition's insertion order. Lets parallel tracer workers fill
    /// private stores and combine them at a synchronization point.
    pub fn merge(&mut self, other: EigenverbStore) {
        for (key, mut verbs) in other.partitions {
            self.partitions.entry(key).or_default().append(&mut verbs);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seq::FrequencyGrid;
    use crate::verb::eigenverb::tests::sample_verb;
    use std::sync::Arc;

    fn verb(time: f64) -> Eigenverb {
        let mut v = sample_verb(Arc::new(FrequencyGrid::linear(100.0, 100.0, 4)));
        v.time = time;
        v
    }

    #[test]
    fn test_append_and_slice() {
        let mut store = EigenverbStore::new();
        store.append(RayOrigin::Source, BoundaryField::Surface, verb(1.0));
        store.append(RayOrigin::Source, BoundaryField::Surface, verb(2.0));

        let recs = store.slice(RayOrigin::Source, BoundaryField::Surface);
        assert_eq!(recs.len(), 2);
        // Insertion order preserved
        assert!((recs[0].time - 1.0).abs() < 1e-12);
        assert!((recs[1].time - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_partitions_are_independent() {
        let mut store = EigenverbStore::new();
        store.append(RayOrigin::Source, BoundaryField::Surface, verb(1.0));
        store.append(RayOrigin::Receiver, BoundaryField::Surface, verb(2.0));
        store.append(RayOrigin::Source, BoundaryField::Bottom, verb(3.0));

        assert_eq!(store.len(RayOrigin::Source, BoundaryField::Surface), 1);
        assert_eq!(store.len(RayOrigin::Receiver, BoundaryField::Surface), 1);
        assert_eq!(store.len(RayOrigin::Source, BoundaryField::Bottom), 1);
        assert_eq!(store.len(RayOrigin::Receiver, BoundaryField::Bottom), 0);
        assert_eq!(store.total_len(), 3);
    }

    #[test]
    fn test_volume_layers_keyed_separately() {
        let mut store = EigenverbStore::new();
        store.append(RayOrigin::Source, BoundaryField::Volume(0), verb(1.0));
        store.append(RayOrigin::Source, BoundaryField::Volume(1), verb(2.0));

        assert_eq!(store.len(RayOrigin::Source, BoundaryField::Volume(0)), 1);
        assert_eq!(store.len(RayOrigin::Source, BoundaryField::Volume(1)), 1);
    }

    #[test]
    fn test_iter_is_restartable() {
        let mut store = EigenverbStore::new();
        store.append(RayOrigin::Source, BoundaryField::Bottom, verb(1.0));
        store.append(RayOrigin::Source, BoundaryField::Bottom, verb(2.0));

        let first: Vec<f64> = store
            .iter(RayOrigin::Source, BoundaryField::Bottom)
            .map(|v| v.time)
            .collect();
        let second: Vec<f64> = store
            .iter(RayOrigin::Source, BoundaryField::Bottom)
            .map(|v| v.time)
            .collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_clear() {
        let mut store = EigenverbStore::new();
        store.append(RayOrigin::Source, BoundaryField::Surface, verb(1.0));
        assert!(!store.is_empty());
        store.clear();
        assert!(store.is_empty());
    }

    #[test]
    fn test_merge_preserves_order() {
        let mut a = EigenverbStore::new();
        a.append(RayOrigin::Source, BoundaryField::Surface, verb(1.0));

        let mut b = EigenverbStore::new();
        b.append(RayOrigin::Source, BoundaryField::Surface, verb(2.0));
        b.append(RayOrigin::Receiver, BoundaryField::Bottom, verb(3.0));

        a.merge(b);
        let recs = a.slice(RayOrigin::Source, BoundaryField::Surface);
        assert_eq!(recs.len(), 2);
        assert!((recs[0].time - 1.0).abs() < 1e-12);
        assert!((recs[1].time - 2.0).abs() < 1e-12);
        assert_eq!(a.len(RayOrigin::Receiver, BoundaryField::Bottom), 1);
    }
}
