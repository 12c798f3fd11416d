//! Records split into independent output partitions.

/// A collection of records divided into partitions, each one unit of
/// downstream work.
#[derive(Debug, Clone, PartialEq)]
pub struct Partitioned<T> {
    partitions: Vec<Vec<T>>,
}

impl<T> Partitioned<T> {
    /// Wrap existing partitions as they are.
    pub fn from_partitions(partitions: Vec<Vec<T>>) -> Self {
        Self { partitions }
    }

    /// Deal records round-robin into `count` partitions.
    ///
    /// Partition sizes differ by at most one. Records are never dropped: a
    /// zero `count` with records present still yields one partition.
    pub fn repartition(records: Vec<T>, count: usize) -> Self {
        let count = if records.is_empty() { count } else { count.max(1) };
        let per_partition = records.len().div_ceil(count.max(1));
        let mut partitions: Vec<Vec<T>> = (0..count)
            .map(|_| Vec::with_capacity(per_partition))
            .collect();

        for (i, record) in records.into_iter().enumerate() {
            partitions[i % count].push(record);
        }
        Self { partitions }
    }

    /// Redistribute into a different number of partitions.
    pub fn reshuffle(self, count: usize) -> Self {
        Self::repartition(self.into_records(), count)
    }

    pub fn num_partitions(&self) -> usize {
        self.partitions.len()
    }

    /// Total number of records.
    pub fn len(&self) -> usize {
        self.partitions.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn partition(&self, index: usize) -> Option<&[T]> {
        self.partitions.get(index).map(Vec::as_slice)
    }

    pub fn partitions(&self) -> &[Vec<T>] {
        &self.partitions
    }

    /// Number of records in each partition.
    pub fn sizes(&self) -> Vec<usize> {
        self.partitions.iter().map(Vec::len).collect()
    }

    /// Every record, partition by partition.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.partitions.iter().flatten()
    }

    pub fn into_records(self) -> Vec<T> {
        self.partitions.into_iter().flatten().collect()
    }

    pub fn into_partitions(self) -> Vec<Vec<T>> {
        self.partitions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_robin_balance() {
        let parts = Partitioned::repartition((0..50).collect(), 16);
        assert_eq!(parts.num_partitions(), 16);
        assert_eq!(parts.len(), 50);

        let sizes = parts.sizes();
        assert_eq!(sizes.iter().max().unwrap() - sizes.iter().min().unwrap(), 1);
        assert_eq!(parts.partition(0).unwrap(), &[0, 16, 32, 48]);
    }

    #[test]
    fn test_skewed_input_is_rebalanced() {
        // One huge partition and one tiny one
        let skewed = Partitioned::from_partitions(vec![(0..100).collect(), vec![100]]);
        let balanced = skewed.reshuffle(32);
        assert_eq!(balanced.len(), 101);
        assert!(balanced.sizes().iter().all(|&n| n == 3 || n == 4));
    }

    #[test]
    fn test_empty_and_zero() {
        let empty: Partitioned<u8> = Partitioned::repartition(vec![], 0);
        assert_eq!(empty.num_partitions(), 0);
        assert!(empty.is_empty());

        let kept = Partitioned::repartition(vec![1, 2, 3], 0);
        assert_eq!(kept.num_partitions(), 1);
        assert_eq!(kept.into_records(), vec![1, 2, 3]);
    }

    #[test]
    fn test_more_partitions_than_records() {
        let parts = Partitioned::repartition(vec!['a', 'b'], 5);
        assert_eq!(parts.sizes(), vec![1, 1, 0, 0, 0]);
    }
}
