//! Chunking of bulk writes.

use airtable_error::{AirtableResult, ConfigError};

/// Largest number of records the service accepts in one write request.
pub const MAX_BATCH_SIZE: usize = 10;

/// Ordered split of a record list into bounded chunks.
///
/// Chunks concatenate back to the input, order preserved. Every chunk but
/// the last holds exactly `chunk_size` items; the last holds the remainder.
/// Empty input produces no chunks at all.
///
/// # Examples
///
/// ```
/// use airtable_core::BatchPlan;
///
/// let plan = BatchPlan::plan((0..23).collect::<Vec<_>>(), 10).unwrap();
/// let sizes: Vec<usize> = plan.chunks().iter().map(Vec::len).collect();
/// assert_eq!(sizes, [10, 10, 3]);
///
/// assert!(BatchPlan::<u8>::plan(Vec::new(), 10).unwrap().is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchPlan<T> {
    chunks: Vec<Vec<T>>,
}

impl<T> BatchPlan<T> {
    /// Split `items` into chunks of at most `chunk_size`.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when `chunk_size` is zero.
    #[track_caller]
    pub fn plan(items: Vec<T>, chunk_size: usize) -> AirtableResult<Self> {
        if chunk_size == 0 {
            return Err(ConfigError::new("Batch size must be greater than zero").into());
        }

        Ok(Self::split(items, chunk_size))
    }

    /// Split `items` with the service ceiling of [`MAX_BATCH_SIZE`].
    pub fn with_default_size(items: Vec<T>) -> Self {
        Self::split(items, MAX_BATCH_SIZE)
    }

    fn split(items: Vec<T>, chunk_size: usize) -> Self {
        let mut chunks = Vec::with_capacity(items.len().div_ceil(chunk_size));
        let mut items = items.into_iter().peekable();
        while items.peek().is_some() {
            chunks.push(items.by_ref().take(chunk_size).collect());
        }
        Self { chunks }
    }

    /// The planned chunks, in submission order.
    pub fn chunks(&self) -> &[Vec<T>] {
        &self.chunks
    }

    /// Number of chunks.
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    /// True when there is nothing to submit.
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }
}

impl<T> IntoIterator for BatchPlan<T> {
    type Item = Vec<T>;
    type IntoIter = std::vec::IntoIter<Vec<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.chunks.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn zero_chunk_size_is_rejected() {
        assert!(BatchPlan::plan(vec![1, 2, 3], 0).is_err());
    }

    #[test]
    fn exact_multiple_has_no_trailing_chunk() {
        let plan = BatchPlan::plan((0..20).collect(), 10).unwrap();
        assert_eq!(plan.len(), 2);
        assert!(plan.chunks().iter().all(|c| c.len() == 10));
    }

    #[test]
    fn default_size_matches_service_ceiling() {
        let plan = BatchPlan::with_default_size((0..11).collect::<Vec<u32>>());
        assert_eq!(plan.chunks()[0].len(), MAX_BATCH_SIZE);
        assert_eq!(plan.chunks()[1], vec![10]);
    }

    proptest! {
        #[test]
        fn chunks_cover_input_in_order(items in proptest::collection::vec(any::<u32>(), 0..200), size in 1usize..25) {
            let plan = BatchPlan::plan(items.clone(), size).unwrap();

            prop_assert_eq!(plan.len(), items.len().div_ceil(size));
            prop_assert!(plan.chunks().iter().all(|c| !c.is_empty() && c.len() <= size));

            let (last, init) = match plan.chunks().split_last() {
                Some(parts) => parts,
                None => {
                    prop_assert!(items.is_empty());
                    return Ok(());
                }
            };
            prop_assert!(init.iter().all(|c| c.len() == size));
            prop_assert!(!last.is_empty());

            let rejoined: Vec<u32> = plan.into_iter().flatten().collect();
            prop_assert_eq!(rejoined, items);
        }
    }
}
