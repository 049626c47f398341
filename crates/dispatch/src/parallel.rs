//! Chunked reductions on the rayon pool
//!
//! The buffer is cut into `chunk_len` chunks; each chunk is reduced by the
//! dispatched kernel on a worker thread and yields one partial in its own
//! slot, and the partials are then reduced sequentially. Minimum is
//! independent of scheduling. Sum partials are combined in chunk order, so the
//! result only depends on `chunk_len`, not on which thread ran what.

use log::trace;
use rayon::prelude::*;

use crate::dispatcher::DispatchElement;
use crate::error::{ReduceError, Result};

/// Partitioning for the parallel reducers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParallelConfig {
    /// Elements per task; rounded up to a multiple of 16
    pub chunk_len: usize,

    /// Buffers shorter than this are reduced on the calling thread
    pub min_parallel_len: usize,
}

impl Default for ParallelConfig {
    fn default() -> Self {
        Self {
            chunk_len: 64 * 1024,
            min_parallel_len: 1 << 20,
        }
    }
}

impl ParallelConfig {
    /// Chunk length actually used: at least 16 and a multiple of 16, so every
    /// chunk but the last is a whole number of vectors in every tier
    ///
    /// Lengths too large to round up saturate to the largest multiple of 16.
    pub fn effective_chunk_len(&self) -> usize {
        self.chunk_len
            .max(1)
            .checked_next_multiple_of(16)
            .unwrap_or(usize::MAX & !15)
    }

    fn runs_parallel(&self, len: usize) -> bool {
        len >= self.min_parallel_len && len > self.effective_chunk_len()
    }
}

/// Minimum of `data` computed on the rayon pool
///
/// # Errors
///
/// [`ReduceError::EmptyInput`] if `data` is empty.
///
/// # Example
///
/// ```rust
/// use vreduce::{par_reduce_min, ParallelConfig};
///
/// let data: Vec<i32> = (0..100_000).rev().collect();
/// let config = ParallelConfig { chunk_len: 1000, min_parallel_len: 0 };
/// assert_eq!(par_reduce_min(&data, &config), Ok(0));
/// ```
pub fn par_reduce_min<T: DispatchElement>(data: &[T], config: &ParallelConfig) -> Result<T> {
    if data.is_empty() {
        return Err(ReduceError::EmptyInput);
    }
    let kernels = T::dispatched();
    if !config.runs_parallel(data.len()) {
        trace!("par_reduce_min: {} elements, sequential", data.len());
        return kernels.min(data);
    }

    let chunk_len = config.effective_chunk_len();
    trace!(
        "par_reduce_min: {} elements in {} chunks of {}",
        data.len(),
        data.len().div_ceil(chunk_len),
        chunk_len
    );

    let partials = data
        .par_chunks(chunk_len)
        .map(|chunk| kernels.min(chunk))
        .collect::<Result<Vec<T>>>()?;
    kernels.min(&partials)
}

/// Sum of `data` computed on the rayon pool
///
/// Zero for an empty buffer. Integer sums wrap exactly like [`reduce_sum`];
/// float sums may differ from it by rounding.
///
/// [`reduce_sum`]: crate::reduce_sum
pub fn par_reduce_sum<T: DispatchElement>(data: &[T], config: &ParallelConfig) -> T {
    let kernels = T::dispatched();
    if !config.runs_parallel(data.len()) {
        trace!("par_reduce_sum: {} elements, sequential", data.len());
        return kernels.sum(data);
    }

    let chunk_len = config.effective_chunk_len();
    trace!(
        "par_reduce_sum: {} elements in {} chunks of {}",
        data.len(),
        data.len().div_ceil(chunk_len),
        chunk_len
    );

    let partials: Vec<T> = data
        .par_chunks(chunk_len)
        .map(|chunk| kernels.sum(chunk))
        .collect();
    kernels.sum(&partials)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{reduce_min, reduce_sum};

    fn eager(chunk_len: usize) -> ParallelConfig {
        ParallelConfig {
            chunk_len,
            min_parallel_len: 0,
        }
    }

    #[test]
    fn test_effective_chunk_len() {
        assert_eq!(eager(0).effective_chunk_len(), 16);
        assert_eq!(eager(1).effective_chunk_len(), 16);
        assert_eq!(eager(16).effective_chunk_len(), 16);
        assert_eq!(eager(17).effective_chunk_len(), 32);
        assert_eq!(ParallelConfig::default().effective_chunk_len(), 65536);
        assert_eq!(eager(usize::MAX).effective_chunk_len(), usize::MAX & !15);
        assert_eq!(eager(usize::MAX - 3).effective_chunk_len() % 16, 0);
    }

    #[test]
    fn test_huge_chunk_len_reduces_in_one_pass() {
        let data: Vec<i32> = (0..100).collect();
        let config = eager(usize::MAX);
        assert_eq!(par_reduce_min(&data, &config), Ok(0));
        assert_eq!(par_reduce_sum(&data, &config), 4950);
    }

    #[test]
    fn test_min_matches_sequential() {
        let data: Vec<i32> = (0..50_000)
            .map(|i| ((i * 7919) % 100_003) - 50_000)
            .collect();
        assert_eq!(par_reduce_min(&data, &eager(1000)), reduce_min(&data));
    }

    #[test]
    fn test_min_in_last_partial_chunk() {
        let mut data = vec![500u16; 10_007];
        data[10_006] = 3;
        assert_eq!(par_reduce_min(&data, &eager(64)), Ok(3));
    }

    #[test]
    fn test_sum_matches_sequential_for_integers() {
        let data: Vec<i32> = (0..100_000).collect();
        assert_eq!(par_reduce_sum(&data, &eager(4096)), reduce_sum(&data));
    }

    #[test]
    fn test_empty_and_small_inputs() {
        let config = ParallelConfig::default();
        assert_eq!(par_reduce_min::<f32>(&[], &config), Err(ReduceError::EmptyInput));
        assert_eq!(par_reduce_sum::<f32>(&[], &config), 0.0);
        assert_eq!(par_reduce_sum(&[1, 2, 3], &config), 6);
    }
}
