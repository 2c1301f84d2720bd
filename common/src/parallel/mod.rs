//! Row-aligned parallel chunking.
//!
//! Splits a flat row-major buffer into disjoint mutable chunks made of whole
//! rows, so each rayon task owns a contiguous range of rows. A "row" is any
//! fixed-length run of elements: an image row, or a whole plane of a volume.

use rayon::prelude::*;


/// Multiplier for number of chunks relative to CPU threads.
/// Using 3x threads provides good load balancing when some chunks finish faster.
const CHUNKS_PER_THREAD: usize = 3;

/// Rows per chunk when the pool decides the split.
#[inline]
fn auto_chunk_rows(rows: usize) -> usize {
    let num_chunks = rayon::current_num_threads() * CHUNKS_PER_THREAD;
    (rows / num_chunks).max(1)
}

/// Rows per chunk for a fixed number of lanes. Yields at most `lanes` chunks.
#[inline]
fn lane_chunk_rows(rows: usize, lanes: usize) -> usize {
    rows.div_ceil(lanes).max(1)
}

/// Parallel iterator that pairs each chunk with the index of its first row.
pub struct WithRowOffset<I> {
    inner: I,
    rows_per_chunk: usize,
}

impl<I> ParallelIterator for WithRowOffset<I>
where
    I: IndexedParallelIterator,
{
    type Item = (usize, I::Item);

    fn drive_unindexed<C>(self, consumer: C) -> C::Result
    where
        C: rayon::iter::plumbing::UnindexedConsumer<Self::Item>,
    {
        let rows_per_chunk = self.rows_per_chunk;
        self.inner
            .enumerate()
            .map(move |(idx, item)| (idx * rows_per_chunk, item))
            .drive_unindexed(consumer)
    }
}

/// Parallel iterator over row-aligned mutable chunks that yields `(chunk_start_row, chunk)` pairs.
pub type ParRowsMutWithOffset<'a, T> = WithRowOffset<rayon::slice::ChunksMut<'a, T>>;

/// Extension trait for splitting a mutable slice into row-aligned parallel chunks.
pub trait ParRowsMut<'a, T: Send + 'a> {
    /// Chunk count chosen from the current rayon pool size.
    fn par_rows_mut_auto(&'a mut self, width: usize) -> ParRowsMutWithOffset<'a, T>;

    /// At most `lanes` chunks of equal row count (the last one may be shorter).
    fn par_rows_mut_lanes(&'a mut self, width: usize, lanes: usize)
        -> ParRowsMutWithOffset<'a, T>;
}

impl<'a, T: Send + 'a> ParRowsMut<'a, T> for [T] {
    fn par_rows_mut_auto(&'a mut self, width: usize) -> ParRowsMutWithOffset<'a, T> {
        let rows = row_count(self.len(), width);
        split_rows(self, width, auto_chunk_rows(rows))
    }

    fn par_rows_mut_lanes(
        &'a mut self,
        width: usize,
        lanes: usize,
    ) -> ParRowsMutWithOffset<'a, T> {
        assert!(lanes > 0, "lanes must be > 0");
        let rows = row_count(self.len(), width);
        split_rows(self, width, lane_chunk_rows(rows, lanes))
    }
}

fn row_count(len: usize, width: usize) -> usize {
    assert!(width > 0, "row width must be > 0");
    assert_eq!(len % width, 0, "Slice length must be a multiple of row width");
    len / width
}

fn split_rows<T: Send>(
    data: &mut [T],
    width: usize,
    rows_per_chunk: usize,
) -> ParRowsMutWithOffset<'_, T> {
    WithRowOffset {
        inner: data.par_chunks_mut(width * rows_per_chunk),
        rows_per_chunk,
    }
}
