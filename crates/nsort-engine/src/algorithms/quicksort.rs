//! Introspective quicksort with pivot-quality feedback.
//!
//! The driver is iterative: each round either finishes the current segment
//! with one of the cheap strategies (insertion sort for short or
//! nearly-sorted segments) or partitions it three ways around a selected
//! pivot, recurses on the smaller side — possibly on a worker thread — and
//! loops on the larger side. Two escalation mechanisms bound the worst case:
//! a bad partition switches the next pivot selection to a recursive
//! median-of-medians, and exhausting the iteration budget of
//! `introsort_mult * log2(n)` hands the whole remaining segment to heapsort.
//!
//! Elements equal to the pivot end up in a central band that is never
//! revisited, so inputs with heavy duplicates get cheaper, not more
//! expensive.

use std::cmp::Ordering;
use std::thread;

use super::{heapsort, pivot, smallsort};
use crate::pool::{Pool, PoolState};

/// Sorts a slice in place with the default configuration.
///
/// # Examples
/// ```
/// use nsort_engine::algorithms::quicksort;
///
/// let mut numbers = vec![3, 1, 4, 1, 5, 9, 2, 6];
/// quicksort::sort(&mut numbers);
/// assert_eq!(numbers, vec![1, 1, 2, 3, 4, 5, 6, 9]);
/// ```
pub fn sort<T: Ord + Send>(slice: &mut [T]) {
    QuickSortBuilder::new().sort(slice);
}

/// Sorts a slice in place with a caller-supplied comparator and the default
/// configuration.
///
/// The comparator must induce a total order and must be safe to call from
/// multiple threads at once; large partitions may be compared concurrently.
/// A comparator that is not total will produce an unspecified order, but the
/// sort still terminates.
pub fn sort_by<T, F>(slice: &mut [T], cmp: F)
where
    T: Send,
    F: Fn(&T, &T) -> Ordering + Sync,
{
    QuickSortBuilder::new().sort_by(slice, cmp);
}

/// Builder for configuring and executing quicksort operations.
///
/// # Examples
///
/// ```
/// use nsort_engine::algorithms::quicksort::QuickSortBuilder;
///
/// let mut arr = vec![5, 2, 8, 1, 9, 3];
/// QuickSortBuilder::new()
///     .max_threads(1)
///     .sort(&mut arr);
/// assert!(arr.windows(2).all(|w| w[0] <= w[1]));
/// ```
///
/// # Performance
///
/// - Time: O(n log n) in all cases; the `introsort_mult` budget caps how
///   long the quicksort phase may struggle before heapsort takes over
/// - Space: O(log n) stack (the driver always recurses on the smaller
///   partition)
/// - Not stable
///
/// The defaults are tuned for the external line sorter's pointer-sized
/// records and are reasonable for general use; none of them is critical.
#[derive(Debug, Clone)]
pub struct QuickSortBuilder {
    small_threshold: usize,
    max_ins_moves: usize,
    introsort_mult: f32,
    max_pivot_fraction: f32,
    large_median_threshold: usize,
    max_threads: usize,
    parallel_min_len: usize,
}

impl Default for QuickSortBuilder {
    fn default() -> Self {
        Self {
            small_threshold: 32,
            max_ins_moves: 2,
            introsort_mult: 15.0,
            max_pivot_fraction: 0.999,
            large_median_threshold: 100_000,
            max_threads: 32,
            parallel_min_len: 10_000,
        }
    }
}

impl QuickSortBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the segment length below which insertion sort is used.
    ///
    /// Values below 9 are clamped up: pivot selection samples 9 elements
    /// and must never see a shorter segment.
    pub fn small_threshold(mut self, threshold: usize) -> Self {
        self.small_threshold = threshold.max(9);
        self
    }

    /// Sets how many out-of-place elements the pre-partition insertion pass
    /// may fix before giving up.
    pub fn max_ins_moves(mut self, moves: usize) -> Self {
        self.max_ins_moves = moves;
        self
    }

    /// Sets the iteration budget multiplier: a segment of length `n` may go
    /// through `introsort_mult * log2(n)` partition rounds before the
    /// remainder is finished with heapsort.
    ///
    /// Lower values reach the guaranteed-O(n log n) fallback sooner; `0.0`
    /// means heapsort is used almost immediately.
    pub fn introsort_mult(mut self, mult: f32) -> Self {
        self.introsort_mult = mult;
        self
    }

    /// Sets the partition-asymmetry limit above which the next pivot is
    /// computed by recursive median-of-medians instead of sampling.
    ///
    /// The fraction ranges over (−1, 1): −1 is an all-equal split, +1 a
    /// degenerate one-sided split.
    pub fn max_pivot_fraction(mut self, fraction: f32) -> Self {
        self.max_pivot_fraction = fraction;
        self
    }

    /// Sets the segment length from which pivots are sampled with the
    /// median-of-25 network rather than median-of-9. Clamped to at least 25.
    pub fn large_median_threshold(mut self, threshold: usize) -> Self {
        self.large_median_threshold = threshold.max(25);
        self
    }

    /// Sets the maximum number of worker threads for one sort call.
    ///
    /// `0` or `1` disables parallelism. Each sort call owns its pool, so
    /// concurrent sorts do not share or fight over slots.
    pub fn max_threads(mut self, threads: usize) -> Self {
        self.max_threads = threads;
        self
    }

    /// Sets the minimum partition length that is worth handing to a worker
    /// thread.
    pub fn parallel_min_len(mut self, len: usize) -> Self {
        self.parallel_min_len = len;
        self
    }

    /// Sorts a slice of `Ord` elements in place.
    pub fn sort<T: Ord + Send>(&self, slice: &mut [T]) {
        self.sort_by(slice, T::cmp);
    }

    /// Sorts a slice in place with a caller-supplied comparator.
    ///
    /// The comparator must be a total order and thread-safe; see
    /// [`sort_by`](crate::algorithms::quicksort::sort_by). All spawned
    /// workers have finished when this returns.
    pub fn sort_by<T, F>(&self, slice: &mut [T], cmp: F)
    where
        T: Send,
        F: Fn(&T, &T) -> Ordering + Sync,
    {
        if slice.len() <= 1 {
            return;
        }
        let params = self.params();
        if slice.len() < params.small_threshold {
            smallsort::insertion(slice, &cmp);
            return;
        }
        if self.max_threads <= 1 || slice.len() < params.parallel_min_len {
            introsort(slice, &cmp, &params, None);
            return;
        }
        let state = PoolState::new(self.max_threads);
        thread::scope(|scope| {
            let pool = Pool {
                scope,
                state: &state,
            };
            introsort(slice, &cmp, &params, Some(pool));
        });
    }

    fn params(&self) -> SortParams {
        SortParams {
            small_threshold: self.small_threshold.max(9),
            max_ins_moves: self.max_ins_moves,
            introsort_mult: self.introsort_mult,
            max_pivot_fraction: self.max_pivot_fraction,
            large_median_threshold: self.large_median_threshold.max(25),
            parallel_min_len: self.parallel_min_len,
        }
    }
}

/// Resolved configuration shared by the driver and its workers.
pub(crate) struct SortParams {
    small_threshold: usize,
    max_ins_moves: usize,
    introsort_mult: f32,
    max_pivot_fraction: f32,
    large_median_threshold: usize,
    parallel_min_len: usize,
}

/// Sizes of the `< pivot` and `> pivot` regions after a three-way partition.
struct Partition {
    less: usize,
    greater: usize,
}

/// The iterative introsort driver.
///
/// Each call owns `v` exclusively and keeps its own iteration counter, so a
/// partition handed to a worker restarts its budget for its (smaller)
/// segment.
fn introsort<'scope, 'env, T, F>(
    mut v: &'env mut [T],
    cmp: &'env F,
    params: &'env SortParams,
    pool: Option<Pool<'scope, 'env>>,
) where
    T: Send,
    F: Fn(&T, &T) -> Ordering + Sync,
{
    if v.len() <= 1 {
        return;
    }
    let max_itn = (params.introsort_mult * (v.len() as f32).log2() + 0.5) as u32;
    let mut itn = 0u32;
    // seeded mid-range: the first pivot selection takes the fast path
    let mut pivot_fraction = 0.5f32;

    while v.len() > 1 {
        let n = v.len();
        if n < params.small_threshold {
            smallsort::insertion(v, cmp);
            return;
        }
        if smallsort::sort_bounded(v, cmp, params.small_threshold, params.max_ins_moves) {
            return;
        }
        itn += 1;
        if itn > max_itn {
            log::debug!("quicksort out of iterations, finishing {n} elements with heapsort");
            heapsort::sort_by(v, cmp);
            return;
        }

        let robust = pivot_fraction > params.max_pivot_fraction;
        pivot::select(v, cmp, robust, params.large_median_threshold);
        let part = partition(v, cmp);
        let equal = n - part.less - part.greater;
        pivot_fraction = (part.less.max(part.greater) as f32
            - part.less.min(part.greater) as f32
            - equal as f32)
            / n as f32;
        let pivot_ok = pivot_fraction <= params.max_pivot_fraction;

        // Recurse on the smaller partition (restarting the budget), iterate
        // on the larger; this bounds the stack to O(log n).
        let whole = std::mem::take(&mut v);
        if part.less <= part.greater {
            let (left, rest) = whole.split_at_mut(part.less);
            let tail = rest.len() - part.greater;
            let right = &mut rest[tail..];
            if left.len() > 1 {
                spawn_or_run(left, cmp, params, pool, pivot_ok);
            }
            if right.len() > 1 {
                v = right;
            } else {
                return;
            }
        } else {
            let (head, right) = whole.split_at_mut(n - part.greater);
            let left = &mut head[..part.less];
            if right.len() > 1 {
                spawn_or_run(right, cmp, params, pool, pivot_ok);
            }
            if left.len() > 1 {
                v = left;
            } else {
                return;
            }
        }
    }
}

/// Runs the driver on `seg`, on a pool worker when the segment is large
/// enough, its parent partition was well balanced and a slot is free;
/// inline otherwise.
fn spawn_or_run<'scope, 'env, T, F>(
    seg: &'env mut [T],
    cmp: &'env F,
    params: &'env SortParams,
    pool: Option<Pool<'scope, 'env>>,
    pivot_ok: bool,
) where
    T: Send,
    F: Fn(&T, &T) -> Ordering + Sync,
{
    if let Some(p) = pool {
        if pivot_ok && seg.len() >= params.parallel_min_len && p.state.try_reserve() {
            p.scope.spawn(move || {
                introsort(seg, cmp, params, Some(p));
                p.state.release();
            });
            return;
        }
    }
    introsort(seg, cmp, params, pool);
}

/// Bentley–McIlroy three-way partition around the pivot at `v[0]`.
///
/// Two fingers sweep inward over `v[1..]`, collecting elements equal to the
/// pivot at both ends of the segment; the equal runs are then block-swapped
/// into the middle, yielding `[< pivot | = pivot | > pivot]`.
fn partition<T, F>(v: &mut [T], cmp: &F) -> Partition
where
    F: Fn(&T, &T) -> Ordering,
{
    let n = v.len();
    let mut pa = 1usize;
    let mut pb = 1usize;
    let mut pc = n - 1;
    let mut pd = n - 1;

    loop {
        while pb <= pc {
            let c = cmp(&v[pb], &v[0]);
            if c == Ordering::Greater {
                break;
            }
            if c == Ordering::Equal {
                v.swap(pa, pb);
                pa += 1;
            }
            pb += 1;
        }
        while pb <= pc {
            let c = cmp(&v[pc], &v[0]);
            if c == Ordering::Less {
                break;
            }
            if c == Ordering::Equal {
                v.swap(pc, pd);
                pd -= 1;
            }
            pc -= 1;
        }
        if pb > pc {
            break;
        }
        v.swap(pb, pc);
        pb += 1;
        pc -= 1;
    }

    let less = pb - pa;
    let greater = pd - pc;

    // move the equal runs from the ends into the middle
    let d1 = pa.min(less);
    for k in 0..d1 {
        v.swap(k, pb - d1 + k);
    }
    let d2 = (n - 1 - pd).min(greater);
    for k in 0..d2 {
        v.swap(pb + k, n - d2 + k);
    }

    Partition { less, greater }
}
