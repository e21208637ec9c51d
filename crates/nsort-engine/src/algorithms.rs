/*!
Sorting strategies composed by the introspective driver in [`quicksort`].

# Available Algorithms

## QuickSort
The main entry point. Three-way partitioning with pivot-quality feedback,
optional parallel recursion, and escalation to the other two strategies.
- Average case: O(n log n)
- Worst case: O(n log n) (guaranteed by the heapsort fallback)
- Space: O(log n) stack
- Not stable

## HeapSort
The fallback invoked when quicksort stops making progress.
- Time: O(n log n) for all cases
- Space: O(1)
- Not stable
- Measured roughly an order of magnitude slower than a well-behaved
  quicksort, so it is only used as a last resort.

## SmallSort
Insertion sort for short segments, plus a bounded variant that finishes
nearly-sorted segments of any length and bails out quickly on everything
else.
- Time: O(n + d*n) for d out-of-place elements
- Space: O(1)
*/

pub mod heapsort;
pub mod quicksort;
pub mod smallsort;

mod pivot;

/// Re-export of [`quicksort::sort`].
///
/// Sorts a slice of `Ord` elements in place with the default configuration.
pub use self::quicksort::sort as quicksort;

/// Re-export of [`heapsort::sort`].
///
/// Guaranteed O(n log n) heap-based sort; normally reached only through the
/// quicksort driver's fallback, but usable on its own.
pub use self::heapsort::sort as heapsort;

/// Re-export of [`smallsort::sort`].
pub use self::smallsort::sort as smallsort;
