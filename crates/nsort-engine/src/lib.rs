/*!
This crate provides the in-memory sorting engine used by the `nsort` external
line sorter: an introspective quicksort over an arbitrary slice and a
user-supplied comparator.

The engine composes four strategies and escalates between them based on how
the sort is actually progressing:

- **Insertion sort** for small segments, and as a cheap probe that finishes
  nearly-sorted segments of any size outright.
- **Quicksort** with a Bentley–McIlroy three-way partition, so heavy runs of
  equal elements collapse into a central band that is never revisited.
- **Median escalation**: pivots come from a median-of-9 (or median-of-25 for
  large segments) exchange network, and fall back to a recursive
  median-of-medians when the previous partition was badly unbalanced.
- **Heapsort** as a final guarantee: if the iteration budget of
  `introsort_mult * log2(n)` is exhausted, the remaining segment is finished
  in O(n log n) regardless of input pattern.

Large partitions may be handed to worker threads from a per-call pool; the
top-level sort returns only after every worker has joined.

# Usage Example

```rust
use nsort_engine::algorithms::quicksort;

let mut numbers = vec![3, 1, 4, 1, 5, 9, 2, 6, 5, 3];
quicksort::sort(&mut numbers);
assert_eq!(numbers, vec![1, 1, 2, 3, 3, 4, 5, 5, 6, 9]);
```

Comparators must be total and thread-safe; see
[`algorithms::quicksort::QuickSortBuilder`] for the tuning knobs.
*/

pub mod algorithms;

pub(crate) mod pool;
