/*!
External-memory line sorter.

Input lines are accumulated into RAM-sized batches, each batch is sorted
with the [`nsort-engine`](nsort_engine) introspective quicksort and spilled
to an anonymous temporary file (a *run*), and the output is produced by a
k-way merge of the runs. When the number of open runs would exceed its cap
the existing runs are merged into one mid-stream, so input size is bounded
only by free disk space. Inputs that fit in a single batch never touch the
disk.

Three interchangeable line orderings are provided ([`Comparator`]): plain
bytes, leading-number, and leading-number-in-quotes. The `nsort` binary
wraps all of this in a small CLI.

```rust
use nsort::{Comparator, ExternalSorter};
use std::io::Cursor;

let mut out: Vec<u8> = Vec::new();
ExternalSorter::new()
    .comparator(Comparator::Numeric)
    .sort(Cursor::new(b"10\n2\n".to_vec()), || Ok(&mut out))
    .expect("sort failed");
assert_eq!(out, b"2\n10\n");
```
*/

pub mod compare;
pub mod error;
pub mod sorter;

mod run;

pub use compare::Comparator;
pub use error::SortError;
pub use sorter::{ExternalSorter, SortStats};
