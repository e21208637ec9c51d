//! Pivot selection for the quicksort driver.
//!
//! All selectors leave their chosen pivot at index 0 of the segment. The
//! fast path samples 9 (or, for large segments, 25) equally spaced elements
//! and runs a fixed exchange network that deposits the median at a known
//! slot. The robust path is a recursive median-of-medians over blocks of 25
//! and is only used after a partition came out badly unbalanced; it permutes
//! the segment as a side effect, which in practice also breaks up the input
//! patterns that caused the bad split.
//!
//! The exchange networks are the optimal median searches published by
//! Nicolas Devillard (median of 9 after John L. Smith, median of 25 from
//! Graphics Gems).

use std::cmp::Ordering;

use super::smallsort;

/// Exchange network for the median of 9: after applying these compare-swap
/// pairs the median is at slot 4. Slots other than 4 are left partially
/// ordered only.
const MEDIAN9: [(usize, usize); 19] = [
    (1, 2),
    (4, 5),
    (7, 8),
    (0, 1),
    (3, 4),
    (6, 7),
    (1, 2),
    (4, 5),
    (7, 8),
    (0, 3),
    (5, 8),
    (4, 7),
    (3, 6),
    (1, 4),
    (2, 5),
    (4, 7),
    (4, 2),
    (6, 4),
    (4, 2),
];

/// Exchange network for the median of 25: the median ends up at slot 12.
const MEDIAN25: [(usize, usize); 99] = [
    (0, 1),
    (3, 4),
    (2, 4),
    (2, 3),
    (6, 7),
    (5, 7),
    (5, 6),
    (9, 10),
    (8, 10),
    (8, 9),
    (12, 13),
    (11, 13),
    (11, 12),
    (15, 16),
    (14, 16),
    (14, 15),
    (18, 19),
    (17, 19),
    (17, 18),
    (21, 22),
    (20, 22),
    (20, 21),
    (23, 24),
    (2, 5),
    (3, 6),
    (0, 6),
    (0, 3),
    (4, 7),
    (1, 7),
    (1, 4),
    (11, 14),
    (8, 14),
    (8, 11),
    (12, 15),
    (9, 15),
    (9, 12),
    (13, 16),
    (10, 16),
    (10, 13),
    (20, 23),
    (17, 23),
    (17, 20),
    (21, 24),
    (18, 24),
    (18, 21),
    (19, 22),
    (8, 17),
    (9, 18),
    (0, 18),
    (0, 9),
    (10, 19),
    (1, 19),
    (1, 10),
    (11, 20),
    (2, 20),
    (2, 11),
    (12, 21),
    (3, 21),
    (3, 12),
    (13, 22),
    (4, 22),
    (4, 13),
    (14, 23),
    (5, 23),
    (5, 14),
    (15, 24),
    (6, 24),
    (6, 15),
    (7, 16),
    (7, 19),
    (13, 21),
    (15, 23),
    (7, 13),
    (7, 15),
    (1, 9),
    (3, 11),
    (5, 17),
    (11, 17),
    (9, 17),
    (4, 10),
    (6, 12),
    (7, 14),
    (4, 6),
    (4, 7),
    (12, 14),
    (10, 14),
    (6, 7),
    (10, 12),
    (6, 10),
    (6, 17),
    (12, 17),
    (7, 17),
    (7, 10),
    (12, 18),
    (7, 12),
    (10, 18),
    (12, 20),
    (10, 20),
    (10, 12),
];

fn exchange<T, F>(v: &mut [T], cmp: &F, network: &[(usize, usize)])
where
    F: Fn(&T, &T) -> Ordering,
{
    for &(a, b) in network {
        if cmp(&v[a], &v[b]) == Ordering::Greater {
            v.swap(a, b);
        }
    }
}

/// Selects a pivot for the segment and swaps it to index 0.
///
/// `robust` must be set when the previous partition of this segment exceeded
/// the pivot-fraction limit; the segment must hold at least 9 elements.
pub(crate) fn select<T, F>(v: &mut [T], cmp: &F, robust: bool, large_threshold: usize)
where
    F: Fn(&T, &T) -> Ordering,
{
    if robust {
        median_of_medians(v, cmp);
        return;
    }
    let n = v.len();
    if n >= large_threshold {
        // 25 samples at a fixed stride, gathered to the segment front.
        let step = (n - 1) / 24;
        for i in 1..25 {
            v.swap(i, i * step);
        }
        exchange(v, cmp, &MEDIAN25);
        v.swap(0, 12);
    } else {
        // 9 samples spread over the front, middle and back of the segment.
        let mid = n / 2;
        let last = n - 1;
        let d = n / 8;
        v.swap(1, d);
        v.swap(2, 2 * d);
        v.swap(3, mid - d);
        v.swap(4, mid);
        v.swap(5, mid + d);
        v.swap(6, last - 2 * d);
        v.swap(7, last - d);
        v.swap(8, last);
        exchange(v, cmp, &MEDIAN9);
        v.swap(0, 4);
    }
}

/// Recursive median-of-medians over blocks of 25, leaving the result at
/// index 0.
///
/// Each pass packs one median per block at the front of the segment and
/// recurses on that prefix until at most 50 candidates remain, which are
/// then insertion-sorted so the middle element can be taken. A trailing
/// block of 26..=49 elements is split into two halves (preceded by a
/// median-of-9 when needed to keep the per-pass median count odd, so the
/// final selection never lands between two values). Up to 24 trailing
/// elements beyond the last full block are left out of a pass; they are
/// still permuted into the segment and sorted later like everything else.
pub(crate) fn median_of_medians<T, F>(v: &mut [T], cmp: &F)
where
    F: Fn(&T, &T) -> Ordering,
{
    let mut n1 = v.len();
    while n1 > 50 {
        let mut dest = 0usize;
        let mut block = 0usize;
        while block + 25 <= n1 {
            if block >= n1 - 49 && n1 - block != 25 {
                // Last 26..=49 elements: produce two (or three) medians.
                let mut left = n1 - block;
                if dest % 2 == 0 && left >= 11 {
                    exchange(&mut v[block..block + 9], cmp, &MEDIAN9);
                    v.swap(dest, block + 4);
                    dest += 1;
                    block += 9;
                    left -= 9;
                }
                let half = left / 2;
                smallsort::insertion(&mut v[block..block + half], cmp);
                v.swap(dest, block + (half - 1) / 2);
                dest += 1;
                smallsort::insertion(&mut v[block + half..block + left], cmp);
                v.swap(dest, block + half + (left - half - 1) / 2);
                dest += 1;
                break;
            }
            exchange(&mut v[block..block + 25], cmp, &MEDIAN25);
            v.swap(dest, block + 12);
            dest += 1;
            block += 25;
        }
        n1 = dest;
    }
    if n1 > 1 {
        smallsort::insertion(&mut v[..n1], cmp);
        if n1 > 2 {
            v.swap(0, (n1 - 1) / 2);
        }
    }
}
