use std::cmp::Ordering;

/// Heapsort implementation for sorting slices.
///
/// # Algorithm Overview
/// Classical array heapsort over 1-based indices (index `i` of the heap is
/// element `i - 1` of the slice):
/// 1. Builds a max-heap bottom-up with an early-exit sift-down
/// 2. Repeatedly swaps the maximum to the end of the shrinking heap
/// 3. Restores the heap with Floyd's sift-down: the larger child is promoted
///    all the way down without comparing against the displaced element, which
///    is then bubbled back up from the leaf into its final position
///
/// Floyd's variant saves roughly 15–20% of comparisons on average because the
/// displaced element almost always belongs near the bottom of the heap
/// (Knuth, Vol. 3, page 158, problem 18).
///
/// # Time Complexity
/// - Best, Average and Worst Case: O(n log n)
///
/// # Space Complexity
/// - O(1) auxiliary space
///
/// # Stability
/// - Not stable
///
/// Considerably slower than a well-behaved quicksort, so the engine only
/// reaches for it when the quicksort driver exhausts its iteration budget.
pub fn sort<T: Ord>(slice: &mut [T]) {
    sort_by(slice, |a, b| a.cmp(b));
}

/// Heapsort with a caller-supplied comparator.
pub fn sort_by<T, F>(slice: &mut [T], cmp: F)
where
    F: Fn(&T, &T) -> Ordering,
{
    let n = slice.len();
    if n <= 1 {
        return;
    }

    // Build the heap: sift every internal node, last parent first.
    for root in (1..=n / 2).rev() {
        sift_down(slice, root, n, &cmp);
    }

    // Selection: move the maximum to its final slot, then repair the heap
    // around the element displaced from the end.
    let mut heap = n;
    while heap > 1 {
        slice.swap(0, heap - 1);
        heap -= 1;
        sift_down_floyd(slice, heap, &cmp);
    }
}

/// Sift the element at 1-based `root` down within `v[..n]`, stopping as soon
/// as it dominates both children.
fn sift_down<T, F>(v: &mut [T], mut root: usize, n: usize, cmp: &F)
where
    F: Fn(&T, &T) -> Ordering,
{
    loop {
        let mut child = 2 * root;
        if child > n {
            break;
        }
        if child < n && cmp(&v[child - 1], &v[child]) == Ordering::Less {
            child += 1;
        }
        if cmp(&v[child - 1], &v[root - 1]) != Ordering::Greater {
            break;
        }
        v.swap(child - 1, root - 1);
        root = child;
    }
}

/// Floyd's sift-down from the root of `v[..n]`: promote the larger child on
/// the way down without testing the displaced root element, then bubble that
/// element back up from the leaf.
fn sift_down_floyd<T, F>(v: &mut [T], n: usize, cmp: &F)
where
    F: Fn(&T, &T) -> Ordering,
{
    let mut hole = 1usize;
    loop {
        let mut child = 2 * hole;
        if child > n {
            break;
        }
        if child < n && cmp(&v[child - 1], &v[child]) == Ordering::Less {
            child += 1;
        }
        v.swap(hole - 1, child - 1);
        hole = child;
    }
    while hole > 1 {
        let parent = hole / 2;
        if cmp(&v[hole - 1], &v[parent - 1]) != Ordering::Greater {
            break;
        }
        v.swap(hole - 1, parent - 1);
        hole = parent;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_slice() {
        let mut arr: Vec<i32> = vec![];
        sort(&mut arr);
        assert_eq!(arr, vec![]);
    }

    #[test]
    fn test_single_element() {
        let mut arr = vec![1];
        sort(&mut arr);
        assert_eq!(arr, vec![1]);
    }

    #[test]
    fn test_two_elements() {
        let mut arr = vec![2, 1];
        sort(&mut arr);
        assert_eq!(arr, vec![1, 2]);
    }

    #[test]
    fn test_sorted_array() {
        let mut arr = vec![1, 2, 3, 4, 5];
        sort(&mut arr);
        assert_eq!(arr, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_reverse_sorted() {
        let mut arr = vec![5, 4, 3, 2, 1];
        sort(&mut arr);
        assert_eq!(arr, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_random_order() {
        let mut arr = vec![3, 1, 4, 1, 5, 9, 2, 6, 5, 3, 5];
        let mut expected = arr.clone();
        expected.sort();
        sort(&mut arr);
        assert_eq!(arr, expected);
    }

    #[test]
    fn test_all_equal() {
        let mut arr = vec![7; 64];
        sort(&mut arr);
        assert_eq!(arr, vec![7; 64]);
    }

    #[test]
    fn test_large_array() {
        let mut arr: Vec<i32> = (0..10_000).rev().collect();
        let mut expected = arr.clone();
        expected.sort();
        sort(&mut arr);
        assert_eq!(arr, expected);
    }

    #[test]
    fn test_sort_by_comparator() {
        let mut arr = vec![1.5f64, 0.5, 2.5, 0.25];
        sort_by(&mut arr, |a, b| a.partial_cmp(b).unwrap());
        assert_eq!(arr, vec![0.25, 0.5, 1.5, 2.5]);
    }

    #[test]
    fn test_strings() {
        let mut arr = vec!["banana", "apple", "cherry", "date"];
        sort(&mut arr);
        assert_eq!(arr, vec!["apple", "banana", "cherry", "date"]);
    }

    #[test]
    fn test_sawtooth() {
        let mut arr: Vec<i32> = (0..1000).map(|i| i % 7).collect();
        let mut expected = arr.clone();
        expected.sort();
        sort(&mut arr);
        assert_eq!(arr, expected);
    }
}
