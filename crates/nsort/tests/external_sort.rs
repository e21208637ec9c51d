//! End-to-end tests of the external sorting pipeline, including the
//! spill/sub-merge machinery, duplicate suppression and in-place output.

use std::io::{BufReader, Cursor, Read, Seek, SeekFrom, Write};

use rand::prelude::*;

use nsort::{Comparator, ExternalSorter, SortStats};

fn sort_to_string(sorter: &ExternalSorter, input: &str) -> (String, SortStats) {
    let mut out: Vec<u8> = Vec::new();
    let stats = sorter
        .sort(Cursor::new(input.as_bytes().to_vec()), || Ok(&mut out))
        .expect("sort failed");
    (String::from_utf8(out).expect("output not utf-8"), stats)
}

/// Reference result: what the pipeline must produce for `input`.
fn expected_output(input: &str, cmp: Comparator, unique: bool) -> String {
    let mut lines: Vec<Vec<u8>> = input
        .split_inclusive('\n')
        .map(|l| {
            let mut v = l.as_bytes().to_vec();
            if v.last() != Some(&b'\n') {
                v.push(b'\n');
            }
            v
        })
        .collect();
    lines.sort_by(|a, b| cmp.compare(a, b));
    if unique {
        lines.dedup();
    }
    String::from_utf8(lines.concat()).unwrap()
}

#[test]
fn scenario_string_sort() {
    let (out, _) = sort_to_string(&ExternalSorter::new(), "banana\napple\ncherry\n");
    assert_eq!(out, "apple\nbanana\ncherry\n");
}

#[test]
fn scenario_numeric_with_header() {
    let sorter = ExternalSorter::new().comparator(Comparator::Numeric);
    let (out, _) = sort_to_string(&sorter, "name,score\n3.14\n2.71\n10\n");
    assert_eq!(out, "name,score\n2.71\n3.14\n10\n");
}

#[test]
fn scenario_quoted_numeric() {
    let sorter = ExternalSorter::new().comparator(Comparator::QuotedNumeric);
    let (out, _) = sort_to_string(&sorter, "\"10\",x\n\"2\",y\n\"10\",a\n");
    assert_eq!(out, "\"2\",y\n\"10\",a\n\"10\",x\n");
}

#[test]
fn scenario_unique() {
    let sorter = ExternalSorter::new().unique(true);
    let (out, _) = sort_to_string(&sorter, "a\na\nb\na\nb\n");
    assert_eq!(out, "a\nb\n");
}

#[test]
fn scenario_forced_spill() {
    let sorter = ExternalSorter::new()
        .comparator(Comparator::Numeric)
        .max_lines_per_run(3);
    let (out, stats) = sort_to_string(&sorter, "5\n4\n3\n2\n1\n0\n");
    assert_eq!(out, "0\n1\n2\n3\n4\n5\n");
    assert_eq!(stats.runs_created, 2);
    assert_eq!(stats.sub_merges, 0);
}

#[test]
fn scenario_forced_sub_merge() {
    let sorter = ExternalSorter::new()
        .comparator(Comparator::Numeric)
        .max_lines_per_run(2)
        .max_runs(2);
    let input: String = (0..10).rev().map(|i| format!("{i}\n")).collect();
    let (out, stats) = sort_to_string(&sorter, &input);
    let expected: String = (0..10).map(|i| format!("{i}\n")).collect();
    assert_eq!(out, expected);
    assert!(stats.sub_merges >= 1, "no sub-merge happened");
}

#[test]
fn round_trips_at_batch_boundaries() {
    // sizes straddling the batch size and multiples of the full run cap
    let max_lines = 8usize;
    let mut rng = StdRng::seed_from_u64(0x0dd5);
    for size in [0usize, 1, 7, 8, 9, 128, 384] {
        let input: String = (0..size)
            .map(|_| format!("{}\n", rng.gen_range(0..40)))
            .collect();
        let sorter = ExternalSorter::new()
            .comparator(Comparator::Numeric)
            .max_lines_per_run(max_lines);
        let (out, stats) = sort_to_string(&sorter, &input);
        assert_eq!(
            out,
            expected_output(&input, Comparator::Numeric, false),
            "round trip failed for {size} lines"
        );
        assert_eq!(stats.lines_in, size as u64);
        assert_eq!(stats.lines_out, size as u64);
    }
}

#[test]
fn sub_merge_stress_many_runs() {
    // small run cap with enough input for a dozen runs and repeated
    // sub-merges; the output must match a plain in-memory sort
    let mut rng = StdRng::seed_from_u64(42);
    let input: String = (0..70)
        .map(|_| format!("{}\n", rng.gen_range(0..25)))
        .collect();
    let sorter = ExternalSorter::new()
        .comparator(Comparator::Numeric)
        .max_lines_per_run(5)
        .max_runs(4);
    let (out, stats) = sort_to_string(&sorter, &input);
    assert_eq!(out, expected_output(&input, Comparator::Numeric, false));
    assert!(stats.runs_created >= 12);
    assert!(stats.sub_merges >= 2);
}

#[test]
fn unique_is_adjacent_distinct_across_runs() {
    let mut rng = StdRng::seed_from_u64(7);
    let input: String = (0..60)
        .map(|_| format!("{}\n", rng.gen_range(0..10)))
        .collect();
    let sorter = ExternalSorter::new()
        .unique(true)
        .max_lines_per_run(4)
        .max_runs(3);
    let (out, _) = sort_to_string(&sorter, &input);
    assert_eq!(out, expected_output(&input, Comparator::Text, true));
    let lines: Vec<&str> = out.lines().collect();
    for pair in lines.windows(2) {
        assert_ne!(pair[0], pair[1], "adjacent duplicate in unique output");
    }
}

#[test]
fn output_may_be_the_input_file() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    write!(file, "banana\napple\ncherry\n").unwrap();
    file.flush().unwrap();
    let path = file.path().to_path_buf();

    let input = std::fs::File::open(&path).unwrap();
    let sorter = ExternalSorter::new().max_lines_per_run(2);
    let out_path = path.clone();
    sorter
        .sort(BufReader::new(input), move || {
            std::fs::File::create(out_path)
        })
        .expect("in-place sort failed");

    let mut reread = String::new();
    let mut f = file.reopen().unwrap();
    f.seek(SeekFrom::Start(0)).unwrap();
    f.read_to_string(&mut reread).unwrap();
    assert_eq!(reread, "apple\nbanana\ncherry\n");
}

#[test]
fn long_lines_survive_spills() {
    let long_a = format!("{}\n", "z".repeat(5_000));
    let long_b = format!("{}\n", "a".repeat(5_000));
    let input = format!("{long_a}middle\n{long_b}");
    let sorter = ExternalSorter::new().max_lines_per_run(1);
    let (out, stats) = sort_to_string(&sorter, &input);
    assert_eq!(out, format!("{long_b}middle\n{long_a}"));
    assert_eq!(stats.runs_created, 3);
}

#[test]
fn missing_trailing_newline_round_trip() {
    let sorter = ExternalSorter::new().max_lines_per_run(2);
    let (out, stats) = sort_to_string(&sorter, "c\nb\nd\na");
    assert_eq!(out, "a\nb\nc\nd\n");
    assert_eq!(stats.lines_in, 4);
}
