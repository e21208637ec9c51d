//! Temporary sorted runs and the k-way merge over them.
//!
//! Every run lives in an anonymous temp file (`tempfile::tempfile`), which
//! the OS unlinks at creation: runs can never outlive the process, whatever
//! the exit path. A run is written once, sequentially, and read back once,
//! sequentially, so plain buffered I/O on both sides is all that is needed.

use std::cmp::Ordering;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Seek, SeekFrom, Write};

use crate::compare::Comparator;
use crate::error::{Result, SortError};

pub(crate) const IO_BUF_SIZE: usize = 16 * 1024;

/// One sorted run spilled to disk.
pub(crate) struct Run {
    file: File,
}

impl Run {
    /// Writes a batch of already-sorted lines to a fresh temp file.
    pub(crate) fn create(lines: &[Vec<u8>]) -> Result<Run> {
        let file = tempfile::tempfile().map_err(SortError::TempFile)?;
        let mut w = BufWriter::with_capacity(IO_BUF_SIZE, file);
        for line in lines {
            w.write_all(line).map_err(SortError::RunWrite)?;
        }
        // into_inner flushes; a short write surfaces here (disk full)
        let file = w
            .into_inner()
            .map_err(|e| SortError::RunWrite(e.into_error()))?;
        Ok(Run { file })
    }

    pub(crate) fn from_file(file: File) -> Run {
        Run { file }
    }

    /// Rewinds the run and wraps it for reading.
    fn into_cursor(self) -> Result<RunCursor> {
        let mut file = self.file;
        file.seek(SeekFrom::Start(0)).map_err(SortError::RunRead)?;
        Ok(RunCursor {
            reader: BufReader::with_capacity(IO_BUF_SIZE, file),
            line: Vec::new(),
        })
    }
}

/// A run opened for merging: its reader plus the current front line.
///
/// The line buffer is reused across `advance` calls, so it settles at the
/// length of the longest line in the run.
struct RunCursor {
    reader: BufReader<File>,
    line: Vec<u8>,
}

impl RunCursor {
    /// Reads the next line into the front buffer; `false` means the run is
    /// exhausted.
    fn advance(&mut self) -> Result<bool> {
        self.line.clear();
        let n = self
            .reader
            .read_until(b'\n', &mut self.line)
            .map_err(SortError::RunRead)?;
        Ok(n > 0)
    }

    fn front(&self) -> &[u8] {
        &self.line
    }
}

/// K-way merge of `runs` into `out`.
///
/// Selection is a linear scan over the open fronts — at the run counts this
/// sorter allows, a selection heap would not buy anything. Exhausted runs
/// are dropped by swap-with-last (closing and thereby deleting their file).
/// With `unique` set, output lines byte-equal to the previous output line
/// are suppressed. Returns the number of lines written.
pub(crate) fn merge_runs<W: Write>(
    runs: Vec<Run>,
    cmp: Comparator,
    unique: bool,
    out: &mut W,
    map_write: fn(io::Error) -> SortError,
) -> Result<u64> {
    let mut cursors = Vec::with_capacity(runs.len());
    for run in runs {
        let mut cursor = run.into_cursor()?;
        if cursor.advance()? {
            cursors.push(cursor);
        }
    }

    let mut written = 0u64;
    let mut prev: Vec<u8> = Vec::new();
    while !cursors.is_empty() {
        let mut min_idx = 0;
        for i in 1..cursors.len() {
            if cmp.compare(cursors[i].front(), cursors[min_idx].front()) == Ordering::Less {
                min_idx = i;
            }
        }

        let line = cursors[min_idx].front();
        if !unique || prev.as_slice() != line {
            out.write_all(line).map_err(map_write)?;
            written += 1;
            if unique {
                prev.clear();
                prev.extend_from_slice(line);
            }
        }

        if !cursors[min_idx].advance()? {
            cursors.swap_remove(min_idx);
        }
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_of(lines: &[&str]) -> Run {
        let lines: Vec<Vec<u8>> = lines.iter().map(|l| l.as_bytes().to_vec()).collect();
        Run::create(&lines).unwrap()
    }

    #[test]
    fn test_single_run_round_trip() {
        let run = run_of(&["a\n", "b\n", "c\n"]);
        let mut out = Vec::new();
        let written = merge_runs(
            vec![run],
            Comparator::Text,
            false,
            &mut out,
            SortError::OutputWrite,
        )
        .unwrap();
        assert_eq!(written, 3);
        assert_eq!(out, b"a\nb\nc\n");
    }

    #[test]
    fn test_three_way_merge() {
        let runs = vec![
            run_of(&["b\n", "e\n"]),
            run_of(&["a\n", "f\n"]),
            run_of(&["c\n", "d\n"]),
        ];
        let mut out = Vec::new();
        merge_runs(
            runs,
            Comparator::Text,
            false,
            &mut out,
            SortError::OutputWrite,
        )
        .unwrap();
        assert_eq!(out, b"a\nb\nc\nd\ne\nf\n");
    }

    #[test]
    fn test_merge_unique() {
        let runs = vec![run_of(&["a\n", "b\n"]), run_of(&["a\n", "b\n", "b\n"])];
        let mut out = Vec::new();
        let written = merge_runs(
            runs,
            Comparator::Text,
            true,
            &mut out,
            SortError::OutputWrite,
        )
        .unwrap();
        assert_eq!(written, 2);
        assert_eq!(out, b"a\nb\n");
    }

    #[test]
    fn test_merge_numeric_order() {
        let runs = vec![run_of(&["10\n"]), run_of(&["2\n", "3.5\n"])];
        let mut out = Vec::new();
        merge_runs(
            runs,
            Comparator::Numeric,
            false,
            &mut out,
            SortError::OutputWrite,
        )
        .unwrap();
        assert_eq!(out, b"2\n3.5\n10\n");
    }
}
