//! The external sorting pipeline.
//!
//! Input lines accumulate in an in-memory batch until a spill trigger fires
//! (batch full, or an allocation failed); each spilled batch is sorted with
//! the in-memory engine and written to a temporary run file. The number of
//! open runs is capped: when a new run would exceed the cap, all open runs
//! are first merged into a single run (a "sub-merge"), so the only limit on
//! input size is free disk space. The final k-way merge streams the runs to
//! the output — or, when everything fit in one batch, the batch is written
//! straight out without touching the disk at all.

use std::collections::TryReserveError;
use std::io::{self, BufRead, BufWriter, Write};

use nsort_engine::algorithms::quicksort::QuickSortBuilder;

use crate::compare::Comparator;
use crate::error::{Result, SortError};
use crate::run::{merge_runs, Run, IO_BUF_SIZE};

/// Initial capacity of the line read buffer.
const INIT_LINE_BUF: usize = 256;

/// Counters describing one completed sort.
#[derive(Debug, Default, Clone, Copy)]
pub struct SortStats {
    /// Lines read from the input.
    pub lines_in: u64,
    /// Lines written to the output (differs from `lines_in` under `-u`).
    pub lines_out: u64,
    /// Temporary run files created (spills plus sub-merge results).
    pub runs_created: usize,
    /// Sub-merges performed to stay within the run cap.
    pub sub_merges: usize,
}

/// Builder for configuring and executing an external line sort.
///
/// # Examples
///
/// ```
/// use nsort::{Comparator, ExternalSorter};
/// use std::io::Cursor;
///
/// let mut out: Vec<u8> = Vec::new();
/// ExternalSorter::new()
///     .comparator(Comparator::Text)
///     .sort(Cursor::new(b"banana\napple\ncherry\n".to_vec()), || Ok(&mut out))
///     .expect("sort failed");
/// assert_eq!(out, b"apple\nbanana\ncherry\n");
/// ```
///
/// The output is opened through a closure that runs only after the input has
/// been fully drained and dropped, so it is safe for the output path to be
/// the input path.
#[derive(Debug, Clone)]
pub struct ExternalSorter {
    comparator: Comparator,
    unique: bool,
    max_lines_per_run: usize,
    max_runs: usize,
    engine: QuickSortBuilder,
}

impl Default for ExternalSorter {
    fn default() -> Self {
        Self {
            comparator: Comparator::Text,
            unique: false,
            max_lines_per_run: 10_000_000,
            max_runs: 16,
            engine: QuickSortBuilder::new(),
        }
    }
}

impl ExternalSorter {
    /// Creates a sorter with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the line ordering.
    pub fn comparator(mut self, comparator: Comparator) -> Self {
        self.comparator = comparator;
        self
    }

    /// Suppresses output lines that are byte-equal to the previous output
    /// line.
    pub fn unique(mut self, unique: bool) -> Self {
        self.unique = unique;
        self
    }

    /// Sets how many lines accumulate in memory before a batch is spilled
    /// to a run file. Clamped to at least 1.
    pub fn max_lines_per_run(mut self, lines: usize) -> Self {
        self.max_lines_per_run = lines.max(1);
        self
    }

    /// Sets how many run files may be open at once before a sub-merge
    /// collapses them. Clamped to at least 2.
    pub fn max_runs(mut self, runs: usize) -> Self {
        self.max_runs = runs.max(2);
        self
    }

    /// Replaces the in-memory sort configuration used for each batch.
    pub fn engine(mut self, engine: QuickSortBuilder) -> Self {
        self.engine = engine;
        self
    }

    /// Sorts `input` into the writer produced by `open_output`.
    ///
    /// `open_output` is called exactly once, after the input has been read
    /// to the end and dropped. A final line without a newline terminator is
    /// accepted and given one on output.
    ///
    /// # Errors
    ///
    /// Any I/O failure on the input, the run files or the output is fatal,
    /// as is running out of memory after spilling the current batch (see
    /// [`SortError`]).
    pub fn sort<R, W, O>(&self, mut input: R, open_output: O) -> Result<SortStats>
    where
        R: BufRead,
        W: Write,
        O: FnOnce() -> io::Result<W>,
    {
        let mut pipeline = Pipeline {
            cfg: self,
            batch: Vec::new(),
            runs: Vec::new(),
            stats: SortStats::default(),
        };
        pipeline.read_phase(&mut input)?;
        // input fully drained into the batch and run files: closing it here
        // makes it safe for the output to be the same file
        drop(input);

        let out = open_output().map_err(SortError::OpenOutput)?;
        let mut w = BufWriter::with_capacity(IO_BUF_SIZE, out);
        if pipeline.runs.is_empty() {
            pipeline.write_in_memory(&mut w)?;
        } else {
            pipeline.spill()?;
            pipeline.final_merge(&mut w)?;
        }
        w.flush().map_err(SortError::OutputWrite)?;
        Ok(pipeline.stats)
    }
}

struct Pipeline<'a> {
    cfg: &'a ExternalSorter,
    batch: Vec<Vec<u8>>,
    runs: Vec<Run>,
    stats: SortStats,
}

impl Pipeline<'_> {
    fn read_phase<R: BufRead>(&mut self, input: &mut R) -> Result<()> {
        let mut line: Vec<u8> = Vec::with_capacity(INIT_LINE_BUF);
        loop {
            line.clear();
            let n = input
                .read_until(b'\n', &mut line)
                .map_err(SortError::Read)?;
            if n == 0 {
                break;
            }
            self.stats.lines_in += 1;
            if line.last() != Some(&b'\n') {
                log::warn!("last line of input has no newline, one was added");
                line.push(b'\n');
            }

            if self.batch.len() == self.cfg.max_lines_per_run {
                self.spill()?;
            }
            // allocation pressure: spill the batch to free memory, then try
            // once more before giving up
            let copy = match duplicate(&line) {
                Ok(copy) => copy,
                Err(_) => {
                    self.spill()?;
                    duplicate(&line).map_err(|source| SortError::OutOfMemory {
                        bytes: line.len(),
                        source,
                    })?
                }
            };
            if self.batch.try_reserve(1).is_err() {
                self.spill()?;
                self.batch
                    .try_reserve(1)
                    .map_err(|source| SortError::OutOfMemory {
                        bytes: std::mem::size_of::<Vec<u8>>(),
                        source,
                    })?;
            }
            self.batch.push(copy);
        }
        Ok(())
    }

    /// Sorts the current batch and writes it to a fresh run, sub-merging
    /// first when the run cap is reached. No-op on an empty batch.
    fn spill(&mut self) -> Result<()> {
        if self.batch.is_empty() {
            return Ok(());
        }
        self.sort_batch();
        if self.runs.len() == self.cfg.max_runs {
            self.sub_merge()?;
        }
        let run = Run::create(&self.batch)?;
        self.runs.push(run);
        self.stats.runs_created += 1;
        log::debug!(
            "spilled a run of {} lines ({} runs open)",
            self.batch.len(),
            self.runs.len()
        );
        self.batch.clear();
        Ok(())
    }

    /// Merges every open run into a single fresh run, freeing run slots.
    fn sub_merge(&mut self) -> Result<()> {
        let runs = std::mem::take(&mut self.runs);
        let count = runs.len();
        let file = tempfile::tempfile().map_err(SortError::TempFile)?;
        let mut w = BufWriter::with_capacity(IO_BUF_SIZE, file);
        merge_runs(runs, self.cfg.comparator, false, &mut w, SortError::RunWrite)?;
        let file = w
            .into_inner()
            .map_err(|e| SortError::RunWrite(e.into_error()))?;
        self.runs.push(Run::from_file(file));
        self.stats.sub_merges += 1;
        self.stats.runs_created += 1;
        log::info!("sub-merged {count} runs into one to free run slots");
        Ok(())
    }

    fn final_merge<W: Write>(&mut self, out: &mut W) -> Result<()> {
        let runs = std::mem::take(&mut self.runs);
        log::info!("merging {} runs", runs.len());
        self.stats.lines_out = merge_runs(
            runs,
            self.cfg.comparator,
            self.cfg.unique,
            out,
            SortError::OutputWrite,
        )?;
        Ok(())
    }

    /// Fast path: the whole input fit in one batch, so the temp-file
    /// machinery is skipped entirely.
    fn write_in_memory<W: Write>(&mut self, out: &mut W) -> Result<()> {
        self.sort_batch();
        let mut prev: Option<&[u8]> = None;
        for line in &self.batch {
            if self.cfg.unique && prev == Some(line.as_slice()) {
                continue;
            }
            out.write_all(line).map_err(SortError::OutputWrite)?;
            self.stats.lines_out += 1;
            prev = Some(line.as_slice());
        }
        Ok(())
    }

    fn sort_batch(&mut self) {
        let cmp = self.cfg.comparator;
        self.cfg
            .engine
            .sort_by(&mut self.batch, move |a: &Vec<u8>, b: &Vec<u8>| {
                cmp.compare(a, b)
            });
    }
}

fn duplicate(line: &[u8]) -> std::result::Result<Vec<u8>, TryReserveError> {
    let mut copy = Vec::new();
    copy.try_reserve_exact(line.len())?;
    copy.extend_from_slice(line);
    Ok(copy)
}
