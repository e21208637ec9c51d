//! `nsort [-nquv?h] [-o OUTFILE] [INFILE]`: sort large line-oriented files.
//!
//! Reads INFILE (or stdin), sorts the lines, writes the result to OUTFILE
//! (or stdout). The output file is only opened once the input has been
//! fully read, so OUTFILE may name the same file as INFILE.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;

use nsort::{Comparator, ExternalSorter, SortError, SortStats};

const IO_BUF_SIZE: usize = 16 * 1024;

#[derive(Parser, Debug)]
#[command(name = "nsort", disable_help_flag = true)]
struct Cli {
    /// Lines are assumed to start with numbers and sorting is done on these
    #[arg(short = 'n')]
    numeric: bool,

    /// Sort on initial numbers in double quotes (implies -n)
    #[arg(short = 'q')]
    quoted: bool,

    /// Only print lines that are unique (deletes duplicates)
    #[arg(short = 'u')]
    unique: bool,

    /// Verbose output (to stderr)
    #[arg(short = 'v')]
    verbose: bool,

    /// Save sorted output in OUTFILE (by default it is written to stdout)
    #[arg(short = 'o', value_name = "OUTFILE")]
    output: Option<PathBuf>,

    /// Print this help message then exit
    #[arg(short = 'h')]
    help: bool,

    #[arg(short = '?', hide = true)]
    help_alt: bool,

    /// Input file (stdin when omitted)
    #[arg(value_name = "INFILE")]
    input: Option<PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    if cli.help || cli.help_alt {
        print_usage();
        return ExitCode::from(1);
    }

    let mut logger = env_logger::Builder::from_default_env();
    if cli.verbose {
        logger.filter_level(log::LevelFilter::Info);
    }
    let _ = logger.format_timestamp(None).try_init();

    let comparator = if cli.quoted {
        Comparator::QuotedNumeric
    } else if cli.numeric {
        Comparator::Numeric
    } else {
        Comparator::Text
    };
    let sorter = ExternalSorter::new()
        .comparator(comparator)
        .unique(cli.unique);

    if cli.verbose {
        let in_name = cli
            .input
            .as_ref()
            .map_or("stdin".into(), |p| p.display().to_string());
        let out_name = cli
            .output
            .as_ref()
            .map_or("stdout".into(), |p| p.display().to_string());
        eprintln!("nsort will sort \"{in_name}\" with output to \"{out_name}\"");
    }

    let start = Instant::now();
    let result = match &cli.input {
        Some(path) => match File::open(path) {
            Ok(file) => run(
                &sorter,
                BufReader::with_capacity(IO_BUF_SIZE, file),
                &cli.output,
            ),
            Err(err) => {
                eprintln!("nsort: cannot open file \"{}\": {err}", path.display());
                return ExitCode::from(1);
            }
        },
        None => run(&sorter, io::stdin().lock(), &cli.output),
    };

    match result {
        Ok(stats) => {
            if cli.verbose {
                eprintln!(
                    "nsort: {} lines in, {} lines out, {} temporary runs, {} sub-merges",
                    stats.lines_in, stats.lines_out, stats.runs_created, stats.sub_merges
                );
                eprintln!("nsort: sort took {:.3} secs", start.elapsed().as_secs_f64());
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("nsort: {err}");
            ExitCode::from(1)
        }
    }
}

fn run<R: BufRead>(
    sorter: &ExternalSorter,
    input: R,
    output: &Option<PathBuf>,
) -> Result<SortStats, SortError> {
    let output = output.clone();
    sorter.sort(input, move || -> io::Result<Box<dyn Write>> {
        Ok(match output {
            Some(path) => Box::new(File::create(path)?),
            None => Box::new(io::stdout().lock()),
        })
    })
}

fn print_usage() {
    eprintln!("nsort sorts its input into increasing order");
    eprintln!();
    eprintln!("Usage: nsort [-nquv?h] [-o OUTFILE] [INFILE]");
    eprintln!("-n lines are assumed to start with numbers and sorting is done on these.");
    eprintln!("   if the numbers are identical the lines are sorted as strings");
    eprintln!("-q sort on initial numbers in double quotes (implies -n)");
    eprintln!("   otherwise sort lines as strings");
    eprintln!("-u only print lines that are unique (ie deletes duplicates)");
    eprintln!("-o save sorted output in OUTFILE (by default it is written to stdout)");
    eprintln!("-v verbose output (to stderr) - prints execution time etc");
    eprintln!("-? or -h prints (this) help message then exits");
    eprintln!("If INFILE is provided input is read from this (single) file, otherwise stdin is read");
    eprintln!("It is OK for OUTFILE and INFILE to be the same file, but the original contents of the file are lost in this case");
}
