use anyhow::{Context, Result};
use clap::Parser;
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Instant;

use fastamotif::automaton::Automaton;
use fastamotif::chunk_processor::{ChunkProcessor, Match};
use fastamotif::error::{Result as ScanResult, ScanError};
use fastamotif::file_reader;
use fastamotif::pattern::PatternSet;
use fastamotif::record_splitter::{self, RecordSink};
use fastamotif::sink::Sink;

/// How large the chunk processor lets a record's buffered tail grow before
/// flushing. Independent of `READ_BUFFER_SIZE` below; see SPEC_FULL.md §10.3.
const FLUSH_THRESHOLD: usize = 1024 * 1024;

#[derive(Parser)]
#[command(name = "fastamotif")]
#[command(
    about = "Streaming multi-pattern DNA motif scanner over FASTA files",
    long_about = "fastamotif - scans (optionally gzip-compressed) FASTA files for occurrences \n\
    of a catalog of DNA patterns on both the forward and reverse-complement strands, \n\
    reporting every hit with surrounding context as CSV.\n\n\
    Example:\n\
      fastamotif genome.fasta.gz restriction_sites.csv 5"
)]
#[command(version)]
struct Cli {
    /// FASTA file to scan, optionally gzip-compressed. Use "-" for stdin.
    fasta_file: PathBuf,

    /// CSV pattern catalog (columns: name, sequence).
    patterns_file: PathBuf,

    /// Bytes of surrounding sequence to include with each match. Non-numeric
    /// values are treated as 0.
    #[arg(default_value = "0")]
    context: String,

    /// Reserved; accepted for interface compatibility, currently a no-op.
    #[arg(default_value = "0")]
    sequence_only: String,

    /// Fold case before matching (case-insensitive search).
    #[arg(default_value = "0")]
    ignore_case: String,
}

/// Parse a trailing CLI argument as `usize`, treating anything that doesn't
/// parse (missing, non-numeric, negative) as 0.
fn parse_trailing_numeric(raw: &str) -> usize {
    raw.trim().parse().unwrap_or(0)
}

/// Upper bound on the `context` argument. `ChunkProcessor` already clamps its
/// internal arithmetic with saturating ops, but a context this large can't
/// produce a useful window anyway, so reject it before it reaches the scan.
const MAX_CONTEXT: usize = 1 << 20;

fn parse_context(raw: &str) -> usize {
    parse_trailing_numeric(raw).min(MAX_CONTEXT)
}

fn main() {
    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        eprintln!("[ERROR] {:#}", err);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let context = parse_context(&cli.context);
    let ignore_case = parse_trailing_numeric(&cli.ignore_case) != 0;
    let _sequence_only = parse_trailing_numeric(&cli.sequence_only); // no-op, see SPEC_FULL.md §9

    let load_start = Instant::now();
    let patterns = PatternSet::load(&cli.patterns_file, ignore_case).with_context(|| {
        format!(
            "Failed to load pattern catalog: {}",
            cli.patterns_file.display()
        )
    })?;
    eprintln!(
        "[INFO] Loaded {} pattern(s) from {} ({:.2}ms)",
        patterns.len(),
        cli.patterns_file.display(),
        load_start.elapsed().as_secs_f64() * 1000.0
    );

    let automaton = Automaton::build(&patterns);
    eprintln!(
        "[INFO] Built automaton: {} node(s), max pattern length {}",
        automaton.node_count(),
        patterns.max_pattern_length()
    );

    let reader = file_reader::open(&cli.fasta_file).with_context(|| {
        format!("Failed to open FASTA input: {}", cli.fasta_file.display())
    })?;

    let stdout = io::stdout();
    let mut sink = Sink::new(stdout.lock());
    sink.write_header()
        .context("Failed to write CSV header to stdout")?;

    let mut driver = SinkDriver {
        processor: ChunkProcessor::new(&automaton, &patterns, ignore_case, context, FLUSH_THRESHOLD),
        current_header: String::new(),
        matches: Vec::new(),
        sink: &mut sink,
        patterns: &patterns,
        record_count: 0,
    };

    let scan_start = Instant::now();
    record_splitter::drive(reader, &mut driver)
        .with_context(|| format!("Failed while scanning {}", cli.fasta_file.display()))?;
    driver.flush_pending()?;

    eprintln!(
        "[INFO] Scanned {} record(s) in {:.2}ms",
        driver.record_count,
        scan_start.elapsed().as_secs_f64() * 1000.0
    );

    Ok(())
}

/// Wires [`record_splitter::drive`] events into a [`ChunkProcessor`] and
/// streams the resulting matches to a [`Sink`] as they're produced.
struct SinkDriver<'a, W: Write> {
    processor: ChunkProcessor<'a>,
    current_header: String,
    matches: Vec<Match>,
    sink: &'a mut Sink<W>,
    patterns: &'a PatternSet,
    record_count: usize,
}

impl<'a, W: Write> SinkDriver<'a, W> {
    /// Flush any buffered matches to the sink. On failure (e.g. a broken
    /// pipe) the matches are left in place and the error is propagated, so
    /// the caller can abort the scan instead of growing `self.matches`
    /// unboundedly while repeatedly retrying a doomed write.
    fn flush_pending(&mut self) -> ScanResult<()> {
        if !self.matches.is_empty() {
            self.sink
                .write_matches(&self.matches, self.patterns)
                .map_err(ScanError::OutputIo)?;
            self.matches.clear();
        }
        Ok(())
    }
}

impl<'a, W: Write> RecordSink for SinkDriver<'a, W> {
    fn header(&mut self, header: &str) -> ScanResult<()> {
        self.current_header = header.to_string();
        self.processor.reset();
        self.record_count += 1;
        Ok(())
    }

    fn sequence(&mut self, bytes: &[u8]) -> ScanResult<()> {
        self.processor
            .ingest(bytes, false, &self.current_header, &mut self.matches);
        self.flush_pending()
    }

    fn finalize(&mut self) -> ScanResult<()> {
        self.processor
            .finalize(&self.current_header, &mut self.matches);
        self.flush_pending()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_numeric_parse_defaults_to_zero() {
        assert_eq!(parse_trailing_numeric("5"), 5);
        assert_eq!(parse_trailing_numeric("abc"), 0);
        assert_eq!(parse_trailing_numeric(""), 0);
        assert_eq!(parse_trailing_numeric("-3"), 0);
    }

    #[test]
    fn context_is_clamped_to_a_sane_upper_bound() {
        assert_eq!(parse_context("5"), 5);
        assert_eq!(parse_context(&usize::MAX.to_string()), MAX_CONTEXT);
        assert_eq!(parse_context("abc"), 0);
    }
}
