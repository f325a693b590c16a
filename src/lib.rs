//! fastamotif - streaming multi-pattern DNA motif scanner
//!
//! Scans nucleotide sequences in (optionally gzip-compressed) FASTA files for
//! occurrences of a user-supplied catalog of DNA patterns, reporting every
//! hit on both the forward strand and the reverse-complement strand together
//! with surrounding context.
//!
//! # Architecture
//!
//! ```text
//! bytes (file or stdin, gzip-transparent)
//!   -> RecordSplitter   (header / sequence boundary detection)
//!   -> ChunkProcessor   (Aho-Corasick scan, forward + reverse-complement)
//!   -> Sink             (CSV row emission)
//! ```
//!
//! `PatternSet` and `Automaton` are built once at startup and shared for the
//! whole run; a `ChunkProcessor` is reused across every record in one file.
//!
//! # Example
//!
//! ```rust,no_run
//! use fastamotif::pattern::PatternSet;
//! use fastamotif::automaton::Automaton;
//!
//! let patterns = PatternSet::load("catalog.csv", false)?;
//! let automaton = Automaton::build(&patterns);
//! # Ok::<(), fastamotif::error::ScanError>(())
//! ```

#![warn(missing_docs)]

/// Aho-Corasick automaton: arena-based trie, failure links, streaming scan.
pub mod automaton;
/// Streaming forward/reverse-complement scan core.
pub mod chunk_processor;
/// Error types for catalog loading, FASTA scanning, and output.
pub mod error;
/// Gzip-transparent file/stdin opening.
pub mod file_reader;
/// Pattern catalog loading.
pub mod pattern;
/// FASTA record boundary detection.
pub mod record_splitter;
/// Reverse-complement construction.
pub mod revcomp;
/// CSV match emission.
pub mod sink;

pub use crate::automaton::Automaton;
pub use crate::chunk_processor::{ChunkProcessor, Match, Strand};
pub use crate::error::{Result, ScanError};
pub use crate::pattern::{Pattern, PatternSet};
pub use crate::record_splitter::RecordSink;
pub use crate::sink::Sink;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
