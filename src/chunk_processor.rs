//! Streaming forward/reverse-complement scan core.
//!
//! A [`ChunkProcessor`] owns the not-yet-finalized tail of one FASTA
//! record's sequence (in original casing and case-folded form), runs the
//! shared [`Automaton`] over both strands on every flush, and emits
//! [`Match`]es with coordinates in the original record. It is built once
//! per input file and reset between records rather than rebuilt, since the
//! automaton and pattern catalog it references never change across a run.

use crate::automaton::Automaton;
use crate::pattern::PatternSet;
use crate::revcomp::{reverse_complement, to_ascii_lowercase};

/// Which strand a match was found on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strand {
    Forward,
    Reverse,
}

impl Strand {
    pub fn as_str(&self) -> &'static str {
        match self {
            Strand::Forward => "forward",
            Strand::Reverse => "reverse",
        }
    }
}

/// A single reported hit, ready for the sink.
#[derive(Debug, Clone)]
pub struct Match {
    pub header: String,
    pub pattern_index: usize,
    /// 0-based, forward-strand leftmost coordinate in the original record.
    pub position: usize,
    pub strand: Strand,
    /// Context window, in the alphabet of the strand it was found on.
    pub context: Vec<u8>,
}

/// Streaming state for one record's sequence. Reused across records in the
/// same file via [`ChunkProcessor::reset`].
pub struct ChunkProcessor<'a> {
    automaton: &'a Automaton,
    patterns: &'a PatternSet,
    ignore_case: bool,
    context: usize,
    max_pattern_length: usize,
    flush_threshold: usize,
    forward: Vec<u8>,
    folded: Vec<u8>,
    global_offset: usize,
}

impl<'a> ChunkProcessor<'a> {
    /// `flush_threshold` is the configured watermark; it is clamped upward
    /// to at least the catalog's longest pattern, per §4.4's edge case.
    pub fn new(
        automaton: &'a Automaton,
        patterns: &'a PatternSet,
        ignore_case: bool,
        context: usize,
        flush_threshold: usize,
    ) -> Self {
        let max_pattern_length = patterns.max_pattern_length();
        ChunkProcessor {
            automaton,
            patterns,
            ignore_case,
            context,
            max_pattern_length,
            flush_threshold: flush_threshold.max(max_pattern_length),
            forward: Vec::new(),
            folded: Vec::new(),
            global_offset: 0,
        }
    }

    /// Start a fresh record: drop any buffered tail and zero the offset.
    pub fn reset(&mut self) {
        self.forward.clear();
        self.folded.clear();
        self.global_offset = 0;
    }

    /// Feed a whitespace-free sequence fragment of the current record.
    /// Matches discovered by this call (if any flush happens) are appended
    /// to `out`.
    pub fn ingest(&mut self, bytes: &[u8], is_final: bool, header: &str, out: &mut Vec<Match>) {
        self.forward.extend_from_slice(bytes);
        if self.ignore_case {
            self.folded
                .extend(bytes.iter().map(|b| b.to_ascii_lowercase()));
        } else {
            self.folded.extend_from_slice(bytes);
        }

        let total = self.forward.len();
        let flush_len = if is_final {
            total
        } else if total >= self.flush_threshold {
            total - self.max_pattern_length.saturating_sub(1)
        } else {
            return;
        };

        self.flush(flush_len, header, out);

        if is_final {
            self.forward.clear();
            self.folded.clear();
            self.global_offset = 0;
        } else {
            self.forward.drain(0..flush_len);
            self.folded.drain(0..flush_len);
            self.global_offset += flush_len;
        }
    }

    /// Finalize the current record: flush everything buffered and discard
    /// the buffers. Equivalent to `ingest(&[], true, header, out)`.
    pub fn finalize(&mut self, header: &str, out: &mut Vec<Match>) {
        self.ingest(&[], true, header, out);
    }

    fn flush(&self, flush_len: usize, header: &str, out: &mut Vec<Match>) {
        if flush_len == 0 {
            return;
        }

        let window_forward = &self.forward[0..flush_len];
        let window_folded = &self.folded[0..flush_len];

        let mut forward_hits = Vec::new();
        self.automaton
            .scan(window_folded, |end, p| forward_hits.push((end, p)));
        for (end, pattern_index) in forward_hits {
            let pattern = &self.patterns.patterns()[pattern_index as usize];
            let local_start = end + 1 - pattern.length;
            let position = self.global_offset + local_start;
            let ctx_lo = local_start.saturating_sub(self.context);
            let ctx_hi = local_start
                .saturating_add(pattern.length)
                .saturating_add(self.context)
                .min(flush_len);
            out.push(Match {
                header: header.to_string(),
                pattern_index: pattern_index as usize,
                position,
                strand: Strand::Forward,
                context: window_forward[ctx_lo..ctx_hi].to_vec(),
            });
        }

        let rev = reverse_complement(window_forward);
        let rev_folded = if self.ignore_case {
            to_ascii_lowercase(&rev)
        } else {
            rev.clone()
        };

        let mut reverse_hits = Vec::new();
        self.automaton
            .scan(&rev_folded, |end, p| reverse_hits.push((end, p)));
        for (end, pattern_index) in reverse_hits {
            let pattern = &self.patterns.patterns()[pattern_index as usize];
            let local_start = end + 1 - pattern.length;
            let position = self.global_offset + (flush_len - 1 - end);
            let ctx_lo = local_start.saturating_sub(self.context);
            let ctx_hi = local_start
                .saturating_add(pattern.length)
                .saturating_add(self.context)
                .min(flush_len);
            out.push(Match {
                header: header.to_string(),
                pattern_index: pattern_index as usize,
                position,
                strand: Strand::Reverse,
                context: rev[ctx_lo..ctx_hi].to_vec(),
            });
        }
    }
}
