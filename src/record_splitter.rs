//! FASTA record boundary detection.
//!
//! Drives a [`ChunkProcessor`](crate::chunk_processor::ChunkProcessor) (or
//! any [`RecordSink`]) over a raw byte stream: recognizes `>`-prefixed
//! header lines, strips whitespace from sequence lines, and finalizes the
//! current record at every header boundary and at EOF.

use crate::error::{Result, ScanError};
use memchr::memchr;
use std::io::BufRead;
use std::path::Path;

/// Upper bound on a single header line's byte length, rejected with
/// [`ScanError::OversizedInput`]. Generous compared to the original
/// source's fixed 256-byte stack buffer (see `SPEC_FULL.md` §9): this
/// implementation grows the header buffer dynamically and only rejects
/// truly unbounded input.
const MAX_HEADER_LENGTH: usize = 1 << 20;

/// Receives record boundaries and whitespace-stripped sequence bytes from
/// [`drive`]. Implementors decide what a new header, a sequence fragment,
/// and a finalize event mean — typically "remember the header" / "feed the
/// chunk processor" / "flush the chunk processor". Each method is fallible
/// so a downstream failure (e.g. a broken pipe while writing matches) stops
/// the drive loop instead of being silently dropped.
pub trait RecordSink {
    /// A new record's header line (without the leading `>` or trailing
    /// newline) has been read.
    fn header(&mut self, header: &str) -> Result<()>;

    /// A whitespace-free fragment of the current record's sequence.
    fn sequence(&mut self, bytes: &[u8]) -> Result<()>;

    /// The current record has ended (next header seen, or EOF). Safe to
    /// call even when no record is open yet.
    fn finalize(&mut self) -> Result<()>;
}

/// Read `reader` to EOF, driving `sink` with header/sequence/finalize
/// events. A physical line is a header line only when its first byte is
/// `>`; everything else up to the next such line (or EOF) is sequence.
pub fn drive<R: BufRead>(mut reader: R, sink: &mut impl RecordSink) -> Result<()> {
    let mut in_header = false;
    let mut at_line_start = true;
    let mut header_buf: Vec<u8> = Vec::new();
    let mut seq_buf: Vec<u8> = Vec::new();

    loop {
        let buf = reader.fill_buf().map_err(|source| ScanError::InputIo {
            path: Path::new("<stream>").to_path_buf(),
            source,
        })?;
        if buf.is_empty() {
            break;
        }
        let len = buf.len();

        let mut i = 0;
        while i < len {
            let b = buf[i];

            if at_line_start && b == b'>' {
                if !seq_buf.is_empty() {
                    sink.sequence(&seq_buf)?;
                    seq_buf.clear();
                }
                sink.finalize()?;
                in_header = true;
                header_buf.clear();
                at_line_start = false;
                i += 1;
                continue;
            }

            if in_header {
                // A header line is usually short; find its end in one shot
                // instead of re-checking byte-by-byte.
                match memchr(b'\n', &buf[i..len]) {
                    Some(offset) => {
                        header_buf.extend_from_slice(&buf[i..i + offset]);
                        check_header_length(&header_buf)?;
                        emit_header(&mut header_buf, sink)?;
                        in_header = false;
                        at_line_start = true;
                        i += offset + 1;
                    }
                    None => {
                        header_buf.extend_from_slice(&buf[i..len]);
                        check_header_length(&header_buf)?;
                        i = len;
                    }
                }
                continue;
            }

            at_line_start = b == b'\n';
            if !b.is_ascii_whitespace() {
                seq_buf.push(b);
            }
            i += 1;
        }

        reader.consume(len);
        if !seq_buf.is_empty() {
            sink.sequence(&seq_buf)?;
            seq_buf.clear();
        }
    }

    if in_header {
        emit_header(&mut header_buf, sink)?;
    }
    sink.finalize()?;

    Ok(())
}

fn check_header_length(header_buf: &[u8]) -> Result<()> {
    if header_buf.len() > MAX_HEADER_LENGTH {
        return Err(ScanError::OversizedInput(format!(
            "header line exceeds the {}-byte limit",
            MAX_HEADER_LENGTH
        )));
    }
    Ok(())
}

fn emit_header(header_buf: &mut Vec<u8>, sink: &mut impl RecordSink) -> Result<()> {
    if header_buf.last() == Some(&b'\r') {
        header_buf.pop();
    }
    let header = String::from_utf8_lossy(header_buf);
    sink.header(&header)
}
