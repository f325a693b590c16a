//! CSV match emission.
//!
//! Matches are written as plain, unquoted CSV: commas inside any field are
//! transliterated to `;` rather than escaped, matching the original source's
//! output format exactly (see `SPEC_FULL.md` §4.6).

use crate::chunk_processor::Match;
use crate::pattern::PatternSet;
use std::io::{self, Write};

const HEADER_ROW: &str = "header,pattern_name,pattern_sequence,position,strand,context";

/// Writes the CSV header row, then one row per [`Match`].
pub struct Sink<W: Write> {
    writer: W,
    header_written: bool,
}

impl<W: Write> Sink<W> {
    pub fn new(writer: W) -> Self {
        Sink {
            writer,
            header_written: false,
        }
    }

    /// Write the header row if it hasn't been written yet.
    pub fn write_header(&mut self) -> io::Result<()> {
        if !self.header_written {
            writeln!(self.writer, "{}", HEADER_ROW)?;
            self.header_written = true;
        }
        Ok(())
    }

    /// Write one row per match, in the order given.
    pub fn write_matches(&mut self, matches: &[Match], patterns: &PatternSet) -> io::Result<()> {
        self.write_header()?;
        for m in matches {
            let pattern = &patterns.patterns()[m.pattern_index];
            writeln!(
                self.writer,
                "{},{},{},{},{},{}",
                escape(&m.header),
                escape(&pattern.name),
                escape(&pattern.sequence),
                m.position,
                m.strand.as_str(),
                escape(&String::from_utf8_lossy(&m.context)),
            )?;
        }
        Ok(())
    }
}

fn escape(field: &str) -> String {
    field.replace(',', ";")
}
