//! Pattern catalog loading.
//!
//! A [`PatternSet`] is the immutable list of DNA motifs to search for,
//! loaded once at startup from a two-column CSV file (`name,sequence`).

use crate::error::{Result, ScanError};
use crate::file_reader;
use std::path::Path;

/// Upper bound on a single pattern's sequence length, rejected at load time
/// with [`ScanError::OversizedInput`]. Generous compared to the original
/// source's fixed 64-byte stack buffer (see `SPEC_FULL.md` §9): this
/// implementation grows dynamically and only rejects truly unbounded input.
const MAX_PATTERN_LENGTH: usize = 1 << 20;

/// Upper bound on the number of catalog rows accepted in one load.
const MAX_CATALOG_ROWS: usize = 1 << 20;

/// A single catalog entry: a named DNA motif in its original casing.
#[derive(Debug, Clone)]
pub struct Pattern {
    /// Catalog name, e.g. `"EcoRI"`.
    pub name: String,
    /// Original-case sequence, e.g. `"GAATTC"`.
    pub sequence: String,
    /// Byte length of `sequence`.
    pub length: usize,
    /// Case-folded bytes actually fed to the automaton.
    pub folded: Vec<u8>,
}

/// The full catalog of patterns to scan for, loaded once and shared for the
/// whole run.
#[derive(Debug, Clone)]
pub struct PatternSet {
    patterns: Vec<Pattern>,
    max_pattern_length: usize,
}

impl PatternSet {
    /// Load a catalog from a two-column `name,sequence` CSV file, optionally
    /// gzip-compressed (by `.gz` extension, same detection as the FASTA
    /// input; see [`file_reader::open`]).
    ///
    /// The header row is discarded. Rows missing either column are rejected
    /// with [`ScanError::CatalogFormat`]; rows with an empty sequence are
    /// likewise rejected. When `ignore_case` is set, the stored folded form
    /// is ASCII-lowercased; otherwise it is a byte-for-byte copy of
    /// `sequence`.
    pub fn load<P: AsRef<Path>>(path: P, ignore_case: bool) -> Result<Self> {
        let path = path.as_ref();
        let file = file_reader::open(path).map_err(|source| ScanError::CatalogIo {
            path: path.to_path_buf(),
            source,
        })?;
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(file);

        let mut patterns = Vec::new();
        let mut max_pattern_length = 0usize;

        for (row_num, result) in reader.records().enumerate() {
            let record = result?;
            if record.iter().all(|field| field.trim().is_empty()) {
                continue;
            }

            let name = record.get(0).ok_or_else(|| {
                ScanError::CatalogFormat(format!(
                    "row {} is missing the name column",
                    row_num + 2
                ))
            })?;
            let sequence = record.get(1).ok_or_else(|| {
                ScanError::CatalogFormat(format!(
                    "row {} is missing the sequence column",
                    row_num + 2
                ))
            })?;

            if sequence.is_empty() {
                return Err(ScanError::CatalogFormat(format!(
                    "row {} has an empty sequence",
                    row_num + 2
                )));
            }
            if sequence.len() > MAX_PATTERN_LENGTH {
                return Err(ScanError::OversizedInput(format!(
                    "row {} has a sequence of {} bytes, exceeding the {}-byte limit",
                    row_num + 2,
                    sequence.len(),
                    MAX_PATTERN_LENGTH
                )));
            }
            if patterns.len() >= MAX_CATALOG_ROWS {
                return Err(ScanError::OversizedInput(format!(
                    "catalog exceeds the {}-row limit",
                    MAX_CATALOG_ROWS
                )));
            }

            let folded = if ignore_case {
                sequence.as_bytes().to_ascii_lowercase()
            } else {
                sequence.as_bytes().to_vec()
            };

            max_pattern_length = max_pattern_length.max(sequence.len());

            patterns.push(Pattern {
                name: name.to_string(),
                sequence: sequence.to_string(),
                length: sequence.len(),
                folded,
            });
        }

        Ok(PatternSet {
            patterns,
            max_pattern_length,
        })
    }

    /// All loaded patterns, in catalog order (pattern index == position here).
    pub fn patterns(&self) -> &[Pattern] {
        &self.patterns
    }

    /// Length of the longest pattern in the catalog; 0 if empty.
    pub fn max_pattern_length(&self) -> usize {
        self.max_pattern_length
    }

    /// Number of patterns loaded.
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// Whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_catalog(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{}", contents).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn loads_basic_catalog() {
        let file = write_catalog("name,sequence\nEcoRI,GAATTC\nBamHI,GGATCC\n");
        let set = PatternSet::load(file.path(), false).unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.patterns()[0].name, "EcoRI");
        assert_eq!(set.patterns()[0].sequence, "GAATTC");
        assert_eq!(set.patterns()[0].folded, b"GAATTC");
        assert_eq!(set.max_pattern_length(), 6);
    }

    #[test]
    fn folds_case_when_requested() {
        let file = write_catalog("name,sequence\np,ACaca\n");
        let set = PatternSet::load(file.path(), true).unwrap();
        assert_eq!(set.patterns()[0].folded, b"acaca");
        assert_eq!(set.patterns()[0].sequence, "ACaca");
    }

    #[test]
    fn skips_blank_rows() {
        let file = write_catalog("name,sequence\nEcoRI,GAATTC\n\n,\n");
        let set = PatternSet::load(file.path(), false).unwrap();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn rejects_empty_sequence() {
        let file = write_catalog("name,sequence\nEcoRI,\n");
        let err = PatternSet::load(file.path(), false).unwrap_err();
        assert!(matches!(err, ScanError::CatalogFormat(_)));
    }

    #[test]
    fn rejects_oversized_pattern() {
        let oversized = "A".repeat(MAX_PATTERN_LENGTH + 1);
        let file = write_catalog(&format!("name,sequence\np,{}\n", oversized));
        let err = PatternSet::load(file.path(), false).unwrap_err();
        assert!(matches!(err, ScanError::OversizedInput(_)));
    }

    #[test]
    fn rejects_missing_file() {
        let err = PatternSet::load("/nonexistent/catalog.csv", false).unwrap_err();
        assert!(matches!(err, ScanError::CatalogIo { .. }));
    }

    #[test]
    fn empty_catalog_has_zero_max_length() {
        let file = write_catalog("name,sequence\n");
        let set = PatternSet::load(file.path(), false).unwrap();
        assert!(set.is_empty());
        assert_eq!(set.max_pattern_length(), 0);
    }
}
