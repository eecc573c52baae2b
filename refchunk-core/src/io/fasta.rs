//! Streaming FASTA reader that yields one whole chromosome at a time.
//!
//! Each record's sequence lines are concatenated into a buffer owned by that
//! record alone, so peak memory is one chromosome rather than the genome.

use std::io::BufRead;
use std::path::Path;

use crate::error::{ChunkError, ChunkResult};
use crate::io::open_text_reader;

/// One FASTA record with its lines joined.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FastaChromosome {
    /// Header token before the first space, without the `>`
    pub name: String,
    pub sequence: String,
}

impl FastaChromosome {
    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }
}

/// Iterator over the non-empty records of a FASTA stream.
///
/// Sequence lines before the first header belong to a chromosome with an
/// empty name. Records without sequence lines are skipped.
pub struct FastaChromosomes<R> {
    reader: R,
    name: String,
    line: String,
    line_number: usize,
    finished: bool,
}

impl<R: BufRead> FastaChromosomes<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            name: String::new(),
            line: String::new(),
            line_number: 0,
            finished: false,
        }
    }
}

impl FastaChromosomes<Box<dyn BufRead>> {
    /// Open a plain or gzip-compressed FASTA file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> ChunkResult<Self> {
        Ok(Self::new(open_text_reader(path)?))
    }
}

fn header_name(header: &str) -> String {
    header.split(' ').next().unwrap_or("").to_string()
}

impl<R: BufRead> Iterator for FastaChromosomes<R> {
    type Item = ChunkResult<FastaChromosome>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        let mut sequence = String::new();
        loop {
            self.line.clear();
            match self.reader.read_line(&mut self.line) {
                Ok(0) => {
                    self.finished = true;
                    if sequence.is_empty() {
                        return None;
                    }
                    return Some(Ok(FastaChromosome {
                        name: std::mem::take(&mut self.name),
                        sequence,
                    }));
                }
                Ok(_) => self.line_number += 1,
                Err(e) => {
                    self.finished = true;
                    return Some(Err(ChunkError::Io(e)));
                }
            }

            let line = self.line.trim_end_matches(&['\n', '\r'][..]);
            if let Some(header) = line.strip_prefix('>') {
                let previous = std::mem::replace(&mut self.name, header_name(header));
                if !sequence.is_empty() {
                    return Some(Ok(FastaChromosome {
                        name: previous,
                        sequence,
                    }));
                }
                if self.line_number > 1 {
                    log::debug!("Skipping FASTA record '{}' with no sequence", previous);
                }
            } else {
                sequence.push_str(line);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn read_all(data: &str) -> Vec<FastaChromosome> {
        FastaChromosomes::new(Cursor::new(data.to_string()))
            .collect::<ChunkResult<Vec<_>>>()
            .unwrap()
    }

    #[test]
    fn test_multiline_records() {
        let records = read_all(">1 dna:chromosome chromosome:GRCh37:1\nACGT\nTTGG\n>2\nCC\n");
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name, "1");
        assert_eq!(records[0].sequence, "ACGTTTGG");
        assert_eq!(records[1].name, "2");
        assert_eq!(records[1].sequence, "CC");
    }

    #[test]
    fn test_empty_record_between_headers_is_skipped() {
        let records = read_all(">1\nAAAA\n>2\n>3\nGGGG\n");
        let names: Vec<_> = records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["1", "3"]);
    }

    #[test]
    fn test_missing_header_yields_unnamed_chromosome() {
        let records = read_all("ACGT\nACGT\n");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "");
        assert_eq!(records[0].sequence, "ACGTACGT");
    }

    #[test]
    fn test_crlf_and_missing_final_newline() {
        let records = read_all(">MT\r\nGATC\r\nGA");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "MT");
        assert_eq!(records[0].sequence, "GATCGA");
    }

    #[test]
    fn test_empty_input() {
        assert!(read_all("").is_empty());
        assert!(read_all(">lonely\n").is_empty());
    }
}
