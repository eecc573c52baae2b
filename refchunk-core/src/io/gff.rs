//! 9-column tab-delimited annotation records (GFF-like)
//!
//! Columns: seqname, source, feature, start, end, score, strand, frame,
//! attributes. Blank lines and `#` comment/directive lines are skipped.

use std::io::BufRead;
use std::path::Path;

use crate::error::{ChunkError, ChunkResult};
use crate::io::open_text_reader;
use crate::types::GenomicPos;

pub const GFF_COLUMNS: usize = 9;

/// One raw annotation line split into its columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GffRecord {
    pub seqname: String,
    pub source: String,
    pub feature: String,
    pub start: GenomicPos,
    pub end: GenomicPos,
    pub score: String,
    pub strand: String,
    pub frame: String,
    pub attributes: String,
}

impl GffRecord {
    /// Split one line. `line_number` is only used for error messages.
    pub fn from_line(line: &str, line_number: usize) -> ChunkResult<Self> {
        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() != GFF_COLUMNS {
            return Err(ChunkError::malformed_record(
                line_number,
                format!("expected {} tab-separated columns, got {}", GFF_COLUMNS, fields.len()),
            ));
        }

        let start = parse_position(fields[3], "start", line_number)?;
        let end = parse_position(fields[4], "end", line_number)?;

        Ok(Self {
            seqname: fields[0].to_string(),
            source: fields[1].to_string(),
            feature: fields[2].to_string(),
            start,
            end,
            score: fields[5].to_string(),
            strand: fields[6].to_string(),
            frame: fields[7].to_string(),
            attributes: fields[8].to_string(),
        })
    }
}

fn parse_position(raw: &str, column: &str, line_number: usize) -> ChunkResult<GenomicPos> {
    raw.trim().parse::<GenomicPos>().map_err(|_| {
        ChunkError::malformed_record(
            line_number,
            format!("invalid {} coordinate '{}'", column, raw),
        )
    })
}

/// Streaming reader over annotation records.
pub struct GffReader<R> {
    reader: R,
    line: String,
    line_number: usize,
}

impl<R: BufRead> GffReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line: String::new(),
            line_number: 0,
        }
    }

    pub fn line_number(&self) -> usize {
        self.line_number
    }
}

impl GffReader<Box<dyn BufRead>> {
    pub fn from_path<P: AsRef<Path>>(path: P) -> ChunkResult<Self> {
        Ok(Self::new(open_text_reader(path)?))
    }
}

impl<R: BufRead> Iterator for GffReader<R> {
    type Item = ChunkResult<GffRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            self.line.clear();
            match self.reader.read_line(&mut self.line) {
                Ok(0) => return None,
                Ok(_) => self.line_number += 1,
                Err(e) => return Some(Err(ChunkError::Io(e))),
            }

            let line = self.line.trim_end_matches(&['\n', '\r'][..]);
            if line.trim().is_empty() || line.starts_with('#') {
                continue;
            }
            return Some(GffRecord::from_line(line, self.line_number));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const LINE: &str = "chr1\tRegulatory_Build\tPromoter\t10000\t10600\t.\t+\t.\tName=ENSR001;Alias=p1";

    #[test]
    fn test_parse_line() {
        let record = GffRecord::from_line(LINE, 1).unwrap();
        assert_eq!(record.seqname, "chr1");
        assert_eq!(record.source, "Regulatory_Build");
        assert_eq!(record.feature, "Promoter");
        assert_eq!(record.start, 10000);
        assert_eq!(record.end, 10600);
        assert_eq!(record.score, ".");
        assert_eq!(record.strand, "+");
        assert_eq!(record.frame, ".");
        assert_eq!(record.attributes, "Name=ENSR001;Alias=p1");
    }

    #[test]
    fn test_wrong_column_count() {
        let err = GffRecord::from_line("chr1\tsrc\tfeat\t1\t2", 7).unwrap_err();
        match err {
            ChunkError::MalformedRecord { line, message } => {
                assert_eq!(line, 7);
                assert!(message.contains("got 5"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_bad_coordinate() {
        let line = LINE.replace("10600", "10k");
        assert!(matches!(
            GffRecord::from_line(&line, 3),
            Err(ChunkError::MalformedRecord { line: 3, .. })
        ));
    }

    #[test]
    fn test_reader_skips_comments_and_blank_lines() {
        let data = format!("##gff-version 3\n\n{}\n# trailing comment\n{}\n", LINE, LINE);
        let mut reader = GffReader::new(Cursor::new(data));
        let records: Vec<_> = reader.by_ref().collect::<ChunkResult<Vec<_>>>().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(reader.line_number(), 5);
    }

    #[test]
    fn test_reader_reports_line_number_of_bad_record() {
        let data = format!("{}\nnot a record\n", LINE);
        let results: Vec<_> = GffReader::new(Cursor::new(data)).collect();
        assert!(results[0].is_ok());
        assert!(matches!(results[1], Err(ChunkError::MalformedRecord { line: 2, .. })));
    }
}
