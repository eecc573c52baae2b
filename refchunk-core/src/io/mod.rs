//! File format I/O modules for refchunk
//!
//! Readers for FASTA and 9-column annotation files (plain or gzip) and the
//! newline-delimited JSON writer that receives every chunk record.

pub mod fasta;
pub mod gff;
pub mod sink;

pub use fasta::{FastaChromosome, FastaChromosomes};
pub use gff::{GffReader, GffRecord};
pub use sink::ChunkWriter;

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use flate2::read::MultiGzDecoder;

use crate::error::ChunkResult;

/// Returns true when the path carries a `.gz` extension.
pub fn is_gzip_path<P: AsRef<Path>>(path: P) -> bool {
    path.as_ref()
        .to_string_lossy()
        .to_lowercase()
        .ends_with(".gz")
}

/// Open a text file, decompressing on the fly when it ends in `.gz`.
///
/// Multi-member streams (bgzip) are read to the end rather than stopping
/// after the first member.
pub fn open_text_reader<P: AsRef<Path>>(path: P) -> ChunkResult<Box<dyn BufRead>> {
    let file = File::open(&path)?;

    if is_gzip_path(&path) {
        Ok(Box::new(BufReader::new(MultiGzDecoder::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}
