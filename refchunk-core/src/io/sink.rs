//! Newline-delimited JSON output for chunk records
//!
//! One serialized record per line, appended in the order the chunkers emit
//! them. Nothing is buffered beyond the underlying `BufWriter`; a failed run
//! leaves whatever was already flushed in place.

use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::{ChunkError, ChunkResult};

pub struct ChunkWriter<W: Write> {
    writer: W,
    records_written: u64,
}

impl ChunkWriter<BufWriter<File>> {
    /// Create (or truncate) the output file.
    pub fn create<P: AsRef<Path>>(path: P) -> ChunkResult<Self> {
        let file = File::create(path)?;
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write> ChunkWriter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            records_written: 0,
        }
    }

    pub fn write_record<T: Serialize>(&mut self, record: &T) -> ChunkResult<()> {
        serde_json::to_writer(&mut self.writer, record).map_err(|e| {
            if e.is_io() {
                ChunkError::Io(e.into())
            } else {
                ChunkError::Serialization(e)
            }
        })?;
        self.writer.write_all(b"\n")?;
        self.records_written += 1;
        Ok(())
    }

    pub fn records_written(&self) -> u64 {
        self.records_written
    }

    pub fn flush(&mut self) -> ChunkResult<()> {
        self.writer.flush()?;
        Ok(())
    }

    /// Flush and hand back the underlying writer.
    pub fn into_inner(mut self) -> ChunkResult<W> {
        self.writer.flush()?;
        Ok(self.writer)
    }
}
