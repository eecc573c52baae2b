//! Partitioning of a chromosome sequence into [`GenomeChunk`] records
//!
//! Chunk bounds come from [`ChunkGrid`]: chunk 0 covers `[1, size-1]` and
//! chunk `k` covers `[k*size, k*size+size-1]`. The last chunk runs to the end
//! of the sequence. Two quirks of the established on-disk format are kept:
//! a sequence shorter than one chunk is emitted with `end = len - 1`, and a
//! sequence of exactly `size` bases stops after chunk 0, dropping its final
//! base.

use std::io::Write;

use crate::coords::ChunkGrid;
use crate::error::{ChunkError, ChunkResult};
use crate::io::ChunkWriter;
use crate::types::*;

const PROGRESS_INTERVAL: ChunkId = 10_000;

/// Lazily yields the chunks of one chromosome in increasing id order.
pub struct SequenceChunks<'a> {
    chromosome: &'a str,
    sequence: &'a str,
    grid: ChunkGrid,
    next_id: ChunkId,
    finished: bool,
}

impl<'a> SequenceChunks<'a> {
    fn emit(
        &self,
        chunk_id: ChunkId,
        start: GenomicPos,
        end: GenomicPos,
        from: usize,
        to: usize,
    ) -> GenomeChunk {
        let bytes = &self.sequence.as_bytes()[from..to];
        GenomeChunk {
            chromosome: self.chromosome.to_string(),
            chunk_id,
            start,
            end,
            sequence: String::from_utf8_lossy(bytes).into_owned(),
        }
    }
}

impl<'a> Iterator for SequenceChunks<'a> {
    type Item = GenomeChunk;

    fn next(&mut self) -> Option<GenomeChunk> {
        let len = self.sequence.len() as GenomicPos;
        if self.finished || len == 0 {
            return None;
        }

        if len < self.grid.chunk_size() {
            self.finished = true;
            return Some(self.emit(0, 1, len - 1, 0, len as usize));
        }

        let chunk_id = self.next_id;
        let start = self.grid.chunk_start(chunk_id);
        if start >= len {
            self.finished = true;
            return None;
        }

        let chunk_end = self.grid.chunk_end(chunk_id);
        let end = if chunk_id == 0 || chunk_end + 1 < len {
            chunk_end
        } else {
            self.finished = true;
            len
        };

        self.next_id += 1;
        Some(self.emit(chunk_id, start, end, (start - 1) as usize, end as usize))
    }
}

/// Streams chromosome sequences into chunk records.
#[derive(Debug, Clone, Copy)]
pub struct SequenceChunker {
    grid: ChunkGrid,
}

impl SequenceChunker {
    /// A width of 1 would make chunk 0 empty and never advance.
    pub fn new(grid: ChunkGrid) -> ChunkResult<Self> {
        if grid.chunk_size() < 2 {
            return Err(ChunkError::InvalidChunkSize(grid.chunk_size()));
        }
        Ok(Self { grid })
    }

    pub fn grid(&self) -> ChunkGrid {
        self.grid
    }

    pub fn chunks<'a>(&self, chromosome: &'a str, sequence: &'a str) -> SequenceChunks<'a> {
        SequenceChunks {
            chromosome,
            sequence,
            grid: self.grid,
            next_id: 0,
            finished: false,
        }
    }

    /// Write every chunk of one chromosome as it is produced.
    /// Returns the number of chunks written.
    ///
    /// Chunk bounds are byte offsets, so a sequence holding anything but
    /// ASCII is rejected before the first record is written.
    pub fn write_chunks<W: Write>(
        &self,
        chromosome: &str,
        sequence: &str,
        writer: &mut ChunkWriter<W>,
    ) -> ChunkResult<u64> {
        if !sequence.is_ascii() {
            return Err(ChunkError::malformed_record(
                0,
                format!("sequence of chromosome '{}' is not ASCII", chromosome),
            ));
        }

        let mut written = 0;
        for chunk in self.chunks(chromosome, sequence) {
            if chunk.chunk_id % PROGRESS_INTERVAL == 0 {
                log::debug!("Chr:{} chunkId:{}", chromosome, chunk.chunk_id);
            }
            writer.write_record(&chunk)?;
            written += 1;
        }
        Ok(written)
    }
}
