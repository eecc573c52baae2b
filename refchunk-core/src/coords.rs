use crate::types::*;

/// Chunk width used when a configured width is zero or negative.
pub const DEFAULT_CHUNK_SIZE: u64 = 2000;

/// Fixed-width partition of chromosome coordinates.
///
/// Chunk 0 starts at position 1 because coordinates are 1-based, so it is one
/// base narrower than every later chunk. Both chunkers derive their bounds
/// from here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkGrid {
    chunk_size: u64,
}

impl ChunkGrid {
    pub fn new(chunk_size: i64) -> Self {
        let chunk_size = if chunk_size <= 0 {
            DEFAULT_CHUNK_SIZE
        } else {
            chunk_size as u64
        };
        Self { chunk_size }
    }

    pub fn chunk_size(&self) -> u64 {
        self.chunk_size
    }

    pub fn chunk_id(&self, position: GenomicPos) -> ChunkId {
        position / self.chunk_size
    }

    pub fn chunk_start(&self, id: ChunkId) -> GenomicPos {
        if id == 0 {
            1
        } else {
            id.saturating_mul(self.chunk_size)
        }
    }

    pub fn chunk_end(&self, id: ChunkId) -> GenomicPos {
        id.saturating_mul(self.chunk_size)
            .saturating_add(self.chunk_size - 1)
    }

    /// Inclusive range of chunk ids touched by `[start, end]`.
    pub fn chunk_span(
        &self,
        start: GenomicPos,
        end: GenomicPos,
    ) -> std::ops::RangeInclusive<ChunkId> {
        self.chunk_id(start)..=self.chunk_id(end)
    }
}

impl Default for ChunkGrid {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

pub fn chunk_id(position: GenomicPos, chunk_size: i64) -> ChunkId {
    ChunkGrid::new(chunk_size).chunk_id(position)
}

pub fn chunk_start(id: ChunkId, chunk_size: i64) -> GenomicPos {
    ChunkGrid::new(chunk_size).chunk_start(id)
}

pub fn chunk_end(id: ChunkId, chunk_size: i64) -> GenomicPos {
    ChunkGrid::new(chunk_size).chunk_end(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_bounds() {
        assert_eq!(chunk_start(0, 2000), 1);
        assert_eq!(chunk_end(0, 2000), 1999);
        assert_eq!(chunk_start(1, 2000), 2000);
        assert_eq!(chunk_end(1, 2000), 3999);
        assert_eq!(chunk_start(2, 2000), 4000);
        assert_eq!(chunk_end(2, 2000), 5999);
    }

    #[test]
    fn test_chunk_id() {
        assert_eq!(chunk_id(1, 2000), 0);
        assert_eq!(chunk_id(1999, 2000), 0);
        assert_eq!(chunk_id(2000, 2000), 1);
        assert_eq!(chunk_id(1500, 2000), 0);
        assert_eq!(chunk_id(2500, 2000), 1);
    }

    #[test]
    fn test_non_positive_size_falls_back_to_default() {
        assert_eq!(ChunkGrid::new(0).chunk_size(), DEFAULT_CHUNK_SIZE);
        assert_eq!(ChunkGrid::new(-5).chunk_size(), DEFAULT_CHUNK_SIZE);
        assert_eq!(chunk_id(4000, 0), 2);
        assert_eq!(chunk_end(1, -1), 3999);
    }

    #[test]
    fn test_chunk_span() {
        let grid = ChunkGrid::new(2000);
        let span: Vec<_> = grid.chunk_span(1500, 2500).collect();
        assert_eq!(span, vec![0, 1]);
        let span: Vec<_> = grid.chunk_span(10, 20).collect();
        assert_eq!(span, vec![0]);
    }

    #[test]
    fn test_custom_width() {
        let grid = ChunkGrid::new(100);
        assert_eq!(grid.chunk_start(0), 1);
        assert_eq!(grid.chunk_end(0), 99);
        assert_eq!(grid.chunk_start(5), 500);
        assert_eq!(grid.chunk_end(5), 599);
    }
}
