//! Assignment of features to every chunk they overlap
//!
//! A feature spanning several chunks is copied whole into each of them; it is
//! never cut at chunk boundaries.

use std::collections::BTreeMap;

use crate::coords::ChunkGrid;
use crate::types::*;

/// Counters for one (chromosome, source) assignment pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AssignStats {
    pub features: u64,
    pub placements: u64,
    pub unresolved: u64,
    pub mismatched: u64,
}

impl AssignStats {
    pub fn merge(&mut self, other: AssignStats) {
        self.features += other.features;
        self.placements += other.placements;
        self.unresolved += other.unresolved;
        self.mismatched += other.mismatched;
    }
}

/// Chunks of one chromosome for one source, keyed by chunk id.
///
/// Iteration follows increasing chunk id.
#[derive(Debug, Clone, Default)]
pub struct FeatureChunkMap {
    chunks: BTreeMap<ChunkId, FeatureChunk>,
    stats: AssignStats,
}

impl FeatureChunkMap {
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    pub fn get(&self, chunk_id: ChunkId) -> Option<&FeatureChunk> {
        self.chunks.get(&chunk_id)
    }

    pub fn chunk_ids(&self) -> impl Iterator<Item = ChunkId> + '_ {
        self.chunks.keys().copied()
    }

    pub fn stats(&self) -> AssignStats {
        self.stats
    }

    pub fn iter(&self) -> impl Iterator<Item = &FeatureChunk> {
        self.chunks.values()
    }

    pub fn into_chunks(self) -> impl Iterator<Item = FeatureChunk> {
        self.chunks.into_values()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FeatureChunkAssigner {
    grid: ChunkGrid,
}

impl FeatureChunkAssigner {
    pub fn new(grid: ChunkGrid) -> Self {
        Self { grid }
    }

    pub fn grid(&self) -> ChunkGrid {
        self.grid
    }

    /// Distribute `features` of `chromosome` over the chunks they overlap.
    ///
    /// Each feature's chromosome loses any `chr` prefix. A feature without a
    /// chromosome is reported and still placed by its coordinates, but it is
    /// left out of the check against `chromosome`.
    pub fn assign(
        &self,
        chromosome: &str,
        source: &str,
        features: Vec<Feature>,
    ) -> FeatureChunkMap {
        let mut map = FeatureChunkMap::default();
        let expected = normalize_chromosome(chromosome);

        for mut feature in features {
            map.stats.features += 1;

            match feature.chromosome.take() {
                Some(label) => {
                    let label = normalize_chromosome(&label).to_string();
                    if label != expected {
                        map.stats.mismatched += 1;
                        log::warn!(
                            "Feature {}:{}-{} from {} listed under chromosome {}",
                            label, feature.start, feature.end, source, expected
                        );
                    }
                    feature.chromosome = Some(label);
                }
                None => {
                    map.stats.unresolved += 1;
                    log::warn!(
                        "{} => feature {} at {}-{} has no chromosome (processing {}, source {})",
                        map.stats.unresolved,
                        feature.feature_type,
                        feature.start,
                        feature.end,
                        expected,
                        source
                    );
                }
            }

            for chunk_id in self.grid.chunk_span(feature.start, feature.end) {
                let grid = self.grid;
                map.chunks
                    .entry(chunk_id)
                    .or_insert_with(|| {
                        FeatureChunk::new(
                            expected.to_string(),
                            chunk_id,
                            grid.chunk_start(chunk_id),
                            grid.chunk_end(chunk_id),
                        )
                    })
                    .features
                    .push(feature.clone());
                map.stats.placements += 1;
            }
        }

        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feature(chromosome: Option<&str>, start: GenomicPos, end: GenomicPos) -> Feature {
        Feature {
            chromosome: chromosome.map(str::to_string),
            source: "Ensembl".to_string(),
            feature_type: "TF_binding_site".to_string(),
            start,
            end,
            score: ".".to_string(),
            strand: "+".to_string(),
            frame: ".".to_string(),
            name: Some(format!("f{}", start)),
            alias: None,
            feature_class: None,
            matrix: None,
            cell_types: Vec::new(),
        }
    }

    fn assigner() -> FeatureChunkAssigner {
        FeatureChunkAssigner::new(ChunkGrid::new(2000))
    }

    #[test]
    fn test_feature_spanning_two_chunks_is_replicated() {
        let map = assigner().assign("1", "annotated", vec![feature(Some("chr1"), 1500, 2500)]);
        assert_eq!(map.chunk_ids().collect::<Vec<_>>(), vec![0, 1]);

        let first = map.get(0).unwrap();
        let second = map.get(1).unwrap();
        assert_eq!((first.chunk_start, first.chunk_end), (1, 1999));
        assert_eq!((second.chunk_start, second.chunk_end), (2000, 3999));
        assert_eq!(first.features, second.features);
        assert_eq!(first.features[0].start, 1500);
        assert_eq!(first.features[0].end, 2500);
        assert_eq!(map.stats().placements, 2);
    }

    #[test]
    fn test_chunks_are_ordered_and_features_keep_input_order() {
        let features = vec![
            feature(Some("chr2"), 9000, 9100),
            feature(Some("chr2"), 10, 20),
            feature(Some("chr2"), 30, 40),
        ];
        let map = assigner().assign("2", "motif", features);
        assert_eq!(map.chunk_ids().collect::<Vec<_>>(), vec![0, 4]);

        let names: Vec<_> = map
            .get(0)
            .unwrap()
            .features
            .iter()
            .map(|f| f.name.clone().unwrap())
            .collect();
        assert_eq!(names, vec!["f10", "f30"]);
    }

    #[test]
    fn test_chr_prefix_is_stripped() {
        let map = assigner().assign("chrX", "mirna", vec![feature(Some("chrX"), 5, 6)]);
        let chunk = map.get(0).unwrap();
        assert_eq!(chunk.chromosome, "X");
        assert_eq!(chunk.features[0].chromosome.as_deref(), Some("X"));
        assert_eq!(map.stats().mismatched, 0);
    }

    #[test]
    fn test_unresolved_chromosome_is_counted_but_placed() {
        let map = assigner().assign("3", "regulatory", vec![feature(None, 3990, 4010)]);
        assert_eq!(map.chunk_ids().collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(map.stats().unresolved, 1);
        assert_eq!(map.stats().mismatched, 0);
        assert_eq!(map.get(1).unwrap().features[0].chromosome, None);
    }

    #[test]
    fn test_mismatched_chromosome_is_counted() {
        let map = assigner().assign("3", "regulatory", vec![feature(Some("chr4"), 1, 2)]);
        assert_eq!(map.stats().mismatched, 1);
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_no_features_no_chunks() {
        let map = assigner().assign("5", "annotated", Vec::new());
        assert!(map.is_empty());
        assert_eq!(map.stats(), AssignStats::default());
    }
}
