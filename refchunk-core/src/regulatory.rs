//! Multi-source feature chunking
//!
//! Chromosome labels from every source are normalized and unioned, then each
//! chromosome is processed one source at a time. A source's chunk map is
//! written out and dropped before the next source is queried, so at most one
//! (chromosome, source) feature set is held in memory.

use std::collections::BTreeSet;
use std::io::Write;

use crate::coords::ChunkGrid;
use crate::error::ChunkResult;
use crate::feature_chunks::{AssignStats, FeatureChunkAssigner};
use crate::io::ChunkWriter;
use crate::source::AnnotationSource;
use crate::types::*;

/// Union of the chromosome labels of all `sources`, `chr` prefixes removed.
pub fn union_chromosomes(sources: &[Box<dyn AnnotationSource>]) -> ChunkResult<BTreeSet<String>> {
    let mut chromosomes = BTreeSet::new();
    for source in sources {
        let labels = source.list_chromosomes()?;
        log::debug!("Source {} lists {} chromosomes", source.name(), labels.len());
        chromosomes.extend(labels.iter().map(|label| normalize_chromosome(label).to_string()));
    }
    Ok(chromosomes)
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegulatorySummary {
    pub chromosomes: u64,
    pub sources: u64,
    pub chunks: u64,
    pub assignment: AssignStats,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RegulatoryPipeline {
    assigner: FeatureChunkAssigner,
}

impl RegulatoryPipeline {
    pub fn new(grid: ChunkGrid) -> Self {
        Self {
            assigner: FeatureChunkAssigner::new(grid),
        }
    }

    pub fn run<W: Write>(
        &self,
        sources: &[Box<dyn AnnotationSource>],
        writer: &mut ChunkWriter<W>,
    ) -> ChunkResult<RegulatorySummary> {
        let chromosomes = union_chromosomes(sources)?;
        log::info!(
            "Chunking features of {} chromosomes from {} sources",
            chromosomes.len(),
            sources.len()
        );

        let mut summary = RegulatorySummary {
            chromosomes: chromosomes.len() as u64,
            sources: sources.len() as u64,
            ..Default::default()
        };

        for chromosome in &chromosomes {
            log::info!("Processing chromosome {}", chromosome);
            for source in sources {
                summary.chunks += self.process_source(
                    chromosome,
                    source.as_ref(),
                    writer,
                    &mut summary.assignment,
                )?;
            }
        }

        writer.flush()?;
        log::info!(
            "Wrote {} feature chunks ({} features, {} placements, {} without chromosome)",
            summary.chunks,
            summary.assignment.features,
            summary.assignment.placements,
            summary.assignment.unresolved
        );
        Ok(summary)
    }

    fn process_source<W: Write>(
        &self,
        chromosome: &str,
        source: &dyn AnnotationSource,
        writer: &mut ChunkWriter<W>,
        stats: &mut AssignStats,
    ) -> ChunkResult<u64> {
        let features = source.features_for_chromosome(chromosome)?;
        log::debug!("{} features on {} from {}", features.len(), chromosome, source.name());

        let map = self.assigner.assign(chromosome, source.name(), features);
        stats.merge(map.stats());

        let mut written = 0;
        for chunk in map.into_chunks() {
            writer.write_record(&chunk)?;
            written += 1;
        }
        Ok(written)
    }
}
