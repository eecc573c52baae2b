//! Annotation sources
//!
//! The chunking core only needs two questions answered by a source: which
//! chromosomes it has, and which features lie on one of them. Any store that
//! answers both can feed the regulatory pipeline.

#[cfg(feature = "sqlite")] pub mod sqlite;

#[cfg(feature = "sqlite")] pub use sqlite::SqliteSource;

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use crate::error::ChunkResult;
use crate::feature::SourceKind;
use crate::io::{GffReader, GffRecord};
use crate::types::*;

pub trait AnnotationSource {
    /// Short label used in logs.
    fn name(&self) -> &str;

    /// Chromosome labels as they appear in the source, prefixes included.
    fn list_chromosomes(&self) -> ChunkResult<BTreeSet<String>>;

    /// Features on `chromosome`, matched with or without a `chr` prefix, in
    /// source order.
    fn features_for_chromosome(&self, chromosome: &str) -> ChunkResult<Vec<Feature>>;

    /// Features on `chromosome` overlapping the closed range `[start, end]`.
    fn features_in_range(
        &self,
        chromosome: &str,
        start: GenomicPos,
        end: GenomicPos,
    ) -> ChunkResult<Vec<Feature>> {
        let mut features = self.features_for_chromosome(chromosome)?;
        features.retain(|f| f.overlaps(start, end));
        Ok(features)
    }
}

/// Labels accepted for a chromosome query: bare and `chr`-prefixed.
pub(crate) fn chromosome_aliases(chromosome: &str) -> (String, String) {
    let bare = normalize_chromosome(chromosome).to_string();
    let prefixed = format!("chr{}", bare);
    (bare, prefixed)
}

/// Source held entirely in memory, indexed by normalized chromosome.
#[derive(Debug, Clone)]
pub struct MemorySource {
    name: String,
    kind: SourceKind,
    labels: BTreeSet<String>,
    by_chromosome: BTreeMap<String, Vec<Feature>>,
}

impl MemorySource {
    pub fn new(kind: SourceKind) -> Self {
        Self {
            name: kind.tag().to_string(),
            kind,
            labels: BTreeSet::new(),
            by_chromosome: BTreeMap::new(),
        }
    }

    /// Read a whole annotation file, extracting features with `kind`'s rules.
    pub fn load<P: AsRef<Path>>(kind: SourceKind, path: P) -> ChunkResult<Self> {
        log::info!("Loading {} features from {}", kind, path.as_ref().display());
        let mut source = Self::new(kind);
        for record in GffReader::from_path(&path)? {
            source.add_record(&record?)?;
        }
        log::info!(
            "Loaded {} {} features on {} chromosomes",
            source.feature_count(),
            kind,
            source.labels.len()
        );
        Ok(source)
    }

    pub fn add_record(&mut self, record: &GffRecord) -> ChunkResult<()> {
        let feature = self.kind.extract(record)?;
        self.add_feature(&record.seqname, feature);
        Ok(())
    }

    /// Store `feature` under the raw `seqname` it was read with.
    pub fn add_feature(&mut self, seqname: &str, feature: Feature) {
        let seqname = seqname.trim();
        self.labels.insert(seqname.to_string());
        self.by_chromosome
            .entry(normalize_chromosome(seqname).to_string())
            .or_default()
            .push(feature);
    }

    pub fn feature_count(&self) -> usize {
        self.by_chromosome.values().map(Vec::len).sum()
    }
}

impl AnnotationSource for MemorySource {
    fn name(&self) -> &str {
        &self.name
    }

    fn list_chromosomes(&self) -> ChunkResult<BTreeSet<String>> {
        Ok(self.labels.clone())
    }

    fn features_for_chromosome(&self, chromosome: &str) -> ChunkResult<Vec<Feature>> {
        Ok(self
            .by_chromosome
            .get(normalize_chromosome(chromosome))
            .cloned()
            .unwrap_or_default())
    }
}
