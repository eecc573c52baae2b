//! FASTA to genome chunk conversion
//!
//! A single FASTA file or every matching file of a directory is streamed
//! chromosome by chromosome into one chunk writer. Optionally a per-genome
//! summary of chromosome sizes is collected alongside.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ChunkResult;
use crate::io::{ChunkWriter, FastaChromosomes};
use crate::sequence::SequenceChunker;
use crate::types::GenomicPos;

/// Single band spanning a whole chromosome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cytoband {
    pub name: String,
    pub stain: String,
    pub start: GenomicPos,
    pub end: GenomicPos,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChromosomeInfo {
    pub name: String,
    pub start: GenomicPos,
    pub end: GenomicPos,
    pub size: GenomicPos,
    pub is_circular: u8,
    pub number_genes: u64,
    pub cytobands: Vec<Cytoband>,
}

/// Genome-level summary written next to the chunk output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InfoStats {
    pub species: String,
    pub chromosomes: Vec<ChromosomeInfo>,
}

impl InfoStats {
    pub fn new<S: Into<String>>(species: S) -> Self {
        Self {
            species: species.into(),
            chromosomes: Vec::new(),
        }
    }

    pub fn add_chromosome(&mut self, name: &str, length: GenomicPos) {
        self.chromosomes.push(ChromosomeInfo {
            name: name.to_string(),
            start: 1,
            end: length,
            size: length,
            is_circular: 0,
            number_genes: 0,
            cytobands: vec![Cytoband {
                name: String::new(),
                stain: self.species.clone(),
                start: 1,
                end: length,
            }],
        });
    }

    pub fn write_to_file<P: AsRef<Path>>(&self, path: P) -> ChunkResult<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer(&mut writer, self)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenomeSummary {
    pub files: u64,
    pub chromosomes: u64,
    pub chunks: u64,
    pub bases: u64,
}

impl GenomeSummary {
    pub fn merge(&mut self, other: GenomeSummary) {
        self.files += other.files;
        self.chromosomes += other.chromosomes;
        self.chunks += other.chunks;
        self.bases += other.bases;
    }
}

/// Files in `dir` whose names end in `suffix`, sorted by name.
pub fn fasta_files_in<P: AsRef<Path>>(dir: P, suffix: &str) -> ChunkResult<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        let matches = path
            .file_name()
            .map(|name| name.to_string_lossy().ends_with(suffix))
            .unwrap_or(false);
        if matches && path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

#[derive(Debug, Clone, Copy)]
pub struct GenomePipeline {
    chunker: SequenceChunker,
}

impl GenomePipeline {
    pub fn new(chunker: SequenceChunker) -> Self {
        Self { chunker }
    }

    /// Convert one FASTA file. Every chromosome seen is added to `stats`.
    pub fn convert_file<P: AsRef<Path>, W: Write>(
        &self,
        path: P,
        writer: &mut ChunkWriter<W>,
        mut stats: Option<&mut InfoStats>,
    ) -> ChunkResult<GenomeSummary> {
        log::info!("Chunking {}", path.as_ref().display());
        let mut summary = GenomeSummary {
            files: 1,
            ..Default::default()
        };

        for chromosome in FastaChromosomes::from_path(&path)? {
            let chromosome = chromosome?;
            log::info!("Chromosome {} ({} bp)", chromosome.name, chromosome.len());

            summary.chunks +=
                self.chunker.write_chunks(&chromosome.name, &chromosome.sequence, writer)?;
            summary.chromosomes += 1;
            summary.bases += chromosome.len() as u64;

            if let Some(stats) = stats.as_deref_mut() {
                stats.add_chromosome(&chromosome.name, chromosome.len() as GenomicPos);
            }
        }

        writer.flush()?;
        Ok(summary)
    }

    /// Convert every file of `dir` ending in `suffix`, in file name order.
    pub fn convert_dir<P: AsRef<Path>, W: Write>(
        &self,
        dir: P,
        suffix: &str,
        writer: &mut ChunkWriter<W>,
        mut stats: Option<&mut InfoStats>,
    ) -> ChunkResult<GenomeSummary> {
        let files = fasta_files_in(&dir, suffix)?;
        if files.is_empty() {
            log::warn!("No files ending in {} under {}", suffix, dir.as_ref().display());
        }

        let mut summary = GenomeSummary::default();
        for file in files {
            summary.merge(self.convert_file(&file, writer, stats.as_deref_mut())?);
        }
        Ok(summary)
    }
}
