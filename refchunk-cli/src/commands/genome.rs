//! Genome command implementation - split FASTA sequences into genome chunks

use anyhow::{Context, Result};
use std::path::PathBuf;

use refchunk_core::{ChunkWriter, GenomePipeline, InfoStats, SequenceChunker};

use crate::config::Config;
use crate::error::CliError;

pub fn execute(
    config: &Config,
    input: PathBuf,
    output: PathBuf,
    info_stats: Option<PathBuf>,
    species: Option<String>,
    chunk_size: Option<i64>,
) -> Result<()> {
    log::info!("Starting genome chunking");
    log::info!("Input: {}", input.display());
    log::info!("Output file: {}", output.display());

    // Validate input exists
    if !input.exists() {
        return Err(CliError::file_not_found(input).into());
    }

    let grid = super::chunk_grid(config, chunk_size)?;
    let chunker = SequenceChunker::new(grid).map_err(CliError::from)?;
    let pipeline = GenomePipeline::new(chunker);
    log::info!("Chunk size: {}", grid.chunk_size());

    let mut writer = ChunkWriter::create(&output)
        .map_err(CliError::from)
        .with_context(|| format!("Failed to create output file: {}", output.display()))?;

    let species = species.unwrap_or_else(|| config.genome.species.clone());
    let mut stats = info_stats.as_ref().map(|_| InfoStats::new(species));

    let summary = if input.is_dir() {
        log::info!("Reading files ending in {}", config.genome.fasta_suffix);
        pipeline.convert_dir(&input, &config.genome.fasta_suffix, &mut writer, stats.as_mut())
    } else {
        pipeline.convert_file(&input, &mut writer, stats.as_mut())
    }
    .map_err(CliError::from)
    .with_context(|| format!("Failed to chunk {}", input.display()))?;

    if let (Some(path), Some(stats)) = (info_stats, stats) {
        stats
            .write_to_file(&path)
            .map_err(CliError::from)
            .with_context(|| format!("Failed to write info stats: {}", path.display()))?;
        log::info!("Info stats written to: {}", path.display());
    }

    log::info!(
        "Genome chunking completed: {} files, {} chromosomes, {} bases, {} chunks",
        summary.files,
        summary.chromosomes,
        summary.bases,
        summary.chunks
    );
    log::info!("{} records written to: {}", writer.records_written(), output.display());

    Ok(())
}
