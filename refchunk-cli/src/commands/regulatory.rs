//! Regulatory command implementation - assign annotation features to chunks

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use refchunk_core::{AnnotationSource, ChunkWriter, MemorySource, RegulatoryPipeline, SourceKind};

use crate::config::{Config, StoreKind};
use crate::error::{CliError, CliResult};

/// Parse a `TAG=PATH` source argument.
pub fn parse_source_arg(argument: &str) -> CliResult<(SourceKind, PathBuf)> {
    let (tag, path) = argument
        .split_once('=')
        .ok_or_else(|| CliError::invalid_source(argument, "expected TAG=PATH"))?;

    let kind = tag
        .trim()
        .parse::<SourceKind>()
        .map_err(|_| CliError::invalid_source(argument, "unknown source tag"))?;

    let path = path.trim();
    if path.is_empty() {
        return Err(CliError::invalid_source(argument, "missing path"));
    }
    Ok((kind, PathBuf::from(path)))
}

/// Sources of a regulatory build directory, in processing order.
///
/// Files absent from the directory are skipped.
pub fn sources_in_dir(dir: &Path) -> CliResult<Vec<(SourceKind, PathBuf)>> {
    if !dir.is_dir() {
        return Err(CliError::file_not_found(dir.to_path_buf()));
    }

    let mut sources = Vec::new();
    for kind in SourceKind::ALL {
        let path = dir.join(kind.default_file_name());
        if path.exists() {
            sources.push((kind, path));
        } else {
            log::warn!(
                "No {} file in {}, skipping {}",
                kind.default_file_name(),
                dir.display(),
                kind
            );
        }
    }

    if sources.is_empty() {
        return Err(CliError::validation(format!(
            "no annotation files found in {}",
            dir.display()
        )));
    }
    Ok(sources)
}

/// Where staging databases are written for one run.
enum Staging {
    Temporary(TempDir),
    Directory(PathBuf),
}

impl Staging {
    fn prepare(config: &Config) -> Result<Self> {
        match &config.regulatory.staging_dir {
            Some(dir) => {
                std::fs::create_dir_all(dir).with_context(|| {
                    format!("Failed to create staging directory: {}", dir.display())
                })?;
                Ok(Staging::Directory(dir.clone()))
            }
            None => {
                let dir = TempDir::new().context("Failed to create temporary staging directory")?;
                Ok(Staging::Temporary(dir))
            }
        }
    }

    fn path(&self) -> &Path {
        match self {
            Staging::Temporary(dir) => dir.path(),
            Staging::Directory(dir) => dir,
        }
    }

    fn finish(self, keep: bool, databases: &[PathBuf]) -> Result<()> {
        match self {
            Staging::Temporary(dir) if keep => {
                let path = dir.into_path();
                log::info!("Staging databases kept in {}", path.display());
            }
            Staging::Temporary(dir) => {
                dir.close().context("Failed to remove staging directory")?;
            }
            Staging::Directory(dir) if keep => {
                log::info!("Staging databases kept in {}", dir.display());
            }
            Staging::Directory(_) => {
                for db in databases {
                    if db.exists() {
                        std::fs::remove_file(db)
                            .with_context(|| format!("Failed to remove {}", db.display()))?;
                    }
                }
            }
        }
        Ok(())
    }
}

/// Staging database path for `input`: `<file name>.db`, numbered when an
/// earlier source of the same run already took that name.
fn staging_db_path(staging: &Path, kind: SourceKind, input: &Path, taken: &[PathBuf]) -> PathBuf {
    let file_name = input
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| kind.table_name().to_string());

    let mut db = staging.join(format!("{}.db", file_name));
    let mut copy = 1;
    while taken.contains(&db) {
        db = staging.join(format!("{}.{}.db", file_name, copy));
        copy += 1;
    }
    db
}

fn open_source(
    kind: SourceKind,
    path: &Path,
    store: StoreKind,
    staging: &Path,
    batch_size: usize,
    databases: &mut Vec<PathBuf>,
) -> Result<Box<dyn AnnotationSource>> {
    if !path.exists() {
        return Err(CliError::file_not_found(path.to_path_buf()).into());
    }

    match store {
        StoreKind::Memory => {
            let source = MemorySource::load(kind, path)
                .map_err(CliError::from)
                .with_context(|| format!("Failed to load {}", path.display()))?;
            Ok(Box::new(source))
        }
        #[cfg(feature = "sqlite")]
        StoreKind::Sqlite => {
            let db = staging_db_path(staging, kind, path, databases);
            databases.push(db.clone());
            let source = refchunk_core::SqliteSource::load(kind, path, &db, batch_size)
                .map_err(CliError::from)
                .with_context(|| format!("Failed to stage {}", path.display()))?;
            Ok(Box::new(source))
        }
        #[cfg(not(feature = "sqlite"))]
        StoreKind::Sqlite => {
            let _ = (staging, batch_size, databases);
            Err(CliError::config("this build has no SQLite staging store, use --store memory")
                .into())
        }
    }
}

pub fn execute(
    config: &Config,
    dir: Option<PathBuf>,
    source_args: Vec<String>,
    output: PathBuf,
    store: Option<StoreKind>,
    chunk_size: Option<i64>,
) -> Result<()> {
    log::info!("Starting regulatory feature chunking");

    let sources = match dir {
        Some(dir) => {
            log::info!("Regulatory build directory: {}", dir.display());
            sources_in_dir(&dir)?
        }
        None => source_args
            .iter()
            .map(|argument| parse_source_arg(argument))
            .collect::<CliResult<Vec<_>>>()?,
    };

    let grid = super::chunk_grid(config, chunk_size)?;
    let store = store.unwrap_or(config.regulatory.store);
    log::info!("Chunk size: {}, staging store: {:?}", grid.chunk_size(), store);

    // Replace any previous output
    if output.exists() {
        log::info!("Removing existing output file: {}", output.display());
        std::fs::remove_file(&output)
            .with_context(|| format!("Failed to remove existing output: {}", output.display()))?;
    }

    let staging = Staging::prepare(config)?;
    let mut databases = Vec::new();
    let mut opened = Vec::with_capacity(sources.len());
    for (kind, path) in &sources {
        opened.push(open_source(
            *kind,
            path,
            store,
            staging.path(),
            config.regulatory.batch_size,
            &mut databases,
        )?);
    }

    let mut writer = ChunkWriter::create(&output)
        .map_err(CliError::from)
        .with_context(|| format!("Failed to create output file: {}", output.display()))?;

    let summary = RegulatoryPipeline::new(grid)
        .run(&opened, &mut writer)
        .map_err(CliError::from)
        .context("Failed to chunk regulatory features")?;

    // Connections must be closed before their files are removed
    drop(opened);
    staging.finish(config.regulatory.keep_staging, &databases)?;

    log::info!(
        "Regulatory chunking completed: {} chromosomes, {} sources, {} chunks",
        summary.chromosomes,
        summary.sources,
        summary.chunks
    );
    if summary.assignment.unresolved > 0 {
        log::warn!("{} features had no chromosome", summary.assignment.unresolved);
    }
    if summary.assignment.mismatched > 0 {
        log::warn!(
            "{} features were listed under a different chromosome",
            summary.assignment.mismatched
        );
    }
    log::info!("{} records written to: {}", writer.records_written(), output.display());

    Ok(())
}
