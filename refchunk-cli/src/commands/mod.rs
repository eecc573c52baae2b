//! Command implementations for refchunk CLI

pub mod genome;
pub mod regulatory;

use anyhow::Result;
use std::path::Path;
use refchunk_core::ChunkGrid;

use crate::config::Config;
use crate::error::CliError;

/// Chunk grid from the command-line width, else the configured one.
pub fn chunk_grid(config: &Config, chunk_size: Option<i64>) -> Result<ChunkGrid, CliError> {
    let chunk_size = chunk_size.unwrap_or(config.general.chunk_size);
    if chunk_size == 1 {
        return Err(CliError::validation("chunk size must be at least 2"));
    }
    let grid = ChunkGrid::new(chunk_size);
    if chunk_size <= 0 {
        log::warn!("Chunk size {} is not positive, using {}", chunk_size, grid.chunk_size());
    }
    Ok(grid)
}

/// `refchunk config`: print the example or the effective configuration,
/// or save it when a path is given.
pub fn show_config(config: &Config, example: bool, write: Option<&Path>) -> Result<()> {
    if let Some(path) = write {
        if example {
            Config::default().save_to_file(path)?;
        } else {
            config.save_to_file(path)?;
        }
        log::info!("Configuration written to: {}", path.display());
        return Ok(());
    }

    let text = if example {
        Config::example_toml()?
    } else {
        toml::to_string_pretty(config).map_err(CliError::from)?
    };
    print!("{}", text);
    Ok(())
}
