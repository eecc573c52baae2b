//! Configuration handling for refchunk CLI
//!
//! Supports loading configuration from refchunk.toml files with CLI argument overrides.

use anyhow::{Result, Context};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::CliError;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub genome: GenomeConfig,
    #[serde(default)]
    pub regulatory: RegulatoryConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Chunk width in bases shared by both pipelines (zero or negative uses the default)
    #[serde(default = "default_chunk_size")]
    pub chunk_size: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenomeConfig {
    /// File name suffix selected when the input is a directory
    #[serde(default = "default_fasta_suffix")]
    pub fasta_suffix: String,

    /// Species label written into the info stats
    #[serde(default)]
    pub species: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegulatoryConfig {
    /// Where annotation files are staged before chunking
    #[serde(default)]
    pub store: StoreKind,

    /// Rows per committed transaction when staging into SQLite
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Directory for staging databases (a temporary directory when unset)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub staging_dir: Option<PathBuf>,

    /// Keep staging databases after the run
    #[serde(default)]
    pub keep_staging: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    Sqlite,
    Memory,
}

impl Default for StoreKind {
    #[cfg(feature = "sqlite")]
    fn default() -> Self {
        StoreKind::Sqlite
    }

    #[cfg(not(feature = "sqlite"))]
    fn default() -> Self {
        StoreKind::Memory
    }
}

// Default value functions
fn default_chunk_size() -> i64 { refchunk_core::DEFAULT_CHUNK_SIZE as i64 }
fn default_fasta_suffix() -> String { ".fa.gz".to_string() }
fn default_batch_size() -> usize { 100_000 }

impl Default for GeneralConfig {
    fn default() -> Self {
        Self { chunk_size: default_chunk_size() }
    }
}

impl Default for GenomeConfig {
    fn default() -> Self {
        Self {
            fasta_suffix: default_fasta_suffix(),
            species: String::new(),
        }
    }
}

impl Default for RegulatoryConfig {
    fn default() -> Self {
        Self {
            store: StoreKind::default(),
            batch_size: default_batch_size(),
            staging_dir: None,
            keep_staging: false,
        }
    }
}

impl Config {
    /// Load configuration from file or use defaults
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let config = match config_path {
            Some(path) => {
                log::info!("Loading configuration from: {}", path.display());
                Self::load_from_file(path)?
            }
            None => {
                // Try to find refchunk.toml in current directory
                let default_path = PathBuf::from("refchunk.toml");
                if default_path.exists() {
                    log::info!("Loading configuration from: refchunk.toml");
                    Self::load_from_file(&default_path)?
                } else {
                    log::debug!("Using default configuration");
                    Self::default()
                }
            }
        };

        Ok(config)
    }

    /// Load configuration from a specific TOML file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(CliError::file_not_found(path.to_path_buf()).into());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .map_err(CliError::from)
            .with_context(|| format!("Failed to parse configuration file: {}", path.display()))?;

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .context("Failed to serialize configuration")?;

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write configuration file: {}", path.display()))?;

        Ok(())
    }

    /// Generate example configuration file content
    pub fn example_toml() -> Result<String> {
        toml::to_string_pretty(&Self::default())
            .map_err(CliError::from)
            .context("Failed to serialize default configuration")
    }

    pub fn validate(&self) -> Result<(), CliError> {
        if self.general.chunk_size == 1 {
            return Err(CliError::config("chunk_size must be at least 2"));
        }
        if self.regulatory.batch_size == 0 {
            return Err(CliError::config("regulatory.batch_size must be positive"));
        }
        if self.genome.fasta_suffix.is_empty() {
            return Err(CliError::config("genome.fasta_suffix must not be empty"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.general.chunk_size, 2000);
        assert_eq!(config.genome.fasta_suffix, ".fa.gz");
        assert_eq!(config.regulatory.batch_size, 100_000);
        assert!(config.regulatory.staging_dir.is_none());
        assert!(!config.regulatory.keep_staging);
    }

    #[test]
    fn test_config_roundtrip() -> Result<()> {
        let mut config = Config::default();
        config.general.chunk_size = 500;
        config.genome.species = "hsapiens".to_string();
        config.regulatory.store = StoreKind::Memory;
        config.regulatory.staging_dir = Some(PathBuf::from("/tmp/staging"));

        let temp_file = NamedTempFile::new()?;
        config.save_to_file(temp_file.path())?;
        let loaded = Config::load_from_file(temp_file.path())?;

        assert_eq!(loaded.general.chunk_size, 500);
        assert_eq!(loaded.genome.species, "hsapiens");
        assert_eq!(loaded.regulatory.store, StoreKind::Memory);
        assert_eq!(loaded.regulatory.staging_dir, config.regulatory.staging_dir);

        Ok(())
    }

    #[test]
    fn test_partial_file_uses_defaults() -> Result<()> {
        let mut temp_file = NamedTempFile::new()?;
        writeln!(temp_file, "[general]\nchunk_size = 5000\n\n[regulatory]\nstore = \"memory\"")?;

        let config = Config::load_from_file(temp_file.path())?;
        assert_eq!(config.general.chunk_size, 5000);
        assert_eq!(config.regulatory.store, StoreKind::Memory);
        assert_eq!(config.regulatory.batch_size, 100_000);
        assert_eq!(config.genome.fasta_suffix, ".fa.gz");
        Ok(())
    }

    #[test]
    fn test_chunk_size_of_one_is_rejected() -> Result<()> {
        let mut temp_file = NamedTempFile::new()?;
        writeln!(temp_file, "[general]\nchunk_size = 1")?;
        assert!(Config::load_from_file(temp_file.path()).is_err());
        Ok(())
    }

    #[test]
    fn test_missing_file() {
        let err = Config::load_from_file(Path::new("/nonexistent/refchunk.toml")).unwrap_err();
        assert!(matches!(err.downcast_ref::<CliError>(), Some(CliError::FileNotFound { .. })));
    }

    #[test]
    fn test_example_toml_generation() {
        let example = Config::example_toml().unwrap();
        assert!(example.contains("[general]"));
        assert!(example.contains("[genome]"));
        assert!(example.contains("[regulatory]"));
        assert!(example.contains("chunk_size = 2000"));
    }
}
