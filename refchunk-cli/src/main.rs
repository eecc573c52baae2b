use clap::{Parser, Subcommand};
use std::path::PathBuf;
use anyhow::Result;

mod config;
mod commands;
mod error;

use config::{Config, StoreKind};
use error::{print_error_and_exit, CliError};

#[derive(Parser)]
#[command(name = "refchunk")]
#[command(about = "refchunk - chunk-addressable reference genomes and regulatory features")]
#[command(version)]
#[command(long_about = "
refchunk converts reference genome FASTA files and regulatory annotation files
into newline-delimited JSON chunk records addressable by (chromosome, chunk id).

Examples:
  refchunk genome --input Homo_sapiens.GRCh37.dna.fa.gz --output genome.json
  refchunk genome --input fasta/ --output genome.json --info-stats info_stats.json
  refchunk regulatory --dir regulatory_build/ --output regulatory.json
  refchunk regulatory --source motif=MotifFeatures.gff.gz --output motifs.json --store memory
  refchunk config --example --write refchunk.toml
")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Split FASTA sequences into genome chunks
    Genome {
        /// FASTA file (plain or .gz) or a directory of FASTA files
        #[arg(short, long, required = true)]
        input: PathBuf,

        /// Output file (one JSON chunk per line)
        #[arg(short, long, required = true)]
        output: PathBuf,

        /// Also write chromosome sizes as JSON to this file
        #[arg(long)]
        info_stats: Option<PathBuf>,

        /// Species label for the info stats
        #[arg(long)]
        species: Option<String>,

        /// Chunk width in bases
        #[arg(long)]
        chunk_size: Option<i64>,
    },

    /// Assign annotation features to the chunks they overlap
    Regulatory {
        /// Directory holding the standard regulatory build files
        #[arg(long, conflicts_with = "source", required_unless_present = "source")]
        dir: Option<PathBuf>,

        /// Annotation file as TAG=PATH (annotated, motif, regulatory, mirna); repeatable
        #[arg(long, value_name = "TAG=PATH")]
        source: Vec<String>,

        /// Output file (one JSON chunk per line)
        #[arg(short, long, required = true)]
        output: PathBuf,

        /// Staging store for annotation files
        #[arg(long)]
        store: Option<StoreKind>,

        /// Chunk width in bases
        #[arg(long)]
        chunk_size: Option<i64>,
    },

    /// Show configuration
    Config {
        /// Print an example configuration holding every default
        #[arg(long)]
        example: bool,

        /// Save the configuration to this file instead of printing it
        #[arg(long, value_name = "PATH")]
        write: Option<PathBuf>,
    },
}

fn setup_logging(verbose: u8, quiet: bool) -> Result<()> {
    if quiet {
        std::env::set_var("RUST_LOG", "error");
    } else {
        let level = match verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        };
        std::env::set_var("RUST_LOG", level);
    }

    env_logger::Builder::from_default_env()
        .format_timestamp_secs()
        .init();

    Ok(())
}

fn run(cli: Cli) -> Result<()> {
    // Load configuration
    let config = Config::load(cli.config.as_deref())?;

    // Execute the requested command
    match cli.command {
        Commands::Genome {
            input,
            output,
            info_stats,
            species,
            chunk_size,
        } => {
            commands::genome::execute(&config, input, output, info_stats, species, chunk_size)?;
        }

        Commands::Regulatory {
            dir,
            source,
            output,
            store,
            chunk_size,
        } => {
            commands::regulatory::execute(&config, dir, source, output, store, chunk_size)?;
        }

        Commands::Config { example, write } => {
            commands::show_config(&config, example, write.as_deref())?;
        }
    }

    Ok(())
}

fn main() {
    let cli = Cli::parse();

    if let Err(err) = setup_logging(cli.verbose, cli.quiet) {
        eprintln!("Error: {:#}", err);
        std::process::exit(1);
    }

    if let Err(err) = run(cli) {
        log::debug!("{:?}", err);
        match err.downcast_ref::<CliError>() {
            Some(cli_error) => print_error_and_exit(cli_error),
            None => {
                eprintln!("Error: {:#}", err);
                std::process::exit(1);
            }
        }
    }
}
