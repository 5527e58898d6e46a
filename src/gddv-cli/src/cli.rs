//! CLI argument definitions for gddv.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "gddv", version, about = "Inspect firmware policy vault (GDDV) blobs")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Decode a vault blob and print its entry tree
    Decode {
        /// Path to the raw blob (e.g. the dumped GDDV object)
        input: PathBuf,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
    },

    /// Show the container header of a vault blob
    Header {
        /// Path to the raw blob
        input: PathBuf,
    },

    /// Decode a raw supported-feature GUID buffer
    Guids {
        /// Path to the raw buffer of 16-byte GUID records
        input: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Yaml,
}
