use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Clone, Parser)]
#[clap(bin_name = env!("CARGO_PKG_NAME"), version = env!("CARGO_PKG_VERSION"), about = env!("CARGO_PKG_DESCRIPTION"))]
pub struct Cli {
    /// Path to the configuration file
    #[clap(name = "config")]
    pub config: PathBuf,

    /// Shared event link (or event id) to open once the events are loaded
    #[clap(long)]
    pub link: Option<String>,

    #[clap(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Write a month of events as a static HTML page
    Export {
        /// Year to export, defaults to the current one
        #[clap(long)]
        year: Option<i32>,

        /// Month to export (1-12), defaults to the current one
        #[clap(long, value_parser = clap::value_parser!(u32).range(1..=12))]
        month: Option<u32>,

        /// Output file, stdout when omitted
        #[clap(long, short)]
        output: Option<PathBuf>,
    },
}
