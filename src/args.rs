use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Parser)]
#[command(version, about)]
pub struct Args {
    /// Problems to run, in order (A to E, any case). Unknown names are skipped.
    pub problems: Vec<String>,

    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[arg(short, long)]
    pub debug: bool,

    /// Stanza replaced by a misnamed file in problem D
    #[arg(short, long)]
    pub misnamed: Option<usize>,

    /// Write placeholder stanza files before running
    #[arg(long)]
    pub init_fixtures: bool,
}
