// src/cli.rs
// =============================================================================
// Command-line interface, defined with clap's derive API.
//
// Everything is optional:
//   repo-harvest                         # paste URLs, clone into ./AddOns
//   repo-harvest --file list.txt         # read the text from a file
//   repo-harvest --dest ~/addons -w 4    # other folder, 4 parallel clones
//   repo-harvest --json < list.txt       # machine-readable summary
// =============================================================================

use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "repo-harvest",
    version = "0.1.0",
    about = "Clone every GitHub repository mentioned in a block of text",
    long_about = "repo-harvest finds GitHub repository URLs in pasted text (addon lists, \
                  markdown, chat logs...) and clones each one into a destination folder, \
                  several at a time. An existing folder with the same name is replaced."
)]
pub struct Cli {
    /// Folder that receives one subfolder per repository
    ///
    /// Created if it doesn't exist. Existing repository folders inside it are
    /// deleted and cloned again; other folders are left alone.
    #[arg(short, long, default_value = "./AddOns")]
    pub dest: PathBuf,

    /// Maximum number of clones running at the same time
    #[arg(short, long, default_value_t = 12, value_parser = parse_workers)]
    pub workers: usize,

    /// Read the text from this file instead of standard input
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// Print the summary as JSON instead of a human-readable report
    #[arg(long)]
    pub json: bool,
}

fn parse_workers(value: &str) -> Result<usize, String> {
    match value.parse::<usize>() {
        Ok(0) => Err("must be at least 1".to_string()),
        Ok(workers) => Ok(workers),
        Err(e) => Err(e.to_string()),
    }
}
