// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Read the pasted text (stdin or --file) and pull out GitHub URLs
// 3. Make sure the destination folder exists
// 4. Clone everything with the batch scheduler
// 5. Print the summary and exit with a proper code
//    (0 = all cloned, 1 = some clones failed, 2 = error)
//
// Everything interactive lives in this file and src/input.rs. The modules
// below only ever see a set of URLs and a destination path.
// =============================================================================

mod batch; // src/batch/ - bounded parallel cloning and the result summary
mod cli; // src/cli.rs - command-line parsing
mod clone; // src/clone/ - one repository clone, backend and errors
mod extract; // src/extract/ - URL extraction and folder naming
mod input; // src/input.rs - reading the pasted text

use std::collections::BTreeSet;
use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use batch::{BatchResult, BatchScheduler};
use cli::Cli;
use clone::GitCli;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.json);

    let exit_code = match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// Logs go to stderr so stdout stays clean for the report (or the JSON).
// RUST_LOG overrides the default level.
fn init_tracing(json: bool) {
    let default_level = if json { "warn" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

// Returns:
//   Ok(0) = every repository cloned (or nothing to do)
//   Ok(1) = at least one clone failed
//   Err = could not read the input, create the folder or print the result
async fn run(cli: Cli) -> Result<i32> {
    let text = read_input(cli.file.as_deref()).await?;

    if text.trim().is_empty() {
        return nothing_to_clone("❌ No text entered. Aborting.", cli.json);
    }

    let urls = extract::extract_github_urls(&text);

    if urls.is_empty() {
        return nothing_to_clone("❌ No GitHub URLs found in the text.", cli.json);
    }

    if !cli.json {
        print_found(&urls);
    }

    let destination = prepare_destination(&cli.dest).await?;

    let scheduler = BatchScheduler::new(Arc::new(GitCli::default()), cli.workers);

    if !cli.json {
        println!(
            "⬇️  Cloning {} repository(ies) into {} ({} at a time)...\n",
            urls.len(),
            destination.display(),
            scheduler.workers().min(urls.len())
        );
    }

    let result = scheduler.run(urls, &destination).await;

    print_results(&result, &destination, cli.json)?;

    if result.is_success() {
        Ok(0)
    } else {
        Ok(1)
    }
}

// Ends the run early. In JSON mode stdout still gets an empty result and
// the message moves to stderr.
fn nothing_to_clone(message: &str, json: bool) -> Result<i32> {
    if json {
        eprintln!("{}", message);
        println!("{}", serde_json::to_string_pretty(&BatchResult::default())?);
    } else {
        println!("{}", message);
    }
    Ok(0)
}

// Reads the text from --file, or from stdin until two empty lines / EOF
async fn read_input(file: Option<&Path>) -> Result<String> {
    if let Some(path) = file {
        return tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("could not read {}", path.display()));
    }

    if io::stdin().is_terminal() {
        eprintln!("Paste the text with GitHub URLs, then press Enter on two empty lines (or Ctrl+D):");
        eprintln!("{}", "-".repeat(60));
    }

    // Reading stdin blocks, so keep it off the async worker threads
    let text = tokio::task::spawn_blocking(|| input::read_pasted_text(io::stdin().lock()))
        .await
        .context("stdin reader stopped unexpectedly")?
        .context("could not read standard input")?;

    Ok(text)
}

// Creates the destination if needed and returns its absolute path
async fn prepare_destination(dest: &Path) -> Result<PathBuf> {
    tokio::fs::create_dir_all(dest)
        .await
        .with_context(|| format!("could not create folder {}", dest.display()))?;

    tokio::fs::canonicalize(dest)
        .await
        .with_context(|| format!("could not resolve folder {}", dest.display()))
}

fn print_found(urls: &BTreeSet<String>) {
    println!("✅ Found {} repository(ies):", urls.len());
    for url in urls {
        println!("   • {}", url);
    }
    println!();
}

// Prints the batch result either as a summary or as JSON
fn print_results(result: &BatchResult, destination: &Path, json: bool) -> Result<()> {
    if json {
        let json_output = serde_json::to_string_pretty(result)?;
        println!("{}", json_output);
    } else {
        print_summary(result, destination);
    }
    Ok(())
}

fn print_summary(result: &BatchResult, destination: &Path) {
    println!();
    println!("{}", "=".repeat(60));
    println!("📊 Summary");
    println!("{}", "=".repeat(60));
    println!("   ✅ Successful: {}", result.success_count);
    println!("   ❌ Failed: {}", result.failure_count);

    let failures = result.failures_sorted();
    if !failures.is_empty() {
        println!();
        println!("Repositories with errors:");
        for outcome in failures {
            println!("   • {}", outcome.url);
            if let Some(reason) = outcome.reason() {
                println!("     {}", reason);
            }
        }
    }

    println!();
    println!("📁 Repositories are in: {}", destination.display());
}
