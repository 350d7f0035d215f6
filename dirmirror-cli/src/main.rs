//! dirmirror — one-way directory mirroring CLI.
//!
//! # Usage
//!
//! ```text
//! dirmirror <SOURCE> <DEST>
//! ```
//!
//! Mirrors `SOURCE` into `DEST` until a line arrives on stdin: new and
//! size-changed files are copied over, destination entries with no source
//! counterpart are removed. `SOURCE` is never modified.

use std::io::{self, BufRead};
use std::path::PathBuf;
use std::thread;

use anyhow::{anyhow, Context, Result};
use clap::Parser;

use dirmirror_core::RootPair;
use dirmirror_watch::{start_blocking, LoopConfig, StopToken};

#[derive(Parser, Debug)]
#[command(
    name = "dirmirror",
    version,
    about = "Mirror a source directory tree into a destination tree",
    long_about = None,
)]
struct Cli {
    /// Directory to mirror from. Never modified.
    source: PathBuf,

    /// Directory to mirror into. Created if missing.
    dest: PathBuf,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let pair = RootPair::new(cli.source, cli.dest).context("invalid source/destination pair")?;
    let token = StopToken::new();

    let sync_thread = {
        let pair = pair.clone();
        let token = token.clone();
        thread::spawn(move || start_blocking(pair, LoopConfig::default(), token))
    };

    println!(
        "Mirroring {} -> {}. Press Enter to stop.",
        pair.source().display(),
        pair.dest().display()
    );

    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("read stop signal from stdin")?;

    token.stop();
    sync_thread
        .join()
        .map_err(|_| anyhow!("sync thread panicked"))?
        .context("mirror loop exited with error")?;

    println!("dirmirror stopped.");
    Ok(())
}
