//! # objscope - Snapshot Inspector
//!
//! Reads a JSON snapshot written by the preloaded probe and prints a summary,
//! the ownership tree, the connection table or the neighbourhood of one object.

use anyhow::{Context, Result};
use clap::Parser;
use log::debug;

use objscope::cli::{render, Args};
use objscope::domain::ExportError;
use objscope::export::Snapshot;

// Exit codes
const EXIT_SUCCESS: i32 = 0;
const EXIT_ERROR: i32 = 1;
const EXIT_DATAERR: i32 = 65;
const EXIT_NOINPUT: i32 = 66;

fn main() {
    env_logger::init();
    let args = Args::parse();
    std::process::exit(match run(&args) {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => {
            let code = exit_code_for(&e);
            eprintln!("error: {e:#}");
            code
        }
    });
}

fn exit_code_for(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<ExportError>() {
        Some(ExportError::Io(io)) if io.kind() == std::io::ErrorKind::NotFound => EXIT_NOINPUT,
        Some(ExportError::InvalidSnapshot(_) | ExportError::Json(_)) => EXIT_DATAERR,
        _ => EXIT_ERROR,
    }
}

fn run(args: &Args) -> Result<()> {
    let snapshot = Snapshot::from_file(&args.snapshot)
        .with_context(|| format!("Failed to load snapshot {}", args.snapshot.display()))?;
    debug!(
        "loaded {} objects and {} connections from {}",
        snapshot.objects.len(),
        snapshot.connections.len(),
        args.snapshot.display()
    );

    if args.summary_only() {
        print!("{}", render::summary(&snapshot));
        return Ok(());
    }

    if let Some(object) = args.object {
        print!("{}", render::object_detail(&snapshot, object));
    }
    if args.tree {
        print!("{}", render::tree(&snapshot, args.object));
    }
    if args.connections || args.object.is_some() {
        print!("{}", render::connections(&snapshot, args.object));
    }
    Ok(())
}
