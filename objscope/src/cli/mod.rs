//! Snapshot inspector command line
//!
//! `args` holds the clap definitions, `render` turns a [`crate::export::Snapshot`]
//! into text for the terminal.

pub mod args;
pub mod render;

pub use args::Args;
