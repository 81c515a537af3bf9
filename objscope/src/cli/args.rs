//! CLI argument definitions

use clap::Parser;
use std::path::PathBuf;

use crate::domain::ObjectId;

#[derive(Parser, Debug)]
#[command(
    name = "objscope",
    about = "Inspect object graph snapshots written by the objscope probe",
    after_help = "\
EXAMPLES:
    objscope app.json                         Summary of the snapshot
    objscope app.json --tree                  Ownership tree from every root
    objscope app.json --connections           All signal/slot connections
    objscope app.json --object 0x55d0c0de10   One object, its children and connections"
)]
pub struct Args {
    /// Snapshot file produced by objscope_export_snapshot()
    #[arg(value_name = "SNAPSHOT")]
    pub snapshot: PathBuf,

    /// Print the ownership tree
    #[arg(long)]
    pub tree: bool,

    /// Print the connection table
    #[arg(long)]
    pub connections: bool,

    /// Restrict output to one object (hex or decimal address)
    #[arg(long, value_name = "ADDR")]
    pub object: Option<ObjectId>,
}

impl Args {
    /// Neither view flag nor an object filter: print the summary only
    pub fn summary_only(&self) -> bool {
        !self.tree && !self.connections && self.object.is_none()
    }
}
