use clap::{Args, Subcommand};
use std::path::PathBuf;

use crate::exit::CliResult;
use crate::output::OutputFormat;

pub mod codes;
pub mod decode;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Decode a sequence of frame records and print each frame.
    Decode(DecodeArgs),
    /// Print the defined rows of a container's frame-code table.
    Codes(CodesArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Decode(args) => decode::run(args, format),
        Command::Codes(args) => codes::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// Container description (JSON).
    pub container: PathBuf,
    /// Frame records: one code byte followed by its record, repeated.
    pub records: PathBuf,
    /// Stop after decoding N frames.
    #[arg(long)]
    pub count: Option<u64>,
    /// Maximum payload size per frame, in bytes.
    #[arg(long, value_name = "BYTES", env = "NUTFRAME_MAX_PAYLOAD")]
    pub max_payload: Option<usize>,
}

#[derive(Args, Debug)]
pub struct CodesArgs {
    /// Container description (JSON).
    pub container: PathBuf,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}
