use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "tram8map",
    about = "Mapping table editor for Tram8-style MIDI-to-CV modules"
)]
pub struct Cli {
    /// Path of the saved table (default: table.json in the config dir)
    #[arg(long, global = true)]
    pub table: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// List available MIDI output devices
    Ports,
    /// Print the table in its text form
    Show,
    /// Send the table to the module as SysEx, without opening the editor
    Send(SendArgs),
    /// Overwrite the saved table with the factory default map
    Reset,
}

#[derive(clap::Args)]
pub struct SendArgs {
    /// MIDI output device name filter (default: first available)
    #[arg(long)]
    pub port: Option<String>,
}
