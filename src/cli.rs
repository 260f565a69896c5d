use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "timetree-to-gcal")]
#[command(about = "Copy the events of a TimeTree export into a Google calendar", long_about = None)]
pub struct Cli {
    /// TimeTree export file (JSON)
    #[arg(short, long)]
    pub input: PathBuf,

    /// Title, or part of the title, of the Google calendar to write to
    #[arg(short, long)]
    pub calendar: String,

    /// Print the converted events instead of creating them
    #[arg(long)]
    pub dry_run: bool,
}
