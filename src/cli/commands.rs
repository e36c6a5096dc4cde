use clap::{Parser, Subcommand};

/// `aiself` - letters from your future self, one for each path.
#[derive(Parser, Debug)]
#[command(name = "aiself")]
#[command(version = "0.1.0")]
#[command(about = "Letters from your future self, one for each path.", long_about = None)]
pub struct Cli {
    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Describe your decision and receive two letters
    Write {
        /// Wait for the letters in the foreground instead of handing off to
        /// the background writer
        #[arg(long)]
        blocking: bool,
    },

    /// Show the letters from the most recent session
    Show,

    /// Forget the most recent session
    Clear,
}
