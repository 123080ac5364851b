use clap::Parser;
use clap::Subcommand;
use utils::version;

use crate::config::device::ReadArgs;
use crate::config::serve::ServeArgs;

#[derive(Parser)]
#[command(about, long_about, version = &**version::VERSION)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Serve sensor readings on an HTTP metrics endpoint
    Serve(Box<ServeArgs>),
    /// Take a single reading and print it as JSON
    Read(ReadArgs),
}
