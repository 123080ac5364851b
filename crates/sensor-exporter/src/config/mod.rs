pub mod cli;
pub mod device;
pub mod serve;

pub use cli::*;
pub use device::*;
pub use serve::*;
