mod args;
mod paths;

pub use args::{ActionArg, Cli, Commands, StartArgs};
pub use paths::resolve_data_dir;
