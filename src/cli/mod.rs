mod args;
mod command;

pub use args::Cli;
pub use command::{Command, InitArgs};

pub use args::parse;
