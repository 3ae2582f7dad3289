pub mod cli;
pub mod load_config;
pub mod platform;

pub use cli::{run, Cli, Commands, RecordCommand};
