mod args;

pub use args::{CliArgs, Command, CompressionLevel, InitConfigArgs, StitchArgs, UnstitchArgs};
