//! Speech engine implementations

pub mod command;

pub use command::CommandSpeech;
