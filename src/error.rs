/// Error types for level loading, save files and parameters.

use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LevelError {
    #[error("could not read level data: {0}")]
    Io(#[from] io::Error),

    /// A `LevelNames.txt` line that is not exactly `name,description`.
    #[error("LevelNames.txt line {line} is malformed: {content:?}")]
    MalformedIndex { line: usize, content: String },

    #[error("level {0} has no player start tile")]
    MissingPlayer(String),

    #[error("level index {0} is out of range")]
    NoSuchLevel(usize),
}

#[derive(Debug, Error)]
pub enum SaveError {
    #[error("could not access save file: {0}")]
    Io(#[from] io::Error),

    #[error("save file is corrupt: {0}")]
    Parse(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParameterError {
    #[error("volume {0} is outside 0..=100")]
    VolumeOutOfRange(i32),

    #[error("display format {0:?} is not WIDTHxHEIGHT")]
    BadFormat(String),
}
