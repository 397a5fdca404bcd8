use std::io;

/// Errors that stop the animation from starting or running
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("terminal i/o failed: {0}")]
    Io(#[from] io::Error),

    #[error("terminal size could not be determined")]
    UnknownTerminalSize,

    #[error("terminal is too small: {cols}x{rows} cells, need at least {min_cols}x{min_rows}")]
    TerminalTooSmall {
        cols: u16,
        rows: u16,
        min_cols: u16,
        min_rows: u16,
    },

    #[error("invalid {name}: {reason}")]
    InvalidSetting { name: &'static str, reason: String },
}

pub type Result<T> = std::result::Result<T, Error>;
