use thiserror::Error;

#[derive(Debug, PartialEq, Eq, Clone, Error)]
pub enum Error {
    #[error("invalid bool encoding")]
    InvalidBool,
    #[error("invalid optional encoding")]
    InvalidOptional,
    #[error("unexpected end of buffer")]
    EndOfBuffer,
    #[error("invalid string encoding")]
    InvalidString,
    #[error("input buffer too large")]
    InputTooLarge,
    #[error("sequence too large")]
    SequenceTooLarge,
    #[error("invalid enum value")]
    InvalidEnum,
    #[error("{0}")]
    Custom(String),
}

pub type Result<T> = std::result::Result<T, Error>;
