use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("G1 element must be exactly 48 bytes")]
    WrongG1Length,
    #[error("G2 element must be exactly 96 bytes")]
    WrongG2Length,
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<Error> for chia_traits::Error {
    fn from(err: Error) -> chia_traits::Error {
        chia_traits::Error::Custom(format!("{err}"))
    }
}
