use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("{0} has already faded")]
    PetDeceased(String),

    #[error("unknown action: {0:?}")]
    UnknownAction(String),
}

pub type Result<T> = std::result::Result<T, Error>;
