use thiserror::Error as ThisError;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, ThisError, PartialEq, Eq)]
pub enum Error {
    #[error("invalid window capacity: `{0}`, must be at least one second")]
    InvalidCapacity(usize),
}
