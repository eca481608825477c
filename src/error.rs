use crate::exception::ClientException;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AdviceError>;

#[derive(Debug, Error)]
pub enum AdviceError {
    #[error("Invalid boolean for {key}: {value:?}")]
    InvalidBool { key: String, value: String },

    #[error("Exception advice is already installed")]
    AlreadyInstalled,
}

/// A client exception that reached the translator without a status classification.
///
/// The translator refuses to guess a status for it. The value is handed back to the
/// caller so the exception's construction site can be fixed.
#[derive(Debug, Clone, Error)]
#[error("Client exception has no status classification: {0}")]
pub struct Unclassified(pub ClientException);

impl Unclassified {
    pub fn into_inner(self) -> ClientException {
        self.0
    }
}
